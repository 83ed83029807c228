//! Minimal secure noise for a key dimension.
//!
//! For a supported security level, the logarithm of the smallest standard deviation keeping an LWE
//! instance secure is an affine function of the key dimension (the security curve). The curve
//! never goes below a standard deviation covering the two least significant bits of the
//! ciphertext modulus.

use crate::commons::dispersion::{DispersionParameter, StandardDev, Variance};
use crate::commons::parameters::{
    CiphertextModulusLog, GlweDimension, LweDimension, PolynomialSize, SecurityLevel,
};
use crate::error::{Error, ErrorKind};

/// The security curve of one security level.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SecurityWeights {
    pub slope: f64,
    pub bias: f64,
    pub minimal_lwe_dimension: LweDimension,
}

const SECURITY_WEIGHTS_TABLE: [(u64, SecurityWeights); 8] = [
    (
        80,
        SecurityWeights {
            slope: -0.04045822621883835,
            bias: 1.7183812000404686,
            minimal_lwe_dimension: LweDimension(450),
        },
    ),
    (
        96,
        SecurityWeights {
            slope: -0.034025830888066645,
            bias: 1.6717464757059017,
            minimal_lwe_dimension: LweDimension(450),
        },
    ),
    (
        112,
        SecurityWeights {
            slope: -0.02965558537379898,
            bias: 2.1206209495220223,
            minimal_lwe_dimension: LweDimension(450),
        },
    ),
    (
        128,
        SecurityWeights {
            slope: -0.026374888765705498,
            bias: 2.012143923330495,
            minimal_lwe_dimension: LweDimension(450),
        },
    ),
    (
        144,
        SecurityWeights {
            slope: -0.023543213710609,
            bias: 2.0987660718931634,
            minimal_lwe_dimension: LweDimension(450),
        },
    ),
    (
        160,
        SecurityWeights {
            slope: -0.021206367162180496,
            bias: 1.9829008853779416,
            minimal_lwe_dimension: LweDimension(450),
        },
    ),
    (
        176,
        SecurityWeights {
            slope: -0.01943184085478924,
            bias: 2.1166962549236393,
            minimal_lwe_dimension: LweDimension(450),
        },
    ),
    (
        192,
        SecurityWeights {
            slope: -0.017741889113022003,
            bias: 1.857578730208099,
            minimal_lwe_dimension: LweDimension(450),
        },
    ),
];

/// Returns the curve of `security_level`, if it is supported.
pub fn security_weights(security_level: SecurityLevel) -> Option<SecurityWeights> {
    SECURITY_WEIGHTS_TABLE
        .iter()
        .find(|(level, _)| *level == security_level.0)
        .map(|(_, weights)| *weights)
}

pub fn supported_security_levels() -> impl Iterator<Item = SecurityLevel> {
    SECURITY_WEIGHTS_TABLE
        .iter()
        .map(|(level, _)| SecurityLevel(*level))
}

impl SecurityWeights {
    /// Log2 of the minimal standard deviation on the torus.
    pub fn secure_log2_std(
        &self,
        lwe_dimension: LweDimension,
        ciphertext_modulus_log: CiphertextModulusLog,
    ) -> f64 {
        let epsilon_log2_std = 2.0 - ciphertext_modulus_log.0 as f64;
        if lwe_dimension < self.minimal_lwe_dimension {
            // No noise keeps such a small key secure: the noise covers the whole torus.
            return 0.0;
        }
        f64::max(
            self.slope * lwe_dimension.0 as f64 + self.bias,
            epsilon_log2_std,
        )
    }
}

/// Returns the minimal variance of an encryption under an LWE key of `lwe_dimension`.
pub fn minimal_variance_lwe(
    lwe_dimension: LweDimension,
    ciphertext_modulus_log: CiphertextModulusLog,
    security_level: SecurityLevel,
) -> Result<Variance, Error> {
    let weights = security_weights(security_level).ok_or_else(|| {
        Error::from(ErrorKind::InvalidParameters(format!(
            "unsupported security level {}, supported levels are {:?}",
            security_level.0,
            supported_security_levels()
                .map(|level| level.0)
                .collect::<Vec<_>>()
        )))
    })?;
    let std = StandardDev::from_log_standard_dev(
        weights.secure_log2_std(lwe_dimension, ciphertext_modulus_log),
    );
    Ok(Variance(std.get_variance()))
}

/// Returns the minimal variance of an encryption under a GLWE key, whose security is the one of
/// the equivalent LWE key.
pub fn minimal_variance_glwe(
    glwe_dimension: GlweDimension,
    polynomial_size: PolynomialSize,
    ciphertext_modulus_log: CiphertextModulusLog,
    security_level: SecurityLevel,
) -> Result<Variance, Error> {
    minimal_variance_lwe(
        glwe_dimension.to_equivalent_lwe_dimension(polynomial_size),
        ciphertext_modulus_log,
        security_level,
    )
}
