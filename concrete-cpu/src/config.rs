//! Engine configuration.
//!
//! A configuration gathers a full [`ParameterSet`] with the execution knobs of the engine. It is
//! usually loaded from a TOML file:
//!
//! ```toml
//! parallelism = "Rayon"
//! security_level = 128
//!
//! [parameters]
//! lwe_dimension = 600
//! glwe_dimension = 1
//! polynomial_size = 1024
//! lwe_noise = 0.00006
//! glwe_noise = 3.0e-16
//! pbs = { base_log = 15, level_count = 2 }
//! ks = { base_log = 3, level_count = 5 }
//! ```

use crate::commons::dispersion::{DispersionParameter, StandardDev};
use crate::commons::parameters::{
    CiphertextModulusLog, DecompositionBaseLog, DecompositionLevelCount, GlweDimension,
    LweDimension, Parallelism, PolynomialSize, SecurityLevel,
};
use crate::error::{Error, ErrorKind};
use crate::simulation::security::{minimal_variance_glwe, minimal_variance_lwe};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Base and number of levels of a gadget decomposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct DecompositionParameters {
    pub base_log: DecompositionBaseLog,
    pub level_count: DecompositionLevelCount,
}

/// The cryptographic parameters of a keyset.
///
/// `lwe_dimension` is the dimension of the small key, input of the bootstraps. The large key is
/// the GLWE key seen as an LWE key of dimension `glwe_dimension * polynomial_size`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct ParameterSet {
    pub lwe_dimension: LweDimension,
    pub glwe_dimension: GlweDimension,
    pub polynomial_size: PolynomialSize,
    /// Noise of the encryptions under the small key.
    pub lwe_noise: StandardDev,
    /// Noise of the encryptions under the GLWE key.
    pub glwe_noise: StandardDev,
    pub pbs: DecompositionParameters,
    pub ks: DecompositionParameters,
    /// Circuit bootstrap, only needed for the wop-PBS.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cbs: Option<DecompositionParameters>,
    /// Packing keyswitch of the circuit bootstrap.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pfpks: Option<DecompositionParameters>,
}

impl ParameterSet {
    pub fn big_lwe_dimension(&self) -> LweDimension {
        self.glwe_dimension
            .to_equivalent_lwe_dimension(self.polynomial_size)
    }

    /// Checks the parameters are usable by the engine.
    pub fn validate(&self) -> Result<(), Error> {
        let invalid = |msg: String| -> Result<(), Error> {
            Err(ErrorKind::InvalidParameters(msg).into())
        };

        if self.lwe_dimension.0 == 0 || self.glwe_dimension.0 == 0 {
            return invalid("dimensions must be positive".into());
        }
        if !self.polynomial_size.0.is_power_of_two() || self.polynomial_size.0 < 2 {
            return invalid(format!(
                "polynomial size {} is not a power of two",
                self.polynomial_size.0
            ));
        }

        let decompositions = [Some(self.pbs), Some(self.ks), self.cbs, self.pfpks];
        for decomposition in decompositions.into_iter().flatten() {
            let bits = decomposition.base_log.0 * decomposition.level_count.0;
            if decomposition.base_log.0 == 0 || decomposition.level_count.0 == 0 || bits > 64 {
                return invalid(format!(
                    "decomposition with base 2^{} over {} levels does not fit 64 bits",
                    decomposition.base_log.0, decomposition.level_count.0
                ));
            }
        }

        if self.cbs.is_some() != self.pfpks.is_some() {
            return invalid(
                "circuit bootstrap and packing keyswitch parameters go together".into(),
            );
        }

        Ok(())
    }

    /// Whether the noises of the keys reach the minimal secure noise of `security_level`.
    pub fn is_secure(&self, security_level: SecurityLevel) -> Result<bool, Error> {
        let modulus_log = CiphertextModulusLog(64);
        let lwe_min = minimal_variance_lwe(self.lwe_dimension, modulus_log, security_level)?;
        let glwe_min = minimal_variance_glwe(
            self.glwe_dimension,
            self.polynomial_size,
            modulus_log,
            security_level,
        )?;
        Ok(self.lwe_noise.get_variance() >= lwe_min.0
            && self.glwe_noise.get_variance() >= glwe_min.0)
    }
}

fn default_parallelism() -> Parallelism {
    Parallelism::Rayon
}

fn default_security_level() -> SecurityLevel {
    SecurityLevel(128)
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct EngineConfig {
    #[serde(default = "default_parallelism")]
    pub parallelism: Parallelism,
    #[serde(default = "default_security_level")]
    pub security_level: SecurityLevel,
    pub parameters: ParameterSet,
}

impl EngineConfig {
    pub fn new(parameters: ParameterSet) -> Self {
        Self {
            parallelism: default_parallelism(),
            security_level: default_security_level(),
            parameters,
        }
    }

    /// Reads and validates a configuration from a TOML file.
    #[tracing::instrument(level = "debug", skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_toml(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|err| Error::from(format!("Error: `{}`:: {err}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Parses and validates a configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, Error> {
        let config: Self = toml::from_str(content)
            .map_err(|err| ErrorKind::InvalidParameters(format!("Toml error: {err}")))?;
        config.parameters.validate()?;

        match config.parameters.is_secure(config.security_level) {
            Ok(true) => {}
            Ok(false) => tracing::warn!(
                security_level = config.security_level.0,
                "the noise of the parameter set is below the secure minimum"
            ),
            Err(err) => tracing::warn!("security of the parameter set not checked: {err}"),
        }
        tracing::debug!(?config, "loaded engine configuration");

        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, Error> {
        toml::to_string(self).map_err(|err| ErrorKind::Serialization(err.to_string()).into())
    }
}
