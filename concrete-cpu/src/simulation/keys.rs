//! Descriptions of the evaluation keys used by the simulated pipelines.
//!
//! A simulated key carries the parameters of the real key, and the noise of its encryptions is
//! the minimal secure noise of its output key for the requested security level.

use super::noise_formulas::{
    external_product_additive_variance, keyswitch_additive_variance,
    modulus_switch_additive_variance, packing_keyswitch_additive_variance, pbs_variance,
};
use super::security::{minimal_variance_glwe, minimal_variance_lwe};
use crate::commons::dispersion::Variance;
use crate::commons::parameters::{
    CiphertextModulusLog, DecompositionBaseLog, DecompositionLevelCount, GlweDimension,
    LweDimension, PolynomialSize, SecurityLevel,
};
use crate::error::Error;

/// The modulus of a simulated ciphertext, with the noise model of its key material.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NoiseSimulationContext {
    pub ciphertext_modulus_log: CiphertextModulusLog,
    pub security_level: SecurityLevel,
}

impl NoiseSimulationContext {
    pub fn new(ciphertext_modulus_log: CiphertextModulusLog, security_level: SecurityLevel) -> Self {
        Self {
            ciphertext_modulus_log,
            security_level,
        }
    }

    pub fn modulus_as_f64(&self) -> f64 {
        2.0f64.powi(self.ciphertext_modulus_log.0 as i32)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NoiseSimulationLweKeyswitchKey {
    pub input_lwe_dimension: LweDimension,
    pub output_lwe_dimension: LweDimension,
    pub decomposition_base_log: DecompositionBaseLog,
    pub decomposition_level_count: DecompositionLevelCount,
}

impl NoiseSimulationLweKeyswitchKey {
    pub fn additive_variance(&self, context: NoiseSimulationContext) -> Result<Variance, Error> {
        let ksk_variance = minimal_variance_lwe(
            self.output_lwe_dimension,
            context.ciphertext_modulus_log,
            context.security_level,
        )?;
        Ok(keyswitch_additive_variance(
            self.input_lwe_dimension,
            self.decomposition_base_log,
            self.decomposition_level_count,
            context.modulus_as_f64(),
            ksk_variance,
        ))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NoiseSimulationLweFourierBsk {
    pub input_lwe_dimension: LweDimension,
    pub glwe_dimension: GlweDimension,
    pub polynomial_size: PolynomialSize,
    pub decomposition_base_log: DecompositionBaseLog,
    pub decomposition_level_count: DecompositionLevelCount,
}

impl NoiseSimulationLweFourierBsk {
    /// Variance of the output of a bootstrap, independent of the input noise.
    pub fn pbs_variance(&self, context: NoiseSimulationContext) -> Result<Variance, Error> {
        let bsk_variance = minimal_variance_glwe(
            self.glwe_dimension,
            self.polynomial_size,
            context.ciphertext_modulus_log,
            context.security_level,
        )?;
        Ok(pbs_variance(
            self.input_lwe_dimension,
            self.glwe_dimension,
            self.polynomial_size,
            self.decomposition_base_log,
            self.decomposition_level_count,
            context.modulus_as_f64(),
            bsk_variance,
        ))
    }

    /// Variance added to the input by the switch to the modulus `2N` of the blind rotation.
    pub fn modulus_switch_additive_variance(&self, context: NoiseSimulationContext) -> Variance {
        modulus_switch_additive_variance(
            self.input_lwe_dimension,
            context.modulus_as_f64(),
            2.0 * self.polynomial_size.0 as f64,
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NoiseSimulationLwePackingKeyswitchKey {
    pub input_lwe_dimension: LweDimension,
    pub output_glwe_dimension: GlweDimension,
    pub output_polynomial_size: PolynomialSize,
    pub decomposition_base_log: DecompositionBaseLog,
    pub decomposition_level_count: DecompositionLevelCount,
}

impl NoiseSimulationLwePackingKeyswitchKey {
    pub fn additive_variance(&self, context: NoiseSimulationContext) -> Result<Variance, Error> {
        let pfpksk_variance = minimal_variance_glwe(
            self.output_glwe_dimension,
            self.output_polynomial_size,
            context.ciphertext_modulus_log,
            context.security_level,
        )?;
        Ok(packing_keyswitch_additive_variance(
            self.input_lwe_dimension,
            self.output_polynomial_size,
            self.decomposition_base_log,
            self.decomposition_level_count,
            context.modulus_as_f64(),
            pfpksk_variance,
        ))
    }
}

/// A GGSW ciphertext produced by a circuit bootstrap.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoiseSimulationGgsw {
    pub glwe_dimension: GlweDimension,
    pub polynomial_size: PolynomialSize,
    pub decomposition_base_log: DecompositionBaseLog,
    pub decomposition_level_count: DecompositionLevelCount,
    pub variance: Variance,
}

impl NoiseSimulationGgsw {
    pub fn cmux_additive_variance(&self, context: NoiseSimulationContext) -> Variance {
        external_product_additive_variance(
            self.glwe_dimension,
            self.polynomial_size,
            self.decomposition_base_log,
            self.decomposition_level_count,
            context.modulus_as_f64(),
            self.variance,
        )
    }
}
