//! Noise-only execution of the wop-PBS pipelines.
//!
//! The simulation skips every cryptographic computation: ciphertexts are represented by their
//! noisy plaintexts, and each operation adds the noise predicted by [`noise_formulas`] for the
//! minimal secure key noises given by [`security`]. It is used to estimate the failure
//! probability of a circuit without generating keys.

pub mod keys;
pub mod noise_formulas;
pub mod security;
pub mod wop_pbs;

pub use keys::{
    NoiseSimulationContext, NoiseSimulationGgsw, NoiseSimulationLweFourierBsk,
    NoiseSimulationLweKeyswitchKey, NoiseSimulationLwePackingKeyswitchKey,
};
pub use wop_pbs::{simulate_circuit_bootstrap_boolean_vertical_packing, simulate_extract_bits};
