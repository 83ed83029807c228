//! Simulated bit extraction, circuit bootstrap and vertical packing.
//!
//! Ciphertexts are replaced by their noisy plaintexts: the phase a decryption would compute,
//! before any rounding. Every operation applies its effect on the plaintext and adds a gaussian
//! noise of the variance predicted for it, so that decoding errors happen with the probability
//! the real pipeline would exhibit.

use super::keys::{
    NoiseSimulationContext, NoiseSimulationGgsw, NoiseSimulationLweFourierBsk,
    NoiseSimulationLweKeyswitchKey, NoiseSimulationLwePackingKeyswitchKey,
};
use crate::commons::dispersion::{DispersionParameter, Variance};
use crate::commons::math::random::{ByteRandomGenerator, RandomGenerator};
use crate::commons::numeric::UnsignedTorus;
use crate::commons::parameters::{DecompositionBaseLog, DecompositionLevelCount, DeltaLog};
use crate::error::Error;

const CIPHERTEXT_N_BITS: usize = u64::BITS as usize;

fn add_gaussian_noise<G: ByteRandomGenerator>(
    value: u64,
    variance: Variance,
    generator: &mut RandomGenerator<G>,
) -> u64 {
    let (noise, _) = generator.random_gaussian(0.0, variance.get_standard_dev());
    value.wrapping_add(u64::from_torus(noise))
}

// Sign of the phase seen by a negacyclic blind rotation, after the q/4 centering shift.
fn bootstrapped_bit<G: ByteRandomGenerator>(
    value: u64,
    modulus_switch_variance: Variance,
    generator: &mut RandomGenerator<G>,
) -> u64 {
    let centered = value.wrapping_add(1 << (CIPHERTEXT_N_BITS - 2));
    add_gaussian_noise(centered, modulus_switch_variance, generator) >> (CIPHERTEXT_N_BITS - 1)
}

/// Simulates [`extract_bits`](crate::fft_impl::wop_pbs::extract_bits) on the noisy plaintext
/// `lwe_in`.
///
/// One bit is extracted per element of `lwe_list_out`, the most significant one being written at
/// index 0. `ksk` maps the key of `lwe_in` to the input key of `bsk`.
pub fn simulate_extract_bits<G: ByteRandomGenerator>(
    lwe_list_out: &mut [u64],
    lwe_in: u64,
    delta_log: DeltaLog,
    ksk: NoiseSimulationLweKeyswitchKey,
    bsk: NoiseSimulationLweFourierBsk,
    context: NoiseSimulationContext,
    generator: &mut RandomGenerator<G>,
) -> Result<(), Error> {
    let number_of_bits_to_extract = lwe_list_out.len();
    debug_assert!(CIPHERTEXT_N_BITS >= number_of_bits_to_extract + delta_log.0);

    let ks_variance = ksk.additive_variance(context)?;
    let ms_variance = bsk.modulus_switch_additive_variance(context);
    let pbs_variance = bsk.pbs_variance(context)?;

    let mut running = lwe_in;

    for (bit_idx, output) in lwe_list_out.iter_mut().rev().enumerate() {
        let shift = CIPHERTEXT_N_BITS - delta_log.0 - bit_idx - 1;
        let keyswitched = add_gaussian_noise(running << shift, ks_variance, generator);
        *output = keyswitched;

        if bit_idx == number_of_bits_to_extract - 1 {
            break;
        }

        let bit = bootstrapped_bit(keyswitched, ms_variance, generator);
        let extracted = add_gaussian_noise(bit << (delta_log.0 + bit_idx), pbs_variance, generator);
        running = running.wrapping_sub(extracted);
    }

    Ok(())
}

/// Simulates
/// [`circuit_bootstrap_boolean_vertical_packing`](crate::fft_impl::wop_pbs::circuit_bootstrap_boolean_vertical_packing).
///
/// Every input carries one bit in its most significant bit, the first input being the most
/// significant bit of the index in the lookup tables. `luts` holds `lwe_list_out.len()` tables of
/// equal size; entries past the end of a table read as zero.
pub fn simulate_circuit_bootstrap_boolean_vertical_packing<G: ByteRandomGenerator>(
    lwe_list_in: &[u64],
    lwe_list_out: &mut [u64],
    luts: &[u64],
    bsk: NoiseSimulationLweFourierBsk,
    level_cbs: DecompositionLevelCount,
    base_log_cbs: DecompositionBaseLog,
    pfpksk: NoiseSimulationLwePackingKeyswitchKey,
    context: NoiseSimulationContext,
    generator: &mut RandomGenerator<G>,
) -> Result<(), Error> {
    debug_assert!(!lwe_list_out.is_empty());
    debug_assert_eq!(luts.len() % lwe_list_out.len(), 0);

    let ms_variance = bsk.modulus_switch_additive_variance(context);
    let ggsw = NoiseSimulationGgsw {
        glwe_dimension: pfpksk.output_glwe_dimension,
        polynomial_size: pfpksk.output_polynomial_size,
        decomposition_base_log: base_log_cbs,
        decomposition_level_count: level_cbs,
        variance: Variance(bsk.pbs_variance(context)?.0 + pfpksk.additive_variance(context)?.0),
    };
    let output_variance = Variance(
        lwe_list_in.len() as f64 * ggsw.cmux_additive_variance(context).0,
    );

    let index = lwe_list_in.iter().fold(0usize, |index, &lwe_in| {
        // The circuit bootstrap reads the bit with delta = 2^63.
        let bit = bootstrapped_bit(lwe_in, ms_variance, generator);
        (index << 1) | bit as usize
    });

    let lut_size = luts.len() / lwe_list_out.len();
    for (lut, output) in luts.chunks_exact(lut_size).zip(lwe_list_out.iter_mut()) {
        let selected = lut.get(index).copied().unwrap_or(0);
        *output = add_gaussian_noise(selected, output_variance, generator);
    }

    Ok(())
}
