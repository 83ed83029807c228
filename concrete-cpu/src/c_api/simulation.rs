use super::csprng::Csprng;
use super::utils::nounwind;
use crate::commons::parameters::{
    CiphertextModulusLog, DecompositionBaseLog, DecompositionLevelCount, DeltaLog, GlweDimension,
    LweDimension, PolynomialSize, SecurityLevel,
};
use crate::simulation::{
    simulate_circuit_bootstrap_boolean_vertical_packing, simulate_extract_bits,
    NoiseSimulationContext, NoiseSimulationLweFourierBsk, NoiseSimulationLweKeyswitchKey,
    NoiseSimulationLwePackingKeyswitchKey,
};

/// Simulates [`concrete_cpu_extract_bit_lwe_ciphertext_u64`] on the noisy plaintext `lwe_in`.
///
/// If `security_level` is not supported by the noise model, the error is logged and
/// `lwe_list_out` is left untouched.
///
/// [`concrete_cpu_extract_bit_lwe_ciphertext_u64`]:
/// super::wop_pbs::concrete_cpu_extract_bit_lwe_ciphertext_u64
///
/// # Safety
///
/// `lwe_list_out` must be valid for writes of `number_of_bits_to_extract` values, `csprng` must
/// point to a live generator.
#[no_mangle]
pub unsafe extern "C" fn simulation_extract_bit_lwe_ciphertext_u64(
    lwe_list_out: *mut u64,
    lwe_in: u64,
    delta_log: usize,
    number_of_bits_to_extract: usize,
    log_poly_size: u64,
    glwe_dimension: u64,
    lwe_dimension: u64,
    ks_log_base: u64,
    ks_level: u64,
    br_log_base: u64,
    br_level: u64,
    ciphertext_modulus_log: u32,
    security_level: u64,
    csprng: *mut Csprng,
) {
    nounwind(|| {
        let polynomial_size = PolynomialSize(1 << log_poly_size);
        let glwe_dimension = GlweDimension(glwe_dimension as usize);
        let lwe_dimension = LweDimension(lwe_dimension as usize);

        let ksk = NoiseSimulationLweKeyswitchKey {
            input_lwe_dimension: glwe_dimension.to_equivalent_lwe_dimension(polynomial_size),
            output_lwe_dimension: lwe_dimension,
            decomposition_base_log: DecompositionBaseLog(ks_log_base as usize),
            decomposition_level_count: DecompositionLevelCount(ks_level as usize),
        };
        let bsk = NoiseSimulationLweFourierBsk {
            input_lwe_dimension: lwe_dimension,
            glwe_dimension,
            polynomial_size,
            decomposition_base_log: DecompositionBaseLog(br_log_base as usize),
            decomposition_level_count: DecompositionLevelCount(br_level as usize),
        };
        let context = NoiseSimulationContext::new(
            CiphertextModulusLog(ciphertext_modulus_log as usize),
            SecurityLevel(security_level),
        );

        let result = simulate_extract_bits(
            core::slice::from_raw_parts_mut(lwe_list_out, number_of_bits_to_extract),
            lwe_in,
            DeltaLog(delta_log),
            ksk,
            bsk,
            context,
            &mut *csprng,
        );
        if let Err(err) = result {
            tracing::error!("cannot simulate bit extraction: {err}");
        }
    })
}

/// Simulates
/// [`concrete_cpu_circuit_bootstrap_boolean_vertical_packing_lwe_ciphertext_u64`] on noisy
/// plaintexts.
///
/// If `security_level` is not supported by the noise model, the error is logged and
/// `lwe_list_out` is left untouched.
///
/// [`concrete_cpu_circuit_bootstrap_boolean_vertical_packing_lwe_ciphertext_u64`]:
/// super::wop_pbs::concrete_cpu_circuit_bootstrap_boolean_vertical_packing_lwe_ciphertext_u64
///
/// # Safety
///
/// `lwe_list_in` must be valid for reads of `ct_in_count` values, `lwe_list_out` for writes of
/// `ct_out_count` values and `luts` for reads of `lut_size * lut_count` values. `csprng` must
/// point to a live generator.
#[no_mangle]
pub unsafe extern "C" fn simulation_circuit_bootstrap_boolean_vertical_packing_lwe_ciphertext_u64(
    lwe_list_in: *const u64,
    lwe_list_out: *mut u64,
    ct_in_count: usize,
    ct_out_count: usize,
    lut_size: usize,
    lut_count: usize,
    luts: *const u64,
    glwe_dimension: u64,
    log_poly_size: u64,
    lwe_dimension: u64,
    pbs_level: u64,
    pbs_log_base: u64,
    cb_level: u64,
    cb_log_base: u64,
    pp_level: u64,
    pp_log_base: u64,
    ciphertext_modulus_log: u32,
    security_level: u64,
    csprng: *mut Csprng,
) {
    nounwind(|| {
        debug_assert_eq!(ct_out_count, lut_count);

        let polynomial_size = PolynomialSize(1 << log_poly_size);
        let glwe_dimension = GlweDimension(glwe_dimension as usize);

        let bsk = NoiseSimulationLweFourierBsk {
            input_lwe_dimension: LweDimension(lwe_dimension as usize),
            glwe_dimension,
            polynomial_size,
            decomposition_base_log: DecompositionBaseLog(pbs_log_base as usize),
            decomposition_level_count: DecompositionLevelCount(pbs_level as usize),
        };
        let pfpksk = NoiseSimulationLwePackingKeyswitchKey {
            input_lwe_dimension: glwe_dimension.to_equivalent_lwe_dimension(polynomial_size),
            output_glwe_dimension: glwe_dimension,
            output_polynomial_size: polynomial_size,
            decomposition_base_log: DecompositionBaseLog(pp_log_base as usize),
            decomposition_level_count: DecompositionLevelCount(pp_level as usize),
        };
        let context = NoiseSimulationContext::new(
            CiphertextModulusLog(ciphertext_modulus_log as usize),
            SecurityLevel(security_level),
        );

        let result = simulate_circuit_bootstrap_boolean_vertical_packing(
            core::slice::from_raw_parts(lwe_list_in, ct_in_count),
            core::slice::from_raw_parts_mut(lwe_list_out, ct_out_count),
            core::slice::from_raw_parts(luts, lut_size * lut_count),
            bsk,
            DecompositionLevelCount(cb_level as usize),
            DecompositionBaseLog(cb_log_base as usize),
            pfpksk,
            context,
            &mut *csprng,
        );
        if let Err(err) = result {
            tracing::error!("cannot simulate circuit bootstrap and vertical packing: {err}");
        }
    })
}
