use super::csprng::EncCsprng;
use super::fft::Fft;
use super::utils::{
    as_variance, debug_check_stack, nounwind, stack_from_raw, write_scratch, ScratchStatus,
};
use crate::algorithms::{
    generate_circuit_bootstrap_lwe_pfpksk_list, par_generate_circuit_bootstrap_lwe_pfpksk_list,
};
use crate::commons::parameters::{
    DecompositionBaseLog, DecompositionLevelCount, DeltaLog, ExtractedBitsCount, GlweDimension,
    LweCiphertextCount, LweDimension, Parallelism, PolynomialCount, PolynomialSize,
};
use crate::entities::*;
use crate::fft_impl::bootstrap::{fourier_bootstrap_key_size, FourierLweBootstrapKey};
use crate::fft_impl::wop_pbs::{
    circuit_bootstrap_boolean_vertical_packing,
    circuit_bootstrap_boolean_vertical_packing_scratch, extract_bits, extract_bits_scratch,
    lut_polynomial_count,
};
use tfhe_fft::c64;

/// Number of `u64` of one private functional packing keyswitch key. Circuit bootstrapping needs
/// `output_glwe_dimension + 1` of them.
#[no_mangle]
pub extern "C" fn concrete_cpu_lwe_packing_keyswitch_key_size(
    output_glwe_dimension: usize,
    polynomial_size: usize,
    decomposition_level_count: usize,
    input_lwe_dimension: usize,
) -> usize {
    lwe_pfpksk_size(
        LweDimension(input_lwe_dimension),
        DecompositionLevelCount(decomposition_level_count),
        GlweDimension(output_glwe_dimension).to_glwe_size(),
        PolynomialSize(polynomial_size),
    )
}

/// Generates the `output_glwe_dimension + 1` packing keys of circuit bootstrapping, back to back
/// in `lwe_pksk`.
///
/// # Safety
///
/// `input_lwe_sk` must be valid for reads of `input_lwe_dimension` values, `output_glwe_sk` for
/// reads of `output_glwe_dimension * output_polynomial_size` values and `lwe_pksk` for writes of
/// `output_glwe_dimension + 1` times [`concrete_cpu_lwe_packing_keyswitch_key_size`] values.
/// `csprng` must point to a live generator.
#[no_mangle]
pub unsafe extern "C" fn concrete_cpu_init_lwe_circuit_bootstrap_private_functional_packing_keyswitch_keys_u64(
    lwe_pksk: *mut u64,
    input_lwe_sk: *const u64,
    output_glwe_sk: *const u64,
    input_lwe_dimension: usize,
    output_polynomial_size: usize,
    output_glwe_dimension: usize,
    decomposition_level_count: usize,
    decomposition_base_log: usize,
    variance: f64,
    parallelism: Parallelism,
    csprng: *mut EncCsprng,
) {
    nounwind(|| {
        let input_lwe_dimension = LweDimension(input_lwe_dimension);
        let polynomial_size = PolynomialSize(output_polynomial_size);
        let glwe_size = GlweDimension(output_glwe_dimension).to_glwe_size();
        let decomposition_level_count = DecompositionLevelCount(decomposition_level_count);

        let input_lwe_sk = LweSecretKey::from_container(core::slice::from_raw_parts(
            input_lwe_sk,
            input_lwe_dimension.0,
        ));
        let output_glwe_sk = GlweSecretKey::from_container(
            core::slice::from_raw_parts(output_glwe_sk, output_glwe_dimension * polynomial_size.0),
            polynomial_size,
        );
        let mut lwe_pksk = LwePrivateFunctionalPackingKeyswitchKeyList::from_container(
            core::slice::from_raw_parts_mut(
                lwe_pksk,
                glwe_size.0
                    * lwe_pfpksk_size(
                        input_lwe_dimension,
                        decomposition_level_count,
                        glwe_size,
                        polynomial_size,
                    ),
            ),
            DecompositionBaseLog(decomposition_base_log),
            decomposition_level_count,
            input_lwe_dimension,
            glwe_size,
            polynomial_size,
        );

        let variance = as_variance(variance);
        match parallelism {
            Parallelism::No => generate_circuit_bootstrap_lwe_pfpksk_list(
                &mut lwe_pksk,
                &input_lwe_sk,
                &output_glwe_sk,
                variance,
                &mut *csprng,
            ),
            Parallelism::Rayon => par_generate_circuit_bootstrap_lwe_pfpksk_list(
                &mut lwe_pksk,
                &input_lwe_sk,
                &output_glwe_sk,
                variance,
                &mut *csprng,
            ),
        }
    })
}

/// # Safety
///
/// `stack_size` and `stack_align` must be valid for writes, `fft` must point to a live FFT.
#[no_mangle]
pub unsafe extern "C" fn concrete_cpu_extract_bit_lwe_ciphertext_u64_scratch(
    stack_size: *mut usize,
    stack_align: *mut usize,
    ct_out_dimension: usize,
    ct_in_dimension: usize,
    bsk_glwe_dimension: usize,
    bsk_polynomial_size: usize,
    fft: *const Fft,
) -> ScratchStatus {
    nounwind(|| {
        write_scratch(
            extract_bits_scratch(
                LweDimension(ct_in_dimension),
                LweDimension(ct_out_dimension).to_lwe_size(),
                GlweDimension(bsk_glwe_dimension).to_glwe_size(),
                PolynomialSize(bsk_polynomial_size),
                (*fft).as_view(),
            ),
            stack_size,
            stack_align,
        )
    })
}

/// Extracts `number_of_bits` bits of the message of `ct_in`, starting at bit `delta_log`. The
/// most significant extracted bit is written first.
///
/// `ct_in` is under the large key (the input key of `ksk`), the outputs are under the small key
/// (the output key of `ksk` and input key of `fourier_bsk`).
///
/// # Safety
///
/// `ct_in` must be valid for reads of `ct_in_dimension + 1` values and `ct_vec_out` for writes of
/// `ct_out_count * (ct_out_dimension + 1)` values. The keys must be valid for reads of their
/// size. `fft` must be an FFT of size `bsk_polynomial_size` and `stack` a buffer of `stack_size`
/// bytes fulfilling [`concrete_cpu_extract_bit_lwe_ciphertext_u64_scratch`].
#[no_mangle]
pub unsafe extern "C" fn concrete_cpu_extract_bit_lwe_ciphertext_u64(
    ct_vec_out: *mut u64,
    ct_in: *const u64,
    fourier_bsk: *const c64,
    ksk: *const u64,
    ct_out_dimension: usize,
    ct_out_count: usize,
    ct_in_dimension: usize,
    number_of_bits: usize,
    delta_log: usize,
    bsk_decomposition_level_count: usize,
    bsk_decomposition_base_log: usize,
    bsk_glwe_dimension: usize,
    bsk_polynomial_size: usize,
    bsk_input_lwe_dimension: usize,
    ksk_decomposition_level_count: usize,
    ksk_decomposition_base_log: usize,
    ksk_input_dimension: usize,
    ksk_output_dimension: usize,
    fft: *const Fft,
    stack: *mut u8,
    stack_size: usize,
) {
    nounwind(|| {
        debug_assert_eq!(ct_out_count, number_of_bits);
        debug_assert_eq!(ct_in_dimension, ksk_input_dimension);
        debug_assert_eq!(ct_out_dimension, ksk_output_dimension);
        debug_assert_eq!(ksk_output_dimension, bsk_input_lwe_dimension);
        debug_assert_eq!(ksk_input_dimension, bsk_glwe_dimension * bsk_polynomial_size);

        let fft = (*fft).as_view();
        let ct_in_dimension = LweDimension(ct_in_dimension);
        let ct_out_dimension = LweDimension(ct_out_dimension);
        let bsk_glwe_size = GlweDimension(bsk_glwe_dimension).to_glwe_size();
        let bsk_polynomial_size = PolynomialSize(bsk_polynomial_size);
        let bsk_input_lwe_dimension = LweDimension(bsk_input_lwe_dimension);
        let bsk_decomposition_level_count = DecompositionLevelCount(bsk_decomposition_level_count);
        let ksk_decomposition_level_count = DecompositionLevelCount(ksk_decomposition_level_count);
        let ksk_input_dimension = LweDimension(ksk_input_dimension);
        let ksk_output_dimension = LweDimension(ksk_output_dimension);

        debug_check_stack(
            || {
                extract_bits_scratch(
                    ct_in_dimension,
                    ct_out_dimension.to_lwe_size(),
                    bsk_glwe_size,
                    bsk_polynomial_size,
                    fft,
                )
            },
            stack_size,
        );

        let lwe_list_out = LweCiphertextList::from_container(
            core::slice::from_raw_parts_mut(
                ct_vec_out,
                ct_out_count * lwe_ciphertext_size(ct_out_dimension),
            ),
            ct_out_dimension.to_lwe_size(),
        );
        let lwe_in = LweCiphertext::from_container(core::slice::from_raw_parts(
            ct_in,
            lwe_ciphertext_size(ct_in_dimension),
        ));
        let ksk = LweKeyswitchKey::from_container(
            core::slice::from_raw_parts(
                ksk,
                lwe_keyswitch_key_size(
                    ksk_decomposition_level_count,
                    ksk_input_dimension,
                    ksk_output_dimension,
                ),
            ),
            DecompositionBaseLog(ksk_decomposition_base_log),
            ksk_decomposition_level_count,
            ksk_output_dimension.to_lwe_size(),
        );
        let fourier_bsk = FourierLweBootstrapKey::from_container(
            core::slice::from_raw_parts(
                fourier_bsk,
                fourier_bootstrap_key_size(
                    bsk_input_lwe_dimension,
                    bsk_glwe_size,
                    bsk_polynomial_size,
                    bsk_decomposition_level_count,
                ),
            ),
            bsk_input_lwe_dimension,
            bsk_glwe_size,
            bsk_polynomial_size,
            DecompositionBaseLog(bsk_decomposition_base_log),
            bsk_decomposition_level_count,
        );

        extract_bits(
            lwe_list_out,
            lwe_in.as_view(),
            ksk.as_view(),
            fourier_bsk,
            DeltaLog(delta_log),
            ExtractedBitsCount(number_of_bits),
            fft,
            stack_from_raw(stack, stack_size),
        );
    })
}

/// # Safety
///
/// `stack_size` and `stack_align` must be valid for writes, `fft` must point to a live FFT.
#[no_mangle]
pub unsafe extern "C" fn concrete_cpu_circuit_bootstrap_boolean_vertical_packing_lwe_ciphertext_u64_scratch(
    stack_size: *mut usize,
    stack_align: *mut usize,
    ct_out_count: usize,
    ct_in_dimension: usize,
    ct_in_count: usize,
    lut_size: usize,
    lut_count: usize,
    bsk_glwe_dimension: usize,
    bsk_polynomial_size: usize,
    fpksk_output_polynomial_size: usize,
    cbs_decomposition_level_count: usize,
    fft: *const Fft,
) -> ScratchStatus {
    nounwind(|| {
        write_scratch(
            cbs_vp_scratch(
                ct_out_count,
                ct_in_dimension,
                ct_in_count,
                lut_size,
                lut_count,
                bsk_glwe_dimension,
                bsk_polynomial_size,
                fpksk_output_polynomial_size,
                cbs_decomposition_level_count,
                &*fft,
            ),
            stack_size,
            stack_align,
        )
    })
}

fn cbs_vp_scratch(
    ct_out_count: usize,
    ct_in_dimension: usize,
    ct_in_count: usize,
    lut_size: usize,
    lut_count: usize,
    bsk_glwe_dimension: usize,
    bsk_polynomial_size: usize,
    fpksk_output_polynomial_size: usize,
    cbs_decomposition_level_count: usize,
    fft: &Fft,
) -> Result<dyn_stack::StackReq, dyn_stack::SizeOverflow> {
    debug_assert_eq!(ct_out_count, lut_count);
    let fpksk_output_polynomial_size = PolynomialSize(fpksk_output_polynomial_size);

    circuit_bootstrap_boolean_vertical_packing_scratch(
        LweCiphertextCount(ct_in_count),
        LweCiphertextCount(ct_out_count),
        LweDimension(ct_in_dimension).to_lwe_size(),
        PolynomialCount(
            lut_polynomial_count(lut_size, fpksk_output_polynomial_size).0 * lut_count,
        ),
        LweDimension(bsk_glwe_dimension * bsk_polynomial_size).to_lwe_size(),
        GlweDimension(bsk_glwe_dimension).to_glwe_size(),
        fpksk_output_polynomial_size,
        DecompositionLevelCount(cbs_decomposition_level_count),
        fft.as_view(),
    )
}

/// Circuit bootstraps the `ct_in_count` input bits, the first one being the most significant bit
/// of the index, and looks them up in the `lut_count` tables of `lut_size` entries stored back to
/// back in `lut`. Output `i` is the lookup in table `i`.
///
/// # Safety
///
/// `ct_in_vec` must be valid for reads of `ct_in_count * (ct_in_dimension + 1)` values,
/// `ct_out_vec` for writes of `ct_out_count * (ct_out_dimension + 1)` values and `lut` for reads
/// of `lut_size * lut_count` values. The keys must be valid for reads of their size, the packing
/// keys holding `fpksk_output_glwe_dimension + 1` keys. `fft` must be an FFT of size
/// `bsk_polynomial_size` and `stack` a buffer of `stack_size` bytes fulfilling
/// [`concrete_cpu_circuit_bootstrap_boolean_vertical_packing_lwe_ciphertext_u64_scratch`].
#[no_mangle]
pub unsafe extern "C" fn concrete_cpu_circuit_bootstrap_boolean_vertical_packing_lwe_ciphertext_u64(
    ct_out_vec: *mut u64,
    ct_in_vec: *const u64,
    lut: *const u64,
    fourier_bsk: *const c64,
    fpksk: *const u64,
    ct_out_dimension: usize,
    ct_out_count: usize,
    ct_in_dimension: usize,
    ct_in_count: usize,
    lut_size: usize,
    lut_count: usize,
    bsk_decomposition_level_count: usize,
    bsk_decomposition_base_log: usize,
    bsk_glwe_dimension: usize,
    bsk_polynomial_size: usize,
    bsk_input_lwe_dimension: usize,
    fpksk_decomposition_level_count: usize,
    fpksk_decomposition_base_log: usize,
    fpksk_input_dimension: usize,
    fpksk_output_glwe_dimension: usize,
    fpksk_output_polynomial_size: usize,
    _fpksk_count: usize,
    cbs_decomposition_level_count: usize,
    cbs_decomposition_base_log: usize,
    fft: *const Fft,
    stack: *mut u8,
    stack_size: usize,
) {
    nounwind(|| {
        debug_assert_eq!(ct_out_count, lut_count);
        debug_assert_eq!(ct_out_dimension, bsk_glwe_dimension * bsk_polynomial_size);
        debug_assert_eq!(ct_in_dimension, bsk_input_lwe_dimension);
        debug_assert_eq!(fpksk_input_dimension, ct_out_dimension);

        debug_check_stack(
            || {
                cbs_vp_scratch(
                    ct_out_count,
                    ct_in_dimension,
                    ct_in_count,
                    lut_size,
                    lut_count,
                    bsk_glwe_dimension,
                    bsk_polynomial_size,
                    fpksk_output_polynomial_size,
                    cbs_decomposition_level_count,
                    &*fft,
                )
            },
            stack_size,
        );

        let fft = (*fft).as_view();
        let ct_out_dimension = LweDimension(ct_out_dimension);
        let ct_in_dimension = LweDimension(ct_in_dimension);
        let bsk_glwe_size = GlweDimension(bsk_glwe_dimension).to_glwe_size();
        let bsk_polynomial_size = PolynomialSize(bsk_polynomial_size);
        let bsk_input_lwe_dimension = LweDimension(bsk_input_lwe_dimension);
        let bsk_decomposition_level_count = DecompositionLevelCount(bsk_decomposition_level_count);
        let fpksk_decomposition_level_count =
            DecompositionLevelCount(fpksk_decomposition_level_count);
        let fpksk_input_dimension = LweDimension(fpksk_input_dimension);
        let fpksk_output_glwe_size = GlweDimension(fpksk_output_glwe_dimension).to_glwe_size();
        let fpksk_output_polynomial_size = PolynomialSize(fpksk_output_polynomial_size);

        let mut lwe_list_out = LweCiphertextList::from_container(
            core::slice::from_raw_parts_mut(
                ct_out_vec,
                ct_out_count * lwe_ciphertext_size(ct_out_dimension),
            ),
            ct_out_dimension.to_lwe_size(),
        );
        let lwe_list_in = LweCiphertextList::from_container(
            core::slice::from_raw_parts(ct_in_vec, ct_in_count * lwe_ciphertext_size(ct_in_dimension)),
            ct_in_dimension.to_lwe_size(),
        );
        let big_lut = core::slice::from_raw_parts(lut, lut_size * lut_count);
        let fourier_bsk = FourierLweBootstrapKey::from_container(
            core::slice::from_raw_parts(
                fourier_bsk,
                fourier_bootstrap_key_size(
                    bsk_input_lwe_dimension,
                    bsk_glwe_size,
                    bsk_polynomial_size,
                    bsk_decomposition_level_count,
                ),
            ),
            bsk_input_lwe_dimension,
            bsk_glwe_size,
            bsk_polynomial_size,
            DecompositionBaseLog(bsk_decomposition_base_log),
            bsk_decomposition_level_count,
        );
        let pfpksk_list = LwePrivateFunctionalPackingKeyswitchKeyList::from_container(
            core::slice::from_raw_parts(
                fpksk,
                fpksk_output_glwe_size.0
                    * lwe_pfpksk_size(
                        fpksk_input_dimension,
                        fpksk_decomposition_level_count,
                        fpksk_output_glwe_size,
                        fpksk_output_polynomial_size,
                    ),
            ),
            DecompositionBaseLog(fpksk_decomposition_base_log),
            fpksk_decomposition_level_count,
            fpksk_input_dimension,
            fpksk_output_glwe_size,
            fpksk_output_polynomial_size,
        );

        circuit_bootstrap_boolean_vertical_packing(
            big_lut,
            fourier_bsk,
            lwe_list_out.as_mut_view(),
            lwe_list_in.as_view(),
            pfpksk_list.as_view(),
            DecompositionLevelCount(cbs_decomposition_level_count),
            DecompositionBaseLog(cbs_decomposition_base_log),
            fft,
            stack_from_raw(stack, stack_size),
        );
    })
}
