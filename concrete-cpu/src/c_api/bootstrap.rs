use super::csprng::EncCsprng;
use super::fft::Fft;
use super::utils::{
    as_variance, debug_check_stack, nounwind, ok_or_log, stack_from_raw, write_scratch,
    ScratchStatus, Uint128,
};
use crate::algorithms::{
    decompress_seeded_lwe_bootstrap_key, generate_lwe_bootstrap_key,
    generate_seeded_lwe_bootstrap_key, par_decompress_seeded_lwe_bootstrap_key,
    par_generate_lwe_bootstrap_key, par_generate_seeded_lwe_bootstrap_key,
};
use crate::commons::generators::new_seeder;
use crate::commons::math::random::CompressionSeed;
use crate::commons::parameters::{
    DecompositionBaseLog, DecompositionLevelCount, GlweDimension, LweDimension, Parallelism,
    PolynomialSize,
};
use crate::entities::*;
use crate::fft_impl::bootstrap::{
    bootstrap_scratch, fourier_bootstrap_key_size, FourierLweBootstrapKey,
};
use crate::fft_impl::ggsw::fill_with_forward_fourier_scratch;
use tfhe_fft::c64;

#[no_mangle]
pub extern "C" fn concrete_cpu_bootstrap_key_size_u64(
    decomposition_level_count: usize,
    glwe_dimension: usize,
    polynomial_size: usize,
    input_lwe_dimension: usize,
) -> usize {
    lwe_bootstrap_key_size(
        LweDimension(input_lwe_dimension),
        GlweDimension(glwe_dimension).to_glwe_size(),
        PolynomialSize(polynomial_size),
        DecompositionLevelCount(decomposition_level_count),
    )
}

#[no_mangle]
pub extern "C" fn concrete_cpu_seeded_bootstrap_key_size_u64(
    decomposition_level_count: usize,
    glwe_dimension: usize,
    polynomial_size: usize,
    input_lwe_dimension: usize,
) -> usize {
    seeded_lwe_bootstrap_key_size(
        LweDimension(input_lwe_dimension),
        GlweDimension(glwe_dimension).to_glwe_size(),
        PolynomialSize(polynomial_size),
        DecompositionLevelCount(decomposition_level_count),
    )
}

/// Number of `c64` of a bootstrap key in the Fourier domain.
#[no_mangle]
pub extern "C" fn concrete_cpu_fourier_bootstrap_key_size_u64(
    decomposition_level_count: usize,
    glwe_dimension: usize,
    polynomial_size: usize,
    input_lwe_dimension: usize,
) -> usize {
    fourier_bootstrap_key_size(
        LweDimension(input_lwe_dimension),
        GlweDimension(glwe_dimension).to_glwe_size(),
        PolynomialSize(polynomial_size),
        DecompositionLevelCount(decomposition_level_count),
    )
}

/// # Safety
///
/// `input_lwe_sk` must be valid for reads of `input_lwe_dimension` values, `output_glwe_sk` for
/// reads of `output_glwe_dimension * output_polynomial_size` values and `lwe_bsk` for writes of
/// [`concrete_cpu_bootstrap_key_size_u64`] values. `csprng` must point to a live generator.
#[no_mangle]
pub unsafe extern "C" fn concrete_cpu_init_lwe_bootstrap_key_u64(
    lwe_bsk: *mut u64,
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
        let glwe_dimension = GlweDimension(output_glwe_dimension);
        let decomposition_level_count = DecompositionLevelCount(decomposition_level_count);

        let input_lwe_sk = LweSecretKey::from_container(core::slice::from_raw_parts(
            input_lwe_sk,
            input_lwe_dimension.0,
        ));
        let output_glwe_sk = GlweSecretKey::from_container(
            core::slice::from_raw_parts(output_glwe_sk, glwe_dimension.0 * polynomial_size.0),
            polynomial_size,
        );
        let mut lwe_bsk = LweBootstrapKey::from_container(
            core::slice::from_raw_parts_mut(
                lwe_bsk,
                lwe_bootstrap_key_size(
                    input_lwe_dimension,
                    glwe_dimension.to_glwe_size(),
                    polynomial_size,
                    decomposition_level_count,
                ),
            ),
            glwe_dimension.to_glwe_size(),
            polynomial_size,
            DecompositionBaseLog(decomposition_base_log),
            decomposition_level_count,
        );

        let variance = as_variance(variance);
        match parallelism {
            Parallelism::No => generate_lwe_bootstrap_key(
                &input_lwe_sk,
                &output_glwe_sk,
                &mut lwe_bsk,
                variance,
                &mut *csprng,
            ),
            Parallelism::Rayon => par_generate_lwe_bootstrap_key(
                &input_lwe_sk,
                &output_glwe_sk,
                &mut lwe_bsk,
                variance,
                &mut *csprng,
            ),
        }
    })
}

/// Fills the bodies of a seeded bootstrap key. The masks are derived from `compression_seed`, the
/// noises from the entropy source of the machine. Without an entropy source the error is logged
/// and `seeded_lwe_bsk` is left untouched.
///
/// # Safety
///
/// `input_lwe_sk` must be valid for reads of `input_lwe_dimension` values, `output_glwe_sk` for
/// reads of `output_glwe_dimension * output_polynomial_size` values and `seeded_lwe_bsk` for
/// writes of [`concrete_cpu_seeded_bootstrap_key_size_u64`] values.
#[no_mangle]
pub unsafe extern "C" fn concrete_cpu_init_seeded_lwe_bootstrap_key_u64(
    seeded_lwe_bsk: *mut u64,
    input_lwe_sk: *const u64,
    output_glwe_sk: *const u64,
    input_lwe_dimension: usize,
    output_polynomial_size: usize,
    output_glwe_dimension: usize,
    decomposition_level_count: usize,
    decomposition_base_log: usize,
    compression_seed: Uint128,
    variance: f64,
    parallelism: Parallelism,
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
        let mut seeded_lwe_bsk = SeededLweBootstrapKey::from_container(
            core::slice::from_raw_parts_mut(
                seeded_lwe_bsk,
                seeded_lwe_bootstrap_key_size(
                    input_lwe_dimension,
                    glwe_size,
                    polynomial_size,
                    decomposition_level_count,
                ),
            ),
            glwe_size,
            polynomial_size,
            DecompositionBaseLog(decomposition_base_log),
            decomposition_level_count,
            CompressionSeed {
                seed: compression_seed.into(),
            },
        );

        let variance = as_variance(variance);
        let Some(mut seeder) = ok_or_log(new_seeder(), "cannot create a seeder") else {
            return;
        };
        match parallelism {
            Parallelism::No => generate_seeded_lwe_bootstrap_key(
                &input_lwe_sk,
                &output_glwe_sk,
                &mut seeded_lwe_bsk,
                variance,
                seeder.as_mut(),
            ),
            Parallelism::Rayon => par_generate_seeded_lwe_bootstrap_key(
                &input_lwe_sk,
                &output_glwe_sk,
                &mut seeded_lwe_bsk,
                variance,
                seeder.as_mut(),
            ),
        }
    })
}

/// # Safety
///
/// `seeded_lwe_bsk` must be valid for reads of [`concrete_cpu_seeded_bootstrap_key_size_u64`]
/// values, `lwe_bsk` for writes of [`concrete_cpu_bootstrap_key_size_u64`] values.
#[no_mangle]
pub unsafe extern "C" fn concrete_cpu_decompress_seeded_lwe_bootstrap_key_u64(
    lwe_bsk: *mut u64,
    seeded_lwe_bsk: *const u64,
    input_lwe_dimension: usize,
    output_polynomial_size: usize,
    output_glwe_dimension: usize,
    decomposition_level_count: usize,
    decomposition_base_log: usize,
    compression_seed: Uint128,
    parallelism: Parallelism,
) {
    nounwind(|| {
        let input_lwe_dimension = LweDimension(input_lwe_dimension);
        let polynomial_size = PolynomialSize(output_polynomial_size);
        let glwe_size = GlweDimension(output_glwe_dimension).to_glwe_size();
        let decomposition_level_count = DecompositionLevelCount(decomposition_level_count);
        let decomposition_base_log = DecompositionBaseLog(decomposition_base_log);

        let seeded_lwe_bsk = SeededLweBootstrapKey::from_container(
            core::slice::from_raw_parts(
                seeded_lwe_bsk,
                seeded_lwe_bootstrap_key_size(
                    input_lwe_dimension,
                    glwe_size,
                    polynomial_size,
                    decomposition_level_count,
                ),
            ),
            glwe_size,
            polynomial_size,
            decomposition_base_log,
            decomposition_level_count,
            CompressionSeed {
                seed: compression_seed.into(),
            },
        );
        let mut lwe_bsk = LweBootstrapKey::from_container(
            core::slice::from_raw_parts_mut(
                lwe_bsk,
                lwe_bootstrap_key_size(
                    input_lwe_dimension,
                    glwe_size,
                    polynomial_size,
                    decomposition_level_count,
                ),
            ),
            glwe_size,
            polynomial_size,
            decomposition_base_log,
            decomposition_level_count,
        );

        match parallelism {
            Parallelism::No => decompress_seeded_lwe_bootstrap_key(&mut lwe_bsk, &seeded_lwe_bsk),
            Parallelism::Rayon => {
                par_decompress_seeded_lwe_bootstrap_key(&mut lwe_bsk, &seeded_lwe_bsk)
            }
        }
    })
}

/// # Safety
///
/// `stack_size` and `stack_align` must be valid for writes, `fft` must point to a live FFT.
#[no_mangle]
pub unsafe extern "C" fn concrete_cpu_bootstrap_key_convert_u64_to_fourier_scratch(
    stack_size: *mut usize,
    stack_align: *mut usize,
    fft: *const Fft,
) -> ScratchStatus {
    nounwind(|| {
        write_scratch(
            fill_with_forward_fourier_scratch((*fft).as_view()),
            stack_size,
            stack_align,
        )
    })
}

/// Converts a bootstrap key to the Fourier domain.
///
/// # Safety
///
/// `standard_bsk` must be valid for reads of [`concrete_cpu_bootstrap_key_size_u64`] values,
/// `fourier_bsk` for writes of [`concrete_cpu_fourier_bootstrap_key_size_u64`] values. `fft`
/// must be an FFT of size `polynomial_size` and `stack` a buffer of `stack_size` bytes fulfilling
/// [`concrete_cpu_bootstrap_key_convert_u64_to_fourier_scratch`].
#[no_mangle]
pub unsafe extern "C" fn concrete_cpu_bootstrap_key_convert_u64_to_fourier(
    standard_bsk: *const u64,
    fourier_bsk: *mut c64,
    decomposition_level_count: usize,
    decomposition_base_log: usize,
    glwe_dimension: usize,
    polynomial_size: usize,
    input_lwe_dimension: usize,
    fft: *const Fft,
    stack: *mut u8,
    stack_size: usize,
) {
    nounwind(|| {
        let fft = (*fft).as_view();
        debug_check_stack(|| fill_with_forward_fourier_scratch(fft), stack_size);

        let input_lwe_dimension = LweDimension(input_lwe_dimension);
        let glwe_size = GlweDimension(glwe_dimension).to_glwe_size();
        let polynomial_size = PolynomialSize(polynomial_size);
        let decomposition_level_count = DecompositionLevelCount(decomposition_level_count);
        let decomposition_base_log = DecompositionBaseLog(decomposition_base_log);

        let standard_bsk = LweBootstrapKey::from_container(
            core::slice::from_raw_parts(
                standard_bsk,
                lwe_bootstrap_key_size(
                    input_lwe_dimension,
                    glwe_size,
                    polynomial_size,
                    decomposition_level_count,
                ),
            ),
            glwe_size,
            polynomial_size,
            decomposition_base_log,
            decomposition_level_count,
        );
        let mut fourier_bsk = FourierLweBootstrapKey::from_container(
            core::slice::from_raw_parts_mut(
                fourier_bsk,
                fourier_bootstrap_key_size(
                    input_lwe_dimension,
                    glwe_size,
                    polynomial_size,
                    decomposition_level_count,
                ),
            ),
            input_lwe_dimension,
            glwe_size,
            polynomial_size,
            decomposition_base_log,
            decomposition_level_count,
        );

        fourier_bsk.as_mut_view().fill_with_forward_fourier(
            &standard_bsk,
            fft,
            stack_from_raw(stack, stack_size),
        );
    })
}

/// # Safety
///
/// `stack_size` and `stack_align` must be valid for writes, `fft` must point to a live FFT.
#[no_mangle]
pub unsafe extern "C" fn concrete_cpu_bootstrap_lwe_ciphertext_u64_scratch(
    stack_size: *mut usize,
    stack_align: *mut usize,
    glwe_dimension: usize,
    polynomial_size: usize,
    fft: *const Fft,
) -> ScratchStatus {
    nounwind(|| {
        write_scratch(
            bootstrap_scratch(
                GlweDimension(glwe_dimension).to_glwe_size(),
                PolynomialSize(polynomial_size),
                (*fft).as_view(),
            ),
            stack_size,
            stack_align,
        )
    })
}

/// Bootstraps `ct_in` through the look-up table `accumulator`. The output ciphertext is under the
/// GLWE key of the bootstrap key, seen as an LWE key of dimension
/// `glwe_dimension * polynomial_size`.
///
/// # Safety
///
/// `ct_in` must be valid for reads of `input_lwe_dimension + 1` values, `ct_out` for writes of
/// `glwe_dimension * polynomial_size + 1` values, `accumulator` for reads of
/// `(glwe_dimension + 1) * polynomial_size` values and `fourier_bsk` for reads of
/// [`concrete_cpu_fourier_bootstrap_key_size_u64`] values. `fft` must be an FFT of size
/// `polynomial_size` and `stack` a buffer of `stack_size` bytes fulfilling
/// [`concrete_cpu_bootstrap_lwe_ciphertext_u64_scratch`].
#[no_mangle]
pub unsafe extern "C" fn concrete_cpu_bootstrap_lwe_ciphertext_u64(
    ct_out: *mut u64,
    ct_in: *const u64,
    accumulator: *const u64,
    fourier_bsk: *const c64,
    decomposition_level_count: usize,
    decomposition_base_log: usize,
    glwe_dimension: usize,
    polynomial_size: usize,
    input_lwe_dimension: usize,
    fft: *const Fft,
    stack: *mut u8,
    stack_size: usize,
) {
    nounwind(|| {
        let fft = (*fft).as_view();
        let input_lwe_dimension = LweDimension(input_lwe_dimension);
        let glwe_size = GlweDimension(glwe_dimension).to_glwe_size();
        let polynomial_size = PolynomialSize(polynomial_size);
        let decomposition_level_count = DecompositionLevelCount(decomposition_level_count);
        debug_check_stack(
            || bootstrap_scratch(glwe_size, polynomial_size, fft),
            stack_size,
        );

        let output_lwe_dimension = LweDimension(glwe_dimension * polynomial_size.0);

        let fourier_bsk = FourierLweBootstrapKey::from_container(
            core::slice::from_raw_parts(
                fourier_bsk,
                fourier_bootstrap_key_size(
                    input_lwe_dimension,
                    glwe_size,
                    polynomial_size,
                    decomposition_level_count,
                ),
            ),
            input_lwe_dimension,
            glwe_size,
            polynomial_size,
            DecompositionBaseLog(decomposition_base_log),
            decomposition_level_count,
        );
        let ct_in = LweCiphertext::from_container(core::slice::from_raw_parts(
            ct_in,
            lwe_ciphertext_size(input_lwe_dimension),
        ));
        let mut ct_out = LweCiphertext::from_container(core::slice::from_raw_parts_mut(
            ct_out,
            lwe_ciphertext_size(output_lwe_dimension),
        ));
        let accumulator = GlweCiphertext::from_container(
            core::slice::from_raw_parts(
                accumulator,
                glwe_ciphertext_size(glwe_size, polynomial_size),
            ),
            polynomial_size,
        );

        fourier_bsk.bootstrap(
            ct_out.as_mut_view(),
            ct_in.as_view(),
            accumulator.as_view(),
            fft,
            stack_from_raw(stack, stack_size),
        );
    })
}
