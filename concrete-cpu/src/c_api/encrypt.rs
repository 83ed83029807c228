use super::csprng::EncCsprng;
use super::utils::{as_variance, nounwind, Uint128};
use crate::algorithms::{
    decompress_seeded_lwe_ciphertext, decrypt_glwe_ciphertext, decrypt_lwe_ciphertext,
    encrypt_constant_ggsw_ciphertext, encrypt_lwe_ciphertext, encrypt_seeded_lwe_ciphertext,
};
use crate::commons::generators::new_seeder;
use crate::commons::math::random::CompressionSeed;
use crate::commons::parameters::{
    DecompositionBaseLog, DecompositionLevelCount, GlweDimension, LweDimension, PolynomialSize,
};
use crate::entities::*;

#[no_mangle]
pub extern "C" fn concrete_cpu_lwe_ciphertext_size_u64(lwe_dimension: usize) -> usize {
    lwe_ciphertext_size(LweDimension(lwe_dimension))
}

#[no_mangle]
pub extern "C" fn concrete_cpu_glwe_ciphertext_size_u64(
    glwe_dimension: usize,
    polynomial_size: usize,
) -> usize {
    glwe_ciphertext_size(
        GlweDimension(glwe_dimension).to_glwe_size(),
        PolynomialSize(polynomial_size),
    )
}

#[no_mangle]
pub extern "C" fn concrete_cpu_ggsw_ciphertext_size_u64(
    glwe_dimension: usize,
    polynomial_size: usize,
    decomposition_level_count: usize,
) -> usize {
    ggsw_ciphertext_size(
        GlweDimension(glwe_dimension).to_glwe_size(),
        PolynomialSize(polynomial_size),
        DecompositionLevelCount(decomposition_level_count),
    )
}

/// Encrypts the plaintext `input` under `lwe_sk`.
///
/// # Safety
///
/// `lwe_sk` must be valid for reads of `lwe_dimension` values, `lwe_out` for writes of
/// `lwe_dimension + 1` values. `csprng` must point to a live generator.
#[no_mangle]
pub unsafe extern "C" fn concrete_cpu_encrypt_lwe_ciphertext_u64(
    lwe_sk: *const u64,
    lwe_out: *mut u64,
    input: u64,
    lwe_dimension: usize,
    variance: f64,
    csprng: *mut EncCsprng,
) {
    nounwind(|| {
        let lwe_dimension = LweDimension(lwe_dimension);
        let lwe_sk = LweSecretKey::from_container(core::slice::from_raw_parts(
            lwe_sk,
            lwe_dimension.0,
        ));
        let mut lwe_out = LweCiphertext::from_container(core::slice::from_raw_parts_mut(
            lwe_out,
            lwe_ciphertext_size(lwe_dimension),
        ));

        encrypt_lwe_ciphertext(
            &lwe_sk,
            &mut lwe_out,
            Plaintext(input),
            as_variance(variance),
            &mut *csprng,
        );
    })
}

/// Encrypts the plaintext `input` under `lwe_sk`, writing the body alone to `seeded_lwe_out`.
///
/// The mask is drawn from a generator seeded by `compression_seed`, the noise from the entropy
/// source of the machine.
///
/// # Safety
///
/// `lwe_sk` must be valid for reads of `lwe_dimension` values, `seeded_lwe_out` for the write of
/// one value.
#[no_mangle]
pub unsafe extern "C" fn concrete_cpu_encrypt_seeded_lwe_ciphertext_u64(
    lwe_sk: *const u64,
    seeded_lwe_out: *mut u64,
    input: u64,
    lwe_dimension: usize,
    compression_seed: Uint128,
    variance: f64,
) {
    nounwind(|| {
        let lwe_dimension = LweDimension(lwe_dimension);
        let lwe_sk = LweSecretKey::from_container(core::slice::from_raw_parts(
            lwe_sk,
            lwe_dimension.0,
        ));
        let mut seeded_lwe = SeededLweCiphertext::new(
            lwe_dimension.to_lwe_size(),
            CompressionSeed {
                seed: compression_seed.into(),
            },
        );
        let mut seeder = new_seeder().unwrap();

        encrypt_seeded_lwe_ciphertext(
            &lwe_sk,
            &mut seeded_lwe,
            Plaintext(input),
            as_variance(variance),
            seeder.as_mut(),
        );
        *seeded_lwe_out = seeded_lwe.into_scalar();
    })
}

/// Regenerates the mask of a seeded LWE ciphertext.
///
/// # Safety
///
/// `seeded_lwe_in` must be valid for the read of one value, `lwe_out` for writes of
/// `lwe_dimension + 1` values.
#[no_mangle]
pub unsafe extern "C" fn concrete_cpu_decompress_seeded_lwe_ciphertext_u64(
    lwe_out: *mut u64,
    seeded_lwe_in: *const u64,
    lwe_dimension: usize,
    compression_seed: Uint128,
) {
    nounwind(|| {
        let lwe_dimension = LweDimension(lwe_dimension);
        let seeded_lwe = SeededLweCiphertext::from_scalar(
            *seeded_lwe_in,
            lwe_dimension.to_lwe_size(),
            CompressionSeed {
                seed: compression_seed.into(),
            },
        );
        let mut lwe_out = LweCiphertext::from_container(core::slice::from_raw_parts_mut(
            lwe_out,
            lwe_ciphertext_size(lwe_dimension),
        ));

        decompress_seeded_lwe_ciphertext(&mut lwe_out, &seeded_lwe);
    })
}

/// Writes the noisy plaintext of `lwe_ct_in` to `plaintext`.
///
/// # Safety
///
/// `lwe_sk` must be valid for reads of `lwe_dimension` values, `lwe_ct_in` for reads of
/// `lwe_dimension + 1` values, `plaintext` for the write of one value.
#[no_mangle]
pub unsafe extern "C" fn concrete_cpu_decrypt_lwe_ciphertext_u64(
    lwe_sk: *const u64,
    lwe_ct_in: *const u64,
    lwe_dimension: usize,
    plaintext: *mut u64,
) {
    nounwind(|| {
        let lwe_dimension = LweDimension(lwe_dimension);
        let lwe_sk = LweSecretKey::from_container(core::slice::from_raw_parts(
            lwe_sk,
            lwe_dimension.0,
        ));
        let lwe_ct_in = LweCiphertext::from_container(core::slice::from_raw_parts(
            lwe_ct_in,
            lwe_ciphertext_size(lwe_dimension),
        ));

        *plaintext = decrypt_lwe_ciphertext(&lwe_sk, &lwe_ct_in).0;
    })
}

/// Writes the `polynomial_size` noisy plaintexts of `glwe_ct_in` to `output`.
///
/// # Safety
///
/// `glwe_sk` must be valid for reads of `glwe_dimension * polynomial_size` values, `glwe_ct_in`
/// for reads of `(glwe_dimension + 1) * polynomial_size` values and `output` for writes of
/// `polynomial_size` values.
#[no_mangle]
pub unsafe extern "C" fn concrete_cpu_decrypt_glwe_ciphertext_u64(
    glwe_sk: *const u64,
    output: *mut u64,
    glwe_ct_in: *const u64,
    glwe_dimension: usize,
    polynomial_size: usize,
) {
    nounwind(|| {
        let glwe_dimension = GlweDimension(glwe_dimension);
        let polynomial_size = PolynomialSize(polynomial_size);

        let glwe_sk = GlweSecretKey::from_container(
            core::slice::from_raw_parts(glwe_sk, glwe_dimension.0 * polynomial_size.0),
            polynomial_size,
        );
        let glwe_ct_in = GlweCiphertext::from_container(
            core::slice::from_raw_parts(
                glwe_ct_in,
                glwe_ciphertext_size(glwe_dimension.to_glwe_size(), polynomial_size),
            ),
            polynomial_size,
        );
        let mut output =
            Polynomial::from_container(core::slice::from_raw_parts_mut(output, polynomial_size.0));

        decrypt_glwe_ciphertext(&glwe_sk, &glwe_ct_in, &mut output);
    })
}

/// Encrypts the constant `input` as a GGSW ciphertext under `glwe_sk`.
///
/// # Safety
///
/// `glwe_sk` must be valid for reads of `glwe_dimension * polynomial_size` values, `ggsw_out`
/// for writes of [`concrete_cpu_ggsw_ciphertext_size_u64`] values. `csprng` must point to a live
/// generator.
#[no_mangle]
pub unsafe extern "C" fn concrete_cpu_encrypt_ggsw_ciphertext_u64(
    glwe_sk: *const u64,
    ggsw_out: *mut u64,
    input: u64,
    glwe_dimension: usize,
    polynomial_size: usize,
    level: usize,
    base_log: usize,
    variance: f64,
    csprng: *mut EncCsprng,
) {
    nounwind(|| {
        let glwe_size = GlweDimension(glwe_dimension).to_glwe_size();
        let polynomial_size = PolynomialSize(polynomial_size);

        let glwe_sk = GlweSecretKey::from_container(
            core::slice::from_raw_parts(glwe_sk, glwe_dimension * polynomial_size.0),
            polynomial_size,
        );
        let mut ggsw_out = GgswCiphertext::from_container(
            core::slice::from_raw_parts_mut(
                ggsw_out,
                ggsw_ciphertext_size(glwe_size, polynomial_size, DecompositionLevelCount(level)),
            ),
            glwe_size,
            polynomial_size,
            DecompositionBaseLog(base_log),
        );

        encrypt_constant_ggsw_ciphertext(
            &glwe_sk,
            &mut ggsw_out,
            Cleartext(input),
            as_variance(variance),
            &mut *csprng,
        );
    })
}
