use super::csprng::EncCsprng;
use super::utils::{as_variance, nounwind, ok_or_log, Uint128};
use crate::algorithms::{
    decompress_seeded_lwe_keyswitch_key, generate_lwe_keyswitch_key,
    generate_seeded_lwe_keyswitch_key, keyswitch_lwe_ciphertext,
    par_decompress_seeded_lwe_keyswitch_key,
};
use crate::commons::generators::new_seeder;
use crate::commons::math::random::CompressionSeed;
use crate::commons::parameters::{
    DecompositionBaseLog, DecompositionLevelCount, LweDimension, Parallelism,
};
use crate::entities::*;

#[no_mangle]
pub extern "C" fn concrete_cpu_keyswitch_key_size_u64(
    decomposition_level_count: usize,
    input_dimension: usize,
    output_dimension: usize,
) -> usize {
    lwe_keyswitch_key_size(
        DecompositionLevelCount(decomposition_level_count),
        LweDimension(input_dimension),
        LweDimension(output_dimension),
    )
}

/// Only the bodies of a seeded key are stored, one per input coefficient and level.
#[no_mangle]
pub extern "C" fn concrete_cpu_seeded_keyswitch_key_size_u64(
    decomposition_level_count: usize,
    input_dimension: usize,
) -> usize {
    seeded_lwe_keyswitch_key_size(
        DecompositionLevelCount(decomposition_level_count),
        LweDimension(input_dimension),
    )
}

/// # Safety
///
/// `input_lwe_sk` and `output_lwe_sk` must be valid for reads of their dimension, `lwe_ksk` for
/// writes of [`concrete_cpu_keyswitch_key_size_u64`] values. `csprng` must point to a live
/// generator.
#[no_mangle]
pub unsafe extern "C" fn concrete_cpu_init_lwe_keyswitch_key_u64(
    lwe_ksk: *mut u64,
    input_lwe_sk: *const u64,
    output_lwe_sk: *const u64,
    input_lwe_dimension: usize,
    output_lwe_dimension: usize,
    decomposition_level_count: usize,
    decomposition_base_log: usize,
    variance: f64,
    csprng: *mut EncCsprng,
) {
    nounwind(|| {
        let input_lwe_dimension = LweDimension(input_lwe_dimension);
        let output_lwe_dimension = LweDimension(output_lwe_dimension);
        let decomposition_level_count = DecompositionLevelCount(decomposition_level_count);

        let input_lwe_sk = LweSecretKey::from_container(core::slice::from_raw_parts(
            input_lwe_sk,
            input_lwe_dimension.0,
        ));
        let output_lwe_sk = LweSecretKey::from_container(core::slice::from_raw_parts(
            output_lwe_sk,
            output_lwe_dimension.0,
        ));
        let mut lwe_ksk = LweKeyswitchKey::from_container(
            core::slice::from_raw_parts_mut(
                lwe_ksk,
                lwe_keyswitch_key_size(
                    decomposition_level_count,
                    input_lwe_dimension,
                    output_lwe_dimension,
                ),
            ),
            DecompositionBaseLog(decomposition_base_log),
            decomposition_level_count,
            output_lwe_dimension.to_lwe_size(),
        );

        generate_lwe_keyswitch_key(
            &input_lwe_sk,
            &output_lwe_sk,
            &mut lwe_ksk,
            as_variance(variance),
            &mut *csprng,
        );
    })
}

/// Fills the bodies of a seeded keyswitch key. The masks are derived from `compression_seed`.
/// Without an entropy source the error is logged and `seeded_lwe_ksk` is left untouched.
///
/// # Safety
///
/// `input_lwe_sk` and `output_lwe_sk` must be valid for reads of their dimension,
/// `seeded_lwe_ksk` for writes of [`concrete_cpu_seeded_keyswitch_key_size_u64`] values.
#[no_mangle]
pub unsafe extern "C" fn concrete_cpu_init_seeded_lwe_keyswitch_key_u64(
    seeded_lwe_ksk: *mut u64,
    input_lwe_sk: *const u64,
    output_lwe_sk: *const u64,
    input_lwe_dimension: usize,
    output_lwe_dimension: usize,
    decomposition_level_count: usize,
    decomposition_base_log: usize,
    compression_seed: Uint128,
    variance: f64,
) {
    nounwind(|| {
        let input_lwe_dimension = LweDimension(input_lwe_dimension);
        let output_lwe_dimension = LweDimension(output_lwe_dimension);
        let decomposition_level_count = DecompositionLevelCount(decomposition_level_count);

        let input_lwe_sk = LweSecretKey::from_container(core::slice::from_raw_parts(
            input_lwe_sk,
            input_lwe_dimension.0,
        ));
        let output_lwe_sk = LweSecretKey::from_container(core::slice::from_raw_parts(
            output_lwe_sk,
            output_lwe_dimension.0,
        ));
        let mut seeded_lwe_ksk = SeededLweKeyswitchKey::from_container(
            core::slice::from_raw_parts_mut(
                seeded_lwe_ksk,
                seeded_lwe_keyswitch_key_size(decomposition_level_count, input_lwe_dimension),
            ),
            DecompositionBaseLog(decomposition_base_log),
            decomposition_level_count,
            output_lwe_dimension.to_lwe_size(),
            CompressionSeed {
                seed: compression_seed.into(),
            },
        );
        let Some(mut seeder) = ok_or_log(new_seeder(), "cannot create a seeder") else {
            return;
        };

        generate_seeded_lwe_keyswitch_key(
            &input_lwe_sk,
            &output_lwe_sk,
            &mut seeded_lwe_ksk,
            as_variance(variance),
            seeder.as_mut(),
        );
    })
}

/// # Safety
///
/// `seeded_lwe_ksk` must be valid for reads of [`concrete_cpu_seeded_keyswitch_key_size_u64`]
/// values, `lwe_ksk` for writes of [`concrete_cpu_keyswitch_key_size_u64`] values.
#[no_mangle]
pub unsafe extern "C" fn concrete_cpu_decompress_seeded_lwe_keyswitch_key_u64(
    lwe_ksk: *mut u64,
    seeded_lwe_ksk: *const u64,
    input_lwe_dimension: usize,
    output_lwe_dimension: usize,
    decomposition_level_count: usize,
    decomposition_base_log: usize,
    compression_seed: Uint128,
    parallelism: Parallelism,
) {
    nounwind(|| {
        let input_lwe_dimension = LweDimension(input_lwe_dimension);
        let output_lwe_dimension = LweDimension(output_lwe_dimension);
        let decomposition_level_count = DecompositionLevelCount(decomposition_level_count);
        let decomposition_base_log = DecompositionBaseLog(decomposition_base_log);

        let seeded_lwe_ksk = SeededLweKeyswitchKey::from_container(
            core::slice::from_raw_parts(
                seeded_lwe_ksk,
                seeded_lwe_keyswitch_key_size(decomposition_level_count, input_lwe_dimension),
            ),
            decomposition_base_log,
            decomposition_level_count,
            output_lwe_dimension.to_lwe_size(),
            CompressionSeed {
                seed: compression_seed.into(),
            },
        );
        let mut lwe_ksk = LweKeyswitchKey::from_container(
            core::slice::from_raw_parts_mut(
                lwe_ksk,
                lwe_keyswitch_key_size(
                    decomposition_level_count,
                    input_lwe_dimension,
                    output_lwe_dimension,
                ),
            ),
            decomposition_base_log,
            decomposition_level_count,
            output_lwe_dimension.to_lwe_size(),
        );

        match parallelism {
            Parallelism::No => decompress_seeded_lwe_keyswitch_key(&mut lwe_ksk, &seeded_lwe_ksk),
            Parallelism::Rayon => {
                par_decompress_seeded_lwe_keyswitch_key(&mut lwe_ksk, &seeded_lwe_ksk)
            }
        }
    })
}

/// Keyswitches `ct_in` from the input key of `keyswitch_key` to its output key.
///
/// # Safety
///
/// `ct_in` must be valid for reads of `input_dimension + 1` values, `ct_out` for writes of
/// `output_dimension + 1` values and `keyswitch_key` for reads of
/// [`concrete_cpu_keyswitch_key_size_u64`] values.
#[no_mangle]
pub unsafe extern "C" fn concrete_cpu_keyswitch_lwe_ciphertext_u64(
    ct_out: *mut u64,
    ct_in: *const u64,
    keyswitch_key: *const u64,
    decomposition_level_count: usize,
    decomposition_base_log: usize,
    input_dimension: usize,
    output_dimension: usize,
) {
    nounwind(|| {
        let input_dimension = LweDimension(input_dimension);
        let output_dimension = LweDimension(output_dimension);
        let decomposition_level_count = DecompositionLevelCount(decomposition_level_count);

        let keyswitch_key = LweKeyswitchKey::from_container(
            core::slice::from_raw_parts(
                keyswitch_key,
                lwe_keyswitch_key_size(decomposition_level_count, input_dimension, output_dimension),
            ),
            DecompositionBaseLog(decomposition_base_log),
            decomposition_level_count,
            output_dimension.to_lwe_size(),
        );
        let ct_in = LweCiphertext::from_container(core::slice::from_raw_parts(
            ct_in,
            lwe_ciphertext_size(input_dimension),
        ));
        let mut ct_out = LweCiphertext::from_container(core::slice::from_raw_parts_mut(
            ct_out,
            lwe_ciphertext_size(output_dimension),
        ));

        keyswitch_lwe_ciphertext(&keyswitch_key, &ct_in, &mut ct_out);
    })
}
