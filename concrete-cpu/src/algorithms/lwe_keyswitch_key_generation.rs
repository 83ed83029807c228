//! Module containing primitives pertaining to [`LWE keyswitch keys generation`](`LweKeyswitchKey`)
//! and [`seeded LWE keyswitch keys generation`](`SeededLweKeyswitchKey`).

use crate::algorithms::lwe_encryption::{
    encrypt_lwe_ciphertext_list, fill_lwe_mask_and_body_for_encryption,
    par_encrypt_lwe_ciphertext_list,
};
use crate::commons::dispersion::DispersionParameter;
use crate::commons::generators::EncryptionRandomGenerator;
use crate::commons::math::decomposition::{DecompositionLevel, DecompositionTerm};
use crate::commons::math::random::{
    ActivatedRandomGenerator, ByteRandomGenerator, ParallelByteRandomGenerator, Seeder,
};
use crate::commons::parameters::{
    DecompositionBaseLog, DecompositionLevelCount, LweCiphertextCount,
};
use crate::commons::traits::{Container, ContainerMut};
use crate::entities::*;
use rayon::prelude::*;

fn assert_keys_match_ksk(
    input_lwe_dimension: usize,
    output_lwe_dimension: usize,
    ksk_input_lwe_dimension: usize,
    ksk_output_lwe_dimension: usize,
) {
    assert!(
        ksk_input_lwe_dimension == input_lwe_dimension,
        "The destination LweKeyswitchKey input LweDimension is not equal \
    to the input LweSecretKey LweDimension. Destination: {ksk_input_lwe_dimension:?}, \
    input: {input_lwe_dimension:?}",
    );
    assert!(
        ksk_output_lwe_dimension == output_lwe_dimension,
        "The destination LweKeyswitchKey output LweDimension is not equal \
    to the output LweSecretKey LweDimension. Destination: {ksk_output_lwe_dimension:?}, \
    output: {output_lwe_dimension:?}",
    );
}

// Fills `decomposition_plaintexts` with the key coefficient scaled for each level, level 1 first.
fn fill_decomposition_plaintexts(
    decomposition_plaintexts: &mut [u64],
    input_key_element: u64,
    decomp_base_log: DecompositionBaseLog,
) {
    for (level, message) in (1..=decomposition_plaintexts.len()).zip(decomposition_plaintexts) {
        *message = DecompositionTerm::new(
            DecompositionLevel(level),
            decomp_base_log,
            input_key_element,
        )
        .to_recomposition_summand();
    }
}

/// Fill an [`LWE keyswitch key`](`LweKeyswitchKey`) with an actual keyswitching key constructed
/// from an input and an output key [`LWE secret key`](`LweSecretKey`).
pub fn generate_lwe_keyswitch_key<InputKeyCont, OutputKeyCont, KSKeyCont, Gen>(
    input_lwe_sk: &LweSecretKey<InputKeyCont>,
    output_lwe_sk: &LweSecretKey<OutputKeyCont>,
    lwe_keyswitch_key: &mut LweKeyswitchKey<KSKeyCont>,
    noise_parameters: impl DispersionParameter,
    generator: &mut EncryptionRandomGenerator<Gen>,
) where
    InputKeyCont: Container<Element = u64>,
    OutputKeyCont: Container<Element = u64>,
    KSKeyCont: ContainerMut<Element = u64>,
    Gen: ByteRandomGenerator,
{
    assert_keys_match_ksk(
        input_lwe_sk.lwe_dimension().0,
        output_lwe_sk.lwe_dimension().0,
        lwe_keyswitch_key.input_key_lwe_dimension().0,
        lwe_keyswitch_key.output_key_lwe_dimension().0,
    );

    let decomp_base_log = lwe_keyswitch_key.decomposition_base_log();
    let decomp_level_count = lwe_keyswitch_key.decomposition_level_count();

    // The plaintexts used to encrypt a key element will be stored in this buffer
    let mut decomposition_plaintexts_buffer = vec![0u64; decomp_level_count.0];

    let gen_iter = generator
        .fork_ksk_to_ksk_blocks(
            input_lwe_sk.lwe_dimension(),
            decomp_level_count,
            output_lwe_sk.lwe_dimension(),
        )
        .expect("Failed to split generator into keyswitch key blocks");

    // Iterate over the input key elements and the destination lwe_keyswitch_key memory
    for ((&input_key_element, mut keyswitch_key_block), mut loop_generator) in input_lwe_sk
        .as_ref()
        .iter()
        .zip(lwe_keyswitch_key.iter_mut())
        .zip(gen_iter)
    {
        fill_decomposition_plaintexts(
            &mut decomposition_plaintexts_buffer,
            input_key_element,
            decomp_base_log,
        );

        encrypt_lwe_ciphertext_list(
            output_lwe_sk,
            &mut keyswitch_key_block,
            &decomposition_plaintexts_buffer,
            noise_parameters,
            &mut loop_generator,
        );
    }
}

/// Allocate a new [`LWE keyswitch key`](`LweKeyswitchKey`) and fill it with an actual keyswitching
/// key constructed from an input and an output key [`LWE secret key`](`LweSecretKey`).
pub fn allocate_and_generate_new_lwe_keyswitch_key<InputKeyCont, OutputKeyCont, Gen>(
    input_lwe_sk: &LweSecretKey<InputKeyCont>,
    output_lwe_sk: &LweSecretKey<OutputKeyCont>,
    decomp_base_log: DecompositionBaseLog,
    decomp_level_count: DecompositionLevelCount,
    noise_parameters: impl DispersionParameter,
    generator: &mut EncryptionRandomGenerator<Gen>,
) -> LweKeyswitchKeyOwned
where
    InputKeyCont: Container<Element = u64>,
    OutputKeyCont: Container<Element = u64>,
    Gen: ByteRandomGenerator,
{
    let mut new_lwe_keyswitch_key = LweKeyswitchKeyOwned::new(
        0,
        decomp_base_log,
        decomp_level_count,
        input_lwe_sk.lwe_dimension(),
        output_lwe_sk.lwe_dimension(),
    );

    generate_lwe_keyswitch_key(
        input_lwe_sk,
        output_lwe_sk,
        &mut new_lwe_keyswitch_key,
        noise_parameters,
        generator,
    );

    new_lwe_keyswitch_key
}

/// Parallel variant of [`generate_lwe_keyswitch_key`], yielding the same key.
pub fn par_generate_lwe_keyswitch_key<InputKeyCont, OutputKeyCont, KSKeyCont, Gen>(
    input_lwe_sk: &LweSecretKey<InputKeyCont>,
    output_lwe_sk: &LweSecretKey<OutputKeyCont>,
    lwe_keyswitch_key: &mut LweKeyswitchKey<KSKeyCont>,
    noise_parameters: impl DispersionParameter + Sync,
    generator: &mut EncryptionRandomGenerator<Gen>,
) where
    InputKeyCont: Container<Element = u64> + Sync,
    OutputKeyCont: Container<Element = u64> + Sync,
    KSKeyCont: ContainerMut<Element = u64>,
    Gen: ParallelByteRandomGenerator,
{
    assert_keys_match_ksk(
        input_lwe_sk.lwe_dimension().0,
        output_lwe_sk.lwe_dimension().0,
        lwe_keyswitch_key.input_key_lwe_dimension().0,
        lwe_keyswitch_key.output_key_lwe_dimension().0,
    );

    let decomp_base_log = lwe_keyswitch_key.decomposition_base_log();
    let decomp_level_count = lwe_keyswitch_key.decomposition_level_count();

    let gen_iter = generator
        .par_fork_ksk_to_ksk_blocks(
            input_lwe_sk.lwe_dimension(),
            decomp_level_count,
            output_lwe_sk.lwe_dimension(),
        )
        .expect("Failed to split generator into keyswitch key blocks");

    input_lwe_sk
        .as_ref()
        .par_iter()
        .zip(lwe_keyswitch_key.par_iter_mut())
        .zip(gen_iter)
        .for_each(
            |((&input_key_element, mut keyswitch_key_block), mut loop_generator)| {
                let mut decomposition_plaintexts_buffer = vec![0u64; decomp_level_count.0];
                fill_decomposition_plaintexts(
                    &mut decomposition_plaintexts_buffer,
                    input_key_element,
                    decomp_base_log,
                );

                par_encrypt_lwe_ciphertext_list(
                    output_lwe_sk,
                    &mut keyswitch_key_block,
                    &decomposition_plaintexts_buffer,
                    noise_parameters,
                    &mut loop_generator,
                );
            },
        );
}

// Encrypts the levels of one key element, keeping only the bodies.
fn encrypt_seeded_keyswitch_key_block<KeyCont, Gen>(
    output_lwe_sk: &LweSecretKey<KeyCont>,
    block_bodies: &mut [u64],
    decomposition_plaintexts: &[u64],
    mask_buffer: &mut [u64],
    noise_parameters: impl DispersionParameter,
    generator: &mut EncryptionRandomGenerator<Gen>,
) where
    KeyCont: Container<Element = u64>,
    Gen: ByteRandomGenerator,
{
    let gen_iter = generator
        .fork_lwe_list_to_lwe(
            LweCiphertextCount(block_bodies.len()),
            output_lwe_sk.lwe_dimension(),
        )
        .expect("Failed to split generator into lwe");

    for ((body, &message), mut loop_generator) in block_bodies
        .iter_mut()
        .zip(decomposition_plaintexts)
        .zip(gen_iter)
    {
        fill_lwe_mask_and_body_for_encryption(
            output_lwe_sk,
            mask_buffer,
            body,
            Plaintext(message),
            noise_parameters,
            &mut loop_generator,
        );
    }
}

/// Fill a [`seeded LWE keyswitch key`](`SeededLweKeyswitchKey`) with an actual keyswitching key
/// constructed from an input and an output key [`LWE secret key`](`LweSecretKey`).
///
/// The masks are drawn from a generator seeded by the compression seed of the key, the noise from
/// `noise_seeder`.
pub fn generate_seeded_lwe_keyswitch_key<InputKeyCont, OutputKeyCont, KSKeyCont, NoiseSeeder>(
    input_lwe_sk: &LweSecretKey<InputKeyCont>,
    output_lwe_sk: &LweSecretKey<OutputKeyCont>,
    lwe_keyswitch_key: &mut SeededLweKeyswitchKey<KSKeyCont>,
    noise_parameters: impl DispersionParameter,
    noise_seeder: &mut NoiseSeeder,
) where
    InputKeyCont: Container<Element = u64>,
    OutputKeyCont: Container<Element = u64>,
    KSKeyCont: ContainerMut<Element = u64>,
    // Maybe Sized allows to pass Box<dyn Seeder>.
    NoiseSeeder: Seeder + ?Sized,
{
    assert_keys_match_ksk(
        input_lwe_sk.lwe_dimension().0,
        output_lwe_sk.lwe_dimension().0,
        lwe_keyswitch_key.input_key_lwe_dimension().0,
        lwe_keyswitch_key.output_key_lwe_dimension().0,
    );

    let decomp_base_log = lwe_keyswitch_key.decomposition_base_log();
    let decomp_level_count = lwe_keyswitch_key.decomposition_level_count();

    let mut decomposition_plaintexts_buffer = vec![0u64; decomp_level_count.0];
    let mut mask_buffer = vec![0u64; output_lwe_sk.lwe_dimension().0];

    let mut generator = EncryptionRandomGenerator::<ActivatedRandomGenerator>::new(
        lwe_keyswitch_key.compression_seed().seed,
        noise_seeder,
    );

    let gen_iter = generator
        .fork_ksk_to_ksk_blocks(
            input_lwe_sk.lwe_dimension(),
            decomp_level_count,
            output_lwe_sk.lwe_dimension(),
        )
        .expect("Failed to split generator into keyswitch key blocks");

    for ((&input_key_element, block_bodies), mut loop_generator) in input_lwe_sk
        .as_ref()
        .iter()
        .zip(lwe_keyswitch_key.iter_mut())
        .zip(gen_iter)
    {
        fill_decomposition_plaintexts(
            &mut decomposition_plaintexts_buffer,
            input_key_element,
            decomp_base_log,
        );

        encrypt_seeded_keyswitch_key_block(
            output_lwe_sk,
            block_bodies,
            &decomposition_plaintexts_buffer,
            &mut mask_buffer,
            noise_parameters,
            &mut loop_generator,
        );
    }
}

/// Parallel variant of [`generate_seeded_lwe_keyswitch_key`], yielding the same key.
pub fn par_generate_seeded_lwe_keyswitch_key<InputKeyCont, OutputKeyCont, KSKeyCont, NoiseSeeder>(
    input_lwe_sk: &LweSecretKey<InputKeyCont>,
    output_lwe_sk: &LweSecretKey<OutputKeyCont>,
    lwe_keyswitch_key: &mut SeededLweKeyswitchKey<KSKeyCont>,
    noise_parameters: impl DispersionParameter + Sync,
    noise_seeder: &mut NoiseSeeder,
) where
    InputKeyCont: Container<Element = u64> + Sync,
    OutputKeyCont: Container<Element = u64> + Sync,
    KSKeyCont: ContainerMut<Element = u64>,
    // Maybe Sized allows to pass Box<dyn Seeder>.
    NoiseSeeder: Seeder + ?Sized,
{
    assert_keys_match_ksk(
        input_lwe_sk.lwe_dimension().0,
        output_lwe_sk.lwe_dimension().0,
        lwe_keyswitch_key.input_key_lwe_dimension().0,
        lwe_keyswitch_key.output_key_lwe_dimension().0,
    );

    let decomp_base_log = lwe_keyswitch_key.decomposition_base_log();
    let decomp_level_count = lwe_keyswitch_key.decomposition_level_count();

    let mut generator = EncryptionRandomGenerator::<ActivatedRandomGenerator>::new(
        lwe_keyswitch_key.compression_seed().seed,
        noise_seeder,
    );

    let gen_iter = generator
        .par_fork_ksk_to_ksk_blocks(
            input_lwe_sk.lwe_dimension(),
            decomp_level_count,
            output_lwe_sk.lwe_dimension(),
        )
        .expect("Failed to split generator into keyswitch key blocks");

    input_lwe_sk
        .as_ref()
        .par_iter()
        .zip(lwe_keyswitch_key.par_iter_mut())
        .zip(gen_iter)
        .for_each(|((&input_key_element, block_bodies), mut loop_generator)| {
            let mut decomposition_plaintexts_buffer = vec![0u64; decomp_level_count.0];
            let mut mask_buffer = vec![0u64; output_lwe_sk.lwe_dimension().0];
            fill_decomposition_plaintexts(
                &mut decomposition_plaintexts_buffer,
                input_key_element,
                decomp_base_log,
            );

            encrypt_seeded_keyswitch_key_block(
                output_lwe_sk,
                block_bodies,
                &decomposition_plaintexts_buffer,
                &mut mask_buffer,
                noise_parameters,
                &mut loop_generator,
            );
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::*;
    use crate::commons::dispersion::StandardDev;
    use crate::commons::generators::DeterministicSeeder;
    use crate::commons::math::random::CompressionSeed;
    use crate::commons::parameters::LweDimension;
    use crate::commons::test_tools::*;

    const STD: StandardDev = StandardDev(0.00000000000000029403601535432533);

    #[test]
    fn keyswitch_changes_the_key() {
        let mut secret_generator = new_secret_random_generator();
        let mut encryption_generator = new_encryption_random_generator();
        let input_key =
            allocate_and_generate_new_binary_lwe_secret_key(LweDimension(1024), &mut secret_generator);
        let output_key =
            allocate_and_generate_new_binary_lwe_secret_key(LweDimension(600), &mut secret_generator);

        let ksk = allocate_and_generate_new_lwe_keyswitch_key(
            &input_key,
            &output_key,
            DecompositionBaseLog(4),
            DecompositionLevelCount(5),
            STD,
            &mut encryption_generator,
        );

        let mut output = LweCiphertextOwned::new(0, output_key.lwe_dimension().to_lwe_size());
        for msg in 0..16u64 {
            let input = allocate_and_encrypt_new_lwe_ciphertext(
                &input_key,
                Plaintext(encode(msg, 5)),
                STD,
                &mut encryption_generator,
            );
            keyswitch_lwe_ciphertext(&ksk, &input, &mut output);
            let decrypted = decrypt_lwe_ciphertext(&output_key, &output);
            assert_eq!(decode(decrypted.0, 5), msg);
        }
    }

    #[test]
    fn every_generation_path_agrees() {
        let mut secret_generator = new_secret_random_generator();
        let input_key =
            allocate_and_generate_new_binary_lwe_secret_key(LweDimension(64), &mut secret_generator);
        let output_key =
            allocate_and_generate_new_binary_lwe_secret_key(LweDimension(32), &mut secret_generator);
        let base_log = DecompositionBaseLog(3);
        let level_count = DecompositionLevelCount(4);

        let mask_seed = random_seed();
        let noise_seed = random_seed();

        let new_ksk = || {
            LweKeyswitchKeyOwned::new(
                0,
                base_log,
                level_count,
                input_key.lwe_dimension(),
                output_key.lwe_dimension(),
            )
        };
        let new_seeded_ksk = || {
            SeededLweKeyswitchKeyOwned::new(
                0,
                base_log,
                level_count,
                input_key.lwe_dimension(),
                output_key.lwe_dimension(),
                CompressionSeed::from(mask_seed),
            )
        };
        let new_generator = || {
            EncryptionRandomGenerator::<ActivatedRandomGenerator>::new(
                mask_seed,
                &mut DeterministicSeeder::<ActivatedRandomGenerator>::new(noise_seed),
            )
        };

        let mut sequential = new_ksk();
        generate_lwe_keyswitch_key(
            &input_key,
            &output_key,
            &mut sequential,
            STD,
            &mut new_generator(),
        );

        let mut parallel = new_ksk();
        par_generate_lwe_keyswitch_key(
            &input_key,
            &output_key,
            &mut parallel,
            STD,
            &mut new_generator(),
        );
        assert_eq!(sequential, parallel);

        let mut seeded = new_seeded_ksk();
        generate_seeded_lwe_keyswitch_key(
            &input_key,
            &output_key,
            &mut seeded,
            STD,
            &mut DeterministicSeeder::<ActivatedRandomGenerator>::new(noise_seed),
        );
        let mut par_seeded = new_seeded_ksk();
        par_generate_seeded_lwe_keyswitch_key(
            &input_key,
            &output_key,
            &mut par_seeded,
            STD,
            &mut DeterministicSeeder::<ActivatedRandomGenerator>::new(noise_seed),
        );
        assert_eq!(seeded, par_seeded);

        let mut decompressed = new_ksk();
        decompress_seeded_lwe_keyswitch_key(&mut decompressed, &seeded);
        assert_eq!(decompressed, sequential);

        let mut par_decompressed = new_ksk();
        par_decompress_seeded_lwe_keyswitch_key(&mut par_decompressed, &seeded);
        assert_eq!(par_decompressed, sequential);
    }
}
