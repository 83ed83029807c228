//! Module with primitives pertaining to [`SeededLweKeyswitchKey`] decompression.

use crate::algorithms::seeded_lwe_ciphertext_decompression::decompress_seeded_lwe_ciphertext_with_existing_generator;
use crate::commons::generators::MaskRandomGenerator;
use crate::commons::math::random::ActivatedRandomGenerator;
use crate::commons::traits::{Container, ContainerMut};
use crate::entities::*;
use rayon::prelude::*;

fn assert_ksk_match<OutputCont, InputCont>(
    output_ksk: &LweKeyswitchKey<OutputCont>,
    input_ksk: &SeededLweKeyswitchKey<InputCont>,
) where
    OutputCont: ContainerMut<Element = u64>,
    InputCont: Container<Element = u64>,
{
    assert!(
        output_ksk.input_key_lwe_dimension() == input_ksk.input_key_lwe_dimension()
            && output_ksk.output_key_lwe_dimension() == input_ksk.output_key_lwe_dimension(),
        "Mismatched LweDimension between input SeededLweKeyswitchKey ({:?} -> {:?}) and output \
        LweKeyswitchKey ({:?} -> {:?})",
        input_ksk.input_key_lwe_dimension(),
        input_ksk.output_key_lwe_dimension(),
        output_ksk.input_key_lwe_dimension(),
        output_ksk.output_key_lwe_dimension(),
    );
    assert!(
        output_ksk.decomposition_level_count() == input_ksk.decomposition_level_count(),
        "Mismatched DecompositionLevelCount between input SeededLweKeyswitchKey {:?} and output \
        LweKeyswitchKey {:?}",
        input_ksk.decomposition_level_count(),
        output_ksk.decomposition_level_count(),
    );
}

fn decompress_keyswitch_key_block(
    output_block: LweCiphertextListMutView<'_>,
    input_bodies: &[u64],
    generator: &mut MaskRandomGenerator<ActivatedRandomGenerator>,
) {
    let gen_iter = generator
        .fork_lwe_list_to_lwe(
            output_block.lwe_ciphertext_count(),
            output_block.lwe_size().to_lwe_dimension(),
        )
        .expect("Failed to split generator into lwe");

    for ((mut lwe_out, &body_in), mut loop_generator) in output_block
        .into_ciphertexts()
        .zip(input_bodies)
        .zip(gen_iter)
    {
        decompress_seeded_lwe_ciphertext_with_existing_generator(
            &mut lwe_out,
            body_in,
            &mut loop_generator,
        );
    }
}

/// Decompress a [`SeededLweKeyswitchKey`], regenerating the masks of its ciphertexts from its
/// compression seed.
pub fn decompress_seeded_lwe_keyswitch_key<OutputCont, InputCont>(
    output_ksk: &mut LweKeyswitchKey<OutputCont>,
    input_ksk: &SeededLweKeyswitchKey<InputCont>,
) where
    OutputCont: ContainerMut<Element = u64>,
    InputCont: Container<Element = u64>,
{
    assert_ksk_match(output_ksk, input_ksk);

    let mut generator =
        MaskRandomGenerator::<ActivatedRandomGenerator>::new(input_ksk.compression_seed().seed);

    let gen_iter = generator
        .fork_ksk_to_ksk_blocks(
            input_ksk.input_key_lwe_dimension(),
            input_ksk.decomposition_level_count(),
            input_ksk.output_key_lwe_dimension(),
        )
        .expect("Failed to split generator into keyswitch key blocks");

    for ((output_block, input_bodies), mut loop_generator) in
        output_ksk.iter_mut().zip(input_ksk.iter()).zip(gen_iter)
    {
        decompress_keyswitch_key_block(output_block, input_bodies, &mut loop_generator);
    }
}

/// Parallel variant of [`decompress_seeded_lwe_keyswitch_key`].
pub fn par_decompress_seeded_lwe_keyswitch_key<OutputCont, InputCont>(
    output_ksk: &mut LweKeyswitchKey<OutputCont>,
    input_ksk: &SeededLweKeyswitchKey<InputCont>,
) where
    OutputCont: ContainerMut<Element = u64>,
    InputCont: Container<Element = u64> + Sync,
{
    assert_ksk_match(output_ksk, input_ksk);

    let mut generator =
        MaskRandomGenerator::<ActivatedRandomGenerator>::new(input_ksk.compression_seed().seed);

    let gen_iter = generator
        .par_fork_ksk_to_ksk_blocks(
            input_ksk.input_key_lwe_dimension(),
            input_ksk.decomposition_level_count(),
            input_ksk.output_key_lwe_dimension(),
        )
        .expect("Failed to split generator into keyswitch key blocks");

    let level_count = input_ksk.decomposition_level_count().0;

    output_ksk
        .par_iter_mut()
        .zip(input_ksk.as_ref().par_chunks_exact(level_count))
        .zip(gen_iter)
        .for_each(|((output_block, input_bodies), mut loop_generator)| {
            decompress_keyswitch_key_block(output_block, input_bodies, &mut loop_generator);
        });
}
