//! Module with primitives pertaining to [`SeededLweBootstrapKey`] decompression.

use crate::commons::generators::MaskRandomGenerator;
use crate::commons::math::random::ActivatedRandomGenerator;
use crate::commons::traits::{Container, ContainerMut};
use crate::entities::*;
use rayon::prelude::*;

fn assert_bsk_match<OutputCont, InputCont>(
    output_bsk: &LweBootstrapKey<OutputCont>,
    input_bsk: &SeededLweBootstrapKey<InputCont>,
) where
    OutputCont: ContainerMut<Element = u64>,
    InputCont: Container<Element = u64>,
{
    assert!(
        output_bsk.input_lwe_dimension() == input_bsk.input_lwe_dimension(),
        "Mismatched input LweDimension between input SeededLweBootstrapKey {:?} and output \
        LweBootstrapKey {:?}",
        input_bsk.input_lwe_dimension(),
        output_bsk.input_lwe_dimension(),
    );
    assert!(
        output_bsk.glwe_size() == input_bsk.glwe_size()
            && output_bsk.polynomial_size() == input_bsk.polynomial_size(),
        "Mismatched GLWE parameters between input SeededLweBootstrapKey ({:?}, {:?}) and output \
        LweBootstrapKey ({:?}, {:?})",
        input_bsk.glwe_size(),
        input_bsk.polynomial_size(),
        output_bsk.glwe_size(),
        output_bsk.polynomial_size(),
    );
    assert!(
        output_bsk.decomposition_level_count() == input_bsk.decomposition_level_count(),
        "Mismatched DecompositionLevelCount between input SeededLweBootstrapKey {:?} and output \
        LweBootstrapKey {:?}",
        input_bsk.decomposition_level_count(),
        output_bsk.decomposition_level_count(),
    );
}

// Every row of every level matrix gets a fresh mask and the stored body.
fn decompress_seeded_ggsw_ciphertext(
    mut output_ggsw: GgswCiphertextMutView<'_>,
    input_bodies: &[u64],
    generator: &mut MaskRandomGenerator<ActivatedRandomGenerator>,
) {
    let glwe_size = output_ggsw.glwe_size();
    let polynomial_size = output_ggsw.polynomial_size();
    let level_bodies_len = glwe_size.0 * polynomial_size.0;

    let gen_iter = generator
        .fork_ggsw_to_ggsw_levels(
            output_ggsw.decomposition_level_count(),
            glwe_size,
            polynomial_size,
        )
        .expect("Failed to split generator into ggsw levels");

    for ((mut level_matrix, level_bodies), mut generator) in output_ggsw
        .iter_mut()
        .zip(input_bodies.chunks_exact(level_bodies_len))
        .zip(gen_iter)
    {
        let gen_iter = generator
            .fork_ggsw_level_to_glwe(glwe_size, polynomial_size)
            .expect("Failed to split generator into glwe");

        for ((mut row, row_body), mut generator) in level_matrix
            .as_mut_glwe_list()
            .iter_mut()
            .zip(level_bodies.chunks_exact(polynomial_size.0))
            .zip(gen_iter)
        {
            let (mut mask, mut body) = row.get_mut_mask_and_body();
            generator.fill_slice_with_random_mask(mask.as_mut());
            body.as_mut().copy_from_slice(row_body);
        }
    }
}

/// Decompress a [`SeededLweBootstrapKey`], regenerating the masks of its GLWE rows from its
/// compression seed.
pub fn decompress_seeded_lwe_bootstrap_key<OutputCont, InputCont>(
    output_bsk: &mut LweBootstrapKey<OutputCont>,
    input_bsk: &SeededLweBootstrapKey<InputCont>,
) where
    OutputCont: ContainerMut<Element = u64>,
    InputCont: Container<Element = u64>,
{
    assert_bsk_match(output_bsk, input_bsk);

    let mut generator =
        MaskRandomGenerator::<ActivatedRandomGenerator>::new(input_bsk.compression_seed().seed);

    let gen_iter = generator
        .fork_bsk_to_ggsw(
            input_bsk.input_lwe_dimension(),
            input_bsk.decomposition_level_count(),
            input_bsk.glwe_size(),
            input_bsk.polynomial_size(),
        )
        .expect("Failed to split generator into ggsw");

    for ((output_ggsw, input_bodies), mut loop_generator) in
        output_bsk.iter_mut().zip(input_bsk.iter()).zip(gen_iter)
    {
        decompress_seeded_ggsw_ciphertext(output_ggsw, input_bodies, &mut loop_generator);
    }
}

/// Parallel variant of [`decompress_seeded_lwe_bootstrap_key`].
pub fn par_decompress_seeded_lwe_bootstrap_key<OutputCont, InputCont>(
    output_bsk: &mut LweBootstrapKey<OutputCont>,
    input_bsk: &SeededLweBootstrapKey<InputCont>,
) where
    OutputCont: ContainerMut<Element = u64>,
    InputCont: Container<Element = u64> + Sync,
{
    assert_bsk_match(output_bsk, input_bsk);

    let mut generator =
        MaskRandomGenerator::<ActivatedRandomGenerator>::new(input_bsk.compression_seed().seed);

    let gen_iter = generator
        .par_fork_bsk_to_ggsw(
            input_bsk.input_lwe_dimension(),
            input_bsk.decomposition_level_count(),
            input_bsk.glwe_size(),
            input_bsk.polynomial_size(),
        )
        .expect("Failed to split generator into ggsw");

    let seeded_ggsw_size = seeded_ggsw_ciphertext_size(
        input_bsk.glwe_size(),
        input_bsk.polynomial_size(),
        input_bsk.decomposition_level_count(),
    );

    output_bsk
        .par_iter_mut()
        .zip(input_bsk.as_ref().par_chunks_exact(seeded_ggsw_size))
        .zip(gen_iter)
        .for_each(|((output_ggsw, input_bodies), mut loop_generator)| {
            decompress_seeded_ggsw_ciphertext(output_ggsw, input_bodies, &mut loop_generator);
        });
}
