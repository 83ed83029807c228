//! Module with primitives pertaining to [`SeededLweCiphertext`] decompression.

use crate::commons::generators::MaskRandomGenerator;
use crate::commons::math::random::ActivatedRandomGenerator;
use crate::commons::traits::ContainerMut;
use crate::entities::*;

/// Convenience function to share the core logic of the seeded LWE decompression between all
/// functions needing it.
pub fn decompress_seeded_lwe_ciphertext_with_existing_generator<OutputCont>(
    output_lwe: &mut LweCiphertext<OutputCont>,
    input_body: u64,
    generator: &mut MaskRandomGenerator<ActivatedRandomGenerator>,
) where
    OutputCont: ContainerMut<Element = u64>,
{
    let (output_mask, output_body) = output_lwe.get_mut_mask_and_body();

    generator.fill_slice_with_random_mask(output_mask);
    *output_body = input_body;
}

/// Decompress a [`SeededLweCiphertext`], regenerating its mask from its compression seed.
pub fn decompress_seeded_lwe_ciphertext<OutputCont>(
    output_lwe: &mut LweCiphertext<OutputCont>,
    input_seeded_lwe: &SeededLweCiphertext,
) where
    OutputCont: ContainerMut<Element = u64>,
{
    assert!(
        output_lwe.lwe_size() == input_seeded_lwe.lwe_size(),
        "Mismatched LweSize between input SeededLweCiphertext {:?} and output LweCiphertext {:?}",
        input_seeded_lwe.lwe_size(),
        output_lwe.lwe_size(),
    );

    let mut generator = MaskRandomGenerator::<ActivatedRandomGenerator>::new(
        input_seeded_lwe.compression_seed().seed,
    );
    decompress_seeded_lwe_ciphertext_with_existing_generator(
        output_lwe,
        input_seeded_lwe.get_body(),
        &mut generator,
    )
}
