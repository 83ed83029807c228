//! Module containing primitives pertaining to LWE private functional packing keyswitch.

use crate::algorithms::slice_algorithms::*;
use crate::commons::math::decomposition::SignedDecomposer;
use crate::commons::traits::{Container, ContainerMut};
use crate::entities::*;

/// Apply a private functional packing keyswitch on an input [`LWE ciphertext`](`LweCiphertext`)
/// and write the result in an output [`GLWE ciphertext`](`GlweCiphertext`).
///
/// Every coefficient of the input, body included, is decomposed and the matching block of the key
/// is accumulated in the output with the opposite of each decomposition term.
pub fn private_functional_keyswitch_lwe_ciphertext_into_glwe_ciphertext<
    KeyCont,
    InputCont,
    OutputCont,
>(
    lwe_pfpksk: &LwePrivateFunctionalPackingKeyswitchKey<KeyCont>,
    output_glwe_ciphertext: &mut GlweCiphertext<OutputCont>,
    input_lwe_ciphertext: &LweCiphertext<InputCont>,
) where
    KeyCont: Container<Element = u64>,
    InputCont: Container<Element = u64>,
    OutputCont: ContainerMut<Element = u64>,
{
    assert!(
        lwe_pfpksk.input_lwe_dimension() == input_lwe_ciphertext.lwe_dimension(),
        "Mismatched input LweDimension. \
        LwePrivateFunctionalPackingKeyswitchKey input LweDimension: {:?}, \
        input LweCiphertext LweDimension {:?}.",
        lwe_pfpksk.input_lwe_dimension(),
        input_lwe_ciphertext.lwe_dimension()
    );
    assert!(
        lwe_pfpksk.output_glwe_size() == output_glwe_ciphertext.glwe_size(),
        "Mismatched output GlweSize. \
        LwePrivateFunctionalPackingKeyswitchKey output GlweSize: {:?}, \
        output GlweCiphertext GlweSize {:?}.",
        lwe_pfpksk.output_glwe_size(),
        output_glwe_ciphertext.glwe_size()
    );
    assert!(
        lwe_pfpksk.output_polynomial_size() == output_glwe_ciphertext.polynomial_size(),
        "Mismatched output PolynomialSize. \
        LwePrivateFunctionalPackingKeyswitchKey output PolynomialSize: {:?}, \
        output GlweCiphertext PolynomialSize {:?}.",
        lwe_pfpksk.output_polynomial_size(),
        output_glwe_ciphertext.polynomial_size()
    );

    output_glwe_ciphertext.as_mut().fill(0);

    let decomposer = SignedDecomposer::new(
        lwe_pfpksk.decomposition_base_log(),
        lwe_pfpksk.decomposition_level_count(),
    );

    for (keyswitch_key_block, &input_element) in
        lwe_pfpksk.iter().zip(input_lwe_ciphertext.as_ref())
    {
        let decomposition_iter = decomposer.decompose(input_element);
        // Levels are stored from 1 to l while the decomposition yields them from l to 1
        for (level_key_ciphertext, decomposed) in
            keyswitch_key_block.iter().rev().zip(decomposition_iter)
        {
            slice_wrapping_sub_scalar_mul_assign(
                output_glwe_ciphertext.as_mut(),
                level_key_ciphertext.as_ref(),
                decomposed.value(),
            );
        }
    }
}
