//! Module containing primitives pertaining to LWE ciphertext keyswitch.

use crate::algorithms::slice_algorithms::*;
use crate::commons::math::decomposition::SignedDecomposer;
use crate::commons::traits::{Container, ContainerMut};
use crate::entities::*;

/// Keyswitch an [`LWE ciphertext`](`LweCiphertext`) encrypted under an
/// [`LWE secret key`](`LweSecretKey`) to another [`LWE secret key`](`LweSecretKey`).
///
/// Each mask coefficient of the input is decomposed, and the matching block of the key, scaled by
/// the decomposition terms, is subtracted from a ciphertext holding only the input body.
pub fn keyswitch_lwe_ciphertext<KSKCont, InputCont, OutputCont>(
    lwe_keyswitch_key: &LweKeyswitchKey<KSKCont>,
    input_lwe_ciphertext: &LweCiphertext<InputCont>,
    output_lwe_ciphertext: &mut LweCiphertext<OutputCont>,
) where
    KSKCont: Container<Element = u64>,
    InputCont: Container<Element = u64>,
    OutputCont: ContainerMut<Element = u64>,
{
    assert!(
        lwe_keyswitch_key.input_key_lwe_dimension() == input_lwe_ciphertext.lwe_dimension(),
        "Mismatched input LweDimension. \
        LweKeyswitchKey input LweDimension: {:?}, input LweCiphertext LweDimension {:?}.",
        lwe_keyswitch_key.input_key_lwe_dimension(),
        input_lwe_ciphertext.lwe_dimension(),
    );
    assert!(
        lwe_keyswitch_key.output_key_lwe_dimension() == output_lwe_ciphertext.lwe_dimension(),
        "Mismatched output LweDimension. \
        LweKeyswitchKey output LweDimension: {:?}, output LweCiphertext LweDimension {:?}.",
        lwe_keyswitch_key.output_key_lwe_dimension(),
        output_lwe_ciphertext.lwe_dimension(),
    );

    // Clear the output ciphertext, as it will get updated gradually
    output_lwe_ciphertext.as_mut().fill(0);

    // Copy the input body to the output ciphertext
    *output_lwe_ciphertext.get_mut_body() = input_lwe_ciphertext.get_body();

    // We instantiate a decomposer
    let decomposer = SignedDecomposer::new(
        lwe_keyswitch_key.decomposition_base_log(),
        lwe_keyswitch_key.decomposition_level_count(),
    );

    for (keyswitch_key_block, &input_mask_element) in lwe_keyswitch_key
        .iter()
        .zip(input_lwe_ciphertext.get_mask())
    {
        let decomposition_iter = decomposer.decompose(input_mask_element);
        // loop over the number of levels in reverse (from highest to lowest)
        for (level_key_ciphertext, decomposed) in
            keyswitch_key_block.iter().rev().zip(decomposition_iter)
        {
            slice_wrapping_sub_scalar_mul_assign(
                output_lwe_ciphertext.as_mut(),
                level_key_ciphertext.as_ref(),
                decomposed.value(),
            );
        }
    }
}
