//! Module containing primitives pertaining to the operation usually referred to as a
//! _sample extract_ in the literature. Allowing to extract a single
//! [`LWE Ciphertext`](`LweCiphertext`) from a given [`GLWE ciphertext`](`GlweCiphertext`).

use crate::algorithms::slice_algorithms::*;
use crate::commons::parameters::{LweDimension, MonomialDegree};
use crate::commons::traits::{Container, ContainerMut};
use crate::entities::*;

/// Extract the nth coefficient from the body of a [`GLWE Ciphertext`](`GlweCiphertext`) as an
/// [`LWE ciphertext`](`LweCiphertext`).
///
/// The output is encrypted under the LWE secret key obtained by reading the coefficients of the
/// GLWE secret key in order.
pub fn extract_lwe_sample_from_glwe_ciphertext<InputCont, OutputCont>(
    input_glwe: &GlweCiphertext<InputCont>,
    output_lwe: &mut LweCiphertext<OutputCont>,
    nth: MonomialDegree,
) where
    InputCont: Container<Element = u64>,
    OutputCont: ContainerMut<Element = u64>,
{
    assert!(
        input_glwe.glwe_dimension().0 * input_glwe.polynomial_size().0
            == output_lwe.lwe_dimension().0,
        "Mismatch between equivalent LweDimension of input ciphertext and output ciphertext. \
        Got {:?} for input and {:?} for output.",
        LweDimension(input_glwe.glwe_dimension().0 * input_glwe.polynomial_size().0),
        output_lwe.lwe_dimension(),
    );
    assert!(
        nth.0 < input_glwe.polynomial_size().0,
        "Cannot extract coefficient {} from polynomials of size {:?}",
        nth.0,
        input_glwe.polynomial_size()
    );

    // We retrieve the bodies and masks of the two ciphertexts.
    let (lwe_mask, lwe_body) = output_lwe.get_mut_mask_and_body();
    let (glwe_mask, glwe_body) = input_glwe.get_mask_and_body();

    // We copy the body
    *lwe_body = glwe_body.as_ref()[nth.0];

    // We copy the mask (each polynomial is in the wrong order)
    lwe_mask.copy_from_slice(glwe_mask.as_ref());

    // We compute the number of elements which must be
    // turned into their opposite
    let opposite_count = input_glwe.polynomial_size().0 - nth.0 - 1;

    for lwe_mask_poly in lwe_mask.chunks_exact_mut(input_glwe.polynomial_size().0) {
        lwe_mask_poly.reverse();
        slice_wrapping_opposite_assign(&mut lwe_mask_poly[0..opposite_count]);
        lwe_mask_poly.rotate_left(opposite_count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::*;
    use crate::commons::dispersion::StandardDev;
    use crate::commons::parameters::{GlweDimension, PolynomialSize};
    use crate::commons::test_tools::*;

    #[test]
    fn every_coefficient_can_be_extracted() {
        let glwe_dimension = GlweDimension(2);
        let polynomial_size = PolynomialSize(128);
        let mut secret_generator = new_secret_random_generator();
        let mut encryption_generator = new_encryption_random_generator();
        let glwe_secret_key = allocate_and_generate_new_binary_glwe_secret_key(
            glwe_dimension,
            polynomial_size,
            &mut secret_generator,
        );
        let lwe_secret_key = glwe_secret_key.as_lwe_secret_key();

        let messages: Vec<u64> = (0..polynomial_size.0 as u64).map(|i| encode(i % 16, 5)).collect();
        let mut glwe = GlweCiphertextOwned::new(0, glwe_dimension.to_glwe_size(), polynomial_size);
        encrypt_glwe_ciphertext(
            &glwe_secret_key,
            &Polynomial::from_container(messages.as_slice()),
            &mut glwe,
            StandardDev(0.00000000000000029403601535432533),
            &mut encryption_generator,
        );

        let mut lwe = LweCiphertextOwned::new(
            0,
            glwe_dimension
                .to_equivalent_lwe_dimension(polynomial_size)
                .to_lwe_size(),
        );
        for nth in 0..polynomial_size.0 {
            extract_lwe_sample_from_glwe_ciphertext(&glwe, &mut lwe, MonomialDegree(nth));
            let decrypted = decrypt_lwe_ciphertext(&lwe_secret_key, &lwe);
            assert_eq!(decode(decrypted.0, 5), nth as u64 % 16);
        }
    }
}
