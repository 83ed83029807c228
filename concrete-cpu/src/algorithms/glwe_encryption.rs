//! Module containing primitives pertaining to [`GLWE ciphertext`](`GlweCiphertext`) encryption and
//! decryption.

use crate::algorithms::polynomial_algorithms::*;
use crate::commons::dispersion::DispersionParameter;
use crate::commons::generators::EncryptionRandomGenerator;
use crate::commons::math::random::ByteRandomGenerator;
use crate::commons::traits::{Container, ContainerMut};
use crate::entities::*;

fn assert_glwe_and_key_match<KeyCont, Cont>(
    glwe_secret_key: &GlweSecretKey<KeyCont>,
    glwe: &GlweCiphertext<Cont>,
) where
    KeyCont: Container<Element = u64>,
    Cont: Container<Element = u64>,
{
    assert!(
        glwe.glwe_dimension() == glwe_secret_key.glwe_dimension(),
        "Mismatch between GlweDimension of ciphertext and secret key. \
        Got {:?} in ciphertext, and {:?} in secret key.",
        glwe.glwe_dimension(),
        glwe_secret_key.glwe_dimension()
    );
    assert!(
        glwe.polynomial_size() == glwe_secret_key.polynomial_size(),
        "Mismatch between PolynomialSize of ciphertext and secret key. \
        Got {:?} in ciphertext, and {:?} in secret key.",
        glwe.polynomial_size(),
        glwe_secret_key.polynomial_size()
    );
}

/// Encrypt the plaintext polynomial stored in the body of a [`GLWE ciphertext`](`GlweCiphertext`),
/// overwriting its mask.
pub fn encrypt_glwe_ciphertext_assign<KeyCont, OutputCont, Gen>(
    glwe_secret_key: &GlweSecretKey<KeyCont>,
    output: &mut GlweCiphertext<OutputCont>,
    noise_parameters: impl DispersionParameter,
    generator: &mut EncryptionRandomGenerator<Gen>,
) where
    KeyCont: Container<Element = u64>,
    OutputCont: ContainerMut<Element = u64>,
    Gen: ByteRandomGenerator,
{
    assert_glwe_and_key_match(glwe_secret_key, output);

    let (mut mask, mut body) = output.get_mut_mask_and_body();

    generator.fill_slice_with_random_mask(mask.as_mut());

    generator.unsigned_torus_slice_wrapping_add_random_noise_assign(body.as_mut(), noise_parameters);

    polynomial_wrapping_add_multisum_assign(
        &mut body,
        &mask.as_view(),
        &glwe_secret_key.as_polynomial_list(),
    );
}

/// Encrypt a plaintext polynomial in an output [`GLWE ciphertext`](`GlweCiphertext`).
pub fn encrypt_glwe_ciphertext<KeyCont, InputCont, OutputCont, Gen>(
    glwe_secret_key: &GlweSecretKey<KeyCont>,
    input_plaintext_list: &Polynomial<InputCont>,
    output_glwe_ciphertext: &mut GlweCiphertext<OutputCont>,
    noise_parameters: impl DispersionParameter,
    generator: &mut EncryptionRandomGenerator<Gen>,
) where
    KeyCont: Container<Element = u64>,
    InputCont: Container<Element = u64>,
    OutputCont: ContainerMut<Element = u64>,
    Gen: ByteRandomGenerator,
{
    assert!(
        output_glwe_ciphertext.polynomial_size() == input_plaintext_list.polynomial_size(),
        "Mismatch between PolynomialSize of output cipertext and input plaintexts. \
        Got {:?} in output, and {:?} in input.",
        output_glwe_ciphertext.polynomial_size(),
        input_plaintext_list.polynomial_size()
    );

    output_glwe_ciphertext
        .get_mut_body()
        .as_mut()
        .copy_from_slice(input_plaintext_list.as_ref());

    encrypt_glwe_ciphertext_assign(
        glwe_secret_key,
        output_glwe_ciphertext,
        noise_parameters,
        generator,
    );
}

/// Encrypt consecutive plaintext polynomials in an output
/// [`GLWE ciphertext list`](`GlweCiphertextList`), drawing from the generator sequentially.
pub fn encrypt_glwe_ciphertext_list<KeyCont, OutputCont, Gen>(
    glwe_secret_key: &GlweSecretKey<KeyCont>,
    input_plaintext_list: &[u64],
    output_glwe_ciphertext_list: &mut GlweCiphertextList<OutputCont>,
    noise_parameters: impl DispersionParameter,
    generator: &mut EncryptionRandomGenerator<Gen>,
) where
    KeyCont: Container<Element = u64>,
    OutputCont: ContainerMut<Element = u64>,
    Gen: ByteRandomGenerator,
{
    let polynomial_size = output_glwe_ciphertext_list.polynomial_size();
    assert!(
        polynomial_size.0 * output_glwe_ciphertext_list.glwe_ciphertext_count().0
            == input_plaintext_list.len(),
        "Mismatch between required number of plaintexts: {} ({:?} * {:?}) and input \
        PlaintextCount: {:?}",
        polynomial_size.0 * output_glwe_ciphertext_list.glwe_ciphertext_count().0,
        polynomial_size,
        output_glwe_ciphertext_list.glwe_ciphertext_count(),
        input_plaintext_list.len()
    );

    for (mut ciphertext, encoded) in output_glwe_ciphertext_list
        .iter_mut()
        .zip(input_plaintext_list.chunks_exact(polynomial_size.0))
    {
        encrypt_glwe_ciphertext(
            glwe_secret_key,
            &Polynomial::from_container(encoded),
            &mut ciphertext,
            noise_parameters,
            generator,
        );
    }
}

/// Decrypt a [`GLWE ciphertext`](`GlweCiphertext`) into a noisy plaintext polynomial.
pub fn decrypt_glwe_ciphertext<KeyCont, InputCont, OutputCont>(
    glwe_secret_key: &GlweSecretKey<KeyCont>,
    input_glwe_ciphertext: &GlweCiphertext<InputCont>,
    output_plaintext_list: &mut Polynomial<OutputCont>,
) where
    KeyCont: Container<Element = u64>,
    InputCont: Container<Element = u64>,
    OutputCont: ContainerMut<Element = u64>,
{
    assert_glwe_and_key_match(glwe_secret_key, input_glwe_ciphertext);
    assert!(
        output_plaintext_list.polynomial_size() == input_glwe_ciphertext.polynomial_size(),
        "Mismatched output PolynomialSize {:?} and input PolynomialSize {:?}",
        output_plaintext_list.polynomial_size(),
        input_glwe_ciphertext.polynomial_size()
    );

    let (mask, body) = input_glwe_ciphertext.get_mask_and_body();
    output_plaintext_list
        .as_mut()
        .copy_from_slice(body.as_ref());
    polynomial_wrapping_sub_multisum_assign(
        output_plaintext_list,
        &mask,
        &glwe_secret_key.as_polynomial_list(),
    );
}

/// Trivially encrypt a plaintext polynomial in a [`GLWE ciphertext`](`GlweCiphertext`): the mask is
/// set to zero and the body to the plaintexts.
pub fn trivially_encrypt_glwe_ciphertext<InputCont, OutputCont>(
    output: &mut GlweCiphertext<OutputCont>,
    encoded: &Polynomial<InputCont>,
) where
    InputCont: Container<Element = u64>,
    OutputCont: ContainerMut<Element = u64>,
{
    assert!(
        encoded.polynomial_size() == output.polynomial_size(),
        "Mismatched input PolynomialSize {:?} and output PolynomialSize {:?}",
        encoded.polynomial_size(),
        output.polynomial_size()
    );

    let (mut mask, mut body) = output.get_mut_mask_and_body();

    mask.as_mut().fill(0);
    body.as_mut().copy_from_slice(encoded.as_ref());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::allocate_and_generate_new_binary_glwe_secret_key;
    use crate::commons::dispersion::StandardDev;
    use crate::commons::parameters::{GlweCiphertextCount, GlweDimension, GlweSize, PolynomialSize};
    use crate::commons::test_tools::*;

    #[test]
    fn encrypt_decrypt_glwe() {
        let glwe_dimension = GlweDimension(1);
        let polynomial_size = PolynomialSize(1024);
        let std = StandardDev(0.00000000000000029403601535432533);

        let mut secret_generator = new_secret_random_generator();
        let mut encryption_generator = new_encryption_random_generator();
        let glwe_secret_key = allocate_and_generate_new_binary_glwe_secret_key(
            glwe_dimension,
            polynomial_size,
            &mut secret_generator,
        );

        let messages: Vec<u64> = (0..polynomial_size.0 as u64).map(|i| encode(i % 16, 5)).collect();
        let mut glwe =
            GlweCiphertextOwned::new(0, glwe_dimension.to_glwe_size(), polynomial_size);
        encrypt_glwe_ciphertext(
            &glwe_secret_key,
            &Polynomial::from_container(messages.as_slice()),
            &mut glwe,
            std,
            &mut encryption_generator,
        );

        let mut decrypted = PolynomialOwned::new(0, polynomial_size);
        decrypt_glwe_ciphertext(&glwe_secret_key, &glwe, &mut decrypted);

        for (i, &plaintext) in decrypted.iter().enumerate() {
            assert_eq!(decode(plaintext, 5), i as u64 % 16);
        }
    }

    #[test]
    fn encrypt_decrypt_glwe_list() {
        let glwe_size = GlweSize(3);
        let polynomial_size = PolynomialSize(256);
        let std = StandardDev(0.00000000000000029403601535432533);

        let mut secret_generator = new_secret_random_generator();
        let mut encryption_generator = new_encryption_random_generator();
        let glwe_secret_key = allocate_and_generate_new_binary_glwe_secret_key(
            glwe_size.to_glwe_dimension(),
            polynomial_size,
            &mut secret_generator,
        );

        let messages: Vec<u64> = (0..2 * polynomial_size.0 as u64)
            .map(|i| encode(i % 8, 4))
            .collect();
        let mut list =
            GlweCiphertextListOwned::new(0, glwe_size, polynomial_size, GlweCiphertextCount(2));
        encrypt_glwe_ciphertext_list(
            &glwe_secret_key,
            &messages,
            &mut list,
            std,
            &mut encryption_generator,
        );

        let mut decrypted = PolynomialOwned::new(0, polynomial_size);
        for (glwe, expected) in list.iter().zip(messages.chunks_exact(polynomial_size.0)) {
            decrypt_glwe_ciphertext(&glwe_secret_key, &glwe, &mut decrypted);
            for (&plaintext, &message) in decrypted.iter().zip(expected) {
                assert_eq!(decode(plaintext, 4), decode(message, 4));
            }
        }
    }

    #[test]
    fn trivial_glwe_decrypts_to_plaintexts() {
        let polynomial_size = PolynomialSize(8);
        let mut secret_generator = new_secret_random_generator();
        let glwe_secret_key = allocate_and_generate_new_binary_glwe_secret_key(
            GlweDimension(2),
            polynomial_size,
            &mut secret_generator,
        );
        let encoded = PolynomialOwned::new(1 << 62, polynomial_size);
        let mut glwe = GlweCiphertextOwned::new(5, GlweSize(3), polynomial_size);

        trivially_encrypt_glwe_ciphertext(&mut glwe, &encoded);

        let mut decrypted = PolynomialOwned::new(0, polynomial_size);
        decrypt_glwe_ciphertext(&glwe_secret_key, &glwe, &mut decrypted);
        assert_eq!(decrypted, encoded);
    }
}
