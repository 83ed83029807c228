//! Module containing primitives pertaining to [`LWE ciphertext`](`LweCiphertext`) encryption and
//! decryption.

use crate::algorithms::slice_algorithms::*;
use crate::commons::dispersion::DispersionParameter;
use crate::commons::generators::EncryptionRandomGenerator;
use crate::commons::math::random::{
    ActivatedRandomGenerator, ByteRandomGenerator, ParallelByteRandomGenerator, Seeder,
};
use crate::commons::traits::{Container, ContainerMut};
use crate::entities::*;
use rayon::prelude::*;

/// Convenience function to share the core logic of the LWE encryption between all functions needing
/// it.
pub(crate) fn fill_lwe_mask_and_body_for_encryption<KeyCont, Gen>(
    lwe_secret_key: &LweSecretKey<KeyCont>,
    output_mask: &mut [u64],
    output_body: &mut u64,
    encoded: Plaintext,
    noise_parameters: impl DispersionParameter,
    generator: &mut EncryptionRandomGenerator<Gen>,
) where
    KeyCont: Container<Element = u64>,
    Gen: ByteRandomGenerator,
{
    generator.fill_slice_with_random_mask(output_mask);

    // generate an error from the normal distribution described by std_dev
    *output_body = generator.random_noise(noise_parameters);

    // compute the multisum between the secret key and the mask
    *output_body = (*output_body).wrapping_add(slice_wrapping_dot_product(
        output_mask,
        lwe_secret_key.as_ref(),
    ));

    *output_body = (*output_body).wrapping_add(encoded.0);
}

/// Encrypt an input plaintext in an output [`LWE ciphertext`](`LweCiphertext`).
///
/// The mask is drawn uniformly from the mask stream of the generator, the body is
/// `<mask, key> + encoded + noise`.
pub fn encrypt_lwe_ciphertext<KeyCont, OutputCont, Gen>(
    lwe_secret_key: &LweSecretKey<KeyCont>,
    output: &mut LweCiphertext<OutputCont>,
    encoded: Plaintext,
    noise_parameters: impl DispersionParameter,
    generator: &mut EncryptionRandomGenerator<Gen>,
) where
    KeyCont: Container<Element = u64>,
    OutputCont: ContainerMut<Element = u64>,
    Gen: ByteRandomGenerator,
{
    assert!(
        output.lwe_dimension() == lwe_secret_key.lwe_dimension(),
        "Mismatch between LweDimension of output ciphertext and input secret key. \
        Got {:?} in output, and {:?} in secret key.",
        output.lwe_dimension(),
        lwe_secret_key.lwe_dimension()
    );

    let (mask, body) = output.get_mut_mask_and_body();

    fill_lwe_mask_and_body_for_encryption(
        lwe_secret_key,
        mask,
        body,
        encoded,
        noise_parameters,
        generator,
    );
}

/// Allocate a new [`LWE ciphertext`](`LweCiphertext`) and encrypt an input plaintext in it.
pub fn allocate_and_encrypt_new_lwe_ciphertext<KeyCont, Gen>(
    lwe_secret_key: &LweSecretKey<KeyCont>,
    encoded: Plaintext,
    noise_parameters: impl DispersionParameter,
    generator: &mut EncryptionRandomGenerator<Gen>,
) -> LweCiphertextOwned
where
    KeyCont: Container<Element = u64>,
    Gen: ByteRandomGenerator,
{
    let mut new_ct = LweCiphertextOwned::new(0, lwe_secret_key.lwe_dimension().to_lwe_size());

    encrypt_lwe_ciphertext(
        lwe_secret_key,
        &mut new_ct,
        encoded,
        noise_parameters,
        generator,
    );

    new_ct
}

/// Trivially encrypt an input plaintext in an output [`LWE ciphertext`](`LweCiphertext`): the mask
/// is set to zero and the body to the plaintext.
///
/// A trivial encryption decrypts to its plaintext under any secret key, it is not secure.
pub fn trivially_encrypt_lwe_ciphertext<OutputCont>(
    output: &mut LweCiphertext<OutputCont>,
    encoded: Plaintext,
) where
    OutputCont: ContainerMut<Element = u64>,
{
    let (mask, body) = output.get_mut_mask_and_body();
    mask.fill(0);
    *body = encoded.0;
}

/// Decrypt an [`LWE ciphertext`](`LweCiphertext`) and return a noisy plaintext.
pub fn decrypt_lwe_ciphertext<KeyCont, InputCont>(
    lwe_secret_key: &LweSecretKey<KeyCont>,
    lwe_ciphertext: &LweCiphertext<InputCont>,
) -> Plaintext
where
    KeyCont: Container<Element = u64>,
    InputCont: Container<Element = u64>,
{
    assert!(
        lwe_ciphertext.lwe_dimension() == lwe_secret_key.lwe_dimension(),
        "Mismatch between LweDimension of input ciphertext and input secret key. \
        Got {:?} in input, and {:?} in secret key.",
        lwe_ciphertext.lwe_dimension(),
        lwe_secret_key.lwe_dimension()
    );

    let (mask, body) = lwe_ciphertext.get_mask_and_body();

    Plaintext(body.wrapping_sub(slice_wrapping_dot_product(
        mask,
        lwe_secret_key.as_ref(),
    )))
}

/// Encrypt a slice of plaintexts in an output [`LWE ciphertext list`](`LweCiphertextList`).
///
/// The generator is forked once per ciphertext, so that the result is the same as the one of
/// [`par_encrypt_lwe_ciphertext_list`].
pub fn encrypt_lwe_ciphertext_list<KeyCont, OutputCont, Gen>(
    lwe_secret_key: &LweSecretKey<KeyCont>,
    output: &mut LweCiphertextList<OutputCont>,
    encoded: &[u64],
    noise_parameters: impl DispersionParameter,
    generator: &mut EncryptionRandomGenerator<Gen>,
) where
    KeyCont: Container<Element = u64>,
    OutputCont: ContainerMut<Element = u64>,
    Gen: ByteRandomGenerator,
{
    assert!(
        output.lwe_ciphertext_count().0 == encoded.len(),
        "Mismatch between number of output ciphertexts and input plaintexts. \
        Got {:?} plaintexts, and {:?} ciphertext.",
        encoded.len(),
        output.lwe_ciphertext_count()
    );

    let gen_iter = generator
        .fork_lwe_list_to_lwe(output.lwe_ciphertext_count(), output.lwe_size().to_lwe_dimension())
        .expect("Failed to split generator into lwe");

    for ((&encoded_plaintext, mut ciphertext), mut loop_generator) in
        encoded.iter().zip(output.iter_mut()).zip(gen_iter)
    {
        encrypt_lwe_ciphertext(
            lwe_secret_key,
            &mut ciphertext,
            Plaintext(encoded_plaintext),
            noise_parameters,
            &mut loop_generator,
        );
    }
}

/// Parallel variant of [`encrypt_lwe_ciphertext_list`].
pub fn par_encrypt_lwe_ciphertext_list<KeyCont, OutputCont, Gen>(
    lwe_secret_key: &LweSecretKey<KeyCont>,
    output: &mut LweCiphertextList<OutputCont>,
    encoded: &[u64],
    noise_parameters: impl DispersionParameter + Sync,
    generator: &mut EncryptionRandomGenerator<Gen>,
) where
    KeyCont: Container<Element = u64> + Sync,
    OutputCont: ContainerMut<Element = u64>,
    Gen: ParallelByteRandomGenerator,
{
    assert!(
        output.lwe_ciphertext_count().0 == encoded.len(),
        "Mismatch between number of output ciphertexts and input plaintexts. \
        Got {:?} plaintexts, and {:?} ciphertext.",
        encoded.len(),
        output.lwe_ciphertext_count()
    );

    let gen_iter = generator
        .par_fork_lwe_list_to_lwe(
            output.lwe_ciphertext_count(),
            output.lwe_size().to_lwe_dimension(),
        )
        .expect("Failed to split generator into lwe");

    encoded
        .par_iter()
        .zip(output.par_iter_mut())
        .zip(gen_iter)
        .for_each(|((&encoded_plaintext, mut ciphertext), mut loop_generator)| {
            encrypt_lwe_ciphertext(
                lwe_secret_key,
                &mut ciphertext,
                Plaintext(encoded_plaintext),
                noise_parameters,
                &mut loop_generator,
            );
        });
}

/// Decrypt an [`LWE ciphertext list`](`LweCiphertextList`) into a slice of noisy plaintexts.
pub fn decrypt_lwe_ciphertext_list<KeyCont, InputCont>(
    lwe_secret_key: &LweSecretKey<KeyCont>,
    input_lwe_ciphertext_list: &LweCiphertextList<InputCont>,
    output_plaintext_list: &mut [u64],
) where
    KeyCont: Container<Element = u64>,
    InputCont: Container<Element = u64>,
{
    assert!(
        output_plaintext_list.len() == input_lwe_ciphertext_list.lwe_ciphertext_count().0,
        "Mismatched output PlaintextCount {:?} and input LweCiphertextCount ({:?}).",
        output_plaintext_list.len(),
        input_lwe_ciphertext_list.lwe_ciphertext_count(),
    );

    for (ciphertext, output_plaintext) in input_lwe_ciphertext_list
        .iter()
        .zip(output_plaintext_list.iter_mut())
    {
        *output_plaintext = decrypt_lwe_ciphertext(lwe_secret_key, &ciphertext).0;
    }
}

/// Encrypt an input plaintext in an output [`seeded LWE ciphertext`](`SeededLweCiphertext`),
/// using an existing generator whose mask stream was seeded by the compression seed of the
/// output.
pub fn encrypt_seeded_lwe_ciphertext_with_existing_generator<KeyCont, Gen>(
    lwe_secret_key: &LweSecretKey<KeyCont>,
    output: &mut SeededLweCiphertext,
    encoded: Plaintext,
    noise_parameters: impl DispersionParameter,
    generator: &mut EncryptionRandomGenerator<Gen>,
) where
    KeyCont: Container<Element = u64>,
    Gen: ByteRandomGenerator,
{
    assert!(
        output.lwe_dimension() == lwe_secret_key.lwe_dimension(),
        "Mismatch between LweDimension of output ciphertext and input secret key. \
        Got {:?} in output, and {:?} in secret key.",
        output.lwe_dimension(),
        lwe_secret_key.lwe_dimension()
    );

    let mut mask = vec![0u64; lwe_secret_key.lwe_dimension().0];

    fill_lwe_mask_and_body_for_encryption(
        lwe_secret_key,
        &mut mask,
        output.get_mut_body(),
        encoded,
        noise_parameters,
        generator,
    )
}

/// Encrypt an input plaintext in an output [`seeded LWE ciphertext`](`SeededLweCiphertext`).
///
/// Only the body is stored: the mask is regenerated from the compression seed when the
/// ciphertext is decompressed. The noise is seeded by `noise_seeder`.
pub fn encrypt_seeded_lwe_ciphertext<KeyCont, NoiseSeeder>(
    lwe_secret_key: &LweSecretKey<KeyCont>,
    output: &mut SeededLweCiphertext,
    encoded: Plaintext,
    noise_parameters: impl DispersionParameter,
    noise_seeder: &mut NoiseSeeder,
) where
    KeyCont: Container<Element = u64>,
    // Maybe Sized allows to pass Box<dyn Seeder>.
    NoiseSeeder: Seeder + ?Sized,
{
    let mut generator = EncryptionRandomGenerator::<ActivatedRandomGenerator>::new(
        output.compression_seed().seed,
        noise_seeder,
    );

    encrypt_seeded_lwe_ciphertext_with_existing_generator(
        lwe_secret_key,
        output,
        encoded,
        noise_parameters,
        &mut generator,
    )
}
