//! Module containing primitives pertaining to [`GGSW ciphertext`](`GgswCiphertext`) encryption.

use crate::algorithms::glwe_encryption::{decrypt_glwe_ciphertext, encrypt_glwe_ciphertext_assign};
use crate::algorithms::slice_algorithms::*;
use crate::commons::dispersion::DispersionParameter;
use crate::commons::generators::EncryptionRandomGenerator;
use crate::commons::math::decomposition::{DecompositionLevel, DecompositionTerm};
use crate::commons::math::random::{ByteRandomGenerator, ParallelByteRandomGenerator};
use crate::commons::numeric::round_shift_right;
use crate::commons::parameters::{DecompositionBaseLog, DecompositionLevelCount};
use crate::commons::traits::{Container, ContainerMut};
use crate::entities::*;
use rayon::prelude::*;

/// The factor by which the secret key polynomials are scaled in the level matrix of the given
/// level: `-cleartext * q / B^level`.
pub fn ggsw_encryption_multiplicative_factor(
    decomp_level: DecompositionLevel,
    decomp_base_log: DecompositionBaseLog,
    cleartext: Cleartext,
) -> u64 {
    DecompositionTerm::new(decomp_level, decomp_base_log, cleartext.0.wrapping_neg())
        .to_recomposition_summand()
}

fn assert_ggsw_and_key_match<KeyCont, OutputCont>(
    glwe_secret_key: &GlweSecretKey<KeyCont>,
    output: &GgswCiphertext<OutputCont>,
) where
    KeyCont: Container<Element = u64>,
    OutputCont: Container<Element = u64>,
{
    assert!(
        output.polynomial_size() == glwe_secret_key.polynomial_size(),
        "Mismatch between polynomial sizes of output ciphertexts and input secret key. \
        Got {:?} in output, and {:?} in secret key.",
        output.polynomial_size(),
        glwe_secret_key.polynomial_size()
    );

    assert!(
        output.glwe_size().to_glwe_dimension() == glwe_secret_key.glwe_dimension(),
        "Mismatch between GlweDimension of output ciphertexts and input secret key. \
        Got {:?} in output, and {:?} in secret key.",
        output.glwe_size().to_glwe_dimension(),
        glwe_secret_key.glwe_dimension()
    );
}

/// Encrypt a constant cleartext in an output [`GGSW ciphertext`](`GgswCiphertext`).
///
/// Row `i < k` of the level matrix of level `j` encrypts `-m * s_i * q / B^j`, the last row
/// encrypts the constant polynomial `m * q / B^j`.
pub fn encrypt_constant_ggsw_ciphertext<KeyCont, OutputCont, Gen>(
    glwe_secret_key: &GlweSecretKey<KeyCont>,
    output: &mut GgswCiphertext<OutputCont>,
    cleartext: Cleartext,
    noise_parameters: impl DispersionParameter,
    generator: &mut EncryptionRandomGenerator<Gen>,
) where
    KeyCont: Container<Element = u64>,
    OutputCont: ContainerMut<Element = u64>,
    Gen: ByteRandomGenerator,
{
    assert_ggsw_and_key_match(glwe_secret_key, output);

    // Generators used to have same sequential and parallel key generation
    let gen_iter = generator
        .fork_ggsw_to_ggsw_levels(
            output.decomposition_level_count(),
            output.glwe_size(),
            output.polynomial_size(),
        )
        .expect("Failed to split generator into ggsw levels");

    let decomp_base_log = output.decomposition_base_log();

    for (mut level_matrix, mut generator) in output.iter_mut().zip(gen_iter) {
        let factor = ggsw_encryption_multiplicative_factor(
            level_matrix.decomposition_level(),
            decomp_base_log,
            cleartext,
        );

        encrypt_constant_ggsw_level_matrix(
            glwe_secret_key,
            &mut level_matrix,
            factor,
            noise_parameters,
            &mut generator,
        );
    }
}

/// Parallel variant of [`encrypt_constant_ggsw_ciphertext`], the level matrices being encrypted
/// concurrently.
pub fn par_encrypt_constant_ggsw_ciphertext<KeyCont, OutputCont, Gen>(
    glwe_secret_key: &GlweSecretKey<KeyCont>,
    output: &mut GgswCiphertext<OutputCont>,
    cleartext: Cleartext,
    noise_parameters: impl DispersionParameter + Sync,
    generator: &mut EncryptionRandomGenerator<Gen>,
) where
    KeyCont: Container<Element = u64> + Sync,
    OutputCont: ContainerMut<Element = u64>,
    Gen: ParallelByteRandomGenerator,
{
    assert_ggsw_and_key_match(glwe_secret_key, output);

    // Generators used to have same sequential and parallel key generation
    let gen_iter = generator
        .par_fork_ggsw_to_ggsw_levels(
            output.decomposition_level_count(),
            output.glwe_size(),
            output.polynomial_size(),
        )
        .expect("Failed to split generator into ggsw levels");

    let decomp_base_log = output.decomposition_base_log();

    output
        .par_iter_mut()
        .zip(gen_iter)
        .for_each(|(mut level_matrix, mut generator)| {
            let factor = ggsw_encryption_multiplicative_factor(
                level_matrix.decomposition_level(),
                decomp_base_log,
                cleartext,
            );

            encrypt_constant_ggsw_level_matrix(
                glwe_secret_key,
                &mut level_matrix,
                factor,
                noise_parameters,
                &mut generator,
            );
        });
}

fn encrypt_constant_ggsw_level_matrix<KeyCont, OutputCont, Gen>(
    glwe_secret_key: &GlweSecretKey<KeyCont>,
    level_matrix: &mut GgswLevelMatrix<OutputCont>,
    factor: u64,
    noise_parameters: impl DispersionParameter,
    generator: &mut EncryptionRandomGenerator<Gen>,
) where
    KeyCont: Container<Element = u64>,
    OutputCont: ContainerMut<Element = u64>,
    Gen: ByteRandomGenerator,
{
    // We iterate over the rows of the level matrix, the last row needs special treatment
    let gen_iter = generator
        .fork_ggsw_level_to_glwe(level_matrix.glwe_size(), level_matrix.polynomial_size())
        .expect("Failed to split generator into glwe");

    let last_row_index = level_matrix.glwe_size().0 - 1;

    for ((row_index, mut row_as_glwe), mut generator) in level_matrix
        .as_mut_glwe_list()
        .iter_mut()
        .enumerate()
        .zip(gen_iter)
    {
        encrypt_constant_ggsw_level_matrix_row(
            glwe_secret_key,
            (row_index, last_row_index),
            factor,
            &mut row_as_glwe,
            noise_parameters,
            &mut generator,
        );
    }
}

fn encrypt_constant_ggsw_level_matrix_row<KeyCont, OutputCont, Gen>(
    glwe_secret_key: &GlweSecretKey<KeyCont>,
    (row_index, last_row_index): (usize, usize),
    factor: u64,
    row_as_glwe: &mut GlweCiphertext<OutputCont>,
    noise_parameters: impl DispersionParameter,
    generator: &mut EncryptionRandomGenerator<Gen>,
) where
    KeyCont: Container<Element = u64>,
    OutputCont: ContainerMut<Element = u64>,
    Gen: ByteRandomGenerator,
{
    if row_index < last_row_index {
        // Not the last row
        let sk_poly_list = glwe_secret_key.as_polynomial_list();
        let sk_poly = sk_poly_list.get(row_index);

        // Copy the key polynomial to the output body, to avoid allocating a temporary buffer
        let mut body = row_as_glwe.get_mut_body();
        body.as_mut().copy_from_slice(sk_poly.as_ref());

        slice_wrapping_scalar_mul_assign(body.as_mut(), factor);
    } else {
        // The last row needs a slightly different treatment
        let mut body = row_as_glwe.get_mut_body();

        body.as_mut().fill(0);
        body.as_mut()[0] = factor.wrapping_neg();
    }
    encrypt_glwe_ciphertext_assign(glwe_secret_key, row_as_glwe, noise_parameters, generator);
}

/// Encrypt a constant cleartext in a seeded GGSW ciphertext, stored as the `l * (k + 1)` bodies of
/// its rows.
///
/// The generator is consumed exactly like by [`encrypt_constant_ggsw_ciphertext`], so that
/// regenerating the masks from the mask seed yields the same ciphertext.
pub fn encrypt_constant_seeded_ggsw_ciphertext_with_existing_generator<KeyCont, Gen>(
    glwe_secret_key: &GlweSecretKey<KeyCont>,
    output_bodies: &mut [u64],
    decomp_base_log: DecompositionBaseLog,
    decomp_level_count: DecompositionLevelCount,
    cleartext: Cleartext,
    noise_parameters: impl DispersionParameter,
    generator: &mut EncryptionRandomGenerator<Gen>,
) where
    KeyCont: Container<Element = u64>,
    Gen: ByteRandomGenerator,
{
    let polynomial_size = glwe_secret_key.polynomial_size();
    let glwe_size = glwe_secret_key.glwe_dimension().to_glwe_size();
    let level_bodies_len = glwe_size.0 * polynomial_size.0;

    assert!(
        output_bodies.len() == decomp_level_count.0 * level_bodies_len,
        "Mismatch between the seeded GGSW length {} and the expected length {} \
        ({decomp_level_count:?} * {glwe_size:?} * {polynomial_size:?}).",
        output_bodies.len(),
        decomp_level_count.0 * level_bodies_len,
    );

    let gen_iter = generator
        .fork_ggsw_to_ggsw_levels(decomp_level_count, glwe_size, polynomial_size)
        .expect("Failed to split generator into ggsw levels");

    // A full row is encrypted in this buffer, only its body is kept
    let mut row_buffer = GlweCiphertextOwned::new(0, glwe_size, polynomial_size);
    let last_row_index = glwe_size.0 - 1;

    for (level_index, (level_bodies, mut generator)) in output_bodies
        .chunks_exact_mut(level_bodies_len)
        .zip(gen_iter)
        .enumerate()
    {
        let factor = ggsw_encryption_multiplicative_factor(
            DecompositionLevel(decomp_level_count.0 - level_index),
            decomp_base_log,
            cleartext,
        );

        let gen_iter = generator
            .fork_ggsw_level_to_glwe(glwe_size, polynomial_size)
            .expect("Failed to split generator into glwe");

        for ((row_index, row_body), mut generator) in level_bodies
            .chunks_exact_mut(polynomial_size.0)
            .enumerate()
            .zip(gen_iter)
        {
            encrypt_constant_ggsw_level_matrix_row(
                glwe_secret_key,
                (row_index, last_row_index),
                factor,
                &mut row_buffer,
                noise_parameters,
                &mut generator,
            );
            row_body.copy_from_slice(row_buffer.get_body().as_ref());
        }
    }
}

/// Decrypt the constant encrypted in a [`GGSW ciphertext`](`GgswCiphertext`).
///
/// The last row of the level matrix of the first decomposition level is decrypted and its
/// constant coefficient rounded to the closest multiple of `q / B`.
pub fn decrypt_constant_ggsw_ciphertext<KeyCont, InputCont>(
    glwe_secret_key: &GlweSecretKey<KeyCont>,
    ggsw_ciphertext: &GgswCiphertext<InputCont>,
) -> Cleartext
where
    KeyCont: Container<Element = u64>,
    InputCont: Container<Element = u64>,
{
    assert_ggsw_and_key_match(glwe_secret_key, ggsw_ciphertext);

    let level_matrix = ggsw_ciphertext
        .iter()
        .last()
        .expect("A GGSW ciphertext has at least one level");
    let level_matrix_as_glwe_list = level_matrix.as_glwe_list();
    let last_row = level_matrix_as_glwe_list
        .iter()
        .last()
        .expect("A GGSW level matrix has at least one row");

    let mut decrypted_plaintext_list = PolynomialOwned::new(0, ggsw_ciphertext.polynomial_size());
    decrypt_glwe_ciphertext(glwe_secret_key, &last_row, &mut decrypted_plaintext_list);

    let decomp_base_log = ggsw_ciphertext.decomposition_base_log();
    let cleartext = round_shift_right(
        decrypted_plaintext_list.as_ref()[0],
        u64::BITS as usize - decomp_base_log.0,
    ) & ((1u64 << decomp_base_log.0) - 1);

    Cleartext(cleartext)
}
