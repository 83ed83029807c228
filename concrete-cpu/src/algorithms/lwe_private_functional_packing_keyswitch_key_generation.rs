//! Module containing primitives pertaining to
//! [`LWE private functional packing keyswitch key generation`](`LwePrivateFunctionalPackingKeyswitchKey`).

use crate::algorithms::glwe_encryption::encrypt_glwe_ciphertext_list;
use crate::commons::dispersion::DispersionParameter;
use crate::commons::generators::EncryptionRandomGenerator;
use crate::commons::math::decomposition::{DecompositionLevel, DecompositionTerm};
use crate::commons::math::random::{ByteRandomGenerator, ParallelByteRandomGenerator};
use crate::commons::parameters::{DecompositionBaseLog, DecompositionLevelCount};
use crate::commons::traits::{Container, ContainerMut};
use crate::entities::*;
use rayon::prelude::*;

fn assert_keys_match_pfpksk<InputKeyCont, OutputKeyCont, KeyCont, PolyCont>(
    input_lwe_secret_key: &LweSecretKey<InputKeyCont>,
    output_glwe_secret_key: &GlweSecretKey<OutputKeyCont>,
    lwe_pfpksk: &LwePrivateFunctionalPackingKeyswitchKey<KeyCont>,
    polynomial: &Polynomial<PolyCont>,
) where
    InputKeyCont: Container<Element = u64>,
    OutputKeyCont: Container<Element = u64>,
    KeyCont: Container<Element = u64>,
    PolyCont: Container<Element = u64>,
{
    assert!(
        input_lwe_secret_key.lwe_dimension() == lwe_pfpksk.input_lwe_dimension(),
        "Mismatched LweDimension between input LWE secret key {:?} and \
        LwePrivateFunctionalPackingKeyswitchKey {:?}",
        input_lwe_secret_key.lwe_dimension(),
        lwe_pfpksk.input_lwe_dimension()
    );
    assert!(
        output_glwe_secret_key.glwe_dimension().to_glwe_size() == lwe_pfpksk.output_glwe_size(),
        "Mismatched GlweSize between output GLWE secret key {:?} and \
        LwePrivateFunctionalPackingKeyswitchKey {:?}",
        output_glwe_secret_key.glwe_dimension().to_glwe_size(),
        lwe_pfpksk.output_glwe_size()
    );
    assert!(
        output_glwe_secret_key.polynomial_size() == lwe_pfpksk.output_polynomial_size(),
        "Mismatched PolynomialSize between output GLWE secret key {:?} and \
        LwePrivateFunctionalPackingKeyswitchKey {:?}",
        output_glwe_secret_key.polynomial_size(),
        lwe_pfpksk.output_polynomial_size()
    );
    assert!(
        polynomial.polynomial_size() == lwe_pfpksk.output_polynomial_size(),
        "Mismatched PolynomialSize between packed polynomial {:?} and \
        LwePrivateFunctionalPackingKeyswitchKey {:?}",
        polynomial.polynomial_size(),
        lwe_pfpksk.output_polynomial_size()
    );
}

// Writes f(key_coefficient) * P * 2^(64 - j * base_log) for every level j, level 1 first.
fn fill_pfpksk_block_messages<PolyCont>(
    messages: &mut [u64],
    polynomial: &Polynomial<PolyCont>,
    function_of_key_coefficient: u64,
    decomp_base_log: DecompositionBaseLog,
    decomp_level_count: DecompositionLevelCount,
) where
    PolyCont: Container<Element = u64>,
{
    let polynomial_size = polynomial.polynomial_size().0;
    for (level, message) in (1..=decomp_level_count.0)
        .map(DecompositionLevel)
        .zip(messages.chunks_exact_mut(polynomial_size))
    {
        let factor = DecompositionTerm::new(level, decomp_base_log, function_of_key_coefficient)
            .to_recomposition_summand();
        for (out, &coefficient) in message.iter_mut().zip(polynomial.iter()) {
            *out = coefficient.wrapping_mul(factor);
        }
    }
}

/// Fill an [`LWE private functional packing keyswitch key`](`LwePrivateFunctionalPackingKeyswitchKey`)
/// switching from `input_lwe_secret_key` to `output_glwe_secret_key`, applying the linear function
/// `f` and multiplying by `polynomial`.
///
/// The input key is extended with a last coefficient equal to `-1`, used to switch the body of
/// the input ciphertext.
pub fn generate_lwe_private_functional_packing_keyswitch_key<
    InputKeyCont,
    OutputKeyCont,
    KeyCont,
    PolyCont,
    Gen,
    ScalarFunc,
>(
    input_lwe_secret_key: &LweSecretKey<InputKeyCont>,
    output_glwe_secret_key: &GlweSecretKey<OutputKeyCont>,
    lwe_pfpksk: &mut LwePrivateFunctionalPackingKeyswitchKey<KeyCont>,
    noise_parameters: impl DispersionParameter,
    generator: &mut EncryptionRandomGenerator<Gen>,
    f: ScalarFunc,
    polynomial: &Polynomial<PolyCont>,
) where
    InputKeyCont: Container<Element = u64>,
    OutputKeyCont: Container<Element = u64>,
    KeyCont: ContainerMut<Element = u64>,
    PolyCont: Container<Element = u64>,
    Gen: ByteRandomGenerator,
    ScalarFunc: Fn(u64) -> u64,
{
    assert_keys_match_pfpksk(
        input_lwe_secret_key,
        output_glwe_secret_key,
        lwe_pfpksk,
        polynomial,
    );

    let decomp_base_log = lwe_pfpksk.decomposition_base_log();
    let decomp_level_count = lwe_pfpksk.decomposition_level_count();
    let polynomial_size = lwe_pfpksk.output_polynomial_size();

    let mut messages = vec![0u64; decomp_level_count.0 * polynomial_size.0];

    let last_key_coefficient = [u64::MAX];
    let extended_key_iter = input_lwe_secret_key
        .as_ref()
        .iter()
        .chain(last_key_coefficient.iter());

    let gen_iter = generator
        .fork_pfpksk_to_pfpksk_chunks(
            decomp_level_count,
            lwe_pfpksk.output_glwe_size(),
            polynomial_size,
            input_lwe_secret_key.lwe_dimension().to_lwe_size(),
        )
        .expect("Failed to split generator into pfpksk chunks");

    for ((&key_coefficient, mut keyswitch_key_block), mut loop_generator) in extended_key_iter
        .zip(lwe_pfpksk.iter_mut())
        .zip(gen_iter)
    {
        fill_pfpksk_block_messages(
            &mut messages,
            polynomial,
            f(key_coefficient),
            decomp_base_log,
            decomp_level_count,
        );

        encrypt_glwe_ciphertext_list(
            output_glwe_secret_key,
            &messages,
            &mut keyswitch_key_block,
            noise_parameters,
            &mut loop_generator,
        );
    }
}

/// Parallel variant of [`generate_lwe_private_functional_packing_keyswitch_key`], yielding the
/// same key.
pub fn par_generate_lwe_private_functional_packing_keyswitch_key<
    InputKeyCont,
    OutputKeyCont,
    KeyCont,
    PolyCont,
    Gen,
    ScalarFunc,
>(
    input_lwe_secret_key: &LweSecretKey<InputKeyCont>,
    output_glwe_secret_key: &GlweSecretKey<OutputKeyCont>,
    lwe_pfpksk: &mut LwePrivateFunctionalPackingKeyswitchKey<KeyCont>,
    noise_parameters: impl DispersionParameter + Sync,
    generator: &mut EncryptionRandomGenerator<Gen>,
    f: ScalarFunc,
    polynomial: &Polynomial<PolyCont>,
) where
    InputKeyCont: Container<Element = u64> + Sync,
    OutputKeyCont: Container<Element = u64> + Sync,
    KeyCont: ContainerMut<Element = u64>,
    PolyCont: Container<Element = u64> + Sync,
    Gen: ParallelByteRandomGenerator,
    ScalarFunc: Fn(u64) -> u64 + Sync,
{
    assert_keys_match_pfpksk(
        input_lwe_secret_key,
        output_glwe_secret_key,
        lwe_pfpksk,
        polynomial,
    );

    let decomp_base_log = lwe_pfpksk.decomposition_base_log();
    let decomp_level_count = lwe_pfpksk.decomposition_level_count();
    let polynomial_size = lwe_pfpksk.output_polynomial_size();

    let last_key_coefficient = [u64::MAX];
    let extended_key_iter = input_lwe_secret_key
        .as_ref()
        .par_iter()
        .chain(last_key_coefficient.par_iter());

    let gen_iter = generator
        .par_fork_pfpksk_to_pfpksk_chunks(
            decomp_level_count,
            lwe_pfpksk.output_glwe_size(),
            polynomial_size,
            input_lwe_secret_key.lwe_dimension().to_lwe_size(),
        )
        .expect("Failed to split generator into pfpksk chunks");

    extended_key_iter
        .zip(lwe_pfpksk.par_iter_mut())
        .zip(gen_iter)
        .for_each(
            |((&key_coefficient, mut keyswitch_key_block), mut loop_generator)| {
                let mut messages = vec![0u64; decomp_level_count.0 * polynomial_size.0];
                fill_pfpksk_block_messages(
                    &mut messages,
                    polynomial,
                    f(key_coefficient),
                    decomp_base_log,
                    decomp_level_count,
                );

                encrypt_glwe_ciphertext_list(
                    output_glwe_secret_key,
                    &messages,
                    &mut keyswitch_key_block,
                    noise_parameters,
                    &mut loop_generator,
                );
            },
        );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::*;
    use crate::commons::dispersion::StandardDev;
    use crate::commons::generators::DeterministicSeeder;
    use crate::commons::math::random::ActivatedRandomGenerator;
    use crate::commons::parameters::*;
    use crate::commons::test_tools::*;

    #[test]
    fn sequential_and_parallel_generation_agree() {
        let lwe_dimension = LweDimension(10);
        let glwe_dimension = GlweDimension(2);
        let polynomial_size = PolynomialSize(64);
        let base_log = DecompositionBaseLog(7);
        let level_count = DecompositionLevelCount(3);
        let std = StandardDev(0.00000000000000029403601535432533);

        let mut secret_generator = new_secret_random_generator();
        let lwe_sk =
            allocate_and_generate_new_binary_lwe_secret_key(lwe_dimension, &mut secret_generator);
        let glwe_sk = allocate_and_generate_new_binary_glwe_secret_key(
            glwe_dimension,
            polynomial_size,
            &mut secret_generator,
        );
        let polynomial = glwe_sk.as_polynomial_list().get(1).as_ref().to_vec();
        let polynomial = Polynomial::from_container(polynomial);

        let mask_seed = random_seed();
        let noise_seed = random_seed();
        let new_generator = || {
            EncryptionRandomGenerator::<ActivatedRandomGenerator>::new(
                mask_seed,
                &mut DeterministicSeeder::<ActivatedRandomGenerator>::new(noise_seed),
            )
        };
        let new_key = || {
            LwePrivateFunctionalPackingKeyswitchKeyOwned::new(
                0,
                base_log,
                level_count,
                lwe_dimension,
                glwe_dimension.to_glwe_size(),
                polynomial_size,
            )
        };

        let mut sequential = new_key();
        generate_lwe_private_functional_packing_keyswitch_key(
            &lwe_sk,
            &glwe_sk,
            &mut sequential,
            std,
            &mut new_generator(),
            |x: u64| x.wrapping_neg(),
            &polynomial,
        );

        let mut parallel = new_key();
        par_generate_lwe_private_functional_packing_keyswitch_key(
            &lwe_sk,
            &glwe_sk,
            &mut parallel,
            std,
            &mut new_generator(),
            |x: u64| x.wrapping_neg(),
            &polynomial,
        );

        assert_eq!(sequential, parallel);
    }
}
