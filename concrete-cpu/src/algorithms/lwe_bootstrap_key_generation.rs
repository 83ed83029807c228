//! Module containing primitives pertaining to the generation of
//! [`standard LWE bootstrap keys`](`LweBootstrapKey`) and
//! [`seeded standard LWE bootstrap keys`](`SeededLweBootstrapKey`).

use crate::algorithms::ggsw_encryption::*;
use crate::commons::dispersion::DispersionParameter;
use crate::commons::generators::EncryptionRandomGenerator;
use crate::commons::math::random::{
    ActivatedRandomGenerator, ByteRandomGenerator, ParallelByteRandomGenerator, Seeder,
};
use crate::commons::parameters::*;
use crate::commons::traits::{Container, ContainerMut};
use crate::entities::*;
use rayon::prelude::*;

fn assert_keys_match_bsk<InputKeyCont, OutputKeyCont>(
    input_lwe_secret_key: &LweSecretKey<InputKeyCont>,
    output_glwe_secret_key: &GlweSecretKey<OutputKeyCont>,
    input_lwe_dimension: LweDimension,
    glwe_size: GlweSize,
    polynomial_size: PolynomialSize,
) where
    InputKeyCont: Container<Element = u64>,
    OutputKeyCont: Container<Element = u64>,
{
    assert!(
        input_lwe_dimension == input_lwe_secret_key.lwe_dimension(),
        "Mismatched LweDimension between input LWE secret key and LWE bootstrap key. \
        Input LWE secret key LweDimension: {:?}, LWE bootstrap key input LweDimension {:?}.",
        input_lwe_secret_key.lwe_dimension(),
        input_lwe_dimension
    );

    assert!(
        glwe_size == output_glwe_secret_key.glwe_dimension().to_glwe_size(),
        "Mismatched GlweSize between output GLWE secret key and LWE bootstrap key. \
        Output GLWE secret key GlweSize: {:?}, LWE bootstrap key GlweSize {:?}.",
        output_glwe_secret_key.glwe_dimension().to_glwe_size(),
        glwe_size
    );

    assert!(
        polynomial_size == output_glwe_secret_key.polynomial_size(),
        "Mismatched PolynomialSize between output GLWE secret key and LWE bootstrap key. \
        Output GLWE secret key PolynomialSize: {:?}, LWE bootstrap key PolynomialSize {:?}.",
        output_glwe_secret_key.polynomial_size(),
        polynomial_size
    );
}

/// Fill an [`LWE bootstrap key`](`LweBootstrapKey`) with an actual bootstrapping key constructed
/// from an input key [`LWE secret key`](`LweSecretKey`) and an output key
/// [`GLWE secret key`](`GlweSecretKey`).
///
/// The `i`-th GGSW ciphertext of the key encrypts the `i`-th coefficient of the input key.
pub fn generate_lwe_bootstrap_key<InputKeyCont, OutputKeyCont, OutputCont, Gen>(
    input_lwe_secret_key: &LweSecretKey<InputKeyCont>,
    output_glwe_secret_key: &GlweSecretKey<OutputKeyCont>,
    output: &mut LweBootstrapKey<OutputCont>,
    noise_parameters: impl DispersionParameter,
    generator: &mut EncryptionRandomGenerator<Gen>,
) where
    InputKeyCont: Container<Element = u64>,
    OutputKeyCont: Container<Element = u64>,
    OutputCont: ContainerMut<Element = u64>,
    Gen: ByteRandomGenerator,
{
    assert_keys_match_bsk(
        input_lwe_secret_key,
        output_glwe_secret_key,
        output.input_lwe_dimension(),
        output.glwe_size(),
        output.polynomial_size(),
    );

    let gen_iter = generator
        .fork_bsk_to_ggsw(
            output.input_lwe_dimension(),
            output.decomposition_level_count(),
            output.glwe_size(),
            output.polynomial_size(),
        )
        .expect("Failed to split generator into ggsw");

    for ((mut ggsw, &input_key_element), mut generator) in output
        .iter_mut()
        .zip(input_lwe_secret_key.as_ref())
        .zip(gen_iter)
    {
        encrypt_constant_ggsw_ciphertext(
            output_glwe_secret_key,
            &mut ggsw,
            Cleartext(input_key_element),
            noise_parameters,
            &mut generator,
        );
    }
}

/// Allocate a new [`LWE bootstrap key`](`LweBootstrapKey`) and fill it with an actual
/// bootstrapping key constructed from an input key [`LWE secret key`](`LweSecretKey`) and an
/// output key [`GLWE secret key`](`GlweSecretKey`).
pub fn allocate_and_generate_new_lwe_bootstrap_key<InputKeyCont, OutputKeyCont, Gen>(
    input_lwe_secret_key: &LweSecretKey<InputKeyCont>,
    output_glwe_secret_key: &GlweSecretKey<OutputKeyCont>,
    decomp_base_log: DecompositionBaseLog,
    decomp_level_count: DecompositionLevelCount,
    noise_parameters: impl DispersionParameter,
    generator: &mut EncryptionRandomGenerator<Gen>,
) -> LweBootstrapKeyOwned
where
    InputKeyCont: Container<Element = u64>,
    OutputKeyCont: Container<Element = u64>,
    Gen: ByteRandomGenerator,
{
    let mut bsk = LweBootstrapKeyOwned::new(
        0,
        output_glwe_secret_key.glwe_dimension().to_glwe_size(),
        output_glwe_secret_key.polynomial_size(),
        decomp_base_log,
        decomp_level_count,
        input_lwe_secret_key.lwe_dimension(),
    );

    generate_lwe_bootstrap_key(
        input_lwe_secret_key,
        output_glwe_secret_key,
        &mut bsk,
        noise_parameters,
        generator,
    );

    bsk
}

/// Parallel variant of [`generate_lwe_bootstrap_key`], yielding the same key.
pub fn par_generate_lwe_bootstrap_key<InputKeyCont, OutputKeyCont, OutputCont, Gen>(
    input_lwe_secret_key: &LweSecretKey<InputKeyCont>,
    output_glwe_secret_key: &GlweSecretKey<OutputKeyCont>,
    output: &mut LweBootstrapKey<OutputCont>,
    noise_parameters: impl DispersionParameter + Sync,
    generator: &mut EncryptionRandomGenerator<Gen>,
) where
    InputKeyCont: Container<Element = u64> + Sync,
    OutputKeyCont: Container<Element = u64> + Sync,
    OutputCont: ContainerMut<Element = u64>,
    Gen: ParallelByteRandomGenerator,
{
    assert_keys_match_bsk(
        input_lwe_secret_key,
        output_glwe_secret_key,
        output.input_lwe_dimension(),
        output.glwe_size(),
        output.polynomial_size(),
    );

    let gen_iter = generator
        .par_fork_bsk_to_ggsw(
            output.input_lwe_dimension(),
            output.decomposition_level_count(),
            output.glwe_size(),
            output.polynomial_size(),
        )
        .expect("Failed to split generator into ggsw");

    output
        .par_iter_mut()
        .zip(input_lwe_secret_key.as_ref().par_iter())
        .zip(gen_iter)
        .for_each(|((mut ggsw, &input_key_element), mut generator)| {
            par_encrypt_constant_ggsw_ciphertext(
                output_glwe_secret_key,
                &mut ggsw,
                Cleartext(input_key_element),
                noise_parameters,
                &mut generator,
            );
        });
}

/// Fill a [`seeded LWE bootstrap key`](`SeededLweBootstrapKey`) with an actual seeded
/// bootstrapping key constructed from an input key [`LWE secret key`](`LweSecretKey`) and an
/// output key [`GLWE secret key`](`GlweSecretKey`).
///
/// The masks are drawn from a generator seeded by the compression seed of the key, the noise from
/// `noise_seeder`.
pub fn generate_seeded_lwe_bootstrap_key<InputKeyCont, OutputKeyCont, OutputCont, NoiseSeeder>(
    input_lwe_secret_key: &LweSecretKey<InputKeyCont>,
    output_glwe_secret_key: &GlweSecretKey<OutputKeyCont>,
    output: &mut SeededLweBootstrapKey<OutputCont>,
    noise_parameters: impl DispersionParameter,
    noise_seeder: &mut NoiseSeeder,
) where
    InputKeyCont: Container<Element = u64>,
    OutputKeyCont: Container<Element = u64>,
    OutputCont: ContainerMut<Element = u64>,
    // Maybe Sized allows to pass Box<dyn Seeder>.
    NoiseSeeder: Seeder + ?Sized,
{
    assert_keys_match_bsk(
        input_lwe_secret_key,
        output_glwe_secret_key,
        output.input_lwe_dimension(),
        output.glwe_size(),
        output.polynomial_size(),
    );

    let mut generator = EncryptionRandomGenerator::<ActivatedRandomGenerator>::new(
        output.compression_seed().seed,
        noise_seeder,
    );

    let gen_iter = generator
        .fork_bsk_to_ggsw(
            output.input_lwe_dimension(),
            output.decomposition_level_count(),
            output.glwe_size(),
            output.polynomial_size(),
        )
        .expect("Failed to split generator into ggsw");

    let decomp_base_log = output.decomposition_base_log();
    let decomp_level_count = output.decomposition_level_count();

    for ((ggsw_bodies, &input_key_element), mut generator) in output
        .iter_mut()
        .zip(input_lwe_secret_key.as_ref())
        .zip(gen_iter)
    {
        encrypt_constant_seeded_ggsw_ciphertext_with_existing_generator(
            output_glwe_secret_key,
            ggsw_bodies,
            decomp_base_log,
            decomp_level_count,
            Cleartext(input_key_element),
            noise_parameters,
            &mut generator,
        );
    }
}

/// Parallel variant of [`generate_seeded_lwe_bootstrap_key`], yielding the same key.
pub fn par_generate_seeded_lwe_bootstrap_key<
    InputKeyCont,
    OutputKeyCont,
    OutputCont,
    NoiseSeeder,
>(
    input_lwe_secret_key: &LweSecretKey<InputKeyCont>,
    output_glwe_secret_key: &GlweSecretKey<OutputKeyCont>,
    output: &mut SeededLweBootstrapKey<OutputCont>,
    noise_parameters: impl DispersionParameter + Sync,
    noise_seeder: &mut NoiseSeeder,
) where
    InputKeyCont: Container<Element = u64> + Sync,
    OutputKeyCont: Container<Element = u64> + Sync,
    OutputCont: ContainerMut<Element = u64>,
    // Maybe Sized allows to pass Box<dyn Seeder>.
    NoiseSeeder: Seeder + ?Sized,
{
    assert_keys_match_bsk(
        input_lwe_secret_key,
        output_glwe_secret_key,
        output.input_lwe_dimension(),
        output.glwe_size(),
        output.polynomial_size(),
    );

    let mut generator = EncryptionRandomGenerator::<ActivatedRandomGenerator>::new(
        output.compression_seed().seed,
        noise_seeder,
    );

    let gen_iter = generator
        .par_fork_bsk_to_ggsw(
            output.input_lwe_dimension(),
            output.decomposition_level_count(),
            output.glwe_size(),
            output.polynomial_size(),
        )
        .expect("Failed to split generator into ggsw");

    let decomp_base_log = output.decomposition_base_log();
    let decomp_level_count = output.decomposition_level_count();

    output
        .par_iter_mut()
        .zip(input_lwe_secret_key.as_ref().par_iter())
        .zip(gen_iter)
        .for_each(|((ggsw_bodies, &input_key_element), mut generator)| {
            encrypt_constant_seeded_ggsw_ciphertext_with_existing_generator(
                output_glwe_secret_key,
                ggsw_bodies,
                decomp_base_log,
                decomp_level_count,
                Cleartext(input_key_element),
                noise_parameters,
                &mut generator,
            );
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::*;
    use crate::commons::dispersion::StandardDev;
    use crate::commons::generators::DeterministicSeeder;
    use crate::commons::math::random::CompressionSeed;
    use crate::commons::test_tools::*;

    #[test]
    fn every_generation_path_agrees() {
        let lwe_dimension = LweDimension(20);
        let glwe_dimension = GlweDimension(1);
        let polynomial_size = PolynomialSize(256);
        let base_log = DecompositionBaseLog(8);
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

        let mask_seed = random_seed();
        let noise_seed = random_seed();
        let new_generator = || {
            EncryptionRandomGenerator::<ActivatedRandomGenerator>::new(
                mask_seed,
                &mut DeterministicSeeder::<ActivatedRandomGenerator>::new(noise_seed),
            )
        };
        let new_bsk = || {
            LweBootstrapKeyOwned::new(
                0,
                glwe_dimension.to_glwe_size(),
                polynomial_size,
                base_log,
                level_count,
                lwe_dimension,
            )
        };
        let new_seeded_bsk = || {
            SeededLweBootstrapKeyOwned::new(
                0,
                glwe_dimension.to_glwe_size(),
                polynomial_size,
                base_log,
                level_count,
                lwe_dimension,
                CompressionSeed::from(mask_seed),
            )
        };

        let sequential = allocate_and_generate_new_lwe_bootstrap_key(
            &lwe_sk,
            &glwe_sk,
            base_log,
            level_count,
            std,
            &mut new_generator(),
        );

        let mut parallel = new_bsk();
        par_generate_lwe_bootstrap_key(&lwe_sk, &glwe_sk, &mut parallel, std, &mut new_generator());
        assert_eq!(sequential, parallel);

        let mut seeded = new_seeded_bsk();
        generate_seeded_lwe_bootstrap_key(
            &lwe_sk,
            &glwe_sk,
            &mut seeded,
            std,
            &mut DeterministicSeeder::<ActivatedRandomGenerator>::new(noise_seed),
        );
        let mut par_seeded = new_seeded_bsk();
        par_generate_seeded_lwe_bootstrap_key(
            &lwe_sk,
            &glwe_sk,
            &mut par_seeded,
            std,
            &mut DeterministicSeeder::<ActivatedRandomGenerator>::new(noise_seed),
        );
        assert_eq!(seeded, par_seeded);

        let mut decompressed = new_bsk();
        decompress_seeded_lwe_bootstrap_key(&mut decompressed, &seeded);
        assert_eq!(decompressed, sequential);

        let mut par_decompressed = new_bsk();
        par_decompress_seeded_lwe_bootstrap_key(&mut par_decompressed, &seeded);
        assert_eq!(par_decompressed, sequential);

        for (ggsw, &key_bit) in sequential.iter().zip(lwe_sk.as_ref()) {
            assert_eq!(
                decrypt_constant_ggsw_ciphertext(&glwe_sk, &ggsw),
                Cleartext(key_bit)
            );
        }
    }
}
