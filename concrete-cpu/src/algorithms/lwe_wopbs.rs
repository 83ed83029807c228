//! Module containing the key generation primitives of the without padding bootstrap (WoP-PBS).
//!
//! The evaluation itself (bit extraction, circuit bootstrap and vertical packing) lives in
//! [`crate::fft_impl::wop_pbs`] as it runs in the Fourier domain.

use crate::algorithms::lwe_private_functional_packing_keyswitch_key_generation::*;
use crate::commons::dispersion::DispersionParameter;
use crate::commons::generators::EncryptionRandomGenerator;
use crate::commons::math::random::{ByteRandomGenerator, ParallelByteRandomGenerator};
use crate::commons::parameters::*;
use crate::commons::traits::{Container, ContainerMut};
use crate::entities::*;
use rayon::prelude::*;

fn assert_cbs_pfpksk_list_matches_key<OutputCont, GlweKeyCont>(
    output_cbs_pfpksk_list: &LwePrivateFunctionalPackingKeyswitchKeyList<OutputCont>,
    output_glwe_secret_key: &GlweSecretKey<GlweKeyCont>,
) where
    OutputCont: Container<Element = u64>,
    GlweKeyCont: Container<Element = u64>,
{
    assert!(
        output_cbs_pfpksk_list.lwe_pfpksk_count().0
            == output_glwe_secret_key.glwe_dimension().to_glwe_size().0,
        "Current list has {} pfpksk, need to have {} \
        (output_glwe_key.glwe_dimension().to_glwe_size())",
        output_cbs_pfpksk_list.lwe_pfpksk_count().0,
        output_glwe_secret_key.glwe_dimension().to_glwe_size().0
    );
}

// The polynomial packed by the last key of the list. It holds -1 as constant coefficient, the
// function x -> -x applied by every key turning it into 1.
fn last_cbs_polynomial(polynomial_size: PolynomialSize) -> PolynomialOwned {
    let mut polynomial = PolynomialOwned::new(0, polynomial_size);
    polynomial.as_mut()[0] = u64::MAX;
    polynomial
}

/// Allocate a new [`list of LWE private functional packing keyswitch
/// keys`](`LwePrivateFunctionalPackingKeyswitchKeyList`) and fill it with the keys required to
/// perform a circuit bootstrap.
pub fn allocate_and_generate_new_circuit_bootstrap_lwe_pfpksk_list<LweKeyCont, GlweKeyCont, Gen>(
    input_lwe_secret_key: &LweSecretKey<LweKeyCont>,
    output_glwe_secret_key: &GlweSecretKey<GlweKeyCont>,
    decomp_base_log: DecompositionBaseLog,
    decomp_level_count: DecompositionLevelCount,
    noise_parameters: impl DispersionParameter,
    generator: &mut EncryptionRandomGenerator<Gen>,
) -> LwePrivateFunctionalPackingKeyswitchKeyListOwned
where
    LweKeyCont: Container<Element = u64>,
    GlweKeyCont: Container<Element = u64>,
    Gen: ByteRandomGenerator,
{
    let mut cbs_pfpksk_list = LwePrivateFunctionalPackingKeyswitchKeyListOwned::new(
        0,
        decomp_base_log,
        decomp_level_count,
        input_lwe_secret_key.lwe_dimension(),
        output_glwe_secret_key.glwe_dimension().to_glwe_size(),
        output_glwe_secret_key.polynomial_size(),
        FunctionalPackingKeyswitchKeyCount(
            output_glwe_secret_key.glwe_dimension().to_glwe_size().0,
        ),
    );

    generate_circuit_bootstrap_lwe_pfpksk_list(
        &mut cbs_pfpksk_list,
        input_lwe_secret_key,
        output_glwe_secret_key,
        noise_parameters,
        generator,
    );

    cbs_pfpksk_list
}

/// Fill a [`list of LWE private functional packing keyswitch
/// keys`](`LwePrivateFunctionalPackingKeyswitchKeyList`) with the keys required to perform a
/// circuit bootstrap.
///
/// The `k + 1` keys all apply `x -> -x`. Key `p < k` multiplies by the `p`-th polynomial of the
/// output GLWE secret key, the last one by the constant polynomial `-1`.
pub fn generate_circuit_bootstrap_lwe_pfpksk_list<OutputCont, LweKeyCont, GlweKeyCont, Gen>(
    output_cbs_pfpksk_list: &mut LwePrivateFunctionalPackingKeyswitchKeyList<OutputCont>,
    input_lwe_secret_key: &LweSecretKey<LweKeyCont>,
    output_glwe_secret_key: &GlweSecretKey<GlweKeyCont>,
    noise_parameters: impl DispersionParameter,
    generator: &mut EncryptionRandomGenerator<Gen>,
) where
    OutputCont: ContainerMut<Element = u64>,
    LweKeyCont: Container<Element = u64>,
    GlweKeyCont: Container<Element = u64>,
    Gen: ByteRandomGenerator,
{
    assert_cbs_pfpksk_list_matches_key(output_cbs_pfpksk_list, output_glwe_secret_key);

    let gen_iter = generator
        .fork_cbs_pfpksk_to_pfpksk(
            output_cbs_pfpksk_list.decomposition_level_count(),
            output_glwe_secret_key.glwe_dimension().to_glwe_size(),
            output_glwe_secret_key.polynomial_size(),
            input_lwe_secret_key.lwe_dimension().to_lwe_size(),
            output_cbs_pfpksk_list.lwe_pfpksk_count(),
        )
        .expect("Failed to split generator into pfpksk");

    let last_polynomial = last_cbs_polynomial(output_glwe_secret_key.polynomial_size());
    let glwe_key_polynomials = output_glwe_secret_key.as_polynomial_list();

    for ((mut lwe_pfpksk, polynomial_to_encrypt), mut loop_generator) in output_cbs_pfpksk_list
        .iter_mut()
        .zip(
            glwe_key_polynomials
                .iter()
                .chain(core::iter::once(last_polynomial.as_view())),
        )
        .zip(gen_iter)
    {
        generate_lwe_private_functional_packing_keyswitch_key(
            input_lwe_secret_key,
            output_glwe_secret_key,
            &mut lwe_pfpksk,
            noise_parameters,
            &mut loop_generator,
            |x: u64| x.wrapping_neg(),
            &polynomial_to_encrypt,
        );
    }
}

/// Parallel variant of [`allocate_and_generate_new_circuit_bootstrap_lwe_pfpksk_list`].
pub fn par_allocate_and_generate_new_circuit_bootstrap_lwe_pfpksk_list<
    LweKeyCont,
    GlweKeyCont,
    Gen,
>(
    input_lwe_secret_key: &LweSecretKey<LweKeyCont>,
    output_glwe_secret_key: &GlweSecretKey<GlweKeyCont>,
    decomp_base_log: DecompositionBaseLog,
    decomp_level_count: DecompositionLevelCount,
    noise_parameters: impl DispersionParameter + Sync,
    generator: &mut EncryptionRandomGenerator<Gen>,
) -> LwePrivateFunctionalPackingKeyswitchKeyListOwned
where
    LweKeyCont: Container<Element = u64> + Sync,
    GlweKeyCont: Container<Element = u64> + Sync,
    Gen: ParallelByteRandomGenerator,
{
    let mut cbs_pfpksk_list = LwePrivateFunctionalPackingKeyswitchKeyListOwned::new(
        0,
        decomp_base_log,
        decomp_level_count,
        input_lwe_secret_key.lwe_dimension(),
        output_glwe_secret_key.glwe_dimension().to_glwe_size(),
        output_glwe_secret_key.polynomial_size(),
        FunctionalPackingKeyswitchKeyCount(
            output_glwe_secret_key.glwe_dimension().to_glwe_size().0,
        ),
    );

    par_generate_circuit_bootstrap_lwe_pfpksk_list(
        &mut cbs_pfpksk_list,
        input_lwe_secret_key,
        output_glwe_secret_key,
        noise_parameters,
        generator,
    );

    cbs_pfpksk_list
}

/// Parallel variant of [`generate_circuit_bootstrap_lwe_pfpksk_list`], yielding the same list.
pub fn par_generate_circuit_bootstrap_lwe_pfpksk_list<OutputCont, LweKeyCont, GlweKeyCont, Gen>(
    output_cbs_pfpksk_list: &mut LwePrivateFunctionalPackingKeyswitchKeyList<OutputCont>,
    input_lwe_secret_key: &LweSecretKey<LweKeyCont>,
    output_glwe_secret_key: &GlweSecretKey<GlweKeyCont>,
    noise_parameters: impl DispersionParameter + Sync,
    generator: &mut EncryptionRandomGenerator<Gen>,
) where
    OutputCont: ContainerMut<Element = u64>,
    LweKeyCont: Container<Element = u64> + Sync,
    GlweKeyCont: Container<Element = u64> + Sync,
    Gen: ParallelByteRandomGenerator,
{
    assert_cbs_pfpksk_list_matches_key(output_cbs_pfpksk_list, output_glwe_secret_key);

    let gen_iter = generator
        .par_fork_cbs_pfpksk_to_pfpksk(
            output_cbs_pfpksk_list.decomposition_level_count(),
            output_glwe_secret_key.glwe_dimension().to_glwe_size(),
            output_glwe_secret_key.polynomial_size(),
            input_lwe_secret_key.lwe_dimension().to_lwe_size(),
            output_cbs_pfpksk_list.lwe_pfpksk_count(),
        )
        .expect("Failed to split generator into pfpksk");

    let last_polynomial = last_cbs_polynomial(output_glwe_secret_key.polynomial_size());
    let polynomial_size = output_glwe_secret_key.polynomial_size();
    let polynomials: Vec<PolynomialView<'_>> = output_glwe_secret_key
        .as_ref()
        .chunks_exact(polynomial_size.0)
        .chain(core::iter::once(last_polynomial.as_ref()))
        .map(Polynomial::from_container)
        .collect();

    output_cbs_pfpksk_list
        .par_iter_mut()
        .zip(polynomials.par_iter())
        .zip(gen_iter)
        .for_each(
            |((mut lwe_pfpksk, polynomial_to_encrypt), mut loop_generator)| {
                par_generate_lwe_private_functional_packing_keyswitch_key(
                    input_lwe_secret_key,
                    output_glwe_secret_key,
                    &mut lwe_pfpksk,
                    noise_parameters,
                    &mut loop_generator,
                    |x: u64| x.wrapping_neg(),
                    polynomial_to_encrypt,
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
    use crate::commons::test_tools::*;

    #[test]
    fn cbs_pfpksk_list_generation_paths_agree() {
        let lwe_dimension = LweDimension(8);
        let glwe_dimension = GlweDimension(2);
        let polynomial_size = PolynomialSize(32);
        let base_log = DecompositionBaseLog(15);
        let level_count = DecompositionLevelCount(2);
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

        let sequential = allocate_and_generate_new_circuit_bootstrap_lwe_pfpksk_list(
            &lwe_sk,
            &glwe_sk,
            base_log,
            level_count,
            std,
            &mut new_generator(),
        );
        let parallel = par_allocate_and_generate_new_circuit_bootstrap_lwe_pfpksk_list(
            &lwe_sk,
            &glwe_sk,
            base_log,
            level_count,
            std,
            &mut new_generator(),
        );

        assert_eq!(sequential.lwe_pfpksk_count(), FunctionalPackingKeyswitchKeyCount(3));
        assert_eq!(sequential, parallel);
    }
}
