//! Generation of the complete set of keys described by an [`EngineConfig`].
//!
//! The client side holds the secret keys. The server side holds the evaluation keys: the
//! keyswitch key from the large key (the GLWE key seen as an LWE key) to the small key, the
//! bootstrap key from the small key to the GLWE key, already in the Fourier domain, and, when the
//! parameter set enables it, the packing keyswitch keys of the circuit bootstrap.

use crate::algorithms::{
    allocate_and_generate_new_binary_glwe_secret_key,
    allocate_and_generate_new_binary_lwe_secret_key,
    allocate_and_generate_new_circuit_bootstrap_lwe_pfpksk_list, generate_lwe_bootstrap_key,
    generate_lwe_keyswitch_key, par_allocate_and_generate_new_circuit_bootstrap_lwe_pfpksk_list,
    par_generate_lwe_bootstrap_key, par_generate_lwe_keyswitch_key,
};
use crate::commons::generators::{
    DeterministicSeeder, EncryptionRandomGenerator, SecretRandomGenerator,
};
use crate::commons::math::random::{ActivatedRandomGenerator, Seed, Seeder};
use crate::commons::parameters::Parallelism;
use crate::config::{EngineConfig, ParameterSet};
use crate::entities::{
    GlweSecretKeyOwned, LweBootstrapKeyOwned, LweKeyswitchKeyOwned,
    LwePrivateFunctionalPackingKeyswitchKeyListOwned, LweSecretKeyOwned, LweSecretKeyView,
};
use crate::error::Error;
use crate::fft_impl::bootstrap::FourierLweBootstrapKeyOwned;
use crate::fft_impl::fft::Fft;
use crate::fft_impl::ggsw::fill_with_forward_fourier_scratch;
use dyn_stack::{GlobalPodBuffer, PodStack};

/// The secret keys of a keyset.
#[derive(Clone, Debug, PartialEq)]
pub struct ClientKeySet {
    pub parameters: ParameterSet,
    pub small_lwe_secret_key: LweSecretKeyOwned,
    pub glwe_secret_key: GlweSecretKeyOwned,
}

impl ClientKeySet {
    pub fn generate(
        parameters: ParameterSet,
        generator: &mut SecretRandomGenerator<ActivatedRandomGenerator>,
    ) -> Self {
        let small_lwe_secret_key =
            allocate_and_generate_new_binary_lwe_secret_key(parameters.lwe_dimension, generator);
        let glwe_secret_key = allocate_and_generate_new_binary_glwe_secret_key(
            parameters.glwe_dimension,
            parameters.polynomial_size,
            generator,
        );
        Self {
            parameters,
            small_lwe_secret_key,
            glwe_secret_key,
        }
    }

    /// The GLWE key seen as an LWE key, under which the bootstraps output.
    pub fn big_lwe_secret_key(&self) -> LweSecretKeyView<'_> {
        self.glwe_secret_key.as_lwe_secret_key()
    }
}

/// The evaluation keys of a keyset.
pub struct ServerKeySet {
    pub parameters: ParameterSet,
    pub keyswitch_key: LweKeyswitchKeyOwned,
    pub bootstrap_key: FourierLweBootstrapKeyOwned,
    pub cbs_pfpksk: Option<LwePrivateFunctionalPackingKeyswitchKeyListOwned>,
    pub fft: Fft,
}

impl ServerKeySet {
    #[tracing::instrument(level = "debug", skip_all, fields(parallelism = ?parallelism))]
    pub fn generate(
        client: &ClientKeySet,
        parallelism: Parallelism,
        generator: &mut EncryptionRandomGenerator<ActivatedRandomGenerator>,
    ) -> Result<Self, Error> {
        let parameters = client.parameters;
        let big_lwe_sk = client.big_lwe_secret_key();
        let small_lwe_sk = client.small_lwe_secret_key.as_view();
        let glwe_sk = client.glwe_secret_key.as_view();

        let mut keyswitch_key = LweKeyswitchKeyOwned::new(
            0,
            parameters.ks.base_log,
            parameters.ks.level_count,
            big_lwe_sk.lwe_dimension(),
            small_lwe_sk.lwe_dimension(),
        );
        let mut bsk = LweBootstrapKeyOwned::new(
            0,
            parameters.glwe_dimension.to_glwe_size(),
            parameters.polynomial_size,
            parameters.pbs.base_log,
            parameters.pbs.level_count,
            parameters.lwe_dimension,
        );

        let cbs_pfpksk = match parallelism {
            Parallelism::No => {
                generate_lwe_keyswitch_key(
                    &big_lwe_sk,
                    &small_lwe_sk,
                    &mut keyswitch_key,
                    parameters.lwe_noise,
                    generator,
                );
                generate_lwe_bootstrap_key(
                    &small_lwe_sk,
                    &glwe_sk,
                    &mut bsk,
                    parameters.glwe_noise,
                    generator,
                );
                parameters.pfpks.map(|pfpks| {
                    allocate_and_generate_new_circuit_bootstrap_lwe_pfpksk_list(
                        &big_lwe_sk,
                        &glwe_sk,
                        pfpks.base_log,
                        pfpks.level_count,
                        parameters.glwe_noise,
                        generator,
                    )
                })
            }
            Parallelism::Rayon => {
                par_generate_lwe_keyswitch_key(
                    &big_lwe_sk,
                    &small_lwe_sk,
                    &mut keyswitch_key,
                    parameters.lwe_noise,
                    generator,
                );
                par_generate_lwe_bootstrap_key(
                    &small_lwe_sk,
                    &glwe_sk,
                    &mut bsk,
                    parameters.glwe_noise,
                    generator,
                );
                parameters.pfpks.map(|pfpks| {
                    par_allocate_and_generate_new_circuit_bootstrap_lwe_pfpksk_list(
                        &big_lwe_sk,
                        &glwe_sk,
                        pfpks.base_log,
                        pfpks.level_count,
                        parameters.glwe_noise,
                        generator,
                    )
                })
            }
        };

        let fft = Fft::new(parameters.polynomial_size);
        let mut bootstrap_key = FourierLweBootstrapKeyOwned::new(
            parameters.lwe_dimension,
            parameters.glwe_dimension.to_glwe_size(),
            parameters.polynomial_size,
            parameters.pbs.base_log,
            parameters.pbs.level_count,
        );
        match parallelism {
            Parallelism::No => {
                let mut mem = GlobalPodBuffer::new(fill_with_forward_fourier_scratch(fft.as_view())?);
                bootstrap_key.as_mut_view().fill_with_forward_fourier(
                    &bsk,
                    fft.as_view(),
                    PodStack::new(&mut mem),
                );
            }
            Parallelism::Rayon => bootstrap_key
                .as_mut_view()
                .par_fill_with_forward_fourier(&bsk, fft.as_view())?,
        }

        tracing::debug!(
            lwe_dimension = parameters.lwe_dimension.0,
            glwe_dimension = parameters.glwe_dimension.0,
            polynomial_size = parameters.polynomial_size.0,
            circuit_bootstrap = cbs_pfpksk.is_some(),
            "generated server keys"
        );

        Ok(Self {
            parameters,
            keyswitch_key,
            bootstrap_key,
            cbs_pfpksk,
            fft,
        })
    }
}

/// A client keyset with the matching server keyset.
pub struct KeySet {
    pub client: ClientKeySet,
    pub server: ServerKeySet,
}

impl KeySet {
    /// Generates every key of `config` from `seed`.
    ///
    /// The secret keys and the masks are drawn from generators seeded by a [`DeterministicSeeder`]
    /// expanding `seed`, so that a seed always yields the same keyset.
    pub fn generate(config: &EngineConfig, seed: Seed) -> Result<Self, Error> {
        config.parameters.validate()?;

        let mut seeder = DeterministicSeeder::<ActivatedRandomGenerator>::new(seed);
        let mut secret_generator = SecretRandomGenerator::new(seeder.seed());
        let mask_seed = seeder.seed();
        let mut encryption_generator = EncryptionRandomGenerator::new(mask_seed, &mut seeder);

        let client = ClientKeySet::generate(config.parameters, &mut secret_generator);
        let server = ServerKeySet::generate(&client, config.parallelism, &mut encryption_generator)?;
        Ok(Self { client, server })
    }
}

#[cfg(test)]
mod tests;
