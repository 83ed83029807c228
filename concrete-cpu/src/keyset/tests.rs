use super::*;
use crate::algorithms::*;
use crate::commons::dispersion::StandardDev;
use crate::commons::parameters::*;
use crate::commons::test_tools::*;
use crate::config::DecompositionParameters;
use crate::entities::*;
use crate::fft_impl::bootstrap::bootstrap_scratch;

const MESSAGE_BITS: usize = 3;
const DELTA_LOG: usize = 64 - MESSAGE_BITS - 1;

fn parameters(with_cbs: bool) -> ParameterSet {
    let decomposition = |base_log, level_count| DecompositionParameters {
        base_log: DecompositionBaseLog(base_log),
        level_count: DecompositionLevelCount(level_count),
    };
    ParameterSet {
        lwe_dimension: LweDimension(100),
        glwe_dimension: GlweDimension(1),
        polynomial_size: PolynomialSize(1024),
        lwe_noise: StandardDev(2f64.powi(-50)),
        glwe_noise: StandardDev(0.000_000_000_000_000_29),
        pbs: decomposition(15, 2),
        ks: decomposition(3, 5),
        cbs: with_cbs.then(|| decomposition(10, 1)),
        pfpks: with_cbs.then(|| decomposition(15, 2)),
    }
}

fn config(parameters: ParameterSet, parallelism: Parallelism) -> EngineConfig {
    EngineConfig {
        parallelism,
        ..EngineConfig::new(parameters)
    }
}

#[test]
fn keysets_only_depend_on_the_seed() {
    let seed = random_seed();
    let params = parameters(true);
    let sequential = KeySet::generate(&config(params, Parallelism::No), seed).unwrap();
    let parallel = KeySet::generate(&config(params, Parallelism::Rayon), seed).unwrap();

    assert_eq!(sequential.client, parallel.client);
    assert_eq!(
        sequential.server.keyswitch_key,
        parallel.server.keyswitch_key
    );
    assert_eq!(
        sequential.server.bootstrap_key,
        parallel.server.bootstrap_key
    );
    assert_eq!(sequential.server.cbs_pfpksk, parallel.server.cbs_pfpksk);

    let other = KeySet::generate(&config(params, Parallelism::No), random_seed()).unwrap();
    assert_ne!(sequential.client, other.client);
}

#[test]
fn keys_follow_the_parameters() {
    let keyset = KeySet::generate(&config(parameters(false), Parallelism::Rayon), random_seed())
        .unwrap();
    let server = &keyset.server;
    assert!(server.cbs_pfpksk.is_none());
    assert_eq!(
        server.keyswitch_key.input_key_lwe_dimension(),
        LweDimension(1024)
    );
    assert_eq!(
        server.keyswitch_key.output_key_lwe_dimension(),
        LweDimension(100)
    );
    assert_eq!(server.bootstrap_key.input_lwe_dimension(), LweDimension(100));
    assert_eq!(
        server.bootstrap_key.output_lwe_dimension(),
        LweDimension(1024)
    );
}

#[test]
fn invalid_parameters_are_rejected() {
    let mut params = parameters(false);
    params.polynomial_size = PolynomialSize(1000);
    assert!(KeySet::generate(&config(params, Parallelism::No), random_seed()).is_err());
}

#[test]
fn keyswitch_then_bootstrap_refreshes_ciphertexts() {
    let keyset = KeySet::generate(&config(parameters(false), Parallelism::Rayon), random_seed())
        .unwrap();
    let client = &keyset.client;
    let server = &keyset.server;
    let fourier_bsk = server.bootstrap_key.as_view();
    let fft = server.fft.as_view();
    let polynomial_size = fourier_bsk.polynomial_size();

    // Identity accumulator with boxes centered on the encoded messages.
    let box_size = polynomial_size.0 >> MESSAGE_BITS;
    let mut body = PolynomialOwned::new(0, polynomial_size);
    for (i, coefficient) in body.iter_mut().enumerate() {
        *coefficient = ((i / box_size) as u64) << DELTA_LOG;
    }
    polynomial_wrapping_monic_monomial_div_assign(&mut body, MonomialDegree(box_size / 2));
    let mut accumulator = GlweCiphertextOwned::new(0, fourier_bsk.glwe_size(), polynomial_size);
    trivially_encrypt_glwe_ciphertext(&mut accumulator, &body);

    let mut mem = vec![
        0u8;
        bootstrap_scratch(fourier_bsk.glwe_size(), polynomial_size, fft)
            .unwrap()
            .unaligned_bytes_required()
    ];
    let mut encryption_generator = new_encryption_random_generator();

    for message in 0..1u64 << MESSAGE_BITS {
        let lwe_in = allocate_and_encrypt_new_lwe_ciphertext(
            &client.big_lwe_secret_key(),
            Plaintext(message << DELTA_LOG),
            client.parameters.glwe_noise,
            &mut encryption_generator,
        );

        let mut lwe_small =
            LweCiphertextOwned::new(0, client.parameters.lwe_dimension.to_lwe_size());
        keyswitch_lwe_ciphertext(&server.keyswitch_key, &lwe_in, &mut lwe_small);
        let decrypted = decrypt_lwe_ciphertext(&client.small_lwe_secret_key, &lwe_small);
        assert_eq!(decode(decrypted.0, MESSAGE_BITS + 1), message);

        let mut lwe_out =
            LweCiphertextOwned::new(0, fourier_bsk.output_lwe_dimension().to_lwe_size());
        fourier_bsk.bootstrap(
            lwe_out.as_mut_view(),
            lwe_small.as_view(),
            accumulator.as_view(),
            fft,
            PodStack::new(&mut mem),
        );
        let decrypted = decrypt_lwe_ciphertext(&client.big_lwe_secret_key(), &lwe_out);
        assert_eq!(decode(decrypted.0, MESSAGE_BITS + 1), message);
    }
}
