use super::*;
use crate::algorithms::*;
use crate::commons::dispersion::StandardDev;
use crate::commons::parameters::*;
use crate::commons::test_tools::*;
use crate::fft_impl::fft::Fft;
use dyn_stack::{GlobalPodBuffer, StackReq};

const MESSAGE_BITS: usize = 4;
// one bit of padding on top of the message
const DELTA_LOG: usize = 64 - MESSAGE_BITS - 1;

struct Keys {
    lwe_sk: LweSecretKeyOwned,
    glwe_sk: GlweSecretKeyOwned,
    fourier_bsk: FourierLweBootstrapKeyOwned,
    fft: Fft,
}

fn std() -> StandardDev {
    StandardDev(0.000_000_000_000_000_29)
}

fn generate_keys(lwe_dimension: LweDimension, polynomial_size: PolynomialSize) -> Keys {
    generate_keys_with(
        lwe_dimension,
        polynomial_size,
        DecompositionBaseLog(15),
        DecompositionLevelCount(2),
    )
}

fn generate_keys_with(
    lwe_dimension: LweDimension,
    polynomial_size: PolynomialSize,
    base_log: DecompositionBaseLog,
    level_count: DecompositionLevelCount,
) -> Keys {
    let glwe_dimension = GlweDimension(1);

    let mut secret_generator = new_secret_random_generator();
    let mut encryption_generator = new_encryption_random_generator();

    let lwe_sk =
        allocate_and_generate_new_binary_lwe_secret_key(lwe_dimension, &mut secret_generator);
    let glwe_sk = allocate_and_generate_new_binary_glwe_secret_key(
        glwe_dimension,
        polynomial_size,
        &mut secret_generator,
    );

    let bsk = allocate_and_generate_new_lwe_bootstrap_key(
        &lwe_sk,
        &glwe_sk,
        base_log,
        level_count,
        std(),
        &mut encryption_generator,
    );

    let fft = Fft::new(polynomial_size);
    let mut fourier_bsk = FourierLweBootstrapKeyOwned::new(
        lwe_dimension,
        glwe_dimension.to_glwe_size(),
        polynomial_size,
        base_log,
        level_count,
    );
    let mut mem = GlobalPodBuffer::new(fill_with_forward_fourier_scratch(fft.as_view()).unwrap());
    fourier_bsk.as_mut_view().fill_with_forward_fourier(
        &bsk,
        fft.as_view(),
        PodStack::new(&mut mem),
    );

    Keys {
        lwe_sk,
        glwe_sk,
        fourier_bsk,
        fft,
    }
}

/// Trivial GLWE accumulator whose body maps every input box to `f(message) * delta`.
fn accumulator(
    glwe_size: GlweSize,
    polynomial_size: PolynomialSize,
    f: impl Fn(u64) -> u64,
) -> GlweCiphertextOwned {
    let message_modulus = 1 << MESSAGE_BITS;
    let box_size = polynomial_size.0 / message_modulus;

    let mut body = PolynomialOwned::new(0, polynomial_size);
    for (i, coefficient) in body.iter_mut().enumerate() {
        let message = (i / box_size) as u64;
        *coefficient = (f(message) % message_modulus as u64) << DELTA_LOG;
    }
    // Centers the boxes around the encoded messages.
    polynomial_wrapping_monic_monomial_div_assign(&mut body, MonomialDegree(box_size / 2));

    let mut acc = GlweCiphertextOwned::new(0, glwe_size, polynomial_size);
    trivially_encrypt_glwe_ciphertext(&mut acc, &body);
    acc
}

fn bootstrap_and_decrypt(keys: &Keys, accumulator: &GlweCiphertextOwned, message: u64) -> u64 {
    let decrypted = bootstrap_with_noise(keys, accumulator, message, std());
    decode(decrypted, MESSAGE_BITS + 1)
}

/// Bootstraps an encryption of `message` with input noise `input_noise` and returns the raw
/// decrypted plaintext.
fn bootstrap_with_noise(
    keys: &Keys,
    accumulator: &GlweCiphertextOwned,
    message: u64,
    input_noise: StandardDev,
) -> u64 {
    let mut encryption_generator = new_encryption_random_generator();
    let fourier_bsk = keys.fourier_bsk.as_view();
    let fft = keys.fft.as_view();

    let lwe_in = allocate_and_encrypt_new_lwe_ciphertext(
        &keys.lwe_sk,
        Plaintext(message << DELTA_LOG),
        input_noise,
        &mut encryption_generator,
    );
    let mut lwe_out = LweCiphertextOwned::new(0, fourier_bsk.output_lwe_dimension().to_lwe_size());

    let mut mem = GlobalPodBuffer::new(
        bootstrap_scratch(fourier_bsk.glwe_size(), fourier_bsk.polynomial_size(), fft).unwrap(),
    );
    fourier_bsk.bootstrap(
        lwe_out.as_mut_view(),
        lwe_in.as_view(),
        accumulator.as_view(),
        fft,
        PodStack::new(&mut mem),
    );

    decrypt_lwe_ciphertext(&keys.glwe_sk.as_lwe_secret_key(), &lwe_out).0
}

#[test]
fn identity_bootstrap() {
    let keys = generate_keys(LweDimension(100), PolynomialSize(1024));
    let acc = accumulator(
        keys.fourier_bsk.glwe_size(),
        keys.fourier_bsk.polynomial_size(),
        |x| x,
    );

    for message in 0..1 << MESSAGE_BITS {
        assert_eq!(bootstrap_and_decrypt(&keys, &acc, message), message);
    }
}

#[test]
fn function_evaluation_bootstrap() {
    let keys = generate_keys(LweDimension(100), PolynomialSize(1024));
    let f = |x: u64| (3 * x + 5) % (1 << MESSAGE_BITS);
    let acc = accumulator(
        keys.fourier_bsk.glwe_size(),
        keys.fourier_bsk.polynomial_size(),
        f,
    );

    for message in 0..1 << MESSAGE_BITS {
        assert_eq!(bootstrap_and_decrypt(&keys, &acc, message), f(message));
    }
}

#[test]
fn parallel_conversion_matches_sequential() {
    let lwe_dimension = LweDimension(20);
    let glwe_dimension = GlweDimension(2);
    let polynomial_size = PolynomialSize(256);
    let base_log = DecompositionBaseLog(8);
    let level_count = DecompositionLevelCount(3);

    let mut secret_generator = new_secret_random_generator();
    let lwe_sk =
        allocate_and_generate_new_binary_lwe_secret_key(lwe_dimension, &mut secret_generator);
    let glwe_sk = allocate_and_generate_new_binary_glwe_secret_key(
        glwe_dimension,
        polynomial_size,
        &mut secret_generator,
    );
    let bsk = allocate_and_generate_new_lwe_bootstrap_key(
        &lwe_sk,
        &glwe_sk,
        base_log,
        level_count,
        std(),
        &mut new_encryption_random_generator(),
    );

    let fft = Fft::new(polynomial_size);
    let new_key = || {
        FourierLweBootstrapKeyOwned::new(
            lwe_dimension,
            glwe_dimension.to_glwe_size(),
            polynomial_size,
            base_log,
            level_count,
        )
    };

    let mut sequential = new_key();
    let mut mem = GlobalPodBuffer::new(fill_with_forward_fourier_scratch(fft.as_view()).unwrap());
    sequential.as_mut_view().fill_with_forward_fourier(
        &bsk,
        fft.as_view(),
        PodStack::new(&mut mem),
    );

    let mut parallel = new_key();
    parallel
        .as_mut_view()
        .par_fill_with_forward_fourier(&bsk, fft.as_view())
        .unwrap();

    assert_eq!(sequential, parallel);
}

#[test]
fn bootstrap_runs_in_exactly_the_reported_scratch() {
    let keys = generate_keys(LweDimension(10), PolynomialSize(512));
    let fourier_bsk = keys.fourier_bsk.as_view();
    let fft = keys.fft.as_view();
    let acc = accumulator(fourier_bsk.glwe_size(), fourier_bsk.polynomial_size(), |x| x);

    let req = bootstrap_scratch(fourier_bsk.glwe_size(), fourier_bsk.polynomial_size(), fft)
        .unwrap();
    // Exactly the reported size, at the reported alignment.
    let mut mem = GlobalPodBuffer::new(StackReq::new_aligned::<u8>(
        req.size_bytes(),
        req.align_bytes(),
    ));

    let lwe_in = allocate_and_encrypt_new_lwe_ciphertext(
        &keys.lwe_sk,
        Plaintext(3 << DELTA_LOG),
        std(),
        &mut new_encryption_random_generator(),
    );
    let mut lwe_out = LweCiphertextOwned::new(0, fourier_bsk.output_lwe_dimension().to_lwe_size());
    fourier_bsk.bootstrap(
        lwe_out.as_mut_view(),
        lwe_in.as_view(),
        acc.as_view(),
        fft,
        PodStack::new(&mut mem),
    );

    let decrypted = decrypt_lwe_ciphertext(&keys.glwe_sk.as_lwe_secret_key(), &lwe_out);
    assert_eq!(decode(decrypted.0, MESSAGE_BITS + 1), 3);
}

#[cfg(debug_assertions)]
#[test]
#[should_panic(expected = "scratch stack smaller than bootstrap_scratch")]
fn bootstrap_detects_a_stack_one_byte_short() {
    let keys = generate_keys(LweDimension(10), PolynomialSize(512));
    let fourier_bsk = keys.fourier_bsk.as_view();
    let fft = keys.fft.as_view();
    let acc = accumulator(fourier_bsk.glwe_size(), fourier_bsk.polynomial_size(), |x| x);

    let req = bootstrap_scratch(fourier_bsk.glwe_size(), fourier_bsk.polynomial_size(), fft)
        .unwrap();
    let mut mem = GlobalPodBuffer::new(StackReq::new_aligned::<u8>(
        req.size_bytes() - 1,
        req.align_bytes(),
    ));

    let lwe_in = LweCiphertextOwned::new(0, fourier_bsk.input_lwe_dimension().to_lwe_size());
    let mut lwe_out = LweCiphertextOwned::new(0, fourier_bsk.output_lwe_dimension().to_lwe_size());
    fourier_bsk.bootstrap(
        lwe_out.as_mut_view(),
        lwe_in.as_view(),
        acc.as_view(),
        fft,
        PodStack::new(&mut mem),
    );
}

#[test]
fn scratch_query_overflows_for_huge_dimensions() {
    let fft = Fft::new(PolynomialSize(512));
    let fft = fft.as_view();

    assert!(bootstrap_scratch(GlweSize(2), PolynomialSize(512), fft).is_ok());
    assert!(bootstrap_scratch(GlweSize(usize::MAX / 256), PolynomialSize(512), fft).is_err());
    assert!(bootstrap_scratch(GlweSize(2), PolynomialSize(1 << 62), fft).is_err());
}

#[test]
fn bootstrap_resets_noise_to_the_key_level() {
    // (n, N, base_log, level)
    let parameter_sets = [
        (100, 1024, 15, 2),
        (64, 512, 10, 3),
    ];
    // Close to the correctness bound once the modulus switch noise is added.
    let large_input_noise = StandardDev(2.0f64.powi(-11));
    let output_bound = 1u64 << (DELTA_LOG - 8);

    for (lwe_dimension, polynomial_size, base_log, level_count) in parameter_sets {
        let keys = generate_keys_with(
            LweDimension(lwe_dimension),
            PolynomialSize(polynomial_size),
            DecompositionBaseLog(base_log),
            DecompositionLevelCount(level_count),
        );
        let acc = accumulator(
            keys.fourier_bsk.glwe_size(),
            keys.fourier_bsk.polynomial_size(),
            |x| x,
        );

        for message in [0, 5, (1 << MESSAGE_BITS) - 1] {
            let expected = message << DELTA_LOG;
            let small = bootstrap_with_noise(&keys, &acc, message, std());
            let large = bootstrap_with_noise(&keys, &acc, message, large_input_noise);

            let small_error = modular_distance(small, expected);
            let large_error = modular_distance(large, expected);
            assert!(
                small_error < output_bound && large_error < output_bound,
                "n={lwe_dimension} N={polynomial_size}: errors {small_error} and {large_error} \
                 exceed {output_bound}",
            );
        }
    }
}

#[test]
fn modulus_switch_rounds_to_2n() {
    let polynomial_size = PolynomialSize(1024);
    assert_eq!(pbs_modulus_switch(0, polynomial_size), 0);
    assert_eq!(pbs_modulus_switch(1 << 63, polynomial_size), 1024);
    assert_eq!(pbs_modulus_switch((1 << 53) - 1, polynomial_size), 1);
    assert_eq!(pbs_modulus_switch(u64::MAX, polynomial_size), 0);
}
