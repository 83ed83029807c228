use super::*;
use crate::algorithms::*;
use crate::commons::dispersion::StandardDev;
use crate::commons::test_tools::*;
use crate::fft_impl::bootstrap::FourierLweBootstrapKeyOwned;
use crate::fft_impl::fft::Fft;
use dyn_stack::GlobalPodBuffer;
use rand::Rng;

fn fourier_bootstrap_key(
    lwe_sk: &LweSecretKeyOwned,
    glwe_sk: &GlweSecretKeyOwned,
    base_log: DecompositionBaseLog,
    level_count: DecompositionLevelCount,
    std: StandardDev,
    fft: FftView<'_>,
) -> FourierLweBootstrapKeyOwned {
    let bsk = allocate_and_generate_new_lwe_bootstrap_key(
        lwe_sk,
        glwe_sk,
        base_log,
        level_count,
        std,
        &mut new_encryption_random_generator(),
    );

    let mut fourier_bsk = FourierLweBootstrapKeyOwned::new(
        lwe_sk.lwe_dimension(),
        glwe_sk.glwe_dimension().to_glwe_size(),
        glwe_sk.polynomial_size(),
        base_log,
        level_count,
    );
    fourier_bsk
        .as_mut_view()
        .par_fill_with_forward_fourier(&bsk, fft)
        .unwrap();
    fourier_bsk
}

#[test]
fn extract_bits_recovers_every_bit() {
    // Insecure toy parameters.
    let polynomial_size = PolynomialSize(1024);
    let glwe_dimension = GlweDimension(1);
    let lwe_dimension = LweDimension(585);
    let std = StandardDev::from_log_standard_dev(-60.);

    let number_of_bits_of_message_including_padding = 5_usize;
    let delta_log = DeltaLog(64 - number_of_bits_of_message_including_padding);

    let mut secret_generator = new_secret_random_generator();
    let mut encryption_generator = new_encryption_random_generator();

    let glwe_sk = allocate_and_generate_new_binary_glwe_secret_key(
        glwe_dimension,
        polynomial_size,
        &mut secret_generator,
    );
    let lwe_small_sk =
        allocate_and_generate_new_binary_lwe_secret_key(lwe_dimension, &mut secret_generator);
    let lwe_big_sk = glwe_sk.as_lwe_secret_key();

    let fft = Fft::new(polynomial_size);
    let fft = fft.as_view();

    let fourier_bsk = fourier_bootstrap_key(
        &lwe_small_sk,
        &glwe_sk,
        DecompositionBaseLog(10),
        DecompositionLevelCount(2),
        std,
        fft,
    );
    let ksk_lwe_big_to_small = allocate_and_generate_new_lwe_keyswitch_key(
        &lwe_big_sk,
        &lwe_small_sk,
        DecompositionBaseLog(4),
        DecompositionLevelCount(7),
        std,
        &mut encryption_generator,
    );

    let mut mem = GlobalPodBuffer::new(
        extract_bits_scratch(
            lwe_big_sk.lwe_dimension(),
            ksk_lwe_big_to_small.output_lwe_size(),
            glwe_dimension.to_glwe_size(),
            polynomial_size,
            fft,
        )
        .unwrap(),
    );
    let stack = PodStack::new(&mut mem);

    let number_of_bits_to_extract = ExtractedBitsCount(64 - delta_log.0);

    for _ in 0..8 {
        let value = rand::thread_rng()
            .gen_range(0..1u64 << number_of_bits_of_message_including_padding);

        let lwe_in = allocate_and_encrypt_new_lwe_ciphertext(
            &lwe_big_sk,
            Plaintext(value << delta_log.0),
            std,
            &mut encryption_generator,
        );
        let mut lwe_out_list = LweCiphertextListOwned::new(
            0,
            ksk_lwe_big_to_small.output_lwe_size(),
            LweCiphertextCount(number_of_bits_to_extract.0),
        );

        extract_bits(
            lwe_out_list.as_mut_view(),
            lwe_in.as_view(),
            ksk_lwe_big_to_small.as_view(),
            fourier_bsk.as_view(),
            delta_log,
            number_of_bits_to_extract,
            fft,
            stack,
        );

        let msb_ct = lwe_out_list.iter().next().unwrap();
        let msb = value >> (number_of_bits_of_message_including_padding - 1);
        assert_eq!(
            decode(decrypt_lwe_ciphertext(&lwe_small_sk, &msb_ct).0, 1) & 1,
            msb,
            "index 0 holds the most significant extracted bit of {value:#b}"
        );

        // Index `count - 1 - i` holds bit `i`.
        for (i, result_ct) in lwe_out_list.iter().rev().enumerate() {
            let decrypted = decrypt_lwe_ciphertext(&lwe_small_sk, &result_ct);
            assert_eq!(
                decode(decrypted.0, 1) & 1,
                (value >> i) & 1,
                "bit #{i} of {value:#b}"
            );
        }
    }
}

#[test]
fn circuit_bootstrap_boolean_outputs_a_usable_ggsw() {
    // Insecure toy parameters.
    let polynomial_size = PolynomialSize(512);
    let glwe_dimension = GlweDimension(2);
    let glwe_size = glwe_dimension.to_glwe_size();
    let lwe_dimension = LweDimension(10);
    let level_cbs = DecompositionLevelCount(1);
    let base_log_cbs = DecompositionBaseLog(10);
    let std = StandardDev::from_log_standard_dev(-60.);
    let delta_log = DeltaLog(60);

    let mut secret_generator = new_secret_random_generator();
    let mut encryption_generator = new_encryption_random_generator();

    let glwe_sk = allocate_and_generate_new_binary_glwe_secret_key(
        glwe_dimension,
        polynomial_size,
        &mut secret_generator,
    );
    let lwe_sk =
        allocate_and_generate_new_binary_lwe_secret_key(lwe_dimension, &mut secret_generator);

    let fft = Fft::new(polynomial_size);
    let fft = fft.as_view();

    let fourier_bsk = fourier_bootstrap_key(
        &lwe_sk,
        &glwe_sk,
        DecompositionBaseLog(15),
        DecompositionLevelCount(2),
        std,
        fft,
    );
    let pfpksk_list = par_allocate_and_generate_new_circuit_bootstrap_lwe_pfpksk_list(
        &glwe_sk.as_lwe_secret_key(),
        &glwe_sk,
        DecompositionBaseLog(15),
        DecompositionLevelCount(2),
        std,
        &mut encryption_generator,
    );

    let mut mem = GlobalPodBuffer::new(
        StackReq::try_any_of([
            circuit_bootstrap_boolean_scratch(
                lwe_dimension.to_lwe_size(),
                fourier_bsk.output_lwe_dimension().to_lwe_size(),
                glwe_size,
                polynomial_size,
                fft,
            )
            .unwrap(),
            fill_with_forward_fourier_scratch(fft).unwrap(),
            cmux_scratch(glwe_size, polynomial_size, fft).unwrap(),
        ])
        .unwrap(),
    );
    let stack = PodStack::new(&mut mem);

    for bit in [0u64, 1, 1, 0] {
        let lwe_in = allocate_and_encrypt_new_lwe_ciphertext(
            &lwe_sk,
            Plaintext(bit << delta_log.0),
            std,
            &mut encryption_generator,
        );

        let mut cbs_res =
            GgswCiphertextOwned::new(0, glwe_size, polynomial_size, base_log_cbs, level_cbs);
        circuit_bootstrap_boolean(
            fourier_bsk.as_view(),
            lwe_in.as_view(),
            cbs_res.as_mut_view(),
            delta_log,
            pfpksk_list.as_view(),
            fft,
            stack,
        );

        let mut fourier_ggsw =
            FourierGgswCiphertextOwned::new(glwe_size, polynomial_size, base_log_cbs, level_cbs);
        fourier_ggsw
            .as_mut_view()
            .fill_with_forward_fourier(&cbs_res, fft, stack);

        // Both branches are exactly representable with the decomposition of the GGSW.
        let trivial = |message: u64| {
            let mut body = PolynomialOwned::new(0, polynomial_size);
            body.as_mut()[0] = encode(message, 4);
            let mut glwe = GlweCiphertextOwned::new(0, glwe_size, polynomial_size);
            trivially_encrypt_glwe_ciphertext(&mut glwe, &body);
            glwe
        };
        let mut ct0 = trivial(3);
        let mut ct1 = trivial(5);
        cmux(
            ct0.as_mut_view(),
            ct1.as_mut_view(),
            fourier_ggsw.as_view(),
            fft,
            stack,
        );

        let mut decrypted = PolynomialOwned::new(0, polynomial_size);
        decrypt_glwe_ciphertext(&glwe_sk, &ct0, &mut decrypted);
        let expected = if bit == 1 { 5 } else { 3 };
        assert_eq!(decode(decrypted.as_ref()[0], 4), expected);
    }
}

#[test]
fn cmux_tree_selects_the_indexed_polynomial() {
    // Insecure toy parameters.
    let polynomial_size = PolynomialSize(512);
    let glwe_dimension = GlweDimension(1);
    let glwe_size = glwe_dimension.to_glwe_size();
    let std = StandardDev::from_log_standard_dev(-60.);
    let level = DecompositionLevelCount(3);
    let base_log = DecompositionBaseLog(6);
    let nb_ggsw = 6;
    let message_bits = 4;

    let glwe_sk = allocate_and_generate_new_binary_glwe_secret_key(
        glwe_dimension,
        polynomial_size,
        &mut new_secret_random_generator(),
    );
    let mut encryption_generator = new_encryption_random_generator();

    let fft = Fft::new(polynomial_size);
    let fft = fft.as_view();

    // Polynomial i is filled with i mod 16.
    let mut lut = vec![0u64; polynomial_size.0 << nb_ggsw];
    for (i, polynomial) in lut.chunks_exact_mut(polynomial_size.0).enumerate() {
        polynomial.fill(encode(i as u64 % (1 << message_bits), message_bits));
    }
    let lut = PolynomialListView::from_container(lut.as_slice(), polynomial_size);

    let mut mem = GlobalPodBuffer::new(
        StackReq::try_any_of([
            fill_with_forward_fourier_scratch(fft).unwrap(),
            cmux_tree_memory_optimized_scratch(glwe_size, polynomial_size, nb_ggsw, fft).unwrap(),
        ])
        .unwrap(),
    );
    let stack = PodStack::new(&mut mem);

    for _ in 0..4 {
        let value = rand::thread_rng().gen_range(0..1u64 << nb_ggsw);

        let mut ggsw_data = vec![
            c64::default();
            nb_ggsw * fourier_ggsw_ciphertext_size(glwe_size, polynomial_size, level)
        ];
        let mut ggsw_list = FourierGgswCiphertextListMutView::new(
            ggsw_data.as_mut_slice(),
            nb_ggsw,
            glwe_size,
            polynomial_size,
            base_log,
            level,
        );

        // Most significant bit first.
        for (i, fourier_ggsw) in ggsw_list.as_mut_view().into_ggsw_iter().enumerate() {
            let bit = (value >> (nb_ggsw - 1 - i)) & 1;
            let mut ggsw = GgswCiphertextOwned::new(0, glwe_size, polynomial_size, base_log, level);
            encrypt_constant_ggsw_ciphertext(
                &glwe_sk,
                &mut ggsw,
                Cleartext(bit),
                std,
                &mut encryption_generator,
            );
            fourier_ggsw.fill_with_forward_fourier(&ggsw, fft, stack);
        }

        let mut result = GlweCiphertextOwned::new(0, glwe_size, polynomial_size);
        cmux_tree_memory_optimized(
            result.as_mut_view(),
            lut.clone(),
            ggsw_list.as_view(),
            fft,
            stack,
        );

        let mut decrypted = PolynomialOwned::new(0, polynomial_size);
        decrypt_glwe_ciphertext(&glwe_sk, &result, &mut decrypted);
        assert_eq!(
            decode(decrypted.as_ref()[0], message_bits),
            value % (1 << message_bits)
        );
    }
}

struct WopKeys {
    small_sk: LweSecretKeyOwned,
    big_sk: GlweSecretKeyOwned,
    fourier_bsk: FourierLweBootstrapKeyOwned,
    pfpksk_list: LwePrivateFunctionalPackingKeyswitchKeyListOwned,
    fft: Fft,
}

fn wop_keys(polynomial_size: PolynomialSize) -> WopKeys {
    // Insecure toy parameters.
    let glwe_dimension = GlweDimension(1);
    let small_dimension = LweDimension(4);
    let std = StandardDev::from_log_standard_dev(-60.);

    let mut secret_generator = new_secret_random_generator();
    let small_sk =
        allocate_and_generate_new_binary_lwe_secret_key(small_dimension, &mut secret_generator);
    let big_sk = allocate_and_generate_new_binary_glwe_secret_key(
        glwe_dimension,
        polynomial_size,
        &mut secret_generator,
    );

    let fft = Fft::new(polynomial_size);
    let fourier_bsk = fourier_bootstrap_key(
        &small_sk,
        &big_sk,
        DecompositionBaseLog(9),
        DecompositionLevelCount(4),
        std,
        fft.as_view(),
    );
    let pfpksk_list = par_allocate_and_generate_new_circuit_bootstrap_lwe_pfpksk_list(
        &big_sk.as_lwe_secret_key(),
        &big_sk,
        DecompositionBaseLog(15),
        DecompositionLevelCount(2),
        std,
        &mut new_encryption_random_generator(),
    );

    WopKeys {
        small_sk,
        big_sk,
        fourier_bsk,
        pfpksk_list,
        fft,
    }
}

/// Evaluates `luts` on the bits of `value`, most significant first, and returns the decrypted
/// 4 bits outputs.
fn evaluate_luts(keys: &WopKeys, bit_count: usize, luts: &[u64], value: u64) -> Vec<u64> {
    let level_cbs = DecompositionLevelCount(4);
    let base_log_cbs = DecompositionBaseLog(6);
    let fft = keys.fft.as_view();
    let fourier_bsk = keys.fourier_bsk.as_view();
    let polynomial_size = fourier_bsk.polynomial_size();
    let lut_count = luts.len() >> bit_count;

    let mut encryption_generator = new_encryption_random_generator();
    let mut lwe_list_in = LweCiphertextListOwned::new(
        0,
        keys.small_sk.lwe_dimension().to_lwe_size(),
        LweCiphertextCount(bit_count),
    );
    for (i, mut lwe) in lwe_list_in.iter_mut().enumerate() {
        let bit = (value >> (bit_count - 1 - i)) & 1;
        encrypt_lwe_ciphertext(
            &keys.small_sk,
            &mut lwe,
            Plaintext(bit << 63),
            StandardDev::from_log_standard_dev(-60.),
            &mut encryption_generator,
        );
    }

    let mut lwe_list_out = LweCiphertextListOwned::new(
        0,
        fourier_bsk.output_lwe_dimension().to_lwe_size(),
        LweCiphertextCount(lut_count),
    );

    let req = circuit_bootstrap_boolean_vertical_packing_scratch(
        LweCiphertextCount(bit_count),
        LweCiphertextCount(lut_count),
        keys.small_sk.lwe_dimension().to_lwe_size(),
        PolynomialCount(lut_polynomial_count(1 << bit_count, polynomial_size).0 * lut_count),
        fourier_bsk.output_lwe_dimension().to_lwe_size(),
        fourier_bsk.glwe_size(),
        polynomial_size,
        level_cbs,
        fft,
    )
    .unwrap();
    let mut mem = GlobalPodBuffer::new(req);

    circuit_bootstrap_boolean_vertical_packing(
        luts,
        fourier_bsk,
        lwe_list_out.as_mut_view(),
        lwe_list_in.as_view(),
        keys.pfpksk_list.as_view(),
        level_cbs,
        base_log_cbs,
        fft,
        PodStack::new(&mut mem),
    );

    let big_lwe_sk = keys.big_sk.as_lwe_secret_key();
    lwe_list_out
        .iter()
        .map(|lwe| decode(decrypt_lwe_ciphertext(&big_lwe_sk, &lwe).0, 4))
        .collect()
}

#[test]
fn vertical_packing_with_lut_smaller_than_polynomial() {
    let keys = wop_keys(PolynomialSize(512));
    let bit_count = 3;

    let add_one = |x: u64| (x + 1) % 16;
    let times_three = |x: u64| (3 * x) % 16;
    let luts: Vec<u64> = (0..1 << bit_count)
        .map(|x| encode(add_one(x), 4))
        .chain((0..1 << bit_count).map(|x| encode(times_three(x), 4)))
        .collect();

    for value in 0..1 << bit_count {
        assert_eq!(
            evaluate_luts(&keys, bit_count, &luts, value),
            [add_one(value), times_three(value)]
        );
    }
}

#[test]
fn vertical_packing_with_cmux_tree() {
    // 2^10 entries over polynomials of 256 coefficients: two cmux layers, then a blind rotation.
    let keys = wop_keys(PolynomialSize(256));
    let bit_count = 10;

    let f = |x: u64| (x ^ (x >> 4)) % 16;
    let luts: Vec<u64> = (0..1 << bit_count).map(|x| encode(f(x), 4)).collect();

    for _ in 0..3 {
        let value = rand::thread_rng().gen_range(0..1u64 << bit_count);
        assert_eq!(evaluate_luts(&keys, bit_count, &luts, value), [f(value)]);
    }
}
