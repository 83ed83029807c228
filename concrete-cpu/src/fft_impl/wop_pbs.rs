//! Evaluation side of the without padding bootstrap (WoP-PBS): bit extraction, circuit
//! bootstrapping and vertical packing.

use super::bootstrap::{bootstrap_scratch, FourierLweBootstrapKeyView};
use super::fft::FftView;
use super::ggsw::*;
use super::try_product;
use crate::algorithms::glwe_sample_extraction::extract_lwe_sample_from_glwe_ciphertext;
use crate::algorithms::lwe_keyswitch::keyswitch_lwe_ciphertext;
use crate::algorithms::lwe_linear_algebra::lwe_ciphertext_cleartext_mul_assign;
use crate::algorithms::lwe_private_functional_packing_keyswitch::private_functional_keyswitch_lwe_ciphertext_into_glwe_ciphertext;
use crate::algorithms::polynomial_algorithms::polynomial_wrapping_monic_monomial_div_assign;
use crate::commons::math::decomposition::DecompositionLevel;
use crate::commons::parameters::*;
use crate::commons::utils::izip;
use crate::entities::*;
use aligned_vec::CACHELINE_ALIGN;
use dyn_stack::{PodStack, SizeOverflow, StackReq};
use tfhe_fft::c64;

/// Returns the required memory for [`extract_bits`].
pub fn extract_bits_scratch(
    input_lwe_dimension: LweDimension,
    ksk_after_key_size: LweSize,
    glwe_size: GlweSize,
    polynomial_size: PolynomialSize,
    fft: FftView<'_>,
) -> Result<StackReq, SizeOverflow> {
    let align = CACHELINE_ALIGN;

    let lwe_in_buffer =
        StackReq::try_new_aligned::<u64>(input_lwe_dimension.to_lwe_size().0, align)?;
    let lwe_out_ks_buffer = StackReq::try_new_aligned::<u64>(ksk_after_key_size.0, align)?;
    let pbs_accumulator =
        StackReq::try_new_aligned::<u64>(try_product([glwe_size.0, polynomial_size.0])?, align)?;
    let lwe_out_pbs_buffer = StackReq::try_new_aligned::<u64>(
        glwe_size
            .to_glwe_dimension()
            .to_equivalent_lwe_dimension(polynomial_size)
            .to_lwe_size()
            .0,
        align,
    )?;
    let lwe_bit_left_shift_buffer = lwe_in_buffer;
    let bootstrap_scratch = bootstrap_scratch(glwe_size, polynomial_size, fft)?;

    lwe_in_buffer
        .try_and(lwe_out_ks_buffer)?
        .try_and(pbs_accumulator)?
        .try_and(lwe_out_pbs_buffer)?
        .try_and(StackReq::try_any_of([
            lwe_bit_left_shift_buffer,
            bootstrap_scratch,
        ])?)
}

/// Extracts the bits at positions `delta_log` to `delta_log + number_of_bits_to_extract - 1` of
/// the message encrypted in `lwe_in`.
///
/// Bits are extracted from the least significant one upwards, each one being removed from the
/// running ciphertext before the next one is shifted to the padding bit. The most significant
/// extracted bit is written at index 0 of `lwe_list_out`. Every output
/// encrypts its bit in the most significant bit of the torus, under the output key of `ksk`.
pub fn extract_bits(
    mut lwe_list_out: LweCiphertextListMutView<'_>,
    lwe_in: LweCiphertextView<'_>,
    ksk: LweKeyswitchKeyView<'_>,
    fourier_bsk: FourierLweBootstrapKeyView<'_>,
    delta_log: DeltaLog,
    number_of_bits_to_extract: ExtractedBitsCount,
    fft: FftView<'_>,
    stack: &mut PodStack,
) {
    let ciphertext_n_bits = u64::BITS as usize;
    let number_of_bits_to_extract = number_of_bits_to_extract.0;

    debug_assert!(
        ciphertext_n_bits >= number_of_bits_to_extract + delta_log.0,
        "Tried to extract {} bits, while the maximum number of extractable bits for {} bits
        ciphertexts and a scaling factor of 2^{} is {}",
        number_of_bits_to_extract,
        ciphertext_n_bits,
        delta_log.0,
        ciphertext_n_bits - delta_log.0,
    );
    debug_assert_eq!(
        lwe_list_out.lwe_ciphertext_count().0,
        number_of_bits_to_extract
    );
    debug_assert_eq!(lwe_list_out.lwe_size(), ksk.output_lwe_size());
    debug_assert_eq!(lwe_in.lwe_dimension(), ksk.input_key_lwe_dimension());
    debug_assert_eq!(
        ksk.output_key_lwe_dimension(),
        fourier_bsk.input_lwe_dimension()
    );

    if number_of_bits_to_extract == 0 {
        return;
    }

    let polynomial_size = fourier_bsk.polynomial_size();
    let glwe_size = fourier_bsk.glwe_size();
    let align = CACHELINE_ALIGN;

    let (lwe_in_buffer_data, stack) = stack.collect_aligned(align, lwe_in.as_ref().iter().copied());
    let mut lwe_in_buffer = LweCiphertext::from_container(&mut *lwe_in_buffer_data);

    let (lwe_out_ks_buffer_data, stack) =
        stack.make_aligned_raw::<u64>(ksk.output_lwe_size().0, align);
    let mut lwe_out_ks_buffer = LweCiphertext::from_container(&mut *lwe_out_ks_buffer_data);

    let (pbs_accumulator_data, stack) =
        stack.make_aligned_raw::<u64>(glwe_size.0 * polynomial_size.0, align);
    pbs_accumulator_data.fill(0);
    let mut pbs_accumulator =
        GlweCiphertextMutView::from_container(&mut *pbs_accumulator_data, polynomial_size);

    let lwe_size = fourier_bsk.output_lwe_dimension().to_lwe_size();
    let (lwe_out_pbs_buffer_data, stack) = stack.make_aligned_raw::<u64>(lwe_size.0, align);
    let mut lwe_out_pbs_buffer = LweCiphertext::from_container(&mut *lwe_out_pbs_buffer_data);

    // The list is filled backwards so that the most significant bit lands at index 0.
    for (bit_idx, mut output_ct) in lwe_list_out.iter_mut().rev().enumerate() {
        // Moves the current bit to the padding bit.
        let shift = ciphertext_n_bits - delta_log.0 - bit_idx - 1;
        let (lwe_bit_left_shift_buffer_data, _) = stack.collect_aligned(
            align,
            lwe_in_buffer.as_ref().iter().map(|s| *s << shift),
        );

        keyswitch_lwe_ciphertext(
            &ksk,
            &LweCiphertext::from_container(&*lwe_bit_left_shift_buffer_data),
            &mut lwe_out_ks_buffer,
        );

        output_ct.as_mut().copy_from_slice(lwe_out_ks_buffer.as_ref());

        if bit_idx == number_of_bits_to_extract - 1 {
            break;
        }

        // Adds q/4 to center the error while evaluating a negacyclic LUT.
        let out_ks_body = lwe_out_ks_buffer.get_mut_body();
        *out_ks_body = out_ks_body.wrapping_add(1 << (ciphertext_n_bits - 2));

        // Constant LUT -alpha, with alpha = delta * 2^(bit_idx - 1).
        pbs_accumulator
            .get_mut_body()
            .as_mut()
            .fill(0u64.wrapping_sub(1 << (delta_log.0 - 1 + bit_idx)));

        fourier_bsk.bootstrap(
            lwe_out_pbs_buffer.as_mut_view(),
            lwe_out_ks_buffer.as_view(),
            pbs_accumulator.as_view(),
            fft,
            stack,
        );

        // After adding alpha, the PBS output encrypts the extracted bit at its original position.
        let out_pbs_body = lwe_out_pbs_buffer.get_mut_body();
        *out_pbs_body = out_pbs_body.wrapping_add(1 << (delta_log.0 + bit_idx - 1));

        // Clears the extracted bit from the running ciphertext.
        izip!(lwe_in_buffer.as_mut(), lwe_out_pbs_buffer.as_ref())
            .for_each(|(out, inp)| *out = out.wrapping_sub(*inp));
    }
}

/// Returns the required memory for [`homomorphic_shift_boolean`].
pub fn homomorphic_shift_boolean_scratch(
    lwe_in_size: LweSize,
    glwe_size: GlweSize,
    polynomial_size: PolynomialSize,
    fft: FftView<'_>,
) -> Result<StackReq, SizeOverflow> {
    let align = CACHELINE_ALIGN;
    StackReq::try_all_of([
        StackReq::try_new_aligned::<u64>(lwe_in_size.0, align)?,
        StackReq::try_new_aligned::<u64>(try_product([polynomial_size.0, glwe_size.0])?, align)?,
        bootstrap_scratch(glwe_size, polynomial_size, fft)?,
    ])
}

/// Maps an encryption of a single bit `b` scaled by `2^delta_log` to an encryption of
/// `b * 2^(64 - base_log * level)` under the output key of `fourier_bsk`.
pub fn homomorphic_shift_boolean(
    fourier_bsk: FourierLweBootstrapKeyView<'_>,
    mut lwe_out: LweCiphertextMutView<'_>,
    lwe_in: LweCiphertextView<'_>,
    level_cbs: DecompositionLevel,
    base_log_cbs: DecompositionBaseLog,
    delta_log: DeltaLog,
    fft: FftView<'_>,
    stack: &mut PodStack,
) {
    let ciphertext_n_bits = u64::BITS as usize;
    let polynomial_size = fourier_bsk.polynomial_size();
    let alpha = 1u64 << (ciphertext_n_bits - 1 - base_log_cbs.0 * level_cbs.0);

    let (lwe_left_shift_buffer_data, stack) =
        stack.collect_aligned(CACHELINE_ALIGN, lwe_in.as_ref().iter().copied());
    let mut lwe_left_shift_buffer = LweCiphertext::from_container(&mut *lwe_left_shift_buffer_data);

    // The message holds a single bit, moved to the padding bit.
    lwe_ciphertext_cleartext_mul_assign(
        &mut lwe_left_shift_buffer,
        Cleartext(1 << (ciphertext_n_bits - delta_log.0 - 1)),
    );

    // Adds q/4 to center the error while evaluating a negacyclic LUT.
    let shift_buffer_body = lwe_left_shift_buffer.get_mut_body();
    *shift_buffer_body = shift_buffer_body.wrapping_add(1 << (ciphertext_n_bits - 2));

    let (pbs_accumulator_data, stack) = stack.make_aligned_raw::<u64>(
        polynomial_size.0 * fourier_bsk.glwe_size().0,
        CACHELINE_ALIGN,
    );
    pbs_accumulator_data.fill(0);
    let mut pbs_accumulator =
        GlweCiphertextMutView::from_container(&mut *pbs_accumulator_data, polynomial_size);

    // Constant LUT -alpha: the negacyclic rotation gives -alpha for b = 0 and alpha for b = 1.
    pbs_accumulator
        .get_mut_body()
        .as_mut()
        .fill(alpha.wrapping_neg());

    fourier_bsk.bootstrap(
        lwe_out.as_mut_view(),
        lwe_left_shift_buffer.as_view(),
        pbs_accumulator.as_view(),
        fft,
        stack,
    );

    let out_body = lwe_out.get_mut_body();
    *out_body = out_body.wrapping_add(alpha);
}

/// Returns the required memory for [`circuit_bootstrap_boolean`].
pub fn circuit_bootstrap_boolean_scratch(
    lwe_in_size: LweSize,
    bsk_output_lwe_size: LweSize,
    glwe_size: GlweSize,
    polynomial_size: PolynomialSize,
    fft: FftView<'_>,
) -> Result<StackReq, SizeOverflow> {
    StackReq::try_new_aligned::<u64>(bsk_output_lwe_size.0, CACHELINE_ALIGN)?.try_and(
        homomorphic_shift_boolean_scratch(lwe_in_size, glwe_size, polynomial_size, fft)?,
    )
}

/// Circuit bootstrapping of a boolean message: turns an LWE encryption of a bit scaled by
/// `2^delta_log` into a GGSW encryption of the same bit, with the decomposition parameters of
/// `ggsw_out`.
pub fn circuit_bootstrap_boolean(
    fourier_bsk: FourierLweBootstrapKeyView<'_>,
    lwe_in: LweCiphertextView<'_>,
    mut ggsw_out: GgswCiphertextMutView<'_>,
    delta_log: DeltaLog,
    pfpksk_list: LwePrivateFunctionalPackingKeyswitchKeyListView<'_>,
    fft: FftView<'_>,
    stack: &mut PodStack,
) {
    let level_cbs = ggsw_out.decomposition_level_count();
    let base_log_cbs = ggsw_out.decomposition_base_log();

    debug_assert!(
        level_cbs.0 >= 1,
        "When doing a circuit bootstrap the desired number of levels of the output GGSW \
        should be at least 1"
    );
    debug_assert!(
        base_log_cbs.0 * level_cbs.0 < u64::BITS as usize,
        "Got a base_log ({}) and level ({}) larger than or equal to 64 bits",
        base_log_cbs.0,
        level_cbs.0,
    );
    debug_assert_eq!(pfpksk_list.output_glwe_size(), ggsw_out.glwe_size());
    debug_assert_eq!(
        pfpksk_list.output_polynomial_size(),
        ggsw_out.polynomial_size()
    );
    debug_assert_eq!(
        pfpksk_list.input_lwe_dimension(),
        fourier_bsk.output_lwe_dimension()
    );
    debug_assert_eq!(pfpksk_list.lwe_pfpksk_count().0, ggsw_out.glwe_size().0);

    let (lwe_out_bs_buffer_data, stack) = stack.make_aligned_raw::<u64>(
        fourier_bsk.output_lwe_dimension().to_lwe_size().0,
        CACHELINE_ALIGN,
    );
    let mut lwe_out_bs_buffer = LweCiphertext::from_container(&mut *lwe_out_bs_buffer_data);

    for mut ggsw_level_matrix in ggsw_out.iter_mut() {
        homomorphic_shift_boolean(
            fourier_bsk,
            lwe_out_bs_buffer.as_mut_view(),
            lwe_in.as_view(),
            ggsw_level_matrix.decomposition_level(),
            base_log_cbs,
            delta_log,
            fft,
            stack,
        );

        // Row j of the level matrix packs the shifted bit times -s_j, the last row the bit
        // itself.
        for (pfpksk, mut glwe_out) in izip!(
            pfpksk_list.iter(),
            ggsw_level_matrix.as_mut_glwe_list().iter_mut()
        ) {
            private_functional_keyswitch_lwe_ciphertext_into_glwe_ciphertext(
                &pfpksk,
                &mut glwe_out,
                &lwe_out_bs_buffer,
            );
        }
    }
}

/// Returns the required memory for [`cmux_tree_memory_optimized`].
pub fn cmux_tree_memory_optimized_scratch(
    glwe_size: GlweSize,
    polynomial_size: PolynomialSize,
    nb_layer: usize,
    fft: FftView<'_>,
) -> Result<StackReq, SizeOverflow> {
    let t_scratch = StackReq::try_new_aligned::<u64>(
        try_product([polynomial_size.0, glwe_size.0, nb_layer])?,
        CACHELINE_ALIGN,
    )?;

    StackReq::try_all_of([
        t_scratch,                                                           // t_0
        t_scratch,                                                           // t_1
        StackReq::try_new_aligned::<usize>(nb_layer, CACHELINE_ALIGN)?,      // t_fill
        t_scratch,                                                           // diff
        add_external_product_assign_scratch(glwe_size, polynomial_size, fft)?,
    ])
}

/// Performs a tree of cmux selecting one polynomial of `lut_per_layer`, the last GGSW of
/// `ggsw_list` driving the first layer.
///
/// Only one GLWE per layer and per branch is alive at any time, so the memory grows with the
/// number of layers instead of the number of leaves.
pub fn cmux_tree_memory_optimized(
    mut output_glwe: GlweCiphertextMutView<'_>,
    lut_per_layer: PolynomialListView<'_>,
    ggsw_list: FourierGgswCiphertextListView<'_>,
    fft: FftView<'_>,
    stack: &mut PodStack,
) {
    debug_assert!(lut_per_layer.polynomial_count().0 == 1 << ggsw_list.count());

    if ggsw_list.count() == 0 {
        output_glwe.get_mut_mask().as_mut().fill(0);
        output_glwe
            .get_mut_body()
            .as_mut()
            .copy_from_slice(lut_per_layer.as_ref());
        return;
    }

    let glwe_size = output_glwe.glwe_size();
    let polynomial_size = ggsw_list.polynomial_size();
    let nb_layer = ggsw_list.count();

    debug_assert!(cmux_tree_memory_optimized_scratch(glwe_size, polynomial_size, nb_layer, fft)
        .map(|req| stack.can_hold(req))
        .unwrap_or(false));

    // t_0[j] and t_1[j] hold the two inputs of layer j. Layer 0 is loaded from the LUT, the
    // output of the last layer goes to `output_glwe`.
    let (t_0_data, stack) =
        stack.make_aligned_raw::<u64>(polynomial_size.0 * glwe_size.0 * nb_layer, CACHELINE_ALIGN);
    t_0_data.fill(0);
    let (t_1_data, stack) =
        stack.make_aligned_raw::<u64>(polynomial_size.0 * glwe_size.0 * nb_layer, CACHELINE_ALIGN);
    t_1_data.fill(0);

    let mut t_0 = GlweCiphertextListMutView::from_container(t_0_data, glwe_size, polynomial_size);
    let mut t_1 = GlweCiphertextListMutView::from_container(t_1_data, glwe_size, polynomial_size);

    let (t_fill, stack) = stack.make_aligned_raw::<usize>(nb_layer, CACHELINE_ALIGN);
    t_fill.fill(0);

    let mut lut_polynomial_iter = lut_per_layer.iter();
    loop {
        let even = lut_polynomial_iter.next();
        let odd = lut_polynomial_iter.next();

        let (Some(lut_2i), Some(lut_2i_plus_1)) = (even, odd) else {
            break;
        };

        let mut t_iter = izip!(t_0.iter_mut(), t_1.iter_mut()).enumerate();

        let (mut j_counter, (mut t0_j, mut t1_j)) = t_iter
            .next()
            .expect("the cmux tree has at least one layer");

        t0_j.get_mut_body().as_mut().copy_from_slice(lut_2i.as_ref());
        t1_j.get_mut_body()
            .as_mut()
            .copy_from_slice(lut_2i_plus_1.as_ref());

        t_fill[0] = 2;

        for (j, ggsw) in ggsw_list.into_ggsw_iter().rev().enumerate() {
            if t_fill[j] != 2 {
                break;
            }

            let (diff_data, stack) = stack.collect_aligned(
                CACHELINE_ALIGN,
                izip!(t1_j.as_ref(), t0_j.as_ref()).map(|(&a, &b)| a.wrapping_sub(b)),
            );
            let diff = GlweCiphertextView::from_container(&*diff_data, polynomial_size);

            if j != nb_layer - 1 {
                let (j_counter_plus_1, (mut t_0_j_plus_1, mut t_1_j_plus_1)) = t_iter
                    .next()
                    .expect("the cmux tree has one buffer per layer");

                debug_assert_eq!(j_counter, j);
                debug_assert_eq!(j_counter_plus_1, j + 1);

                let mut output = if t_fill[j + 1] == 0 {
                    t_0_j_plus_1.as_mut_view()
                } else {
                    t_1_j_plus_1.as_mut_view()
                };

                output.as_mut().copy_from_slice(t0_j.as_ref());
                add_external_product_assign(output, ggsw, diff, fft, stack);
                t_fill[j + 1] += 1;
                t_fill[j] = 0;

                (j_counter, t0_j, t1_j) = (j_counter_plus_1, t_0_j_plus_1, t_1_j_plus_1);
            } else {
                let mut output = output_glwe.as_mut_view();
                output.as_mut().copy_from_slice(t0_j.as_ref());
                add_external_product_assign(output, ggsw, diff, fft, stack);
            }
        }
    }
}

/// Returns the required memory for [`blind_rotate_assign`].
pub fn blind_rotate_assign_scratch(
    glwe_size: GlweSize,
    polynomial_size: PolynomialSize,
    fft: FftView<'_>,
) -> Result<StackReq, SizeOverflow> {
    StackReq::try_all_of([
        StackReq::try_new_aligned::<u64>(
            try_product([polynomial_size.0, glwe_size.0])?,
            CACHELINE_ALIGN,
        )?,
        cmux_scratch(glwe_size, polynomial_size, fft)?,
    ])
}

/// Rotates `lut` by `X^-i`, where `i` is the integer whose bits are encrypted by `ggsw_list`,
/// the last GGSW holding the least significant bit.
pub fn blind_rotate_assign(
    mut lut: GlweCiphertextMutView<'_>,
    ggsw_list: FourierGgswCiphertextListView<'_>,
    fft: FftView<'_>,
    stack: &mut PodStack,
) {
    let mut monomial_degree = MonomialDegree(1);
    let polynomial_size = lut.polynomial_size();

    for ggsw in ggsw_list.into_ggsw_iter().rev() {
        let ct_0 = lut.as_mut_view();
        let (ct1_data, stack) =
            stack.collect_aligned(CACHELINE_ALIGN, ct_0.as_ref().iter().copied());
        let mut ct_1 = GlweCiphertextMutView::from_container(&mut *ct1_data, polynomial_size);
        ct_1.as_mut_polynomial_list()
            .iter_mut()
            .for_each(|mut poly| {
                polynomial_wrapping_monic_monomial_div_assign(&mut poly, monomial_degree);
            });
        monomial_degree.0 <<= 1;
        cmux(ct_0, ct_1, ggsw, fft, stack);
    }
}

/// Returns the required memory for [`vertical_packing`].
pub fn vertical_packing_scratch(
    glwe_size: GlweSize,
    polynomial_size: PolynomialSize,
    lut_polynomial_count: PolynomialCount,
    bit_count: usize,
    fft: FftView<'_>,
) -> Result<StackReq, SizeOverflow> {
    let log_lut_number = log2_floor(lut_polynomial_count.0);
    let log_number_of_luts_for_cmux_tree = if log_lut_number > bit_count {
        0
    } else {
        log_lut_number
    };

    StackReq::try_all_of([
        StackReq::try_new_aligned::<u64>(
            try_product([glwe_size.0, polynomial_size.0])?,
            CACHELINE_ALIGN,
        )?,
        StackReq::try_any_of([
            cmux_tree_memory_optimized_scratch(
                glwe_size,
                polynomial_size,
                log_number_of_luts_for_cmux_tree,
                fft,
            )?,
            blind_rotate_assign_scratch(glwe_size, polynomial_size, fft)?,
        ])?,
    ])
}

fn log2_floor(value: usize) -> usize {
    (usize::BITS - 1 - value.leading_zeros()) as usize
}

/// Looks up `lut` at the index encrypted bit by bit in `ggsw_list`, the first GGSW holding the
/// most significant bit, and writes the result in `lwe_out`.
///
/// The most significant bits select a polynomial of `lut` through a cmux tree, the remaining
/// ones select its coefficient through a blind rotation.
pub fn vertical_packing(
    lut: PolynomialListView<'_>,
    mut lwe_out: LweCiphertextMutView<'_>,
    ggsw_list: FourierGgswCiphertextListView<'_>,
    fft: FftView<'_>,
    stack: &mut PodStack,
) {
    let polynomial_size = ggsw_list.polynomial_size();
    let glwe_size = ggsw_list.glwe_size();

    debug_assert_eq!(
        lwe_out.lwe_dimension(),
        glwe_size
            .to_glwe_dimension()
            .to_equivalent_lwe_dimension(polynomial_size)
    );

    // Zero when the LUT fits in a single polynomial.
    let log_lut_number = log2_floor(lut.polynomial_count().0);

    let log_number_of_luts_for_cmux_tree = if log_lut_number > ggsw_list.count() {
        // Not enough GGSW ciphertexts for a cmux tree, only the blind rotation is performed.
        0
    } else {
        log_lut_number
    };

    let (cmux_ggsw, br_ggsw) = ggsw_list.split_at(log_number_of_luts_for_cmux_tree);

    let (cmux_tree_lut_res_data, stack) =
        stack.make_aligned_raw::<u64>(polynomial_size.0 * glwe_size.0, CACHELINE_ALIGN);
    let mut cmux_tree_lut_res =
        GlweCiphertextMutView::from_container(&mut *cmux_tree_lut_res_data, polynomial_size);

    cmux_tree_memory_optimized(
        cmux_tree_lut_res.as_mut_view(),
        lut,
        cmux_ggsw,
        fft,
        stack,
    );
    blind_rotate_assign(cmux_tree_lut_res.as_mut_view(), br_ggsw, fft, stack);

    extract_lwe_sample_from_glwe_ciphertext(&cmux_tree_lut_res, &mut lwe_out, MonomialDegree(0));
}

/// Number of polynomials needed to hold a table of `lut_size` entries, a table smaller than a
/// polynomial being padded with zeros.
pub fn lut_polynomial_count(lut_size: usize, polynomial_size: PolynomialSize) -> PolynomialCount {
    PolynomialCount(lut_size.div_ceil(polynomial_size.0).max(1))
}

/// Returns the required memory for [`circuit_bootstrap_boolean_vertical_packing`].
pub fn circuit_bootstrap_boolean_vertical_packing_scratch(
    lwe_list_in_count: LweCiphertextCount,
    lwe_list_out_count: LweCiphertextCount,
    lwe_in_size: LweSize,
    big_lut_polynomial_count: PolynomialCount,
    bsk_output_lwe_size: LweSize,
    glwe_size: GlweSize,
    fpksk_output_polynomial_size: PolynomialSize,
    level_cbs: DecompositionLevelCount,
    fft: FftView<'_>,
) -> Result<StackReq, SizeOverflow> {
    debug_assert_eq!(big_lut_polynomial_count.0 % lwe_list_out_count.0, 0);
    let lut_polynomial_count = PolynomialCount(big_lut_polynomial_count.0 / lwe_list_out_count.0);

    // ggsw_list
    let ggsw_list_req = StackReq::try_new_aligned::<c64>(
        try_product([
            lwe_list_in_count.0,
            level_cbs.0,
            glwe_size.0,
            glwe_size.0,
            fpksk_output_polynomial_size.to_fourier_polynomial_size().0,
        ])?,
        CACHELINE_ALIGN,
    )?;
    // ggsw_res
    let ggsw_res_req = StackReq::try_new_aligned::<u64>(
        try_product([
            level_cbs.0,
            glwe_size.0,
            glwe_size.0,
            fpksk_output_polynomial_size.0,
        ])?,
        CACHELINE_ALIGN,
    )?;
    // padded lut
    let lut_req = StackReq::try_new_aligned::<u64>(
        try_product([lut_polynomial_count.0, fpksk_output_polynomial_size.0])?,
        CACHELINE_ALIGN,
    )?;

    ggsw_list_req.try_and(StackReq::try_any_of([
        ggsw_res_req.try_and(StackReq::try_any_of([
            circuit_bootstrap_boolean_scratch(
                lwe_in_size,
                bsk_output_lwe_size,
                glwe_size,
                fpksk_output_polynomial_size,
                fft,
            )?,
            fft.forward_scratch()?,
        ])?)?,
        lut_req.try_and(vertical_packing_scratch(
            glwe_size,
            fpksk_output_polynomial_size,
            lut_polynomial_count,
            lwe_list_in_count.0,
            fft,
        )?)?,
    ])?)
}

/// Circuit bootstraps every input bit into a GGSW ciphertext, then evaluates each of the
/// `lwe_list_out.lwe_ciphertext_count()` tables stored back to back in `big_lut` by vertical
/// packing, the first input being the most significant bit of the index.
///
/// Each table holds `big_lut.len() / lwe_list_out.lwe_ciphertext_count()` entries.
pub fn circuit_bootstrap_boolean_vertical_packing(
    big_lut: &[u64],
    fourier_bsk: FourierLweBootstrapKeyView<'_>,
    mut lwe_list_out: LweCiphertextListMutView<'_>,
    lwe_list_in: LweCiphertextListView<'_>,
    pfpksk_list: LwePrivateFunctionalPackingKeyswitchKeyListView<'_>,
    level_cbs: DecompositionLevelCount,
    base_log_cbs: DecompositionBaseLog,
    fft: FftView<'_>,
    stack: &mut PodStack,
) {
    debug_assert!(
        lwe_list_in.lwe_ciphertext_count().0 != 0,
        "Got an empty list of input ciphertexts"
    );
    debug_assert!(
        lwe_list_out.lwe_ciphertext_count().0 != 0,
        "Got an empty list of output ciphertexts"
    );
    debug_assert_eq!(big_lut.len() % lwe_list_out.lwe_ciphertext_count().0, 0);
    debug_assert_eq!(
        lwe_list_out.lwe_size().to_lwe_dimension(),
        fourier_bsk.output_lwe_dimension()
    );

    let glwe_size = pfpksk_list.output_glwe_size();
    let polynomial_size = pfpksk_list.output_polynomial_size();
    let lwe_list_in_count = lwe_list_in.lwe_ciphertext_count().0;

    let (ggsw_list_data, stack) = stack.make_aligned_raw::<c64>(
        lwe_list_in_count * fourier_ggsw_ciphertext_size(glwe_size, polynomial_size, level_cbs),
        CACHELINE_ALIGN,
    );
    let mut ggsw_list = FourierGgswCiphertextListMutView::new(
        ggsw_list_data,
        lwe_list_in_count,
        glwe_size,
        polynomial_size,
        base_log_cbs,
        level_cbs,
    );

    {
        let (ggsw_res_data, stack) = stack.make_aligned_raw::<u64>(
            level_cbs.0 * glwe_size.0 * glwe_size.0 * polynomial_size.0,
            CACHELINE_ALIGN,
        );
        let mut ggsw_res = GgswCiphertextMutView::from_container(
            &mut *ggsw_res_data,
            glwe_size,
            polynomial_size,
            base_log_cbs,
        );

        for (lwe_in, ggsw) in izip!(
            lwe_list_in.iter(),
            ggsw_list.as_mut_view().into_ggsw_iter()
        ) {
            // The packing keyswitch accumulates in its output.
            ggsw_res.as_mut().fill(0);
            circuit_bootstrap_boolean(
                fourier_bsk,
                lwe_in,
                ggsw_res.as_mut_view(),
                DeltaLog(u64::BITS as usize - 1),
                pfpksk_list.as_view(),
                fft,
                stack,
            );

            ggsw.fill_with_forward_fourier(&ggsw_res, fft, stack);
        }
    }

    let lut_size = big_lut.len() / lwe_list_out.lwe_ciphertext_count().0;
    let lut_polynomial_count = lut_polynomial_count(lut_size, polynomial_size);
    let (padded_lut_data, stack) = stack.make_aligned_raw::<u64>(
        lut_polynomial_count.0 * polynomial_size.0,
        CACHELINE_ALIGN,
    );

    for (lut, lwe_out) in izip!(
        big_lut.chunks_exact(lut_size),
        lwe_list_out.iter_mut()
    ) {
        padded_lut_data[..lut_size].copy_from_slice(lut);
        padded_lut_data[lut_size..].fill(0);
        let lut = PolynomialListView::from_container(&*padded_lut_data, polynomial_size);

        vertical_packing(lut, lwe_out, ggsw_list.as_view(), fft, stack);
    }
}

#[cfg(test)]
mod tests;
