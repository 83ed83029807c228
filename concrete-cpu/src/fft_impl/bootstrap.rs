use super::fft::{par_convert_polynomials_list_to_fourier, FftView};
use super::ggsw::*;
use super::try_product;
use crate::algorithms::glwe_sample_extraction::extract_lwe_sample_from_glwe_ciphertext;
use crate::algorithms::polynomial_algorithms::*;
use crate::commons::numeric::round_shift_right;
use crate::commons::parameters::{
    DecompositionBaseLog, DecompositionLevelCount, GlweSize, LweDimension, MonomialDegree,
    PolynomialSize,
};
use crate::commons::traits::{Container, ContainerMut, Split};
use crate::commons::utils::izip;
use crate::entities::*;
use aligned_vec::{avec, ABox, CACHELINE_ALIGN};
use dyn_stack::{PodStack, SizeOverflow, StackReq};
use tfhe_fft::c64;

/// An LWE bootstrapping key in the Fourier domain: one Fourier GGSW ciphertext per coefficient of
/// the input LWE secret key.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FourierLweBootstrapKey<C: Container<Element = c64>> {
    ggsw_list: FourierGgswCiphertextList<C>,
}

pub type FourierLweBootstrapKeyOwned = FourierLweBootstrapKey<ABox<[c64]>>;
pub type FourierLweBootstrapKeyView<'a> = FourierLweBootstrapKey<&'a [c64]>;
pub type FourierLweBootstrapKeyMutView<'a> = FourierLweBootstrapKey<&'a mut [c64]>;

/// Returns the number of complex coefficients of a bootstrapping key in the Fourier domain.
pub fn fourier_bootstrap_key_size(
    input_lwe_dimension: LweDimension,
    glwe_size: GlweSize,
    polynomial_size: PolynomialSize,
    decomposition_level_count: DecompositionLevelCount,
) -> usize {
    input_lwe_dimension.0
        * fourier_ggsw_ciphertext_size(glwe_size, polynomial_size, decomposition_level_count)
}

impl<C: Container<Element = c64>> FourierLweBootstrapKey<C> {
    pub fn from_container(
        data: C,
        input_lwe_dimension: LweDimension,
        glwe_size: GlweSize,
        polynomial_size: PolynomialSize,
        decomposition_base_log: DecompositionBaseLog,
        decomposition_level_count: DecompositionLevelCount,
    ) -> Self {
        Self {
            ggsw_list: FourierGgswCiphertextList::new(
                data,
                input_lwe_dimension.0,
                glwe_size,
                polynomial_size,
                decomposition_base_log,
                decomposition_level_count,
            ),
        }
    }

    /// Returns an iterator over the GGSW ciphertexts composing the key.
    pub fn into_ggsw_iter(self) -> impl DoubleEndedIterator<Item = FourierGgswCiphertext<C>>
    where
        C: Split,
    {
        self.ggsw_list.into_ggsw_iter()
    }

    pub fn input_lwe_dimension(&self) -> LweDimension {
        LweDimension(self.ggsw_list.count())
    }

    pub fn polynomial_size(&self) -> PolynomialSize {
        self.ggsw_list.polynomial_size()
    }

    pub fn glwe_size(&self) -> GlweSize {
        self.ggsw_list.glwe_size()
    }

    pub fn decomposition_base_log(&self) -> DecompositionBaseLog {
        self.ggsw_list.decomposition_base_log()
    }

    pub fn decomposition_level_count(&self) -> DecompositionLevelCount {
        self.ggsw_list.decomposition_level_count()
    }

    pub fn output_lwe_dimension(&self) -> LweDimension {
        self.glwe_size()
            .to_glwe_dimension()
            .to_equivalent_lwe_dimension(self.polynomial_size())
    }

    pub fn data(self) -> C {
        self.ggsw_list.data()
    }

    pub fn as_view(&self) -> FourierLweBootstrapKeyView<'_> {
        FourierLweBootstrapKey {
            ggsw_list: self.ggsw_list.as_view(),
        }
    }
}

impl<C: ContainerMut<Element = c64>> FourierLweBootstrapKey<C> {
    pub fn as_mut_view(&mut self) -> FourierLweBootstrapKeyMutView<'_> {
        FourierLweBootstrapKey {
            ggsw_list: self.ggsw_list.as_mut_view(),
        }
    }
}

impl FourierLweBootstrapKeyOwned {
    pub fn new(
        input_lwe_dimension: LweDimension,
        glwe_size: GlweSize,
        polynomial_size: PolynomialSize,
        decomposition_base_log: DecompositionBaseLog,
        decomposition_level_count: DecompositionLevelCount,
    ) -> Self {
        let size = fourier_bootstrap_key_size(
            input_lwe_dimension,
            glwe_size,
            polynomial_size,
            decomposition_level_count,
        );
        FourierLweBootstrapKey::from_container(
            avec![c64::default(); size].into_boxed_slice(),
            input_lwe_dimension,
            glwe_size,
            polynomial_size,
            decomposition_base_log,
            decomposition_level_count,
        )
    }
}

impl FourierLweBootstrapKeyMutView<'_> {
    /// Fills the bootstrapping key with the Fourier transform of a bootstrapping key in the
    /// standard domain.
    ///
    /// The required memory is given by [`fill_with_forward_fourier_scratch`].
    pub fn fill_with_forward_fourier<InputCont: Container<Element = u64>>(
        mut self,
        coef_bsk: &LweBootstrapKey<InputCont>,
        fft: FftView<'_>,
        stack: &mut PodStack,
    ) {
        assert_eq!(coef_bsk.input_lwe_dimension(), self.input_lwe_dimension());
        assert_eq!(coef_bsk.glwe_size(), self.glwe_size());
        assert_eq!(coef_bsk.polynomial_size(), self.polynomial_size());

        for (fourier_ggsw, standard_ggsw) in
            izip!(self.as_mut_view().into_ggsw_iter(), coef_bsk.iter())
        {
            fourier_ggsw.fill_with_forward_fourier(&standard_ggsw, fft, stack);
        }
    }

    /// Parallel variant of [`Self::fill_with_forward_fourier`], using its own scratch memory.
    pub fn par_fill_with_forward_fourier<InputCont: Container<Element = u64>>(
        self,
        coef_bsk: &LweBootstrapKey<InputCont>,
        fft: FftView<'_>,
    ) -> Result<(), SizeOverflow> {
        assert_eq!(coef_bsk.input_lwe_dimension(), self.input_lwe_dimension());
        assert_eq!(coef_bsk.glwe_size(), self.glwe_size());
        assert_eq!(coef_bsk.polynomial_size(), self.polynomial_size());

        let polynomial_size = self.polynomial_size();
        par_convert_polynomials_list_to_fourier(
            self.data(),
            coef_bsk.as_ref(),
            polynomial_size,
            fft,
        )
    }
}

/// Switches a torus element to the modulus `2N` of the exponents of `X` in
/// `Z[X] / (X^N + 1)`, rounding to the closest value.
#[inline]
pub fn pbs_modulus_switch(input: u64, polynomial_size: PolynomialSize) -> usize {
    let log_2n = polynomial_size.log2().0 + 1;
    let switched = round_shift_right(input, u64::BITS as usize - log_2n);
    (switched as usize) & ((1 << log_2n) - 1)
}

/// Returns the required memory for [`FourierLweBootstrapKeyView::blind_rotate_assign`].
pub fn blind_rotate_scratch(
    glwe_size: GlweSize,
    polynomial_size: PolynomialSize,
    fft: FftView<'_>,
) -> Result<StackReq, SizeOverflow> {
    StackReq::try_any_of([
        // tmp_poly
        StackReq::try_new_aligned::<u64>(polynomial_size.0, CACHELINE_ALIGN)?,
        StackReq::try_all_of([
            // ct1
            StackReq::try_new_aligned::<u64>(
            try_product([glwe_size.0, polynomial_size.0])?,
            CACHELINE_ALIGN,
        )?,
            add_external_product_assign_scratch(glwe_size, polynomial_size, fft)?,
        ])?,
    ])
}

/// Returns the required memory for [`FourierLweBootstrapKeyView::bootstrap`].
pub fn bootstrap_scratch(
    glwe_size: GlweSize,
    polynomial_size: PolynomialSize,
    fft: FftView<'_>,
) -> Result<StackReq, SizeOverflow> {
    blind_rotate_scratch(glwe_size, polynomial_size, fft)?.try_and(
        StackReq::try_new_aligned::<u64>(
            try_product([glwe_size.0, polynomial_size.0])?,
            CACHELINE_ALIGN,
        )?,
    )
}

impl FourierLweBootstrapKeyView<'_> {
    /// Rotates `lut` by `X^-(body - sum a_i s_i)`, with every coefficient of `lwe` switched to the
    /// modulus `2N`.
    pub fn blind_rotate_assign(
        self,
        mut lut: GlweCiphertextMutView<'_>,
        lwe: &[u64],
        fft: FftView<'_>,
        stack: &mut PodStack,
    ) {
        let Some((lwe_body, lwe_mask)) = lwe.split_last() else {
            return;
        };
        debug_assert_eq!(lwe_mask.len(), self.input_lwe_dimension().0);

        let lut_poly_size = lut.polynomial_size();
        let monomial_degree = MonomialDegree(pbs_modulus_switch(*lwe_body, lut_poly_size));

        lut.as_mut_polynomial_list()
            .iter_mut()
            .for_each(|mut poly| {
                polynomial_wrapping_monic_monomial_div_assign(&mut poly, monomial_degree);
            });

        let mut ct0 = lut;
        let (ct1, stack) = stack.make_aligned_raw::<u64>(ct0.as_ref().len(), CACHELINE_ALIGN);
        let mut ct1 = GlweCiphertextMutView::from_container(&mut *ct1, lut_poly_size);

        for (lwe_mask_element, bootstrap_key_ggsw) in izip!(lwe_mask.iter(), self.into_ggsw_iter())
        {
            if *lwe_mask_element != 0 {
                let monomial_degree =
                    MonomialDegree(pbs_modulus_switch(*lwe_mask_element, lut_poly_size));

                // First step of the cmux, merged with the rotation:
                // ct1 <- ct0 * X^a_i - ct0
                for (mut ct1_poly, ct0_poly) in izip!(
                    ct1.as_mut_polynomial_list().iter_mut(),
                    ct0.as_polynomial_list().iter(),
                ) {
                    polynomial_wrapping_monic_monomial_mul(
                        &mut ct1_poly,
                        &ct0_poly,
                        monomial_degree,
                    );
                    polynomial_wrapping_sub_assign(&mut ct1_poly, &ct0_poly);
                }

                add_external_product_assign(
                    ct0.as_mut_view(),
                    bootstrap_key_ggsw,
                    ct1.as_view(),
                    fft,
                    stack,
                );
            }
        }
    }

    /// Programmable bootstrap of `lwe_in` with the look-up table `accumulator`, writing the
    /// constant coefficient of the rotated accumulator in `lwe_out`.
    pub fn bootstrap(
        self,
        mut lwe_out: LweCiphertextMutView<'_>,
        lwe_in: LweCiphertextView<'_>,
        accumulator: GlweCiphertextView<'_>,
        fft: FftView<'_>,
        stack: &mut PodStack,
    ) {
        debug_assert_eq!(lwe_in.lwe_dimension(), self.input_lwe_dimension());
        debug_assert_eq!(lwe_out.lwe_dimension(), self.output_lwe_dimension());
        debug_assert!(
            bootstrap_scratch(self.glwe_size(), self.polynomial_size(), fft)
                .map(|req| stack.can_hold(req))
                .unwrap_or(false),
            "scratch stack smaller than bootstrap_scratch",
        );

        let (local_accumulator_data, stack) =
            stack.collect_aligned(CACHELINE_ALIGN, accumulator.as_ref().iter().copied());
        let mut local_accumulator = GlweCiphertextMutView::from_container(
            &mut *local_accumulator_data,
            accumulator.polynomial_size(),
        );
        self.blind_rotate_assign(local_accumulator.as_mut_view(), lwe_in.as_ref(), fft, stack);

        extract_lwe_sample_from_glwe_ciphertext(
            &local_accumulator,
            &mut lwe_out,
            MonomialDegree(0),
        );
    }
}

#[cfg(test)]
mod tests;
