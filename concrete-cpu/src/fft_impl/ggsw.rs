use super::fft::{FftView, FourierPolynomialMutView};
use super::try_product;
use crate::commons::math::decomposition::{
    DecompositionLevel, SignedDecomposer, TensorSignedDecompositionLendingIter,
};
use crate::commons::parameters::{
    DecompositionBaseLog, DecompositionLevelCount, GlweSize, PolynomialSize,
};
use crate::commons::traits::{Container, ContainerMut, Split};
use crate::commons::utils::izip;
use crate::entities::{GgswCiphertext, GlweCiphertextMutView, GlweCiphertextView, PolynomialView};
use aligned_vec::{avec, ABox, CACHELINE_ALIGN};
use dyn_stack::{PodStack, SizeOverflow, StackReq};
use tfhe_fft::c64;

/// Parameters shared by every GGSW ciphertext of a Fourier domain buffer.
///
/// A ciphertext is stored level by level, from the last decomposition level to the first. Each
/// level is a `(k + 1) x (k + 1)` matrix of Fourier polynomials stored row by row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FourierGgswLayout {
    pub glwe_size: GlweSize,
    pub polynomial_size: PolynomialSize,
    pub decomposition_base_log: DecompositionBaseLog,
    pub decomposition_level_count: DecompositionLevelCount,
}

impl FourierGgswLayout {
    fn fourier_polynomial_size(&self) -> usize {
        self.polynomial_size.to_fourier_polynomial_size().0
    }

    fn row_size(&self) -> usize {
        self.glwe_size.0 * self.fourier_polynomial_size()
    }

    fn level_size(&self) -> usize {
        fourier_ggsw_level_matrix_size(self.glwe_size, self.polynomial_size)
    }

    fn ciphertext_size(&self) -> usize {
        self.decomposition_level_count.0 * self.level_size()
    }
}

/// Returns the number of complex coefficients of a GGSW level matrix in the Fourier domain.
pub fn fourier_ggsw_level_matrix_size(glwe_size: GlweSize, polynomial_size: PolynomialSize) -> usize {
    glwe_size.0 * glwe_size.0 * polynomial_size.to_fourier_polynomial_size().0
}

/// Returns the number of complex coefficients of a GGSW ciphertext in the Fourier domain.
pub fn fourier_ggsw_ciphertext_size(
    glwe_size: GlweSize,
    polynomial_size: PolynomialSize,
    decomposition_level_count: DecompositionLevelCount,
) -> usize {
    decomposition_level_count.0 * fourier_ggsw_level_matrix_size(glwe_size, polynomial_size)
}

/// A GGSW ciphertext in the Fourier domain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FourierGgswCiphertext<C: Container<Element = c64>> {
    data: C,
    layout: FourierGgswLayout,
}

pub type FourierGgswCiphertextOwned = FourierGgswCiphertext<ABox<[c64]>>;
pub type FourierGgswCiphertextView<'a> = FourierGgswCiphertext<&'a [c64]>;
pub type FourierGgswCiphertextMutView<'a> = FourierGgswCiphertext<&'a mut [c64]>;

impl<C: Container<Element = c64>> FourierGgswCiphertext<C> {
    pub fn from_container(
        data: C,
        glwe_size: GlweSize,
        polynomial_size: PolynomialSize,
        decomposition_base_log: DecompositionBaseLog,
        decomposition_level_count: DecompositionLevelCount,
    ) -> Self {
        Self::from_layout(
            data,
            FourierGgswLayout {
                glwe_size,
                polynomial_size,
                decomposition_base_log,
                decomposition_level_count,
            },
        )
    }

    fn from_layout(data: C, layout: FourierGgswLayout) -> Self {
        assert_eq!(data.container_len(), layout.ciphertext_size());
        Self { data, layout }
    }

    pub fn layout(&self) -> FourierGgswLayout {
        self.layout
    }

    pub fn polynomial_size(&self) -> PolynomialSize {
        self.layout.polynomial_size
    }

    pub fn glwe_size(&self) -> GlweSize {
        self.layout.glwe_size
    }

    pub fn decomposition_base_log(&self) -> DecompositionBaseLog {
        self.layout.decomposition_base_log
    }

    pub fn decomposition_level_count(&self) -> DecompositionLevelCount {
        self.layout.decomposition_level_count
    }

    pub fn data(self) -> C {
        self.data
    }

    pub fn as_view(&self) -> FourierGgswCiphertextView<'_> {
        FourierGgswCiphertext {
            data: self.data.as_slice(),
            layout: self.layout,
        }
    }
}

impl<C: ContainerMut<Element = c64>> FourierGgswCiphertext<C> {
    pub fn as_mut_view(&mut self) -> FourierGgswCiphertextMutView<'_> {
        FourierGgswCiphertext {
            data: self.data.as_mut_slice(),
            layout: self.layout,
        }
    }
}

impl FourierGgswCiphertextOwned {
    pub fn new(
        glwe_size: GlweSize,
        polynomial_size: PolynomialSize,
        decomposition_base_log: DecompositionBaseLog,
        decomposition_level_count: DecompositionLevelCount,
    ) -> Self {
        let size =
            fourier_ggsw_ciphertext_size(glwe_size, polynomial_size, decomposition_level_count);
        FourierGgswCiphertext::from_container(
            avec![c64::default(); size].into_boxed_slice(),
            glwe_size,
            polynomial_size,
            decomposition_base_log,
            decomposition_level_count,
        )
    }
}

impl<'a> FourierGgswCiphertextView<'a> {
    /// Returns the level matrices with their decomposition level, in the order the decomposition
    /// of a GLWE ciphertext yields its terms.
    pub fn level_matrices(
        self,
    ) -> impl DoubleEndedIterator<Item = (DecompositionLevel, &'a [c64])> + 'a {
        let level_count = self.layout.decomposition_level_count.0;
        self.data
            .chunks_exact(self.layout.level_size())
            .enumerate()
            .map(move |(i, matrix)| (DecompositionLevel(level_count - i), matrix))
    }
}

/// Returns the required memory for [`FourierGgswCiphertextMutView::fill_with_forward_fourier`]
/// and [`FourierLweBootstrapKeyMutView::fill_with_forward_fourier`](super::bootstrap::FourierLweBootstrapKeyMutView::fill_with_forward_fourier).
pub fn fill_with_forward_fourier_scratch(fft: FftView<'_>) -> Result<StackReq, SizeOverflow> {
    fft.forward_scratch()
}

impl FourierGgswCiphertextMutView<'_> {
    /// Fills the ciphertext with the Fourier transform of `coef_ggsw`, polynomial by polynomial.
    pub fn fill_with_forward_fourier<InputCont: Container<Element = u64>>(
        self,
        coef_ggsw: &GgswCiphertext<InputCont>,
        fft: FftView<'_>,
        stack: &mut PodStack,
    ) {
        debug_assert_eq!(coef_ggsw.polynomial_size(), self.polynomial_size());
        let fourier_polynomial_size = self.layout.fourier_polynomial_size();

        for (fourier, standard) in izip!(
            self.data.chunks_exact_mut(fourier_polynomial_size),
            coef_ggsw.as_ref().chunks_exact(self.layout.polynomial_size.0)
        ) {
            fft.forward_as_torus(
                FourierPolynomialMutView { data: fourier },
                PolynomialView::from_container(standard),
                stack,
            );
        }
    }
}

/// A contiguous list of GGSW ciphertexts in the Fourier domain sharing the same layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FourierGgswCiphertextList<C: Container<Element = c64>> {
    data: C,
    count: usize,
    layout: FourierGgswLayout,
}

pub type FourierGgswCiphertextListView<'a> = FourierGgswCiphertextList<&'a [c64]>;
pub type FourierGgswCiphertextListMutView<'a> = FourierGgswCiphertextList<&'a mut [c64]>;

impl<C: Container<Element = c64>> FourierGgswCiphertextList<C> {
    pub fn new(
        data: C,
        count: usize,
        glwe_size: GlweSize,
        polynomial_size: PolynomialSize,
        decomposition_base_log: DecompositionBaseLog,
        decomposition_level_count: DecompositionLevelCount,
    ) -> Self {
        Self::from_layout(
            data,
            count,
            FourierGgswLayout {
                glwe_size,
                polynomial_size,
                decomposition_base_log,
                decomposition_level_count,
            },
        )
    }

    fn from_layout(data: C, count: usize, layout: FourierGgswLayout) -> Self {
        assert_eq!(data.container_len(), count * layout.ciphertext_size());
        Self {
            data,
            count,
            layout,
        }
    }

    pub fn data(self) -> C {
        self.data
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn polynomial_size(&self) -> PolynomialSize {
        self.layout.polynomial_size
    }

    pub fn glwe_size(&self) -> GlweSize {
        self.layout.glwe_size
    }

    pub fn decomposition_base_log(&self) -> DecompositionBaseLog {
        self.layout.decomposition_base_log
    }

    pub fn decomposition_level_count(&self) -> DecompositionLevelCount {
        self.layout.decomposition_level_count
    }

    pub fn as_view(&self) -> FourierGgswCiphertextListView<'_> {
        FourierGgswCiphertextList::from_layout(self.data.as_slice(), self.count, self.layout)
    }

    pub fn as_mut_view(&mut self) -> FourierGgswCiphertextListMutView<'_>
    where
        C: ContainerMut,
    {
        FourierGgswCiphertextList::from_layout(self.data.as_mut_slice(), self.count, self.layout)
    }

    pub fn into_ggsw_iter(self) -> impl DoubleEndedIterator<Item = FourierGgswCiphertext<C>>
    where
        C: Split,
    {
        let layout = self.layout;
        self.data
            .split_into(self.count)
            .map(move |data| FourierGgswCiphertext::from_layout(data, layout))
    }

    /// Splits the list in two, the first part holding `mid` ciphertexts.
    pub fn split_at(self, mid: usize) -> (Self, Self)
    where
        C: Split,
    {
        let layout = self.layout;
        let (left, right) = self.data.split_at(mid * layout.ciphertext_size());
        (
            Self::from_layout(left, mid, layout),
            Self::from_layout(right, self.count - mid, layout),
        )
    }
}

/// Returns the required memory for [`add_external_product_assign`].
pub fn add_external_product_assign_scratch(
    glwe_size: GlweSize,
    polynomial_size: PolynomialSize,
    fft: FftView<'_>,
) -> Result<StackReq, SizeOverflow> {
    let align = CACHELINE_ALIGN;
    let fourier_polynomial_size = polynomial_size.to_fourier_polynomial_size().0;

    let glwe_len = try_product([glwe_size.0, polynomial_size.0])?;
    let accumulator_len = try_product([glwe_size.0, fourier_polynomial_size])?;

    let glwe = StackReq::try_new_aligned::<u64>(glwe_len, align)?;
    let accumulator = StackReq::try_new_aligned::<c64>(accumulator_len, align)?;
    let one_level = StackReq::try_all_of([
        // decomposition states
        glwe,
        // terms of the current level
        glwe,
        StackReq::try_new_aligned::<c64>(fourier_polynomial_size, align)?,
        fft.forward_scratch()?,
    ])?;

    StackReq::try_all_of([
        accumulator,
        StackReq::try_any_of([one_level, fft.backward_scratch()?])?,
    ])
}

/// Performs the external product of `ggsw` and `glwe`, and adds the result to `out`.
///
/// Every level term of the decomposed `glwe` is moved to the Fourier domain and multiplied by the
/// matching level matrix. The products are summed in the Fourier domain and brought back once.
pub fn add_external_product_assign(
    out: GlweCiphertextMutView<'_>,
    ggsw: FourierGgswCiphertextView<'_>,
    glwe: GlweCiphertextView<'_>,
    fft: FftView<'_>,
    stack: &mut PodStack,
) {
    let layout = ggsw.layout();
    debug_assert_eq!(layout.polynomial_size, glwe.polynomial_size());
    debug_assert_eq!(layout.polynomial_size, out.polynomial_size());
    debug_assert_eq!(layout.glwe_size, glwe.glwe_size());
    debug_assert_eq!(layout.glwe_size, out.glwe_size());

    let (accumulator, stack) = stack.make_aligned_raw::<c64>(layout.row_size(), CACHELINE_ALIGN);
    let mut accumulator = FourierAccumulator {
        data: accumulator,
        fourier_polynomial_size: layout.fourier_polynomial_size(),
        is_zero: true,
    };

    {
        let decomposer = SignedDecomposer::new(
            layout.decomposition_base_log,
            layout.decomposition_level_count,
        );
        let (mut decomposition, stack) = TensorSignedDecompositionLendingIter::new(
            glwe.as_ref()
                .iter()
                .map(|&value| decomposer.init_decomposer_state(value)),
            decomposer.base_log(),
            decomposer.level_count(),
            stack,
        );

        for (level, matrix) in ggsw.level_matrices() {
            let Some((term_level, _, terms)) = decomposition.next_term() else {
                break;
            };
            debug_assert_eq!(level, term_level);
            let (terms, stack) = stack.collect_aligned(CACHELINE_ALIGN, terms);

            // Polynomial i of the decomposed GLWE multiplies row i of the level matrix.
            for (row, term) in izip!(
                matrix.chunks_exact(layout.row_size()),
                terms.chunks_exact(layout.polynomial_size.0)
            ) {
                let (fourier, stack) = stack
                    .make_aligned_raw::<c64>(layout.fourier_polynomial_size(), CACHELINE_ALIGN);
                let fourier = fft.forward_as_integer(
                    FourierPolynomialMutView { data: fourier },
                    PolynomialView::from_container(&*term),
                    stack,
                );
                accumulator.add_row_product(row, fourier.data);
            }
        }
    }

    accumulator.add_backward_to(out, fft, stack);
}

/// Sum of row products in the Fourier domain. The buffer is left uninitialized while the sum is
/// zero.
struct FourierAccumulator<'a> {
    data: &'a mut [c64],
    fourier_polynomial_size: usize,
    is_zero: bool,
}

impl FourierAccumulator<'_> {
    fn add_row_product(&mut self, row: &[c64], fourier: &[c64]) {
        pulp::Arch::new().dispatch(RowProduct {
            accumulator: &mut *self.data,
            row,
            fourier,
            fourier_polynomial_size: self.fourier_polynomial_size,
            overwrite: self.is_zero,
        });
        self.is_zero = false;
    }

    fn add_backward_to(
        self,
        mut out: GlweCiphertextMutView<'_>,
        fft: FftView<'_>,
        stack: &mut PodStack,
    ) {
        if self.is_zero {
            return;
        }
        for (standard, fourier) in izip!(
            out.as_mut_polynomial_list().iter_mut(),
            self.data.chunks_exact_mut(self.fourier_polynomial_size)
        ) {
            fft.add_backward_in_place_as_torus(
                standard,
                FourierPolynomialMutView { data: fourier },
                stack,
            );
        }
    }
}

/// `accumulator[j] (+)= row[j] * fourier` for every polynomial `j` of the row.
struct RowProduct<'a> {
    accumulator: &'a mut [c64],
    row: &'a [c64],
    fourier: &'a [c64],
    fourier_polynomial_size: usize,
    overwrite: bool,
}

impl pulp::WithSimd for RowProduct<'_> {
    type Output = ();

    #[inline(always)]
    fn with_simd<S: pulp::Simd>(self, simd: S) -> Self::Output {
        let Self {
            accumulator,
            row,
            fourier,
            fourier_polynomial_size,
            overwrite,
        } = self;
        let rhs = S::as_simd_c64s(fourier).0;

        for (acc, lhs) in izip!(
            accumulator.chunks_exact_mut(fourier_polynomial_size),
            row.chunks_exact(fourier_polynomial_size)
        ) {
            let acc = S::as_mut_simd_c64s(acc).0;
            let lhs = S::as_simd_c64s(lhs).0;
            if overwrite {
                for (acc, lhs, rhs) in izip!(acc, lhs, rhs) {
                    *acc = simd.mul_c64s(*lhs, *rhs);
                }
            } else {
                for (acc, lhs, rhs) in izip!(acc, lhs, rhs) {
                    *acc = simd.mul_add_c64s(*lhs, *rhs, *acc);
                }
            }
        }
    }
}

/// Returns the required memory for [`cmux`].
pub fn cmux_scratch(
    glwe_size: GlweSize,
    polynomial_size: PolynomialSize,
    fft: FftView<'_>,
) -> Result<StackReq, SizeOverflow> {
    add_external_product_assign_scratch(glwe_size, polynomial_size, fft)
}

/// Selects `ct1` if `ggsw` encrypts one and `ct0` if it encrypts zero. The result is written in
/// `ct0` and `ct1` is clobbered.
pub fn cmux(
    ct0: GlweCiphertextMutView<'_>,
    mut ct1: GlweCiphertextMutView<'_>,
    ggsw: FourierGgswCiphertextView<'_>,
    fft: FftView<'_>,
    stack: &mut PodStack,
) {
    for (c1, c0) in izip!(ct1.as_mut(), ct0.as_ref()) {
        *c1 = c1.wrapping_sub(*c0);
    }
    add_external_product_assign(ct0, ggsw, ct1.as_view(), fft, stack);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::*;
    use crate::commons::dispersion::StandardDev;
    use crate::commons::parameters::*;
    use crate::commons::test_tools::*;
    use crate::entities::*;
    use crate::fft_impl::fft::Fft;
    use dyn_stack::GlobalPodBuffer;
    use rand::Rng;

    struct Setup {
        glwe_sk: GlweSecretKeyOwned,
        fft: Fft,
        glwe_size: GlweSize,
        polynomial_size: PolynomialSize,
        std: StandardDev,
    }

    fn setup() -> Setup {
        let glwe_dimension = GlweDimension(2);
        let polynomial_size = PolynomialSize(512);
        let mut secret_generator = new_secret_random_generator();
        Setup {
            glwe_sk: allocate_and_generate_new_binary_glwe_secret_key(
                glwe_dimension,
                polynomial_size,
                &mut secret_generator,
            ),
            fft: Fft::new(polynomial_size),
            glwe_size: glwe_dimension.to_glwe_size(),
            polynomial_size,
            std: StandardDev(0.000_000_000_000_000_29),
        }
    }

    fn fourier_ggsw(setup: &Setup, bit: u64) -> FourierGgswCiphertextOwned {
        let base_log = DecompositionBaseLog(12);
        let level_count = DecompositionLevelCount(3);
        let mut ggsw = GgswCiphertextOwned::new(
            0,
            setup.glwe_size,
            setup.polynomial_size,
            base_log,
            level_count,
        );
        encrypt_constant_ggsw_ciphertext(
            &setup.glwe_sk,
            &mut ggsw,
            Cleartext(bit),
            setup.std,
            &mut new_encryption_random_generator(),
        );

        let mut fourier = FourierGgswCiphertextOwned::new(
            setup.glwe_size,
            setup.polynomial_size,
            base_log,
            level_count,
        );
        let fft = setup.fft.as_view();
        let mut mem = GlobalPodBuffer::new(fill_with_forward_fourier_scratch(fft).unwrap());
        fourier
            .as_mut_view()
            .fill_with_forward_fourier(&ggsw, fft, PodStack::new(&mut mem));
        fourier
    }

    fn encrypted_messages(setup: &Setup, messages: &[u64]) -> GlweCiphertextOwned {
        let encoded: Vec<u64> = messages.iter().map(|&m| encode(m, 4)).collect();
        let mut glwe = GlweCiphertextOwned::new(0, setup.glwe_size, setup.polynomial_size);
        encrypt_glwe_ciphertext(
            &setup.glwe_sk,
            &PolynomialOwned::from_container(encoded),
            &mut glwe,
            setup.std,
            &mut new_encryption_random_generator(),
        );
        glwe
    }

    fn decrypted_messages(setup: &Setup, glwe: &GlweCiphertextOwned) -> Vec<u64> {
        let mut decrypted = PolynomialOwned::new(0, setup.polynomial_size);
        decrypt_glwe_ciphertext(&setup.glwe_sk, glwe, &mut decrypted);
        decrypted.iter().map(|&p| decode(p, 4)).collect()
    }

    fn random_messages(setup: &Setup) -> Vec<u64> {
        let mut rng = rand::thread_rng();
        (0..setup.polynomial_size.0)
            .map(|_| rng.gen_range(0..16))
            .collect()
    }

    #[test]
    fn external_product_by_constant() {
        let setup = setup();
        let fft = setup.fft.as_view();
        let messages = random_messages(&setup);

        for bit in [0, 1] {
            let ggsw = fourier_ggsw(&setup, bit);
            let glwe = encrypted_messages(&setup, &messages);
            let mut out = GlweCiphertextOwned::new(0, setup.glwe_size, setup.polynomial_size);

            let mut mem = GlobalPodBuffer::new(
                add_external_product_assign_scratch(setup.glwe_size, setup.polynomial_size, fft)
                    .unwrap(),
            );
            add_external_product_assign(
                out.as_mut_view(),
                ggsw.as_view(),
                glwe.as_view(),
                fft,
                PodStack::new(&mut mem),
            );

            let expected: Vec<u64> = messages.iter().map(|&m| m * bit).collect();
            assert_eq!(decrypted_messages(&setup, &out), expected);
        }
    }

    #[test]
    fn cmux_selects_with_the_encrypted_bit() {
        let setup = setup();
        let fft = setup.fft.as_view();
        let messages_0 = random_messages(&setup);
        let messages_1 = random_messages(&setup);

        for bit in [0, 1] {
            let ggsw = fourier_ggsw(&setup, bit);
            let mut ct0 = encrypted_messages(&setup, &messages_0);
            let mut ct1 = encrypted_messages(&setup, &messages_1);

            let mut mem = GlobalPodBuffer::new(
                cmux_scratch(setup.glwe_size, setup.polynomial_size, fft).unwrap(),
            );
            cmux(
                ct0.as_mut_view(),
                ct1.as_mut_view(),
                ggsw.as_view(),
                fft,
                PodStack::new(&mut mem),
            );

            let expected = if bit == 0 { &messages_0 } else { &messages_1 };
            assert_eq!(&decrypted_messages(&setup, &ct0), expected);
        }
    }
}
