use crate::commons::numeric::UnsignedTorus;
use crate::commons::parameters::PolynomialSize;
use crate::commons::traits::{Container, ContainerMut};
use crate::commons::utils::izip;
use crate::entities::{PolynomialMutView, PolynomialView};
use aligned_vec::{avec, ABox, CACHELINE_ALIGN};
use dyn_stack::{PodStack, SizeOverflow, StackReq};
use rayon::prelude::*;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use std::time::Duration;
use tfhe_fft::c64;
use tfhe_fft::unordered::{Method, Plan};

/// Negacyclic Fast Fourier Transform over `Z_{2^64}[X] / (X^N + 1)`. See [`FftView`] for the
/// transform functions.
///
/// A polynomial of size `N` is folded into `N/2` complex numbers `p_j + i p_{j + N/2}`, twisted
/// by the `2N`-th roots of unity, then transformed by a complex FFT of size `N/2`. See
/// [Fast and Error-Free Negacyclic Integer Convolution using Extended Fourier Transform][paper].
///
/// Cloning is cheap: the plan is shared between every handle created for the same polynomial
/// size.
///
/// [paper]: https://eprint.iacr.org/2021/480
#[derive(Clone, Debug)]
pub struct Fft {
    plan: Arc<NegacyclicPlan>,
}

/// View type for [`Fft`].
#[derive(Clone, Copy, Debug)]
pub struct FftView<'a> {
    plan: &'a Plan,
    roots: &'a [c64],
}

#[derive(Debug)]
struct NegacyclicPlan {
    /// `exp(i pi j / N)` for `j` in `0..N/2`.
    roots: ABox<[c64]>,
    plan: Plan,
}

impl NegacyclicPlan {
    fn measure(polynomial_size: usize) -> Self {
        let half = polynomial_size / 2;
        let unit = core::f64::consts::PI / polynomial_size as f64;
        let mut roots = avec![c64::default(); half].into_boxed_slice();
        for (j, root) in roots.iter_mut().enumerate() {
            let (sin, cos) = (j as f64 * unit).sin_cos();
            *root = c64::new(cos, sin);
        }

        Self {
            roots,
            plan: Plan::new(half, Method::Measure(Duration::from_millis(10))),
        }
    }
}

/// One slot per polynomial size, filled once. Measuring a plan does not hold the map lock.
type PlanCache = Mutex<HashMap<usize, Arc<OnceLock<Arc<NegacyclicPlan>>>>>;

fn plan_cache() -> &'static PlanCache {
    static CACHE: OnceLock<PlanCache> = OnceLock::new();
    CACHE.get_or_init(Default::default)
}

impl Fft {
    /// Returns the FFT for polynomials of size `size`, measuring a new plan the first time a size
    /// is requested in the process.
    pub fn new(size: PolynomialSize) -> Self {
        let n = size.0;
        assert!(
            n.is_power_of_two() && n >= 2,
            "PolynomialSize must be a power of two greater than one, got {n}"
        );

        let slot = plan_cache()
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(n)
            .or_default()
            .clone();

        let plan = slot
            .get_or_init(|| {
                tracing::debug!(polynomial_size = n, "measuring new negacyclic FFT plan");
                Arc::new(NegacyclicPlan::measure(n))
            })
            .clone();

        Self { plan }
    }

    #[inline]
    pub fn as_view(&self) -> FftView<'_> {
        FftView {
            plan: &self.plan.plan,
            roots: &self.plan.roots,
        }
    }
}

/// Interpretation of the standard domain coefficients fed to a forward transform.
#[derive(Clone, Copy, Debug)]
enum Coefficients {
    /// Torus elements, mapped to `[-1/2, 1/2)`.
    Torus,
    /// Signed integers, such as decomposition terms.
    Integer,
}

impl Coefficients {
    fn scale(self) -> f64 {
        match self {
            Self::Torus => 2.0_f64.powi(-(u64::BITS as i32)),
            Self::Integer => 1.0,
        }
    }
}

/// Folds and twists `standard` into `fourier`.
fn twist(fourier: &mut [c64], standard: &[u64], roots: &[c64], coefficients: Coefficients) {
    let scale = coefficients.scale();
    let (re, im) = standard.split_at(fourier.len());
    for (out, re, im, root) in izip!(fourier, re, im, roots) {
        let folded = c64::new(re.into_signed() as f64 * scale, im.into_signed() as f64 * scale);
        *out = folded * root;
    }
}

/// Untwists and unfolds `fourier` into torus elements, added to `standard` when `accumulate` is
/// set and written otherwise.
fn untwist(standard: &mut [u64], fourier: &[c64], roots: &[c64], accumulate: bool) {
    let normalization = 1.0 / fourier.len() as f64;
    let (re, im) = standard.split_at_mut(fourier.len());
    for (re, im, value, root) in izip!(re, im, fourier, roots) {
        let value = value * root.conj() * normalization;
        let (value_re, value_im) = (u64::from_torus(value.re), u64::from_torus(value.im));
        if accumulate {
            *re = re.wrapping_add(value_re);
            *im = im.wrapping_add(value_im);
        } else {
            *re = value_re;
            *im = value_im;
        }
    }
}

impl FftView<'_> {
    /// Returns the polynomial size that this FFT was made for.
    pub fn polynomial_size(self) -> PolynomialSize {
        PolynomialSize(2 * self.plan.fft_size())
    }

    /// Returns the memory required for a forward negacyclic FFT.
    pub fn forward_scratch(self) -> Result<StackReq, SizeOverflow> {
        self.plan.fft_scratch()
    }

    /// Returns the memory required for a backward negacyclic FFT that keeps its input intact.
    pub fn backward_scratch(self) -> Result<StackReq, SizeOverflow> {
        StackReq::try_all_of([
            StackReq::try_new_aligned::<c64>(self.plan.fft_size(), CACHELINE_ALIGN)?,
            self.plan.fft_scratch()?,
        ])
    }

    /// Performs a negacyclic real FFT of `standard`, viewed as torus elements, and stores the
    /// result in `fourier`.
    ///
    /// Every element of `fourier` is initialized on return.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if `fourier` is not half the size of `standard`.
    pub fn forward_as_torus<'out>(
        self,
        fourier: FourierPolynomialMutView<'out>,
        standard: PolynomialView<'_>,
        stack: &mut PodStack,
    ) -> FourierPolynomialMutView<'out> {
        self.forward(fourier, standard, Coefficients::Torus, stack)
    }

    /// Performs a negacyclic real FFT of `standard`, viewed as signed integers, and stores the
    /// result in `fourier`.
    pub fn forward_as_integer<'out>(
        self,
        fourier: FourierPolynomialMutView<'out>,
        standard: PolynomialView<'_>,
        stack: &mut PodStack,
    ) -> FourierPolynomialMutView<'out> {
        self.forward(fourier, standard, Coefficients::Integer, stack)
    }

    /// Performs an inverse negacyclic real FFT of `fourier` and stores the result in `standard`,
    /// viewed as torus elements.
    pub fn backward_as_torus(
        self,
        standard: PolynomialMutView<'_>,
        fourier: FourierPolynomialView<'_>,
        stack: &mut PodStack,
    ) {
        self.backward(standard, fourier, false, stack);
    }

    /// Performs an inverse negacyclic real FFT of `fourier` and adds the result to `standard`,
    /// viewed as torus elements.
    pub fn add_backward_as_torus(
        self,
        standard: PolynomialMutView<'_>,
        fourier: FourierPolynomialView<'_>,
        stack: &mut PodStack,
    ) {
        self.backward(standard, fourier, true, stack);
    }

    /// Variant of [`Self::add_backward_as_torus`] that uses `fourier` as the buffer of the inverse
    /// transform, clobbering it.
    pub fn add_backward_in_place_as_torus(
        self,
        mut standard: PolynomialMutView<'_>,
        fourier: FourierPolynomialMutView<'_>,
        stack: &mut PodStack,
    ) {
        debug_assert_eq!(standard.as_ref().len(), 2 * fourier.data.len());
        self.plan.inv(fourier.data, stack);
        untwist(standard.as_mut(), fourier.data, self.roots, true);
    }

    fn forward<'out>(
        self,
        fourier: FourierPolynomialMutView<'out>,
        standard: PolynomialView<'_>,
        coefficients: Coefficients,
        stack: &mut PodStack,
    ) -> FourierPolynomialMutView<'out> {
        debug_assert_eq!(standard.as_ref().len(), 2 * fourier.data.len());
        twist(fourier.data, standard.as_ref(), self.roots, coefficients);
        self.plan.fwd(fourier.data, stack);
        fourier
    }

    fn backward(
        self,
        mut standard: PolynomialMutView<'_>,
        fourier: FourierPolynomialView<'_>,
        accumulate: bool,
        stack: &mut PodStack,
    ) {
        debug_assert_eq!(standard.as_ref().len(), 2 * fourier.data.len());
        let (buffer, stack) = stack.collect_aligned(CACHELINE_ALIGN, fourier.data.iter().copied());
        self.plan.inv(buffer, stack);
        untwist(standard.as_mut(), buffer, self.roots, accumulate);
    }
}

/// Polynomial in the Fourier domain, holding `N/2` complex coefficients.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FourierPolynomial<C: Container<Element = c64>> {
    pub data: C,
}

pub type FourierPolynomialView<'a> = FourierPolynomial<&'a [c64]>;
pub type FourierPolynomialMutView<'a> = FourierPolynomial<&'a mut [c64]>;
pub type FourierPolynomialOwned = FourierPolynomial<ABox<[c64]>>;

impl FourierPolynomialOwned {
    pub fn new(polynomial_size: PolynomialSize) -> Self {
        let size = polynomial_size.to_fourier_polynomial_size().0;
        FourierPolynomial {
            data: avec![c64::default(); size].into_boxed_slice(),
        }
    }
}

impl<C: Container<Element = c64>> FourierPolynomial<C> {
    pub fn as_view(&self) -> FourierPolynomialView<'_> {
        FourierPolynomial {
            data: self.data.as_slice(),
        }
    }
}

impl<C: ContainerMut<Element = c64>> FourierPolynomial<C> {
    pub fn as_mut_view(&mut self) -> FourierPolynomialMutView<'_> {
        FourierPolynomial {
            data: self.data.as_mut_slice(),
        }
    }
}

/// Converts a list of standard domain polynomials, viewed as torus elements, to the Fourier
/// domain. The polynomials are split in one contiguous batch per rayon thread, each batch owning
/// its scratch memory.
pub fn par_convert_polynomials_list_to_fourier(
    dest: &mut [c64],
    origin: &[u64],
    polynomial_size: PolynomialSize,
    fft: FftView<'_>,
) -> Result<(), SizeOverflow> {
    let fourier_size = polynomial_size.to_fourier_polynomial_size().0;
    assert_eq!(origin.len() % polynomial_size.0, 0);
    let polynomial_count = origin.len() / polynomial_size.0;
    assert_eq!(polynomial_count * fourier_size, dest.len());

    if polynomial_count == 0 {
        return Ok(());
    }

    let scratch = fft.forward_scratch()?;
    let batch = polynomial_count.div_ceil(rayon::current_num_threads());

    dest.par_chunks_mut(batch * fourier_size)
        .zip_eq(origin.par_chunks(batch * polynomial_size.0))
        .for_each(|(fourier_batch, standard_batch)| {
            let mut mem = dyn_stack::GlobalPodBuffer::new(scratch);
            let stack = PodStack::new(&mut mem);
            for (fourier, standard) in izip!(
                fourier_batch.chunks_exact_mut(fourier_size),
                standard_batch.chunks_exact(polynomial_size.0)
            ) {
                fft.forward_as_torus(
                    FourierPolynomialMutView { data: fourier },
                    PolynomialView::from_container(standard),
                    stack,
                );
            }
        });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commons::test_tools::modular_distance;
    use crate::entities::PolynomialOwned;
    use dyn_stack::GlobalPodBuffer;
    use rand::Rng;

    #[test]
    fn forward_backward_roundtrip() {
        let mut rng = rand::thread_rng();
        for size_log in 5..=14 {
            let size = 1_usize << size_log;

            let fft = Fft::new(PolynomialSize(size));
            let fft = fft.as_view();

            let mut poly = PolynomialOwned::new(0, PolynomialSize(size));
            let mut roundtrip = PolynomialOwned::new(0, PolynomialSize(size));
            let mut fourier = FourierPolynomialOwned::new(PolynomialSize(size));

            for x in poly.iter_mut() {
                *x = rng.gen();
            }

            let mut mem = GlobalPodBuffer::new(
                fft.forward_scratch()
                    .unwrap()
                    .and(fft.backward_scratch().unwrap()),
            );
            let stack = PodStack::new(&mut mem);

            fft.forward_as_torus(fourier.as_mut_view(), poly.as_view(), stack);
            fft.backward_as_torus(roundtrip.as_mut_view(), fourier.as_view(), stack);
            for (expected, actual) in izip!(poly.iter(), roundtrip.iter()) {
                assert!(modular_distance(*expected, *actual) < (1 << (64 - 50)));
            }

            roundtrip.as_mut().fill(0);
            fft.forward_as_torus(fourier.as_mut_view(), poly.as_view(), stack);
            fft.add_backward_as_torus(roundtrip.as_mut_view(), fourier.as_view(), stack);
            for (expected, actual) in izip!(poly.iter(), roundtrip.iter()) {
                assert!(modular_distance(*expected, *actual) < (1 << (64 - 50)));
            }

            roundtrip.as_mut().fill(0);
            fft.forward_as_torus(fourier.as_mut_view(), poly.as_view(), stack);
            fft.add_backward_in_place_as_torus(
                roundtrip.as_mut_view(),
                fourier.as_mut_view(),
                stack,
            );
            for (expected, actual) in izip!(poly.iter(), roundtrip.iter()) {
                assert!(modular_distance(*expected, *actual) < (1 << (64 - 50)));
            }
        }
    }

    #[test]
    fn product_with_small_integer_polynomial() {
        let mut rng = rand::thread_rng();
        let size = 1024;
        let polynomial_size = PolynomialSize(size);
        let fft = Fft::new(polynomial_size);
        let fft = fft.as_view();

        let mut torus_poly = PolynomialOwned::new(0, polynomial_size);
        let mut integer_poly = PolynomialOwned::new(0, polynomial_size);
        for (t, i) in izip!(torus_poly.iter_mut(), integer_poly.iter_mut()) {
            *t = rng.gen();
            *i = rng.gen_range(0..4u64).wrapping_sub(2);
        }

        let mut expected = PolynomialOwned::new(0, polynomial_size);
        crate::algorithms::polynomial_algorithms::polynomial_wrapping_add_mul_assign(
            &mut expected,
            &torus_poly,
            &integer_poly,
        );

        let mut fourier_torus = FourierPolynomialOwned::new(polynomial_size);
        let mut fourier_integer = FourierPolynomialOwned::new(polynomial_size);

        let mut mem = GlobalPodBuffer::new(
            fft.forward_scratch()
                .unwrap()
                .and(fft.backward_scratch().unwrap()),
        );
        let stack = PodStack::new(&mut mem);

        fft.forward_as_torus(fourier_torus.as_mut_view(), torus_poly.as_view(), stack);
        fft.forward_as_integer(fourier_integer.as_mut_view(), integer_poly.as_view(), stack);
        for (a, b) in izip!(fourier_torus.data.iter_mut(), fourier_integer.data.iter()) {
            *a *= *b;
        }

        let mut actual = PolynomialOwned::new(0, polynomial_size);
        fft.backward_as_torus(actual.as_mut_view(), fourier_torus.as_view(), stack);

        for (expected, actual) in izip!(expected.iter(), actual.iter()) {
            assert!(modular_distance(*expected, *actual) < (1 << (64 - 40)));
        }
    }

    #[test]
    fn parallel_list_conversion_matches_sequential() {
        let mut rng = rand::thread_rng();
        let polynomial_size = PolynomialSize(256);
        let count = 7;
        let fft = Fft::new(polynomial_size);
        let fft = fft.as_view();

        let standard: Vec<u64> = (0..count * polynomial_size.0).map(|_| rng.gen()).collect();
        let fourier_size = polynomial_size.to_fourier_polynomial_size().0;

        let mut parallel = vec![c64::default(); count * fourier_size];
        par_convert_polynomials_list_to_fourier(&mut parallel, &standard, polynomial_size, fft)
            .unwrap();

        let mut sequential = vec![c64::default(); count * fourier_size];
        let mut mem = GlobalPodBuffer::new(fft.forward_scratch().unwrap());
        let stack = PodStack::new(&mut mem);
        for (fourier, poly) in izip!(
            sequential.chunks_exact_mut(fourier_size),
            standard.chunks_exact(polynomial_size.0)
        ) {
            fft.forward_as_torus(
                FourierPolynomialMutView { data: fourier },
                PolynomialView::from_container(poly),
                stack,
            );
        }

        assert_eq!(parallel, sequential);
    }
}
