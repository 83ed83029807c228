//! Operations in the Fourier domain, built on the negacyclic FFT of `tfhe-fft`.

pub mod bootstrap;
pub mod fft;
pub mod ggsw;
pub mod wop_pbs;

use dyn_stack::SizeOverflow;

/// Multiplies buffer dimensions, failing with [`SizeOverflow`] instead of wrapping.
pub(crate) fn try_product(factors: impl IntoIterator<Item = usize>) -> Result<usize, SizeOverflow> {
    factors
        .into_iter()
        .try_fold(1usize, |acc, factor| acc.checked_mul(factor))
        .ok_or(SizeOverflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_of_dimensions_reports_overflow() {
        assert_eq!(try_product([2, 512, 3]).ok(), Some(3072));
        assert!(try_product([usize::MAX / 2, 3]).is_err());
    }
}
