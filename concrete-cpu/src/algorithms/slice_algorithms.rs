//! Wrapping arithmetic over slices of torus elements.

use crate::commons::utils::izip;

pub fn slice_wrapping_dot_product(lhs: &[u64], rhs: &[u64]) -> u64 {
    assert!(
        lhs.len() == rhs.len(),
        "lhs (len: {}) and rhs (len: {}) must have the same length",
        lhs.len(),
        rhs.len()
    );

    lhs.iter()
        .zip(rhs.iter())
        .fold(0u64, |acc, (&left, &right)| {
            acc.wrapping_add(left.wrapping_mul(right))
        })
}

pub fn slice_wrapping_add(output: &mut [u64], lhs: &[u64], rhs: &[u64]) {
    assert!(
        lhs.len() == rhs.len() && lhs.len() == output.len(),
        "output (len: {}), lhs (len: {}) and rhs (len: {}) must have the same length",
        output.len(),
        lhs.len(),
        rhs.len()
    );

    for (out, &lhs, &rhs) in izip!(output.iter_mut(), lhs.iter(), rhs.iter()) {
        *out = lhs.wrapping_add(rhs);
    }
}

pub fn slice_wrapping_add_assign(lhs: &mut [u64], rhs: &[u64]) {
    assert!(
        lhs.len() == rhs.len(),
        "lhs (len: {}) and rhs (len: {}) must have the same length",
        lhs.len(),
        rhs.len()
    );

    lhs.iter_mut()
        .zip(rhs.iter())
        .for_each(|(lhs, &rhs)| *lhs = (*lhs).wrapping_add(rhs));
}

/// Adds `rhs * scalar` to `lhs`.
pub fn slice_wrapping_add_scalar_mul_assign(lhs: &mut [u64], rhs: &[u64], scalar: u64) {
    assert!(
        lhs.len() == rhs.len(),
        "lhs (len: {}) and rhs (len: {}) must have the same length",
        lhs.len(),
        rhs.len()
    );

    lhs.iter_mut()
        .zip(rhs.iter())
        .for_each(|(lhs, &rhs)| *lhs = (*lhs).wrapping_add(rhs.wrapping_mul(scalar)));
}

pub fn slice_wrapping_sub(output: &mut [u64], lhs: &[u64], rhs: &[u64]) {
    assert!(
        lhs.len() == rhs.len() && lhs.len() == output.len(),
        "output (len: {}), lhs (len: {}) and rhs (len: {}) must have the same length",
        output.len(),
        lhs.len(),
        rhs.len()
    );

    for (out, &lhs, &rhs) in izip!(output.iter_mut(), lhs.iter(), rhs.iter()) {
        *out = lhs.wrapping_sub(rhs);
    }
}

pub fn slice_wrapping_sub_assign(lhs: &mut [u64], rhs: &[u64]) {
    assert!(
        lhs.len() == rhs.len(),
        "lhs (len: {}) and rhs (len: {}) must have the same length",
        lhs.len(),
        rhs.len()
    );

    lhs.iter_mut()
        .zip(rhs.iter())
        .for_each(|(lhs, &rhs)| *lhs = (*lhs).wrapping_sub(rhs));
}

/// Subtracts `rhs * scalar` from `lhs`.
pub fn slice_wrapping_sub_scalar_mul_assign(lhs: &mut [u64], rhs: &[u64], scalar: u64) {
    assert!(
        lhs.len() == rhs.len(),
        "lhs (len: {}) and rhs (len: {}) must have the same length",
        lhs.len(),
        rhs.len()
    );

    lhs.iter_mut()
        .zip(rhs.iter())
        .for_each(|(lhs, &rhs)| *lhs = (*lhs).wrapping_sub(rhs.wrapping_mul(scalar)));
}

pub fn slice_wrapping_opposite_assign(slice: &mut [u64]) {
    slice
        .iter_mut()
        .for_each(|elt| *elt = (*elt).wrapping_neg());
}

pub fn slice_wrapping_scalar_mul_assign(lhs: &mut [u64], rhs: u64) {
    lhs.iter_mut()
        .for_each(|lhs| *lhs = (*lhs).wrapping_mul(rhs));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_product_wraps() {
        let lhs = [u64::MAX, 2, 3];
        let rhs = [2, 5, 1];
        // -1 * 2 + 10 + 3
        assert_eq!(slice_wrapping_dot_product(&lhs, &rhs), 11);
    }

    #[test]
    fn scalar_mul_accumulations() {
        let mut acc = [1u64, 2, 3];
        slice_wrapping_add_scalar_mul_assign(&mut acc, &[1, 1, 1], 4);
        assert_eq!(acc, [5, 6, 7]);
        slice_wrapping_sub_scalar_mul_assign(&mut acc, &[1, 2, 3], 3);
        assert_eq!(acc, [2, 0, 7u64.wrapping_sub(9)]);
        slice_wrapping_opposite_assign(&mut acc);
        assert_eq!(acc, [2u64.wrapping_neg(), 0, 2]);
    }
}
