//! Algorithms on polynomials modulo $X^{N} + 1$.

use crate::algorithms::slice_algorithms::*;
use crate::commons::parameters::MonomialDegree;
use crate::commons::traits::{Container, ContainerMut};
use crate::entities::*;

pub fn polynomial_wrapping_add_assign<OutputCont, InputCont>(
    lhs: &mut Polynomial<OutputCont>,
    rhs: &Polynomial<InputCont>,
) where
    OutputCont: ContainerMut<Element = u64>,
    InputCont: Container<Element = u64>,
{
    assert_eq!(lhs.polynomial_size(), rhs.polynomial_size());
    slice_wrapping_add_assign(lhs.as_mut(), rhs.as_ref())
}

pub fn polynomial_wrapping_sub_assign<OutputCont, InputCont>(
    lhs: &mut Polynomial<OutputCont>,
    rhs: &Polynomial<InputCont>,
) where
    OutputCont: ContainerMut<Element = u64>,
    InputCont: Container<Element = u64>,
{
    assert_eq!(lhs.polynomial_size(), rhs.polynomial_size());
    slice_wrapping_sub_assign(lhs.as_mut(), rhs.as_ref())
}

/// Adds the sum of the products of the polynomials of both lists to `output`.
pub fn polynomial_wrapping_add_multisum_assign<OutputCont, InputCont1, InputCont2>(
    output: &mut Polynomial<OutputCont>,
    poly_list_1: &PolynomialList<InputCont1>,
    poly_list_2: &PolynomialList<InputCont2>,
) where
    OutputCont: ContainerMut<Element = u64>,
    InputCont1: Container<Element = u64>,
    InputCont2: Container<Element = u64>,
{
    for (poly_1, poly_2) in poly_list_1.iter().zip(poly_list_2.iter()) {
        polynomial_wrapping_add_mul_assign(output, &poly_1, &poly_2);
    }
}

/// Subtracts the sum of the products of the polynomials of both lists from `output`.
pub fn polynomial_wrapping_sub_multisum_assign<OutputCont, InputCont1, InputCont2>(
    output: &mut Polynomial<OutputCont>,
    poly_list_1: &PolynomialList<InputCont1>,
    poly_list_2: &PolynomialList<InputCont2>,
) where
    OutputCont: ContainerMut<Element = u64>,
    InputCont1: Container<Element = u64>,
    InputCont2: Container<Element = u64>,
{
    for (poly_1, poly_2) in poly_list_1.iter().zip(poly_list_2.iter()) {
        polynomial_wrapping_mul_accumulate(output, &poly_1, &poly_2, u64::wrapping_sub);
    }
}

/// Adds `lhs * rhs` to `output`, with the schoolbook negacyclic product.
///
/// Only used with binary key polynomials outside of the hot paths, which go through the FFT.
pub fn polynomial_wrapping_add_mul_assign<OutputCont, InputCont1, InputCont2>(
    output: &mut Polynomial<OutputCont>,
    lhs: &Polynomial<InputCont1>,
    rhs: &Polynomial<InputCont2>,
) where
    OutputCont: ContainerMut<Element = u64>,
    InputCont1: Container<Element = u64>,
    InputCont2: Container<Element = u64>,
{
    polynomial_wrapping_mul_accumulate(output, lhs, rhs, u64::wrapping_add);
}

fn polynomial_wrapping_mul_accumulate<OutputCont, InputCont1, InputCont2>(
    output: &mut Polynomial<OutputCont>,
    lhs: &Polynomial<InputCont1>,
    rhs: &Polynomial<InputCont2>,
    accumulate: fn(u64, u64) -> u64,
) where
    OutputCont: ContainerMut<Element = u64>,
    InputCont1: Container<Element = u64>,
    InputCont2: Container<Element = u64>,
{
    assert!(
        output.polynomial_size() == lhs.polynomial_size(),
        "Output polynomial size {:?} is not the same as input lhs polynomial {:?}.",
        output.polynomial_size(),
        lhs.polynomial_size(),
    );
    assert!(
        output.polynomial_size() == rhs.polynomial_size(),
        "Output polynomial size {:?} is not the same as input rhs polynomial {:?}.",
        output.polynomial_size(),
        rhs.polynomial_size(),
    );
    let n = output.polynomial_size().0;
    let output = output.as_mut();

    for (lhs_degree, &lhs_coeff) in lhs.iter().enumerate() {
        for (rhs_degree, &rhs_coeff) in rhs.iter().enumerate() {
            let product = lhs_coeff.wrapping_mul(rhs_coeff);
            let target_degree = lhs_degree + rhs_degree;
            if target_degree < n {
                output[target_degree] = accumulate(output[target_degree], product);
            } else {
                // X^N = -1
                let coeff = &mut output[target_degree - n];
                *coeff = accumulate(*coeff, product.wrapping_neg());
            }
        }
    }
}

/// Divides the polynomial by the monomial `X^degree`, in place.
pub fn polynomial_wrapping_monic_monomial_div_assign<OutputCont>(
    output: &mut Polynomial<OutputCont>,
    monomial_degree: MonomialDegree,
) where
    OutputCont: ContainerMut<Element = u64>,
{
    let n = output.polynomial_size().0;
    let full_cycles_count = monomial_degree.0 / n;
    if full_cycles_count % 2 != 0 {
        slice_wrapping_opposite_assign(output.as_mut());
    }
    let remaining_degree = monomial_degree.0 % n;
    output.as_mut().rotate_left(remaining_degree);
    slice_wrapping_opposite_assign(&mut output.as_mut()[n - remaining_degree..]);
}

/// Multiplies the polynomial by the monomial `X^degree`, in place.
pub fn polynomial_wrapping_monic_monomial_mul_assign<OutputCont>(
    output: &mut Polynomial<OutputCont>,
    monomial_degree: MonomialDegree,
) where
    OutputCont: ContainerMut<Element = u64>,
{
    let n = output.polynomial_size().0;
    let full_cycles_count = monomial_degree.0 / n;
    if full_cycles_count % 2 != 0 {
        slice_wrapping_opposite_assign(output.as_mut());
    }
    let remaining_degree = monomial_degree.0 % n;
    output.as_mut().rotate_right(remaining_degree);
    slice_wrapping_opposite_assign(&mut output.as_mut()[..remaining_degree]);
}

/// Writes `input * X^degree` to `output`.
pub fn polynomial_wrapping_monic_monomial_mul<OutputCont, InputCont>(
    output: &mut Polynomial<OutputCont>,
    input: &Polynomial<InputCont>,
    monomial_degree: MonomialDegree,
) where
    OutputCont: ContainerMut<Element = u64>,
    InputCont: Container<Element = u64>,
{
    output.as_mut().copy_from_slice(input.as_ref());
    polynomial_wrapping_monic_monomial_mul_assign(output, monomial_degree);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commons::parameters::PolynomialSize;
    use rand::Rng;

    fn random_polynomial(size: usize) -> PolynomialOwned {
        let mut rng = rand::thread_rng();
        Polynomial::from_container((0..size).map(|_| rng.gen()).collect())
    }

    #[test]
    fn multiply_divide_unit_monomial() {
        let mut rng = rand::thread_rng();
        for log_n in 0..=11 {
            let n = 1 << log_n;
            let ground_truth = random_polynomial(n);
            let mut poly = ground_truth.clone();

            let r = rng.gen_range(0..n);
            polynomial_wrapping_monic_monomial_mul_assign(&mut poly, MonomialDegree(r));
            polynomial_wrapping_monic_monomial_div_assign(&mut poly, MonomialDegree(r));
            assert_eq!(poly, ground_truth);

            let r_big = rng.gen_range(0..n) + 2 * n + n;
            polynomial_wrapping_monic_monomial_div_assign(&mut poly, MonomialDegree(r_big));
            polynomial_wrapping_monic_monomial_mul_assign(&mut poly, MonomialDegree(r_big));
            assert_eq!(poly, ground_truth);
        }
    }

    #[test]
    fn monomial_mul_matches_schoolbook_product() {
        let n = 16;
        let input = random_polynomial(n);
        for degree in 0..2 * n {
            let mut monomial = PolynomialOwned::new(0, PolynomialSize(n));
            if degree < n {
                monomial.as_mut()[degree] = 1;
            } else {
                monomial.as_mut()[degree - n] = u64::MAX;
            }

            let mut expected = PolynomialOwned::new(0, PolynomialSize(n));
            polynomial_wrapping_add_mul_assign(&mut expected, &input, &monomial);

            let mut output = PolynomialOwned::new(0, PolynomialSize(n));
            polynomial_wrapping_monic_monomial_mul(&mut output, &input, MonomialDegree(degree));
            assert_eq!(output, expected);
        }
    }
}
