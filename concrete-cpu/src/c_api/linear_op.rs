use super::utils::nounwind;
use crate::algorithms::{
    lwe_ciphertext_add_assign, lwe_ciphertext_cleartext_mul_assign,
    lwe_ciphertext_opposite_assign, lwe_ciphertext_plaintext_add_assign,
};
use crate::commons::parameters::LweDimension;
use crate::entities::{lwe_ciphertext_size, Cleartext, LweCiphertext, Plaintext};

/// Copies `ct_in` to `ct_out` and returns the output ciphertext. The two pointers may be equal.
unsafe fn copied_output<'a>(
    ct_out: *mut u64,
    ct_in: *const u64,
    lwe_dimension: usize,
) -> LweCiphertext<&'a mut [u64]> {
    let len = lwe_ciphertext_size(LweDimension(lwe_dimension));
    core::ptr::copy(ct_in, ct_out, len);
    LweCiphertext::from_container(core::slice::from_raw_parts_mut(ct_out, len))
}

/// # Safety
///
/// `ct_in0` and `ct_in1` must be valid for reads of `lwe_dimension + 1` values, `ct_out` for
/// writes of as many. `ct_out` may be equal to either input, but must not partially overlap them.
#[no_mangle]
pub unsafe extern "C" fn concrete_cpu_add_lwe_ciphertext_u64(
    ct_out: *mut u64,
    ct_in0: *const u64,
    ct_in1: *const u64,
    lwe_dimension: usize,
) {
    nounwind(|| {
        let len = lwe_ciphertext_size(LweDimension(lwe_dimension));
        let (lhs, rhs) = if core::ptr::eq(ct_out, ct_in1) {
            (ct_in1, ct_in0)
        } else {
            (ct_in0, ct_in1)
        };

        let mut ct_out = copied_output(ct_out, lhs, lwe_dimension);
        if core::ptr::eq(rhs, ct_out.as_ref().as_ptr()) {
            // out = in0 = in1
            let rhs = LweCiphertext::from_container(ct_out.as_ref().to_vec());
            lwe_ciphertext_add_assign(&mut ct_out, &rhs);
        } else {
            let rhs = LweCiphertext::from_container(core::slice::from_raw_parts(rhs, len));
            lwe_ciphertext_add_assign(&mut ct_out, &rhs);
        }
    })
}

/// # Safety
///
/// `ct_in` must be valid for reads of `lwe_dimension + 1` values, `ct_out` for writes of as many.
/// The two may be equal.
#[no_mangle]
pub unsafe extern "C" fn concrete_cpu_add_plaintext_lwe_ciphertext_u64(
    ct_out: *mut u64,
    ct_in: *const u64,
    plaintext: u64,
    lwe_dimension: usize,
) {
    nounwind(|| {
        let mut ct_out = copied_output(ct_out, ct_in, lwe_dimension);
        lwe_ciphertext_plaintext_add_assign(&mut ct_out, Plaintext(plaintext));
    })
}

/// # Safety
///
/// `ct_in` must be valid for reads of `lwe_dimension + 1` values, `ct_out` for writes of as many.
/// The two may be equal.
#[no_mangle]
pub unsafe extern "C" fn concrete_cpu_mul_cleartext_lwe_ciphertext_u64(
    ct_out: *mut u64,
    ct_in: *const u64,
    cleartext: u64,
    lwe_dimension: usize,
) {
    nounwind(|| {
        let mut ct_out = copied_output(ct_out, ct_in, lwe_dimension);
        lwe_ciphertext_cleartext_mul_assign(&mut ct_out, Cleartext(cleartext));
    })
}

/// # Safety
///
/// `ct_in` must be valid for reads of `lwe_dimension + 1` values, `ct_out` for writes of as many.
/// The two may be equal.
#[no_mangle]
pub unsafe extern "C" fn concrete_cpu_negate_lwe_ciphertext_u64(
    ct_out: *mut u64,
    ct_in: *const u64,
    lwe_dimension: usize,
) {
    nounwind(|| {
        let mut ct_out = copied_output(ct_out, ct_in, lwe_dimension);
        lwe_ciphertext_opposite_assign(&mut ct_out);
    })
}
