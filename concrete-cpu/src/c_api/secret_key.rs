use super::csprng::SecCsprng;
use super::utils::nounwind;
use crate::algorithms::generate_binary_lwe_secret_key;
use crate::commons::parameters::{GlweDimension, PolynomialSize};
use crate::entities::{GlweSecretKey, LweSecretKey};
use crate::serialization::{
    deserialize_glwe_secret_key_into, glwe_secret_key_buffer_size, serialize_glwe_secret_key,
};

#[no_mangle]
pub extern "C" fn concrete_cpu_lwe_secret_key_size_u64(lwe_dimension: usize) -> usize {
    lwe_dimension
}

/// Number of `u64` of a GLWE secret key, which is an LWE secret key of dimension
/// `glwe_dimension * polynomial_size`.
#[no_mangle]
pub extern "C" fn concrete_cpu_glwe_secret_key_size_u64(
    glwe_dimension: usize,
    polynomial_size: usize,
) -> usize {
    glwe_dimension * polynomial_size
}

/// Fills `sk` with a uniform binary secret key.
///
/// GLWE secret keys are generated the same way, with `dimension = glwe_dimension *
/// polynomial_size`.
///
/// # Safety
///
/// `sk` must be valid for writes of `dimension` values, `csprng` must point to a live generator.
#[no_mangle]
pub unsafe extern "C" fn concrete_cpu_init_secret_key_u64(
    sk: *mut u64,
    dimension: usize,
    csprng: *mut SecCsprng,
) {
    nounwind(|| {
        let mut sk = LweSecretKey::from_container(core::slice::from_raw_parts_mut(sk, dimension));
        generate_binary_lwe_secret_key(&mut sk, &mut *csprng);
    })
}

#[no_mangle]
pub extern "C" fn concrete_cpu_glwe_secret_key_buffer_size_u64(
    glwe_dimension: usize,
    polynomial_size: usize,
) -> usize {
    glwe_secret_key_buffer_size(GlweDimension(glwe_dimension), PolynomialSize(polynomial_size))
}

/// Serializes a GLWE secret key into `out_buffer`.
///
/// Returns the number of bytes written, or 0 when `out_buffer` is too small.
///
/// # Safety
///
/// `glwe_sk` must be valid for reads of `glwe_dimension * polynomial_size` values, `out_buffer`
/// for writes of `out_buffer_len` bytes.
#[no_mangle]
pub unsafe extern "C" fn concrete_cpu_serialize_glwe_secret_key_u64(
    glwe_sk: *const u64,
    glwe_dimension: usize,
    polynomial_size: usize,
    out_buffer: *mut u8,
    out_buffer_len: usize,
) -> usize {
    nounwind(|| {
        let glwe_sk = GlweSecretKey::from_container(
            core::slice::from_raw_parts(glwe_sk, glwe_dimension * polynomial_size),
            PolynomialSize(polynomial_size),
        );
        let out_buffer = core::slice::from_raw_parts_mut(out_buffer, out_buffer_len);

        serialize_glwe_secret_key(&glwe_sk, out_buffer).unwrap_or_else(|err| {
            tracing::error!("cannot serialize glwe secret key: {err}");
            0
        })
    })
}

/// Deserializes a GLWE secret key serialized by [`concrete_cpu_serialize_glwe_secret_key_u64`]
/// into `glwe_sk`.
///
/// Returns the number of `u64` written, or 0 when `buffer` is malformed or `glwe_sk` too small.
///
/// # Safety
///
/// `buffer` must be valid for reads of `buffer_len` bytes, `glwe_sk` for writes of `glwe_sk_size`
/// values.
#[no_mangle]
pub unsafe extern "C" fn concrete_cpu_unserialize_glwe_secret_key_u64(
    buffer: *const u8,
    buffer_len: usize,
    glwe_sk: *mut u64,
    glwe_sk_size: usize,
) -> usize {
    nounwind(|| {
        let buffer = core::slice::from_raw_parts(buffer, buffer_len);
        let glwe_sk = core::slice::from_raw_parts_mut(glwe_sk, glwe_sk_size);

        deserialize_glwe_secret_key_into(buffer, glwe_sk).unwrap_or_else(|err| {
            tracing::error!("cannot deserialize glwe secret key: {err}");
            0
        })
    })
}
