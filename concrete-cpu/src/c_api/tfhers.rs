use super::utils::nounwind;
use crate::error::{Error, ErrorKind};
use crate::tfhers::{
    fheint_buffer_size, fheint_description, fheint_to_lwe_array, lwe_array_to_fheint,
    TfhersFheIntDescription, TfhersIntegerKind, UNKNOWN_NOISE_LEVEL,
};

#[no_mangle]
pub extern "C" fn concrete_cpu_tfhers_fheint_buffer_size_u64(lwe_size: usize, n_cts: usize) -> usize {
    fheint_buffer_size(lwe_size, n_cts)
}

#[no_mangle]
pub extern "C" fn concrete_cpu_tfhers_unknown_noise_level() -> usize {
    UNKNOWN_NOISE_LEVEL
}

unsafe fn description(
    serialized_data_ptr: *const u8,
    serialized_data_len: usize,
    kind: TfhersIntegerKind,
) -> TfhersFheIntDescription {
    let data = core::slice::from_raw_parts(serialized_data_ptr, serialized_data_len);
    fheint_description(data, kind).unwrap_or_else(|err| {
        tracing::error!("cannot read serialized {kind:?} integer: {err}");
        TfhersFheIntDescription::zero()
    })
}

unsafe fn to_lwe_array(
    serialized_data_ptr: *const u8,
    serialized_data_len: usize,
    lwe_vec_buffer: *mut u64,
    kind: TfhersIntegerKind,
) -> i64 {
    let data = core::slice::from_raw_parts(serialized_data_ptr, serialized_data_len);
    let result = fheint_description(data, kind).and_then(|desc| {
        let lwe_vec =
            core::slice::from_raw_parts_mut(lwe_vec_buffer, desc.lwe_size * desc.n_cts);
        fheint_to_lwe_array(data, kind, lwe_vec)
    });
    match result {
        Ok(()) => 0,
        Err(err) => {
            tracing::error!("cannot convert serialized {kind:?} integer: {err}");
            -1
        }
    }
}

unsafe fn from_lwe_array(
    lwe_vec_buffer: *const u64,
    fheint_buffer: *mut u8,
    fheint_buffer_size: usize,
    desc: TfhersFheIntDescription,
    kind: TfhersIntegerKind,
) -> usize {
    let result = desc.kind().and_then(|desc_kind| {
        if desc_kind != kind {
            return Err(Error::from(ErrorKind::UnsupportedIntegerFormat {
                width: desc.width,
                is_signed: desc.is_signed,
            }));
        }
        let lwe_vec = core::slice::from_raw_parts(lwe_vec_buffer, desc.lwe_size * desc.n_cts);
        let buffer = core::slice::from_raw_parts_mut(fheint_buffer, fheint_buffer_size);
        lwe_array_to_fheint(lwe_vec, buffer, &desc)
    });
    result.unwrap_or_else(|err| {
        tracing::error!("cannot serialize {kind:?} integer: {err}");
        0
    })
}

/// Reads the description of a serialized unsigned 8 bits integer, all fields being zero if the
/// buffer cannot be read.
///
/// # Safety
///
/// `serialized_data_ptr` must be valid for reads of `serialized_data_len` bytes.
#[no_mangle]
pub unsafe extern "C" fn concrete_cpu_tfhers_uint8_description(
    serialized_data_ptr: *const u8,
    serialized_data_len: usize,
) -> TfhersFheIntDescription {
    nounwind(|| {
        description(
            serialized_data_ptr,
            serialized_data_len,
            TfhersIntegerKind::Unsigned8,
        )
    })
}

/// Copies the blocks of a serialized unsigned 8 bits integer to `lwe_vec_buffer`.
///
/// Returns 0 on success and a negative value on error.
///
/// # Safety
///
/// `serialized_data_ptr` must be valid for reads of `serialized_data_len` bytes, `lwe_vec_buffer`
/// for writes of `lwe_size * n_cts` values of the description of the integer.
#[no_mangle]
pub unsafe extern "C" fn concrete_cpu_tfhers_uint8_to_lwe_array(
    serialized_data_ptr: *const u8,
    serialized_data_len: usize,
    lwe_vec_buffer: *mut u64,
) -> i64 {
    nounwind(|| {
        to_lwe_array(
            serialized_data_ptr,
            serialized_data_len,
            lwe_vec_buffer,
            TfhersIntegerKind::Unsigned8,
        )
    })
}

/// Serializes `fheuint_desc.n_cts` ciphertexts as an unsigned 8 bits integer.
///
/// Returns the number of bytes written, or 0 on error.
///
/// # Safety
///
/// `lwe_vec_buffer` must be valid for reads of `lwe_size * n_cts` values of `fheuint_desc`,
/// `fheuint_buffer` for writes of `fheuint_buffer_size` bytes.
#[no_mangle]
pub unsafe extern "C" fn concrete_cpu_lwe_array_to_tfhers_uint8(
    lwe_vec_buffer: *const u64,
    fheuint_buffer: *mut u8,
    fheuint_buffer_size: usize,
    fheuint_desc: TfhersFheIntDescription,
) -> usize {
    nounwind(|| {
        from_lwe_array(
            lwe_vec_buffer,
            fheuint_buffer,
            fheuint_buffer_size,
            fheuint_desc,
            TfhersIntegerKind::Unsigned8,
        )
    })
}

/// Signed counterpart of [`concrete_cpu_tfhers_uint8_description`].
///
/// # Safety
///
/// `serialized_data_ptr` must be valid for reads of `serialized_data_len` bytes.
#[no_mangle]
pub unsafe extern "C" fn concrete_cpu_tfhers_int8_description(
    serialized_data_ptr: *const u8,
    serialized_data_len: usize,
) -> TfhersFheIntDescription {
    nounwind(|| {
        description(
            serialized_data_ptr,
            serialized_data_len,
            TfhersIntegerKind::Signed8,
        )
    })
}

/// Signed counterpart of [`concrete_cpu_tfhers_uint8_to_lwe_array`].
///
/// # Safety
///
/// Same as [`concrete_cpu_tfhers_uint8_to_lwe_array`].
#[no_mangle]
pub unsafe extern "C" fn concrete_cpu_tfhers_int8_to_lwe_array(
    serialized_data_ptr: *const u8,
    serialized_data_len: usize,
    lwe_vec_buffer: *mut u64,
) -> i64 {
    nounwind(|| {
        to_lwe_array(
            serialized_data_ptr,
            serialized_data_len,
            lwe_vec_buffer,
            TfhersIntegerKind::Signed8,
        )
    })
}

/// Signed counterpart of [`concrete_cpu_lwe_array_to_tfhers_uint8`].
///
/// # Safety
///
/// Same as [`concrete_cpu_lwe_array_to_tfhers_uint8`].
#[no_mangle]
pub unsafe extern "C" fn concrete_cpu_lwe_array_to_tfhers_int8(
    lwe_vec_buffer: *const u64,
    fheint_buffer: *mut u8,
    fheint_buffer_size: usize,
    fheint_desc: TfhersFheIntDescription,
) -> usize {
    nounwind(|| {
        from_lwe_array(
            lwe_vec_buffer,
            fheint_buffer,
            fheint_buffer_size,
            fheint_desc,
            TfhersIntegerKind::Signed8,
        )
    })
}
