use super::utils::nounwind;
use crate::commons::parameters::PolynomialSize;
pub use crate::fft_impl::fft::Fft;

#[no_mangle]
pub static CONCRETE_FFT_SIZE: usize = core::mem::size_of::<Fft>();
#[no_mangle]
pub static CONCRETE_FFT_ALIGN: usize = core::mem::align_of::<Fft>();

/// # Safety
///
/// `mem` must be valid for writes of [`CONCRETE_FFT_SIZE`] bytes, aligned to
/// [`CONCRETE_FFT_ALIGN`]. `polynomial_size` must be a power of two greater than one.
#[no_mangle]
pub unsafe extern "C" fn concrete_cpu_construct_concrete_fft(
    mem: *mut Fft,
    polynomial_size: usize,
) {
    nounwind(|| mem.write(Fft::new(PolynomialSize(polynomial_size))))
}

/// # Safety
///
/// `mem` must point to an FFT built by [`concrete_cpu_construct_concrete_fft`] and not yet
/// destroyed.
#[no_mangle]
pub unsafe extern "C" fn concrete_cpu_destroy_concrete_fft(mem: *mut Fft) {
    nounwind(|| core::ptr::drop_in_place(mem))
}
