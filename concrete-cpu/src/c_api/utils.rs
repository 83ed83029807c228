use crate::commons::dispersion::Variance;
use crate::commons::math::random::Seed;
use crate::error::Error;
use dyn_stack::{PodStack, SizeOverflow, StackReq};
use std::panic::AssertUnwindSafe;

/// A 128 bits integer crossing the C boundary, used for seeds.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Uint128 {
    pub little_endian_bytes: [u8; 16],
}

impl From<Uint128> for Seed {
    fn from(value: Uint128) -> Self {
        Seed::from_le_bytes(value.little_endian_bytes)
    }
}

impl From<Seed> for Uint128 {
    fn from(value: Seed) -> Self {
        Self {
            little_endian_bytes: value.to_le_bytes(),
        }
    }
}

/// Outcome of a `*_scratch` query.
#[repr(u32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ScratchStatus {
    Valid = 0,
    SizeOverflow = 1,
}

/// Runs `closure`, aborting the process if it panics.
///
/// Unwinding out of an `extern "C"` function is undefined behavior, every entry point of the C
/// API goes through this function.
pub fn nounwind<T>(closure: impl FnOnce() -> T) -> T {
    match std::panic::catch_unwind(AssertUnwindSafe(closure)) {
        Ok(value) => value,
        Err(_) => std::process::abort(),
    }
}

/// Returns the value held by `result`, logging the error otherwise.
pub(super) fn ok_or_log<T>(result: Result<T, Error>, context: &str) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::error!("{context}: {err}");
            None
        }
    }
}

/// Writes the size and alignment of `req` to the C out parameters.
///
/// # Safety
///
/// `stack_size` and `stack_align` must be valid for writes.
pub(super) unsafe fn write_scratch(
    req: Result<StackReq, SizeOverflow>,
    stack_size: *mut usize,
    stack_align: *mut usize,
) -> ScratchStatus {
    match req {
        Ok(req) => {
            *stack_size = req.size_bytes();
            *stack_align = req.align_bytes();
            ScratchStatus::Valid
        }
        Err(_) => ScratchStatus::SizeOverflow,
    }
}

/// Builds a scratch stack over `stack_size` bytes starting at `stack`.
///
/// # Safety
///
/// `stack` must be valid for reads and writes of `stack_size` bytes, and not be aliased for the
/// lifetime of the returned stack.
pub(super) unsafe fn stack_from_raw<'a>(stack: *mut u8, stack_size: usize) -> &'a mut PodStack {
    PodStack::new(core::slice::from_raw_parts_mut(stack, stack_size))
}

/// Checks in debug builds that a stack of `stack_size` bytes fulfills `req`, which is only
/// evaluated when debug assertions are enabled.
pub(super) fn debug_check_stack(
    req: impl FnOnce() -> Result<StackReq, SizeOverflow>,
    stack_size: usize,
) {
    if cfg!(debug_assertions) {
        match req() {
            Ok(req) => assert!(
                stack_size >= req.size_bytes(),
                "scratch stack too small: {stack_size} bytes given, {} required",
                req.size_bytes(),
            ),
            Err(_) => panic!("scratch requirement overflows usize"),
        }
    }
}

/// The noise of the C API is given as a variance on the torus.
pub(super) fn as_variance(variance: f64) -> Variance {
    debug_assert!(variance >= 0.0, "negative variance: {variance}");
    Variance(variance)
}
