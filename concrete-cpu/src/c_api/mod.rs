//! The `concrete_cpu_*` C entry points.
//!
//! Every buffer is caller owned and described by raw pointers and dimensions. Handles (random
//! generators, FFT plans) are constructed in place into memory of the `*_SIZE` and `*_ALIGN`
//! advertised by the matching statics. A panic inside an entry point aborts the process.

pub mod bootstrap;
pub mod csprng;
pub mod encrypt;
pub mod fft;
pub mod keyswitch;
pub mod linear_op;
pub mod secret_key;
pub mod simulation;
pub mod tfhers;
pub mod utils;
pub mod wop_pbs;

pub use csprng::{Csprng, EncCsprng, SecCsprng};
pub use fft::Fft;
pub use utils::{ScratchStatus, Uint128};

#[cfg(test)]
mod tests;
