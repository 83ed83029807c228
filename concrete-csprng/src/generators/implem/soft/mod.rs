//! A module using a software implementation of the AES block cipher.
//!
//! The `aes` crate detects the AES-NI and ARMv8 crypto extensions at runtime and uses them when
//! available, so this is the generator used on every target.

mod block_cipher;
pub use block_cipher::SoftwareBlockCipher;

mod generator;
pub use generator::*;

#[cfg(feature = "parallel")]
mod parallel;
