//! A generic implementation of the AES-128 counter mode generator.
//!
//! The generator is parameterized by an [`AesBlockCipher`], which performs the actual
//! encryptions. A seed is used as the AES key, and the stream of the generator is the
//! concatenation of the encryptions of the counter values `0, 1, 2, ...`, each one producing
//! [`BYTES_PER_AES_CALL`] bytes. A position in this stream is a [`TableIndex`]: the index of the
//! AES call, plus the index of a byte in its output.
//!
//! The cipher is always called on batches of [`AES_CALLS_PER_BATCH`] counters, which allows
//! pipelined hardware implementations to be used efficiently.

/// The number of bytes produced by one AES call.
pub const BYTES_PER_AES_CALL: usize = 128 / 8;

/// The number of AES calls performed at once.
pub const AES_CALLS_PER_BATCH: usize = 8;

/// The number of bytes produced by one batch.
pub const BYTES_PER_BATCH: usize = BYTES_PER_AES_CALL * AES_CALLS_PER_BATCH;

mod block_cipher;
pub use block_cipher::*;

mod index;
pub use index::*;

mod generic;
pub use generic::*;

#[cfg(feature = "parallel")]
mod parallel;
#[cfg(feature = "parallel")]
pub use parallel::*;
