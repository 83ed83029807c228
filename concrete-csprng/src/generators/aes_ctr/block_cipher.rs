use crate::generators::aes_ctr::{AES_CALLS_PER_BATCH, BYTES_PER_BATCH};

/// Represents a key used in the AES block cipher.
///
/// Implementations must treat the u128 as a plain `[u8; 16]` in little endian order.
#[derive(Clone, Copy)]
pub struct AesKey(pub u128);

/// A trait for AES block ciphers.
///
/// The block cipher is used in a batched manner, so only `generate_batch` is exposed.
pub trait AesBlockCipher: Clone + Send + Sync {
    /// Instantiate a new generator from a secret key.
    fn new(key: AesKey) -> Self;
    /// Encrypts the given counter values, and returns the concatenated outputs.
    fn generate_batch(&mut self, data: [u128; AES_CALLS_PER_BATCH]) -> [u8; BYTES_PER_BATCH];
}
