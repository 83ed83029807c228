use crate::commons::math::random::CompressionSeed;
use crate::commons::parameters::{LweDimension, LweSize};

/// An LWE ciphertext whose mask is replaced by the seed it was generated from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeededLweCiphertext {
    body: u64,
    lwe_size: LweSize,
    compression_seed: CompressionSeed,
}

impl SeededLweCiphertext {
    pub fn from_scalar(body: u64, lwe_size: LweSize, compression_seed: CompressionSeed) -> Self {
        Self {
            body,
            lwe_size,
            compression_seed,
        }
    }

    pub fn new(lwe_size: LweSize, compression_seed: CompressionSeed) -> Self {
        Self::from_scalar(0, lwe_size, compression_seed)
    }

    pub fn get_body(&self) -> u64 {
        self.body
    }

    pub fn get_mut_body(&mut self) -> &mut u64 {
        &mut self.body
    }

    pub fn lwe_size(&self) -> LweSize {
        self.lwe_size
    }

    pub fn lwe_dimension(&self) -> LweDimension {
        self.lwe_size.to_lwe_dimension()
    }

    pub fn compression_seed(&self) -> CompressionSeed {
        self.compression_seed
    }

    pub fn into_scalar(self) -> u64 {
        self.body
    }
}
