//! Generator used to draw secret keys.

use crate::commons::math::random::{ByteRandomGenerator, RandomGenerator, Seed};

/// A random generator dedicated to secret keys.
pub struct SecretRandomGenerator<G: ByteRandomGenerator>(RandomGenerator<G>);

impl<G: ByteRandomGenerator> SecretRandomGenerator<G> {
    pub fn new(seed: Seed) -> Self {
        Self(RandomGenerator::new(seed))
    }

    pub fn remaining_bytes(&self) -> Option<usize> {
        self.0.remaining_bytes()
    }

    /// Fills the slice with uniform bits.
    pub(crate) fn fill_slice_with_random_uniform_binary(&mut self, slice: &mut [u64]) {
        self.0.fill_slice_with_random_uniform_binary(slice);
    }
}
