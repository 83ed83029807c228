//! Random sampling on top of the byte generators of `concrete-csprng`.
//!
//! [`RandomGenerator`] turns a stream of uniform bytes into the distributions used by the
//! encryption schemes: uniform 64 bits integers for masks, uniform bits for secret keys and
//! centered gaussians for noises. The number of bytes consumed by one sample is fixed for the
//! uniform distributions, which makes the masks of a forked generator reproducible.

use crate::commons::numeric::UnsignedTorus;
pub use concrete_csprng::generators::{
    BytesPerChild, ChildrenCount, ForkError, ParallelRandomGenerator as ParallelByteRandomGenerator,
    RandomGenerator as ByteRandomGenerator, SoftwareRandomGenerator,
};
pub use concrete_csprng::seeders::{Seed, Seeder};
use rayon::prelude::*;

/// The seed of the mask stream of a seeded (compressed) entity.
///
/// The masks are not stored: they are regenerated from this seed when the entity is decompressed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CompressionSeed {
    pub seed: Seed,
}

impl From<Seed> for CompressionSeed {
    fn from(seed: Seed) -> Self {
        Self { seed }
    }
}

/// The byte generator used by every engine of the crate.
pub type ActivatedRandomGenerator = SoftwareRandomGenerator;

/// Number of bytes consumed by a uniform 64 bits sample.
pub const BYTES_PER_U64: usize = core::mem::size_of::<u64>();

/// A cryptographically secure random number generator.
pub struct RandomGenerator<G: ByteRandomGenerator>(G);

impl<G: ByteRandomGenerator> RandomGenerator<G> {
    pub fn new(seed: Seed) -> Self {
        Self(G::new(seed))
    }

    /// Returns the number of bytes that can still be drawn, if it fits a `usize`.
    pub fn remaining_bytes(&self) -> Option<usize> {
        usize::try_from(self.0.remaining_bytes().0).ok()
    }

    /// Forks the generator into `n_child` independent generators of `bytes_per_child` bytes.
    ///
    /// The children cover contiguous and disjoint parts of the parent stream, in order.
    pub fn try_fork(
        &mut self,
        n_child: usize,
        bytes_per_child: usize,
    ) -> Result<impl Iterator<Item = Self>, ForkError> {
        self.0
            .try_fork(ChildrenCount(n_child), BytesPerChild(bytes_per_child))
            .map(|iter| iter.map(Self))
    }

    #[inline]
    fn generate_next(&mut self) -> u8 {
        match self.0.next_byte() {
            Some(byte) => byte,
            None => panic!("the random generator ran out of bytes, the fork budget is too small"),
        }
    }

    /// Samples a `u64` uniformly over all its values.
    #[inline]
    pub fn random_uniform_u64(&mut self) -> u64 {
        let mut bytes = [0u8; BYTES_PER_U64];
        bytes.iter_mut().for_each(|b| *b = self.generate_next());
        u64::from_le_bytes(bytes)
    }

    /// Samples a `u128` uniformly over all its values.
    pub fn random_uniform_u128(&mut self) -> u128 {
        let mut bytes = [0u8; 16];
        bytes.iter_mut().for_each(|b| *b = self.generate_next());
        u128::from_le_bytes(bytes)
    }

    pub fn fill_slice_with_random_uniform(&mut self, output: &mut [u64]) {
        output
            .iter_mut()
            .for_each(|x| *x = self.random_uniform_u64());
    }

    /// Samples a bit, using one byte of the stream.
    #[inline]
    pub fn random_uniform_binary(&mut self) -> u64 {
        (self.generate_next() & 1) as u64
    }

    pub fn fill_slice_with_random_uniform_binary(&mut self, output: &mut [u64]) {
        output
            .iter_mut()
            .for_each(|x| *x = self.random_uniform_binary());
    }

    /// Samples two independent values of a gaussian with the given mean and standard deviation,
    /// using the polar form of the Box-Muller transform.
    pub fn random_gaussian(&mut self, mean: f64, std: f64) -> (f64, f64) {
        loop {
            let u = uniform_f64_in_unit_interval(self.random_uniform_u64());
            let v = uniform_f64_in_unit_interval(self.random_uniform_u64());
            let s = u * u + v * v;
            if s > 0. && s < 1. {
                let cst = std * (-2. * s.ln() / s).sqrt();
                return (u * cst + mean, v * cst + mean);
            }
        }
    }

    /// Fills a slice with torus elements drawn from a gaussian, both mean and standard deviation
    /// being expressed on the torus.
    pub fn fill_slice_with_random_gaussian(&mut self, output: &mut [u64], mean: f64, std: f64) {
        self.map_gaussian_pairs(output, mean, std, |_, sample| sample);
    }

    /// Adds gaussian torus elements to the values of a slice.
    pub fn unsigned_torus_slice_wrapping_add_random_gaussian_assign(
        &mut self,
        output: &mut [u64],
        mean: f64,
        std: f64,
    ) {
        self.map_gaussian_pairs(output, mean, std, u64::wrapping_add);
    }

    fn map_gaussian_pairs(
        &mut self,
        output: &mut [u64],
        mean: f64,
        std: f64,
        f: impl Fn(u64, u64) -> u64,
    ) {
        for pair in output.chunks_mut(2) {
            let (g0, g1) = self.random_gaussian(mean, std);
            let samples = [u64::from_torus(g0), u64::from_torus(g1)];
            for (out, sample) in pair.iter_mut().zip(samples) {
                *out = f(*out, sample);
            }
        }
    }
}

impl<G: ParallelByteRandomGenerator> RandomGenerator<G> {
    /// Parallel counterpart of [`RandomGenerator::try_fork`], yielding the same children.
    pub fn par_try_fork(
        &mut self,
        n_child: usize,
        bytes_per_child: usize,
    ) -> Result<impl IndexedParallelIterator<Item = Self>, ForkError> {
        self.0
            .par_try_fork(ChildrenCount(n_child), BytesPerChild(bytes_per_child))
            .map(|iter| iter.map(Self))
    }
}

// Maps a uniform u64 onto [-1, 1).
#[inline]
fn uniform_f64_in_unit_interval(x: u64) -> f64 {
    (x as i64) as f64 / 9_223_372_036_854_775_808.0
}
