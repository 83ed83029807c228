//! Generators used when encrypting.
//!
//! The mask and the noise of a ciphertext come from two independent streams. Keys made of many
//! ciphertexts fork both streams with a fixed number of bytes per child, in the order of the
//! ciphertexts in memory. The mask of any ciphertext therefore only depends on the mask seed and
//! on its position, whatever the parallelism used, and can be regenerated from the seed alone.

use crate::commons::dispersion::DispersionParameter;
use crate::commons::math::random::{
    ByteRandomGenerator, ForkError, ParallelByteRandomGenerator, RandomGenerator, Seed, Seeder,
    BYTES_PER_U64,
};
use crate::commons::parameters::{
    DecompositionLevelCount, FunctionalPackingKeyswitchKeyCount, GlweSize, LweCiphertextCount,
    LweDimension, LweSize, PolynomialSize,
};
use rayon::prelude::*;

fn mask_bytes_per_polynomial(poly_size: PolynomialSize) -> usize {
    poly_size.0 * BYTES_PER_U64
}

fn mask_bytes_per_glwe(glwe_size: GlweSize, poly_size: PolynomialSize) -> usize {
    glwe_size.to_glwe_dimension().0 * mask_bytes_per_polynomial(poly_size)
}

fn mask_bytes_per_ggsw_level(glwe_size: GlweSize, poly_size: PolynomialSize) -> usize {
    glwe_size.0 * mask_bytes_per_glwe(glwe_size, poly_size)
}

fn mask_bytes_per_ggsw(
    level: DecompositionLevelCount,
    glwe_size: GlweSize,
    poly_size: PolynomialSize,
) -> usize {
    level.0 * mask_bytes_per_ggsw_level(glwe_size, poly_size)
}

fn mask_bytes_per_lwe(lwe_dimension: LweDimension) -> usize {
    lwe_dimension.0 * BYTES_PER_U64
}

fn mask_bytes_per_ksk_block(level: DecompositionLevelCount, lwe_dimension: LweDimension) -> usize {
    level.0 * mask_bytes_per_lwe(lwe_dimension)
}

fn mask_bytes_per_pfpksk_chunk(
    level: DecompositionLevelCount,
    glwe_size: GlweSize,
    poly_size: PolynomialSize,
) -> usize {
    level.0 * mask_bytes_per_glwe(glwe_size, poly_size)
}

fn mask_bytes_per_pfpksk(
    level: DecompositionLevelCount,
    glwe_size: GlweSize,
    poly_size: PolynomialSize,
    lwe_size: LweSize,
) -> usize {
    lwe_size.0 * mask_bytes_per_pfpksk_chunk(level, glwe_size, poly_size)
}

// Upper bound on the bytes used by a gaussian sample: the polar method rejects about one pair of
// uniform draws out of five, 32 attempts per coefficient is never reached in practice.
fn noise_bytes_per_coef() -> usize {
    2 * BYTES_PER_U64 * 32
}

fn noise_bytes_per_polynomial(poly_size: PolynomialSize) -> usize {
    poly_size.0 * noise_bytes_per_coef()
}

fn noise_bytes_per_glwe(poly_size: PolynomialSize) -> usize {
    noise_bytes_per_polynomial(poly_size)
}

fn noise_bytes_per_ggsw_level(glwe_size: GlweSize, poly_size: PolynomialSize) -> usize {
    glwe_size.0 * noise_bytes_per_glwe(poly_size)
}

fn noise_bytes_per_ggsw(
    level: DecompositionLevelCount,
    glwe_size: GlweSize,
    poly_size: PolynomialSize,
) -> usize {
    level.0 * noise_bytes_per_ggsw_level(glwe_size, poly_size)
}

fn noise_bytes_per_lwe() -> usize {
    noise_bytes_per_coef()
}

fn noise_bytes_per_ksk_block(level: DecompositionLevelCount) -> usize {
    level.0 * noise_bytes_per_lwe()
}

fn noise_bytes_per_pfpksk_chunk(level: DecompositionLevelCount, poly_size: PolynomialSize) -> usize {
    level.0 * noise_bytes_per_glwe(poly_size)
}

fn noise_bytes_per_pfpksk(
    level: DecompositionLevelCount,
    poly_size: PolynomialSize,
    lwe_size: LweSize,
) -> usize {
    lwe_size.0 * noise_bytes_per_pfpksk_chunk(level, poly_size)
}

/// A random generator replaying the mask stream of an [`EncryptionRandomGenerator`].
///
/// Forking it splits the stream exactly like the corresponding fork of the encryption generator.
pub struct MaskRandomGenerator<G: ByteRandomGenerator> {
    gen: RandomGenerator<G>,
}

// Generates the fork methods of both generators from the byte budgets of the children.
macro_rules! fork_methods {
    ($(
        $(#[$meta:meta])*
        ($name:ident, $par_name:ident) ($($arg:ident: $arg_ty:ty),*) =>
            count: $count:expr, mask: $mask:expr, noise: $noise:expr;
    )*) => {
        impl<G: ByteRandomGenerator> MaskRandomGenerator<G> {$(
            $(#[$meta])*
            pub(crate) fn $name(
                &mut self,
                $($arg: $arg_ty),*
            ) -> Result<impl Iterator<Item = MaskRandomGenerator<G>>, ForkError> {
                self.try_fork($count, $mask)
            }
        )*}

        impl<G: ParallelByteRandomGenerator> MaskRandomGenerator<G> {$(
            pub(crate) fn $par_name(
                &mut self,
                $($arg: $arg_ty),*
            ) -> Result<impl IndexedParallelIterator<Item = MaskRandomGenerator<G>>, ForkError> {
                self.par_try_fork($count, $mask)
            }
        )*}

        impl<G: ByteRandomGenerator> EncryptionRandomGenerator<G> {$(
            $(#[$meta])*
            pub(crate) fn $name(
                &mut self,
                $($arg: $arg_ty),*
            ) -> Result<impl Iterator<Item = EncryptionRandomGenerator<G>>, ForkError> {
                let mask_iter = self.mask.$name($($arg),*)?;
                self.try_fork($count, mask_iter, $noise)
            }
        )*}

        impl<G: ParallelByteRandomGenerator> EncryptionRandomGenerator<G> {$(
            pub(crate) fn $par_name(
                &mut self,
                $($arg: $arg_ty),*
            ) -> Result<impl IndexedParallelIterator<Item = EncryptionRandomGenerator<G>>, ForkError>
            {
                let mask_iter = self.mask.$par_name($($arg),*)?;
                self.par_try_fork($count, mask_iter, $noise)
            }
        )*}
    };
}

fork_methods! {
    /// Forks the generator, when splitting a bootstrap key into ggsw ciphertexts.
    (fork_bsk_to_ggsw, par_fork_bsk_to_ggsw)
    (lwe_dimension: LweDimension, level: DecompositionLevelCount, glwe_size: GlweSize, polynomial_size: PolynomialSize) =>
        count: lwe_dimension.0,
        mask: mask_bytes_per_ggsw(level, glwe_size, polynomial_size),
        noise: noise_bytes_per_ggsw(level, glwe_size, polynomial_size);

    /// Forks the generator, when splitting a ggsw ciphertext into level matrices.
    (fork_ggsw_to_ggsw_levels, par_fork_ggsw_to_ggsw_levels)
    (level: DecompositionLevelCount, glwe_size: GlweSize, polynomial_size: PolynomialSize) =>
        count: level.0,
        mask: mask_bytes_per_ggsw_level(glwe_size, polynomial_size),
        noise: noise_bytes_per_ggsw_level(glwe_size, polynomial_size);

    /// Forks the generator, when splitting a level matrix into glwe ciphertexts.
    (fork_ggsw_level_to_glwe, par_fork_ggsw_level_to_glwe)
    (glwe_size: GlweSize, polynomial_size: PolynomialSize) =>
        count: glwe_size.0,
        mask: mask_bytes_per_glwe(glwe_size, polynomial_size),
        noise: noise_bytes_per_glwe(polynomial_size);

    /// Forks the generator, when splitting an lwe ciphertext list into ciphertexts.
    (fork_lwe_list_to_lwe, par_fork_lwe_list_to_lwe)
    (lwe_count: LweCiphertextCount, lwe_dimension: LweDimension) =>
        count: lwe_count.0,
        mask: mask_bytes_per_lwe(lwe_dimension),
        noise: noise_bytes_per_lwe();

    /// Forks the generator, when splitting a keyswitch key into the blocks encrypting the
    /// decomposition of one input key coefficient.
    (fork_ksk_to_ksk_blocks, par_fork_ksk_to_ksk_blocks)
    (input_lwe_dimension: LweDimension, level: DecompositionLevelCount, output_lwe_dimension: LweDimension) =>
        count: input_lwe_dimension.0,
        mask: mask_bytes_per_ksk_block(level, output_lwe_dimension),
        noise: noise_bytes_per_ksk_block(level);

    /// Forks the generator, when splitting the private functional packing keyswitch keys of a
    /// circuit bootstrap.
    (fork_cbs_pfpksk_to_pfpksk, par_fork_cbs_pfpksk_to_pfpksk)
    (level: DecompositionLevelCount, glwe_size: GlweSize, polynomial_size: PolynomialSize, lwe_size: LweSize, pfpksk_count: FunctionalPackingKeyswitchKeyCount) =>
        count: pfpksk_count.0,
        mask: mask_bytes_per_pfpksk(level, glwe_size, polynomial_size, lwe_size),
        noise: noise_bytes_per_pfpksk(level, polynomial_size, lwe_size);

    /// Forks the generator, when splitting a private functional packing keyswitch key into the
    /// chunks associated to one input coefficient.
    (fork_pfpksk_to_pfpksk_chunks, par_fork_pfpksk_to_pfpksk_chunks)
    (level: DecompositionLevelCount, glwe_size: GlweSize, polynomial_size: PolynomialSize, lwe_size: LweSize) =>
        count: lwe_size.0,
        mask: mask_bytes_per_pfpksk_chunk(level, glwe_size, polynomial_size),
        noise: noise_bytes_per_pfpksk_chunk(level, polynomial_size);
}

impl<G: ByteRandomGenerator> MaskRandomGenerator<G> {
    pub fn new(seed: Seed) -> Self {
        Self {
            gen: RandomGenerator::new(seed),
        }
    }

    pub fn remaining_bytes(&self) -> Option<usize> {
        self.gen.remaining_bytes()
    }

    pub(crate) fn fill_slice_with_random_mask(&mut self, output: &mut [u64]) {
        self.gen.fill_slice_with_random_uniform(output);
    }

    fn try_fork(
        &mut self,
        n_child: usize,
        mask_bytes: usize,
    ) -> Result<impl Iterator<Item = MaskRandomGenerator<G>>, ForkError> {
        self.gen
            .try_fork(n_child, mask_bytes)
            .map(|iter| iter.map(|gen| Self { gen }))
    }
}

impl<G: ParallelByteRandomGenerator> MaskRandomGenerator<G> {
    fn par_try_fork(
        &mut self,
        n_child: usize,
        mask_bytes: usize,
    ) -> Result<impl IndexedParallelIterator<Item = MaskRandomGenerator<G>>, ForkError> {
        self.gen
            .par_try_fork(n_child, mask_bytes)
            .map(|iter| iter.map(|gen| Self { gen }))
    }
}

/// The generator used to encrypt: a mask stream and a noise stream.
pub struct EncryptionRandomGenerator<G: ByteRandomGenerator> {
    mask: MaskRandomGenerator<G>,
    noise: RandomGenerator<G>,
}

impl<G: ByteRandomGenerator> EncryptionRandomGenerator<G> {
    /// Creates a generator whose mask stream is seeded by `seed`, the noise stream being seeded
    /// by `seeder`.
    // S is ?Sized to allow Box<dyn Seeder> to be passed.
    pub fn new<S: Seeder + ?Sized>(seed: Seed, seeder: &mut S) -> Self {
        Self {
            mask: MaskRandomGenerator::new(seed),
            noise: RandomGenerator::new(seeder.seed()),
        }
    }

    pub fn remaining_bytes(&self) -> Option<usize> {
        self.mask.remaining_bytes()
    }

    fn try_fork(
        &mut self,
        n_child: usize,
        mask_iter: impl Iterator<Item = MaskRandomGenerator<G>>,
        noise_bytes: usize,
    ) -> Result<impl Iterator<Item = EncryptionRandomGenerator<G>>, ForkError> {
        let noise_iter = self.noise.try_fork(n_child, noise_bytes)?;
        Ok(mask_iter
            .zip(noise_iter)
            .map(|(mask, noise)| EncryptionRandomGenerator { mask, noise }))
    }

    pub(crate) fn fill_slice_with_random_mask(&mut self, output: &mut [u64]) {
        self.mask.fill_slice_with_random_mask(output);
    }

    /// Samples one noise value on the torus.
    pub(crate) fn random_noise(&mut self, std: impl DispersionParameter) -> u64 {
        let mut noise = [0u64];
        self.noise
            .fill_slice_with_random_gaussian(&mut noise, 0., std.get_standard_dev());
        noise[0]
    }

    pub(crate) fn unsigned_torus_slice_wrapping_add_random_noise_assign(
        &mut self,
        output: &mut [u64],
        std: impl DispersionParameter,
    ) {
        self.noise
            .unsigned_torus_slice_wrapping_add_random_gaussian_assign(
                output,
                0.,
                std.get_standard_dev(),
            );
    }
}

impl<G: ParallelByteRandomGenerator> EncryptionRandomGenerator<G> {
    fn par_try_fork(
        &mut self,
        n_child: usize,
        mask_iter: impl IndexedParallelIterator<Item = MaskRandomGenerator<G>>,
        noise_bytes: usize,
    ) -> Result<impl IndexedParallelIterator<Item = EncryptionRandomGenerator<G>>, ForkError> {
        let noise_iter = self.noise.par_try_fork(n_child, noise_bytes)?;
        Ok(mask_iter
            .zip(noise_iter)
            .map(|(mask, noise)| EncryptionRandomGenerator { mask, noise }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commons::generators::DeterministicSeeder;
    use crate::commons::math::random::ActivatedRandomGenerator;

    #[test]
    fn sequential_and_parallel_forks_agree() {
        let level = DecompositionLevelCount(2);
        let glwe_size = GlweSize(2);
        let poly = PolynomialSize(8);
        let lwe_dim = LweDimension(3);

        let new_gen = || {
            EncryptionRandomGenerator::<ActivatedRandomGenerator>::new(
                Seed(7),
                &mut DeterministicSeeder::<ActivatedRandomGenerator>::new(Seed(8)),
            )
        };

        let mut seq = new_gen();
        let seq_masks: Vec<u64> = seq
            .fork_bsk_to_ggsw(lwe_dim, level, glwe_size, poly)
            .unwrap()
            .map(|mut g| {
                let mut out = [0u64];
                g.fill_slice_with_random_mask(&mut out);
                out[0] ^ g.random_noise(crate::commons::dispersion::StandardDev(1e-10))
            })
            .collect();

        let mut par = new_gen();
        let par_masks: Vec<u64> = par
            .par_fork_bsk_to_ggsw(lwe_dim, level, glwe_size, poly)
            .unwrap()
            .map(|mut g| {
                let mut out = [0u64];
                g.fill_slice_with_random_mask(&mut out);
                out[0] ^ g.random_noise(crate::commons::dispersion::StandardDev(1e-10))
            })
            .collect();

        assert_eq!(seq_masks, par_masks);
    }

    #[test]
    fn mask_generator_replays_encryption_masks() {
        let level = DecompositionLevelCount(3);
        let lwe_dim = LweDimension(5);

        let mut enc = EncryptionRandomGenerator::<ActivatedRandomGenerator>::new(
            Seed(11),
            &mut DeterministicSeeder::<ActivatedRandomGenerator>::new(Seed(12)),
        );
        let mut mask = MaskRandomGenerator::<ActivatedRandomGenerator>::new(Seed(11));

        let from_enc: Vec<Vec<u64>> = enc
            .fork_ksk_to_ksk_blocks(LweDimension(4), level, lwe_dim)
            .unwrap()
            .map(|mut g| {
                let mut out = vec![0u64; level.0 * lwe_dim.0];
                for lwe in out.chunks_exact_mut(lwe_dim.0) {
                    g.fill_slice_with_random_mask(lwe);
                    let _ = g.random_noise(crate::commons::dispersion::StandardDev(1e-10));
                }
                out
            })
            .collect();
        let from_mask: Vec<Vec<u64>> = mask
            .fork_ksk_to_ksk_blocks(LweDimension(4), level, lwe_dim)
            .unwrap()
            .map(|mut g| {
                let mut out = vec![0u64; level.0 * lwe_dim.0];
                g.fill_slice_with_random_mask(&mut out);
                out
            })
            .collect();

        assert_eq!(from_enc, from_mask);
    }
}
