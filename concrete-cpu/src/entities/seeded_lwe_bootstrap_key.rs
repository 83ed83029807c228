use crate::commons::math::random::CompressionSeed;
use crate::commons::parameters::{
    DecompositionBaseLog, DecompositionLevelCount, GlweSize, LweDimension, PolynomialSize,
};
use crate::commons::traits::{Container, ContainerMut, Split};
use rayon::prelude::*;

/// A bootstrap key storing only the body polynomial of each GLWE row of its GGSW ciphertexts.
///
/// Each GGSW ciphertext holds `level_count * (k + 1)` body polynomials, in the order of the rows
/// of the matching [`LweBootstrapKey`](crate::entities::LweBootstrapKey).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeededLweBootstrapKey<C: Container<Element = u64>> {
    data: C,
    glwe_size: GlweSize,
    polynomial_size: PolynomialSize,
    decomposition_base_log: DecompositionBaseLog,
    decomposition_level_count: DecompositionLevelCount,
    compression_seed: CompressionSeed,
}

/// Returns the number of `u64` of a seeded GGSW ciphertext.
pub fn seeded_ggsw_ciphertext_size(
    glwe_size: GlweSize,
    polynomial_size: PolynomialSize,
    decomposition_level_count: DecompositionLevelCount,
) -> usize {
    decomposition_level_count.0 * glwe_size.0 * polynomial_size.0
}

/// Returns the number of `u64` of a seeded bootstrap key.
pub fn seeded_lwe_bootstrap_key_size(
    input_lwe_dimension: LweDimension,
    glwe_size: GlweSize,
    polynomial_size: PolynomialSize,
    decomposition_level_count: DecompositionLevelCount,
) -> usize {
    input_lwe_dimension.0
        * seeded_ggsw_ciphertext_size(glwe_size, polynomial_size, decomposition_level_count)
}

impl<C: Container<Element = u64>> AsRef<[u64]> for SeededLweBootstrapKey<C> {
    fn as_ref(&self) -> &[u64] {
        self.data.as_slice()
    }
}

impl<C: ContainerMut<Element = u64>> AsMut<[u64]> for SeededLweBootstrapKey<C> {
    fn as_mut(&mut self) -> &mut [u64] {
        self.data.as_mut_slice()
    }
}

impl<C: Container<Element = u64>> SeededLweBootstrapKey<C> {
    pub fn from_container(
        container: C,
        glwe_size: GlweSize,
        polynomial_size: PolynomialSize,
        decomposition_base_log: DecompositionBaseLog,
        decomposition_level_count: DecompositionLevelCount,
        compression_seed: CompressionSeed,
    ) -> Self {
        let ggsw_size =
            seeded_ggsw_ciphertext_size(glwe_size, polynomial_size, decomposition_level_count);
        assert_eq!(
            container.container_len() % ggsw_size,
            0,
            "The provided container length is not valid. \
            It needs to be dividable by the size of a seeded GGSW ciphertext: {ggsw_size}. \
            Got container length: {}.",
            container.container_len()
        );
        Self {
            data: container,
            glwe_size,
            polynomial_size,
            decomposition_base_log,
            decomposition_level_count,
            compression_seed,
        }
    }

    pub fn glwe_size(&self) -> GlweSize {
        self.glwe_size
    }

    pub fn polynomial_size(&self) -> PolynomialSize {
        self.polynomial_size
    }

    pub fn decomposition_base_log(&self) -> DecompositionBaseLog {
        self.decomposition_base_log
    }

    pub fn decomposition_level_count(&self) -> DecompositionLevelCount {
        self.decomposition_level_count
    }

    pub fn compression_seed(&self) -> CompressionSeed {
        self.compression_seed
    }

    pub fn input_lwe_dimension(&self) -> LweDimension {
        LweDimension(self.data.container_len() / self.ggsw_size())
    }

    fn ggsw_size(&self) -> usize {
        seeded_ggsw_ciphertext_size(
            self.glwe_size,
            self.polynomial_size,
            self.decomposition_level_count,
        )
    }

    /// Iterates over the seeded GGSW ciphertexts of the key.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &[u64]> + ExactSizeIterator {
        self.as_ref().into_chunks(self.ggsw_size())
    }

    pub fn into_container(self) -> C {
        self.data
    }
}

impl<C: ContainerMut<Element = u64>> SeededLweBootstrapKey<C> {
    pub fn iter_mut(&mut self) -> impl DoubleEndedIterator<Item = &mut [u64]> + ExactSizeIterator {
        let ggsw_size = self.ggsw_size();
        self.as_mut().into_chunks(ggsw_size)
    }

    pub fn par_iter_mut(&mut self) -> impl IndexedParallelIterator<Item = &mut [u64]> {
        let ggsw_size = self.ggsw_size();
        self.as_mut().par_chunks_exact_mut(ggsw_size)
    }
}

pub type SeededLweBootstrapKeyOwned = SeededLweBootstrapKey<Vec<u64>>;
pub type SeededLweBootstrapKeyView<'data> = SeededLweBootstrapKey<&'data [u64]>;
pub type SeededLweBootstrapKeyMutView<'data> = SeededLweBootstrapKey<&'data mut [u64]>;

impl SeededLweBootstrapKeyOwned {
    pub fn new(
        fill_with: u64,
        glwe_size: GlweSize,
        polynomial_size: PolynomialSize,
        decomposition_base_log: DecompositionBaseLog,
        decomposition_level_count: DecompositionLevelCount,
        input_lwe_dimension: LweDimension,
        compression_seed: CompressionSeed,
    ) -> Self {
        Self::from_container(
            vec![
                fill_with;
                seeded_lwe_bootstrap_key_size(
                    input_lwe_dimension,
                    glwe_size,
                    polynomial_size,
                    decomposition_level_count
                )
            ],
            glwe_size,
            polynomial_size,
            decomposition_base_log,
            decomposition_level_count,
            compression_seed,
        )
    }
}
