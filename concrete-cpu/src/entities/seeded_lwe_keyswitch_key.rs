use crate::commons::math::random::CompressionSeed;
use crate::commons::parameters::{
    DecompositionBaseLog, DecompositionLevelCount, LweDimension, LweSize,
};
use crate::commons::traits::{Container, ContainerMut, Split};
use crate::entities::lwe_keyswitch_key::lwe_keyswitch_key_ciphertext_count;
use rayon::prelude::*;

/// A keyswitch key storing only the bodies of its ciphertexts, the masks being regenerated from
/// the compression seed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeededLweKeyswitchKey<C: Container<Element = u64>> {
    data: C,
    decomposition_base_log: DecompositionBaseLog,
    decomposition_level_count: DecompositionLevelCount,
    output_lwe_size: LweSize,
    compression_seed: CompressionSeed,
}

/// Returns the number of `u64` of a seeded keyswitch key.
pub fn seeded_lwe_keyswitch_key_size(
    decomposition_level_count: DecompositionLevelCount,
    input_lwe_dimension: LweDimension,
) -> usize {
    lwe_keyswitch_key_ciphertext_count(decomposition_level_count, input_lwe_dimension).0
}

impl<C: Container<Element = u64>> AsRef<[u64]> for SeededLweKeyswitchKey<C> {
    fn as_ref(&self) -> &[u64] {
        self.data.as_slice()
    }
}

impl<C: ContainerMut<Element = u64>> AsMut<[u64]> for SeededLweKeyswitchKey<C> {
    fn as_mut(&mut self) -> &mut [u64] {
        self.data.as_mut_slice()
    }
}

impl<C: Container<Element = u64>> SeededLweKeyswitchKey<C> {
    pub fn from_container(
        container: C,
        decomposition_base_log: DecompositionBaseLog,
        decomposition_level_count: DecompositionLevelCount,
        output_lwe_size: LweSize,
        compression_seed: CompressionSeed,
    ) -> Self {
        assert_eq!(
            container.container_len() % decomposition_level_count.0,
            0,
            "The provided container length is not valid. \
            It needs to be dividable by decomposition_level_count: {}. \
            Got container length: {}.",
            decomposition_level_count.0,
            container.container_len()
        );
        Self {
            data: container,
            decomposition_base_log,
            decomposition_level_count,
            output_lwe_size,
            compression_seed,
        }
    }

    pub fn decomposition_base_log(&self) -> DecompositionBaseLog {
        self.decomposition_base_log
    }

    pub fn decomposition_level_count(&self) -> DecompositionLevelCount {
        self.decomposition_level_count
    }

    pub fn input_key_lwe_dimension(&self) -> LweDimension {
        LweDimension(self.data.container_len() / self.decomposition_level_count.0)
    }

    pub fn output_key_lwe_dimension(&self) -> LweDimension {
        self.output_lwe_size.to_lwe_dimension()
    }

    pub fn compression_seed(&self) -> CompressionSeed {
        self.compression_seed
    }

    /// Iterates over the bodies of the blocks, one block per input key coefficient.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &[u64]> + ExactSizeIterator {
        self.as_ref().into_chunks(self.decomposition_level_count.0)
    }

    pub fn into_container(self) -> C {
        self.data
    }
}

impl<C: ContainerMut<Element = u64>> SeededLweKeyswitchKey<C> {
    pub fn iter_mut(&mut self) -> impl DoubleEndedIterator<Item = &mut [u64]> + ExactSizeIterator {
        let level_count = self.decomposition_level_count.0;
        self.as_mut().into_chunks(level_count)
    }

    pub fn par_iter_mut(&mut self) -> impl IndexedParallelIterator<Item = &mut [u64]> {
        let level_count = self.decomposition_level_count.0;
        self.as_mut().par_chunks_exact_mut(level_count)
    }
}

pub type SeededLweKeyswitchKeyOwned = SeededLweKeyswitchKey<Vec<u64>>;
pub type SeededLweKeyswitchKeyView<'data> = SeededLweKeyswitchKey<&'data [u64]>;
pub type SeededLweKeyswitchKeyMutView<'data> = SeededLweKeyswitchKey<&'data mut [u64]>;

impl SeededLweKeyswitchKeyOwned {
    pub fn new(
        fill_with: u64,
        decomposition_base_log: DecompositionBaseLog,
        decomposition_level_count: DecompositionLevelCount,
        input_lwe_dimension: LweDimension,
        output_lwe_dimension: LweDimension,
        compression_seed: CompressionSeed,
    ) -> Self {
        Self::from_container(
            vec![
                fill_with;
                seeded_lwe_keyswitch_key_size(decomposition_level_count, input_lwe_dimension)
            ],
            decomposition_base_log,
            decomposition_level_count,
            output_lwe_dimension.to_lwe_size(),
            compression_seed,
        )
    }
}
