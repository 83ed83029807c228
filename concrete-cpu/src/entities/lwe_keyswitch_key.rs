use crate::commons::parameters::{
    DecompositionBaseLog, DecompositionLevelCount, LweCiphertextCount, LweDimension, LweSize,
};
use crate::commons::traits::{Container, ContainerMut, Split};
use crate::entities::lwe_ciphertext_list::{
    LweCiphertextList, LweCiphertextListMutView, LweCiphertextListView,
};
use rayon::prelude::*;

/// A keyswitch key between two LWE secret keys.
///
/// For every coefficient `s_i` of the input key, a block of `level_count` LWE ciphertexts under
/// the output key encrypts `s_i * 2^(64 - j * base_log)` for `j` going from 1 to `level_count`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LweKeyswitchKey<C: Container<Element = u64>> {
    data: C,
    decomposition_base_log: DecompositionBaseLog,
    decomposition_level_count: DecompositionLevelCount,
    output_lwe_size: LweSize,
}

/// Returns the number of `u64` of a keyswitch key.
pub fn lwe_keyswitch_key_size(
    decomposition_level_count: DecompositionLevelCount,
    input_lwe_dimension: LweDimension,
    output_lwe_dimension: LweDimension,
) -> usize {
    input_lwe_dimension.0 * decomposition_level_count.0 * output_lwe_dimension.to_lwe_size().0
}

impl<C: Container<Element = u64>> AsRef<[u64]> for LweKeyswitchKey<C> {
    fn as_ref(&self) -> &[u64] {
        self.data.as_slice()
    }
}

impl<C: ContainerMut<Element = u64>> AsMut<[u64]> for LweKeyswitchKey<C> {
    fn as_mut(&mut self) -> &mut [u64] {
        self.data.as_mut_slice()
    }
}

impl<C: Container<Element = u64>> LweKeyswitchKey<C> {
    pub fn from_container(
        container: C,
        decomposition_base_log: DecompositionBaseLog,
        decomposition_level_count: DecompositionLevelCount,
        output_lwe_size: LweSize,
    ) -> Self {
        assert_eq!(
            container.container_len() % (decomposition_level_count.0 * output_lwe_size.0),
            0,
            "The provided container length is not valid. \
            It needs to be dividable by decomposition_level_count * output_lwe_size: {}. \
            Got container length: {}.",
            decomposition_level_count.0 * output_lwe_size.0,
            container.container_len()
        );
        Self {
            data: container,
            decomposition_base_log,
            decomposition_level_count,
            output_lwe_size,
        }
    }

    pub fn decomposition_base_log(&self) -> DecompositionBaseLog {
        self.decomposition_base_log
    }

    pub fn decomposition_level_count(&self) -> DecompositionLevelCount {
        self.decomposition_level_count
    }

    pub fn input_key_lwe_dimension(&self) -> LweDimension {
        LweDimension(self.data.container_len() / self.block_size())
    }

    pub fn output_key_lwe_dimension(&self) -> LweDimension {
        self.output_lwe_size.to_lwe_dimension()
    }

    pub fn output_lwe_size(&self) -> LweSize {
        self.output_lwe_size
    }

    fn block_size(&self) -> usize {
        self.decomposition_level_count.0 * self.output_lwe_size.0
    }

    /// Iterates over the blocks of the key, each block holding the ciphertexts of one input key
    /// coefficient, level 1 first.
    pub fn iter(
        &self,
    ) -> impl DoubleEndedIterator<Item = LweCiphertextListView<'_>> + ExactSizeIterator {
        let output_lwe_size = self.output_lwe_size;
        self.as_ref()
            .into_chunks(self.block_size())
            .map(move |block| LweCiphertextList::from_container(block, output_lwe_size))
    }

    pub fn as_view(&self) -> LweKeyswitchKeyView<'_> {
        LweKeyswitchKey {
            data: self.data.as_slice(),
            decomposition_base_log: self.decomposition_base_log,
            decomposition_level_count: self.decomposition_level_count,
            output_lwe_size: self.output_lwe_size,
        }
    }

    pub fn into_container(self) -> C {
        self.data
    }
}

impl<C: ContainerMut<Element = u64>> LweKeyswitchKey<C> {
    pub fn iter_mut(
        &mut self,
    ) -> impl DoubleEndedIterator<Item = LweCiphertextListMutView<'_>> + ExactSizeIterator {
        let output_lwe_size = self.output_lwe_size;
        let block_size = self.block_size();
        self.as_mut()
            .into_chunks(block_size)
            .map(move |block| LweCiphertextList::from_container(block, output_lwe_size))
    }

    pub fn par_iter_mut(
        &mut self,
    ) -> impl IndexedParallelIterator<Item = LweCiphertextListMutView<'_>> {
        let output_lwe_size = self.output_lwe_size;
        let block_size = self.block_size();
        self.as_mut()
            .par_chunks_exact_mut(block_size)
            .map(move |block| LweCiphertextList::from_container(block, output_lwe_size))
    }

    pub fn as_mut_view(&mut self) -> LweKeyswitchKeyMutView<'_> {
        let decomposition_base_log = self.decomposition_base_log;
        let decomposition_level_count = self.decomposition_level_count;
        let output_lwe_size = self.output_lwe_size;
        LweKeyswitchKey {
            data: self.data.as_mut_slice(),
            decomposition_base_log,
            decomposition_level_count,
            output_lwe_size,
        }
    }
}

pub type LweKeyswitchKeyOwned = LweKeyswitchKey<Vec<u64>>;
pub type LweKeyswitchKeyView<'data> = LweKeyswitchKey<&'data [u64]>;
pub type LweKeyswitchKeyMutView<'data> = LweKeyswitchKey<&'data mut [u64]>;

impl LweKeyswitchKeyOwned {
    pub fn new(
        fill_with: u64,
        decomposition_base_log: DecompositionBaseLog,
        decomposition_level_count: DecompositionLevelCount,
        input_lwe_dimension: LweDimension,
        output_lwe_dimension: LweDimension,
    ) -> Self {
        Self::from_container(
            vec![
                fill_with;
                lwe_keyswitch_key_size(
                    decomposition_level_count,
                    input_lwe_dimension,
                    output_lwe_dimension
                )
            ],
            decomposition_base_log,
            decomposition_level_count,
            output_lwe_dimension.to_lwe_size(),
        )
    }
}

/// Number of ciphertexts of a keyswitch key.
pub fn lwe_keyswitch_key_ciphertext_count(
    decomposition_level_count: DecompositionLevelCount,
    input_lwe_dimension: LweDimension,
) -> LweCiphertextCount {
    LweCiphertextCount(decomposition_level_count.0 * input_lwe_dimension.0)
}
