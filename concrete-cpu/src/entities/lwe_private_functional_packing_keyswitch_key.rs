use crate::commons::parameters::{
    DecompositionBaseLog, DecompositionLevelCount, GlweSize, LweDimension, LweSize,
    PolynomialSize,
};
use crate::commons::traits::{Container, ContainerMut, Split};
use crate::entities::glwe_ciphertext_list::{
    GlweCiphertextList, GlweCiphertextListMutView, GlweCiphertextListView,
};
use rayon::prelude::*;

/// A private functional packing keyswitch key.
///
/// It switches an LWE ciphertext of phase `m` into a GLWE ciphertext of phase `f(m) * P`, for a
/// linear `f` and a polynomial `P` fixed at generation. For every coefficient of the extended
/// input key `(s_0, ..., s_{n-1}, -1)`, a block of `level_count` GLWE ciphertexts encrypts
/// `f(s_i) * P * 2^(64 - j * base_log)`, level 1 first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LwePrivateFunctionalPackingKeyswitchKey<C: Container<Element = u64>> {
    data: C,
    decomposition_base_log: DecompositionBaseLog,
    decomposition_level_count: DecompositionLevelCount,
    output_glwe_size: GlweSize,
    output_polynomial_size: PolynomialSize,
}

/// Returns the number of `u64` of a private functional packing keyswitch key.
pub fn lwe_pfpksk_size(
    input_lwe_dimension: LweDimension,
    decomposition_level_count: DecompositionLevelCount,
    output_glwe_size: GlweSize,
    output_polynomial_size: PolynomialSize,
) -> usize {
    input_lwe_dimension.to_lwe_size().0
        * lwe_pfpksk_block_size(
            decomposition_level_count,
            output_glwe_size,
            output_polynomial_size,
        )
}

fn lwe_pfpksk_block_size(
    decomposition_level_count: DecompositionLevelCount,
    output_glwe_size: GlweSize,
    output_polynomial_size: PolynomialSize,
) -> usize {
    decomposition_level_count.0 * output_glwe_size.0 * output_polynomial_size.0
}

impl<C: Container<Element = u64>> AsRef<[u64]> for LwePrivateFunctionalPackingKeyswitchKey<C> {
    fn as_ref(&self) -> &[u64] {
        self.data.as_slice()
    }
}

impl<C: ContainerMut<Element = u64>> AsMut<[u64]> for LwePrivateFunctionalPackingKeyswitchKey<C> {
    fn as_mut(&mut self) -> &mut [u64] {
        self.data.as_mut_slice()
    }
}

impl<C: Container<Element = u64>> LwePrivateFunctionalPackingKeyswitchKey<C> {
    pub fn from_container(
        container: C,
        decomposition_base_log: DecompositionBaseLog,
        decomposition_level_count: DecompositionLevelCount,
        output_glwe_size: GlweSize,
        output_polynomial_size: PolynomialSize,
    ) -> Self {
        let block_size = lwe_pfpksk_block_size(
            decomposition_level_count,
            output_glwe_size,
            output_polynomial_size,
        );
        assert!(
            container.container_len() > 0,
            "Got an empty container to create an LwePrivateFunctionalPackingKeyswitchKey"
        );
        assert_eq!(
            container.container_len() % block_size,
            0,
            "The provided container length is not valid. \
            It needs to be dividable by level_count * glwe_size * polynomial_size: {block_size}. \
            Got container length: {}.",
            container.container_len()
        );
        Self {
            data: container,
            decomposition_base_log,
            decomposition_level_count,
            output_glwe_size,
            output_polynomial_size,
        }
    }

    pub fn decomposition_base_log(&self) -> DecompositionBaseLog {
        self.decomposition_base_log
    }

    pub fn decomposition_level_count(&self) -> DecompositionLevelCount {
        self.decomposition_level_count
    }

    pub fn output_glwe_size(&self) -> GlweSize {
        self.output_glwe_size
    }

    pub fn output_polynomial_size(&self) -> PolynomialSize {
        self.output_polynomial_size
    }

    pub fn input_lwe_size(&self) -> LweSize {
        LweSize(self.data.container_len() / self.block_size())
    }

    pub fn input_lwe_dimension(&self) -> LweDimension {
        self.input_lwe_size().to_lwe_dimension()
    }

    fn block_size(&self) -> usize {
        lwe_pfpksk_block_size(
            self.decomposition_level_count,
            self.output_glwe_size,
            self.output_polynomial_size,
        )
    }

    pub fn iter(
        &self,
    ) -> impl DoubleEndedIterator<Item = GlweCiphertextListView<'_>> + ExactSizeIterator {
        self.as_view().into_blocks()
    }

    pub fn as_view(&self) -> LwePrivateFunctionalPackingKeyswitchKeyView<'_> {
        LwePrivateFunctionalPackingKeyswitchKey {
            data: self.data.as_slice(),
            decomposition_base_log: self.decomposition_base_log,
            decomposition_level_count: self.decomposition_level_count,
            output_glwe_size: self.output_glwe_size,
            output_polynomial_size: self.output_polynomial_size,
        }
    }

    pub fn into_container(self) -> C {
        self.data
    }
}

impl<C: ContainerMut<Element = u64>> LwePrivateFunctionalPackingKeyswitchKey<C> {
    pub fn iter_mut(
        &mut self,
    ) -> impl DoubleEndedIterator<Item = GlweCiphertextListMutView<'_>> + ExactSizeIterator {
        let glwe_size = self.output_glwe_size;
        let polynomial_size = self.output_polynomial_size;
        let block_size = self.block_size();
        self.as_mut().into_chunks(block_size).map(move |block| {
            GlweCiphertextList::from_container(block, glwe_size, polynomial_size)
        })
    }

    pub fn par_iter_mut(
        &mut self,
    ) -> impl IndexedParallelIterator<Item = GlweCiphertextListMutView<'_>> {
        let glwe_size = self.output_glwe_size;
        let polynomial_size = self.output_polynomial_size;
        let block_size = self.block_size();
        self.as_mut()
            .par_chunks_exact_mut(block_size)
            .map(move |block| {
                GlweCiphertextList::from_container(block, glwe_size, polynomial_size)
            })
    }
}

impl<'data> LwePrivateFunctionalPackingKeyswitchKeyView<'data> {
    pub fn into_blocks(
        self,
    ) -> impl DoubleEndedIterator<Item = GlweCiphertextListView<'data>> + ExactSizeIterator {
        let glwe_size = self.output_glwe_size;
        let polynomial_size = self.output_polynomial_size;
        let block_size = self.block_size();
        self.data.into_chunks(block_size).map(move |block| {
            GlweCiphertextList::from_container(block, glwe_size, polynomial_size)
        })
    }
}

pub type LwePrivateFunctionalPackingKeyswitchKeyView<'data> =
    LwePrivateFunctionalPackingKeyswitchKey<&'data [u64]>;
pub type LwePrivateFunctionalPackingKeyswitchKeyMutView<'data> =
    LwePrivateFunctionalPackingKeyswitchKey<&'data mut [u64]>;

pub type LwePrivateFunctionalPackingKeyswitchKeyOwned =
    LwePrivateFunctionalPackingKeyswitchKey<Vec<u64>>;

impl LwePrivateFunctionalPackingKeyswitchKeyOwned {
    pub fn new(
        fill_with: u64,
        decomposition_base_log: DecompositionBaseLog,
        decomposition_level_count: DecompositionLevelCount,
        input_lwe_dimension: LweDimension,
        output_glwe_size: GlweSize,
        output_polynomial_size: PolynomialSize,
    ) -> Self {
        Self::from_container(
            vec![
                fill_with;
                lwe_pfpksk_size(
                    input_lwe_dimension,
                    decomposition_level_count,
                    output_glwe_size,
                    output_polynomial_size
                )
            ],
            decomposition_base_log,
            decomposition_level_count,
            output_glwe_size,
            output_polynomial_size,
        )
    }
}
