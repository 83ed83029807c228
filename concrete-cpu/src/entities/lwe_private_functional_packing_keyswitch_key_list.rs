use crate::commons::parameters::{
    DecompositionBaseLog, DecompositionLevelCount, FunctionalPackingKeyswitchKeyCount, GlweSize,
    LweDimension, PolynomialSize,
};
use crate::commons::traits::{Container, ContainerMut, Split};
use crate::entities::lwe_private_functional_packing_keyswitch_key::{
    lwe_pfpksk_size, LwePrivateFunctionalPackingKeyswitchKey,
    LwePrivateFunctionalPackingKeyswitchKeyMutView, LwePrivateFunctionalPackingKeyswitchKeyView,
};
use rayon::prelude::*;

/// The private functional packing keyswitch keys used by a circuit bootstrap, one per row of the
/// produced GGSW level matrices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LwePrivateFunctionalPackingKeyswitchKeyList<C: Container<Element = u64>> {
    data: C,
    decomposition_base_log: DecompositionBaseLog,
    decomposition_level_count: DecompositionLevelCount,
    input_lwe_dimension: LweDimension,
    output_glwe_size: GlweSize,
    output_polynomial_size: PolynomialSize,
}

impl<C: Container<Element = u64>> AsRef<[u64]> for LwePrivateFunctionalPackingKeyswitchKeyList<C> {
    fn as_ref(&self) -> &[u64] {
        self.data.as_slice()
    }
}

impl<C: ContainerMut<Element = u64>> AsMut<[u64]>
    for LwePrivateFunctionalPackingKeyswitchKeyList<C>
{
    fn as_mut(&mut self) -> &mut [u64] {
        self.data.as_mut_slice()
    }
}

impl<C: Container<Element = u64>> LwePrivateFunctionalPackingKeyswitchKeyList<C> {
    pub fn from_container(
        container: C,
        decomposition_base_log: DecompositionBaseLog,
        decomposition_level_count: DecompositionLevelCount,
        input_lwe_dimension: LweDimension,
        output_glwe_size: GlweSize,
        output_polynomial_size: PolynomialSize,
    ) -> Self {
        let key_size = lwe_pfpksk_size(
            input_lwe_dimension,
            decomposition_level_count,
            output_glwe_size,
            output_polynomial_size,
        );
        assert_eq!(
            container.container_len() % key_size,
            0,
            "The provided container length is not valid. \
            It needs to be dividable by the size of a single key: {key_size}. \
            Got container length: {}.",
            container.container_len()
        );
        Self {
            data: container,
            decomposition_base_log,
            decomposition_level_count,
            input_lwe_dimension,
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

    pub fn input_lwe_dimension(&self) -> LweDimension {
        self.input_lwe_dimension
    }

    pub fn output_glwe_size(&self) -> GlweSize {
        self.output_glwe_size
    }

    pub fn output_polynomial_size(&self) -> PolynomialSize {
        self.output_polynomial_size
    }

    pub fn lwe_pfpksk_count(&self) -> FunctionalPackingKeyswitchKeyCount {
        FunctionalPackingKeyswitchKeyCount(self.data.container_len() / self.key_size())
    }

    fn key_size(&self) -> usize {
        lwe_pfpksk_size(
            self.input_lwe_dimension,
            self.decomposition_level_count,
            self.output_glwe_size,
            self.output_polynomial_size,
        )
    }

    pub fn iter(
        &self,
    ) -> impl DoubleEndedIterator<Item = LwePrivateFunctionalPackingKeyswitchKeyView<'_>>
           + ExactSizeIterator {
        let base_log = self.decomposition_base_log;
        let level_count = self.decomposition_level_count;
        let glwe_size = self.output_glwe_size;
        let polynomial_size = self.output_polynomial_size;
        self.as_ref().into_chunks(self.key_size()).map(move |key| {
            LwePrivateFunctionalPackingKeyswitchKey::from_container(
                key,
                base_log,
                level_count,
                glwe_size,
                polynomial_size,
            )
        })
    }

    pub fn as_view(&self) -> LwePrivateFunctionalPackingKeyswitchKeyListView<'_> {
        LwePrivateFunctionalPackingKeyswitchKeyList {
            data: self.data.as_slice(),
            decomposition_base_log: self.decomposition_base_log,
            decomposition_level_count: self.decomposition_level_count,
            input_lwe_dimension: self.input_lwe_dimension,
            output_glwe_size: self.output_glwe_size,
            output_polynomial_size: self.output_polynomial_size,
        }
    }

    pub fn into_container(self) -> C {
        self.data
    }
}

impl<C: ContainerMut<Element = u64>> LwePrivateFunctionalPackingKeyswitchKeyList<C> {
    pub fn iter_mut(
        &mut self,
    ) -> impl DoubleEndedIterator<Item = LwePrivateFunctionalPackingKeyswitchKeyMutView<'_>>
           + ExactSizeIterator {
        let base_log = self.decomposition_base_log;
        let level_count = self.decomposition_level_count;
        let glwe_size = self.output_glwe_size;
        let polynomial_size = self.output_polynomial_size;
        let key_size = self.key_size();
        self.as_mut().into_chunks(key_size).map(move |key| {
            LwePrivateFunctionalPackingKeyswitchKey::from_container(
                key,
                base_log,
                level_count,
                glwe_size,
                polynomial_size,
            )
        })
    }

    pub fn par_iter_mut(
        &mut self,
    ) -> impl IndexedParallelIterator<Item = LwePrivateFunctionalPackingKeyswitchKeyMutView<'_>>
    {
        let base_log = self.decomposition_base_log;
        let level_count = self.decomposition_level_count;
        let glwe_size = self.output_glwe_size;
        let polynomial_size = self.output_polynomial_size;
        let key_size = self.key_size();
        self.as_mut().par_chunks_exact_mut(key_size).map(move |key| {
            LwePrivateFunctionalPackingKeyswitchKey::from_container(
                key,
                base_log,
                level_count,
                glwe_size,
                polynomial_size,
            )
        })
    }
}

pub type LwePrivateFunctionalPackingKeyswitchKeyListOwned =
    LwePrivateFunctionalPackingKeyswitchKeyList<Vec<u64>>;
pub type LwePrivateFunctionalPackingKeyswitchKeyListView<'data> =
    LwePrivateFunctionalPackingKeyswitchKeyList<&'data [u64]>;
pub type LwePrivateFunctionalPackingKeyswitchKeyListMutView<'data> =
    LwePrivateFunctionalPackingKeyswitchKeyList<&'data mut [u64]>;

impl LwePrivateFunctionalPackingKeyswitchKeyListOwned {
    pub fn new(
        fill_with: u64,
        decomposition_base_log: DecompositionBaseLog,
        decomposition_level_count: DecompositionLevelCount,
        input_lwe_dimension: LweDimension,
        output_glwe_size: GlweSize,
        output_polynomial_size: PolynomialSize,
        pfpksk_count: FunctionalPackingKeyswitchKeyCount,
    ) -> Self {
        Self::from_container(
            vec![
                fill_with;
                pfpksk_count.0
                    * lwe_pfpksk_size(
                        input_lwe_dimension,
                        decomposition_level_count,
                        output_glwe_size,
                        output_polynomial_size
                    )
            ],
            decomposition_base_log,
            decomposition_level_count,
            input_lwe_dimension,
            output_glwe_size,
            output_polynomial_size,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_layout() {
        let list = LwePrivateFunctionalPackingKeyswitchKeyListOwned::new(
            0,
            DecompositionBaseLog(4),
            DecompositionLevelCount(2),
            LweDimension(3),
            GlweSize(2),
            PolynomialSize(8),
            FunctionalPackingKeyswitchKeyCount(2),
        );
        // (n + 1) * l * (k + 1) * N per key
        assert_eq!(list.as_ref().len(), 2 * 4 * 2 * 2 * 8);
        assert_eq!(list.lwe_pfpksk_count().0, 2);
        let key = list.iter().next_back().map(|k| k.input_lwe_dimension());
        assert_eq!(key, Some(LweDimension(3)));
        assert_eq!(
            list.iter().map(|k| k.iter().count()).collect::<Vec<_>>(),
            vec![4, 4]
        );
    }
}
