use crate::commons::parameters::{LweCiphertextCount, LweSize};
use crate::commons::traits::{Container, ContainerMut, Split};
use crate::entities::lwe_ciphertext::{LweCiphertext, LweCiphertextMutView, LweCiphertextView};
use rayon::prelude::*;

/// LWE ciphertexts of the same size laid out one after the other.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LweCiphertextList<C: Container<Element = u64>> {
    data: C,
    lwe_size: LweSize,
}

impl<C: Container<Element = u64>> AsRef<[u64]> for LweCiphertextList<C> {
    fn as_ref(&self) -> &[u64] {
        self.data.as_slice()
    }
}

impl<C: ContainerMut<Element = u64>> AsMut<[u64]> for LweCiphertextList<C> {
    fn as_mut(&mut self) -> &mut [u64] {
        self.data.as_mut_slice()
    }
}

impl<C: Container<Element = u64>> LweCiphertextList<C> {
    pub fn from_container(container: C, lwe_size: LweSize) -> Self {
        assert_eq!(
            container.container_len() % lwe_size.0,
            0,
            "The provided container length is not valid. \
            It needs to be dividable by lwe_size. \
            Got container length: {} and lwe_size: {lwe_size:?}.",
            container.container_len()
        );
        Self {
            data: container,
            lwe_size,
        }
    }

    pub fn lwe_size(&self) -> LweSize {
        self.lwe_size
    }

    pub fn lwe_ciphertext_count(&self) -> LweCiphertextCount {
        LweCiphertextCount(self.data.container_len() / self.lwe_size.0)
    }

    pub fn get(&self, index: usize) -> LweCiphertextView<'_> {
        let size = self.lwe_size.0;
        LweCiphertext::from_container(&self.as_ref()[index * size..(index + 1) * size])
    }

    pub fn iter(
        &self,
    ) -> impl DoubleEndedIterator<Item = LweCiphertextView<'_>> + ExactSizeIterator {
        self.as_ref()
            .into_chunks(self.lwe_size.0)
            .map(LweCiphertext::from_container)
    }

    pub fn as_view(&self) -> LweCiphertextListView<'_> {
        LweCiphertextList {
            data: self.data.as_slice(),
            lwe_size: self.lwe_size,
        }
    }

    pub fn into_container(self) -> C {
        self.data
    }
}

impl<C: ContainerMut<Element = u64>> LweCiphertextList<C> {
    pub fn get_mut(&mut self, index: usize) -> LweCiphertextMutView<'_> {
        let size = self.lwe_size.0;
        LweCiphertext::from_container(&mut self.as_mut()[index * size..(index + 1) * size])
    }

    pub fn iter_mut(
        &mut self,
    ) -> impl DoubleEndedIterator<Item = LweCiphertextMutView<'_>> + ExactSizeIterator {
        let size = self.lwe_size.0;
        self.as_mut().into_chunks(size).map(LweCiphertext::from_container)
    }

    pub fn par_iter_mut(
        &mut self,
    ) -> impl IndexedParallelIterator<Item = LweCiphertextMutView<'_>> {
        let size = self.lwe_size.0;
        self.as_mut()
            .par_chunks_exact_mut(size)
            .map(LweCiphertext::from_container)
    }

    pub fn as_mut_view(&mut self) -> LweCiphertextListMutView<'_> {
        let lwe_size = self.lwe_size;
        LweCiphertextList {
            data: self.data.as_mut_slice(),
            lwe_size,
        }
    }
}

impl<'data> LweCiphertextListView<'data> {
    pub fn into_ciphertexts(
        self,
    ) -> impl DoubleEndedIterator<Item = LweCiphertextView<'data>> + ExactSizeIterator {
        self.data
            .into_chunks(self.lwe_size.0)
            .map(LweCiphertext::from_container)
    }
}

impl<'data> LweCiphertextListMutView<'data> {
    pub fn into_ciphertexts(
        self,
    ) -> impl DoubleEndedIterator<Item = LweCiphertextMutView<'data>> + ExactSizeIterator {
        let size = self.lwe_size.0;
        self.data.into_chunks(size).map(LweCiphertext::from_container)
    }
}

pub type LweCiphertextListOwned = LweCiphertextList<Vec<u64>>;
pub type LweCiphertextListView<'data> = LweCiphertextList<&'data [u64]>;
pub type LweCiphertextListMutView<'data> = LweCiphertextList<&'data mut [u64]>;

impl LweCiphertextListOwned {
    pub fn new(fill_with: u64, lwe_size: LweSize, count: LweCiphertextCount) -> Self {
        Self::from_container(vec![fill_with; lwe_size.0 * count.0], lwe_size)
    }
}
