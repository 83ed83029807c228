use crate::commons::parameters::{GlweCiphertextCount, GlweSize, PolynomialSize};
use crate::commons::traits::{Container, ContainerMut, Split};
use crate::entities::glwe_ciphertext::{
    GlweCiphertext, GlweCiphertextMutView, GlweCiphertextView,
};

/// GLWE ciphertexts of the same size laid out one after the other.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlweCiphertextList<C: Container<Element = u64>> {
    data: C,
    glwe_size: GlweSize,
    polynomial_size: PolynomialSize,
}

impl<C: Container<Element = u64>> AsRef<[u64]> for GlweCiphertextList<C> {
    fn as_ref(&self) -> &[u64] {
        self.data.as_slice()
    }
}

impl<C: ContainerMut<Element = u64>> AsMut<[u64]> for GlweCiphertextList<C> {
    fn as_mut(&mut self) -> &mut [u64] {
        self.data.as_mut_slice()
    }
}

impl<C: Container<Element = u64>> GlweCiphertextList<C> {
    pub fn from_container(
        container: C,
        glwe_size: GlweSize,
        polynomial_size: PolynomialSize,
    ) -> Self {
        assert_eq!(
            container.container_len() % (glwe_size.0 * polynomial_size.0),
            0,
            "The provided container length is not valid. \
            It needs to be dividable by glwe_size * polynomial_size: {}. \
            Got container length: {}.",
            glwe_size.0 * polynomial_size.0,
            container.container_len()
        );
        Self {
            data: container,
            glwe_size,
            polynomial_size,
        }
    }

    pub fn glwe_size(&self) -> GlweSize {
        self.glwe_size
    }

    pub fn polynomial_size(&self) -> PolynomialSize {
        self.polynomial_size
    }

    pub fn glwe_ciphertext_count(&self) -> GlweCiphertextCount {
        GlweCiphertextCount(
            self.data.container_len() / (self.glwe_size.0 * self.polynomial_size.0),
        )
    }

    pub fn iter(
        &self,
    ) -> impl DoubleEndedIterator<Item = GlweCiphertextView<'_>> + ExactSizeIterator {
        let polynomial_size = self.polynomial_size;
        self.as_ref()
            .into_chunks(self.glwe_size.0 * polynomial_size.0)
            .map(move |glwe| GlweCiphertext::from_container(glwe, polynomial_size))
    }

    pub fn as_view(&self) -> GlweCiphertextListView<'_> {
        GlweCiphertextList {
            data: self.data.as_slice(),
            glwe_size: self.glwe_size,
            polynomial_size: self.polynomial_size,
        }
    }

    pub fn into_container(self) -> C {
        self.data
    }
}

impl<C: ContainerMut<Element = u64>> GlweCiphertextList<C> {
    pub fn iter_mut(
        &mut self,
    ) -> impl DoubleEndedIterator<Item = GlweCiphertextMutView<'_>> + ExactSizeIterator {
        let polynomial_size = self.polynomial_size;
        let glwe_len = self.glwe_size.0 * polynomial_size.0;
        self.as_mut()
            .into_chunks(glwe_len)
            .map(move |glwe| GlweCiphertext::from_container(glwe, polynomial_size))
    }

    pub fn as_mut_view(&mut self) -> GlweCiphertextListMutView<'_> {
        let glwe_size = self.glwe_size;
        let polynomial_size = self.polynomial_size;
        GlweCiphertextList {
            data: self.data.as_mut_slice(),
            glwe_size,
            polynomial_size,
        }
    }
}

impl<'data> GlweCiphertextListView<'data> {
    pub fn into_ciphertexts(
        self,
    ) -> impl DoubleEndedIterator<Item = GlweCiphertextView<'data>> + ExactSizeIterator {
        let polynomial_size = self.polynomial_size;
        self.data
            .into_chunks(self.glwe_size.0 * polynomial_size.0)
            .map(move |glwe| GlweCiphertext::from_container(glwe, polynomial_size))
    }
}

impl<'data> GlweCiphertextListMutView<'data> {
    pub fn into_ciphertexts(
        self,
    ) -> impl DoubleEndedIterator<Item = GlweCiphertextMutView<'data>> + ExactSizeIterator {
        let polynomial_size = self.polynomial_size;
        let glwe_len = self.glwe_size.0 * polynomial_size.0;
        self.data
            .into_chunks(glwe_len)
            .map(move |glwe| GlweCiphertext::from_container(glwe, polynomial_size))
    }
}

pub type GlweCiphertextListOwned = GlweCiphertextList<Vec<u64>>;
pub type GlweCiphertextListView<'data> = GlweCiphertextList<&'data [u64]>;
pub type GlweCiphertextListMutView<'data> = GlweCiphertextList<&'data mut [u64]>;

impl GlweCiphertextListOwned {
    pub fn new(
        fill_with: u64,
        glwe_size: GlweSize,
        polynomial_size: PolynomialSize,
        count: GlweCiphertextCount,
    ) -> Self {
        Self::from_container(
            vec![fill_with; glwe_size.0 * polynomial_size.0 * count.0],
            glwe_size,
            polynomial_size,
        )
    }
}
