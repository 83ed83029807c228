use crate::commons::math::decomposition::DecompositionLevel;
use crate::commons::parameters::{
    DecompositionBaseLog, DecompositionLevelCount, GlweSize, PolynomialSize,
};
use crate::commons::traits::{Container, ContainerMut, Split};
use crate::entities::glwe_ciphertext_list::{
    GlweCiphertextList, GlweCiphertextListMutView, GlweCiphertextListView,
};
use rayon::prelude::*;

/// A GGSW ciphertext.
///
/// It is made of `level_count` level matrices, each one holding `k + 1` GLWE ciphertexts. The
/// matrices are stored from the last decomposition level (the least significant one) down to the
/// first one, in the order the decomposition iterators yield the digits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GgswCiphertext<C: Container<Element = u64>> {
    data: C,
    glwe_size: GlweSize,
    polynomial_size: PolynomialSize,
    decomposition_base_log: DecompositionBaseLog,
}

/// The `k + 1` GLWE ciphertexts of a GGSW ciphertext associated to one decomposition level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GgswLevelMatrix<C: Container<Element = u64>> {
    data: C,
    glwe_size: GlweSize,
    polynomial_size: PolynomialSize,
    decomposition_level: DecompositionLevel,
}

/// Returns the number of `u64` of a level matrix.
pub fn ggsw_level_matrix_size(glwe_size: GlweSize, polynomial_size: PolynomialSize) -> usize {
    glwe_size.0 * glwe_size.0 * polynomial_size.0
}

/// Returns the number of `u64` of a GGSW ciphertext.
pub fn ggsw_ciphertext_size(
    glwe_size: GlweSize,
    polynomial_size: PolynomialSize,
    decomposition_level_count: DecompositionLevelCount,
) -> usize {
    decomposition_level_count.0 * ggsw_level_matrix_size(glwe_size, polynomial_size)
}

impl<C: Container<Element = u64>> AsRef<[u64]> for GgswCiphertext<C> {
    fn as_ref(&self) -> &[u64] {
        self.data.as_slice()
    }
}

impl<C: ContainerMut<Element = u64>> AsMut<[u64]> for GgswCiphertext<C> {
    fn as_mut(&mut self) -> &mut [u64] {
        self.data.as_mut_slice()
    }
}

impl<C: Container<Element = u64>> GgswCiphertext<C> {
    pub fn from_container(
        container: C,
        glwe_size: GlweSize,
        polynomial_size: PolynomialSize,
        decomposition_base_log: DecompositionBaseLog,
    ) -> Self {
        assert!(
            container.container_len() > 0,
            "Got an empty container to create a GgswCiphertext"
        );
        assert_eq!(
            container.container_len() % ggsw_level_matrix_size(glwe_size, polynomial_size),
            0,
            "The provided container length is not valid. \
            It needs to be dividable by glwe_size * glwe_size * polynomial_size: {}. \
            Got container length: {}.",
            ggsw_level_matrix_size(glwe_size, polynomial_size),
            container.container_len()
        );
        Self {
            data: container,
            glwe_size,
            polynomial_size,
            decomposition_base_log,
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
        DecompositionLevelCount(
            self.data.container_len() / ggsw_level_matrix_size(self.glwe_size, self.polynomial_size),
        )
    }

    pub fn as_view(&self) -> GgswCiphertextView<'_> {
        GgswCiphertext {
            data: self.data.as_slice(),
            glwe_size: self.glwe_size,
            polynomial_size: self.polynomial_size,
            decomposition_base_log: self.decomposition_base_log,
        }
    }

    /// Iterates over the level matrices, from the last decomposition level to the first.
    pub fn iter(
        &self,
    ) -> impl DoubleEndedIterator<Item = GgswLevelMatrixView<'_>> + ExactSizeIterator {
        self.as_view().into_levels()
    }

    pub fn into_container(self) -> C {
        self.data
    }
}

impl<C: ContainerMut<Element = u64>> GgswCiphertext<C> {
    pub fn as_mut_view(&mut self) -> GgswCiphertextMutView<'_> {
        let glwe_size = self.glwe_size;
        let polynomial_size = self.polynomial_size;
        let decomposition_base_log = self.decomposition_base_log;
        GgswCiphertext {
            data: self.data.as_mut_slice(),
            glwe_size,
            polynomial_size,
            decomposition_base_log,
        }
    }

    pub fn iter_mut(
        &mut self,
    ) -> impl DoubleEndedIterator<Item = GgswLevelMatrixMutView<'_>> + ExactSizeIterator {
        self.as_mut_view().into_levels()
    }

    pub fn par_iter_mut(
        &mut self,
    ) -> impl IndexedParallelIterator<Item = GgswLevelMatrixMutView<'_>> {
        let glwe_size = self.glwe_size;
        let polynomial_size = self.polynomial_size;
        let level_count = self.decomposition_level_count().0;
        self.as_mut()
            .par_chunks_exact_mut(ggsw_level_matrix_size(glwe_size, polynomial_size))
            .enumerate()
            .map(move |(i, m)| {
                GgswLevelMatrix::from_container(
                    m,
                    glwe_size,
                    polynomial_size,
                    DecompositionLevel(level_count - i),
                )
            })
    }
}

impl<'data> GgswCiphertextView<'data> {
    pub fn into_levels(
        self,
    ) -> impl DoubleEndedIterator<Item = GgswLevelMatrixView<'data>> + ExactSizeIterator {
        let glwe_size = self.glwe_size;
        let polynomial_size = self.polynomial_size;
        let level_count = self.decomposition_level_count().0;
        self.data
            .into_chunks(ggsw_level_matrix_size(glwe_size, polynomial_size))
            .enumerate()
            .map(move |(i, m)| {
                GgswLevelMatrix::from_container(
                    m,
                    glwe_size,
                    polynomial_size,
                    DecompositionLevel(level_count - i),
                )
            })
    }
}

impl<'data> GgswCiphertextMutView<'data> {
    pub fn into_levels(
        self,
    ) -> impl DoubleEndedIterator<Item = GgswLevelMatrixMutView<'data>> + ExactSizeIterator {
        let glwe_size = self.glwe_size;
        let polynomial_size = self.polynomial_size;
        let level_count = self.decomposition_level_count().0;
        self.data
            .into_chunks(ggsw_level_matrix_size(glwe_size, polynomial_size))
            .enumerate()
            .map(move |(i, m)| {
                GgswLevelMatrix::from_container(
                    m,
                    glwe_size,
                    polynomial_size,
                    DecompositionLevel(level_count - i),
                )
            })
    }
}

pub type GgswCiphertextOwned = GgswCiphertext<Vec<u64>>;
pub type GgswCiphertextView<'data> = GgswCiphertext<&'data [u64]>;
pub type GgswCiphertextMutView<'data> = GgswCiphertext<&'data mut [u64]>;

impl GgswCiphertextOwned {
    pub fn new(
        fill_with: u64,
        glwe_size: GlweSize,
        polynomial_size: PolynomialSize,
        decomposition_base_log: DecompositionBaseLog,
        decomposition_level_count: DecompositionLevelCount,
    ) -> Self {
        Self::from_container(
            vec![
                fill_with;
                ggsw_ciphertext_size(glwe_size, polynomial_size, decomposition_level_count)
            ],
            glwe_size,
            polynomial_size,
            decomposition_base_log,
        )
    }
}

impl<C: Container<Element = u64>> GgswLevelMatrix<C> {
    pub fn from_container(
        container: C,
        glwe_size: GlweSize,
        polynomial_size: PolynomialSize,
        decomposition_level: DecompositionLevel,
    ) -> Self {
        assert_eq!(
            container.container_len(),
            ggsw_level_matrix_size(glwe_size, polynomial_size),
            "The provided container length is not valid. \
            Expected length of {} (glwe_size * glwe_size * polynomial_size), got {}",
            ggsw_level_matrix_size(glwe_size, polynomial_size),
            container.container_len()
        );
        Self {
            data: container,
            glwe_size,
            polynomial_size,
            decomposition_level,
        }
    }

    pub fn glwe_size(&self) -> GlweSize {
        self.glwe_size
    }

    pub fn polynomial_size(&self) -> PolynomialSize {
        self.polynomial_size
    }

    pub fn decomposition_level(&self) -> DecompositionLevel {
        self.decomposition_level
    }

    /// Interprets the matrix as its `k + 1` rows.
    pub fn as_glwe_list(&self) -> GlweCiphertextListView<'_> {
        GlweCiphertextList::from_container(
            self.data.as_slice(),
            self.glwe_size,
            self.polynomial_size,
        )
    }

    pub fn into_container(self) -> C {
        self.data
    }
}

impl<C: ContainerMut<Element = u64>> GgswLevelMatrix<C> {
    pub fn as_mut_glwe_list(&mut self) -> GlweCiphertextListMutView<'_> {
        let glwe_size = self.glwe_size;
        let polynomial_size = self.polynomial_size;
        GlweCiphertextList::from_container(self.data.as_mut_slice(), glwe_size, polynomial_size)
    }
}

pub type GgswLevelMatrixView<'data> = GgswLevelMatrix<&'data [u64]>;
pub type GgswLevelMatrixMutView<'data> = GgswLevelMatrix<&'data mut [u64]>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_stored_last_first() {
        let ggsw = GgswCiphertextOwned::new(
            0,
            GlweSize(2),
            PolynomialSize(4),
            DecompositionBaseLog(5),
            DecompositionLevelCount(3),
        );
        assert_eq!(ggsw.as_ref().len(), 3 * 2 * 2 * 4);
        let levels: Vec<usize> = ggsw.iter().map(|m| m.decomposition_level().0).collect();
        assert_eq!(levels, vec![3, 2, 1]);
        assert_eq!(
            ggsw.iter().next().map(|m| m.as_glwe_list().glwe_ciphertext_count().0),
            Some(2)
        );
    }
}
