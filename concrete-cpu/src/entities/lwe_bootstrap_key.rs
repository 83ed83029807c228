use crate::commons::parameters::{
    DecompositionBaseLog, DecompositionLevelCount, GlweSize, LweDimension, PolynomialSize,
};
use crate::commons::traits::{Container, ContainerMut, Split};
use crate::entities::ggsw_ciphertext::{
    ggsw_ciphertext_size, GgswCiphertext, GgswCiphertextMutView, GgswCiphertextView,
};
use rayon::prelude::*;

/// A bootstrap key in the standard domain: one GGSW ciphertext per coefficient of the input LWE
/// secret key, encrypted under the output GLWE secret key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LweBootstrapKey<C: Container<Element = u64>> {
    data: C,
    glwe_size: GlweSize,
    polynomial_size: PolynomialSize,
    decomposition_base_log: DecompositionBaseLog,
    decomposition_level_count: DecompositionLevelCount,
}

/// Returns the number of `u64` of a bootstrap key.
pub fn lwe_bootstrap_key_size(
    input_lwe_dimension: LweDimension,
    glwe_size: GlweSize,
    polynomial_size: PolynomialSize,
    decomposition_level_count: DecompositionLevelCount,
) -> usize {
    input_lwe_dimension.0
        * ggsw_ciphertext_size(glwe_size, polynomial_size, decomposition_level_count)
}

impl<C: Container<Element = u64>> AsRef<[u64]> for LweBootstrapKey<C> {
    fn as_ref(&self) -> &[u64] {
        self.data.as_slice()
    }
}

impl<C: ContainerMut<Element = u64>> AsMut<[u64]> for LweBootstrapKey<C> {
    fn as_mut(&mut self) -> &mut [u64] {
        self.data.as_mut_slice()
    }
}

impl<C: Container<Element = u64>> LweBootstrapKey<C> {
    pub fn from_container(
        container: C,
        glwe_size: GlweSize,
        polynomial_size: PolynomialSize,
        decomposition_base_log: DecompositionBaseLog,
        decomposition_level_count: DecompositionLevelCount,
    ) -> Self {
        let ggsw_size =
            ggsw_ciphertext_size(glwe_size, polynomial_size, decomposition_level_count);
        assert_eq!(
            container.container_len() % ggsw_size,
            0,
            "The provided container length is not valid. \
            It needs to be dividable by the size of a GGSW ciphertext: {ggsw_size}. \
            Got container length: {}.",
            container.container_len()
        );
        Self {
            data: container,
            glwe_size,
            polynomial_size,
            decomposition_base_log,
            decomposition_level_count,
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

    pub fn input_lwe_dimension(&self) -> LweDimension {
        LweDimension(self.data.container_len() / self.ggsw_size())
    }

    pub fn output_lwe_dimension(&self) -> LweDimension {
        self.glwe_size
            .to_glwe_dimension()
            .to_equivalent_lwe_dimension(self.polynomial_size)
    }

    fn ggsw_size(&self) -> usize {
        ggsw_ciphertext_size(
            self.glwe_size,
            self.polynomial_size,
            self.decomposition_level_count,
        )
    }

    pub fn iter(
        &self,
    ) -> impl DoubleEndedIterator<Item = GgswCiphertextView<'_>> + ExactSizeIterator {
        let glwe_size = self.glwe_size;
        let polynomial_size = self.polynomial_size;
        let base_log = self.decomposition_base_log;
        self.as_ref()
            .into_chunks(self.ggsw_size())
            .map(move |ggsw| {
                GgswCiphertext::from_container(ggsw, glwe_size, polynomial_size, base_log)
            })
    }

    pub fn as_view(&self) -> LweBootstrapKeyView<'_> {
        LweBootstrapKey {
            data: self.data.as_slice(),
            glwe_size: self.glwe_size,
            polynomial_size: self.polynomial_size,
            decomposition_base_log: self.decomposition_base_log,
            decomposition_level_count: self.decomposition_level_count,
        }
    }

    pub fn into_container(self) -> C {
        self.data
    }
}

impl<C: ContainerMut<Element = u64>> LweBootstrapKey<C> {
    pub fn iter_mut(
        &mut self,
    ) -> impl DoubleEndedIterator<Item = GgswCiphertextMutView<'_>> + ExactSizeIterator {
        let glwe_size = self.glwe_size;
        let polynomial_size = self.polynomial_size;
        let base_log = self.decomposition_base_log;
        let ggsw_size = self.ggsw_size();
        self.as_mut().into_chunks(ggsw_size).map(move |ggsw| {
            GgswCiphertext::from_container(ggsw, glwe_size, polynomial_size, base_log)
        })
    }

    pub fn par_iter_mut(&mut self) -> impl IndexedParallelIterator<Item = GgswCiphertextMutView<'_>> {
        let glwe_size = self.glwe_size;
        let polynomial_size = self.polynomial_size;
        let base_log = self.decomposition_base_log;
        let ggsw_size = self.ggsw_size();
        self.as_mut()
            .par_chunks_exact_mut(ggsw_size)
            .map(move |ggsw| {
                GgswCiphertext::from_container(ggsw, glwe_size, polynomial_size, base_log)
            })
    }

    pub fn as_mut_view(&mut self) -> LweBootstrapKeyMutView<'_> {
        let glwe_size = self.glwe_size;
        let polynomial_size = self.polynomial_size;
        let decomposition_base_log = self.decomposition_base_log;
        let decomposition_level_count = self.decomposition_level_count;
        LweBootstrapKey {
            data: self.data.as_mut_slice(),
            glwe_size,
            polynomial_size,
            decomposition_base_log,
            decomposition_level_count,
        }
    }
}

pub type LweBootstrapKeyOwned = LweBootstrapKey<Vec<u64>>;
pub type LweBootstrapKeyView<'data> = LweBootstrapKey<&'data [u64]>;
pub type LweBootstrapKeyMutView<'data> = LweBootstrapKey<&'data mut [u64]>;

impl LweBootstrapKeyOwned {
    pub fn new(
        fill_with: u64,
        glwe_size: GlweSize,
        polynomial_size: PolynomialSize,
        decomposition_base_log: DecompositionBaseLog,
        decomposition_level_count: DecompositionLevelCount,
        input_lwe_dimension: LweDimension,
    ) -> Self {
        Self::from_container(
            vec![
                fill_with;
                lwe_bootstrap_key_size(
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
        )
    }
}
