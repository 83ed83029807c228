use crate::commons::parameters::{GlweDimension, PolynomialSize};
use crate::commons::traits::{Container, ContainerMut};
use crate::entities::lwe_secret_key::LweSecretKey;
use crate::entities::polynomial_list::{PolynomialList, PolynomialListView};

/// A binary GLWE secret key made of `k` polynomials.
///
/// Its coefficients, read in order, form the LWE secret key of dimension `k * N` under which the
/// ciphertexts sample-extracted from a GLWE ciphertext are encrypted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlweSecretKey<C: Container<Element = u64>> {
    data: C,
    polynomial_size: PolynomialSize,
}

impl<C: Container<Element = u64>> AsRef<[u64]> for GlweSecretKey<C> {
    fn as_ref(&self) -> &[u64] {
        self.data.as_slice()
    }
}

impl<C: ContainerMut<Element = u64>> AsMut<[u64]> for GlweSecretKey<C> {
    fn as_mut(&mut self) -> &mut [u64] {
        self.data.as_mut_slice()
    }
}

impl<C: Container<Element = u64>> GlweSecretKey<C> {
    pub fn from_container(container: C, polynomial_size: PolynomialSize) -> Self {
        assert!(
            container.container_len() > 0,
            "Got an empty container to create a GlweSecretKey"
        );
        assert_eq!(
            container.container_len() % polynomial_size.0,
            0,
            "The provided container length is not valid. \
            It needs to be dividable by polynomial_size. \
            Got container length: {} and polynomial_size: {polynomial_size:?}.",
            container.container_len()
        );
        Self {
            data: container,
            polynomial_size,
        }
    }

    pub fn glwe_dimension(&self) -> GlweDimension {
        GlweDimension(self.data.container_len() / self.polynomial_size.0)
    }

    pub fn polynomial_size(&self) -> PolynomialSize {
        self.polynomial_size
    }

    pub fn as_polynomial_list(&self) -> PolynomialListView<'_> {
        PolynomialList::from_container(self.as_ref(), self.polynomial_size)
    }

    pub fn as_lwe_secret_key(&self) -> LweSecretKey<&[u64]> {
        LweSecretKey::from_container(self.as_ref())
    }

    pub fn as_view(&self) -> GlweSecretKeyView<'_> {
        GlweSecretKey {
            data: self.data.as_slice(),
            polynomial_size: self.polynomial_size,
        }
    }

    pub fn into_lwe_secret_key(self) -> LweSecretKey<C> {
        LweSecretKey::from_container(self.data)
    }

    pub fn into_container(self) -> C {
        self.data
    }
}

impl<C: ContainerMut<Element = u64>> GlweSecretKey<C> {
    pub fn as_mut_view(&mut self) -> GlweSecretKeyMutView<'_> {
        let polynomial_size = self.polynomial_size;
        GlweSecretKey {
            data: self.data.as_mut_slice(),
            polynomial_size,
        }
    }
}

pub type GlweSecretKeyOwned = GlweSecretKey<Vec<u64>>;
pub type GlweSecretKeyView<'data> = GlweSecretKey<&'data [u64]>;
pub type GlweSecretKeyMutView<'data> = GlweSecretKey<&'data mut [u64]>;

impl GlweSecretKeyOwned {
    pub fn new(
        fill_with: u64,
        glwe_dimension: GlweDimension,
        polynomial_size: PolynomialSize,
    ) -> Self {
        Self::from_container(
            vec![fill_with; glwe_dimension.0 * polynomial_size.0],
            polynomial_size,
        )
    }
}
