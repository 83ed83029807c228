use crate::commons::parameters::{GlweDimension, GlweSize, PolynomialSize};
use crate::commons::traits::{Container, ContainerMut};
use crate::entities::polynomial::{Polynomial, PolynomialMutView, PolynomialView};
use crate::entities::polynomial_list::{PolynomialList, PolynomialListMutView, PolynomialListView};

/// A GLWE ciphertext: `k` mask polynomials followed by the body polynomial.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlweCiphertext<C: Container<Element = u64>> {
    data: C,
    polynomial_size: PolynomialSize,
}

impl<C: Container<Element = u64>> AsRef<[u64]> for GlweCiphertext<C> {
    fn as_ref(&self) -> &[u64] {
        self.data.as_slice()
    }
}

impl<C: ContainerMut<Element = u64>> AsMut<[u64]> for GlweCiphertext<C> {
    fn as_mut(&mut self) -> &mut [u64] {
        self.data.as_mut_slice()
    }
}

impl<C: Container<Element = u64>> GlweCiphertext<C> {
    pub fn from_container(container: C, polynomial_size: PolynomialSize) -> Self {
        assert!(
            container.container_len() > 0,
            "Got an empty container to create a GlweCiphertext"
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

    pub fn polynomial_size(&self) -> PolynomialSize {
        self.polynomial_size
    }

    pub fn glwe_size(&self) -> GlweSize {
        GlweSize(self.data.container_len() / self.polynomial_size.0)
    }

    pub fn glwe_dimension(&self) -> GlweDimension {
        self.glwe_size().to_glwe_dimension()
    }

    pub fn get_mask_and_body(&self) -> (PolynomialListView<'_>, PolynomialView<'_>) {
        let (mask, body) = self
            .as_ref()
            .split_at(self.glwe_dimension().0 * self.polynomial_size.0);
        (
            PolynomialList::from_container(mask, self.polynomial_size),
            Polynomial::from_container(body),
        )
    }

    pub fn get_mask(&self) -> PolynomialListView<'_> {
        self.get_mask_and_body().0
    }

    pub fn get_body(&self) -> PolynomialView<'_> {
        self.get_mask_and_body().1
    }

    /// Interprets the whole ciphertext, body included, as a list of `k + 1` polynomials.
    pub fn as_polynomial_list(&self) -> PolynomialListView<'_> {
        PolynomialList::from_container(self.as_ref(), self.polynomial_size)
    }

    pub fn as_view(&self) -> GlweCiphertextView<'_> {
        GlweCiphertext {
            data: self.data.as_slice(),
            polynomial_size: self.polynomial_size,
        }
    }

    pub fn into_container(self) -> C {
        self.data
    }
}

impl<C: ContainerMut<Element = u64>> GlweCiphertext<C> {
    pub fn get_mut_mask_and_body(&mut self) -> (PolynomialListMutView<'_>, PolynomialMutView<'_>) {
        let polynomial_size = self.polynomial_size;
        let mask_len = self.glwe_dimension().0 * polynomial_size.0;
        let (mask, body) = self.as_mut().split_at_mut(mask_len);
        (
            PolynomialList::from_container(mask, polynomial_size),
            Polynomial::from_container(body),
        )
    }

    pub fn get_mut_mask(&mut self) -> PolynomialListMutView<'_> {
        self.get_mut_mask_and_body().0
    }

    pub fn get_mut_body(&mut self) -> PolynomialMutView<'_> {
        self.get_mut_mask_and_body().1
    }

    pub fn as_mut_polynomial_list(&mut self) -> PolynomialListMutView<'_> {
        let polynomial_size = self.polynomial_size;
        PolynomialList::from_container(self.as_mut(), polynomial_size)
    }

    pub fn as_mut_view(&mut self) -> GlweCiphertextMutView<'_> {
        let polynomial_size = self.polynomial_size;
        GlweCiphertext {
            data: self.data.as_mut_slice(),
            polynomial_size,
        }
    }
}

impl<'data> GlweCiphertextView<'data> {
    pub fn into_polynomial_list(self) -> PolynomialListView<'data> {
        PolynomialList::from_container(self.data, self.polynomial_size)
    }
}

impl<'data> GlweCiphertextMutView<'data> {
    pub fn into_polynomial_list(self) -> PolynomialListMutView<'data> {
        PolynomialList::from_container(self.data, self.polynomial_size)
    }
}

pub type GlweCiphertextOwned = GlweCiphertext<Vec<u64>>;
pub type GlweCiphertextView<'data> = GlweCiphertext<&'data [u64]>;
pub type GlweCiphertextMutView<'data> = GlweCiphertext<&'data mut [u64]>;

impl GlweCiphertextOwned {
    pub fn new(fill_with: u64, glwe_size: GlweSize, polynomial_size: PolynomialSize) -> Self {
        Self::from_container(
            vec![fill_with; glwe_size.0 * polynomial_size.0],
            polynomial_size,
        )
    }
}

/// Returns the number of `u64` of a GLWE ciphertext.
pub fn glwe_ciphertext_size(glwe_size: GlweSize, polynomial_size: PolynomialSize) -> usize {
    glwe_size.0 * polynomial_size.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_and_body_split() {
        let mut glwe = GlweCiphertextOwned::new(0, GlweSize(3), PolynomialSize(4));
        glwe.get_mut_body().as_mut().fill(9);
        assert_eq!(glwe.glwe_dimension(), GlweDimension(2));
        assert_eq!(glwe.get_mask().polynomial_count().0, 2);
        assert!(glwe.get_mask().as_ref().iter().all(|&x| x == 0));
        assert_eq!(&glwe.as_ref()[8..], &[9, 9, 9, 9]);
    }
}
