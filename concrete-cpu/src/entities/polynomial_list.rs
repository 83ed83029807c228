use crate::commons::parameters::{PolynomialCount, PolynomialSize};
use crate::commons::traits::{Container, ContainerMut, Split};
use crate::entities::polynomial::{Polynomial, PolynomialMutView, PolynomialView};

/// Polynomials of the same size laid out one after the other.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PolynomialList<C: Container<Element = u64>> {
    data: C,
    polynomial_size: PolynomialSize,
}

impl<C: Container<Element = u64>> AsRef<[u64]> for PolynomialList<C> {
    fn as_ref(&self) -> &[u64] {
        self.data.as_slice()
    }
}

impl<C: ContainerMut<Element = u64>> AsMut<[u64]> for PolynomialList<C> {
    fn as_mut(&mut self) -> &mut [u64] {
        self.data.as_mut_slice()
    }
}

impl<C: Container<Element = u64>> PolynomialList<C> {
    pub fn from_container(container: C, polynomial_size: PolynomialSize) -> Self {
        assert_eq!(
            container.container_len() % polynomial_size.0,
            0,
            "The provided container length is not valid. \
            It needs to be dividable by polynomial_size: {polynomial_size:?}. \
            Got container length: {}.",
            container.container_len(),
        );
        Self {
            data: container,
            polynomial_size,
        }
    }

    pub fn polynomial_size(&self) -> PolynomialSize {
        self.polynomial_size
    }

    pub fn polynomial_count(&self) -> PolynomialCount {
        PolynomialCount(self.data.container_len() / self.polynomial_size.0)
    }

    pub fn get(&self, index: usize) -> PolynomialView<'_> {
        let n = self.polynomial_size.0;
        Polynomial::from_container(&self.as_ref()[index * n..(index + 1) * n])
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = PolynomialView<'_>> + ExactSizeIterator {
        self.as_ref()
            .into_chunks(self.polynomial_size.0)
            .map(Polynomial::from_container)
    }

    pub fn as_view(&self) -> PolynomialListView<'_> {
        PolynomialList {
            data: self.data.as_slice(),
            polynomial_size: self.polynomial_size,
        }
    }

    pub fn into_container(self) -> C {
        self.data
    }
}

impl<C: ContainerMut<Element = u64>> PolynomialList<C> {
    pub fn get_mut(&mut self, index: usize) -> PolynomialMutView<'_> {
        let n = self.polynomial_size.0;
        Polynomial::from_container(&mut self.as_mut()[index * n..(index + 1) * n])
    }

    pub fn iter_mut(
        &mut self,
    ) -> impl DoubleEndedIterator<Item = PolynomialMutView<'_>> + ExactSizeIterator {
        let n = self.polynomial_size.0;
        self.as_mut().into_chunks(n).map(Polynomial::from_container)
    }

    pub fn as_mut_view(&mut self) -> PolynomialListMutView<'_> {
        let polynomial_size = self.polynomial_size;
        PolynomialList {
            data: self.data.as_mut_slice(),
            polynomial_size,
        }
    }
}

impl<'data> PolynomialListView<'data> {
    /// Splits the list after its `mid` first polynomials.
    pub fn split_at(self, mid: usize) -> (Self, Self) {
        let polynomial_size = self.polynomial_size;
        let (left, right) = self.data.split_at(mid * polynomial_size.0);
        (
            PolynomialList::from_container(left, polynomial_size),
            PolynomialList::from_container(right, polynomial_size),
        )
    }

    /// Splits the list into sublists of `chunk_size` polynomials.
    pub fn into_chunks(
        self,
        chunk_size: usize,
    ) -> impl DoubleEndedIterator<Item = PolynomialListView<'data>> + ExactSizeIterator {
        let polynomial_size = self.polynomial_size;
        self.data
            .into_chunks(chunk_size * polynomial_size.0)
            .map(move |chunk| PolynomialList::from_container(chunk, polynomial_size))
    }

    pub fn into_polynomials(
        self,
    ) -> impl DoubleEndedIterator<Item = PolynomialView<'data>> + ExactSizeIterator {
        self.data
            .into_chunks(self.polynomial_size.0)
            .map(Polynomial::from_container)
    }
}

impl<'data> PolynomialListMutView<'data> {
    pub fn into_polynomials(
        self,
    ) -> impl DoubleEndedIterator<Item = PolynomialMutView<'data>> + ExactSizeIterator {
        let n = self.polynomial_size.0;
        self.data.into_chunks(n).map(Polynomial::from_container)
    }
}

pub type PolynomialListOwned = PolynomialList<Vec<u64>>;
pub type PolynomialListView<'data> = PolynomialList<&'data [u64]>;
pub type PolynomialListMutView<'data> = PolynomialList<&'data mut [u64]>;

impl PolynomialListOwned {
    pub fn new(
        fill_with: u64,
        polynomial_size: PolynomialSize,
        polynomial_count: PolynomialCount,
    ) -> Self {
        Self::from_container(
            vec![fill_with; polynomial_size.0 * polynomial_count.0],
            polynomial_size,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunks_and_split() {
        let data: Vec<u64> = (0..12).collect();
        let list = PolynomialList::from_container(data.as_slice(), PolynomialSize(2));
        assert_eq!(list.polynomial_count(), PolynomialCount(6));
        assert_eq!(list.get(2).as_ref(), &[4, 5]);

        let (left, right) = list.split_at(2);
        assert_eq!(left.polynomial_count(), PolynomialCount(2));
        assert_eq!(right.get(0).as_ref(), &[4, 5]);

        let chunks: Vec<_> = right.into_chunks(2).collect();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1].get(1).as_ref(), &[10, 11]);
    }
}
