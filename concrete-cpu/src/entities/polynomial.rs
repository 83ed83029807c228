use crate::commons::parameters::PolynomialSize;
use crate::commons::traits::{Container, ContainerMut};

/// A polynomial of `Z_{2^64}[X] / (X^N + 1)`, stored by increasing degree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Polynomial<C: Container<Element = u64>> {
    data: C,
}

impl<C: Container<Element = u64>> AsRef<[u64]> for Polynomial<C> {
    fn as_ref(&self) -> &[u64] {
        self.data.as_slice()
    }
}

impl<C: ContainerMut<Element = u64>> AsMut<[u64]> for Polynomial<C> {
    fn as_mut(&mut self) -> &mut [u64] {
        self.data.as_mut_slice()
    }
}

impl<C: Container<Element = u64>> Polynomial<C> {
    pub fn from_container(container: C) -> Self {
        assert!(
            container.container_len() > 0,
            "Got an empty container to create a Polynomial"
        );
        Self { data: container }
    }

    pub fn polynomial_size(&self) -> PolynomialSize {
        PolynomialSize(self.data.container_len())
    }

    pub fn as_view(&self) -> PolynomialView<'_> {
        Polynomial {
            data: self.data.as_slice(),
        }
    }

    pub fn iter(&self) -> core::slice::Iter<'_, u64> {
        self.as_ref().iter()
    }

    pub fn into_container(self) -> C {
        self.data
    }
}

impl<C: ContainerMut<Element = u64>> Polynomial<C> {
    pub fn as_mut_view(&mut self) -> PolynomialMutView<'_> {
        Polynomial {
            data: self.data.as_mut_slice(),
        }
    }

    pub fn iter_mut(&mut self) -> core::slice::IterMut<'_, u64> {
        self.as_mut().iter_mut()
    }
}

pub type PolynomialOwned = Polynomial<Vec<u64>>;
pub type PolynomialView<'data> = Polynomial<&'data [u64]>;
pub type PolynomialMutView<'data> = Polynomial<&'data mut [u64]>;

impl PolynomialOwned {
    pub fn new(fill_with: u64, polynomial_size: PolynomialSize) -> Self {
        Self::from_container(vec![fill_with; polynomial_size.0])
    }
}
