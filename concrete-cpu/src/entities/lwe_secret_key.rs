use crate::commons::parameters::LweDimension;
use crate::commons::traits::{Container, ContainerMut};

/// A binary LWE secret key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LweSecretKey<C: Container<Element = u64>> {
    data: C,
}

impl<C: Container<Element = u64>> AsRef<[u64]> for LweSecretKey<C> {
    fn as_ref(&self) -> &[u64] {
        self.data.as_slice()
    }
}

impl<C: ContainerMut<Element = u64>> AsMut<[u64]> for LweSecretKey<C> {
    fn as_mut(&mut self) -> &mut [u64] {
        self.data.as_mut_slice()
    }
}

impl<C: Container<Element = u64>> LweSecretKey<C> {
    pub fn from_container(container: C) -> Self {
        assert!(
            container.container_len() > 0,
            "Got an empty container to create an LweSecretKey"
        );
        Self { data: container }
    }

    pub fn lwe_dimension(&self) -> LweDimension {
        LweDimension(self.data.container_len())
    }

    pub fn as_view(&self) -> LweSecretKeyView<'_> {
        LweSecretKey {
            data: self.data.as_slice(),
        }
    }

    pub fn into_container(self) -> C {
        self.data
    }
}

impl<C: ContainerMut<Element = u64>> LweSecretKey<C> {
    pub fn as_mut_view(&mut self) -> LweSecretKeyMutView<'_> {
        LweSecretKey {
            data: self.data.as_mut_slice(),
        }
    }
}

pub type LweSecretKeyOwned = LweSecretKey<Vec<u64>>;
pub type LweSecretKeyView<'data> = LweSecretKey<&'data [u64]>;
pub type LweSecretKeyMutView<'data> = LweSecretKey<&'data mut [u64]>;

impl LweSecretKeyOwned {
    pub fn new(fill_with: u64, lwe_dimension: LweDimension) -> Self {
        Self::from_container(vec![fill_with; lwe_dimension.0])
    }
}
