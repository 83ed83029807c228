use crate::commons::parameters::{LweDimension, LweSize};
use crate::commons::traits::{Container, ContainerMut};

/// An LWE ciphertext: a mask of `n` scalars followed by the body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LweCiphertext<C: Container<Element = u64>> {
    data: C,
}

impl<C: Container<Element = u64>> AsRef<[u64]> for LweCiphertext<C> {
    fn as_ref(&self) -> &[u64] {
        self.data.as_slice()
    }
}

impl<C: ContainerMut<Element = u64>> AsMut<[u64]> for LweCiphertext<C> {
    fn as_mut(&mut self) -> &mut [u64] {
        self.data.as_mut_slice()
    }
}

impl<C: Container<Element = u64>> LweCiphertext<C> {
    pub fn from_container(container: C) -> Self {
        assert!(
            container.container_len() > 0,
            "Got an empty container to create an LweCiphertext"
        );
        Self { data: container }
    }

    pub fn lwe_size(&self) -> LweSize {
        LweSize(self.data.container_len())
    }

    pub fn lwe_dimension(&self) -> LweDimension {
        self.lwe_size().to_lwe_dimension()
    }

    /// Returns the mask and the body of the ciphertext.
    pub fn get_mask_and_body(&self) -> (&[u64], &u64) {
        let data = self.as_ref();
        let (mask, body) = data.split_at(data.len() - 1);
        (mask, &body[0])
    }

    pub fn get_mask(&self) -> &[u64] {
        self.get_mask_and_body().0
    }

    pub fn get_body(&self) -> u64 {
        *self.get_mask_and_body().1
    }

    pub fn as_view(&self) -> LweCiphertextView<'_> {
        LweCiphertext {
            data: self.data.as_slice(),
        }
    }

    pub fn into_container(self) -> C {
        self.data
    }
}

impl<C: ContainerMut<Element = u64>> LweCiphertext<C> {
    pub fn get_mut_mask_and_body(&mut self) -> (&mut [u64], &mut u64) {
        let data = self.as_mut();
        let last = data.len() - 1;
        let (mask, body) = data.split_at_mut(last);
        (mask, &mut body[0])
    }

    pub fn get_mut_mask(&mut self) -> &mut [u64] {
        self.get_mut_mask_and_body().0
    }

    pub fn get_mut_body(&mut self) -> &mut u64 {
        self.get_mut_mask_and_body().1
    }

    pub fn as_mut_view(&mut self) -> LweCiphertextMutView<'_> {
        LweCiphertext {
            data: self.data.as_mut_slice(),
        }
    }
}

pub type LweCiphertextOwned = LweCiphertext<Vec<u64>>;
pub type LweCiphertextView<'data> = LweCiphertext<&'data [u64]>;
pub type LweCiphertextMutView<'data> = LweCiphertext<&'data mut [u64]>;

impl LweCiphertextOwned {
    pub fn new(fill_with: u64, lwe_size: LweSize) -> Self {
        Self::from_container(vec![fill_with; lwe_size.0])
    }
}

/// Returns the number of `u64` of an LWE ciphertext of the given dimension.
pub fn lwe_ciphertext_size(lwe_dimension: LweDimension) -> usize {
    lwe_dimension.to_lwe_size().0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_is_the_last_element() {
        let mut ct = LweCiphertextOwned::new(0, LweSize(4));
        *ct.get_mut_body() = 7;
        ct.get_mut_mask()[0] = 1;
        assert_eq!(ct.as_ref(), &[1, 0, 0, 7]);
        assert_eq!(ct.get_body(), 7);
        assert_eq!(ct.lwe_dimension(), LweDimension(3));
    }
}
