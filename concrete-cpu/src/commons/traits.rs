//! Traits shared by the entities of the crate.
//!
//! An entity is a thin wrapper over a container of scalars and a handful of parameters. The same
//! entity type can own its data (`Vec<u64>`, `ABox<[u64]>`) or borrow it (`&[u64]`,
//! `&mut [u64]`), which lets the C API wrap raw buffers without copying them.

use aligned_vec::{ABox, AVec};

/// A contiguous, read-only container of elements.
pub trait Container {
    type Element;

    fn as_slice(&self) -> &[Self::Element];

    fn container_len(&self) -> usize {
        self.as_slice().len()
    }
}

/// A contiguous container whose elements can be mutated.
pub trait ContainerMut: Container {
    fn as_mut_slice(&mut self) -> &mut [Self::Element];
}

macro_rules! impl_container {
    ($({$($generics:tt)*} $ty:ty, $mutable:tt;)*) => {$(
        impl<$($generics)*> Container for $ty {
            type Element = T;

            #[inline]
            fn as_slice(&self) -> &[T] {
                self
            }
        }
        impl_container!(@mut $mutable {$($generics)*} $ty);
    )*};
    (@mut true {$($generics:tt)*} $ty:ty) => {
        impl<$($generics)*> ContainerMut for $ty {
            #[inline]
            fn as_mut_slice(&mut self) -> &mut [T] {
                self
            }
        }
    };
    (@mut false {$($generics:tt)*} $ty:ty) => {};
}

impl_container! {
    {'a, T} &'a [T], false;
    {'a, T} &'a mut [T], true;
    {T} Vec<T>, true;
    {T} ABox<[T]>, true;
    {T} AVec<T>, true;
}

/// Splitting of a borrowed buffer into equally sized parts, keeping the borrow's lifetime.
pub trait Split: Sized {
    type Chunks: DoubleEndedIterator<Item = Self> + ExactSizeIterator<Item = Self>;

    /// Splits `self` into `chunk_count` parts of equal size.
    fn split_into(self, chunk_count: usize) -> Self::Chunks;
    /// Splits `self` into parts of `chunk_size` elements.
    fn into_chunks(self, chunk_size: usize) -> Self::Chunks;
    fn split_at(self, mid: usize) -> (Self, Self);
}

impl<'a, T> Split for &'a [T] {
    type Chunks = core::slice::ChunksExact<'a, T>;

    #[inline]
    fn split_into(self, chunk_count: usize) -> Self::Chunks {
        if self.is_empty() {
            // ChunksExact rejects a null chunk size, an empty slice yields empty parts
            return self.chunks_exact(1);
        }
        debug_assert_eq!(self.len() % chunk_count, 0);
        self.chunks_exact(self.len() / chunk_count)
    }

    #[inline]
    fn into_chunks(self, chunk_size: usize) -> Self::Chunks {
        debug_assert_eq!(self.len() % chunk_size, 0);
        self.chunks_exact(chunk_size)
    }

    #[inline]
    fn split_at(self, mid: usize) -> (Self, Self) {
        <[T]>::split_at(self, mid)
    }
}

impl<'a, T> Split for &'a mut [T] {
    type Chunks = core::slice::ChunksExactMut<'a, T>;

    #[inline]
    fn split_into(self, chunk_count: usize) -> Self::Chunks {
        if self.is_empty() {
            return self.chunks_exact_mut(1);
        }
        debug_assert_eq!(self.len() % chunk_count, 0);
        let chunk_size = self.len() / chunk_count;
        self.chunks_exact_mut(chunk_size)
    }

    #[inline]
    fn into_chunks(self, chunk_size: usize) -> Self::Chunks {
        debug_assert_eq!(self.len() % chunk_size, 0);
        self.chunks_exact_mut(chunk_size)
    }

    #[inline]
    fn split_at(self, mid: usize) -> (Self, Self) {
        self.split_at_mut(mid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_into_equal_parts() {
        let data = [0u64, 1, 2, 3, 4, 5];
        let parts: Vec<&[u64]> = data.as_slice().split_into(3).collect();
        assert_eq!(parts, vec![&[0, 1][..], &[2, 3][..], &[4, 5][..]]);

        let mut data = [0u64; 6];
        for (i, chunk) in data.as_mut_slice().into_chunks(2).enumerate() {
            chunk.fill(i as u64);
        }
        assert_eq!(data, [0, 0, 1, 1, 2, 2]);
    }
}
