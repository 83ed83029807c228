//! Deterministic random byte generators.
//!
//! A [`RandomGenerator`] yields a bounded stream of bytes determined by its [`Seed`]. It can be
//! forked into a set of children, each one owning a contiguous and disjoint part of the
//! remaining stream of its parent. The concatenation of the children outputs is exactly the
//! output the parent would have produced, which makes the bytes consumed by a computation
//! independent of the order (or the thread) in which the children are consumed.
use crate::seeders::Seed;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod aes_ctr;

mod implem;
pub use implem::*;

/// The number of children created when a generator is forked.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ChildrenCount(pub usize);

/// The number of bytes each child can generate, when a generator is forked.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BytesPerChild(pub usize);

/// A structure representing the number of bytes between two table indices.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct ByteCount(pub u128);

/// An error occurring during a generator fork.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ForkError {
    ForkTooLarge,
    ZeroChildrenCount,
    ZeroBytesPerChild,
}

impl Display for ForkError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ForkError::ForkTooLarge => {
                write!(
                    f,
                    "The children generators would output bytes after the parent bound. "
                )
            }
            ForkError::ZeroChildrenCount => {
                write!(
                    f,
                    "The number of children in the fork must be greater than zero."
                )
            }
            ForkError::ZeroBytesPerChild => {
                write!(
                    f,
                    "The number of bytes per child must be greater than zero."
                )
            }
        }
    }
}

impl Error for ForkError {}

/// A trait for cryptographically secure pseudo-random generators.
///
/// See the [crate-level](crate) documentation for details.
pub trait RandomGenerator: Iterator<Item = u8> + Sized {
    /// The iterator over the children of a fork.
    type ChildrenIter: Iterator<Item = Self>;

    /// Creates a new generator from a seed.
    ///
    /// The generator uses its whole counter space and two generators built from the same seed
    /// output the same bytes.
    fn new(seed: Seed) -> Self;

    /// Returns the number of bytes that can still be output by the generator before reaching
    /// its bound.
    fn remaining_bytes(&self) -> ByteCount;

    /// Returns the next byte of the stream, or `None` once the bound is reached.
    fn next_byte(&mut self) -> Option<u8>;

    /// Tries to fork the generator into an iterator of `n_children` new generators, each able
    /// to output `n_bytes` bytes.
    ///
    /// The parent skips the bytes handed to its children.
    fn try_fork(
        &mut self,
        n_children: ChildrenCount,
        n_bytes: BytesPerChild,
    ) -> Result<Self::ChildrenIter, ForkError>;
}

/// A trait extending [`RandomGenerator`] to the parallel iterators of `rayon`.
#[cfg(feature = "parallel")]
pub trait ParallelRandomGenerator: RandomGenerator + Send {
    /// The parallel iterator over the children of a fork.
    type ParChildrenIter: rayon::prelude::IndexedParallelIterator<Item = Self>;

    /// Same as [`RandomGenerator::try_fork`], with the children delivered as a parallel
    /// iterator.
    fn par_try_fork(
        &mut self,
        n_children: ChildrenCount,
        n_bytes: BytesPerChild,
    ) -> Result<Self::ParChildrenIter, ForkError>;
}
