use crate::generators::aes_ctr::block_cipher::{AesBlockCipher, AesKey};
use crate::generators::aes_ctr::index::{AesIndex, TableIndex};
use crate::generators::aes_ctr::{AES_CALLS_PER_BATCH, BYTES_PER_AES_CALL, BYTES_PER_BATCH};
use crate::generators::{ByteCount, BytesPerChild, ChildrenCount, ForkError};

/// An AES counter mode generator, outputting the bytes of the table between two indices.
#[derive(Clone)]
pub struct AesCtrGenerator<BlockCipher: AesBlockCipher> {
    block_cipher: Box<BlockCipher>,
    // The next byte to output.
    next: TableIndex,
    // The exclusive bound of the generator.
    bound: TableIndex,
    // The AES index of the first call stored in `buffer`, if the buffer is filled.
    buffer_start: Option<AesIndex>,
    buffer: [u8; BYTES_PER_BATCH],
}

impl<BlockCipher: AesBlockCipher> AesCtrGenerator<BlockCipher> {
    /// Generates a new generator covering the whole table, with the given AES key.
    ///
    /// The last byte of the table is used as the exclusive bound and is never output.
    pub fn new(key: AesKey) -> Self {
        Self::from_range(
            Box::new(BlockCipher::new(key)),
            TableIndex::FIRST,
            TableIndex::LAST,
        )
    }

    /// Builds a generator outputting the bytes from `start` (included) to `bound` (excluded).
    pub fn from_range(block_cipher: Box<BlockCipher>, start: TableIndex, bound: TableIndex) -> Self {
        debug_assert!(start <= bound);
        AesCtrGenerator {
            block_cipher,
            next: start,
            bound,
            buffer_start: None,
            buffer: [0; BYTES_PER_BATCH],
        }
    }

    /// Returns the position of the next byte.
    pub fn table_index(&self) -> TableIndex {
        self.next
    }

    /// Returns the exclusive bound of the generator.
    pub fn get_bound(&self) -> TableIndex {
        self.bound
    }

    pub fn remaining_bytes(&self) -> ByteCount {
        self.next.distance(&self.bound)
    }

    pub fn next_byte(&mut self) -> Option<u8> {
        if self.next >= self.bound {
            return None;
        }
        let aes_index = self.next.aes_index;
        let offset_in_batch = match self.buffer_start {
            Some(start)
                if aes_index >= start
                    && aes_index.0 - start.0 < AES_CALLS_PER_BATCH as u128 =>
            {
                (aes_index.0 - start.0) as usize
            }
            _ => {
                self.refill(aes_index);
                0
            }
        };
        let byte = self.buffer[offset_in_batch * BYTES_PER_AES_CALL + self.next.byte_index.0];
        self.next.increment();
        Some(byte)
    }

    fn refill(&mut self, start: AesIndex) {
        let counters: [u128; AES_CALLS_PER_BATCH] =
            std::array::from_fn(|i| start.0.wrapping_add(i as u128));
        self.buffer = self.block_cipher.generate_batch(counters);
        self.buffer_start = Some(start);
    }

    /// Computes the ranges of the children of a fork, and moves `self` after them.
    fn fork_ranges(
        &mut self,
        n_children: ChildrenCount,
        n_bytes: BytesPerChild,
    ) -> Result<Vec<(TableIndex, TableIndex)>, ForkError> {
        if n_children.0 == 0 {
            return Err(ForkError::ZeroChildrenCount);
        }
        if n_bytes.0 == 0 {
            return Err(ForkError::ZeroBytesPerChild);
        }
        let total = (n_children.0 as u128)
            .checked_mul(n_bytes.0 as u128)
            .ok_or(ForkError::ForkTooLarge)?;
        if total > self.remaining_bytes().0 {
            return Err(ForkError::ForkTooLarge);
        }

        let first = self.next;
        let ranges = (0..n_children.0 as u128)
            .map(|i| {
                let start = first.increased(i * n_bytes.0 as u128);
                (start, start.increased(n_bytes.0 as u128))
            })
            .collect();
        self.next.increase(total);
        Ok(ranges)
    }

    /// Tries to fork the generator into `n_children` generators of `n_bytes` bytes each.
    pub fn try_fork(
        &mut self,
        n_children: ChildrenCount,
        n_bytes: BytesPerChild,
    ) -> Result<std::vec::IntoIter<Self>, ForkError> {
        let ranges = self.fork_ranges(n_children, n_bytes)?;
        let children: Vec<Self> = ranges
            .into_iter()
            .map(|(start, bound)| Self::from_range(self.block_cipher.clone(), start, bound))
            .collect();
        Ok(children.into_iter())
    }
}

impl<BlockCipher: AesBlockCipher> Iterator for AesCtrGenerator<BlockCipher> {
    type Item = u8;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_byte()
    }
}

#[cfg(test)]
pub mod aes_ctr_generic_test {
    #![allow(unused)]
    use super::*;

    /// Checks that the output of a generator only depends on the table index, not on how the
    /// batches were aligned when the bytes were produced.
    pub fn prop_output_independent_of_batch_alignment<B: AesBlockCipher>() {
        let key = AesKey(0x0123_4567_89ab_cdef_0123_4567_89ab_cdef);
        let reference: Vec<u8> = AesCtrGenerator::<B>::new(key).take(4 * BYTES_PER_BATCH).collect();
        for skip in [1usize, 15, 16, 17, 127, 128, 129, 200] {
            let cipher = Box::new(B::new(key));
            let start = TableIndex::FIRST.increased(skip as u128);
            let generator = AesCtrGenerator::from_range(cipher, start, TableIndex::LAST);
            let bytes: Vec<u8> = generator.take(2 * BYTES_PER_BATCH).collect();
            assert_eq!(bytes[..], reference[skip..skip + 2 * BYTES_PER_BATCH]);
        }
    }
}
