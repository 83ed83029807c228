use crate::generators::aes_ctr::BYTES_PER_AES_CALL;
use crate::generators::ByteCount;

/// The index of an AES call, i.e. the counter value encrypted by the block cipher.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct AesIndex(pub u128);

/// The index of a byte in the output of one AES call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct ByteIndex(pub usize);

/// A position in the stream of an AES counter mode generator.
///
/// Ordering follows the position in the stream: first by AES index, then by byte index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct TableIndex {
    pub aes_index: AesIndex,
    pub byte_index: ByteIndex,
}

impl TableIndex {
    /// The first position of the table.
    pub const FIRST: TableIndex = TableIndex {
        aes_index: AesIndex(0),
        byte_index: ByteIndex(0),
    };

    /// The last position of the table.
    pub const LAST: TableIndex = TableIndex {
        aes_index: AesIndex(u128::MAX),
        byte_index: ByteIndex(BYTES_PER_AES_CALL - 1),
    };

    /// Creates a table index.
    ///
    /// # Panics
    ///
    /// Panics if the byte index is not smaller than [`BYTES_PER_AES_CALL`].
    pub fn new(aes_index: AesIndex, byte_index: ByteIndex) -> Self {
        assert!(byte_index.0 < BYTES_PER_AES_CALL);
        TableIndex {
            aes_index,
            byte_index,
        }
    }

    /// Moves the index `shift` bytes forward. Wraps around at the end of the table.
    pub fn increase(&mut self, shift: u128) {
        let bytes = BYTES_PER_AES_CALL as u128;
        let total_byte = self.byte_index.0 as u128 + shift % bytes;
        self.aes_index.0 = self
            .aes_index
            .0
            .wrapping_add(shift / bytes)
            .wrapping_add(total_byte / bytes);
        self.byte_index.0 = (total_byte % bytes) as usize;
    }

    /// Returns the index `shift` bytes forward.
    pub fn increased(mut self, shift: u128) -> Self {
        self.increase(shift);
        self
    }

    /// Moves the index to the next byte.
    pub fn increment(&mut self) {
        self.increase(1);
    }

    /// Returns the number of bytes from `self` to `other`, zero if `other` comes first.
    ///
    /// The count saturates at `u128::MAX`, which is only reachable for spans covering almost
    /// the whole table.
    pub fn distance(&self, other: &TableIndex) -> ByteCount {
        if other <= self {
            return ByteCount(0);
        }
        let aes_distance = other.aes_index.0 - self.aes_index.0;
        ByteCount(
            aes_distance
                .saturating_mul(BYTES_PER_AES_CALL as u128)
                .saturating_add(other.byte_index.0 as u128)
                .saturating_sub(self.byte_index.0 as u128),
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn increase_carries_into_aes_index() {
        let mut index = TableIndex::new(AesIndex(3), ByteIndex(14));
        index.increase(3);
        assert_eq!(index, TableIndex::new(AesIndex(4), ByteIndex(1)));
        index.increase(32);
        assert_eq!(index, TableIndex::new(AesIndex(6), ByteIndex(1)));
    }

    #[test]
    fn distance_matches_increase() {
        let start = TableIndex::new(AesIndex(17), ByteIndex(9));
        for shift in [0u128, 1, 7, 15, 16, 17, 1_000, 123_456_789] {
            assert_eq!(start.distance(&start.increased(shift)), ByteCount(shift));
        }
        assert_eq!(start.increased(5).distance(&start), ByteCount(0));
    }

    #[test]
    fn whole_table_distance_saturates() {
        assert_eq!(
            TableIndex::FIRST.distance(&TableIndex::LAST),
            ByteCount(u128::MAX)
        );
    }
}
