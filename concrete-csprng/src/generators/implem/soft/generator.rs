use crate::generators::aes_ctr::{AesCtrGenerator, AesKey};
use crate::generators::implem::soft::block_cipher::SoftwareBlockCipher;
use crate::generators::{ByteCount, BytesPerChild, ChildrenCount, ForkError, RandomGenerator};
use crate::seeders::Seed;

/// A random number generator using a software implementation.
#[derive(Clone)]
pub struct SoftwareRandomGenerator(pub(super) AesCtrGenerator<SoftwareBlockCipher>);

/// The children iterator used by [`SoftwareRandomGenerator`].
pub struct SoftwareChildrenIterator(std::vec::IntoIter<AesCtrGenerator<SoftwareBlockCipher>>);

impl Iterator for SoftwareChildrenIterator {
    type Item = SoftwareRandomGenerator;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(SoftwareRandomGenerator)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl ExactSizeIterator for SoftwareChildrenIterator {}

impl RandomGenerator for SoftwareRandomGenerator {
    type ChildrenIter = SoftwareChildrenIterator;

    fn new(seed: Seed) -> Self {
        SoftwareRandomGenerator(AesCtrGenerator::new(AesKey(seed.0)))
    }

    fn remaining_bytes(&self) -> ByteCount {
        self.0.remaining_bytes()
    }

    fn next_byte(&mut self) -> Option<u8> {
        self.0.next_byte()
    }

    fn try_fork(
        &mut self,
        n_children: ChildrenCount,
        n_bytes: BytesPerChild,
    ) -> Result<Self::ChildrenIter, ForkError> {
        self.0
            .try_fork(n_children, n_bytes)
            .map(SoftwareChildrenIterator)
    }
}

impl Iterator for SoftwareRandomGenerator {
    type Item = u8;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_byte()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::generators::aes_ctr::aes_ctr_generic_test;
    use crate::generators::generator_generic_test;

    #[test]
    fn prop_fork_first_state_table_index() {
        generator_generic_test::prop_fork_first_state_table_index::<SoftwareRandomGenerator>();
    }

    #[test]
    fn prop_fork_children_remaining_bytes() {
        generator_generic_test::prop_fork_children_remaining_bytes::<SoftwareRandomGenerator>();
    }

    #[test]
    fn prop_fork_too_large() {
        generator_generic_test::prop_fork_too_large::<SoftwareRandomGenerator>();
    }

    #[test]
    fn test_generator_determinism() {
        generator_generic_test::test_generator_determinism::<SoftwareRandomGenerator>();
    }

    #[test]
    fn test_roughly_uniform() {
        generator_generic_test::test_roughly_uniform::<SoftwareRandomGenerator>();
    }

    #[test]
    fn prop_output_independent_of_batch_alignment() {
        aes_ctr_generic_test::prop_output_independent_of_batch_alignment::<SoftwareBlockCipher>();
    }
}
