use super::*;
use crate::generators::{BytesPerChild, ChildrenCount, ForkError, ParallelRandomGenerator};
use rayon::iter::{IndexedParallelIterator, ParallelIterator};

impl ParallelRandomGenerator for SoftwareRandomGenerator {
    type ParChildrenIter = rayon::iter::Map<
        rayon::vec::IntoIter<crate::generators::aes_ctr::AesCtrGenerator<SoftwareBlockCipher>>,
        fn(crate::generators::aes_ctr::AesCtrGenerator<SoftwareBlockCipher>) -> Self,
    >;

    fn par_try_fork(
        &mut self,
        n_children: ChildrenCount,
        n_bytes: BytesPerChild,
    ) -> Result<Self::ParChildrenIter, ForkError> {
        self.0
            .par_try_fork(n_children, n_bytes)
            .map(|children| children.map(SoftwareRandomGenerator as fn(_) -> Self))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::generators::RandomGenerator;
    use crate::seeders::Seed;

    #[test]
    fn parallel_and_sequential_forks_agree() {
        let seed = Seed(0x1234_5678);
        let mut sequential = SoftwareRandomGenerator::new(seed);
        let mut parallel = SoftwareRandomGenerator::new(seed);

        let expected: Vec<Vec<u8>> = sequential
            .try_fork(ChildrenCount(13), BytesPerChild(77))
            .unwrap()
            .map(|child| child.collect())
            .collect();
        let actual: Vec<Vec<u8>> = parallel
            .par_try_fork(ChildrenCount(13), BytesPerChild(77))
            .unwrap()
            .map(|child| child.collect())
            .collect();
        assert_eq!(expected, actual);
        assert_eq!(sequential.next(), parallel.next());
    }

    #[test]
    fn children_count_is_exact() {
        let mut generator = SoftwareRandomGenerator::new(Seed(0));
        let children = generator
            .par_try_fork(ChildrenCount(5), BytesPerChild(3))
            .unwrap();
        assert_eq!(children.len(), 5);
    }
}
