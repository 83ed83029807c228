use crate::generators::aes_ctr::block_cipher::AesBlockCipher;
use crate::generators::aes_ctr::generic::AesCtrGenerator;
use crate::generators::{BytesPerChild, ChildrenCount, ForkError};
use rayon::prelude::*;

impl<BlockCipher: AesBlockCipher> AesCtrGenerator<BlockCipher> {
    /// Tries to fork the generator into a parallel iterator of `n_children` generators.
    ///
    /// The children are the same as the ones returned by
    /// [`try_fork`](AesCtrGenerator::try_fork).
    pub fn par_try_fork(
        &mut self,
        n_children: ChildrenCount,
        n_bytes: BytesPerChild,
    ) -> Result<rayon::vec::IntoIter<Self>, ForkError> {
        let children: Vec<Self> = self.try_fork(n_children, n_bytes)?.collect();
        Ok(children.into_par_iter())
    }
}
