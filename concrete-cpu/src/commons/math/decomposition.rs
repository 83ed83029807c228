//! Signed decomposition of torus elements.
//!
//! A value $\theta \in \mathbb{Z}/2^{64}\mathbb{Z}$ is first rounded to the closest multiple of
//! $2^{64 - b l}$, then written as $\sum\_{i=1}^l \tilde{\theta}\_i 2^{64 - b i}$ with every
//! $\tilde{\theta}\_i$ in $[-B/2, B/2]$, where $B = 2^b$ is the base and $l$ the level count.
//!
//! Level 1 carries the most significant bits. The iterators of this module yield the levels in
//! decreasing order, starting with level $l$.

use crate::commons::parameters::{DecompositionBaseLog, DecompositionLevelCount};
use dyn_stack::PodStack;

/// The level of a term in a decomposition, starting at 1 for the most significant one.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct DecompositionLevel(pub usize);

/// A structure which allows to decompose unsigned integers into a set of smaller terms.
#[derive(Debug, Clone, Copy)]
pub struct SignedDecomposer {
    pub(crate) base_log: usize,
    pub(crate) level_count: usize,
}

impl SignedDecomposer {
    pub fn new(base_log: DecompositionBaseLog, level_count: DecompositionLevelCount) -> Self {
        debug_assert!(
            u64::BITS as usize > base_log.0 * level_count.0,
            "Decomposed bits exceeds the size of the integer to be decomposed"
        );
        Self {
            base_log: base_log.0,
            level_count: level_count.0,
        }
    }

    pub fn base_log(&self) -> DecompositionBaseLog {
        DecompositionBaseLog(self.base_log)
    }

    pub fn level_count(&self) -> DecompositionLevelCount {
        DecompositionLevelCount(self.level_count)
    }

    /// Return the closest value representable by the decomposition.
    #[inline]
    pub fn closest_representable(&self, input: u64) -> u64 {
        let non_rep_bit_count = u64::BITS as usize - self.level_count * self.base_log;
        // msb of the bits dropped by the decomposition, used to round
        let non_rep_msb = (input >> (non_rep_bit_count - 1)) & 1;
        let res = (input >> non_rep_bit_count).wrapping_add(non_rep_msb);
        res.wrapping_shl(non_rep_bit_count as u32)
    }

    /// Return the rounded input, shifted so that its representable bits are the least significant
    /// ones. This is the starting state of a decomposition.
    #[inline]
    pub fn init_decomposer_state(&self, input: u64) -> u64 {
        let non_rep_bit_count = u64::BITS as usize - self.level_count * self.base_log;
        let non_rep_msb = (input >> (non_rep_bit_count - 1)) & 1;
        (input >> non_rep_bit_count).wrapping_add(non_rep_msb)
            & (u64::MAX >> (u64::BITS as usize - self.level_count * self.base_log))
    }

    /// Generate an iterator over the terms of the decomposition of the input.
    ///
    /// The terms are yielded from level $l$ down to level 1.
    pub fn decompose(&self, input: u64) -> SignedDecompositionIter {
        SignedDecompositionIter::new(
            self.init_decomposer_state(input),
            DecompositionBaseLog(self.base_log),
            DecompositionLevelCount(self.level_count),
        )
    }

    /// Recomposes a decomposed value by summing all the terms.
    ///
    /// Returns `None` if the iterator was already partially consumed.
    pub fn recompose(&self, decomp: SignedDecompositionIter) -> Option<u64> {
        if decomp.fresh {
            Some(decomp.fold(0u64, |acc, term| {
                acc.wrapping_add(term.to_recomposition_summand())
            }))
        } else {
            None
        }
    }
}

/// A member of the decomposition, $\tilde{\theta}\_i$, stored as a two's complement integer.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct DecompositionTerm {
    level: usize,
    base_log: usize,
    value: u64,
}

impl DecompositionTerm {
    pub(crate) fn new(level: DecompositionLevel, base_log: DecompositionBaseLog, value: u64) -> Self {
        Self {
            level: level.0,
            base_log: base_log.0,
            value,
        }
    }

    /// Return $\tilde{\theta}\_i 2^{64 - b i}$.
    pub fn to_recomposition_summand(&self) -> u64 {
        let shift = u64::BITS as usize - self.base_log * self.level;
        self.value.wrapping_shl(shift as u32)
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    pub fn level(&self) -> DecompositionLevel {
        DecompositionLevel(self.level)
    }
}

/// An iterator that yields the terms of the signed decomposition of an integer.
///
/// # Warning
///
/// This iterator yields the decomposition in reverse order: the highest level comes first.
pub struct SignedDecompositionIter {
    base_log: usize,
    level_count: usize,
    state: u64,
    current_level: usize,
    // for B=2^4: ...0001111
    mod_b_mask: u64,
    fresh: bool,
}

impl SignedDecompositionIter {
    pub(crate) fn new(
        state: u64,
        base_log: DecompositionBaseLog,
        level: DecompositionLevelCount,
    ) -> Self {
        Self {
            base_log: base_log.0,
            level_count: level.0,
            state,
            current_level: level.0,
            mod_b_mask: (1u64 << base_log.0) - 1,
            fresh: true,
        }
    }

    pub fn base_log(&self) -> DecompositionBaseLog {
        DecompositionBaseLog(self.base_log)
    }

    pub fn level_count(&self) -> DecompositionLevelCount {
        DecompositionLevelCount(self.level_count)
    }
}

impl Iterator for SignedDecompositionIter {
    type Item = DecompositionTerm;

    fn next(&mut self) -> Option<Self::Item> {
        self.fresh = false;
        if self.current_level == 0 {
            return None;
        }
        let output = decompose_one_level(self.base_log, &mut self.state, self.mod_b_mask);
        self.current_level -= 1;
        Some(DecompositionTerm::new(
            DecompositionLevel(self.current_level + 1),
            DecompositionBaseLog(self.base_log),
            output,
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.current_level, Some(self.current_level))
    }
}

impl ExactSizeIterator for SignedDecompositionIter {}

#[inline]
fn decompose_one_level(base_log: usize, state: &mut u64, mod_b_mask: u64) -> u64 {
    let res = *state & mod_b_mask;
    *state >>= base_log;
    let mut carry = (res.wrapping_sub(1) | *state) & res;
    carry >>= base_log - 1;
    *state += carry;
    res.wrapping_sub(carry << base_log)
}

/// An iterator-like object that decomposes a whole tensor of values at once, one level at a
/// time.
///
/// The decomposition states live on the provided stack, and every call to
/// [`next_term`](Self::next_term) lends an iterator over the terms of the current level for all
/// the values of the tensor.
pub struct TensorSignedDecompositionLendingIter<'buffers> {
    base_log: usize,
    current_level: usize,
    mod_b_mask: u64,
    states: &'buffers mut [u64],
}

impl<'buffers> TensorSignedDecompositionLendingIter<'buffers> {
    /// Creates the iterator from the decomposer states of the values, as returned by
    /// [`SignedDecomposer::init_decomposer_state`].
    #[inline]
    pub fn new(
        input: impl Iterator<Item = u64>,
        base_log: DecompositionBaseLog,
        level: DecompositionLevelCount,
        stack: &'buffers mut PodStack,
    ) -> (Self, &'buffers mut PodStack) {
        let (states, stack) = stack.collect_aligned(aligned_vec::CACHELINE_ALIGN, input);
        (
            TensorSignedDecompositionLendingIter {
                base_log: base_log.0,
                current_level: level.0,
                mod_b_mask: (1u64 << base_log.0) - 1,
                states,
            },
            stack,
        )
    }

    /// Returns the level and the terms of the next level of the decomposition, or `None` once
    /// level 1 was yielded.
    #[inline]
    pub fn next_term<'short>(
        &'short mut self,
    ) -> Option<(
        DecompositionLevel,
        DecompositionBaseLog,
        impl 'short + Iterator<Item = u64>,
    )> {
        if self.current_level == 0 {
            return None;
        }
        let current_level = self.current_level;
        let base_log = self.base_log;
        let mod_b_mask = self.mod_b_mask;
        self.current_level -= 1;

        Some((
            DecompositionLevel(current_level),
            DecompositionBaseLog(base_log),
            self.states
                .iter_mut()
                .map(move |state| decompose_one_level(base_log, state, mod_b_mask)),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dyn_stack::{GlobalPodBuffer, StackReq};
    use rand::Rng;

    fn recomposed(decomposer: &SignedDecomposer, input: u64) -> u64 {
        decomposer.recompose(decomposer.decompose(input)).unwrap()
    }

    #[test]
    fn decomposition_recomposes_to_closest_representable() {
        let mut rng = rand::thread_rng();
        for base_log in 1..=16 {
            for level in 1..=(63 / base_log).min(8) {
                let decomposer = SignedDecomposer::new(
                    DecompositionBaseLog(base_log),
                    DecompositionLevelCount(level),
                );
                for _ in 0..100 {
                    let input: u64 = rng.gen();
                    assert_eq!(
                        recomposed(&decomposer, input),
                        decomposer.closest_representable(input)
                    );
                }
            }
        }
    }

    #[test]
    fn terms_are_balanced() {
        let mut rng = rand::thread_rng();
        let decomposer = SignedDecomposer::new(DecompositionBaseLog(4), DecompositionLevelCount(5));
        let half_basis = 1i64 << 3;
        for _ in 0..1000 {
            let mut expected_level = 5;
            for term in decomposer.decompose(rng.gen()) {
                assert_eq!(term.level(), DecompositionLevel(expected_level));
                expected_level -= 1;
                let signed = term.value() as i64;
                assert!(-half_basis <= signed && signed <= half_basis);
            }
            assert_eq!(expected_level, 0);
        }
    }

    #[test]
    fn closest_representable_rounds() {
        let decomposer = SignedDecomposer::new(DecompositionBaseLog(4), DecompositionLevelCount(3));
        // 52 bits are dropped
        assert_eq!(decomposer.closest_representable((1 << 51) - 1), 0);
        assert_eq!(decomposer.closest_representable(1 << 51), 1 << 52);
        assert_eq!(decomposer.closest_representable(u64::MAX), 0);
    }

    #[test]
    fn tensor_decomposition_matches_scalar_one() {
        let mut rng = rand::thread_rng();
        let decomposer = SignedDecomposer::new(DecompositionBaseLog(7), DecompositionLevelCount(3));
        let inputs: Vec<u64> = (0..16).map(|_| rng.gen()).collect();

        let mut mem = GlobalPodBuffer::new(StackReq::new_aligned::<u64>(
            inputs.len(),
            aligned_vec::CACHELINE_ALIGN,
        ));
        let stack = PodStack::new(&mut mem);
        let (mut tensor, _) = TensorSignedDecompositionLendingIter::new(
            inputs.iter().map(|&x| decomposer.init_decomposer_state(x)),
            decomposer.base_log(),
            decomposer.level_count(),
            stack,
        );

        let scalar: Vec<Vec<u64>> = inputs
            .iter()
            .map(|&x| decomposer.decompose(x).map(|t| t.value()).collect())
            .collect();

        let mut level_index = 0;
        while let Some((level, _, terms)) = tensor.next_term() {
            assert_eq!(level, DecompositionLevel(3 - level_index));
            let terms: Vec<u64> = terms.collect();
            for (term, expected) in terms.iter().zip(scalar.iter()) {
                assert_eq!(*term, expected[level_index]);
            }
            level_index += 1;
        }
        assert_eq!(level_index, 3);
    }
}
