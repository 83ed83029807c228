use crate::seeders::{Seed, Seeder, SeederError};

/// Number of `rdseed` attempts before giving up on a 64 bits word.
const RDSEED_RETRIES: usize = 1_024;

/// A seeder which uses the `rdseed` x86_64 instruction.
///
/// The `rdseed` instruction draws from the on-chip entropy source, and may transiently fail when
/// the source is drained, hence the retry loop.
pub struct RdseedSeeder;

impl Seeder for RdseedSeeder {
    fn try_seed(&mut self) -> Result<Seed, SeederError> {
        if !Self::is_available() {
            return Err(SeederError("rdseed is not supported by this cpu".to_string()));
        }
        // SAFETY: the cpu supports the rdseed instruction, checked above.
        let (lo, hi) = unsafe { (rdseed_u64()?, rdseed_u64()?) };
        Ok(Seed(((hi as u128) << 64) | lo as u128))
    }

    fn is_available() -> bool {
        is_x86_feature_detected!("rdseed")
    }
}

#[target_feature(enable = "rdseed")]
unsafe fn rdseed_u64() -> Result<u64, SeederError> {
    let mut value = 0u64;
    for _ in 0..RDSEED_RETRIES {
        if core::arch::x86_64::_rdseed64_step(&mut value) == 1 {
            return Ok(value);
        }
    }
    Err(SeederError("rdseed did not return a value".to_string()))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::seeders::generic_tests::check_seeder_fixed_sequences_different;

    #[test]
    fn check_bounded_sequence_difference() {
        if RdseedSeeder::is_available() {
            check_seeder_fixed_sequences_different(|_| RdseedSeeder);
        }
    }
}
