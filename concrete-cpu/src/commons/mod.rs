//! Module with the common functionalities of the crate: parameter types, noise dispersion,
//! numeric helpers, decomposition and random generation.

pub mod dispersion;
pub mod generators;
pub mod math;
pub mod numeric;
pub mod parameters;
pub mod traits;
pub mod utils;

#[doc(hidden)]
#[cfg(test)]
pub mod test_tools {
    use crate::commons::generators::{
        DeterministicSeeder, EncryptionRandomGenerator, SecretRandomGenerator,
    };
    use crate::commons::math::random::{ActivatedRandomGenerator, Seed};
    use rand::Rng;

    pub fn random_seed() -> Seed {
        Seed(rand::thread_rng().gen())
    }

    pub fn new_secret_random_generator() -> SecretRandomGenerator<ActivatedRandomGenerator> {
        SecretRandomGenerator::new(random_seed())
    }

    pub fn new_encryption_random_generator() -> EncryptionRandomGenerator<ActivatedRandomGenerator>
    {
        EncryptionRandomGenerator::new(
            random_seed(),
            &mut DeterministicSeeder::<ActivatedRandomGenerator>::new(random_seed()),
        )
    }

    /// Distance between two torus elements, in number of steps of `2^-64`.
    pub fn modular_distance(first: u64, second: u64) -> u64 {
        let d0 = first.wrapping_sub(second);
        let d1 = second.wrapping_sub(first);
        d0.min(d1)
    }

    /// Decodes a plaintext carrying a message on its `message_bits` most significant bits, one bit
    /// of padding included.
    pub fn decode(plaintext: u64, message_bits: usize) -> u64 {
        let delta_log = 64 - message_bits;
        let rounding = 1u64 << (delta_log - 1);
        plaintext.wrapping_add(rounding) >> delta_log
    }

    pub fn encode(message: u64, message_bits: usize) -> u64 {
        message << (64 - message_bits)
    }
}
