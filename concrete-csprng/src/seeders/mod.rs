//! Sources of fresh seeds for the generators.
//!
//! A seeder produces a [`Seed`] which is then handed to a
//! [`RandomGenerator`](crate::generators::RandomGenerator). Seeders are only as good as the
//! entropy source they draw from, and none of them ever falls back silently to a weaker one: the
//! fallible [`Seeder::try_seed`] reports the failure instead.

mod implem;
pub use implem::*;

/// A seed value, used to initialize a generator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Seed(pub u128);

impl Seed {
    /// Builds a seed from the 16 bytes of a little endian integer.
    pub fn from_le_bytes(bytes: [u8; 16]) -> Self {
        Self(u128::from_le_bytes(bytes))
    }

    pub fn to_le_bytes(self) -> [u8; 16] {
        self.0.to_le_bytes()
    }
}

/// The error returned when the entropy source of a seeder cannot be read.
#[derive(Debug)]
pub struct SeederError(pub String);

impl std::fmt::Display for SeederError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "entropy source unavailable: {}", self.0)
    }
}

impl std::error::Error for SeederError {}

/// A trait representing a seeding strategy.
pub trait Seeder {
    /// Tries to draw a fresh seed.
    fn try_seed(&mut self) -> Result<Seed, SeederError>;

    /// Draws a fresh seed.
    ///
    /// # Panics
    ///
    /// Panics if the entropy source is unavailable.
    fn seed(&mut self) -> Seed {
        match self.try_seed() {
            Ok(seed) => seed,
            Err(err) => panic!("{err}"),
        }
    }

    /// Check whether the seeder can be used on the current machine.
    fn is_available() -> bool
    where
        Self: Sized;
}
