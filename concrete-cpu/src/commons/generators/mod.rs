//! Random generators specialized for the different steps of the cryptographic pipeline.
//!
//! + [`SecretRandomGenerator`] draws the coefficients of secret keys.
//! + [`EncryptionRandomGenerator`] draws masks and noises, from two separate streams.
//! + [`MaskRandomGenerator`] replays the mask stream alone, to decompress seeded entities.
//! + [`DeterministicSeeder`] derives seeds from a master seed.

mod encryption;
mod secret;
mod seeder;

pub use encryption::{EncryptionRandomGenerator, MaskRandomGenerator};
pub use secret::SecretRandomGenerator;
pub use seeder::{new_seeder, DeterministicSeeder};
