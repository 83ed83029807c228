use crate::seeders::{Seed, Seeder, SeederError};

/// A seeder which uses the system entropy source on unix-like systems.
///
/// The `getrandom` system call is used when the kernel offers it, `/dev/urandom` otherwise.
pub struct UnixSeeder {
    secret: u128,
}

impl UnixSeeder {
    /// Creates a new seeder from a user defined secret.
    ///
    /// The secret is xored with every value drawn from the kernel. An attacker able to predict
    /// the kernel random output, but unable to read the memory of the current process, still
    /// cannot predict the produced seeds.
    pub fn new(secret: u128) -> UnixSeeder {
        UnixSeeder { secret }
    }
}

impl Seeder for UnixSeeder {
    /// Draws entropy from the system to seed a CSPRNG.
    ///
    /// This may block at system startup until the kernel entropy pool is initialized.
    fn try_seed(&mut self) -> Result<Seed, SeederError> {
        let entropy = system_entropy()?;
        Ok(Seed(self.secret ^ entropy))
    }

    fn is_available() -> bool {
        cfg!(target_family = "unix")
    }
}

/// Reads 16 bytes from the operating system entropy source.
pub(crate) fn system_entropy() -> Result<u128, SeederError> {
    let mut buf = [0u8; 16];
    getrandom::fill(&mut buf).map_err(|err| SeederError(err.to_string()))?;
    // Read as little endian so the seed does not depend on the host endianness.
    Ok(u128::from_le_bytes(buf))
}
