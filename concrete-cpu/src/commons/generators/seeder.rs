//! Seeders: the system entropy sources, and a deterministic seeder expanding a master seed.

use crate::commons::math::random::{ByteRandomGenerator, RandomGenerator, Seed, Seeder};
use crate::error::{Error, ErrorKind};
use concrete_csprng::seeders::SeederError;
#[cfg(target_os = "macos")]
use concrete_csprng::seeders::AppleSecureEnclaveSeeder;
#[cfg(target_arch = "x86_64")]
use concrete_csprng::seeders::RdseedSeeder;
#[cfg(target_family = "unix")]
use concrete_csprng::seeders::UnixSeeder;

/// Seeder backed by a CSPRNG.
///
/// Every seed it returns is drawn from the generator seeded by the master seed, so that the
/// sequence of produced seeds only depends on it.
pub struct DeterministicSeeder<G: ByteRandomGenerator> {
    generator: RandomGenerator<G>,
}

impl<G: ByteRandomGenerator> DeterministicSeeder<G> {
    pub fn new(seed: Seed) -> Self {
        Self {
            generator: RandomGenerator::new(seed),
        }
    }
}

impl<G: ByteRandomGenerator> Seeder for DeterministicSeeder<G> {
    fn try_seed(&mut self) -> Result<Seed, SeederError> {
        Ok(Seed(self.generator.random_uniform_u128()))
    }

    fn is_available() -> bool {
        true
    }
}

/// Return an available boxed [`Seeder`] prioritizing hardware entropy sources.
///
/// `rdseed` is used when the CPU supports it, then the Apple randomization services on macOS,
/// then the kernel entropy source on unix platforms.
pub fn new_seeder() -> Result<Box<dyn Seeder>, Error> {
    #[allow(unused_mut)]
    let mut seeder: Option<Box<dyn Seeder>> = None;

    #[cfg(target_arch = "x86_64")]
    {
        if RdseedSeeder::is_available() {
            tracing::debug!("using rdseed as entropy source");
            seeder = Some(Box::new(RdseedSeeder));
        }
    }

    #[cfg(target_os = "macos")]
    {
        if seeder.is_none() && AppleSecureEnclaveSeeder::is_available() {
            tracing::debug!("using the apple secure enclave as entropy source");
            seeder = Some(Box::new(AppleSecureEnclaveSeeder));
        }
    }

    #[cfg(target_family = "unix")]
    {
        if seeder.is_none() && UnixSeeder::is_available() {
            tracing::debug!("using the kernel entropy source");
            seeder = Some(Box::new(UnixSeeder::new(0)));
        }
    }

    seeder.ok_or_else(|| {
        ErrorKind::EntropySource("no compatible seeder for the current machine".to_string()).into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commons::math::random::ActivatedRandomGenerator;

    #[test]
    fn deterministic_seeder_is_deterministic() {
        let mut a = DeterministicSeeder::<ActivatedRandomGenerator>::new(Seed(5));
        let mut b = DeterministicSeeder::<ActivatedRandomGenerator>::new(Seed(5));
        let first = a.seed();
        assert_eq!(first, b.seed());
        assert_ne!(first, a.seed());
    }

    #[test]
    fn system_seeder_is_found() {
        let mut seeder = new_seeder().unwrap();
        assert_ne!(seeder.seed(), seeder.seed());
    }
}
