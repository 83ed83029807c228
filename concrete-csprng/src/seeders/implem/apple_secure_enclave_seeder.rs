use crate::seeders::{Seed, Seeder, SeederError};

/// Bindings to the randomization services of Apple's `Security` framework, which draw from the
/// Secure Enclave.
mod secure_enclave {
    pub enum __SecRandom {}
    pub type SecRandomRef = *const __SecRandom;
    use libc::{c_int, c_void};

    #[link(name = "Security", kind = "framework")]
    extern "C" {
        pub static kSecRandomDefault: SecRandomRef;

        pub fn SecRandomCopyBytes(rnd: SecRandomRef, count: usize, bytes: *mut c_void) -> c_int;
    }

    pub fn generate_random_bytes(bytes: &mut [u8]) -> std::io::Result<()> {
        // SAFETY: the pointer and length describe a valid mutable byte slice.
        let res = unsafe {
            SecRandomCopyBytes(
                kSecRandomDefault,
                bytes.len(),
                bytes.as_mut_ptr() as *mut c_void,
            )
        };
        if res == 0 {
            Ok(())
        } else {
            Err(std::io::Error::last_os_error())
        }
    }
}

/// A seeder backed by `SecRandomCopyBytes`, available on every supported macOS version.
pub struct AppleSecureEnclaveSeeder;

impl Seeder for AppleSecureEnclaveSeeder {
    fn try_seed(&mut self) -> Result<Seed, SeederError> {
        let mut bytes = [0u8; 16];
        secure_enclave::generate_random_bytes(&mut bytes)
            .map_err(|err| SeederError(err.to_string()))?;
        Ok(Seed::from_le_bytes(bytes))
    }

    fn is_available() -> bool {
        cfg!(target_os = "macos")
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::seeders::generic_tests::check_seeder_fixed_sequences_different;

    #[test]
    fn check_bounded_sequence_difference() {
        check_seeder_fixed_sequences_different(|_| AppleSecureEnclaveSeeder);
    }
}
