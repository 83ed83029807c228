//! Scalars before encryption.

/// An encoded message, ready to be encrypted.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Plaintext(pub u64);

/// A clear integer, used to multiply ciphertexts.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Cleartext(pub u64);
