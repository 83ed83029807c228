//! Typed views over the buffers holding the keys and ciphertexts of the scheme.
//!
//! Every entity wraps a [`Container`](crate::commons::traits::Container) of `u64` (or `c64` for
//! the Fourier entities living in [`crate::fft_impl`]) together with the parameters needed to
//! interpret it.

pub mod ggsw_ciphertext;
pub mod glwe_ciphertext;
pub mod glwe_ciphertext_list;
pub mod glwe_secret_key;
pub mod lwe_bootstrap_key;
pub mod lwe_ciphertext;
pub mod lwe_ciphertext_list;
pub mod lwe_keyswitch_key;
pub mod lwe_private_functional_packing_keyswitch_key;
pub mod lwe_private_functional_packing_keyswitch_key_list;
pub mod lwe_secret_key;
pub mod plaintext;
pub mod polynomial;
pub mod polynomial_list;
pub mod seeded_lwe_bootstrap_key;
pub mod seeded_lwe_ciphertext;
pub mod seeded_lwe_keyswitch_key;

pub use ggsw_ciphertext::*;
pub use glwe_ciphertext::*;
pub use glwe_ciphertext_list::*;
pub use glwe_secret_key::*;
pub use lwe_bootstrap_key::*;
pub use lwe_ciphertext::*;
pub use lwe_ciphertext_list::*;
pub use lwe_keyswitch_key::*;
pub use lwe_private_functional_packing_keyswitch_key::*;
pub use lwe_private_functional_packing_keyswitch_key_list::*;
pub use lwe_secret_key::*;
pub use plaintext::*;
pub use polynomial::*;
pub use polynomial_list::*;
pub use seeded_lwe_bootstrap_key::*;
pub use seeded_lwe_ciphertext::*;
pub use seeded_lwe_keyswitch_key::*;
