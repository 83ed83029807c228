#![deny(rustdoc::broken_intra_doc_links)]
#![allow(clippy::too_many_arguments)]
//! CPU implementation of the primitives of the TFHE scheme over 64 bits integers.
//!
//! The crate is organized in layers:
//!
//! + [`commons`]: parameters, decomposition, random generators and other helpers shared by the
//!   rest of the crate.
//! + [`entities`]: typed views over the buffers holding keys and ciphertexts.
//! + [`algorithms`]: key generation, encryption, linear algebra and keyswitching in the standard
//!   domain.
//! + [`fft_impl`]: the negacyclic FFT and everything operating in the Fourier domain, most notably
//!   the programmable bootstrap, circuit bootstrap and vertical packing.
//! + [`simulation`]: a noise-only execution of the bit extraction and circuit bootstrap
//!   pipelines.
//! + [`tfhers`] and [`serialization`]: byte formats exchanged with the outside world.
//! + [`c_api`]: the `concrete_cpu_*` C entry points over raw buffers.
//!
//! Operations needing working memory never allocate: they take a [`dyn_stack::PodStack`], whose
//! size is given by the matching `*_scratch` function.

pub mod algorithms;
pub mod c_api;
pub mod commons;
pub mod config;
pub mod entities;
pub mod error;
pub mod fft_impl;
pub mod keyset;
pub mod serialization;
pub mod simulation;
pub mod tfhers;

pub use error::{Error, ErrorKind};

pub mod prelude {
    pub use crate::algorithms::*;
    pub use crate::commons::dispersion::*;
    pub use crate::commons::generators::{
        DeterministicSeeder, EncryptionRandomGenerator, SecretRandomGenerator,
    };
    pub use crate::commons::math::random::{ActivatedRandomGenerator, RandomGenerator};
    pub use crate::commons::parameters::*;
    pub use crate::entities::*;
    pub use crate::fft_impl::bootstrap::*;
    pub use crate::fft_impl::fft::{Fft, FftView};
    pub use crate::fft_impl::ggsw::*;
    pub use crate::fft_impl::wop_pbs::*;
    pub use concrete_csprng::seeders::Seed;
}
