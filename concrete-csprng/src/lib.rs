#![deny(rustdoc::broken_intra_doc_links)]
//! Cryptographically secure pseudo random number generation.
//!
//! The crate exposes two things:
//!
//! + [`generators`]: deterministic generators producing a byte stream out of a [`seeders::Seed`].
//!   The only implementation is an AES-128 counter mode generator, which can be split ("forked")
//!   into children owning disjoint parts of the counter space.
//! + [`seeders`]: sources of fresh seeds drawn from the operating system or the cpu.
//!
//! Forking is what makes it possible to produce the same stream of bytes whether the consumers
//! run sequentially or in parallel: every child is given a fixed slice of the parent stream.
pub mod generators;
pub mod seeders;
