//! Conversions between LWE ciphertext arrays and the serialized radix integers of TFHE-rs.
//!
//! The serialized side is the safe serialization of a TFHE-rs `FheUint8` or `FheInt8`, so bytes
//! can be exchanged with any program using the `tfhe` crate. The LWE array side is the `n_cts`
//! block ciphertexts stored contiguously, least significant block first.

use crate::error::{Error, ErrorKind};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use tfhe::core_crypto::prelude::{CiphertextModulus, LweCiphertext};
use tfhe::integer::{IntegerCiphertext, RadixCiphertext, SignedRadixCiphertext};
use tfhe::safe_serialization::{safe_deserialize, safe_serialize};
use tfhe::shortint::ciphertext::{Degree, NoiseLevel};
use tfhe::shortint::parameters::{CarryModulus, MessageModulus};
use tfhe::shortint::{Ciphertext, PBSOrder};
use tfhe::{FheInt8, FheInt8Id, FheUint8, FheUint8Id, Tag};

/// Noise level of a block whose noise is not tracked.
pub const UNKNOWN_NOISE_LEVEL: usize = usize::MAX;

/// The integer types that can cross the boundary, selected once from a width and a signedness.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TfhersIntegerKind {
    Unsigned8,
    Signed8,
}

impl TfhersIntegerKind {
    pub fn new(width: usize, is_signed: bool) -> Result<Self, Error> {
        match (width, is_signed) {
            (8, false) => Ok(Self::Unsigned8),
            (8, true) => Ok(Self::Signed8),
            (width, is_signed) => {
                Err(ErrorKind::UnsupportedIntegerFormat { width, is_signed }.into())
            }
        }
    }

    pub fn width(self) -> usize {
        match self {
            Self::Unsigned8 | Self::Signed8 => 8,
        }
    }

    pub fn is_signed(self) -> bool {
        matches!(self, Self::Signed8)
    }
}

/// The shape and metadata of a serialized integer, shared by all its blocks.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TfhersFheIntDescription {
    pub width: usize,
    pub is_signed: bool,
    pub lwe_size: usize,
    pub n_cts: usize,
    pub degree: usize,
    pub noise_level: usize,
    pub message_modulus: usize,
    pub carry_modulus: usize,
    pub ks_first: bool,
}

impl TfhersFheIntDescription {
    /// The description returned when a buffer cannot be read.
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn kind(&self) -> Result<TfhersIntegerKind, Error> {
        TfhersIntegerKind::new(self.width, self.is_signed)
    }
}

// Safe serialization header: format version, type name and type version, all length prefixed.
const SERIALIZATION_HEADER_BOUND: usize = 1024;
// Per block: versioning tags, ciphertext modulus, degree, noise level, moduli and pbs order.
const BLOCK_METADATA_BOUND: usize = 256;

/// Upper bound of the size of a serialized integer of `n_cts` blocks of `lwe_size`.
pub fn fheint_buffer_size(lwe_size: usize, n_cts: usize) -> usize {
    SERIALIZATION_HEADER_BOUND
        + n_cts * (BLOCK_METADATA_BOUND + lwe_size * core::mem::size_of::<u64>())
}

fn serialization_error(err: impl ToString) -> Error {
    ErrorKind::Serialization(err.to_string()).into()
}

fn deserialize_blocks(data: &[u8], kind: TfhersIntegerKind) -> Result<Vec<Ciphertext>, Error> {
    let limit = data.len() as u64;
    let blocks = match kind {
        TfhersIntegerKind::Unsigned8 => {
            let fheint: FheUint8 = safe_deserialize(data, limit).map_err(serialization_error)?;
            let (radix, _id, _tag) = fheint.into_raw_parts();
            radix.blocks().to_vec()
        }
        TfhersIntegerKind::Signed8 => {
            let fheint: FheInt8 = safe_deserialize(data, limit).map_err(serialization_error)?;
            let (radix, _id, _tag) = fheint.into_raw_parts();
            radix.blocks().to_vec()
        }
    };

    let lwe_size = blocks.first().map_or(0, |block| block.ct.as_ref().len());
    if lwe_size == 0 || blocks.iter().any(|block| block.ct.as_ref().len() != lwe_size) {
        return Err(
            ErrorKind::Serialization("blocks of a radix integer must share their size".into())
                .into(),
        );
    }
    Ok(blocks)
}

fn to_usize(value: u64) -> usize {
    usize::try_from(value).unwrap_or(UNKNOWN_NOISE_LEVEL)
}

fn noise_level_to_usize(noise_level: NoiseLevel) -> usize {
    if noise_level == NoiseLevel::UNKNOWN {
        UNKNOWN_NOISE_LEVEL
    } else {
        to_usize(noise_level.get() as u64)
    }
}

fn noise_level_from_usize(noise_level: usize) -> NoiseLevel {
    if noise_level == UNKNOWN_NOISE_LEVEL {
        return NoiseLevel::UNKNOWN;
    }
    // Levels are only public as multiples of the nominal one.
    let mut level = NoiseLevel::NOMINAL;
    level *= noise_level as _;
    level
}

/// Reads the description of a serialized integer of type `kind`.
pub fn fheint_description(
    data: &[u8],
    kind: TfhersIntegerKind,
) -> Result<TfhersFheIntDescription, Error> {
    let blocks = deserialize_blocks(data, kind)?;
    // Blocks were checked to be non empty.
    let first = &blocks[0];
    Ok(TfhersFheIntDescription {
        width: kind.width(),
        is_signed: kind.is_signed(),
        lwe_size: first.ct.as_ref().len(),
        n_cts: blocks.len(),
        degree: to_usize(first.degree.get() as u64),
        noise_level: noise_level_to_usize(first.noise_level()),
        message_modulus: to_usize(first.message_modulus.0 as u64),
        carry_modulus: to_usize(first.carry_modulus.0 as u64),
        ks_first: first.pbs_order == PBSOrder::KeyswitchBootstrap,
    })
}

/// Copies the blocks of a serialized integer of type `kind` into `lwe_vec_buffer`.
pub fn fheint_to_lwe_array(
    data: &[u8],
    kind: TfhersIntegerKind,
    lwe_vec_buffer: &mut [u64],
) -> Result<(), Error> {
    let blocks = deserialize_blocks(data, kind)?;
    let lwe_size = blocks[0].ct.as_ref().len();
    let required = lwe_size * blocks.len();
    if lwe_vec_buffer.len() < required {
        return Err(ErrorKind::BufferTooSmall {
            required,
            available: lwe_vec_buffer.len(),
        }
        .into());
    }

    for (dst, block) in lwe_vec_buffer.chunks_exact_mut(lwe_size).zip(blocks.iter()) {
        dst.copy_from_slice(block.ct.as_ref());
    }
    Ok(())
}

/// Serializes the `desc.n_cts` ciphertexts of `lwe_vec` as an integer described by `desc` into
/// `buffer`, returning the number of bytes written.
pub fn lwe_array_to_fheint(
    lwe_vec: &[u64],
    buffer: &mut [u8],
    desc: &TfhersFheIntDescription,
) -> Result<usize, Error> {
    let kind = desc.kind()?;
    let required = desc.lwe_size * desc.n_cts;
    if desc.lwe_size == 0 || lwe_vec.len() < required {
        return Err(ErrorKind::BufferTooSmall {
            required,
            available: lwe_vec.len(),
        }
        .into());
    }

    let pbs_order = if desc.ks_first {
        PBSOrder::KeyswitchBootstrap
    } else {
        PBSOrder::BootstrapKeyswitch
    };
    let blocks: Vec<Ciphertext> = lwe_vec[..required]
        .chunks_exact(desc.lwe_size)
        .map(|ct| {
            Ciphertext::new(
                LweCiphertext::from_container(ct.to_vec(), CiphertextModulus::new_native()),
                Degree::new(desc.degree as _),
                noise_level_from_usize(desc.noise_level),
                MessageModulus(desc.message_modulus as _),
                CarryModulus(desc.carry_modulus as _),
                pbs_order,
            )
        })
        .collect();

    let limit = buffer.len() as u64;
    let mut writer = Cursor::new(buffer);
    match kind {
        TfhersIntegerKind::Unsigned8 => {
            let fheint = FheUint8::from_raw_parts(
                RadixCiphertext::from_blocks(blocks),
                FheUint8Id::default(),
                Tag::default(),
            );
            safe_serialize(&fheint, &mut writer, limit).map_err(serialization_error)?;
        }
        TfhersIntegerKind::Signed8 => {
            let fheint = FheInt8::from_raw_parts(
                SignedRadixCiphertext::from_blocks(blocks),
                FheInt8Id::default(),
                Tag::default(),
            );
            safe_serialize(&fheint, &mut writer, limit).map_err(serialization_error)?;
        }
    }
    Ok(writer.position() as usize)
}
