//! Byte format of the GLWE secret keys.
//!
//! A key is encoded with `bincode` as its GLWE dimension, its polynomial size and its
//! coefficients, each as a little endian `u64`, the coefficients being prefixed by their count.

use crate::commons::parameters::{GlweDimension, PolynomialSize};
use crate::commons::traits::Container;
use crate::entities::{GlweSecretKey, GlweSecretKeyOwned};
use crate::error::{Error, ErrorKind};
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct SerializableGlweSecretKey<'a> {
    glwe_dimension: u64,
    polynomial_size: u64,
    data: &'a [u64],
}

#[derive(Deserialize)]
struct DeserializedGlweSecretKey {
    glwe_dimension: u64,
    polynomial_size: u64,
    data: Vec<u64>,
}

const HEADER_SIZE: usize = 3 * core::mem::size_of::<u64>();

/// Returns the number of bytes of a serialized GLWE secret key.
pub fn glwe_secret_key_buffer_size(
    glwe_dimension: GlweDimension,
    polynomial_size: PolynomialSize,
) -> usize {
    HEADER_SIZE + core::mem::size_of::<u64>() * glwe_dimension.0 * polynomial_size.0
}

/// Serializes `glwe_sk` into `buffer`, returning the number of bytes written.
pub fn serialize_glwe_secret_key<C: Container<Element = u64>>(
    glwe_sk: &GlweSecretKey<C>,
    buffer: &mut [u8],
) -> Result<usize, Error> {
    let required = glwe_secret_key_buffer_size(glwe_sk.glwe_dimension(), glwe_sk.polynomial_size());
    if buffer.len() < required {
        return Err(ErrorKind::BufferTooSmall {
            required,
            available: buffer.len(),
        }
        .into());
    }

    let serializable = SerializableGlweSecretKey {
        glwe_dimension: glwe_sk.glwe_dimension().0 as u64,
        polynomial_size: glwe_sk.polynomial_size().0 as u64,
        data: glwe_sk.as_ref(),
    };
    let mut writer = &mut buffer[..];
    bincode::serialize_into(&mut writer, &serializable)?;
    Ok(required)
}

/// Deserializes a GLWE secret key serialized by [`serialize_glwe_secret_key`].
pub fn deserialize_glwe_secret_key(buffer: &[u8]) -> Result<GlweSecretKeyOwned, Error> {
    let deserialized: DeserializedGlweSecretKey = bincode::deserialize(buffer)?;

    let glwe_dimension = usize::try_from(deserialized.glwe_dimension)
        .map_err(|e| ErrorKind::Serialization(e.to_string()))?;
    let polynomial_size = usize::try_from(deserialized.polynomial_size)
        .map_err(|e| ErrorKind::Serialization(e.to_string()))?;

    if polynomial_size == 0
        || glwe_dimension == 0
        || glwe_dimension.checked_mul(polynomial_size) != Some(deserialized.data.len())
    {
        return Err(ErrorKind::Serialization(format!(
            "inconsistent glwe secret key: dimension {glwe_dimension}, polynomial size \
            {polynomial_size}, {} coefficients",
            deserialized.data.len()
        ))
        .into());
    }

    Ok(GlweSecretKey::from_container(
        deserialized.data,
        PolynomialSize(polynomial_size),
    ))
}

/// Deserializes a GLWE secret key into `key_buffer`, returning the number of coefficients
/// written.
pub fn deserialize_glwe_secret_key_into(
    buffer: &[u8],
    key_buffer: &mut [u64],
) -> Result<usize, Error> {
    let glwe_sk = deserialize_glwe_secret_key(buffer)?;
    let key = glwe_sk.as_ref();
    let available = key_buffer.len();
    let dst = key_buffer
        .get_mut(..key.len())
        .ok_or(ErrorKind::BufferTooSmall {
            required: key.len(),
            available,
        })?;
    dst.copy_from_slice(key);
    Ok(key.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::allocate_and_generate_new_binary_glwe_secret_key;
    use crate::commons::test_tools::new_secret_random_generator;

    fn key() -> GlweSecretKeyOwned {
        allocate_and_generate_new_binary_glwe_secret_key(
            GlweDimension(2),
            PolynomialSize(256),
            &mut new_secret_random_generator(),
        )
    }

    #[test]
    fn serialized_key_fills_the_announced_size() {
        let glwe_sk = key();
        let size = glwe_secret_key_buffer_size(GlweDimension(2), PolynomialSize(256));
        let mut buffer = vec![0u8; size + 16];
        assert_eq!(serialize_glwe_secret_key(&glwe_sk, &mut buffer).unwrap(), size);
        assert_eq!(buffer[..8], 2u64.to_le_bytes());
        assert_eq!(buffer[8..16], 256u64.to_le_bytes());
        assert_eq!(buffer[16..24], 512u64.to_le_bytes());

        let recovered = deserialize_glwe_secret_key(&buffer[..size]).unwrap();
        assert_eq!(recovered, glwe_sk);
    }

    #[test]
    fn too_small_buffers_are_rejected() {
        let glwe_sk = key();
        let mut buffer = vec![0u8; 100];
        let err = serialize_glwe_secret_key(&glwe_sk, &mut buffer).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::BufferTooSmall { .. }));

        let size = glwe_secret_key_buffer_size(GlweDimension(2), PolynomialSize(256));
        let mut buffer = vec![0u8; size];
        serialize_glwe_secret_key(&glwe_sk, &mut buffer).unwrap();
        let mut key_buffer = vec![0u64; 511];
        let err = deserialize_glwe_secret_key_into(&buffer, &mut key_buffer).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::BufferTooSmall { .. }));

        let mut key_buffer = vec![0u64; 512];
        assert_eq!(
            deserialize_glwe_secret_key_into(&buffer, &mut key_buffer).unwrap(),
            512
        );
        assert_eq!(key_buffer, glwe_sk.as_ref());
    }

    #[test]
    fn malformed_buffers_are_rejected() {
        assert!(deserialize_glwe_secret_key(&[1, 2, 3]).is_err());

        let inconsistent = SerializableGlweSecretKey {
            glwe_dimension: 2,
            polynomial_size: 256,
            data: &[0; 10],
        };
        let bytes = bincode::serialize(&inconsistent).unwrap();
        let err = deserialize_glwe_secret_key(&bytes).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Serialization(_)));
    }
}
