//! Module containing primitives pertaining to the generation of
//! [`GLWE secret keys`](`GlweSecretKey`).

use crate::commons::generators::SecretRandomGenerator;
use crate::commons::math::random::ByteRandomGenerator;
use crate::commons::parameters::{GlweDimension, PolynomialSize};
use crate::commons::traits::ContainerMut;
use crate::entities::{GlweSecretKey, GlweSecretKeyOwned};

/// Allocate a new [`GLWE secret key`](`GlweSecretKey`) and fill it with uniformly random binary
/// coefficients.
pub fn allocate_and_generate_new_binary_glwe_secret_key<Gen>(
    glwe_dimension: GlweDimension,
    polynomial_size: PolynomialSize,
    generator: &mut SecretRandomGenerator<Gen>,
) -> GlweSecretKeyOwned
where
    Gen: ByteRandomGenerator,
{
    let mut glwe_secret_key = GlweSecretKeyOwned::new(0, glwe_dimension, polynomial_size);

    generate_binary_glwe_secret_key(&mut glwe_secret_key, generator);

    glwe_secret_key
}

/// Fill a [`GLWE secret key`](`GlweSecretKey`) with uniformly random binary coefficients.
///
/// The key consumes the generator exactly like an LWE secret key of dimension `k * N`.
pub fn generate_binary_glwe_secret_key<KeyCont, Gen>(
    glwe_secret_key: &mut GlweSecretKey<KeyCont>,
    generator: &mut SecretRandomGenerator<Gen>,
) where
    KeyCont: ContainerMut<Element = u64>,
    Gen: ByteRandomGenerator,
{
    generator.fill_slice_with_random_uniform_binary(glwe_secret_key.as_mut())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::allocate_and_generate_new_binary_lwe_secret_key;
    use crate::commons::math::random::{ActivatedRandomGenerator, Seed};
    use crate::commons::parameters::LweDimension;

    #[test]
    fn glwe_key_matches_flattened_lwe_key() {
        let mut gen_0 = SecretRandomGenerator::<ActivatedRandomGenerator>::new(Seed(3));
        let mut gen_1 = SecretRandomGenerator::<ActivatedRandomGenerator>::new(Seed(3));
        let glwe_key = allocate_and_generate_new_binary_glwe_secret_key(
            GlweDimension(2),
            PolynomialSize(256),
            &mut gen_0,
        );
        let lwe_key = allocate_and_generate_new_binary_lwe_secret_key(LweDimension(512), &mut gen_1);

        assert_eq!(glwe_key.as_lwe_secret_key().as_ref(), lwe_key.as_ref());
    }
}
