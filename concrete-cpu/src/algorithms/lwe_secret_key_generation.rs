//! Module containing primitives pertaining to the generation of
//! [`LWE secret keys`](`LweSecretKey`).

use crate::commons::generators::SecretRandomGenerator;
use crate::commons::math::random::ByteRandomGenerator;
use crate::commons::parameters::LweDimension;
use crate::commons::traits::ContainerMut;
use crate::entities::{LweSecretKey, LweSecretKeyOwned};

/// Allocate a new [`LWE secret key`](`LweSecretKey`) and fill it with uniformly random binary
/// coefficients.
pub fn allocate_and_generate_new_binary_lwe_secret_key<Gen>(
    lwe_dimension: LweDimension,
    generator: &mut SecretRandomGenerator<Gen>,
) -> LweSecretKeyOwned
where
    Gen: ByteRandomGenerator,
{
    let mut lwe_secret_key = LweSecretKeyOwned::new(0, lwe_dimension);

    generate_binary_lwe_secret_key(&mut lwe_secret_key, generator);

    lwe_secret_key
}

/// Fill an [`LWE secret key`](`LweSecretKey`) with uniformly random binary coefficients.
pub fn generate_binary_lwe_secret_key<KeyCont, Gen>(
    lwe_secret_key: &mut LweSecretKey<KeyCont>,
    generator: &mut SecretRandomGenerator<Gen>,
) where
    KeyCont: ContainerMut<Element = u64>,
    Gen: ByteRandomGenerator,
{
    generator.fill_slice_with_random_uniform_binary(lwe_secret_key.as_mut())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commons::math::random::{ActivatedRandomGenerator, Seed};

    #[test]
    fn binary_keys_are_binary_and_reproducible() {
        let mut gen_0 = SecretRandomGenerator::<ActivatedRandomGenerator>::new(Seed(7));
        let mut gen_1 = SecretRandomGenerator::<ActivatedRandomGenerator>::new(Seed(7));
        let key_0 = allocate_and_generate_new_binary_lwe_secret_key(LweDimension(600), &mut gen_0);
        let key_1 = allocate_and_generate_new_binary_lwe_secret_key(LweDimension(600), &mut gen_1);

        assert_eq!(key_0, key_1);
        assert!(key_0.as_ref().iter().all(|&bit| bit <= 1));
        assert!(key_0.as_ref().iter().any(|&bit| bit == 1));
    }
}
