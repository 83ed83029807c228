//! Module containing primitives pertaining to [`LWE ciphertext`](`LweCiphertext`) linear algebra,
//! like addition, multiplication, etc.

use crate::algorithms::slice_algorithms::*;
use crate::commons::traits::{Container, ContainerMut};
use crate::entities::*;

/// Add the right-hand side [`LWE ciphertext`](`LweCiphertext`) to the left-hand side one.
pub fn lwe_ciphertext_add_assign<LhsCont, RhsCont>(
    lhs: &mut LweCiphertext<LhsCont>,
    rhs: &LweCiphertext<RhsCont>,
) where
    LhsCont: ContainerMut<Element = u64>,
    RhsCont: Container<Element = u64>,
{
    slice_wrapping_add_assign(lhs.as_mut(), rhs.as_ref());
}

/// Add two [`LWE ciphertexts`](`LweCiphertext`) into an output one.
pub fn lwe_ciphertext_add<OutputCont, LhsCont, RhsCont>(
    output: &mut LweCiphertext<OutputCont>,
    lhs: &LweCiphertext<LhsCont>,
    rhs: &LweCiphertext<RhsCont>,
) where
    OutputCont: ContainerMut<Element = u64>,
    LhsCont: Container<Element = u64>,
    RhsCont: Container<Element = u64>,
{
    slice_wrapping_add(output.as_mut(), lhs.as_ref(), rhs.as_ref());
}

/// Subtract the right-hand side [`LWE ciphertext`](`LweCiphertext`) from the left-hand side one.
pub fn lwe_ciphertext_sub_assign<LhsCont, RhsCont>(
    lhs: &mut LweCiphertext<LhsCont>,
    rhs: &LweCiphertext<RhsCont>,
) where
    LhsCont: ContainerMut<Element = u64>,
    RhsCont: Container<Element = u64>,
{
    slice_wrapping_sub_assign(lhs.as_mut(), rhs.as_ref());
}

/// Add a plaintext to the body of an [`LWE ciphertext`](`LweCiphertext`).
pub fn lwe_ciphertext_plaintext_add_assign<InCont>(lhs: &mut LweCiphertext<InCont>, rhs: Plaintext)
where
    InCont: ContainerMut<Element = u64>,
{
    let body = lhs.get_mut_body();

    *body = (*body).wrapping_add(rhs.0);
}

/// Compute the opposite of an [`LWE ciphertext`](`LweCiphertext`).
pub fn lwe_ciphertext_opposite_assign<InCont>(ct: &mut LweCiphertext<InCont>)
where
    InCont: ContainerMut<Element = u64>,
{
    slice_wrapping_opposite_assign(ct.as_mut());
}

/// Multiply an [`LWE ciphertext`](`LweCiphertext`) by a cleartext.
pub fn lwe_ciphertext_cleartext_mul_assign<InCont>(lhs: &mut LweCiphertext<InCont>, rhs: Cleartext)
where
    InCont: ContainerMut<Element = u64>,
{
    slice_wrapping_scalar_mul_assign(lhs.as_mut(), rhs.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::*;
    use crate::commons::dispersion::Variance;
    use crate::commons::parameters::LweDimension;
    use crate::commons::test_tools::*;

    #[test]
    fn homomorphic_linear_operations() {
        let variance = Variance(0.000_000_000_000_000_221_486_881_160_226_5);
        let mut secret_generator = new_secret_random_generator();
        let mut encryption_generator = new_encryption_random_generator();
        let key = allocate_and_generate_new_binary_lwe_secret_key(LweDimension(742), &mut secret_generator);

        let mut encrypt = |msg: u64| {
            allocate_and_encrypt_new_lwe_ciphertext(
                &key,
                Plaintext(encode(msg, 5)),
                variance,
                &mut encryption_generator,
            )
        };
        let mut ct_3 = encrypt(3);
        let ct_5 = encrypt(5);
        let decrypt = |ct: &LweCiphertextOwned| decode(decrypt_lwe_ciphertext(&key, ct).0, 5);

        let mut sum = LweCiphertextOwned::new(0, ct_3.lwe_size());
        lwe_ciphertext_add(&mut sum, &ct_3, &ct_5);
        assert_eq!(decrypt(&sum), 8);

        lwe_ciphertext_sub_assign(&mut sum, &ct_5);
        assert_eq!(decrypt(&sum), 3);

        lwe_ciphertext_add_assign(&mut sum, &ct_5);
        lwe_ciphertext_plaintext_add_assign(&mut sum, Plaintext(encode(1, 5)));
        assert_eq!(decrypt(&sum), 9);

        lwe_ciphertext_cleartext_mul_assign(&mut ct_3, Cleartext(3));
        assert_eq!(decrypt(&ct_3), 9);

        lwe_ciphertext_opposite_assign(&mut ct_3);
        assert_eq!(decrypt(&ct_3), 32 - 9);
    }
}
