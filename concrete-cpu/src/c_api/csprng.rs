use super::utils::{nounwind, Uint128};
use crate::commons::generators::{
    new_seeder, DeterministicSeeder, EncryptionRandomGenerator, SecretRandomGenerator,
};
use crate::commons::math::random::{ActivatedRandomGenerator, RandomGenerator, Seed, Seeder};
use crate::error::Error;
use std::os::raw::c_int;

/// General purpose generator, used to sample the noises of the simulation.
pub type Csprng = RandomGenerator<ActivatedRandomGenerator>;
/// Generator of the masks and noises of encryptions.
pub type EncCsprng = EncryptionRandomGenerator<ActivatedRandomGenerator>;
/// Generator of secret keys.
pub type SecCsprng = SecretRandomGenerator<ActivatedRandomGenerator>;

#[no_mangle]
pub static CSPRNG_SIZE: usize = core::mem::size_of::<Csprng>();
#[no_mangle]
pub static CSPRNG_ALIGN: usize = core::mem::align_of::<Csprng>();

#[no_mangle]
pub static ENCRYPTION_CSPRNG_SIZE: usize = core::mem::size_of::<EncCsprng>();
#[no_mangle]
pub static ENCRYPTION_CSPRNG_ALIGN: usize = core::mem::align_of::<EncCsprng>();

#[no_mangle]
pub static SECRET_CSPRNG_SIZE: usize = core::mem::size_of::<SecCsprng>();
#[no_mangle]
pub static SECRET_CSPRNG_ALIGN: usize = core::mem::align_of::<SecCsprng>();

/// Builds the generator of the encryptions seeded by `seed`.
///
/// The mask stream and the noise stream are seeded by two successive outputs of a deterministic
/// seeder expanding `seed`.
pub fn new_encryption_csprng(seed: Seed) -> EncCsprng {
    let mut seeder = DeterministicSeeder::<ActivatedRandomGenerator>::new(seed);
    EncryptionRandomGenerator::new(seeder.seed(), &mut seeder)
}

/// # Safety
///
/// `mem` must be valid for writes of [`CSPRNG_SIZE`] bytes, aligned to [`CSPRNG_ALIGN`].
#[no_mangle]
pub unsafe extern "C" fn concrete_cpu_construct_csprng(mem: *mut Csprng, seed: Uint128) {
    nounwind(|| mem.write(Csprng::new(seed.into())))
}

/// # Safety
///
/// `mem` must point to a generator built by [`concrete_cpu_construct_csprng`] and not yet
/// destroyed.
#[no_mangle]
pub unsafe extern "C" fn concrete_cpu_destroy_csprng(mem: *mut Csprng) {
    nounwind(|| core::ptr::drop_in_place(mem))
}

/// # Safety
///
/// `mem` must be valid for writes of [`ENCRYPTION_CSPRNG_SIZE`] bytes, aligned to
/// [`ENCRYPTION_CSPRNG_ALIGN`].
#[no_mangle]
pub unsafe extern "C" fn concrete_cpu_construct_encryption_csprng(
    mem: *mut EncCsprng,
    seed: Uint128,
) {
    nounwind(|| mem.write(new_encryption_csprng(seed.into())))
}

/// # Safety
///
/// `mem` must point to a generator built by [`concrete_cpu_construct_encryption_csprng`] and not
/// yet destroyed.
#[no_mangle]
pub unsafe extern "C" fn concrete_cpu_destroy_encryption_csprng(mem: *mut EncCsprng) {
    nounwind(|| core::ptr::drop_in_place(mem))
}

/// # Safety
///
/// `mem` must be valid for writes of [`SECRET_CSPRNG_SIZE`] bytes, aligned to
/// [`SECRET_CSPRNG_ALIGN`].
#[no_mangle]
pub unsafe extern "C" fn concrete_cpu_construct_secret_csprng(mem: *mut SecCsprng, seed: Uint128) {
    nounwind(|| mem.write(SecCsprng::new(seed.into())))
}

/// # Safety
///
/// `mem` must point to a generator built by [`concrete_cpu_construct_secret_csprng`] and not yet
/// destroyed.
#[no_mangle]
pub unsafe extern "C" fn concrete_cpu_destroy_secret_csprng(mem: *mut SecCsprng) {
    nounwind(|| core::ptr::drop_in_place(mem))
}

/// Draws a seed from the entropy source of the machine.
pub fn crypto_secure_random_128() -> Result<Seed, Error> {
    let mut seeder = new_seeder()?;
    Ok(seeder.try_seed()?)
}

/// Writes 128 random bits from the entropy source of the machine to `u128`.
///
/// Returns 1 on success and 0 when no entropy source is available, `u128` being left untouched.
///
/// # Safety
///
/// `u128` must be valid for writes.
#[no_mangle]
pub unsafe extern "C" fn concrete_cpu_crypto_secure_random_128(u128: *mut Uint128) -> c_int {
    nounwind(|| match crypto_secure_random_128() {
        Ok(seed) => {
            *u128 = seed.into();
            1
        }
        Err(err) => {
            tracing::error!("cannot draw a secure seed: {err}");
            0
        }
    })
}

/// Fills `buffer` with torus values drawn from a centered gaussian of variance `variance`.
///
/// # Safety
///
/// `buffer` must be valid for writes of `size` values, `csprng` must point to a live generator.
#[no_mangle]
pub unsafe extern "C" fn concrete_cpu_fill_with_random_gaussian(
    buffer: *mut u64,
    size: usize,
    variance: f64,
    csprng: *mut Csprng,
) {
    nounwind(|| {
        let buffer = core::slice::from_raw_parts_mut(buffer, size);
        (*csprng).fill_slice_with_random_gaussian(buffer, 0.0, variance.sqrt());
    })
}
