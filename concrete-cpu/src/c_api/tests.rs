use super::bootstrap::*;
use super::csprng::*;
use super::encrypt::*;
use super::fft::*;
use super::keyswitch::*;
use super::linear_op::*;
use super::secret_key::*;
use super::simulation::*;
use super::tfhers::*;
use super::utils::{debug_check_stack, ok_or_log, ScratchStatus, Uint128};
use super::wop_pbs::*;
use crate::commons::parameters::{GlweSize, Parallelism, PolynomialSize};
use crate::fft_impl::bootstrap::bootstrap_scratch;
use crate::commons::test_tools::{decode, encode, random_seed};
use crate::error::{Error, ErrorKind};
use crate::tfhers::TfhersFheIntDescription;
use core::mem::MaybeUninit;
use dyn_stack::{GlobalPodBuffer, StackReq};
use tfhe_fft::c64;

const MESSAGE_BITS: usize = 5;
const VARIANCE: f64 = 0.000_000_000_000_000_29 * 0.000_000_000_000_000_29;

fn seed() -> Uint128 {
    random_seed().into()
}

struct SecretGenerator(MaybeUninit<SecCsprng>);

impl SecretGenerator {
    fn new() -> Self {
        let mut mem = MaybeUninit::uninit();
        unsafe { concrete_cpu_construct_secret_csprng(mem.as_mut_ptr(), seed()) };
        Self(mem)
    }

    fn ptr(&mut self) -> *mut SecCsprng {
        self.0.as_mut_ptr()
    }
}

impl Drop for SecretGenerator {
    fn drop(&mut self) {
        unsafe { concrete_cpu_destroy_secret_csprng(self.0.as_mut_ptr()) }
    }
}

struct EncryptionGenerator(MaybeUninit<EncCsprng>);

impl EncryptionGenerator {
    fn new() -> Self {
        let mut mem = MaybeUninit::uninit();
        unsafe { concrete_cpu_construct_encryption_csprng(mem.as_mut_ptr(), seed()) };
        Self(mem)
    }

    fn ptr(&mut self) -> *mut EncCsprng {
        self.0.as_mut_ptr()
    }
}

impl Drop for EncryptionGenerator {
    fn drop(&mut self) {
        unsafe { concrete_cpu_destroy_encryption_csprng(self.0.as_mut_ptr()) }
    }
}

struct FftHandle(MaybeUninit<Fft>);

impl FftHandle {
    fn new(polynomial_size: usize) -> Self {
        let mut mem = MaybeUninit::uninit();
        unsafe { concrete_cpu_construct_concrete_fft(mem.as_mut_ptr(), polynomial_size) };
        Self(mem)
    }

    fn ptr(&self) -> *const Fft {
        self.0.as_ptr()
    }
}

impl Drop for FftHandle {
    fn drop(&mut self) {
        unsafe { concrete_cpu_destroy_concrete_fft(self.0.as_mut_ptr()) }
    }
}

fn secret_key(dimension: usize, generator: &mut SecretGenerator) -> Vec<u64> {
    let mut sk = vec![0u64; concrete_cpu_lwe_secret_key_size_u64(dimension)];
    unsafe { concrete_cpu_init_secret_key_u64(sk.as_mut_ptr(), dimension, generator.ptr()) };
    sk
}

fn encrypt(sk: &[u64], message: u64, generator: &mut EncryptionGenerator) -> Vec<u64> {
    let mut ct = vec![0u64; concrete_cpu_lwe_ciphertext_size_u64(sk.len())];
    unsafe {
        concrete_cpu_encrypt_lwe_ciphertext_u64(
            sk.as_ptr(),
            ct.as_mut_ptr(),
            encode(message, MESSAGE_BITS),
            sk.len(),
            VARIANCE,
            generator.ptr(),
        )
    };
    ct
}

fn decrypt(sk: &[u64], ct: &[u64]) -> u64 {
    let mut plaintext = 0;
    unsafe {
        concrete_cpu_decrypt_lwe_ciphertext_u64(sk.as_ptr(), ct.as_ptr(), sk.len(), &mut plaintext)
    };
    decode(plaintext, MESSAGE_BITS) % (1 << (MESSAGE_BITS - 1))
}

fn stack(scratch: impl FnOnce(*mut usize, *mut usize) -> ScratchStatus) -> GlobalPodBuffer {
    let mut size = 0;
    let mut align = 0;
    assert_eq!(scratch(&mut size, &mut align), ScratchStatus::Valid);
    GlobalPodBuffer::new(StackReq::try_new_aligned::<u8>(size, align).unwrap())
}

#[test]
fn encrypt_decrypt_and_linear_operations() {
    let mut secret_generator = SecretGenerator::new();
    let mut encryption_generator = EncryptionGenerator::new();
    let dimension = 600;
    let sk = secret_key(dimension, &mut secret_generator);

    let mut lhs = encrypt(&sk, 3, &mut encryption_generator);
    let rhs = encrypt(&sk, 4, &mut encryption_generator);
    assert_eq!(decrypt(&sk, &lhs), 3);

    let mut sum = vec![0u64; lhs.len()];
    unsafe {
        concrete_cpu_add_lwe_ciphertext_u64(sum.as_mut_ptr(), lhs.as_ptr(), rhs.as_ptr(), dimension)
    };
    assert_eq!(decrypt(&sk, &sum), 7);

    let sum_ptr = sum.as_mut_ptr();
    unsafe {
        concrete_cpu_add_plaintext_lwe_ciphertext_u64(
            sum_ptr,
            sum_ptr,
            encode(2, MESSAGE_BITS),
            dimension,
        )
    };
    assert_eq!(decrypt(&sk, &sum), 9);

    let lhs_ptr = lhs.as_mut_ptr();
    unsafe { concrete_cpu_mul_cleartext_lwe_ciphertext_u64(lhs_ptr, lhs_ptr, 5, dimension) };
    assert_eq!(decrypt(&sk, &lhs), 15);

    let mut negated = vec![0u64; lhs.len()];
    unsafe { concrete_cpu_negate_lwe_ciphertext_u64(negated.as_mut_ptr(), rhs.as_ptr(), dimension) };
    assert_eq!(decrypt(&sk, &negated), 16 - 4);

    // Adding a ciphertext to itself in place.
    let mut doubled = encrypt(&sk, 6, &mut encryption_generator);
    let doubled_ptr = doubled.as_mut_ptr();
    unsafe { concrete_cpu_add_lwe_ciphertext_u64(doubled_ptr, doubled_ptr, doubled_ptr, dimension) };
    assert_eq!(decrypt(&sk, &doubled), 12);
}

#[test]
fn seeded_encryption_decompresses_to_a_valid_ciphertext() {
    let mut secret_generator = SecretGenerator::new();
    let dimension = 600;
    let sk = secret_key(dimension, &mut secret_generator);
    let compression_seed = seed();

    let mut body = 0u64;
    unsafe {
        concrete_cpu_encrypt_seeded_lwe_ciphertext_u64(
            sk.as_ptr(),
            &mut body,
            encode(11, MESSAGE_BITS),
            dimension,
            compression_seed,
            VARIANCE,
        )
    };

    let mut ct = vec![0u64; concrete_cpu_lwe_ciphertext_size_u64(dimension)];
    unsafe {
        concrete_cpu_decompress_seeded_lwe_ciphertext_u64(
            ct.as_mut_ptr(),
            &body,
            dimension,
            compression_seed,
        )
    };
    assert_eq!(*ct.last().unwrap(), body);
    assert_eq!(decrypt(&sk, &ct), 11);
}

#[test]
fn keyswitch_between_keys() {
    let mut secret_generator = SecretGenerator::new();
    let mut encryption_generator = EncryptionGenerator::new();
    let (input_dimension, output_dimension) = (1024, 600);
    let (level, base_log) = (3, 8);

    let input_sk = secret_key(input_dimension, &mut secret_generator);
    let output_sk = secret_key(output_dimension, &mut secret_generator);

    let mut ksk =
        vec![0u64; concrete_cpu_keyswitch_key_size_u64(level, input_dimension, output_dimension)];
    unsafe {
        concrete_cpu_init_lwe_keyswitch_key_u64(
            ksk.as_mut_ptr(),
            input_sk.as_ptr(),
            output_sk.as_ptr(),
            input_dimension,
            output_dimension,
            level,
            base_log,
            VARIANCE,
            encryption_generator.ptr(),
        )
    };

    for message in [0, 5, 15] {
        let ct_in = encrypt(&input_sk, message, &mut encryption_generator);
        let mut ct_out = vec![0u64; concrete_cpu_lwe_ciphertext_size_u64(output_dimension)];
        unsafe {
            concrete_cpu_keyswitch_lwe_ciphertext_u64(
                ct_out.as_mut_ptr(),
                ct_in.as_ptr(),
                ksk.as_ptr(),
                level,
                base_log,
                input_dimension,
                output_dimension,
            )
        };
        assert_eq!(decrypt(&output_sk, &ct_out), message);
    }
}

#[test]
fn seeded_keyswitch_key_decompresses_to_a_working_key() {
    let mut secret_generator = SecretGenerator::new();
    let mut encryption_generator = EncryptionGenerator::new();
    let (input_dimension, output_dimension) = (1024, 600);
    let (level, base_log) = (3, 8);
    let compression_seed = seed();

    let input_sk = secret_key(input_dimension, &mut secret_generator);
    let output_sk = secret_key(output_dimension, &mut secret_generator);

    let mut seeded_ksk =
        vec![0u64; concrete_cpu_seeded_keyswitch_key_size_u64(level, input_dimension)];
    unsafe {
        concrete_cpu_init_seeded_lwe_keyswitch_key_u64(
            seeded_ksk.as_mut_ptr(),
            input_sk.as_ptr(),
            output_sk.as_ptr(),
            input_dimension,
            output_dimension,
            level,
            base_log,
            compression_seed,
            VARIANCE,
        )
    };

    let decompress = |parallelism| {
        let mut ksk = vec![
            0u64;
            concrete_cpu_keyswitch_key_size_u64(level, input_dimension, output_dimension)
        ];
        unsafe {
            concrete_cpu_decompress_seeded_lwe_keyswitch_key_u64(
                ksk.as_mut_ptr(),
                seeded_ksk.as_ptr(),
                input_dimension,
                output_dimension,
                level,
                base_log,
                compression_seed,
                parallelism,
            )
        };
        ksk
    };
    let ksk = decompress(Parallelism::No);
    assert_eq!(ksk, decompress(Parallelism::Rayon));

    let ct_in = encrypt(&input_sk, 9, &mut encryption_generator);
    let mut ct_out = vec![0u64; concrete_cpu_lwe_ciphertext_size_u64(output_dimension)];
    unsafe {
        concrete_cpu_keyswitch_lwe_ciphertext_u64(
            ct_out.as_mut_ptr(),
            ct_in.as_ptr(),
            ksk.as_ptr(),
            level,
            base_log,
            input_dimension,
            output_dimension,
        )
    };
    assert_eq!(decrypt(&output_sk, &ct_out), 9);
}

#[test]
fn bootstrap_through_raw_buffers() {
    let mut secret_generator = SecretGenerator::new();
    let mut encryption_generator = EncryptionGenerator::new();
    let (lwe_dimension, glwe_dimension, polynomial_size) = (100, 1, 1024);
    let (level, base_log) = (2, 15);

    let lwe_sk = secret_key(lwe_dimension, &mut secret_generator);
    let glwe_sk = secret_key(
        concrete_cpu_glwe_secret_key_size_u64(glwe_dimension, polynomial_size),
        &mut secret_generator,
    );

    let mut bsk = vec![
        0u64;
        concrete_cpu_bootstrap_key_size_u64(
            level,
            glwe_dimension,
            polynomial_size,
            lwe_dimension
        )
    ];
    unsafe {
        concrete_cpu_init_lwe_bootstrap_key_u64(
            bsk.as_mut_ptr(),
            lwe_sk.as_ptr(),
            glwe_sk.as_ptr(),
            lwe_dimension,
            polynomial_size,
            glwe_dimension,
            level,
            base_log,
            VARIANCE,
            Parallelism::Rayon,
            encryption_generator.ptr(),
        )
    };

    let fft = FftHandle::new(polynomial_size);
    let mut fourier_bsk = vec![
        c64::default();
        concrete_cpu_fourier_bootstrap_key_size_u64(
            level,
            glwe_dimension,
            polynomial_size,
            lwe_dimension
        )
    ];
    let mut mem = stack(|size, align| unsafe {
        concrete_cpu_bootstrap_key_convert_u64_to_fourier_scratch(size, align, fft.ptr())
    });
    unsafe {
        concrete_cpu_bootstrap_key_convert_u64_to_fourier(
            bsk.as_ptr(),
            fourier_bsk.as_mut_ptr(),
            level,
            base_log,
            glwe_dimension,
            polynomial_size,
            lwe_dimension,
            fft.ptr(),
            mem.as_mut_ptr(),
            mem.len(),
        )
    };

    // Trivial accumulator of the identity over the 16 messages with padding, the boxes being
    // centered on the encoded messages.
    let message_modulus = 1 << (MESSAGE_BITS - 1);
    let box_size = polynomial_size / message_modulus;
    let mut accumulator =
        vec![0u64; concrete_cpu_glwe_ciphertext_size_u64(glwe_dimension, polynomial_size)];
    let body = &mut accumulator[glwe_dimension * polynomial_size..];
    for (i, coefficient) in body.iter_mut().enumerate() {
        let shifted = i + box_size / 2;
        let message = (shifted / box_size) as u64;
        let value = encode(message % message_modulus as u64, MESSAGE_BITS);
        // Coefficients past the end wrap around negacyclically.
        *coefficient = if shifted < polynomial_size {
            value
        } else {
            value.wrapping_neg()
        };
    }

    let mut mem = stack(|size, align| unsafe {
        concrete_cpu_bootstrap_lwe_ciphertext_u64_scratch(
            size,
            align,
            glwe_dimension,
            polynomial_size,
            fft.ptr(),
        )
    });
    let output_dimension = glwe_dimension * polynomial_size;
    for message in [0, 1, 7, 15] {
        let ct_in = encrypt(&lwe_sk, message, &mut encryption_generator);
        let mut ct_out = vec![0u64; concrete_cpu_lwe_ciphertext_size_u64(output_dimension)];
        unsafe {
            concrete_cpu_bootstrap_lwe_ciphertext_u64(
                ct_out.as_mut_ptr(),
                ct_in.as_ptr(),
                accumulator.as_ptr(),
                fourier_bsk.as_ptr(),
                level,
                base_log,
                glwe_dimension,
                polynomial_size,
                lwe_dimension,
                fft.ptr(),
                mem.as_mut_ptr(),
                mem.len(),
            )
        };
        assert_eq!(decrypt(&glwe_sk, &ct_out), message);
    }
}

#[test]
fn scratch_queries_report_sizes() {
    let fft = FftHandle::new(1024);
    let (mut size, mut align) = (0, 0);

    let status = unsafe {
        concrete_cpu_extract_bit_lwe_ciphertext_u64_scratch(
            &mut size,
            &mut align,
            600,
            1024,
            1,
            1024,
            fft.ptr(),
        )
    };
    assert_eq!(status, ScratchStatus::Valid);
    assert!(size > 0 && align.is_power_of_two());

    let status = unsafe {
        concrete_cpu_circuit_bootstrap_boolean_vertical_packing_lwe_ciphertext_u64_scratch(
            &mut size,
            &mut align,
            2,
            600,
            3,
            8,
            2,
            1,
            1024,
            1024,
            2,
            fft.ptr(),
        )
    };
    assert_eq!(status, ScratchStatus::Valid);
    assert!(size > 0 && align.is_power_of_two());

    let status = unsafe {
        concrete_cpu_bootstrap_lwe_ciphertext_u64_scratch(
            &mut size,
            &mut align,
            usize::MAX / 256,
            1024,
            fft.ptr(),
        )
    };
    assert_eq!(status, ScratchStatus::SizeOverflow);

    let status = unsafe {
        concrete_cpu_extract_bit_lwe_ciphertext_u64_scratch(
            &mut size,
            &mut align,
            600,
            1024,
            usize::MAX / 512,
            1024,
            fft.ptr(),
        )
    };
    assert_eq!(status, ScratchStatus::SizeOverflow);
}

#[test]
fn stack_of_the_reported_size_passes_the_debug_check() {
    let fft = FftHandle::new(1024);
    let (mut size, mut align) = (0, 0);
    let status = unsafe {
        concrete_cpu_bootstrap_lwe_ciphertext_u64_scratch(&mut size, &mut align, 1, 1024, fft.ptr())
    };
    assert_eq!(status, ScratchStatus::Valid);

    let fft_view = unsafe { (*fft.ptr()).as_view() };
    debug_check_stack(
        || bootstrap_scratch(GlweSize(2), PolynomialSize(1024), fft_view),
        size,
    );
}

#[cfg(debug_assertions)]
#[test]
#[should_panic(expected = "scratch stack too small")]
fn stack_one_byte_short_fails_the_debug_check() {
    let fft = FftHandle::new(1024);
    let (mut size, mut align) = (0, 0);
    let status = unsafe {
        concrete_cpu_bootstrap_lwe_ciphertext_u64_scratch(&mut size, &mut align, 1, 1024, fft.ptr())
    };
    assert_eq!(status, ScratchStatus::Valid);

    let fft_view = unsafe { (*fft.ptr()).as_view() };
    debug_check_stack(
        || bootstrap_scratch(GlweSize(2), PolynomialSize(1024), fft_view),
        size - 1,
    );
}

#[test]
fn glwe_secret_key_serialization_round_trip() {
    let mut secret_generator = SecretGenerator::new();
    let (glwe_dimension, polynomial_size) = (2, 256);
    let sk = secret_key(glwe_dimension * polynomial_size, &mut secret_generator);

    let mut buffer =
        vec![0u8; concrete_cpu_glwe_secret_key_buffer_size_u64(glwe_dimension, polynomial_size)];
    let written = unsafe {
        concrete_cpu_serialize_glwe_secret_key_u64(
            sk.as_ptr(),
            glwe_dimension,
            polynomial_size,
            buffer.as_mut_ptr(),
            buffer.len(),
        )
    };
    assert_eq!(written, buffer.len());

    let mut deserialized = vec![0u64; sk.len()];
    let read = unsafe {
        concrete_cpu_unserialize_glwe_secret_key_u64(
            buffer.as_ptr(),
            written,
            deserialized.as_mut_ptr(),
            deserialized.len(),
        )
    };
    assert_eq!(read, sk.len());
    assert_eq!(deserialized, sk);

    let too_small = unsafe {
        concrete_cpu_serialize_glwe_secret_key_u64(
            sk.as_ptr(),
            glwe_dimension,
            polynomial_size,
            buffer.as_mut_ptr(),
            buffer.len() - 1,
        )
    };
    assert_eq!(too_small, 0);
}

#[test]
fn tfhers_uint8_round_trip() {
    let (lwe_size, n_cts) = (9, 4);
    let lwe_vec: Vec<u64> = (0..(lwe_size * n_cts) as u64).map(|x| x * 31).collect();
    let desc = TfhersFheIntDescription {
        width: 8,
        is_signed: false,
        lwe_size,
        n_cts,
        degree: 3,
        noise_level: concrete_cpu_tfhers_unknown_noise_level(),
        message_modulus: 4,
        carry_modulus: 4,
        ks_first: true,
    };

    let mut buffer = vec![0u8; concrete_cpu_tfhers_fheint_buffer_size_u64(lwe_size, n_cts)];
    let written = unsafe {
        concrete_cpu_lwe_array_to_tfhers_uint8(
            lwe_vec.as_ptr(),
            buffer.as_mut_ptr(),
            buffer.len(),
            desc,
        )
    };
    assert!(written > 0 && written <= buffer.len());

    let read_desc = unsafe { concrete_cpu_tfhers_uint8_description(buffer.as_ptr(), written) };
    assert_eq!(read_desc, desc);

    let mut read = vec![0u64; lwe_size * n_cts];
    let status =
        unsafe { concrete_cpu_tfhers_uint8_to_lwe_array(buffer.as_ptr(), written, read.as_mut_ptr()) };
    assert_eq!(status, 0);
    assert_eq!(read, lwe_vec);

    // A signed reader rejects an unsigned integer.
    let signed_desc = unsafe { concrete_cpu_tfhers_int8_description(buffer.as_ptr(), written) };
    assert_eq!(signed_desc, TfhersFheIntDescription::zero());
    let status =
        unsafe { concrete_cpu_tfhers_int8_to_lwe_array(buffer.as_ptr(), written, read.as_mut_ptr()) };
    assert!(status < 0);
    let written = unsafe {
        concrete_cpu_lwe_array_to_tfhers_int8(lwe_vec.as_ptr(), buffer.as_mut_ptr(), buffer.len(), desc)
    };
    assert_eq!(written, 0);
}

fn simulate_bit_extraction(
    out: &mut [u64],
    lwe_in: u64,
    delta_log: usize,
    security_level: u64,
    csprng: *mut Csprng,
) {
    unsafe {
        simulation_extract_bit_lwe_ciphertext_u64(
            out.as_mut_ptr(),
            lwe_in,
            delta_log,
            out.len(),
            11,
            1,
            800,
            4,
            5,
            15,
            2,
            64,
            security_level,
            csprng,
        )
    };
}

#[test]
fn simulated_bit_extraction() {
    let mut mem = MaybeUninit::<Csprng>::uninit();
    unsafe { concrete_cpu_construct_csprng(mem.as_mut_ptr(), seed()) };

    let (delta_log, number_of_bits) = (59, 5);
    for security_level in [80, 128] {
        for message in [0u64, 9, 22, 31] {
            let mut out = vec![0u64; number_of_bits];
            simulate_bit_extraction(
                &mut out,
                message << delta_log,
                delta_log,
                security_level,
                mem.as_mut_ptr(),
            );
            for (i, &ct) in out.iter().enumerate() {
                let expected = (message >> (number_of_bits - 1 - i)) & 1;
                assert_eq!(
                    decode(ct, 1) & 1,
                    expected,
                    "security level {security_level}, message {message}, output {i}"
                );
            }
        }
    }

    unsafe { concrete_cpu_destroy_csprng(mem.as_mut_ptr()) };
}

#[test]
fn simulation_with_unsupported_security_level_leaves_output_untouched() {
    let mut mem = MaybeUninit::<Csprng>::uninit();
    unsafe { concrete_cpu_construct_csprng(mem.as_mut_ptr(), seed()) };

    let mut out = vec![0xdead_beef_u64; 3];
    simulate_bit_extraction(&mut out, 5 << 59, 59, 100, mem.as_mut_ptr());
    assert_eq!(out, vec![0xdead_beef_u64; 3]);

    let luts = [1u64 << 63, 0, 1 << 63, 0];
    let lwe_in = [0u64, 1 << 63];
    let mut out = [7u64];
    unsafe {
        simulation_circuit_bootstrap_boolean_vertical_packing_lwe_ciphertext_u64(
            lwe_in.as_ptr(),
            out.as_mut_ptr(),
            lwe_in.len(),
            out.len(),
            luts.len(),
            1,
            luts.as_ptr(),
            1,
            11,
            800,
            2,
            15,
            4,
            5,
            3,
            12,
            64,
            100,
            mem.as_mut_ptr(),
        )
    };
    assert_eq!(out, [7]);

    unsafe { concrete_cpu_destroy_csprng(mem.as_mut_ptr()) };
}

#[test]
fn gaussian_filling_is_centered() {
    let mut mem = MaybeUninit::<Csprng>::uninit();
    unsafe { concrete_cpu_construct_csprng(mem.as_mut_ptr(), seed()) };

    let mut buffer = vec![0u64; 1000];
    unsafe {
        concrete_cpu_fill_with_random_gaussian(
            buffer.as_mut_ptr(),
            buffer.len(),
            VARIANCE,
            mem.as_mut_ptr(),
        )
    };
    // A standard deviation of about 5 steps keeps every sample within 2^8 of zero.
    assert!(buffer.iter().all(|&x| x.min(x.wrapping_neg()) < 1 << 8));

    unsafe { concrete_cpu_destroy_csprng(mem.as_mut_ptr()) };
}

#[test]
fn secure_random_is_available() {
    let mut value = Uint128 {
        little_endian_bytes: [0; 16],
    };
    assert_eq!(unsafe { concrete_cpu_crypto_secure_random_128(&mut value) }, 1);
    assert_ne!(value.little_endian_bytes, [0; 16]);
}

#[test]
fn failed_setup_is_logged_instead_of_unwrapped() {
    let missing_entropy: Result<u64, Error> = Err(Error::from(ErrorKind::EntropySource(
        "no entropy source".to_string(),
    )));
    assert_eq!(ok_or_log(missing_entropy, "cannot create a seeder"), None);
    assert_eq!(ok_or_log(Ok::<_, Error>(7u64), "cannot create a seeder"), Some(7));
}
