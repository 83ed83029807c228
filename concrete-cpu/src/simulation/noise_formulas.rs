//! Closed form noise formulas, on the torus, for binary secret keys and gaussian key noises.
//!
//! Each function returns the variance an operation adds to the variance of its input. Moduli are
//! passed as `f64`, the native 64 bits modulus being `2^64`.

use crate::commons::dispersion::Variance;
use crate::commons::parameters::{
    DecompositionBaseLog, DecompositionLevelCount, GlweDimension, LweDimension, PolynomialSize,
};

// Variance of a uniform rounding error to a multiple of 1 / output_modulus, on a torus already
// discretized by input_modulus.
fn rounding_variance(input_modulus: f64, output_modulus: f64) -> f64 {
    (output_modulus.powi(-2) - input_modulus.powi(-2)) / 12.0
}

// Variance of the product between a digit of the signed decomposition in base 2^base_log and
// an independent noise of variance key_variance, summed over the levels.
fn decomposition_digits_variance(
    base_log: DecompositionBaseLog,
    level: DecompositionLevelCount,
    key_variance: Variance,
) -> f64 {
    let base = 2.0f64.powi(base_log.0 as i32);
    level.0 as f64 * (base * base + 2.0) / 12.0 * key_variance.0
}

/// Rounding every coefficient of a ciphertext under a binary key of `lwe_dimension` from
/// `input_modulus` to `output_modulus`.
pub fn modulus_switch_additive_variance(
    lwe_dimension: LweDimension,
    input_modulus: f64,
    output_modulus: f64,
) -> Variance {
    // The mask errors are weighted by key bits, which are one half of the time.
    Variance((1.0 + lwe_dimension.0 as f64 / 2.0) * rounding_variance(input_modulus, output_modulus))
}

/// Keyswitching a ciphertext under an input key of `input_lwe_dimension`, with a key encrypted
/// with `ksk_variance`.
pub fn keyswitch_additive_variance(
    input_lwe_dimension: LweDimension,
    base_log: DecompositionBaseLog,
    level: DecompositionLevelCount,
    modulus: f64,
    ksk_variance: Variance,
) -> Variance {
    let n = input_lwe_dimension.0 as f64;
    let kept_bits_modulus = 2.0f64.powi((base_log.0 * level.0) as i32);

    let key_noise = n * decomposition_digits_variance(base_log, level, ksk_variance);
    let rounding = n / 2.0 * rounding_variance(modulus, kept_bits_modulus);

    Variance(key_noise + rounding)
}

/// External product between a GLWE ciphertext and a GGSW ciphertext encrypting a bit, the GGSW
/// noise having variance `ggsw_variance`.
///
/// A CMux adds the same variance.
pub fn external_product_additive_variance(
    glwe_dimension: GlweDimension,
    polynomial_size: PolynomialSize,
    base_log: DecompositionBaseLog,
    level: DecompositionLevelCount,
    modulus: f64,
    ggsw_variance: Variance,
) -> Variance {
    let k = glwe_dimension.0 as f64;
    let big_n = polynomial_size.0 as f64;
    let kept_bits_modulus = 2.0f64.powi((base_log.0 * level.0) as i32);

    let key_noise =
        (k + 1.0) * big_n * decomposition_digits_variance(base_log, level, ggsw_variance);
    // Half of the rounding error only survives when the bit is set.
    let rounding = (1.0 + k * big_n / 2.0) * rounding_variance(modulus, kept_bits_modulus) / 2.0;

    Variance(key_noise + rounding)
}

/// Output variance of a programmable bootstrap: one external product per input mask element,
/// starting from a trivial accumulator.
pub fn pbs_variance(
    input_lwe_dimension: LweDimension,
    glwe_dimension: GlweDimension,
    polynomial_size: PolynomialSize,
    base_log: DecompositionBaseLog,
    level: DecompositionLevelCount,
    modulus: f64,
    bsk_variance: Variance,
) -> Variance {
    let external_product = external_product_additive_variance(
        glwe_dimension,
        polynomial_size,
        base_log,
        level,
        modulus,
        bsk_variance,
    );
    Variance(input_lwe_dimension.0 as f64 * external_product.0)
}

/// Private functional packing keyswitch of an LWE ciphertext under a key of
/// `input_lwe_dimension`, into a GLWE of `output_polynomial_size`.
///
/// The function applied by the circuit bootstrap keys multiplies the rounding error by a key
/// polynomial, which is accounted for with its expected squared norm.
pub fn packing_keyswitch_additive_variance(
    input_lwe_dimension: LweDimension,
    output_polynomial_size: PolynomialSize,
    base_log: DecompositionBaseLog,
    level: DecompositionLevelCount,
    modulus: f64,
    pfpksk_variance: Variance,
) -> Variance {
    let n = input_lwe_dimension.0 as f64;
    let kept_bits_modulus = 2.0f64.powi((base_log.0 * level.0) as i32);
    let function_norm2 = f64::max(1.0, output_polynomial_size.0 as f64 / 2.0);

    // The body is decomposed along with the mask.
    let key_noise = (n + 1.0) * decomposition_digits_variance(base_log, level, pfpksk_variance);
    let rounding =
        function_norm2 * (1.0 + n / 2.0) * rounding_variance(modulus, kept_bits_modulus);

    Variance(key_noise + rounding)
}

#[cfg(test)]
mod tests {
    use super::*;

    const Q: f64 = 18_446_744_073_709_551_616.0;

    #[test]
    fn modulus_switch_to_the_same_modulus_is_free() {
        assert_eq!(modulus_switch_additive_variance(LweDimension(600), Q, Q).0, 0.0);
    }

    #[test]
    fn modulus_switch_to_2n() {
        let n = 600;
        let two_big_n = 2048.0;
        let var = modulus_switch_additive_variance(LweDimension(n), Q, two_big_n);
        let expected = (1.0 + n as f64 / 2.0) / (12.0 * two_big_n * two_big_n);
        assert!((var.0 - expected).abs() / expected < 1e-9);
    }

    #[test]
    fn keyswitch_grows_with_the_key_noise() {
        let ks = |var| {
            keyswitch_additive_variance(
                LweDimension(2048),
                DecompositionBaseLog(4),
                DecompositionLevelCount(3),
                Q,
                Variance(var),
            )
        };
        assert!(ks(2f64.powi(-30)).0 > ks(2f64.powi(-40)).0);
        // Without key noise only the rounding remains.
        let rounding = 2048.0 / 2.0 * (2f64.powi(-24) - Q.powi(-2)) / 12.0;
        assert!((ks(0.0).0 - rounding).abs() / rounding < 1e-9);
    }

    #[test]
    fn pbs_is_linear_in_the_input_dimension() {
        let pbs = |n| {
            pbs_variance(
                LweDimension(n),
                GlweDimension(1),
                PolynomialSize(2048),
                DecompositionBaseLog(15),
                DecompositionLevelCount(2),
                Q,
                Variance(2f64.powi(-100)),
            )
            .0
        };
        assert!((pbs(1000) - 2.0 * pbs(500)).abs() / pbs(1000) < 1e-12);
    }

    #[test]
    fn more_levels_reduce_the_rounding_noise() {
        let external_product = |level| {
            external_product_additive_variance(
                GlweDimension(1),
                PolynomialSize(1024),
                DecompositionBaseLog(8),
                DecompositionLevelCount(level),
                Q,
                Variance(0.0),
            )
            .0
        };
        assert!(external_product(3) < external_product(2));
    }

    #[test]
    fn packing_keyswitch_decomposes_the_body() {
        let var = Variance(2f64.powi(-60));
        let base_log = DecompositionBaseLog(15);
        let level = DecompositionLevelCount(2);
        let packing = packing_keyswitch_additive_variance(
            LweDimension(1024),
            PolynomialSize(1024),
            base_log,
            level,
            Q,
            var,
        );
        let keyswitch = keyswitch_additive_variance(LweDimension(1025), base_log, level, Q, var);
        assert!(packing.0 > keyswitch.0);
    }
}
