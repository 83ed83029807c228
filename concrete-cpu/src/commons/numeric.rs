//! Conversions between 64 bits integers and the real torus.

/// An unsigned integer seen as an element of the discretized torus $\mathbb{Z}/2^{64}\mathbb{Z}$.
pub trait UnsignedTorus: Copy {
    /// Rounds a real number, taken modulo 1, to the closest element of the discretized torus.
    fn from_torus(input: f64) -> Self;
    /// Returns the representative of `self` in $[-1/2, 1/2)$.
    fn into_torus(self) -> f64;
    /// Reinterprets the bits as a two's complement signed integer.
    fn into_signed(self) -> i64;
}

const TWO_POW_64: f64 = 18_446_744_073_709_551_616.0;

impl UnsignedTorus for u64 {
    #[inline]
    fn from_torus(input: f64) -> Self {
        let fract = input - input.round();
        let scaled = (fract * TWO_POW_64).round();
        // `scaled` lies in [-2^63, 2^63], the saturating cast maps 2^63 onto i64::MAX.
        scaled as i64 as u64
    }

    #[inline]
    fn into_torus(self) -> f64 {
        self.into_signed() as f64 / TWO_POW_64
    }

    #[inline]
    fn into_signed(self) -> i64 {
        self as i64
    }
}

/// Divides `value` by `2^log` with rounding to the closest integer.
#[inline]
pub fn round_shift_right(value: u64, log: usize) -> u64 {
    if log == 0 {
        return value;
    }
    let rounding = (value >> (log - 1)) & 1;
    (value >> log).wrapping_add(rounding)
}
