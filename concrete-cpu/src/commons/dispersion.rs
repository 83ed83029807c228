//! Module containing noise distribution primitives.
//!
//! The noise added by an encryption is a centered gaussian, described on the torus either by its
//! standard deviation ([`StandardDev`]) or by its variance ([`Variance`]). A standard deviation
//! of $2^{-40}$ means the noise sits around bit 24 of a 64 bits ciphertext.

use serde::{Deserialize, Serialize};

/// A common interface over the representations of a gaussian dispersion.
pub trait DispersionParameter: Copy {
    fn get_standard_dev(&self) -> f64;
    fn get_variance(&self) -> f64;
    fn get_log_standard_dev(&self) -> f64 {
        self.get_standard_dev().log2()
    }
}

/// A standard deviation, expressed on the torus.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct StandardDev(pub f64);

impl StandardDev {
    pub fn from_log_standard_dev(log_std: f64) -> Self {
        Self(2_f64.powf(log_std))
    }

    pub fn from_modular_standard_dev(std: f64, log2_modulus: u32) -> Self {
        Self(std / 2_f64.powf(log2_modulus as f64))
    }
}

impl DispersionParameter for StandardDev {
    fn get_standard_dev(&self) -> f64 {
        self.0
    }
    fn get_variance(&self) -> f64 {
        self.0.powi(2)
    }
}

/// A variance, expressed on the torus.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Variance(pub f64);

impl Variance {
    pub fn from_modular_variance(var: f64, log2_modulus: u32) -> Self {
        Self(var / 2_f64.powf(log2_modulus as f64 * 2.))
    }

    /// Returns the variance expressed on integers modulo $2^{log2\_modulus}$.
    pub fn get_modular_variance(&self, log2_modulus: u32) -> f64 {
        self.0 * 2_f64.powf(log2_modulus as f64 * 2.)
    }
}

impl DispersionParameter for Variance {
    fn get_standard_dev(&self) -> f64 {
        self.0.sqrt()
    }
    fn get_variance(&self) -> f64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn representations_agree() {
        let std = StandardDev::from_log_standard_dev(-25.);
        let var = Variance(std.get_variance());
        assert!((var.get_standard_dev() - std.0).abs() < 1e-20);
        assert!((var.get_log_standard_dev() + 25.).abs() < 1e-9);
        assert_eq!(Variance::from_modular_variance(4.0, 1).0, 0.25);
        assert_eq!(Variance(0.25).get_modular_variance(1), 1.0);
    }
}
