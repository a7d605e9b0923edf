use std::fmt;
use std::num::NonZeroU64;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_SEED, DEFAULT_TEST_FRACTION};
use crate::errors::SplitError;
use crate::hashing::Fingerprint;

/// Parámetros de un split.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitConfig {
    /// Fracción esperada de muestras en test, en (0, 1].
    pub test_fraction: f64,
    /// Semilla mezclada en cada hoja; otra semilla da otra partición.
    pub seed: u64,
}

impl SplitConfig {
    pub fn new(test_fraction: f64, seed: u64) -> Self {
        Self { test_fraction, seed }
    }

    pub fn modulus(&self) -> Result<Modulus, SplitError> {
        Modulus::from_fraction(self.test_fraction)
    }
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self { test_fraction: DEFAULT_TEST_FRACTION,
               seed: DEFAULT_SEED }
    }
}

/// Divisor de la regla de asignación (`m >= 1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Modulus(NonZeroU64);

impl Modulus {
    pub fn new(m: u64) -> Option<Self> {
        NonZeroU64::new(m).map(Modulus)
    }

    /// `round(1 / test_fraction)` con redondeo half-to-even: 0.4 -> 2, no 3.
    pub fn from_fraction(test_fraction: f64) -> Result<Self, SplitError> {
        if !(test_fraction > 0.0 && test_fraction <= 1.0) {
            return Err(SplitError::InvalidFraction(test_fraction));
        }
        let inverse = (1.0 / test_fraction).round_ties_even();
        // 2^64 ya no cabe en u64
        if !inverse.is_finite() || inverse >= 18_446_744_073_709_551_616.0 {
            return Err(SplitError::InvalidFraction(test_fraction));
        }
        Self::new(inverse as u64).ok_or(SplitError::InvalidFraction(test_fraction))
    }

    pub fn get(self) -> u64 {
        self.0.get()
    }

    /// Fracción de test esperada para un hash uniforme.
    pub fn expected_test_ratio(self) -> f64 {
        1.0 / self.get() as f64
    }

    pub fn assign(self, fingerprint: Fingerprint) -> Assignment {
        if fingerprint.value() % self.get() == 0 {
            Assignment::Test
        } else {
            Assignment::Train
        }
    }
}

impl fmt::Display for Modulus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Assignment {
    Train,
    Test,
}

impl Assignment {
    pub fn is_test(self) -> bool {
        matches!(self, Assignment::Test)
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Assignment::Train => f.write_str("train"),
            Assignment::Test => f.write_str("test"),
        }
    }
}
