//! Errores del núcleo. Todos se levantan en el punto de detección y nunca se
//! degradan a warnings: si una muestra no se puede clasificar, el split
//! completo es inválido.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum SplitError {
    #[error("samples and labels differ in length ({samples} samples, {labels} labels)")]
    LengthMismatch { samples: usize, labels: usize },
    #[error("unorderable keys: {0}")]
    UnorderableKeys(String),
    #[error("unconvertible leaf: {0}")]
    UnconvertibleLeaf(String),
    #[error("invalid test fraction {0}: must lie in (0, 1] and yield a positive modulus")]
    InvalidFraction(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_mismatch_reports_both_lengths() {
        let err = SplitError::LengthMismatch { samples: 3, labels: 2 };
        assert_eq!(err.to_string(), "samples and labels differ in length (3 samples, 2 labels)");
    }

    #[test]
    fn invalid_fraction_format() {
        let err = SplitError::InvalidFraction(1.5);
        assert!(err.to_string().starts_with("invalid test fraction 1.5"));
    }
}
