use std::sync::Arc;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::config::{Assignment, Modulus, SplitConfig};
use crate::conversion::ConversionTable;
use crate::errors::SplitError;
use crate::hashing::{Fingerprint, Fingerprinter, HashPrimitive};
use crate::model::Value;

/// Resultado de un split: cuatro secuencias en el orden relativo de entrada.
#[derive(Debug, Clone, PartialEq)]
pub struct Split<S, L> {
    pub train_samples: Vec<S>,
    pub train_labels: Vec<L>,
    pub test_samples: Vec<S>,
    pub test_labels: Vec<L>,
}

impl<S, L> Default for Split<S, L> {
    fn default() -> Self {
        Self { train_samples: Vec::new(),
               train_labels: Vec::new(),
               test_samples: Vec::new(),
               test_labels: Vec::new() }
    }
}

impl<S, L> Split<S, L> {
    pub fn push(&mut self, assignment: Assignment, sample: S, label: L) {
        match assignment {
            Assignment::Train => {
                self.train_samples.push(sample);
                self.train_labels.push(label);
            }
            Assignment::Test => {
                self.test_samples.push(sample);
                self.test_labels.push(label);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.train_samples.len() + self.test_samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> SplitStats {
        let total = self.len();
        let test = self.test_samples.len();
        SplitStats { total,
                     train: self.train_samples.len(),
                     test,
                     test_ratio: if total == 0 { 0.0 } else { test as f64 / total as f64 } }
    }

    /// `(train_samples, train_labels, test_samples, test_labels)`
    pub fn into_parts(self) -> (Vec<S>, Vec<L>, Vec<S>, Vec<L>) {
        (self.train_samples, self.train_labels, self.test_samples, self.test_labels)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitStats {
    pub total: usize,
    pub train: usize,
    pub test: usize,
    pub test_ratio: f64,
}

/// Configuración validada + fingerprinter. Construirlo valida la fracción,
/// así que un `Splitter` nunca falla con `InvalidFraction` a mitad de split.
#[derive(Debug, Clone)]
pub struct Splitter {
    config: SplitConfig,
    modulus: Modulus,
    fingerprinter: Fingerprinter,
}

impl Splitter {
    pub fn new(config: SplitConfig) -> Result<Self, SplitError> {
        let modulus = config.modulus()?;
        if modulus.get() == 1 {
            warn!("test fraction {} rounds to modulus 1: every sample goes to test", config.test_fraction);
        }
        Ok(Self { config,
                  modulus,
                  fingerprinter: Fingerprinter::new(config.seed) })
    }

    pub fn with_overlay(mut self, overlay: &ConversionTable) -> Self {
        self.fingerprinter = self.fingerprinter.with_overlay(overlay);
        self
    }

    pub fn with_primitive(mut self, primitive: Arc<dyn HashPrimitive>) -> Self {
        self.fingerprinter = self.fingerprinter.with_primitive(primitive);
        self
    }

    pub fn config(&self) -> &SplitConfig {
        &self.config
    }

    pub fn modulus(&self) -> Modulus {
        self.modulus
    }

    pub fn fingerprinter(&self) -> &Fingerprinter {
        &self.fingerprinter
    }

    pub fn fingerprint(&self, sample: &Value) -> Result<Fingerprint, SplitError> {
        self.fingerprinter.fingerprint(sample)
    }

    /// Partición de una muestra, recomputada desde su contenido.
    pub fn assign(&self, sample: &Value) -> Result<Assignment, SplitError> {
        Ok(self.modulus.assign(self.fingerprinter.fingerprint(sample)?))
    }

    /// Consume `samples` y `labels` en paralelo (lock-step). Acepta iteradores
    /// perezosos; si ambos conocen su longitud exacta, un desajuste se detecta
    /// antes de hashear nada.
    pub fn split<S, L, IS, IL>(&self, samples: IS, labels: IL) -> Result<Split<S, L>, SplitError>
        where IS: IntoIterator<Item = S>,
              IL: IntoIterator<Item = L>,
              S: AsRef<Value>
    {
        let mut samples = samples.into_iter();
        let mut labels = labels.into_iter();
        check_known_lengths(&samples, &labels)?;

        let mut split = Split::default();
        let mut paired = 0usize;
        loop {
            match (samples.next(), labels.next()) {
                (Some(sample), Some(label)) => {
                    let assignment = self.assign(sample.as_ref())?;
                    split.push(assignment, sample, label);
                    paired += 1;
                }
                (None, None) => break,
                (Some(_), None) => {
                    return Err(SplitError::LengthMismatch { samples: paired + 1 + samples.count(),
                                                            labels: paired })
                }
                (None, Some(_)) => {
                    return Err(SplitError::LengthMismatch { samples: paired,
                                                            labels: paired + 1 + labels.count() })
                }
            }
        }
        self.log_summary(&split);
        Ok(split)
    }

    pub(crate) fn log_summary<S, L>(&self, split: &Split<S, L>) {
        let stats = split.stats();
        debug!("hash split: {} train, {} test of {} (modulus {}, seed {}, ratio {:.4})",
               stats.train,
               stats.test,
               stats.total,
               self.modulus,
               self.config.seed,
               stats.test_ratio);
    }
}

fn check_known_lengths<A: Iterator, B: Iterator>(samples: &A, labels: &B) -> Result<(), SplitError> {
    if let ((s_lo, Some(s_hi)), (l_lo, Some(l_hi))) = (samples.size_hint(), labels.size_hint()) {
        if s_lo == s_hi && l_lo == l_hi && s_lo != l_lo {
            return Err(SplitError::LengthMismatch { samples: s_lo, labels: l_lo });
        }
    }
    Ok(())
}

/// Split de `samples`/`labels` con la tabla por defecto más `overlay`.
///
/// La fracción se valida antes de consumir ninguna muestra.
pub fn hash_split<S, L, IS, IL>(samples: IS,
                                labels: IL,
                                test_fraction: f64,
                                seed: u64,
                                overlay: Option<&ConversionTable>)
                                -> Result<Split<S, L>, SplitError>
    where IS: IntoIterator<Item = S>,
          IL: IntoIterator<Item = L>,
          S: AsRef<Value>
{
    let mut splitter = Splitter::new(SplitConfig::new(test_fraction, seed))?;
    if let Some(overlay) = overlay {
        splitter = splitter.with_overlay(overlay);
    }
    splitter.split(samples, labels)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(range: std::ops::Range<i64>) -> Vec<Value> {
        range.map(Value::Int).collect()
    }

    #[test]
    fn every_pair_lands_in_exactly_one_partition() {
        let samples = ints(0..200);
        let labels: Vec<i64> = (0..200).collect();
        let split = hash_split(samples, labels, 0.25, 0, None).unwrap();
        assert_eq!(split.len(), 200);
        assert_eq!(split.train_samples.len(), split.train_labels.len());
        assert_eq!(split.test_samples.len(), split.test_labels.len());
        for (s, l) in split.train_samples.iter().zip(&split.train_labels).chain(split.test_samples.iter().zip(&split.test_labels)) {
            assert_eq!(s, &Value::Int(*l));
        }
    }

    #[test]
    fn known_length_mismatch_fails_before_hashing() {
        // una hoja no convertible en la primera muestra: si se hashease, el
        // error sería UnconvertibleLeaf y no LengthMismatch
        let overlay = ConversionTable::new().with(crate::model::LeafType::Int, |_| None);
        let err = hash_split(ints(1..4), vec![1, 2], 0.5, 0, Some(&overlay)).unwrap_err();
        assert_eq!(err, SplitError::LengthMismatch { samples: 3, labels: 2 });
    }

    #[test]
    fn lazy_mismatch_is_detected_on_exhaustion() {
        let samples = (0..5).filter(|_| true).map(Value::Int);
        let labels = (0..3).filter(|_| true);
        let err = hash_split(samples, labels, 0.5, 0, None).unwrap_err();
        assert_eq!(err, SplitError::LengthMismatch { samples: 5, labels: 3 });

        let samples = (0..2).filter(|_| true).map(Value::Int);
        let labels = (0..4).filter(|_| true);
        let err = hash_split(samples, labels, 0.5, 0, None).unwrap_err();
        assert_eq!(err, SplitError::LengthMismatch { samples: 2, labels: 4 });
    }

    #[test]
    fn invalid_fraction_fails_before_consuming() {
        let mut consumed = 0;
        let samples = (0..3).map(|i| {
                                consumed += 1;
                                Value::Int(i)
                            });
        let err = hash_split(samples, 0..3, 0.0, 0, None).unwrap_err();
        assert_eq!(err, SplitError::InvalidFraction(0.0));
        assert_eq!(consumed, 0);
    }

    #[test]
    fn fraction_one_sends_everything_to_test() {
        let split = hash_split(ints(0..20), 0..20, 1.0, 9, None).unwrap();
        assert!(split.train_samples.is_empty());
        assert_eq!(split.test_labels, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn stats_of_empty_split() {
        let split: Split<Value, u8> = hash_split(Vec::<Value>::new(), Vec::new(), 0.5, 0, None).unwrap();
        assert!(split.is_empty());
        assert_eq!(split.stats(), SplitStats { total: 0, train: 0, test: 0, test_ratio: 0.0 });
    }
}
