//! Split con los fingerprints calculados en el pool de rayon. Los
//! fingerprints no dependen unos de otros; el ensamblado final es secuencial y
//! produce exactamente el mismo `Split` que `Splitter::split`.
use rayon::prelude::*;

use super::config::Assignment;
use super::splitter::{Split, Splitter};
use crate::errors::SplitError;
use crate::model::Value;

impl Splitter {
    pub fn split_par<S, L>(&self, samples: Vec<S>, labels: Vec<L>) -> Result<Split<S, L>, SplitError>
        where S: AsRef<Value> + Sync
    {
        if samples.len() != labels.len() {
            return Err(SplitError::LengthMismatch { samples: samples.len(),
                                                    labels: labels.len() });
        }
        let assignments = samples.par_iter()
                                 .map(|sample| self.assign(sample.as_ref()))
                                 .collect::<Result<Vec<Assignment>, SplitError>>()?;

        let mut split = Split::default();
        for ((sample, label), assignment) in samples.into_iter().zip(labels).zip(assignments) {
            split.push(assignment, sample, label);
        }
        self.log_summary(&split);
        Ok(split)
    }
}
