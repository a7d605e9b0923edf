//! Particionado train/test por fingerprint.
//!
//! Una muestra va a test si `fingerprint mod m == 0`, con
//! `m = round(1 / test_fraction)`. La pertenencia nunca se persiste: se
//! recomputa desde el contenido de cada muestra.

pub mod config;
mod parallel;
pub mod splitter;

pub use config::{Assignment, Modulus, SplitConfig};
pub use splitter::{hash_split, Split, SplitStats, Splitter};
