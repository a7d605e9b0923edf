//! Módulo de canonicalización y hashing estructural.

pub mod canonical;
pub mod fingerprint;
pub mod hash;

pub use canonical::flatten;
pub use fingerprint::{fingerprint, Fingerprint, Fingerprinter};
pub use hash::{Blake3Primitive, HashPrimitive, PrimitiveKind, Sha256Primitive};
