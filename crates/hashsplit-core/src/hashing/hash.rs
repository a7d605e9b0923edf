//! Primitivas de hash: abstracción para poder cambiar de algoritmo sin tocar
//! el resto del núcleo. El contrato es `bytes -> u64`, determinista y estable
//! entre procesos y plataformas.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::constants::FINGERPRINT_BYTES;

pub trait HashPrimitive: Send + Sync + fmt::Debug {
    fn hash_bytes(&self, payload: &[u8]) -> u64;
}

/// blake3, truncado a los primeros 8 bytes (little-endian).
#[derive(Debug, Clone, Copy, Default)]
pub struct Blake3Primitive;

impl HashPrimitive for Blake3Primitive {
    fn hash_bytes(&self, payload: &[u8]) -> u64 {
        leading_u64(blake3::hash(payload).as_bytes())
    }
}

/// SHA-256, truncado igual que `Blake3Primitive`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Primitive;

impl HashPrimitive for Sha256Primitive {
    fn hash_bytes(&self, payload: &[u8]) -> u64 {
        leading_u64(&Sha256::digest(payload))
    }
}

fn leading_u64(digest: &[u8]) -> u64 {
    let mut word = [0u8; FINGERPRINT_BYTES];
    word.copy_from_slice(&digest[..FINGERPRINT_BYTES]);
    u64::from_le_bytes(word)
}

/// Selección de primitiva por nombre (configuración / CLI).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    #[default]
    Blake3,
    Sha256,
}

impl PrimitiveKind {
    pub fn build(self) -> Arc<dyn HashPrimitive> {
        match self {
            PrimitiveKind::Blake3 => Arc::new(Blake3Primitive),
            PrimitiveKind::Sha256 => Arc::new(Sha256Primitive),
        }
    }
}

impl FromStr for PrimitiveKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "blake3" => Ok(PrimitiveKind::Blake3),
            "sha256" => Ok(PrimitiveKind::Sha256),
            other => Err(format!("unknown hash primitive '{other}' (expected blake3 or sha256)")),
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrimitiveKind::Blake3 => f.write_str("blake3"),
            PrimitiveKind::Sha256 => f.write_str("sha256"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitives_are_deterministic_and_distinct() {
        let b = Blake3Primitive;
        let s = Sha256Primitive;
        assert_eq!(b.hash_bytes(b"abc"), b.hash_bytes(b"abc"));
        assert_ne!(b.hash_bytes(b"abc"), b.hash_bytes(b"abd"));
        assert_ne!(b.hash_bytes(b"abc"), s.hash_bytes(b"abc"));
    }

    #[test]
    fn blake3_takes_leading_bytes_of_the_digest() {
        let digest = blake3::hash(b"");
        let mut word = [0u8; 8];
        word.copy_from_slice(&digest.as_bytes()[..8]);
        assert_eq!(Blake3Primitive.hash_bytes(b""), u64::from_le_bytes(word));
    }

    #[test]
    fn primitive_kind_parses_names() {
        assert_eq!("blake3".parse::<PrimitiveKind>(), Ok(PrimitiveKind::Blake3));
        assert_eq!(" SHA256 ".parse::<PrimitiveKind>(), Ok(PrimitiveKind::Sha256));
        assert!("md5".parse::<PrimitiveKind>().is_err());
        assert_eq!(PrimitiveKind::default().to_string(), "blake3");
    }
}
