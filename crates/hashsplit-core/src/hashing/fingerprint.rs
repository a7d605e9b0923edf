//! Fingerprint estructural de un `Value`.
//!
//! Para cada hoja `i` de `flatten(value)`:
//!
//! ```text
//! h_i = primitive(payload_i ++ seed (u64 BE) ++ i (u64 BE))
//! fingerprint = h_0 ^ h_1 ^ ... ^ h_n
//! ```
//!
//! La semilla entra en el payload de cada hoja, así que otra semilla da otra
//! partición determinista del mismo dataset. La posición hace que el
//! resultado dependa del orden de las secuencias; los sets y maps ya llegan
//! con posiciones canónicas tras normalizar.
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::canonical::flatten;
use super::hash::{Blake3Primitive, HashPrimitive};
use crate::conversion::ConversionTable;
use crate::errors::SplitError;
use crate::model::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(u64);

impl Fingerprint {
    /// Fingerprint de un valor sin hojas (contenedores vacíos).
    pub const EMPTY: Fingerprint = Fingerprint(0);

    pub fn value(self) -> u64 {
        self.0
    }

    pub fn to_hex(self) -> String {
        format!("{:016x}", self.0)
    }
}

impl From<u64> for Fingerprint {
    fn from(v: u64) -> Self {
        Fingerprint(v)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Semilla + tabla efectiva + primitiva. Reutilizable entre llamadas; no
/// guarda estado entre fingerprints.
#[derive(Debug, Clone)]
pub struct Fingerprinter {
    seed: u64,
    table: ConversionTable,
    primitive: Arc<dyn HashPrimitive>,
}

impl Fingerprinter {
    /// Tabla por defecto y blake3.
    pub fn new(seed: u64) -> Self {
        Self { seed,
               table: ConversionTable::defaults().clone(),
               primitive: Arc::new(Blake3Primitive) }
    }

    /// Superpone `overlay` sobre la tabla actual.
    pub fn with_overlay(mut self, overlay: &ConversionTable) -> Self {
        self.table = self.table.overlay(overlay);
        self
    }

    pub fn with_primitive(mut self, primitive: Arc<dyn HashPrimitive>) -> Self {
        self.primitive = primitive;
        self
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn table(&self) -> &ConversionTable {
        &self.table
    }

    pub fn fingerprint(&self, value: &Value) -> Result<Fingerprint, SplitError> {
        let seed = self.seed.to_be_bytes();
        let mut framed = Vec::new();
        let mut acc = 0u64;
        for (position, leaf) in flatten(value)?.into_iter().enumerate() {
            let payload = self.table.convert(leaf)?;
            framed.clear();
            framed.extend_from_slice(&payload);
            framed.extend_from_slice(&seed);
            framed.extend_from_slice(&(position as u64).to_be_bytes());
            acc ^= self.primitive.hash_bytes(&framed);
        }
        Ok(Fingerprint(acc))
    }
}

/// Fingerprint de `value` con la tabla por defecto más `overlay`.
pub fn fingerprint(value: &Value, seed: u64, overlay: Option<&ConversionTable>) -> Result<Fingerprint, SplitError> {
    let mut fingerprinter = Fingerprinter::new(seed);
    if let Some(overlay) = overlay {
        fingerprinter = fingerprinter.with_overlay(overlay);
    }
    fingerprinter.fingerprint(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashing::hash::Sha256Primitive;
    use crate::model::LeafType;

    #[test]
    fn single_leaf_matches_manual_framing() {
        let fp = fingerprint(&Value::from("a"), 7, None).unwrap();
        let mut framed = b"a".to_vec();
        framed.extend_from_slice(&7u64.to_be_bytes());
        framed.extend_from_slice(&0u64.to_be_bytes());
        assert_eq!(fp.value(), Blake3Primitive.hash_bytes(&framed));
    }

    #[test]
    fn empty_containers_fingerprint_to_zero() {
        assert_eq!(fingerprint(&Value::seq(Vec::<Value>::new()), 3, None).unwrap(), Fingerprint::EMPTY);
    }

    #[test]
    fn seed_changes_the_fingerprint() {
        let v = Value::seq(["x", "y"]);
        assert_ne!(fingerprint(&v, 0, None).unwrap(), fingerprint(&v, 1, None).unwrap());
    }

    #[test]
    fn repeated_leaves_do_not_cancel() {
        let pair = Value::seq([1, 1]);
        assert_ne!(fingerprint(&pair, 0, None).unwrap(), Fingerprint::EMPTY);
    }

    #[test]
    fn overlay_changes_payload_of_matching_leaves() {
        let overlay = ConversionTable::new().with(LeafType::Int, |v| match v {
                                                     Value::Int(i) => Some(i.to_string().into_bytes()),
                                                     _ => None,
                                                 });
        let v = Value::Int(5);
        let with_overlay = fingerprint(&v, 0, Some(&overlay)).unwrap();
        assert_eq!(with_overlay, fingerprint(&Value::from("5"), 0, None).unwrap());
        assert_ne!(with_overlay, fingerprint(&v, 0, None).unwrap());
    }

    #[test]
    fn primitive_is_pluggable() {
        let v = Value::from("abc");
        let sha = Fingerprinter::new(0).with_primitive(Arc::new(Sha256Primitive));
        assert_ne!(sha.fingerprint(&v).unwrap(), Fingerprinter::new(0).fingerprint(&v).unwrap());
    }

    #[test]
    fn hex_is_zero_padded() {
        assert_eq!(Fingerprint::from(255).to_hex(), "00000000000000ff");
        assert_eq!(Fingerprint::from(255).to_string(), "00000000000000ff");
    }
}
