//! Conversiones por defecto y representaciones intrínsecas.
//!
//! Los números (bool, int, float) se codifican como double IEEE-754
//! big-endian, así que `1`, `1.0` y `true` producen el mismo payload. Los
//! enteros por encima de 2^53 pierden precisión.
use once_cell::sync::Lazy;

use super::table::ConversionTable;
use crate::constants::NULL_PAYLOAD;
use crate::model::{LeafType, Value};

pub(crate) static DEFAULT_CONVERSIONS: Lazy<ConversionTable> = Lazy::new(|| {
    ConversionTable::new().with([LeafType::Bool, LeafType::Int, LeafType::Float], numeric_as_be_f64)
});

/// Double big-endian del valor numérico. `-0.0` se normaliza a `0.0`.
pub fn numeric_as_be_f64(value: &Value) -> Option<Vec<u8>> {
    let n = value.as_f64()?;
    let n = if n == 0.0 { 0.0 } else { n };
    Some(n.to_be_bytes().to_vec())
}

/// Representación propia de una hoja cuando ninguna entrada de la tabla
/// aplica. Las hojas custom delegan en `CustomLeaf::intrinsic_bytes`.
pub fn intrinsic_bytes(leaf: &Value) -> Option<Vec<u8>> {
    match leaf {
        Value::Null => Some(NULL_PAYLOAD.to_vec()),
        Value::Bool(b) => Some(vec![u8::from(*b)]),
        Value::Int(i) => Some(i.to_be_bytes().to_vec()),
        Value::Float(f) => Some(f.to_be_bytes().to_vec()),
        Value::Str(s) => Some(s.as_bytes().to_vec()),
        Value::Bytes(b) => Some(b.clone()),
        Value::Custom(leaf) => leaf.intrinsic_bytes(),
        Value::Seq(_) | Value::Set(_) | Value::Map(_) => None,
    }
}
