//! `Value`: representación neutral de una muestra (o de un sub-valor) a
//! hashear.
//!
//! Cada variante pertenece a una de tres clases (`ContainerKind`):
//! - atómicos: null, bool, int, float, string, bytes y hojas `Custom`;
//! - contenedores ordenados: `Seq` (el orden es parte del contenido);
//! - contenedores no ordenados: `Set` y `Map` (el orden de inserción no
//!   significa nada y se normaliza antes de hashear).
//!
//! `Value` es un árbol con ownership, así que no puede contener ciclos.
use std::any::Any;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Clase de un valor desde el punto de vista del canonicalizador.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    Atomic,
    Ordered,
    Unordered,
}

/// Tipo de una hoja atómica. Es la clave de la tabla de conversión.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LeafType {
    Null,
    Bool,
    Int,
    Float,
    Str,
    Bytes,
    /// Hoja definida por el usuario, identificada por `CustomLeaf::type_name`.
    Custom(String),
}

impl LeafType {
    pub fn custom(name: impl Into<String>) -> Self {
        LeafType::Custom(name.into())
    }
}

impl fmt::Display for LeafType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeafType::Null => f.write_str("null"),
            LeafType::Bool => f.write_str("bool"),
            LeafType::Int => f.write_str("int"),
            LeafType::Float => f.write_str("float"),
            LeafType::Str => f.write_str("str"),
            LeafType::Bytes => f.write_str("bytes"),
            LeafType::Custom(name) => write!(f, "custom<{name}>"),
        }
    }
}

/// Hoja extensible por el usuario.
///
/// Una hoja custom se convierte a bytes con la entrada de la tabla registrada
/// para `LeafType::Custom(type_name)`; si no hay ninguna se usa
/// `intrinsic_bytes`. Si tampoco existe, el fingerprint falla con
/// `UnconvertibleLeaf`.
pub trait CustomLeaf: fmt::Debug + Send + Sync {
    /// Nombre estable del tipo (no debe depender de la dirección en memoria).
    fn type_name(&self) -> &str;

    /// Representación estable en bytes, si el tipo tiene una.
    fn intrinsic_bytes(&self) -> Option<Vec<u8>> {
        None
    }

    /// Acceso al valor concreto desde un converter.
    fn as_any(&self) -> &dyn Any;
}

#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    Seq(Vec<Value>),
    Set(Vec<Value>),
    /// Pares clave/valor en orden de inserción. Ante claves iguales gana la
    /// última, igual que al construir un diccionario.
    Map(Vec<(Value, Value)>),
    Custom(Arc<dyn CustomLeaf>),
}

impl Value {
    pub fn seq<I, T>(items: I) -> Self
        where I: IntoIterator<Item = T>,
              T: Into<Value>
    {
        Value::Seq(items.into_iter().map(Into::into).collect())
    }

    pub fn set<I, T>(items: I) -> Self
        where I: IntoIterator<Item = T>,
              T: Into<Value>
    {
        Value::Set(items.into_iter().map(Into::into).collect())
    }

    pub fn map<I, K, V>(entries: I) -> Self
        where I: IntoIterator<Item = (K, V)>,
              K: Into<Value>,
              V: Into<Value>
    {
        Value::Map(entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Value::Bytes(bytes.into())
    }

    pub fn custom<C: CustomLeaf + 'static>(leaf: C) -> Self {
        Value::Custom(Arc::new(leaf))
    }

    pub fn kind(&self) -> ContainerKind {
        match self {
            Value::Seq(_) => ContainerKind::Ordered,
            Value::Set(_) | Value::Map(_) => ContainerKind::Unordered,
            _ => ContainerKind::Atomic,
        }
    }

    /// Tipo de hoja; `None` para contenedores.
    pub fn leaf_type(&self) -> Option<LeafType> {
        match self {
            Value::Null => Some(LeafType::Null),
            Value::Bool(_) => Some(LeafType::Bool),
            Value::Int(_) => Some(LeafType::Int),
            Value::Float(_) => Some(LeafType::Float),
            Value::Str(_) => Some(LeafType::Str),
            Value::Bytes(_) => Some(LeafType::Bytes),
            Value::Custom(leaf) => Some(LeafType::custom(leaf.type_name())),
            Value::Seq(_) | Value::Set(_) | Value::Map(_) => None,
        }
    }

    /// Valor numérico de bool/int/float (`true` es 1.0).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Downcast de una hoja custom a su tipo concreto.
    pub fn downcast_custom<T: 'static>(&self) -> Option<&T> {
        match self {
            Value::Custom(leaf) => leaf.as_any().downcast_ref::<T>(),
            _ => None,
        }
    }
}

/// Igualdad literal (no canónica): `Set`/`Map` se comparan en el orden dado y
/// las hojas custom por identidad.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Seq(a), Value::Seq(b)) | (Value::Set(a), Value::Set(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Custom(a), Value::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl AsRef<Value> for Value {
    fn as_ref(&self) -> &Value {
        self
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Seq(v)
    }
}

// Las tuplas son secuencias ordenadas.
impl<A: Into<Value>, B: Into<Value>> From<(A, B)> for Value {
    fn from((a, b): (A, B)) -> Self {
        Value::Seq(vec![a.into(), b.into()])
    }
}

impl<A: Into<Value>, B: Into<Value>, C: Into<Value>> From<(A, B, C)> for Value {
    fn from((a, b, c): (A, B, C)) -> Self {
        Value::Seq(vec![a.into(), b.into(), c.into()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Point(i32, i32);

    impl CustomLeaf for Point {
        fn type_name(&self) -> &str {
            "point"
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn kinds_follow_variants() {
        assert_eq!(Value::from("abc").kind(), ContainerKind::Atomic);
        assert_eq!(Value::bytes(b"abc".to_vec()).kind(), ContainerKind::Atomic);
        assert_eq!(Value::seq([1, 2]).kind(), ContainerKind::Ordered);
        assert_eq!(Value::set([1, 2]).kind(), ContainerKind::Unordered);
        assert_eq!(Value::map([("a", 1)]).kind(), ContainerKind::Unordered);
        assert_eq!(Value::custom(Point(1, 2)).kind(), ContainerKind::Atomic);
    }

    #[test]
    fn leaf_type_of_custom_uses_type_name() {
        let v = Value::custom(Point(1, 2));
        assert_eq!(v.leaf_type(), Some(LeafType::custom("point")));
        assert_eq!(v.downcast_custom::<Point>().map(|p| p.0 + p.1), Some(3));
        assert!(Value::seq([1]).leaf_type().is_none());
    }

    #[test]
    fn tuples_become_sequences() {
        let v: Value = ("a", 0).into();
        assert_eq!(v, Value::Seq(vec![Value::Str("a".into()), Value::Int(0)]));
    }

    #[test]
    fn numeric_view_collapses_bool_int_float() {
        assert_eq!(Value::Bool(true).as_f64(), Some(1.0));
        assert_eq!(Value::Int(1).as_f64(), Value::Float(1.0).as_f64());
        assert_eq!(Value::from("1").as_f64(), None);
    }
}
