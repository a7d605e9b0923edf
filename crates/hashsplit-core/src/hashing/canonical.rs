//! Canonicalización: reduce un `Value` arbitrario a la secuencia ordenada de
//! hojas atómicas que alimenta el hashing.
//!
//! - `Seq`: se recorre en el orden dado.
//! - `Set`: se ordena por valor; de los elementos iguales (`1`, `1.0`, `true`)
//!   queda el de menor rango (bool < int < float), sea cual sea el orden de
//!   entrada.
//! - `Map`: se ordena por clave; ante claves iguales queda la primera clave
//!   con el último valor. Cada entrada aporta las hojas de la clave y después
//!   las del valor.
//! - Cualquier otra variante es una hoja (strings y bytes incluidos).
//!
//! Orden entre claves: números (bool/int/float) entre sí, strings entre sí,
//! bytes entre sí y secuencias lexicográficamente. NaN, null, sets, maps y
//! hojas custom solo son comparables por igualdad: el error `UnorderableKeys`
//! aparece cuando dos claves vecinas no se pueden ordenar, no por la mera
//! presencia de una de ellas.

use std::cmp::Ordering;

use crate::errors::SplitError;
use crate::model::Value;

/// Hojas de `value` en orden canónico.
pub fn flatten(value: &Value) -> Result<Vec<&Value>, SplitError> {
    let mut leaves = Vec::new();
    flatten_into(value, &mut leaves)?;
    Ok(leaves)
}

fn flatten_into<'a>(value: &'a Value, out: &mut Vec<&'a Value>) -> Result<(), SplitError> {
    match value {
        Value::Seq(items) => {
            for item in items {
                flatten_into(item, out)?;
            }
        }
        Value::Set(items) => {
            for item in normalize_set(items)? {
                flatten_into(item, out)?;
            }
        }
        Value::Map(entries) => {
            for (key, val) in normalize_map(entries)? {
                flatten_into(key, out)?;
                flatten_into(val, out)?;
            }
        }
        leaf => out.push(leaf),
    }
    Ok(())
}

fn normalize_set(items: &[Value]) -> Result<Vec<&Value>, SplitError> {
    let mut keyed: Vec<_> = items.iter().map(|v| (SortKey::of(v), v)).collect();
    keyed.sort_by(|a, b| a.0.canonical_cmp(&b.0));
    check_adjacent(&keyed, "set elements")?;
    keyed.dedup_by(|later, earlier| earlier.0.strict_cmp(&later.0) == Some(Ordering::Equal));
    Ok(keyed.into_iter().map(|(_, v)| v).collect())
}

fn normalize_map(entries: &[(Value, Value)]) -> Result<Vec<(&Value, &Value)>, SplitError> {
    let mut keyed: Vec<_> = entries.iter().map(|(k, v)| (SortKey::of(k), (k, v))).collect();
    // sort estable por valor de la clave: las claves iguales conservan el
    // orden de inserción.
    keyed.sort_by(|a, b| a.0.value_cmp(&b.0));
    check_adjacent(&keyed, "mapping keys")?;
    let mut out: Vec<(SortKey<'_>, (&Value, &Value))> = Vec::with_capacity(keyed.len());
    for (key, (k, v)) in keyed {
        match out.last_mut() {
            Some(last) if last.0.strict_cmp(&key) == Some(Ordering::Equal) => last.1 .1 = v,
            _ => out.push((key, (k, v))),
        }
    }
    Ok(out.into_iter().map(|(_, e)| e).collect())
}

/// Cada par adyacente del orden resultante debe ser comparable en sentido
/// estricto (misma clase en la posición decisiva, o iguales).
fn check_adjacent<T>(keyed: &[(SortKey<'_>, T)], what: &str) -> Result<(), SplitError> {
    for pair in keyed.windows(2) {
        if pair[0].0.strict_cmp(&pair[1].0).is_none() {
            return Err(SplitError::UnorderableKeys(format!("{what}: cannot order {} against {}",
                                                           pair[0].0.describe(),
                                                           pair[1].0.describe())));
        }
    }
    Ok(())
}

#[derive(Debug)]
enum SortKey<'a> {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(&'a str),
    Bytes(&'a [u8]),
    Seq(Vec<SortKey<'a>>),
    /// NaN, null, sets, maps y custom: solo igualdad.
    Opaque(&'a Value),
}

#[derive(Clone, Copy)]
enum Number {
    Int(i64),
    Float(f64),
}

impl<'a> SortKey<'a> {
    fn of(value: &'a Value) -> Self {
        match value {
            Value::Bool(b) => SortKey::Bool(*b),
            Value::Int(i) => SortKey::Int(*i),
            Value::Float(f) if !f.is_nan() => SortKey::Float(*f),
            Value::Str(s) => SortKey::Str(s),
            Value::Bytes(b) => SortKey::Bytes(b),
            Value::Seq(items) => SortKey::Seq(items.iter().map(SortKey::of).collect()),
            other => SortKey::Opaque(other),
        }
    }

    fn number(&self) -> Option<Number> {
        match self {
            SortKey::Bool(b) => Some(Number::Int(i64::from(*b))),
            SortKey::Int(i) => Some(Number::Int(*i)),
            SortKey::Float(f) => Some(Number::Float(*f)),
            _ => None,
        }
    }

    fn class(&self) -> u8 {
        match self {
            SortKey::Bool(_) | SortKey::Int(_) | SortKey::Float(_) => 0,
            SortKey::Str(_) => 1,
            SortKey::Bytes(_) => 2,
            SortKey::Seq(_) => 3,
            SortKey::Opaque(_) => 4,
        }
    }

    /// Rango entre números iguales en valor.
    fn rank(&self) -> u8 {
        match self {
            SortKey::Int(_) => 1,
            SortKey::Float(_) => 2,
            _ => 0,
        }
    }

    fn describe(&self) -> String {
        match self {
            SortKey::Bool(_) | SortKey::Int(_) | SortKey::Float(_) => "number".into(),
            SortKey::Str(_) => "str".into(),
            SortKey::Bytes(_) => "bytes".into(),
            SortKey::Seq(_) => "sequence".into(),
            SortKey::Opaque(Value::Float(_)) => "NaN".into(),
            SortKey::Opaque(Value::Null) => "null".into(),
            SortKey::Opaque(Value::Set(_)) => "set".into(),
            SortKey::Opaque(Value::Map(_)) => "mapping".into(),
            SortKey::Opaque(Value::Custom(leaf)) => format!("custom<{}>", leaf.type_name()),
            SortKey::Opaque(_) => "value".into(),
        }
    }

    /// Comparación de valores de la misma clase; `None` si la posición
    /// decisiva mezcla clases o cae en dos opacos distintos.
    fn strict_cmp(&self, other: &Self) -> Option<Ordering> {
        if let (Some(a), Some(b)) = (self.number(), other.number()) {
            return match (a, b) {
                (Number::Int(a), Number::Int(b)) => Some(a.cmp(&b)),
                (Number::Float(a), Number::Float(b)) => a.partial_cmp(&b),
                (Number::Int(a), Number::Float(b)) => Some(cmp_int_float(a, b)),
                (Number::Float(a), Number::Int(b)) => Some(cmp_int_float(b, a).reverse()),
            };
        }
        match (self, other) {
            (SortKey::Str(a), SortKey::Str(b)) => Some(a.cmp(b)),
            (SortKey::Bytes(a), SortKey::Bytes(b)) => Some(a.cmp(b)),
            (SortKey::Seq(a), SortKey::Seq(b)) => {
                for (x, y) in a.iter().zip(b) {
                    match x.strict_cmp(y)? {
                        Ordering::Equal => continue,
                        ord => return Some(ord),
                    }
                }
                Some(a.len().cmp(&b.len()))
            }
            (SortKey::Opaque(a), SortKey::Opaque(b)) if a == b => Some(Ordering::Equal),
            _ => None,
        }
    }

    /// Orden total por valor: el estricto cuando existe, si no por clase.
    /// Los opacos quedan todos en la misma clase de equivalencia.
    fn value_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Seq(a), SortKey::Seq(b)) => {
                for (x, y) in a.iter().zip(b) {
                    match x.value_cmp(y) {
                        Ordering::Equal => continue,
                        ord => return ord,
                    }
                }
                a.len().cmp(&b.len())
            }
            _ => self.strict_cmp(other).unwrap_or_else(|| self.class().cmp(&other.class())),
        }
    }

    /// Desempate entre claves iguales en valor: rango numérico y bits del
    /// float (`0.0` frente a `-0.0`).
    fn tie_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Seq(a), SortKey::Seq(b)) => {
                for (x, y) in a.iter().zip(b) {
                    match x.tie_cmp(y) {
                        Ordering::Equal => continue,
                        ord => return ord,
                    }
                }
                a.len().cmp(&b.len())
            }
            (SortKey::Float(a), SortKey::Float(b)) => a.to_bits().cmp(&b.to_bits()),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    /// Orden total que no depende del orden de entrada salvo entre opacos.
    fn canonical_cmp(&self, other: &Self) -> Ordering {
        self.value_cmp(other).then_with(|| self.tie_cmp(other))
    }
}

/// Comparación exacta entre un entero y un float sin NaN.
fn cmp_int_float(i: i64, f: f64) -> Ordering {
    // i64::MIN es exactamente -2^63; 2^63 ya no cabe en i64.
    const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;
    if f >= TWO_POW_63 {
        return Ordering::Less;
    }
    if f < -TWO_POW_63 {
        return Ordering::Greater;
    }
    let truncated = f.trunc();
    match i.cmp(&(truncated as i64)) {
        Ordering::Equal => {
            if f > truncated {
                Ordering::Less
            } else if f < truncated {
                Ordering::Greater
            } else {
                Ordering::Equal
            }
        }
        ord => ord,
    }
}
