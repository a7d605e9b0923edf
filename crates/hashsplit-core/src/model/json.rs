//! Puente desde `serde_json::Value`: objetos -> `Map`, arrays -> `Seq`,
//! números -> `Int` (si caben en i64) o `Float`.
use serde_json::Value as Json;

use super::Value;

impl From<&Json> for Value {
    fn from(json: &Json) -> Self {
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(*b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Json::String(s) => Value::Str(s.clone()),
            Json::Array(items) => Value::Seq(items.iter().map(Value::from).collect()),
            Json::Object(map) => {
                Value::Map(map.iter().map(|(k, v)| (Value::Str(k.clone()), Value::from(v))).collect())
            }
        }
    }
}

impl From<Json> for Value {
    fn from(json: Json) -> Self {
        Value::from(&json)
    }
}
