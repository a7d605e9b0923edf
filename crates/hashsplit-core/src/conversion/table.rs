use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use super::defaults::{intrinsic_bytes, DEFAULT_CONVERSIONS};
use super::merge::merge_tables;
use crate::errors::SplitError;
use crate::model::{LeafType, Value};

/// Converter de una hoja a su payload canónico. `None` significa que el
/// converter no sabe representar ese valor concreto.
pub type ConvertFn = Arc<dyn Fn(&Value) -> Option<Vec<u8>> + Send + Sync>;

/// Un tipo de hoja o un grupo de tipos que comparten converter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeGroup(Vec<LeafType>);

impl TypeGroup {
    pub fn new(types: impl IntoIterator<Item = LeafType>) -> Self {
        Self(types.into_iter().collect())
    }

    pub fn contains(&self, leaf_type: &LeafType) -> bool {
        self.0.contains(leaf_type)
    }

    pub fn types(&self) -> &[LeafType] {
        &self.0
    }
}

impl From<LeafType> for TypeGroup {
    fn from(t: LeafType) -> Self {
        Self(vec![t])
    }
}

impl<const N: usize> From<[LeafType; N]> for TypeGroup {
    fn from(types: [LeafType; N]) -> Self {
        Self(types.into())
    }
}

impl From<Vec<LeafType>> for TypeGroup {
    fn from(types: Vec<LeafType>) -> Self {
        Self(types)
    }
}

/// Registro ordenado de converters. La búsqueda recorre las entradas en orden
/// de registro y se queda con la primera cuyo grupo contiene el tipo de la
/// hoja. Registrar de nuevo el mismo grupo reemplaza el converter en su
/// posición original.
#[derive(Clone, Default)]
pub struct ConversionTable {
    pub(crate) entries: IndexMap<TypeGroup, ConvertFn>,
}

impl ConversionTable {
    /// Tabla vacía (útil como overlay).
    pub fn new() -> Self {
        Self::default()
    }

    /// Tabla por defecto del proceso: bool/int/float como double big-endian.
    pub fn defaults() -> &'static ConversionTable {
        &DEFAULT_CONVERSIONS
    }

    pub fn register<G, F>(&mut self, group: G, convert: F)
        where G: Into<TypeGroup>,
              F: Fn(&Value) -> Option<Vec<u8>> + Send + Sync + 'static
    {
        self.entries.insert(group.into(), Arc::new(convert));
    }

    /// Variante encadenable de `register`.
    pub fn with<G, F>(mut self, group: G, convert: F) -> Self
        where G: Into<TypeGroup>,
              F: Fn(&Value) -> Option<Vec<u8>> + Send + Sync + 'static
    {
        self.register(group, convert);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Grupos registrados, en orden de búsqueda.
    pub fn groups(&self) -> impl Iterator<Item = &TypeGroup> {
        self.entries.keys()
    }

    /// Tabla efectiva de `self` con `overlay` superpuesto. Ninguna de las dos
    /// se modifica.
    pub fn overlay(&self, overlay: &ConversionTable) -> ConversionTable {
        merge_tables(self, overlay)
    }

    /// Primer converter cuyo grupo contiene `leaf_type`.
    pub fn lookup(&self, leaf_type: &LeafType) -> Option<&ConvertFn> {
        self.entries
            .iter()
            .find(|(group, _)| group.contains(leaf_type))
            .map(|(_, convert)| convert)
    }

    /// Payload canónico de una hoja.
    ///
    /// Strings y bytes se usan tal cual. El resto pasa por la tabla y, si
    /// ninguna entrada aplica, por su representación intrínseca.
    pub fn convert<'v>(&self, leaf: &'v Value) -> Result<Cow<'v, [u8]>, SplitError> {
        match leaf {
            Value::Str(s) => return Ok(Cow::Borrowed(s.as_bytes())),
            Value::Bytes(b) => return Ok(Cow::Borrowed(b.as_slice())),
            _ => {}
        }
        let leaf_type = leaf.leaf_type()
                            .ok_or_else(|| SplitError::UnconvertibleLeaf("containers have no byte payload".into()))?;
        if let Some(convert) = self.lookup(&leaf_type) {
            return convert(leaf).map(Cow::Owned).ok_or_else(|| {
                SplitError::UnconvertibleLeaf(format!("converter registered for {leaf_type} rejected the value"))
            });
        }
        intrinsic_bytes(leaf).map(Cow::Owned).ok_or_else(|| {
            SplitError::UnconvertibleLeaf(format!("no converter registered for {leaf_type} and no intrinsic representation"))
        })
    }
}

impl fmt::Debug for ConversionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strings_and_bytes_bypass_the_table() {
        let table = ConversionTable::new().with(LeafType::Str, |_| Some(b"never".to_vec()));
        let s = Value::from("hola");
        assert_eq!(table.convert(&s).unwrap().as_ref(), b"hola");
        let b = Value::bytes(vec![1u8, 2, 3]);
        assert_eq!(table.convert(&b).unwrap().as_ref(), &[1, 2, 3]);
    }

    #[test]
    fn first_matching_group_wins() {
        let table = ConversionTable::new()
            .with([LeafType::Int, LeafType::Float], |_| Some(vec![1]))
            .with(LeafType::Int, |_| Some(vec![2]));
        assert_eq!(table.convert(&Value::Int(7)).unwrap().as_ref(), &[1]);
    }

    #[test]
    fn re_registering_a_group_keeps_its_position() {
        let mut table = ConversionTable::new()
            .with(LeafType::Int, |_| Some(vec![1]))
            .with(LeafType::Float, |_| Some(vec![2]));
        table.register(LeafType::Int, |_| Some(vec![3]));
        let groups: Vec<_> = table.groups().cloned().collect();
        assert_eq!(groups, vec![TypeGroup::from(LeafType::Int), TypeGroup::from(LeafType::Float)]);
        assert_eq!(table.convert(&Value::Int(0)).unwrap().as_ref(), &[3]);
    }

    #[test]
    fn rejected_value_is_unconvertible() {
        let table = ConversionTable::new().with(LeafType::Int, |_| None);
        assert!(matches!(table.convert(&Value::Int(1)), Err(SplitError::UnconvertibleLeaf(_))));
    }

    #[test]
    fn containers_are_not_leaves() {
        let table = ConversionTable::new();
        assert!(table.convert(&Value::seq([1])).is_err());
    }
}
