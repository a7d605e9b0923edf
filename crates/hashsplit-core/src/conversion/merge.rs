//! Fusión determinista de tablas de conversión.
//!
//! Las entradas del overlay van primero, en su orden de registro, seguidas de
//! las entradas de la base cuyo grupo no redefine el overlay. Como la búsqueda
//! es first-match, una entrada del caller gana siempre que su grupo contenga
//! el tipo de la hoja, aunque la base lo cubra con un grupo más amplio.

use super::table::ConversionTable;

/// Keys from `overlay` win over keys from `base`; neither table is mutated.
pub fn merge_tables(base: &ConversionTable, overlay: &ConversionTable) -> ConversionTable {
    let mut out = overlay.clone();
    for (group, convert) in base.entries.iter() {
        if !out.entries.contains_key(group) {
            out.entries.insert(group.clone(), convert.clone());
        }
    }
    out
}
