//! Tabla de conversión: registro ordenado `grupo de tipos -> converter` que
//! produce el payload en bytes de cada hoja atómica.
//!
//! La tabla por defecto es configuración inmutable del proceso. Cada llamada
//! puede superponer su propia tabla (`overlay`) sin mutar la base.

pub mod defaults;
pub mod merge;
pub mod table;

pub use defaults::{intrinsic_bytes, numeric_as_be_f64};
pub use merge::merge_tables;
pub use table::{ConversionTable, ConvertFn, TypeGroup};
