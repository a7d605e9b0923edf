//! Modelos neutrales (Value, LeafType, ContainerKind, CustomLeaf).

pub mod json;
pub mod value;

pub use value::{ContainerKind, CustomLeaf, LeafType, Value};
