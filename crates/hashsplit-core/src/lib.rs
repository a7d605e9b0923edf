//! hashsplit-core: particionado train/test determinista por hash estructural.
//!
//! Dos piezas en serie:
//! - canonicalizador + hasher (`hashing`): reduce cualquier `Value` anidado a
//!   una secuencia canónica de hojas y la resume en un `Fingerprint`;
//! - splitter (`split`): asigna cada par (muestra, etiqueta) a train o test
//!   según `fingerprint mod m`.
//!
//! Nada se persiste: la misma muestra con la misma semilla cae siempre en la
//! misma partición, en cualquier proceso o máquina.
pub mod constants;
pub mod conversion;
pub mod errors;
pub mod hashing;
pub mod model;
pub mod split;

pub use conversion::{ConversionTable, TypeGroup};
pub use errors::SplitError;
pub use hashing::{fingerprint, flatten, Fingerprint, Fingerprinter, HashPrimitive, PrimitiveKind};
pub use model::{ContainerKind, CustomLeaf, LeafType, Value};
pub use split::{hash_split, Assignment, Modulus, Split, SplitConfig, SplitStats, Splitter};
