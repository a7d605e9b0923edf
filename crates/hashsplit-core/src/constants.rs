//! Constantes del núcleo de particionado.
//!
//! Algunos de estos valores participan en el cálculo de fingerprints. Cambiar
//! `NULL_PAYLOAD` o el orden de bytes de la semilla cambia todas las
//! particiones ya recomputadas por otros procesos.

/// Semilla por defecto cuando el caller no pide una partición alternativa.
pub const DEFAULT_SEED: u64 = 0;

/// Fracción de test por defecto (modulus 5).
pub const DEFAULT_TEST_FRACTION: f64 = 0.2;

/// Payload intrínseco de `Value::Null`. No es UTF-8 válido, así que ningún
/// string puede producir el mismo payload.
pub const NULL_PAYLOAD: &[u8] = &[0xFF];

/// Ancho (en bytes) del entero que devuelve la primitiva de hash.
pub const FINGERPRINT_BYTES: usize = 8;
