use hashsplit_core::SplitError;
use thiserror::Error;

/// Errores de la aplicación (lectura/escritura de datasets, configuración).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Error en IO: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON inválido en la línea {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("Error de serialización: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Error de configuración: {0}")]
    Config(String),
    #[error("Error de particionado: {0}")]
    Split(#[from] SplitError),
}
