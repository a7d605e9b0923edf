//! Configuración central de la aplicación.
//! Carga variables de entorno (.env) una sola vez y expone `AppConfig`.
//! Los flags de la CLI se aplican encima con `with_overrides`.
use std::env;
use std::fmt::Display;
use std::str::FromStr;

use dotenvy::dotenv;
use once_cell::sync::Lazy;
use serde::Serialize;

use hashsplit_core::constants::{DEFAULT_SEED, DEFAULT_TEST_FRACTION};
use hashsplit_core::{Fingerprinter, PrimitiveKind, SplitConfig, Splitter};

use crate::errors::AppError;

pub const ENV_TEST_FRACTION: &str = "HASHSPLIT_TEST_FRACTION";
pub const ENV_SEED: &str = "HASHSPLIT_SEED";
pub const ENV_PRIMITIVE: &str = "HASHSPLIT_PRIMITIVE";

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AppConfig {
    /// Fracción de test y semilla.
    pub split: SplitConfig,
    /// Primitiva de hash usada para los fingerprints.
    pub primitive: PrimitiveKind,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Lazy::force(&DOTENV_LOADED);
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Igual que `from_env` pero leyendo de `lookup` (tests, otros orígenes).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
        where F: Fn(&str) -> Option<String>
    {
        let test_fraction = parse_var(&lookup, ENV_TEST_FRACTION)?.unwrap_or(DEFAULT_TEST_FRACTION);
        let seed = parse_var(&lookup, ENV_SEED)?.unwrap_or(DEFAULT_SEED);
        let primitive = parse_var(&lookup, ENV_PRIMITIVE)?.unwrap_or_default();
        Ok(Self { split: SplitConfig::new(test_fraction, seed),
                  primitive })
    }

    pub fn with_overrides(mut self,
                          test_fraction: Option<f64>,
                          seed: Option<u64>,
                          primitive: Option<PrimitiveKind>)
                          -> Self {
        if let Some(f) = test_fraction {
            self.split.test_fraction = f;
        }
        if let Some(s) = seed {
            self.split.seed = s;
        }
        if let Some(p) = primitive {
            self.primitive = p;
        }
        self
    }

    /// No depende de la fracción de test.
    pub fn fingerprinter(&self) -> Fingerprinter {
        Fingerprinter::new(self.split.seed).with_primitive(self.primitive.build())
    }

    /// Valida la fracción ya con los overrides aplicados.
    pub fn splitter(&self) -> Result<Splitter, AppError> {
        Ok(Splitter::new(self.split)?.with_primitive(self.primitive.build()))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { split: SplitConfig::default(),
               primitive: PrimitiveKind::default() }
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>, AppError>
    where T: FromStr,
          T::Err: Display,
          F: Fn(&str) -> Option<String>
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw.trim()
                        .parse::<T>()
                        .map(Some)
                        .map_err(|e| AppError::Config(format!("{key}={raw}: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let cfg = AppConfig::from_lookup(|_| None).unwrap();
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn reads_all_variables() {
        let cfg = AppConfig::from_lookup(lookup_from(&[(ENV_TEST_FRACTION, "0.1"),
                                                       (ENV_SEED, "42"),
                                                       (ENV_PRIMITIVE, "sha256")])).unwrap();
        assert_eq!(cfg.split, SplitConfig::new(0.1, 42));
        assert_eq!(cfg.primitive, PrimitiveKind::Sha256);
    }

    #[test]
    fn malformed_values_are_config_errors() {
        let err = AppConfig::from_lookup(lookup_from(&[(ENV_SEED, "-1")])).unwrap_err();
        assert!(matches!(err, AppError::Config(ref msg) if msg.starts_with("HASHSPLIT_SEED=-1")));
        let err = AppConfig::from_lookup(lookup_from(&[(ENV_PRIMITIVE, "md5")])).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn out_of_range_fraction_is_a_split_error() {
        let cfg = AppConfig::from_lookup(lookup_from(&[(ENV_TEST_FRACTION, "1.5")])).unwrap();
        assert!(matches!(cfg.splitter(), Err(AppError::Split(_))));
    }

    #[test]
    fn fingerprinter_ignores_invalid_fraction() {
        let cfg = AppConfig::from_lookup(lookup_from(&[(ENV_TEST_FRACTION, "2"), (ENV_SEED, "9")])).unwrap();
        let value = hashsplit_core::Value::from("x");
        assert_eq!(cfg.fingerprinter().fingerprint(&value).unwrap(),
                   hashsplit_core::fingerprint(&value, 9, None).unwrap());
    }

    #[test]
    fn override_replaces_invalid_environment_fraction() {
        let cfg = AppConfig::from_lookup(lookup_from(&[(ENV_TEST_FRACTION, "2")])).unwrap()
                                                                                  .with_overrides(Some(0.5), None, None);
        let splitter = cfg.splitter().unwrap();
        assert_eq!(splitter.modulus().get(), 2);
    }

    #[test]
    fn overrides_win_over_environment() {
        let cfg = AppConfig::default().with_overrides(Some(0.5), None, Some(PrimitiveKind::Sha256));
        assert_eq!(cfg.split.test_fraction, 0.5);
        assert_eq!(cfg.split.seed, DEFAULT_SEED);
        assert_eq!(cfg.primitive, PrimitiveKind::Sha256);
    }
}
