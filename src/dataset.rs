//! Datasets en JSON Lines: un valor JSON por línea, las líneas en blanco se
//! ignoran. `split_files` lee muestras y etiquetas, particiona y escribe los
//! cuatro archivos de salida en un directorio.
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::Value as Json;
use tracing::{debug, info};

use hashsplit_core::{Split, SplitStats, Splitter, Value};

use crate::errors::AppError;

pub const TRAIN_SAMPLES_FILE: &str = "train_samples.jsonl";
pub const TRAIN_LABELS_FILE: &str = "train_labels.jsonl";
pub const TEST_SAMPLES_FILE: &str = "test_samples.jsonl";
pub const TEST_LABELS_FILE: &str = "test_labels.jsonl";

/// Muestra leída de disco. Conserva el JSON original para reescribirlo sin
/// cambios y su `Value` para hashear.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonSample {
    raw: Json,
    value: Value,
}

impl JsonSample {
    pub fn new(raw: Json) -> Self {
        let value = Value::from(&raw);
        Self { raw, value }
    }

    pub fn raw(&self) -> &Json {
        &self.raw
    }

    pub fn into_raw(self) -> Json {
        self.raw
    }
}

impl AsRef<Value> for JsonSample {
    fn as_ref(&self) -> &Value {
        &self.value
    }
}

impl Serialize for JsonSample {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

/// Lee un documento JSON por línea. Los errores llevan el número de línea
/// (base 1).
pub fn read_jsonl<R: BufRead>(reader: R) -> Result<Vec<Json>, AppError> {
    let mut out = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let value = serde_json::from_str(&line).map_err(|source| AppError::Json { line: idx + 1,
                                                                                    source })?;
        out.push(value);
    }
    Ok(out)
}

pub fn read_samples<R: BufRead>(reader: R) -> Result<Vec<JsonSample>, AppError> {
    Ok(read_jsonl(reader)?.into_iter().map(JsonSample::new).collect())
}

pub fn write_jsonl<W, I>(mut writer: W, items: I) -> Result<(), AppError>
    where W: Write,
          I: IntoIterator,
          I::Item: Serialize
{
    for item in items {
        serde_json::to_writer(&mut writer, &item)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

fn write_file<I>(path: &Path, items: I) -> Result<(), AppError>
    where I: IntoIterator,
          I::Item: Serialize
{
    let file = File::create(path)?;
    write_jsonl(BufWriter::new(file), items)
}

/// Escribe las cuatro particiones en `dir` (se crea si no existe).
pub fn write_split(dir: &Path, split: Split<JsonSample, Json>) -> Result<(), AppError> {
    fs::create_dir_all(dir)?;
    let (train_samples, train_labels, test_samples, test_labels) = split.into_parts();
    write_file(&dir.join(TRAIN_SAMPLES_FILE), train_samples)?;
    write_file(&dir.join(TRAIN_LABELS_FILE), train_labels)?;
    write_file(&dir.join(TEST_SAMPLES_FILE), test_samples)?;
    write_file(&dir.join(TEST_LABELS_FILE), test_labels)?;
    debug!(dir = %dir.display(), "particiones escritas");
    Ok(())
}

pub fn split_files(splitter: &Splitter,
                   samples_path: &Path,
                   labels_path: &Path,
                   out_dir: &Path,
                   parallel: bool)
                   -> Result<SplitStats, AppError> {
    let samples = read_samples(BufReader::new(File::open(samples_path)?))?;
    let labels = read_jsonl(BufReader::new(File::open(labels_path)?))?;
    info!(samples = samples.len(), labels = labels.len(), parallel, "particionando dataset");

    let split = if parallel {
        splitter.split_par(samples, labels)?
    } else {
        splitter.split(samples, labels)?
    };
    let stats = split.stats();
    write_split(out_dir, split)?;
    info!(total = stats.total, train = stats.train, test = stats.test, "split completado");
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn read_jsonl_skips_blank_lines() {
        let input = "{\"a\": 1}\n\n  \n[1, 2]\n\"x\"\n";
        let docs = read_jsonl(input.as_bytes()).unwrap();
        assert_eq!(docs, vec![json!({"a": 1}), json!([1, 2]), json!("x")]);
    }

    #[test]
    fn read_jsonl_reports_line_number() {
        let input = "1\n2\n{broken\n";
        let err = read_jsonl(input.as_bytes()).unwrap_err();
        assert!(matches!(err, AppError::Json { line: 3, .. }), "{err:?}");
    }

    #[test]
    fn json_sample_keeps_raw_document() {
        let raw = json!({"b": [1, 2], "a": null});
        let sample = JsonSample::new(raw.clone());
        assert_eq!(sample.raw(), &raw);
        assert_eq!(sample.as_ref(), &Value::from(&raw));
        assert_eq!(serde_json::to_value(&sample).unwrap(), raw);
    }

    #[test]
    fn write_jsonl_one_document_per_line() {
        let mut buf = Vec::new();
        write_jsonl(&mut buf, [json!({"k": 1}), json!(2)]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "{\"k\":1}\n2\n");
    }
}
