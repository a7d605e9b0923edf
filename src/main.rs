use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use hashsplit::{split_files, AppConfig};
use hashsplit_core::{PrimitiveKind, Value};

#[derive(Debug, Parser)]
#[command(name = "hashsplit", version, about = "Particionado train/test determinista por hash")]
struct Cli {
    #[command(flatten)]
    overrides: Overrides,
    #[command(subcommand)]
    command: Command,
}

/// Sobrescriben HASHSPLIT_TEST_FRACTION / HASHSPLIT_SEED / HASHSPLIT_PRIMITIVE.
#[derive(Debug, Args)]
struct Overrides {
    #[arg(long, global = true)]
    test_fraction: Option<f64>,
    #[arg(long, global = true)]
    seed: Option<u64>,
    #[arg(long, global = true)]
    primitive: Option<PrimitiveKind>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Particiona dos archivos JSONL alineados y escribe las cuatro salidas.
    Split {
        #[arg(long)]
        samples: PathBuf,
        #[arg(long)]
        labels: PathBuf,
        #[arg(long)]
        out_dir: PathBuf,
        #[arg(long)]
        parallel: bool,
    },
    /// Imprime el fingerprint hexadecimal de un valor JSON.
    Fingerprint {
        #[arg(long)]
        value: String,
    },
    /// Imprime `train` o `test` para un valor JSON.
    Assign {
        #[arg(long)]
        value: String,
    },
}

fn parse_value(raw: &str) -> Result<Value> {
    let json: serde_json::Value = serde_json::from_str(raw).context("--value no es JSON válido")?;
    Ok(Value::from(json))
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hashsplit=info,hashsplit_core=info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let o = cli.overrides;
    let config = AppConfig::from_env()?.with_overrides(o.test_fraction, o.seed, o.primitive);
    tracing::debug!(?config, "configuración cargada");

    match cli.command {
        Command::Split { samples, labels, out_dir, parallel } => {
            let splitter = config.splitter()?;
            let stats = split_files(&splitter, &samples, &labels, &out_dir, parallel)
                .with_context(|| format!("particionando {} / {}", samples.display(), labels.display()))?;
            println!("{}", serde_json::to_string(&stats)?);
        }
        Command::Fingerprint { value } => {
            let fp = config.fingerprinter().fingerprint(&parse_value(&value)?)?;
            println!("{fp}");
        }
        Command::Assign { value } => {
            let assignment = config.splitter()?.assign(&parse_value(&value)?)?;
            println!("{assignment}");
        }
    }
    Ok(())
}
