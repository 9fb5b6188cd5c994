use std::path::PathBuf;

use anyhow::Context;
use chromalign::{ChromalignConfig, LoggingConfig, compare_files, format_score};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Compare two audio files by globally aligning their Chromaprint fingerprints.
#[derive(Parser)]
#[command(name = "chromalign", version)]
struct Cli {
    /// First audio file
    first: PathBuf,

    /// Second audio file
    second: PathBuf,

    /// YAML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Penalty for opening a gap run (must be <= 0)
    #[arg(long, allow_negative_numbers = true)]
    gap_open: Option<i32>,

    /// Penalty for each further gap in a run (must be <= 0)
    #[arg(long, allow_negative_numbers = true)]
    gap_extend: Option<i32>,

    /// Path to the fpcalc binary
    #[arg(long)]
    fpcalc: Option<PathBuf>,

    /// Seconds of audio to fingerprint
    #[arg(long)]
    length: Option<u32>,

    /// Precompute frame scores on the rayon pool
    #[arg(long)]
    parallel: bool,

    /// Print the full comparison report as JSON
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn load_config(&self) -> anyhow::Result<ChromalignConfig> {
        let mut cfg = match &self.config {
            Some(path) => ChromalignConfig::from_file(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => ChromalignConfig::default(),
        };

        if let Some(open) = self.gap_open {
            cfg.alignment.gap_open = open;
        }
        if let Some(extend) = self.gap_extend {
            cfg.alignment.gap_extend = extend;
        }
        if let Some(binary) = &self.fpcalc {
            cfg.fpcalc.binary = binary.clone();
        }
        if self.length.is_some() {
            cfg.fpcalc.length_secs = self.length;
        }
        if self.parallel {
            cfg.alignment.use_parallel = true;
        }

        cfg.validate().context("invalid command-line overrides")?;
        Ok(cfg)
    }
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = cli.load_config()?;
    init_tracing(&cfg.logging);

    let report = compare_files(&cli.first, &cli.second, &cfg)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Similarity score: {}", format_score(report.similarity()));
    }

    Ok(())
}
