// ==============================================================================
// main.rs - an-mean Entry Point
// ==============================================================================
// Description: Prints the mean AN (allele number) of a gzip-compressed VCF
// Created: 2026-10-18
// Version: 0.1.0
// ==============================================================================

use allele_number_mean::{compute_mean, OutputFormat, RunOptions};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "allele_number_mean=warn,an_mean=warn";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Gzip-compressed VCF file (.vcf.gz)
    input: PathBuf,

    /// Skip records without an AN value instead of failing
    #[arg(long, env = "AN_MEAN_SKIP_MISSING")]
    skip_missing: bool,

    /// Print the mean with a fixed number of decimals
    #[arg(long, conflicts_with = "json")]
    precision: Option<usize>,

    /// Print a JSON summary (sum, count, skipped, mean)
    #[arg(long)]
    json: bool,

    /// Log filter directive (e.g. "debug"); RUST_LOG is used when unset
    #[arg(long, env = "AN_MEAN_LOG")]
    log_level: Option<String>,
}

impl Args {
    fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Plain {
                precision: self.precision,
            }
        }
    }
}

fn init_tracing(log_level: Option<&str>) -> Result<()> {
    let filter = match log_level {
        Some(directive) => EnvFilter::try_new(directive)
            .with_context(|| format!("Invalid log filter: {}", directive))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
    };

    // Logs go to stderr; stdout carries only the result
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_level.as_deref())?;

    let options = RunOptions {
        skip_missing: args.skip_missing,
    };

    // Reported once, by anyhow, when main returns
    let summary = compute_mean(&args.input, &options).map_err(|e| {
        let kind = e.kind();
        anyhow::Error::new(e).context(format!(
            "Failed to average AN in {} ({})",
            args.input.display(),
            kind
        ))
    })?;

    let rendered = summary
        .render(args.output_format())
        .context("Failed to render summary")?;
    println!("{}", rendered);

    info!("Done: {} records", summary.count);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["an-mean", "in.vcf.gz"]).unwrap();

        assert_eq!(args.input, PathBuf::from("in.vcf.gz"));
        assert_eq!(args.output_format(), OutputFormat::Plain { precision: None });
    }

    #[test]
    fn test_args_json_and_precision_conflict() {
        assert!(Args::try_parse_from(["an-mean", "--json", "--precision", "2", "in.vcf.gz"]).is_err());
    }

    #[test]
    fn test_args_require_input() {
        assert!(Args::try_parse_from(["an-mean"]).is_err());
    }

    #[test]
    fn test_args_skip_missing_flag() {
        let args = Args::try_parse_from(["an-mean", "--skip-missing", "in.vcf.gz"]).unwrap();
        assert!(args.skip_missing);
    }

    #[test]
    fn test_args_skip_missing_from_env() {
        std::env::set_var("AN_MEAN_SKIP_MISSING", "true");
        let args = Args::try_parse_from(["an-mean", "in.vcf.gz"]);
        std::env::remove_var("AN_MEAN_SKIP_MISSING");

        assert!(args.unwrap().skip_missing);
    }

    #[test]
    fn test_args_precision() {
        let args = Args::try_parse_from(["an-mean", "--precision", "3", "in.vcf.gz"]).unwrap();
        assert_eq!(args.output_format(), OutputFormat::Plain { precision: Some(3) });
    }
}
