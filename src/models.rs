// ==============================================================================
// models.rs - Run options and result summary
// ==============================================================================
// Description: Data structures shared by the pipeline and the CLI
// Created: 2026-10-18
// Version: 0.1.0
// ==============================================================================

use serde::{Deserialize, Serialize};

/// Pipeline behavior switches
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Skip records without a usable AN value instead of aborting the run
    pub skip_missing: bool,
}

/// How the final result is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Bare mean; `precision` fixes the number of decimals
    Plain { precision: Option<usize> },
    /// One-line JSON summary
    Json,
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Plain { precision: None }
    }
}

/// Result of a completed run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlleleNumberSummary {
    /// Sum of the first AN value of every accumulated record
    pub sum: i64,

    /// Number of accumulated records
    pub count: u64,

    /// Records skipped for a missing AN (always 0 unless skipping is enabled)
    pub skipped: u64,

    /// sum / count
    pub mean: f64,
}

impl AlleleNumberSummary {
    /// Render the summary as the program's single output line (no newline)
    pub fn render(&self, format: OutputFormat) -> Result<String, serde_json::Error> {
        match format {
            OutputFormat::Plain { precision: None } => Ok(self.mean.to_string()),
            OutputFormat::Plain {
                precision: Some(digits),
            } => Ok(format!("{:.*}", digits, self.mean)),
            OutputFormat::Json => serde_json::to_string(self),
        }
    }
}
