// ==============================================================================
// lib.rs - Allele Number Mean Library
// ==============================================================================
// Description: Library interface for streaming AN averaging over VCF.gz files
// Created: 2026-10-18
// Version: 0.1.0
// ==============================================================================

pub mod error;
pub mod models;
pub mod parsers;
pub mod pipeline;
pub mod stream;

pub use error::AnMeanError;
pub use models::{AlleleNumberSummary, OutputFormat, RunOptions};
pub use pipeline::{compute_mean, run_lines, Pipeline};
