// ==============================================================================
// pipeline.rs - AN averaging pipeline
// ==============================================================================
// Description: Header/data classification, lazy parser initialization,
//              AN extraction and mean accumulation
// Created: 2026-10-18
// Version: 0.1.0
// ==============================================================================
// Flow:
//   gzip line stream -> classify ('#' = header) -> first data line builds the
//   parser from the collected header -> parse record -> INFO/AN[0] -> sum/count
// ==============================================================================

use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::AnMeanError;
use crate::models::{AlleleNumberSummary, RunOptions};
use crate::parsers::{InfoFields, InfoValue, VCFParser, VariantParser};
use crate::stream::{open_gzip_lines, Line};

/// INFO key holding the allele number
pub const AN_KEY: &str = "AN";

/// Prefix marking a header line
const HEADER_PREFIX: char = '#';

/// Parser lifecycle: header lines are collected until the first data line,
/// which builds the parser exactly once
enum ParserState<P> {
    AwaitingHeader(Vec<String>),
    Ready(P),
}

/// Running sum/count of extracted AN values
///
/// AN is a VCF Integer (`i32`); the sum is kept in `i64`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MeanAccumulator {
    sum: i64,
    count: u64,
    skipped: u64,
}

impl MeanAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, value: i32) {
        self.sum += i64::from(value);
        self.count += 1;
    }

    pub fn skip(&mut self) {
        self.skipped += 1;
    }

    /// sum / count, or `DivisionByZero` when nothing was accumulated
    pub fn mean(&self) -> Result<f64, AnMeanError> {
        if self.count == 0 {
            return Err(AnMeanError::DivisionByZero);
        }
        Ok(self.sum as f64 / self.count as f64)
    }

    pub fn summary(&self) -> Result<AlleleNumberSummary, AnMeanError> {
        Ok(AlleleNumberSummary {
            sum: self.sum,
            count: self.count,
            skipped: self.skipped,
            mean: self.mean()?,
        })
    }
}

/// Extract the first AN value from a record's INFO fields
///
/// # Errors
/// * `MissingField` - AN is absent, has no values, or its first value is missing (`.`)
/// * `RecordParse` - the first value is not an integer
pub fn extract_allele_number(info: &InfoFields, line: usize) -> Result<i32, AnMeanError> {
    match info.get(AN_KEY).and_then(|values| values.first()) {
        Some(Some(InfoValue::Integer(n))) => Ok(*n),
        Some(Some(other)) => Err(AnMeanError::RecordParse {
            line,
            message: format!("{} value {:?} is not an integer", AN_KEY, other),
        }),
        Some(None) | None => Err(AnMeanError::MissingField {
            line,
            key: AN_KEY.to_string(),
        }),
    }
}

/// Single-pass driver owning the header accumulator, the parser and the
/// accumulator
pub struct Pipeline<P> {
    state: ParserState<P>,
    accumulator: MeanAccumulator,
    options: RunOptions,
}

impl<P: VariantParser> Pipeline<P> {
    pub fn new(options: RunOptions) -> Self {
        Self {
            state: ParserState::AwaitingHeader(Vec::new()),
            accumulator: MeanAccumulator::new(),
            options,
        }
    }

    /// The parser, once the first data line has been seen
    pub fn parser(&self) -> Option<&P> {
        match &self.state {
            ParserState::Ready(parser) => Some(parser),
            ParserState::AwaitingHeader(_) => None,
        }
    }

    /// Classify and process one input line
    pub fn process_line(&mut self, line: &Line) -> Result<(), AnMeanError> {
        if line.text.starts_with(HEADER_PREFIX) {
            match &mut self.state {
                ParserState::AwaitingHeader(header) => header.push(line.text.clone()),
                ParserState::Ready(_) => {
                    debug!("Ignoring header line {} after data lines", line.number)
                }
            }
            return Ok(());
        }

        let parser = self.ready_parser()?;

        let record = parser
            .parse_line(&line.text)
            .map_err(|e| AnMeanError::RecordParse {
                line: line.number,
                message: e.to_string(),
            })?;

        match extract_allele_number(&record.info, line.number) {
            Ok(value) => self.accumulator.add(value),
            Err(AnMeanError::MissingField { line, key }) if self.options.skip_missing => {
                warn!(
                    "Skipping record {}:{} at line {}: no {} value",
                    record.chromosome,
                    record.position.unwrap_or(0),
                    line,
                    key
                );
                self.accumulator.skip();
            }
            Err(e) => return Err(e),
        }

        Ok(())
    }

    /// Consume the pipeline and compute the result
    pub fn finish(self) -> Result<AlleleNumberSummary, AnMeanError> {
        self.accumulator.summary()
    }

    fn ready_parser(&mut self) -> Result<&P, AnMeanError> {
        if let ParserState::AwaitingHeader(header) = &self.state {
            let mut text = header.join("\n");
            text.push('\n');

            let parser = P::from_header(&text).map_err(|e| AnMeanError::Schema(e.to_string()))?;
            debug!("Initialized VCF parser from {} header lines", header.len());

            self.state = ParserState::Ready(parser);
        }

        match &self.state {
            ParserState::Ready(parser) => Ok(parser),
            ParserState::AwaitingHeader(_) => {
                Err(AnMeanError::Schema("VCF parser is not initialized".to_string()))
            }
        }
    }
}

/// Drive a pipeline over an arbitrary line source
pub fn run_lines<P, I>(lines: I, options: &RunOptions) -> Result<AlleleNumberSummary, AnMeanError>
where
    P: VariantParser,
    I: IntoIterator<Item = Result<Line, AnMeanError>>,
{
    let mut pipeline = Pipeline::<P>::new(options.clone());

    for line in lines {
        pipeline.process_line(&line?)?;
    }

    pipeline.finish()
}

/// Compute the mean first AN value of a gzip-compressed VCF file
///
/// # Example
/// ```no_run
/// use allele_number_mean::{compute_mean, RunOptions};
///
/// let summary = compute_mean("chr22.vcf.gz", &RunOptions::default())?;
/// println!("{}", summary.mean);
/// # Ok::<(), allele_number_mean::AnMeanError>(())
/// ```
pub fn compute_mean(
    path: impl AsRef<Path>,
    options: &RunOptions,
) -> Result<AlleleNumberSummary, AnMeanError> {
    let path = path.as_ref();
    info!("Computing mean {} for {}", AN_KEY, path.display());

    let lines = open_gzip_lines(path)?;
    let summary = run_lines::<VCFParser, _>(lines, options)?;

    info!(
        "Accumulated {} records ({} skipped), mean {} = {}",
        summary.count, summary.skipped, AN_KEY, summary.mean
    );

    Ok(summary)
}
