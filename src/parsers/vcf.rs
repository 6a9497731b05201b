// ==============================================================================
// parsers/vcf.rs - VCF header/record parser
// ==============================================================================
// Description: Line-at-a-time VCF parsing backed by noodles-vcf
// Created: 2026-10-18
// Version: 0.2.0
// ==============================================================================
// References:
// - VCF 4.3 Spec: https://samtools.github.io/hts-specs/VCFv4.3.pdf
// - noodles-vcf: https://docs.rs/noodles-vcf/0.81.0/noodles_vcf/
// ==============================================================================

use noodles_vcf as vcf;
use noodles_vcf::variant::record::info::field::value::array::Values;
use noodles_vcf::variant::record::info::field::value::Array;
use noodles_vcf::variant::record::info::field::Value;
use noodles_vcf::variant::record::{AlternateBases, Info as _};
use std::io;
use thiserror::Error;
use tracing::debug;

/// Minimum columns in a VCF data line: CHROM POS ID REF ALT QUAL FILTER INFO
const FIXED_COLUMNS: usize = 8;

/// VCF parsing errors
#[derive(Error, Debug)]
pub enum VCFParseError {
    #[error("Failed to read VCF header: {0}")]
    HeaderError(String),

    #[error("Failed to parse VCF record: {0}")]
    RecordError(String),
}

/// One typed INFO value, as declared by the header's `##INFO` definition
#[derive(Debug, Clone, PartialEq)]
pub enum InfoValue {
    Integer(i32),
    Float(f32),
    Flag,
    Character(char),
    String(String),
}

/// INFO annotations of a record: name to ordered values
///
/// A missing value (`.`) is stored as `None`. Flags carry a single
/// `InfoValue::Flag`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InfoFields {
    fields: Vec<(String, Vec<Option<InfoValue>>)>,
}

impl InfoFields {
    /// Values for `key`, first occurrence wins
    pub fn get(&self, key: &str) -> Option<&[Option<InfoValue>]> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, values)| values.as_slice())
    }
}

impl FromIterator<(String, Vec<Option<InfoValue>>)> for InfoFields {
    fn from_iter<I: IntoIterator<Item = (String, Vec<Option<InfoValue>>)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// One parsed VCF data line
///
/// Only the fixed columns and INFO are materialized; sample columns are
/// validated by the parser but not retained.
#[derive(Debug, Clone)]
pub struct VariantRecord {
    /// Reference sequence name (e.g., "1", "chr22")
    pub chromosome: String,

    /// 1-based position; None for the telomere position 0
    pub position: Option<usize>,

    /// Reference allele (e.g., "A")
    pub ref_allele: String,

    /// Alternate alleles, empty when ALT is "."
    pub alt_alleles: Vec<String>,

    /// INFO annotations
    pub info: InfoFields,
}

/// Format-parser boundary
///
/// Built once from the complete header text, then used to parse each data
/// line. Any implementation honoring this contract can drive the pipeline.
pub trait VariantParser: Sized {
    /// Construct a parser from the joined header lines
    fn from_header(text: &str) -> Result<Self, VCFParseError>;

    /// Parse one data line (without its line terminator)
    fn parse_line(&self, line: &str) -> Result<VariantRecord, VCFParseError>;
}

/// noodles-vcf backed parser
///
/// INFO values are typed by the header: a key declared `Number=1` yields a
/// single value and rejects a list, `Number=.` accepts any count.
pub struct VCFParser {
    header: vcf::Header,
}

impl VCFParser {
    fn read_record(&self, line: &str) -> Result<vcf::Record, VCFParseError> {
        let columns = line.split('\t').count();
        if columns < FIXED_COLUMNS {
            return Err(VCFParseError::RecordError(format!(
                "expected at least {} tab-separated columns, found {}",
                FIXED_COLUMNS, columns
            )));
        }

        let mut reader = vcf::io::Reader::new(line.as_bytes());
        let mut record = vcf::Record::default();

        match reader.read_record(&mut record) {
            Ok(0) => Err(VCFParseError::RecordError("empty record".to_string())),
            Ok(_) => Ok(record),
            Err(e) => Err(VCFParseError::RecordError(e.to_string())),
        }
    }

    fn read_info(&self, record: &vcf::Record) -> Result<InfoFields, VCFParseError> {
        let info = record.info();

        info.iter(&self.header)
            .map(|field| -> Result<_, VCFParseError> {
                let (key, value) = field.map_err(|e| {
                    VCFParseError::RecordError(format!("Failed to parse INFO field: {}", e))
                })?;

                let values = match value {
                    Some(value) => convert_value(value).map_err(|e| {
                        VCFParseError::RecordError(format!(
                            "Failed to parse INFO value for {}: {}",
                            key, e
                        ))
                    })?,
                    None => Vec::new(),
                };

                Ok((key.to_string(), values))
            })
            .collect()
    }
}

fn collect_values<'a, N>(
    values: &(dyn Values<'a, N> + 'a),
    to_value: impl Fn(N) -> InfoValue,
) -> io::Result<Vec<Option<InfoValue>>> {
    values
        .iter()
        .map(|value| value.map(|v| v.map(&to_value)))
        .collect()
}

fn convert_value(value: Value<'_>) -> io::Result<Vec<Option<InfoValue>>> {
    let values = match value {
        Value::Integer(n) => vec![Some(InfoValue::Integer(n))],
        Value::Float(n) => vec![Some(InfoValue::Float(n))],
        Value::Flag => vec![Some(InfoValue::Flag)],
        Value::Character(c) => vec![Some(InfoValue::Character(c))],
        Value::String(s) => vec![Some(InfoValue::String(s.to_string()))],
        Value::Array(Array::Integer(values)) => collect_values(&*values, InfoValue::Integer)?,
        Value::Array(Array::Float(values)) => collect_values(&*values, InfoValue::Float)?,
        Value::Array(Array::Character(values)) => collect_values(&*values, InfoValue::Character)?,
        Value::Array(Array::String(values)) => {
            collect_values(&*values, |s| InfoValue::String(s.to_string()))?
        }
    };

    Ok(values)
}

impl VariantParser for VCFParser {
    fn from_header(text: &str) -> Result<Self, VCFParseError> {
        let header = text
            .parse::<vcf::Header>()
            .map_err(|e| VCFParseError::HeaderError(e.to_string()))?;

        debug!(
            "Parsed VCF header: {} INFO definitions, {} samples",
            header.infos().len(),
            header.sample_names().len()
        );

        Ok(Self { header })
    }

    fn parse_line(&self, line: &str) -> Result<VariantRecord, VCFParseError> {
        let record = self.read_record(line)?;

        let position = match record.variant_start() {
            Some(Ok(pos)) => Some(pos.get()),
            Some(Err(e)) => {
                return Err(VCFParseError::RecordError(format!(
                    "Failed to get position: {}",
                    e
                )))
            }
            None => None,
        };

        let alt_alleles = record
            .alternate_bases()
            .iter()
            .map(|allele| allele.map(String::from))
            .collect::<io::Result<Vec<_>>>()
            .map_err(|e| VCFParseError::RecordError(format!("Failed to get ALT allele: {}", e)))?;

        let info = self.read_info(&record)?;

        Ok(VariantRecord {
            chromosome: record.reference_sequence_name().to_string(),
            position,
            ref_allele: record.reference_bases().to_string(),
            alt_alleles,
            info,
        })
    }
}
