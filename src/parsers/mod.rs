// ==============================================================================
// parsers/mod.rs - File parser modules
// ==============================================================================
// Description: Parsers for genetic data file formats
// Created: 2026-10-18
// Version: 0.1.0
// ==============================================================================

pub mod vcf;

pub use vcf::{InfoFields, InfoValue, VCFParseError, VCFParser, VariantParser, VariantRecord};
