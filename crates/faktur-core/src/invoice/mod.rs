//! Faktur Pajak field extraction module.

mod parser;
pub mod catalog;
pub mod period;
pub mod rules;

pub use catalog::{CatalogOptions, FieldCatalog, FieldRule, FieldRuleDef, Matcher, SpecialExtractor};
pub use parser::{ExtractionResult, FakturParser, InvoiceParser};
pub use period::{derive_period, Period, MASA, TAHUN};
