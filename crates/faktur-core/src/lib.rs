//! Core library for Indonesian tax invoice (Faktur Pajak) processing.
//!
//! This crate provides:
//! - PDF text rendering
//! - Field extraction from Faktur Pajak text, driven by a field catalog
//! - Tax period (Masa/Tahun) derivation from the invoice date
//! - Filename generation from a chosen ordering of fields

pub mod error;
pub mod models;
pub mod pdf;
pub mod invoice;
pub mod naming;

pub use error::{FakturError, NamingError, PeriodError, Result};
pub use models::config::FakturConfig;
pub use models::record::{DocumentBundle, ExtractedRecord, SourceDocument, ORIGINAL_NAME};
pub use pdf::{pdf_to_text, PdfExtractor, PdfProcessor};
pub use invoice::{FakturParser, FieldCatalog, InvoiceParser, ExtractionResult};
pub use invoice::rules::PLACEHOLDER;
pub use naming::{dedupe_filenames, generate_filename, sanitize_filename, FilenameFormat};
