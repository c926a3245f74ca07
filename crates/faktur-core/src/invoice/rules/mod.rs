//! Rule-based field extractors for Faktur Pajak text.

pub mod extract;
pub mod dates;
pub mod nitku;
pub mod patterns;

pub use extract::{extract, MatchFlags, Postprocess};
pub use dates::{extract_date, DateExtractor, InvoiceDate};
pub use nitku::{extract_unit_id, UnitIdExtractor};

/// Value recorded for any field whose rule did not match.
pub const PLACEHOLDER: &str = "-";

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the first occurrence of the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A matched value together with where it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Byte span of the match in the searched text (or line index for line-relative matches).
    pub position: Option<(usize, usize)>,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            position: None,
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}
