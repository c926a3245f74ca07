//! Error types for the faktur-core library.

use thiserror::Error;

/// Main error type for the faktur library.
#[derive(Error, Debug)]
pub enum FakturError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Field catalog could not be built.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Filename generation error.
    #[error("naming error: {0}")]
    Naming(#[from] NamingError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Errors raised while compiling a field catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The rule's pattern is not a valid regular expression.
    #[error("invalid pattern for {field}: {source}")]
    InvalidPattern {
        field: String,
        #[source]
        source: regex::Error,
    },

    /// The pattern compiles but has no capture group to take the value from.
    #[error("pattern for {0} has no capture group")]
    MissingCaptureGroup(String),

    /// Two rules share a name.
    #[error("duplicate field name: {0}")]
    DuplicateField(String),

    /// Neither a pattern nor an extractor was given.
    #[error("field {0} has neither a pattern nor an extractor")]
    MissingMatcher(String),

    /// Both a pattern and an extractor were given.
    #[error("field {0} has both a pattern and an extractor")]
    AmbiguousMatcher(String),

    /// The name is reserved for a derived field or output column.
    #[error("field name {0} is reserved")]
    ReservedField(String),
}

/// Errors related to filename generation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NamingError {
    /// The field order names a field the record does not contain.
    #[error("unknown field name: {0}")]
    UnknownField(String),
}

/// Reasons an invoice date cannot be turned into a tax period.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PeriodError {
    /// No date was extracted.
    #[error("no invoice date")]
    Missing,

    /// The date does not split into day, month and year.
    #[error("expected 3 date parts, found {0}")]
    Shape(usize),

    /// The month name is not an Indonesian month.
    #[error("unknown month name: {0}")]
    UnknownMonth(String),
}

/// Result type for the faktur library.
pub type Result<T> = std::result::Result<T, FakturError>;
