//! Output filename generation from selected record fields.

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::NamingError;
use crate::models::record::ExtractedRecord;

/// Extension appended to every generated name.
pub const PDF_SUFFIX: &str = ".pdf";

/// Separator between field values.
pub const PART_SEPARATOR: &str = "_";

/// Fields used when none are configured.
pub const DEFAULT_FIELDS: [&str; 5] = [
    "TanggalFaktur",
    "NamaPembeli",
    "NPWPPembeli",
    "KodeFaktur",
    "Referensi",
];

lazy_static! {
    static ref ILLEGAL_CHARS: Regex = Regex::new(r#"[\\/*?:"<>|]"#).unwrap();
}

/// Replace every character illegal in common file systems with `_`.
pub fn sanitize_filename(text: &str) -> String {
    ILLEGAL_CHARS.replace_all(text, "_").into_owned()
}

/// Join the sanitized values of `fields` with `_` and append `.pdf`.
pub fn generate_filename<S: AsRef<str>>(record: &ExtractedRecord, fields: &[S]) -> Result<String, NamingError> {
    FilenameFormat::new(fields.iter().map(|f| f.as_ref().to_string()).collect()).generate(record)
}

/// Ordered field selection plus an optional literal prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameFormat {
    pub fields: Vec<String>,
    pub prefix: String,
}

impl Default for FilenameFormat {
    fn default() -> Self {
        Self::new(DEFAULT_FIELDS.iter().map(|f| f.to_string()).collect())
    }
}

impl FilenameFormat {
    pub fn new(fields: Vec<String>) -> Self {
        Self {
            fields,
            prefix: String::new(),
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Check the selection against the names a record will contain.
    pub fn validate<S: AsRef<str>>(&self, known: &[S]) -> Result<(), NamingError> {
        match self
            .fields
            .iter()
            .find(|f| !known.iter().any(|k| k.as_ref() == f.as_str()))
        {
            Some(unknown) => Err(NamingError::UnknownField(unknown.clone())),
            None => Ok(()),
        }
    }

    pub fn generate(&self, record: &ExtractedRecord) -> Result<String, NamingError> {
        let parts = self
            .fields
            .iter()
            .map(|field| {
                record
                    .get(field)
                    .map(sanitize_filename)
                    .ok_or_else(|| NamingError::UnknownField(field.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(format!(
            "{}{}{}",
            sanitize_filename(&self.prefix),
            parts.join(PART_SEPARATOR),
            PDF_SUFFIX
        ))
    }
}

/// Make names unique within a batch by numbering later duplicates.
///
/// The first occurrence keeps its name; later ones become `<stem>_2.pdf`,
/// `<stem>_3.pdf` and so on, skipping any candidate already in the batch.
pub fn dedupe_filenames(names: Vec<String>) -> Vec<String> {
    let mut taken: HashSet<String> = names.iter().cloned().collect();
    let mut emitted: HashSet<String> = HashSet::with_capacity(names.len());

    names
        .into_iter()
        .map(|name| {
            if emitted.insert(name.clone()) {
                return name;
            }

            let stem = name.strip_suffix(PDF_SUFFIX).unwrap_or(&name);
            let unique = (2..)
                .map(|n| format!("{stem}_{n}{PDF_SUFFIX}"))
                .find(|candidate| !taken.contains(candidate))
                .unwrap_or_default();

            taken.insert(unique.clone());
            emitted.insert(unique.clone());
            unique
        })
        .collect()
}
