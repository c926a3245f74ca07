//! Configuration structures for extraction and renaming.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, FakturError, Result};
use crate::invoice::{CatalogOptions, FakturParser, FieldCatalog, FieldRuleDef};
use crate::naming::{FilenameFormat, DEFAULT_FIELDS};

/// Main configuration for the faktur pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FakturConfig {
    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Output filename configuration.
    pub naming: NamingConfig,

    /// PDF processing configuration.
    pub pdf: PdfConfig,
}

/// Field extraction configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Strip a trailing `)` from the reference field.
    pub strip_reference_paren: bool,

    /// Rewrite the invoice date as `DD MM YYYY` when the period parses.
    pub numeric_date: bool,

    /// Custom field catalog replacing the built-in one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<FieldRuleDef>>,
}

/// Output filename configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    /// Fields joined into the filename, in order.
    pub fields: Vec<String>,

    /// Literal text placed before the joined fields.
    pub prefix: String,

    /// Number colliding names within a batch instead of overwriting.
    pub deduplicate: bool,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            fields: DEFAULT_FIELDS.iter().map(|f| f.to_string()).collect(),
            prefix: String::new(),
            deduplicate: false,
        }
    }
}

/// PDF processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Minimum text length below which a PDF is reported as having no text.
    pub min_text_length: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self { min_text_length: 20 }
    }
}

impl ExtractionConfig {
    fn catalog_options(&self) -> CatalogOptions {
        CatalogOptions {
            strip_reference_paren: self.strip_reference_paren,
        }
    }

    /// Build the configured field catalog.
    pub fn catalog(&self) -> std::result::Result<FieldCatalog, CatalogError> {
        match &self.rules {
            Some(defs) => FieldCatalog::from_defs(defs),
            None => Ok(FieldCatalog::builtin(self.catalog_options())),
        }
    }

    /// The catalog as editable rule definitions.
    pub fn rule_defs(&self) -> Vec<FieldRuleDef> {
        self.rules
            .clone()
            .unwrap_or_else(|| FieldCatalog::builtin_defs(self.catalog_options()))
    }
}

impl NamingConfig {
    pub fn format(&self) -> FilenameFormat {
        FilenameFormat::new(self.fields.clone()).with_prefix(self.prefix.clone())
    }
}

impl FakturConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| FakturError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| FakturError::Config(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Build a parser from the extraction settings.
    pub fn build_parser(&self) -> Result<FakturParser> {
        Ok(FakturParser::new()
            .with_catalog(self.extraction.catalog()?)
            .with_numeric_date(self.extraction.numeric_date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::InvoiceParser;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: FakturConfig =
            serde_json::from_str(r#"{"naming": {"prefix": "Faktur Pajak "}}"#).unwrap();

        assert_eq!(config.naming.prefix, "Faktur Pajak ");
        assert_eq!(config.naming.fields, DEFAULT_FIELDS.to_vec());
        assert!(!config.naming.deduplicate);
        assert!(!config.extraction.numeric_date);
        assert_eq!(config.pdf.min_text_length, 20);
    }

    #[test]
    fn test_build_parser_from_rules() {
        let config: FakturConfig = serde_json::from_str(
            r#"{
                "extraction": {
                    "numeric_date": true,
                    "rules": [{"name": "Tanggal", "extractor": "invoice_date"}]
                }
            }"#,
        )
        .unwrap();

        let parser = config.build_parser().unwrap();
        assert_eq!(parser.field_names(), vec!["Tanggal", "Masa", "Tahun"]);

        let record = parser.parse("Solo, 1 Juni 2024").record;
        assert_eq!(record.get("Tanggal"), Some("01 06 2024"));
        assert_eq!(record.get("Masa"), Some("06"));
        assert_eq!(record.get("Tahun"), Some("2024"));
    }

    #[test]
    fn test_build_parser_rejects_bad_rules() {
        let config: FakturConfig = serde_json::from_str(
            r#"{"extraction": {"rules": [{"name": "X", "pattern": "("}]}}"#,
        )
        .unwrap();
        assert!(matches!(config.build_parser(), Err(FakturError::Catalog(_))));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = FakturConfig::default();
        config.naming.deduplicate = true;
        config.save(&path).unwrap();

        let loaded = FakturConfig::from_file(&path).unwrap();
        assert!(loaded.naming.deduplicate);
        assert_eq!(loaded.naming.fields, DEFAULT_FIELDS.to_vec());
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();

        let missing = FakturConfig::from_file(&dir.path().join("missing.json"));
        assert!(matches!(missing, Err(FakturError::Io(_))));

        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(FakturConfig::from_file(&path), Err(FakturError::Config(_))));
    }

    #[test]
    fn test_rule_defs_round_trip_through_json() {
        let config = FakturConfig::default();
        let json = serde_json::to_string(&config.extraction.rule_defs()).unwrap();
        let defs: Vec<FieldRuleDef> = serde_json::from_str(&json).unwrap();
        assert_eq!(defs, config.extraction.rule_defs());
    }
}
