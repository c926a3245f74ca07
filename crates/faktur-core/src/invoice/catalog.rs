//! Field catalogs: ordered extraction rules, built in or loaded from configuration.

use std::collections::HashSet;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::models::record::{ExtractedRecord, ORIGINAL_NAME};

use super::period::{MASA, TAHUN};
use super::rules::patterns::*;
use super::rules::{extract, extract_date, extract_unit_id, MatchFlags, Postprocess, PLACEHOLDER};

/// Extractors that need more than a single pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialExtractor {
    /// `, DD MonthName YYYY` signing date.
    InvoiceDate,
    /// `#` + 22 digits on the line above `NPWP`.
    BuyerUnitId,
}

impl SpecialExtractor {
    fn run(&self, text: &str) -> String {
        match self {
            Self::InvoiceDate => extract_date(text),
            Self::BuyerUnitId => extract_unit_id(text),
        }
    }
}

/// How a compiled rule finds its value.
#[derive(Debug, Clone)]
pub enum Matcher {
    Pattern(Regex),
    Special(SpecialExtractor),
}

/// A compiled extraction rule.
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub name: String,
    pub matcher: Matcher,
    pub postprocess: Postprocess,
}

impl FieldRule {
    pub fn pattern(name: impl Into<String>, pattern: &Regex, postprocess: Postprocess) -> Self {
        Self {
            name: name.into(),
            matcher: Matcher::Pattern(pattern.clone()),
            postprocess,
        }
    }

    pub fn special(name: impl Into<String>, extractor: SpecialExtractor) -> Self {
        Self {
            name: name.into(),
            matcher: Matcher::Special(extractor),
            postprocess: Postprocess::Trim,
        }
    }

    /// Apply the rule, yielding the placeholder when nothing matches.
    pub fn apply(&self, text: &str) -> String {
        match &self.matcher {
            Matcher::Pattern(re) => extract(re, text, PLACEHOLDER, self.postprocess),
            Matcher::Special(special) => special.run(text),
        }
    }
}

/// Serializable form of a rule, as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRuleDef {
    pub name: String,

    /// Regex with one capture group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extractor: Option<SpecialExtractor>,

    #[serde(default)]
    pub flags: MatchFlags,

    #[serde(default)]
    pub postprocess: Postprocess,
}

impl FieldRuleDef {
    pub fn pattern(name: &str, pattern: &str, postprocess: Postprocess) -> Self {
        Self {
            name: name.to_string(),
            pattern: Some(pattern.to_string()),
            extractor: None,
            flags: MatchFlags::default(),
            postprocess,
        }
    }

    pub fn special(name: &str, extractor: SpecialExtractor) -> Self {
        Self {
            name: name.to_string(),
            pattern: None,
            extractor: Some(extractor),
            flags: MatchFlags::default(),
            postprocess: Postprocess::Trim,
        }
    }

    fn compile(&self) -> Result<FieldRule, CatalogError> {
        let matcher = match (&self.pattern, self.extractor) {
            (Some(_), Some(_)) => return Err(CatalogError::AmbiguousMatcher(self.name.clone())),
            (None, None) => return Err(CatalogError::MissingMatcher(self.name.clone())),
            (None, Some(special)) => Matcher::Special(special),
            (Some(pattern), None) => {
                let re = self.flags.compile(pattern).map_err(|source| CatalogError::InvalidPattern {
                    field: self.name.clone(),
                    source,
                })?;
                if re.captures_len() < 2 {
                    return Err(CatalogError::MissingCaptureGroup(self.name.clone()));
                }
                Matcher::Pattern(re)
            }
        };

        Ok(FieldRule {
            name: self.name.clone(),
            matcher,
            postprocess: self.postprocess,
        })
    }
}

/// Variant switches for the built-in catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogOptions {
    /// Strip a trailing `)` from the reference value.
    pub strip_reference_paren: bool,
}

impl CatalogOptions {
    fn reference_postprocess(&self) -> Postprocess {
        if self.strip_reference_paren {
            Postprocess::TrimTrailingParen
        } else {
            Postprocess::Trim
        }
    }
}

/// An ordered, name-unique list of extraction rules.
#[derive(Debug, Clone)]
pub struct FieldCatalog {
    rules: Vec<FieldRule>,
}

impl FieldCatalog {
    /// The standard Faktur Pajak catalog.
    pub fn builtin(options: CatalogOptions) -> Self {
        Self {
            rules: vec![
                FieldRule::pattern("KodeFaktur", &KODE_FAKTUR_PATTERN, Postprocess::Trim),
                FieldRule::pattern("NamaPKP", &NAMA_PKP_PATTERN, Postprocess::Trim),
                FieldRule::pattern("AlamatPKP", &ALAMAT_PKP_PATTERN, Postprocess::Trim),
                FieldRule::pattern("NPWPPKP", &NPWP_PKP_PATTERN, Postprocess::Trim),
                FieldRule::pattern("NamaPembeli", &NAMA_PEMBELI_PATTERN, Postprocess::Trim),
                FieldRule::pattern("AlamatPembeli", &ALAMAT_PEMBELI_PATTERN, Postprocess::Trim),
                FieldRule::pattern("NPWPPembeli", &NPWP_PEMBELI_PATTERN, Postprocess::Trim),
                FieldRule::pattern("Referensi", &REFERENSI_PATTERN, options.reference_postprocess()),
                FieldRule::special("TanggalFaktur", SpecialExtractor::InvoiceDate),
                FieldRule::special("NITKU", SpecialExtractor::BuyerUnitId),
            ],
        }
    }

    /// The built-in catalog in its serializable form.
    pub fn builtin_defs(options: CatalogOptions) -> Vec<FieldRuleDef> {
        vec![
            FieldRuleDef::pattern("KodeFaktur", KODE_FAKTUR, Postprocess::Trim),
            FieldRuleDef::pattern("NamaPKP", NAMA_PKP, Postprocess::Trim),
            FieldRuleDef::pattern("AlamatPKP", ALAMAT_PKP, Postprocess::Trim),
            FieldRuleDef::pattern("NPWPPKP", NPWP_PKP, Postprocess::Trim),
            FieldRuleDef::pattern("NamaPembeli", NAMA_PEMBELI, Postprocess::Trim),
            FieldRuleDef::pattern("AlamatPembeli", ALAMAT_PEMBELI, Postprocess::Trim),
            FieldRuleDef::pattern("NPWPPembeli", NPWP_PEMBELI, Postprocess::Trim),
            FieldRuleDef::pattern("Referensi", REFERENSI, options.reference_postprocess()),
            FieldRuleDef::special("TanggalFaktur", SpecialExtractor::InvoiceDate),
            FieldRuleDef::special("NITKU", SpecialExtractor::BuyerUnitId),
        ]
    }

    /// Compile a catalog from rule definitions.
    pub fn from_defs(defs: &[FieldRuleDef]) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        let mut rules = Vec::with_capacity(defs.len());

        for def in defs {
            if [MASA, TAHUN, ORIGINAL_NAME].contains(&def.name.as_str()) {
                return Err(CatalogError::ReservedField(def.name.clone()));
            }
            if !seen.insert(def.name.as_str()) {
                return Err(CatalogError::DuplicateField(def.name.clone()));
            }
            rules.push(def.compile()?);
        }

        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    /// Name of the field period derivation reads: the first date-extractor rule.
    pub fn date_field(&self) -> Option<&str> {
        self.rules
            .iter()
            .find(|r| matches!(r.matcher, Matcher::Special(SpecialExtractor::InvoiceDate)))
            .map(|r| r.name.as_str())
    }

    /// Every field name a record from this catalog contains, derived fields last.
    pub fn field_names(&self) -> Vec<String> {
        self.rules
            .iter()
            .map(|r| r.name.clone())
            .chain([MASA.to_string(), TAHUN.to_string()])
            .collect()
    }

    /// Run every rule over the text. Every rule yields an entry.
    pub fn apply(&self, text: &str) -> ExtractedRecord {
        let mut record = ExtractedRecord::new();
        for rule in &self.rules {
            record.insert(rule.name.clone(), rule.apply(text));
        }
        record
    }
}

impl Default for FieldCatalog {
    fn default() -> Self {
        Self::builtin(CatalogOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builtin_field_names() {
        let names = FieldCatalog::default().field_names();
        assert_eq!(
            names,
            vec![
                "KodeFaktur",
                "NamaPKP",
                "AlamatPKP",
                "NPWPPKP",
                "NamaPembeli",
                "AlamatPembeli",
                "NPWPPembeli",
                "Referensi",
                "TanggalFaktur",
                "NITKU",
                "Masa",
                "Tahun",
            ]
        );
    }

    #[test]
    fn test_builtin_defs_compile_to_same_catalog() {
        let text = "Kode dan Nomor Seri Faktur Pajak: 0100\n(Referensi: PO-9)\nBogor, 3 Mei 2024\n";
        let options = CatalogOptions {
            strip_reference_paren: true,
        };
        let from_defs = FieldCatalog::from_defs(&FieldCatalog::builtin_defs(options)).unwrap();
        let builtin = FieldCatalog::builtin(options);

        assert_eq!(from_defs.apply(text), builtin.apply(text));
        assert_eq!(builtin.apply(text).get("Referensi"), Some("PO-9"));
        assert_eq!(FieldCatalog::default().apply(text).get("Referensi"), Some("PO-9)"));
    }

    #[test]
    fn test_every_field_present_on_empty_text() {
        let record = FieldCatalog::default().apply("");
        assert_eq!(record.len(), 10);
        assert!(record.is_blank());
    }

    #[test]
    fn test_builtin_date_field() {
        assert_eq!(FieldCatalog::default().date_field(), Some("TanggalFaktur"));

        let defs = vec![FieldRuleDef::special("NITKU", SpecialExtractor::BuyerUnitId)];
        assert_eq!(FieldCatalog::from_defs(&defs).unwrap().date_field(), None);
    }

    #[test]
    fn test_custom_catalog() {
        let defs: Vec<FieldRuleDef> = serde_json::from_str(
            r#"[
                {"name": "Kode", "pattern": "Kode dan Nomor Seri Faktur Pajak:\\s*(\\d+)"},
                {"name": "Tanggal", "extractor": "invoice_date"},
                {"name": "Ref", "pattern": "referensi:\\s*(.*?)\\n", "flags": {"case_insensitive": true}}
            ]"#,
        )
        .unwrap();
        let catalog = FieldCatalog::from_defs(&defs).unwrap();

        let record = catalog.apply("Kode dan Nomor Seri Faktur Pajak: 42\nREFERENSI: ABC\nSolo, 1 Juni 2024");
        assert_eq!(record.get("Kode"), Some("42"));
        assert_eq!(record.get("Tanggal"), Some("01/Juni/2024"));
        assert_eq!(record.get("Ref"), Some("ABC"));
        assert_eq!(catalog.date_field(), Some("Tanggal"));
    }

    #[test]
    fn test_from_defs_rejects_bad_rules() {
        let dup = vec![
            FieldRuleDef::special("A", SpecialExtractor::InvoiceDate),
            FieldRuleDef::special("A", SpecialExtractor::BuyerUnitId),
        ];
        assert!(matches!(FieldCatalog::from_defs(&dup), Err(CatalogError::DuplicateField(n)) if n == "A"));

        let reserved = vec![FieldRuleDef::special("Masa", SpecialExtractor::InvoiceDate)];
        assert!(matches!(FieldCatalog::from_defs(&reserved), Err(CatalogError::ReservedField(_))));

        let column = vec![FieldRuleDef::special("OriginalName", SpecialExtractor::InvoiceDate)];
        assert!(matches!(FieldCatalog::from_defs(&column), Err(CatalogError::ReservedField(n)) if n == "OriginalName"));

        let bad = vec![FieldRuleDef::pattern("B", "(unclosed", Postprocess::Trim)];
        assert!(matches!(FieldCatalog::from_defs(&bad), Err(CatalogError::InvalidPattern { .. })));

        let no_group = vec![FieldRuleDef::pattern("C", r"NPWP\s*:", Postprocess::Trim)];
        assert!(matches!(FieldCatalog::from_defs(&no_group), Err(CatalogError::MissingCaptureGroup(_))));

        let mut both = FieldRuleDef::pattern("D", r"(x)", Postprocess::Trim);
        both.extractor = Some(SpecialExtractor::InvoiceDate);
        assert!(matches!(FieldCatalog::from_defs(&[both]), Err(CatalogError::AmbiguousMatcher(_))));

        let mut neither = FieldRuleDef::special("E", SpecialExtractor::InvoiceDate);
        neither.extractor = None;
        assert!(matches!(FieldCatalog::from_defs(&[neither]), Err(CatalogError::MissingMatcher(_))));
    }
}
