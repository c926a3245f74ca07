//! Record assembly: catalog extraction plus period derivation, one record per document.

use std::time::Instant;

use tracing::{debug, info};

use crate::models::record::{DocumentBundle, ExtractedRecord, SourceDocument};

use super::catalog::FieldCatalog;
use super::period::{derive_period, MASA, TAHUN};
use super::rules::PLACEHOLDER;

/// Result of invoice extraction.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Extracted fields, derived period last.
    pub record: ExtractedRecord,
    /// Fields that resolved to the placeholder.
    pub missing_fields: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Trait for invoice parsing.
///
/// Parsing never fails: fields that cannot be found hold the placeholder.
pub trait InvoiceParser {
    /// Parse invoice text into a record.
    fn parse(&self, text: &str) -> ExtractionResult;
}

/// Parser for Faktur Pajak text driven by a field catalog.
#[derive(Debug, Clone, Default)]
pub struct FakturParser {
    catalog: FieldCatalog,
    /// Rewrite the date field as `DD MM YYYY` when the period parses.
    numeric_date: bool,
}

impl FakturParser {
    /// Create a parser over the built-in catalog.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog(mut self, catalog: FieldCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_numeric_date(mut self, numeric_date: bool) -> Self {
        self.numeric_date = numeric_date;
        self
    }

    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    /// Field names every record from this parser contains.
    pub fn field_names(&self) -> Vec<String> {
        self.catalog.field_names()
    }

    fn append_period(&self, record: &mut ExtractedRecord) {
        let date_field = self.catalog.date_field();
        let date = date_field
            .and_then(|field| record.get(field))
            .unwrap_or(PLACEHOLDER)
            .to_string();

        match derive_period(&date) {
            Ok(period) => {
                if let (true, Some(field)) = (self.numeric_date, date_field) {
                    record.insert(field, period.numeric_date());
                }
                record.insert(MASA, period.masa);
                record.insert(TAHUN, period.tahun);
            }
            Err(e) => {
                debug!("No tax period from date {:?}: {}", date, e);
                record.insert(MASA, PLACEHOLDER);
                record.insert(TAHUN, PLACEHOLDER);
            }
        }
    }

    /// Extract one document and keep its name and bytes alongside the record.
    pub fn assemble(&self, document: SourceDocument) -> DocumentBundle {
        let result = self.parse(&document.text);

        debug!(
            "Extracted {} from {} chars of text in {}ms ({} fields missing)",
            document.original_name,
            document.text.len(),
            result.processing_time_ms,
            result.missing_fields.len()
        );

        DocumentBundle {
            original_name: document.original_name,
            bytes: document.bytes,
            record: result.record,
        }
    }

    /// Extract a batch, preserving input order.
    pub fn assemble_batch(&self, documents: Vec<SourceDocument>) -> Vec<DocumentBundle> {
        info!("Assembling records for {} documents", documents.len());
        documents.into_iter().map(|doc| self.assemble(doc)).collect()
    }
}

impl InvoiceParser for FakturParser {
    fn parse(&self, text: &str) -> ExtractionResult {
        let start = Instant::now();

        let mut record = self.catalog.apply(text);
        self.append_period(&mut record);

        let missing_fields = record
            .missing_fields()
            .into_iter()
            .map(str::to_string)
            .collect();

        ExtractionResult {
            record,
            missing_fields,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::catalog::CatalogOptions;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "Faktur Pajak
Kode dan Nomor Seri Faktur Pajak: 04002500012345678
Pengusaha Kena Pajak:
Nama : PT SUMBER MAKMUR
Alamat : JL. SUDIRMAN NO. 1 JAKARTA PUSAT
NPWP : 0012345678901000
Pembeli Barang Kena Pajak/Penerima Jasa Kena Pajak:
Nama : PT PEMBELI JAYA
Alamat : JL. GATOT SUBROTO NO. 2 BANDUNG
#0987654321012345000000
NPWP : 0987654321012345
NIK : -
Nomor Paspor : -
No. Kode Barang Nama Barang Kena Pajak / Jasa Kena Pajak Harga Jual
1 000000 Jasa konsultasi 10.000.000,00
(Referensi: INV/2025/001)
JAKARTA SELATAN, 7 Januari 2025
Ditandatangani secara elektronik
";

    #[test]
    fn test_parse_full_invoice() {
        let result = FakturParser::new().parse(SAMPLE);
        let record = result.record;

        let fields: Vec<(&str, &str)> = record.iter().collect();
        assert_eq!(
            fields,
            vec![
                ("KodeFaktur", "04002500012345678"),
                ("NamaPKP", "PT SUMBER MAKMUR"),
                ("AlamatPKP", "JL. SUDIRMAN NO. 1 JAKARTA PUSAT"),
                ("NPWPPKP", "0012345678901000"),
                ("NamaPembeli", "PT PEMBELI JAYA"),
                ("AlamatPembeli", "JL. GATOT SUBROTO NO. 2 BANDUNG"),
                ("NPWPPembeli", "0987654321012345"),
                ("Referensi", "INV/2025/001)"),
                ("TanggalFaktur", "07/Januari/2025"),
                ("NITKU", "0987654321012345000000"),
                ("Masa", "01"),
                ("Tahun", "2025"),
            ]
        );
        assert!(result.missing_fields.is_empty());
    }

    #[test]
    fn test_parse_with_variant_options() {
        let catalog = FieldCatalog::builtin(CatalogOptions {
            strip_reference_paren: true,
        });
        let parser = FakturParser::new()
            .with_catalog(catalog)
            .with_numeric_date(true);
        let record = parser.parse(SAMPLE).record;

        assert_eq!(record.get("Referensi"), Some("INV/2025/001"));
        assert_eq!(record.get("TanggalFaktur"), Some("07 01 2025"));
        assert_eq!(record.get("Masa"), Some("01"));
    }

    #[test]
    fn test_unknown_month_leaves_date_untouched() {
        let parser = FakturParser::new().with_numeric_date(true);
        let record = parser.parse("Medan, 9 Janvier 2023").record;

        assert_eq!(record.get("TanggalFaktur"), Some("09/Janvier/2023"));
        assert_eq!(record.get("Masa"), Some("-"));
        assert_eq!(record.get("Tahun"), Some("-"));
    }

    #[test]
    fn test_empty_text_gives_blank_record() {
        let result = FakturParser::new().parse("");
        assert_eq!(result.record.len(), 12);
        assert!(result.record.is_blank());
        assert_eq!(result.missing_fields.len(), 12);
    }

    #[test]
    fn test_missing_label_gives_placeholder() {
        let text = SAMPLE.replace("Kode dan Nomor Seri Faktur Pajak:", "Nomor:");
        let record = FakturParser::new().parse(&text).record;
        assert_eq!(record.get("KodeFaktur"), Some("-"));
        assert_eq!(record.get("NamaPKP"), Some("PT SUMBER MAKMUR"));
    }

    #[test]
    fn test_buyer_npwp_needs_nik() {
        let text = SAMPLE.replace("NIK : -", "Email : -");
        let record = FakturParser::new().parse(&text).record;
        assert_eq!(record.get("NPWPPembeli"), Some("-"));
        assert_eq!(record.get("NPWPPKP"), Some("0012345678901000"));
    }

    #[test]
    fn test_missing_boundary_gives_placeholder() {
        let text = "Pengusaha Kena Pajak:\nNama : PT TANPA ALAMAT\nNPWP : 0012345678901000\n";
        let record = FakturParser::new().parse(text).record;
        assert_eq!(record.get("NamaPKP"), Some("-"));
        assert_eq!(record.get("AlamatPKP"), Some("-"));
        assert_eq!(record.get("NPWPPKP"), Some("0012345678901000"));
    }

    #[test]
    fn test_reference_on_last_line_needs_newline() {
        let record = FakturParser::new().parse("(Referensi: INV/9)").record;
        assert_eq!(record.get("Referensi"), Some("-"));

        let record = FakturParser::new().parse("(Referensi: INV/9)\n").record;
        assert_eq!(record.get("Referensi"), Some("INV/9)"));
    }

    #[test]
    fn test_assemble_batch_preserves_order() {
        let docs = vec![
            SourceDocument::new("a.pdf", b"A".to_vec(), SAMPLE),
            SourceDocument::new("b.pdf", b"B".to_vec(), ""),
            SourceDocument::new("c.pdf", b"C".to_vec(), "Bogor, 3 Mei 2024"),
        ];
        let bundles = FakturParser::new().assemble_batch(docs);

        let names: Vec<&str> = bundles.iter().map(|b| b.original_name.as_str()).collect();
        assert_eq!(names, vec!["a.pdf", "b.pdf", "c.pdf"]);
        assert_eq!(bundles[1].bytes, b"B".to_vec());
        assert!(bundles[1].record.is_blank());
        assert_eq!(bundles[2].record.get("Masa"), Some("05"));
    }

    #[test]
    fn test_assemble_empty_batch() {
        assert!(FakturParser::new().assemble_batch(Vec::new()).is_empty());
    }
}
