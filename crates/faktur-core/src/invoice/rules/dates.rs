//! Invoice date extraction and the Indonesian month table.

use super::patterns::INVOICE_DATE;
use super::{ExtractionMatch, FieldExtractor, PLACEHOLDER};

/// Indonesian month names with their two-digit codes.
pub const MONTHS: [(&str, &str); 12] = [
    ("Januari", "01"),
    ("Februari", "02"),
    ("Maret", "03"),
    ("April", "04"),
    ("Mei", "05"),
    ("Juni", "06"),
    ("Juli", "07"),
    ("Agustus", "08"),
    ("September", "09"),
    ("Oktober", "10"),
    ("November", "11"),
    ("Desember", "12"),
];

/// Look up the two-digit code of an Indonesian month name.
pub fn month_code(name: &str) -> Option<&'static str> {
    MONTHS
        .iter()
        .find(|(month, _)| *month == name)
        .map(|(_, code)| *code)
}

/// A date as written on the invoice, month still a word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceDate {
    /// Day, zero-padded to two digits.
    pub day: String,
    /// Month name as it appears in the text.
    pub month: String,
    /// Four-digit year.
    pub year: String,
}

impl InvoiceDate {
    /// `DD/MonthName/YYYY`
    pub fn format(&self) -> String {
        format!("{}/{}/{}", self.day, self.month, self.year)
    }
}

/// Extractor for the `, DD MonthName YYYY` signing date.
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = ExtractionMatch<InvoiceDate>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        INVOICE_DATE
            .captures_iter(text)
            .map(|caps| {
                let date = InvoiceDate {
                    day: format!("{:0>2}", &caps[1]),
                    month: caps[2].to_string(),
                    year: caps[3].to_string(),
                };
                let full_match = caps.get(0).unwrap();
                ExtractionMatch::new(date)
                    .with_position(full_match.start(), full_match.end())
            })
            .collect()
    }
}

/// Extract the invoice date as `DD/MonthName/YYYY`, or the placeholder.
pub fn extract_date(text: &str) -> String {
    DateExtractor::new()
        .extract(text)
        .map(|m| m.value.format())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_date_pads_day() {
        assert_eq!(extract_date("JAKARTA, 5 Maret 2024"), "05/Maret/2024");
        assert_eq!(extract_date("Bandung,17 Januari 2025\n"), "17/Januari/2025");
    }

    #[test]
    fn test_extract_date_first_occurrence_wins() {
        let text = "Surabaya, 01 Juli 2024\nDicetak, 2 Agustus 2024";
        assert_eq!(extract_date(text), "01/Juli/2024");
        let all = DateExtractor::new().extract_all(text);
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].position, Some((8, 22)));
    }

    #[test]
    fn test_extract_date_missing() {
        assert_eq!(extract_date("17 Januari 2025"), "-");
        assert_eq!(extract_date(""), "-");
    }

    #[test]
    fn test_extract_date_month_is_verbatim() {
        // Unknown month words still pass through; period derivation rejects them.
        assert_eq!(extract_date("Medan, 9 Janvier 2023"), "09/Janvier/2023");
    }

    #[test]
    fn test_month_code() {
        assert_eq!(month_code("Maret"), Some("03"));
        assert_eq!(month_code("Desember"), Some("12"));
        assert_eq!(month_code("maret"), None);
        assert_eq!(month_code("March"), None);
    }
}
