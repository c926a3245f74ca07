//! Buyer tax-unit identifier (NITKU) extraction.
//!
//! The identifier is not labeled. It appears as `#` plus 22 digits on the
//! line directly above a line mentioning `NPWP`.

use super::patterns::{NPWP_LABEL, UNIT_ID_MARKER};
use super::{ExtractionMatch, FieldExtractor, PLACEHOLDER};

/// Line-relative extractor for the 22-digit buyer unit identifier.
pub struct UnitIdExtractor;

impl UnitIdExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for UnitIdExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for UnitIdExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let lines: Vec<&str> = text.lines().collect();

        lines
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, line)| line.contains(NPWP_LABEL))
            .filter_map(|(i, _)| {
                let prev_line = lines[i - 1];
                UNIT_ID_MARKER
                    .captures(prev_line)
                    .map(|caps| ExtractionMatch::new(caps[1].to_string()).with_position(i - 1, i))
            })
            .collect()
    }
}

/// Extract the buyer's 22-digit unit identifier, or the placeholder.
pub fn extract_unit_id(text: &str) -> String {
    UnitIdExtractor::new()
        .extract(text)
        .map(|m| m.value)
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_unit_id() {
        let text = "Alamat : JL. MERDEKA 1\n#1234567890123456789012\nNPWP : 1234567890123456";
        assert_eq!(extract_unit_id(text), "1234567890123456789012");
    }

    #[test]
    fn test_extract_unit_id_short_run() {
        let text = "#123456789012345678901\nNPWP : 1";
        assert_eq!(extract_unit_id(text), "-");
    }

    #[test]
    fn test_extract_unit_id_long_run() {
        let text = "#12345678901234567890123\nNPWP : 1";
        assert_eq!(extract_unit_id(text), "-");
    }

    #[test]
    fn test_extract_unit_id_needs_adjacent_line() {
        let text = "#1234567890123456789012\n\nNPWP : 1";
        assert_eq!(extract_unit_id(text), "-");
    }

    #[test]
    fn test_extract_unit_id_first_line_npwp_ignored() {
        assert_eq!(extract_unit_id("NPWP #1234567890123456789012"), "-");
    }

    #[test]
    fn test_extract_unit_id_keeps_scanning() {
        let text = "Alamat : A\nNPWP : 1\n#0000000000000000000001\nNPWP : 2";
        let extractor = UnitIdExtractor::new();
        let found = extractor.extract(text).unwrap();
        assert_eq!(found.value, "0000000000000000000001");
        assert_eq!(found.position, Some((2, 3)));
    }
}
