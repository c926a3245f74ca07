//! Single-pattern extraction with a placeholder fallback.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// Match-mode flags used when compiling a rule pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchFlags {
    /// Let `.` match line breaks so captures can span lines.
    pub dot_matches_new_line: bool,

    /// Case-insensitive matching.
    pub case_insensitive: bool,
}

impl Default for MatchFlags {
    fn default() -> Self {
        Self {
            dot_matches_new_line: true,
            case_insensitive: false,
        }
    }
}

impl MatchFlags {
    /// Flags for patterns that must stay within a line.
    pub fn single_line() -> Self {
        Self {
            dot_matches_new_line: false,
            ..Self::default()
        }
    }

    /// Compile a pattern with these flags.
    pub fn compile(&self, pattern: &str) -> Result<Regex, regex::Error> {
        RegexBuilder::new(pattern)
            .dot_matches_new_line(self.dot_matches_new_line)
            .case_insensitive(self.case_insensitive)
            .build()
    }
}

/// Cleanup applied to a successful capture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Postprocess {
    /// Keep the capture as-is.
    None,
    /// Trim surrounding whitespace.
    #[default]
    Trim,
    /// Trim, then drop one trailing `)` left over from a parenthesised value.
    TrimTrailingParen,
}

impl Postprocess {
    pub fn apply(&self, value: &str) -> String {
        match self {
            Self::None => value.to_string(),
            Self::Trim => value.trim().to_string(),
            Self::TrimTrailingParen => {
                let value = value.trim();
                value.strip_suffix(')').unwrap_or(value).trim_end().to_string()
            }
        }
    }
}

/// Return the first capture of `pattern` in `text`, post-processed, or `default`.
///
/// The default is returned verbatim; `postprocess` only ever sees a real
/// capture. A pattern without a first group behaves like a non-match.
pub fn extract(pattern: &Regex, text: &str, default: &str, postprocess: Postprocess) -> String {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| postprocess.apply(m.as_str()))
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_first_match() {
        let re = MatchFlags::default().compile(r"No:\s*(\d+)").unwrap();
        assert_eq!(extract(&re, "No: 12\nNo: 34", "-", Postprocess::Trim), "12");
    }

    #[test]
    fn test_extract_default_is_not_postprocessed() {
        let re = MatchFlags::default().compile(r"No:\s*(\d+)").unwrap();
        assert_eq!(extract(&re, "nothing here", " - ", Postprocess::Trim), " - ");
    }

    #[test]
    fn test_capture_spans_lines() {
        let re = MatchFlags::default().compile(r"Nama\s*:\s*(.*?)\s*Alamat").unwrap();
        assert_eq!(
            extract(&re, "Nama : PT SATU\nDUA\nAlamat : x", "-", Postprocess::Trim),
            "PT SATU\nDUA"
        );

        let re = MatchFlags::single_line().compile(r"Nama\s*:\s*(.*?)\s*Alamat").unwrap();
        assert_eq!(extract(&re, "Nama : PT SATU\nDUA\nAlamat : x", "-", Postprocess::Trim), "-");
    }

    #[test]
    fn test_case_insensitive_flag() {
        let flags = MatchFlags {
            case_insensitive: true,
            ..MatchFlags::default()
        };
        let re = flags.compile(r"referensi:\s*(\S+)").unwrap();
        assert_eq!(extract(&re, "REFERENSI: A1", "-", Postprocess::Trim), "A1");
    }

    #[test]
    fn test_postprocess_trailing_paren() {
        assert_eq!(Postprocess::TrimTrailingParen.apply(" INV/001) "), "INV/001");
        assert_eq!(Postprocess::Trim.apply(" INV/001) "), "INV/001)");
        assert_eq!(Postprocess::None.apply(" a "), " a ");
    }

    #[test]
    fn test_postprocess_strips_one_paren_only() {
        assert_eq!(Postprocess::TrimTrailingParen.apply("PO (A))"), "PO (A)");
        assert_eq!(Postprocess::TrimTrailingParen.apply("PO-1 )"), "PO-1");
        assert_eq!(Postprocess::TrimTrailingParen.apply("PO-1"), "PO-1");
    }
}
