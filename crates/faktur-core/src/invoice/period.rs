//! Tax period (Masa/Tahun) derivation from the extracted invoice date.

use crate::error::PeriodError;

use super::rules::dates::month_code;
use super::rules::PLACEHOLDER;

/// Record key of the derived month code.
pub const MASA: &str = "Masa";

/// Record key of the derived year.
pub const TAHUN: &str = "Tahun";

/// A tax period parsed from a `DD/MonthName/YYYY` date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Period {
    pub day: String,
    /// Two-digit month code.
    pub masa: &'static str,
    pub tahun: String,
}

impl Period {
    /// The date in numeric form, `DD MM YYYY`.
    pub fn numeric_date(&self) -> String {
        format!("{} {} {}", self.day, self.masa, self.tahun)
    }
}

/// Parse the tax period out of an extracted invoice date.
pub fn derive_period(date: &str) -> Result<Period, PeriodError> {
    if date == PLACEHOLDER {
        return Err(PeriodError::Missing);
    }

    let parts: Vec<&str> = date.split('/').collect();
    let [day, month, year] = parts.as_slice() else {
        return Err(PeriodError::Shape(parts.len()));
    };

    let masa = month_code(month).ok_or_else(|| PeriodError::UnknownMonth(month.to_string()))?;

    Ok(Period {
        day: day.to_string(),
        masa,
        tahun: year.to_string(),
    })
}
