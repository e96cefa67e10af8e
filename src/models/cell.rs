use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::utils::constants::{MISSING_TOKENS, OUTPUT_DATE_FORMAT};

/// A single table value
///
/// Null, empty strings and the sentinel tokens `-` / `--` all collapse to
/// [`Cell::Missing`] when read, so every stage sees one representation of
/// "absent". Numbers are always finite.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Missing,
    Number(f64),
    Text(String),
    Date(NaiveDate),
}

impl Cell {
    /// Parse a raw text value, inferring numbers
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if is_missing_token(trimmed) {
            return Cell::Missing;
        }

        match trimmed.parse::<f64>() {
            Ok(value) if value.is_finite() => Cell::Number(value),
            _ => Cell::Text(trimmed.to_string()),
        }
    }

    /// Build a number cell; NaN and infinities become missing
    pub fn number(value: f64) -> Self {
        if value.is_finite() {
            Cell::Number(value)
        } else {
            Cell::Missing
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if is_missing_token(value.trim()) {
            Cell::Missing
        } else {
            Cell::Text(value)
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Cell::Date(date) => Some(*date),
            _ => None,
        }
    }

    /// Coerce to a number. Returns `None` when a present value cannot be
    /// read as one; missing stays missing.
    pub fn coerce_number(&self) -> Option<Cell> {
        match self {
            Cell::Missing => Some(Cell::Missing),
            Cell::Number(_) => Some(self.clone()),
            Cell::Text(value) => match value.trim().parse::<f64>() {
                Ok(parsed) if parsed.is_finite() => Some(Cell::Number(parsed)),
                _ => None,
            },
            Cell::Date(_) => None,
        }
    }

    /// Text form used for join keys and output files
    pub fn render(&self) -> String {
        self.to_string()
    }
}

fn is_missing_token(value: &str) -> bool {
    MISSING_TOKENS.contains(&value)
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Missing => Ok(()),
            Cell::Number(value) => write!(f, "{}", value),
            Cell::Text(value) => f.write_str(value),
            Cell::Date(date) => write!(f, "{}", date.format(OUTPUT_DATE_FORMAT)),
        }
    }
}

// Numbers are finite by construction, so equality is reflexive
impl Eq for Cell {}

impl Hash for Cell {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Cell::Missing => {}
            // -0.0 == 0.0, so they must hash alike
            Cell::Number(value) => {
                let normalized = if *value == 0.0 { 0.0f64 } else { *value };
                normalized.to_bits().hash(state);
            }
            Cell::Text(value) => value.hash(state),
            Cell::Date(date) => date.hash(state),
        }
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Cell::Missing => serializer.serialize_none(),
            Cell::Number(value) => serializer.serialize_f64(*value),
            Cell::Text(value) => serializer.serialize_str(value),
            Cell::Date(date) => serializer.collect_str(&date.format(OUTPUT_DATE_FORMAT)),
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::number(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::parse(value)
    }
}

impl From<NaiveDate> for Cell {
    fn from(value: NaiveDate) -> Self {
        Cell::Date(value)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map_or(Cell::Missing, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_tokens_are_equivalent() {
        assert_eq!(Cell::parse(""), Cell::Missing);
        assert_eq!(Cell::parse("-"), Cell::Missing);
        assert_eq!(Cell::parse("--"), Cell::Missing);
        assert_eq!(Cell::parse("  -- "), Cell::Missing);
        assert_eq!(Cell::text("-"), Cell::Missing);
    }

    #[test]
    fn test_na_strings_are_missing() {
        for token in ["NA", "N/A", "null", "None", "NaN", "<NA>"] {
            assert_eq!(Cell::parse(token), Cell::Missing, "{}", token);
        }
        assert_eq!(Cell::parse("Nap"), Cell::text("Nap"));
    }

    #[test]
    fn test_parse_infers_numbers() {
        assert_eq!(Cell::parse("12.5"), Cell::Number(12.5));
        assert_eq!(Cell::parse(" 3 "), Cell::Number(3.0));
        assert_eq!(Cell::parse("NE."), Cell::Text("NE.".to_string()));
        assert_eq!(Cell::parse("01/02/2020"), Cell::Text("01/02/2020".to_string()));
    }

    #[test]
    fn test_coerce_number() {
        assert_eq!(Cell::text("abc").coerce_number(), None);
        assert_eq!(Cell::text(" 4.5").coerce_number(), Some(Cell::Number(4.5)));
        assert_eq!(Cell::Missing.coerce_number(), Some(Cell::Missing));
    }

    #[test]
    fn test_non_finite_numbers_are_missing() {
        assert_eq!(Cell::number(f64::NAN), Cell::Missing);
        assert_eq!(Cell::number(f64::NEG_INFINITY), Cell::Missing);
        assert_eq!(Cell::number((-1.0f64).ln()), Cell::Missing);
    }

    #[test]
    fn test_display() {
        let date = NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
        assert_eq!(Cell::Date(date).to_string(), "2020-01-02");
        assert_eq!(Cell::Number(2.0).to_string(), "2");
        assert_eq!(Cell::Missing.to_string(), "");
    }
}
