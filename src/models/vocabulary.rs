//! Canonical categorical vocabularies.
//!
//! The raw tables spell the same wind direction or dew point level in many
//! ways ("NE.", "northeast", "NORTHEAST"). Each vocabulary maps every known
//! spelling onto one canonical value. Unknown spellings are not errors; the
//! cleaner leaves them unchanged.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::constants::{DEW_POINT_CATEGORY, WIND_DIRECTION};

/// A categorical column with a fixed synonym table
pub trait Vocabulary: Sized + Copy + fmt::Display {
    /// Column the vocabulary applies to
    const COLUMN: &'static str;

    /// Canonical value for a raw spelling, if the spelling is known
    fn from_synonym(raw: &str) -> Option<Self>;

    fn as_str(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WindDirection {
    North,
    Northeast,
    East,
    Southeast,
    South,
    Southwest,
    West,
    Northwest,
}

impl Vocabulary for WindDirection {
    const COLUMN: &'static str = WIND_DIRECTION;

    fn from_synonym(raw: &str) -> Option<Self> {
        use WindDirection::*;
        let direction = match raw {
            "North" | "N" | "N." | "NORTH" | "north" | "Northward" => North,
            "Northeast" | "NE" | "NE." | "NORTHEAST" | "northeast" => Northeast,
            "East" | "E" | "E." | "EAST" | "east" => East,
            "Southeast" | "SE" | "SE." | "SOUTHEAST" | "southeast" => Southeast,
            "South" | "S" | "S." | "SOUTH" | "south" | "Southward" => South,
            "Southwest" | "SW" | "SW." | "southwest" => Southwest,
            "West" | "W" | "W." | "WEST" | "west" => West,
            "Northwest" | "NW" | "NW." | "NORTHWEST" | "northwest" => Northwest,
            _ => return None,
        };
        Some(direction)
    }

    fn as_str(&self) -> &'static str {
        match self {
            WindDirection::North => "North",
            WindDirection::Northeast => "Northeast",
            WindDirection::East => "East",
            WindDirection::Southeast => "Southeast",
            WindDirection::South => "South",
            WindDirection::Southwest => "Southwest",
            WindDirection::West => "West",
            WindDirection::Northwest => "Northwest",
        }
    }
}

/// Dew point levels, ordered from lowest to highest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DewPointCategory {
    VeryLow,
    Low,
    Moderate,
    High,
    VeryHigh,
    Extreme,
}

impl Vocabulary for DewPointCategory {
    const COLUMN: &'static str = DEW_POINT_CATEGORY;

    fn from_synonym(raw: &str) -> Option<Self> {
        use DewPointCategory::*;
        let level = match raw {
            "Very Low" | "VL" | "very low" | "VERY LOW" | "Minimal" => VeryLow,
            "Low" | "L" | "low" | "LOW" | "Below Average" => Low,
            "Moderate" | "M" | "moderate" | "MODERATE" | "Normal" => Moderate,
            "High" | "H" | "high" | "HIGH" | "High Level" => High,
            "Very High" | "VH" | "very high" | "VERY HIGH" => VeryHigh,
            "Extreme" => Extreme,
            _ => return None,
        };
        Some(level)
    }

    fn as_str(&self) -> &'static str {
        match self {
            DewPointCategory::VeryLow => "Very Low",
            DewPointCategory::Low => "Low",
            DewPointCategory::Moderate => "Moderate",
            DewPointCategory::High => "High",
            DewPointCategory::VeryHigh => "Very High",
            DewPointCategory::Extreme => "Extreme",
        }
    }
}

impl fmt::Display for WindDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for DewPointCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wind_synonyms() {
        assert_eq!(WindDirection::from_synonym("SW."), Some(WindDirection::Southwest));
        assert_eq!(WindDirection::from_synonym("Northward"), Some(WindDirection::North));
        assert_eq!(WindDirection::from_synonym("east"), Some(WindDirection::East));
        assert_eq!(WindDirection::from_synonym("Up"), None);
    }

    #[test]
    fn test_canonical_values_are_fixed_points() {
        for raw in ["North", "Northeast", "East", "Southeast", "South", "Southwest", "West", "Northwest"] {
            assert_eq!(WindDirection::from_synonym(raw).unwrap().as_str(), raw);
        }
        for raw in ["Very Low", "Low", "Moderate", "High", "Very High", "Extreme"] {
            assert_eq!(DewPointCategory::from_synonym(raw).unwrap().as_str(), raw);
        }
    }

    #[test]
    fn test_dew_point_synonyms() {
        assert_eq!(DewPointCategory::from_synonym("Normal"), Some(DewPointCategory::Moderate));
        assert_eq!(DewPointCategory::from_synonym("Below Average"), Some(DewPointCategory::Low));
        assert_eq!(DewPointCategory::from_synonym("VH"), Some(DewPointCategory::VeryHigh));
        assert_eq!(DewPointCategory::from_synonym("Scorching"), None);
        assert!(DewPointCategory::VeryLow < DewPointCategory::Extreme);
    }
}
