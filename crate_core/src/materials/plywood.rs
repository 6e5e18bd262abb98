//! Plywood Sheet Stock
//!
//! Standard 4'x8' sheets and the thicknesses crate panels are skinned with.

use serde::{Deserialize, Serialize};

use crate::errors::CrateError;

/// Standard plywood sheet (48" x 96"), long side vertical in its original orientation
pub const STANDARD_SHEET: PlywoodSheet = PlywoodSheet {
    width: 48.0,
    height: 96.0,
};

/// A rectangular sheet of stock plywood
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlywoodSheet {
    /// Short side in the original orientation (inches)
    pub width: f64,
    /// Long side in the original orientation (inches)
    pub height: f64,
}

impl PlywoodSheet {
    /// (width, height) as laid on the panel; rotated swaps the sides
    pub fn oriented(&self, rotated: bool) -> (f64, f64) {
        if rotated {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

impl Default for PlywoodSheet {
    fn default() -> Self {
        STANDARD_SHEET
    }
}

/// Stocked plywood thicknesses.
///
/// Serialized as the thickness in inches (`0.25`, `0.375`, ...) so
/// configuration files carry plain numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub enum PlywoodThickness {
    /// 1/4"
    #[default]
    Quarter,
    /// 3/8"
    ThreeEighths,
    /// 1/2"
    Half,
    /// 5/8"
    FiveEighths,
    /// 3/4"
    ThreeQuarters,
}

impl PlywoodThickness {
    pub const ALL: [PlywoodThickness; 5] = [
        PlywoodThickness::Quarter,
        PlywoodThickness::ThreeEighths,
        PlywoodThickness::Half,
        PlywoodThickness::FiveEighths,
        PlywoodThickness::ThreeQuarters,
    ];

    /// Thickness in inches
    pub fn inches(&self) -> f64 {
        match self {
            PlywoodThickness::Quarter => 0.25,
            PlywoodThickness::ThreeEighths => 0.375,
            PlywoodThickness::Half => 0.5,
            PlywoodThickness::FiveEighths => 0.625,
            PlywoodThickness::ThreeQuarters => 0.75,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PlywoodThickness::Quarter => "1/4\"",
            PlywoodThickness::ThreeEighths => "3/8\"",
            PlywoodThickness::Half => "1/2\"",
            PlywoodThickness::FiveEighths => "5/8\"",
            PlywoodThickness::ThreeQuarters => "3/4\"",
        }
    }
}

impl TryFrom<f64> for PlywoodThickness {
    type Error = CrateError;

    fn try_from(inches: f64) -> Result<Self, Self::Error> {
        PlywoodThickness::ALL
            .iter()
            .find(|t| (t.inches() - inches).abs() < 1e-6)
            .copied()
            .ok_or_else(|| {
                CrateError::invalid_configuration(
                    "materials.plywoodThickness",
                    inches.to_string(),
                    "Plywood thickness must be one of 0.25, 0.375, 0.5, 0.625, 0.75",
                )
            })
    }
}

impl From<PlywoodThickness> for f64 {
    fn from(thickness: PlywoodThickness) -> Self {
        thickness.inches()
    }
}

impl std::fmt::Display for PlywoodThickness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sheet_orientation() {
        assert_eq!(STANDARD_SHEET.oriented(false), (48.0, 96.0));
        assert_eq!(STANDARD_SHEET.oriented(true), (96.0, 48.0));
        assert_eq!(STANDARD_SHEET.area(), 4608.0);
    }

    #[test]
    fn test_thickness_serializes_as_number() {
        let json = serde_json::to_string(&PlywoodThickness::Half).unwrap();
        assert_eq!(json, "0.5");
        let t: PlywoodThickness = serde_json::from_str("0.375").unwrap();
        assert_eq!(t, PlywoodThickness::ThreeEighths);
        assert!(serde_json::from_str::<PlywoodThickness>("0.3").is_err());
    }
}
