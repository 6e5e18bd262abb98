//! Standard Lumber Sizes
//!
//! Nominal-to-actual lumber conversions for the pieces a crate is built
//! from: skids, floorboards and cleats.
//!
//! ## Nominal vs Actual Dimensions
//!
//! - 1x nominal = 0.75" actual
//! - 2x nominal = 1.5" actual
//! - 4x nominal = 3.5" actual
//! - 8x nominal = 7.25" actual (crate-grade 8x8 is surfaced like 2x8 faces)
//!
//! Dimensions are reported as installed: `height` is the vertical dimension
//! of a skid or the thickness of a board, `width` is the face width.

use std::collections::HashMap;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::CrateError;

/// Standard purchasing length for crate lumber (8 ft)
pub const STANDARD_BOARD_LENGTH_IN: f64 = 96.0;

/// Standard lumber size designation
///
/// Serializes as the nominal name (`"4x4"`, `"2x10"`) to match configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LumberSize {
    /// 1x4 (0.75" x 3.5")
    #[serde(rename = "1x4")]
    L1x4,
    /// 2x3 (1.5" x 2.5")
    #[serde(rename = "2x3")]
    L2x3,
    /// 2x4 (1.5" x 3.5")
    #[serde(rename = "2x4")]
    L2x4,
    /// 2x6 (1.5" x 5.5")
    #[serde(rename = "2x6")]
    L2x6,
    /// 2x8 (1.5" x 7.25")
    #[serde(rename = "2x8")]
    L2x8,
    /// 2x10 (1.5" x 9.25")
    #[serde(rename = "2x10")]
    L2x10,
    /// 2x12 (1.5" x 11.25")
    #[serde(rename = "2x12")]
    L2x12,
    /// 3x3 (2.5" x 2.5")
    #[serde(rename = "3x3")]
    L3x3,
    /// 3x4 standing on edge (3.5" tall x 2.5" wide)
    #[serde(rename = "3x4")]
    L3x4,
    /// 4x4 (3.5" x 3.5")
    #[serde(rename = "4x4")]
    L4x4,
    /// 4x6 laid flat (3.5" tall x 5.5" wide)
    #[serde(rename = "4x6")]
    L4x6,
    /// 6x6 (5.5" x 5.5")
    #[serde(rename = "6x6")]
    L6x6,
    /// 8x8 (7.25" x 7.25")
    #[serde(rename = "8x8")]
    L8x8,
}

static NOMINAL_LOOKUP: Lazy<HashMap<&'static str, LumberSize>> = Lazy::new(|| {
    LumberSize::ALL
        .iter()
        .map(|size| (size.display_name(), *size))
        .collect()
});

impl LumberSize {
    /// All sizes known to the tables
    pub const ALL: [LumberSize; 13] = [
        LumberSize::L1x4,
        LumberSize::L2x3,
        LumberSize::L2x4,
        LumberSize::L2x6,
        LumberSize::L2x8,
        LumberSize::L2x10,
        LumberSize::L2x12,
        LumberSize::L3x3,
        LumberSize::L3x4,
        LumberSize::L4x4,
        LumberSize::L4x6,
        LumberSize::L6x6,
        LumberSize::L8x8,
    ];

    /// Skid sizes, lightest capacity first
    pub const SKIDS: [LumberSize; 5] = [
        LumberSize::L3x4,
        LumberSize::L4x4,
        LumberSize::L4x6,
        LumberSize::L6x6,
        LumberSize::L8x8,
    ];

    /// Floorboard sizes, narrowest first
    pub const FLOORBOARDS: [LumberSize; 4] = [
        LumberSize::L2x6,
        LumberSize::L2x8,
        LumberSize::L2x10,
        LumberSize::L2x12,
    ];

    /// Cleat sizes
    pub const CLEATS: [LumberSize; 3] = [LumberSize::L1x4, LumberSize::L2x3, LumberSize::L2x4];

    /// Get the actual dimensions (height, width) in inches as installed
    pub fn actual_dimensions(&self) -> (f64, f64) {
        match self {
            LumberSize::L1x4 => (0.75, 3.5),
            LumberSize::L2x3 => (1.5, 2.5),
            LumberSize::L2x4 => (1.5, 3.5),
            LumberSize::L2x6 => (1.5, 5.5),
            LumberSize::L2x8 => (1.5, 7.25),
            LumberSize::L2x10 => (1.5, 9.25),
            LumberSize::L2x12 => (1.5, 11.25),
            LumberSize::L3x3 => (2.5, 2.5),
            LumberSize::L3x4 => (3.5, 2.5),
            LumberSize::L4x4 => (3.5, 3.5),
            LumberSize::L4x6 => (3.5, 5.5),
            LumberSize::L6x6 => (5.5, 5.5),
            LumberSize::L8x8 => (7.25, 7.25),
        }
    }

    /// Get the nominal dimensions
    pub fn nominal_dimensions(&self) -> (u8, u8) {
        match self {
            LumberSize::L1x4 => (1, 4),
            LumberSize::L2x3 => (2, 3),
            LumberSize::L2x4 => (2, 4),
            LumberSize::L2x6 => (2, 6),
            LumberSize::L2x8 => (2, 8),
            LumberSize::L2x10 => (2, 10),
            LumberSize::L2x12 => (2, 12),
            LumberSize::L3x3 => (3, 3),
            LumberSize::L3x4 => (3, 4),
            LumberSize::L4x4 => (4, 4),
            LumberSize::L4x6 => (4, 6),
            LumberSize::L6x6 => (6, 6),
            LumberSize::L8x8 => (8, 8),
        }
    }

    /// Get display name (e.g., "2x10")
    pub fn display_name(&self) -> &'static str {
        match self {
            LumberSize::L1x4 => "1x4",
            LumberSize::L2x3 => "2x3",
            LumberSize::L2x4 => "2x4",
            LumberSize::L2x6 => "2x6",
            LumberSize::L2x8 => "2x8",
            LumberSize::L2x10 => "2x10",
            LumberSize::L2x12 => "2x12",
            LumberSize::L3x3 => "3x3",
            LumberSize::L3x4 => "3x4",
            LumberSize::L4x4 => "4x4",
            LumberSize::L4x6 => "4x6",
            LumberSize::L6x6 => "6x6",
            LumberSize::L8x8 => "8x8",
        }
    }

    /// Actual height (skids) or thickness (boards) in inches
    pub fn height_in(&self) -> f64 {
        self.actual_dimensions().0
    }

    /// Actual face width in inches
    pub fn width_in(&self) -> f64 {
        self.actual_dimensions().1
    }

    /// Look up a size by its nominal name ("4x4", "2X10", " 1x4 ")
    pub fn from_nominal(name: &str) -> Option<Self> {
        NOMINAL_LOOKUP
            .get(name.trim().to_ascii_lowercase().as_str())
            .copied()
    }

    pub fn is_skid(&self) -> bool {
        Self::SKIDS.contains(self)
    }

    pub fn is_floorboard(&self) -> bool {
        Self::FLOORBOARDS.contains(self)
    }

    pub fn is_cleat(&self) -> bool {
        Self::CLEATS.contains(self)
    }

    /// Capacity rank of a skid size (0 = lightest); `None` for non-skid lumber
    pub fn skid_rank(&self) -> Option<usize> {
        Self::SKIDS.iter().position(|s| s == self)
    }
}

impl std::fmt::Display for LumberSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for LumberSize {
    type Err = CrateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LumberSize::from_nominal(s).ok_or_else(|| {
            CrateError::invalid_argument("lumber_size", s, "Unknown nominal lumber size")
        })
    }
}

/// Widest standard floorboard that fits in `available_width_in`, if any.
pub fn select_lumber_for_space(available_width_in: f64) -> Option<LumberSize> {
    LumberSize::FLOORBOARDS
        .iter()
        .rev()
        .find(|size| size.width_in() <= available_width_in)
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actual_dimensions() {
        assert_eq!(LumberSize::L1x4.actual_dimensions(), (0.75, 3.5));
        assert_eq!(LumberSize::L4x6.actual_dimensions(), (3.5, 5.5));
        assert_eq!(LumberSize::L3x4.actual_dimensions(), (3.5, 2.5));
        assert_eq!(LumberSize::L8x8.actual_dimensions(), (7.25, 7.25));
    }

    #[test]
    fn test_nominal_lookup() {
        assert_eq!(LumberSize::from_nominal("4x4"), Some(LumberSize::L4x4));
        assert_eq!(LumberSize::from_nominal(" 2X10 "), Some(LumberSize::L2x10));
        assert_eq!(LumberSize::from_nominal("5x5"), None);
        assert!("9x9".parse::<LumberSize>().is_err());
        for size in LumberSize::ALL {
            assert_eq!(size.display_name().parse::<LumberSize>().unwrap(), size);
        }
    }

    #[test]
    fn test_serializes_as_nominal_name() {
        let json = serde_json::to_string(&LumberSize::L2x12).unwrap();
        assert_eq!(json, "\"2x12\"");
        let size: LumberSize = serde_json::from_str("\"6x6\"").unwrap();
        assert_eq!(size, LumberSize::L6x6);
    }

    #[test]
    fn test_categories() {
        assert!(LumberSize::L4x6.is_skid());
        assert!(LumberSize::L2x8.is_floorboard());
        assert!(LumberSize::L1x4.is_cleat());
        assert!(!LumberSize::L1x4.is_skid());
        assert_eq!(LumberSize::L3x4.skid_rank(), Some(0));
        assert_eq!(LumberSize::L8x8.skid_rank(), Some(4));
        assert_eq!(LumberSize::L2x6.skid_rank(), None);
    }

    #[test]
    fn test_select_lumber_for_space() {
        assert_eq!(select_lumber_for_space(12.0), Some(LumberSize::L2x12));
        assert_eq!(select_lumber_for_space(9.25), Some(LumberSize::L2x10));
        assert_eq!(select_lumber_for_space(6.0), Some(LumberSize::L2x6));
        assert_eq!(select_lumber_for_space(5.0), None);
    }
}
