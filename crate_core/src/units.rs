//! # Unit Types
//!
//! Type-safe wrappers for the units crate geometry moves through. They are
//! plain `f64` newtypes so JSON stays clean (just numbers).
//!
//! ## US Customary Units (Primary)
//!
//! All geometry is computed in inches and pounds. Feet appear in lumber
//! purchasing (8 ft boards, linear feet), square feet in material reports and
//! millimeters only in the STEP unit definition.
//!
//! ## Example
//!
//! ```rust
//! use crate_core::units::{Feet, Inches, Millimeters};
//!
//! let board: Inches = Feet(8.0).into();
//! assert_eq!(board.0, 96.0);
//!
//! let mm: Millimeters = Inches(1.0).into();
//! assert_eq!(mm.0, 25.4);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// Millimeters per inch (exact by definition)
pub const MM_PER_INCH: f64 = 25.4;

// ============================================================================
// Length Units
// ============================================================================

/// Length in feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Feet(pub f64);

/// Length in inches
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inches(pub f64);

/// Length in millimeters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

impl From<Feet> for Inches {
    fn from(ft: Feet) -> Self {
        Inches(ft.0 * 12.0)
    }
}

impl From<Inches> for Feet {
    fn from(inches: Inches) -> Self {
        Feet(inches.0 / 12.0)
    }
}

impl From<Inches> for Millimeters {
    fn from(inches: Inches) -> Self {
        Millimeters(inches.0 * MM_PER_INCH)
    }
}

impl From<Millimeters> for Inches {
    fn from(mm: Millimeters) -> Self {
        Inches(mm.0 / MM_PER_INCH)
    }
}

impl Add for Inches {
    type Output = Inches;
    fn add(self, rhs: Inches) -> Inches {
        Inches(self.0 + rhs.0)
    }
}

impl Sub for Inches {
    type Output = Inches;
    fn sub(self, rhs: Inches) -> Inches {
        Inches(self.0 - rhs.0)
    }
}

// ============================================================================
// Area Units
// ============================================================================

/// Area in square inches
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SquareInches(pub f64);

/// Area in square feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SquareFeet(pub f64);

impl From<SquareInches> for SquareFeet {
    fn from(sq_in: SquareInches) -> Self {
        SquareFeet(sq_in.0 / 144.0)
    }
}

impl From<SquareFeet> for SquareInches {
    fn from(sq_ft: SquareFeet) -> Self {
        SquareInches(sq_ft.0 * 144.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_conversions() {
        let inches: Inches = Feet(2.0).into();
        assert_eq!(inches.0, 24.0);
        let feet: Feet = Inches(30.0).into();
        assert_eq!(feet.0, 2.5);
        let back: Inches = Millimeters(50.8).into();
        assert!((back.0 - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_area_conversion() {
        let sheet: SquareFeet = SquareInches(48.0 * 96.0).into();
        assert_eq!(sheet.0, 32.0);
    }

    #[test]
    fn test_inch_arithmetic() {
        assert_eq!((Inches(3.5) + Inches(0.75)).0, 4.25);
        assert_eq!((Inches(3.5) - Inches(1.5)).0, 2.0);
    }
}
