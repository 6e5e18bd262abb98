//! # Materials Tables
//!
//! Static reference data the crate rules are written against: lumber
//! nominal-to-actual sizes, plywood stock and the floor/panel constants.
//!
//! ## Example
//!
//! ```rust
//! use crate_core::materials::{LumberSize, STANDARD_SHEET};
//!
//! let (height, width) = LumberSize::L4x6.actual_dimensions();
//! assert_eq!((height, width), (3.5, 5.5));
//! assert_eq!(STANDARD_SHEET.oriented(true), (96.0, 48.0));
//! ```

pub mod lumber_sizes;
pub mod plywood;

pub use lumber_sizes::{select_lumber_for_space, LumberSize, STANDARD_BOARD_LENGTH_IN};
pub use plywood::{PlywoodSheet, PlywoodThickness, STANDARD_SHEET};

// ============================================================================
// Floor / panel constants
// ============================================================================

/// Floorboard thickness (all floorboards are 2x lumber)
pub const FLOORBOARD_THICKNESS_IN: f64 = 1.5;

/// Distance kept between the floor deck edge and the inside of the side walls
pub const FLOOR_EDGE_OFFSET_IN: f64 = 1.0;

/// Narrowest custom-ripped floorboard that can be fastened
pub const MIN_CUSTOM_BOARD_WIDTH_IN: f64 = 2.5;

/// Side panels stop short of the ground by this much
pub const SIDE_PANEL_GROUND_CLEARANCE_IN: f64 = 0.25;

/// Crates longer than this need rub strips under the skids
pub const RUB_STRIP_LENGTH_THRESHOLD_IN: f64 = 96.0;

/// Usable floor deck area inside the side walls
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct UsableFloorArea {
    pub usable_width: f64,
    pub usable_depth: f64,
}

/// Usable floor area for a crate floor of `width` x `depth` inches.
///
/// The edge offset is removed from both sides of the width; depth is used in full.
pub fn calculate_usable_floor_area(width: f64, depth: f64) -> UsableFloorArea {
    UsableFloorArea {
        usable_width: width - 2.0 * FLOOR_EDGE_OFFSET_IN,
        usable_depth: depth,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usable_floor_area_round_trip() {
        for width in [12.0, 47.3, 96.0, 150.125] {
            let area = calculate_usable_floor_area(width, 60.0);
            let rebuilt = area.usable_width + 2.0 * FLOOR_EDGE_OFFSET_IN;
            assert!((rebuilt - width).abs() < 1e-9);
            assert_eq!(area.usable_depth, 60.0);
        }
    }
}
