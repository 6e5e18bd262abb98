//! # Crate Dimensions
//!
//! Derives internal and external crate dimensions from a configuration.
//! Every thickness used downstream (wall, floor assembly, skid stack) is
//! computed here once and carried on [`CrateDimensions`], so the exporters
//! never re-derive it.
//!
//! ## Build-up
//!
//! ```text
//! internal L = product L + 2 x end clearance
//! internal W = product W + 2 x side clearance
//! internal H = product H + top clearance
//! wall       = plywood + cleat
//! external L/W = internal + 2 x wall
//! floor      = skid stack + floorboard (+ bottom deck plywood)
//! external H = internal H + floor + wall (top panel)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use crate_core::calculations::dimensions::calculate_dimensions;
//! use crate_core::configuration::CrateConfiguration;
//!
//! let dims = calculate_dimensions(&CrateConfiguration::default()).unwrap();
//! assert_eq!(dims.internal_width, 42.0);
//! assert_eq!(dims.external_width, 44.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::skids::{resolve_skid_size, select_skid_size, SkidSelection};
use crate::calculations::splicing::{CratePanelSizes, PanelSize};
use crate::configuration::CrateConfiguration;
use crate::errors::{CrateError, CrateResult};
use crate::materials::{FLOORBOARD_THICKNESS_IN, SIDE_PANEL_GROUND_CLEARANCE_IN};

/// Derived crate dimensions (inches). Read-only; recompute on every configuration change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrateDimensions {
    pub internal_length: f64,
    pub internal_width: f64,
    pub internal_height: f64,
    pub external_length: f64,
    pub external_width: f64,
    pub external_height: f64,
    /// Plywood skin plus cleat
    pub wall_thickness: f64,
    pub plywood_thickness: f64,
    pub cleat_thickness: f64,
    pub cleat_width: f64,
    pub skid: SkidSelection,
    pub floorboard_thickness: f64,
    /// Plywood deck over the floorboards, 0 when not included
    pub bottom_deck_thickness: f64,
    /// Skid stack + floorboards + deck
    pub floor_assembly_height: f64,
}

/// Compute crate dimensions. Validates the configuration first and
/// never returns a partial result.
pub fn calculate_dimensions(config: &CrateConfiguration) -> CrateResult<CrateDimensions> {
    config.validate()?;

    let product = &config.product;
    let clearances = &config.clearances;
    let materials = &config.materials;

    let internal_length = product.length + 2.0 * clearances.end;
    let internal_width = product.width + 2.0 * clearances.side;
    let internal_height = product.height + clearances.top;

    for (field, value) in [
        ("internal_length", internal_length),
        ("internal_width", internal_width),
        ("internal_height", internal_height),
    ] {
        if !value.is_finite() || value <= 0.0 {
            return Err(CrateError::invalid_configuration(
                field,
                value.to_string(),
                "Computed internal dimension must be positive",
            ));
        }
    }

    let rule = select_skid_size(product.weight, config.requirements.allow_3x4_lumber)?;
    let skid = resolve_skid_size(rule, materials.skid_size);

    let plywood_thickness = materials.plywood_thickness.inches();
    let (cleat_thickness, cleat_width) = materials.cleat_size.actual_dimensions();
    let wall_thickness = plywood_thickness + cleat_thickness;

    let bottom_deck_thickness = if config.requirements.include_bottom_panel {
        plywood_thickness
    } else {
        0.0
    };
    let floor_assembly_height = skid.stack_height() + FLOORBOARD_THICKNESS_IN + bottom_deck_thickness;

    Ok(CrateDimensions {
        internal_length,
        internal_width,
        internal_height,
        external_length: internal_length + 2.0 * wall_thickness,
        external_width: internal_width + 2.0 * wall_thickness,
        external_height: internal_height + floor_assembly_height + wall_thickness,
        wall_thickness,
        plywood_thickness,
        cleat_thickness,
        cleat_width,
        skid,
        floorboard_thickness: FLOORBOARD_THICKNESS_IN,
        bottom_deck_thickness,
        floor_assembly_height,
    })
}

impl CrateDimensions {
    /// Height of the top of the floorboards (or deck) above the skid bottom
    pub fn floor_top(&self) -> f64 {
        self.floor_assembly_height
    }

    /// Flat panel sizes handed to the splicer.
    ///
    /// Front/back span the full external width and stand on the skids; sides
    /// fit between them and drop to just above the ground.
    pub fn panel_sizes(&self, include_bottom: bool) -> CratePanelSizes {
        let full_width = self.internal_width + 2.0 * self.wall_thickness;
        let skid_stack = self.skid.stack_height();
        CratePanelSizes {
            front_back: PanelSize::new(
                full_width,
                self.internal_height + self.floorboard_thickness + self.bottom_deck_thickness,
            ),
            sides: PanelSize::new(
                self.internal_length,
                self.internal_height + self.floorboard_thickness + self.bottom_deck_thickness
                    + skid_stack
                    - SIDE_PANEL_GROUND_CLEARANCE_IN,
            ),
            top: PanelSize::new(full_width, self.internal_length + 2.0 * self.wall_thickness),
            bottom: include_bottom
                .then(|| PanelSize::new(self.internal_width, self.internal_length)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::{LumberSize, PlywoodThickness};

    #[test]
    fn test_default_dimensions() {
        let dims = calculate_dimensions(&CrateConfiguration::default()).unwrap();
        // 46 x 38 x 91.5, clearances 2/2/3, 1/4" ply + 1x4 cleats, 600 lb -> 4x4
        assert_eq!(dims.internal_length, 50.0);
        assert_eq!(dims.internal_width, 42.0);
        assert_eq!(dims.internal_height, 94.5);
        assert_eq!(dims.wall_thickness, 1.0);
        assert_eq!(dims.external_length, 52.0);
        assert_eq!(dims.external_width, 44.0);
        assert_eq!(dims.skid.size, LumberSize::L4x4);
        assert_eq!(dims.floor_assembly_height, 5.0);
        assert_eq!(dims.external_height, 94.5 + 5.0 + 1.0);
    }

    #[test]
    fn test_thicker_materials_flow_through() {
        let mut config = CrateConfiguration::default();
        config.materials.plywood_thickness = PlywoodThickness::Half;
        config.materials.cleat_size = LumberSize::L2x4;
        let dims = calculate_dimensions(&config).unwrap();
        assert_eq!(dims.wall_thickness, 2.0);
        assert_eq!(dims.external_width, 42.0 + 4.0);
        assert_eq!(dims.cleat_width, 3.5);
    }

    #[test]
    fn test_bottom_deck_raises_floor() {
        let mut config = CrateConfiguration::default();
        config.requirements.include_bottom_panel = true;
        let dims = calculate_dimensions(&config).unwrap();
        assert_eq!(dims.bottom_deck_thickness, 0.25);
        assert_eq!(dims.floor_assembly_height, 5.25);
        assert!(dims.panel_sizes(true).bottom.is_some());
    }

    #[test]
    fn test_heavy_load_uses_double_skids() {
        let mut config = CrateConfiguration::default();
        config.product.weight = 70_000.0;
        let dims = calculate_dimensions(&config).unwrap();
        assert_eq!(dims.skid.layers, 2);
        assert_eq!(dims.floor_assembly_height, 14.5 + 1.5);
    }

    #[test]
    fn test_invalid_configuration_rejected_without_result() {
        let mut config = CrateConfiguration::default();
        config.product.width = -1.0;
        let err = calculate_dimensions(&config).unwrap_err();
        assert!(matches!(err, CrateError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_panel_sizes() {
        let dims = calculate_dimensions(&CrateConfiguration::default()).unwrap();
        let sizes = dims.panel_sizes(false);
        assert_eq!(sizes.front_back, PanelSize::new(44.0, 96.0));
        assert_eq!(sizes.sides, PanelSize::new(50.0, 96.0 + 3.5 - 0.25));
        assert_eq!(sizes.top, PanelSize::new(44.0, 52.0));
        assert!(sizes.bottom.is_none());
    }
}
