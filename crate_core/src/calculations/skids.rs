//! # Skid Sizing
//!
//! Maps gross weight to a skid cross-section, then lays skids out across
//! the crate width.
//!
//! ## Weight brackets
//!
//! Brackets are checked as `weight <= max` in ascending order and the first
//! match wins, so a weight sitting exactly on a boundary takes the lighter
//! bracket.
//!
//! | Max weight (lb) | Skid |
//! |-----------------|------|
//! | 500 (3x4 allowed) | 3x4 |
//! | 4,500 | 4x4 |
//! | 20,000 | 4x6 |
//! | 40,000 | 6x6 |
//! | 60,000 | 8x8 |
//! | above | 8x8, two layers |
//!
//! ## Example
//!
//! ```rust
//! use crate_core::calculations::skids::select_skid_size;
//! use crate_core::materials::LumberSize;
//!
//! let skid = select_skid_size(4500.0, false).unwrap();
//! assert_eq!(skid.size, LumberSize::L4x4);
//!
//! let heavy = select_skid_size(75_000.0, false).unwrap();
//! assert_eq!(heavy.size, LumberSize::L8x8);
//! assert_eq!(heavy.layers, 2);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CrateError, CrateResult};
use crate::materials::{LumberSize, RUB_STRIP_LENGTH_THRESHOLD_IN};

/// One row of the weight table
#[derive(Debug, Clone, Copy)]
struct SkidBracket {
    max_weight_lbs: f64,
    size: LumberSize,
    light_duty_only: bool,
}

const SKID_BRACKETS: [SkidBracket; 5] = [
    SkidBracket { max_weight_lbs: 500.0, size: LumberSize::L3x4, light_duty_only: true },
    SkidBracket { max_weight_lbs: 4_500.0, size: LumberSize::L4x4, light_duty_only: false },
    SkidBracket { max_weight_lbs: 20_000.0, size: LumberSize::L4x6, light_duty_only: false },
    SkidBracket { max_weight_lbs: 40_000.0, size: LumberSize::L6x6, light_duty_only: false },
    SkidBracket { max_weight_lbs: 60_000.0, size: LumberSize::L8x8, light_duty_only: false },
];

/// Skid cross-section chosen for a weight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkidSelection {
    pub size: LumberSize,
    /// Vertical dimension of one skid (in)
    pub height: f64,
    /// Face width of one skid (in)
    pub width: f64,
    /// 1, or 2 when the load exceeds every bracket
    pub layers: u8,
}

impl SkidSelection {
    fn single(size: LumberSize, layers: u8) -> Self {
        let (height, width) = size.actual_dimensions();
        SkidSelection { size, height, width, layers }
    }

    /// Height of the skid stack (all layers)
    pub fn stack_height(&self) -> f64 {
        self.height * f64::from(self.layers)
    }
}

/// Select the skid cross-section for a gross weight in pounds.
///
/// Above the heaviest bracket the largest skid is returned with `layers = 2`
/// instead of failing.
pub fn select_skid_size(weight_lbs: f64, allow_3x4: bool) -> CrateResult<SkidSelection> {
    if !weight_lbs.is_finite() || weight_lbs <= 0.0 {
        return Err(CrateError::invalid_argument(
            "weight",
            weight_lbs.to_string(),
            "Weight must be positive",
        ));
    }

    let bracket = SKID_BRACKETS
        .iter()
        .filter(|b| allow_3x4 || !b.light_duty_only)
        .find(|b| weight_lbs <= b.max_weight_lbs);

    Ok(match bracket {
        Some(b) => SkidSelection::single(b.size, 1),
        None => SkidSelection::single(LumberSize::L8x8, 2),
    })
}

/// Apply a requested skid size on top of the weight rule.
///
/// The heavier of the two wins; the layer count from the rule is kept.
pub fn resolve_skid_size(rule: SkidSelection, requested: Option<LumberSize>) -> SkidSelection {
    let Some(requested) = requested else {
        return rule;
    };
    match (requested.skid_rank(), rule.size.skid_rank()) {
        (Some(req), Some(min)) if req >= min => SkidSelection::single(requested, rule.layers),
        _ => {
            tracing::warn!(
                requested = %requested,
                required = %rule.size,
                "Requested skid size is too light for the load; using the weight rule"
            );
            rule
        }
    }
}

/// Maximum center spacing and minimum count for a skid size at a weight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpacingRule {
    pub max_spacing: f64,
    pub min_count: usize,
}

pub fn spacing_rule(size: LumberSize, weight_lbs: f64) -> SpacingRule {
    let (max_spacing, min_count) = match size {
        LumberSize::L4x6 if weight_lbs <= 6_000.0 => (41.0, 3),
        LumberSize::L4x6 if weight_lbs <= 12_000.0 => (28.0, 4),
        LumberSize::L4x6 => (24.0, 4),
        LumberSize::L6x6 if weight_lbs <= 30_000.0 => (24.0, 4),
        LumberSize::L6x6 => (20.0, 5),
        LumberSize::L8x8 => (24.0, 5),
        // 3x4 and 4x4
        _ => (30.0, 3),
    };
    SpacingRule { max_spacing, min_count }
}

/// Skid layout across the crate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkidConfiguration {
    pub size: LumberSize,
    pub height: f64,
    pub width: f64,
    pub layers: u8,
    pub count: usize,
    /// Center-to-center spacing (in)
    pub spacing: f64,
    pub max_spacing: f64,
    pub requires_rub_strips: bool,
    /// Skids run the full external length
    pub length: f64,
    /// Skid centerlines in X, crate centerline at 0
    pub positions: Vec<f64>,
}

impl SkidConfiguration {
    pub fn stack_height(&self) -> f64 {
        self.height * f64::from(self.layers)
    }

    /// Outside-to-outside width covered by the skids
    pub fn footprint_width(&self) -> f64 {
        match (self.positions.first(), self.positions.last()) {
            (Some(first), Some(last)) => last - first + self.width,
            _ => 0.0,
        }
    }
}

/// Lay out skids under a crate.
///
/// Outer skids sit flush with the internal width; the rest are evenly spaced.
/// Two skids suffice when the internal width fits within one spacing.
pub fn calculate_skid_configuration(
    selection: &SkidSelection,
    weight_lbs: f64,
    internal_width: f64,
    external_width: f64,
    external_length: f64,
) -> CrateResult<SkidConfiguration> {
    let skid_width = selection.width;
    if internal_width <= skid_width {
        return Err(CrateError::invalid_configuration(
            "internal_width",
            internal_width.to_string(),
            format!("Crate is too narrow for {} skids", selection.size),
        ));
    }

    let rule = spacing_rule(selection.size, weight_lbs);
    let span = internal_width - skid_width;
    let count = if internal_width <= rule.max_spacing + skid_width {
        2
    } else {
        let needed = (span / rule.max_spacing).ceil() as usize + 1;
        needed.max(rule.min_count)
    };

    let spacing = span / (count - 1) as f64;
    let edge = internal_width / 2.0 - skid_width / 2.0;
    let positions: Vec<f64> = (0..count).map(|i| -edge + spacing * i as f64).collect();

    let config = SkidConfiguration {
        size: selection.size,
        height: selection.height,
        width: selection.width,
        layers: selection.layers,
        count,
        spacing,
        max_spacing: rule.max_spacing,
        requires_rub_strips: external_length > RUB_STRIP_LENGTH_THRESHOLD_IN,
        length: external_length,
        positions,
    };

    if config.footprint_width() > external_width + 1e-9 {
        return Err(CrateError::invalid_configuration(
            "skids",
            config.footprint_width().to_string(),
            "Skid footprint exceeds the crate width",
        ));
    }

    Ok(config)
}

/// Share of the load carried by each skid.
pub fn calculate_weight_per_skid(total_weight_lbs: f64, skid_count: i32) -> CrateResult<f64> {
    if skid_count <= 0 {
        return Err(CrateError::invalid_argument(
            "skid_count",
            skid_count.to_string(),
            "Skid count must be positive",
        ));
    }
    Ok(total_weight_lbs / f64::from(skid_count))
}
