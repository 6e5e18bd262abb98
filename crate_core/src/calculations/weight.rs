//! # Crate Weight
//!
//! Estimates the crate's own (tare) weight from the volume of wood in the
//! built model plus fastening hardware, and the gross shipping weight with
//! the product inside.
//!
//! Skid sizing keeps using the product weight alone. The estimate is for
//! shipping paperwork and the bill of materials.

use serde::{Deserialize, Serialize};

use crate::calculations::hardware::HardwareSummary;

/// lb/ft³
pub const PLYWOOD_DENSITY_PCF: f64 = 35.0;

/// Pine, lb/ft³
pub const LUMBER_DENSITY_PCF: f64 = 28.0;

/// Per klimp (lb)
pub const KLIMP_WEIGHT_LB: f64 = 0.15;

/// Per 3/8" lag screw (lb)
pub const LAG_SCREW_WEIGHT_LB: f64 = 0.2;

const CUBIC_INCHES_PER_FOOT: f64 = 1728.0;

/// Wood volume by part type (cubic inches)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialVolumes {
    pub plywood: f64,
    pub skids: f64,
    pub floorboards: f64,
    pub cleats: f64,
}

/// Weights in pounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightBreakdown {
    pub panels: f64,
    pub cleats: f64,
    pub skids: f64,
    pub floorboards: f64,
    pub hardware: f64,
    /// Empty crate
    pub tare: f64,
    pub product: f64,
    /// Product plus crate
    pub gross: f64,
}

pub fn estimate_crate_weight(
    volumes: &MaterialVolumes,
    hardware: &HardwareSummary,
    product_weight: f64,
) -> WeightBreakdown {
    let lumber = |cubic_inches: f64| cubic_inches / CUBIC_INCHES_PER_FOOT * LUMBER_DENSITY_PCF;

    let panels = volumes.plywood / CUBIC_INCHES_PER_FOOT * PLYWOOD_DENSITY_PCF;
    let cleats = lumber(volumes.cleats);
    let skids = lumber(volumes.skids);
    let floorboards = lumber(volumes.floorboards);
    let hardware = hardware.klimp_count as f64 * KLIMP_WEIGHT_LB
        + hardware.lag_screw_count as f64 * LAG_SCREW_WEIGHT_LB;

    let tare = panels + cleats + skids + floorboards + hardware;
    WeightBreakdown {
        panels,
        cleats,
        skids,
        floorboards,
        hardware,
        tare,
        product: product_weight,
        gross: product_weight + tare,
    }
}
