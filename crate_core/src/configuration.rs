//! # Crate Configuration
//!
//! The input side of the pipeline: product size and weight, clearances,
//! material choices and special requirements. A configuration is a plain
//! value; callers replace it wholesale rather than patching fields.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "product": { "length": 46, "width": 38, "height": 91.5, "weight": 600 },
//!   "clearances": { "side": 2, "end": 2, "top": 3 },
//!   "materials": { "plywoodThickness": 0.25, "panelThickness": 1.0, "cleatSize": "1x4" },
//!   "requirements": { "allowPlywoodRotation": true }
//! }
//! ```
//!
//! ## Example
//!
//! ```rust
//! use crate_core::configuration::CrateConfiguration;
//!
//! let json = r#"{ "product": { "length": 46, "width": 38, "height": 91.5, "weight": 600 } }"#;
//! let config = CrateConfiguration::from_json(json).unwrap();
//! assert_eq!(config.clearances.side, 2.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CrateError, CrateResult};
use crate::materials::{LumberSize, PlywoodThickness};

/// Product being shipped. Inches and pounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProductSpec {
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub weight: f64,
}

/// Clearances between product and the inside of the crate.
///
/// `side` applies on both sides of the width, `end` on both ends of the
/// length and `top` once above the product.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Clearances {
    pub side: f64,
    pub end: f64,
    pub top: f64,
}

impl Default for Clearances {
    fn default() -> Self {
        Clearances {
            side: 2.0,
            end: 2.0,
            top: 3.0,
        }
    }
}

/// Lumber grade called out on the drawing and BOM
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LumberGrade {
    #[default]
    Standard,
    #[serde(rename = "#2")]
    No2,
    #[serde(rename = "#1")]
    No1,
    Select,
}

impl LumberGrade {
    pub fn display_name(&self) -> &'static str {
        match self {
            LumberGrade::Standard => "Standard",
            LumberGrade::No2 => "#2",
            LumberGrade::No1 => "#1",
            LumberGrade::Select => "Select",
        }
    }
}

/// Plywood face grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlywoodGrade {
    #[default]
    #[serde(rename = "CDX")]
    Cdx,
    #[serde(rename = "BC")]
    Bc,
    #[serde(rename = "AC")]
    Ac,
}

impl PlywoodGrade {
    pub fn display_name(&self) -> &'static str {
        match self {
            PlywoodGrade::Cdx => "CDX",
            PlywoodGrade::Bc => "BC",
            PlywoodGrade::Ac => "AC",
        }
    }
}

/// Material choices for the crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MaterialChoice {
    /// Requested skid size. `None` lets the weight rule decide; a size lighter
    /// than the rule requires is overridden.
    pub skid_size: Option<LumberSize>,

    /// Plywood skin on every panel
    pub plywood_thickness: PlywoodThickness,

    /// Declared assembled wall thickness (plywood + cleat). Checked, not trusted.
    pub panel_thickness: Option<f64>,

    /// Cleat lumber (1x4, 2x3 or 2x4)
    pub cleat_size: LumberSize,

    pub lumber_grade: LumberGrade,

    pub plywood_grade: PlywoodGrade,
}

impl Default for MaterialChoice {
    fn default() -> Self {
        MaterialChoice {
            skid_size: None,
            plywood_thickness: PlywoodThickness::Quarter,
            panel_thickness: None,
            cleat_size: LumberSize::L1x4,
            lumber_grade: LumberGrade::Standard,
            plywood_grade: PlywoodGrade::Cdx,
        }
    }
}

impl MaterialChoice {
    /// Plywood skin plus cleat thickness
    pub fn wall_thickness(&self) -> f64 {
        self.plywood_thickness.inches() + self.cleat_size.height_in()
    }
}

/// Optional special-requirement flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpecialRequirements {
    /// Permit 3x4 skids for light loads
    #[serde(rename = "allow3x4Lumber")]
    pub allow_3x4_lumber: bool,

    /// Add a plywood deck over the floorboards
    pub include_bottom_panel: bool,

    /// Let the splicer turn sheets 90 degrees
    pub allow_plywood_rotation: bool,

    /// Floorboard lumber on hand
    pub available_floorboards: Vec<LumberSize>,
}

impl Default for SpecialRequirements {
    fn default() -> Self {
        SpecialRequirements {
            allow_3x4_lumber: false,
            include_bottom_panel: false,
            allow_plywood_rotation: true,
            available_floorboards: LumberSize::FLOORBOARDS.to_vec(),
        }
    }
}

/// Complete crate configuration for one design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrateConfiguration {
    pub product: ProductSpec,

    #[serde(default)]
    pub clearances: Clearances,

    #[serde(default)]
    pub materials: MaterialChoice,

    #[serde(default)]
    pub requirements: SpecialRequirements,
}

impl Default for CrateConfiguration {
    fn default() -> Self {
        CrateConfiguration {
            product: ProductSpec {
                length: 46.0,
                width: 38.0,
                height: 91.5,
                weight: 600.0,
            },
            clearances: Clearances::default(),
            materials: MaterialChoice::default(),
            requirements: SpecialRequirements::default(),
        }
    }
}

impl CrateConfiguration {
    /// Parse a configuration from JSON.
    ///
    /// A missing or `null` product is reported as `InvalidConfiguration`
    /// on the `product` field rather than as a parse error.
    pub fn from_json(json: &str) -> CrateResult<Self> {
        let value: serde_json::Value = serde_json::from_str(json).map_err(|e| {
            CrateError::invalid_configuration("configuration", "<unparseable>", e.to_string())
        })?;

        match value.get("product") {
            Some(product) if product.is_object() => {}
            Some(other) => {
                return Err(CrateError::invalid_configuration(
                    "product",
                    other.to_string(),
                    "Product data must be an object",
                ))
            }
            None => {
                return Err(CrateError::invalid_configuration(
                    "product",
                    "missing",
                    "Product data is required",
                ))
            }
        }

        let config: CrateConfiguration = serde_json::from_value(value).map_err(|e| {
            CrateError::invalid_configuration("configuration", "<invalid>", e.to_string())
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every input field. Runs before any geometry is computed.
    pub fn validate(&self) -> CrateResult<()> {
        let product = &self.product;
        for (field, value) in [
            ("product.length", product.length),
            ("product.width", product.width),
            ("product.height", product.height),
            ("product.weight", product.weight),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(CrateError::invalid_configuration(
                    field,
                    value.to_string(),
                    "Must be a positive number",
                ));
            }
        }

        for (field, value) in [
            ("clearances.side", self.clearances.side),
            ("clearances.end", self.clearances.end),
            ("clearances.top", self.clearances.top),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(CrateError::invalid_configuration(
                    field,
                    value.to_string(),
                    "Clearance must be zero or positive",
                ));
            }
        }

        let materials = &self.materials;
        if !materials.cleat_size.is_cleat() {
            return Err(CrateError::invalid_configuration(
                "materials.cleatSize",
                materials.cleat_size.to_string(),
                "Cleats must be 1x4, 2x3 or 2x4",
            ));
        }
        if let Some(skid) = materials.skid_size {
            if !skid.is_skid() {
                return Err(CrateError::invalid_configuration(
                    "materials.skidSize",
                    skid.to_string(),
                    "Skids must be 3x4, 4x4, 4x6, 6x6 or 8x8",
                ));
            }
        }
        if let Some(declared) = materials.panel_thickness {
            let derived = materials.wall_thickness();
            if !declared.is_finite() || (declared - derived).abs() > 1e-6 {
                return Err(CrateError::invalid_configuration(
                    "materials.panelThickness",
                    declared.to_string(),
                    format!(
                        "Panel thickness must equal plywood ({}) + cleat ({}) = {}",
                        materials.plywood_thickness.inches(),
                        materials.cleat_size.height_in(),
                        derived
                    ),
                ));
            }
        }

        let floorboards = &self.requirements.available_floorboards;
        if floorboards.is_empty() {
            return Err(CrateError::invalid_configuration(
                "requirements.availableFloorboards",
                "[]",
                "At least one floorboard size is required",
            ));
        }
        if let Some(bad) = floorboards.iter().find(|size| !size.is_floorboard()) {
            return Err(CrateError::invalid_configuration(
                "requirements.availableFloorboards",
                bad.to_string(),
                "Floorboards must be 2x6, 2x8, 2x10 or 2x12",
            ));
        }

        Ok(())
    }
}
