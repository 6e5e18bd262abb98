//! # PMI Annotations
//!
//! Product Manufacturing Information for the STEP export: size dimensions
//! with tolerances, GD&T callouts, manufacturing notes and the datum
//! reference frame. Everything is read off a built [`CrateModel`].
//!
//! | Id | Value | Tolerance |
//! |----|-------|-----------|
//! | `DIM_PRODUCT_*` | product L/W/H | ±0.125" |
//! | `DIM_CRATE_*` | overall L/W/H | ±0.25" |
//! | `DIM_CLEARANCE_*` | side/end/top clearance | none |
//! | `GTOL_SKID_FLATNESS` | 0.125" | - |
//! | `GTOL_PANEL_PERPENDICULARITY` | 0.25" to datum A | - |

use serde::{Deserialize, Serialize};

use super::format_real;
use crate::model::{CrateModel, Point3};

pub const PRODUCT_TOLERANCE_IN: f64 = 0.125;
pub const CRATE_TOLERANCE_IN: f64 = 0.25;
pub const SKID_FLATNESS_IN: f64 = 0.125;
pub const PANEL_PERPENDICULARITY_IN: f64 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToleranceBand {
    pub upper_limit: f64,
    pub lower_limit: f64,
}

impl ToleranceBand {
    pub fn symmetric(value: f64, tolerance: f64) -> Self {
        ToleranceBand {
            upper_limit: value + tolerance,
            lower_limit: value - tolerance,
        }
    }
}

/// A size dimension on the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionAnnotation {
    pub id: String,
    pub value: f64,
    pub tolerance: Option<ToleranceBand>,
    pub referenced_geometry: Vec<String>,
    pub semantic_reference: String,
    pub position: Point3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ToleranceKind {
    Flatness,
    Perpendicularity,
}

impl ToleranceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToleranceKind::Flatness => "FLATNESS",
            ToleranceKind::Perpendicularity => "PERPENDICULARITY",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeometricTolerance {
    pub id: String,
    pub kind: ToleranceKind,
    pub tolerance: f64,
    /// Datum ids, e.g. `DATUM_A`
    pub datum_references: Vec<String>,
    pub referenced_geometry: Vec<String>,
    pub semantic_reference: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NoteKind {
    ManufacturingNote,
    AssemblyNote,
    QualityNote,
}

impl NoteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoteKind::ManufacturingNote => "MANUFACTURING_NOTE",
            NoteKind::AssemblyNote => "ASSEMBLY_NOTE",
            NoteKind::QualityNote => "QUALITY_NOTE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManufacturingNote {
    pub id: String,
    pub kind: NoteKind,
    pub text: String,
    pub referenced_features: Vec<String>,
    pub semantic_reference: String,
}

/// Datum plane through `origin` with normal `normal`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatumFeature {
    pub id: String,
    /// Letter shown in feature control frames
    pub label: String,
    pub referenced_geometry: Vec<String>,
    pub semantic_reference: String,
    pub origin: Point3,
    pub normal: Point3,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PmiAnnotations {
    pub dimensions: Vec<DimensionAnnotation>,
    pub geometric_tolerances: Vec<GeometricTolerance>,
    pub notes: Vec<ManufacturingNote>,
    pub datums: Vec<DatumFeature>,
}

impl PmiAnnotations {
    pub fn datum(&self, id: &str) -> Option<&DatumFeature> {
        self.datums.iter().find(|d| d.id == id)
    }

    pub fn dimension(&self, id: &str) -> Option<&DimensionAnnotation> {
        self.dimensions.iter().find(|d| d.id == id)
    }
}

/// Build the full annotation set for a model.
pub fn generate_pmi_annotations(model: &CrateModel) -> PmiAnnotations {
    PmiAnnotations {
        dimensions: dimension_annotations(model),
        geometric_tolerances: geometric_tolerances(),
        notes: manufacturing_notes(model),
        datums: datum_features(),
    }
}

fn dimension_annotations(model: &CrateModel) -> Vec<DimensionAnnotation> {
    let product = &model.configuration.product;
    let clearances = &model.configuration.clearances;
    let d = &model.dimensions;

    let dim = |id: &str,
               value: f64,
               tolerance: Option<f64>,
               faces: [&str; 2],
               semantic: &str,
               position: Point3| DimensionAnnotation {
        id: id.to_string(),
        value,
        tolerance: tolerance.map(|t| ToleranceBand::symmetric(value, t)),
        referenced_geometry: faces.iter().map(|f| f.to_string()).collect(),
        semantic_reference: semantic.to_string(),
        position,
    };

    let product_top = d.floor_assembly_height + product.height;
    vec![
        dim(
            "DIM_PRODUCT_LENGTH",
            product.length,
            Some(PRODUCT_TOLERANCE_IN),
            ["PRODUCT_FACE_LENGTH_1", "PRODUCT_FACE_LENGTH_2"],
            "PRODUCT_OVERALL_LENGTH",
            Point3::new(0.0, d.external_length / 2.0, product_top + 2.0),
        ),
        dim(
            "DIM_PRODUCT_WIDTH",
            product.width,
            Some(PRODUCT_TOLERANCE_IN),
            ["PRODUCT_FACE_WIDTH_1", "PRODUCT_FACE_WIDTH_2"],
            "PRODUCT_OVERALL_WIDTH",
            Point3::new(0.0, d.wall_thickness + clearances.end, product_top + 2.0),
        ),
        dim(
            "DIM_PRODUCT_HEIGHT",
            product.height,
            Some(PRODUCT_TOLERANCE_IN),
            ["PRODUCT_FACE_BOTTOM", "PRODUCT_FACE_TOP"],
            "PRODUCT_OVERALL_HEIGHT",
            Point3::new(-product.width / 2.0 - 2.0, 0.0, d.floor_assembly_height + product.height / 2.0),
        ),
        dim(
            "DIM_CRATE_LENGTH",
            d.external_length,
            Some(CRATE_TOLERANCE_IN),
            ["CRATE_FACE_LENGTH_1", "CRATE_FACE_LENGTH_2"],
            "CRATE_OVERALL_LENGTH",
            Point3::new(0.0, d.external_length / 2.0, d.external_height + 2.0),
        ),
        dim(
            "DIM_CRATE_WIDTH",
            d.external_width,
            Some(CRATE_TOLERANCE_IN),
            ["CRATE_FACE_WIDTH_1", "CRATE_FACE_WIDTH_2"],
            "CRATE_OVERALL_WIDTH",
            Point3::new(0.0, 0.0, d.external_height + 2.0),
        ),
        dim(
            "DIM_CRATE_HEIGHT",
            d.external_height,
            Some(CRATE_TOLERANCE_IN),
            ["CRATE_FACE_BOTTOM", "CRATE_FACE_TOP"],
            "CRATE_OVERALL_HEIGHT",
            Point3::new(-d.external_width / 2.0 - 2.0, 0.0, d.external_height / 2.0),
        ),
        dim(
            "DIM_CLEARANCE_WIDTH",
            clearances.side,
            None,
            ["CLEARANCE_FACE_WIDTH_1", "CLEARANCE_FACE_WIDTH_2"],
            "INTERNAL_CLEARANCE_WIDTH",
            Point3::new(d.internal_width / 2.0 - clearances.side / 2.0, d.external_length / 2.0, product_top / 2.0),
        ),
        dim(
            "DIM_CLEARANCE_LENGTH",
            clearances.end,
            None,
            ["CLEARANCE_FACE_LENGTH_1", "CLEARANCE_FACE_LENGTH_2"],
            "INTERNAL_CLEARANCE_LENGTH",
            Point3::new(0.0, d.wall_thickness + clearances.end / 2.0, product_top / 2.0),
        ),
        dim(
            "DIM_CLEARANCE_HEIGHT",
            clearances.top,
            None,
            ["CLEARANCE_FACE_BOTTOM", "CLEARANCE_FACE_TOP"],
            "INTERNAL_CLEARANCE_HEIGHT",
            Point3::new(-1.0, d.external_length / 2.0, product_top + clearances.top / 2.0),
        ),
    ]
}

fn geometric_tolerances() -> Vec<GeometricTolerance> {
    vec![
        GeometricTolerance {
            id: "GTOL_SKID_FLATNESS".to_string(),
            kind: ToleranceKind::Flatness,
            tolerance: SKID_FLATNESS_IN,
            datum_references: Vec::new(),
            referenced_geometry: vec!["SKID_TOP_SURFACE".to_string()],
            semantic_reference: "SKID_FLATNESS_REQUIREMENT".to_string(),
        },
        GeometricTolerance {
            id: "GTOL_PANEL_PERPENDICULARITY".to_string(),
            kind: ToleranceKind::Perpendicularity,
            tolerance: PANEL_PERPENDICULARITY_IN,
            datum_references: vec!["DATUM_A".to_string()],
            referenced_geometry: vec!["SIDE_PANEL_INTERNAL_FACE".to_string()],
            semantic_reference: "PANEL_PERPENDICULARITY_REQUIREMENT".to_string(),
        },
    ]
}

fn manufacturing_notes(model: &CrateModel) -> Vec<ManufacturingNote> {
    let config = &model.configuration;
    let materials = &config.materials;
    let skids = &model.skids;
    let clearances = &config.clearances;

    let material = [
        "MATERIAL SPECIFICATIONS:".to_string(),
        format!("- Lumber Grade: {}", materials.lumber_grade.display_name()),
        format!(
            "- Plywood: {} {}",
            materials.plywood_thickness.display_name(),
            materials.plywood_grade.display_name()
        ),
        format!("- Skids: {} x {}", skids.size.display_name(), skids.count),
        format!("- Cleats: {}", materials.cleat_size.display_name()),
    ]
    .join("\n");

    let layers = if skids.layers > 1 {
        format!(" in {} layers", skids.layers)
    } else {
        String::new()
    };
    let assembly = [
        "ASSEMBLY INSTRUCTIONS:".to_string(),
        format!(
            "1. Install {} skids{} at {}\" pitch",
            skids.count,
            layers,
            format_real(skids.spacing)
        ),
        format!("2. Lay {} floorboards across the skids", model.floorboards.boards.len()),
        "3. Fit front, back and end panels, then the top".to_string(),
        format!(
            "4. Verify clearances: side={}\", end={}\", top={}\"",
            format_real(clearances.side),
            format_real(clearances.end),
            format_real(clearances.top)
        ),
    ]
    .join("\n");

    let mut quality = vec![
        "QUALITY REQUIREMENTS:".to_string(),
        format!("- Product weight: {} lbs", format_real(config.product.weight)),
        format!("- Skid flatness within {}\"", format_real(SKID_FLATNESS_IN)),
        format!("- Panels perpendicular to datum A within {}\"", format_real(PANEL_PERPENDICULARITY_IN)),
    ];
    if skids.requires_rub_strips {
        quality.push("- Rub strips required under skids".to_string());
    }

    vec![
        ManufacturingNote {
            id: "NOTE_MATERIAL_SPECS".to_string(),
            kind: NoteKind::ManufacturingNote,
            text: material,
            referenced_features: vec!["ALL_COMPONENTS".to_string()],
            semantic_reference: "MATERIAL_SPECIFICATION_REQUIREMENTS".to_string(),
        },
        ManufacturingNote {
            id: "NOTE_ASSEMBLY_INSTRUCTIONS".to_string(),
            kind: NoteKind::AssemblyNote,
            text: assembly,
            referenced_features: vec!["SKID_ASSEMBLY".to_string(), "PANEL_ASSEMBLY".to_string()],
            semantic_reference: "ASSEMBLY_PROCEDURE_REQUIREMENTS".to_string(),
        },
        ManufacturingNote {
            id: "NOTE_QUALITY_REQUIREMENTS".to_string(),
            kind: NoteKind::QualityNote,
            text: quality.join("\n"),
            referenced_features: vec!["STRUCTURAL_COMPONENTS".to_string()],
            semantic_reference: "QUALITY_ASSURANCE_REQUIREMENTS".to_string(),
        },
    ]
}

fn datum_features() -> Vec<DatumFeature> {
    let datum = |label: &str, surface: &str, semantic: &str, normal: Point3| DatumFeature {
        id: format!("DATUM_{label}"),
        label: label.to_string(),
        referenced_geometry: vec![surface.to_string()],
        semantic_reference: semantic.to_string(),
        origin: Point3::default(),
        normal,
    };
    vec![
        datum("A", "CRATE_BOTTOM_SURFACE", "PRIMARY_DATUM_PLANE", Point3::new(0.0, 0.0, 1.0)),
        datum("B", "CRATE_FRONT_SURFACE", "SECONDARY_DATUM_PLANE", Point3::new(0.0, 1.0, 0.0)),
        datum("C", "CRATE_LEFT_SURFACE", "TERTIARY_DATUM_PLANE", Point3::new(1.0, 0.0, 0.0)),
    ]
}
