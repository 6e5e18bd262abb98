//! # Crate Model
//!
//! One immutable value holding everything computed for a configuration:
//! dimensions, skids, floorboards, splice and cleat layouts, the 3D component
//! boxes and the named scalar parameters. The exporters read only this, so a
//! number never gets computed twice.
//!
//! ## Coordinates
//!
//! - X: across the crate width, centred on 0
//! - Y: along the crate length, 0 at the outer front face
//! - Z: up, 0 at the bottom of the skids
//!
//! Every component is an axis-aligned box given by its two corner points.
//!
//! ## Example
//!
//! ```rust
//! use crate_core::calculations::splicing::SpliceOptions;
//! use crate_core::configuration::CrateConfiguration;
//! use crate_core::model::build_model;
//!
//! let model = build_model(&CrateConfiguration::default(), &SpliceOptions::default()).unwrap();
//! assert_eq!(model.parameter("overall_width"), Some(44.0));
//! assert!(model.component("SKID_1").is_some());
//! ```

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::calculations::cleats::{
    calculate_cleat_material, calculate_crate_cleats, CleatMaterial, PanelCleatLayout,
};
use crate::calculations::dimensions::{calculate_dimensions, CrateDimensions};
use crate::calculations::floorboards::{calculate_floorboard_layout, FloorboardLayout};
use crate::calculations::hardware::{calculate_hardware, calculate_klimp_layout, HardwareSummary, KlimpLayout};
use crate::calculations::skids::{calculate_skid_configuration, SkidConfiguration};
use crate::calculations::splicing::{
    calculate_crate_splicing, calculate_material_usage, CratePanelSizes, HandlingEnvelope,
    MaterialUsage, PanelFace, PanelSpliceLayout, SpliceOptions,
};
use crate::calculations::weight::{estimate_crate_weight, MaterialVolumes, WeightBreakdown};
use crate::configuration::CrateConfiguration;
use crate::errors::CrateResult;
use crate::materials::SIDE_PANEL_GROUND_CLEARANCE_IN;

// ============================================================================
// Components
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Point3 { x, y, z }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    Skid,
    Floorboard,
    Plywood,
    Cleat,
}

impl ComponentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::Skid => "skid",
            ComponentKind::Floorboard => "floorboard",
            ComponentKind::Plywood => "plywood",
            ComponentKind::Cleat => "cleat",
        }
    }
}

/// One solid part of the crate, as a box between `min` and `max`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub name: String,
    pub kind: ComponentKind,
    /// Owning panel for plywood and cleats
    pub panel: Option<PanelFace>,
    pub min: Point3,
    pub max: Point3,
    /// Stock thickness for plywood and cleats
    pub thickness: Option<f64>,
    pub material: String,
}

impl Component {
    /// X extent
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Y extent
    pub fn length(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Z extent
    pub fn height(&self) -> f64 {
        self.max.z - self.min.z
    }

    pub fn volume(&self) -> f64 {
        self.width() * self.length() * self.height()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterUnit {
    Inch,
    Pound,
    Count,
}

/// Named scalar exported to both CAD formats
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub value: f64,
    pub unit: ParameterUnit,
}

// ============================================================================
// Model
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrateModel {
    pub configuration: CrateConfiguration,
    pub dimensions: CrateDimensions,
    pub skids: SkidConfiguration,
    pub floorboards: FloorboardLayout,
    pub panel_sizes: CratePanelSizes,
    pub splice_layouts: Vec<PanelSpliceLayout>,
    pub cleat_layouts: Vec<PanelCleatLayout>,
    /// Front panel klimps
    pub klimp_layout: KlimpLayout,
    pub hardware: HardwareSummary,
    pub weight: WeightBreakdown,
    pub components: Vec<Component>,
    pub parameters: Vec<Parameter>,
    pub material_usage: MaterialUsage,
    pub cleat_material: CleatMaterial,
}

impl CrateModel {
    pub fn parameter(&self, name: &str) -> Option<f64> {
        self.parameters.iter().find(|p| p.name == name).map(|p| p.value)
    }

    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.name == name)
    }

    pub fn components_of(&self, kind: ComponentKind) -> impl Iterator<Item = &Component> {
        self.components.iter().filter(move |c| c.kind == kind)
    }

    pub fn splice_layout(&self, face: PanelFace) -> Option<&PanelSpliceLayout> {
        self.splice_layouts.iter().find(|l| l.panel_name == face.name())
    }

    /// Whether the finished crate fits the handling envelope
    pub fn fits(&self, envelope: &HandlingEnvelope) -> bool {
        let d = &self.dimensions;
        envelope.accepts(d.external_length, d.external_width, d.external_height)
    }
}

/// Build the full model for a configuration.
///
/// `options` supplies sheet stock and clearance rules; the plywood thickness
/// always comes from the configuration and rotation is allowed only when both
/// the options and the configuration allow it.
pub fn build_model(config: &CrateConfiguration, options: &SpliceOptions) -> CrateResult<CrateModel> {
    let dimensions = calculate_dimensions(config)?;

    let options = options
        .with_plywood_thickness(dimensions.plywood_thickness)
        .with_rotation(options.allow_rotation && config.requirements.allow_plywood_rotation);

    let skids = calculate_skid_configuration(
        &dimensions.skid,
        config.product.weight,
        dimensions.internal_width,
        dimensions.external_width,
        dimensions.external_length,
    )?;

    let floorboards = calculate_floorboard_layout(
        dimensions.internal_length,
        dimensions.internal_width,
        dimensions.wall_thickness,
        &config.requirements.available_floorboards,
    )?;

    let panel_sizes = dimensions.panel_sizes(config.requirements.include_bottom_panel);
    let splice_layouts = calculate_crate_splicing(&panel_sizes, &options)?;
    let cleat_layouts = calculate_crate_cleats(&splice_layouts, config.materials.cleat_size);
    let material_usage = calculate_material_usage(&splice_layouts);
    let cleat_material = calculate_cleat_material(&cleat_layouts);
    let klimp_layout = calculate_klimp_layout(
        panel_sizes.front_back.width,
        panel_sizes.front_back.height,
        dimensions.cleat_width,
    );
    let hardware = calculate_hardware(&klimp_layout, &cleat_layouts);

    let mut components = Vec::new();
    push_skids(&mut components, &dimensions, &skids);
    push_floorboards(&mut components, &dimensions, &floorboards);

    let plywood_material = format!(
        "{} {} plywood",
        config.materials.plywood_thickness.display_name(),
        config.materials.plywood_grade.display_name()
    );
    let cleat_material_name = format!(
        "{} {}",
        config.materials.cleat_size.display_name(),
        config.materials.lumber_grade.display_name()
    );
    for layout in &splice_layouts {
        let Some(face) = PanelFace::from_name(&layout.panel_name) else {
            continue;
        };
        let frame = FaceFrame { face, dims: &dimensions };
        let ply = (0.0, layout.plywood_thickness);
        for (i, sheet) in layout.sheets.iter().enumerate() {
            let (min, max) = frame.place(sheet.x, sheet.y, sheet.width, sheet.height, ply);
            components.push(Component {
                name: format!("{}_PLY_{}", layout.panel_name, i + 1),
                kind: ComponentKind::Plywood,
                panel: Some(face),
                min,
                max,
                thickness: Some(layout.plywood_thickness),
                material: plywood_material.clone(),
            });
        }

        if let Some(cleats) = cleat_layouts.iter().find(|c| c.panel_name == layout.panel_name) {
            for cleat in &cleats.cleats {
                let (du, dv) = cleat.extents();
                let depth = (layout.plywood_thickness, layout.plywood_thickness + cleat.thickness);
                let (min, max) = frame.place(cleat.x, cleat.y, du, dv, depth);
                components.push(Component {
                    name: cleat.id.clone(),
                    kind: ComponentKind::Cleat,
                    panel: Some(face),
                    min,
                    max,
                    thickness: Some(cleat.thickness),
                    material: cleat_material_name.clone(),
                });
            }
        }
    }

    let weight = estimate_crate_weight(&material_volumes(&components), &hardware, config.product.weight);

    let parameters = collect_parameters(
        config,
        &dimensions,
        &skids,
        &floorboards,
        &material_usage,
        &cleat_material,
        &hardware,
        &weight,
    );

    info!(
        overall_length = dimensions.external_length,
        overall_width = dimensions.external_width,
        overall_height = dimensions.external_height,
        skid = %skids.size,
        skids = skids.count,
        sheets = material_usage.total_sheets,
        klimps = hardware.klimp_count,
        lag_screws = hardware.lag_screw_count,
        gross_weight = weight.gross,
        components = components.len(),
        "Crate model built"
    );

    Ok(CrateModel {
        configuration: config.clone(),
        dimensions,
        skids,
        floorboards,
        panel_sizes,
        splice_layouts,
        cleat_layouts,
        klimp_layout,
        hardware,
        weight,
        components,
        parameters,
        material_usage,
        cleat_material,
    })
}

fn push_skids(components: &mut Vec<Component>, dims: &CrateDimensions, skids: &SkidConfiguration) {
    for (i, center) in skids.positions.iter().enumerate() {
        for layer in 0..skids.layers {
            let name = if layer == 0 {
                format!("SKID_{}", i + 1)
            } else {
                format!("SKID_{}_LAYER_{}", i + 1, layer + 1)
            };
            let z = skids.height * f64::from(layer);
            components.push(Component {
                name,
                kind: ComponentKind::Skid,
                panel: None,
                min: Point3::new(center - skids.width / 2.0, 0.0, z),
                max: Point3::new(center + skids.width / 2.0, dims.external_length, z + skids.height),
                thickness: None,
                material: skids.size.display_name().to_string(),
            });
        }
    }
}

fn push_floorboards(components: &mut Vec<Component>, dims: &CrateDimensions, layout: &FloorboardLayout) {
    let z = dims.skid.stack_height();
    for board in &layout.boards {
        components.push(Component {
            name: board.id.clone(),
            kind: ComponentKind::Floorboard,
            panel: None,
            min: Point3::new(-board.length / 2.0, board.y, z),
            max: Point3::new(board.length / 2.0, board.y + board.width, z + board.thickness),
            thickness: None,
            material: board.nominal().to_string(),
        });
    }
}

/// Maps panel-local rectangles onto the crate.
///
/// `u`/`v` run along the panel as seen from outside; depth is measured
/// outward from the inner face of the plywood.
struct FaceFrame<'a> {
    face: PanelFace,
    dims: &'a CrateDimensions,
}

impl FaceFrame<'_> {
    fn place(&self, u: f64, v: f64, du: f64, dv: f64, depth: (f64, f64)) -> (Point3, Point3) {
        let d = self.dims;
        let (d0, d1) = depth;
        let half_outer = d.external_width / 2.0;
        let half_inner = d.internal_width / 2.0;
        let wall = d.wall_thickness;
        let stack = d.skid.stack_height();
        let roof = d.floor_assembly_height + d.internal_height;

        // (x0, x1), (y0, y1), (z0, z1)
        let (x, y, z) = match self.face {
            PanelFace::FrontPanel => (
                (-half_outer + u, -half_outer + u + du),
                (wall - d1, wall - d0),
                (stack + v, stack + v + dv),
            ),
            PanelFace::BackPanel => (
                (half_outer - u - du, half_outer - u),
                (d.external_length - wall + d0, d.external_length - wall + d1),
                (stack + v, stack + v + dv),
            ),
            PanelFace::LeftEndPanel => (
                (-half_inner - d1, -half_inner - d0),
                (wall + d.internal_length - u - du, wall + d.internal_length - u),
                (SIDE_PANEL_GROUND_CLEARANCE_IN + v, SIDE_PANEL_GROUND_CLEARANCE_IN + v + dv),
            ),
            PanelFace::RightEndPanel => (
                (half_inner + d0, half_inner + d1),
                (wall + u, wall + u + du),
                (SIDE_PANEL_GROUND_CLEARANCE_IN + v, SIDE_PANEL_GROUND_CLEARANCE_IN + v + dv),
            ),
            PanelFace::TopPanel => (
                (-half_outer + u, -half_outer + u + du),
                (v, v + dv),
                (roof + d0, roof + d1),
            ),
            PanelFace::BottomPanel => {
                let deck_top = stack + d.floorboard_thickness + d.bottom_deck_thickness;
                (
                    (-half_inner + u, -half_inner + u + du),
                    (wall + v, wall + v + dv),
                    (deck_top - d1, deck_top - d0),
                )
            }
        };

        (Point3::new(x.0, y.0, z.0), Point3::new(x.1, y.1, z.1))
    }
}

fn material_volumes(components: &[Component]) -> MaterialVolumes {
    components.iter().fold(MaterialVolumes::default(), |mut volumes, c| {
        let slot = match c.kind {
            ComponentKind::Plywood => &mut volumes.plywood,
            ComponentKind::Skid => &mut volumes.skids,
            ComponentKind::Floorboard => &mut volumes.floorboards,
            ComponentKind::Cleat => &mut volumes.cleats,
        };
        *slot += c.volume();
        volumes
    })
}

fn collect_parameters(
    config: &CrateConfiguration,
    dims: &CrateDimensions,
    skids: &SkidConfiguration,
    floorboards: &FloorboardLayout,
    usage: &MaterialUsage,
    cleats: &CleatMaterial,
    hardware: &HardwareSummary,
    weight: &WeightBreakdown,
) -> Vec<Parameter> {
    use ParameterUnit::{Count, Inch, Pound};

    let values = [
        ("product_length", config.product.length, Inch),
        ("product_width", config.product.width, Inch),
        ("product_height", config.product.height, Inch),
        ("product_weight", config.product.weight, Pound),
        ("crate_weight", weight.tare, Pound),
        ("gross_weight", weight.gross, Pound),
        ("clearance_side", config.clearances.side, Inch),
        ("clearance_end", config.clearances.end, Inch),
        ("clearance_top", config.clearances.top, Inch),
        ("internal_length", dims.internal_length, Inch),
        ("internal_width", dims.internal_width, Inch),
        ("internal_height", dims.internal_height, Inch),
        ("overall_length", dims.external_length, Inch),
        ("overall_width", dims.external_width, Inch),
        ("overall_height", dims.external_height, Inch),
        ("plywood_thickness", dims.plywood_thickness, Inch),
        ("cleat_thickness", dims.cleat_thickness, Inch),
        ("cleat_width", dims.cleat_width, Inch),
        ("wall_thickness", dims.wall_thickness, Inch),
        ("skid_height", skids.height, Inch),
        ("skid_width", skids.width, Inch),
        ("skid_layers", f64::from(skids.layers), Count),
        ("skid_count", skids.count as f64, Count),
        ("skid_spacing", skids.spacing, Inch),
        ("skid_length", skids.length, Inch),
        ("floorboard_thickness", dims.floorboard_thickness, Inch),
        ("floorboard_count", floorboards.boards.len() as f64, Count),
        ("floorboard_length", dims.internal_width, Inch),
        ("floor_assembly_height", dims.floor_assembly_height, Inch),
        ("total_plywood_sheets", usage.total_sheets as f64, Count),
        ("cleat_count", cleats.total_cleats as f64, Count),
        ("klimp_count", hardware.klimp_count as f64, Count),
        ("klimp_top_count", hardware.klimp_top_count as f64, Count),
        ("klimp_left_count", hardware.klimp_left_count as f64, Count),
        ("klimp_right_count", hardware.klimp_right_count as f64, Count),
        ("lag_screw_count", hardware.lag_screw_count as f64, Count),
    ];
    values
        .into_iter()
        .map(|(name, value, unit)| Parameter { name: name.to_string(), value, unit })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::LumberSize;
    use std::collections::HashSet;

    fn default_model() -> CrateModel {
        build_model(&CrateConfiguration::default(), &SpliceOptions::default()).unwrap()
    }

    fn assert_within(component: &Component, dims: &CrateDimensions) {
        let eps = 1e-9;
        assert!(component.width() > 0.0 && component.length() > 0.0 && component.height() > 0.0, "{}", component.name);
        assert!(component.min.x >= -dims.external_width / 2.0 - eps, "{}", component.name);
        assert!(component.max.x <= dims.external_width / 2.0 + eps, "{}", component.name);
        assert!(component.min.y >= -eps && component.max.y <= dims.external_length + eps, "{}", component.name);
        assert!(component.min.z >= -eps && component.max.z <= dims.external_height + eps, "{}", component.name);
    }

    #[test]
    fn test_default_model() {
        let model = default_model();
        assert_eq!(model.skids.size, LumberSize::L4x4);
        assert_eq!(model.skids.count, 3);
        assert_eq!(model.splice_layouts.len(), 5);
        assert_eq!(model.cleat_layouts.len(), 5);
        assert_eq!(model.parameter("overall_length"), Some(52.0));
        assert_eq!(model.parameter("overall_height"), Some(100.5));
        assert_eq!(model.parameter("skid_count"), Some(3.0));
        assert!(model.fits(&HandlingEnvelope::CUBE_130));
    }

    #[test]
    fn test_components_inside_crate_envelope() {
        let model = default_model();
        for component in &model.components {
            assert_within(component, &model.dimensions);
        }
    }

    #[test]
    fn test_component_names_unique() {
        let model = default_model();
        let mut seen = HashSet::new();
        for component in &model.components {
            assert!(seen.insert(component.name.as_str()), "duplicate {}", component.name);
        }
        let mut params = HashSet::new();
        for p in &model.parameters {
            assert!(params.insert(p.name.as_str()));
        }
    }

    #[test]
    fn test_panel_placement() {
        let model = default_model();
        let d = &model.dimensions;

        // front plywood sits behind the cleats, flush with the outer width
        let front = model.component("FRONT_PANEL_PLY_1").unwrap();
        assert_eq!(front.min.y, d.cleat_thickness);
        assert_eq!(front.max.y, d.wall_thickness);
        assert_eq!(front.min.x, -22.0);
        assert_eq!(front.min.z, d.skid.stack_height());

        let cleat = model.component("FRONT_PANEL_CLEAT_BOTTOM").unwrap();
        assert_eq!(cleat.min.y, 0.0);
        assert_eq!(cleat.max.y, d.cleat_thickness);
        assert_eq!(cleat.width(), 44.0);

        let back = model.component("BACK_PANEL_CLEAT_TOP").unwrap();
        assert_eq!(back.max.y, d.external_length);

        let left: Vec<&Component> = model
            .components_of(ComponentKind::Plywood)
            .filter(|c| c.panel == Some(PanelFace::LeftEndPanel))
            .collect();
        assert!(left.iter().all(|c| c.max.x == -d.internal_width / 2.0));
        let lowest = left.iter().map(|c| c.min.z).fold(f64::MAX, f64::min);
        assert_eq!(lowest, SIDE_PANEL_GROUND_CLEARANCE_IN);

        let top = model.component("TOP_PANEL_CLEAT_TOP").unwrap();
        assert!((top.max.z - d.external_height).abs() < 1e-9);
    }

    #[test]
    fn test_panels_reach_the_roof() {
        let model = default_model();
        let roof = model.dimensions.floor_assembly_height + model.dimensions.internal_height;
        for face in [PanelFace::FrontPanel, PanelFace::LeftEndPanel] {
            let top = model
                .components_of(ComponentKind::Plywood)
                .filter(|c| c.panel == Some(face))
                .map(|c| c.max.z)
                .fold(f64::MIN, f64::max);
            assert!((top - roof).abs() < 1e-9, "{face}");
        }
    }

    #[test]
    fn test_floorboards_sit_on_skids() {
        let model = default_model();
        let stack = model.dimensions.skid.stack_height();
        let boards: Vec<&Component> = model.components_of(ComponentKind::Floorboard).collect();
        assert_eq!(boards.len(), model.floorboards.boards.len());
        for board in boards {
            assert_eq!(board.min.z, stack);
            assert_eq!(board.width(), model.dimensions.internal_width);
        }
    }

    #[test]
    fn test_heavy_crate_has_second_skid_layer() {
        let mut config = CrateConfiguration::default();
        config.product = crate::configuration::ProductSpec {
            length: 100.0,
            width: 80.0,
            height: 60.0,
            weight: 65_000.0,
        };
        let model = build_model(&config, &SpliceOptions::default()).unwrap();
        let layer = model.component("SKID_1_LAYER_2").unwrap();
        assert_eq!(layer.min.z, 7.25);
        assert_eq!(layer.max.z, 14.5);
        assert!(model.skids.requires_rub_strips);
        for component in &model.components {
            assert_within(component, &model.dimensions);
        }
    }

    #[test]
    fn test_bottom_deck_and_rotation_flags() {
        let mut config = CrateConfiguration::default();
        config.requirements.include_bottom_panel = true;
        config.requirements.allow_plywood_rotation = false;
        let model = build_model(&config, &SpliceOptions::default()).unwrap();
        assert_eq!(model.splice_layouts.len(), 6);
        assert!(model.splice_layouts.iter().all(|l| !l.is_rotated));

        let deck: Vec<&Component> = model
            .components
            .iter()
            .filter(|c| c.panel == Some(PanelFace::BottomPanel))
            .collect();
        assert!(!deck.is_empty());
        assert!(deck.iter().all(|c| c.kind == ComponentKind::Plywood));
        let floor_top = model.dimensions.skid.stack_height() + model.dimensions.floorboard_thickness;
        assert!((deck[0].min.z - floor_top).abs() < 1e-9);
    }

    #[test]
    fn test_hardware_counts_become_parameters() {
        use crate::calculations::cleats::{CleatKind, CleatOrientation};
        use crate::calculations::hardware::KlimpEdge;

        let model = default_model();
        let hw = &model.hardware;
        assert!(hw.klimp_top_count >= 2);
        assert_eq!(hw.klimp_left_count, hw.klimp_right_count);
        assert_eq!(hw.klimp_count, hw.klimp_top_count + hw.klimp_left_count + hw.klimp_right_count);
        assert_eq!(hw.klimp_count, model.klimp_layout.total());

        // back and end panels are wider than one cleat bay
        let supports = model
            .cleat_layouts
            .iter()
            .filter(|l| matches!(l.panel_name.as_str(), "BACK_PANEL" | "LEFT_END_PANEL" | "RIGHT_END_PANEL"))
            .flat_map(|l| &l.cleats)
            .filter(|c| c.orientation == CleatOrientation::Vertical && c.kind != CleatKind::Perimeter)
            .count();
        assert!(supports > 0);
        assert_eq!(hw.lag_screw_count, supports);

        for (name, expected) in [
            ("klimp_count", hw.klimp_count),
            ("klimp_top_count", hw.klimp_top_count),
            ("klimp_left_count", hw.klimp_left_count),
            ("klimp_right_count", hw.klimp_right_count),
            ("lag_screw_count", hw.lag_screw_count),
        ] {
            let parameter = model.parameters.iter().find(|p| p.name == name).unwrap();
            assert_eq!(parameter.value, expected as f64, "{name}");
            assert_eq!(parameter.unit, ParameterUnit::Count);
        }

        let front = model.panel_sizes.front_back;
        for position in model.klimp_layout.positions(KlimpEdge::Top) {
            assert!(position > 0.0 && position < front.width);
        }
    }

    #[test]
    fn test_weight_estimate() {
        let model = default_model();
        let w = &model.weight;
        assert!(w.panels > 0.0 && w.skids > 0.0 && w.floorboards > 0.0 && w.cleats > 0.0);
        assert_eq!(w.product, model.configuration.product.weight);
        assert!((w.gross - (w.product + w.tare)).abs() < 1e-9);

        let s = &model.skids;
        let skid_volume = (s.count * s.layers as usize) as f64 * s.width * s.height * s.length;
        assert!((w.skids - skid_volume / 1728.0 * 28.0).abs() < 1e-9);

        assert_eq!(model.parameter("crate_weight"), Some(w.tare));
        assert_eq!(model.parameter("gross_weight"), Some(w.gross));
    }

    #[test]
    fn test_invalid_configuration_builds_nothing() {
        let mut config = CrateConfiguration::default();
        config.product.weight = 0.0;
        assert!(build_model(&config, &SpliceOptions::default()).is_err());
    }
}
