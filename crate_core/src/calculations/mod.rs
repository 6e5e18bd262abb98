//! # Crate Calculations
//!
//! Every rule that turns a configuration into geometry lives here. Each
//! submodule follows the same pattern:
//!
//! - plain input values (dimensions, sizes, options)
//! - a serializable result type
//! - a pure `calculate_*` function returning `CrateResult`
//!
//! ## Available Calculations
//!
//! - [`skids`] - Skid size from weight, skid count and spacing
//! - [`dimensions`] - Internal/external crate dimensions and panel sizes
//! - [`floorboards`] - Floorboard mix and placement
//! - [`splicing`] - Plywood sheet layout per panel
//! - [`cleats`] - Cleat placement per panel
//! - [`hardware`] - Klimp positions and lag screw counts
//! - [`weight`] - Tare and gross weight estimate

pub mod cleats;
pub mod dimensions;
pub mod floorboards;
pub mod hardware;
pub mod skids;
pub mod splicing;
pub mod weight;

pub use cleats::{calculate_cleat_material, calculate_crate_cleats, CleatMaterial, PanelCleatLayout};
pub use dimensions::{calculate_dimensions, CrateDimensions};
pub use floorboards::{calculate_floorboard_layout, FloorboardLayout};
pub use hardware::{calculate_hardware, calculate_klimp_layout, HardwareSummary, KlimpLayout};
pub use skids::{
    calculate_skid_configuration, calculate_weight_per_skid, select_skid_size, SkidConfiguration,
    SkidSelection,
};
pub use splicing::{
    calculate_crate_splicing, calculate_material_usage, calculate_optimized_splice_layout,
    validate_for_130_cube, CratePanelSizes, HandlingEnvelope, MaterialUsage, PanelFace, PanelSize,
    PanelSpliceLayout, SpliceOptions,
};
pub use weight::{estimate_crate_weight, MaterialVolumes, WeightBreakdown};
