//! # Bill of Materials
//!
//! Purchasing summary for a built [`CrateModel`]: plywood sheets, skid and
//! floorboard lumber, cleat stock and fastening hardware. Lumber is bought
//! in 8 ft lengths; a part longer than one board takes several. Klimps come
//! in packages of 25.
//!
//! ## Example
//!
//! ```rust
//! use crate_core::bom::generate_bill_of_materials;
//! use crate_core::calculations::splicing::SpliceOptions;
//! use crate_core::configuration::CrateConfiguration;
//! use crate_core::model::build_model;
//!
//! let model = build_model(&CrateConfiguration::default(), &SpliceOptions::default()).unwrap();
//! let bom = generate_bill_of_materials(&model);
//! assert!(bom.lines.iter().any(|l| l.item.contains("4x4")));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::calculations::cleats::CleatMaterial;
use crate::calculations::hardware::KLIMPS_PER_PACKAGE;
use crate::calculations::splicing::MaterialUsage;
use crate::calculations::weight::WeightBreakdown;
use crate::materials::{STANDARD_BOARD_LENGTH_IN, STANDARD_SHEET};
use crate::model::CrateModel;
use crate::units::{Feet, Inches};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BomCategory {
    Plywood,
    Skid,
    Floorboard,
    Cleat,
    Hardware,
}

impl BomCategory {
    pub fn display_name(&self) -> &'static str {
        match self {
            BomCategory::Plywood => "Plywood",
            BomCategory::Skid => "Skids",
            BomCategory::Floorboard => "Floorboards",
            BomCategory::Cleat => "Cleats",
            BomCategory::Hardware => "Hardware",
        }
    }
}

/// One purchasable line item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BomLine {
    pub category: BomCategory,
    pub item: String,
    pub description: String,
    /// Parts cut for the crate
    pub pieces: usize,
    /// Sheets, 8 ft boards or hardware packs to buy
    pub purchase_quantity: usize,
    pub purchase_unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillOfMaterials {
    pub lines: Vec<BomLine>,
    pub material_usage: MaterialUsage,
    pub cleat_material: CleatMaterial,
    pub weight: WeightBreakdown,
}

impl BillOfMaterials {
    pub fn lines_for(&self, category: BomCategory) -> impl Iterator<Item = &BomLine> {
        self.lines.iter().filter(move |l| l.category == category)
    }

    /// Total 8 ft boards across all lumber lines
    pub fn total_boards(&self) -> usize {
        self.lines
            .iter()
            .filter(|l| matches!(l.category, BomCategory::Skid | BomCategory::Floorboard | BomCategory::Cleat))
            .map(|l| l.purchase_quantity)
            .sum()
    }
}

impl fmt::Display for BillOfMaterials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<12} {:<22} {:>6} {:>6}  {}", "Category", "Item", "Pieces", "Buy", "Notes")?;
        for line in &self.lines {
            writeln!(
                f,
                "{:<12} {:<22} {:>6} {:>6}  {} ({})",
                line.category.display_name(),
                line.item,
                line.pieces,
                line.purchase_quantity,
                line.description,
                line.purchase_unit
            )?;
        }
        writeln!(
            f,
            "Plywood efficiency {:.1}%, {:.1} sq ft covered",
            self.material_usage.efficiency * 100.0,
            self.material_usage.total_area_sq_ft
        )?;
        write!(
            f,
            "Estimated weight: crate {:.0} lb, gross {:.0} lb",
            self.weight.tare, self.weight.gross
        )
    }
}

const BOARD_UNIT: &str = "8 ft boards";

/// Boards needed to cut `pieces` parts of `length_in` each
fn boards_for(length_in: f64, pieces: usize) -> usize {
    let per_piece = (length_in / STANDARD_BOARD_LENGTH_IN - 1e-9).ceil().max(1.0) as usize;
    per_piece * pieces
}

/// Build the bill of materials for a model.
pub fn generate_bill_of_materials(model: &CrateModel) -> BillOfMaterials {
    let config = &model.configuration;
    let materials = &config.materials;
    let mut lines = Vec::new();

    let sheet_size = format!(
        "{}x{} ft",
        Feet::from(Inches(STANDARD_SHEET.width)).0,
        Feet::from(Inches(STANDARD_SHEET.height)).0
    );
    lines.push(BomLine {
        category: BomCategory::Plywood,
        item: format!(
            "{} {} plywood",
            materials.plywood_thickness.display_name(),
            materials.plywood_grade.display_name()
        ),
        description: format!("{} sheets", sheet_size),
        pieces: model.splice_layouts.iter().map(|l| l.sheets.len()).sum(),
        purchase_quantity: model.material_usage.total_sheets,
        purchase_unit: "sheets".to_string(),
    });

    let skids = &model.skids;
    let skid_pieces = skids.count * skids.layers as usize;
    lines.push(BomLine {
        category: BomCategory::Skid,
        item: format!("{} {}", skids.size.display_name(), materials.lumber_grade.display_name()),
        description: format!("{:.2} in long, {} layer(s)", skids.length, skids.layers),
        pieces: skid_pieces,
        purchase_quantity: boards_for(skids.length, skid_pieces),
        purchase_unit: BOARD_UNIT.to_string(),
    });

    let floor = &model.floorboards;
    let board_length = floor.boards.first().map(|b| b.length).unwrap_or(0.0);
    for (size, count) in floor.counts_by_size() {
        lines.push(BomLine {
            category: BomCategory::Floorboard,
            item: format!("{} {}", size.display_name(), materials.lumber_grade.display_name()),
            description: format!("{:.2} in long", board_length),
            pieces: count,
            purchase_quantity: boards_for(board_length, count),
            purchase_unit: BOARD_UNIT.to_string(),
        });
    }
    if let Some(width) = floor.custom_width() {
        lines.push(BomLine {
            category: BomCategory::Floorboard,
            item: "CUSTOM".to_string(),
            description: format!("ripped to {:.2} in wide, {:.2} in long", width, board_length),
            pieces: 1,
            purchase_quantity: boards_for(board_length, 1),
            purchase_unit: BOARD_UNIT.to_string(),
        });
    }

    lines.push(BomLine {
        category: BomCategory::Cleat,
        item: format!("{} {}", materials.cleat_size.display_name(), materials.lumber_grade.display_name()),
        description: format!("{:.1} linear ft", model.cleat_material.linear_feet),
        pieces: model.cleat_material.total_cleats,
        purchase_quantity: model.cleat_material.boards_8ft,
        purchase_unit: BOARD_UNIT.to_string(),
    });

    let hardware = &model.hardware;
    if hardware.klimp_count > 0 {
        lines.push(BomLine {
            category: BomCategory::Hardware,
            item: "Klimp spring clamp".to_string(),
            description: format!(
                "front panel: {} top, {} left, {} right",
                hardware.klimp_top_count, hardware.klimp_left_count, hardware.klimp_right_count
            ),
            pieces: hardware.klimp_count,
            purchase_quantity: hardware.klimp_packages,
            purchase_unit: format!("packages of {KLIMPS_PER_PACKAGE}"),
        });
    }
    if hardware.lag_screw_count > 0 {
        lines.push(BomLine {
            category: BomCategory::Hardware,
            item: "Lag screw 3/8 x 2.50".to_string(),
            description: "end and back panel support cleats".to_string(),
            pieces: hardware.lag_screw_count,
            purchase_quantity: hardware.lag_screw_count,
            purchase_unit: "each".to_string(),
        });
    }

    BillOfMaterials {
        lines,
        material_usage: model.material_usage,
        cleat_material: model.cleat_material,
        weight: model.weight,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::splicing::SpliceOptions;
    use crate::configuration::{CrateConfiguration, ProductSpec};
    use crate::model::build_model;

    #[test]
    fn test_default_bom() {
        let model = build_model(&CrateConfiguration::default(), &SpliceOptions::default()).unwrap();
        let bom = generate_bill_of_materials(&model);

        let plywood: Vec<&BomLine> = bom.lines_for(BomCategory::Plywood).collect();
        assert_eq!(plywood.len(), 1);
        assert_eq!(plywood[0].purchase_quantity, model.material_usage.total_sheets);

        // three 52" skids, one board each
        let skid = bom.lines_for(BomCategory::Skid).next().unwrap();
        assert_eq!(skid.pieces, 3);
        assert_eq!(skid.purchase_quantity, 3);

        let floor_pieces: usize = bom.lines_for(BomCategory::Floorboard).map(|l| l.pieces).sum();
        assert_eq!(floor_pieces, model.floorboards.boards.len());
        assert!(bom.lines_for(BomCategory::Floorboard).any(|l| l.item == "CUSTOM"));

        let cleat = bom.lines_for(BomCategory::Cleat).next().unwrap();
        assert_eq!(cleat.purchase_quantity, model.cleat_material.boards_8ft);
        assert_eq!(bom.material_usage, model.material_usage);

        let hardware: Vec<&BomLine> = bom.lines_for(BomCategory::Hardware).collect();
        assert_eq!(hardware.len(), 2);
        assert_eq!(hardware[0].pieces, model.hardware.klimp_count);
        assert_eq!(hardware[0].purchase_quantity, 1);
        assert_eq!(hardware[1].pieces, model.hardware.lag_screw_count);

        let lumber: usize = bom
            .lines
            .iter()
            .filter(|l| !matches!(l.category, BomCategory::Plywood | BomCategory::Hardware))
            .map(|l| l.purchase_quantity)
            .sum();
        assert_eq!(bom.total_boards(), lumber);
    }

    #[test]
    fn test_long_skids_take_several_boards() {
        let mut config = CrateConfiguration::default();
        config.product = ProductSpec {
            length: 120.0,
            width: 40.0,
            height: 40.0,
            weight: 2_000.0,
        };
        let model = build_model(&config, &SpliceOptions::default()).unwrap();
        let bom = generate_bill_of_materials(&model);
        let skid = bom.lines_for(BomCategory::Skid).next().unwrap();
        assert!(model.skids.length > STANDARD_BOARD_LENGTH_IN);
        assert_eq!(skid.purchase_quantity, 2 * skid.pieces);
    }

    #[test]
    fn test_boards_for_exact_length() {
        assert_eq!(boards_for(96.0, 3), 3);
        assert_eq!(boards_for(96.5, 1), 2);
        assert_eq!(boards_for(10.0, 4), 4);
    }

    #[test]
    fn test_display_lists_every_line() {
        let model = build_model(&CrateConfiguration::default(), &SpliceOptions::default()).unwrap();
        let bom = generate_bill_of_materials(&model);
        let text = bom.to_string();
        assert_eq!(text.lines().count(), bom.lines.len() + 3);
        assert!(text.contains("efficiency"));
        assert!(text.contains("Estimated weight: crate"));
    }
}
