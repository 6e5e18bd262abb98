//! # Cleat Layout
//!
//! Places reinforcing cleats on the outside of each panel from its splice
//! layout.
//!
//! - Front, back and top panels: full-width horizontal cleats at the top and
//!   bottom edges, vertical cleats between them.
//! - End panels: full-height vertical cleats at both edges, horizontal
//!   cleats between them.
//! - A vertical cleat is centred on every vertical splice that is clear of
//!   the perimeter cleats; intermediates are added so no clear gap between
//!   vertical cleats exceeds 24".
//! - Each horizontal splice gets a cleat cut to fit between the verticals.
//!
//! Cleat coordinates are panel-local: origin at the bottom-left corner,
//! `x`/`y` is the cleat's lower-left corner.

use serde::{Deserialize, Serialize};

use crate::calculations::splicing::{PanelFace, PanelSpliceLayout};
use crate::materials::{LumberSize, STANDARD_BOARD_LENGTH_IN};
use crate::units::{Feet, Inches};

/// Largest clear gap allowed between vertical cleats
pub const MAX_CLEAT_SPACING_IN: f64 = 24.0;

/// Intermediate cleats keep at least this far from the panel edges
pub const MIN_EDGE_DISTANCE_IN: f64 = 2.0;

/// Shorter cut pieces are not worth installing
const MIN_CUT_LENGTH_IN: f64 = 0.5;

const EPS: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CleatKind {
    Perimeter,
    Splice,
    Intermediate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CleatOrientation {
    Horizontal,
    Vertical,
}

/// One cleat on a panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cleat {
    pub id: String,
    pub kind: CleatKind,
    pub orientation: CleatOrientation,
    pub x: f64,
    pub y: f64,
    /// Along the cleat
    pub length: f64,
    /// Face width across the cleat
    pub width: f64,
    pub thickness: f64,
}

impl Cleat {
    /// Panel-local extents (x span, y span)
    pub fn extents(&self) -> (f64, f64) {
        match self.orientation {
            CleatOrientation::Horizontal => (self.length, self.width),
            CleatOrientation::Vertical => (self.width, self.length),
        }
    }
}

/// Cleats for one panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelCleatLayout {
    pub panel_name: String,
    pub panel_width: f64,
    pub panel_height: f64,
    pub cleats: Vec<Cleat>,
}

struct CleatStock {
    width: f64,
    thickness: f64,
}

/// Lay out cleats on one panel.
pub fn calculate_panel_cleats(
    face: PanelFace,
    layout: &PanelSpliceLayout,
    cleat_size: LumberSize,
) -> PanelCleatLayout {
    let (thickness, width) = cleat_size.actual_dimensions();
    let stock = CleatStock { width, thickness };
    let panel = layout.panel_name.as_str();
    let (pw, ph) = (layout.panel_width, layout.panel_height);
    let w = stock.width;

    let end_panel = matches!(face, PanelFace::LeftEndPanel | PanelFace::RightEndPanel);
    let mut cleats = Vec::new();

    // Perimeter
    if end_panel {
        cleats.push(stock.cut(format!("{panel}_CLEAT_LEFT"), CleatKind::Perimeter, CleatOrientation::Vertical, 0.0, 0.0, ph));
        cleats.push(stock.cut(format!("{panel}_CLEAT_RIGHT"), CleatKind::Perimeter, CleatOrientation::Vertical, pw - w, 0.0, ph));
        if pw > 2.0 * w {
            cleats.push(stock.cut(format!("{panel}_CLEAT_BOTTOM"), CleatKind::Perimeter, CleatOrientation::Horizontal, w, 0.0, pw - 2.0 * w));
            cleats.push(stock.cut(format!("{panel}_CLEAT_TOP"), CleatKind::Perimeter, CleatOrientation::Horizontal, w, ph - w, pw - 2.0 * w));
        }
    } else {
        cleats.push(stock.cut(format!("{panel}_CLEAT_BOTTOM"), CleatKind::Perimeter, CleatOrientation::Horizontal, 0.0, 0.0, pw));
        cleats.push(stock.cut(format!("{panel}_CLEAT_TOP"), CleatKind::Perimeter, CleatOrientation::Horizontal, 0.0, ph - w, pw));
        if ph > 2.0 * w {
            cleats.push(stock.cut(format!("{panel}_CLEAT_LEFT"), CleatKind::Perimeter, CleatOrientation::Vertical, 0.0, w, ph - 2.0 * w));
            cleats.push(stock.cut(format!("{panel}_CLEAT_RIGHT"), CleatKind::Perimeter, CleatOrientation::Vertical, pw - w, w, ph - 2.0 * w));
        }
    }

    // Interior verticals run between the top and bottom horizontals
    let interior_length = ph - 2.0 * w;
    let mut vertical_x = vec![0.0, pw - w];
    if interior_length > EPS {
        let interior = interior_vertical_positions(layout, w);
        for (i, (x, kind)) in interior.iter().enumerate() {
            cleats.push(stock.cut(
                format!("{panel}_CLEAT_V_{}", i + 1),
                *kind,
                CleatOrientation::Vertical,
                *x,
                w,
                interior_length,
            ));
            vertical_x.push(*x);
        }
    }
    vertical_x.sort_by(f64::total_cmp);

    // Horizontal splice cleats, cut between verticals
    for (row, splice) in layout.horizontal_splices().enumerate() {
        let y = splice.position - w / 2.0;
        if y < w - EPS || y + w > ph - w + EPS {
            continue;
        }
        let mut piece = 0;
        for pair in vertical_x.windows(2) {
            let start = pair[0] + w;
            let length = pair[1] - start;
            if length > MIN_CUT_LENGTH_IN {
                piece += 1;
                cleats.push(stock.cut(
                    format!("{panel}_CLEAT_H_{}_{}", row + 1, piece),
                    CleatKind::Splice,
                    CleatOrientation::Horizontal,
                    start,
                    y,
                    length,
                ));
            }
        }
    }

    PanelCleatLayout {
        panel_name: layout.panel_name.clone(),
        panel_width: pw,
        panel_height: ph,
        cleats,
    }
}

/// Left edges of interior vertical cleats, sorted, with their kind
fn interior_vertical_positions(layout: &PanelSpliceLayout, w: f64) -> Vec<(f64, CleatKind)> {
    let pw = layout.panel_width;

    let mut positions: Vec<(f64, CleatKind)> = layout
        .vertical_splices()
        .map(|s| s.position - w / 2.0)
        .filter(|x| *x >= w - EPS && x + w <= pw - w + EPS)
        .map(|x| (x, CleatKind::Splice))
        .collect();

    let mut bounds: Vec<f64> = vec![0.0, pw - w];
    bounds.extend(positions.iter().map(|(x, _)| *x));
    bounds.sort_by(f64::total_cmp);
    bounds.dedup_by(|a, b| (*a - *b).abs() < 0.01);

    for pair in bounds.windows(2) {
        let gap_start = pair[0] + w;
        let gap = pair[1] - gap_start;
        if gap > MAX_CLEAT_SPACING_IN {
            let count = (gap / MAX_CLEAT_SPACING_IN).ceil() as usize - 1;
            let spacing = gap / (count + 1) as f64;
            for j in 1..=count {
                let x = gap_start + j as f64 * spacing - w / 2.0;
                if x > MIN_EDGE_DISTANCE_IN && x + w < pw - MIN_EDGE_DISTANCE_IN {
                    positions.push((x, CleatKind::Intermediate));
                }
            }
        }
    }

    positions.sort_by(|a, b| a.0.total_cmp(&b.0));
    positions
}

impl CleatStock {
    fn cut(
        &self,
        id: String,
        kind: CleatKind,
        orientation: CleatOrientation,
        x: f64,
        y: f64,
        length: f64,
    ) -> Cleat {
        Cleat {
            id,
            kind,
            orientation,
            x,
            y,
            length,
            width: self.width,
            thickness: self.thickness,
        }
    }
}

/// Cleat layouts for every spliced face except the floor deck.
pub fn calculate_crate_cleats(layouts: &[PanelSpliceLayout], cleat_size: LumberSize) -> Vec<PanelCleatLayout> {
    layouts
        .iter()
        .filter_map(|layout| {
            let face = PanelFace::from_name(&layout.panel_name)?;
            (face != PanelFace::BottomPanel).then(|| calculate_panel_cleats(face, layout, cleat_size))
        })
        .collect()
}

/// Cleat lumber totals
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CleatMaterial {
    pub total_cleats: usize,
    pub total_length_in: f64,
    pub linear_feet: f64,
    /// 8 ft boards to buy
    pub boards_8ft: usize,
}

pub fn calculate_cleat_material(layouts: &[PanelCleatLayout]) -> CleatMaterial {
    let total_cleats = layouts.iter().map(|l| l.cleats.len()).sum();
    let total_length = layouts
        .iter()
        .flat_map(|l| l.cleats.iter())
        .fold(Inches(0.0), |sum, c| sum + Inches(c.length));
    let linear_feet = Feet::from(total_length).0;
    let board_feet = Feet::from(Inches(STANDARD_BOARD_LENGTH_IN)).0;

    CleatMaterial {
        total_cleats,
        total_length_in: total_length.0,
        linear_feet,
        boards_8ft: (linear_feet / board_feet).ceil() as usize,
    }
}
