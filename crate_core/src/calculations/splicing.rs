//! # Plywood Splicing
//!
//! Decomposes a flat panel into standard 48x96 plywood sheets.
//!
//! ## Approach
//!
//! Each sheet orientation produces one candidate layout:
//!
//! - Columns run left to right: full sheets, then a trimmed column on the right.
//! - Rows run bottom up: the trimmed row sits at the bottom, full rows above it.
//! - A trimmed strip narrower than 2.5" is widened to 2.5" and its neighbour
//!   shrinks by the same amount, keeping the splice count.
//! - With stacked cleats the bottom row is raised to at least 7.25" so the
//!   first horizontal splice clears the bottom cleat (splice above 7").
//!
//! The rotated candidate wins only when it is feasible and has strictly fewer
//! splice lines than the original (or the original is infeasible). A panel
//! that fits one sheet has no splices, so a rotated-only single-sheet fit is
//! picked automatically.
//!
//! Source sheets are assigned first-fit: a piece is ripped as a full-length
//! strip of its width and pieces of the same width stack in one strip.
//!
//! ## Example
//!
//! ```rust
//! use crate_core::calculations::splicing::{
//!     calculate_optimized_splice_layout, PanelSize, SpliceOptions,
//! };
//!
//! let layout = calculate_optimized_splice_layout(
//!     "FRONT_PANEL",
//!     PanelSize::new(80.0, 40.0),
//!     &SpliceOptions::default(),
//! )
//! .unwrap();
//!
//! assert!(layout.is_rotated);
//! assert_eq!(layout.sheet_count, 1);
//! assert!(layout.splices.is_empty());
//! ```


use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{CrateError, CrateResult};
use crate::export::{format_real, push_line};
use crate::materials::{PlywoodSheet, STANDARD_SHEET};
use crate::units::{SquareFeet, SquareInches};

/// Narrowest trimmed piece that may be cut
pub const MIN_TRIM_WIDTH_IN: f64 = 2.5;

/// Bottom row height needed when cleats are stacked at the bottom edge
pub const CLEAT_CLEARANCE_ROW_IN: f64 = 7.25;

/// The first horizontal splice must lie strictly above this height
pub const CLEAT_CLEARANCE_SPLICE_IN: f64 = 7.0;

const EPS: f64 = 1e-9;

// ============================================================================
// Panel faces and sizes
// ============================================================================

/// The six crate faces, in export order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PanelFace {
    FrontPanel,
    BackPanel,
    LeftEndPanel,
    RightEndPanel,
    TopPanel,
    BottomPanel,
}

impl PanelFace {
    pub const ALL: [PanelFace; 6] = [
        PanelFace::FrontPanel,
        PanelFace::BackPanel,
        PanelFace::LeftEndPanel,
        PanelFace::RightEndPanel,
        PanelFace::TopPanel,
        PanelFace::BottomPanel,
    ];

    /// Identifier used in layouts and exported parameter names
    pub fn name(&self) -> &'static str {
        match self {
            PanelFace::FrontPanel => "FRONT_PANEL",
            PanelFace::BackPanel => "BACK_PANEL",
            PanelFace::LeftEndPanel => "LEFT_END_PANEL",
            PanelFace::RightEndPanel => "RIGHT_END_PANEL",
            PanelFace::TopPanel => "TOP_PANEL",
            PanelFace::BottomPanel => "BOTTOM_PANEL",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().find(|face| face.name() == name).copied()
    }

    /// Walls stand upright and carry a bottom cleat
    pub fn is_vertical(&self) -> bool {
        !matches!(self, PanelFace::TopPanel | PanelFace::BottomPanel)
    }
}

impl std::fmt::Display for PanelFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Flat panel outline (inches)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanelSize {
    pub width: f64,
    pub height: f64,
}

impl PanelSize {
    pub fn new(width: f64, height: f64) -> Self {
        PanelSize { width, height }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// Panel outlines for a whole crate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CratePanelSizes {
    /// Front and back (same size)
    pub front_back: PanelSize,
    /// Left and right ends (same size)
    pub sides: PanelSize,
    /// Top; `height` runs along the crate length
    pub top: PanelSize,
    /// Optional floor deck
    pub bottom: Option<PanelSize>,
}

impl CratePanelSizes {
    /// (face, size) pairs in export order
    pub fn faces(&self) -> Vec<(PanelFace, PanelSize)> {
        let mut faces = vec![
            (PanelFace::FrontPanel, self.front_back),
            (PanelFace::BackPanel, self.front_back),
            (PanelFace::LeftEndPanel, self.sides),
            (PanelFace::RightEndPanel, self.sides),
            (PanelFace::TopPanel, self.top),
        ];
        if let Some(bottom) = self.bottom {
            faces.push((PanelFace::BottomPanel, bottom));
        }
        faces
    }
}

// ============================================================================
// Options and results
// ============================================================================

/// Splicer settings. Deserializable so a settings file can override them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpliceOptions {
    pub sheet: PlywoodSheet,
    pub allow_rotation: bool,
    /// Keep the first horizontal splice clear of the bottom cleat
    pub stacked_cleats: bool,
    pub min_trim_width: f64,
    pub cleat_clearance_row: f64,
    pub cleat_clearance_splice: f64,
    pub plywood_thickness: f64,
}

impl Default for SpliceOptions {
    fn default() -> Self {
        SpliceOptions {
            sheet: STANDARD_SHEET,
            allow_rotation: true,
            stacked_cleats: true,
            min_trim_width: MIN_TRIM_WIDTH_IN,
            cleat_clearance_row: CLEAT_CLEARANCE_ROW_IN,
            cleat_clearance_splice: CLEAT_CLEARANCE_SPLICE_IN,
            plywood_thickness: 0.25,
        }
    }
}

impl SpliceOptions {
    pub fn with_rotation(mut self, allow_rotation: bool) -> Self {
        self.allow_rotation = allow_rotation;
        self
    }

    pub fn with_stacked_cleats(mut self, stacked_cleats: bool) -> Self {
        self.stacked_cleats = stacked_cleats;
        self
    }

    pub fn with_plywood_thickness(mut self, thickness: f64) -> Self {
        self.plywood_thickness = thickness;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpliceOrientation {
    Vertical,
    Horizontal,
}

impl SpliceOrientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpliceOrientation::Vertical => "vertical",
            SpliceOrientation::Horizontal => "horizontal",
        }
    }
}

/// A seam between sheets. `position` is x for vertical seams, y for horizontal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Splice {
    pub orientation: SpliceOrientation,
    pub position: f64,
}

/// One plywood piece on a panel, origin at the panel's bottom-left corner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sheet {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Purchased sheet this piece is cut from
    pub source_sheet_index: usize,
    pub trimmed: bool,
}

/// Sheet layout for one panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelSpliceLayout {
    pub panel_name: String,
    pub panel_width: f64,
    pub panel_height: f64,
    /// Stock sheet width as laid (96 when rotated)
    pub sheet_width: f64,
    /// Stock sheet height as laid (48 when rotated)
    pub sheet_height: f64,
    pub is_rotated: bool,
    pub splices: Vec<Splice>,
    pub sheets: Vec<Sheet>,
    /// Purchased sheets
    pub sheet_count: usize,
    pub plywood_thickness: f64,
}

impl PanelSpliceLayout {
    pub fn horizontal_splices(&self) -> impl Iterator<Item = &Splice> {
        self.splices
            .iter()
            .filter(|s| s.orientation == SpliceOrientation::Horizontal)
    }

    pub fn vertical_splices(&self) -> impl Iterator<Item = &Splice> {
        self.splices
            .iter()
            .filter(|s| s.orientation == SpliceOrientation::Vertical)
    }

    pub fn panel_area(&self) -> f64 {
        self.panel_width * self.panel_height
    }

    pub fn purchased_area(&self) -> f64 {
        self.sheet_count as f64 * self.sheet_width * self.sheet_height
    }
}

// ============================================================================
// Optimizer
// ============================================================================

/// Lay out one panel. Pure and idempotent.
pub fn calculate_optimized_splice_layout(
    panel_name: &str,
    panel: PanelSize,
    options: &SpliceOptions,
) -> CrateResult<PanelSpliceLayout> {
    for (argument, value) in [("panel_width", panel.width), ("panel_height", panel.height)] {
        if !value.is_finite() || value <= 0.0 {
            return Err(CrateError::invalid_argument(
                argument,
                value.to_string(),
                format!("{panel_name} dimensions must be positive"),
            ));
        }
    }

    let original = build_candidate(panel_name, panel, false, options);
    let rotated = options
        .allow_rotation
        .then(|| build_candidate(panel_name, panel, true, options));

    let chosen = match (original, rotated) {
        (Ok(original), Some(Ok(rotated))) => {
            if prefer_rotated(&original, &rotated) {
                rotated
            } else {
                original
            }
        }
        (Ok(original), _) => original,
        (Err(_), Some(Ok(rotated))) => rotated,
        (Err(reason), _) => return Err(CrateError::layout_infeasible(panel_name, reason)),
    };

    debug!(
        panel = panel_name,
        rotated = chosen.is_rotated,
        splices = chosen.splices.len(),
        sheets = chosen.sheet_count,
        "Splice layout selected"
    );

    Ok(chosen)
}

/// Fewer purchased sheets wins. On equal sheets the rotated layout needs
/// strictly fewer splices.
fn prefer_rotated(original: &PanelSpliceLayout, rotated: &PanelSpliceLayout) -> bool {
    match rotated.sheet_count.cmp(&original.sheet_count) {
        Ordering::Less => true,
        Ordering::Greater => false,
        Ordering::Equal => rotated.splices.len() < original.splices.len(),
    }
}

/// Lay out every crate face in the fixed order front, back, left, right,
/// top, then bottom when a bottom size is given. Only upright faces get the
/// stacked-cleat clearance.
pub fn calculate_crate_splicing(
    sizes: &CratePanelSizes,
    options: &SpliceOptions,
) -> CrateResult<Vec<PanelSpliceLayout>> {
    sizes
        .faces()
        .into_iter()
        .map(|(face, size)| {
            let face_options = options.with_stacked_cleats(options.stacked_cleats && face.is_vertical());
            calculate_optimized_splice_layout(face.name(), size, &face_options)
        })
        .collect()
}

fn build_candidate(
    panel_name: &str,
    panel: PanelSize,
    rotated: bool,
    options: &SpliceOptions,
) -> Result<PanelSpliceLayout, String> {
    let (sheet_width, sheet_height) = options.sheet.oriented(rotated);
    let columns = strip_sizes(panel.width, sheet_width, options.min_trim_width)?;
    let rows = row_heights(panel.height, sheet_height, options)?;

    let column_x = offsets(&columns);
    let row_y = offsets(&rows);

    let splices: Vec<Splice> = column_x[1..]
        .iter()
        .map(|&x| Splice { orientation: SpliceOrientation::Vertical, position: x })
        .chain(row_y[1..].iter().map(|&y| Splice {
            orientation: SpliceOrientation::Horizontal,
            position: y,
        }))
        .collect();

    let mut packer = SourceSheetPacker::new(sheet_width, sheet_height);
    let mut sheets = Vec::with_capacity(columns.len() * rows.len());
    for row in (0..rows.len()).rev() {
        for (column, &width) in columns.iter().enumerate() {
            let height = rows[row];
            sheets.push(Sheet {
                id: format!("{}_SHEET_{}", panel_name, sheets.len() + 1),
                x: column_x[column],
                y: row_y[row],
                width,
                height,
                source_sheet_index: packer.place(width, height),
                trimmed: width < sheet_width - EPS || height < sheet_height - EPS,
            });
        }
    }

    Ok(PanelSpliceLayout {
        panel_name: panel_name.to_string(),
        panel_width: panel.width,
        panel_height: panel.height,
        sheet_width,
        sheet_height,
        is_rotated: rotated,
        splices,
        sheets,
        sheet_count: packer.sheet_count(),
        plywood_thickness: options.plywood_thickness,
    })
}

/// Full stock widths followed by one trimmed remainder.
fn strip_sizes(total: f64, stock: f64, min_trim: f64) -> Result<Vec<f64>, String> {
    if total < min_trim - EPS {
        return Err(format!(
            "{total}\" is narrower than the {min_trim}\" minimum trim"
        ));
    }

    let full = ((total + EPS) / stock).floor() as usize;
    let remainder = total - full as f64 * stock;
    let mut sizes = vec![stock; full];

    if remainder > EPS {
        if remainder + EPS >= min_trim || full == 0 {
            sizes.push(remainder);
        } else {
            // sliver: borrow from the last full strip
            let last = sizes.len() - 1;
            sizes[last] = stock + remainder - min_trim;
            sizes.push(min_trim);
        }
    }

    // close the sum exactly on the panel edge
    if let Some((last, rest)) = sizes.split_last_mut() {
        *last = total - rest.iter().sum::<f64>();
    }
    Ok(sizes)
}

/// Row heights, bottom row first.
fn row_heights(total: f64, stock: f64, options: &SpliceOptions) -> Result<Vec<f64>, String> {
    let mut rows = strip_sizes(total, stock, options.min_trim_width)?;
    rows.reverse();

    if options.stacked_cleats && rows.len() > 1 {
        if rows[0] < options.cleat_clearance_row - EPS {
            let shortfall = options.cleat_clearance_row - rows[0];
            rows[0] = options.cleat_clearance_row;
            rows[1] -= shortfall;
            if rows[1] < options.min_trim_width - EPS {
                return Err(format!(
                    "raising the bottom row to {}\" leaves a {}\" row",
                    options.cleat_clearance_row, rows[1]
                ));
            }
        }
        if rows[0] <= options.cleat_clearance_splice {
            return Err(format!(
                "first horizontal splice at {}\" is not above {}\"",
                rows[0], options.cleat_clearance_splice
            ));
        }
    }

    Ok(rows)
}

/// Leading edge of each strip, starting at 0
fn offsets(sizes: &[f64]) -> Vec<f64> {
    sizes
        .iter()
        .scan(0.0, |edge, size| {
            let start = *edge;
            *edge += size;
            Some(start)
        })
        .collect()
}

/// First-fit assignment of pieces to purchased sheets
struct SourceSheetPacker {
    sheet_width: f64,
    sheet_height: f64,
    sheets: Vec<SourceSheet>,
}

struct SourceSheet {
    used_width: f64,
    /// (strip width, used height)
    strips: Vec<(f64, f64)>,
}

impl SourceSheetPacker {
    fn new(sheet_width: f64, sheet_height: f64) -> Self {
        SourceSheetPacker { sheet_width, sheet_height, sheets: Vec::new() }
    }

    fn place(&mut self, width: f64, height: f64) -> usize {
        let sheet_height = self.sheet_height;

        for (index, sheet) in self.sheets.iter_mut().enumerate() {
            let strip = sheet.strips.iter_mut().find(|(strip_width, used)| {
                (strip_width - width).abs() < EPS && used + height <= sheet_height + EPS
            });
            if let Some((_, used)) = strip {
                *used += height;
                return index;
            }
        }

        for (index, sheet) in self.sheets.iter_mut().enumerate() {
            if sheet.used_width + width <= self.sheet_width + EPS {
                sheet.used_width += width;
                sheet.strips.push((width, height));
                return index;
            }
        }

        self.sheets.push(SourceSheet {
            used_width: width,
            strips: vec![(width, height)],
        });
        self.sheets.len() - 1
    }

    fn sheet_count(&self) -> usize {
        self.sheets.len()
    }
}

// ============================================================================
// Aggregates
// ============================================================================

/// Plywood usage across layouts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialUsage {
    pub total_sheets: usize,
    /// Panel area covered (sq in)
    pub total_area: f64,
    /// Sheet area purchased (sq in)
    pub purchased_area: f64,
    pub waste_area: f64,
    /// total_area / purchased_area, in (0, 1]
    pub efficiency: f64,
    pub total_area_sq_ft: f64,
}

pub fn calculate_material_usage(layouts: &[PanelSpliceLayout]) -> MaterialUsage {
    let total_sheets = layouts.iter().map(|l| l.sheet_count).sum();
    let total_area: f64 = layouts.iter().map(PanelSpliceLayout::panel_area).sum();
    let purchased_area: f64 = layouts.iter().map(PanelSpliceLayout::purchased_area).sum();
    let efficiency = if purchased_area > 0.0 {
        total_area / purchased_area
    } else {
        0.0
    };

    MaterialUsage {
        total_sheets,
        total_area,
        purchased_area,
        waste_area: purchased_area - total_area,
        efficiency,
        total_area_sq_ft: SquareFeet::from(SquareInches(total_area)).0,
    }
}

/// Largest crate the shop can handle (inches)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HandlingEnvelope {
    pub max_length: f64,
    pub max_width: f64,
    pub max_height: f64,
    pub max_volume: f64,
}

impl HandlingEnvelope {
    /// 130" cube
    pub const CUBE_130: HandlingEnvelope = HandlingEnvelope {
        max_length: 130.0,
        max_width: 130.0,
        max_height: 130.0,
        max_volume: 130.0 * 130.0 * 130.0,
    };

    pub fn accepts(&self, length: f64, width: f64, height: f64) -> bool {
        let dims = [length, width, height];
        if dims.iter().any(|d| !d.is_finite() || *d <= 0.0) {
            return false;
        }
        length <= self.max_length
            && width <= self.max_width
            && height <= self.max_height
            && length * width * height <= self.max_volume
    }
}

impl Default for HandlingEnvelope {
    fn default() -> Self {
        HandlingEnvelope::CUBE_130
    }
}

/// Capability gate against the default 130" handling envelope.
pub fn validate_for_130_cube(length: f64, width: f64, height: f64) -> bool {
    HandlingEnvelope::CUBE_130.accepts(length, width, height)
}

/// Render a layout as `NAME=VALUE` lines, every name prefixed by the panel.
pub fn generate_splice_expressions(layout: &PanelSpliceLayout) -> String {
    let panel = &layout.panel_name;
    let mut out = String::new();

    push_line(&mut out, format!("# Splice Layout for {panel}"));
    push_line(
        &mut out,
        format!(
            "# Panel {} x {} in, sheet {} x {} in, rotated: {}",
            format_real(layout.panel_width),
            format_real(layout.panel_height),
            format_real(layout.sheet_width),
            format_real(layout.sheet_height),
            layout.is_rotated
        ),
    );
    push_line(&mut out, format!("{panel}_SHEET_COUNT={}", layout.sheet_count));
    push_line(&mut out, format!("{panel}_PIECE_COUNT={}", layout.sheets.len()));
    push_line(&mut out, format!("{panel}_SPLICE_COUNT={}", layout.splices.len()));
    push_line(&mut out, format!("{panel}_ROTATED={}", u8::from(layout.is_rotated)));

    for (i, splice) in layout.splices.iter().enumerate() {
        let n = i + 1;
        push_line(&mut out, format!("{panel}_SPLICE_{n}_POSITION={}", format_real(splice.position)));
        push_line(&mut out, format!("{panel}_SPLICE_{n}_ORIENTATION=\"{}\"", splice.orientation.as_str()));
    }

    for sheet in &layout.sheets {
        let id = &sheet.id;
        push_line(&mut out, format!("{id}_X={}", format_real(sheet.x)));
        push_line(&mut out, format!("{id}_Y={}", format_real(sheet.y)));
        push_line(&mut out, format!("{id}_WIDTH={}", format_real(sheet.width)));
        push_line(&mut out, format!("{id}_HEIGHT={}", format_real(sheet.height)));
        push_line(&mut out, format!("{id}_THICKNESS={}", format_real(layout.plywood_thickness)));
        push_line(&mut out, format!("{id}_SOURCE_SHEET={}", sheet.source_sheet_index + 1));
    }

    out
}

/// Convenience wrapper: one panel with default options and rotation allowed.
pub fn calculate_plywood_pieces(panel: PanelSize, panel_name: &str) -> CrateResult<PanelSpliceLayout> {
    calculate_optimized_splice_layout(panel_name, panel, &SpliceOptions::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(width: f64, height: f64, options: &SpliceOptions) -> PanelSpliceLayout {
        calculate_optimized_splice_layout("TEST_PANEL", PanelSize::new(width, height), options).unwrap()
    }

    fn assert_tiles_exactly(layout: &PanelSpliceLayout) {
        let area: f64 = layout.sheets.iter().map(|s| s.width * s.height).sum();
        assert!((area - layout.panel_area()).abs() < 1e-6, "area mismatch");
        for sheet in &layout.sheets {
            assert!(sheet.x >= -1e-9 && sheet.y >= -1e-9);
            assert!(sheet.x + sheet.width <= layout.panel_width + 1e-9);
            assert!(sheet.y + sheet.height <= layout.panel_height + 1e-9);
            assert!(sheet.width <= layout.sheet_width + 1e-9);
            assert!(sheet.height <= layout.sheet_height + 1e-9);
        }
        for (i, a) in layout.sheets.iter().enumerate() {
            for b in &layout.sheets[i + 1..] {
                let overlap_x = a.x.max(b.x) < (a.x + a.width).min(b.x + b.width) - 1e-9;
                let overlap_y = a.y.max(b.y) < (a.y + a.height).min(b.y + b.height) - 1e-9;
                assert!(!(overlap_x && overlap_y), "{} overlaps {}", a.id, b.id);
            }
        }
    }

    #[test]
    fn test_single_sheet_prefers_rotation() {
        let l = layout(80.0, 40.0, &SpliceOptions::default());
        assert!(l.is_rotated);
        assert_eq!(l.sheet_count, 1);
        assert!(l.splices.is_empty());
        assert_eq!(l.sheet_width, 96.0);
        assert_eq!(l.sheet_height, 48.0);
        assert_tiles_exactly(&l);
    }

    #[test]
    fn test_no_rotation_needs_two_sheets() {
        let l = layout(80.0, 40.0, &SpliceOptions::default().with_rotation(false));
        assert!(!l.is_rotated);
        assert!(l.sheet_count >= 2);
        assert_eq!(l.vertical_splices().count(), 1);
        assert_tiles_exactly(&l);
    }

    #[test]
    fn test_rotation_tie_keeps_original() {
        let l = layout(120.0, 72.0, &SpliceOptions::default());
        assert!(!l.is_rotated);
        assert!(l.vertical_splices().count() > 0);
        assert_tiles_exactly(&l);

        let square = layout(96.0, 96.0, &SpliceOptions::default());
        assert!(!square.is_rotated);
        assert_eq!(square.splices.len(), 1);
    }

    #[test]
    fn test_rotation_never_buys_more_sheets() {
        let options = SpliceOptions::default().with_stacked_cleats(false);

        // rotated needs 4 sheets with 3 splices, original 3 sheets with 6
        let long_strip = layout(295.0, 25.0, &options);
        assert!(!long_strip.is_rotated);
        assert_eq!(long_strip.sheet_count, 3);
        assert_eq!(long_strip.vertical_splices().count(), 6);

        for width in (0..40).map(|i| 10.0 + 7.5 * i as f64) {
            for height in (0..40).map(|i| 10.0 + 7.5 * i as f64) {
                let chosen = layout(width, height, &options);
                let original = layout(width, height, &options.with_rotation(false));
                assert!(
                    chosen.sheet_count <= original.sheet_count,
                    "{width}x{height}: {} sheets vs {}",
                    chosen.sheet_count,
                    original.sheet_count
                );
                if chosen.is_rotated && chosen.sheet_count == original.sheet_count {
                    assert!(chosen.splices.len() < original.splices.len());
                }
            }
        }
    }

    #[test]
    fn test_cleat_clearance_raises_bottom_row() {
        let l = calculate_optimized_splice_layout(
            "FRONT_PANEL",
            PanelSize::new(54.0, 99.5),
            &SpliceOptions::default().with_rotation(false),
        )
        .unwrap();

        let mut bottom: Vec<&Sheet> = l.sheets.iter().filter(|s| s.y == 0.0).collect();
        bottom.sort_by(|a, b| a.height.total_cmp(&b.height));
        assert!(bottom[0].height >= 7.25);

        let first = l.horizontal_splices().next().unwrap();
        assert!(first.position > 7.0);
        assert_tiles_exactly(&l);
    }

    #[test]
    fn test_without_stacked_cleats_remainder_stays_at_bottom() {
        let options = SpliceOptions::default().with_rotation(false).with_stacked_cleats(false);
        let l = layout(54.0, 99.5, &options);
        let first = l.horizontal_splices().next().unwrap();
        assert!((first.position - 3.5).abs() < 1e-9);
    }

    #[test]
    fn test_sliver_is_widened_to_min_trim() {
        // 97" wide leaves a 1" sliver in the original orientation
        let options = SpliceOptions::default().with_rotation(false).with_stacked_cleats(false);
        let l = layout(97.0, 40.0, &options);
        for sheet in &l.sheets {
            assert!(sheet.width >= MIN_TRIM_WIDTH_IN - 1e-9);
        }
        assert_eq!(l.vertical_splices().count(), 2);
        assert_tiles_exactly(&l);
    }

    #[test]
    fn test_tiny_panel_is_infeasible() {
        let err = calculate_optimized_splice_layout(
            "TEST_PANEL",
            PanelSize::new(2.0, 40.0),
            &SpliceOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CrateError::LayoutInfeasible { .. }));
    }

    #[test]
    fn test_non_positive_panel_rejected() {
        let err = calculate_optimized_splice_layout(
            "TEST_PANEL",
            PanelSize::new(0.0, 40.0),
            &SpliceOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CrateError::InvalidArgument { .. }));
    }

    #[test]
    fn test_trimmed_pieces_share_source_sheets() {
        // two 24"-wide columns of full height fit one 48" sheet
        let options = SpliceOptions::default().with_rotation(false).with_stacked_cleats(false);
        let l = layout(120.0, 96.0, &options);
        assert_eq!(l.sheets.len(), 3);
        assert_eq!(l.sheet_count, 3);

        let tall = layout(120.0, 192.0, &options);
        assert_eq!(tall.sheets.len(), 6);
        // four full sheets plus two 24x96 strips ripped from one sheet
        assert_eq!(tall.sheet_count, 5);
        let trimmed: Vec<&Sheet> = tall.sheets.iter().filter(|s| s.trimmed).collect();
        assert_eq!(trimmed.len(), 2);
        assert_eq!(trimmed[0].source_sheet_index, trimmed[1].source_sheet_index);
    }

    #[test]
    fn test_layout_is_idempotent() {
        let options = SpliceOptions::default();
        let a = layout(131.5, 107.25, &options);
        let b = layout(131.5, 107.25, &options);
        assert_eq!(a, b);
    }

    #[test]
    fn test_many_panels_tile_exactly() {
        let options = SpliceOptions::default();
        let mut w = 3.0;
        while w < 200.0 {
            let mut h = 8.0;
            while h < 160.0 {
                let l = layout(w, h, &options);
                assert_tiles_exactly(&l);
                if let Some(first) = l.horizontal_splices().next() {
                    assert!(first.position > 7.0);
                }
                h += 13.3;
            }
            w += 17.7;
        }
    }

    #[test]
    fn test_crate_splicing_order() {
        let sizes = CratePanelSizes {
            front_back: PanelSize::new(90.0, 70.0),
            sides: PanelSize::new(80.0, 65.0),
            top: PanelSize::new(90.0, 80.0),
            bottom: Some(PanelSize::new(88.0, 78.0)),
        };
        let layouts = calculate_crate_splicing(&sizes, &SpliceOptions::default()).unwrap();
        let names: Vec<&str> = layouts.iter().map(|l| l.panel_name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "FRONT_PANEL",
                "BACK_PANEL",
                "LEFT_END_PANEL",
                "RIGHT_END_PANEL",
                "TOP_PANEL",
                "BOTTOM_PANEL"
            ]
        );

        let usage = calculate_material_usage(&layouts);
        assert!(usage.total_sheets > 0);
        assert!(usage.total_area > 0.0);
        assert!(usage.efficiency > 0.0 && usage.efficiency <= 1.0);
        assert!((usage.waste_area - (usage.purchased_area - usage.total_area)).abs() < 1e-9);
    }

    #[test]
    fn test_crate_splicing_without_bottom() {
        let sizes = CratePanelSizes {
            front_back: PanelSize::new(44.0, 96.0),
            sides: PanelSize::new(50.0, 99.25),
            top: PanelSize::new(44.0, 52.0),
            bottom: None,
        };
        let layouts = calculate_crate_splicing(&sizes, &SpliceOptions::default()).unwrap();
        assert_eq!(layouts.len(), 5);
        assert_eq!(layouts[4].panel_name, PanelFace::TopPanel.name());
    }

    #[test]
    fn test_capability_gate() {
        assert!(validate_for_130_cube(40.0, 40.0, 40.0));
        assert!(!validate_for_130_cube(180.0, 150.0, 150.0));
        assert!(validate_for_130_cube(130.0, 130.0, 130.0));
        assert!(!validate_for_130_cube(0.0, 40.0, 40.0));

        let small = HandlingEnvelope { max_volume: 1_000.0, ..HandlingEnvelope::default() };
        assert!(!small.accepts(20.0, 20.0, 20.0));
    }

    #[test]
    fn test_splice_expression_names_are_panel_scoped() {
        let l = calculate_optimized_splice_layout(
            "DOC_PANEL",
            PanelSize::new(96.0, 96.0),
            &SpliceOptions::default(),
        )
        .unwrap();
        let text = generate_splice_expressions(&l);
        assert!(text.contains("# Splice Layout for DOC_PANEL"));
        assert!(text.contains("DOC_PANEL_SPLICE"));
        assert!(text.contains("_WIDTH="));

        for line in text.lines().filter(|line| !line.starts_with('#') && !line.is_empty()) {
            let (name, value) = line.split_once('=').unwrap();
            assert!(name.starts_with("DOC_PANEL_"), "{name}");
            assert!(!value.is_empty());
        }
    }

    #[test]
    fn test_wrapper_allows_rotation() {
        let l = calculate_plywood_pieces(PanelSize::new(80.0, 40.0), "TOP_PANEL").unwrap();
        assert!(l.is_rotated);
    }

    #[test]
    fn test_panel_face_names() {
        for face in PanelFace::ALL {
            assert_eq!(PanelFace::from_name(face.name()), Some(face));
        }
        assert!(PanelFace::FrontPanel.is_vertical());
        assert!(!PanelFace::TopPanel.is_vertical());
    }
}
