//! # Fastening Hardware
//!
//! Klimps are L-shaped spring clamps that hold the front panel to its
//! neighbours. They sit along the top edge between the vertical perimeter
//! cleats and along both side edges above the bottom cleat, spaced 18" to
//! 24" apart and aiming for 21".
//!
//! Lag screws (3/8" x 2.5") tie every splice or intermediate vertical cleat
//! on the end and back panels into the floor at floorboard mid-height.
//!
//! Only counts and edge positions are computed here. The hardware itself is
//! a purchased part placed in CAD from these numbers.

use serde::{Deserialize, Serialize};

use crate::calculations::cleats::{CleatKind, CleatOrientation, PanelCleatLayout};
use crate::calculations::splicing::PanelFace;

pub const KLIMP_MIN_SPACING_IN: f64 = 18.0;
pub const KLIMP_MAX_SPACING_IN: f64 = 24.0;

/// Gap between a top-edge klimp and the vertical perimeter cleat
pub const KLIMP_CLEAT_OFFSET_IN: f64 = 1.0;

/// Gap between the lowest side klimp and the bottom cleat
pub const KLIMP_BOTTOM_OFFSET_IN: f64 = 2.0;

/// Side klimps stay this far below the top edge
pub const KLIMP_TOP_CLEARANCE_IN: f64 = 4.0;

pub const KLIMPS_PER_PACKAGE: usize = 25;

const TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KlimpEdge {
    Top,
    Left,
    Right,
}

impl KlimpEdge {
    pub fn as_str(&self) -> &'static str {
        match self {
            KlimpEdge::Top => "top",
            KlimpEdge::Left => "left",
            KlimpEdge::Right => "right",
        }
    }
}

/// One klimp. `position` runs along its edge: from the left corner for the
/// top edge, up from the panel bottom for the sides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Klimp {
    pub id: String,
    pub edge: KlimpEdge,
    pub position: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KlimpLayout {
    pub panel_name: String,
    pub klimps: Vec<Klimp>,
}

impl KlimpLayout {
    pub fn total(&self) -> usize {
        self.klimps.len()
    }

    pub fn count(&self, edge: KlimpEdge) -> usize {
        self.klimps.iter().filter(|k| k.edge == edge).count()
    }

    pub fn positions(&self, edge: KlimpEdge) -> Vec<f64> {
        self.klimps
            .iter()
            .filter(|k| k.edge == edge)
            .map(|k| k.position)
            .collect()
    }
}

/// Klimp positions for a front panel of the given size.
///
/// `cleat_width` is the face width of the perimeter cleats, which bounds the
/// top edge run and lifts the side runs off the bottom cleat. Left and right
/// edges mirror each other.
pub fn calculate_klimp_layout(panel_width: f64, panel_height: f64, cleat_width: f64) -> KlimpLayout {
    let inset = cleat_width + KLIMP_CLEAT_OFFSET_IN;
    let top = spaced_positions(inset, panel_width - inset, 2);
    let side = spaced_positions(
        cleat_width + KLIMP_BOTTOM_OFFSET_IN,
        panel_height - KLIMP_TOP_CLEARANCE_IN,
        2,
    );

    let runs = [
        (KlimpEdge::Top, &top),
        (KlimpEdge::Left, &side),
        (KlimpEdge::Right, &side),
    ];
    let mut klimps = Vec::with_capacity(top.len() + 2 * side.len());
    for (edge, positions) in runs {
        for &position in positions {
            klimps.push(Klimp {
                id: format!("KLIMP_{}_{}", edge.as_str().to_uppercase(), klimps.len()),
                edge,
                position,
            });
        }
    }

    KlimpLayout {
        panel_name: PanelFace::FrontPanel.name().to_string(),
        klimps,
    }
}

/// Evenly spaced points on `[start, end]` with a pitch inside the klimp
/// spacing band, closest to its midpoint, centred on the run.
fn spaced_positions(start: f64, end: f64, min_count: usize) -> Vec<f64> {
    if end <= start {
        return vec![start];
    }

    let span = end - start;
    let base = min_count.max(if span >= KLIMP_MIN_SPACING_IN { 2 } else { 1 }).max(2);
    let max_count = base.max((span / KLIMP_MIN_SPACING_IN).floor() as usize + 2) + 4;
    let target = (KLIMP_MIN_SPACING_IN + KLIMP_MAX_SPACING_IN) / 2.0;

    // counts ascend, so a tie keeps the smaller count
    let mut best: Option<(f64, Vec<f64>)> = None;
    for count in base..=max_count {
        let intervals = (count - 1) as f64;
        let min_offset = ((span - KLIMP_MAX_SPACING_IN * intervals) / 2.0).max(0.0);
        let max_offset = ((span - KLIMP_MIN_SPACING_IN * intervals) / 2.0).max(0.0);
        if min_offset > max_offset + TOLERANCE {
            continue;
        }

        let offset = ((span - target * intervals) / 2.0).min(max_offset).max(min_offset);
        if offset > span / 2.0 {
            continue;
        }
        let run = span - 2.0 * offset;
        if run < -TOLERANCE {
            continue;
        }

        let spacing = run / intervals;
        if spacing < KLIMP_MIN_SPACING_IN - TOLERANCE || spacing > KLIMP_MAX_SPACING_IN + TOLERANCE {
            continue;
        }

        let score = (spacing - target).abs();
        if best.as_ref().map_or(true, |(best_score, _)| score < best_score - TOLERANCE) {
            let positions = (0..count).map(|i| start + offset + i as f64 * spacing).collect();
            best = Some((score, positions));
        }
    }

    let positions = match best {
        Some((_, positions)) => positions,
        None if span < KLIMP_MIN_SPACING_IN - TOLERANCE => vec![start + span / 2.0],
        None => {
            let intervals = (base - 1) as f64;
            let spacing = (span / intervals).max(KLIMP_MIN_SPACING_IN).min(KLIMP_MAX_SPACING_IN);
            let offset = ((span - spacing * intervals) / 2.0).max(0.0);
            (0..base).map(|i| start + offset + i as f64 * spacing).collect()
        }
    };

    positions.into_iter().map(round_micro).collect()
}

fn round_micro(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}

/// Lag screws: one per splice or intermediate vertical cleat on the end and
/// back panels.
pub fn count_lag_screws(cleat_layouts: &[PanelCleatLayout]) -> usize {
    cleat_layouts
        .iter()
        .filter(|layout| {
            matches!(
                PanelFace::from_name(&layout.panel_name),
                Some(PanelFace::LeftEndPanel | PanelFace::RightEndPanel | PanelFace::BackPanel)
            )
        })
        .flat_map(|layout| layout.cleats.iter())
        .filter(|c| c.orientation == CleatOrientation::Vertical && c.kind != CleatKind::Perimeter)
        .count()
}

/// Hardware counts for the BOM and the CAD parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HardwareSummary {
    pub klimp_count: usize,
    pub klimp_top_count: usize,
    pub klimp_left_count: usize,
    pub klimp_right_count: usize,
    pub klimp_packages: usize,
    pub lag_screw_count: usize,
}

pub fn calculate_hardware(klimps: &KlimpLayout, cleat_layouts: &[PanelCleatLayout]) -> HardwareSummary {
    let klimp_count = klimps.total();
    HardwareSummary {
        klimp_count,
        klimp_top_count: klimps.count(KlimpEdge::Top),
        klimp_left_count: klimps.count(KlimpEdge::Left),
        klimp_right_count: klimps.count(KlimpEdge::Right),
        klimp_packages: klimp_count.div_ceil(KLIMPS_PER_PACKAGE),
        lag_screw_count: count_lag_screws(cleat_layouts),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::cleats::Cleat;

    fn cleat(id: &str, kind: CleatKind, orientation: CleatOrientation) -> Cleat {
        Cleat {
            id: id.to_string(),
            kind,
            orientation,
            x: 10.0,
            y: 3.5,
            length: 40.0,
            width: 3.5,
            thickness: 0.75,
        }
    }

    fn panel(name: &str, cleats: Vec<Cleat>) -> PanelCleatLayout {
        PanelCleatLayout {
            panel_name: name.to_string(),
            panel_width: 60.0,
            panel_height: 50.0,
            cleats,
        }
    }

    #[test]
    fn test_klimp_layout_front_panel() {
        let layout = calculate_klimp_layout(44.0, 90.0, 3.5);
        assert_eq!(layout.panel_name, "FRONT_PANEL");
        // top run 4.5..39.5 takes two klimps 21" apart
        assert_eq!(layout.positions(KlimpEdge::Top), vec![11.5, 32.5]);
        // side run 5.5..86
        assert_eq!(layout.positions(KlimpEdge::Left), vec![35.25, 56.25]);
        assert_eq!(layout.positions(KlimpEdge::Left), layout.positions(KlimpEdge::Right));
        assert_eq!(layout.total(), 6);
        assert_eq!(layout.klimps[0].id, "KLIMP_TOP_0");
        assert_eq!(layout.klimps[5].id, "KLIMP_RIGHT_5");
    }

    #[test]
    fn test_klimp_spacing_stays_in_band() {
        for step in 0..80 {
            let width = 30.0 + 1.5 * step as f64;
            let start = 3.5 + KLIMP_CLEAT_OFFSET_IN;
            let end = width - start;
            let positions = spaced_positions(start, end, 2);
            assert!(!positions.is_empty());
            for p in &positions {
                assert!(*p >= start - 1e-6 && *p <= end + 1e-6, "{width}: {p}");
            }
            for pair in positions.windows(2) {
                let gap = pair[1] - pair[0];
                assert!(
                    (KLIMP_MIN_SPACING_IN - 1e-5..=KLIMP_MAX_SPACING_IN + 1e-5).contains(&gap),
                    "{width}: gap {gap}"
                );
            }
        }
    }

    #[test]
    fn test_short_run_gets_one_centred_klimp() {
        assert_eq!(spaced_positions(4.5, 14.5, 2), vec![9.5]);
        assert_eq!(spaced_positions(5.0, 5.0, 2), vec![5.0]);
    }

    #[test]
    fn test_lag_screws_on_end_and_back_support_cleats() {
        use CleatKind::{Intermediate, Perimeter, Splice};
        use CleatOrientation::{Horizontal, Vertical};

        let layouts = vec![
            panel("FRONT_PANEL", vec![cleat("F_INT", Intermediate, Vertical)]),
            panel(
                "BACK_PANEL",
                vec![
                    cleat("B_PER", Perimeter, Vertical),
                    cleat("B_INT", Intermediate, Vertical),
                    cleat("B_SPL", Splice, Vertical),
                ],
            ),
            panel(
                "LEFT_END_PANEL",
                vec![cleat("L_PER", Perimeter, Vertical), cleat("L_INT", Intermediate, Vertical)],
            ),
            panel("RIGHT_END_PANEL", vec![cleat("R_HSPL", Splice, Horizontal)]),
            panel("TOP_PANEL", vec![cleat("T_INT", Intermediate, Vertical)]),
        ];
        assert_eq!(count_lag_screws(&layouts), 3);

        let summary = calculate_hardware(&calculate_klimp_layout(44.0, 90.0, 3.5), &layouts);
        assert_eq!(summary.klimp_count, 6);
        assert_eq!(summary.klimp_top_count, 2);
        assert_eq!(summary.klimp_left_count, 2);
        assert_eq!(summary.klimp_right_count, 2);
        assert_eq!(summary.klimp_packages, 1);
        assert_eq!(summary.lag_screw_count, 3);
    }
}
