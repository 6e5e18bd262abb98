//! # Floorboard Layout
//!
//! Floorboards run across the crate width and are laid side by side along the
//! internal length, starting at the inside face of the front wall.
//!
//! The board mix is found by exhaustive search in 1/8" units over the
//! available lumber widths (at most 40 boards). A custom ripped board may fill
//! the remainder. Preference order:
//!
//! 1. Most length covered
//! 2. Fewest boards
//! 3. Most wide boards
//!
//! Only mixes that can be laid symmetrically are accepted: matching pairs run
//! from the outside in and any odd or custom board sits in the middle, no
//! wider than the narrowest pair.
//!
//! ## Example
//!
//! ```rust
//! use crate_core::calculations::floorboards::calculate_floorboard_layout;
//! use crate_core::materials::LumberSize;
//!
//! let sizes = [LumberSize::L2x6, LumberSize::L2x8, LumberSize::L2x10, LumberSize::L2x12];
//! let layout = calculate_floorboard_layout(50.0, 42.0, 1.0, &sizes).unwrap();
//!
//! assert_eq!(layout.boards.len(), 5);
//! assert_eq!(layout.custom_width(), Some(5.0));
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CrateError, CrateResult};
use crate::materials::{LumberSize, FLOORBOARD_THICKNESS_IN, MIN_CUSTOM_BOARD_WIDTH_IN};

/// Most floorboards a crate floor may carry
pub const MAX_FLOORBOARDS: usize = 40;

/// Search resolution: 1/8"
const UNITS_PER_INCH: f64 = 8.0;

/// Custom boards are ripped to 1/4"
const CUSTOM_STEP_UNITS: i64 = 2;

/// One floorboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Floorboard {
    pub id: String,
    /// `None` for a custom ripped board
    pub size: Option<LumberSize>,
    /// Along the crate length
    pub width: f64,
    /// Across the crate (internal width)
    pub length: f64,
    pub thickness: f64,
    /// Front edge, measured from the crate's outer front face
    pub y: f64,
}

impl Floorboard {
    pub fn is_custom(&self) -> bool {
        self.size.is_none()
    }

    pub fn nominal(&self) -> &'static str {
        self.size.map(|s| s.display_name()).unwrap_or("CUSTOM")
    }
}

/// Chosen floorboard layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorboardLayout {
    pub boards: Vec<Floorboard>,
    /// Internal length being covered
    pub span: f64,
    pub covered_length: f64,
    /// Uncovered length, left as one gap beside the centre
    pub gap: f64,
}

impl FloorboardLayout {
    pub fn custom_width(&self) -> Option<f64> {
        self.boards.iter().find(|b| b.is_custom()).map(|b| b.width)
    }

    /// Count of boards per nominal size, widest first; custom boards excluded
    pub fn counts_by_size(&self) -> Vec<(LumberSize, usize)> {
        let mut counts: Vec<(LumberSize, usize)> = Vec::new();
        for size in self.boards.iter().filter_map(|b| b.size) {
            match counts.iter_mut().find(|(s, _)| *s == size) {
                Some((_, n)) => *n += 1,
                None => counts.push((size, 1)),
            }
        }
        counts.sort_by(|a, b| b.0.width_in().total_cmp(&a.0.width_in()));
        counts
    }
}

#[derive(Debug, Clone, Copy)]
struct BoardOption {
    size: LumberSize,
    units: i64,
}

#[derive(Debug, Clone, PartialEq)]
struct Candidate {
    used: i64,
    boards: usize,
    counts: Vec<usize>,
    custom: Option<i64>,
}

impl Candidate {
    fn beats(&self, best: &Candidate) -> bool {
        if self.used != best.used {
            return self.used > best.used;
        }
        if self.boards != best.boards {
            return self.boards < best.boards;
        }
        // more of the wider sizes, then the wider custom board
        match self.counts.cmp(&best.counts) {
            std::cmp::Ordering::Equal => self.custom.unwrap_or(0) > best.custom.unwrap_or(0),
            ordering => ordering == std::cmp::Ordering::Greater,
        }
    }
}

struct Search<'a> {
    options: &'a [BoardOption],
    span: i64,
    min_custom: i64,
    max_custom: i64,
    counts: Vec<usize>,
    best: Option<Candidate>,
}

impl Search<'_> {
    fn run(&mut self, index: usize, boards: usize, used: i64) {
        if index == self.options.len() {
            self.evaluate(boards, used);
            return;
        }
        let width = self.options[index].units;
        for count in 0..=(MAX_FLOORBOARDS - boards) {
            let total = used + count as i64 * width;
            if total > self.span {
                break;
            }
            self.counts[index] = count;
            self.run(index + 1, boards + count, total);
        }
        self.counts[index] = 0;
    }

    fn evaluate(&mut self, boards: usize, used: i64) {
        self.offer(boards, used, None);
        if boards >= MAX_FLOORBOARDS {
            return;
        }
        let remaining = self.span - used;
        if remaining < self.min_custom {
            return;
        }
        let custom = remaining.min(self.max_custom) / CUSTOM_STEP_UNITS * CUSTOM_STEP_UNITS;
        if custom >= self.min_custom {
            self.offer(boards + 1, used + custom, Some(custom));
        }
    }

    fn offer(&mut self, boards: usize, used: i64, custom: Option<i64>) {
        if !self.symmetric(custom) {
            return;
        }
        let candidate = Candidate { used, boards, counts: self.counts.clone(), custom };
        if self.best.as_ref().map_or(true, |best| candidate.beats(best)) {
            self.best = Some(candidate);
        }
    }

    /// Centre boards (odd ones out and the custom board) must be no wider than
    /// the narrowest pair.
    fn symmetric(&self, custom: Option<i64>) -> bool {
        let narrowest_pair = self
            .options
            .iter()
            .zip(&self.counts)
            .filter(|(_, n)| **n >= 2)
            .map(|(o, _)| o.units)
            .min();
        let Some(narrowest_pair) = narrowest_pair else {
            return true;
        };
        self.options
            .iter()
            .zip(&self.counts)
            .filter(|(_, n)| **n % 2 == 1)
            .map(|(o, _)| o.units)
            .chain(custom)
            .all(|units| units <= narrowest_pair)
    }
}

/// Lay floorboards over `span` (internal length) starting at `start_y`.
///
/// `board_length` is the internal width each board spans. Fails with
/// `InvalidConfiguration` if no lumber is available and `LayoutInfeasible`
/// if nothing fits.
pub fn calculate_floorboard_layout(
    span: f64,
    board_length: f64,
    start_y: f64,
    available: &[LumberSize],
) -> CrateResult<FloorboardLayout> {
    if !span.is_finite() || span <= 0.0 {
        return Err(CrateError::invalid_argument("span", span.to_string(), "Floor span must be positive"));
    }

    let mut options: Vec<BoardOption> = available
        .iter()
        .filter(|s| s.is_floorboard())
        .map(|&size| BoardOption { size, units: to_units(size.width_in()) })
        .collect();
    options.sort_by(|a, b| b.units.cmp(&a.units));
    options.dedup_by_key(|o| o.size);

    let Some(narrowest) = options.last().map(|o| o.units) else {
        return Err(CrateError::invalid_configuration(
            "availableFloorboards",
            format!("{available:?}"),
            "No floorboard lumber available",
        ));
    };

    let min_custom = to_units(MIN_CUSTOM_BOARD_WIDTH_IN);
    let mut search = Search {
        options: &options,
        span: (span * UNITS_PER_INCH + 1e-9).floor() as i64,
        min_custom,
        max_custom: min_custom.max(narrowest),
        counts: vec![0; options.len()],
        best: None,
    };
    search.run(0, 0, 0);

    let best = match search.best {
        Some(best) if best.boards > 0 => best,
        _ => {
            return Err(CrateError::layout_infeasible(
                "FLOOR",
                format!("{span}\" is shorter than the narrowest floorboard or custom board"),
            ))
        }
    };

    Ok(arrange(&options, &best, span, board_length, start_y))
}

fn to_units(inches: f64) -> i64 {
    (inches * UNITS_PER_INCH).round() as i64
}

/// Pairs outside in, centre boards split between the halves, custom board in
/// the middle. Leftover length becomes one gap beside the centre.
fn arrange(
    options: &[BoardOption],
    best: &Candidate,
    span: f64,
    board_length: f64,
    start_y: f64,
) -> FloorboardLayout {
    let mut pairs: Vec<Option<LumberSize>> = Vec::new();
    let mut centre: Vec<Option<LumberSize>> = Vec::new();
    for (option, &count) in options.iter().zip(&best.counts) {
        pairs.extend(std::iter::repeat(Some(option.size)).take(count / 2));
        if count % 2 == 1 {
            centre.push(Some(option.size));
        }
    }

    let mut left = pairs.clone();
    let mut right = pairs;
    for board in centre {
        if left.len() <= right.len() {
            left.push(board);
        } else {
            right.push(board);
        }
    }

    let custom_width = best.custom.map(|units| units as f64 / UNITS_PER_INCH);
    let left_len = left.len();
    let sequence: Vec<Option<LumberSize>> = left
        .into_iter()
        .chain(custom_width.map(|_| None))
        .chain(right.into_iter().rev())
        .collect();

    let width_of = |board: &Option<LumberSize>| match board {
        Some(size) => size.width_in(),
        None => custom_width.unwrap_or(0.0),
    };
    let covered_length: f64 = sequence.iter().map(&width_of).sum();
    let gap = (span - covered_length).max(0.0);

    let gap_after = (if custom_width.is_some() {
        left_len
    } else {
        left_len.saturating_sub(1)
    })
    .min(sequence.len().saturating_sub(2));

    let mut y = start_y;
    let mut boards = Vec::with_capacity(sequence.len());
    for (i, board) in sequence.iter().enumerate() {
        let width = width_of(board);
        boards.push(Floorboard {
            id: format!("FLOORBOARD_{}", i + 1),
            size: *board,
            width,
            length: board_length,
            thickness: FLOORBOARD_THICKNESS_IN,
            y,
        });
        y += width;
        if i == gap_after && i + 1 < sequence.len() {
            y += gap;
        }
    }

    FloorboardLayout { boards, span, covered_length, gap }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [LumberSize; 4] = LumberSize::FLOORBOARDS;

    fn layout(span: f64, available: &[LumberSize]) -> FloorboardLayout {
        calculate_floorboard_layout(span, 42.0, 1.0, available).unwrap()
    }

    fn assert_contiguous(layout: &FloorboardLayout, start: f64) {
        let mut y = start;
        let mut gaps = 0.0;
        for board in &layout.boards {
            assert!(board.y >= y - 1e-9);
            gaps += board.y - y;
            y = board.y + board.width;
        }
        assert!(y <= start + layout.span + 1e-9);
        gaps += start + layout.span - y;
        assert!((gaps - layout.gap).abs() < 1e-9);
    }

    #[test]
    fn test_default_crate_floor() {
        let l = layout(50.0, &ALL);
        let widths: Vec<f64> = l.boards.iter().map(|b| b.width).collect();
        assert_eq!(widths, vec![11.25, 11.25, 5.0, 11.25, 11.25]);
        assert!(l.boards[2].is_custom());
        assert_eq!(l.boards[2].nominal(), "CUSTOM");
        assert_eq!(l.gap, 0.0);
        assert_eq!(l.boards[0].y, 1.0);
        assert_eq!(l.boards[0].id, "FLOORBOARD_1");
        assert_contiguous(&l, 1.0);
    }

    #[test]
    fn test_exact_fit_without_custom() {
        // 2 x 11.25 + 9.25 = 31.75
        let l = layout(31.75, &ALL);
        assert_eq!(l.boards.len(), 3);
        assert!(l.custom_width().is_none());
        assert_eq!(l.boards[1].size, Some(LumberSize::L2x10));
        assert_eq!(l.gap, 0.0);
    }

    #[test]
    fn test_restricted_lumber() {
        let l = layout(50.0, &[LumberSize::L2x6]);
        assert!(l.boards.iter().all(|b| b.size.is_none() || b.size == Some(LumberSize::L2x6)));
        // 9 x 5.5 = 49.5, remainder too narrow for a custom board
        assert_eq!(l.counts_by_size(), vec![(LumberSize::L2x6, 9)]);
        assert!((l.gap - 0.5).abs() < 1e-9);
        assert_contiguous(&l, 1.0);
    }

    #[test]
    fn test_centre_boards_no_wider_than_pairs() {
        for span in [20.0, 33.3, 47.125, 61.0, 88.8, 120.0] {
            let l = layout(span, &ALL);
            let n = l.boards.len();
            for i in 0..n / 2 {
                let (a, b) = (&l.boards[i], &l.boards[n - 1 - i]);
                if a.size.is_some() && b.size.is_some() && a.size == b.size {
                    continue;
                }
                // unmatched positions only hold centre boards
                let narrowest_pair = l
                    .counts_by_size()
                    .iter()
                    .filter(|(_, c)| *c >= 2)
                    .map(|(s, _)| s.width_in())
                    .fold(f64::INFINITY, f64::min);
                assert!(a.width <= narrowest_pair + 1e-9 && b.width <= narrowest_pair + 1e-9);
            }
            assert!(l.covered_length <= span + 1e-9);
            assert_contiguous(&l, 1.0);
        }
    }

    #[test]
    fn test_small_span_uses_custom_board() {
        let l = layout(4.0, &ALL);
        assert_eq!(l.boards.len(), 1);
        assert_eq!(l.custom_width(), Some(4.0));
    }

    #[test]
    fn test_board_limit() {
        let l = layout(400.0, &[LumberSize::L2x6]);
        assert!(l.boards.len() <= MAX_FLOORBOARDS);
    }

    #[test]
    fn test_errors() {
        let err = calculate_floorboard_layout(50.0, 42.0, 1.0, &[]).unwrap_err();
        assert!(matches!(err, CrateError::InvalidConfiguration { .. }));

        let err = calculate_floorboard_layout(2.0, 42.0, 1.0, &ALL).unwrap_err();
        assert!(matches!(err, CrateError::LayoutInfeasible { .. }));

        let err = calculate_floorboard_layout(-1.0, 42.0, 1.0, &ALL).unwrap_err();
        assert!(matches!(err, CrateError::InvalidArgument { .. }));
    }
}
