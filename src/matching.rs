//! Run detection.
//!
//! `find_matches` is the full-board scan used by the cascade; `creates_match_at`
//! is the cheap local check used to decide whether a single swap is kept.

use crate::grid::Grid;
use crate::piece::{PieceId, PieceType, Position};
use std::collections::BTreeMap;

/// Shortest run that counts as a match.
pub const MIN_RUN_LENGTH: usize = 3;

/// Direction a run extends in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    /// Left to right along a row.
    Horizontal,
    /// Bottom to top along a column.
    Vertical,
}

impl Orientation {
    fn step(self) -> (isize, isize) {
        match self {
            Orientation::Horizontal => (0, 1),
            Orientation::Vertical => (1, 0),
        }
    }
}

/// A maximal line of at least `MIN_RUN_LENGTH` same-typed pieces.
///
/// `start` is the leftmost cell of a horizontal run or the lowest cell of a
/// vertical one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Run {
    pub orientation: Orientation,
    pub start: Position,
    pub len: usize,
    pub kind: PieceType,
}

impl Run {
    /// The cells covered by the run, in scan order.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        line_positions(self.start, self.len, self.orientation)
    }
}

/// The `len` cells starting at `start` and stepping along `orientation`.
fn line_positions(
    start: Position,
    len: usize,
    orientation: Orientation,
) -> impl Iterator<Item = Position> {
    (0..len).map(move |offset| match orientation {
        Orientation::Horizontal => Position::new(start.row, start.column + offset),
        Orientation::Vertical => Position::new(start.row + offset, start.column),
    })
}

/// The pieces found in any run during one detection pass, keyed by identity.
///
/// A piece belonging to both a horizontal and a vertical run appears once.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchSet {
    pieces: BTreeMap<PieceId, Position>,
}

impl MatchSet {
    /// Number of distinct matched pieces.
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn contains(&self, id: PieceId) -> bool {
        self.pieces.contains_key(&id)
    }

    /// Matched pieces with the cell each was found in, ordered by identity.
    pub fn iter(&self) -> impl Iterator<Item = (PieceId, Position)> + '_ {
        self.pieces.iter().map(|(&id, &pos)| (id, pos))
    }

    /// Matched cells in row-major order.
    pub fn positions(&self) -> Vec<Position> {
        let mut positions: Vec<Position> = self.pieces.values().copied().collect();
        positions.sort_unstable();
        positions
    }
}

/// Finds every maximal run of length `MIN_RUN_LENGTH` or more, rows first
/// (bottom to top), then columns (left to right).
pub fn find_runs(grid: &Grid) -> Vec<Run> {
    let mut runs = Vec::new();
    for row in 0..grid.height() {
        scan_line(
            grid,
            Position::new(row, 0),
            grid.width(),
            Orientation::Horizontal,
            &mut runs,
        );
    }
    for column in 0..grid.width() {
        scan_line(
            grid,
            Position::new(0, column),
            grid.height(),
            Orientation::Vertical,
            &mut runs,
        );
    }
    runs
}

fn scan_line(
    grid: &Grid,
    start: Position,
    len: usize,
    orientation: Orientation,
    runs: &mut Vec<Run>,
) {
    let mut current: Option<Run> = None;
    for pos in line_positions(start, len, orientation) {
        let kind = grid.kind_at(pos);
        match current.as_mut() {
            Some(run) if Some(run.kind) == kind => run.len += 1,
            _ => {
                runs.extend(current.filter(|run| run.len >= MIN_RUN_LENGTH));
                current = kind.map(|kind| Run {
                    orientation,
                    start: pos,
                    len: 1,
                    kind,
                });
            }
        }
    }
    runs.extend(current.filter(|run| run.len >= MIN_RUN_LENGTH));
}

/// Collects every piece that belongs to a run of `MIN_RUN_LENGTH` or more.
///
/// Accepts `&Grid` or `None`; an absent grid yields an empty set.
///
/// # Examples
/// ```
/// use match3_engine::matching::find_matches;
/// use match3_engine::utils::grid_from_rows;
///
/// let grid = grid_from_rows(&["RRRG", "BGBY"]).unwrap();
/// assert_eq!(find_matches(&grid).len(), 3);
/// assert!(find_matches(None).is_empty());
/// ```
pub fn find_matches<'a>(grid: impl Into<Option<&'a Grid>>) -> MatchSet {
    let mut matches = MatchSet::default();
    let Some(grid) = grid.into() else {
        return matches;
    };
    for run in find_runs(grid) {
        for pos in run.positions() {
            if let Some(piece) = grid.get(pos) {
                matches.pieces.insert(piece.id(), pos);
            }
        }
    }
    matches
}

fn neighbour(grid: &Grid, pos: Position, (d_row, d_col): (isize, isize)) -> Option<Position> {
    let next = Position::new(
        pos.row.checked_add_signed(d_row)?,
        pos.column.checked_add_signed(d_col)?,
    );
    grid.contains(next).then_some(next)
}

fn count_same(grid: &Grid, pos: Position, kind: PieceType, step: (isize, isize)) -> usize {
    let mut count = 0;
    let mut cursor = pos;
    while let Some(next) = neighbour(grid, cursor, step) {
        if grid.kind_at(next) != Some(kind) {
            break;
        }
        count += 1;
        cursor = next;
    }
    count
}

/// Lengths of the horizontal and vertical runs through `pos`, counting the
/// cell itself. An empty cell has no runs.
pub fn run_lengths_at(grid: &Grid, pos: Position) -> (usize, usize) {
    let Some(kind) = grid.kind_at(pos) else {
        return (0, 0);
    };
    let lengths = [Orientation::Horizontal, Orientation::Vertical].map(|orientation| {
        let (d_row, d_col) = orientation.step();
        1 + count_same(grid, pos, kind, (d_row, d_col))
            + count_same(grid, pos, kind, (-d_row, -d_col))
    });
    (lengths[0], lengths[1])
}

/// Returns `true` if the piece at `pos` sits in a horizontal or vertical run
/// of at least `MIN_RUN_LENGTH`.
pub fn creates_match_at(grid: &Grid, pos: Position) -> bool {
    let (horizontal, vertical) = run_lengths_at(grid, pos);
    horizontal >= MIN_RUN_LENGTH || vertical >= MIN_RUN_LENGTH
}
