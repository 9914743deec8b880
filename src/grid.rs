//! The board: a fixed `width x height` matrix of optional piece slots.
//!
//! Every operation that moves a piece rewrites the piece's own `row`/`column`
//! in the same step as the cell update, so a piece always agrees with the
//! cell holding it.

use crate::piece::{Piece, PieceId, PieceType, Position};
use std::collections::HashSet;
use std::fmt;

/// Returns `true` iff `a` and `b` are orthogonal neighbours.
///
/// The same position is never adjacent to itself.
///
/// # Examples
/// ```
/// use match3_engine::grid::is_adjacent;
/// use match3_engine::piece::Position;
/// assert!(is_adjacent(Position::new(2, 3), Position::new(2, 4)));
/// assert!(!is_adjacent(Position::new(2, 3), Position::new(3, 4)));
/// assert!(!is_adjacent(Position::new(2, 3), Position::new(2, 3)));
/// ```
pub fn is_adjacent(a: Position, b: Position) -> bool {
    a.row.abs_diff(b.row) + a.column.abs_diff(b.column) == 1
}

/// A rectangular board of cells, each either empty or holding one piece.
///
/// Dimensions are fixed at construction. Row 0 is the bottom row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Option<Piece>>,
    next_id: u64,
}

impl Grid {
    /// Creates an empty grid.
    ///
    /// # Panics
    /// Panics if either dimension is zero.
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "grid dimensions must be non-zero");
        Grid {
            width,
            height,
            cells: vec![None; width * height],
            next_id: 0,
        }
    }

    /// Returns the number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns `true` if `pos` lies inside the board.
    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.height && pos.column < self.width
    }

    fn index(&self, pos: Position) -> usize {
        assert!(
            self.contains(pos),
            "position {} outside {}x{} grid",
            pos,
            self.width,
            self.height
        );
        pos.row * self.width + pos.column
    }

    /// Returns the piece at `pos`, if any.
    ///
    /// # Panics
    /// Panics if `pos` is outside the board.
    pub fn get(&self, pos: Position) -> Option<Piece> {
        self.cells[self.index(pos)]
    }

    /// Returns the type of the piece at `pos`, if any.
    ///
    /// # Panics
    /// Panics if `pos` is outside the board.
    pub fn kind_at(&self, pos: Position) -> Option<PieceType> {
        self.get(pos).map(|piece| piece.kind)
    }

    /// Empties the cell at `pos` or fills it with a brand-new piece.
    ///
    /// Any piece previously in the cell is dropped. Returns the new piece's id.
    ///
    /// # Panics
    /// Panics if `pos` is outside the board.
    pub fn set(&mut self, pos: Position, kind: Option<PieceType>) -> Option<PieceId> {
        match kind {
            Some(kind) => Some(self.spawn(pos, kind).id),
            None => {
                self.take(pos);
                None
            }
        }
    }

    /// Creates a piece of `kind` at `pos` with a fresh identity.
    pub(crate) fn spawn(&mut self, pos: Position, kind: PieceType) -> Piece {
        let idx = self.index(pos);
        let piece = Piece {
            id: PieceId(self.next_id),
            kind,
            row: pos.row,
            column: pos.column,
        };
        self.next_id += 1;
        self.cells[idx] = Some(piece);
        piece
    }

    /// Removes and returns the piece at `pos`.
    ///
    /// # Panics
    /// Panics if `pos` is outside the board.
    pub fn take(&mut self, pos: Position) -> Option<Piece> {
        let idx = self.index(pos);
        self.cells[idx].take()
    }

    /// Puts an existing piece into `pos`, rewriting its coordinates.
    pub(crate) fn place(&mut self, pos: Position, mut piece: Piece) {
        let idx = self.index(pos);
        piece.row = pos.row;
        piece.column = pos.column;
        self.cells[idx] = Some(piece);
    }

    /// Exchanges the contents of two cells. Either cell may be empty.
    ///
    /// # Panics
    /// Panics if either position is outside the board.
    pub fn swap(&mut self, a: Position, b: Position) {
        let ia = self.index(a);
        let ib = self.index(b);
        self.cells.swap(ia, ib);
        for (idx, pos) in [(ia, a), (ib, b)] {
            if let Some(piece) = self.cells[idx].as_mut() {
                piece.row = pos.row;
                piece.column = pos.column;
            }
        }
    }

    /// Finds the cell holding the piece `id` by scanning the whole board.
    pub fn locate(&self, id: PieceId) -> Option<Position> {
        self.pieces()
            .find(|piece| piece.id == id)
            .map(|piece| piece.position())
    }

    /// Removes the piece `id`, looking first at the cell it was last seen in and
    /// falling back to a full search. Returns `None` if the piece is gone.
    pub fn remove_piece(&mut self, id: PieceId, recorded: Position) -> Option<Piece> {
        if self.contains(recorded) && self.get(recorded).is_some_and(|p| p.id == id) {
            return self.take(recorded);
        }
        let actual = self.locate(id)?;
        self.take(actual)
    }

    /// Iterates over every piece in row-major order (bottom row first).
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> + '_ {
        self.cells.iter().flatten()
    }

    /// Iterates over every cell position in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let width = self.width;
        (0..self.width * self.height).map(move |idx| Position::new(idx / width, idx % width))
    }

    /// Positions of every empty cell, in row-major order.
    pub fn empty_positions(&self) -> Vec<Position> {
        self.positions()
            .filter(|&pos| self.get(pos).is_none())
            .collect()
    }

    /// Number of cells holding a piece.
    pub fn occupied_count(&self) -> usize {
        self.pieces().count()
    }

    /// Returns `true` if no cell is empty.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Checks that every piece agrees with its cell and that no identity
    /// appears twice.
    pub fn is_coherent(&self) -> bool {
        let mut seen = HashSet::new();
        self.positions().all(|pos| match self.get(pos) {
            Some(piece) => piece.position() == pos && seen.insert(piece.id),
            None => true,
        })
    }

    /// Renders the board for a terminal, top row first, with row and column
    /// labels and ANSI colors. Cells listed in `highlight` are marked.
    pub fn to_string_with_highlight(&self, highlight: &[Position]) -> String {
        let mut output = String::new();

        output.push_str("  ");
        for c in 0..self.width {
            output.push_str(&format!("{:<2}", c));
        }
        output.push('\n');

        for r in (0..self.height).rev() {
            output.push_str(&format!("{:<2}", r));
            for c in 0..self.width {
                let pos = Position::new(r, c);
                let color_code = self.kind_at(pos).map_or("40", |k| k.to_ansi_color_code());
                let content = if highlight.contains(&pos) { ".." } else { "  " };
                output.push_str(&format!("\x1b[1;{};m{}\x1b[m", color_code, content));
            }
            if r > 0 {
                output.push('\n');
            }
        }

        output
    }
}

impl fmt::Display for Grid {
    /// One line per row, top row first; `.` marks an empty cell.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in (0..self.height).rev() {
            for c in 0..self.width {
                let symbol = self.kind_at(Position::new(r, c)).map_or('.', |k| k.to_char());
                write!(f, "{}", symbol)?;
            }
            if r > 0 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::grid_from_rows;

    fn red() -> PieceType {
        PieceType::new(0)
    }

    #[test]
    fn test_new_grid_is_empty() {
        let grid = Grid::new(5, 4);
        assert_eq!(grid.width(), 5);
        assert_eq!(grid.height(), 4);
        assert_eq!(grid.occupied_count(), 0);
        assert_eq!(grid.empty_positions().len(), 20);
    }

    #[test]
    fn test_set_and_get() {
        let mut grid = Grid::new(3, 3);
        let id = grid.set(Position::new(1, 2), Some(red())).unwrap();
        let piece = grid.get(Position::new(1, 2)).unwrap();
        assert_eq!(piece.id(), id);
        assert_eq!(piece.kind(), red());
        assert_eq!(piece.position(), Position::new(1, 2));

        assert_eq!(grid.set(Position::new(1, 2), None), None);
        assert_eq!(grid.get(Position::new(1, 2)), None);
    }

    #[test]
    fn test_fresh_pieces_get_distinct_ids() {
        let mut grid = Grid::new(2, 1);
        let a = grid.set(Position::new(0, 0), Some(red()));
        let b = grid.set(Position::new(0, 1), Some(red()));
        assert_ne!(a, b);
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn test_out_of_bounds_get_panics() {
        let grid = Grid::new(3, 3);
        grid.get(Position::new(3, 0));
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn test_out_of_bounds_set_panics() {
        let mut grid = Grid::new(3, 3);
        grid.set(Position::new(0, 7), Some(red()));
    }

    #[test]
    fn test_swap_updates_piece_coordinates() {
        let mut grid = grid_from_rows(&["RG"]).unwrap();
        let left = grid.get(Position::new(0, 0)).unwrap();
        let right = grid.get(Position::new(0, 1)).unwrap();

        grid.swap(Position::new(0, 0), Position::new(0, 1));

        let now_left = grid.get(Position::new(0, 0)).unwrap();
        let now_right = grid.get(Position::new(0, 1)).unwrap();
        assert_eq!(now_left.id(), right.id());
        assert_eq!(now_right.id(), left.id());
        assert_eq!(now_left.position(), Position::new(0, 0));
        assert_eq!(now_right.position(), Position::new(0, 1));
        assert!(grid.is_coherent());
    }

    #[test]
    fn test_swap_with_empty_cell() {
        let mut grid = grid_from_rows(&["R."]).unwrap();
        grid.swap(Position::new(0, 0), Position::new(0, 1));
        assert_eq!(grid.get(Position::new(0, 0)), None);
        assert_eq!(
            grid.get(Position::new(0, 1)).unwrap().position(),
            Position::new(0, 1)
        );
    }

    #[test]
    fn test_swap_twice_restores_grid() {
        let mut grid = grid_from_rows(&["RGB", "YPR"]).unwrap();
        let before = grid.clone();
        grid.swap(Position::new(0, 1), Position::new(1, 1));
        grid.swap(Position::new(0, 1), Position::new(1, 1));
        assert_eq!(grid, before);
    }

    #[test]
    fn test_is_adjacent() {
        let center = Position::new(2, 2);
        assert!(is_adjacent(center, Position::new(1, 2)));
        assert!(is_adjacent(center, Position::new(3, 2)));
        assert!(is_adjacent(center, Position::new(2, 1)));
        assert!(is_adjacent(center, Position::new(2, 3)));
        assert!(!is_adjacent(center, center));
        assert!(!is_adjacent(center, Position::new(3, 3)));
        assert!(!is_adjacent(center, Position::new(2, 4)));
        assert!(!is_adjacent(center, Position::new(0, 2)));
    }

    #[test]
    fn test_locate_and_remove_piece() {
        let mut grid = grid_from_rows(&["RGB"]).unwrap();
        let green = grid.get(Position::new(0, 1)).unwrap();
        assert_eq!(grid.locate(green.id()), Some(Position::new(0, 1)));

        let removed = grid.remove_piece(green.id(), Position::new(0, 1)).unwrap();
        assert_eq!(removed.id(), green.id());
        assert_eq!(grid.locate(green.id()), None);
        assert_eq!(grid.remove_piece(green.id(), Position::new(0, 1)), None);
    }

    #[test]
    fn test_remove_piece_falls_back_to_search() {
        let mut grid = grid_from_rows(&["RGB"]).unwrap();
        let blue = grid.get(Position::new(0, 2)).unwrap();
        // Stale record pointing at another piece's cell.
        let removed = grid.remove_piece(blue.id(), Position::new(0, 0)).unwrap();
        assert_eq!(removed.id(), blue.id());
        assert!(grid.get(Position::new(0, 0)).is_some());
        assert_eq!(grid.get(Position::new(0, 2)), None);
    }

    #[test]
    fn test_is_coherent_detects_duplicates() {
        let mut grid = grid_from_rows(&["RG"]).unwrap();
        assert!(grid.is_coherent());
        let red_piece = grid.get(Position::new(0, 0)).unwrap();
        grid.place(Position::new(0, 1), red_piece);
        assert!(!grid.is_coherent());
    }

    #[test]
    fn test_display_is_top_row_first() {
        let grid = grid_from_rows(&["R..", ".G.", "..B"]).unwrap();
        assert_eq!(grid.to_string(), "R..\n.G.\n..B");
        assert_eq!(grid.kind_at(Position::new(0, 2)), PieceType::from_char('B'));
        assert_eq!(grid.kind_at(Position::new(2, 0)), PieceType::from_char('R'));
    }

    #[test]
    fn test_highlight_rendering_has_labels() {
        let grid = grid_from_rows(&["RG", "BY"]).unwrap();
        let rendered = grid.to_string_with_highlight(&[Position::new(0, 0)]);
        assert!(rendered.starts_with("  0 1 "));
        assert_eq!(rendered.lines().count(), 3);
        assert!(rendered.contains(".."));
    }
}
