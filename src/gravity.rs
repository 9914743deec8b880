//! Column compaction and refilling.

use crate::grid::Grid;
use crate::piece::{Piece, PieceType, Position, Relocation};
use rand::Rng;

impl Grid {
    /// Lets every piece in `column` fall towards row 0.
    ///
    /// This is a stable compaction: surviving pieces keep their relative order
    /// and all empty cells end up above them. Returns the moves performed,
    /// lowest first; an empty result means nothing changed row.
    pub fn collapse_column(&mut self, column: usize) -> Vec<Relocation> {
        let mut moves = Vec::new();
        let mut write_row = 0;
        for read_row in 0..self.height() {
            let from = Position::new(read_row, column);
            let Some(piece) = self.get(from) else {
                continue;
            };
            if read_row != write_row {
                let to = Position::new(write_row, column);
                self.take(from);
                self.place(to, piece);
                moves.push(Relocation {
                    id: piece.id(),
                    from,
                    to,
                });
            }
            write_row += 1;
        }
        moves
    }

    /// Applies gravity to every column, left to right.
    pub fn collapse(&mut self) -> Vec<Relocation> {
        (0..self.width())
            .flat_map(|column| self.collapse_column(column))
            .collect()
    }

    /// Fills every empty cell with a new piece drawn uniformly from
    /// `0..piece_types`. Freshly spawned pieces may form matches.
    ///
    /// Returns the spawned pieces in row-major order.
    ///
    /// # Panics
    /// Panics if `piece_types` is zero or above `MAX_PIECE_TYPES`.
    pub fn refill(&mut self, piece_types: usize, rng: &mut impl Rng) -> Vec<Piece> {
        self.empty_positions()
            .into_iter()
            .map(|pos| self.spawn(pos, random_piece_type(piece_types, rng)))
            .collect()
    }
}

/// Draws a piece type uniformly from `0..piece_types`.
pub(crate) fn random_piece_type(piece_types: usize, rng: &mut impl Rng) -> PieceType {
    PieceType::new(rng.gen_range(0..piece_types))
}
