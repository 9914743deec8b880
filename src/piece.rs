//! Piece identity, color and position types shared by every board component.

use std::fmt;

/// Symbols used to render and parse piece types, indexed by `PieceType`.
const PIECE_SYMBOLS: [char; 8] = ['R', 'G', 'B', 'Y', 'P', 'O', 'C', 'W'];

/// ANSI background color codes, indexed by `PieceType`.
const PIECE_ANSI_CODES: [&str; 8] = ["41", "42", "44", "43", "45", "101", "46", "47"];

/// The largest number of distinct piece types a board may be configured with.
pub const MAX_PIECE_TYPES: usize = PIECE_SYMBOLS.len();

/// The color of a piece, drawn from a closed set of `0..piece_types`.
///
/// The set size is a configuration parameter; only the first `piece_types`
/// indices are ever generated for a given engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceType(u8);

impl PieceType {
    /// Creates a piece type from its index.
    ///
    /// # Panics
    /// Panics if `index >= MAX_PIECE_TYPES`.
    pub fn new(index: usize) -> Self {
        assert!(
            index < MAX_PIECE_TYPES,
            "piece type index {} out of range (max {})",
            index,
            MAX_PIECE_TYPES
        );
        PieceType(index as u8)
    }

    /// Returns the index of this type within the configured type set.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Converts the piece type to its character representation.
    ///
    /// # Examples
    ///
    /// ```
    /// use match3_engine::piece::PieceType;
    /// assert_eq!(PieceType::new(0).to_char(), 'R');
    /// assert_eq!(PieceType::new(4).to_char(), 'P');
    /// ```
    pub fn to_char(self) -> char {
        PIECE_SYMBOLS[self.index()]
    }

    /// Parses a piece type from its character representation.
    pub fn from_char(symbol: char) -> Option<Self> {
        PIECE_SYMBOLS
            .iter()
            .position(|&s| s == symbol)
            .map(PieceType::new)
    }

    /// Returns the ANSI color code string for terminal output.
    pub(crate) fn to_ansi_color_code(self) -> &'static str {
        PIECE_ANSI_CODES[self.index()]
    }
}

/// Unique identity of a piece for its whole lifetime on a board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(pub(crate) u64);

impl PieceId {
    /// Returns the raw identity value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A cell coordinate. Row 0 is the bottom row; ordering is row-major.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub column: usize,
}

impl Position {
    /// Creates a position.
    ///
    /// # Arguments
    /// * `row` - Row index, counted from the bottom.
    /// * `column` - Column index, counted from the left.
    pub fn new(row: usize, column: usize) -> Self {
        Position { row, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// A piece on the board.
///
/// `row` and `column` always agree with the cell that holds the piece; only
/// `Grid` operations rewrite them, in the same step as the cell update.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    pub(crate) id: PieceId,
    pub(crate) kind: PieceType,
    pub(crate) row: usize,
    pub(crate) column: usize,
}

impl Piece {
    /// The identity this piece keeps until it is removed.
    pub fn id(&self) -> PieceId {
        self.id
    }

    /// The piece's color.
    pub fn kind(&self) -> PieceType {
        self.kind
    }

    /// Row of the cell holding the piece.
    pub fn row(&self) -> usize {
        self.row
    }

    /// Column of the cell holding the piece.
    pub fn column(&self) -> usize {
        self.column
    }

    /// Returns the cell holding the piece as a `Position`.
    pub fn position(&self) -> Position {
        Position::new(self.row, self.column)
    }
}

/// A single piece move produced by collapse or shuffle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Relocation {
    pub id: PieceId,
    pub from: Position,
    pub to: Position,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piece_type_symbols_round_trip() {
        for index in 0..MAX_PIECE_TYPES {
            let kind = PieceType::new(index);
            assert_eq!(PieceType::from_char(kind.to_char()), Some(kind));
        }
        assert_eq!(PieceType::from_char('.'), None);
        assert_eq!(PieceType::from_char('X'), None);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_piece_type_out_of_range_panics() {
        PieceType::new(MAX_PIECE_TYPES);
    }

    #[test]
    fn test_position_ordering_is_row_major() {
        let mut positions = vec![
            Position::new(1, 0),
            Position::new(0, 2),
            Position::new(0, 1),
        ];
        positions.sort();
        assert_eq!(
            positions,
            vec![Position::new(0, 1), Position::new(0, 2), Position::new(1, 0)]
        );
    }
}
