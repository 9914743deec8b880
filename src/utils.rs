use crate::error::ParseError;
use crate::grid::Grid;
use crate::piece::{PieceType, Position};

/// Parses an array of string slices into a `Grid`.
///
/// Rows are listed the way they look on screen: the first string is the
/// **top** row, the last string is row 0. Every row must have the same
/// number of characters; that length becomes the grid width.
///
/// Valid characters are the piece symbols `R G B Y P O C W` and `.` for an
/// empty cell. Each piece gets a fresh identity.
///
/// This is the supported way to build a specific board for tests and
/// scripted scenarios.
///
/// # Examples
/// ```
/// use match3_engine::utils::grid_from_rows;
/// use match3_engine::piece::{PieceType, Position};
///
/// let grid = grid_from_rows(&[
///     "RG.", // top row (row 1)
///     "B.P", // bottom row (row 0)
/// ])
/// .unwrap();
/// assert_eq!(grid.width(), 3);
/// assert_eq!(grid.height(), 2);
/// assert_eq!(grid.kind_at(Position::new(1, 0)), PieceType::from_char('R'));
/// assert_eq!(grid.kind_at(Position::new(0, 1)), None);
///
/// assert!(grid_from_rows(&["RXB"]).is_err());
/// assert!(grid_from_rows(&["RGB", "RG"]).is_err());
/// ```
pub fn grid_from_rows(rows: &[&str]) -> Result<Grid, ParseError> {
    let width = rows.first().map_or(0, |row| row.chars().count());
    if width == 0 {
        return Err(ParseError::Empty);
    }

    let height = rows.len();
    let mut grid = Grid::new(width, height);

    for (line, row_str) in rows.iter().enumerate() {
        let found = row_str.chars().count();
        if found != width {
            return Err(ParseError::RaggedRow {
                line,
                expected: width,
                found,
            });
        }

        let row = height - 1 - line;
        for (column, symbol) in row_str.chars().enumerate() {
            if symbol == '.' {
                continue;
            }
            let kind = PieceType::from_char(symbol).ok_or(ParseError::UnknownSymbol {
                symbol,
                line,
                column,
            })?;
            grid.set(Position::new(row, column), Some(kind));
        }
    }
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_from_rows_valid() {
        let grid = grid_from_rows(&["RGYBP", ".....", "PBYGR"]).unwrap();
        assert_eq!(grid.width(), 5);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.kind_at(Position::new(2, 0)), PieceType::from_char('R'));
        assert_eq!(grid.kind_at(Position::new(1, 0)), None);
        assert_eq!(grid.kind_at(Position::new(0, 0)), PieceType::from_char('P'));
        assert_eq!(grid.occupied_count(), 10);
        assert!(grid.is_coherent());
    }

    #[test]
    fn test_grid_from_rows_invalid_char() {
        let result = grid_from_rows(&["RGYBX"]);
        assert_eq!(
            result.unwrap_err(),
            ParseError::UnknownSymbol {
                symbol: 'X',
                line: 0,
                column: 4
            }
        );
    }

    #[test]
    fn test_grid_from_rows_with_spaces() {
        let result = grid_from_rows(&["R G"]);
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("unrecognized character ' '"));
    }

    #[test]
    fn test_grid_from_rows_ragged() {
        let result = grid_from_rows(&["RGB", "RG"]);
        assert_eq!(
            result.unwrap_err(),
            ParseError::RaggedRow {
                line: 1,
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn test_grid_from_rows_empty_input() {
        let no_rows: [&str; 0] = [];
        assert_eq!(grid_from_rows(&no_rows).unwrap_err(), ParseError::Empty);
        assert_eq!(grid_from_rows(&[""]).unwrap_err(), ParseError::Empty);
    }

    #[test]
    fn test_grid_from_rows_display_round_trip() {
        let rows = ["R.G", ".B.", "YYP"];
        let grid = grid_from_rows(&rows).unwrap();
        assert_eq!(grid.to_string(), rows.join("\n"));
    }
}
