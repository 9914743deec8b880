//! Legal-move search.

use crate::grid::Grid;
use crate::matching::creates_match_at;
use crate::piece::Position;

/// Tentatively swaps `a` and `b`, checks both cells for a run, and restores
/// the grid whatever the outcome.
///
/// Both cells must hold a piece for the swap to count.
pub fn is_productive_swap(grid: &mut Grid, a: Position, b: Position) -> bool {
    if grid.get(a).is_none() || grid.get(b).is_none() {
        return false;
    }
    grid.swap(a, b);
    let productive = creates_match_at(grid, a) || creates_match_at(grid, b);
    grid.swap(a, b);
    productive
}

/// Finds the first swap that would produce a match, scanning cells row-major
/// and trying each cell's right neighbour, then its upper neighbour.
///
/// The grid is left exactly as it was found.
pub fn find_valid_move(grid: &mut Grid) -> Option<(Position, Position)> {
    let cells: Vec<Position> = grid.positions().collect();
    for pos in cells {
        if grid.get(pos).is_none() {
            continue;
        }
        let right = Position::new(pos.row, pos.column + 1);
        let up = Position::new(pos.row + 1, pos.column);
        for other in [right, up] {
            if grid.contains(other) && is_productive_swap(grid, pos, other) {
                return Some((pos, other));
            }
        }
    }
    None
}

/// Returns `true` if at least one adjacent swap anywhere on the board would
/// produce a match. A board where this is `false` is dead.
///
/// # Examples
/// ```
/// use match3_engine::moves::has_any_valid_move;
/// use match3_engine::utils::grid_from_rows;
///
/// let mut live = grid_from_rows(&["RGRR"]).unwrap();
/// assert!(has_any_valid_move(&mut live));
///
/// let mut dead = grid_from_rows(&["RGBY", "GBYR"]).unwrap();
/// assert!(!has_any_valid_move(&mut dead));
/// ```
pub fn has_any_valid_move(grid: &mut Grid) -> bool {
    find_valid_move(grid).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::grid_from_rows;

    #[test]
    fn test_productive_horizontal_swap() {
        let mut grid = grid_from_rows(&["RRGR"]).unwrap();
        let before = grid.clone();
        assert!(is_productive_swap(&mut grid, Position::new(0, 2), Position::new(0, 3)));
        assert_eq!(grid, before);
    }

    #[test]
    fn test_productive_vertical_swap() {
        let mut grid = grid_from_rows(&["R.", "R.", "GR"]).unwrap();
        assert!(is_productive_swap(&mut grid, Position::new(0, 0), Position::new(0, 1)));
    }

    #[test]
    fn test_unproductive_swap_is_restored() {
        let mut grid = grid_from_rows(&["RGBY"]).unwrap();
        let before = grid.clone();
        assert!(!is_productive_swap(&mut grid, Position::new(0, 0), Position::new(0, 1)));
        assert_eq!(grid, before);
    }

    #[test]
    fn test_swap_with_empty_cell_is_never_productive() {
        let mut grid = grid_from_rows(&["RR.R"]).unwrap();
        assert!(!is_productive_swap(&mut grid, Position::new(0, 2), Position::new(0, 3)));
    }

    #[test]
    fn test_find_valid_move_reports_first_pair() {
        let mut grid = grid_from_rows(&["GBY", "RRB", "BGR"]).unwrap();
        // Swapping (0,2) R up with (1,2) B puts R beside the RR pair.
        assert_eq!(
            find_valid_move(&mut grid),
            Some((Position::new(0, 2), Position::new(1, 2)))
        );
    }

    #[test]
    fn test_dead_board() {
        let mut grid = grid_from_rows(&["RGB", "GBR", "BRG"]).unwrap();
        let before = grid.clone();
        assert!(!has_any_valid_move(&mut grid));
        assert_eq!(grid, before);
    }

    #[test]
    fn test_empty_board_is_dead() {
        let mut grid = Grid::new(4, 4);
        assert!(!has_any_valid_move(&mut grid));
    }
}
