//! Random re-layout of the pieces already on the board.

use crate::error::EngineWarning;
use crate::grid::Grid;
use crate::matching::find_matches;
use crate::moves::has_any_valid_move;
use crate::piece::{Piece, PieceId, Position, Relocation};
use log::{debug, warn};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;

/// What a call to `shuffle` did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShuffleOutcome {
    /// Layouts tried, including the accepted one.
    pub attempts: usize,
    /// `false` if the budget ran out and the last layout was kept anyway.
    pub satisfied: bool,
    /// Every piece that ended up in a different cell.
    pub moves: Vec<Relocation>,
}

impl ShuffleOutcome {
    /// The warning to surface when the attempt budget was exhausted.
    pub fn warning(&self) -> Option<EngineWarning> {
        (!self.satisfied).then_some(EngineWarning::ShuffleAttemptsExhausted {
            attempts: self.attempts,
        })
    }
}

/// Permutes the pieces on the board until the layout has no match and, if
/// `require_move` is set, at least one legal move.
///
/// Pieces are redistributed over the currently occupied cells in row-major
/// order, so empty cells stay empty and the multiset of pieces is unchanged.
/// At most `max_attempts` layouts are tried (at least one always is); if none
/// qualifies the last one stays on the board and the outcome carries a warning.
pub fn shuffle(
    grid: &mut Grid,
    rng: &mut impl Rng,
    max_attempts: usize,
    require_move: bool,
) -> ShuffleOutcome {
    let slots: Vec<Position> = grid.pieces().map(Piece::position).collect();
    let origins: HashMap<PieceId, Position> =
        grid.pieces().map(|p| (p.id(), p.position())).collect();
    let mut pieces: Vec<Piece> = slots.iter().filter_map(|&pos| grid.take(pos)).collect();

    let budget = max_attempts.max(1);
    let mut attempts = 0;
    let mut satisfied = false;
    while attempts < budget {
        attempts += 1;
        pieces.shuffle(rng);
        for (&pos, &piece) in slots.iter().zip(&pieces) {
            grid.place(pos, piece);
        }
        if find_matches(&*grid).is_empty() && (!require_move || has_any_valid_move(grid)) {
            satisfied = true;
            break;
        }
    }

    if satisfied {
        debug!("shuffle settled after {} attempt(s)", attempts);
    } else {
        warn!(
            "shuffle found no clean layout in {} attempts; keeping the last one",
            attempts
        );
    }

    let moves = slots
        .iter()
        .zip(&pieces)
        .filter_map(|(&to, piece)| {
            let from = origins[&piece.id()];
            (from != to).then_some(Relocation {
                id: piece.id(),
                from,
                to,
            })
        })
        .collect();

    ShuffleOutcome {
        attempts,
        satisfied,
        moves,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::PieceType;
    use crate::utils::grid_from_rows;
    use proptest::prelude::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn census(grid: &Grid) -> Vec<(PieceId, PieceType)> {
        let mut pieces: Vec<_> = grid.pieces().map(|p| (p.id(), p.kind())).collect();
        pieces.sort();
        pieces
    }

    #[test]
    fn test_shuffle_finds_clean_layout() {
        let mut grid = grid_from_rows(&["RRRG", "GGGB", "BBBY", "YYYR"]).unwrap();
        let before = census(&grid);
        let mut rng = SmallRng::seed_from_u64(42);

        let outcome = shuffle(&mut grid, &mut rng, 500, true);

        assert!(outcome.satisfied);
        assert_eq!(outcome.warning(), None);
        assert!(find_matches(&grid).is_empty());
        assert!(has_any_valid_move(&mut grid));
        assert_eq!(census(&grid), before);
        assert!(grid.is_coherent());
    }

    #[test]
    fn test_shuffle_exhaustion_keeps_last_layout() {
        // A single color can never avoid a match.
        let mut grid = grid_from_rows(&["RRR", "RRR"]).unwrap();
        let before = census(&grid);
        let mut rng = SmallRng::seed_from_u64(3);

        let outcome = shuffle(&mut grid, &mut rng, 5, true);

        assert!(!outcome.satisfied);
        assert_eq!(outcome.attempts, 5);
        assert_eq!(
            outcome.warning(),
            Some(EngineWarning::ShuffleAttemptsExhausted { attempts: 5 })
        );
        assert!(grid.is_full());
        assert_eq!(census(&grid), before);
    }

    #[test]
    fn test_shuffle_keeps_holes_in_place() {
        let mut grid = grid_from_rows(&["R.G", "B.Y"]).unwrap();
        let mut rng = SmallRng::seed_from_u64(9);
        shuffle(&mut grid, &mut rng, 10, false);
        assert_eq!(grid.get(Position::new(0, 1)), None);
        assert_eq!(grid.get(Position::new(1, 1)), None);
        assert_eq!(grid.occupied_count(), 4);
    }

    #[test]
    fn test_moves_describe_the_new_layout() {
        let mut grid = grid_from_rows(&["RGBY", "GBYR", "BYRG"]).unwrap();
        let mut rng = SmallRng::seed_from_u64(11);
        let outcome = shuffle(&mut grid, &mut rng, 50, false);
        for relocation in &outcome.moves {
            assert_ne!(relocation.from, relocation.to);
            assert_eq!(grid.locate(relocation.id), Some(relocation.to));
        }
    }

    proptest! {
        #[test]
        fn prop_shuffle_preserves_pieces(
            seed in any::<u64>(),
            kinds in proptest::collection::vec(0usize..4, 16),
        ) {
            let mut grid = Grid::new(4, 4);
            for (pos, kind) in grid.positions().collect::<Vec<_>>().into_iter().zip(kinds) {
                grid.set(pos, Some(PieceType::new(kind)));
            }
            let before = census(&grid);
            let mut rng = SmallRng::seed_from_u64(seed);
            shuffle(&mut grid, &mut rng, 20, true);
            prop_assert_eq!(census(&grid), before);
            prop_assert!(grid.is_coherent());
        }
    }
}
