//! Initial board generation.

use crate::config::EngineConfig;
use crate::error::EngineWarning;
use crate::gravity::random_piece_type;
use crate::grid::Grid;
use crate::moves::has_any_valid_move;
use crate::piece::{PieceType, Position};
use crate::shuffle::shuffle;
use log::warn;
use rand::Rng;

/// A freshly generated board and anything that went wrong building it.
#[derive(Clone, Debug)]
pub struct GeneratedBoard {
    pub grid: Grid,
    pub warnings: Vec<EngineWarning>,
}

/// Would placing `kind` at `pos` complete a run with the two cells to its left
/// or the two cells below? Those are the only neighbours already filled when
/// generating in row-major order from the bottom.
fn completes_run(grid: &Grid, pos: Position, kind: PieceType) -> bool {
    let same = |row: usize, column: usize| grid.kind_at(Position::new(row, column)) == Some(kind);
    let left = pos.column >= 2 && same(pos.row, pos.column - 1) && same(pos.row, pos.column - 2);
    let below = pos.row >= 2 && same(pos.row - 1, pos.column) && same(pos.row - 2, pos.column);
    left || below
}

/// Fills a new `config.width x config.height` grid with random pieces.
///
/// With `avoid_instant_matches`, each cell is redrawn up to
/// `max_generation_retries` times while it would complete a run; past that
/// budget the last draw is kept and a warning recorded. A board with no
/// legal move is then shuffled.
///
/// # Examples
/// ```
/// use match3_engine::config::EngineConfig;
/// use match3_engine::generate::generate_board;
/// use match3_engine::matching::find_matches;
/// use rand::rngs::SmallRng;
/// use rand::SeedableRng;
///
/// let mut rng = SmallRng::seed_from_u64(514514);
/// let board = generate_board(&EngineConfig::default(), &mut rng);
/// assert!(board.grid.is_full());
/// assert!(find_matches(&board.grid).is_empty());
/// assert!(board.warnings.is_empty());
/// ```
pub fn generate_board(config: &EngineConfig, rng: &mut impl Rng) -> GeneratedBoard {
    let mut grid = Grid::new(config.width, config.height);
    let mut warnings = Vec::new();

    for pos in grid.positions().collect::<Vec<_>>() {
        let mut kind = random_piece_type(config.piece_types, rng);
        if config.avoid_instant_matches {
            let mut retries = 0;
            while completes_run(&grid, pos, kind) {
                if retries == config.max_generation_retries {
                    warn!("could not avoid an instant match at {}", pos);
                    warnings.push(EngineWarning::GenerationRetriesExhausted { position: pos });
                    break;
                }
                kind = random_piece_type(config.piece_types, rng);
                retries += 1;
            }
        }
        grid.set(pos, Some(kind));
    }

    if !has_any_valid_move(&mut grid) {
        let outcome = shuffle(
            &mut grid,
            rng,
            config.max_shuffle_attempts,
            config.require_move_after_shuffle,
        );
        warnings.extend(outcome.warning());
    }

    GeneratedBoard { grid, warnings }
}
