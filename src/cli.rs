//! Command-line arguments shared by the binaries.

use crate::config::{
    EngineConfig, DEFAULT_BOARD_SIZE, DEFAULT_MAX_CASCADE_ITERATIONS, DEFAULT_PIECE_TYPES,
};
use clap::Args;

/// Board shape and engine limits.
#[derive(Args, Debug, Clone)]
pub struct BoardArgs {
    /// Board width in cells
    #[clap(long, default_value_t = DEFAULT_BOARD_SIZE)]
    pub width: usize,

    /// Board height in cells
    #[clap(long, default_value_t = DEFAULT_BOARD_SIZE)]
    pub height: usize,

    /// Number of distinct piece types (1-8)
    #[clap(short = 't', long, default_value_t = DEFAULT_PIECE_TYPES)]
    pub types: usize,

    /// Seed for board generation and refills
    #[clap(short, long, default_value_t = 514514)]
    pub seed: u64,

    /// Safety ceiling on cascade rounds per swap
    #[clap(long, default_value_t = DEFAULT_MAX_CASCADE_ITERATIONS)]
    pub max_cascades: usize,

    /// Allow the initial board to contain matches
    #[clap(long)]
    pub allow_instant_matches: bool,
}

impl BoardArgs {
    pub fn to_config(&self) -> EngineConfig {
        EngineConfig {
            width: self.width,
            height: self.height,
            piece_types: self.types,
            avoid_instant_matches: !self.allow_instant_matches,
            max_cascade_iterations: self.max_cascades,
            ..EngineConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[clap(flatten)]
        board: BoardArgs,
    }

    #[test]
    fn test_defaults_match_engine_defaults() {
        let cli = TestCli::parse_from(["test"]);
        let config = cli.board.to_config();
        let defaults = EngineConfig::default();
        assert_eq!(config, defaults);
        assert_eq!(cli.board.seed, 514514);
    }

    #[test]
    fn test_flags_map_onto_config() {
        let cli = TestCli::parse_from([
            "test",
            "--width",
            "6",
            "--height",
            "9",
            "-t",
            "4",
            "--max-cascades",
            "12",
            "--allow-instant-matches",
        ]);
        let config = cli.board.to_config();
        assert_eq!(config.width, 6);
        assert_eq!(config.height, 9);
        assert_eq!(config.piece_types, 4);
        assert_eq!(config.max_cascade_iterations, 12);
        assert!(!config.avoid_instant_matches);
    }
}
