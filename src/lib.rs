//! # Match-3 Engine Library
//!
//! This library provides the resolution engine of a match-3 puzzle: run
//! detection, gravity, refilling, dead-board detection and shuffling, driven
//! by a single-flight swap/cascade state machine.
//!
//! It is used by two binaries:
//! - `match3_play`: Allows interactive play via the command line.
//! - `cascade_sim`: Plays many seeded games automatically and reports cascade
//!   statistics.
//!
//! ## Modules
//! - `piece`: Piece types, identities and positions.
//! - `grid`: The board (`Grid`) and swap adjacency.
//! - `matching`: Full-board run detection and the local "does this cell match" check.
//! - `gravity`: Column collapse and refill.
//! - `moves`: Legal-move search and dead-board detection.
//! - `shuffle`: Randomised re-layout of a dead board.
//! - `generate`: Initial board generation without instant matches.
//! - `engine`: The `Engine` state machine tying everything together.
//! - `collaborators`: Traits for presentation, game flow and scoring.
//! - `config`, `error`: Configuration and error/warning types.
//! - `utils`: Building grids from text, mainly for tests.
//! - `cli`: Command-line arguments shared by the binaries.

pub mod cli;
pub mod collaborators;
pub mod config;
pub mod engine;
pub mod error;
pub mod generate;
pub mod gravity;
pub mod grid;
pub mod matching;
pub mod moves;
pub mod piece;
pub mod shuffle;
pub mod utils;
