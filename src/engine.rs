//! The resolution loop.
//!
//! `Engine` owns the board and turns one accepted swap into a settled board:
//!
//! ```text
//! Idle -> SwapPending -> Reverting -> Idle
//!                     \-> Cascading -> Idle
//! ```
//!
//! The engine does no timing of its own. Whenever a step asks the piece
//! collaborator to move or spawn pieces, those pieces become pending and the
//! next step only runs once `is_moving` is false for all of them. Callers drive
//! the machine with `poll` (once per frame, say) or `settle` when movements
//! finish instantly.
//!
//! Only one swap or cascade is in flight at a time; swap requests made while
//! the engine is busy are rejected, not queued.

use crate::collaborators::{PieceLifecycle, Services};
use crate::config::EngineConfig;
use crate::error::{ConfigError, EngineWarning, SwapRejection};
use crate::generate::generate_board;
use crate::grid::{is_adjacent, Grid};
use crate::matching::{creates_match_at, find_matches, MatchSet};
use crate::moves::{find_valid_move, has_any_valid_move};
use crate::piece::{PieceId, Position, Relocation};
use crate::shuffle::shuffle;
use log::{debug, warn};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::time::Duration;

/// Coarse view of what the engine is doing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    SwapPending,
    Reverting,
    Cascading,
}

/// Summary of one cascade, from the first removal to a stable board.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CascadeReport {
    /// Remove/collapse/refill rounds performed.
    pub iterations: usize,
    pub removed: usize,
    pub spawned: usize,
    pub shuffles: usize,
    pub warnings: Vec<EngineWarning>,
}

/// Result of advancing the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Progress {
    /// Nothing in flight.
    Idle,
    /// Blocked on piece movement.
    Waiting,
    /// The swap made no match and has been undone.
    Reverted,
    /// The cascade finished.
    Settled(CascadeReport),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    Remove,
    Collapse,
    Refill,
    CheckMoves,
}

#[derive(Clone, Debug)]
enum State {
    Idle,
    SwapPending { a: Position, b: Position },
    Reverting,
    Cascading { stage: Stage, report: CascadeReport },
}

/// The match-3 resolution engine.
///
/// Owns the `Grid`, the seeded random source used for refills and shuffles,
/// and the state of the swap or cascade in flight. Collaborators are passed in
/// as `Services` on every call rather than stored.
pub struct Engine {
    config: EngineConfig,
    grid: Grid,
    rng: SmallRng,
    state: State,
    pending: Vec<PieceId>,
    generation_warnings: Vec<EngineWarning>,
}

impl Engine {
    /// Builds an engine with a freshly generated board.
    ///
    /// The same `seed` always produces the same board and the same refills.
    pub fn new(config: EngineConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = SmallRng::seed_from_u64(seed);
        let generated = generate_board(&config, &mut rng);
        Ok(Engine {
            config,
            grid: generated.grid,
            rng,
            state: State::Idle,
            pending: Vec::new(),
            generation_warnings: generated.warnings,
        })
    }

    /// Builds an engine around an existing grid, e.g. one parsed with
    /// `utils::grid_from_rows`.
    ///
    /// The grid must match the configured dimensions and only use configured
    /// piece types. It is taken as-is, even if it already contains matches.
    pub fn with_grid(config: EngineConfig, grid: Grid, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        if grid.width() != config.width || grid.height() != config.height {
            return Err(ConfigError::GridMismatch {
                width: config.width,
                height: config.height,
                actual_width: grid.width(),
                actual_height: grid.height(),
            });
        }
        if let Some(piece) = grid.pieces().find(|p| p.kind().index() >= config.piece_types) {
            return Err(ConfigError::UnknownPieceType {
                found: piece.kind().to_char(),
                piece_types: config.piece_types,
            });
        }
        Ok(Engine {
            config,
            grid,
            rng: SmallRng::seed_from_u64(seed),
            state: State::Idle,
            pending: Vec::new(),
            generation_warnings: Vec::new(),
        })
    }

    /// The current board.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Warnings raised while generating the initial board.
    pub fn generation_warnings(&self) -> &[EngineWarning] {
        &self.generation_warnings
    }

    /// Returns what the engine is currently doing.
    pub fn phase(&self) -> Phase {
        match self.state {
            State::Idle => Phase::Idle,
            State::SwapPending { .. } => Phase::SwapPending,
            State::Reverting => Phase::Reverting,
            State::Cascading { .. } => Phase::Cascading,
        }
    }

    /// `true` while a cascade runs. Flow logic should defer end-of-game
    /// checks until this is `false`.
    pub fn is_resolving(&self) -> bool {
        self.phase() == Phase::Cascading
    }

    /// `true` while a swap is being applied or undone.
    pub fn swap_in_progress(&self) -> bool {
        matches!(self.phase(), Phase::SwapPending | Phase::Reverting)
    }

    /// Spawns every piece currently on the board, e.g. for the first frame.
    pub fn announce_board(&self, pieces: &mut dyn PieceLifecycle) {
        for piece in self.grid.pieces() {
            pieces.spawn(piece);
        }
    }

    /// A productive swap, if the engine is idle and one exists.
    pub fn hint(&mut self) -> Option<(Position, Position)> {
        match self.state {
            State::Idle => find_valid_move(&mut self.grid),
            _ => None,
        }
    }

    /// Input entry point: accepts or rejects a swap between `a` and `b`.
    ///
    /// An accepted swap is applied immediately; whether it is kept is decided
    /// by subsequent calls to `poll`.
    ///
    /// # Arguments
    /// * `a`, `b` - The two cells to exchange; they must be adjacent and occupied.
    /// * `services` - Collaborators notified of the swap animation.
    ///
    /// # Returns
    /// `false` if the engine is busy or the swap is invalid.
    pub fn request_swap(&mut self, a: Position, b: Position, services: &mut Services<'_>) -> bool {
        match self.try_swap(a, b, services) {
            Ok(()) => true,
            Err(rejection) => {
                debug!("swap {} <-> {} rejected: {}", a, b, rejection);
                false
            }
        }
    }

    /// Like `request_swap`, but says why a swap was rejected.
    pub fn try_swap(
        &mut self,
        a: Position,
        b: Position,
        services: &mut Services<'_>,
    ) -> Result<(), SwapRejection> {
        if !matches!(self.state, State::Idle) {
            return Err(SwapRejection::Busy);
        }
        for pos in [a, b] {
            if !self.grid.contains(pos) {
                return Err(SwapRejection::OutOfBounds(pos));
            }
        }
        if !is_adjacent(a, b) {
            return Err(SwapRejection::NotAdjacent(a, b));
        }
        for pos in [a, b] {
            if self.grid.get(pos).is_none() {
                return Err(SwapRejection::EmptyCell(pos));
            }
        }

        self.grid.swap(a, b);
        self.animate_swap(a, b, services);
        self.state = State::SwapPending { a, b };
        Ok(())
    }

    /// Advances the machine as far as it can go without waiting on movement.
    pub fn poll(&mut self, services: &mut Services<'_>) -> Progress {
        loop {
            if self.pending.iter().any(|&id| services.pieces.is_moving(id)) {
                return Progress::Waiting;
            }
            self.pending.clear();

            match std::mem::replace(&mut self.state, State::Idle) {
                State::Idle => return Progress::Idle,
                State::SwapPending { a, b } => {
                    if creates_match_at(&self.grid, a) || creates_match_at(&self.grid, b) {
                        debug!("swap {} <-> {} matched; cascading", a, b);
                        services.flow.pause();
                        self.state = State::Cascading {
                            stage: Stage::Remove,
                            report: CascadeReport::default(),
                        };
                    } else {
                        debug!("swap {} <-> {} made no match; reverting", a, b);
                        self.grid.swap(a, b);
                        self.animate_swap(a, b, services);
                        self.state = State::Reverting;
                    }
                }
                State::Reverting => return Progress::Reverted,
                State::Cascading { stage, mut report } => {
                    match self.cascade_step(stage, &mut report, services) {
                        Some(next) => self.state = State::Cascading { stage: next, report },
                        None => {
                            debug!(
                                "cascade settled: {} iteration(s), {} removed, {} shuffle(s)",
                                report.iterations, report.removed, report.shuffles
                            );
                            services.flow.resume();
                            return Progress::Settled(report);
                        }
                    }
                }
            }
        }
    }

    /// Polls until the engine is no longer waiting on movement.
    ///
    /// Spins for as long as the piece collaborator reports movement, so only
    /// use this with collaborators whose movements complete on their own.
    pub fn settle(&mut self, services: &mut Services<'_>) -> Progress {
        loop {
            match self.poll(services) {
                Progress::Waiting => continue,
                progress => return progress,
            }
        }
    }

    /// Runs one cascade sub-step and returns the next one, or `None` once the
    /// board is stable or the iteration ceiling is hit.
    fn cascade_step(
        &mut self,
        stage: Stage,
        report: &mut CascadeReport,
        services: &mut Services<'_>,
    ) -> Option<Stage> {
        match stage {
            Stage::Remove => {
                let matches = find_matches(&self.grid);
                if matches.is_empty() {
                    return None;
                }
                if report.iterations >= self.config.max_cascade_iterations {
                    let warning = EngineWarning::CascadeCeilingReached {
                        iterations: report.iterations,
                    };
                    warn!("{}", warning);
                    report.warnings.push(warning);
                    return None;
                }
                let removed = self.remove_matches(&matches, report, services);
                if removed == 0 {
                    return None;
                }
                report.iterations += 1;
                report.removed += removed;
                services.score.on_pieces_removed(removed);
                debug!("cascade round {}: removed {}", report.iterations, removed);
                Some(Stage::Collapse)
            }
            Stage::Collapse => {
                let falls = self.grid.collapse();
                let duration = self.config.fall_duration;
                self.animate(&falls, duration, services);
                Some(Stage::Refill)
            }
            Stage::Refill => {
                let spawned = self.grid.refill(self.config.piece_types, &mut self.rng);
                for piece in &spawned {
                    services.pieces.spawn(piece);
                    self.pending.push(piece.id());
                }
                report.spawned += spawned.len();
                Some(Stage::CheckMoves)
            }
            Stage::CheckMoves => {
                if !has_any_valid_move(&mut self.grid) {
                    debug!("dead board; shuffling");
                    let outcome = shuffle(
                        &mut self.grid,
                        &mut self.rng,
                        self.config.max_shuffle_attempts,
                        self.config.require_move_after_shuffle,
                    );
                    let duration = self.config.shuffle_duration;
                    self.animate(&outcome.moves, duration, services);
                    report.shuffles += 1;
                    report.warnings.extend(outcome.warning());
                }
                Some(Stage::Remove)
            }
        }
    }

    fn remove_matches(
        &mut self,
        matches: &MatchSet,
        report: &mut CascadeReport,
        services: &mut Services<'_>,
    ) -> usize {
        let mut removed = 0;
        for (id, recorded) in matches.iter() {
            match self.grid.remove_piece(id, recorded) {
                Some(piece) => {
                    services.pieces.destroy(piece.id());
                    removed += 1;
                }
                None => {
                    let warning = EngineWarning::PieceNotFound { id, recorded };
                    warn!("{}; treating the cell as clear", warning);
                    report.warnings.push(warning);
                }
            }
        }
        removed
    }

    fn animate_swap(&mut self, a: Position, b: Position, services: &mut Services<'_>) {
        let duration = self.config.swap_duration;
        for pos in [a, b] {
            if let Some(piece) = self.grid.get(pos) {
                services.pieces.move_to(piece.id(), pos, duration);
                self.pending.push(piece.id());
            }
        }
    }

    fn animate(&mut self, moves: &[Relocation], duration: Duration, services: &mut Services<'_>) {
        for relocation in moves {
            services.pieces.move_to(relocation.id, relocation.to, duration);
            self.pending.push(relocation.id);
        }
    }
}
