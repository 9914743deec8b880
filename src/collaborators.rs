//! Contracts for the services the engine drives but does not own.
//!
//! The engine never renders, keeps score or runs a clock. It tells these
//! collaborators what happened and, for piece movement, waits until they
//! report the movement finished.

use crate::piece::{Piece, PieceId, Position};
use std::collections::HashSet;
use std::time::Duration;

/// Presentation of individual pieces.
pub trait PieceLifecycle {
    /// A new piece appeared on the board.
    fn spawn(&mut self, piece: &Piece);
    /// A piece was removed from the board.
    fn destroy(&mut self, id: PieceId);
    /// Start moving a piece to `target`. Completion is observed via `is_moving`.
    fn move_to(&mut self, id: PieceId, target: Position, duration: Duration);
    fn is_moving(&self, id: PieceId) -> bool;
}

/// Game-flow hooks, e.g. to stop a countdown while the board resolves.
pub trait GameFlow {
    fn pause(&mut self);
    fn resume(&mut self);
}

/// Receives removal counts; turning counts into points is up to the sink.
pub trait ScoreSink {
    fn on_pieces_removed(&mut self, count: usize);
}

/// The collaborators handed to the engine for one call.
pub struct Services<'a> {
    pub pieces: &'a mut dyn PieceLifecycle,
    pub flow: &'a mut dyn GameFlow,
    pub score: &'a mut dyn ScoreSink,
}

/// Collaborators for running without a presentation layer: every movement
/// completes immediately, pauses are tracked and removals are tallied.
#[derive(Clone, Debug, Default)]
pub struct Headless {
    pub presentation: NoPresentation,
    pub flow: FlowState,
    pub tally: Tally,
}

impl Headless {
    pub fn services(&mut self) -> Services<'_> {
        Services {
            pieces: &mut self.presentation,
            flow: &mut self.flow,
            score: &mut self.tally,
        }
    }
}

/// Piece presentation that does nothing and never animates.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoPresentation;

impl PieceLifecycle for NoPresentation {
    fn spawn(&mut self, _piece: &Piece) {}
    fn destroy(&mut self, _id: PieceId) {}
    fn move_to(&mut self, _id: PieceId, _target: Position, _duration: Duration) {}
    fn is_moving(&self, _id: PieceId) -> bool {
        false
    }
}

/// Records whether the game is paused and how often it was paused.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FlowState {
    pub paused: bool,
    pub pauses: usize,
}

impl GameFlow for FlowState {
    fn pause(&mut self) {
        self.paused = true;
        self.pauses += 1;
    }

    fn resume(&mut self) {
        self.paused = false;
    }
}

/// Sums removal counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tally {
    pub removed: usize,
    pub batches: usize,
}

impl ScoreSink for Tally {
    fn on_pieces_removed(&mut self, count: usize) {
        self.removed += count;
        self.batches += 1;
    }
}

/// Piece presentation whose movements stay in flight until `finish_all` is
/// called. Useful for driving the engine step by step.
#[derive(Clone, Debug, Default)]
pub struct ManualPresentation {
    pub live: HashSet<PieceId>,
    pub moving: HashSet<PieceId>,
    pub spawned: usize,
    pub destroyed: usize,
    pub moves_requested: usize,
}

impl ManualPresentation {
    /// Completes every movement currently in flight.
    pub fn finish_all(&mut self) {
        self.moving.clear();
    }
}

impl PieceLifecycle for ManualPresentation {
    fn spawn(&mut self, piece: &Piece) {
        self.live.insert(piece.id());
        self.spawned += 1;
    }

    fn destroy(&mut self, id: PieceId) {
        self.live.remove(&id);
        self.moving.remove(&id);
        self.destroyed += 1;
    }

    fn move_to(&mut self, id: PieceId, _target: Position, _duration: Duration) {
        self.moving.insert(id);
        self.moves_requested += 1;
    }

    fn is_moving(&self, id: PieceId) -> bool {
        self.moving.contains(&id)
    }
}
