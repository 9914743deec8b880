//! Construction-time engine configuration.

use crate::error::ConfigError;
use crate::piece::MAX_PIECE_TYPES;
use std::time::Duration;

/// Default board width and height.
pub const DEFAULT_BOARD_SIZE: usize = 8;
/// Number of base colors in the classic game.
pub const DEFAULT_PIECE_TYPES: usize = 5;
/// Safety ceiling on cascade iterations for a single swap.
pub const DEFAULT_MAX_CASCADE_ITERATIONS: usize = 64;

/// Everything an `Engine` needs to know up front. Not mutable after the
/// engine is built.
///
/// # Examples
/// ```
/// use match3_engine::config::EngineConfig;
/// let config = EngineConfig {
///     width: 6,
///     height: 9,
///     ..EngineConfig::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    pub width: usize,
    pub height: usize,
    /// Number of distinct piece types in play.
    pub piece_types: usize,
    /// Redraw cells during initial generation that would complete a run.
    pub avoid_instant_matches: bool,
    /// Redraws allowed per cell before generation accepts an instant match.
    pub max_generation_retries: usize,
    pub max_shuffle_attempts: usize,
    pub max_cascade_iterations: usize,
    /// Whether a shuffle must also leave at least one legal move.
    pub require_move_after_shuffle: bool,
    pub swap_duration: Duration,
    pub fall_duration: Duration,
    pub shuffle_duration: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            width: DEFAULT_BOARD_SIZE,
            height: DEFAULT_BOARD_SIZE,
            piece_types: DEFAULT_PIECE_TYPES,
            avoid_instant_matches: true,
            max_generation_retries: 100,
            max_shuffle_attempts: 100,
            max_cascade_iterations: DEFAULT_MAX_CASCADE_ITERATIONS,
            require_move_after_shuffle: true,
            swap_duration: Duration::from_millis(150),
            fall_duration: Duration::from_millis(200),
            shuffle_duration: Duration::from_millis(300),
        }
    }
}

impl EngineConfig {
    /// Checks every field against its allowed range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check(self.width >= 1, "width", self.width, "must be at least 1")?;
        check(self.height >= 1, "height", self.height, "must be at least 1")?;
        check(
            (1..=MAX_PIECE_TYPES).contains(&self.piece_types),
            "piece_types",
            self.piece_types,
            "must be between 1 and 8",
        )?;
        check(
            self.max_shuffle_attempts >= 1,
            "max_shuffle_attempts",
            self.max_shuffle_attempts,
            "must be at least 1",
        )?;
        check(
            self.max_cascade_iterations >= 1,
            "max_cascade_iterations",
            self.max_cascade_iterations,
            "must be at least 1",
        )
    }
}

fn check(
    ok: bool,
    field: &'static str,
    value: usize,
    reason: &'static str,
) -> Result<(), ConfigError> {
    if ok {
        Ok(())
    } else {
        Err(ConfigError::InvalidField {
            field,
            value,
            reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(EngineConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_rejects_zero_width() {
        let config = EngineConfig {
            width: 0,
            ..EngineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidField { field: "width", .. })
        ));
    }

    #[test]
    fn test_rejects_too_many_piece_types() {
        let config = EngineConfig {
            piece_types: MAX_PIECE_TYPES + 1,
            ..EngineConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("piece_types"));
    }

    #[test]
    fn test_rejects_zero_ceilings() {
        let no_shuffles = EngineConfig {
            max_shuffle_attempts: 0,
            ..EngineConfig::default()
        };
        assert!(no_shuffles.validate().is_err());

        let no_cascades = EngineConfig {
            max_cascade_iterations: 0,
            ..EngineConfig::default()
        };
        assert!(no_cascades.validate().is_err());
    }
}
