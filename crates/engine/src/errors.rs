use galena_economics::EconomicsError;
use galena_pow::PowError;
use galena_types::{Grain, TimestampMs};
use thiserror::Error;

/// Typed failures of the mining and settlement operations. Every variant
/// is a caller or timing condition; none indicates internal corruption,
/// and a failed operation never leaves partial state behind.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    #[error("lane budget for this epoch is spent")]
    RewardsExhausted,

    #[error("epoch window has closed; wait for the next settlement")]
    NeedsReset,

    #[error("settlement attempted before the epoch deadline")]
    ResetTooEarly,

    #[error("proof does not meet difficulty {difficulty}")]
    InsufficientDifficulty { difficulty: u8 },

    #[error("settlement requires all {expected} buses, got {got}")]
    InsufficientBuses { expected: u32, got: usize },

    #[error("supply cannot be exhausted while {remaining} grains are still vesting")]
    VestingInProgress { remaining: Grain },

    #[error("mining has ended; the supply is exhausted")]
    MiningHasEnded,

    #[error("mining has not started; unlock begins at {unlock_start_ms}")]
    MiningNotStarted { unlock_start_ms: TimestampMs },

    #[error(transparent)]
    InvalidParams(#[from] EconomicsError),
}

impl From<PowError> for EngineError {
    fn from(err: PowError) -> Self {
        match err {
            PowError::InsufficientDifficulty { difficulty } => {
                EngineError::InsufficientDifficulty { difficulty }
            }
        }
    }
}
