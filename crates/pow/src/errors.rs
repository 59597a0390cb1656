use thiserror::Error;

/// Proof validation failures.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PowError {
    #[error("proof does not meet difficulty {difficulty}")]
    InsufficientDifficulty { difficulty: u8 },
}
