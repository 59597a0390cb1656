use thiserror::Error;

/// Errors raised while validating economics parameters.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EconomicsError {
    #[error("invalid economics parameter: {0}")]
    InvalidParameter(&'static str),
}
