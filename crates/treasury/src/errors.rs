use galena_types::Grain;
use thiserror::Error;

/// Vesting schedule violations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum VestingError {
    #[error("withdrawal of {requested} grains exceeds the {unlocked} currently unlocked")]
    ExceedsUnlocked { requested: Grain, unlocked: Grain },
}
