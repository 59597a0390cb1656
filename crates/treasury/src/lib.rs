//! Galena Treasury Module
//!
//! The time-locked vesting treasury backing the emission engine: principal
//! unlocks linearly at a fixed per-second rate from a start timestamp, and
//! only unlocked funds can ever be withdrawn. Settlement surpluses flow
//! back in as new principal on the same schedule.

pub mod errors;
pub mod vesting;

pub use errors::VestingError;
pub use vesting::LockedTreasury;
