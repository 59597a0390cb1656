//! Galena Settlement Engine
//!
//! The proof-of-work economics core: per-lane mining against a shared
//! difficulty target, and the once-per-epoch settlement that aggregates
//! every lane, retunes the reward rate and difficulty, and either refills
//! the lanes from the vesting treasury or retires them permanently once
//! the supply is exhausted.
//!
//! State lives in three records ([`GlobalLedger`], [`Bus`], and
//! [`MinerAccount`]) passed by reference into the two operations,
//! [`mine`] and [`epoch_reset`]. Every failure is typed and atomic: an
//! `Err` return implies the operation touched nothing.

pub mod epoch;
pub mod errors;
pub mod genesis;
pub mod mine;
pub mod service;
pub mod state;

pub use epoch::{epoch_reset, EpochSettlement, SettlementOutcome};
pub use errors::EngineError;
pub use genesis::genesis;
pub use mine::mine;
pub use service::MiningService;
pub use state::{Bus, GlobalLedger, MinerAccount};
