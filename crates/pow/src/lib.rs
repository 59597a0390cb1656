//! Galena proof engine
//!
//! Pure hashing routines for the proof-of-work gate:
//! - proof digest generation over (chain hash, miner identity, nonce)
//! - validation against a byte-granular leading-zero target
//! - hash-chain advancement after an accepted proof
//! - chain seeding for account registration
//!
//! Difficulty is byte-granular: each level multiplies the expected work by
//! 256, and the protocol only ever needs a couple dozen lifetime levels.

pub mod errors;
pub mod proof;

pub use errors::PowError;
pub use proof::{advance_chain, generate_proof, initial_chain_hash, validate_proof};
