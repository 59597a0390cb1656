//! Difficulty estimation from cumulative proof counts.
//!
//! The difficulty is a staircase over the lifetime hash count: thresholds
//! `T_k = difficulty_unit * 2^k`, cumulative `C_k = sum(T_0..=T_k)`, one
//! level per reached `C_k`. Threshold growth ceases once `C_k` would exceed
//! the total supply: each valid proof consumes at least one grain, so the
//! cumulative hash count can never climb past the distributable supply.

use crate::params::EconomicsParams;

/// A 32-byte digest cannot carry more than 32 leading zero bytes.
pub const MAX_DIFFICULTY: u8 = 32;

/// Map the lifetime valid-proof count to a difficulty level.
///
/// Non-decreasing in `total_hashes`; equals `initial_difficulty` at zero;
/// capped by the supply-bounded threshold scan (level 24 at the default
/// parameters).
pub fn calculate_difficulty(total_hashes: u128, params: &EconomicsParams) -> u8 {
    let mut difficulty = params.initial_difficulty;
    let mut threshold = params.difficulty_unit;
    let mut cumulative = threshold;

    while total_hashes >= cumulative && difficulty < MAX_DIFFICULTY {
        difficulty += 1;
        let next = match threshold.checked_mul(2) {
            Some(next) => next,
            None => break,
        };
        match cumulative.checked_add(next) {
            Some(c) if c <= params.total_supply_grains => {
                threshold = next;
                cumulative = c;
            }
            _ => break,
        }
    }

    difficulty
}
