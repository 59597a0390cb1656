//! One-time genesis: mints the fixed supply into the lanes and the
//! vesting treasury. Nothing in the workspace can create grains after
//! this returns.

use crate::errors::EngineError;
use crate::state::{Bus, GlobalLedger, LEDGER_VERSION};
use galena_economics::{EconomicsError, EconomicsParams};
use galena_treasury::LockedTreasury;
use galena_types::{Grain, TimestampMs};
use tracing::info;

/// Create the ledger, the `bus_count` lanes (each pre-funded to the
/// per-epoch budget), and the treasury holding the remaining supply on a
/// linear unlock schedule.
pub fn genesis(
    params: &EconomicsParams,
    unlock_start_ms: TimestampMs,
    release_per_sec: Grain,
    now_ms: TimestampMs,
) -> Result<(GlobalLedger, Vec<Bus>, LockedTreasury), EngineError> {
    params.validate()?;
    if release_per_sec == 0 {
        return Err(EconomicsError::InvalidParameter("release_per_sec must be non-zero").into());
    }

    let initial_funding = params.max_epoch_rewards();
    let principal = params.total_supply_grains - initial_funding;

    let ledger = GlobalLedger {
        version: LEDGER_VERSION,
        bus_count: params.bus_count,
        last_difficulty_adjustment_ms: now_ms,
        total_rewards: 0,
        total_hashes: 0,
    };

    let buses = (0..params.bus_count)
        .map(|_| Bus {
            live: true,
            difficulty: params.initial_difficulty,
            reward_rate: params.initial_reward_rate,
            last_reset_ms: now_ms,
            rewards: params.per_bus_epoch_budget,
            epoch_hashes: 0,
        })
        .collect();

    let treasury = LockedTreasury::new(principal, unlock_start_ms, release_per_sec);

    info!(
        target: "engine",
        bus_count = params.bus_count,
        initial_funding,
        principal,
        unlock_start_ms,
        "genesis complete"
    );

    Ok((ledger, buses, treasury))
}
