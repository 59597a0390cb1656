//! The `mine` operation: the hot path of the engine.
//!
//! On a live lane a valid proof pays `reward_rate` grains; on a retired
//! lane the call is the terminal drain that pays the lane's residual
//! balance exactly once. All checks precede the first mutation, so a
//! failure leaves both records untouched.

use crate::errors::EngineError;
use crate::state::{Bus, MinerAccount};
use galena_economics::EconomicsParams;
use galena_pow::{advance_chain, generate_proof, validate_proof};
use galena_types::{Grain, TimestampMs};
use tracing::{debug, info};

/// Submit a proof attempt against one lane.
///
/// `uniq` is a per-call unique value from the execution context; it feeds
/// the hash-chain advancement so an observed proof cannot be replayed.
pub fn mine(
    params: &EconomicsParams,
    bus: &mut Bus,
    miner: &mut MinerAccount,
    nonce: u64,
    now_ms: TimestampMs,
    uniq: &[u8; 32],
) -> Result<Grain, EngineError> {
    if !bus.live {
        // Terminal drain: no proof required or possible once mining has
        // ended; whatever the lane still holds pays out once.
        let payout = bus.rewards;
        if payout == 0 {
            return Err(EngineError::MiningHasEnded);
        }
        bus.rewards = 0;
        miner.total_rewards = miner.total_rewards.saturating_add(payout);
        info!(target: "engine", payout, "drained retired lane");
        return Ok(payout);
    }

    if now_ms >= bus.last_reset_ms.saturating_add(params.epoch_duration_ms) {
        return Err(EngineError::NeedsReset);
    }
    if bus.rewards < bus.reward_rate {
        return Err(EngineError::RewardsExhausted);
    }

    let proof = generate_proof(&miner.current_hash, &miner.id, nonce);
    validate_proof(&proof, bus.difficulty)?;

    let payout = bus.reward_rate;
    miner.current_hash = advance_chain(&proof, now_ms, uniq);
    miner.total_hashes += 1;
    miner.total_rewards = miner.total_rewards.saturating_add(payout);
    bus.epoch_hashes += 1;
    bus.rewards -= payout;

    debug!(
        target: "engine",
        payout,
        lane_remaining = bus.rewards,
        "accepted proof"
    );
    Ok(payout)
}
