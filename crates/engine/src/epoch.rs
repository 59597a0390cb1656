//! Epoch settlement: the global barrier that aggregates every lane,
//! retunes the economics, and refills or permanently retires the system.
//!
//! ## Key invariants
//! - runs at most once per epoch, against the full lane set
//! - every withdrawn grain is redistributed; nothing is silently dropped
//! - `live` flips false for all lanes in the same settlement and never
//!   reverts; the exhaustion transition fires exactly once
//! - all fallible checks precede the first mutation, so a failed call is
//!   an atomic no-op

use crate::errors::EngineError;
use crate::state::{Bus, GlobalLedger};
use galena_economics::{calculate_difficulty, calculate_new_reward_rate, EconomicsParams};
use galena_treasury::LockedTreasury;
use galena_types::{Grain, TimestampMs};
use serde::{Deserialize, Serialize};
use tracing::info;

/// How a settlement concluded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SettlementOutcome {
    /// Lanes were refilled for another epoch.
    Refilled {
        reward_rate: Grain,
        difficulty: u8,
        surplus_to_treasury: Grain,
    },
    /// The supply is exhausted; every lane is retired and the pooled
    /// residue sits on the designated lane awaiting drain claims.
    Exhausted { residue: Grain },
}

/// Settlement report returned by [`epoch_reset`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpochSettlement {
    pub settled_at_ms: TimestampMs,
    /// Valid proofs accepted across all lanes in the settled epoch.
    pub epoch_hashes: u64,
    /// Grains paid out by lanes during the settled epoch.
    pub distributed: Grain,
    /// Unspent lane balances pooled at settlement.
    pub leftovers: Grain,
    /// Grains withdrawn from the vesting treasury.
    pub treasury_withdrawal: Grain,
    pub outcome: SettlementOutcome,
}

/// Settle the epoch that just ended. Requires exclusive access to the
/// ledger and the entire lane set; partial sets are rejected.
pub fn epoch_reset(
    params: &EconomicsParams,
    ledger: &mut GlobalLedger,
    buses: &mut [Bus],
    treasury: &mut LockedTreasury,
    now_ms: TimestampMs,
) -> Result<EpochSettlement, EngineError> {
    if buses.len() != ledger.bus_count as usize {
        return Err(EngineError::InsufficientBuses {
            expected: ledger.bus_count,
            got: buses.len(),
        });
    }
    if !buses[0].live {
        return Err(EngineError::MiningHasEnded);
    }
    if now_ms < treasury.unlock_start_ms() {
        return Err(EngineError::MiningNotStarted {
            unlock_start_ms: treasury.unlock_start_ms(),
        });
    }
    if now_ms <= buses[0].last_reset_ms.saturating_add(params.epoch_duration_ms) {
        return Err(EngineError::ResetTooEarly);
    }

    let epoch_hashes: u64 = buses.iter().map(|bus| bus.epoch_hashes).sum();
    let leftovers: Grain = buses.iter().map(|bus| bus.rewards).sum();
    let full_refill = params.max_epoch_rewards();
    let distributed = full_refill.saturating_sub(leftovers);
    let unlockable = treasury.max_withdrawable(now_ms);
    let available = leftovers.saturating_add(unlockable);

    let refill = available >= full_refill;
    if !refill {
        // Exhaustion cannot be declared while principal is still vesting.
        let remaining = treasury.remaining_unlock(now_ms);
        if remaining > 0 {
            return Err(EngineError::VestingInProgress { remaining });
        }
    }

    // Checks done; every mutation below commits.
    let withdrawal = treasury.withdraw_all(now_ms);
    for bus in buses.iter_mut() {
        bus.rewards = 0;
        bus.epoch_hashes = 0;
    }
    ledger.total_hashes += epoch_hashes as u128;
    ledger.total_rewards = ledger.total_rewards.saturating_add(distributed);

    let outcome = if refill {
        let previous_rate = buses[0].reward_rate;
        let previous_difficulty = buses[0].difficulty;
        let reward_rate = calculate_new_reward_rate(previous_rate, distributed, params);
        let difficulty = calculate_difficulty(ledger.total_hashes, params);
        if difficulty != previous_difficulty {
            ledger.last_difficulty_adjustment_ms = now_ms;
            info!(
                target: "engine",
                from = previous_difficulty,
                to = difficulty,
                total_hashes = ledger.total_hashes,
                "difficulty adjusted"
            );
        }
        for bus in buses.iter_mut() {
            bus.rewards = params.per_bus_epoch_budget;
            bus.last_reset_ms = now_ms;
            bus.reward_rate = reward_rate;
            bus.difficulty = difficulty;
        }
        // Everything pooled beyond the refill goes back on the schedule.
        let surplus_to_treasury = available - full_refill;
        if surplus_to_treasury > 0 {
            treasury.top_up(surplus_to_treasury, now_ms);
        }
        SettlementOutcome::Refilled {
            reward_rate,
            difficulty,
            surplus_to_treasury,
        }
    } else {
        // Terminal transition: pool the leftovers, the final treasury
        // withdrawal, and any schedule dust into the designated lane.
        let skimmed = treasury.skim_extraneous_balance();
        let residue = leftovers
            .saturating_add(withdrawal)
            .saturating_add(skimmed);
        ledger.total_rewards = ledger.total_rewards.saturating_add(residue);
        buses[0].rewards = residue;
        for bus in buses.iter_mut() {
            bus.live = false;
        }
        info!(target: "engine", residue, "supply exhausted; all lanes retired");
        SettlementOutcome::Exhausted { residue }
    };

    info!(
        target: "engine",
        at = now_ms,
        epoch_hashes,
        distributed,
        leftovers,
        withdrawal,
        "epoch settled"
    );

    Ok(EpochSettlement {
        settled_at_ms: now_ms,
        epoch_hashes,
        distributed,
        leftovers,
        treasury_withdrawal: withdrawal,
        outcome,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genesis::genesis;

    // Two lanes, 10-grain budgets, 1-second epochs, 30-grain supply.
    fn params() -> EconomicsParams {
        EconomicsParams {
            bus_count: 2,
            epoch_duration_ms: 1_000,
            per_bus_epoch_budget: 10,
            target_epoch_rewards: 10,
            initial_reward_rate: 2,
            initial_difficulty: 1,
            total_supply_grains: 30,
            ..Default::default()
        }
    }

    fn setup(release_per_sec: Grain) -> (GlobalLedger, Vec<Bus>, LockedTreasury) {
        genesis(&params(), 0, release_per_sec, 0).unwrap()
    }

    /// Pretend `spent` grains were mined off a lane during the epoch.
    fn spend(bus: &mut Bus, spent: Grain, proofs: u64) {
        bus.rewards -= spent;
        bus.epoch_hashes += proofs;
    }

    fn conserved(ledger: &GlobalLedger, buses: &[Bus], treasury: &LockedTreasury) -> Grain {
        buses.iter().map(|b| b.rewards()).sum::<Grain>()
            + treasury.balance()
            + ledger.total_rewards()
    }

    #[test]
    fn test_reset_requires_full_lane_set() {
        let p = params();
        let (mut ledger, mut buses, mut treasury) = setup(1_000);
        let err = epoch_reset(&p, &mut ledger, &mut buses[..1], &mut treasury, 2_000).unwrap_err();
        assert_eq!(
            err,
            EngineError::InsufficientBuses {
                expected: 2,
                got: 1
            }
        );
    }

    #[test]
    fn test_reset_before_unlock_start() {
        let p = params();
        let (mut ledger, mut buses, mut treasury) = genesis(&p, 5_000, 1_000, 0).unwrap();
        // Both the unlock gate and the deadline gate fail here; the unlock
        // gate is checked first.
        let err = epoch_reset(&p, &mut ledger, &mut buses, &mut treasury, 500).unwrap_err();
        assert_eq!(
            err,
            EngineError::MiningNotStarted {
                unlock_start_ms: 5_000
            }
        );
    }

    #[test]
    fn test_reset_too_early_boundary() {
        let p = params();
        let (mut ledger, mut buses, mut treasury) = setup(1_000);
        let err = epoch_reset(&p, &mut ledger, &mut buses, &mut treasury, 1_000).unwrap_err();
        assert_eq!(err, EngineError::ResetTooEarly);

        // One past the deadline settles.
        assert!(epoch_reset(&p, &mut ledger, &mut buses, &mut treasury, 1_001).is_ok());
    }

    #[test]
    fn test_refill_redistributes_and_retunes() {
        let p = params();
        let (mut ledger, mut buses, mut treasury) = setup(1_000);
        spend(&mut buses[0], 6, 3);

        let report = epoch_reset(&p, &mut ledger, &mut buses, &mut treasury, 2_000).unwrap();

        assert_eq!(report.epoch_hashes, 3);
        assert_eq!(report.distributed, 6);
        assert_eq!(report.leftovers, 14);
        assert_eq!(report.treasury_withdrawal, 10);
        // Under-target epoch (6 of 10): rate rises 2 -> 10/3 of it, floored.
        assert_eq!(
            report.outcome,
            SettlementOutcome::Refilled {
                reward_rate: 3,
                difficulty: 1,
                surplus_to_treasury: 4,
            }
        );

        for bus in &buses {
            assert!(bus.live());
            assert_eq!(bus.rewards(), 10);
            assert_eq!(bus.reward_rate(), 3);
            assert_eq!(bus.epoch_hashes(), 0);
            assert_eq!(bus.last_reset_ms(), 2_000);
        }
        assert_eq!(ledger.total_hashes(), 3);
        assert_eq!(ledger.total_rewards(), 6);
        // Difficulty unchanged, so no adjustment was recorded.
        assert_eq!(ledger.last_difficulty_adjustment_ms(), 0);
        assert_eq!(treasury.balance(), 4);
        assert_eq!(conserved(&ledger, &buses, &treasury), 30);
    }

    #[test]
    fn test_settlement_totals_reconcile() {
        let p = params();
        let (mut ledger, mut buses, mut treasury) = setup(1_000);
        spend(&mut buses[0], 8, 4);
        spend(&mut buses[1], 2, 1);

        let report = epoch_reset(&p, &mut ledger, &mut buses, &mut treasury, 2_000).unwrap();
        let SettlementOutcome::Refilled {
            surplus_to_treasury,
            ..
        } = report.outcome
        else {
            panic!("expected refill");
        };
        assert_eq!(
            report.leftovers + report.treasury_withdrawal,
            p.max_epoch_rewards() + surplus_to_treasury
        );
    }

    #[test]
    fn test_difficulty_adjustment_records_timestamp() {
        let p = EconomicsParams {
            difficulty_unit: 1,
            ..params()
        };
        let (mut ledger, mut buses, mut treasury) = genesis(&p, 0, 1_000, 0).unwrap();
        spend(&mut buses[0], 6, 3);

        let report = epoch_reset(&p, &mut ledger, &mut buses, &mut treasury, 2_000).unwrap();

        // Three lifetime hashes clear the 1-grain staircase twice: C0=1, C1=3.
        let SettlementOutcome::Refilled { difficulty, .. } = report.outcome else {
            panic!("expected refill");
        };
        assert_eq!(difficulty, 3);
        assert_eq!(ledger.last_difficulty_adjustment_ms(), 2_000);
        for bus in &buses {
            assert_eq!(bus.difficulty(), 3);
        }
    }

    #[test]
    fn test_vesting_in_progress_blocks_exhaustion() {
        let p = params();
        // Slow schedule: one grain per second against a 10-grain principal.
        let (mut ledger, mut buses, mut treasury) = setup(1);
        spend(&mut buses[0], 10, 5);
        spend(&mut buses[1], 10, 5);

        let ledger_before = ledger.clone();
        let buses_before = buses.clone();
        let treasury_before = treasury.clone();

        let err = epoch_reset(&p, &mut ledger, &mut buses, &mut treasury, 1_001).unwrap_err();
        assert_eq!(err, EngineError::VestingInProgress { remaining: 9 });

        // The refusal is an atomic no-op.
        assert_eq!(ledger, ledger_before);
        assert_eq!(buses, buses_before);
        assert_eq!(treasury, treasury_before);
    }

    #[test]
    fn test_exhaustion_retires_every_lane_once() {
        let p = params();
        let (mut ledger, mut buses, mut treasury) = setup(1_000);
        spend(&mut buses[0], 10, 5);
        spend(&mut buses[1], 2, 1);

        let report = epoch_reset(&p, &mut ledger, &mut buses, &mut treasury, 2_000).unwrap();

        // leftovers 8 + final withdrawal 10 pooled on the designated lane
        assert_eq!(report.outcome, SettlementOutcome::Exhausted { residue: 18 });
        assert_eq!(buses[0].rewards(), 18);
        assert_eq!(buses[1].rewards(), 0);
        for bus in &buses {
            assert!(!bus.live());
            assert_eq!(bus.epoch_hashes(), 0);
        }
        assert_eq!(ledger.total_hashes(), 6);
        // Distributed 12 plus the 18-grain residue: the whole supply is
        // accounted as rewards once the system retires.
        assert_eq!(ledger.total_rewards(), 30);
        assert_eq!(treasury.balance(), 0);

        // The transition is terminal.
        let err = epoch_reset(&p, &mut ledger, &mut buses, &mut treasury, 4_000).unwrap_err();
        assert_eq!(err, EngineError::MiningHasEnded);
    }
}
