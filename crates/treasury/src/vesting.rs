//! Time-locked balance with linear release.
//!
//! ## Key invariants
//! - `balance == principal - released` in every state reachable through the
//!   public API
//! - `released` never exceeds the schedule's unlocked amount
//! - funds can only leave through `withdraw`/`withdraw_all`/`skim_extraneous_balance`

use crate::errors::VestingError;
use galena_types::{Grain, TimestampMs};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// A balance that unlocks linearly at `release_per_sec` grains per whole
/// elapsed second from `unlock_start_ms`. Topping up extends the principal
/// on the same schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockedTreasury {
    balance: Grain,
    principal: Grain,
    released: Grain,
    unlock_start_ms: TimestampMs,
    release_per_sec: Grain,
}

impl LockedTreasury {
    /// Create a schedule holding `initial_balance`, unlocking from
    /// `unlock_start_ms` at `release_per_sec`.
    pub fn new(
        initial_balance: Grain,
        unlock_start_ms: TimestampMs,
        release_per_sec: Grain,
    ) -> Self {
        Self {
            balance: initial_balance,
            principal: initial_balance,
            released: 0,
            unlock_start_ms,
            release_per_sec,
        }
    }

    /// Funds physically held by the treasury.
    pub fn balance(&self) -> Grain {
        self.balance
    }

    /// Total principal ever placed on the schedule.
    pub fn principal(&self) -> Grain {
        self.principal
    }

    /// Total withdrawn against the schedule so far.
    pub fn released(&self) -> Grain {
        self.released
    }

    /// Timestamp at which release begins.
    pub fn unlock_start_ms(&self) -> TimestampMs {
        self.unlock_start_ms
    }

    /// Principal the schedule has unlocked by `now_ms`, withdrawn or not.
    fn unlocked(&self, now_ms: TimestampMs) -> Grain {
        if now_ms < self.unlock_start_ms {
            return 0;
        }
        let elapsed_sec = (now_ms - self.unlock_start_ms) / 1_000;
        self.release_per_sec
            .saturating_mul(elapsed_sec as Grain)
            .min(self.principal)
    }

    /// Amount withdrawable right now.
    pub fn max_withdrawable(&self, now_ms: TimestampMs) -> Grain {
        self.unlocked(now_ms)
            .saturating_sub(self.released)
            .min(self.balance)
    }

    /// Principal still locked by time. Zero once fully vested.
    pub fn remaining_unlock(&self, now_ms: TimestampMs) -> Grain {
        self.principal.saturating_sub(self.unlocked(now_ms))
    }

    /// Withdraw everything currently unlocked.
    pub fn withdraw_all(&mut self, now_ms: TimestampMs) -> Grain {
        let amount = self.max_withdrawable(now_ms);
        self.released += amount;
        self.balance -= amount;
        debug!(target: "treasury", amount, at = now_ms, "withdrew unlocked funds");
        amount
    }

    /// Withdraw an exact amount, failing if it exceeds what is unlocked.
    pub fn withdraw(&mut self, amount: Grain, now_ms: TimestampMs) -> Result<Grain, VestingError> {
        let unlocked = self.max_withdrawable(now_ms);
        if amount > unlocked {
            return Err(VestingError::ExceedsUnlocked {
                requested: amount,
                unlocked,
            });
        }
        self.released += amount;
        self.balance -= amount;
        debug!(target: "treasury", amount, at = now_ms, "withdrew unlocked funds");
        Ok(amount)
    }

    /// Add principal on the same release schedule.
    pub fn top_up(&mut self, amount: Grain, now_ms: TimestampMs) {
        self.balance = self.balance.saturating_add(amount);
        self.principal = self.principal.saturating_add(amount);
        info!(
            target: "treasury",
            amount,
            principal = self.principal,
            at = now_ms,
            "principal topped up"
        );
    }

    /// Reclaim any balance held beyond the schedule's remaining obligation.
    /// Zero in normal operation; the exhaustion settlement calls this so the
    /// treasury provably ends empty.
    pub fn skim_extraneous_balance(&mut self) -> Grain {
        let owed = self.principal.saturating_sub(self.released);
        let extraneous = self.balance.saturating_sub(owed);
        if extraneous > 0 {
            self.balance -= extraneous;
            info!(target: "treasury", amount = extraneous, "skimmed extraneous balance");
        }
        extraneous
    }
}
