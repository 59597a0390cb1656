//! State records: the global ledger, the reward lanes, and miner accounts.
//!
//! Fields are crate-private so the records can only change through the
//! operations in this crate; callers observe them through accessors.

use galena_pow::initial_chain_hash;
use galena_types::{Digest, Grain, MinerId, TimestampMs};
use serde::{Deserialize, Serialize};

/// Current ledger record version.
pub const LEDGER_VERSION: u16 = 1;

/// Singleton accounting record. Mutated only by the epoch settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalLedger {
    pub(crate) version: u16,
    pub(crate) bus_count: u32,
    pub(crate) last_difficulty_adjustment_ms: TimestampMs,
    pub(crate) total_rewards: Grain,
    pub(crate) total_hashes: u128,
}

impl GlobalLedger {
    pub fn version(&self) -> u16 {
        self.version
    }

    /// Fixed number of reward lanes.
    pub fn bus_count(&self) -> u32 {
        self.bus_count
    }

    /// Timestamp of the last settlement that changed the difficulty.
    pub fn last_difficulty_adjustment_ms(&self) -> TimestampMs {
        self.last_difficulty_adjustment_ms
    }

    /// Cumulative grains distributed (settled epochs plus, after the
    /// terminal settlement, the residue earmarked for drain claims).
    pub fn total_rewards(&self) -> Grain {
        self.total_rewards
    }

    /// Cumulative valid proofs across all settled epochs.
    pub fn total_hashes(&self) -> u128 {
        self.total_hashes
    }
}

/// One of N independent reward lanes. Mining deducts from `rewards` and
/// bumps `epoch_hashes`; everything else changes only at settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bus {
    pub(crate) live: bool,
    pub(crate) difficulty: u8,
    pub(crate) reward_rate: Grain,
    pub(crate) last_reset_ms: TimestampMs,
    pub(crate) rewards: Grain,
    pub(crate) epoch_hashes: u64,
}

impl Bus {
    /// False once the supply is exhausted; never reverts.
    pub fn live(&self) -> bool {
        self.live
    }

    /// Required leading zero bytes for a proof on this lane.
    pub fn difficulty(&self) -> u8 {
        self.difficulty
    }

    /// Payout per valid proof, in grains.
    pub fn reward_rate(&self) -> Grain {
        self.reward_rate
    }

    /// Timestamp of the settlement that last refilled this lane.
    pub fn last_reset_ms(&self) -> TimestampMs {
        self.last_reset_ms
    }

    /// Remaining lane balance for the current epoch.
    pub fn rewards(&self) -> Grain {
        self.rewards
    }

    /// Valid proofs accepted on this lane since the last settlement.
    pub fn epoch_hashes(&self) -> u64 {
        self.epoch_hashes
    }
}

/// Per-participant hash-chain state and lifetime counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinerAccount {
    pub(crate) id: MinerId,
    pub(crate) current_hash: Digest,
    pub(crate) total_rewards: Grain,
    pub(crate) total_hashes: u64,
}

impl MinerAccount {
    /// Register a fresh account with a randomly seeded hash chain.
    pub fn register(id: MinerId) -> Self {
        Self::register_with(id, rand::random())
    }

    /// Register with an explicit uniqueness value. Distinct identities or
    /// uniqueness values start distinct chains.
    pub fn register_with(id: MinerId, uniq: [u8; 32]) -> Self {
        Self {
            id,
            current_hash: initial_chain_hash(&id, &uniq),
            total_rewards: 0,
            total_hashes: 0,
        }
    }

    pub fn id(&self) -> &MinerId {
        &self.id
    }

    /// Head of the account's hash chain; advances on every accepted proof.
    pub fn current_hash(&self) -> &Digest {
        &self.current_hash
    }

    /// Lifetime grains earned, including any terminal drain payout.
    pub fn total_rewards(&self) -> Grain {
        self.total_rewards
    }

    /// Lifetime accepted proofs.
    pub fn total_hashes(&self) -> u64 {
        self.total_hashes
    }
}
