//! Protocol parameters for the emission economics.

use crate::difficulty::MAX_DIFFICULTY;
use crate::errors::EconomicsError;
use galena_types::{Grain, GRAINS_PER_GAL, TOTAL_SUPPLY_GRAINS};
use serde::{Deserialize, Serialize};

/// Economics parameters shared by the estimator, the rate controller, and
/// the settlement engine. The defaults are the mainnet values; tests shrink
/// them to keep simulations fast.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EconomicsParams {
    /// Number of independent reward lanes (buses).
    pub bus_count: u32,
    /// Epoch length in milliseconds; settlement must occur between epochs.
    pub epoch_duration_ms: u64,
    /// Hard per-lane emission cap per epoch, in grains. Every refill tops a
    /// bus back up to exactly this amount.
    pub per_bus_epoch_budget: Grain,
    /// Desired total emission per epoch, in grains. Realized emission above
    /// or below this target steers the reward rate down or up.
    pub target_epoch_rewards: Grain,
    /// Reward per valid proof at genesis, in grains.
    pub initial_reward_rate: Grain,
    /// Required leading zero bytes at genesis.
    pub initial_difficulty: u8,
    /// First difficulty threshold T0; thresholds double from here.
    pub difficulty_unit: u128,
    /// Fixed total supply in grains.
    pub total_supply_grains: Grain,
}

impl Default for EconomicsParams {
    fn default() -> Self {
        Self {
            bus_count: 8,
            // One-minute epochs
            epoch_duration_ms: 60_000,
            // 25 GAL per bus per epoch; 200 GAL hard cap across all lanes
            per_bus_epoch_budget: 25 * GRAINS_PER_GAL,
            // Steer toward 100 GAL per epoch, half the hard cap
            target_epoch_rewards: 100 * GRAINS_PER_GAL,
            // 1 GAL per proof
            initial_reward_rate: GRAINS_PER_GAL,
            initial_difficulty: 3,
            // First difficulty step at one billion cumulative hashes
            difficulty_unit: 1_000_000_000,
            total_supply_grains: TOTAL_SUPPLY_GRAINS,
        }
    }
}

impl EconomicsParams {
    /// Hard emission cap across all lanes for one epoch.
    pub fn max_epoch_rewards(&self) -> Grain {
        self.per_bus_epoch_budget
            .saturating_mul(self.bus_count as Grain)
    }

    /// Check the parameter set for internal consistency.
    pub fn validate(&self) -> Result<(), EconomicsError> {
        if self.bus_count == 0 {
            return Err(EconomicsError::InvalidParameter(
                "bus_count must be at least 1",
            ));
        }
        if self.epoch_duration_ms == 0 {
            return Err(EconomicsError::InvalidParameter(
                "epoch_duration_ms must be non-zero",
            ));
        }
        if self.per_bus_epoch_budget == 0 {
            return Err(EconomicsError::InvalidParameter(
                "per_bus_epoch_budget must be non-zero",
            ));
        }
        if self.target_epoch_rewards == 0 {
            return Err(EconomicsError::InvalidParameter(
                "target_epoch_rewards must be non-zero",
            ));
        }
        if self.initial_reward_rate == 0 || self.initial_reward_rate > self.per_bus_epoch_budget {
            return Err(EconomicsError::InvalidParameter(
                "initial_reward_rate must lie in [1, per_bus_epoch_budget]",
            ));
        }
        if self.initial_difficulty == 0 || self.initial_difficulty > MAX_DIFFICULTY {
            return Err(EconomicsError::InvalidParameter(
                "initial_difficulty must lie in [1, 32]",
            ));
        }
        if self.difficulty_unit == 0 {
            return Err(EconomicsError::InvalidParameter(
                "difficulty_unit must be non-zero",
            ));
        }
        if self.total_supply_grains < self.max_epoch_rewards() {
            return Err(EconomicsError::InvalidParameter(
                "total_supply_grains must cover at least one full epoch budget",
            ));
        }
        Ok(())
    }
}
