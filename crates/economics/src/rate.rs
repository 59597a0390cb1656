//! Per-proof reward-rate control.
//!
//! Inverse-proportional steering: an epoch that emitted less than the
//! target pushes the rate up (each proof becomes worth more, the budget
//! clears faster); an epoch that emitted more pushes it down. The step is
//! bounded to [0.5x, 2x] per settlement and the result always lies in
//! [1, per_bus_epoch_budget].

use crate::params::EconomicsParams;
use galena_types::{mul_div_u128, Grain};
use tracing::debug;

/// Compute the reward rate for the next epoch from the realized emission of
/// the one just settled. Expects validated parameters.
pub fn calculate_new_reward_rate(
    current_rate: Grain,
    epoch_distributed: Grain,
    params: &EconomicsParams,
) -> Grain {
    // No mining occurred; a correction here would be a runaway upward step.
    if epoch_distributed == 0 {
        return current_rate;
    }

    let target = mul_div_u128(current_rate, params.target_epoch_rewards, epoch_distributed)
        .unwrap_or(Grain::MAX);

    let stepped = target.clamp(current_rate / 2, current_rate.saturating_mul(2));
    if stepped != target {
        debug!(
            target: "economics",
            current_rate,
            proportional = target,
            stepped,
            "reward-rate step clamped"
        );
    }

    stepped.clamp(1, params.per_bus_epoch_budget)
}
