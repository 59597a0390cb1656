//! In-process front over the engine state, realizing the execution
//! substrate's locking discipline: one lock per lane so distinct miners
//! proceed in parallel, and a global barrier (ledger + every lane +
//! treasury) for settlement. Commits are all-or-nothing: a failed
//! settlement writes nothing back.

use crate::epoch::{epoch_reset, EpochSettlement};
use crate::errors::EngineError;
use crate::genesis::genesis;
use crate::mine::mine;
use crate::state::{Bus, GlobalLedger, MinerAccount};
use galena_economics::EconomicsParams;
use galena_treasury::LockedTreasury;
use galena_types::{Grain, TimestampMs};
use parking_lot::{Mutex, RwLock};

/// Shared mining state with per-lane locking.
pub struct MiningService {
    params: EconomicsParams,
    ledger: RwLock<GlobalLedger>,
    buses: Vec<Mutex<Bus>>,
    treasury: Mutex<LockedTreasury>,
}

impl MiningService {
    /// Run genesis and wrap the resulting state.
    pub fn genesis(
        params: EconomicsParams,
        unlock_start_ms: TimestampMs,
        release_per_sec: Grain,
        now_ms: TimestampMs,
    ) -> Result<Self, EngineError> {
        let (ledger, buses, treasury) = genesis(&params, unlock_start_ms, release_per_sec, now_ms)?;
        Ok(Self {
            params,
            ledger: RwLock::new(ledger),
            buses: buses.into_iter().map(Mutex::new).collect(),
            treasury: Mutex::new(treasury),
        })
    }

    pub fn params(&self) -> &EconomicsParams {
        &self.params
    }

    pub fn bus_count(&self) -> usize {
        self.buses.len()
    }

    /// Submit a proof attempt against one lane, locking only that lane.
    /// Panics if `bus_index` is out of range.
    pub fn mine_on(
        &self,
        bus_index: usize,
        miner: &mut MinerAccount,
        nonce: u64,
        now_ms: TimestampMs,
        uniq: &[u8; 32],
    ) -> Result<Grain, EngineError> {
        let mut bus = self.buses[bus_index].lock();
        mine(&self.params, &mut bus, miner, nonce, now_ms, uniq)
    }

    /// Settle the epoch under the global barrier. The settlement runs on a
    /// snapshot and is written back only on success.
    pub fn settle(&self, now_ms: TimestampMs) -> Result<EpochSettlement, EngineError> {
        let mut ledger = self.ledger.write();
        let mut treasury = self.treasury.lock();
        let mut guards: Vec<_> = self.buses.iter().map(|bus| bus.lock()).collect();

        let mut ledger_snapshot = ledger.clone();
        let mut treasury_snapshot = treasury.clone();
        let mut bus_snapshots: Vec<Bus> = guards.iter().map(|guard| (**guard).clone()).collect();

        let report = epoch_reset(
            &self.params,
            &mut ledger_snapshot,
            &mut bus_snapshots,
            &mut treasury_snapshot,
            now_ms,
        )?;

        *ledger = ledger_snapshot;
        *treasury = treasury_snapshot;
        for (guard, bus) in guards.iter_mut().zip(bus_snapshots) {
            **guard = bus;
        }
        Ok(report)
    }

    /// Snapshot of the ledger record.
    pub fn ledger(&self) -> GlobalLedger {
        self.ledger.read().clone()
    }

    /// Snapshot of one lane. Panics if `bus_index` is out of range.
    pub fn bus(&self, bus_index: usize) -> Bus {
        self.buses[bus_index].lock().clone()
    }

    /// Snapshot of the treasury schedule.
    pub fn treasury(&self) -> LockedTreasury {
        self.treasury.lock().clone()
    }
}
