//! Atomic ledger host.
//!
//! [`Ledger`] owns the committed state and the event log. Every public
//! operation runs as a [`Txn`] against a staged copy of the state; the copy
//! and its events replace the committed ones only if the operation succeeds.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use pluvo_core::constants::{TOKEN_DECIMALS, TOKEN_NAME, TOKEN_SYMBOL};
use pluvo_core::error::{LedgerError, PluvoError};
use pluvo_core::events::LedgerEvent;
use pluvo_core::traits::{DecayCalculator, LedgerView};
use pluvo_core::types::{Address, CallContext, EvaporationRate};
use pluvo_decay::DecayEngine;

use crate::config::GenesisConfig;
use crate::engine::Txn;
use crate::scheduler::payout_per_rainee;
use crate::state::LedgerState;

/// Marker at the start of every snapshot file.
pub const SNAPSHOT_MAGIC: &str = "PLUVO";
/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize)]
struct SnapshotRef<'a> {
    magic: &'a str,
    version: u32,
    state: &'a LedgerState,
    events: &'a [LedgerEvent],
}

#[derive(Deserialize)]
struct Snapshot {
    magic: String,
    version: u32,
    state: LedgerState,
    #[serde(default)]
    events: Vec<LedgerEvent>,
}

/// Committed ledger state plus the decay engine that drives it.
#[derive(Debug, Clone)]
pub struct Ledger<D: DecayCalculator = DecayEngine> {
    state: LedgerState,
    calculator: D,
    events: Vec<LedgerEvent>,
}

impl Ledger<DecayEngine> {
    /// Fresh ledger from a genesis configuration.
    pub fn new(config: &GenesisConfig) -> Result<Self, PluvoError> {
        Self::with_calculator(config, DecayEngine::new())
    }

    /// Restore a ledger from a snapshot written by [`Ledger::save_snapshot`].
    pub fn load_snapshot(path: &Path) -> Result<Self, PluvoError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| PluvoError::Storage(format!("{}: {e}", path.display())))?;
        let snapshot: Snapshot = serde_json::from_str(&raw)
            .map_err(|e| PluvoError::Storage(format!("{}: {e}", path.display())))?;

        if snapshot.magic != SNAPSHOT_MAGIC {
            return Err(PluvoError::Storage(format!(
                "{}: not a ledger snapshot",
                path.display()
            )));
        }
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(PluvoError::Storage(format!(
                "{}: unsupported snapshot version {}",
                path.display(),
                snapshot.version
            )));
        }
        snapshot.state.validate()?;

        let mut ledger = Self::from_state(snapshot.state, DecayEngine::new());
        ledger.events = snapshot.events;
        debug!(path = %path.display(), "snapshot loaded");
        Ok(ledger)
    }
}

impl<D: DecayCalculator> Ledger<D> {
    /// Fresh ledger driven by a custom decay calculator.
    pub fn with_calculator(config: &GenesisConfig, calculator: D) -> Result<Self, PluvoError> {
        let state = LedgerState::genesis(config)?;
        info!(
            max_supply = state.params.max_supply,
            rate = %state.params.evaporation_rate,
            period = state.params.seconds_between_rainfalls,
            precision = state.params.precision,
            "ledger created"
        );
        Ok(Self::from_state(state, calculator))
    }

    /// Wrap an existing state. The caller is responsible for its validity.
    pub fn from_state(state: LedgerState, calculator: D) -> Self {
        Self {
            state,
            calculator,
            events: Vec::new(),
        }
    }

    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    /// Run `op` atomically. On error, nothing is committed.
    pub fn execute<T, F>(&mut self, ctx: CallContext, op: &'static str, f: F) -> Result<T, LedgerError>
    where
        F: FnOnce(&mut Txn<'_, D>) -> Result<T, LedgerError>,
    {
        let mut staged = self.state.clone();
        let mut txn = Txn::new(&mut staged, &self.calculator, ctx);
        match f(&mut txn) {
            Ok(value) => {
                let events = txn.into_events();
                self.state = staged;
                self.events.extend(events);
                Ok(value)
            }
            Err(err) => {
                debug!(op, caller = %ctx.caller, now = ctx.now, error = %err, "operation rejected");
                Err(err)
            }
        }
    }

    // ------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------

    pub fn transfer(&mut self, ctx: CallContext, to: Address, amount: u64) -> Result<(), LedgerError> {
        self.execute(ctx, "transfer", |t| t.transfer(to, amount))
    }

    pub fn approve(
        &mut self,
        ctx: CallContext,
        spender: Address,
        amount: u64,
    ) -> Result<(), LedgerError> {
        self.execute(ctx, "approve", |t| t.approve(spender, amount))
    }

    pub fn transfer_from(
        &mut self,
        ctx: CallContext,
        from: Address,
        to: Address,
        amount: u64,
    ) -> Result<(), LedgerError> {
        self.execute(ctx, "transfer_from", |t| t.transfer_from(from, to, amount))
    }

    pub fn register(&mut self, ctx: CallContext, addr: Address) -> Result<bool, LedgerError> {
        self.execute(ctx, "register", |t| t.register(addr))
    }

    pub fn unregister(&mut self, ctx: CallContext, addr: Address) -> Result<bool, LedgerError> {
        self.execute(ctx, "unregister", |t| t.unregister(addr))
    }

    /// Resolve elapsed rainfall ticks. Returns how many were resolved.
    pub fn rain(&mut self, ctx: CallContext) -> Result<u64, LedgerError> {
        self.execute(ctx, "rain", |t| t.rain())
    }

    /// Collect every owed rainfall index.
    pub fn collect_rainfall(&mut self, ctx: CallContext) -> Result<u64, LedgerError> {
        self.execute(ctx, "collect_rainfall", |t| t.collect(None))
    }

    /// Collect at most `max_count` owed rainfall indices, oldest first.
    pub fn collect_rainfalls(&mut self, ctx: CallContext, max_count: u64) -> Result<u64, LedgerError> {
        self.execute(ctx, "collect_rainfalls", |t| t.collect(Some(max_count)))
    }

    pub fn evaporate(&mut self, ctx: CallContext, addr: Address) -> Result<u64, LedgerError> {
        self.execute(ctx, "evaporate", |t| t.evaporate(addr))
    }

    pub fn set_evaporation_rate(
        &mut self,
        ctx: CallContext,
        numerator: u64,
        denominator: u64,
    ) -> Result<(), LedgerError> {
        self.execute(ctx, "set_evaporation_rate", |t| {
            t.set_evaporation_rate(numerator, denominator)
        })
    }

    pub fn set_rainfall_period(&mut self, ctx: CallContext, seconds: u64) -> Result<(), LedgerError> {
        self.execute(ctx, "set_rainfall_period", |t| t.set_rainfall_period(seconds))
    }

    pub fn set_precision(&mut self, ctx: CallContext, precision: u32) -> Result<(), LedgerError> {
        self.execute(ctx, "set_precision", |t| t.set_precision(precision))
    }

    pub fn change_registrar(&mut self, ctx: CallContext, new_holder: Address) -> Result<(), LedgerError> {
        self.execute(ctx, "change_registrar", |t| t.change_registrar(new_holder))
    }

    pub fn change_parameter_setter(
        &mut self,
        ctx: CallContext,
        new_holder: Address,
    ) -> Result<(), LedgerError> {
        self.execute(ctx, "change_parameter_setter", |t| {
            t.change_parameter_setter(new_holder)
        })
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn name(&self) -> &'static str {
        TOKEN_NAME
    }

    pub fn symbol(&self) -> &'static str {
        TOKEN_SYMBOL
    }

    pub fn decimals(&self) -> u8 {
        TOKEN_DECIMALS
    }

    pub fn max_supply(&self) -> u64 {
        self.state.params.max_supply
    }

    pub fn evaporation_rate(&self) -> EvaporationRate {
        self.state.params.evaporation_rate
    }

    pub fn seconds_between_rainfalls(&self) -> u64 {
        self.state.params.seconds_between_rainfalls
    }

    pub fn precision(&self) -> u32 {
        self.state.params.precision
    }

    pub fn registrar(&self) -> Address {
        self.state.roles.registrar
    }

    pub fn parameter_setter(&self) -> Address {
        self.state.roles.parameter_setter
    }

    /// Registered rainees in address order.
    pub fn rainees(&self) -> impl Iterator<Item = &Address> {
        self.state.registry.iter()
    }

    /// Start of the in-progress rainfall period.
    pub fn last_rain_time(&self) -> u64 {
        self.state.schedule.last_rain_time()
    }

    /// Per-rainee payout recorded for a resolved rainfall index.
    pub fn rainfall_payout(&self, index: u64) -> Result<u64, LedgerError> {
        self.state.schedule.payout(index)
    }

    /// Payout the next tick would record with the current rainee count.
    pub fn rain_per_rainfall_per_person(&self) -> Result<u64, LedgerError> {
        payout_per_rainee(
            self.state.params.max_supply,
            self.state.params.evaporation_rate,
            self.state.registry.len(),
        )
    }

    /// Committed events, oldest first.
    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    /// Drain the committed event log.
    pub fn take_events(&mut self) -> Vec<LedgerEvent> {
        std::mem::take(&mut self.events)
    }

    /// BLAKE3 digest of the committed state.
    pub fn state_root(&self) -> Result<[u8; 32], PluvoError> {
        self.state.state_root()
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Write state and event log as pretty JSON, replacing `path` atomically.
    pub fn save_snapshot(&self, path: &Path) -> Result<(), PluvoError> {
        let snapshot = SnapshotRef {
            magic: SNAPSHOT_MAGIC,
            version: SNAPSHOT_VERSION,
            state: &self.state,
            events: &self.events,
        };
        let json = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| PluvoError::Storage(e.to_string()))?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)
            .map_err(|e| PluvoError::Storage(format!("{}: {e}", tmp.display())))?;
        std::fs::rename(&tmp, path)
            .map_err(|e| PluvoError::Storage(format!("{}: {e}", path.display())))?;
        debug!(path = %path.display(), "snapshot saved");
        Ok(())
    }
}

impl<D: DecayCalculator> LedgerView for Ledger<D> {
    fn total_supply(&self) -> u64 {
        self.state.total_supply
    }

    fn balance_of(&self, owner: &Address, now: u64) -> Result<u64, LedgerError> {
        match self.state.account(owner) {
            Some(acct) => acct.effective_balance(now, &self.state.params, &self.calculator),
            None => Ok(0),
        }
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> u64 {
        self.state
            .account(owner)
            .map(|acct| acct.allowance(spender))
            .unwrap_or(0)
    }

    fn calculate_evaporation(&self, owner: &Address, now: u64) -> Result<u64, LedgerError> {
        match self.state.account(owner) {
            Some(acct) => acct.pending_evaporation(now, &self.state.params, &self.calculator),
            None => Ok(0),
        }
    }

    fn is_registered(&self, addr: &Address) -> bool {
        self.state.registry.contains(addr)
    }

    fn number_of_rainees(&self) -> u64 {
        self.state.registry.len()
    }

    fn current_rainfall_index(&self) -> u64 {
        self.state.schedule.current_rainfall_index()
    }
}
