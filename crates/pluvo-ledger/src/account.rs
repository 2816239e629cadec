//! Per-account ledger entry and lazy evaporation settlement.
//!
//! An account stores only its undecayed balance and the instant up to which
//! evaporation has been realised. The effective balance at any later time is
//! recomputed from those two values, so nothing has to run while an account
//! sits untouched.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use pluvo_core::error::LedgerError;
use pluvo_core::traits::DecayCalculator;
use pluvo_core::types::Address;

use crate::governance::Parameters;

/// Whole rainfall periods between `since` and `now`.
///
/// Zero if `now` precedes `since` or the period is zero.
pub fn elapsed_periods(since: u64, now: u64, period: u64) -> u64 {
    now.saturating_sub(since).checked_div(period).unwrap_or(0)
}

/// One participant's ledger entry. Created on first reference, never removed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, bincode::Encode)]
pub struct Account {
    /// Stored balance with evaporation realised up to `last_evaporation_time`.
    pub raw_amount: u64,
    /// Time of the last settlement that realised at least one period. Never moves backwards.
    pub last_evaporation_time: u64,
    /// First rainfall index not yet credited to this account.
    pub last_collected_rainfall_index: u64,
    /// Delegated-transfer quotas granted by this account, keyed by spender.
    pub allowances: BTreeMap<Address, u64>,
}

impl Account {
    /// Empty account whose evaporation clock starts at `now`.
    pub fn opened_at(now: u64) -> Self {
        Self {
            last_evaporation_time: now,
            ..Self::default()
        }
    }

    /// Evaporation that settling at `now` would realise. Does not mutate.
    pub fn pending_evaporation<D: DecayCalculator + ?Sized>(
        &self,
        now: u64,
        params: &Parameters,
        calculator: &D,
    ) -> Result<u64, LedgerError> {
        let periods = elapsed_periods(
            self.last_evaporation_time,
            now,
            params.seconds_between_rainfalls,
        );
        if periods == 0 {
            return Ok(0);
        }
        Ok(calculator.evaporated(
            self.raw_amount,
            params.evaporation_rate,
            periods,
            params.precision,
        )?)
    }

    /// Stored balance minus pending evaporation at `now`.
    pub fn effective_balance<D: DecayCalculator + ?Sized>(
        &self,
        now: u64,
        params: &Parameters,
        calculator: &D,
    ) -> Result<u64, LedgerError> {
        let pending = self.pending_evaporation(now, params, calculator)?;
        self.raw_amount
            .checked_sub(pending)
            .ok_or(LedgerError::ArithmeticOverflow)
    }

    /// Realise pending evaporation into the stored balance.
    ///
    /// Once at least one whole period has elapsed the anchor moves to `now`.
    /// Returns the amount removed.
    pub fn settle<D: DecayCalculator + ?Sized>(
        &mut self,
        now: u64,
        params: &Parameters,
        calculator: &D,
    ) -> Result<u64, LedgerError> {
        let periods = elapsed_periods(
            self.last_evaporation_time,
            now,
            params.seconds_between_rainfalls,
        );
        if periods == 0 {
            return Ok(0);
        }

        let evaporated = calculator.evaporated(
            self.raw_amount,
            params.evaporation_rate,
            periods,
            params.precision,
        )?;
        let raw_amount = self
            .raw_amount
            .checked_sub(evaporated)
            .ok_or(LedgerError::ArithmeticOverflow)?;

        self.raw_amount = raw_amount;
        self.last_evaporation_time = now;
        Ok(evaporated)
    }

    /// Add to the stored balance.
    pub fn credit(&mut self, amount: u64) -> Result<(), LedgerError> {
        self.raw_amount = self
            .raw_amount
            .checked_add(amount)
            .ok_or(LedgerError::ArithmeticOverflow)?;
        Ok(())
    }

    /// Remove from the stored balance. Callers settle first.
    pub fn debit(&mut self, amount: u64) -> Result<(), LedgerError> {
        self.raw_amount = self
            .raw_amount
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientBalance {
                have: self.raw_amount,
                need: amount,
            })?;
        Ok(())
    }

    /// Quota granted to `spender`.
    pub fn allowance(&self, spender: &Address) -> u64 {
        self.allowances.get(spender).copied().unwrap_or(0)
    }

    /// Overwrite the quota granted to `spender`. A zero quota drops the entry.
    pub fn set_allowance(&mut self, spender: Address, amount: u64) {
        if amount == 0 {
            self.allowances.remove(&spender);
        } else {
            self.allowances.insert(spender, amount);
        }
    }
}
