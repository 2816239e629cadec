//! Trait interfaces for the Pluvo ledger.
//!
//! These traits define the contracts between crates:
//! - [`DecayCalculator`] — fixed-point evaporation math (pluvo-decay implements)
//! - [`LedgerView`] — read-only ledger queries (pluvo-ledger implements)

use crate::error::{DecayError, LedgerError};
use crate::types::{Address, EvaporationRate};

/// Pure computation of evaporated balances.
///
/// All math is integer fixed-point. `precision` is the number of decimal
/// digits in the fixed-point scale, so a larger precision costs nothing extra
/// per call but loses less to truncation.
pub trait DecayCalculator: Send + Sync {
    /// Balance remaining after `periods` rainfall periods at `rate`:
    /// `amount × (1 − rate)^periods`, truncated toward zero.
    ///
    /// Must return `amount` when `periods == 0` and must be non-increasing
    /// in `periods`. Cost may not grow with `periods`.
    fn decay(
        &self,
        amount: u64,
        rate: EvaporationRate,
        periods: u64,
        precision: u32,
    ) -> Result<u64, DecayError>;

    /// Amount that evaporates over `periods` periods.
    ///
    /// Default implementation: `amount - decay(...)`.
    fn evaporated(
        &self,
        amount: u64,
        rate: EvaporationRate,
        periods: u64,
        precision: u32,
    ) -> Result<u64, DecayError> {
        let remaining = self.decay(amount, rate, periods, precision)?;
        amount
            .checked_sub(remaining)
            .ok_or(DecayError::ArithmeticOverflow)
    }
}

/// Read-only view of the ledger.
///
/// Time-dependent queries take `now` explicitly and never mutate state, so a
/// balance read reflects decay up to `now` without settling it.
pub trait LedgerView {
    /// Realised supply: the sum of all stored balances.
    fn total_supply(&self) -> u64;

    /// Effective balance of `owner` at `now` (stored balance minus pending evaporation).
    fn balance_of(&self, owner: &Address, now: u64) -> Result<u64, LedgerError>;

    /// Remaining delegated-transfer quota granted by `owner` to `spender`.
    fn allowance(&self, owner: &Address, spender: &Address) -> u64;

    /// Evaporation of `owner` that would be realised by settling at `now`.
    fn calculate_evaporation(&self, owner: &Address, now: u64) -> Result<u64, LedgerError>;

    /// Whether `addr` currently takes part in rainfall.
    fn is_registered(&self, addr: &Address) -> bool;

    /// Number of registered rainfall participants.
    fn number_of_rainees(&self) -> u64;

    /// Index of the in-progress rainfall (1-based).
    fn current_rainfall_index(&self) -> u64;
}
