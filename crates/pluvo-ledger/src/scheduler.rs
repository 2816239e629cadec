//! Rainfall scheduler: tick catch-up and the payout history.
//!
//! Rainfall `i` is in progress while `current_rainfall_index == i`. When its
//! period ends the per-participant payout is fixed and the index advances.
//! Resolved payouts are immutable.
//!
//! Consecutive ticks resolved with the same payout are stored as one
//! [`PayoutRun`]. Catching up on any number of elapsed ticks therefore
//! touches at most one run, and summing owed payouts walks runs rather than
//! individual ticks.

use serde::{Deserialize, Serialize};

use pluvo_core::constants::FIRST_RAINFALL_INDEX;
use pluvo_core::error::LedgerError;
use pluvo_core::types::EvaporationRate;

/// Consecutive rainfall indices that all paid the same amount per participant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, bincode::Encode)]
pub struct PayoutRun {
    /// First rainfall index of the run.
    pub first_index: u64,
    /// Number of indices in the run.
    pub count: u64,
    /// Amount recorded for each index.
    pub payout: u64,
}

impl PayoutRun {
    /// One past the last index of the run.
    pub fn end(&self) -> u64 {
        self.first_index.saturating_add(self.count)
    }

    fn contains(&self, index: u64) -> bool {
        index >= self.first_index && index < self.end()
    }
}

/// Rainfall owed over a range of indices.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Owed {
    /// Sum of the payouts in the range.
    pub amount: u64,
    /// Number of rainfall indices in the range.
    pub rainfalls: u64,
    /// First index after the range.
    pub next_index: u64,
}

/// Per-participant payout of one tick: `max_supply × rate / rainees`, floored.
///
/// Zero when nobody is registered.
pub fn payout_per_rainee(
    max_supply: u64,
    rate: EvaporationRate,
    rainees: u64,
) -> Result<u64, LedgerError> {
    if rainees == 0 {
        return Ok(0);
    }
    rate.validate()?;
    let per_tick = (max_supply as u128)
        .checked_mul(rate.numerator as u128)
        .ok_or(LedgerError::ArithmeticOverflow)?
        / rate.denominator as u128;
    u64::try_from(per_tick / rainees as u128).map_err(|_| LedgerError::ArithmeticOverflow)
}

/// Tick clock and payout history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, bincode::Encode)]
pub struct RainfallSchedule {
    last_rain_time: u64,
    current_rainfall_index: u64,
    runs: Vec<PayoutRun>,
}

impl RainfallSchedule {
    /// Fresh schedule whose first period starts at `genesis_time`.
    pub fn new(genesis_time: u64) -> Self {
        Self {
            last_rain_time: genesis_time,
            current_rainfall_index: FIRST_RAINFALL_INDEX,
            runs: Vec::new(),
        }
    }

    /// Anchor from which elapsed ticks are counted.
    pub fn last_rain_time(&self) -> u64 {
        self.last_rain_time
    }

    /// Index of the in-progress rainfall.
    pub fn current_rainfall_index(&self) -> u64 {
        self.current_rainfall_index
    }

    /// Resolved payout history, oldest first.
    pub fn runs(&self) -> &[PayoutRun] {
        &self.runs
    }

    /// Ticks that have elapsed since the anchor but are not yet resolved.
    pub fn elapsed_ticks(&self, now: u64, period: u64) -> u64 {
        crate::account::elapsed_periods(self.last_rain_time, now, period)
    }

    /// Resolve every elapsed tick, recording `payout` for each.
    ///
    /// The anchor advances by whole periods so ticks never drift. Returns the
    /// number of ticks resolved; zero within the current period.
    pub fn resolve(&mut self, now: u64, period: u64, payout: u64) -> Result<u64, LedgerError> {
        let ticks = self.elapsed_ticks(now, period);
        if ticks == 0 {
            return Ok(0);
        }

        let next_index = self
            .current_rainfall_index
            .checked_add(ticks)
            .ok_or(LedgerError::ArithmeticOverflow)?;
        let next_anchor = ticks
            .checked_mul(period)
            .and_then(|advance| self.last_rain_time.checked_add(advance))
            .ok_or(LedgerError::ArithmeticOverflow)?;

        match self.runs.last_mut() {
            Some(run) if run.payout == payout && run.end() == self.current_rainfall_index => {
                run.count += ticks;
            }
            _ => self.runs.push(PayoutRun {
                first_index: self.current_rainfall_index,
                count: ticks,
                payout,
            }),
        }

        self.current_rainfall_index = next_index;
        self.last_rain_time = next_anchor;
        Ok(ticks)
    }

    /// Payout recorded for a resolved rainfall index.
    pub fn payout(&self, index: u64) -> Result<u64, LedgerError> {
        let pos = self.runs.partition_point(|run| run.end() <= index);
        match self.runs.get(pos) {
            Some(run) if run.contains(index) => Ok(run.payout),
            _ => Err(LedgerError::RainfallIndexOutOfRange {
                index,
                current: self.current_rainfall_index,
            }),
        }
    }

    /// Sum of resolved payouts from `from` onward, at most `max_count` indices.
    ///
    /// The in-progress rainfall is never included.
    pub fn owed(&self, from: u64, max_count: Option<u64>) -> Result<Owed, LedgerError> {
        let from = from.max(FIRST_RAINFALL_INDEX);
        let end = match max_count {
            Some(n) => from.saturating_add(n).min(self.current_rainfall_index),
            None => self.current_rainfall_index,
        };
        if from >= end {
            return Ok(Owed {
                amount: 0,
                rainfalls: 0,
                next_index: from,
            });
        }

        let start = self.runs.partition_point(|run| run.end() <= from);
        let mut amount: u128 = 0;
        for run in &self.runs[start..] {
            if run.first_index >= end {
                break;
            }
            let lo = run.first_index.max(from);
            let hi = run.end().min(end);
            let part = (run.payout as u128)
                .checked_mul((hi - lo) as u128)
                .ok_or(LedgerError::ArithmeticOverflow)?;
            amount = amount
                .checked_add(part)
                .ok_or(LedgerError::ArithmeticOverflow)?;
        }

        Ok(Owed {
            amount: u64::try_from(amount).map_err(|_| LedgerError::ArithmeticOverflow)?,
            rainfalls: end - from,
            next_index: end,
        })
    }
}
