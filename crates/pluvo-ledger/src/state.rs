//! Complete ledger state and its canonical encoding.
//!
//! Every collection is ordered, so two ledgers that went through the same
//! operations encode to the same bytes and share a [`LedgerState::state_root`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use pluvo_core::error::{LedgerError, PluvoError};
use pluvo_core::types::Address;

use crate::account::Account;
use crate::config::GenesisConfig;
use crate::governance::{Parameters, Roles};
use crate::registry::Registry;
use crate::scheduler::RainfallSchedule;

/// Everything the ledger persists.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, bincode::Encode)]
pub struct LedgerState {
    /// Realised supply. Always equals the sum of stored account balances.
    pub total_supply: u64,
    pub params: Parameters,
    pub roles: Roles,
    pub schedule: RainfallSchedule,
    pub registry: Registry,
    pub accounts: BTreeMap<Address, Account>,
}

impl LedgerState {
    /// Empty ledger built from a genesis configuration.
    pub fn genesis(config: &GenesisConfig) -> Result<Self, PluvoError> {
        Ok(Self {
            total_supply: 0,
            params: config.parameters()?,
            roles: config.roles(),
            schedule: RainfallSchedule::new(config.genesis_time),
            registry: Registry::new(),
            accounts: BTreeMap::new(),
        })
    }

    /// Account entry, if `addr` was ever referenced.
    pub fn account(&self, addr: &Address) -> Option<&Account> {
        self.accounts.get(addr)
    }

    /// Sum of stored balances across all accounts.
    pub fn raw_supply(&self) -> Result<u64, LedgerError> {
        self.accounts.values().try_fold(0u64, |sum, acct| {
            sum.checked_add(acct.raw_amount)
                .ok_or(LedgerError::ArithmeticOverflow)
        })
    }

    /// Check invariants of a state obtained from outside, e.g. a snapshot.
    pub fn validate(&self) -> Result<(), PluvoError> {
        self.params.validate()?;
        let raw = self.raw_supply()?;
        if raw != self.total_supply {
            return Err(PluvoError::Storage(format!(
                "supply mismatch: total_supply {} but accounts hold {raw}",
                self.total_supply
            )));
        }
        let current = self.schedule.current_rainfall_index();
        if let Some((addr, _)) = self
            .accounts
            .iter()
            .find(|(_, acct)| acct.last_collected_rainfall_index > current)
        {
            return Err(PluvoError::Storage(format!(
                "account {addr} collected beyond rainfall index {current}"
            )));
        }
        Ok(())
    }

    /// Canonical binary encoding (bincode standard configuration).
    pub fn encode(&self) -> Result<Vec<u8>, PluvoError> {
        bincode::encode_to_vec(self, bincode::config::standard())
            .map_err(|e| PluvoError::Storage(e.to_string()))
    }

    /// BLAKE3 digest of the canonical encoding.
    pub fn state_root(&self) -> Result<[u8; 32], PluvoError> {
        Ok(*blake3::hash(&self.encode()?).as_bytes())
    }
}
