//! Set of addresses currently eligible for rainfall payouts.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use pluvo_core::types::Address;

/// Registered rainfall participants, kept ordered for a deterministic encoding.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, bincode::Encode)]
pub struct Registry {
    rainees: BTreeSet<Address>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `addr`. Returns `false` if it was already registered.
    pub fn insert(&mut self, addr: Address) -> bool {
        self.rainees.insert(addr)
    }

    /// Remove `addr`. Returns `false` if it was not registered.
    pub fn remove(&mut self, addr: &Address) -> bool {
        self.rainees.remove(addr)
    }

    pub fn contains(&self, addr: &Address) -> bool {
        self.rainees.contains(addr)
    }

    /// Number of registered participants.
    pub fn len(&self) -> u64 {
        self.rainees.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.rainees.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Address> {
        self.rainees.iter()
    }
}
