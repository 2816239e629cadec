//! # pluvo-ledger — Evaporating-balance ledger with scheduled rainfall.
//!
//! The ledger has no background timer. Every operation receives the current
//! time from its [`CallContext`](pluvo_core::types::CallContext) and first
//! catches up on elapsed rainfall ticks, then settles the evaporation of the
//! accounts it touches, then applies its own change.
//!
//! - [`account`]: per-account stored balance, settlement, allowances
//! - [`scheduler`]: rainfall ticks and the payout history
//! - [`registry`]: the set of rainfall participants
//! - [`governance`]: tunable parameters and the two privileged roles
//! - [`engine`]: the public operations composed inside one transaction
//! - [`ledger`]: atomic execution host, queries, snapshots, state digest
//! - [`config`]: genesis configuration

pub mod account;
pub mod config;
pub mod engine;
pub mod governance;
pub mod ledger;
pub mod registry;
pub mod scheduler;
pub mod state;

pub use config::GenesisConfig;
pub use engine::Txn;
pub use ledger::Ledger;
pub use state::LedgerState;
