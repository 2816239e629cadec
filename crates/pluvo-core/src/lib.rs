//! # pluvo-core
//! Foundation types and traits for the Pluvo ledger.

pub mod constants;
pub mod error;
pub mod events;
pub mod traits;
pub mod types;
