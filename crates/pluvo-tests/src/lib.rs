//! Scenario and adversarial test suite for the Pluvo ledger.
//!
//! Integration tests drive a [`Ledger`](pluvo_ledger::Ledger) through its
//! public operations only and check the ledger-wide invariants: supply
//! conservation, non-negative balances, rollback on failure and bounded
//! catch-up cost after arbitrarily long idle periods.

pub mod helpers;
