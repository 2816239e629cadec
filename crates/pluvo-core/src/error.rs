//! Error types for the Pluvo ledger.
use thiserror::Error;

use crate::types::{Address, Role};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("invalid hex address: {0}")] InvalidHex(String),
    #[error("invalid address length: {0} bytes")] InvalidLength(usize),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParameterError {
    #[error("evaporation denominator must be non-zero")] ZeroDenominator,
    #[error("evaporation rate {numerator}/{denominator} exceeds one")] RateAboveOne { numerator: u64, denominator: u64 },
    #[error("rainfall period must be non-zero")] ZeroPeriod,
    #[error("precision {got} below minimum {min}")] PrecisionTooLow { got: u32, min: u32 },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecayError {
    #[error("arithmetic overflow")] ArithmeticOverflow,
    #[error("invalid decay parameter: {0}")] InvalidParameter(#[from] ParameterError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("{caller} is not the {role}")] Unauthorized { role: Role, caller: Address },
    #[error("invalid parameter: {0}")] InvalidParameter(#[from] ParameterError),
    #[error("insufficient balance: have {have}, need {need}")] InsufficientBalance { have: u64, need: u64 },
    #[error("insufficient allowance: have {have}, need {need}")] InsufficientAllowance { have: u64, need: u64 },
    #[error("{0} is not registered for rainfall")] NotRegistered(Address),
    #[error("no rainfall owed to {0}")] NothingToCollect(Address),
    #[error("rainfall index {index} out of range (current {current})")] RainfallIndexOutOfRange { index: u64, current: u64 },
    #[error("arithmetic overflow")] ArithmeticOverflow,
    #[error(transparent)] Decay(#[from] DecayError),
}

#[derive(Error, Debug)]
pub enum PluvoError {
    #[error(transparent)] Ledger(#[from] LedgerError),
    #[error(transparent)] Decay(#[from] DecayError),
    #[error(transparent)] Parameter(#[from] ParameterError),
    #[error(transparent)] Address(#[from] AddressError),
    #[error("storage: {0}")] Storage(String),
    #[error("config: {0}")] Config(String),
}
