//! Core ledger types: participant addresses, roles, evaporation rates, and
//! the per-invocation call context.
//!
//! All amounts are `u64` whole tokens and all timestamps are `u64` Unix seconds,
//! matching the protocol convention used throughout the workspace.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::ADDRESS_LEN;
use crate::error::{AddressError, ParameterError};

/// A 20-byte participant identity.
///
/// Rendered as `0x`-prefixed lowercase hex. Parsing accepts the prefix as
/// optional and either letter case.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default, bincode::Encode)]
pub struct Address(pub [u8; ADDRESS_LEN]);

impl Address {
    /// The all-zero address.
    pub const ZERO: Self = Self([0u8; ADDRESS_LEN]);

    /// Address with every byte set to `byte`.
    pub const fn repeat_byte(byte: u8) -> Self {
        Self([byte; ADDRESS_LEN])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        let bytes = hex::decode(digits).map_err(|_| AddressError::InvalidHex(s.to_string()))?;
        let array: [u8; ADDRESS_LEN] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| AddressError::InvalidLength(bytes.len()))?;
        Ok(Self(array))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// One of the two privileged capabilities.
///
/// Each role has exactly one holder, and only the current holder may hand it on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// May add and remove rainfall participants.
    Registrar,
    /// May tune evaporation rate, rainfall period, and precision.
    ParameterSetter,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Registrar => f.write_str("registrar"),
            Self::ParameterSetter => f.write_str("parameter setter"),
        }
    }
}

/// Fraction of a balance that evaporates per rainfall period.
///
/// Invariant: `denominator > 0` and `numerator <= denominator`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, bincode::Encode)]
pub struct EvaporationRate {
    pub numerator: u64,
    pub denominator: u64,
}

impl EvaporationRate {
    /// Build a rate, rejecting a zero denominator or a fraction above one.
    ///
    /// # Examples
    ///
    /// ```
    /// use pluvo_core::types::EvaporationRate;
    /// let rate = EvaporationRate::new(1, 4).unwrap();
    /// assert_eq!(rate.numerator, 1);
    /// assert!(EvaporationRate::new(1, 0).is_err());
    /// assert!(EvaporationRate::new(5, 4).is_err());
    /// ```
    pub fn new(numerator: u64, denominator: u64) -> Result<Self, ParameterError> {
        let rate = Self {
            numerator,
            denominator,
        };
        rate.validate()?;
        Ok(rate)
    }

    /// Check the rate invariant.
    pub fn validate(&self) -> Result<(), ParameterError> {
        if self.denominator == 0 {
            return Err(ParameterError::ZeroDenominator);
        }
        if self.numerator > self.denominator {
            return Err(ParameterError::RateAboveOne {
                numerator: self.numerator,
                denominator: self.denominator,
            });
        }
        Ok(())
    }

    /// Whether nothing evaporates at this rate.
    pub fn is_zero(&self) -> bool {
        self.numerator == 0
    }

    /// Whether everything evaporates after a single period.
    pub fn is_total(&self) -> bool {
        self.numerator == self.denominator
    }
}

impl fmt::Display for EvaporationRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// Identity and clock reading of a single invocation.
///
/// The ledger has no clock of its own: time is whatever the invoking
/// environment reports at the start of each operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CallContext {
    /// Identity the operation is performed as.
    pub caller: Address,
    /// Unix timestamp (seconds) of the invocation.
    pub now: u64,
}

impl CallContext {
    pub fn new(caller: Address, now: u64) -> Self {
        Self { caller, now }
    }
}
