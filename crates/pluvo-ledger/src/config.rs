//! Genesis configuration for a new ledger.
//!
//! Values come from, in increasing priority: built-in defaults, an optional
//! JSON file, and `PLUVO_*` environment variables.

use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use pluvo_core::constants::{
    DEFAULT_EVAPORATION_DENOMINATOR, DEFAULT_EVAPORATION_NUMERATOR, DEFAULT_MAX_SUPPLY,
    DEFAULT_PRECISION, DEFAULT_SECONDS_BETWEEN_RAINFALLS,
};
use pluvo_core::error::{ParameterError, PluvoError};
use pluvo_core::types::{Address, EvaporationRate};

use crate::governance::{Parameters, Roles};

/// Parameters and role holders a ledger starts with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenesisConfig {
    /// Emission sizing target.
    pub max_supply: u64,
    pub evaporation_numerator: u64,
    pub evaporation_denominator: u64,
    /// Length of one rainfall period in seconds.
    pub seconds_between_rainfalls: u64,
    /// Decimal digits of the decay fixed-point scale.
    pub precision: u32,
    pub registrar: Address,
    pub parameter_setter: Address,
    /// Unix time at which the first rainfall period starts.
    pub genesis_time: u64,
}

impl Default for GenesisConfig {
    fn default() -> Self {
        Self {
            max_supply: DEFAULT_MAX_SUPPLY,
            evaporation_numerator: DEFAULT_EVAPORATION_NUMERATOR,
            evaporation_denominator: DEFAULT_EVAPORATION_DENOMINATOR,
            seconds_between_rainfalls: DEFAULT_SECONDS_BETWEEN_RAINFALLS,
            precision: DEFAULT_PRECISION,
            registrar: Address::ZERO,
            parameter_setter: Address::ZERO,
            genesis_time: 0,
        }
    }
}

impl GenesisConfig {
    /// Load from a JSON file. Missing fields take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, PluvoError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| PluvoError::Config(format!("{}: {e}", path.display())))?;
        serde_json::from_str(&raw)
            .map_err(|e| PluvoError::Config(format!("{}: {e}", path.display())))
    }

    /// Apply `PLUVO_*` overrides from the process environment.
    pub fn with_env(self) -> Result<Self, PluvoError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply `PLUVO_*` overrides from an arbitrary key lookup.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, PluvoError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = parse_var(&lookup, "PLUVO_MAX_SUPPLY")? {
            self.max_supply = v;
        }
        if let Some(v) = parse_var(&lookup, "PLUVO_EVAPORATION_NUMERATOR")? {
            self.evaporation_numerator = v;
        }
        if let Some(v) = parse_var(&lookup, "PLUVO_EVAPORATION_DENOMINATOR")? {
            self.evaporation_denominator = v;
        }
        if let Some(v) = parse_var(&lookup, "PLUVO_SECONDS_BETWEEN_RAINFALLS")? {
            self.seconds_between_rainfalls = v;
        }
        if let Some(v) = parse_var(&lookup, "PLUVO_PRECISION")? {
            self.precision = v;
        }
        if let Some(v) = parse_var(&lookup, "PLUVO_REGISTRAR")? {
            self.registrar = v;
        }
        if let Some(v) = parse_var(&lookup, "PLUVO_PARAMETER_SETTER")? {
            self.parameter_setter = v;
        }
        if let Some(v) = parse_var(&lookup, "PLUVO_GENESIS_TIME")? {
            self.genesis_time = v;
        }
        Ok(self)
    }

    /// Ledger parameters, validated.
    pub fn parameters(&self) -> Result<Parameters, ParameterError> {
        let params = Parameters {
            max_supply: self.max_supply,
            evaporation_rate: EvaporationRate::new(
                self.evaporation_numerator,
                self.evaporation_denominator,
            )?,
            seconds_between_rainfalls: self.seconds_between_rainfalls,
            precision: self.precision,
        };
        params.validate()?;
        Ok(params)
    }

    /// Initial role holders.
    pub fn roles(&self) -> Roles {
        Roles {
            registrar: self.registrar,
            parameter_setter: self.parameter_setter,
        }
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>, PluvoError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| PluvoError::Config(format!("{key}: {e}"))),
        None => Ok(None),
    }
}
