//! Tunable ledger parameters and the two privileged roles.
//!
//! The registrar and the parameter setter are independent single-holder
//! capabilities. Neither implies the other, and each can only be handed on by
//! its current holder.

use serde::{Deserialize, Serialize};

use pluvo_core::constants::MIN_PRECISION;
use pluvo_core::error::{LedgerError, ParameterError};
use pluvo_core::types::{Address, EvaporationRate, Role};

/// Parameters governing evaporation and rainfall sizing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, bincode::Encode)]
pub struct Parameters {
    /// Emission sizing target. Immutable after genesis.
    pub max_supply: u64,
    /// Fraction of a balance that evaporates per rainfall period.
    pub evaporation_rate: EvaporationRate,
    /// Length of one rainfall period in seconds.
    pub seconds_between_rainfalls: u64,
    /// Decimal digits of the decay fixed-point scale.
    pub precision: u32,
}

impl Parameters {
    /// Validate every field against the parameter rules.
    pub fn validate(&self) -> Result<(), ParameterError> {
        self.evaporation_rate.validate()?;
        validate_period(self.seconds_between_rainfalls)?;
        validate_precision(self.precision)
    }
}

/// A rainfall period must be at least one second.
pub fn validate_period(seconds: u64) -> Result<(), ParameterError> {
    if seconds == 0 {
        return Err(ParameterError::ZeroPeriod);
    }
    Ok(())
}

/// Precision must be at least `MIN_PRECISION`. There is no upper bound.
pub fn validate_precision(precision: u32) -> Result<(), ParameterError> {
    if precision < MIN_PRECISION {
        return Err(ParameterError::PrecisionTooLow {
            got: precision,
            min: MIN_PRECISION,
        });
    }
    Ok(())
}

/// Current holders of the privileged roles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, bincode::Encode)]
pub struct Roles {
    pub registrar: Address,
    pub parameter_setter: Address,
}

impl Roles {
    /// Holder of `role`.
    pub fn holder(&self, role: Role) -> Address {
        match role {
            Role::Registrar => self.registrar,
            Role::ParameterSetter => self.parameter_setter,
        }
    }

    /// Reject `caller` unless it currently holds `role`.
    pub fn ensure(&self, role: Role, caller: &Address) -> Result<(), LedgerError> {
        if self.holder(role) != *caller {
            return Err(LedgerError::Unauthorized {
                role,
                caller: *caller,
            });
        }
        Ok(())
    }

    /// Hand `role` from `caller` to `new_holder`.
    pub fn reassign(
        &mut self,
        role: Role,
        caller: &Address,
        new_holder: Address,
    ) -> Result<(), LedgerError> {
        self.ensure(role, caller)?;
        match role {
            Role::Registrar => self.registrar = new_holder,
            Role::ParameterSetter => self.parameter_setter = new_holder,
        }
        Ok(())
    }
}
