//! Decay engine implementing the [`DecayCalculator`] trait.
//!
//! Compound evaporation over many periods is computed with binary
//! exponentiation, so cost depends on the bit length of `periods` and never
//! on its magnitude. All arithmetic is integer-only with u128 intermediates
//! and checked multiplication.

use pluvo_core::constants::{MAX_PRECISION, MIN_PRECISION};
use pluvo_core::error::{DecayError, ParameterError};
use pluvo_core::traits::DecayCalculator;
use pluvo_core::types::EvaporationRate;

/// The production decay calculator.
///
/// Implements [`DecayCalculator`] with:
/// - Decimal fixed-point scale chosen per call by `precision`
/// - Compound decay via truncating binary exponentiation
/// - Early exit once the retained fraction reaches zero
#[derive(Debug, Clone, Copy, Default)]
pub struct DecayEngine;

impl DecayEngine {
    /// Create a new DecayEngine.
    pub fn new() -> Self {
        Self
    }
}

/// Fixed-point scale `10^precision`, capped at `10^MAX_PRECISION`.
pub fn fixed_scale(precision: u32) -> Result<u128, DecayError> {
    if precision < MIN_PRECISION {
        return Err(ParameterError::PrecisionTooLow {
            got: precision,
            min: MIN_PRECISION,
        }
        .into());
    }
    Ok(10u128.pow(precision.min(MAX_PRECISION)))
}

/// Fraction kept per period, `(1 − rate)`, in fixed point with denominator `scale`.
///
/// Truncated toward zero, so any non-zero rate yields a factor strictly below `scale`.
pub fn retention_factor(rate: EvaporationRate, scale: u128) -> Result<u128, DecayError> {
    rate.validate()?;
    let kept = (rate.denominator - rate.numerator) as u128;
    Ok(kept
        .checked_mul(scale)
        .ok_or(DecayError::ArithmeticOverflow)?
        / rate.denominator as u128)
}

/// Fixed-point exponentiation: computes `(base/scale)^exp` in fixed point.
///
/// Uses right-to-left binary exponentiation for O(log n) multiplications.
/// `base` must not exceed `scale`. Because every squared power is no larger
/// than the partial product it replaces, the truncated result is
/// non-increasing in `exp`.
pub fn fixed_pow(base: u128, exp: u64, scale: u128) -> Result<u128, DecayError> {
    if exp == 0 {
        return Ok(scale); // (base/scale)^0 = 1.0
    }

    let mut result: u128 = scale;
    let mut b: u128 = base;
    let mut e = exp;

    while e > 0 {
        // A set bit remains, and every remaining factor is zero.
        if b == 0 {
            return Ok(0);
        }
        if e & 1 == 1 {
            result = result
                .checked_mul(b)
                .ok_or(DecayError::ArithmeticOverflow)?
                / scale;
            if result == 0 {
                return Ok(0);
            }
        }
        e >>= 1;
        if e > 0 {
            b = b.checked_mul(b).ok_or(DecayError::ArithmeticOverflow)? / scale;
        }
    }

    Ok(result)
}

impl DecayCalculator for DecayEngine {
    fn decay(
        &self,
        amount: u64,
        rate: EvaporationRate,
        periods: u64,
        precision: u32,
    ) -> Result<u64, DecayError> {
        let scale = fixed_scale(precision)?;
        rate.validate()?;

        if periods == 0 || amount == 0 || rate.is_zero() {
            return Ok(amount);
        }
        if rate.is_total() {
            return Ok(0);
        }

        let retention = retention_factor(rate, scale)?;
        let factor = fixed_pow(retention, periods, scale)?;

        // remaining = amount * factor / scale, never above amount since factor <= scale
        let remaining = (amount as u128)
            .checked_mul(factor)
            .ok_or(DecayError::ArithmeticOverflow)?
            / scale;

        u64::try_from(remaining).map_err(|_| DecayError::ArithmeticOverflow)
    }
}
