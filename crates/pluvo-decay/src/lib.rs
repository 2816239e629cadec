//! # pluvo-decay — Fixed-point evaporation engine.
//!
//! All calculations use integer arithmetic only for determinism.
//!
//! A balance held for `p` rainfall periods at evaporation rate `r` keeps
//! `balance × (1 − r)^p`. The power is evaluated by binary exponentiation in
//! a decimal fixed-point scale of `10^precision`, so the cost of one call is
//! at most 64 squarings however long an account sat untouched.
//!
//! Every intermediate product is truncated toward zero. Truncating the
//! squaring chain this way keeps the result non-increasing in `p` and lets
//! it reach exactly zero once the true value drops below the scale.

pub mod engine;

pub use engine::{fixed_pow, fixed_scale, retention_factor, DecayEngine};
