//! Shared test helpers for scenario and adversarial tests.

use pluvo_core::traits::LedgerView;
use pluvo_core::types::{Address, CallContext};
use pluvo_ledger::{GenesisConfig, Ledger};

/// Registrar of every ledger built by these helpers.
pub const REGISTRAR: Address = Address::repeat_byte(0xaa);
/// Parameter setter of every ledger built by these helpers.
pub const SETTER: Address = Address::repeat_byte(0xbb);

/// Distinct participant address from a seed byte.
pub fn addr(seed: u8) -> Address {
    Address::repeat_byte(seed)
}

/// Call context shorthand.
pub fn ctx(caller: Address, now: u64) -> CallContext {
    CallContext::new(caller, now)
}

/// Genesis with the given emission parameters, starting at t=0.
pub fn genesis(max_supply: u64, numerator: u64, denominator: u64, period: u64) -> GenesisConfig {
    GenesisConfig {
        max_supply,
        evaporation_numerator: numerator,
        evaporation_denominator: denominator,
        seconds_between_rainfalls: period,
        precision: 9,
        registrar: REGISTRAR,
        parameter_setter: SETTER,
        genesis_time: 0,
    }
}

/// Ledger with `maxSupply=100`, rate 1/4 and a one-second period.
pub fn quarter_ledger() -> Ledger {
    Ledger::new(&genesis(100, 1, 4, 1)).expect("valid genesis")
}

/// Register `who` at `now` and let it collect one period later.
///
/// Returns the collected amount.
pub fn register_and_collect(ledger: &mut Ledger, who: Address, now: u64) -> u64 {
    ledger.register(ctx(REGISTRAR, now), who).expect("register");
    let period = ledger.seconds_between_rainfalls();
    ledger
        .collect_rainfall(ctx(who, now + period))
        .expect("collect")
}

/// Sum of stored balances equals the reported total supply.
pub fn assert_supply_conserved(ledger: &Ledger) {
    let raw = ledger.state().raw_supply().expect("raw supply");
    assert_eq!(raw, ledger.total_supply(), "total supply drifted from balances");
}
