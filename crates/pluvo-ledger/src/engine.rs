//! Public ledger operations, composed inside a single transaction.
//!
//! Every state-changing operation follows the same order: resolve elapsed
//! rainfall ticks, settle evaporation of the accounts involved, apply the
//! change, then record events. A [`Txn`] mutates whatever state it is given
//! and may leave it half-updated on error; [`Ledger`](crate::Ledger) runs it
//! on a staged copy and only commits on success.

use tracing::{debug, info};

use pluvo_core::error::LedgerError;
use pluvo_core::events::LedgerEvent;
use pluvo_core::traits::DecayCalculator;
use pluvo_core::types::{Address, CallContext, EvaporationRate, Role};

use crate::account::Account;
use crate::governance::{validate_period, validate_precision};
use crate::scheduler::payout_per_rainee;
use crate::state::LedgerState;

/// One in-flight operation against a ledger state.
pub struct Txn<'a, D: DecayCalculator + ?Sized> {
    state: &'a mut LedgerState,
    calculator: &'a D,
    ctx: CallContext,
    events: Vec<LedgerEvent>,
}

impl<'a, D: DecayCalculator + ?Sized> Txn<'a, D> {
    pub fn new(state: &'a mut LedgerState, calculator: &'a D, ctx: CallContext) -> Self {
        Self {
            state,
            calculator,
            ctx,
            events: Vec::new(),
        }
    }

    /// Events recorded so far, consuming the transaction.
    pub fn into_events(self) -> Vec<LedgerEvent> {
        self.events
    }

    // ------------------------------------------------------------------
    // Building blocks
    // ------------------------------------------------------------------

    /// Resolve every rainfall tick elapsed by `ctx.now`. Returns the tick count.
    ///
    /// All ticks caught up in one call share the current rainee count, so
    /// they record the same payout.
    pub fn resolve_rainfalls(&mut self) -> Result<u64, LedgerError> {
        let params = self.state.params;
        let ticks = self
            .state
            .schedule
            .elapsed_ticks(self.ctx.now, params.seconds_between_rainfalls);
        if ticks == 0 {
            return Ok(0);
        }
        let payout = payout_per_rainee(
            params.max_supply,
            params.evaporation_rate,
            self.state.registry.len(),
        )?;
        let resolved = self.state.schedule.resolve(
            self.ctx.now,
            params.seconds_between_rainfalls,
            payout,
        )?;
        debug!(
            ticks = resolved,
            payout,
            current_index = self.state.schedule.current_rainfall_index(),
            "resolved rainfall"
        );
        Ok(resolved)
    }

    /// Account entry for `addr`, opening it at `ctx.now` on first reference.
    fn account_mut(&mut self, addr: Address) -> &mut Account {
        let now = self.ctx.now;
        self.state
            .accounts
            .entry(addr)
            .or_insert_with(|| Account::opened_at(now))
    }

    /// Realise pending evaporation of `addr` and remove it from the supply.
    pub fn settle(&mut self, addr: Address) -> Result<u64, LedgerError> {
        let params = self.state.params;
        let now = self.ctx.now;
        let calculator = self.calculator;
        let evaporated = self.account_mut(addr).settle(now, &params, calculator)?;
        if evaporated > 0 {
            self.state.total_supply = self
                .state
                .total_supply
                .checked_sub(evaporated)
                .ok_or(LedgerError::ArithmeticOverflow)?;
            debug!(account = %addr, evaporated, "settled evaporation");
        }
        Ok(evaporated)
    }

    /// Move `amount` from `from` to `to` after settling both.
    fn move_tokens(&mut self, from: Address, to: Address, amount: u64) -> Result<(), LedgerError> {
        self.settle(from)?;
        self.settle(to)?;

        let have = self.account_mut(from).raw_amount;
        if have < amount {
            return Err(LedgerError::InsufficientBalance { have, need: amount });
        }
        self.account_mut(from).debit(amount)?;
        self.account_mut(to).credit(amount)?;
        debug!(%from, %to, amount, "moved tokens");

        self.events.push(LedgerEvent::Transfer { from, to, amount });
        Ok(())
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    /// Add `addr` to the rainees. Returns `false` if it was already registered.
    ///
    /// A new registrant becomes eligible from the in-progress rainfall onward.
    pub fn register(&mut self, addr: Address) -> Result<bool, LedgerError> {
        self.state.roles.ensure(Role::Registrar, &self.ctx.caller)?;
        self.resolve_rainfalls()?;

        if !self.state.registry.insert(addr) {
            return Ok(false);
        }
        let current = self.state.schedule.current_rainfall_index();
        self.account_mut(addr).last_collected_rainfall_index = current;
        info!(rainee = %addr, from_index = current, "registered");
        Ok(true)
    }

    /// Remove `addr` from the rainees. Returns `false` if it was not registered.
    pub fn unregister(&mut self, addr: Address) -> Result<bool, LedgerError> {
        self.state.roles.ensure(Role::Registrar, &self.ctx.caller)?;
        self.resolve_rainfalls()?;

        let removed = self.state.registry.remove(&addr);
        if removed {
            info!(rainee = %addr, "unregistered");
        }
        Ok(removed)
    }

    // ------------------------------------------------------------------
    // Collection and rainfall
    // ------------------------------------------------------------------

    /// Explicit tick catch-up. Returns the number of ticks resolved.
    pub fn rain(&mut self) -> Result<u64, LedgerError> {
        self.resolve_rainfalls()
    }

    /// Credit the caller with owed rainfall, at most `max_count` indices.
    ///
    /// Fails if the caller is not registered or nothing is owed.
    pub fn collect(&mut self, max_count: Option<u64>) -> Result<u64, LedgerError> {
        let caller = self.ctx.caller;
        self.resolve_rainfalls()?;
        if !self.state.registry.contains(&caller) {
            return Err(LedgerError::NotRegistered(caller));
        }

        let from = self.account_mut(caller).last_collected_rainfall_index;
        let owed = self.state.schedule.owed(from, max_count)?;
        if owed.rainfalls == 0 {
            return Err(LedgerError::NothingToCollect(caller));
        }

        self.settle(caller)?;
        let account = self.account_mut(caller);
        account.credit(owed.amount)?;
        account.last_collected_rainfall_index = owed.next_index;
        self.state.total_supply = self
            .state
            .total_supply
            .checked_add(owed.amount)
            .ok_or(LedgerError::ArithmeticOverflow)?;

        info!(
            recipient = %caller,
            amount = owed.amount,
            rainfalls = owed.rainfalls,
            "collected rainfall"
        );
        self.events.push(LedgerEvent::Collection {
            recipient: caller,
            amount: owed.amount,
        });
        Ok(owed.amount)
    }

    /// Realise pending evaporation of any account. Returns the amount removed.
    pub fn evaporate(&mut self, addr: Address) -> Result<u64, LedgerError> {
        self.resolve_rainfalls()?;
        self.settle(addr)
    }

    // ------------------------------------------------------------------
    // Transfers and allowances
    // ------------------------------------------------------------------

    /// Move `amount` from the caller to `to`.
    pub fn transfer(&mut self, to: Address, amount: u64) -> Result<(), LedgerError> {
        self.resolve_rainfalls()?;
        self.move_tokens(self.ctx.caller, to, amount)
    }

    /// Set the caller's quota for `spender` to exactly `amount`.
    pub fn approve(&mut self, spender: Address, amount: u64) -> Result<(), LedgerError> {
        let owner = self.ctx.caller;
        self.resolve_rainfalls()?;
        self.account_mut(owner).set_allowance(spender, amount);
        self.events.push(LedgerEvent::Approval {
            owner,
            spender,
            amount,
        });
        Ok(())
    }

    /// Move `amount` from `from` to `to` on the caller's quota from `from`.
    pub fn transfer_from(
        &mut self,
        from: Address,
        to: Address,
        amount: u64,
    ) -> Result<(), LedgerError> {
        let spender = self.ctx.caller;
        self.resolve_rainfalls()?;

        let allowance = self
            .state
            .account(&from)
            .map(|acct| acct.allowance(&spender))
            .unwrap_or(0);
        if allowance < amount {
            return Err(LedgerError::InsufficientAllowance {
                have: allowance,
                need: amount,
            });
        }

        self.move_tokens(from, to, amount)?;
        self.account_mut(from)
            .set_allowance(spender, allowance - amount);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Governance
    // ------------------------------------------------------------------

    pub fn set_evaporation_rate(
        &mut self,
        numerator: u64,
        denominator: u64,
    ) -> Result<(), LedgerError> {
        self.state
            .roles
            .ensure(Role::ParameterSetter, &self.ctx.caller)?;
        let rate = EvaporationRate::new(numerator, denominator)?;
        self.resolve_rainfalls()?;
        self.state.params.evaporation_rate = rate;
        info!(%rate, "evaporation rate changed");
        Ok(())
    }

    /// Change the rainfall period. Ticks elapsed under the old period are
    /// resolved first.
    pub fn set_rainfall_period(&mut self, seconds: u64) -> Result<(), LedgerError> {
        self.state
            .roles
            .ensure(Role::ParameterSetter, &self.ctx.caller)?;
        validate_period(seconds)?;
        self.resolve_rainfalls()?;
        self.state.params.seconds_between_rainfalls = seconds;
        info!(seconds, "rainfall period changed");
        Ok(())
    }

    pub fn set_precision(&mut self, precision: u32) -> Result<(), LedgerError> {
        self.state
            .roles
            .ensure(Role::ParameterSetter, &self.ctx.caller)?;
        validate_precision(precision)?;
        self.resolve_rainfalls()?;
        self.state.params.precision = precision;
        info!(precision, "precision changed");
        Ok(())
    }

    pub fn change_registrar(&mut self, new_holder: Address) -> Result<(), LedgerError> {
        self.change_role(Role::Registrar, new_holder)
    }

    pub fn change_parameter_setter(&mut self, new_holder: Address) -> Result<(), LedgerError> {
        self.change_role(Role::ParameterSetter, new_holder)
    }

    fn change_role(&mut self, role: Role, new_holder: Address) -> Result<(), LedgerError> {
        self.state
            .roles
            .reassign(role, &self.ctx.caller, new_holder)?;
        info!(%role, holder = %new_holder, "role reassigned");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenesisConfig;
    use pluvo_decay::DecayEngine;

    const REGISTRAR: Address = Address::repeat_byte(0xaa);
    const SETTER: Address = Address::repeat_byte(0xbb);
    const ALICE: Address = Address::repeat_byte(0x01);
    const BOB: Address = Address::repeat_byte(0x02);

    /// maxSupply 100, rate 1/4, period 10 s, genesis at t=0.
    fn state() -> LedgerState {
        LedgerState::genesis(&GenesisConfig {
            max_supply: 100,
            evaporation_numerator: 1,
            evaporation_denominator: 4,
            seconds_between_rainfalls: 10,
            precision: 9,
            registrar: REGISTRAR,
            parameter_setter: SETTER,
            genesis_time: 0,
        })
        .unwrap()
    }

    fn run<T>(
        state: &mut LedgerState,
        caller: Address,
        now: u64,
        f: impl FnOnce(&mut Txn<'_, DecayEngine>) -> Result<T, LedgerError>,
    ) -> Result<T, LedgerError> {
        let mut txn = Txn::new(state, &DecayEngine, CallContext::new(caller, now));
        f(&mut txn)
    }

    fn fund(state: &mut LedgerState, addr: Address, amount: u64, now: u64) {
        let acct = state
            .accounts
            .entry(addr)
            .or_insert_with(|| Account::opened_at(now));
        acct.raw_amount += amount;
        state.total_supply += amount;
    }

    // --- resolve_rainfalls ---

    #[test]
    fn resolve_without_rainees_records_zero() {
        let mut s = state();
        let ticks = run(&mut s, ALICE, 35, |t| t.rain()).unwrap();
        assert_eq!(ticks, 3);
        assert_eq!(s.schedule.current_rainfall_index(), 4);
        for i in 1..4 {
            assert_eq!(s.schedule.payout(i).unwrap(), 0);
        }
        assert_eq!(s.total_supply, 0);
    }

    #[test]
    fn resolve_twice_in_same_tick() {
        let mut s = state();
        run(&mut s, ALICE, 12, |t| t.rain()).unwrap();
        let second = run(&mut s, ALICE, 19, |t| t.rain()).unwrap();
        assert_eq!(second, 0);
        assert_eq!(s.schedule.current_rainfall_index(), 2);
    }

    // --- register / unregister ---

    #[test]
    fn register_requires_registrar() {
        let mut s = state();
        let err = run(&mut s, SETTER, 0, |t| t.register(ALICE)).unwrap_err();
        assert_eq!(
            err,
            LedgerError::Unauthorized {
                role: Role::Registrar,
                caller: SETTER
            }
        );
    }

    #[test]
    fn register_sets_collection_start() {
        let mut s = state();
        run(&mut s, REGISTRAR, 25, |t| t.register(ALICE)).unwrap();
        assert!(s.registry.contains(&ALICE));
        assert_eq!(s.accounts[&ALICE].last_collected_rainfall_index, 3);
    }

    #[test]
    fn register_twice_is_noop() {
        let mut s = state();
        assert!(run(&mut s, REGISTRAR, 0, |t| t.register(ALICE)).unwrap());
        let before = s.clone();
        assert!(!run(&mut s, REGISTRAR, 5, |t| t.register(ALICE)).unwrap());
        assert_eq!(s, before);
    }

    #[test]
    fn unregister_absent_is_noop() {
        let mut s = state();
        assert!(!run(&mut s, REGISTRAR, 0, |t| t.unregister(ALICE)).unwrap());
    }

    #[test]
    fn registration_change_affects_future_ticks_only() {
        let mut s = state();
        run(&mut s, REGISTRAR, 0, |t| t.register(ALICE)).unwrap();
        // tick 1 resolved with one rainee when BOB registers at t=10
        run(&mut s, REGISTRAR, 10, |t| t.register(BOB)).unwrap();
        run(&mut s, ALICE, 20, |t| t.rain()).unwrap();
        assert_eq!(s.schedule.payout(1).unwrap(), 25);
        assert_eq!(s.schedule.payout(2).unwrap(), 12);
    }

    // --- collect ---

    #[test]
    fn collect_single_rainee_one_tick() {
        let mut s = state();
        run(&mut s, REGISTRAR, 0, |t| t.register(ALICE)).unwrap();
        let (amount, events) = {
            let mut txn = Txn::new(&mut s, &DecayEngine, CallContext::new(ALICE, 10));
            let amount = txn.collect(None).unwrap();
            (amount, txn.into_events())
        };
        assert_eq!(amount, 25);
        assert_eq!(s.accounts[&ALICE].raw_amount, 25);
        assert_eq!(s.total_supply, 25);
        assert_eq!(s.accounts[&ALICE].last_collected_rainfall_index, 2);
        assert_eq!(
            events,
            vec![LedgerEvent::Collection {
                recipient: ALICE,
                amount: 25
            }]
        );
    }

    #[test]
    fn collect_not_registered() {
        let mut s = state();
        let err = run(&mut s, ALICE, 50, |t| t.collect(None)).unwrap_err();
        assert_eq!(err, LedgerError::NotRegistered(ALICE));
    }

    #[test]
    fn collect_nothing_owed() {
        let mut s = state();
        run(&mut s, REGISTRAR, 0, |t| t.register(ALICE)).unwrap();
        let err = run(&mut s, ALICE, 9, |t| t.collect(None)).unwrap_err();
        assert_eq!(err, LedgerError::NothingToCollect(ALICE));
    }

    #[test]
    fn collect_capped_then_rest() {
        let mut s = state();
        run(&mut s, REGISTRAR, 0, |t| t.register(ALICE)).unwrap();
        assert_eq!(run(&mut s, ALICE, 30, |t| t.collect(Some(2))).unwrap(), 50);
        assert_eq!(s.accounts[&ALICE].last_collected_rainfall_index, 3);
        // third tick still owed
        assert_eq!(run(&mut s, ALICE, 30, |t| t.collect(None)).unwrap(), 25);
    }

    #[test]
    fn collect_settles_before_crediting() {
        let mut s = state();
        run(&mut s, REGISTRAR, 0, |t| t.register(ALICE)).unwrap();
        run(&mut s, ALICE, 10, |t| t.collect(None)).unwrap();
        // One period later: 25 -> 18 (0.75 * 25 = 18.75), then +25.
        run(&mut s, ALICE, 20, |t| t.collect(None)).unwrap();
        assert_eq!(s.accounts[&ALICE].raw_amount, 18 + 25);
        assert_eq!(s.total_supply, 43);
    }

    // --- transfer ---

    #[test]
    fn transfer_moves_and_emits() {
        let mut s = state();
        fund(&mut s, ALICE, 100, 0);
        let events = {
            let mut txn = Txn::new(&mut s, &DecayEngine, CallContext::new(ALICE, 5));
            txn.transfer(BOB, 40).unwrap();
            txn.into_events()
        };
        assert_eq!(s.accounts[&ALICE].raw_amount, 60);
        assert_eq!(s.accounts[&BOB].raw_amount, 40);
        assert_eq!(
            events,
            vec![LedgerEvent::Transfer {
                from: ALICE,
                to: BOB,
                amount: 40
            }]
        );
    }

    #[test]
    fn transfer_checks_effective_balance() {
        let mut s = state();
        fund(&mut s, ALICE, 100, 0);
        // after one period ALICE holds 75
        let err = run(&mut s, ALICE, 10, |t| t.transfer(BOB, 76)).unwrap_err();
        assert_eq!(err, LedgerError::InsufficientBalance { have: 75, need: 76 });
    }

    #[test]
    fn transfer_to_self_keeps_balance() {
        let mut s = state();
        fund(&mut s, ALICE, 100, 0);
        run(&mut s, ALICE, 0, |t| t.transfer(ALICE, 100)).unwrap();
        assert_eq!(s.accounts[&ALICE].raw_amount, 100);
        assert_eq!(s.total_supply, 100);
    }

    #[test]
    fn mid_period_touch_restarts_evaporation_clock() {
        let mut s = state();
        fund(&mut s, ALICE, 100, 0);
        run(&mut s, ALICE, 15, |t| t.transfer(BOB, 0)).unwrap();
        assert_eq!(s.accounts[&ALICE].raw_amount, 75);
        assert_eq!(s.accounts[&ALICE].last_evaporation_time, 15);

        // Less than a period since t=15: no further evaporation.
        assert_eq!(run(&mut s, BOB, 20, |t| t.evaporate(ALICE)).unwrap(), 0);
        assert_eq!(s.accounts[&ALICE].raw_amount, 75);
    }

    #[test]
    fn transfer_settles_recipient() {
        let mut s = state();
        fund(&mut s, ALICE, 100, 0);
        fund(&mut s, BOB, 100, 0);
        run(&mut s, ALICE, 10, |t| t.transfer(BOB, 10)).unwrap();
        assert_eq!(s.accounts[&ALICE].raw_amount, 65);
        assert_eq!(s.accounts[&BOB].raw_amount, 85);
        assert_eq!(s.total_supply, 150);
    }

    // --- approve / transfer_from ---

    #[test]
    fn approve_emits_approval() {
        let mut s = state();
        let events = {
            let mut txn = Txn::new(&mut s, &DecayEngine, CallContext::new(ALICE, 0));
            txn.approve(BOB, 30).unwrap();
            txn.into_events()
        };
        assert_eq!(
            events,
            vec![LedgerEvent::Approval {
                owner: ALICE,
                spender: BOB,
                amount: 30
            }]
        );
    }

    #[test]
    fn transfer_from_emits_transfer_from_owner() {
        let mut s = state();
        let carol = Address::repeat_byte(0x03);
        fund(&mut s, ALICE, 100, 0);
        run(&mut s, ALICE, 0, |t| t.approve(BOB, 30)).unwrap();
        let events = {
            let mut txn = Txn::new(&mut s, &DecayEngine, CallContext::new(BOB, 1));
            txn.transfer_from(ALICE, carol, 20).unwrap();
            txn.into_events()
        };
        assert_eq!(
            events,
            vec![LedgerEvent::Transfer {
                from: ALICE,
                to: carol,
                amount: 20
            }]
        );
    }

    #[test]
    fn approve_is_absolute() {
        let mut s = state();
        run(&mut s, ALICE, 0, |t| t.approve(BOB, 30)).unwrap();
        run(&mut s, ALICE, 0, |t| t.approve(BOB, 10)).unwrap();
        assert_eq!(s.accounts[&ALICE].allowance(&BOB), 10);
    }

    #[test]
    fn transfer_from_exhausts_allowance() {
        let mut s = state();
        let carol = Address::repeat_byte(0x03);
        fund(&mut s, ALICE, 100, 0);
        run(&mut s, ALICE, 0, |t| t.approve(BOB, 30)).unwrap();
        run(&mut s, BOB, 1, |t| t.transfer_from(ALICE, carol, 30)).unwrap();
        assert_eq!(s.accounts[&ALICE].allowance(&BOB), 0);
        assert_eq!(s.accounts[&carol].raw_amount, 30);
    }

    #[test]
    fn transfer_from_insufficient_allowance() {
        let mut s = state();
        fund(&mut s, ALICE, 100, 0);
        run(&mut s, ALICE, 0, |t| t.approve(BOB, 5)).unwrap();
        let err = run(&mut s, BOB, 0, |t| t.transfer_from(ALICE, BOB, 6)).unwrap_err();
        assert_eq!(err, LedgerError::InsufficientAllowance { have: 5, need: 6 });
    }

    #[test]
    fn transfer_from_insufficient_balance() {
        let mut s = state();
        fund(&mut s, ALICE, 10, 0);
        run(&mut s, ALICE, 0, |t| t.approve(BOB, 50)).unwrap();
        let err = run(&mut s, BOB, 0, |t| t.transfer_from(ALICE, BOB, 11)).unwrap_err();
        assert_eq!(err, LedgerError::InsufficientBalance { have: 10, need: 11 });
    }

    // --- governance ---

    #[test]
    fn set_rate_requires_setter() {
        let mut s = state();
        let err = run(&mut s, REGISTRAR, 0, |t| t.set_evaporation_rate(1, 2)).unwrap_err();
        assert!(matches!(err, LedgerError::Unauthorized { role: Role::ParameterSetter, .. }));
    }

    #[test]
    fn set_rate_validates() {
        let mut s = state();
        assert!(matches!(
            run(&mut s, SETTER, 0, |t| t.set_evaporation_rate(1, 0)),
            Err(LedgerError::InvalidParameter(_))
        ));
        assert!(matches!(
            run(&mut s, SETTER, 0, |t| t.set_evaporation_rate(3, 2)),
            Err(LedgerError::InvalidParameter(_))
        ));
    }

    #[test]
    fn set_rate_resolves_under_old_rate() {
        let mut s = state();
        run(&mut s, REGISTRAR, 0, |t| t.register(ALICE)).unwrap();
        run(&mut s, SETTER, 10, |t| t.set_evaporation_rate(1, 2)).unwrap();
        run(&mut s, ALICE, 20, |t| t.rain()).unwrap();
        assert_eq!(s.schedule.payout(1).unwrap(), 25);
        assert_eq!(s.schedule.payout(2).unwrap(), 50);
    }

    #[test]
    fn set_period_resolves_under_old_period() {
        let mut s = state();
        run(&mut s, SETTER, 25, |t| t.set_rainfall_period(100)).unwrap();
        assert_eq!(s.schedule.current_rainfall_index(), 3);
        assert_eq!(s.schedule.last_rain_time(), 20);
        assert_eq!(s.params.seconds_between_rainfalls, 100);
    }

    #[test]
    fn set_period_zero_rejected() {
        let mut s = state();
        assert!(run(&mut s, SETTER, 0, |t| t.set_rainfall_period(0)).is_err());
    }

    #[test]
    fn set_precision_bounds() {
        let mut s = state();
        assert!(run(&mut s, SETTER, 0, |t| t.set_precision(2)).is_err());
        run(&mut s, SETTER, 0, |t| t.set_precision(3)).unwrap();
        assert_eq!(s.params.precision, 3);
        run(&mut s, SETTER, 0, |t| t.set_precision(40)).unwrap();
        assert_eq!(s.params.precision, 40);
    }

    #[test]
    fn precision_above_scale_cap_still_decays() {
        let mut s = state();
        fund(&mut s, ALICE, 100, 0);
        run(&mut s, SETTER, 0, |t| t.set_precision(30)).unwrap();
        assert_eq!(run(&mut s, BOB, 10, |t| t.evaporate(ALICE)).unwrap(), 25);
    }

    #[test]
    fn change_roles_independently() {
        let mut s = state();
        run(&mut s, REGISTRAR, 0, |t| t.change_registrar(ALICE)).unwrap();
        assert_eq!(s.roles.registrar, ALICE);
        assert_eq!(s.roles.parameter_setter, SETTER);
        assert!(run(&mut s, REGISTRAR, 0, |t| t.register(BOB)).is_err());
        assert!(run(&mut s, ALICE, 0, |t| t.change_parameter_setter(ALICE)).is_err());
    }

    #[test]
    fn change_role_does_not_resolve() {
        let mut s = state();
        run(&mut s, SETTER, 1_000, |t| t.change_parameter_setter(BOB)).unwrap();
        assert_eq!(s.schedule.current_rainfall_index(), 1);
    }

    // --- evaporate ---

    #[test]
    fn evaporate_realises_pending() {
        let mut s = state();
        fund(&mut s, ALICE, 100, 0);
        let removed = run(&mut s, BOB, 10, |t| t.evaporate(ALICE)).unwrap();
        assert_eq!(removed, 25);
        assert_eq!(s.total_supply, 75);
        assert_eq!(s.raw_supply().unwrap(), 75);
    }
}
