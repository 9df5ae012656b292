//! The engine: pool + ledger behind one mutable value.
//!
//! Each operation is an atomic, serializable unit of work. The sequencing
//! discipline is the same everywhere: validate and pull (fallible external
//! debits) first, mutate internal state second, push (external credits)
//! last. Price reads sit inside the same `&mut self` call as the check they
//! guard, so no swap can change the price between a health check and its
//! effect.
//!
//! Asset custody uses two reserved vault accounts: the ledger vault holds
//! locked collateral and the lendable borrowable balance, the pool vault
//! backs the pool's reserves one-for-one.

use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::ledger::{self, Position};
use crate::pool::{Asset, DexStats, Pool};
use crate::token::{AccountId, InMemoryToken, NativeBank, Token, TokenError};
use crate::{COLLATERAL_RATIO_BPS, NO_DEBT_HEALTH_BPS};

/// Outward snapshot of one account, the shape the query surface returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserPosition {
    pub collateral: u128,
    pub debt: u128,
    pub collateral_value: u128,
    pub health_ratio_bps: u128,
    pub liquidatable: bool,
}

/// What a completed liquidation moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Liquidation {
    /// Borrowable pulled from the liquidator into the ledger.
    pub debt_repaid: u128,
    /// Native collateral paid out to the liquidator.
    pub collateral_paid: u128,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Engine<T: Token = InMemoryToken> {
    pool: Pool,
    positions: BTreeMap<AccountId, Position>,
    token: T,
    bank: NativeBank,
    ledger_vault: AccountId,
    pool_vault: AccountId,
}

/// The fully in-process configuration used by the CLI and tests.
pub type InMemoryEngine = Engine<InMemoryToken>;

impl<T: Token> Engine<T> {
    pub fn new(token: T) -> Self {
        Engine {
            pool: Pool::new(),
            positions: BTreeMap::new(),
            token,
            bank: NativeBank::new(),
            ledger_vault: AccountId::from_seed("oraclelend/ledger-vault"),
            pool_vault: AccountId::from_seed("oraclelend/pool-vault"),
        }
    }

    /// Account that holds collateral and the lendable borrowable balance.
    /// Approvals for `repay`, `liquidate` and `fund_ledger` target it.
    pub fn ledger_vault(&self) -> AccountId {
        self.ledger_vault
    }

    /// Account backing the pool's reserves. Approvals for `add_liquidity`
    /// and borrowable-side swaps target it.
    pub fn pool_vault(&self) -> AccountId {
        self.pool_vault
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    pub fn token(&self) -> &T {
        &self.token
    }

    pub fn token_mut(&mut self) -> &mut T {
        &mut self.token
    }

    pub fn bank(&self) -> &NativeBank {
        &self.bank
    }

    pub fn bank_mut(&mut self) -> &mut NativeBank {
        &mut self.bank
    }

    /// Current position, zeroed if the account has none.
    pub fn position(&self, account: &AccountId) -> Position {
        self.positions.get(account).copied().unwrap_or_default()
    }

    fn set_position(&mut self, account: AccountId, position: Position) {
        if position.is_empty() {
            self.positions.remove(&account);
        } else {
            self.positions.insert(account, position);
        }
    }

    // ------------------------------------------------------------------
    // Pool operations
    // ------------------------------------------------------------------

    /// Move both legs into the pool vault, then grow the reserves.
    ///
    /// The borrowable pull needs a prior approval to the pool vault; it is
    /// pre-validated so the native debit cannot strand when the pull fails.
    pub fn add_liquidity(
        &mut self,
        provider: &AccountId,
        native_in: u128,
        borrowable_in: u128,
    ) -> Result<(), EngineError> {
        if native_in == 0 || borrowable_in == 0 {
            return Err(EngineError::InvalidAmount);
        }
        // Reserve growth must be provable before either leg moves, or an
        // overflow would strand funds in the vault.
        let (reserve_native, reserve_borrowable) = self.pool.reserves();
        reserve_native
            .checked_add(native_in)
            .ok_or(EngineError::Overflow)?;
        reserve_borrowable
            .checked_add(borrowable_in)
            .ok_or(EngineError::Overflow)?;
        self.check_pull(provider, &self.pool_vault, borrowable_in)?;
        self.bank.transfer(provider, &self.pool_vault, native_in)?;
        let pool_vault = self.pool_vault;
        self.token
            .transfer_from(&pool_vault, provider, &pool_vault, borrowable_in)?;
        self.pool.add_liquidity(native_in, borrowable_in)
    }

    /// Sell native into the pool for the borrowable asset.
    pub fn swap_native_for_borrowable(
        &mut self,
        trader: &AccountId,
        amount_in: u128,
        min_amount_out: u128,
    ) -> Result<u128, EngineError> {
        // Quote and reject slippage before touching any balance.
        let quoted = self.pool.quote_out(Asset::Native, amount_in)?;
        if quoted < min_amount_out {
            return Err(EngineError::SlippageExceeded {
                quoted,
                min_out: min_amount_out,
            });
        }
        self.bank.transfer(trader, &self.pool_vault, amount_in)?;
        let amount_out = self.pool.swap(Asset::Native, amount_in, min_amount_out)?;
        let pool_vault = self.pool_vault;
        self.token.transfer(&pool_vault, trader, amount_out)?;
        Ok(amount_out)
    }

    /// Sell the borrowable asset into the pool for native.
    pub fn swap_borrowable_for_native(
        &mut self,
        trader: &AccountId,
        amount_in: u128,
        min_amount_out: u128,
    ) -> Result<u128, EngineError> {
        let quoted = self.pool.quote_out(Asset::Borrowable, amount_in)?;
        if quoted < min_amount_out {
            return Err(EngineError::SlippageExceeded {
                quoted,
                min_out: min_amount_out,
            });
        }
        let pool_vault = self.pool_vault;
        self.token
            .transfer_from(&pool_vault, trader, &pool_vault, amount_in)?;
        let amount_out = self.pool.swap(Asset::Borrowable, amount_in, min_amount_out)?;
        self.bank.transfer(&pool_vault, trader, amount_out)?;
        Ok(amount_out)
    }

    // ------------------------------------------------------------------
    // Ledger operations
    // ------------------------------------------------------------------

    /// Lock native collateral. No health check: this only improves safety.
    pub fn add_collateral(&mut self, account: &AccountId, amount: u128)
        -> Result<(), EngineError>
    {
        if amount == 0 {
            return Err(EngineError::InvalidAmount);
        }
        let mut position = self.position(account);
        position.collateral = position
            .collateral
            .checked_add(amount)
            .ok_or(EngineError::Overflow)?;
        self.bank.transfer(account, &self.ledger_vault, amount)?;
        self.set_position(*account, position);
        debug!("collateral added: account {account:?} +{amount}");
        Ok(())
    }

    /// Unlock collateral. Unrestricted while debt-free; otherwise the
    /// remainder must keep the position at or above 120%.
    pub fn withdraw_collateral(&mut self, account: &AccountId, amount: u128)
        -> Result<(), EngineError>
    {
        if amount == 0 {
            return Err(EngineError::InvalidAmount);
        }
        let position = self.position(account);
        if amount > position.collateral {
            return Err(EngineError::InsufficientCollateral {
                requested: amount,
                available: position.collateral,
            });
        }
        let remaining = position.collateral - amount;
        if position.debt > 0 {
            let price = self.pool.spot_price(Asset::Native)?;
            let health_bps = ledger::health_ratio_bps(remaining, position.debt, price)?;
            if health_bps < COLLATERAL_RATIO_BPS {
                return Err(EngineError::UnsafeWithdrawal { health_bps });
            }
        }
        self.set_position(
            *account,
            Position {
                collateral: remaining,
                debt: position.debt,
            },
        );
        // Push after the internal debit is final.
        let ledger_vault = self.ledger_vault;
        self.bank.transfer(&ledger_vault, account, amount)?;
        debug!("collateral withdrawn: account {account:?} -{amount}");
        Ok(())
    }

    /// Borrow against locked collateral at the pool's current spot price.
    pub fn borrow(&mut self, account: &AccountId, amount: u128) -> Result<(), EngineError> {
        if amount == 0 {
            return Err(EngineError::InvalidAmount);
        }
        let available = self.token.balance_of(&self.ledger_vault);
        if available < amount {
            return Err(EngineError::InsufficientLedgerLiquidity {
                requested: amount,
                available,
            });
        }
        let position = self.position(account);
        let price = self.pool.spot_price(Asset::Native)?;
        let new_debt = position
            .debt
            .checked_add(amount)
            .ok_or(EngineError::Overflow)?;
        let health_bps = ledger::health_ratio_bps(position.collateral, new_debt, price)?;
        if health_bps < COLLATERAL_RATIO_BPS {
            let headroom = ledger::borrow_headroom(position.collateral, position.debt, price)?;
            return Err(EngineError::InsufficientCollateral {
                requested: amount,
                available: headroom,
            });
        }
        self.set_position(
            *account,
            Position {
                collateral: position.collateral,
                debt: new_debt,
            },
        );
        let ledger_vault = self.ledger_vault;
        self.token.transfer(&ledger_vault, account, amount)?;
        debug!("borrow: account {account:?} +{amount} debt, health {health_bps} bps");
        Ok(())
    }

    /// Repay debt. Overpayment clamps to the outstanding principal and only
    /// the clamped amount is pulled from the caller.
    pub fn repay(&mut self, account: &AccountId, amount: u128) -> Result<u128, EngineError> {
        let position = self.position(account);
        if position.debt == 0 {
            return Err(EngineError::NoDebt);
        }
        if amount == 0 {
            return Err(EngineError::InvalidAmount);
        }
        let effective = amount.min(position.debt);
        let ledger_vault = self.ledger_vault;
        self.token
            .transfer_from(&ledger_vault, account, &ledger_vault, effective)?;
        self.set_position(
            *account,
            Position {
                collateral: position.collateral,
                debt: position.debt - effective,
            },
        );
        debug!("repay: account {account:?} -{effective} debt");
        Ok(effective)
    }

    /// Third-party liquidation of an unsafe position.
    ///
    /// The liquidator's balance is not pre-checked: the debt pull itself is
    /// the check, and its failure surfaces as `InsufficientLiquidatorFunds`.
    pub fn liquidate(&mut self, liquidator: &AccountId, account: &AccountId)
        -> Result<Liquidation, EngineError>
    {
        if liquidator == account {
            return Err(EngineError::CannotLiquidateSelf);
        }
        let position = self.position(account);
        let price = self.pool.spot_price(Asset::Native)?;
        let health_bps = ledger::health_ratio_bps(position.collateral, position.debt, price)?;
        if !ledger::is_unsafe(position.debt, health_bps) {
            return Err(EngineError::NotLiquidatable { health_bps });
        }

        let ledger_vault = self.ledger_vault;
        self.token
            .transfer_from(&ledger_vault, liquidator, &ledger_vault, position.debt)
            .map_err(|err| match err {
                TokenError::InsufficientBalance { required, available }
                | TokenError::InsufficientAllowance { required, available } => {
                    EngineError::InsufficientLiquidatorFunds { required, available }
                }
                other => other.into(),
            })?;

        let payout = ledger::liquidation_payout(position.collateral);
        self.positions.remove(account);
        self.bank.transfer(&ledger_vault, liquidator, payout)?;
        debug!(
            "liquidation: account {account:?} by {liquidator:?}, debt {} repaid, {payout} collateral paid, health was {health_bps} bps",
            position.debt
        );
        Ok(Liquidation {
            debt_repaid: position.debt,
            collateral_paid: payout,
        })
    }

    /// Move borrowable asset into the ledger so borrows can be served.
    /// Requires a prior approval to the ledger vault.
    pub fn fund_ledger(&mut self, from: &AccountId, amount: u128) -> Result<(), EngineError> {
        if amount == 0 {
            return Err(EngineError::InvalidAmount);
        }
        let ledger_vault = self.ledger_vault;
        self.token
            .transfer_from(&ledger_vault, from, &ledger_vault, amount)?;
        debug!("ledger funded: +{amount} borrowable from {from:?}");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Query surface
    // ------------------------------------------------------------------

    /// Health ratio in basis points; 999% sentinel while debt-free.
    pub fn get_health_ratio(&self, account: &AccountId) -> Result<u128, EngineError> {
        let position = self.position(account);
        if position.debt == 0 {
            return Ok(NO_DEBT_HEALTH_BPS);
        }
        let price = self.pool.spot_price(Asset::Native)?;
        ledger::health_ratio_bps(position.collateral, position.debt, price)
    }

    pub fn is_liquidatable(&self, account: &AccountId) -> Result<bool, EngineError> {
        let position = self.position(account);
        if position.debt == 0 {
            return Ok(false);
        }
        let health_bps = self.get_health_ratio(account)?;
        Ok(ledger::is_unsafe(position.debt, health_bps))
    }

    /// Full position snapshot, priced atomically within this call.
    pub fn get_user_position(&self, account: &AccountId) -> Result<UserPosition, EngineError> {
        let position = self.position(account);
        if position.is_empty() {
            return Ok(UserPosition {
                collateral: 0,
                debt: 0,
                collateral_value: 0,
                health_ratio_bps: NO_DEBT_HEALTH_BPS,
                liquidatable: false,
            });
        }
        let price = self.pool.spot_price(Asset::Native)?;
        let collateral_value = ledger::collateral_value(position.collateral, price)?;
        let health_ratio_bps =
            ledger::health_ratio_bps(position.collateral, position.debt, price)?;
        Ok(UserPosition {
            collateral: position.collateral,
            debt: position.debt,
            collateral_value,
            health_ratio_bps,
            liquidatable: ledger::is_unsafe(position.debt, health_ratio_bps),
        })
    }

    /// Spot price of native in borrowable units.
    pub fn get_current_price(&self) -> Result<u128, EngineError> {
        self.pool.spot_price(Asset::Native)
    }

    pub fn get_dex_stats(&self) -> DexStats {
        self.pool.stats()
    }

    /// Borrowable the ledger can still lend out.
    pub fn ledger_borrowable_balance(&self) -> u128 {
        self.token.balance_of(&self.ledger_vault)
    }

    /// Largest borrow the account could take right now: ratio headroom
    /// capped by what the ledger actually holds.
    pub fn max_borrowable(&self, account: &AccountId) -> Result<u128, EngineError> {
        let position = self.position(account);
        let price = self.pool.spot_price(Asset::Native)?;
        let headroom = ledger::borrow_headroom(position.collateral, position.debt, price)?;
        Ok(headroom.min(self.ledger_borrowable_balance()))
    }

    /// Largest collateral withdrawal that keeps the position safe.
    pub fn max_withdrawable_collateral(&self, account: &AccountId)
        -> Result<u128, EngineError>
    {
        let position = self.position(account);
        if position.debt == 0 {
            return Ok(position.collateral);
        }
        let price = self.pool.spot_price(Asset::Native)?;
        let required = ledger::required_collateral(position.debt, price)?;
        Ok(position.collateral.saturating_sub(required))
    }

    /// Accounts currently eligible for liquidation, in stable order.
    pub fn liquidatable_accounts(&self) -> Result<Vec<AccountId>, EngineError> {
        let mut unsafe_accounts = Vec::new();
        for (account, position) in &self.positions {
            if position.debt == 0 {
                continue;
            }
            let price = self.pool.spot_price(Asset::Native)?;
            let health_bps =
                ledger::health_ratio_bps(position.collateral, position.debt, price)?;
            if ledger::is_unsafe(position.debt, health_bps) {
                unsafe_accounts.push(*account);
            }
        }
        Ok(unsafe_accounts)
    }

    /// Pre-validate a borrowable pull so it cannot fail after another leg
    /// has already moved.
    fn check_pull(&self, from: &AccountId, spender: &AccountId, amount: u128)
        -> Result<(), EngineError>
    {
        let allowed = self.token.allowance(from, spender);
        if allowed < amount {
            return Err(TokenError::InsufficientAllowance {
                required: amount,
                available: allowed,
            }
            .into());
        }
        let balance = self.token.balance_of(from);
        if balance < amount {
            return Err(TokenError::InsufficientBalance {
                required: amount,
                available: balance,
            }
            .into());
        }
        Ok(())
    }
}

impl Default for InMemoryEngine {
    fn default() -> Self {
        Engine::new(InMemoryToken::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SCALE;

    fn actor(seed: &str) -> AccountId {
        AccountId::from_seed(seed)
    }

    /// Engine with a funded pool (10 native / 5M borrowable, price 500k),
    /// a funded ledger, and a collateralized borrower.
    fn seeded_engine() -> (InMemoryEngine, AccountId) {
        let mut engine = InMemoryEngine::default();
        let deployer = actor("deployer");

        engine.token_mut().grant_minter(deployer);
        engine
            .token_mut()
            .mint(&deployer, &deployer, 10_000_000 * SCALE)
            .unwrap();
        engine.bank_mut().deposit(&deployer, 1_000 * SCALE);

        let pool_vault = engine.pool_vault();
        engine
            .token_mut()
            .approve(&deployer, &pool_vault, 5_000_000 * SCALE);
        engine
            .add_liquidity(&deployer, 10 * SCALE, 5_000_000 * SCALE)
            .unwrap();

        let ledger_vault = engine.ledger_vault();
        engine
            .token_mut()
            .approve(&deployer, &ledger_vault, 2_000_000 * SCALE);
        engine.fund_ledger(&deployer, 2_000_000 * SCALE).unwrap();

        (engine, deployer)
    }

    #[test]
    fn vaults_track_pool_reserves() {
        let (engine, _) = seeded_engine();
        let (native, borrowable) = engine.pool().reserves();
        assert_eq!(engine.bank().balance_of(&engine.pool_vault()), native);
        assert_eq!(engine.token().balance_of(&engine.pool_vault()), borrowable);
    }

    #[test]
    fn add_liquidity_overflow_moves_nothing() {
        let (mut engine, deployer) = seeded_engine();
        engine.bank_mut().deposit(&deployer, u128::MAX);

        let before = engine.clone();
        let err = engine
            .add_liquidity(&deployer, u128::MAX, SCALE)
            .unwrap_err();
        assert_eq!(err, EngineError::Overflow);
        assert_eq!(engine, before);
    }

    #[test]
    fn position_lifecycle_empty_to_empty() {
        let (mut engine, _) = seeded_engine();
        let alice = actor("alice");
        engine.bank_mut().deposit(&alice, 10 * SCALE);

        // Empty -> Collateralized
        engine.add_collateral(&alice, 2 * SCALE).unwrap();
        assert_eq!(engine.position(&alice).collateral, 2 * SCALE);

        // Collateralized -> Active
        engine.borrow(&alice, 100_000 * SCALE).unwrap();
        assert_eq!(engine.position(&alice).debt, 100_000 * SCALE);

        // Active -> Collateralized via full repay
        let ledger_vault = engine.ledger_vault();
        engine
            .token_mut()
            .approve(&alice, &ledger_vault, 100_000 * SCALE);
        engine.repay(&alice, 100_000 * SCALE).unwrap();
        assert_eq!(engine.position(&alice).debt, 0);

        // Collateralized -> Empty; the map entry disappears.
        engine.withdraw_collateral(&alice, 2 * SCALE).unwrap();
        assert!(engine.position(&alice).is_empty());
        assert_eq!(engine.bank().balance_of(&alice), 10 * SCALE);
    }

    #[test]
    fn borrow_requires_ledger_liquidity() {
        let (mut engine, _) = seeded_engine();
        let alice = actor("alice");
        engine.bank_mut().deposit(&alice, 100 * SCALE);
        engine.add_collateral(&alice, 100 * SCALE).unwrap();

        let available = engine.ledger_borrowable_balance();
        let err = engine.borrow(&alice, available + 1).unwrap_err();
        assert_eq!(
            err,
            EngineError::InsufficientLedgerLiquidity {
                requested: available + 1,
                available
            }
        );
    }

    #[test]
    fn borrow_reports_headroom_on_refusal() {
        let (mut engine, _) = seeded_engine();
        let alice = actor("alice");
        engine.bank_mut().deposit(&alice, SCALE);
        engine.add_collateral(&alice, SCALE).unwrap();

        let err = engine.borrow(&alice, 500_000 * SCALE).unwrap_err();
        match err {
            EngineError::InsufficientCollateral { requested, available } => {
                assert_eq!(requested, 500_000 * SCALE);
                // Headroom at price 500k and ratio 120% is value * 5/6.
                assert_eq!(available, 500_000 * SCALE * 5 / 6);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn withdraw_is_gated_only_while_indebted() {
        let (mut engine, _) = seeded_engine();
        let alice = actor("alice");
        engine.bank_mut().deposit(&alice, 2 * SCALE);
        engine.add_collateral(&alice, 2 * SCALE).unwrap();

        // Debt-free: full withdrawal allowed.
        engine.withdraw_collateral(&alice, SCALE).unwrap();

        engine.borrow(&alice, 416_000 * SCALE).unwrap();
        // Any meaningful withdrawal now breaks the ratio.
        let err = engine.withdraw_collateral(&alice, SCALE / 2).unwrap_err();
        assert!(matches!(err, EngineError::UnsafeWithdrawal { .. }));

        // The advertised maximum is still withdrawable.
        let max = engine.max_withdrawable_collateral(&alice).unwrap();
        if max > 0 {
            engine.withdraw_collateral(&alice, max).unwrap();
        }
        let health = engine.get_health_ratio(&alice).unwrap();
        assert!(health >= COLLATERAL_RATIO_BPS);
    }

    #[test]
    fn repay_clamps_overpayment() {
        let (mut engine, deployer) = seeded_engine();
        let alice = actor("alice");
        engine.bank_mut().deposit(&alice, SCALE);
        engine.add_collateral(&alice, SCALE).unwrap();
        engine.borrow(&alice, 100_000 * SCALE).unwrap();

        // Give alice more borrowable than she owes.
        engine
            .token_mut()
            .mint(&deployer, &alice, 100_000 * SCALE)
            .unwrap();
        let ledger_vault = engine.ledger_vault();
        engine
            .token_mut()
            .approve(&alice, &ledger_vault, 200_000 * SCALE);

        let balance_before = engine.token().balance_of(&alice);
        let repaid = engine.repay(&alice, 150_000 * SCALE).unwrap();
        assert_eq!(repaid, 100_000 * SCALE);
        assert_eq!(engine.position(&alice).debt, 0);
        // Only the clamped amount was pulled.
        assert_eq!(
            engine.token().balance_of(&alice),
            balance_before - 100_000 * SCALE
        );

        assert_eq!(engine.repay(&alice, SCALE), Err(EngineError::NoDebt));
    }

    #[test]
    fn liquidation_preconditions() {
        let (mut engine, deployer) = seeded_engine();
        let alice = actor("alice");
        engine.bank_mut().deposit(&alice, SCALE);
        engine.add_collateral(&alice, SCALE).unwrap();
        engine.borrow(&alice, 400_000 * SCALE).unwrap();

        // Healthy position cannot be liquidated.
        let err = engine.liquidate(&deployer, &alice).unwrap_err();
        assert!(matches!(err, EngineError::NotLiquidatable { .. }));

        // Self-liquidation is rejected before any health math.
        assert_eq!(
            engine.liquidate(&alice, &alice),
            Err(EngineError::CannotLiquidateSelf)
        );
    }

    #[test]
    fn price_drop_makes_position_liquidatable() {
        let (mut engine, deployer) = seeded_engine();
        let alice = actor("alice");
        engine.bank_mut().deposit(&alice, SCALE);
        engine.add_collateral(&alice, SCALE).unwrap();
        engine.borrow(&alice, 416_000 * SCALE).unwrap();
        assert!(!engine.is_liquidatable(&alice).unwrap());

        // Crash the native price by dumping native into the pool.
        engine.bank_mut().deposit(&deployer, 5 * SCALE);
        engine
            .swap_native_for_borrowable(&deployer, 5 * SCALE, 0)
            .unwrap();
        assert!(engine.is_liquidatable(&alice).unwrap());
        assert_eq!(engine.liquidatable_accounts().unwrap(), vec![alice]);

        // Liquidator pull failure surfaces as InsufficientLiquidatorFunds.
        let broke = actor("broke-liquidator");
        let err = engine.liquidate(&broke, &alice).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InsufficientLiquidatorFunds { .. }
        ));

        // A funded liquidator clears the position and takes the collateral.
        let ledger_vault = engine.ledger_vault();
        engine
            .token_mut()
            .approve(&deployer, &ledger_vault, 416_000 * SCALE);
        let native_before = engine.bank().balance_of(&deployer);
        let ledger_before = engine.ledger_borrowable_balance();

        let outcome = engine.liquidate(&deployer, &alice).unwrap();
        assert_eq!(outcome.debt_repaid, 416_000 * SCALE);
        assert_eq!(outcome.collateral_paid, SCALE);
        assert!(engine.position(&alice).is_empty());
        assert_eq!(engine.bank().balance_of(&deployer), native_before + SCALE);
        assert_eq!(
            engine.ledger_borrowable_balance(),
            ledger_before + 416_000 * SCALE
        );
    }

    #[test]
    fn queries_are_consistent_with_state() {
        let (mut engine, _) = seeded_engine();
        let alice = actor("alice");

        // Untouched account: zeroed snapshot with the sentinel, even if the
        // pool were empty.
        let snapshot = engine.get_user_position(&alice).unwrap();
        assert_eq!(snapshot.health_ratio_bps, NO_DEBT_HEALTH_BPS);
        assert!(!snapshot.liquidatable);

        engine.bank_mut().deposit(&alice, SCALE);
        engine.add_collateral(&alice, SCALE).unwrap();
        engine.borrow(&alice, 250_000 * SCALE).unwrap();

        let snapshot = engine.get_user_position(&alice).unwrap();
        assert_eq!(snapshot.collateral, SCALE);
        assert_eq!(snapshot.debt, 250_000 * SCALE);
        assert_eq!(snapshot.collateral_value, 500_000 * SCALE);
        assert_eq!(snapshot.health_ratio_bps, 20_000);
        assert!(!snapshot.liquidatable);

        assert_eq!(engine.get_current_price().unwrap(), 500_000 * SCALE);
    }
}
