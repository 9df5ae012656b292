//! Constant-product AMM pool with a 0.3% fee.
//!
//! The pool is the ledger's sole price feed, so its math is deliberately
//! plain: the standard `x * y = k` quote with the fee applied to the input,
//! truncating at the final division. The reserve product never decreases
//! across a swap; the retained fee makes it grow.
//!
//! The pool mutates only its own reserves and trade statistics. Moving the
//! matching asset balances is the engine's job, sequenced around these pure
//! state changes.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::math::{mul_div, narrow, U256};
use crate::{BPS_SCALE, SCALE, SWAP_FEE_BPS};

/// Which side of the pair an amount is denominated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Asset {
    Native,
    Borrowable,
}

impl Asset {
    pub fn other(self) -> Asset {
        match self {
            Asset::Native => Asset::Borrowable,
            Asset::Borrowable => Asset::Native,
        }
    }
}

/// Pool statistics for the outward query surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DexStats {
    pub reserve_native: u128,
    pub reserve_borrowable: u128,
    pub total_volume_native: u128,
    pub total_volume_borrowable: u128,
    pub total_trades: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    reserve_native: u128,
    reserve_borrowable: u128,
    total_volume_native: u128,
    total_volume_borrowable: u128,
    total_trades: u64,
}

impl Pool {
    pub fn new() -> Self {
        Self::default()
    }

    /// (native, borrowable) reserves.
    pub fn reserves(&self) -> (u128, u128) {
        (self.reserve_native, self.reserve_borrowable)
    }

    fn oriented(&self, asset_in: Asset) -> (u128, u128) {
        match asset_in {
            Asset::Native => (self.reserve_native, self.reserve_borrowable),
            Asset::Borrowable => (self.reserve_borrowable, self.reserve_native),
        }
    }

    /// Add liquidity to both reserves.
    ///
    /// No ratio is enforced at any point: the first depositor sets the
    /// initial price, and later deposits may shift it. Preserved from the
    /// source protocol rather than tightened.
    pub fn add_liquidity(&mut self, native_in: u128, borrowable_in: u128)
        -> Result<(), EngineError>
    {
        if native_in == 0 || borrowable_in == 0 {
            return Err(EngineError::InvalidAmount);
        }
        self.reserve_native = self
            .reserve_native
            .checked_add(native_in)
            .ok_or(EngineError::Overflow)?;
        self.reserve_borrowable = self
            .reserve_borrowable
            .checked_add(borrowable_in)
            .ok_or(EngineError::Overflow)?;
        debug!(
            "liquidity added: +{native_in} native, +{borrowable_in} borrowable, reserves now ({}, {})",
            self.reserve_native, self.reserve_borrowable
        );
        Ok(())
    }

    /// Quote the output for swapping `amount_in` of `asset_in`.
    ///
    /// `out = in * 9_970 * reserve_out / (reserve_in * 10_000 + in * 9_970)`,
    /// truncating toward zero at the division. Pure; does not mutate.
    pub fn quote_out(&self, asset_in: Asset, amount_in: u128) -> Result<u128, EngineError> {
        if amount_in == 0 {
            return Err(EngineError::InvalidAmount);
        }
        let (reserve_in, reserve_out) = self.oriented(asset_in);
        if reserve_in == 0 || reserve_out == 0 {
            return Err(EngineError::InsufficientLiquidity);
        }

        let in_with_fee = U256::from(amount_in) * U256::from(BPS_SCALE - SWAP_FEE_BPS);
        let numerator = in_with_fee * U256::from(reserve_out);
        let denominator = U256::from(reserve_in) * U256::from(BPS_SCALE) + in_with_fee;
        // The formula bounds out below reserve_out, so only the u128 narrow
        // can fail here.
        narrow(numerator / denominator).ok_or(EngineError::Overflow)
    }

    /// Execute a swap: quote, enforce the caller's minimum, check the
    /// product invariant, then commit reserves and statistics atomically.
    pub fn swap(
        &mut self,
        asset_in: Asset,
        amount_in: u128,
        min_amount_out: u128,
    ) -> Result<u128, EngineError> {
        let amount_out = self.quote_out(asset_in, amount_in)?;
        if amount_out < min_amount_out {
            return Err(EngineError::SlippageExceeded {
                quoted: amount_out,
                min_out: min_amount_out,
            });
        }

        let (reserve_in, reserve_out) = self.oriented(asset_in);
        let new_in = reserve_in
            .checked_add(amount_in)
            .ok_or(EngineError::Overflow)?;
        let new_out = reserve_out
            .checked_sub(amount_out)
            .ok_or(EngineError::InsufficientLiquidity)?;

        // Fatal if this ever fires: nothing has been committed yet, the
        // operation aborts whole.
        let before = U256::from(reserve_in) * U256::from(reserve_out);
        let after = U256::from(new_in) * U256::from(new_out);
        if after < before {
            return Err(EngineError::InvariantViolated);
        }

        match asset_in {
            Asset::Native => {
                self.reserve_native = new_in;
                self.reserve_borrowable = new_out;
                self.total_volume_native = self.total_volume_native.saturating_add(amount_in);
                self.total_volume_borrowable =
                    self.total_volume_borrowable.saturating_add(amount_out);
            }
            Asset::Borrowable => {
                self.reserve_borrowable = new_in;
                self.reserve_native = new_out;
                self.total_volume_borrowable =
                    self.total_volume_borrowable.saturating_add(amount_in);
                self.total_volume_native = self.total_volume_native.saturating_add(amount_out);
            }
        }
        self.total_trades += 1;
        debug!(
            "swap {amount_in} {asset_in:?} -> {amount_out} {:?}, reserves now ({}, {})",
            asset_in.other(),
            self.reserve_native,
            self.reserve_borrowable
        );
        Ok(amount_out)
    }

    /// Spot price of `of` in units of the other asset, 18-decimal scaled:
    /// `reserve_other * SCALE / reserve_self`, truncating.
    pub fn spot_price(&self, of: Asset) -> Result<u128, EngineError> {
        let (reserve_self, reserve_other) = self.oriented(of);
        if reserve_self == 0 {
            return Err(EngineError::NoLiquidity);
        }
        mul_div(reserve_other, SCALE, reserve_self).ok_or(EngineError::Overflow)
    }

    pub fn stats(&self) -> DexStats {
        DexStats {
            reserve_native: self.reserve_native,
            reserve_borrowable: self.reserve_borrowable,
            total_volume_native: self.total_volume_native,
            total_volume_borrowable: self.total_volume_borrowable,
            total_trades: self.total_trades,
        }
    }
}
