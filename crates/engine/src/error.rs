//! Failure taxonomy for pool and ledger operations.
//!
//! Everything here is a recoverable, caller-retriable condition except
//! [`EngineError::InvariantViolated`], which signals a logic bug: the
//! post-swap constant product came out below the pre-swap product. It is
//! detected before any state is committed, so the operation aborts with
//! nothing applied, but callers must not retry it.

use thiserror::Error;

use crate::token::{BankError, TokenError};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    /// Zero amount where a positive one is required.
    #[error("amount must be greater than zero")]
    InvalidAmount,

    /// The pool has no reserves to price against.
    #[error("pool has no liquidity")]
    NoLiquidity,

    /// The pool cannot serve this swap from its reserves.
    #[error("insufficient pool liquidity for swap")]
    InsufficientLiquidity,

    /// Quoted output fell below the caller's minimum.
    #[error("quoted output {quoted} below minimum {min_out}")]
    SlippageExceeded { quoted: u128, min_out: u128 },

    /// Borrow or withdrawal would breach the collateralization ratio.
    #[error("insufficient collateral: requested {requested}, available {available}")]
    InsufficientCollateral { requested: u128, available: u128 },

    /// Withdrawal would leave the position below the required health ratio.
    #[error("withdrawal would leave health at {health_bps} bps")]
    UnsafeWithdrawal { health_bps: u128 },

    /// The ledger does not hold enough borrowable asset to fund the borrow.
    #[error("ledger cannot fund borrow: requested {requested}, available {available}")]
    InsufficientLedgerLiquidity { requested: u128, available: u128 },

    /// Repay called with nothing owed.
    #[error("account has no outstanding debt")]
    NoDebt,

    /// Liquidation target is above the liquidation threshold.
    #[error("position is not liquidatable: health {health_bps} bps")]
    NotLiquidatable { health_bps: u128 },

    /// A position owner may not liquidate themselves.
    #[error("cannot liquidate own position")]
    CannotLiquidateSelf,

    /// The liquidator's debt pull failed on balance or allowance.
    #[error("liquidator cannot cover debt: required {required}, available {available}")]
    InsufficientLiquidatorFunds { required: u128, available: u128 },

    /// Fatal: the post-swap reserve product decreased. Logic bug, do not retry.
    #[error("constant-product invariant violated by swap")]
    InvariantViolated,

    /// Arithmetic overflow out of the 128-bit amount domain.
    #[error("arithmetic overflow")]
    Overflow,

    /// Surfaced from the borrowable-token collaborator.
    #[error(transparent)]
    Token(#[from] TokenError),

    /// Surfaced from the native value-transfer collaborator.
    #[error(transparent)]
    Native(#[from] BankError),
}
