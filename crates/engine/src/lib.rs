//! OracleLend core: an over-collateralized lending ledger priced by the
//! constant-product AMM pool it shares with depositors.
//!
//! Two components, one engine:
//!
//! - [`pool::Pool`] holds a native/borrowable reserve pair, executes
//!   constant-product swaps with a 0.3% fee and answers spot-price queries.
//! - [`engine::Engine`] tracks per-account collateral and principal-only
//!   debt, gates `borrow`/`withdraw_collateral` on a 120% health ratio read
//!   from the pool, and lets third parties liquidate unsafe positions.
//!
//! The engine is pure compute over in-memory state behind `&mut self`: every
//! operation either fully applies or applies nothing, and the price read
//! that guards a borrow or withdrawal happens inside the same call as the
//! mutation it protects. External asset movement is modeled through explicit
//! collaborators ([`token::Token`] for the borrowable asset,
//! [`token::NativeBank`] for the native one) so pulls are sequenced before
//! internal mutation and pushes after it.

#![forbid(unsafe_code)]

pub mod engine;
pub mod error;
pub mod ledger;
pub mod math;
pub mod pool;
pub mod token;

pub use engine::{Engine, InMemoryEngine, Liquidation, UserPosition};
pub use error::EngineError;
pub use ledger::Position;
pub use math::U256;
pub use pool::{Asset, DexStats, Pool};
pub use token::{AccountId, BankError, InMemoryToken, NativeBank, Token, TokenError};

/// Fixed-point scale: 18 fractional decimal digits.
pub const SCALE: u128 = 1_000_000_000_000_000_000;

/// Basis-point scale (10_000 bps = 100%).
pub const BPS_SCALE: u128 = 10_000;

/// Minimum health ratio for opening or deepening a borrow (120.00%).
pub const COLLATERAL_RATIO_BPS: u128 = 12_000;

/// Share of seized collateral nominally added as the liquidator's bonus (10%).
pub const LIQUIDATION_BONUS_BPS: u128 = 1_000;

/// Swap fee (0.3%): quotes retain 9_970 / 10_000 of the input.
pub const SWAP_FEE_BPS: u128 = 30;

/// Health ratio reported for debt-free positions (999%).
pub const NO_DEBT_HEALTH_BPS: u128 = 99_900;
