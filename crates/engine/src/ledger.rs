//! Position state and health-ratio math.
//!
//! A position is just `(collateral, debt)`. The health ratio is only a gate
//! at the moment of a borrow or withdrawal; an existing position may drift
//! below the threshold through price movement, which is what makes it
//! liquidatable. Debt is principal-only, there is no accrual.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::math::{mul_div, mul_div_ceil};
use crate::{BPS_SCALE, COLLATERAL_RATIO_BPS, NO_DEBT_HEALTH_BPS, SCALE};

/// One account's locked collateral and outstanding principal debt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Native-equivalent units locked in the ledger.
    pub collateral: u128,
    /// Borrowable-asset units owed, principal only.
    pub debt: u128,
}

impl Position {
    /// Empty positions are dropped from the ledger map.
    pub fn is_empty(&self) -> bool {
        self.collateral == 0 && self.debt == 0
    }
}

/// Collateral valued in borrowable units: `collateral * price / SCALE`,
/// truncating.
pub fn collateral_value(collateral: u128, price: u128) -> Result<u128, EngineError> {
    mul_div(collateral, price, SCALE).ok_or(EngineError::Overflow)
}

/// Health ratio in basis points: `collateral_value * 10_000 / debt`,
/// truncating. Debt-free positions report the fixed 999% sentinel.
pub fn health_ratio_bps(collateral: u128, debt: u128, price: u128)
    -> Result<u128, EngineError>
{
    if debt == 0 {
        return Ok(NO_DEBT_HEALTH_BPS);
    }
    let value = collateral_value(collateral, price)?;
    mul_div(value, BPS_SCALE, debt).ok_or(EngineError::Overflow)
}

/// Whether a position with this health is liquidatable.
pub fn is_unsafe(debt: u128, health_bps: u128) -> bool {
    debt > 0 && health_bps < COLLATERAL_RATIO_BPS
}

/// Largest additional borrow the collateral supports at the required ratio:
/// `collateral_value * 10_000 / 12_000 - debt`, floored then saturated.
pub fn borrow_headroom(collateral: u128, debt: u128, price: u128)
    -> Result<u128, EngineError>
{
    let value = collateral_value(collateral, price)?;
    let credit = mul_div(value, BPS_SCALE, COLLATERAL_RATIO_BPS).ok_or(EngineError::Overflow)?;
    Ok(credit.saturating_sub(debt))
}

/// Smallest collateral that keeps `debt` at the required ratio.
///
/// `ceil(debt * 1.2 * SCALE / price)`. This is the one division that rounds
/// up, so the withdrawable remainder derived from it can never leave the
/// position unsafe.
pub fn required_collateral(debt: u128, price: u128) -> Result<u128, EngineError> {
    if debt == 0 {
        return Ok(0);
    }
    if price == 0 {
        return Err(EngineError::NoLiquidity);
    }
    // 12_000 * SCALE / 10_000 is exact, so the ratio folds into one factor.
    let ratio_scaled = COLLATERAL_RATIO_BPS * SCALE / BPS_SCALE;
    mul_div_ceil(debt, ratio_scaled, price).ok_or(EngineError::Overflow)
}

/// Liquidator reward: the seized collateral plus the 10% bonus, never more
/// collateral than the position actually holds.
pub fn liquidation_payout(collateral: u128) -> u128 {
    let bonus = mul_div(collateral, crate::LIQUIDATION_BONUS_BPS, BPS_SCALE).unwrap_or(0);
    collateral.saturating_add(bonus).min(collateral)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRICE_500K: u128 = 500_000 * SCALE;

    #[test]
    fn health_sentinel_without_debt() {
        assert_eq!(health_ratio_bps(SCALE, 0, PRICE_500K).unwrap(), NO_DEBT_HEALTH_BPS);
        assert_eq!(health_ratio_bps(0, 0, 0).unwrap(), NO_DEBT_HEALTH_BPS);
    }

    #[test]
    fn health_at_borrow_boundary() {
        // 1 collateral at 500_000: 416_666 borrowable sits exactly at 120.00%.
        let ok = health_ratio_bps(SCALE, 416_666 * SCALE, PRICE_500K).unwrap();
        assert_eq!(ok, 12_000);

        // One more unit floors below the threshold.
        let bad = health_ratio_bps(SCALE, 416_667 * SCALE, PRICE_500K).unwrap();
        assert_eq!(bad, 11_999);
    }

    #[test]
    fn unsafe_iff_indebted_and_below_ratio() {
        assert!(!is_unsafe(0, 0));
        assert!(!is_unsafe(0, NO_DEBT_HEALTH_BPS));
        assert!(!is_unsafe(1, 12_000));
        assert!(is_unsafe(1, 11_999));
    }

    #[test]
    fn borrow_headroom_matches_boundary() {
        let headroom = borrow_headroom(SCALE, 0, PRICE_500K).unwrap();
        assert_eq!(headroom, 416_666 * SCALE + SCALE * 2 / 3);

        // Fully drawn position has no headroom left.
        assert_eq!(borrow_headroom(SCALE, headroom, PRICE_500K).unwrap(), 0);
    }

    #[test]
    fn required_collateral_rounds_against_withdrawer() {
        let debt = 416_666 * SCALE;
        let required = required_collateral(debt, PRICE_500K).unwrap();

        // The remainder after withdrawing down to `required` stays safe.
        let health = health_ratio_bps(required, debt, PRICE_500K).unwrap();
        assert!(health >= COLLATERAL_RATIO_BPS);

        // One unit less collateral would not be.
        let health = health_ratio_bps(required - 1, debt, PRICE_500K).unwrap();
        assert!(health < COLLATERAL_RATIO_BPS);
    }

    #[test]
    fn payout_is_capped_at_collateral() {
        // The nominal 110% reward is clipped to what the position holds.
        assert_eq!(liquidation_payout(10 * SCALE), 10 * SCALE);
        assert_eq!(liquidation_payout(0), 0);
    }
}
