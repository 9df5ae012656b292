//! 256-bit intermediate arithmetic for reserve, price and ratio math.
//!
//! Amounts live in `u128` with an 18-decimal fixed-point scale, so products
//! like `amount_in * 9_970 * reserve_out` or `collateral * price` need 256
//! bits before the final division. Divisions truncate toward zero unless a
//! helper says otherwise; the truncation direction at each call site is what
//! keeps rounding in the protocol's favor.

use uint::construct_uint;

construct_uint! {
    /// 256-bit unsigned integer for overflow-free intermediates.
    pub struct U256(4);
}

/// `a * b / denom`, truncating toward zero.
///
/// Returns `None` on a zero denominator or when the quotient does not fit
/// in `u128`.
pub fn mul_div(a: u128, b: u128, denom: u128) -> Option<u128> {
    if denom == 0 {
        return None;
    }
    let wide = U256::from(a) * U256::from(b) / U256::from(denom);
    narrow(wide)
}

/// `a * b / denom`, rounding up.
pub fn mul_div_ceil(a: u128, b: u128, denom: u128) -> Option<u128> {
    if denom == 0 {
        return None;
    }
    let denom = U256::from(denom);
    let wide = (U256::from(a) * U256::from(b) + denom - U256::one()) / denom;
    narrow(wide)
}

/// Narrow a 256-bit value back into `u128`, `None` if it does not fit.
pub fn narrow(wide: U256) -> Option<u128> {
    if wide.bits() > 128 {
        None
    } else {
        Some(wide.low_u128())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mul_div_truncates() {
        assert_eq!(mul_div(7, 3, 2), Some(10));
        assert_eq!(mul_div_ceil(7, 3, 2), Some(11));
    }

    #[test]
    fn mul_div_exact() {
        assert_eq!(mul_div(6, 4, 3), Some(8));
        assert_eq!(mul_div_ceil(6, 4, 3), Some(8));
    }

    #[test]
    fn mul_div_zero_denominator() {
        assert_eq!(mul_div(1, 1, 0), None);
        assert_eq!(mul_div_ceil(1, 1, 0), None);
    }

    #[test]
    fn mul_div_wide_intermediate() {
        // (2^127)^2 / 2^127 round-trips even though the product needs 254 bits.
        let big = 1u128 << 127;
        assert_eq!(mul_div(big, big, big), Some(big));
    }

    #[test]
    fn mul_div_overflowing_result() {
        assert_eq!(mul_div(u128::MAX, 2, 1), None);
    }
}
