//! Parsing and display of 18-decimal fixed-point amounts

use anyhow::{bail, Result};
use oraclelend::SCALE;

/// Parse a decimal amount like `1`, `0.5` or `416666.25` into scaled units.
pub fn parse_amount(input: &str) -> Result<u128> {
    let input = input.trim();
    if input.is_empty() {
        bail!("empty amount");
    }
    let (whole, frac) = match input.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (input, ""),
    };
    if frac.len() > 18 {
        bail!("at most 18 decimal places are supported, got {}", frac.len());
    }
    let whole: u128 = if whole.is_empty() {
        0
    } else {
        whole
            .parse()
            .map_err(|_| anyhow::anyhow!("invalid amount: {input}"))?
    };
    let frac_scaled: u128 = if frac.is_empty() {
        0
    } else {
        let digits: u128 = frac
            .parse()
            .map_err(|_| anyhow::anyhow!("invalid amount: {input}"))?;
        digits * 10u128.pow(18 - frac.len() as u32)
    };
    whole
        .checked_mul(SCALE)
        .and_then(|scaled| scaled.checked_add(frac_scaled))
        .ok_or_else(|| anyhow::anyhow!("amount too large: {input}"))
}

/// Render scaled units back as a decimal string, trailing zeros trimmed.
pub fn format_amount(amount: u128) -> String {
    let whole = amount / SCALE;
    let frac = amount % SCALE;
    if frac == 0 {
        return whole.to_string();
    }
    let frac = format!("{frac:018}");
    format!("{whole}.{}", frac.trim_end_matches('0'))
}

/// Render a basis-point ratio as a percentage, e.g. `12_000` -> `120.00%`.
pub fn format_bps(bps: u128) -> String {
    format!("{}.{:02}%", bps / 100, bps % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_whole_and_fractional() {
        assert_eq!(parse_amount("1").unwrap(), SCALE);
        assert_eq!(parse_amount("0.5").unwrap(), SCALE / 2);
        assert_eq!(parse_amount(".25").unwrap(), SCALE / 4);
        assert_eq!(parse_amount("416666").unwrap(), 416_666 * SCALE);
        assert_eq!(parse_amount(" 2.000000000000000001 ").unwrap(), 2 * SCALE + 1);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_amount("").is_err());
        assert!(parse_amount("1.2.3").is_err());
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("-1").is_err());
        assert!(parse_amount("1.0000000000000000001").is_err());
    }

    #[test]
    fn formats_round_trip() {
        assert_eq!(format_amount(SCALE), "1");
        assert_eq!(format_amount(SCALE / 2), "0.5");
        assert_eq!(format_amount(0), "0");
        assert_eq!(format_amount(parse_amount("12.75").unwrap()), "12.75");
    }

    #[test]
    fn formats_bps_as_percent() {
        assert_eq!(format_bps(12_000), "120.00%");
        assert_eq!(format_bps(11_999), "119.99%");
        assert_eq!(format_bps(99_900), "999.00%");
    }
}
