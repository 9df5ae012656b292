//! Swap and price operations

use anyhow::{bail, Result};
use colored::Colorize;
use oraclelend::{Asset, Token};

use crate::config::SandboxConfig;
use crate::store::SandboxState;
use crate::units::{format_amount, parse_amount};

fn parse_side(side: &str) -> Result<Asset> {
    match side.to_ascii_lowercase().as_str() {
        "trust" | "native" => Ok(Asset::Native),
        "oracle" | "borrowable" => Ok(Asset::Borrowable),
        other => bail!("unknown asset {other:?}, use trust or oracle"),
    }
}

fn symbol(asset: Asset) -> &'static str {
    match asset {
        Asset::Native => "TRUST",
        Asset::Borrowable => "ORACLE",
    }
}

/// Quote a swap without executing it.
pub fn quote(state: &SandboxState, sell: &str, amount: &str) -> Result<()> {
    let asset_in = parse_side(sell)?;
    let amount_in = parse_amount(amount)?;
    let quoted = state.engine.pool().quote_out(asset_in, amount_in)?;

    println!("{}", "=== Swap Quote ===".bright_green().bold());
    println!(
        "{} {} {}",
        "Selling:".bright_cyan(),
        format_amount(amount_in),
        symbol(asset_in)
    );
    println!(
        "{} {} {}",
        "Receives:".bright_cyan(),
        format_amount(quoted),
        symbol(asset_in.other())
    );
    Ok(())
}

/// Execute a swap at the current reserves, honoring `--min-out`.
pub fn swap(
    state: &mut SandboxState,
    config: &SandboxConfig,
    sell: &str,
    amount: &str,
    min_out: Option<&str>,
) -> Result<()> {
    let asset_in = parse_side(sell)?;
    let amount_in = parse_amount(amount)?;
    let min_amount_out = match min_out {
        Some(raw) => parse_amount(raw)?,
        None => 0,
    };

    let amount_out = match asset_in {
        Asset::Native => {
            state
                .engine
                .swap_native_for_borrowable(&config.actor, amount_in, min_amount_out)?
        }
        Asset::Borrowable => {
            let pool_vault = state.engine.pool_vault();
            state
                .engine
                .token_mut()
                .approve(&config.actor, &pool_vault, amount_in);
            state
                .engine
                .swap_borrowable_for_native(&config.actor, amount_in, min_amount_out)?
        }
    };
    state.register_actor(&config.actor_name, config.actor);

    println!("{}", "=== Swap Executed ===".bright_green().bold());
    println!(
        "{} {} {} -> {} {}",
        "Swapped:".bright_cyan(),
        format_amount(amount_in),
        symbol(asset_in),
        format_amount(amount_out),
        symbol(asset_in.other())
    );
    price(state)
}

/// Show the oracle price the ledger uses for health checks.
pub fn price(state: &SandboxState) -> Result<()> {
    let price = state.engine.get_current_price()?;
    println!(
        "{} {} ORACLE per TRUST",
        "Spot price:".bright_cyan(),
        format_amount(price)
    );
    Ok(())
}
