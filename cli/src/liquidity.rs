//! Pool liquidity operations

use anyhow::Result;
use colored::Colorize;
use oraclelend::Token;

use crate::config::SandboxConfig;
use crate::store::SandboxState;
use crate::units::{format_amount, parse_amount};

/// Deposit both legs into the pool. The exact deposit ratio is up to the
/// caller; a lopsided deposit shifts the pool price.
pub fn add(state: &mut SandboxState, config: &SandboxConfig, trust: &str, oracle: &str) -> Result<()> {
    let native_in = parse_amount(trust)?;
    let borrowable_in = parse_amount(oracle)?;

    let pool_vault = state.engine.pool_vault();
    state
        .engine
        .token_mut()
        .approve(&config.actor, &pool_vault, borrowable_in);
    state.engine.add_liquidity(&config.actor, native_in, borrowable_in)?;
    state.register_actor(&config.actor_name, config.actor);

    println!("{}", "=== Liquidity Added ===".bright_green().bold());
    println!("{} {} TRUST", "Deposited:".bright_cyan(), format_amount(native_in));
    println!("{} {} ORACLE", "Deposited:".bright_cyan(), format_amount(borrowable_in));
    print_reserves(state);
    Ok(())
}

/// Show reserves, cumulative volume and trade count.
pub fn stats(state: &SandboxState) -> Result<()> {
    let stats = state.engine.get_dex_stats();

    println!("{}", "=== DEX Statistics ===".bright_green().bold());
    println!(
        "{} {} TRUST",
        "Native reserve:".bright_cyan(),
        format_amount(stats.reserve_native)
    );
    println!(
        "{} {} ORACLE",
        "Borrowable reserve:".bright_cyan(),
        format_amount(stats.reserve_borrowable)
    );
    println!(
        "{} {} TRUST",
        "Volume (native):".bright_cyan(),
        format_amount(stats.total_volume_native)
    );
    println!(
        "{} {} ORACLE",
        "Volume (borrowable):".bright_cyan(),
        format_amount(stats.total_volume_borrowable)
    );
    println!("{} {}", "Trades:".bright_cyan(), stats.total_trades);
    Ok(())
}

fn print_reserves(state: &SandboxState) {
    let (native, borrowable) = state.engine.pool().reserves();
    println!(
        "{} {} TRUST / {} ORACLE",
        "Reserves:".bright_cyan(),
        format_amount(native),
        format_amount(borrowable)
    );
}
