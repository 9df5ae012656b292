//! Collateral and borrowing operations

use anyhow::Result;
use colored::Colorize;
use oraclelend::{AccountId, Token};

use crate::config::SandboxConfig;
use crate::store::SandboxState;
use crate::units::{format_amount, format_bps, parse_amount};

/// Lock native collateral in the ledger.
pub fn deposit(state: &mut SandboxState, config: &SandboxConfig, amount: &str) -> Result<()> {
    let amount = parse_amount(amount)?;
    state.engine.add_collateral(&config.actor, amount)?;
    state.register_actor(&config.actor_name, config.actor);

    println!("{}", "=== Collateral Deposited ===".bright_green().bold());
    println!("{} {} TRUST", "Locked:".bright_cyan(), format_amount(amount));
    position_of(state, &config.actor)
}

/// Unlock collateral; `--max` withdraws everything the health ratio allows.
pub fn withdraw(
    state: &mut SandboxState,
    config: &SandboxConfig,
    amount: Option<&str>,
    max: bool,
) -> Result<()> {
    let amount = match amount {
        Some(raw) => parse_amount(raw)?,
        None if max => state.engine.max_withdrawable_collateral(&config.actor)?,
        None => anyhow::bail!("pass an amount or --max"),
    };
    state.engine.withdraw_collateral(&config.actor, amount)?;

    println!("{}", "=== Collateral Withdrawn ===".bright_green().bold());
    println!("{} {} TRUST", "Unlocked:".bright_cyan(), format_amount(amount));
    position_of(state, &config.actor)
}

/// Borrow against locked collateral; `--max` takes the full headroom.
pub fn borrow(
    state: &mut SandboxState,
    config: &SandboxConfig,
    amount: Option<&str>,
    max: bool,
) -> Result<()> {
    let amount = match amount {
        Some(raw) => parse_amount(raw)?,
        None if max => state.engine.max_borrowable(&config.actor)?,
        None => anyhow::bail!("pass an amount or --max"),
    };
    state.engine.borrow(&config.actor, amount)?;

    println!("{}", "=== Borrowed ===".bright_green().bold());
    println!("{} {} ORACLE", "Received:".bright_cyan(), format_amount(amount));
    position_of(state, &config.actor)
}

/// Repay principal; overpayment clamps to the outstanding debt. `--all`
/// clears the position in one call.
pub fn repay(
    state: &mut SandboxState,
    config: &SandboxConfig,
    amount: Option<&str>,
    all: bool,
) -> Result<()> {
    let amount = match amount {
        Some(raw) => parse_amount(raw)?,
        None if all => state.engine.position(&config.actor).debt,
        None => anyhow::bail!("pass an amount or --all"),
    };
    let ledger_vault = state.engine.ledger_vault();
    state
        .engine
        .token_mut()
        .approve(&config.actor, &ledger_vault, amount);
    let repaid = state.engine.repay(&config.actor, amount)?;

    println!("{}", "=== Repaid ===".bright_green().bold());
    println!("{} {} ORACLE", "Repaid:".bright_cyan(), format_amount(repaid));
    position_of(state, &config.actor)
}

/// Move ORACLE from the actor into the ledger's lendable balance.
pub fn fund(state: &mut SandboxState, config: &SandboxConfig, amount: &str) -> Result<()> {
    let amount = parse_amount(amount)?;
    let ledger_vault = state.engine.ledger_vault();
    state
        .engine
        .token_mut()
        .approve(&config.actor, &ledger_vault, amount);
    state.engine.fund_ledger(&config.actor, amount)?;
    state.register_actor(&config.actor_name, config.actor);

    println!("{}", "=== Ledger Funded ===".bright_green().bold());
    println!(
        "{} {} ORACLE",
        "Lendable balance:".bright_cyan(),
        format_amount(state.engine.ledger_borrowable_balance())
    );
    Ok(())
}

/// Show a position snapshot, for the actor or any named user.
pub fn position(state: &SandboxState, config: &SandboxConfig, user: Option<&str>) -> Result<()> {
    let account = match user {
        Some(name) => AccountId::from_seed(name),
        None => config.actor,
    };
    println!("{}", "=== Position ===".bright_green().bold());
    position_of(state, &account)
}

// Best-effort: a mutating command must not fail after the engine already
// applied, so an unpriceable snapshot degrades to a notice.
fn position_of(state: &SandboxState, account: &AccountId) -> Result<()> {
    let snapshot = match state.engine.get_user_position(account) {
        Ok(snapshot) => snapshot,
        Err(err) => {
            println!("{} {err}", "Position unpriced:".yellow());
            return Ok(());
        }
    };
    println!(
        "{} {} TRUST",
        "Collateral:".bright_cyan(),
        format_amount(snapshot.collateral)
    );
    println!(
        "{} {} ORACLE",
        "Collateral value:".bright_cyan(),
        format_amount(snapshot.collateral_value)
    );
    println!("{} {} ORACLE", "Debt:".bright_cyan(), format_amount(snapshot.debt));
    println!(
        "{} {}",
        "Health:".bright_cyan(),
        format_bps(snapshot.health_ratio_bps)
    );
    if snapshot.liquidatable {
        println!("{}", "LIQUIDATABLE".bright_red().bold());
    }
    let headroom = state.engine.max_borrowable(account);
    if let Ok(headroom) = headroom {
        println!(
            "{} {} ORACLE",
            "Max additional borrow:".bright_cyan(),
            format_amount(headroom)
        );
    }
    Ok(())
}
