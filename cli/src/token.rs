//! Token and faucet operations

use anyhow::{bail, Result};
use colored::Colorize;
use oraclelend::{AccountId, Token};

use crate::config::SandboxConfig;
use crate::store::SandboxState;
use crate::units::{format_amount, parse_amount};

/// Show both balances for the actor or a named user.
pub fn balance(state: &SandboxState, config: &SandboxConfig, user: Option<&str>) -> Result<()> {
    let (name, account) = match user {
        Some(name) => (name.to_string(), AccountId::from_seed(name)),
        None => (config.actor_name.clone(), config.actor),
    };
    println!("{}", "=== Balances ===".bright_green().bold());
    println!("{} {}", "Account:".bright_cyan(), name);
    println!(
        "{} {} TRUST",
        "Native:".bright_cyan(),
        format_amount(state.engine.bank().balance_of(&account))
    );
    println!(
        "{} {} ORACLE",
        "Borrowable:".bright_cyan(),
        format_amount(state.engine.token().balance_of(&account))
    );
    Ok(())
}

/// Approve a protocol vault to pull ORACLE from the actor.
pub fn approve(
    state: &mut SandboxState,
    config: &SandboxConfig,
    spender: &str,
    amount: &str,
) -> Result<()> {
    let amount = parse_amount(amount)?;
    let vault = match spender.to_ascii_lowercase().as_str() {
        "ledger" => state.engine.ledger_vault(),
        "pool" => state.engine.pool_vault(),
        other => bail!("unknown spender {other:?}, use ledger or pool"),
    };
    state.engine.token_mut().approve(&config.actor, &vault, amount);
    state.register_actor(&config.actor_name, config.actor);

    println!(
        "{} {} may pull {} ORACLE",
        "Approved:".bright_cyan(),
        spender,
        format_amount(amount)
    );
    Ok(())
}

/// Mint ORACLE to a user. Requires the actor to hold the minter role.
pub fn mint(state: &mut SandboxState, config: &SandboxConfig, to: &str, amount: &str) -> Result<()> {
    let amount = parse_amount(amount)?;
    let recipient = AccountId::from_seed(to);
    state.engine.token_mut().mint(&config.actor, &recipient, amount)?;
    state.register_actor(to, recipient);

    println!(
        "{} {} ORACLE to {}",
        "Minted:".bright_cyan(),
        format_amount(amount),
        to
    );
    Ok(())
}

/// Credit native TRUST to the actor. Sandbox-only convenience.
pub fn faucet(state: &mut SandboxState, config: &SandboxConfig, amount: &str) -> Result<()> {
    let amount = parse_amount(amount)?;
    state.engine.bank_mut().deposit(&config.actor, amount);
    state.register_actor(&config.actor_name, config.actor);

    println!(
        "{} {} TRUST to {}",
        "Dripped:".bright_cyan(),
        format_amount(amount),
        config.actor_name
    );
    Ok(())
}
