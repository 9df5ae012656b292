//! Keeper operations: scan for unsafe positions and liquidate them

use anyhow::Result;
use colored::Colorize;
use oraclelend::{AccountId, Token};

use crate::config::SandboxConfig;
use crate::store::SandboxState;
use crate::units::{format_amount, format_bps};

/// List every account currently below the liquidation threshold.
pub fn scan(state: &SandboxState) -> Result<()> {
    println!("{}", "=== Liquidatable Accounts ===".bright_green().bold());
    let accounts = state.engine.liquidatable_accounts()?;
    if accounts.is_empty() {
        println!("{}", "No liquidatable accounts".dimmed());
        return Ok(());
    }
    for account in accounts {
        let snapshot = state.engine.get_user_position(&account)?;
        println!(
            "{} health {} debt {} ORACLE collateral {} TRUST",
            state.name_of(&account).bright_yellow(),
            format_bps(snapshot.health_ratio_bps).bright_red(),
            format_amount(snapshot.debt),
            format_amount(snapshot.collateral)
        );
    }
    Ok(())
}

/// Repay a target's debt out of the actor's ORACLE balance and take the
/// seized collateral.
pub fn liquidate(state: &mut SandboxState, config: &SandboxConfig, user: &str) -> Result<()> {
    let target = AccountId::from_seed(user);
    let debt = state.engine.position(&target).debt;

    let ledger_vault = state.engine.ledger_vault();
    state
        .engine
        .token_mut()
        .approve(&config.actor, &ledger_vault, debt);
    let outcome = state.engine.liquidate(&config.actor, &target)?;
    state.register_actor(&config.actor_name, config.actor);
    state.register_actor(user, target);

    println!("{}", "=== Liquidation Executed ===".bright_green().bold());
    println!("{} {}", "Target:".bright_cyan(), user);
    println!(
        "{} {} ORACLE",
        "Debt repaid:".bright_cyan(),
        format_amount(outcome.debt_repaid)
    );
    println!(
        "{} {} TRUST",
        "Collateral received:".bright_cyan(),
        format_amount(outcome.collateral_paid)
    );
    Ok(())
}
