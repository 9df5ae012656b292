//! OracleLend CLI - local sandbox for the lending ledger and its DEX oracle
//!
//! Every command loads the sandbox state from a JSON file, runs one engine
//! operation as the acting identity and writes the state back. The deployer
//! identity starts with the ORACLE supply and the minter role.

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

mod config;
mod keeper;
mod lending;
mod liquidity;
mod store;
mod token;
mod trading;
mod units;

use config::SandboxConfig;
use store::SandboxState;

#[derive(Parser)]
#[command(name = "oraclelend")]
#[command(about = "OracleLend sandbox - DEX-priced over-collateralized lending", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the sandbox state file (default: ~/.oraclelend/state.json)
    #[arg(short, long)]
    state: Option<PathBuf>,

    /// Acting identity; balances and positions are keyed by this name
    #[arg(short, long, default_value = "deployer")]
    actor: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pool liquidity operations
    Liquidity {
        #[command(subcommand)]
        command: LiquidityCommands,
    },

    /// Swap and price operations
    Trade {
        #[command(subcommand)]
        command: TradeCommands,
    },

    /// Collateral and borrowing operations
    Lend {
        #[command(subcommand)]
        command: LendCommands,
    },

    /// Keeper operations
    Keeper {
        #[command(subcommand)]
        command: KeeperCommands,
    },

    /// Token and faucet operations
    Token {
        #[command(subcommand)]
        command: TokenCommands,
    },
}

#[derive(Subcommand)]
enum LiquidityCommands {
    /// Add liquidity to both sides of the pool
    Add {
        /// TRUST amount to deposit
        #[arg(long)]
        trust: String,

        /// ORACLE amount to deposit
        #[arg(long)]
        oracle: String,
    },

    /// Show reserves, volume and trade count
    Stats,
}

#[derive(Subcommand)]
enum TradeCommands {
    /// Quote a swap without executing it
    Quote {
        /// Asset to sell (trust or oracle)
        sell: String,

        /// Amount to sell
        amount: String,
    },

    /// Execute a swap
    Swap {
        /// Asset to sell (trust or oracle)
        sell: String,

        /// Amount to sell
        amount: String,

        /// Reject the swap if the output falls below this amount
        #[arg(long)]
        min_out: Option<String>,
    },

    /// Show the current spot price
    Price,
}

#[derive(Subcommand)]
enum LendCommands {
    /// Lock TRUST as collateral
    Deposit {
        /// Amount to lock
        amount: String,
    },

    /// Unlock collateral
    Withdraw {
        /// Amount to unlock
        amount: Option<String>,

        /// Withdraw as much as the health ratio allows
        #[arg(long)]
        max: bool,
    },

    /// Borrow ORACLE against locked collateral
    Borrow {
        /// Amount to borrow
        amount: Option<String>,

        /// Borrow the full available headroom
        #[arg(long)]
        max: bool,
    },

    /// Repay outstanding debt
    Repay {
        /// Amount to repay (clamped to the outstanding debt)
        amount: Option<String>,

        /// Repay the whole debt
        #[arg(long)]
        all: bool,
    },

    /// Move ORACLE into the ledger's lendable balance
    Fund {
        /// Amount to contribute
        amount: String,
    },

    /// Show a position snapshot
    Position {
        /// User to inspect (defaults to the acting identity)
        user: Option<String>,
    },
}

#[derive(Subcommand)]
enum KeeperCommands {
    /// List liquidatable accounts
    Scan,

    /// Liquidate an unsafe position
    Liquidate {
        /// User whose position to liquidate
        user: String,
    },
}

#[derive(Subcommand)]
enum TokenCommands {
    /// Show TRUST and ORACLE balances
    Balance {
        /// User to inspect (defaults to the acting identity)
        user: Option<String>,
    },

    /// Approve a protocol vault to pull ORACLE
    Approve {
        /// Vault to approve (ledger or pool)
        #[arg(long)]
        spender: String,

        /// Allowance amount
        amount: String,
    },

    /// Mint ORACLE (minter role required)
    Mint {
        /// Recipient user name
        #[arg(long)]
        to: String,

        /// Amount to mint
        amount: String,
    },

    /// Credit native TRUST to the acting identity
    Faucet {
        /// Amount to drip
        amount: String,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = SandboxConfig::new(cli.state, &cli.actor)?;

    if cli.verbose {
        println!("{} {}", "State:".bright_cyan(), config.state_path.display());
        println!("{} {}", "Actor:".bright_cyan(), config.actor_name);
    }

    let mut state = SandboxState::load_or_init(&config.state_path)?;

    match cli.command {
        Commands::Liquidity { command } => match command {
            LiquidityCommands::Add { trust, oracle } => {
                liquidity::add(&mut state, &config, &trust, &oracle)?;
            }
            LiquidityCommands::Stats => {
                liquidity::stats(&state)?;
            }
        },
        Commands::Trade { command } => match command {
            TradeCommands::Quote { sell, amount } => {
                trading::quote(&state, &sell, &amount)?;
            }
            TradeCommands::Swap { sell, amount, min_out } => {
                trading::swap(&mut state, &config, &sell, &amount, min_out.as_deref())?;
            }
            TradeCommands::Price => {
                trading::price(&state)?;
            }
        },
        Commands::Lend { command } => match command {
            LendCommands::Deposit { amount } => {
                lending::deposit(&mut state, &config, &amount)?;
            }
            LendCommands::Withdraw { amount, max } => {
                lending::withdraw(&mut state, &config, amount.as_deref(), max)?;
            }
            LendCommands::Borrow { amount, max } => {
                lending::borrow(&mut state, &config, amount.as_deref(), max)?;
            }
            LendCommands::Repay { amount, all } => {
                lending::repay(&mut state, &config, amount.as_deref(), all)?;
            }
            LendCommands::Fund { amount } => {
                lending::fund(&mut state, &config, &amount)?;
            }
            LendCommands::Position { user } => {
                lending::position(&state, &config, user.as_deref())?;
            }
        },
        Commands::Keeper { command } => match command {
            KeeperCommands::Scan => {
                keeper::scan(&state)?;
            }
            KeeperCommands::Liquidate { user } => {
                keeper::liquidate(&mut state, &config, &user)?;
            }
        },
        Commands::Token { command } => match command {
            TokenCommands::Balance { user } => {
                token::balance(&state, &config, user.as_deref())?;
            }
            TokenCommands::Approve { spender, amount } => {
                token::approve(&mut state, &config, &spender, &amount)?;
            }
            TokenCommands::Mint { to, amount } => {
                token::mint(&mut state, &config, &to, &amount)?;
            }
            TokenCommands::Faucet { amount } => {
                token::faucet(&mut state, &config, &amount)?;
            }
        },
    }

    state.save(&config.state_path)
}
