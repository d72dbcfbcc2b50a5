//! gitreg: operator CLI for a persisted repository host.
//!
//! # Usage
//!
//! ```text
//! gitreg deploy --owner <address> [--manifest <path>] [--force]
//! gitreg abi
//! gitreg fund <account> <amount>
//! gitreg balance <account>
//! gitreg tick [--advance <ticks>]
//! gitreg --as <address> repo create|list|remove|fork|show ...
//! gitreg --as <address> branch push|show|list ...
//! gitreg --as <address> issue open|answer|state|show|list ...
//! gitreg --as <address> tips send|show|collect ...
//! ```
//!
//! Repositories are named `<owner>/<name>`. State lives in
//! `~/.gitreg/state.yaml`; `RUST_LOG` controls log output on stderr.

mod commands;
mod session;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    abi::AbiArgs, branch::BranchCommand, deploy::DeployArgs, fund::BalanceArgs, fund::FundArgs,
    fund::TickArgs, issue::IssueCommand, repo::RepoCommand, tips::TipsCommand,
};
use gitreg_core::Address;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "gitreg",
    version,
    about = "Operate a multi-tenant repository host",
    long_about = None,
)]
struct Cli {
    /// Account the command is issued by. Required by commands that change
    /// state or read owner-only data.
    #[arg(long = "as", global = true, value_name = "ADDRESS", default_value = "0x0000000000000000000000000000000000000000")]
    caller: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Deploy a fresh host from a manifest.
    Deploy(DeployArgs),

    /// Print every builtin module with its operation identifiers as JSON.
    Abi(AbiArgs),

    /// Credit an account with value.
    Fund(FundArgs),

    /// Show an account's balance.
    Balance(BalanceArgs),

    /// Show or advance the host tick.
    Tick(TickArgs),

    /// Create, remove, fork and look up repositories.
    Repo {
        #[command(subcommand)]
        command: RepoCommand,
    },

    /// Push and read branches.
    Branch {
        #[command(subcommand)]
        command: BranchCommand,
    },

    /// Open, answer and move issues through their lifecycle.
    Issue {
        #[command(subcommand)]
        command: IssueCommand,
    },

    /// Send, inspect and collect tips.
    Tips {
        #[command(subcommand)]
        command: TipsCommand,
    },
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let caller = Address::from(cli.caller);
    match cli.command {
        Commands::Deploy(args) => args.run(),
        Commands::Abi(args) => args.run(),
        Commands::Fund(args) => args.run(),
        Commands::Balance(args) => args.run(),
        Commands::Tick(args) => args.run(),
        Commands::Repo { command } => commands::repo::run(command, &caller),
        Commands::Branch { command } => commands::branch::run(command, &caller),
        Commands::Issue { command } => commands::issue::run(command, &caller),
        Commands::Tips { command } => commands::tips::run(command, &caller),
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
