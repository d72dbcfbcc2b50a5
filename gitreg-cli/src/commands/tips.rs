//! `gitreg tips send|show|collect`

use std::str::FromStr;

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use gitreg_core::{Address, Amount};

use crate::session::{acting, RepoRef, Session};

/// Either a repository or the literal `factory`.
#[derive(Debug, Clone)]
pub enum TipTarget {
    Factory,
    Repo(RepoRef),
}

impl FromStr for TipTarget {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s == "factory" {
            return Ok(Self::Factory);
        }
        RepoRef::from_str(s).map(Self::Repo)
    }
}

#[derive(Subcommand, Debug)]
pub enum TipsCommand {
    /// Send value from the caller to a repository or the factory.
    Send { target: TipTarget, amount: Amount },

    /// Show accumulated tips (owner only).
    Show { target: TipTarget },

    /// Pay accumulated tips out to the owner.
    Collect { target: TipTarget },
}

pub fn run(cmd: TipsCommand, caller: &Address) -> Result<()> {
    let caller = acting(caller)?;
    let mut session = Session::open()?;
    match cmd {
        TipsCommand::Send { target, amount } => {
            let to = match &target {
                TipTarget::Factory => session.host.factory_address().clone(),
                TipTarget::Repo(repo) => session.location(repo)?,
            };
            session.host.transfer(caller, &to, amount)?;
            println!("{} {amount} to {to}", "Sent".green().bold());
            session.commit()
        }
        TipsCommand::Show { target } => {
            let amount = match target {
                TipTarget::Factory => session.host.factory().tips(caller)?,
                TipTarget::Repo(repo) => {
                    let location = session.location(&repo)?;
                    session.host.repo(&location).tips(caller)?
                }
            };
            println!("{amount}");
            Ok(())
        }
        TipsCommand::Collect { target } => {
            let amount = match target {
                TipTarget::Factory => session.host.factory().collect_tips(caller)?,
                TipTarget::Repo(repo) => {
                    let location = session.location(&repo)?;
                    session.host.repo(&location).collect_tips(caller)?
                }
            };
            println!("{} {amount}", "Collected".green().bold());
            session.commit()
        }
    }
}
