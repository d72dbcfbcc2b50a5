//! `gitreg branch push|show|list`

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use gitreg_core::Address;

use crate::session::{acting, RepoRef, Session};

#[derive(Subcommand, Debug)]
pub enum BranchCommand {
    /// Point a branch at a new head (creates it on first push).
    Push { repo: RepoRef, branch: String, head: String },

    /// Show a branch head; forks fall back to their origin.
    Show { repo: RepoRef, branch: String },

    /// List branch names.
    List { repo: RepoRef },
}

pub fn run(cmd: BranchCommand, caller: &Address) -> Result<()> {
    let mut session = Session::open()?;
    match cmd {
        BranchCommand::Push { repo, branch, head } => {
            let location = session.location(&repo)?;
            session.host.repo(&location).push(acting(caller)?, &branch, &head)?;
            println!("{} {repo} {branch} -> {head}", "Pushed".green().bold());
            session.commit()
        }
        BranchCommand::Show { repo, branch } => {
            let location = session.location(&repo)?;
            let found = session.host.repo(&location).branch(&branch)?;
            if found.is_active {
                println!("{} {}", found.name, found.head_cid);
            } else {
                println!("{branch} (no such branch)");
            }
            Ok(())
        }
        BranchCommand::List { repo } => {
            let location = session.location(&repo)?;
            for name in session.host.repo(&location).branch_names()? {
                println!("{name}");
            }
            Ok(())
        }
    }
}
