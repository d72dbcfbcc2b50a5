//! `gitreg issue open|answer|state|show|list`

use anyhow::{Context, Result};
use clap::{Subcommand, ValueEnum};
use colored::Colorize;

use gitreg_core::{Address, Amount, IssueKey, IssueState};

use crate::session::{acting, RepoRef, Session};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StateArg {
    Open,
    Resolved,
    Closed,
}

impl From<StateArg> for IssueState {
    fn from(s: StateArg) -> Self {
        match s {
            StateArg::Open => IssueState::Open,
            StateArg::Resolved => IssueState::Resolved,
            StateArg::Closed => IssueState::Closed,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum IssueCommand {
    /// Open an issue, optionally staking a bounty. Prints the issue key.
    Open {
        repo: RepoRef,
        cid: String,
        #[arg(long, default_value_t = 0)]
        value: Amount,
    },

    /// Append an answer, optionally adding to the bounty.
    Answer {
        repo: RepoRef,
        issue: String,
        cid: String,
        #[arg(long, default_value_t = 0)]
        value: Amount,
    },

    /// Move an issue to a new state.
    State {
        repo: RepoRef,
        issue: String,
        #[arg(value_enum)]
        state: StateArg,
    },

    /// Show an issue as JSON.
    Show { repo: RepoRef, issue: String },

    /// List issue keys in opening order.
    List { repo: RepoRef },
}

pub fn run(cmd: IssueCommand, caller: &Address) -> Result<()> {
    let mut session = Session::open()?;
    match cmd {
        IssueCommand::Open { repo, cid, value } => {
            let location = session.location(&repo)?;
            let key = session.host.repo(&location).open_issue(acting(caller)?, &cid, value)?;
            println!("{key}");
            session.commit()
        }
        IssueCommand::Answer { repo, issue, cid, value } => {
            let location = session.location(&repo)?;
            let key = IssueKey::from(issue);
            session.host.repo(&location).append_answer(acting(caller)?, &key, &cid, value)?;
            println!("{} {key}", "Answered".green().bold());
            session.commit()
        }
        IssueCommand::State { repo, issue, state } => {
            let location = session.location(&repo)?;
            let key = IssueKey::from(issue);
            let target = IssueState::from(state);
            session.host.repo(&location).update_issue_state(acting(caller)?, &key, target)?;
            println!("{} {key} is {target}", "Updated".green().bold());
            session.commit()
        }
        IssueCommand::Show { repo, issue } => {
            let location = session.location(&repo)?;
            let found = session.host.repo(&location).issue(&IssueKey::from(issue))?;
            println!("{}", serde_json::to_string_pretty(&found).context("failed to render issue")?);
            Ok(())
        }
        IssueCommand::List { repo } => {
            let location = session.location(&repo)?;
            for key in session.host.repo(&location).all_issues()? {
                println!("{key}");
            }
            Ok(())
        }
    }
}
