//! `gitreg repo create|list|remove|fork|show`

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use gitreg_core::{Address, RepoKey, TenantRecord};
use gitreg_runtime::RepositoryInfo;

use crate::session::{acting, RepoRef, Session};

#[derive(Subcommand, Debug)]
pub enum RepoCommand {
    /// Create a repository owned by the caller.
    Create { name: String },

    /// List active repositories, optionally for one owner.
    List(ListArgs),

    /// Remove one of the caller's repositories.
    Remove(RemoveArgs),

    /// Fork `<owner>/<name>` into the caller's account.
    Fork { origin: RepoRef },

    /// Show a repository record as JSON.
    Show { repo: RepoRef },
}

#[derive(Args, Debug)]
pub struct ListArgs {
    #[arg(long)]
    pub owner: Option<String>,
}

#[derive(Args, Debug)]
pub struct RemoveArgs {
    pub name: String,

    /// Expected position in the caller's repository list. Read from the
    /// record when omitted.
    #[arg(long)]
    pub owner_index: Option<usize>,

    /// Expected position in the name's owner list. Read from the record
    /// when omitted.
    #[arg(long)]
    pub name_index: Option<usize>,
}

#[derive(Serialize)]
struct ShowOutput {
    key: RepoKey,
    record: TenantRecord,
    info: RepositoryInfo,
}

#[derive(Tabled)]
struct RepoRow {
    #[tabled(rename = "repository")]
    repo: String,
    #[tabled(rename = "location")]
    location: String,
    #[tabled(rename = "owner idx")]
    owner_index: usize,
    #[tabled(rename = "name idx")]
    name_index: usize,
    #[tabled(rename = "fork of")]
    fork_origin: String,
}

pub fn run(cmd: RepoCommand, caller: &Address) -> Result<()> {
    let mut session = Session::open()?;
    match cmd {
        RepoCommand::Create { name } => {
            let caller = acting(caller)?;
            let record = session.host.factory().create_repository(caller, &name)?;
            println!("{} {}/{} at {}", "Created".green().bold(), record.owner, record.name, record.location);
        }
        RepoCommand::List(args) => {
            list(&session, args.owner.map(Address::from));
            return Ok(());
        }
        RepoCommand::Remove(args) => {
            let caller = acting(caller)?;
            let repo = RepoRef { owner: caller.clone(), name: args.name.as_str().into() };
            let record = session.record(&repo).ok();
            let owner_index = args.owner_index.or(record.as_ref().map(|r| r.owner_index)).unwrap_or_default();
            let name_index = args.name_index.or(record.as_ref().map(|r| r.name_index)).unwrap_or_default();
            session
                .host
                .factory()
                .remove_repository(caller, &args.name, owner_index, name_index)?;
            println!("{} {repo}", "Removed".yellow().bold());
        }
        RepoCommand::Fork { origin } => {
            let caller = acting(caller)?;
            let record = session.host.factory().fork_repository(caller, &origin.key())?;
            println!(
                "{} {origin} into {}/{} at {}",
                "Forked".green().bold(),
                record.owner,
                record.name,
                record.location
            );
        }
        RepoCommand::Show { repo } => {
            let record = session.record(&repo)?;
            let info = session.host.repo(&record.location).info()?;
            let out = ShowOutput { key: repo.key(), record, info };
            println!("{}", serde_json::to_string_pretty(&out).context("failed to render record")?);
            return Ok(());
        }
    }
    session.commit()
}

fn list(session: &Session, owner: Option<Address>) {
    let factory = &session.host.state().factory;
    let rows: Vec<RepoRow> = factory
        .records()
        .filter(|r| r.is_active)
        .filter(|r| owner.as_ref().map_or(true, |o| &r.owner == o))
        .map(|r| RepoRow {
            repo: format!("{}/{}", r.owner, r.name),
            location: r.location.to_string(),
            owner_index: r.owner_index,
            name_index: r.name_index,
            fork_origin: r.fork_origin.as_ref().map(|a| a.to_string()).unwrap_or_default(),
        })
        .collect();

    if rows.is_empty() {
        println!("No repositories.");
        return;
    }
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}
