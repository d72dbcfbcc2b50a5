//! Loading the persisted host, running one command against it, saving it back.

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};

use gitreg_core::config::load_config_at;
use gitreg_core::{store, Address, ManualClock, RepoKey, RepoName, TenantRecord};
use gitreg_runtime::{persist, Host, HostFile};

pub struct Session {
    home: PathBuf,
    file: HostFile,
    pub host: Host,
    pub clock: Arc<ManualClock>,
}

impl Session {
    /// Open the host saved under `~/.gitreg/state.yaml`.
    pub fn open() -> Result<Self> {
        let home = store::home().context("could not determine home directory")?;
        let config = load_config_at(&home).context("failed to load ~/.gitreg/config.yaml")?;
        let file = persist::load_at(&home)
            .context("failed to load host state; run `gitreg deploy` first")?;
        let (host, clock) = Host::restore(file.state.clone(), config);
        tracing::debug!(tick = host.current_tick(), tenants = host.state().tenants.len(), "host loaded");
        Ok(Self { home, file, host, clock })
    }

    /// Persist the host, keeping the file's creation time.
    pub fn commit(mut self) -> Result<()> {
        self.file.state = self.host.to_saved();
        persist::save_at(&self.home, &mut self.file).context("failed to save host state")?;
        tracing::debug!(tick = self.file.state.tick, "host saved");
        Ok(())
    }

    /// The record for `repo`, active or not.
    pub fn record(&self, repo: &RepoRef) -> Result<TenantRecord> {
        self.host
            .state()
            .factory
            .record(&repo.key())
            .cloned()
            .ok_or_else(|| anyhow!("no repository {repo}"))
    }

    pub fn location(&self, repo: &RepoRef) -> Result<Address> {
        Ok(self.record(repo)?.location)
    }
}

/// The account a state-changing or owner-gated command acts as. The null
/// address is only good for reads.
pub fn acting(caller: &Address) -> Result<&Address> {
    if caller.is_zero() {
        bail!("this command acts as an account; pass --as <address>");
    }
    Ok(caller)
}

/// A repository named on the command line as `<owner>/<name>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: Address,
    pub name: RepoName,
}

impl RepoRef {
    pub fn key(&self) -> RepoKey {
        RepoKey::of(&self.owner, &self.name)
    }
}

impl FromStr for RepoRef {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() => Ok(Self {
                owner: Address::from(owner),
                name: RepoName::from(name),
            }),
            _ => Err(format!("expected <owner>/<name>, got '{s}'")),
        }
    }
}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
