//! `gitreg deploy`: build both registries and an empty factory.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

use gitreg_core::config::load_config_at;
use gitreg_core::store::{self, state_path_at};
use gitreg_core::{Address, ManualClock, StateFile};
use gitreg_runtime::{persist, DeploymentManifest, Host};

#[derive(Args, Debug)]
pub struct DeployArgs {
    /// Account that owns both registries and the factory.
    #[arg(long)]
    pub owner: String,

    /// YAML deployment manifest. Defaults to the builtin wiring.
    #[arg(long, value_name = "PATH")]
    pub manifest: Option<PathBuf>,

    /// Replace an existing host.
    #[arg(long)]
    pub force: bool,
}

impl DeployArgs {
    pub fn run(self) -> Result<()> {
        let home = store::home().context("could not determine home directory")?;
        if state_path_at(&home).exists() && !self.force {
            bail!("a host is already deployed; pass --force to replace it");
        }

        let manifest = match &self.manifest {
            Some(path) => DeploymentManifest::load(path)
                .with_context(|| format!("failed to load manifest {}", path.display()))?,
            None => DeploymentManifest::builtin(),
        };
        let config = load_config_at(&home).context("failed to load ~/.gitreg/config.yaml")?;
        let clock = Arc::new(ManualClock::new(0));
        let host = Host::deploy(Address::from(self.owner), &manifest, config, clock)
            .context("deployment failed")?;

        let mut file = StateFile::new(host.to_saved());
        persist::save_at(&home, &mut file).context("failed to save host state")?;
        println!("{} factory at {}", "Deployed".green().bold(), host.factory_address());
        Ok(())
    }
}
