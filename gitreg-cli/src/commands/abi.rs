//! `gitreg abi`: publish module operation identifiers.

use anyhow::{Context, Result};
use clap::Args;

use gitreg_runtime::ModuleCatalog;

#[derive(Args, Debug)]
pub struct AbiArgs {}

impl AbiArgs {
    pub fn run(self) -> Result<()> {
        let json = ModuleCatalog::builtin()
            .abi_json()
            .context("failed to render module ABI")?;
        println!("{json}");
        Ok(())
    }
}
