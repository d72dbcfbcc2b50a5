//! Saving and restoring a host under `~/.gitreg/state.yaml`.
//!
//! The persisted form is the host state plus the tick the host's manual
//! clock had reached. Module code is not persisted; a restored host gets the
//! builtin catalog.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use gitreg_core::store::{load_state_at, save_state_at};
use gitreg_core::{HostConfig, ManualClock, StateFile, Tick};

use crate::catalog::ModuleCatalog;
use crate::error::RuntimeError;
use crate::host::Host;
use crate::state::HostState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedHost {
    pub tick: Tick,
    pub host: HostState,
}

pub type HostFile = StateFile<SavedHost>;

impl Host {
    pub fn to_saved(&self) -> SavedHost {
        SavedHost { tick: self.current_tick(), host: self.state().clone() }
    }

    /// Restore `saved` onto a manual clock positioned at the saved tick.
    pub fn restore(saved: SavedHost, config: HostConfig) -> (Host, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(saved.tick));
        let host = Host::from_state(saved.host, ModuleCatalog::builtin(), config, clock.clone());
        (host, clock)
    }
}

pub fn load_at(home: &Path) -> Result<HostFile, RuntimeError> {
    Ok(load_state_at(home)?)
}

pub fn save_at(home: &Path, file: &mut HostFile) -> Result<(), RuntimeError> {
    Ok(save_state_at(home, file)?)
}
