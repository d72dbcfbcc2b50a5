//! Host configuration (`~/.gitreg/config.yaml`).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::store::{config_path_at, home, load_yaml};
use crate::types::{Amount, Tick};

/// Ticks a resolved, staked issue must wait before anyone other than its
/// opener may settle it.
pub const AUTO_SETTLE_DELAY: Tick = 604_800;

/// Percentage of a settled bounty paid to the resolver; the rest goes to the
/// factory tip pool.
pub const RESOLVER_SHARE_PERCENT: u8 = 99;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    pub auto_settle_delay: Tick,
    pub resolver_share_percent: u8,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            auto_settle_delay: AUTO_SETTLE_DELAY,
            resolver_share_percent: RESOLVER_SHARE_PERCENT,
        }
    }
}

impl HostConfig {
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.resolver_share_percent > 100 {
            return Err(StoreError::InvalidConfig(format!(
                "resolver_share_percent must be at most 100, got {}",
                self.resolver_share_percent
            )));
        }
        Ok(())
    }

    /// Split a bounty into `(resolver, factory)` shares. The resolver share
    /// is computed first, so rounding favors the factory. Hundreds and the
    /// remainder are scaled separately so no bounty can overflow.
    pub fn split_bounty(&self, bounty: Amount) -> (Amount, Amount) {
        let pct = Amount::from(self.resolver_share_percent);
        let resolver = bounty / 100 * pct + bounty % 100 * pct / 100;
        (resolver, bounty - resolver)
    }
}

/// Load `<home>/.gitreg/config.yaml`; defaults when the file does not exist.
pub fn load_config_at(home: &Path) -> Result<HostConfig, StoreError> {
    let path = config_path_at(home);
    if !path.exists() {
        return Ok(HostConfig::default());
    }
    let config: HostConfig = load_yaml(&path)?;
    config.validate()?;
    Ok(config)
}

/// `load_config_at` convenience wrapper.
pub fn load_config() -> Result<HostConfig, StoreError> {
    load_config_at(&home()?)
}
