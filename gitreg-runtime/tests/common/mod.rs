#![allow(dead_code)]

use std::sync::Arc;

use gitreg_core::{Address, HostConfig, ManualClock, TenantRecord};
use gitreg_runtime::{DeploymentManifest, Host};

pub struct World {
    pub host: Host,
    pub clock: Arc<ManualClock>,
    pub deployer: Address,
    pub alice: Address,
    pub bob: Address,
    pub carol: Address,
}

impl World {
    pub fn new() -> Self {
        Self::with_config(HostConfig::default())
    }

    pub fn with_config(config: HostConfig) -> Self {
        let deployer = Address::from("0xdeployer");
        let clock = Arc::new(ManualClock::new(1_000));
        let host = Host::deploy(
            deployer.clone(),
            &DeploymentManifest::builtin(),
            config,
            clock.clone(),
        )
        .expect("deploy");
        Self {
            host,
            clock,
            deployer,
            alice: Address::from("0xa11ce"),
            bob: Address::from("0xb0b"),
            carol: Address::from("0xca401"),
        }
    }

    pub fn create(&mut self, owner: &Address, name: &str) -> TenantRecord {
        self.host.factory().create_repository(owner, name).expect("create repository")
    }
}

/// Every active record's stored indices point at its live list positions.
pub fn assert_indices_consistent(host: &Host) {
    let factory = &host.state().factory;
    for record in factory.records().filter(|r| r.is_active) {
        let owned = factory.users_repositories(&record.owner);
        assert_eq!(
            owned.get(record.owner_index),
            Some(&record.name),
            "owner index of {}/{}",
            record.owner,
            record.name
        );
        let owners = factory.repositories_user_list(&record.name);
        assert_eq!(
            owners.get(record.name_index),
            Some(&record.owner),
            "name index of {}/{}",
            record.owner,
            record.name
        );
    }
    let active = factory.records().filter(|r| r.is_active).count();
    let listed: usize = factory
        .repository_names()
        .iter()
        .map(|n| factory.repositories_user_list(n).len())
        .sum();
    assert_eq!(active, listed, "every active record is listed exactly once");
}
