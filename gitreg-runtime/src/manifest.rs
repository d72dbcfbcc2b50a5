//! Deployment manifests: the initial contents of both registries.
//!
//! ```yaml
//! repository_modules:
//!   - module: GitRepositoryManagement
//!     forwarded: true
//!   - module: GitIssues
//!     operations: ["openIssue(string)", "getIssue(bytes32)"]
//! factory_modules:
//!   - module: RepositoryManagement
//! ```
//!
//! `module` is a catalog name or address. Omitted `operations` means every
//! operation the module serves.

use std::path::Path;

use serde::{Deserialize, Serialize};

use gitreg_core::store::{load_yaml, save_yaml};
use gitreg_core::{ModuleCut, OperationId};

use crate::catalog::ModuleCatalog;
use crate::error::RuntimeError;
use crate::modules::{
    BranchModule, IssueModule, ManagementModule, RepositoryManagementModule, TipModule,
};
use crate::module::Module;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub module: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operations: Option<Vec<OperationId>>,
    #[serde(default)]
    pub forwarded: bool,
}

impl ManifestEntry {
    fn of(module: &dyn Module, forwarded: bool) -> Self {
        Self { module: module.name().to_string(), operations: None, forwarded }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DeploymentManifest {
    #[serde(default)]
    pub repository_modules: Vec<ManifestEntry>,
    #[serde(default)]
    pub factory_modules: Vec<ManifestEntry>,
}

impl DeploymentManifest {
    /// The builtin wiring. Management and branches reach forks; issues and
    /// tips do not. Tips are also served at factory scope.
    pub fn builtin() -> Self {
        Self {
            repository_modules: vec![
                ManifestEntry::of(&ManagementModule, true),
                ManifestEntry::of(&BranchModule, true),
                ManifestEntry::of(&IssueModule, false),
                ManifestEntry::of(&TipModule, false),
            ],
            factory_modules: vec![
                ManifestEntry::of(&RepositoryManagementModule, false),
                ManifestEntry::of(&TipModule, false),
            ],
        }
    }

    pub fn load(path: &Path) -> Result<Self, RuntimeError> {
        Ok(load_yaml(path)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), RuntimeError> {
        Ok(save_yaml(path, self)?)
    }

    /// Resolve the repository-scope entries into registry cuts.
    pub fn repository_cuts(&self, catalog: &ModuleCatalog) -> Result<Vec<ModuleCut>, RuntimeError> {
        resolve_entries(&self.repository_modules, catalog)
    }

    /// Resolve the factory-scope entries into registry cuts. Scope flags are
    /// meaningless there and are dropped.
    pub fn factory_cuts(&self, catalog: &ModuleCatalog) -> Result<Vec<ModuleCut>, RuntimeError> {
        let mut cuts = resolve_entries(&self.factory_modules, catalog)?;
        for cut in &mut cuts {
            cut.forwarded = false;
        }
        Ok(cuts)
    }
}

fn resolve_entries(
    entries: &[ManifestEntry],
    catalog: &ModuleCatalog,
) -> Result<Vec<ModuleCut>, RuntimeError> {
    entries
        .iter()
        .map(|entry| {
            let (address, module) = catalog
                .find(&entry.module)
                .ok_or_else(|| RuntimeError::UnknownModule(entry.module.clone()))?;
            Ok(ModuleCut {
                module: address.clone(),
                operations: entry.operations.clone().unwrap_or_else(|| module.operations()),
                forwarded: entry.forwarded,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::module_address;
    use tempfile::TempDir;

    #[test]
    fn builtin_manifest_resolves_against_builtin_catalog() {
        let catalog = ModuleCatalog::builtin();
        let cuts = DeploymentManifest::builtin().repository_cuts(&catalog).expect("cuts");
        assert_eq!(cuts.len(), 4);
        let tips = cuts.iter().find(|c| c.module == module_address("GitTips")).expect("tips");
        assert!(!tips.forwarded);
        assert_eq!(tips.operations.len(), 2);
        let branch = cuts.iter().find(|c| c.module == module_address("GitBranch")).expect("branch");
        assert!(branch.forwarded);
    }

    #[test]
    fn unknown_module_is_reported() {
        let manifest = DeploymentManifest {
            repository_modules: vec![ManifestEntry {
                module: "GitWiki".into(),
                operations: None,
                forwarded: true,
            }],
            factory_modules: Vec::new(),
        };
        let err = manifest.repository_cuts(&ModuleCatalog::builtin()).unwrap_err();
        assert!(matches!(err, RuntimeError::UnknownModule(name) if name == "GitWiki"));
    }

    #[test]
    fn manifest_roundtrips_through_yaml_file() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("manifest.yaml");
        let manifest = DeploymentManifest::builtin();
        manifest.save(&path).expect("save");
        assert_eq!(DeploymentManifest::load(&path).expect("load"), manifest);
    }

    #[test]
    fn explicit_operations_restrict_the_cut() {
        let yaml = "repository_modules:\n  - module: GitIssues\n    operations: [\"getIssue(bytes32)\"]\n";
        let manifest: DeploymentManifest = serde_yaml::from_str(yaml).expect("parse");
        let cuts = manifest.repository_cuts(&ModuleCatalog::builtin()).expect("cuts");
        assert_eq!(cuts[0].operations, vec![OperationId::from("getIssue(bytes32)")]);
        assert!(!cuts[0].forwarded);
    }
}
