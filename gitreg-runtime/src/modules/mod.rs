//! Builtin modules.

pub mod branch;
pub mod issues;
pub mod management;
pub mod repository_management;
pub mod tips;

pub use branch::BranchModule;
pub use issues::IssueModule;
pub use management::ManagementModule;
pub use repository_management::RepositoryManagementModule;
pub use tips::TipModule;
