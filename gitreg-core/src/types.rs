//! Domain types for the repository host.
//!
//! Identifiers are string newtypes so that accounts, repository names, content
//! ids and operation ids can never be confused for one another. All types are
//! serializable via serde + serde_yaml so a whole host can be persisted.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Amount of the scarce value unit moved between ledger accounts.
pub type Amount = u128;

/// Monotonic host tick, used as the timer for settlement windows.
pub type Tick = u64;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

macro_rules! string_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }
    };
}

string_newtype!(
    /// An account on the host ledger: a user, a tenant location, the factory,
    /// or a deployed module.
    Address
);

string_newtype!(
    /// The user-chosen name of a repository. Unique per owner, shared across owners.
    RepoName
);

string_newtype!(
    /// A content identifier (commit head, issue body, answer body).
    Cid
);

string_newtype!(
    /// Stable key of a callable capability, resolved through a registry.
    OperationId
);

string_newtype!(
    /// Content hash of `owner ‖ name`; the factory's lookup key for a tenant record.
    RepoKey
);

string_newtype!(
    /// Content hash of `opener ‖ cid`; the lookup key for an issue inside a tenant.
    IssueKey
);

const NULL_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

impl Address {
    /// The null account. Never a valid owner.
    pub fn zero() -> Self {
        Self(NULL_ADDRESS.to_owned())
    }

    pub fn is_zero(&self) -> bool {
        self.0 == NULL_ADDRESS
    }

    /// Deterministically derive a fresh account from a namespace and a nonce.
    pub fn derive(namespace: &str, nonce: u64) -> Self {
        let digest = hash_pair(namespace, &nonce.to_string());
        Self(format!("0x{}", &digest[..40]))
    }
}

impl RepoKey {
    pub fn of(owner: &Address, name: &RepoName) -> Self {
        Self(hash_pair(&owner.0, &name.0))
    }
}

impl IssueKey {
    pub fn of(opener: &Address, cid: &Cid) -> Self {
        Self(hash_pair(&opener.0, &cid.0))
    }
}

/// Lowercase hex SHA-256 of `left ‖ 0x00 ‖ right`.
fn hash_pair(left: &str, right: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(left.as_bytes());
    hasher.update([0u8]);
    hasher.update(right.as_bytes());
    hex::encode(hasher.finalize())
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Lifecycle state of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    #[default]
    Open,
    Closed,
    Resolved,
}

impl fmt::Display for IssueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueState::Open => write!(f, "open"),
            IssueState::Closed => write!(f, "closed"),
            IssueState::Resolved => write!(f, "resolved"),
        }
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// A named branch pointing at a head content id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Branch {
    pub name: String,
    pub head_cid: Cid,
    pub is_active: bool,
}

impl Default for Cid {
    fn default() -> Self {
        Self(String::new())
    }
}

/// One entry of an issue's append-only answer thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub cid: Cid,
    pub author: Address,
}

/// An issue with its escrowed bounty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub key: IssueKey,
    pub cid: Cid,
    pub opener: Address,
    pub state: IssueState,
    pub bounty: Amount,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolver: Option<Address>,
    pub resolved_at: Tick,
    #[serde(default)]
    pub answers: Vec<Answer>,
    pub place_in_list: usize,
    pub is_active: bool,
}

/// The factory's bookkeeping entry for one tenant.
///
/// `owner_index` is the record's position in its owner's name list and
/// `name_index` its position in the name's owner list; both are kept equal to
/// the live positions after every mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantRecord {
    pub name: RepoName,
    pub owner: Address,
    pub location: Address,
    pub is_active: bool,
    pub owner_index: usize,
    pub name_index: usize,
    pub forked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fork_origin: Option<Address>,
}

/// A module binding as supplied to a registry: which module handles which
/// operations, and whether forked tenants inherit it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleCut {
    pub module: Address,
    pub operations: Vec<OperationId>,
    #[serde(default)]
    pub forwarded: bool,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newtype_display() {
        assert_eq!(RepoName::from("TestRepo").to_string(), "TestRepo");
        assert_eq!(Cid::from("Test123").to_string(), "Test123");
        assert_eq!(OperationId::from("push(string,string)").as_str(), "push(string,string)");
    }

    #[test]
    fn repo_key_depends_on_owner_and_name() {
        let a = Address::from("0xa");
        let b = Address::from("0xb");
        let name = RepoName::from("TestRepo");
        assert_eq!(RepoKey::of(&a, &name), RepoKey::of(&a, &name));
        assert_ne!(RepoKey::of(&a, &name), RepoKey::of(&b, &name));
        assert_eq!(RepoKey::of(&a, &name).0.len(), 64);
    }

    #[test]
    fn hash_separator_prevents_concatenation_collisions() {
        let left = RepoKey::of(&Address::from("ab"), &RepoName::from("c"));
        let right = RepoKey::of(&Address::from("a"), &RepoName::from("bc"));
        assert_ne!(left, right);
    }

    #[test]
    fn derived_addresses_are_distinct_and_well_formed() {
        let first = Address::derive("tenant", 0);
        let second = Address::derive("tenant", 1);
        assert_ne!(first, second);
        assert!(first.as_str().starts_with("0x"));
        assert_eq!(first.as_str().len(), 42);
        assert!(!first.is_zero());
        assert!(Address::zero().is_zero());
    }

    #[test]
    fn issue_state_serde_is_lowercase() {
        let yaml = serde_yaml::to_string(&IssueState::Resolved).expect("serialize");
        assert_eq!(yaml.trim(), "resolved");
        assert_eq!(IssueState::Closed.to_string(), "closed");
    }
}
