//! Operation identifiers, typed call arguments and typed results.

use serde::{Deserialize, Serialize};

use gitreg_core::{
    Address, Amount, Branch, Cid, HostError, Issue, IssueKey, IssueState, OperationId, RepoKey,
    RepoName, TenantRecord,
};

/// Operation identifier strings. These are the registry keys; a module
/// upgrade must keep serving the same identifiers.
pub mod ops {
    pub const GET_REPOSITORY_INFO: &str = "getRepositoryInfo()";

    pub const PUSH: &str = "push(string,string)";
    pub const GET_BRANCH: &str = "getBranch(string)";
    pub const GET_BRANCH_NAMES: &str = "getBranchNames()";

    pub const OPEN_ISSUE: &str = "openIssue(string)";
    pub const APPEND_ANSWER_TO_ISSUE: &str = "appendAnswerToIssue(bytes32,string)";
    pub const UPDATE_ISSUE_STATE: &str = "updateIssueState(bytes32,uint8)";
    pub const GET_ISSUE: &str = "getIssue(bytes32)";
    pub const GET_ALL_ISSUES: &str = "getAllIssues()";

    pub const GET_TIPS: &str = "getTips()";
    pub const COLLECT_TIPS: &str = "collectTips()";

    pub const CREATE_REPOSITORY: &str = "createRepository(string)";
    pub const REMOVE_REPOSITORY: &str = "removeRepository(string,uint256,uint256)";
    pub const FORK_REPOSITORY: &str = "forkRepository(bytes32)";
    pub const GET_REPOSITORY: &str = "getRepository(bytes32)";
    pub const GET_USER_REPO_NAME_HASH: &str = "getUserRepoNameHash(address,string)";
    pub const GET_REPOSITORY_NAMES: &str = "getRepositoryNames()";
    pub const GET_USERS_REPOSITORIES: &str = "getUsersRepositories(address)";
    pub const GET_REPOSITORIES_USER_LIST: &str = "getRepositoriesUserList(string)";
}

/// Caller identity and attached value of one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallContext {
    pub caller: Address,
    pub value: Amount,
}

impl CallContext {
    pub fn new(caller: Address) -> Self {
        Self { caller, value: 0 }
    }

    pub fn with_value(mut self, value: Amount) -> Self {
        self.value = value;
        self
    }
}

impl From<&Address> for CallContext {
    fn from(caller: &Address) -> Self {
        Self::new(caller.clone())
    }
}

/// A decoded invocation: the operation and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    GetRepositoryInfo,

    Push { branch: String, head: Cid },
    GetBranch { branch: String },
    GetBranchNames,

    OpenIssue { cid: Cid },
    AppendAnswerToIssue { issue: IssueKey, cid: Cid },
    UpdateIssueState { issue: IssueKey, state: IssueState },
    GetIssue { issue: IssueKey },
    GetAllIssues,

    GetTips,
    CollectTips,

    CreateRepository { name: RepoName },
    RemoveRepository { name: RepoName, owner_index: usize, name_index: usize },
    ForkRepository { origin: RepoKey },
    GetRepository { key: RepoKey },
    GetUserRepoNameHash { owner: Address, name: RepoName },
    GetRepositoryNames,
    GetUsersRepositories { owner: Address },
    GetRepositoriesUserList { name: RepoName },
}

impl Call {
    /// The identifier this call is resolved by.
    pub fn operation_id(&self) -> OperationId {
        let id = match self {
            Call::GetRepositoryInfo => ops::GET_REPOSITORY_INFO,
            Call::Push { .. } => ops::PUSH,
            Call::GetBranch { .. } => ops::GET_BRANCH,
            Call::GetBranchNames => ops::GET_BRANCH_NAMES,
            Call::OpenIssue { .. } => ops::OPEN_ISSUE,
            Call::AppendAnswerToIssue { .. } => ops::APPEND_ANSWER_TO_ISSUE,
            Call::UpdateIssueState { .. } => ops::UPDATE_ISSUE_STATE,
            Call::GetIssue { .. } => ops::GET_ISSUE,
            Call::GetAllIssues => ops::GET_ALL_ISSUES,
            Call::GetTips => ops::GET_TIPS,
            Call::CollectTips => ops::COLLECT_TIPS,
            Call::CreateRepository { .. } => ops::CREATE_REPOSITORY,
            Call::RemoveRepository { .. } => ops::REMOVE_REPOSITORY,
            Call::ForkRepository { .. } => ops::FORK_REPOSITORY,
            Call::GetRepository { .. } => ops::GET_REPOSITORY,
            Call::GetUserRepoNameHash { .. } => ops::GET_USER_REPO_NAME_HASH,
            Call::GetRepositoryNames => ops::GET_REPOSITORY_NAMES,
            Call::GetUsersRepositories { .. } => ops::GET_USERS_REPOSITORIES,
            Call::GetRepositoriesUserList { .. } => ops::GET_REPOSITORIES_USER_LIST,
        };
        OperationId::from(id)
    }

    /// Whether value may be attached to this call.
    pub fn is_payable(&self) -> bool {
        matches!(self, Call::OpenIssue { .. } | Call::AppendAnswerToIssue { .. })
    }
}

/// Tenant identity as reported by `getRepositoryInfo()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryInfo {
    pub name: RepoName,
    pub owner: Address,
    pub factory: Address,
    pub owner_index: usize,
    pub name_index: usize,
    pub is_active: bool,
    pub forked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fork_origin: Option<Address>,
}

/// What a module returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Reply {
    Unit,
    Amount(Amount),
    Branch(Branch),
    BranchNames(Vec<String>),
    Issue(Box<Issue>),
    IssueKey(IssueKey),
    IssueKeys(Vec<IssueKey>),
    Record(Option<TenantRecord>),
    RepoKey(RepoKey),
    RepoNames(Vec<RepoName>),
    Addresses(Vec<Address>),
    Info(RepositoryInfo),
}

impl Reply {
    pub fn into_unit(self) -> Result<(), HostError> {
        match self {
            Reply::Unit => Ok(()),
            _ => Err(HostError::UnexpectedReply),
        }
    }

    pub fn into_amount(self) -> Result<Amount, HostError> {
        match self {
            Reply::Amount(a) => Ok(a),
            _ => Err(HostError::UnexpectedReply),
        }
    }

    pub fn into_branch(self) -> Result<Branch, HostError> {
        match self {
            Reply::Branch(b) => Ok(b),
            _ => Err(HostError::UnexpectedReply),
        }
    }

    pub fn into_branch_names(self) -> Result<Vec<String>, HostError> {
        match self {
            Reply::BranchNames(n) => Ok(n),
            _ => Err(HostError::UnexpectedReply),
        }
    }

    pub fn into_issue(self) -> Result<Issue, HostError> {
        match self {
            Reply::Issue(i) => Ok(*i),
            _ => Err(HostError::UnexpectedReply),
        }
    }

    pub fn into_issue_key(self) -> Result<IssueKey, HostError> {
        match self {
            Reply::IssueKey(k) => Ok(k),
            _ => Err(HostError::UnexpectedReply),
        }
    }

    pub fn into_issue_keys(self) -> Result<Vec<IssueKey>, HostError> {
        match self {
            Reply::IssueKeys(k) => Ok(k),
            _ => Err(HostError::UnexpectedReply),
        }
    }

    pub fn into_record(self) -> Result<Option<TenantRecord>, HostError> {
        match self {
            Reply::Record(r) => Ok(r),
            _ => Err(HostError::UnexpectedReply),
        }
    }

    pub fn into_repo_key(self) -> Result<RepoKey, HostError> {
        match self {
            Reply::RepoKey(k) => Ok(k),
            _ => Err(HostError::UnexpectedReply),
        }
    }

    pub fn into_repo_names(self) -> Result<Vec<RepoName>, HostError> {
        match self {
            Reply::RepoNames(n) => Ok(n),
            _ => Err(HostError::UnexpectedReply),
        }
    }

    pub fn into_addresses(self) -> Result<Vec<Address>, HostError> {
        match self {
            Reply::Addresses(a) => Ok(a),
            _ => Err(HostError::UnexpectedReply),
        }
    }

    pub fn into_info(self) -> Result<RepositoryInfo, HostError> {
        match self {
            Reply::Info(i) => Ok(i),
            _ => Err(HostError::UnexpectedReply),
        }
    }
}
