//! Typed wrappers over [`Host::invoke`] and [`Host::invoke_factory`].
//!
//! Each method builds the [`Call`], dispatches it like any other invocation
//! and unpacks the expected [`crate::Reply`] variant. Reads run as the null
//! account.

use gitreg_core::{
    Address, Amount, Branch, Cid, HostError, Issue, IssueKey, IssueState, RepoKey, RepoName,
    TenantRecord,
};

use crate::call::{Call, CallContext, RepositoryInfo};
use crate::host::Host;

pub struct RepoClient<'h> {
    host: &'h mut Host,
    location: Address,
}

impl<'h> RepoClient<'h> {
    pub fn location(&self) -> &Address {
        &self.location
    }

    fn call(&mut self, ctx: CallContext, call: Call) -> Result<crate::Reply, HostError> {
        self.host.invoke(&ctx, &self.location, call)
    }

    fn read(&mut self, call: Call) -> Result<crate::Reply, HostError> {
        self.call(CallContext::new(Address::zero()), call)
    }

    pub fn info(&mut self) -> Result<RepositoryInfo, HostError> {
        self.read(Call::GetRepositoryInfo)?.into_info()
    }

    pub fn push(&mut self, caller: &Address, branch: &str, head: &str) -> Result<(), HostError> {
        self.call(
            caller.into(),
            Call::Push { branch: branch.to_string(), head: Cid::from(head) },
        )?
        .into_unit()
    }

    pub fn branch(&mut self, branch: &str) -> Result<Branch, HostError> {
        self.read(Call::GetBranch { branch: branch.to_string() })?.into_branch()
    }

    pub fn branch_names(&mut self) -> Result<Vec<String>, HostError> {
        self.read(Call::GetBranchNames)?.into_branch_names()
    }

    pub fn open_issue(&mut self, caller: &Address, cid: &str, value: Amount) -> Result<IssueKey, HostError> {
        let ctx = CallContext::from(caller).with_value(value);
        self.call(ctx, Call::OpenIssue { cid: Cid::from(cid) })?.into_issue_key()
    }

    pub fn append_answer(
        &mut self,
        caller: &Address,
        issue: &IssueKey,
        cid: &str,
        value: Amount,
    ) -> Result<(), HostError> {
        let ctx = CallContext::from(caller).with_value(value);
        let call = Call::AppendAnswerToIssue { issue: issue.clone(), cid: Cid::from(cid) };
        self.call(ctx, call)?.into_unit()
    }

    pub fn update_issue_state(
        &mut self,
        caller: &Address,
        issue: &IssueKey,
        state: IssueState,
    ) -> Result<(), HostError> {
        let call = Call::UpdateIssueState { issue: issue.clone(), state };
        self.call(caller.into(), call)?.into_unit()
    }

    pub fn issue(&mut self, issue: &IssueKey) -> Result<Issue, HostError> {
        self.read(Call::GetIssue { issue: issue.clone() })?.into_issue()
    }

    pub fn all_issues(&mut self) -> Result<Vec<IssueKey>, HostError> {
        self.read(Call::GetAllIssues)?.into_issue_keys()
    }

    pub fn tips(&mut self, caller: &Address) -> Result<Amount, HostError> {
        self.call(caller.into(), Call::GetTips)?.into_amount()
    }

    pub fn collect_tips(&mut self, caller: &Address) -> Result<Amount, HostError> {
        self.call(caller.into(), Call::CollectTips)?.into_amount()
    }
}

pub struct FactoryClient<'h> {
    host: &'h mut Host,
}

impl<'h> FactoryClient<'h> {
    fn call(&mut self, ctx: CallContext, call: Call) -> Result<crate::Reply, HostError> {
        self.host.invoke_factory(&ctx, call)
    }

    fn read(&mut self, call: Call) -> Result<crate::Reply, HostError> {
        self.call(CallContext::new(Address::zero()), call)
    }

    /// Create `(caller, name)`, returning the new record.
    pub fn create_repository(&mut self, caller: &Address, name: &str) -> Result<TenantRecord, HostError> {
        let reply = self.call(caller.into(), Call::CreateRepository { name: RepoName::from(name) })?;
        reply.into_record()?.ok_or(HostError::UnexpectedReply)
    }

    pub fn remove_repository(
        &mut self,
        caller: &Address,
        name: &str,
        owner_index: usize,
        name_index: usize,
    ) -> Result<(), HostError> {
        let call = Call::RemoveRepository { name: RepoName::from(name), owner_index, name_index };
        self.call(caller.into(), call)?.into_unit()
    }

    pub fn fork_repository(&mut self, caller: &Address, origin: &RepoKey) -> Result<TenantRecord, HostError> {
        let reply = self.call(caller.into(), Call::ForkRepository { origin: origin.clone() })?;
        reply.into_record()?.ok_or(HostError::UnexpectedReply)
    }

    pub fn repository(&mut self, key: &RepoKey) -> Result<Option<TenantRecord>, HostError> {
        self.read(Call::GetRepository { key: key.clone() })?.into_record()
    }

    pub fn user_repo_name_hash(&mut self, owner: &Address, name: &str) -> Result<RepoKey, HostError> {
        let call = Call::GetUserRepoNameHash { owner: owner.clone(), name: RepoName::from(name) };
        self.read(call)?.into_repo_key()
    }

    pub fn repository_names(&mut self) -> Result<Vec<RepoName>, HostError> {
        self.read(Call::GetRepositoryNames)?.into_repo_names()
    }

    pub fn users_repositories(&mut self, owner: &Address) -> Result<Vec<RepoName>, HostError> {
        self.read(Call::GetUsersRepositories { owner: owner.clone() })?.into_repo_names()
    }

    pub fn repositories_user_list(&mut self, name: &str) -> Result<Vec<Address>, HostError> {
        self.read(Call::GetRepositoriesUserList { name: RepoName::from(name) })?.into_addresses()
    }

    pub fn tips(&mut self, caller: &Address) -> Result<Amount, HostError> {
        self.call(caller.into(), Call::GetTips)?.into_amount()
    }

    pub fn collect_tips(&mut self, caller: &Address) -> Result<Amount, HostError> {
        self.call(caller.into(), Call::CollectTips)?.into_amount()
    }
}

impl Host {
    /// Typed access to the tenant at `location`.
    pub fn repo(&mut self, location: &Address) -> RepoClient<'_> {
        RepoClient { host: self, location: location.clone() }
    }

    /// Typed access to the factory.
    pub fn factory(&mut self) -> FactoryClient<'_> {
        FactoryClient { host: self }
    }
}
