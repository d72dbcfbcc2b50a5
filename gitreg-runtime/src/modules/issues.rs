//! Issues with escrowed bounties.
//!
//! # Lifecycle
//!
//! ```text
//!            openIssue(+value)
//!   (none) ──────────────────────▶ Open ◀──────────── reject (anyone)
//!                                   │  ▲                    │
//!       close, bounty == 0          │  │ answer on Closed   │
//!       (opener or owner)           │  │ (value refunded)   │
//!                                   ▼  │                    │
//!                                 Closed ◀──── settle ── Resolved
//!                                               ▲           ▲
//!                   opener any time, anyone     │           │ resolve, bounty > 0
//!                   once the delay has passed ──┘           │ (tenant owner)
//!                                                       Open ┘
//! ```
//!
//! The bounty only grows while the issue is Open or Resolved. Settlement
//! zeroes it and closes the issue before any value moves.

use gitreg_core::{Address, Answer, Cid, HostError, Issue, IssueKey, IssueState, OperationId};

use crate::call::{ops, Call, Reply};
use crate::module::{Invocation, Module};

#[derive(Debug, Default, Clone, Copy)]
pub struct IssueModule;

impl Module for IssueModule {
    fn name(&self) -> &'static str {
        "GitIssues"
    }

    fn operations(&self) -> Vec<OperationId> {
        vec![
            ops::OPEN_ISSUE.into(),
            ops::APPEND_ANSWER_TO_ISSUE.into(),
            ops::UPDATE_ISSUE_STATE.into(),
            ops::GET_ISSUE.into(),
            ops::GET_ALL_ISSUES.into(),
        ]
    }

    fn execute(&self, inv: &mut Invocation<'_>, call: Call) -> Result<Reply, HostError> {
        match call {
            Call::OpenIssue { cid } => open_issue(inv, cid).map(Reply::IssueKey),
            Call::AppendAnswerToIssue { issue, cid } => {
                append_answer(inv, &issue, cid).map(|_| Reply::Unit)
            }
            Call::UpdateIssueState { issue, state } => {
                update_state(inv, &issue, state).map(|_| Reply::Unit)
            }
            Call::GetIssue { issue } => {
                let found = inv.tenant()?.issues.issues.get(&issue).cloned();
                found.map(|i| Reply::Issue(Box::new(i))).ok_or(HostError::IssueNotFound)
            }
            Call::GetAllIssues => Ok(Reply::IssueKeys(inv.tenant()?.issues.keys.clone())),
            _ => Err(HostError::NotRegistered),
        }
    }
}

fn open_issue(inv: &mut Invocation<'_>, cid: Cid) -> Result<IssueKey, HostError> {
    if cid.as_str().is_empty() {
        return Err(HostError::EmptyContentId);
    }
    let opener = inv.caller().clone();
    let value = inv.value();
    let key = IssueKey::of(&opener, &cid);
    let tenant = inv.tenant_mut()?;
    let store = &mut tenant.issues;

    match store.issues.get_mut(&key) {
        Some(existing) if existing.state != IssueState::Closed => return Err(HostError::AlreadyOpen),
        Some(existing) => {
            existing.state = IssueState::Open;
            existing.bounty = value;
            existing.resolver = None;
            existing.resolved_at = 0;
        }
        None => {
            let issue = Issue {
                key: key.clone(),
                cid,
                opener: opener.clone(),
                state: IssueState::Open,
                bounty: value,
                resolver: None,
                resolved_at: 0,
                answers: Vec::new(),
                place_in_list: store.keys.len(),
                is_active: true,
            };
            store.keys.push(key.clone());
            store.issues.insert(key.clone(), issue);
        }
    }
    tracing::info!(repo = %tenant.location, issue = %key, opener = %opener, bounty = value, "issue opened");
    Ok(key)
}

fn append_answer(inv: &mut Invocation<'_>, key: &IssueKey, cid: Cid) -> Result<(), HostError> {
    if cid.as_str().is_empty() {
        return Err(HostError::EmptyContentId);
    }
    let author = inv.caller().clone();
    let value = inv.value();
    let tenant = inv.tenant_mut()?;
    let location = tenant.location.clone();
    let issue = tenant.issues.issues.get_mut(key).ok_or(HostError::IssueNotFound)?;

    issue.answers.push(Answer { cid, author: author.clone() });
    let refund = match issue.state {
        IssueState::Open | IssueState::Resolved => {
            issue.bounty = issue.bounty.saturating_add(value);
            0
        }
        IssueState::Closed => {
            issue.state = IssueState::Open;
            value
        }
    };
    tracing::info!(
        repo = %location,
        issue = %key,
        author = %author,
        bounty = issue.bounty,
        state = %issue.state,
        "answer appended"
    );
    inv.state.ledger.transfer(&location, &author, refund)
}

fn update_state(inv: &mut Invocation<'_>, key: &IssueKey, target: IssueState) -> Result<(), HostError> {
    let caller = inv.caller().clone();
    let tick = inv.tick;
    let delay = inv.config.auto_settle_delay;
    let tenant = inv.tenant()?;
    let owner = tenant.owner.clone();
    let location = tenant.location.clone();
    let issue = tenant.issues.issues.get(key).ok_or(HostError::IssueNotFound)?;

    match (issue.state, target) {
        (IssueState::Closed, _) => Err(HostError::IssueClosed),
        (IssueState::Open, IssueState::Open) => Ok(()),
        (IssueState::Resolved, IssueState::Resolved) => Err(HostError::CannotResolve),
        (IssueState::Open, IssueState::Resolved) => {
            if caller != owner || issue.bounty == 0 {
                return Err(HostError::CannotResolve);
            }
            let issue = issue_mut(inv, key)?;
            issue.state = IssueState::Resolved;
            issue.resolver = Some(caller.clone());
            issue.resolved_at = tick;
            tracing::info!(repo = %location, issue = %key, resolver = %caller, tick, "issue resolved");
            Ok(())
        }
        (IssueState::Resolved, IssueState::Open) => {
            let issue = issue_mut(inv, key)?;
            issue.state = IssueState::Open;
            issue.resolver = None;
            issue.resolved_at = 0;
            tracing::info!(repo = %location, issue = %key, by = %caller, "resolution rejected");
            Ok(())
        }
        (IssueState::Open, IssueState::Closed) => {
            if issue.bounty > 0 {
                return Err(HostError::CannotClose);
            }
            if caller != issue.opener && caller != owner {
                return Err(HostError::NoPermission);
            }
            issue_mut(inv, key)?.state = IssueState::Closed;
            tracing::info!(repo = %location, issue = %key, by = %caller, "issue closed");
            Ok(())
        }
        (IssueState::Resolved, IssueState::Closed) => {
            let settleable = caller == issue.opener || tick >= issue.resolved_at.saturating_add(delay);
            if !settleable {
                return Err(HostError::CannotClose);
            }
            settle(inv, &location, key)
        }
    }
}

/// Close a resolved issue and pay its bounty out. State is committed before
/// any transfer is issued.
fn settle(inv: &mut Invocation<'_>, location: &Address, key: &IssueKey) -> Result<(), HostError> {
    let issue = issue_mut(inv, key)?;
    let resolver = issue.resolver.clone().ok_or(HostError::CannotClose)?;
    let bounty = std::mem::take(&mut issue.bounty);
    issue.state = IssueState::Closed;

    let (resolver_share, factory_share) = inv.config.split_bounty(bounty);
    let factory = inv.state.factory.address.clone();
    inv.state.factory.add_tips(factory_share);
    inv.state.ledger.transfer(location, &resolver, resolver_share)?;
    inv.state.ledger.transfer(location, &factory, factory_share)?;
    tracing::info!(
        repo = %location,
        issue = %key,
        resolver = %resolver,
        resolver_share,
        factory_share,
        "bounty settled"
    );
    Ok(())
}

fn issue_mut<'i>(inv: &'i mut Invocation<'_>, key: &IssueKey) -> Result<&'i mut Issue, HostError> {
    inv.tenant_mut()?.issues.issues.get_mut(key).ok_or(HostError::IssueNotFound)
}
