mod common;

use common::World;
use gitreg_core::{Address, Answer, Cid, HostConfig, HostError, IssueKey, IssueState, TenantRecord};
use rstest::{fixture, rstest};

const DELAY: u64 = 604_800;

/// Alice owns `TestRepo`; Bob and Carol are funded.
struct Repo {
    world: World,
    repo: TenantRecord,
}

impl Repo {
    fn location(&self) -> Address {
        self.repo.location.clone()
    }
}

fn repo_with(config: HostConfig) -> Repo {
    let mut world = World::with_config(config);
    let alice = world.alice.clone();
    let repo = world.create(&alice, "TestRepo");
    for account in [world.bob.clone(), world.carol.clone()] {
        world.host.deposit(&account, 1_000_000);
    }
    Repo { world, repo }
}

#[fixture]
fn repo() -> Repo {
    repo_with(HostConfig::default())
}

#[rstest]
fn bounty_lifecycle_pays_resolver_and_factory(repo: Repo) {
    let location = repo.location();
    let Repo { mut world, .. } = repo;
    let (alice, bob) = (world.alice.clone(), world.bob.clone());

    let key = world.host.repo(&location).open_issue(&bob, "bountyCid", 1337).expect("open");
    let issue = world.host.repo(&location).issue(&key).unwrap();
    assert_eq!(issue.bounty, 1337);
    assert_eq!(issue.state, IssueState::Open);
    assert_eq!(issue.key, IssueKey::of(&bob, &Cid::from("bountyCid")));

    world
        .host
        .repo(&location)
        .update_issue_state(&alice, &key, IssueState::Resolved)
        .expect("resolve");
    let issue = world.host.repo(&location).issue(&key).unwrap();
    assert_eq!(issue.state, IssueState::Resolved);
    assert_eq!(issue.resolver, Some(alice.clone()));
    assert_eq!(issue.resolved_at, 1_000);

    world
        .host
        .repo(&location)
        .append_answer(&bob, &key, "answerCid", 1337)
        .expect("answer");
    let issue = world.host.repo(&location).issue(&key).unwrap();
    assert_eq!(issue.bounty, 2674);
    assert_eq!(issue.state, IssueState::Resolved);

    let err = world
        .host
        .repo(&location)
        .update_issue_state(&alice, &key, IssueState::Closed)
        .unwrap_err();
    assert_eq!(err.to_string(), "Can't close the issue");

    world.clock.advance(DELAY);
    let before = world.host.balance_of(&alice);
    world
        .host
        .repo(&location)
        .update_issue_state(&bob, &key, IssueState::Closed)
        .expect("close");

    let issue = world.host.repo(&location).issue(&key).unwrap();
    assert_eq!(issue.bounty, 0);
    assert_eq!(issue.state, IssueState::Closed);
    assert_eq!(world.host.balance_of(&alice) - before, 2674 * 99 / 100);
    assert_eq!(world.host.state().factory.tips(), 27);
    assert_eq!(world.host.balance_of(&location), 0);

    let deployer = world.deployer.clone();
    assert_eq!(world.host.factory().tips(&deployer), Ok(27));
    assert_eq!(world.host.factory().collect_tips(&alice), Err(HostError::NotContractOwner));
    assert_eq!(world.host.factory().collect_tips(&deployer), Ok(27));
    assert_eq!(world.host.balance_of(&deployer), 27);
    assert_eq!(world.host.state().factory.tips(), 0);
}

#[rstest]
#[case::one_tick_early(DELAY - 1, false)]
#[case::exactly_at_window(DELAY, true)]
#[case::long_after(DELAY * 3, true)]
fn anyone_may_settle_once_the_window_has_passed(
    repo: Repo,
    #[case] wait: u64,
    #[case] allowed: bool,
) {
    let location = repo.location();
    let Repo { mut world, .. } = repo;
    let (alice, bob, carol) = (world.alice.clone(), world.bob.clone(), world.carol.clone());
    let key = world.host.repo(&location).open_issue(&bob, "bug", 500).expect("open");
    world
        .host
        .repo(&location)
        .update_issue_state(&alice, &key, IssueState::Resolved)
        .expect("resolve");

    world.clock.advance(wait);
    let result = world.host.repo(&location).update_issue_state(&carol, &key, IssueState::Closed);
    if allowed {
        result.expect("settle");
        assert_eq!(world.host.balance_of(&alice), 495);
    } else {
        assert_eq!(result, Err(HostError::CannotClose));
        assert_eq!(world.host.repo(&location).issue(&key).unwrap().bounty, 500);
    }
}

#[rstest]
fn opener_may_settle_immediately(repo: Repo) {
    let location = repo.location();
    let Repo { mut world, .. } = repo;
    let (alice, bob) = (world.alice.clone(), world.bob.clone());
    let key = world.host.repo(&location).open_issue(&bob, "bug", 100).expect("open");
    world
        .host
        .repo(&location)
        .update_issue_state(&alice, &key, IssueState::Resolved)
        .expect("resolve");
    world
        .host
        .repo(&location)
        .update_issue_state(&bob, &key, IssueState::Closed)
        .expect("close");
    assert_eq!(world.host.balance_of(&alice), 99);
    assert_eq!(world.host.state().factory.tips(), 1);
}

#[rstest]
#[case::no_bounty("0xa11ce", 0)]
#[case::not_owner("0xb0b", 10)]
fn resolve_requires_owner_and_bounty(repo: Repo, #[case] resolver: &str, #[case] bounty: u128) {
    let location = repo.location();
    let Repo { mut world, .. } = repo;
    let bob = world.bob.clone();
    let key = world.host.repo(&location).open_issue(&bob, "bug", bounty).expect("open");
    let err = world
        .host
        .repo(&location)
        .update_issue_state(&Address::from(resolver), &key, IssueState::Resolved)
        .unwrap_err();
    assert_eq!(err.to_string(), "Can't resolve the issue");
}

#[rstest]
#[case::opener("0xb0b", None)]
#[case::owner("0xa11ce", None)]
#[case::third_party("0xca401", Some("You don't have the permission to close this issue"))]
fn closing_without_bounty(repo: Repo, #[case] closer: &str, #[case] expected: Option<&str>) {
    let location = repo.location();
    let Repo { mut world, .. } = repo;
    let bob = world.bob.clone();
    let key = world.host.repo(&location).open_issue(&bob, "bug", 0).expect("open");
    let result = world
        .host
        .repo(&location)
        .update_issue_state(&Address::from(closer), &key, IssueState::Closed);
    match expected {
        None => {
            result.expect("close");
            let issue = world.host.repo(&location).issue(&key).unwrap();
            assert_eq!(issue.state, IssueState::Closed);
        }
        Some(message) => assert_eq!(result.unwrap_err().to_string(), message),
    }
}

#[rstest]
fn staked_open_issue_cannot_be_closed_directly(repo: Repo) {
    let location = repo.location();
    let Repo { mut world, .. } = repo;
    let (alice, bob) = (world.alice.clone(), world.bob.clone());
    let key = world.host.repo(&location).open_issue(&bob, "bug", 5).expect("open");
    for closer in [&alice, &bob] {
        assert_eq!(
            world.host.repo(&location).update_issue_state(closer, &key, IssueState::Closed),
            Err(HostError::CannotClose)
        );
    }
}

#[rstest]
fn anyone_may_reject_a_resolution_and_bounty_is_kept(repo: Repo) {
    let location = repo.location();
    let Repo { mut world, .. } = repo;
    let (alice, bob, carol) = (world.alice.clone(), world.bob.clone(), world.carol.clone());
    let key = world.host.repo(&location).open_issue(&bob, "bug", 42).expect("open");
    let mut repo = world.host.repo(&location);
    repo.update_issue_state(&alice, &key, IssueState::Resolved).expect("resolve");
    repo.update_issue_state(&carol, &key, IssueState::Open).expect("reject");

    let issue = repo.issue(&key).unwrap();
    assert_eq!(issue.state, IssueState::Open);
    assert_eq!(issue.bounty, 42);
    assert_eq!(issue.resolver, None);

    repo.update_issue_state(&alice, &key, IssueState::Resolved).expect("resolve again");
    assert_eq!(
        repo.update_issue_state(&alice, &key, IssueState::Resolved),
        Err(HostError::CannotResolve)
    );
}

#[rstest]
#[case::reopen(IssueState::Open)]
#[case::resolve(IssueState::Resolved)]
#[case::close(IssueState::Closed)]
fn closed_issue_rejects_every_transition(repo: Repo, #[case] target: IssueState) {
    let location = repo.location();
    let Repo { mut world, .. } = repo;
    let (alice, bob) = (world.alice.clone(), world.bob.clone());
    let key = world.host.repo(&location).open_issue(&bob, "bug", 0).expect("open");
    let mut repo = world.host.repo(&location);
    repo.update_issue_state(&bob, &key, IssueState::Closed).expect("close");
    let err = repo.update_issue_state(&alice, &key, target).unwrap_err();
    assert_eq!(err.to_string(), "Issue is closed already");
}

#[rstest]
fn answer_on_closed_issue_reopens_and_refunds(repo: Repo) {
    let location = repo.location();
    let Repo { mut world, .. } = repo;
    let (bob, carol) = (world.bob.clone(), world.carol.clone());
    let key = world.host.repo(&location).open_issue(&bob, "bug", 0).expect("open");
    world
        .host
        .repo(&location)
        .update_issue_state(&bob, &key, IssueState::Closed)
        .expect("close");

    let before = world.host.balance_of(&carol);
    world
        .host
        .repo(&location)
        .append_answer(&carol, &key, "late", 300)
        .expect("answer");
    let issue = world.host.repo(&location).issue(&key).unwrap();
    assert_eq!(issue.state, IssueState::Open);
    assert_eq!(issue.bounty, 0);
    assert_eq!(world.host.balance_of(&carol), before);
    assert_eq!(issue.answers, vec![Answer { cid: Cid::from("late"), author: carol }]);
}

#[rstest]
fn answers_accumulate_bounty_exactly(repo: Repo) {
    let location = repo.location();
    let Repo { mut world, .. } = repo;
    let (bob, carol) = (world.bob.clone(), world.carol.clone());
    let key = world.host.repo(&location).open_issue(&bob, "bug", 7).expect("open");
    let mut expected = 7u128;
    for (i, value) in [1u128, 0, 250, 3].into_iter().enumerate() {
        world
            .host
            .repo(&location)
            .append_answer(&carol, &key, &format!("answer-{i}"), value)
            .expect("answer");
        expected += value;
        assert_eq!(world.host.repo(&location).issue(&key).unwrap().bounty, expected);
    }
    assert_eq!(world.host.repo(&location).issue(&key).unwrap().answers.len(), 4);
    assert_eq!(world.host.balance_of(&location), expected);
}

#[rstest]
fn open_issue_keys_and_reopening(repo: Repo) {
    let location = repo.location();
    let Repo { mut world, .. } = repo;
    let (bob, carol) = (world.bob.clone(), world.carol.clone());
    let mut repo = world.host.repo(&location);

    let first = repo.open_issue(&bob, "bug", 0).expect("open");
    let second = repo.open_issue(&carol, "bug", 0).expect("same cid, other opener");
    let third = repo.open_issue(&bob, "feature", 0).expect("open");
    assert_eq!(repo.all_issues().unwrap(), vec![first.clone(), second.clone(), third.clone()]);
    assert_eq!(repo.issue(&third).unwrap().place_in_list, 2);

    let err = repo.open_issue(&bob, "bug", 0).unwrap_err();
    assert_eq!(err.to_string(), "Open issue exists already");

    repo.update_issue_state(&bob, &first, IssueState::Closed).expect("close");
    let reopened = repo.open_issue(&bob, "bug", 9).expect("reopen");
    assert_eq!(reopened, first);
    let issue = repo.issue(&first).unwrap();
    assert_eq!(issue.state, IssueState::Open);
    assert_eq!(issue.bounty, 9);
    assert_eq!(issue.place_in_list, 0);
    assert_eq!(repo.all_issues().unwrap().len(), 3);
}

#[rstest]
fn unknown_issue_is_reported(repo: Repo) {
    let location = repo.location();
    let Repo { mut world, .. } = repo;
    let bob = world.bob.clone();
    let unknown = IssueKey::of(&bob, &Cid::from("ghost"));
    let mut repo = world.host.repo(&location);
    assert_eq!(repo.issue(&unknown), Err(HostError::IssueNotFound));
    assert_eq!(repo.append_answer(&bob, &unknown, "a", 0), Err(HostError::IssueNotFound));
    let err = repo.update_issue_state(&bob, &unknown, IssueState::Closed).unwrap_err();
    assert_eq!(err.to_string(), "Issue with given cid does not exist");
}

#[rstest]
fn unaffordable_bounty_leaves_nothing_behind(repo: Repo) {
    let location = repo.location();
    let Repo { mut world, .. } = repo;
    let poor = Address::from("0xp00r");
    let err = world.host.repo(&location).open_issue(&poor, "bug", 1).unwrap_err();
    assert_eq!(err.to_string(), "Insufficient balance");
    assert!(world.host.repo(&location).all_issues().unwrap().is_empty());
}

#[rstest]
fn failed_open_refunds_attached_value(repo: Repo) {
    let location = repo.location();
    let Repo { mut world, .. } = repo;
    let bob = world.bob.clone();
    let before = world.host.balance_of(&bob);
    assert_eq!(
        world.host.repo(&location).open_issue(&bob, "", 50),
        Err(HostError::EmptyContentId)
    );
    assert_eq!(world.host.balance_of(&bob), before);
    assert_eq!(world.host.balance_of(&location), 0);
}

#[test]
fn configured_share_drives_the_split() {
    let Repo { mut world, repo } = repo_with(HostConfig { resolver_share_percent: 90, auto_settle_delay: 10 });
    let location = repo.location;
    let (alice, bob, carol) = (world.alice.clone(), world.bob.clone(), world.carol.clone());
    let key = world.host.repo(&location).open_issue(&bob, "bug", 1000).expect("open");
    world
        .host
        .repo(&location)
        .update_issue_state(&alice, &key, IssueState::Resolved)
        .expect("resolve");
    world.clock.advance(10);
    world
        .host
        .repo(&location)
        .update_issue_state(&carol, &key, IssueState::Closed)
        .expect("settle");
    assert_eq!(world.host.balance_of(&alice), 900);
    assert_eq!(world.host.state().factory.tips(), 100);
}
