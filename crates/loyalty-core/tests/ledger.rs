use loyalty_canonical::PrincipalId;
use loyalty_core::{LedgerError, LedgerEvent, LedgerStore, SharedLedger, REDEMPTION_COST};
use std::thread;

fn owner() -> PrincipalId {
    PrincipalId::parse("owner").unwrap()
}

fn user() -> PrincipalId {
    PrincipalId::parse("user1").unwrap()
}

#[test]
fn test_owner_set_at_construction() {
    let ledger = LedgerStore::new(owner());
    assert_eq!(ledger.owner(), &owner());
}

#[test]
fn test_add_reward_assigns_first_id_and_emits_event() {
    let mut ledger = LedgerStore::new(owner());
    let transition = ledger.add_reward(&owner(), "Free Coffee").unwrap();

    assert_eq!(transition.output, 1);
    assert_eq!(
        transition.events,
        vec![LedgerEvent::NewRewardAdded {
            reward_id: 1,
            description: "Free Coffee".into(),
        }]
    );
    assert_eq!(ledger.rewards().collect::<Vec<_>>(), vec![(1, "Free Coffee")]);
}

#[test]
fn test_reward_ids_are_sequential_even_for_empty_and_duplicate_descriptions() {
    let mut ledger = LedgerStore::new(owner());
    let ids: Vec<_> = ["", "Free Coffee", "Free Coffee", ""]
        .iter()
        .map(|d| ledger.add_reward(&owner(), *d).unwrap().output)
        .collect();

    assert_eq!(ids, vec![1, 2, 3, 4]);
    assert_eq!(ledger.get_reward(1), "");
    assert_eq!(ledger.get_reward(3), "Free Coffee");
    assert_eq!(ledger.next_reward_id(), 5);
}

#[test]
fn test_get_reward_soft_miss() {
    let mut ledger = LedgerStore::new(owner());
    ledger.add_reward(&owner(), "Test Reward").unwrap();

    assert_eq!(ledger.get_reward(1), "Test Reward");
    assert_eq!(ledger.get_reward(0), "");
    assert_eq!(ledger.get_reward(2), "");
    assert_eq!(ledger.get_reward(999), "");
}

#[test]
fn test_earn_points_is_additive_and_isolated() {
    let mut ledger = LedgerStore::new(owner());
    let other = PrincipalId::parse("user2").unwrap();

    ledger.earn_points(&owner(), &user(), 10).unwrap();
    let transition = ledger.earn_points(&owner(), &user(), 5).unwrap();
    ledger.earn_points(&owner(), &other, 3).unwrap();

    assert_eq!(transition.output, 15);
    assert_eq!(
        transition.events,
        vec![LedgerEvent::PointsEarned {
            user: user(),
            amount: 5,
            balance: 15,
        }]
    );
    assert_eq!(ledger.get_points(&user()), 15);
    assert_eq!(ledger.get_points(&other), 3);
    assert_eq!(ledger.get_points(&owner()), 0);
}

#[test]
fn test_earn_zero_points_is_accepted() {
    let mut ledger = LedgerStore::new(owner());
    assert_eq!(ledger.earn_points(&owner(), &user(), 0).unwrap().output, 0);
    assert_eq!(ledger.get_points(&user()), 0);
}

#[test]
fn test_redeem_debits_and_emits_current_description() {
    let mut ledger = LedgerStore::new(owner());
    ledger.add_reward(&owner(), "Free Coffee").unwrap();
    ledger.earn_points(&owner(), &user(), 1).unwrap();

    let transition = ledger.redeem_points(&user(), 1).unwrap();

    assert_eq!(transition.output, 0);
    assert_eq!(
        transition.events,
        vec![LedgerEvent::PointsRedeemed {
            user: user(),
            reward_id: 1,
            reward_description: "Free Coffee".into(),
        }]
    );
    assert_eq!(ledger.get_points(&user()), 0);
}

#[test]
fn test_redeem_unknown_reward_is_not_found() {
    let mut ledger = LedgerStore::new(owner());
    ledger.earn_points(&owner(), &user(), 4).unwrap();

    let err = ledger.redeem_points(&user(), 1).unwrap_err();

    assert_eq!(err, LedgerError::NotFound { reward_id: 1 });
    assert_eq!(ledger.get_points(&user()), 4);
}

#[test]
fn test_redeem_without_balance_is_insufficient() {
    let mut ledger = LedgerStore::new(owner());
    ledger.add_reward(&owner(), "Free Coffee").unwrap();

    let err = ledger.redeem_points(&user(), 1).unwrap_err();

    assert_eq!(
        err,
        LedgerError::InsufficientBalance {
            user: user(),
            balance: 0,
            required: REDEMPTION_COST,
        }
    );
    assert_eq!(ledger.get_points(&user()), 0);
}

#[test]
fn test_owner_may_redeem_own_points() {
    let mut ledger = LedgerStore::new(owner());
    ledger.add_reward(&owner(), "Free Coffee").unwrap();
    ledger.earn_points(&owner(), &owner(), 2).unwrap();
    assert_eq!(ledger.redeem_points(&owner(), 1).unwrap().output, 1);
}

#[test]
fn test_set_owner_moves_privileges() {
    let mut ledger = LedgerStore::new(owner());
    let transition = ledger.set_owner(&owner(), user()).unwrap();
    assert_eq!(
        transition.events,
        vec![LedgerEvent::OwnerChanged {
            previous_owner: owner(),
            new_owner: user(),
        }]
    );
    assert_eq!(ledger.owner(), &user());

    assert_eq!(ledger.add_reward(&user(), "x").unwrap().output, 1);
    assert_eq!(
        ledger.add_reward(&owner(), "y").unwrap_err(),
        LedgerError::Unauthorized { caller: owner() }
    );
    assert!(ledger.earn_points(&owner(), &owner(), 1).is_err());
    assert!(ledger.set_owner(&owner(), owner()).is_err());
    assert_eq!(ledger.reward_count(), 1);
}

#[test]
fn test_set_owner_to_self_is_allowed() {
    let mut ledger = LedgerStore::new(owner());
    ledger.set_owner(&owner(), owner()).unwrap();
    assert_eq!(ledger.owner(), &owner());
}

#[test]
fn test_concurrent_add_reward_yields_unique_sequential_ids() {
    let shared = SharedLedger::new(LedgerStore::new(owner()), Vec::new());

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let shared = shared.clone();
            thread::spawn(move || {
                (0..25)
                    .map(|i| {
                        shared
                            .add_reward(&owner(), format!("reward {}-{}", t, i))
                            .unwrap()
                            .output
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut ids: Vec<u64> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, (1..=200).collect::<Vec<_>>());

    // The sink saw every event, in id order.
    let emitted: Vec<u64> = shared.with_sink(|events| {
        events
            .iter()
            .map(|e| match e {
                LedgerEvent::NewRewardAdded { reward_id, .. } => *reward_id,
                other => panic!("unexpected event {:?}", other),
            })
            .collect()
    });
    assert_eq!(emitted, (1..=200).collect::<Vec<_>>());
}

#[test]
fn test_concurrent_redemptions_never_overdraw() {
    let shared = SharedLedger::new(LedgerStore::new(owner()), Vec::new());
    shared.add_reward(&owner(), "Free Coffee").unwrap();
    shared.earn_points(&owner(), &user(), 10).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let shared = shared.clone();
            thread::spawn(move || {
                (0..10)
                    .filter(|_| shared.redeem_points(&user(), 1).is_ok())
                    .count()
            })
        })
        .collect();

    let redeemed: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
    assert_eq!(redeemed, 10);
    assert_eq!(shared.get_points(&user()), 0);
    assert_eq!(shared.get_reward(1), "Free Coffee");
}

#[test]
fn test_rejected_shared_operation_emits_nothing() {
    let shared = SharedLedger::new(LedgerStore::new(owner()), Vec::new());
    assert!(shared.add_reward(&user(), "nope").is_err());
    assert!(shared.redeem_points(&user(), 1).is_err());
    assert_eq!(shared.with_sink(|events| events.len()), 0);
    assert_eq!(shared.snapshot(), LedgerStore::new(owner()));
}
