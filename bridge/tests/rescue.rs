//! Governance rescue of bonds whose root was never confirmed.

mod helpers;

use cosmwasm_std::{Binary, Uint128};
use cw_multi_test::{AppResponse, Executor};

use bonded_bridge::msg::{ExecuteMsg, QueryMsg, StatsResponse};
use bonded_bridge::state::BondStatus;
use helpers::{attr, setup, TestEnv, ORIGIN};

const RESCUE_DELAY: u64 = 4_838_400;

fn rescue(
    env: &mut TestEnv,
    root_hash: &Binary,
    total_amount: u128,
    origin_chain_id: u64,
    recipient: Option<String>,
) -> Result<AppResponse, String> {
    env.app
        .execute_contract(
            env.admin.clone(),
            env.hub.clone(),
            &ExecuteMsg::RescueTransferRoot {
                root_hash: root_hash.clone(),
                total_amount: Uint128::new(total_amount),
                origin_chain_id,
                recipient,
            },
            &[],
        )
        .map_err(|e| e.root_cause().to_string())
}

fn fake_root() -> Binary {
    Binary::from([0xabu8; 32].to_vec())
}

#[test]
fn test_rescue_after_delay() {
    let mut env = setup();
    let hub = env.hub.clone();
    let bonder = env.bonder.clone();
    let treasury = env.recipient.clone();
    env.stake(&hub, 5_000);

    let root = fake_root();
    env.bond_root(&root, 1_000).unwrap();

    env.advance(RESCUE_DELAY - 1);
    let err = rescue(&mut env, &root, 1_000, ORIGIN, None).unwrap_err();
    assert!(err.contains("Rescue delay not elapsed: 1 seconds remaining"), "{}", err);

    env.advance(1);
    let res = rescue(&mut env, &root, 1_000, ORIGIN, Some(treasury.to_string())).unwrap();
    assert_eq!(attr(&res, "amount").as_deref(), Some("1100"));
    assert_eq!(env.balance(&treasury), 1_100);

    let bond = env.transfer_bond(&root, 1_000).unwrap();
    assert_eq!(bond.status, BondStatus::Rescued);

    let ledger = env.ledger(&hub, &bonder);
    assert_eq!(ledger.raw_debit, Uint128::new(1_100));
    assert_eq!(ledger.additional_debit, Uint128::zero());
    assert_eq!(ledger.available_credit, Uint128::new(3_900));

    let stats: StatsResponse = env
        .app
        .wrap()
        .query_wasm_smart(&hub, &QueryMsg::Stats {})
        .unwrap();
    assert_eq!(stats.amount_rescued, Uint128::new(1_100));

    let err = rescue(&mut env, &root, 1_000, ORIGIN, None).unwrap_err();
    assert!(err.contains("bond is rescued"), "{}", err);
}

#[test]
fn test_rescue_without_recipient_keeps_funds() {
    let mut env = setup();
    let hub = env.hub.clone();
    env.stake(&hub, 5_000);

    let root = fake_root();
    env.bond_root(&root, 1_000).unwrap();
    env.advance(RESCUE_DELAY);

    rescue(&mut env, &root, 1_000, ORIGIN, None).unwrap();
    assert_eq!(env.balance(&hub), 5_000);
}

#[test]
fn test_rescue_requires_admin_and_known_origin() {
    let mut env = setup();
    let hub = env.hub.clone();
    env.stake(&hub, 5_000);
    let root = fake_root();
    env.bond_root(&root, 1_000).unwrap();
    env.advance(RESCUE_DELAY);

    let res = env.app.execute_contract(
        env.bonder.clone(),
        hub.clone(),
        &ExecuteMsg::RescueTransferRoot {
            root_hash: root.clone(),
            total_amount: Uint128::new(1_000),
            origin_chain_id: ORIGIN,
            recipient: None,
        },
        &[],
    );
    assert!(res.unwrap_err().root_cause().to_string().contains("Unauthorized"));

    let err = rescue(&mut env, &root, 1_000, 99, None).unwrap_err();
    assert!(err.contains("Chain not supported: 99"), "{}", err);

    let err = rescue(&mut env, &root, 2_000, ORIGIN, None).unwrap_err();
    assert!(err.contains("TransferRoot has not been bonded"), "{}", err);
}

#[test]
fn test_cannot_rescue_confirmed_root() {
    let mut env = setup();
    let hub = env.hub.clone();
    env.stake(&hub, 5_000);

    env.send(1_000, 0);
    let root = env.merkle_root(&env.pending_ids());
    env.commit();
    env.bond_root(&root, 1_000).unwrap();
    env.relay_last().unwrap();

    env.advance(RESCUE_DELAY);
    let err = rescue(&mut env, &root, 1_000, ORIGIN, None).unwrap_err();
    assert!(err.contains("TransferRoot has been confirmed"), "{}", err);
}

#[test]
fn test_cannot_rescue_challenged_bond() {
    let mut env = setup();
    let hub = env.hub.clone();
    env.stake(&hub, 5_000);

    let root = fake_root();
    env.bond_root(&root, 1_000).unwrap();
    env.challenge(&root, 1_000, 100).unwrap();

    env.advance(RESCUE_DELAY);
    let err = rescue(&mut env, &root, 1_000, ORIGIN, None).unwrap_err();
    assert!(err.contains("bond is challenged"), "{}", err);

    // Resolution is still available
    env.resolve(&root, 1_000).unwrap();
}
