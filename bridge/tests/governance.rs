//! Instantiation, chain registry, parameters and admin operations.

mod helpers;

use cosmwasm_std::{coins, Addr, Uint128};
use cw_multi_test::{App, Executor};

use bonded_bridge::msg::{
    BondersResponse, ChainResponse, ChainsResponse, ConfigResponse, ExecuteMsg, QueryMsg,
    StatusResponse,
};
use common::AssetInfo;
use helpers::{bridge_instantiate_msg, contract_bridge, setup, DENOM, DEST, HUB, ORIGIN};

// ============================================================================
// Instantiate
// ============================================================================

#[test]
fn test_instantiate_defaults() {
    let env = setup();

    let config: ConfigResponse = env
        .app
        .wrap()
        .query_wasm_smart(&env.hub, &QueryMsg::Config {})
        .unwrap();
    assert_eq!(config.admin, env.admin);
    assert!(!config.paused);
    assert_eq!(config.chain_id, HUB);
    assert_eq!(config.hub_chain_id, HUB);
    assert_eq!(config.asset, AssetInfo::native(DENOM));
    assert_eq!(config.challenge_period, 86_400);
    assert_eq!(config.challenge_resolution_period, 864_000);
    assert_eq!(config.min_transfer_root_bond_delay, 900);
    assert_eq!(config.rescue_delay, 4_838_400);
    assert_eq!(config.challenge_amount_divisor, 10);
    assert_eq!(config.time_slot_bond_limit, Uint128::zero());
    assert_eq!(config.max_pending_transfers, 128);
    assert_eq!(config.minimum_force_commit_delay, 14_400);

    let status: StatusResponse = env
        .app
        .wrap()
        .query_wasm_smart(&env.hub, &QueryMsg::Status {})
        .unwrap();
    assert_eq!(status.bonder_count, 1);
    assert_eq!(status.registered_chains, 2);
    assert_eq!(status.balance, Uint128::zero());
}

#[test]
fn test_instantiate_rejects_invalid_parameters() {
    let mut app = App::default();
    let admin = Addr::unchecked("terra1admin");
    let code_id = app.store_code(contract_bridge());

    let msg = bridge_instantiate_msg(&admin, 0, AssetInfo::native(DENOM), &[]);
    let res = app.instantiate_contract(code_id, admin.clone(), &msg, &[], "bridge", None);
    assert!(res
        .unwrap_err()
        .root_cause()
        .to_string()
        .contains("Invalid chain ID: 0"));

    let mut msg = bridge_instantiate_msg(&admin, ORIGIN, AssetInfo::native(DENOM), &[]);
    msg.challenge_period = Some(1_000);
    let res = app.instantiate_contract(code_id, admin.clone(), &msg, &[], "bridge", None);
    assert!(res
        .unwrap_err()
        .root_cause()
        .to_string()
        .contains("challenge_period must be a non-zero multiple of 14400"));

    let mut msg = bridge_instantiate_msg(&admin, ORIGIN, AssetInfo::native(DENOM), &[]);
    msg.rescue_delay = Some(86_400);
    let res = app.instantiate_contract(code_id, admin.clone(), &msg, &[], "bridge", None);
    assert!(res
        .unwrap_err()
        .root_cause()
        .to_string()
        .contains("rescue_delay must be at least 950400"));

    let bonder = Addr::unchecked("terra1bonder");
    let msg = bridge_instantiate_msg(&admin, ORIGIN, AssetInfo::native(DENOM), &[&bonder, &bonder]);
    let res = app.instantiate_contract(code_id, admin, &msg, &[], "bridge", None);
    assert!(res
        .unwrap_err()
        .root_cause()
        .to_string()
        .contains("Address is already bonder"));
}

// ============================================================================
// Chain registry
// ============================================================================

#[test]
fn test_register_chain_rules() {
    let mut env = setup();
    let origin = env.origin.clone();

    let register = |chain_id: u64| ExecuteMsg::RegisterChain {
        chain_id,
        identifier: "somewhere".to_string(),
        connector: None,
    };

    let res = env
        .app
        .execute_contract(env.user.clone(), origin.clone(), &register(5), &[]);
    assert!(res.unwrap_err().root_cause().to_string().contains("Unauthorized"));

    let res = env
        .app
        .execute_contract(env.admin.clone(), origin.clone(), &register(ORIGIN), &[]);
    assert!(res
        .unwrap_err()
        .root_cause()
        .to_string()
        .contains("Invalid chain ID: 10"));

    let res = env
        .app
        .execute_contract(env.admin.clone(), origin.clone(), &register(HUB), &[]);
    assert!(res
        .unwrap_err()
        .root_cause()
        .to_string()
        .contains("Chain already registered: 1"));

    env.app
        .execute_contract(env.admin.clone(), origin.clone(), &register(5), &[])
        .unwrap();

    let chains: ChainsResponse = env
        .app
        .wrap()
        .query_wasm_smart(
            &origin,
            &QueryMsg::Chains {
                start_after: None,
                limit: None,
            },
        )
        .unwrap();
    let ids: Vec<u64> = chains.chains.iter().map(|c| c.chain_id).collect();
    assert_eq!(ids, vec![HUB, 5, DEST]);

    let chains: ChainsResponse = env
        .app
        .wrap()
        .query_wasm_smart(
            &origin,
            &QueryMsg::Chains {
                start_after: Some(HUB),
                limit: Some(1),
            },
        )
        .unwrap();
    assert_eq!(chains.chains.len(), 1);
    assert_eq!(chains.chains[0].chain_id, 5);

    let chain: ChainResponse = env
        .app
        .wrap()
        .query_wasm_smart(&origin, &QueryMsg::Chain { chain_id: HUB })
        .unwrap();
    assert_eq!(chain.connector, Some(env.origin_outbox.clone()));
    assert!(!chain.deposits_paused);
}

#[test]
fn test_unregister_chain_stops_sends() {
    let mut env = setup();

    env.app
        .execute_contract(
            env.admin.clone(),
            env.origin.clone(),
            &ExecuteMsg::UnregisterChain { chain_id: DEST },
            &[],
        )
        .unwrap();

    let res = env.app.execute_contract(
        env.user.clone(),
        env.origin.clone(),
        &ExecuteMsg::Send {
            destination_chain_id: DEST,
            recipient: env.recipient.to_string(),
            amount: Uint128::new(100),
            bonder_fee: Uint128::zero(),
            amount_out_min: Uint128::zero(),
            deadline: 0,
        },
        &coins(100, DENOM),
    );
    assert!(res
        .unwrap_err()
        .root_cause()
        .to_string()
        .contains("Chain not supported: 42"));

    let res = env.app.execute_contract(
        env.admin.clone(),
        env.origin.clone(),
        &ExecuteMsg::UnregisterChain { chain_id: DEST },
        &[],
    );
    assert!(res
        .unwrap_err()
        .root_cause()
        .to_string()
        .contains("Chain not supported: 42"));
}

// ============================================================================
// Bonders and parameters
// ============================================================================

#[test]
fn test_add_and_remove_bonders() {
    let mut env = setup();
    let second = Addr::unchecked("terra1second");

    let res = env.app.execute_contract(
        env.admin.clone(),
        env.hub.clone(),
        &ExecuteMsg::AddBonder {
            bonder: env.bonder.to_string(),
        },
        &[],
    );
    assert!(res
        .unwrap_err()
        .root_cause()
        .to_string()
        .contains("Address is already bonder"));

    env.app
        .execute_contract(
            env.admin.clone(),
            env.hub.clone(),
            &ExecuteMsg::AddBonder {
                bonder: second.to_string(),
            },
            &[],
        )
        .unwrap();
    let bonders: BondersResponse = env
        .app
        .wrap()
        .query_wasm_smart(
            &env.hub,
            &QueryMsg::Bonders {
                start_after: None,
                limit: None,
            },
        )
        .unwrap();
    assert_eq!(bonders.bonders.len(), 2);

    env.app
        .execute_contract(
            env.admin.clone(),
            env.hub.clone(),
            &ExecuteMsg::RemoveBonder {
                bonder: second.to_string(),
            },
            &[],
        )
        .unwrap();
    let res = env.app.execute_contract(
        env.admin.clone(),
        env.hub.clone(),
        &ExecuteMsg::RemoveBonder {
            bonder: second.to_string(),
        },
        &[],
    );
    assert!(res
        .unwrap_err()
        .root_cause()
        .to_string()
        .contains("Address is not bonder"));

    let status: StatusResponse = env
        .app
        .wrap()
        .query_wasm_smart(&env.hub, &QueryMsg::Status {})
        .unwrap();
    assert_eq!(status.bonder_count, 1);
}

#[test]
fn test_parameter_updates_are_validated() {
    let mut env = setup();
    let admin = env.admin.clone();
    let hub = env.hub.clone();

    let res = env.app.execute_contract(
        admin.clone(),
        hub.clone(),
        &ExecuteMsg::SetChallengePeriod {
            challenge_period: 1_000,
        },
        &[],
    );
    assert!(res.unwrap_err().root_cause().to_string().contains("Invalid config"));

    let res = env.app.execute_contract(
        admin.clone(),
        hub.clone(),
        &ExecuteMsg::SetChallengeAmountDivisor {
            challenge_amount_divisor: 0,
        },
        &[],
    );
    assert!(res
        .unwrap_err()
        .root_cause()
        .to_string()
        .contains("challenge_amount_divisor must be greater than zero"));

    let res = env.app.execute_contract(
        env.user.clone(),
        hub.clone(),
        &ExecuteMsg::SetChallengePeriod {
            challenge_period: 28_800,
        },
        &[],
    );
    assert!(res.unwrap_err().root_cause().to_string().contains("Unauthorized"));

    for msg in [
        ExecuteMsg::SetChallengePeriod {
            challenge_period: 28_800,
        },
        ExecuteMsg::SetChallengeResolutionPeriod {
            challenge_resolution_period: 432_000,
        },
        ExecuteMsg::SetMinTransferRootBondDelay {
            min_transfer_root_bond_delay: 600,
        },
        ExecuteMsg::SetChallengeAmountDivisor {
            challenge_amount_divisor: 20,
        },
        ExecuteMsg::SetTimeSlotBondLimit {
            time_slot_bond_limit: Uint128::new(1_000_000),
        },
        ExecuteMsg::SetRescueDelay {
            rescue_delay: 1_000_000,
        },
        ExecuteMsg::SetMaxPendingTransfers {
            max_pending_transfers: 64,
        },
        ExecuteMsg::SetMinimumForceCommitDelay {
            minimum_force_commit_delay: 3_600,
        },
    ] {
        let res = env.app.execute_contract(admin.clone(), hub.clone(), &msg, &[]);
        assert!(res.is_ok(), "{:?} failed: {:?}", msg, res.err());
    }

    let config: ConfigResponse = env
        .app
        .wrap()
        .query_wasm_smart(&hub, &QueryMsg::Config {})
        .unwrap();
    assert_eq!(config.challenge_period, 28_800);
    assert_eq!(config.challenge_resolution_period, 432_000);
    assert_eq!(config.min_transfer_root_bond_delay, 600);
    assert_eq!(config.challenge_amount_divisor, 20);
    assert_eq!(config.time_slot_bond_limit, Uint128::new(1_000_000));
    assert_eq!(config.rescue_delay, 1_000_000);
    assert_eq!(config.max_pending_transfers, 64);
    assert_eq!(config.minimum_force_commit_delay, 3_600);

    // 28_800 + 432_000 > 400_000
    let res = env.app.execute_contract(
        admin,
        hub,
        &ExecuteMsg::SetRescueDelay {
            rescue_delay: 400_000,
        },
        &[],
    );
    assert!(res
        .unwrap_err()
        .root_cause()
        .to_string()
        .contains("rescue_delay must be at least 460800"));
}

// ============================================================================
// Admin
// ============================================================================

#[test]
fn test_pause_blocks_sends() {
    let mut env = setup();

    let res = env
        .app
        .execute_contract(env.user.clone(), env.origin.clone(), &ExecuteMsg::Pause {}, &[]);
    assert!(res.unwrap_err().root_cause().to_string().contains("Unauthorized"));

    env.app
        .execute_contract(env.admin.clone(), env.origin.clone(), &ExecuteMsg::Pause {}, &[])
        .unwrap();

    let res = env.app.execute_contract(
        env.user.clone(),
        env.origin.clone(),
        &ExecuteMsg::Send {
            destination_chain_id: DEST,
            recipient: env.recipient.to_string(),
            amount: Uint128::new(100),
            bonder_fee: Uint128::zero(),
            amount_out_min: Uint128::zero(),
            deadline: 0,
        },
        &coins(100, DENOM),
    );
    assert!(res.unwrap_err().root_cause().to_string().contains("Bridge is paused"));

    env.app
        .execute_contract(env.admin.clone(), env.origin.clone(), &ExecuteMsg::Unpause {}, &[])
        .unwrap();
    env.send(100, 0);
}

#[test]
fn test_admin_transfer_timelock() {
    let mut env = setup();
    let new_admin = Addr::unchecked("terra1newadmin");

    let res = env.app.execute_contract(
        env.admin.clone(),
        env.hub.clone(),
        &ExecuteMsg::CancelAdminProposal {},
        &[],
    );
    assert!(res
        .unwrap_err()
        .root_cause()
        .to_string()
        .contains("No pending admin change"));

    env.app
        .execute_contract(
            env.admin.clone(),
            env.hub.clone(),
            &ExecuteMsg::ProposeAdmin {
                new_admin: new_admin.to_string(),
            },
            &[],
        )
        .unwrap();

    let res = env.app.execute_contract(
        new_admin.clone(),
        env.hub.clone(),
        &ExecuteMsg::AcceptAdmin {},
        &[],
    );
    assert!(res
        .unwrap_err()
        .root_cause()
        .to_string()
        .contains("Timelock not expired"));

    env.advance(604_800);

    let res = env.app.execute_contract(
        env.user.clone(),
        env.hub.clone(),
        &ExecuteMsg::AcceptAdmin {},
        &[],
    );
    assert!(res
        .unwrap_err()
        .root_cause()
        .to_string()
        .contains("only pending admin can accept"));

    env.app
        .execute_contract(new_admin.clone(), env.hub.clone(), &ExecuteMsg::AcceptAdmin {}, &[])
        .unwrap();

    let config: ConfigResponse = env
        .app
        .wrap()
        .query_wasm_smart(&env.hub, &QueryMsg::Config {})
        .unwrap();
    assert_eq!(config.admin, new_admin);
}

#[test]
fn test_recover_asset_requires_pause() {
    let mut env = setup();
    let hub = env.hub.clone();
    let admin = env.admin.clone();
    let rescue_to = Addr::unchecked("terra1treasury");
    env.stake(&hub, 1_000);

    let recover = ExecuteMsg::RecoverAsset {
        asset: AssetInfo::native(DENOM),
        amount: Uint128::new(400),
        recipient: rescue_to.to_string(),
    };

    let res = env.app.execute_contract(admin.clone(), hub.clone(), &recover, &[]);
    assert!(res
        .unwrap_err()
        .root_cause()
        .to_string()
        .contains("only available when bridge is paused"));

    env.app
        .execute_contract(admin.clone(), hub.clone(), &ExecuteMsg::Pause {}, &[])
        .unwrap();
    env.app
        .execute_contract(admin, hub.clone(), &recover, &[])
        .unwrap();

    assert_eq!(env.balance(&rescue_to), 400);

    let status: StatusResponse = env
        .app
        .wrap()
        .query_wasm_smart(&hub, &QueryMsg::Status {})
        .unwrap();
    assert!(status.paused);
    assert_eq!(status.balance, Uint128::new(600));
}
