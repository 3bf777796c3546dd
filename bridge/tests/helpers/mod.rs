//! Shared multi-chain fixture for the integration tests.
//!
//! Three bridge instances live in one `App`:
//! origin (chain 10), hub (chain 1) and destination (chain 42).
//! Origin and hub talk through one connector pair, hub and destination through
//! another. The origin's outbound connector queues messages until they are
//! relayed explicitly; every other connector relays immediately.

#![allow(dead_code)]

use cosmwasm_std::{coins, Addr, Binary, Coin, Empty, Uint128};
use cw_multi_test::{App, AppResponse, Contract, ContractWrapper, Executor};

use bonded_bridge::msg::{
    ComputeHashResponse, ExecuteMsg, InstantiateMsg, LedgerResponse, MerkleProofResponse,
    NonceResponse, PendingTransfersResponse, QueryMsg, SentTransferResponse,
    TransferBondResponse,
};
use bonded_bridge::state::Transfer;
use common::AssetInfo;

pub const DENOM: &str = "uluna";
pub const HUB: u64 = 1;
pub const ORIGIN: u64 = 10;
pub const DEST: u64 = 42;
pub const INITIAL_BALANCE: u128 = 10_000_000_000;

// ============================================================================
// Contracts
// ============================================================================

pub fn contract_bridge() -> Box<dyn Contract<Empty>> {
    let contract = ContractWrapper::new(
        bonded_bridge::contract::execute,
        bonded_bridge::contract::instantiate,
        bonded_bridge::contract::query,
    );
    Box::new(contract)
}

pub fn contract_connector() -> Box<dyn Contract<Empty>> {
    let contract = ContractWrapper::new(
        connector::contract::execute,
        connector::contract::instantiate,
        connector::contract::query,
    );
    Box::new(contract)
}

pub fn contract_cw20() -> Box<dyn Contract<Empty>> {
    let contract = ContractWrapper::new(
        cw20_base::contract::execute,
        cw20_base::contract::instantiate,
        cw20_base::contract::query,
    );
    Box::new(contract)
}

pub fn bridge_instantiate_msg(
    admin: &Addr,
    chain_id: u64,
    asset: AssetInfo,
    bonders: &[&Addr],
) -> InstantiateMsg {
    InstantiateMsg {
        admin: admin.to_string(),
        chain_id,
        hub_chain_id: HUB,
        asset,
        bonders: bonders.iter().map(|b| b.to_string()).collect(),
        challenge_period: None,
        challenge_resolution_period: None,
        min_transfer_root_bond_delay: None,
        rescue_delay: None,
        challenge_amount_divisor: None,
        time_slot_bond_limit: None,
        max_pending_transfers: None,
        minimum_force_commit_delay: None,
    }
}

pub fn instantiate_connector(
    app: &mut App,
    code_id: u64,
    admin: &Addr,
    bridge: &Addr,
    auto_relay: bool,
) -> Addr {
    app.instantiate_contract(
        code_id,
        admin.clone(),
        &connector::msg::InstantiateMsg {
            admin: admin.to_string(),
            bridge: bridge.to_string(),
            auto_relay,
        },
        &[],
        "connector",
        None,
    )
    .unwrap()
}

pub fn pair_connectors(app: &mut App, admin: &Addr, a: &Addr, b: &Addr) {
    for (from, to) in [(a, b), (b, a)] {
        app.execute_contract(
            admin.clone(),
            from.clone(),
            &connector::msg::ExecuteMsg::SetCounterpart {
                counterpart: to.to_string(),
            },
            &[],
        )
        .unwrap();
    }
}

pub fn register_chain(
    app: &mut App,
    admin: &Addr,
    bridge: &Addr,
    chain_id: u64,
    connector: Option<&Addr>,
) {
    app.execute_contract(
        admin.clone(),
        bridge.clone(),
        &ExecuteMsg::RegisterChain {
            chain_id,
            identifier: format!("chain-{}", chain_id),
            connector: connector.map(|c| c.to_string()),
        },
        &[],
    )
    .unwrap();
}

/// First value of `key` across every event of `res`
pub fn attr(res: &AppResponse, key: &str) -> Option<String> {
    res.events
        .iter()
        .flat_map(|event| event.attributes.iter())
        .find(|attribute| attribute.key == key)
        .map(|attribute| attribute.value.clone())
}

// ============================================================================
// Fixture
// ============================================================================

pub struct TestEnv {
    pub app: App,
    pub admin: Addr,
    pub bonder: Addr,
    pub user: Addr,
    pub recipient: Addr,
    pub challenger: Addr,
    pub origin: Addr,
    pub hub: Addr,
    pub dest: Addr,
    /// origin -> hub, relayed manually
    pub origin_outbox: Addr,
    /// hub side of the origin pair
    pub hub_inbox: Addr,
    /// hub -> destination, relays immediately
    pub hub_outbox: Addr,
    /// destination side of the hub pair
    pub dest_inbox: Addr,
}

pub fn setup() -> TestEnv {
    let mut app = App::default();
    let admin = Addr::unchecked("terra1admin");
    let bonder = Addr::unchecked("terra1bonder");
    let user = Addr::unchecked("terra1user");
    let recipient = Addr::unchecked("terra1recipient");
    let challenger = Addr::unchecked("terra1challenger");

    app.init_modules(|router, _, storage| {
        for account in [&admin, &bonder, &user, &challenger] {
            router
                .bank
                .init_balance(storage, account, coins(INITIAL_BALANCE, DENOM))
                .unwrap();
        }
    });

    let bridge_code = app.store_code(contract_bridge());
    let connector_code = app.store_code(contract_connector());

    let mut bridges = vec![];
    for (chain_id, label) in [(ORIGIN, "origin"), (HUB, "hub"), (DEST, "destination")] {
        let addr = app
            .instantiate_contract(
                bridge_code,
                admin.clone(),
                &bridge_instantiate_msg(&admin, chain_id, AssetInfo::native(DENOM), &[&bonder]),
                &[],
                label,
                Some(admin.to_string()),
            )
            .unwrap();
        bridges.push(addr);
    }
    let (origin, hub, dest) = (bridges[0].clone(), bridges[1].clone(), bridges[2].clone());

    let origin_outbox = instantiate_connector(&mut app, connector_code, &admin, &origin, false);
    let hub_inbox = instantiate_connector(&mut app, connector_code, &admin, &hub, true);
    pair_connectors(&mut app, &admin, &origin_outbox, &hub_inbox);

    let hub_outbox = instantiate_connector(&mut app, connector_code, &admin, &hub, true);
    let dest_inbox = instantiate_connector(&mut app, connector_code, &admin, &dest, true);
    pair_connectors(&mut app, &admin, &hub_outbox, &dest_inbox);

    register_chain(&mut app, &admin, &origin, HUB, Some(&origin_outbox));
    register_chain(&mut app, &admin, &origin, DEST, None);
    register_chain(&mut app, &admin, &hub, ORIGIN, Some(&hub_inbox));
    register_chain(&mut app, &admin, &hub, DEST, Some(&hub_outbox));
    register_chain(&mut app, &admin, &dest, HUB, Some(&dest_inbox));

    TestEnv {
        app,
        admin,
        bonder,
        user,
        recipient,
        challenger,
        origin,
        hub,
        dest,
        origin_outbox,
        hub_inbox,
        hub_outbox,
        dest_inbox,
    }
}

impl TestEnv {
    pub fn advance(&mut self, seconds: u64) {
        self.app.update_block(|block| {
            block.time = block.time.plus_seconds(seconds);
            block.height += seconds / 5 + 1;
        });
    }

    pub fn now(&self) -> u64 {
        self.app.block_info().time.seconds()
    }

    pub fn balance(&self, addr: &Addr) -> u128 {
        self.app
            .wrap()
            .query_balance(addr, DENOM)
            .unwrap()
            .amount
            .u128()
    }

    // ------------------------------------------------------------------------
    // Origin
    // ------------------------------------------------------------------------

    /// User sends `amount` from origin to the destination, returning the transfer.
    pub fn send(&mut self, amount: u128, bonder_fee: u128) -> Transfer {
        self.send_to(DEST, amount, bonder_fee)
    }

    pub fn send_to(&mut self, destination_chain_id: u64, amount: u128, bonder_fee: u128) -> Transfer {
        self.app
            .execute_contract(
                self.user.clone(),
                self.origin.clone(),
                &ExecuteMsg::Send {
                    destination_chain_id,
                    recipient: self.recipient.to_string(),
                    amount: Uint128::new(amount),
                    bonder_fee: Uint128::new(bonder_fee),
                    amount_out_min: Uint128::zero(),
                    deadline: 0,
                },
                &coins(amount, DENOM),
            )
            .unwrap();

        let nonce: NonceResponse = self
            .app
            .wrap()
            .query_wasm_smart(&self.origin, &QueryMsg::CurrentNonce {})
            .unwrap();
        let sent: Option<SentTransferResponse> = self
            .app
            .wrap()
            .query_wasm_smart(
                &self.origin,
                &QueryMsg::SentTransfer {
                    nonce: nonce.nonce - 1,
                },
            )
            .unwrap();
        sent.unwrap().transfer
    }

    pub fn pending_ids(&self) -> Vec<Binary> {
        let pending: PendingTransfersResponse = self
            .app
            .wrap()
            .query_wasm_smart(
                &self.origin,
                &QueryMsg::PendingTransfers {
                    destination_chain_id: DEST,
                },
            )
            .unwrap();
        pending.transfer_ids
    }

    /// Bonder seals the origin's pending batch. The confirmation waits in the
    /// origin outbox until `relay_last` is called.
    pub fn commit(&mut self) -> AppResponse {
        self.commit_to(DEST)
    }

    pub fn commit_to(&mut self, destination_chain_id: u64) -> AppResponse {
        self.app
            .execute_contract(
                self.bonder.clone(),
                self.origin.clone(),
                &ExecuteMsg::CommitTransfers {
                    destination_chain_id,
                },
                &[],
            )
            .unwrap()
    }

    pub fn relay(&mut self, sequence: u64) -> Result<AppResponse, String> {
        self.app
            .execute_contract(
                self.user.clone(),
                self.origin_outbox.clone(),
                &connector::msg::ExecuteMsg::Relay { sequence },
                &[],
            )
            .map_err(|e| e.root_cause().to_string())
    }

    /// Deliver the most recent origin -> hub message.
    pub fn relay_last(&mut self) -> Result<AppResponse, String> {
        let next: connector::msg::SequenceResponse = self
            .app
            .wrap()
            .query_wasm_smart(&self.origin_outbox, &connector::msg::QueryMsg::NextSequence {})
            .unwrap();
        self.relay(next.sequence - 1)
    }

    /// Commit and deliver the root all the way to the destination.
    pub fn commit_and_relay(&mut self) {
        self.commit();
        self.relay_last().unwrap();
    }

    // ------------------------------------------------------------------------
    // Ledger
    // ------------------------------------------------------------------------

    pub fn stake(&mut self, bridge: &Addr, amount: u128) {
        self.app
            .execute_contract(
                self.bonder.clone(),
                bridge.clone(),
                &ExecuteMsg::Stake {
                    bonder: self.bonder.to_string(),
                },
                &coins(amount, DENOM),
            )
            .unwrap();
    }

    pub fn ledger(&self, bridge: &Addr, address: &Addr) -> LedgerResponse {
        self.app
            .wrap()
            .query_wasm_smart(
                bridge,
                &QueryMsg::Ledger {
                    address: address.to_string(),
                },
            )
            .unwrap()
    }

    // ------------------------------------------------------------------------
    // Hub
    // ------------------------------------------------------------------------

    pub fn bond_root(&mut self, root_hash: &Binary, total_amount: u128) -> Result<AppResponse, String> {
        self.bond_root_to(DEST, root_hash, total_amount)
    }

    pub fn bond_root_to(
        &mut self,
        destination_chain_id: u64,
        root_hash: &Binary,
        total_amount: u128,
    ) -> Result<AppResponse, String> {
        self.app
            .execute_contract(
                self.bonder.clone(),
                self.hub.clone(),
                &ExecuteMsg::BondTransferRoot {
                    root_hash: root_hash.clone(),
                    destination_chain_id,
                    total_amount: Uint128::new(total_amount),
                },
                &[],
            )
            .map_err(|e| e.root_cause().to_string())
    }

    /// Challenger disputes a bond, attaching `stake`.
    pub fn challenge(
        &mut self,
        root_hash: &Binary,
        total_amount: u128,
        stake: u128,
    ) -> Result<AppResponse, String> {
        self.challenge_to(DEST, root_hash, total_amount, &coins(stake, DENOM))
    }

    pub fn challenge_to(
        &mut self,
        destination_chain_id: u64,
        root_hash: &Binary,
        total_amount: u128,
        funds: &[Coin],
    ) -> Result<AppResponse, String> {
        self.app
            .execute_contract(
                self.challenger.clone(),
                self.hub.clone(),
                &ExecuteMsg::ChallengeTransferBond {
                    root_hash: root_hash.clone(),
                    total_amount: Uint128::new(total_amount),
                    destination_chain_id,
                },
                funds,
            )
            .map_err(|e| e.root_cause().to_string())
    }

    pub fn resolve(&mut self, root_hash: &Binary, total_amount: u128) -> Result<AppResponse, String> {
        self.resolve_to(DEST, root_hash, total_amount)
    }

    pub fn resolve_to(
        &mut self,
        destination_chain_id: u64,
        root_hash: &Binary,
        total_amount: u128,
    ) -> Result<AppResponse, String> {
        self.app
            .execute_contract(
                self.user.clone(),
                self.hub.clone(),
                &ExecuteMsg::ResolveChallenge {
                    root_hash: root_hash.clone(),
                    total_amount: Uint128::new(total_amount),
                    destination_chain_id,
                },
                &[],
            )
            .map_err(|e| e.root_cause().to_string())
    }

    pub fn transfer_bond(&self, root_hash: &Binary, total_amount: u128) -> Option<TransferBondResponse> {
        self.app
            .wrap()
            .query_wasm_smart(
                &self.hub,
                &QueryMsg::TransferBond {
                    root_hash: root_hash.clone(),
                    total_amount: Uint128::new(total_amount),
                },
            )
            .unwrap()
    }

    // ------------------------------------------------------------------------
    // Hashing
    // ------------------------------------------------------------------------

    pub fn transfer_id(&self, transfer: &Transfer) -> Binary {
        let res: ComputeHashResponse = self
            .app
            .wrap()
            .query_wasm_smart(
                &self.origin,
                &QueryMsg::ComputeTransferId {
                    transfer: transfer.clone(),
                },
            )
            .unwrap();
        res.hash
    }

    pub fn merkle_root(&self, transfer_ids: &[Binary]) -> Binary {
        let res: ComputeHashResponse = self
            .app
            .wrap()
            .query_wasm_smart(
                &self.origin,
                &QueryMsg::ComputeMerkleRoot {
                    transfer_ids: transfer_ids.to_vec(),
                },
            )
            .unwrap();
        res.hash
    }

    pub fn merkle_proof(&self, transfer_ids: &[Binary], index: u64) -> MerkleProofResponse {
        self.app
            .wrap()
            .query_wasm_smart(
                &self.origin,
                &QueryMsg::ComputeMerkleProof {
                    transfer_ids: transfer_ids.to_vec(),
                    index,
                },
            )
            .unwrap()
    }

    // ------------------------------------------------------------------------
    // Destination
    // ------------------------------------------------------------------------

    /// Bonder fronts `transfer` on the destination.
    pub fn bond_withdrawal(&mut self, transfer: &Transfer) -> Result<AppResponse, String> {
        let payout = transfer.amount - transfer.bonder_fee;
        let funds = if payout.is_zero() {
            vec![]
        } else {
            coins(payout.u128(), DENOM)
        };
        self.app
            .execute_contract(
                self.bonder.clone(),
                self.dest.clone(),
                &ExecuteMsg::BondWithdrawal {
                    transfer: transfer.clone(),
                },
                &funds,
            )
            .map_err(|e| e.root_cause().to_string())
    }

    /// Withdraw `transfers[index]` by proof over the whole committed batch.
    pub fn withdraw(
        &mut self,
        sender: &Addr,
        transfers: &[Transfer],
        index: usize,
    ) -> Result<AppResponse, String> {
        let ids: Vec<Binary> = transfers.iter().map(|t| self.transfer_id(t)).collect();
        let total: Uint128 = transfers.iter().map(|t| t.amount).sum();
        let proof = self.merkle_proof(&ids, index as u64);
        self.app
            .execute_contract(
                sender.clone(),
                self.dest.clone(),
                &ExecuteMsg::Withdraw {
                    transfer: transfers[index].clone(),
                    root_hash: proof.root,
                    root_total_amount: total,
                    merkle_index: index as u64,
                    proof: proof.proof,
                    total_leaves: proof.total_leaves,
                },
                &[],
            )
            .map_err(|e| e.root_cause().to_string())
    }
}
