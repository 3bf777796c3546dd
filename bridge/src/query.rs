//! Query handlers for the Bonded Bridge contract.
//!
//! This module contains all query message handlers for retrieving contract state.
//! Root and transfer lookups take the same `(root_hash, total_amount)` and
//! TransferId inputs the execute messages use and return `None` when absent.

use cosmwasm_std::{Addr, Binary, Deps, Env, Order, StdError, StdResult, Uint128};
use cw_storage_plus::Bound;

use crate::accounting::{is_bonder_allowed, load_ledger};
use crate::error::ContractError;
use crate::hash::{compute_transfer_id, compute_transfer_root_id, parse_hash};
use crate::merkle;
use crate::msg::{
    AmountResponse, BondedWithdrawalResponse, BondersResponse, ChainResponse, ChainsResponse,
    ComputeHashResponse, ConfigResponse, ConfirmedRootResponse, IsBonderAllowedResponse,
    IsTransferSpentResponse, LastCommitTimeResponse, LedgerResponse, MerkleProofResponse,
    NonceResponse, PendingAdminResponse, PendingTransfersResponse, SentTransferResponse,
    StatsResponse, StatusResponse, TimeSlotResponse, TransferBondResponse, TransferRootResponse,
};
use crate::state::{
    time_slot, BonderLedger, ChainConfig, Transfer, BONDED_WITHDRAWALS, BONDERS, BONDER_COUNT,
    CHAINS, CONFIG, CONFIRMED_ROOTS, LAST_COMMIT_TIME, OUTGOING_NONCE, PENDING_ADMIN,
    PENDING_AMOUNT, PENDING_TRANSFER_IDS, SENT_TRANSFERS, SPENT_TRANSFERS, STATS,
    TIME_SLOT_BONDED, TRANSFER_BONDS, TRANSFER_ROOTS,
};

const DEFAULT_LIMIT: u32 = 10;
const MAX_LIMIT: u32 = 30;

fn std_err(err: ContractError) -> StdError {
    match err {
        ContractError::Std(err) => err,
        other => StdError::generic_err(other.to_string()),
    }
}

fn to_binary_hash(hash: &[u8; 32]) -> Binary {
    Binary::from(hash.to_vec())
}

fn parse_hashes(values: &[Binary]) -> StdResult<Vec<[u8; 32]>> {
    values
        .iter()
        .map(|v| parse_hash(v).map_err(std_err))
        .collect()
}

// ============================================================================
// Core Queries
// ============================================================================

/// Query contract configuration.
pub fn query_config(deps: Deps) -> StdResult<ConfigResponse> {
    let config = CONFIG.load(deps.storage)?;
    Ok(ConfigResponse {
        admin: config.admin,
        paused: config.paused,
        chain_id: config.chain_id,
        hub_chain_id: config.hub_chain_id,
        asset: config.asset,
        challenge_period: config.challenge_period,
        challenge_resolution_period: config.challenge_resolution_period,
        min_transfer_root_bond_delay: config.min_transfer_root_bond_delay,
        rescue_delay: config.rescue_delay,
        challenge_amount_divisor: config.challenge_amount_divisor,
        time_slot_bond_limit: config.time_slot_bond_limit,
        max_pending_transfers: config.max_pending_transfers,
        minimum_force_commit_delay: config.minimum_force_commit_delay,
    })
}

/// Query contract status summary.
pub fn query_status(deps: Deps, env: Env) -> StdResult<StatusResponse> {
    let config = CONFIG.load(deps.storage)?;
    let bonder_count = BONDER_COUNT.may_load(deps.storage)?.unwrap_or(0);
    let registered_chains = CHAINS
        .keys(deps.storage, None, None, Order::Ascending)
        .count() as u32;

    Ok(StatusResponse {
        paused: config.paused,
        bonder_count,
        registered_chains,
        balance: config
            .asset
            .query_balance(&deps.querier, &env.contract.address)?,
    })
}

/// Query bridge statistics.
pub fn query_stats(deps: Deps) -> StdResult<StatsResponse> {
    let stats = STATS.load(deps.storage)?;
    Ok(StatsResponse {
        transfers_sent: stats.transfers_sent,
        roots_committed: stats.roots_committed,
        roots_confirmed: stats.roots_confirmed,
        roots_bonded: stats.roots_bonded,
        challenges: stats.challenges,
        withdrawals: stats.withdrawals,
        bonded_withdrawals: stats.bonded_withdrawals,
        amount_burned: stats.amount_burned,
        amount_rescued: stats.amount_rescued,
    })
}

fn chain_response(chain: ChainConfig) -> ChainResponse {
    ChainResponse {
        chain_id: chain.chain_id,
        identifier: chain.identifier,
        connector: chain.connector,
        deposits_paused: chain.deposits_paused,
    }
}

pub fn query_chain(deps: Deps, chain_id: u64) -> StdResult<ChainResponse> {
    let chain = CHAINS.load(deps.storage, chain_id)?;
    Ok(chain_response(chain))
}

/// Query paginated list of chains.
pub fn query_chains(
    deps: Deps,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<ChainsResponse> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start = start_after.map(Bound::exclusive);

    let chains = CHAINS
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|item| item.map(|(_, chain)| chain_response(chain)))
        .collect::<StdResult<Vec<_>>>()?;

    Ok(ChainsResponse { chains })
}

/// Query pending admin change.
pub fn query_pending_admin(deps: Deps) -> StdResult<Option<PendingAdminResponse>> {
    Ok(PENDING_ADMIN
        .may_load(deps.storage)?
        .map(|pending| PendingAdminResponse {
            new_address: pending.new_address,
            execute_after: pending.execute_after,
        }))
}

// ============================================================================
// Bonder & Ledger Queries
// ============================================================================

pub fn query_bonders(
    deps: Deps,
    start_after: Option<String>,
    limit: Option<u32>,
) -> StdResult<BondersResponse> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start_addr = start_after
        .map(|addr| deps.api.addr_validate(&addr))
        .transpose()?;
    let start = start_addr.as_ref().map(Bound::exclusive);

    let bonders = BONDERS
        .keys(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .collect::<StdResult<Vec<Addr>>>()?;

    Ok(BondersResponse { bonders })
}

pub fn query_is_bonder_allowed(
    deps: Deps,
    address: String,
    required_credit: Uint128,
) -> StdResult<IsBonderAllowedResponse> {
    let addr = deps.api.addr_validate(&address)?;
    let allowed = is_bonder_allowed(deps.storage, &addr, required_credit).map_err(std_err)?;
    Ok(IsBonderAllowedResponse { allowed })
}

fn ledger_of(deps: Deps, address: &str) -> StdResult<(Addr, BonderLedger)> {
    let addr = deps.api.addr_validate(address)?;
    let ledger = load_ledger(deps.storage, &addr).map_err(std_err)?;
    Ok((addr, ledger))
}

pub fn query_credit(deps: Deps, address: String) -> StdResult<AmountResponse> {
    let (_, ledger) = ledger_of(deps, &address)?;
    Ok(AmountResponse {
        amount: ledger.credit,
    })
}

pub fn query_raw_debit(deps: Deps, address: String) -> StdResult<AmountResponse> {
    let (_, ledger) = ledger_of(deps, &address)?;
    Ok(AmountResponse {
        amount: ledger.raw_debit,
    })
}

pub fn query_debit_and_additional_debit(deps: Deps, address: String) -> StdResult<AmountResponse> {
    let (_, ledger) = ledger_of(deps, &address)?;
    Ok(AmountResponse {
        amount: ledger.total_debit().map_err(std_err)?,
    })
}

pub fn query_available_credit(deps: Deps, address: String) -> StdResult<AmountResponse> {
    let (_, ledger) = ledger_of(deps, &address)?;
    Ok(AmountResponse {
        amount: ledger.available_credit().map_err(std_err)?,
    })
}

/// Query every ledger field of an address at once.
pub fn query_ledger(deps: Deps, address: String) -> StdResult<LedgerResponse> {
    let (address, ledger) = ledger_of(deps, &address)?;
    let available_credit = ledger.available_credit().map_err(std_err)?;
    Ok(LedgerResponse {
        address,
        credit: ledger.credit,
        raw_debit: ledger.raw_debit,
        additional_debit: ledger.additional_debit,
        available_credit,
    })
}

// ============================================================================
// Outgoing Transfer Queries
// ============================================================================

pub fn query_pending_transfers(
    deps: Deps,
    destination_chain_id: u64,
) -> StdResult<PendingTransfersResponse> {
    let transfer_ids = PENDING_TRANSFER_IDS
        .may_load(deps.storage, destination_chain_id)?
        .unwrap_or_default();
    let pending_amount = PENDING_AMOUNT
        .may_load(deps.storage, destination_chain_id)?
        .unwrap_or_default();

    Ok(PendingTransfersResponse {
        destination_chain_id,
        transfer_ids: transfer_ids.iter().map(to_binary_hash).collect(),
        pending_amount,
    })
}

pub fn query_last_commit_time(
    deps: Deps,
    destination_chain_id: u64,
) -> StdResult<LastCommitTimeResponse> {
    let last_commit_time = LAST_COMMIT_TIME
        .may_load(deps.storage, destination_chain_id)?
        .unwrap_or(0);
    Ok(LastCommitTimeResponse {
        destination_chain_id,
        last_commit_time,
    })
}

/// Query an outgoing transfer by nonce.
pub fn query_sent_transfer(deps: Deps, nonce: u64) -> StdResult<Option<SentTransferResponse>> {
    Ok(SENT_TRANSFERS
        .may_load(deps.storage, nonce)?
        .map(|sent| SentTransferResponse {
            transfer_id: to_binary_hash(&sent.transfer_id),
            transfer: sent.transfer,
            sent_at: sent.sent_at,
        }))
}

/// Next nonce to be assigned.
pub fn query_current_nonce(deps: Deps) -> StdResult<NonceResponse> {
    let nonce = OUTGOING_NONCE.load(deps.storage)?;
    Ok(NonceResponse { nonce })
}

// ============================================================================
// Root & Bond Queries
// ============================================================================

fn root_id_of(root_hash: &Binary, total_amount: Uint128) -> StdResult<[u8; 32]> {
    let root_hash = parse_hash(root_hash).map_err(std_err)?;
    Ok(compute_transfer_root_id(&root_hash, total_amount))
}

pub fn query_transfer_root(
    deps: Deps,
    root_hash: Binary,
    total_amount: Uint128,
) -> StdResult<Option<TransferRootResponse>> {
    let root_id = root_id_of(&root_hash, total_amount)?;
    Ok(TRANSFER_ROOTS
        .may_load(deps.storage, &root_id)?
        .map(|root| TransferRootResponse {
            transfer_root_id: to_binary_hash(&root_id),
            root_hash: to_binary_hash(&root.root_hash),
            total_amount: root.total_amount,
            amount_withdrawn: root.amount_withdrawn,
            created_at: root.created_at,
        }))
}

pub fn query_confirmed_transfer_root(
    deps: Deps,
    root_hash: Binary,
    total_amount: Uint128,
) -> StdResult<Option<ConfirmedRootResponse>> {
    let root_id = root_id_of(&root_hash, total_amount)?;
    Ok(CONFIRMED_ROOTS
        .may_load(deps.storage, &root_id)?
        .map(|confirmed| ConfirmedRootResponse {
            transfer_root_id: to_binary_hash(&root_id),
            root_hash: to_binary_hash(&confirmed.root_hash),
            total_amount: confirmed.total_amount,
            origin_chain_id: confirmed.origin_chain_id,
            destination_chain_id: confirmed.destination_chain_id,
            committed_at: confirmed.committed_at,
            confirmed_at: confirmed.confirmed_at,
        }))
}

pub fn query_transfer_bond(
    deps: Deps,
    root_hash: Binary,
    total_amount: Uint128,
) -> StdResult<Option<TransferBondResponse>> {
    let root_id = root_id_of(&root_hash, total_amount)?;
    Ok(TRANSFER_BONDS
        .may_load(deps.storage, &root_id)?
        .map(|bond| TransferBondResponse {
            transfer_root_id: to_binary_hash(&root_id),
            bonder: bond.bonder,
            bonded_at: bond.bonded_at,
            total_amount: bond.total_amount,
            bond_amount: bond.bond_amount,
            destination_chain_id: bond.destination_chain_id,
            challenge_start_time: bond.challenge_start_time,
            challenger: bond.challenger,
            challenge_amount: bond.challenge_amount,
            status: bond.status,
        }))
}

pub fn query_time_slot(time: u64) -> StdResult<TimeSlotResponse> {
    Ok(TimeSlotResponse {
        time_slot: time_slot(time),
    })
}

pub fn query_amount_bonded_in_time_slot(deps: Deps, slot: u64) -> StdResult<AmountResponse> {
    let amount = TIME_SLOT_BONDED
        .may_load(deps.storage, slot)?
        .unwrap_or_default();
    Ok(AmountResponse { amount })
}

pub fn query_challenge_amount(deps: Deps, total_amount: Uint128) -> StdResult<AmountResponse> {
    let config = CONFIG.load(deps.storage)?;
    Ok(AmountResponse {
        amount: config.challenge_amount(total_amount),
    })
}

pub fn query_bond_amount(deps: Deps, total_amount: Uint128) -> StdResult<AmountResponse> {
    let config = CONFIG.load(deps.storage)?;
    Ok(AmountResponse {
        amount: config.bond_amount(total_amount)?,
    })
}

// ============================================================================
// Withdrawal Queries
// ============================================================================

pub fn query_is_transfer_spent(
    deps: Deps,
    transfer_id: Binary,
) -> StdResult<IsTransferSpentResponse> {
    let id = parse_hash(&transfer_id).map_err(std_err)?;
    Ok(IsTransferSpentResponse {
        transfer_id,
        spent: SPENT_TRANSFERS.has(deps.storage, &id),
    })
}

pub fn query_bonded_withdrawal(
    deps: Deps,
    transfer_id: Binary,
) -> StdResult<Option<BondedWithdrawalResponse>> {
    let id = parse_hash(&transfer_id).map_err(std_err)?;
    Ok(BONDED_WITHDRAWALS
        .may_load(deps.storage, &id)?
        .map(|bonded| BondedWithdrawalResponse {
            transfer_id,
            bonder: bonded.bonder,
            amount: bonded.amount,
        }))
}

// ============================================================================
// Hash & Merkle Helpers
// ============================================================================

/// TransferId of a transfer, as computed on every chain.
pub fn query_compute_transfer_id(transfer: Transfer) -> StdResult<ComputeHashResponse> {
    Ok(ComputeHashResponse {
        hash: to_binary_hash(&compute_transfer_id(&transfer)),
    })
}

pub fn query_compute_transfer_root_id(
    root_hash: Binary,
    total_amount: Uint128,
) -> StdResult<ComputeHashResponse> {
    let root_id = root_id_of(&root_hash, total_amount)?;
    Ok(ComputeHashResponse {
        hash: to_binary_hash(&root_id),
    })
}

pub fn query_compute_merkle_root(transfer_ids: Vec<Binary>) -> StdResult<ComputeHashResponse> {
    let leaves = parse_hashes(&transfer_ids)?;
    let root = merkle::compute_root(&leaves)
        .ok_or_else(|| StdError::generic_err("transfer_ids must not be empty"))?;
    Ok(ComputeHashResponse {
        hash: to_binary_hash(&root),
    })
}

/// Sibling path proving `transfer_ids[index]` against their root.
pub fn query_compute_merkle_proof(
    transfer_ids: Vec<Binary>,
    index: u64,
) -> StdResult<MerkleProofResponse> {
    let leaves = parse_hashes(&transfer_ids)?;
    let root = merkle::compute_root(&leaves)
        .ok_or_else(|| StdError::generic_err("transfer_ids must not be empty"))?;
    let proof = usize::try_from(index)
        .ok()
        .and_then(|i| merkle::compute_proof(&leaves, i))
        .ok_or_else(|| StdError::generic_err("index out of range"))?;

    Ok(MerkleProofResponse {
        root: to_binary_hash(&root),
        proof: proof.iter().map(to_binary_hash).collect(),
        total_leaves: leaves.len() as u64,
    })
}
