//! Withdrawal handlers (destination side).
//!
//! A transfer is paid on this chain exactly once, by one of two paths:
//! 1. `BondWithdrawal` - a bonder fronts the recipient before any root exists
//!    and is made whole later by `SettleBondedWithdrawal(s)`
//! 2. `Withdraw` - anyone proves the transfer against a root already set here
//!
//! Roots arrive through `SetTransferRoot` from the hub's connector.

use cosmwasm_std::{
    Addr, Binary, CosmosMsg, DepsMut, Env, MessageInfo, Response, Storage, Uint128,
};

use super::{native_payment, require_not_paused, require_payment};
use crate::accounting::{add_additional_debit, is_bonder, settle};
use crate::error::ContractError;
use crate::hash::{bytes32_to_hex, compute_transfer_id, compute_transfer_root_id, parse_hash};
use crate::merkle;
use crate::messenger::assert_from_connector;
use crate::state::{
    BondedWithdrawal, Config, Transfer, TransferRoot, BONDED_WITHDRAWALS, CONFIG, SPENT_TRANSFERS,
    STATS, TRANSFER_ROOTS,
};

// ============================================================================
// SetTransferRoot
// ============================================================================

/// Root distributed by the hub.
pub fn execute_set_transfer_root(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    root_hash: Binary,
    total_amount: Uint128,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    assert_from_connector(deps.storage, &info.sender, config.hub_chain_id)?;

    let root_hash = parse_hash(&root_hash)?;
    let step = store_transfer_root(deps.storage, &env, &root_hash, total_amount)?;

    Ok(super::merge(
        Response::new().add_attribute("method", "set_transfer_root"),
        step,
    ))
}

/// Record a root as available for withdrawals. A root is only ever set once.
pub(crate) fn store_transfer_root(
    storage: &mut dyn Storage,
    env: &Env,
    root_hash: &[u8; 32],
    total_amount: Uint128,
) -> Result<Response, ContractError> {
    if total_amount.is_zero() {
        return Err(ContractError::InvalidAmount {
            reason: "Cannot set TransferRoot totalAmount of 0".to_string(),
        });
    }

    let root_id = compute_transfer_root_id(root_hash, total_amount);
    if TRANSFER_ROOTS.has(storage, &root_id) {
        return Err(ContractError::RootAlreadySet);
    }

    TRANSFER_ROOTS.save(
        storage,
        &root_id,
        &TransferRoot {
            root_hash: *root_hash,
            total_amount,
            amount_withdrawn: Uint128::zero(),
            created_at: env.block.time.seconds(),
        },
    )?;

    Ok(Response::new()
        .add_attribute("transfer_root_set", bytes32_to_hex(&root_id))
        .add_attribute("root_total_amount", total_amount.to_string()))
}

// ============================================================================
// BondWithdrawal
// ============================================================================

/// Bonder pays the recipient `amount - bonder_fee` out of pocket.
///
/// `paid` is what the bonder attached (native funds or CW20 hook) and is
/// forwarded to the recipient.
pub fn execute_bond_withdrawal(
    deps: DepsMut,
    config: &Config,
    bonder: Addr,
    paid: Uint128,
    transfer: Transfer,
) -> Result<Response, ContractError> {
    require_not_paused(config)?;

    if !is_bonder(deps.storage, &bonder)? {
        return Err(ContractError::NotBonder);
    }
    if transfer.destination_chain_id != config.chain_id {
        return Err(ContractError::WrongDestination {
            chain_id: transfer.destination_chain_id,
        });
    }
    if transfer.bonder_fee > transfer.amount {
        return Err(ContractError::BonderFeeTooHigh);
    }

    let transfer_id = compute_transfer_id(&transfer);
    if BONDED_WITHDRAWALS.has(deps.storage, &transfer_id) {
        return Err(ContractError::WithdrawalAlreadyBonded);
    }
    if SPENT_TRANSFERS.has(deps.storage, &transfer_id) {
        return Err(ContractError::TransferSpent);
    }

    let payout = transfer.amount - transfer.bonder_fee;
    require_payment(&config.asset, paid, payout)?;
    let recipient = deps.api.addr_validate(&transfer.recipient)?;

    add_additional_debit(deps.storage, &bonder, transfer.amount)?;
    BONDED_WITHDRAWALS.save(
        deps.storage,
        &transfer_id,
        &BondedWithdrawal {
            bonder: bonder.clone(),
            amount: transfer.amount,
        },
    )?;
    SPENT_TRANSFERS.save(deps.storage, &transfer_id, &true)?;

    let mut stats = STATS.load(deps.storage)?;
    stats.bonded_withdrawals += 1;
    STATS.save(deps.storage, &stats)?;

    let mut messages: Vec<CosmosMsg> = vec![];
    if !payout.is_zero() {
        messages.push(config.asset.transfer_msg(&recipient, payout)?);
    }

    Ok(Response::new()
        .add_messages(messages)
        .add_attribute("method", "bond_withdrawal")
        .add_attribute("transfer_id", bytes32_to_hex(&transfer_id))
        .add_attribute("bonder", bonder)
        .add_attribute("recipient", recipient)
        .add_attribute("amount", transfer.amount.to_string())
        .add_attribute("bonder_fee", transfer.bonder_fee.to_string()))
}

/// Native-funds entry point for `BondWithdrawal`.
pub fn execute_bond_withdrawal_native(
    deps: DepsMut,
    info: MessageInfo,
    transfer: Transfer,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let paid = native_payment(&config.asset, &info)?;
    execute_bond_withdrawal(deps, &config, info.sender, paid, transfer)
}

// ============================================================================
// Withdraw
// ============================================================================

/// Trustless withdrawal by Merkle proof.
///
/// The bonder fee rewards whichever registered bonder relays the proof, even
/// one that fronted nothing. Any other caller leaves the full amount to the
/// recipient.
#[allow(clippy::too_many_arguments)]
pub fn execute_withdraw(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    transfer: Transfer,
    root_hash: Binary,
    root_total_amount: Uint128,
    merkle_index: u64,
    proof: Vec<Binary>,
    total_leaves: u64,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    require_not_paused(&config)?;

    if transfer.destination_chain_id != config.chain_id {
        return Err(ContractError::WrongDestination {
            chain_id: transfer.destination_chain_id,
        });
    }
    if transfer.bonder_fee > transfer.amount {
        return Err(ContractError::BonderFeeTooHigh);
    }

    let transfer_id = compute_transfer_id(&transfer);
    let root_hash = parse_hash(&root_hash)?;
    let root_id = compute_transfer_root_id(&root_hash, root_total_amount);
    verify_inclusion(&root_hash, &transfer_id, merkle_index, &proof, total_leaves)?;

    if SPENT_TRANSFERS.has(deps.storage, &transfer_id) {
        return Err(ContractError::TransferSpent);
    }
    add_to_amount_withdrawn(deps.storage, &root_id, transfer.amount)?;
    SPENT_TRANSFERS.save(deps.storage, &transfer_id, &true)?;

    let recipient = deps.api.addr_validate(&transfer.recipient)?;
    let fee = if is_bonder(deps.storage, &info.sender)? {
        transfer.bonder_fee
    } else {
        Uint128::zero()
    };
    let payout = transfer.amount - fee;

    let mut messages: Vec<CosmosMsg> = vec![];
    if !payout.is_zero() {
        messages.push(config.asset.transfer_msg(&recipient, payout)?);
    }
    if !fee.is_zero() {
        messages.push(config.asset.transfer_msg(&info.sender, fee)?);
    }

    let mut stats = STATS.load(deps.storage)?;
    stats.withdrawals += 1;
    STATS.save(deps.storage, &stats)?;

    Ok(Response::new()
        .add_messages(messages)
        .add_attribute("method", "withdraw")
        .add_attribute("transfer_id", bytes32_to_hex(&transfer_id))
        .add_attribute("transfer_root_id", bytes32_to_hex(&root_id))
        .add_attribute("recipient", recipient)
        .add_attribute("amount", payout.to_string())
        .add_attribute("bonder_fee", fee.to_string()))
}

// ============================================================================
// Settlement
// ============================================================================

/// Settle one bonded withdrawal by Merkle proof.
#[allow(clippy::too_many_arguments)]
pub fn execute_settle_bonded_withdrawal(
    deps: DepsMut,
    bonder: String,
    transfer_id: Binary,
    root_hash: Binary,
    root_total_amount: Uint128,
    merkle_index: u64,
    proof: Vec<Binary>,
    total_leaves: u64,
) -> Result<Response, ContractError> {
    let bonder = deps.api.addr_validate(&bonder)?;
    let transfer_id = parse_hash(&transfer_id)?;
    let root_hash = parse_hash(&root_hash)?;
    let root_id = compute_transfer_root_id(&root_hash, root_total_amount);
    verify_inclusion(&root_hash, &transfer_id, merkle_index, &proof, total_leaves)?;

    let bonded = BONDED_WITHDRAWALS
        .may_load(deps.storage, &transfer_id)?
        .filter(|b| b.bonder == bonder)
        .ok_or(ContractError::NoBond)?;

    add_to_amount_withdrawn(deps.storage, &root_id, bonded.amount)?;
    BONDED_WITHDRAWALS.remove(deps.storage, &transfer_id);
    settle(deps.storage, &bonder, bonded.amount)?;

    Ok(Response::new()
        .add_attribute("method", "settle_bonded_withdrawal")
        .add_attribute("bonder", bonder)
        .add_attribute("transfer_id", bytes32_to_hex(&transfer_id))
        .add_attribute("transfer_root_id", bytes32_to_hex(&root_id))
        .add_attribute("amount", bonded.amount.to_string()))
}

/// Settle a whole root from its complete, ordered leaf list.
///
/// The full `total_amount` is counted as withdrawn and every listed id is
/// marked spent, so this can succeed at most once per root. Only withdrawals
/// bonded by `bonder` are credited; naming a bonder that fronted none of them
/// changes no ledger.
pub fn execute_settle_bonded_withdrawals(
    deps: DepsMut,
    bonder: String,
    transfer_ids: Vec<Binary>,
    total_amount: Uint128,
) -> Result<Response, ContractError> {
    let bonder = deps.api.addr_validate(&bonder)?;
    let transfer_ids = transfer_ids
        .iter()
        .map(parse_hash)
        .collect::<Result<Vec<_>, _>>()?;

    let root_hash = merkle::compute_root(&transfer_ids).ok_or(ContractError::InvalidAmount {
        reason: "No transfer ids to settle".to_string(),
    })?;
    let root_id = compute_transfer_root_id(&root_hash, total_amount);
    add_to_amount_withdrawn(deps.storage, &root_id, total_amount)?;

    let mut settled = Uint128::zero();
    let mut settled_count = 0u32;
    for transfer_id in &transfer_ids {
        if let Some(bonded) = BONDED_WITHDRAWALS.may_load(deps.storage, transfer_id)? {
            if bonded.bonder == bonder {
                settled = settled.checked_add(bonded.amount)?;
                settled_count += 1;
                BONDED_WITHDRAWALS.remove(deps.storage, transfer_id);
            }
        }
        SPENT_TRANSFERS.save(deps.storage, transfer_id, &true)?;
    }

    if !settled.is_zero() {
        settle(deps.storage, &bonder, settled)?;
    }

    Ok(Response::new()
        .add_attribute("method", "settle_bonded_withdrawals")
        .add_attribute("bonder", bonder)
        .add_attribute("transfer_root_id", bytes32_to_hex(&root_id))
        .add_attribute("root_hash", bytes32_to_hex(&root_hash))
        .add_attribute("settled_count", settled_count.to_string())
        .add_attribute("settled_amount", settled.to_string()))
}

// ============================================================================
// Helpers
// ============================================================================

fn verify_inclusion(
    root_hash: &[u8; 32],
    transfer_id: &[u8; 32],
    merkle_index: u64,
    proof: &[Binary],
    total_leaves: u64,
) -> Result<(), ContractError> {
    let siblings = proof
        .iter()
        .map(parse_hash)
        .collect::<Result<Vec<_>, _>>()?;
    if !merkle::verify(root_hash, transfer_id, merkle_index, &siblings, total_leaves) {
        return Err(ContractError::InvalidTransferProof);
    }
    Ok(())
}

/// Count `amount` against a set root, never exceeding its total.
fn add_to_amount_withdrawn(
    storage: &mut dyn Storage,
    root_id: &[u8; 32],
    amount: Uint128,
) -> Result<(), ContractError> {
    let mut root = TRANSFER_ROOTS
        .may_load(storage, root_id)?
        .ok_or(ContractError::RootNotFound)?;
    let withdrawn = root.amount_withdrawn.checked_add(amount)?;
    if withdrawn > root.total_amount {
        return Err(ContractError::ExceedsRootTotal);
    }
    root.amount_withdrawn = withdrawn;
    TRANSFER_ROOTS.save(storage, root_id, &root)?;
    Ok(())
}
