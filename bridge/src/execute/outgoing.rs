//! Outgoing transfer handlers (Send, Receive and CommitTransfers).
//!
//! Each send is escrowed here and its TransferId appended to the pending batch
//! of its destination. A commit seals the batch into a Merkle root and sends
//! the confirmation to the hub.

use cosmwasm_std::{
    from_json, Addr, Binary, CosmosMsg, DepsMut, Env, MessageInfo, Response, Storage, Uint128,
};
use cw20::Cw20ReceiveMsg;

use super::bonding::record_confirmation;
use super::{
    execute_bond_withdrawal, execute_challenge_transfer_bond, execute_stake, merge,
    native_payment, require_not_paused, require_payment,
};
use crate::accounting::is_bonder;
use crate::error::ContractError;
use crate::hash::{bytes32_to_hex, compute_transfer_id};
use crate::merkle;
use crate::messenger::send_to_chain;
use crate::msg::{ExecuteMsg, ReceiveMsg};
use crate::state::{
    Config, ConfirmedRoot, SentTransfer, Transfer, CHAINS, CONFIG, LAST_COMMIT_TIME,
    OUTGOING_NONCE, PENDING_AMOUNT, PENDING_TRANSFER_IDS, SENT_TRANSFERS, STATS,
};
use common::AssetInfo;

/// Parameters of an outgoing transfer chosen by the sender
pub struct SendParams {
    pub destination_chain_id: u64,
    pub recipient: String,
    pub amount: Uint128,
    pub bonder_fee: Uint128,
    pub amount_out_min: Uint128,
    pub deadline: u64,
}

/// Execute handler for sending native funds
pub fn execute_send(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    params: SendParams,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let paid = native_payment(&config.asset, &info)?;
    send_transfer(deps, env, &config, info.sender, paid, params)
}

/// Execute handler for CW20 receive hooks
pub fn execute_receive(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    cw20_msg: Cw20ReceiveMsg,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    match &config.asset {
        AssetInfo::Cw20 { contract_addr } if *contract_addr == info.sender => {}
        _ => {
            return Err(ContractError::WrongAsset {
                expected: config.asset.to_string(),
                got: info.sender.to_string(),
            })
        }
    }

    let sender = deps.api.addr_validate(&cw20_msg.sender)?;
    let paid = cw20_msg.amount;
    let receive_msg: ReceiveMsg =
        from_json(&cw20_msg.msg).map_err(|_| ContractError::InvalidReceiveMsg)?;

    match receive_msg {
        ReceiveMsg::Send {
            destination_chain_id,
            recipient,
            bonder_fee,
            amount_out_min,
            deadline,
        } => {
            let params = SendParams {
                destination_chain_id,
                recipient,
                amount: paid,
                bonder_fee,
                amount_out_min,
                deadline,
            };
            send_transfer(deps, env, &config, sender, paid, params)
        }
        ReceiveMsg::Stake { bonder } => execute_stake(deps, &config, paid, bonder),
        ReceiveMsg::ChallengeTransferBond {
            root_hash,
            total_amount,
            destination_chain_id,
        } => execute_challenge_transfer_bond(
            deps,
            env,
            &config,
            sender,
            paid,
            root_hash,
            total_amount,
            destination_chain_id,
        ),
        ReceiveMsg::BondWithdrawal { transfer } => {
            execute_bond_withdrawal(deps, &config, sender, paid, transfer)
        }
    }
}

fn send_transfer(
    deps: DepsMut,
    env: Env,
    config: &Config,
    sender: Addr,
    paid: Uint128,
    params: SendParams,
) -> Result<Response, ContractError> {
    require_not_paused(config)?;

    let destination_chain_id = params.destination_chain_id;
    if params.amount.is_zero() {
        return Err(ContractError::InvalidAmount {
            reason: "Amount must be greater than zero".to_string(),
        });
    }
    if params.bonder_fee > params.amount {
        return Err(ContractError::BonderFeeTooHigh);
    }
    if destination_chain_id == config.chain_id {
        return Err(ContractError::InvalidChainId {
            chain_id: destination_chain_id,
        });
    }

    let chain = CHAINS
        .may_load(deps.storage, destination_chain_id)?
        .ok_or(ContractError::ChainNotSupported {
            chain_id: destination_chain_id,
        })?;
    if chain.deposits_paused {
        return Err(ContractError::DepositsPaused {
            chain_id: destination_chain_id,
        });
    }

    require_payment(&config.asset, paid, params.amount)?;

    // Increment nonce
    let nonce = OUTGOING_NONCE.load(deps.storage)?;
    OUTGOING_NONCE.save(deps.storage, &(nonce + 1))?;

    let transfer = Transfer {
        origin_chain_id: config.chain_id,
        destination_chain_id,
        sender: sender.to_string(),
        recipient: params.recipient,
        amount: params.amount,
        transfer_nonce: nonce,
        bonder_fee: params.bonder_fee,
        amount_out_min: params.amount_out_min,
        deadline: params.deadline,
    };
    let transfer_id = compute_transfer_id(&transfer);

    let mut pending = PENDING_TRANSFER_IDS
        .may_load(deps.storage, destination_chain_id)?
        .unwrap_or_default();
    pending.push(transfer_id);
    PENDING_TRANSFER_IDS.save(deps.storage, destination_chain_id, &pending)?;

    let pending_amount = PENDING_AMOUNT
        .may_load(deps.storage, destination_chain_id)?
        .unwrap_or_default()
        .checked_add(transfer.amount)?;
    PENDING_AMOUNT.save(deps.storage, destination_chain_id, &pending_amount)?;

    SENT_TRANSFERS.save(
        deps.storage,
        nonce,
        &SentTransfer {
            transfer: transfer.clone(),
            transfer_id,
            sent_at: env.block.time,
        },
    )?;

    let mut stats = STATS.load(deps.storage)?;
    stats.transfers_sent += 1;
    STATS.save(deps.storage, &stats)?;

    let mut response = Response::new()
        .add_attribute("method", "send")
        .add_attribute("transfer_id", bytes32_to_hex(&transfer_id))
        .add_attribute("nonce", nonce.to_string())
        .add_attribute("sender", transfer.sender)
        .add_attribute("recipient", transfer.recipient)
        .add_attribute("amount", transfer.amount.to_string())
        .add_attribute("bonder_fee", transfer.bonder_fee.to_string())
        .add_attribute("destination_chain_id", destination_chain_id.to_string())
        .add_attribute("pending_count", pending.len().to_string());

    if pending.len() >= config.max_pending_transfers as usize {
        let commit = commit_pending(deps.storage, &env, config, destination_chain_id)?;
        response = merge(response.add_attribute("auto_commit", "true"), commit);
    }

    Ok(response)
}

/// Execute handler for sealing a pending batch
pub fn execute_commit_transfers(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    destination_chain_id: u64,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    if !is_bonder(deps.storage, &info.sender)? {
        let last_commit_time = LAST_COMMIT_TIME
            .may_load(deps.storage, destination_chain_id)?
            .unwrap_or(0);
        let allowed_at = last_commit_time.saturating_add(config.minimum_force_commit_delay);
        if env.block.time.seconds() < allowed_at {
            return Err(ContractError::UnauthorizedCommit);
        }
    }

    let commit = commit_pending(deps.storage, &env, &config, destination_chain_id)?;
    Ok(merge(
        Response::new().add_attribute("method", "commit_transfers"),
        commit,
    ))
}

/// Seal the pending batch for `destination_chain_id`.
///
/// An empty batch is a no-op. Otherwise the confirmation is sent to the hub,
/// or recorded directly when this chain is the hub.
fn commit_pending(
    storage: &mut dyn Storage,
    env: &Env,
    config: &Config,
    destination_chain_id: u64,
) -> Result<Response, ContractError> {
    let pending = PENDING_TRANSFER_IDS
        .may_load(storage, destination_chain_id)?
        .unwrap_or_default();
    let Some(root_hash) = merkle::compute_root(&pending) else {
        return Ok(Response::new().add_attribute("transfer_count", "0"));
    };
    let total_amount = PENDING_AMOUNT
        .may_load(storage, destination_chain_id)?
        .unwrap_or_default();
    let committed_at = env.block.time.seconds();

    PENDING_TRANSFER_IDS.remove(storage, destination_chain_id);
    PENDING_AMOUNT.remove(storage, destination_chain_id);
    LAST_COMMIT_TIME.save(storage, destination_chain_id, &committed_at)?;

    let mut stats = STATS.load(storage)?;
    stats.roots_committed += 1;
    STATS.save(storage, &stats)?;

    let response = Response::new()
        .add_attribute("root_hash", bytes32_to_hex(&root_hash))
        .add_attribute("total_amount", total_amount.to_string())
        .add_attribute("destination_chain_id", destination_chain_id.to_string())
        .add_attribute("committed_at", committed_at.to_string())
        .add_attribute("transfer_count", pending.len().to_string());

    if config.hub_chain_id == config.chain_id {
        let confirmed = ConfirmedRoot {
            root_hash,
            total_amount,
            origin_chain_id: config.chain_id,
            destination_chain_id,
            committed_at,
            confirmed_at: committed_at,
        };
        let step = record_confirmation(storage, env, config, confirmed)?;
        return Ok(merge(response, step));
    }

    let confirm = ExecuteMsg::ConfirmTransferRoot {
        origin_chain_id: config.chain_id,
        root_hash: Binary::from(root_hash.to_vec()),
        destination_chain_id,
        total_amount,
        committed_at,
    };
    let message: CosmosMsg = send_to_chain(storage, config.hub_chain_id, &confirm)?;
    Ok(response.add_message(message))
}
