//! Governance recovery of roots that were bonded but never confirmed.

use cosmwasm_std::{Binary, CosmosMsg, DepsMut, Env, MessageInfo, Response, Uint128};

use super::bonding::{matching_confirmation, release_time_slot};
use super::{require_admin, require_hub};
use crate::accounting::forfeit;
use crate::error::ContractError;
use crate::hash::{bytes32_to_hex, compute_transfer_root_id, parse_hash};
use crate::state::{BondStatus, CHAINS, CONFIG, STATS, TRANSFER_BONDS};

/// Forfeit a stale bond into contract custody.
///
/// Only an unchallenged bond with no confirmation can be rescued, and only
/// once `rescue_delay` has passed since it was placed. The forfeited amount is
/// sent to `recipient` when one is given.
pub fn execute_rescue_transfer_root(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    root_hash: Binary,
    total_amount: Uint128,
    origin_chain_id: u64,
    recipient: Option<String>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    require_admin(&config, &info)?;
    require_hub(&config)?;

    if origin_chain_id != config.chain_id && !CHAINS.has(deps.storage, origin_chain_id) {
        return Err(ContractError::ChainNotSupported {
            chain_id: origin_chain_id,
        });
    }

    let root_hash = parse_hash(&root_hash)?;
    let root_id = compute_transfer_root_id(&root_hash, total_amount);

    let mut bond = TRANSFER_BONDS
        .may_load(deps.storage, &root_id)?
        .ok_or(ContractError::BondNotFound)?;
    if matching_confirmation(deps.storage, &root_id, &bond)?.is_some() {
        return Err(ContractError::RescueNotAllowed {
            reason: "TransferRoot has been confirmed".to_string(),
        });
    }
    if bond.status != BondStatus::Bonded {
        return Err(ContractError::RescueNotAllowed {
            reason: format!("bond is {}", bond.status),
        });
    }

    let now = env.block.time.seconds();
    let rescuable_at = bond.bonded_at.saturating_add(config.rescue_delay);
    if now < rescuable_at {
        return Err(ContractError::RescueDelayNotElapsed {
            remaining_seconds: rescuable_at - now,
        });
    }

    let recipient = recipient
        .map(|r| deps.api.addr_validate(&r))
        .transpose()?;

    forfeit(deps.storage, &bond.bonder, bond.bond_amount)?;
    release_time_slot(deps.storage, bond.bonded_at, bond.bond_amount)?;
    bond.status = BondStatus::Rescued;
    TRANSFER_BONDS.save(deps.storage, &root_id, &bond)?;

    let mut stats = STATS.load(deps.storage)?;
    stats.amount_rescued = stats.amount_rescued.checked_add(bond.bond_amount)?;
    STATS.save(deps.storage, &stats)?;

    let mut messages: Vec<CosmosMsg> = vec![];
    if let Some(recipient) = &recipient {
        messages.push(config.asset.transfer_msg(recipient, bond.bond_amount)?);
    }

    Ok(Response::new()
        .add_messages(messages)
        .add_attribute("method", "rescue_transfer_root")
        .add_attribute("transfer_root_id", bytes32_to_hex(&root_id))
        .add_attribute("origin_chain_id", origin_chain_id.to_string())
        .add_attribute("bonder", bond.bonder)
        .add_attribute("amount", bond.bond_amount.to_string())
        .add_attribute(
            "recipient",
            recipient.map(|r| r.to_string()).unwrap_or_default(),
        ))
}
