//! Root bonding handlers (hub side).
//!
//! A bonder may vouch for a committed root before its canonical confirmation
//! arrives. The bond reserves `total + total / divisor` of the bonder's credit
//! and counts against the time slot it was placed in.
//!
//! - A matching confirmation before any challenge releases the bond. A
//!   confirmation only matches when it names the bond's destination chain.
//! - A challenge inside `challenge_period` freezes it until
//!   `challenge_resolution_period` has passed. Resolution then checks whether
//!   a confirmation for the same TransferRootId exists.
//!
//! The time slot reservation of a challenged bond is only released on
//! resolution.

use cosmwasm_std::{Addr, Binary, DepsMut, Env, MessageInfo, Response, Storage, Uint128};

use super::withdraw::store_transfer_root;
use super::{merge, native_payment, require_hub, require_not_paused, require_payment};
use crate::accounting::{
    add_additional_debit, add_credit, forfeit, is_bonder, release_additional_debit,
};
use crate::error::ContractError;
use crate::hash::{bytes32_to_hex, compute_transfer_root_id, parse_hash};
use crate::messenger::{assert_from_connector, send_to_chain};
use crate::msg::ExecuteMsg;
use crate::state::{
    time_slot, BondStatus, Config, ConfirmedRoot, TransferBond, CONFIG, CONFIRMED_ROOTS, STATS,
    TIME_SLOT_BONDED, TRANSFER_BONDS,
};

// ============================================================================
// Bond
// ============================================================================

/// Bonder vouches for a root that has not been confirmed yet.
pub fn execute_bond_transfer_root(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    root_hash: Binary,
    destination_chain_id: u64,
    total_amount: Uint128,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    require_not_paused(&config)?;
    require_hub(&config)?;

    if !is_bonder(deps.storage, &info.sender)? {
        return Err(ContractError::NotBonder);
    }
    if total_amount.is_zero() {
        return Err(ContractError::InvalidAmount {
            reason: "TransferRoot total must be greater than zero".to_string(),
        });
    }
    if config.challenge_amount(total_amount).is_zero() {
        return Err(ContractError::InvalidAmount {
            reason: format!(
                "TransferRoot total must be at least {} to be challengeable",
                config.challenge_amount_divisor
            ),
        });
    }

    let root_hash = parse_hash(&root_hash)?;
    let root_id = compute_transfer_root_id(&root_hash, total_amount);

    if CONFIRMED_ROOTS.has(deps.storage, &root_id) {
        return Err(ContractError::RootAlreadyConfirmedForBond);
    }
    if TRANSFER_BONDS.has(deps.storage, &root_id) {
        return Err(ContractError::RootAlreadyBonded);
    }

    let now = env.block.time.seconds();
    let bond_amount = config.bond_amount(total_amount)?;

    // Rolling risk cap (0 = unlimited)
    let slot = time_slot(now);
    let bonded = TIME_SLOT_BONDED
        .may_load(deps.storage, slot)?
        .unwrap_or_default();
    let new_bonded = bonded.checked_add(bond_amount)?;
    if !config.time_slot_bond_limit.is_zero() && new_bonded > config.time_slot_bond_limit {
        return Err(ContractError::TimeSlotLimitExceeded {
            limit: config.time_slot_bond_limit,
            bonded,
            requested: bond_amount,
        });
    }

    add_additional_debit(deps.storage, &info.sender, bond_amount)?;
    TIME_SLOT_BONDED.save(deps.storage, slot, &new_bonded)?;

    let bond = TransferBond {
        bonder: info.sender.clone(),
        bonded_at: now,
        total_amount,
        bond_amount,
        destination_chain_id,
        challenge_start_time: None,
        challenger: None,
        challenge_amount: None,
        status: BondStatus::Bonded,
    };
    TRANSFER_BONDS.save(deps.storage, &root_id, &bond)?;

    let mut stats = STATS.load(deps.storage)?;
    stats.roots_bonded += 1;
    STATS.save(deps.storage, &stats)?;

    let distribute = distribute_root(
        deps.storage,
        &env,
        &config,
        destination_chain_id,
        &root_hash,
        total_amount,
    )?;

    Ok(merge(
        Response::new()
            .add_attribute("method", "bond_transfer_root")
            .add_attribute("transfer_root_id", bytes32_to_hex(&root_id))
            .add_attribute("root_hash", bytes32_to_hex(&root_hash))
            .add_attribute("bonder", info.sender)
            .add_attribute("total_amount", total_amount.to_string())
            .add_attribute("bond_amount", bond_amount.to_string())
            .add_attribute("destination_chain_id", destination_chain_id.to_string())
            .add_attribute("time_slot", slot.to_string()),
        distribute,
    ))
}

// ============================================================================
// Confirm
// ============================================================================

/// Canonical confirmation relayed from the origin chain's connector.
#[allow(clippy::too_many_arguments)]
pub fn execute_confirm_transfer_root(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    origin_chain_id: u64,
    root_hash: Binary,
    destination_chain_id: u64,
    total_amount: Uint128,
    committed_at: u64,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    require_hub(&config)?;
    assert_from_connector(deps.storage, &info.sender, origin_chain_id)?;

    let confirmed = ConfirmedRoot {
        root_hash: parse_hash(&root_hash)?,
        total_amount,
        origin_chain_id,
        destination_chain_id,
        committed_at,
        confirmed_at: env.block.time.seconds(),
    };
    let step = record_confirmation(deps.storage, &env, &config, confirmed)?;

    Ok(merge(
        Response::new().add_attribute("method", "confirm_transfer_root"),
        step,
    ))
}

/// Store a confirmation and reconcile any bond placed on the same root.
///
/// An unchallenged bond for the same destination completes here. A bond that
/// is already challenged is left for `ResolveChallenge`. Without a matching
/// bond the root has not reached its destination yet, so it is distributed
/// now; a bond naming another destination stays open to challenge.
pub(crate) fn record_confirmation(
    storage: &mut dyn Storage,
    env: &Env,
    config: &Config,
    confirmed: ConfirmedRoot,
) -> Result<Response, ContractError> {
    if confirmed.committed_at == 0 {
        return Err(ContractError::InvalidCommitTime);
    }

    let root_id = compute_transfer_root_id(&confirmed.root_hash, confirmed.total_amount);
    if CONFIRMED_ROOTS.has(storage, &root_id) {
        return Err(ContractError::RootAlreadyConfirmed);
    }
    CONFIRMED_ROOTS.save(storage, &root_id, &confirmed)?;

    let mut stats = STATS.load(storage)?;
    stats.roots_confirmed += 1;
    STATS.save(storage, &stats)?;

    let response = Response::new()
        .add_attribute("transfer_root_id", bytes32_to_hex(&root_id))
        .add_attribute("origin_chain_id", confirmed.origin_chain_id.to_string())
        .add_attribute("confirmed_total_amount", confirmed.total_amount.to_string());

    let matching_bond = TRANSFER_BONDS
        .may_load(storage, &root_id)?
        .filter(|bond| bond.destination_chain_id == confirmed.destination_chain_id);
    match matching_bond {
        Some(mut bond) => {
            if bond.status == BondStatus::Bonded {
                release_additional_debit(storage, &bond.bonder, bond.bond_amount)?;
                release_time_slot(storage, bond.bonded_at, bond.bond_amount)?;
                bond.status = BondStatus::Confirmed;
                TRANSFER_BONDS.save(storage, &root_id, &bond)?;
            }
            Ok(response.add_attribute("bond_status", bond.status.to_string()))
        }
        None => {
            let distribute = distribute_root(
                storage,
                env,
                config,
                confirmed.destination_chain_id,
                &confirmed.root_hash,
                confirmed.total_amount,
            )?;
            Ok(merge(response, distribute))
        }
    }
}

// ============================================================================
// Challenge
// ============================================================================

/// Dispute a bond before its challenge period ends.
///
/// `paid` is the amount the challenger attached (native funds or CW20 hook).
#[allow(clippy::too_many_arguments)]
pub fn execute_challenge_transfer_bond(
    deps: DepsMut,
    env: Env,
    config: &Config,
    challenger: Addr,
    paid: Uint128,
    root_hash: Binary,
    total_amount: Uint128,
    destination_chain_id: u64,
) -> Result<Response, ContractError> {
    require_hub(config)?;

    let root_hash = parse_hash(&root_hash)?;
    let root_id = compute_transfer_root_id(&root_hash, total_amount);

    let mut bond = TRANSFER_BONDS
        .may_load(deps.storage, &root_id)?
        .ok_or(ContractError::BondNotFound)?;
    if bond.destination_chain_id != destination_chain_id {
        return Err(ContractError::InvalidChainId {
            chain_id: destination_chain_id,
        });
    }
    if matching_confirmation(deps.storage, &root_id, &bond)?.is_some() {
        return Err(ContractError::ChallengeAfterConfirm);
    }

    let now = env.block.time.seconds();
    if now.saturating_sub(bond.bonded_at) >= config.challenge_period {
        return Err(ContractError::ChallengePeriodEnded);
    }
    if bond.status != BondStatus::Bonded {
        return Err(ContractError::AlreadyChallenged);
    }

    let challenge_amount = config.challenge_amount(total_amount);
    if challenge_amount.is_zero() {
        return Err(ContractError::InvalidAmount {
            reason: "Challenge amount must be greater than zero".to_string(),
        });
    }
    require_payment(&config.asset, paid, challenge_amount)?;

    bond.challenge_start_time = Some(now);
    bond.challenger = Some(challenger.clone());
    bond.challenge_amount = Some(challenge_amount);
    bond.status = BondStatus::Challenged;
    TRANSFER_BONDS.save(deps.storage, &root_id, &bond)?;

    let mut stats = STATS.load(deps.storage)?;
    stats.challenges += 1;
    STATS.save(deps.storage, &stats)?;

    Ok(Response::new()
        .add_attribute("method", "challenge_transfer_bond")
        .add_attribute("transfer_root_id", bytes32_to_hex(&root_id))
        .add_attribute("root_hash", bytes32_to_hex(&root_hash))
        .add_attribute("challenger", challenger)
        .add_attribute("challenge_amount", challenge_amount.to_string())
        .add_attribute("challenge_start_time", now.to_string()))
}

/// Native-funds entry point for `ChallengeTransferBond`.
pub fn execute_challenge_transfer_bond_native(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    root_hash: Binary,
    total_amount: Uint128,
    destination_chain_id: u64,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let paid = native_payment(&config.asset, &info)?;
    execute_challenge_transfer_bond(
        deps,
        env,
        &config,
        info.sender,
        paid,
        root_hash,
        total_amount,
        destination_chain_id,
    )
}

// ============================================================================
// Resolve
// ============================================================================

/// Settle a challenge after its resolution period.
///
/// With a confirmation for the same id and destination the challenge failed. The bond is
/// released and the challenge stake goes to the bonder, or back to the
/// challenger if the bond was placed within `min_transfer_root_bond_delay` of
/// the commit. Without one the challenge succeeded: the bond is forfeited, a
/// quarter of the stake is burned and the challenger is credited 7/4 of it.
pub fn execute_resolve_challenge(
    deps: DepsMut,
    env: Env,
    _info: MessageInfo,
    root_hash: Binary,
    total_amount: Uint128,
    destination_chain_id: u64,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    require_hub(&config)?;

    let root_hash = parse_hash(&root_hash)?;
    let root_id = compute_transfer_root_id(&root_hash, total_amount);

    let mut bond = TRANSFER_BONDS
        .may_load(deps.storage, &root_id)?
        .ok_or(ContractError::BondNotFound)?;
    if bond.destination_chain_id != destination_chain_id {
        return Err(ContractError::InvalidChainId {
            chain_id: destination_chain_id,
        });
    }
    if bond.status.is_resolved() {
        return Err(ContractError::AlreadyResolved);
    }
    if bond.status != BondStatus::Challenged {
        return Err(ContractError::NotChallenged);
    }
    let (Some(challenge_start_time), Some(challenger), Some(challenge_amount)) = (
        bond.challenge_start_time,
        bond.challenger.clone(),
        bond.challenge_amount,
    ) else {
        return Err(ContractError::NotChallenged);
    };

    let now = env.block.time.seconds();
    let ready_at = challenge_start_time.saturating_add(config.challenge_resolution_period);
    if now < ready_at {
        return Err(ContractError::ResolutionPeriodNotEnded {
            remaining_seconds: ready_at - now,
        });
    }

    release_time_slot(deps.storage, bond.bonded_at, bond.bond_amount)?;

    let mut response = Response::new()
        .add_attribute("method", "resolve_challenge")
        .add_attribute("transfer_root_id", bytes32_to_hex(&root_id))
        .add_attribute("bonder", bond.bonder.to_string())
        .add_attribute("challenger", challenger.to_string());

    match matching_confirmation(deps.storage, &root_id, &bond)? {
        Some(confirmed) => {
            release_additional_debit(deps.storage, &bond.bonder, bond.bond_amount)?;

            let late_bond = bond.bonded_at
                > confirmed
                    .committed_at
                    .saturating_add(config.min_transfer_root_bond_delay);
            let stake_recipient = if late_bond { &bond.bonder } else { &challenger };
            add_credit(deps.storage, stake_recipient, challenge_amount)?;

            bond.status = BondStatus::ChallengeFailed;
            response = response
                .add_attribute("outcome", "challenge_failed")
                .add_attribute("stake_recipient", stake_recipient.to_string())
                .add_attribute("stake_amount", challenge_amount.to_string());
        }
        None => {
            forfeit(deps.storage, &bond.bonder, bond.bond_amount)?;

            let burn_amount = challenge_amount / Uint128::new(4);
            let reward = challenge_amount.checked_add(challenge_amount - burn_amount)?;
            add_credit(deps.storage, &challenger, reward)?;

            if !burn_amount.is_zero() {
                response = response.add_message(config.asset.burn_msg(burn_amount)?);
                let mut stats = STATS.load(deps.storage)?;
                stats.amount_burned = stats.amount_burned.checked_add(burn_amount)?;
                STATS.save(deps.storage, &stats)?;
            }

            bond.status = BondStatus::ChallengeSucceeded;
            response = response
                .add_attribute("outcome", "challenge_succeeded")
                .add_attribute("forfeited_amount", bond.bond_amount.to_string())
                .add_attribute("burn_amount", burn_amount.to_string())
                .add_attribute("challenger_reward", reward.to_string());
        }
    }

    TRANSFER_BONDS.save(deps.storage, &root_id, &bond)?;
    Ok(response)
}

// ============================================================================
// Shared helpers
// ============================================================================

/// Make a root available on its destination chain.
pub(crate) fn distribute_root(
    storage: &mut dyn Storage,
    env: &Env,
    config: &Config,
    destination_chain_id: u64,
    root_hash: &[u8; 32],
    total_amount: Uint128,
) -> Result<Response, ContractError> {
    if destination_chain_id == config.chain_id {
        return store_transfer_root(storage, env, root_hash, total_amount);
    }

    let set_root = ExecuteMsg::SetTransferRoot {
        root_hash: Binary::from(root_hash.to_vec()),
        total_amount,
    };
    let message = send_to_chain(storage, destination_chain_id, &set_root)?;
    Ok(Response::new()
        .add_message(message)
        .add_attribute("distributed_to", destination_chain_id.to_string()))
}

/// Confirmation recorded for `root_id` that names the bond's destination.
pub(crate) fn matching_confirmation(
    storage: &dyn Storage,
    root_id: &[u8; 32],
    bond: &TransferBond,
) -> Result<Option<ConfirmedRoot>, ContractError> {
    Ok(CONFIRMED_ROOTS
        .may_load(storage, root_id)?
        .filter(|confirmed| confirmed.destination_chain_id == bond.destination_chain_id))
}

/// Give back a bond's share of the time slot it was placed in.
pub(crate) fn release_time_slot(
    storage: &mut dyn Storage,
    bonded_at: u64,
    bond_amount: Uint128,
) -> Result<(), ContractError> {
    let slot = time_slot(bonded_at);
    let bonded = TIME_SLOT_BONDED.may_load(storage, slot)?.unwrap_or_default();
    TIME_SLOT_BONDED.save(storage, slot, &bonded.checked_sub(bond_amount)?)?;
    Ok(())
}
