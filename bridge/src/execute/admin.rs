//! Admin operations handlers.
//!
//! This module handles:
//! - Pause/unpause contract
//! - Admin transfer (propose/accept/cancel)
//! - Asset recovery (emergency)

use cosmwasm_std::{DepsMut, Env, MessageInfo, Response, Uint128};

use super::require_admin;
use crate::error::ContractError;
use crate::state::{PendingAdmin, ADMIN_TIMELOCK_DURATION, CONFIG, PENDING_ADMIN};
use common::AssetInfo;

// ============================================================================
// Pause/Unpause
// ============================================================================

/// Pause the bridge (stops sends, bonds, stakes and withdrawals).
pub fn execute_pause(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    require_admin(&config, &info)?;

    config.paused = true;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new().add_attribute("method", "pause"))
}

pub fn execute_unpause(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    require_admin(&config, &info)?;

    config.paused = false;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new().add_attribute("method", "unpause"))
}

// ============================================================================
// Admin Transfer
// ============================================================================

/// Propose a new admin (starts timelock).
pub fn execute_propose_admin(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    new_admin: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    require_admin(&config, &info)?;

    let new_address = deps.api.addr_validate(&new_admin)?;
    let pending = PendingAdmin {
        new_address,
        execute_after: env.block.time.plus_seconds(ADMIN_TIMELOCK_DURATION),
    };
    PENDING_ADMIN.save(deps.storage, &pending)?;

    Ok(Response::new()
        .add_attribute("method", "propose_admin")
        .add_attribute("new_admin", pending.new_address)
        .add_attribute("execute_after", pending.execute_after.seconds().to_string()))
}

/// Accept pending admin role (after timelock).
pub fn execute_accept_admin(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    let pending = PENDING_ADMIN
        .may_load(deps.storage)?
        .ok_or(ContractError::NoPendingAdmin)?;

    if info.sender != pending.new_address {
        return Err(ContractError::UnauthorizedPendingAdmin);
    }

    if env.block.time < pending.execute_after {
        return Err(ContractError::TimelockNotExpired {
            remaining_seconds: pending.execute_after.seconds() - env.block.time.seconds(),
        });
    }

    let mut config = CONFIG.load(deps.storage)?;
    config.admin = pending.new_address.clone();
    CONFIG.save(deps.storage, &config)?;
    PENDING_ADMIN.remove(deps.storage);

    Ok(Response::new()
        .add_attribute("method", "accept_admin")
        .add_attribute("new_admin", pending.new_address))
}

pub fn execute_cancel_admin_proposal(
    deps: DepsMut,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    require_admin(&config, &info)?;

    if !PENDING_ADMIN.exists(deps.storage) {
        return Err(ContractError::NoPendingAdmin);
    }
    PENDING_ADMIN.remove(deps.storage);

    Ok(Response::new().add_attribute("method", "cancel_admin_proposal"))
}

// ============================================================================
// Asset Recovery
// ============================================================================

/// Recover stuck assets (emergency, requires paused state).
///
/// Bonder ledgers are not touched. Recovering the bridged asset can leave
/// escrow short of outstanding credit until it is topped up again.
pub fn execute_recover_asset(
    deps: DepsMut,
    info: MessageInfo,
    asset: AssetInfo,
    amount: Uint128,
    recipient: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    require_admin(&config, &info)?;

    if !config.paused {
        return Err(ContractError::RecoveryNotAvailable);
    }
    if amount.is_zero() {
        return Err(ContractError::InvalidAmount {
            reason: "Recovery amount must be greater than zero".to_string(),
        });
    }

    let recipient = deps.api.addr_validate(&recipient)?;
    let message = asset.transfer_msg(&recipient, amount)?;

    Ok(Response::new()
        .add_message(message)
        .add_attribute("method", "recover_asset")
        .add_attribute("asset", asset.to_string())
        .add_attribute("recipient", recipient)
        .add_attribute("amount", amount.to_string()))
}
