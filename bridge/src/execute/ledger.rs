//! Stake and unstake handlers.

use cosmwasm_std::{DepsMut, MessageInfo, Response, Uint128};

use super::{native_payment, require_not_paused};
use crate::accounting::{add_credit, add_raw_debit, is_bonder};
use crate::error::ContractError;
use crate::state::{Config, CONFIG};

/// Credit `paid` to a registered bonder. Anyone may stake on a bonder's behalf.
pub fn execute_stake(
    deps: DepsMut,
    config: &Config,
    paid: Uint128,
    bonder: String,
) -> Result<Response, ContractError> {
    require_not_paused(config)?;

    let bonder = deps.api.addr_validate(&bonder)?;
    if !is_bonder(deps.storage, &bonder)? {
        return Err(ContractError::NotBonder);
    }
    if paid.is_zero() {
        return Err(ContractError::InvalidAmount {
            reason: "Stake amount must be greater than zero".to_string(),
        });
    }

    let ledger = add_credit(deps.storage, &bonder, paid)?;

    Ok(Response::new()
        .add_attribute("method", "stake")
        .add_attribute("bonder", bonder)
        .add_attribute("amount", paid.to_string())
        .add_attribute("credit", ledger.credit.to_string()))
}

/// Native-funds entry point for `Stake`.
pub fn execute_stake_native(
    deps: DepsMut,
    info: MessageInfo,
    bonder: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let paid = native_payment(&config.asset, &info)?;
    execute_stake(deps, &config, paid, bonder)
}

/// Withdraw available credit. Challengers collect their rewards this way too.
pub fn execute_unstake(
    deps: DepsMut,
    info: MessageInfo,
    amount: Uint128,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    require_not_paused(&config)?;

    if amount.is_zero() {
        return Err(ContractError::InvalidAmount {
            reason: "Unstake amount must be greater than zero".to_string(),
        });
    }

    let ledger = add_raw_debit(deps.storage, &info.sender, amount)?;
    let message = config.asset.transfer_msg(&info.sender, amount)?;

    Ok(Response::new()
        .add_message(message)
        .add_attribute("method", "unstake")
        .add_attribute("address", info.sender)
        .add_attribute("amount", amount.to_string())
        .add_attribute("available_credit", ledger.available_credit()?.to_string()))
}
