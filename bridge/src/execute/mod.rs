//! Execute handlers for the Bonded Bridge contract.
//!
//! This module contains all execute message handlers, organized by category:
//! - `outgoing` - Send, CW20 receive hooks and batch commits (origin side)
//! - `bonding` - Bond, confirm, challenge and resolve transfer roots (hub side)
//! - `withdraw` - Set roots, bonded and proof withdrawals, settlement (destination side)
//! - `ledger` - Stake and unstake
//! - `rescue` - Governance recovery of never-confirmed roots
//! - `config` - Bonders, chains and protocol parameters
//! - `admin` - Pause, unpause, admin transfer, and recovery operations

mod admin;
mod bonding;
mod config;
mod ledger;
mod outgoing;
mod rescue;
mod withdraw;

pub use admin::*;
pub use bonding::*;
pub use config::*;
pub use ledger::*;
pub use outgoing::*;
pub use rescue::*;
pub use withdraw::*;

pub(crate) use config::{register_bonder, validate_config};

use cosmwasm_std::{MessageInfo, Response, Uint128};

use crate::error::ContractError;
use crate::state::Config;
use common::AssetInfo;

/// Amount of the bridged asset attached as native funds.
///
/// Any other denom is rejected, and a CW20 bridge accepts no native funds at
/// all (its payments arrive through the receive hook instead).
pub(crate) fn native_payment(asset: &AssetInfo, info: &MessageInfo) -> Result<Uint128, ContractError> {
    let mut paid = Uint128::zero();
    for coin in &info.funds {
        match asset {
            AssetInfo::Native { denom } if *denom == coin.denom => {
                paid = paid.checked_add(coin.amount)?;
            }
            _ => {
                return Err(ContractError::WrongAsset {
                    expected: asset.to_string(),
                    got: coin.denom.clone(),
                })
            }
        }
    }
    Ok(paid)
}

/// Payment must match `expected` exactly.
pub(crate) fn require_payment(
    asset: &AssetInfo,
    paid: Uint128,
    expected: Uint128,
) -> Result<(), ContractError> {
    if paid != expected {
        return Err(ContractError::InvalidFunds {
            asset: asset.to_string(),
            expected,
            got: paid,
        });
    }
    Ok(())
}

pub(crate) fn require_not_paused(config: &Config) -> Result<(), ContractError> {
    if config.paused {
        return Err(ContractError::BridgePaused);
    }
    Ok(())
}

pub(crate) fn require_admin(config: &Config, info: &MessageInfo) -> Result<(), ContractError> {
    if info.sender != config.admin {
        return Err(ContractError::Unauthorized);
    }
    Ok(())
}

pub(crate) fn require_hub(config: &Config) -> Result<(), ContractError> {
    if config.chain_id != config.hub_chain_id {
        return Err(ContractError::NotHubChain {
            hub_chain_id: config.hub_chain_id,
        });
    }
    Ok(())
}

/// Fold the messages and attributes of an internal step into `response`.
pub(crate) fn merge(response: Response, step: Response) -> Response {
    response
        .add_submessages(step.messages)
        .add_attributes(step.attributes)
}
