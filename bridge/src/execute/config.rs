//! Configuration management handlers.
//!
//! This module handles:
//! - Bonder registry (add/remove)
//! - Counterpart chains and their connectors
//! - Challenge, rescue and commit timing parameters

use cosmwasm_std::{Addr, DepsMut, MessageInfo, Response, Storage, Uint128};

use super::require_admin;
use crate::error::ContractError;
use crate::state::{ChainConfig, Config, BONDERS, BONDER_COUNT, CHAINS, CONFIG, TIME_SLOT_SIZE};

// ============================================================================
// Bonder Registry
// ============================================================================

/// Add a new bonder.
pub fn execute_add_bonder(
    deps: DepsMut,
    info: MessageInfo,
    bonder: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    require_admin(&config, &info)?;

    let bonder_addr = deps.api.addr_validate(&bonder)?;
    register_bonder(deps.storage, &bonder_addr)?;

    Ok(Response::new()
        .add_attribute("method", "add_bonder")
        .add_attribute("bonder", bonder_addr))
}

/// Remove a bonder. Its ledger is kept so outstanding bonds still settle.
pub fn execute_remove_bonder(
    deps: DepsMut,
    info: MessageInfo,
    bonder: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    require_admin(&config, &info)?;

    let bonder_addr = deps.api.addr_validate(&bonder)?;
    let existing = BONDERS
        .may_load(deps.storage, &bonder_addr)?
        .unwrap_or(false);
    if !existing {
        return Err(ContractError::NotBonder);
    }

    BONDERS.remove(deps.storage, &bonder_addr);
    let count = BONDER_COUNT.load(deps.storage)?;
    BONDER_COUNT.save(deps.storage, &count.saturating_sub(1))?;

    Ok(Response::new()
        .add_attribute("method", "remove_bonder")
        .add_attribute("bonder", bonder_addr))
}

pub(crate) fn register_bonder(storage: &mut dyn Storage, bonder: &Addr) -> Result<(), ContractError> {
    if BONDERS.may_load(storage, bonder)?.unwrap_or(false) {
        return Err(ContractError::AlreadyBonder);
    }
    BONDERS.save(storage, bonder, &true)?;
    let count = BONDER_COUNT.may_load(storage)?.unwrap_or(0);
    BONDER_COUNT.save(storage, &(count + 1))?;
    Ok(())
}

// ============================================================================
// Chain Management
// ============================================================================

/// Register a counterpart chain.
pub fn execute_register_chain(
    deps: DepsMut,
    info: MessageInfo,
    chain_id: u64,
    identifier: String,
    connector: Option<String>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    require_admin(&config, &info)?;

    if chain_id == 0 || chain_id == config.chain_id {
        return Err(ContractError::InvalidChainId { chain_id });
    }
    if CHAINS.has(deps.storage, chain_id) {
        return Err(ContractError::ChainAlreadyRegistered { chain_id });
    }

    let connector = connector
        .map(|c| deps.api.addr_validate(&c))
        .transpose()?;
    let chain = ChainConfig {
        chain_id,
        identifier: identifier.clone(),
        connector: connector.clone(),
        deposits_paused: false,
    };
    CHAINS.save(deps.storage, chain_id, &chain)?;

    Ok(Response::new()
        .add_attribute("method", "register_chain")
        .add_attribute("chain_id", chain_id.to_string())
        .add_attribute("identifier", identifier)
        .add_attribute(
            "connector",
            connector.map(|c| c.to_string()).unwrap_or_default(),
        ))
}

pub fn execute_unregister_chain(
    deps: DepsMut,
    info: MessageInfo,
    chain_id: u64,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    require_admin(&config, &info)?;

    if !CHAINS.has(deps.storage, chain_id) {
        return Err(ContractError::ChainNotSupported { chain_id });
    }
    CHAINS.remove(deps.storage, chain_id);

    Ok(Response::new()
        .add_attribute("method", "unregister_chain")
        .add_attribute("chain_id", chain_id.to_string()))
}

/// Point a registered chain at a new cross-domain connector.
pub fn execute_set_x_domain_connector(
    deps: DepsMut,
    info: MessageInfo,
    chain_id: u64,
    connector: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    require_admin(&config, &info)?;

    let mut chain = CHAINS
        .may_load(deps.storage, chain_id)?
        .ok_or(ContractError::ChainNotSupported { chain_id })?;
    let connector = deps.api.addr_validate(&connector)?;
    chain.connector = Some(connector.clone());
    CHAINS.save(deps.storage, chain_id, &chain)?;

    Ok(Response::new()
        .add_attribute("method", "set_x_domain_connector")
        .add_attribute("chain_id", chain_id.to_string())
        .add_attribute("connector", connector))
}

pub fn execute_set_chain_id_deposits_paused(
    deps: DepsMut,
    info: MessageInfo,
    chain_id: u64,
    paused: bool,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    require_admin(&config, &info)?;

    let mut chain = CHAINS
        .may_load(deps.storage, chain_id)?
        .ok_or(ContractError::ChainNotSupported { chain_id })?;
    chain.deposits_paused = paused;
    CHAINS.save(deps.storage, chain_id, &chain)?;

    Ok(Response::new()
        .add_attribute("method", "set_chain_id_deposits_paused")
        .add_attribute("chain_id", chain_id.to_string())
        .add_attribute("paused", paused.to_string()))
}

// ============================================================================
// Protocol Parameters
// ============================================================================

pub fn execute_set_challenge_period(
    deps: DepsMut,
    info: MessageInfo,
    challenge_period: u64,
) -> Result<Response, ContractError> {
    update_config(deps, info, "set_challenge_period", |config| {
        config.challenge_period = challenge_period;
        challenge_period.to_string()
    })
}

pub fn execute_set_challenge_resolution_period(
    deps: DepsMut,
    info: MessageInfo,
    challenge_resolution_period: u64,
) -> Result<Response, ContractError> {
    update_config(deps, info, "set_challenge_resolution_period", |config| {
        config.challenge_resolution_period = challenge_resolution_period;
        challenge_resolution_period.to_string()
    })
}

pub fn execute_set_min_transfer_root_bond_delay(
    deps: DepsMut,
    info: MessageInfo,
    min_transfer_root_bond_delay: u64,
) -> Result<Response, ContractError> {
    update_config(deps, info, "set_min_transfer_root_bond_delay", |config| {
        config.min_transfer_root_bond_delay = min_transfer_root_bond_delay;
        min_transfer_root_bond_delay.to_string()
    })
}

pub fn execute_set_challenge_amount_divisor(
    deps: DepsMut,
    info: MessageInfo,
    challenge_amount_divisor: u64,
) -> Result<Response, ContractError> {
    update_config(deps, info, "set_challenge_amount_divisor", |config| {
        config.challenge_amount_divisor = challenge_amount_divisor;
        challenge_amount_divisor.to_string()
    })
}

pub fn execute_set_time_slot_bond_limit(
    deps: DepsMut,
    info: MessageInfo,
    time_slot_bond_limit: Uint128,
) -> Result<Response, ContractError> {
    update_config(deps, info, "set_time_slot_bond_limit", |config| {
        config.time_slot_bond_limit = time_slot_bond_limit;
        time_slot_bond_limit.to_string()
    })
}

pub fn execute_set_rescue_delay(
    deps: DepsMut,
    info: MessageInfo,
    rescue_delay: u64,
) -> Result<Response, ContractError> {
    update_config(deps, info, "set_rescue_delay", |config| {
        config.rescue_delay = rescue_delay;
        rescue_delay.to_string()
    })
}

pub fn execute_set_max_pending_transfers(
    deps: DepsMut,
    info: MessageInfo,
    max_pending_transfers: u32,
) -> Result<Response, ContractError> {
    update_config(deps, info, "set_max_pending_transfers", |config| {
        config.max_pending_transfers = max_pending_transfers;
        max_pending_transfers.to_string()
    })
}

pub fn execute_set_minimum_force_commit_delay(
    deps: DepsMut,
    info: MessageInfo,
    minimum_force_commit_delay: u64,
) -> Result<Response, ContractError> {
    update_config(deps, info, "set_minimum_force_commit_delay", |config| {
        config.minimum_force_commit_delay = minimum_force_commit_delay;
        minimum_force_commit_delay.to_string()
    })
}

/// Admin-gated read-modify-validate-write of the config.
fn update_config<F>(
    deps: DepsMut,
    info: MessageInfo,
    method: &str,
    apply: F,
) -> Result<Response, ContractError>
where
    F: FnOnce(&mut Config) -> String,
{
    let mut config = CONFIG.load(deps.storage)?;
    require_admin(&config, &info)?;

    let value = apply(&mut config);
    validate_config(&config)?;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("method", method)
        .add_attribute("value", value))
}

/// Parameter constraints, checked at instantiation and on every update.
pub(crate) fn validate_config(config: &Config) -> Result<(), ContractError> {
    if config.challenge_period == 0 || config.challenge_period % TIME_SLOT_SIZE != 0 {
        return Err(ContractError::InvalidConfig {
            reason: format!(
                "challenge_period must be a non-zero multiple of {}",
                TIME_SLOT_SIZE
            ),
        });
    }
    if config.challenge_amount_divisor == 0 {
        return Err(ContractError::InvalidConfig {
            reason: "challenge_amount_divisor must be greater than zero".to_string(),
        });
    }
    let min_rescue_delay = config
        .challenge_period
        .saturating_add(config.challenge_resolution_period);
    if config.rescue_delay < min_rescue_delay {
        return Err(ContractError::InvalidConfig {
            reason: format!("rescue_delay must be at least {}", min_rescue_delay),
        });
    }
    if config.max_pending_transfers == 0 {
        return Err(ContractError::InvalidConfig {
            reason: "max_pending_transfers must be greater than zero".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{
        DEFAULT_CHALLENGE_AMOUNT_DIVISOR, DEFAULT_CHALLENGE_PERIOD,
        DEFAULT_CHALLENGE_RESOLUTION_PERIOD, DEFAULT_MAX_PENDING_TRANSFERS,
        DEFAULT_MINIMUM_FORCE_COMMIT_DELAY, DEFAULT_MIN_TRANSFER_ROOT_BOND_DELAY,
        DEFAULT_RESCUE_DELAY,
    };
    use common::AssetInfo;

    fn default_config() -> Config {
        Config {
            admin: Addr::unchecked("admin"),
            paused: false,
            chain_id: 1,
            hub_chain_id: 1,
            asset: AssetInfo::native("uluna"),
            challenge_period: DEFAULT_CHALLENGE_PERIOD,
            challenge_resolution_period: DEFAULT_CHALLENGE_RESOLUTION_PERIOD,
            min_transfer_root_bond_delay: DEFAULT_MIN_TRANSFER_ROOT_BOND_DELAY,
            rescue_delay: DEFAULT_RESCUE_DELAY,
            challenge_amount_divisor: DEFAULT_CHALLENGE_AMOUNT_DIVISOR,
            time_slot_bond_limit: Uint128::zero(),
            max_pending_transfers: DEFAULT_MAX_PENDING_TRANSFERS,
            minimum_force_commit_delay: DEFAULT_MINIMUM_FORCE_COMMIT_DELAY,
        }
    }

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(validate_config(&default_config()), Ok(()));
    }

    #[test]
    fn test_challenge_period_must_align_to_time_slot() {
        let mut config = default_config();
        config.challenge_period = TIME_SLOT_SIZE + 1;
        assert!(validate_config(&config).is_err());

        config.challenge_period = 0;
        assert!(validate_config(&config).is_err());

        config.challenge_period = TIME_SLOT_SIZE * 2;
        assert_eq!(validate_config(&config), Ok(()));
    }

    #[test]
    fn test_rescue_delay_covers_challenge_lifecycle() {
        let mut config = default_config();
        config.rescue_delay = config.challenge_period + config.challenge_resolution_period - 1;
        assert!(validate_config(&config).is_err());

        config.rescue_delay += 1;
        assert_eq!(validate_config(&config), Ok(()));
    }

    #[test]
    fn test_zero_divisor_rejected() {
        let mut config = default_config();
        config.challenge_amount_divisor = 0;
        assert!(validate_config(&config).is_err());
    }
}
