//! Cross-domain message gateway.
//!
//! Outbound payloads are bridge `ExecuteMsg`s wrapped in
//! [`ConnectorExecuteMsg::SendMessage`] and handed to the connector registered
//! for the target chain. Inbound payloads arrive as ordinary execute messages
//! and are authenticated by their sender being that same connector.

use common::ConnectorExecuteMsg;
use cosmwasm_std::{to_json_binary, Addr, CosmosMsg, Storage, WasmMsg};

use crate::error::ContractError;
use crate::msg::ExecuteMsg;
use crate::state::CHAINS;

/// Connector registered for `chain_id`
pub fn connector_for(storage: &dyn Storage, chain_id: u64) -> Result<Addr, ContractError> {
    CHAINS
        .may_load(storage, chain_id)?
        .and_then(|chain| chain.connector)
        .ok_or(ContractError::ChainNotSupported { chain_id })
}

/// Message delivering `payload` to the bridge on `chain_id`
pub fn send_to_chain(
    storage: &dyn Storage,
    chain_id: u64,
    payload: &ExecuteMsg,
) -> Result<CosmosMsg, ContractError> {
    let connector = connector_for(storage, chain_id)?;
    let msg = ConnectorExecuteMsg::SendMessage {
        payload: to_json_binary(payload)?,
    };
    Ok(CosmosMsg::Wasm(WasmMsg::Execute {
        contract_addr: connector.to_string(),
        msg: to_json_binary(&msg)?,
        funds: vec![],
    }))
}

/// Only the connector registered for `chain_id` may deliver its messages
pub fn assert_from_connector(
    storage: &dyn Storage,
    sender: &Addr,
    chain_id: u64,
) -> Result<(), ContractError> {
    match CHAINS.may_load(storage, chain_id)?.and_then(|c| c.connector) {
        Some(connector) if connector == *sender => Ok(()),
        _ => Err(ContractError::UnauthorizedConnector { chain_id }),
    }
}
