use cosmwasm_std::{
    entry_point, to_json_binary, Binary, CosmosMsg, Deps, DepsMut, Env, MessageInfo, Response,
    StdResult, WasmMsg,
};
use cw2::set_contract_version;

use crate::error::ContractError;
use crate::msg::{
    ConfigResponse, ExecuteMsg, InstantiateMsg, MessageResponse, QueryMsg, SequenceResponse,
};
use crate::state::{
    Config, QueuedMessage, CONFIG, CONTRACT_NAME, CONTRACT_VERSION, MESSAGES, NEXT_SEQUENCE,
};

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let config = Config {
        admin: deps.api.addr_validate(&msg.admin)?,
        bridge: deps.api.addr_validate(&msg.bridge)?,
        counterpart: None,
        auto_relay: msg.auto_relay,
    };
    CONFIG.save(deps.storage, &config)?;
    NEXT_SEQUENCE.save(deps.storage, &0)?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("bridge", config.bridge)
        .add_attribute("auto_relay", msg.auto_relay.to_string()))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::SetCounterpart { counterpart } => {
            execute_set_counterpart(deps, info, counterpart)
        }
        ExecuteMsg::SendMessage { payload } => execute_send_message(deps, env, info, payload),
        ExecuteMsg::Relay { sequence } => execute_relay(deps, sequence),
        ExecuteMsg::ReceiveMessage { payload } => execute_receive_message(deps, info, payload),
    }
}

fn execute_set_counterpart(
    deps: DepsMut,
    info: MessageInfo,
    counterpart: String,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    if info.sender != config.admin {
        return Err(ContractError::Unauthorized);
    }
    if let Some(existing) = &config.counterpart {
        return Err(ContractError::CounterpartAlreadySet {
            counterpart: existing.to_string(),
        });
    }

    let counterpart = deps.api.addr_validate(&counterpart)?;
    config.counterpart = Some(counterpart.clone());
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "set_counterpart")
        .add_attribute("counterpart", counterpart))
}

fn execute_send_message(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    payload: Binary,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.bridge {
        return Err(ContractError::NotBridge);
    }

    let sequence = NEXT_SEQUENCE.load(deps.storage)?;
    NEXT_SEQUENCE.save(deps.storage, &(sequence + 1))?;

    let mut message = QueuedMessage {
        payload,
        sent_at: env.block.time,
        relay_count: 0,
    };

    let mut response = Response::new()
        .add_attribute("action", "send_message")
        .add_attribute("sequence", sequence.to_string());

    if config.auto_relay {
        let relay = relay_msg(&config, &message.payload)?;
        message.relay_count = 1;
        response = response
            .add_message(relay)
            .add_attribute("relayed", "true");
    }

    MESSAGES.save(deps.storage, sequence, &message)?;
    Ok(response)
}

fn execute_relay(deps: DepsMut, sequence: u64) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let mut message = MESSAGES
        .may_load(deps.storage, sequence)?
        .ok_or(ContractError::MessageNotFound { sequence })?;

    let relay = relay_msg(&config, &message.payload)?;
    message.relay_count += 1;
    MESSAGES.save(deps.storage, sequence, &message)?;

    Ok(Response::new()
        .add_message(relay)
        .add_attribute("action", "relay")
        .add_attribute("sequence", sequence.to_string())
        .add_attribute("relay_count", message.relay_count.to_string()))
}

fn execute_receive_message(
    deps: DepsMut,
    info: MessageInfo,
    payload: Binary,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if config.counterpart.as_ref() != Some(&info.sender) {
        return Err(ContractError::NotCounterpart);
    }

    let deliver = CosmosMsg::Wasm(WasmMsg::Execute {
        contract_addr: config.bridge.to_string(),
        msg: payload,
        funds: vec![],
    });

    Ok(Response::new()
        .add_message(deliver)
        .add_attribute("action", "receive_message")
        .add_attribute("bridge", config.bridge))
}

fn relay_msg(config: &Config, payload: &Binary) -> Result<CosmosMsg, ContractError> {
    let counterpart = config
        .counterpart
        .as_ref()
        .ok_or(ContractError::CounterpartNotSet)?;
    Ok(CosmosMsg::Wasm(WasmMsg::Execute {
        contract_addr: counterpart.to_string(),
        msg: to_json_binary(&ExecuteMsg::ReceiveMessage {
            payload: payload.clone(),
        })?,
        funds: vec![],
    }))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => to_json_binary(&query_config(deps)?),
        QueryMsg::Message { sequence } => to_json_binary(&query_message(deps, sequence)?),
        QueryMsg::NextSequence {} => to_json_binary(&query_next_sequence(deps)?),
    }
}

fn query_config(deps: Deps) -> StdResult<ConfigResponse> {
    let config = CONFIG.load(deps.storage)?;
    Ok(ConfigResponse {
        admin: config.admin,
        bridge: config.bridge,
        counterpart: config.counterpart,
        auto_relay: config.auto_relay,
    })
}

fn query_message(deps: Deps, sequence: u64) -> StdResult<Option<MessageResponse>> {
    Ok(MESSAGES
        .may_load(deps.storage, sequence)?
        .map(|message| MessageResponse {
            sequence,
            payload: message.payload,
            sent_at: message.sent_at,
            relay_count: message.relay_count,
        }))
}

fn query_next_sequence(deps: Deps) -> StdResult<SequenceResponse> {
    let sequence = NEXT_SEQUENCE.load(deps.storage)?;
    Ok(SequenceResponse { sequence })
}
