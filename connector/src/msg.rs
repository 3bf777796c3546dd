use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Binary, Timestamp};

#[cw_serde]
pub struct InstantiateMsg {
    /// Admin who sets the counterpart
    pub admin: String,
    /// Bridge served by this connector
    pub bridge: String,
    /// Relay immediately instead of waiting for `Relay`
    pub auto_relay: bool,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Admin: register the connector on the other chain (once)
    SetCounterpart { counterpart: String },
    /// Bridge: queue a payload for the counterpart's bridge.
    /// Same wire shape as `common::ConnectorExecuteMsg::SendMessage`.
    SendMessage { payload: Binary },
    /// Anyone: (re)deliver a queued message to the counterpart
    Relay { sequence: u64 },
    /// Counterpart: execute a payload on this connector's bridge
    ReceiveMessage { payload: Binary },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(ConfigResponse)]
    Config {},
    /// Returns the queued message, if any
    #[returns(Option<MessageResponse>)]
    Message { sequence: u64 },
    /// Sequence the next `SendMessage` will receive
    #[returns(SequenceResponse)]
    NextSequence {},
}

#[cw_serde]
pub struct ConfigResponse {
    pub admin: Addr,
    pub bridge: Addr,
    pub counterpart: Option<Addr>,
    pub auto_relay: bool,
}

#[cw_serde]
pub struct MessageResponse {
    pub sequence: u64,
    pub payload: Binary,
    pub sent_at: Timestamp,
    pub relay_count: u32,
}

#[cw_serde]
pub struct SequenceResponse {
    pub sequence: u64,
}
