use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Binary, Timestamp};
use cw_storage_plus::{Item, Map};

pub const CONTRACT_NAME: &str = "crates.io:bridge-connector";
pub const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[cw_serde]
pub struct Config {
    /// May set the counterpart once
    pub admin: Addr,
    /// The only contract allowed to send, and the target of delivered payloads
    pub bridge: Addr,
    /// Connector on the other chain, set after both sides are deployed
    pub counterpart: Option<Addr>,
    /// Relay every message as part of the `SendMessage` that queued it
    pub auto_relay: bool,
}

#[cw_serde]
pub struct QueuedMessage {
    pub payload: Binary,
    pub sent_at: Timestamp,
    /// Times this message has been relayed
    pub relay_count: u32,
}

pub const CONFIG: Item<Config> = Item::new("config");

pub const NEXT_SEQUENCE: Item<u64> = Item::new("next_sequence");

/// sequence => message sent by the bridge
pub const MESSAGES: Map<u64, QueuedMessage> = Map::new("messages");
