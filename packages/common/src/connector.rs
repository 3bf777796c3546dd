//! Connector capability interface.
//!
//! A connector is the per-chain-family adapter carrying bridge payloads to the
//! counterpart chain. The bridge only ever sends `SendMessage`; everything
//! chain specific (encodings, messenger contracts, proofs of delivery) lives
//! behind the connector address registered for a chain.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::Binary;

/// Execute messages every connector must accept from its bridge
#[cw_serde]
pub enum ConnectorExecuteMsg {
    /// Carry `payload` to the counterpart bridge.
    ///
    /// The payload is the JSON encoding of the bridge execute message to run
    /// on the other side. The receiving bridge authenticates it solely by the
    /// connector it arrives from.
    SendMessage { payload: Binary },
}
