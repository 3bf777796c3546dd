//! Loopback cross-domain connector.
//!
//! A pair of connectors stands in for a native messaging layer between two
//! chains. Each connector serves exactly one bridge. The bridge hands it
//! payloads with `SendMessage`; the connector relays them to its counterpart,
//! which executes them on its own bridge with itself as the sender.
//!
//! Delivery is at-least-once: a queued message can be relayed any number of
//! times, and the receiving bridge is responsible for rejecting duplicates.

pub mod contract;
pub mod error;
pub mod msg;
pub mod state;

pub use crate::error::ContractError;
