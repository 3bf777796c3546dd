//! Common - Shared Types and Utilities for the Bonded Bridge Contracts
//!
//! This package provides the asset abstraction used by the bridge and the
//! connector capability interface every cross-domain adapter implements.

pub mod asset;
pub mod connector;

pub use asset::AssetInfo;
pub use connector::ConnectorExecuteMsg;
