//! Bonded Bridge Contract - Fast Cross-Chain Transfers Backed by Bonders
//!
//! Users send the bridged asset on an origin chain; liquidity providers
//! ("bonders") front the payout on the destination chain and are made whole
//! once the canonical, slow cross-domain message arrives.
//!
//! # Outgoing Flow (origin)
//! 1. `Send` escrows funds and appends a TransferId to the pending batch
//! 2. `CommitTransfers` seals the batch into a Merkle root
//! 3. The root is confirmed on the hub through the cross-domain connector
//!
//! # Bonding Flow (hub)
//! 1. A bonder may `BondTransferRoot` before the confirmation arrives
//! 2. Anyone may `ChallengeTransferBond` within the challenge period
//! 3. `ResolveChallenge` rewards whichever side was right
//!
//! # Incoming Flow (destination)
//! 1. A bonder fronts a transfer with `BondWithdrawal`, or
//! 2. anyone proves it against a set root with `Withdraw`
//! 3. `SettleBondedWithdrawal(s)` returns fronted liquidity to the bonder
//!
//! # Security
//! - Every bond reserves total + challenge stake from the bonder's credit
//! - Per time slot bond limit
//! - Each TransferId is paid at most once
//! - Cross-domain messages are accepted only from registered connectors
//! - Emergency pause and timelocked admin transfer

pub mod accounting;
pub mod contract;
pub mod error;
mod execute;
pub mod hash;
pub mod merkle;
pub mod messenger;
pub mod msg;
mod query;
pub mod state;

pub use crate::error::ContractError;
pub use crate::hash::{compute_transfer_id, compute_transfer_root_id, keccak256};
