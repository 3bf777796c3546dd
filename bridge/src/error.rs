//! Error types for the Bonded Bridge contract

use cosmwasm_std::{OverflowError, StdError, Uint128};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Overflow(#[from] OverflowError),

    // ========================================================================
    // Authorization Errors
    // ========================================================================

    #[error("Unauthorized: only admin can perform this action")]
    Unauthorized,

    #[error("Unauthorized: only pending admin can accept")]
    UnauthorizedPendingAdmin,

    #[error("Address is not bonder")]
    NotBonder,

    #[error("Address is already bonder")]
    AlreadyBonder,

    #[error("Unauthorized: sender is not the connector for chain {chain_id}")]
    UnauthorizedConnector { chain_id: u64 },

    #[error("Unauthorized: only bonder can commit before the force commit delay")]
    UnauthorizedCommit,

    // ========================================================================
    // Admin Errors
    // ========================================================================

    #[error("No pending admin change")]
    NoPendingAdmin,

    #[error("Timelock not expired: {remaining_seconds} seconds remaining")]
    TimelockNotExpired { remaining_seconds: u64 },

    #[error("Asset recovery only available when bridge is paused")]
    RecoveryNotAvailable,

    // ========================================================================
    // Bridge State Errors
    // ========================================================================

    #[error("Bridge is paused")]
    BridgePaused,

    #[error("Invalid chain ID: {chain_id}")]
    InvalidChainId { chain_id: u64 },

    #[error("Chain not supported: {chain_id}")]
    ChainNotSupported { chain_id: u64 },

    #[error("Chain already registered: {chain_id}")]
    ChainAlreadyRegistered { chain_id: u64 },

    #[error("Only available on the hub chain {hub_chain_id}")]
    NotHubChain { hub_chain_id: u64 },

    #[error("Deposits paused for chain {chain_id}")]
    DepositsPaused { chain_id: u64 },

    // ========================================================================
    // Liquidity Errors
    // ========================================================================

    #[error("Not enough available credit")]
    NotEnoughAvailableCredit,

    #[error("Bonder fee cannot exceed amount")]
    BonderFeeTooHigh,

    #[error("Invalid funds: expected {expected} {asset}, got {got}")]
    InvalidFunds {
        asset: String,
        expected: Uint128,
        got: Uint128,
    },

    #[error("Wrong asset: {got}, bridge only accepts {expected}")]
    WrongAsset { expected: String, got: String },

    #[error("Invalid amount: {reason}")]
    InvalidAmount { reason: String },

    #[error("Time slot bond limit exceeded: limit {limit}, bonded {bonded}, requested {requested}")]
    TimeSlotLimitExceeded {
        limit: Uint128,
        bonded: Uint128,
        requested: Uint128,
    },

    // ========================================================================
    // Transfer Root Errors
    // ========================================================================

    #[error("TransferRoot has already been confirmed")]
    RootAlreadyConfirmedForBond,

    #[error("TransferRoot has already been bonded")]
    RootAlreadyBonded,

    #[error("TransferRoot already confirmed")]
    RootAlreadyConfirmed,

    #[error("Transfer root already set")]
    RootAlreadySet,

    #[error("TransferRoot not found")]
    RootNotFound,

    #[error("Withdrawal exceeds TransferRoot total")]
    ExceedsRootTotal,

    #[error("Invalid commit time: committed_at must be positive")]
    InvalidCommitTime,

    // ========================================================================
    // Challenge Errors
    // ========================================================================

    #[error("TransferRoot has not been bonded")]
    BondNotFound,

    #[error("TransferRoot cannot be challenged after it has been confirmed")]
    ChallengeAfterConfirm,

    #[error("TransferRoot cannot be challenged after challenge period")]
    ChallengePeriodEnded,

    #[error("TransferRoot already challenged")]
    AlreadyChallenged,

    #[error("TransferRoot has not been challenged")]
    NotChallenged,

    #[error("TransferRoot already resolved")]
    AlreadyResolved,

    #[error("Challenge resolution period has not ended: {remaining_seconds} seconds remaining")]
    ResolutionPeriodNotEnded { remaining_seconds: u64 },

    // ========================================================================
    // Withdrawal Errors
    // ========================================================================

    #[error("Invalid transfer proof")]
    InvalidTransferProof,

    #[error("The transfer has already been withdrawn")]
    TransferSpent,

    #[error("Withdrawal has already been bonded")]
    WithdrawalAlreadyBonded,

    #[error("transferId has no bond")]
    NoBond,

    #[error("Transfer is not destined for this chain: {chain_id}")]
    WrongDestination { chain_id: u64 },

    // ========================================================================
    // Rescue Errors
    // ========================================================================

    #[error("TransferRoot cannot be rescued: {reason}")]
    RescueNotAllowed { reason: String },

    #[error("Rescue delay not elapsed: {remaining_seconds} seconds remaining")]
    RescueDelayNotElapsed { remaining_seconds: u64 },

    // ========================================================================
    // Validation Errors
    // ========================================================================

    #[error("Invalid hash length: expected 32 bytes, got {got}")]
    InvalidHashLength { got: usize },

    #[error("Invalid config: {reason}")]
    InvalidConfig { reason: String },

    #[error("Unknown receive hook message")]
    InvalidReceiveMsg,
}
