//! Message types for the Bonded Bridge contract
//!
//! Hashes (TransferIds, root hashes, TransferRootIds) travel as `Binary` and
//! must be exactly 32 bytes.

use common::AssetInfo;
use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Binary, Timestamp, Uint128};

use crate::state::{BondStatus, Transfer};

// ============================================================================
// Instantiate & Migrate
// ============================================================================

/// Migrate message
#[cw_serde]
pub struct MigrateMsg {}

/// Instantiate message
///
/// Every `Option` parameter falls back to its default when omitted.
#[cw_serde]
pub struct InstantiateMsg {
    /// Admin address for contract management
    pub admin: String,
    /// Chain id of this chain
    pub chain_id: u64,
    /// Chain id of the chain running the root-bonding engine
    pub hub_chain_id: u64,
    /// Asset bridged by this instance
    pub asset: AssetInfo,
    /// Initially registered bonders
    pub bonders: Vec<String>,
    /// Default: 1 day
    pub challenge_period: Option<u64>,
    /// Default: 10 days
    pub challenge_resolution_period: Option<u64>,
    /// Default: 15 minutes
    pub min_transfer_root_bond_delay: Option<u64>,
    /// Default: 8 weeks
    pub rescue_delay: Option<u64>,
    /// Default: 10 (challenge stake of 10%)
    pub challenge_amount_divisor: Option<u64>,
    /// Default: 0 (unlimited)
    pub time_slot_bond_limit: Option<Uint128>,
    /// Default: 128
    pub max_pending_transfers: Option<u32>,
    /// Default: 4 hours
    pub minimum_force_commit_delay: Option<u64>,
}

// ============================================================================
// Execute Messages
// ============================================================================

/// Execute messages
#[cw_serde]
pub enum ExecuteMsg {
    // ========================================================================
    // Outgoing Transfers (origin)
    // ========================================================================
    /// Send native funds to another chain. Attached funds must equal `amount`.
    Send {
        destination_chain_id: u64,
        recipient: String,
        amount: Uint128,
        bonder_fee: Uint128,
        amount_out_min: Uint128,
        deadline: u64,
    },

    /// CW20 entry point for `Send`, `Stake`, `ChallengeTransferBond` and
    /// `BondWithdrawal`. See [`ReceiveMsg`].
    Receive(cw20::Cw20ReceiveMsg),

    /// Seal the pending batch for a destination into a TransferRoot.
    ///
    /// Authorization: any bonder, or anyone once the force commit delay has
    /// passed since the last commit.
    CommitTransfers { destination_chain_id: u64 },

    // ========================================================================
    // Root Bonding (hub)
    // ========================================================================
    /// Vouch for a committed root before its confirmation arrives
    BondTransferRoot {
        root_hash: Binary,
        destination_chain_id: u64,
        total_amount: Uint128,
    },

    /// Canonical confirmation of a committed root.
    ///
    /// Authorization: connector registered for `origin_chain_id`
    ConfirmTransferRoot {
        origin_chain_id: u64,
        root_hash: Binary,
        destination_chain_id: u64,
        total_amount: Uint128,
        committed_at: u64,
    },

    /// Dispute a bond. Native funds equal to the challenge amount must be attached.
    ChallengeTransferBond {
        root_hash: Binary,
        total_amount: Uint128,
        destination_chain_id: u64,
    },

    /// Settle a challenge once the resolution period has passed
    ResolveChallenge {
        root_hash: Binary,
        total_amount: Uint128,
        destination_chain_id: u64,
    },

    // ========================================================================
    // Withdrawals (destination)
    // ========================================================================
    /// Make a root available for withdrawals.
    ///
    /// Authorization: connector registered for the hub chain
    SetTransferRoot {
        root_hash: Binary,
        total_amount: Uint128,
    },

    /// Front a transfer to its recipient before the root arrives.
    /// Attached funds must equal `amount - bonder_fee`.
    BondWithdrawal { transfer: Transfer },

    /// Withdraw a transfer by Merkle proof against a set root
    Withdraw {
        transfer: Transfer,
        root_hash: Binary,
        root_total_amount: Uint128,
        merkle_index: u64,
        proof: Vec<Binary>,
        total_leaves: u64,
    },

    /// Settle a single bonded withdrawal by Merkle proof
    SettleBondedWithdrawal {
        bonder: String,
        transfer_id: Binary,
        root_hash: Binary,
        root_total_amount: Uint128,
        merkle_index: u64,
        proof: Vec<Binary>,
        total_leaves: u64,
    },

    /// Settle every withdrawal `bonder` fronted from a full leaf list
    SettleBondedWithdrawals {
        bonder: String,
        transfer_ids: Vec<Binary>,
        total_amount: Uint128,
    },

    // ========================================================================
    // Ledger
    // ========================================================================
    /// Deposit stake as credit for a registered bonder (native funds)
    Stake { bonder: String },

    /// Withdraw available credit to the caller
    Unstake { amount: Uint128 },

    // ========================================================================
    // Governance
    // ========================================================================
    /// Recover the bond of a root whose confirmation never arrived
    RescueTransferRoot {
        root_hash: Binary,
        total_amount: Uint128,
        origin_chain_id: u64,
        recipient: Option<String>,
    },

    AddBonder { bonder: String },
    RemoveBonder { bonder: String },

    /// Register a counterpart chain
    RegisterChain {
        chain_id: u64,
        identifier: String,
        connector: Option<String>,
    },
    UnregisterChain { chain_id: u64 },
    SetXDomainConnector { chain_id: u64, connector: String },
    SetChainIdDepositsPaused { chain_id: u64, paused: bool },

    /// Must be a multiple of the time slot size
    SetChallengePeriod { challenge_period: u64 },
    SetChallengeResolutionPeriod { challenge_resolution_period: u64 },
    SetMinTransferRootBondDelay { min_transfer_root_bond_delay: u64 },
    SetChallengeAmountDivisor { challenge_amount_divisor: u64 },
    SetTimeSlotBondLimit { time_slot_bond_limit: Uint128 },
    SetRescueDelay { rescue_delay: u64 },
    SetMaxPendingTransfers { max_pending_transfers: u32 },
    SetMinimumForceCommitDelay { minimum_force_commit_delay: u64 },

    // ========================================================================
    // Admin Operations
    // ========================================================================
    /// Pause the bridge (stops sends, bonds, withdrawals and ledger moves)
    Pause {},
    Unpause {},

    /// Propose new admin (starts 7-day timelock)
    ProposeAdmin { new_admin: String },
    AcceptAdmin {},
    CancelAdminProposal {},

    /// Recover stuck assets (only when paused)
    RecoverAsset {
        asset: AssetInfo,
        amount: Uint128,
        recipient: String,
    },
}

/// CW20 receive hook messages
#[cw_serde]
pub enum ReceiveMsg {
    Send {
        destination_chain_id: u64,
        recipient: String,
        bonder_fee: Uint128,
        amount_out_min: Uint128,
        deadline: u64,
    },
    Stake {
        bonder: String,
    },
    ChallengeTransferBond {
        root_hash: Binary,
        total_amount: Uint128,
        destination_chain_id: u64,
    },
    BondWithdrawal {
        transfer: Transfer,
    },
}

// ============================================================================
// Query Messages
// ============================================================================

/// Query messages
#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    // ========================================================================
    // Core Queries
    // ========================================================================
    #[returns(ConfigResponse)]
    Config {},

    #[returns(StatusResponse)]
    Status {},

    #[returns(StatsResponse)]
    Stats {},

    #[returns(ChainResponse)]
    Chain { chain_id: u64 },

    #[returns(ChainsResponse)]
    Chains {
        start_after: Option<u64>,
        limit: Option<u32>,
    },

    #[returns(Option<PendingAdminResponse>)]
    PendingAdmin {},

    // ========================================================================
    // Bonders & Ledger
    // ========================================================================
    #[returns(BondersResponse)]
    Bonders {
        start_after: Option<String>,
        limit: Option<u32>,
    },

    /// Registered and holding at least `required_credit` available
    #[returns(IsBonderAllowedResponse)]
    IsBonderAllowed {
        address: String,
        required_credit: Uint128,
    },

    #[returns(AmountResponse)]
    Credit { address: String },

    #[returns(AmountResponse)]
    RawDebit { address: String },

    /// raw_debit + additional_debit
    #[returns(AmountResponse)]
    DebitAndAdditionalDebit { address: String },

    #[returns(AmountResponse)]
    AvailableCredit { address: String },

    #[returns(LedgerResponse)]
    Ledger { address: String },

    // ========================================================================
    // Outgoing Transfers
    // ========================================================================
    #[returns(PendingTransfersResponse)]
    PendingTransfers { destination_chain_id: u64 },

    #[returns(LastCommitTimeResponse)]
    LastCommitTime { destination_chain_id: u64 },

    #[returns(Option<SentTransferResponse>)]
    SentTransfer { nonce: u64 },

    #[returns(NonceResponse)]
    CurrentNonce {},

    // ========================================================================
    // Roots & Bonds
    // ========================================================================
    #[returns(Option<TransferRootResponse>)]
    TransferRoot {
        root_hash: Binary,
        total_amount: Uint128,
    },

    #[returns(Option<ConfirmedRootResponse>)]
    ConfirmedTransferRoot {
        root_hash: Binary,
        total_amount: Uint128,
    },

    #[returns(Option<TransferBondResponse>)]
    TransferBond {
        root_hash: Binary,
        total_amount: Uint128,
    },

    #[returns(TimeSlotResponse)]
    TimeSlot { time: u64 },

    #[returns(AmountResponse)]
    AmountBondedInTimeSlot { time_slot: u64 },

    #[returns(AmountResponse)]
    ChallengeAmount { total_amount: Uint128 },

    #[returns(AmountResponse)]
    BondAmount { total_amount: Uint128 },

    // ========================================================================
    // Withdrawals
    // ========================================================================
    #[returns(IsTransferSpentResponse)]
    IsTransferSpent { transfer_id: Binary },

    #[returns(Option<BondedWithdrawalResponse>)]
    BondedWithdrawal { transfer_id: Binary },

    // ========================================================================
    // Hash & Merkle Helpers
    // ========================================================================
    #[returns(ComputeHashResponse)]
    ComputeTransferId { transfer: Transfer },

    #[returns(ComputeHashResponse)]
    ComputeTransferRootId {
        root_hash: Binary,
        total_amount: Uint128,
    },

    /// Root over the ordered TransferIds
    #[returns(ComputeHashResponse)]
    ComputeMerkleRoot { transfer_ids: Vec<Binary> },

    /// Sibling path for `transfer_ids[index]`
    #[returns(MerkleProofResponse)]
    ComputeMerkleProof {
        transfer_ids: Vec<Binary>,
        index: u64,
    },
}

// ============================================================================
// Response Types - Core
// ============================================================================

#[cw_serde]
pub struct ConfigResponse {
    pub admin: Addr,
    pub paused: bool,
    pub chain_id: u64,
    pub hub_chain_id: u64,
    pub asset: AssetInfo,
    pub challenge_period: u64,
    pub challenge_resolution_period: u64,
    pub min_transfer_root_bond_delay: u64,
    pub rescue_delay: u64,
    pub challenge_amount_divisor: u64,
    pub time_slot_bond_limit: Uint128,
    pub max_pending_transfers: u32,
    pub minimum_force_commit_delay: u64,
}

#[cw_serde]
pub struct StatusResponse {
    pub paused: bool,
    pub bonder_count: u32,
    pub registered_chains: u32,
    /// Amount of the bridged asset held by this contract
    pub balance: Uint128,
}

#[cw_serde]
pub struct StatsResponse {
    pub transfers_sent: u64,
    pub roots_committed: u64,
    pub roots_confirmed: u64,
    pub roots_bonded: u64,
    pub challenges: u64,
    pub withdrawals: u64,
    pub bonded_withdrawals: u64,
    pub amount_burned: Uint128,
    pub amount_rescued: Uint128,
}

#[cw_serde]
pub struct ChainResponse {
    pub chain_id: u64,
    pub identifier: String,
    pub connector: Option<Addr>,
    pub deposits_paused: bool,
}

#[cw_serde]
pub struct ChainsResponse {
    pub chains: Vec<ChainResponse>,
}

#[cw_serde]
pub struct PendingAdminResponse {
    pub new_address: Addr,
    pub execute_after: Timestamp,
}

// ============================================================================
// Response Types - Bonders & Ledger
// ============================================================================

#[cw_serde]
pub struct BondersResponse {
    pub bonders: Vec<Addr>,
}

#[cw_serde]
pub struct IsBonderAllowedResponse {
    pub allowed: bool,
}

#[cw_serde]
pub struct AmountResponse {
    pub amount: Uint128,
}

#[cw_serde]
pub struct LedgerResponse {
    pub address: Addr,
    pub credit: Uint128,
    pub raw_debit: Uint128,
    pub additional_debit: Uint128,
    pub available_credit: Uint128,
}

// ============================================================================
// Response Types - Transfers
// ============================================================================

#[cw_serde]
pub struct PendingTransfersResponse {
    pub destination_chain_id: u64,
    pub transfer_ids: Vec<Binary>,
    pub pending_amount: Uint128,
}

#[cw_serde]
pub struct LastCommitTimeResponse {
    pub destination_chain_id: u64,
    /// 0 if the batch was never committed
    pub last_commit_time: u64,
}

#[cw_serde]
pub struct SentTransferResponse {
    pub transfer: Transfer,
    pub transfer_id: Binary,
    pub sent_at: Timestamp,
}

#[cw_serde]
pub struct NonceResponse {
    pub nonce: u64,
}

// ============================================================================
// Response Types - Roots & Bonds
// ============================================================================

#[cw_serde]
pub struct TransferRootResponse {
    pub transfer_root_id: Binary,
    pub root_hash: Binary,
    pub total_amount: Uint128,
    pub amount_withdrawn: Uint128,
    pub created_at: u64,
}

#[cw_serde]
pub struct ConfirmedRootResponse {
    pub transfer_root_id: Binary,
    pub root_hash: Binary,
    pub total_amount: Uint128,
    pub origin_chain_id: u64,
    pub destination_chain_id: u64,
    pub committed_at: u64,
    pub confirmed_at: u64,
}

#[cw_serde]
pub struct TransferBondResponse {
    pub transfer_root_id: Binary,
    pub bonder: Addr,
    pub bonded_at: u64,
    pub total_amount: Uint128,
    pub bond_amount: Uint128,
    pub destination_chain_id: u64,
    pub challenge_start_time: Option<u64>,
    pub challenger: Option<Addr>,
    pub challenge_amount: Option<Uint128>,
    pub status: BondStatus,
}

#[cw_serde]
pub struct TimeSlotResponse {
    pub time_slot: u64,
}

// ============================================================================
// Response Types - Withdrawals
// ============================================================================

#[cw_serde]
pub struct IsTransferSpentResponse {
    pub transfer_id: Binary,
    pub spent: bool,
}

#[cw_serde]
pub struct BondedWithdrawalResponse {
    pub transfer_id: Binary,
    pub bonder: Addr,
    pub amount: Uint128,
}

// ============================================================================
// Response Types - Hash Helpers
// ============================================================================

#[cw_serde]
pub struct ComputeHashResponse {
    pub hash: Binary,
}

#[cw_serde]
pub struct MerkleProofResponse {
    pub root: Binary,
    pub proof: Vec<Binary>,
    pub total_leaves: u64,
}
