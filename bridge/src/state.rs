//! State definitions for the Bonded Bridge contract
//!
//! Storage is keyed by the identifiers the protocol uses on every chain:
//! TransferIds and TransferRootIds (32-byte keccak hashes stored as `&[u8]`),
//! destination chain ids for pending batches, and addresses for the ledger.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, OverflowError, Timestamp, Uint128};
use cw_storage_plus::{Item, Map};

use common::AssetInfo;

// ============================================================================
// Core Configuration
// ============================================================================

/// Contract configuration
#[cw_serde]
pub struct Config {
    /// Admin address for contract management
    pub admin: Addr,
    /// Whether the bridge is currently paused
    pub paused: bool,
    /// Chain id of the chain this instance is deployed on
    pub chain_id: u64,
    /// Chain id of the chain running the root-bonding engine
    pub hub_chain_id: u64,
    /// The single asset this instance bridges
    pub asset: AssetInfo,
    /// Seconds after bonding during which a bond may be challenged
    pub challenge_period: u64,
    /// Seconds after a challenge before it may be resolved
    pub challenge_resolution_period: u64,
    /// A bond placed later than `committed_at` + this delay earns the challenge stake on a failed challenge
    pub min_transfer_root_bond_delay: u64,
    /// Seconds after bonding before an unconfirmed root may be rescued
    pub rescue_delay: u64,
    /// challenge_amount = total / divisor
    pub challenge_amount_divisor: u64,
    /// Maximum bonded per time slot (0 = unlimited)
    pub time_slot_bond_limit: Uint128,
    /// Pending batch length that triggers an automatic commit
    pub max_pending_transfers: u32,
    /// Seconds after the last commit before anyone may commit a batch
    pub minimum_force_commit_delay: u64,
}

impl Config {
    pub fn challenge_amount(&self, total_amount: Uint128) -> Uint128 {
        total_amount / Uint128::from(self.challenge_amount_divisor)
    }

    pub fn bond_amount(&self, total_amount: Uint128) -> Result<Uint128, OverflowError> {
        total_amount.checked_add(self.challenge_amount(total_amount))
    }
}

/// Pending admin change proposal
#[cw_serde]
pub struct PendingAdmin {
    /// Proposed new admin address
    pub new_address: Addr,
    /// Block time when the change can be executed
    pub execute_after: Timestamp,
}

/// Registered counterpart chain
#[cw_serde]
pub struct ChainConfig {
    pub chain_id: u64,
    /// Human-readable identifier (e.g. "optimism")
    pub identifier: String,
    /// Cross-domain connector carrying messages to and from this chain
    pub connector: Option<Addr>,
    /// Whether sends towards this chain are paused
    pub deposits_paused: bool,
}

/// Bridge statistics
#[cw_serde]
#[derive(Default)]
pub struct Stats {
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

// ============================================================================
// Transfers
// ============================================================================

/// A single cross-chain transfer. Its keccak encoding is the TransferId.
#[cw_serde]
pub struct Transfer {
    pub origin_chain_id: u64,
    pub destination_chain_id: u64,
    /// Sender on the origin chain
    pub sender: String,
    /// Recipient on the destination chain
    pub recipient: String,
    pub amount: Uint128,
    pub transfer_nonce: u64,
    pub bonder_fee: Uint128,
    /// Carried in the id, never interpreted here
    pub amount_out_min: Uint128,
    /// Carried in the id, never interpreted here
    pub deadline: u64,
}

/// Record of an outgoing transfer, kept for relayers and bonders
#[cw_serde]
pub struct SentTransfer {
    pub transfer: Transfer,
    pub transfer_id: [u8; 32],
    pub sent_at: Timestamp,
}

/// A withdrawal fronted by a bonder before its root arrived
#[cw_serde]
pub struct BondedWithdrawal {
    pub bonder: Addr,
    pub amount: Uint128,
}

// ============================================================================
// Transfer Roots
// ============================================================================

/// Root available for withdrawals on the destination chain
#[cw_serde]
pub struct TransferRoot {
    pub root_hash: [u8; 32],
    pub total_amount: Uint128,
    pub amount_withdrawn: Uint128,
    pub created_at: u64,
}

/// Canonical confirmation of a committed root, recorded on the hub
#[cw_serde]
pub struct ConfirmedRoot {
    pub root_hash: [u8; 32],
    pub total_amount: Uint128,
    pub origin_chain_id: u64,
    pub destination_chain_id: u64,
    pub committed_at: u64,
    pub confirmed_at: u64,
}

#[cw_serde]
pub enum BondStatus {
    /// Bonded and awaiting confirmation
    Bonded,
    /// Matching confirmation arrived before any challenge
    Confirmed,
    /// Challenged and awaiting resolution
    Challenged,
    ChallengeSucceeded,
    ChallengeFailed,
    /// Recovered by governance after the rescue delay
    Rescued,
}

impl BondStatus {
    pub fn is_resolved(&self) -> bool {
        matches!(
            self,
            BondStatus::ChallengeSucceeded | BondStatus::ChallengeFailed
        )
    }
}

impl std::fmt::Display for BondStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BondStatus::Bonded => "bonded",
            BondStatus::Confirmed => "confirmed",
            BondStatus::Challenged => "challenged",
            BondStatus::ChallengeSucceeded => "challenge_succeeded",
            BondStatus::ChallengeFailed => "challenge_failed",
            BondStatus::Rescued => "rescued",
        };
        write!(f, "{}", s)
    }
}

/// A bonder's speculative vouching for a root on the hub
#[cw_serde]
pub struct TransferBond {
    pub bonder: Addr,
    pub bonded_at: u64,
    pub total_amount: Uint128,
    /// total + challenge amount, reserved from the bonder's credit
    pub bond_amount: Uint128,
    pub destination_chain_id: u64,
    pub challenge_start_time: Option<u64>,
    pub challenger: Option<Addr>,
    /// Stake the challenger actually paid
    pub challenge_amount: Option<Uint128>,
    pub status: BondStatus,
}

/// Per-address accounting entry
#[cw_serde]
#[derive(Default)]
pub struct BonderLedger {
    pub credit: Uint128,
    pub raw_debit: Uint128,
    pub additional_debit: Uint128,
}

// ============================================================================
// Constants
// ============================================================================

/// Contract name for cw2 migration info
pub const CONTRACT_NAME: &str = "crates.io:bonded-bridge";

/// Contract version for cw2 migration info
pub const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// 7 days in seconds for admin change timelock
pub const ADMIN_TIMELOCK_DURATION: u64 = 604_800;

/// Time slot size in seconds (4 hours)
pub const TIME_SLOT_SIZE: u64 = 14_400;

pub const DEFAULT_CHALLENGE_PERIOD: u64 = 86_400;
pub const DEFAULT_CHALLENGE_RESOLUTION_PERIOD: u64 = 864_000;
pub const DEFAULT_MIN_TRANSFER_ROOT_BOND_DELAY: u64 = 900;
/// 8 weeks
pub const DEFAULT_RESCUE_DELAY: u64 = 4_838_400;
pub const DEFAULT_CHALLENGE_AMOUNT_DIVISOR: u64 = 10;
pub const DEFAULT_MAX_PENDING_TRANSFERS: u32 = 128;
pub const DEFAULT_MINIMUM_FORCE_COMMIT_DELAY: u64 = 14_400;

// ============================================================================
// Core State Storage
// ============================================================================

/// Primary config storage
pub const CONFIG: Item<Config> = Item::new("config");

/// Pending admin proposal (if any)
pub const PENDING_ADMIN: Item<PendingAdmin> = Item::new("pending_admin");

/// Bridge statistics
pub const STATS: Item<Stats> = Item::new("stats");

/// Registered counterpart chains
pub const CHAINS: Map<u64, ChainConfig> = Map::new("chains");

// ============================================================================
// Bonder Registry & Ledger
// ============================================================================

/// Key: bonder address, Value: whether registered
pub const BONDERS: Map<&Addr, bool> = Map::new("bonders");

pub const BONDER_COUNT: Item<u32> = Item::new("bonder_count");

/// Credit and debit per address (bonders and challengers)
pub const LEDGER: Map<&Addr, BonderLedger> = Map::new("ledger");

// ============================================================================
// Outgoing Transfers (origin side)
// ============================================================================

/// Outgoing nonce counter
pub const OUTGOING_NONCE: Item<u64> = Item::new("outgoing_nonce");

/// Key: destination chain id, Value: TransferIds awaiting commit in send order
pub const PENDING_TRANSFER_IDS: Map<u64, Vec<[u8; 32]>> = Map::new("pending_transfer_ids");

/// Key: destination chain id, Value: summed amount of the pending batch
pub const PENDING_AMOUNT: Map<u64, Uint128> = Map::new("pending_amount");

/// Key: destination chain id, Value: block time of the last commit
pub const LAST_COMMIT_TIME: Map<u64, u64> = Map::new("last_commit_time");

/// Key: nonce, Value: SentTransfer
pub const SENT_TRANSFERS: Map<u64, SentTransfer> = Map::new("sent_transfers");

// ============================================================================
// Root Bonding (hub side)
// ============================================================================

/// Key: TransferRootId, Value: ConfirmedRoot
pub const CONFIRMED_ROOTS: Map<&[u8], ConfirmedRoot> = Map::new("confirmed_roots");

/// Key: TransferRootId, Value: TransferBond
pub const TRANSFER_BONDS: Map<&[u8], TransferBond> = Map::new("transfer_bonds");

/// Key: time slot, Value: total bond amount outstanding in that slot
pub const TIME_SLOT_BONDED: Map<u64, Uint128> = Map::new("time_slot_bonded");

// ============================================================================
// Withdrawals (destination side)
// ============================================================================

/// Key: TransferRootId, Value: TransferRoot
pub const TRANSFER_ROOTS: Map<&[u8], TransferRoot> = Map::new("transfer_roots");

/// Key: TransferId, Value: BondedWithdrawal
pub const BONDED_WITHDRAWALS: Map<&[u8], BondedWithdrawal> = Map::new("bonded_withdrawals");

/// Key: TransferId, Value: true once paid by either path
pub const SPENT_TRANSFERS: Map<&[u8], bool> = Map::new("spent_transfers");

/// Time slot a timestamp falls into
pub fn time_slot(time: u64) -> u64 {
    time / TIME_SLOT_SIZE
}
