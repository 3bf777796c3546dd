//! Hash computation for transfer identity
//!
//! Every chain running the bridge derives the same TransferId for the same
//! transfer, so the encoding below is fixed and position sensitive.
//!
//! # TransferId byte layout (288 bytes, nine 32-byte words)
//! - Word 0: origin_chain_id (uint256, big-endian, left-padded)
//! - Word 1: destination_chain_id (uint256)
//! - Word 2: keccak256(sender)
//! - Word 3: keccak256(recipient)
//! - Word 4: amount (uint256)
//! - Word 5: transfer_nonce (uint256)
//! - Word 6: bonder_fee (uint256)
//! - Word 7: amount_out_min (uint256)
//! - Word 8: deadline (uint256)
//!
//! # TransferRootId byte layout (64 bytes)
//! - Bytes 0-31:  root_hash
//! - Bytes 32-63: total_amount (uint256)

use cosmwasm_std::{Binary, Uint128};
use tiny_keccak::{Hasher, Keccak};

use crate::error::ContractError;
use crate::state::Transfer;

/// Compute keccak256 hash of arbitrary data
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut output = [0u8; 32];
    hasher.finalize(&mut output);
    output
}

/// Compute the TransferId of a transfer
pub fn compute_transfer_id(transfer: &Transfer) -> [u8; 32] {
    let mut data = [0u8; 288];

    write_u64(&mut data[0..32], transfer.origin_chain_id);
    write_u64(&mut data[32..64], transfer.destination_chain_id);
    data[64..96].copy_from_slice(&keccak256(transfer.sender.as_bytes()));
    data[96..128].copy_from_slice(&keccak256(transfer.recipient.as_bytes()));
    write_u128(&mut data[128..160], transfer.amount.u128());
    write_u64(&mut data[160..192], transfer.transfer_nonce);
    write_u128(&mut data[192..224], transfer.bonder_fee.u128());
    write_u128(&mut data[224..256], transfer.amount_out_min.u128());
    write_u64(&mut data[256..288], transfer.deadline);

    keccak256(&data)
}

/// Compute the TransferRootId binding a root hash to its total amount
pub fn compute_transfer_root_id(root_hash: &[u8; 32], total_amount: Uint128) -> [u8; 32] {
    let mut data = [0u8; 64];
    data[0..32].copy_from_slice(root_hash);
    write_u128(&mut data[32..64], total_amount.u128());
    keccak256(&data)
}

/// Convert 32-byte hash to hex string (for attributes/logging)
pub fn bytes32_to_hex(bytes: &[u8; 32]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Parse a 32-byte hash from a message field
pub fn parse_hash(value: &Binary) -> Result<[u8; 32], ContractError> {
    value
        .as_slice()
        .try_into()
        .map_err(|_| ContractError::InvalidHashLength { got: value.len() })
}

// ============================================================================
// Internal helpers
// ============================================================================

// u64 (8 bytes) goes into the last 8 bytes of the word
fn write_u64(word: &mut [u8], value: u64) {
    word[24..32].copy_from_slice(&value.to_be_bytes());
}

// u128 (16 bytes) goes into the last 16 bytes of the word
fn write_u128(word: &mut [u8], value: u128) {
    word[16..32].copy_from_slice(&value.to_be_bytes());
}
