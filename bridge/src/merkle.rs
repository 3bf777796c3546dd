//! Ordered binary Merkle tree over TransferIds.
//!
//! Parents are `keccak256(left || right)`, so leaf order matters. A level with
//! an odd number of nodes pairs its last node with the empty-subtree hash of
//! that depth: `default[0] = keccak256([0u8; 32])` and
//! `default[d + 1] = keccak256(default[d] || default[d])`. A single leaf is its
//! own root, and a proof for a tree of `n` leaves has `ceil(log2(n))` siblings.

use crate::hash::keccak256;

pub type Hash = [u8; 32];

fn hash_node(left: &Hash, right: &Hash) -> Hash {
    let mut data = [0u8; 64];
    data[..32].copy_from_slice(left);
    data[32..].copy_from_slice(right);
    keccak256(&data)
}

fn default_leaf() -> Hash {
    keccak256(&[0u8; 32])
}

/// Number of siblings in a proof for a tree of `total_leaves` leaves.
pub fn proof_length(total_leaves: u64) -> Option<usize> {
    total_leaves
        .checked_next_power_of_two()
        .map(|p| p.trailing_zeros() as usize)
}

/// Hash one level into the next, padding an odd tail with `default`.
fn next_level(nodes: &[Hash], default: &Hash) -> Vec<Hash> {
    nodes
        .chunks(2)
        .map(|pair| hash_node(&pair[0], pair.get(1).unwrap_or(default)))
        .collect()
}

/// Root of the ordered tree over `leaves`, `None` for an empty list.
pub fn compute_root(leaves: &[Hash]) -> Option<Hash> {
    if leaves.is_empty() {
        return None;
    }

    let mut nodes = leaves.to_vec();
    let mut default = default_leaf();
    while nodes.len() > 1 {
        nodes = next_level(&nodes, &default);
        default = hash_node(&default, &default);
    }
    Some(nodes[0])
}

/// Sibling path for the leaf at `index`, `None` if the index is out of range.
pub fn compute_proof(leaves: &[Hash], index: usize) -> Option<Vec<Hash>> {
    if index >= leaves.len() {
        return None;
    }

    let mut proof = Vec::new();
    let mut nodes = leaves.to_vec();
    let mut default = default_leaf();
    let mut position = index;
    while nodes.len() > 1 {
        let sibling = nodes.get(position ^ 1).copied().unwrap_or(default);
        proof.push(sibling);
        nodes = next_level(&nodes, &default);
        default = hash_node(&default, &default);
        position >>= 1;
    }
    Some(proof)
}

/// Check that `leaf` sits at `index` in a tree of `total_leaves` with `root`.
pub fn verify(root: &Hash, leaf: &Hash, index: u64, siblings: &[Hash], total_leaves: u64) -> bool {
    if total_leaves == 0 || index >= total_leaves {
        return false;
    }
    if proof_length(total_leaves) != Some(siblings.len()) {
        return false;
    }

    let mut computed = *leaf;
    let mut position = index;
    for sibling in siblings {
        computed = if position & 1 == 1 {
            hash_node(sibling, &computed)
        } else {
            hash_node(&computed, sibling)
        };
        position >>= 1;
    }
    computed == *root
}
