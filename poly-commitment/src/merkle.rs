//! A binary Merkle tree over byte leaves, hashed with Blake2b-256.
//!
//! Leaves and inner nodes are domain separated:
//! `leaf = H(0x00 || bytes)` and `node = H(0x01 || left || right)`.

use crate::error::CommitmentError;
use ark_ff::PrimeField;
use blake2::Digest as _;
use placeholder_transcript::{Blake2b256, Digest};
use placeholder_utils::FieldHelpers;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

const LEAF_PREFIX: u8 = 0x00;
const NODE_PREFIX: u8 = 0x01;

fn hash_leaf(leaf: &[u8]) -> Digest {
    let mut hasher = Blake2b256::new();
    hasher.update([LEAF_PREFIX]);
    hasher.update(leaf);
    hasher.finalize().into()
}

fn hash_node(left: &Digest, right: &Digest) -> Digest {
    let mut hasher = Blake2b256::new();
    hasher.update([NODE_PREFIX]);
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}

/// Serializes a leaf made of value pairs, one pair per committed polynomial.
pub fn leaf_bytes<F: PrimeField>(pairs: &[[F; 2]]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(pairs.len() * 2 * F::size_in_bytes());
    for [a, b] in pairs {
        bytes.extend(a.to_bytes_be());
        bytes.extend(b.to_bytes_be());
    }
    bytes
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MerkleTree {
    /// `layers[0]` holds the leaf hashes and the last layer holds the root.
    layers: Vec<Vec<Digest>>,
}

impl MerkleTree {
    /// Builds the tree, hashing the leaves in parallel.
    pub fn build(leaves: &[Vec<u8>]) -> Result<Self, CommitmentError> {
        if leaves.is_empty() || !leaves.len().is_power_of_two() {
            return Err(CommitmentError::LeafCount(leaves.len()));
        }

        let mut layers = vec![leaves
            .par_iter()
            .map(|leaf| hash_leaf(leaf))
            .collect::<Vec<_>>()];

        while layers[layers.len() - 1].len() > 1 {
            let next = layers[layers.len() - 1]
                .par_chunks(2)
                .map(|pair| hash_node(&pair[0], &pair[1]))
                .collect();
            layers.push(next);
        }

        Ok(Self { layers })
    }

    pub fn root(&self) -> Digest {
        self.layers[self.layers.len() - 1][0]
    }

    pub fn leaves_count(&self) -> usize {
        self.layers[0].len()
    }

    /// The authentication path of the leaf at `index`.
    pub fn proof(&self, index: usize) -> Result<MerklePath, CommitmentError> {
        if index >= self.leaves_count() {
            return Err(CommitmentError::LeafOutOfRange {
                index,
                leaves: self.leaves_count(),
            });
        }

        let mut siblings = Vec::with_capacity(self.layers.len() - 1);
        let mut position = index;
        for layer in &self.layers[..self.layers.len() - 1] {
            siblings.push(layer[position ^ 1]);
            position >>= 1;
        }

        Ok(MerklePath { index, siblings })
    }
}

/// Opening of a single leaf.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerklePath {
    pub index: usize,
    pub siblings: Vec<Digest>,
}

impl MerklePath {
    /// Recomputes the root from `leaf` and compares it with `root`.
    pub fn validate(&self, leaf: &[u8], root: &Digest) -> bool {
        if self.siblings.len() >= usize::BITS as usize || self.index >> self.siblings.len() != 0 {
            return false;
        }

        let mut position = self.index;
        let mut acc = hash_leaf(leaf);
        for sibling in &self.siblings {
            acc = if position & 1 == 0 {
                hash_node(&acc, sibling)
            } else {
                hash_node(sibling, &acc)
            };
            position >>= 1;
        }

        &acc == root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaves(n: usize) -> Vec<Vec<u8>> {
        (0..n).map(|i| vec![i as u8; 3 + i % 5]).collect()
    }

    #[test]
    fn test_every_path_validates() {
        let leaves = leaves(16);
        let tree = MerkleTree::build(&leaves).unwrap();
        assert_eq!(tree.leaves_count(), 16);
        for (i, leaf) in leaves.iter().enumerate() {
            let path = tree.proof(i).unwrap();
            assert_eq!(path.siblings.len(), 4);
            assert!(path.validate(leaf, &tree.root()));
        }
    }

    #[test]
    fn test_wrong_leaf_or_position() {
        let leaves = leaves(8);
        let tree = MerkleTree::build(&leaves).unwrap();
        let path = tree.proof(3).unwrap();
        assert!(!path.validate(&leaves[4], &tree.root()));

        let mut moved = path.clone();
        moved.index = 2;
        assert!(!moved.validate(&leaves[3], &tree.root()));

        moved.index = 8;
        assert!(!moved.validate(&leaves[3], &tree.root()));
    }

    #[test]
    fn test_single_leaf() {
        let leaves = leaves(1);
        let tree = MerkleTree::build(&leaves).unwrap();
        let path = tree.proof(0).unwrap();
        assert!(path.siblings.is_empty());
        assert!(path.validate(&leaves[0], &tree.root()));
    }

    #[test]
    fn test_leaf_count() {
        assert_eq!(
            MerkleTree::build(&leaves(6)),
            Err(CommitmentError::LeafCount(6))
        );
        assert_eq!(MerkleTree::build(&[]), Err(CommitmentError::LeafCount(0)));
        let tree = MerkleTree::build(&leaves(4)).unwrap();
        assert!(tree.proof(4).is_err());
    }
}
