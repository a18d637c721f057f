//! Merkle commitment binding all shares of one split session
//!
//! After evaluation, a complete binary hash tree is built over the ordered
//! raw shares. Every emitted share embeds the tree root and the sibling
//! path for its own leaf, so a presented share can later be checked against
//! the session it claims to come from without seeing the other shares.
//!
//! The tree is array-backed: node `i` has children `2i` and `2i+1`, leaves
//! occupy the upper half of the array, and proof paths are plain index
//! arithmetic.

use sha2::{Digest, Sha256};

use crate::share::{Share, ShareSignature};
use crate::{Error, Result};

pub(crate) const HASH_LEN: usize = 32;
pub(crate) type Hash = [u8; HASH_LEN];

// Domain separation tags so a leaf can never be reinterpreted as an
// interior node (or vice versa).
const LEAF_TAG: u8 = 0x00;
const NODE_TAG: u8 = 0x01;
const PADDING_TAG: u8 = 0x02;

/// Hash of one share's raw content: tag, threshold, index, payload.
fn leaf_hash(threshold: u8, index: u8, payload: &[u8]) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update([LEAF_TAG, threshold, index]);
    hasher.update(payload);
    hasher.finalize().into()
}

fn node_hash(left: &Hash, right: &Hash) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update([NODE_TAG]);
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}

fn padding_hash() -> Hash {
    Sha256::digest([PADDING_TAG]).into()
}

/// Array-backed complete binary Merkle tree.
///
/// `nodes[1]` is the root, `nodes[width..width + leaf_count]` are the real
/// leaves, and the remaining leaf slots hold a fixed padding hash so that
/// every proof path has the same length.
struct MerkleTree {
    nodes: Vec<Hash>,
    width: usize,
}

impl MerkleTree {
    fn build(leaves: &[Hash]) -> Self {
        debug_assert!(!leaves.is_empty());
        let width = leaves.len().next_power_of_two();
        let mut nodes = vec![padding_hash(); 2 * width];

        nodes[width..width + leaves.len()].copy_from_slice(leaves);
        for i in (1..width).rev() {
            nodes[i] = node_hash(&nodes[2 * i], &nodes[2 * i + 1]);
        }

        Self { nodes, width }
    }

    fn root(&self) -> Hash {
        self.nodes[1]
    }

    /// Sibling path for the leaf at `position`, bottom-up.
    fn proof(&self, position: usize) -> Vec<Hash> {
        let mut path = Vec::new();
        let mut node = self.width + position;
        while node > 1 {
            path.push(self.nodes[node ^ 1]);
            node /= 2;
        }
        path
    }
}

/// Fold a sibling path from a leaf up to the root it implies.
///
/// `position` is the leaf's slot in the tree (share index - 1); its bits
/// decide the left/right orientation at each level.
fn fold_proof(leaf: &Hash, position: usize, path: &[Hash]) -> Hash {
    let mut acc = *leaf;
    let mut position = position;
    for sibling in path {
        acc = if position % 2 == 0 {
            node_hash(&acc, sibling)
        } else {
            node_hash(sibling, &acc)
        };
        position /= 2;
    }
    acc
}

/// Commit to the full share set and embed root + membership proof in each
/// share. Payloads are never touched.
pub(crate) fn sign_shares(shares: &mut [Share]) {
    let leaves: Vec<Hash> = shares
        .iter()
        .map(|s| leaf_hash(s.threshold, s.index, &s.payload))
        .collect();
    let tree = MerkleTree::build(&leaves);
    let root = tree.root();

    for share in shares.iter_mut() {
        share.signature = Some(ShareSignature {
            root,
            proof: tree.proof(share.index as usize - 1),
        });
    }
}

/// Verify every supplied share against its embedded root.
///
/// A share without signature data means the caller asked to verify shares
/// that were never signed (`SignatureModeMismatch`). A proof that does not
/// fold back to its embedded root means tampering (`InvalidSignature`).
/// Cross-root comparison is the orchestrator's grouping step, not ours.
pub(crate) fn verify_shares(shares: &[Share]) -> Result<()> {
    for share in shares {
        let signature = share
            .signature
            .as_ref()
            .ok_or(Error::SignatureModeMismatch { index: share.index })?;

        let leaf = leaf_hash(share.threshold, share.index, &share.payload);
        let implied = fold_proof(&leaf, share.index as usize - 1, &signature.proof);
        if implied != signature.root {
            return Err(Error::InvalidSignature { index: share.index });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_shares(threshold: u8, count: u8) -> Vec<Share> {
        (1..=count)
            .map(|index| Share {
                threshold,
                index,
                payload: vec![index.wrapping_mul(7), 0x5A, index],
                signature: None,
            })
            .collect()
    }

    #[test]
    fn test_sign_then_verify() {
        for count in [2u8, 3, 5, 8, 10, 255] {
            let mut shares = sample_shares(2, count);
            sign_shares(&mut shares);
            verify_shares(&shares).unwrap();
        }
    }

    #[test]
    fn test_all_shares_embed_same_root() {
        let mut shares = sample_shares(3, 7);
        sign_shares(&mut shares);
        let root = shares[0].signature.as_ref().unwrap().root;
        for share in &shares {
            assert_eq!(share.signature.as_ref().unwrap().root, root);
        }
    }

    #[test]
    fn test_tampered_payload_fails() {
        let mut shares = sample_shares(2, 4);
        sign_shares(&mut shares);
        shares[2].payload[1] ^= 0x01;
        assert_eq!(
            verify_shares(&shares),
            Err(Error::InvalidSignature { index: 3 })
        );
    }

    #[test]
    fn test_tampered_index_fails() {
        let mut shares = sample_shares(2, 4);
        sign_shares(&mut shares);
        shares[0].index = 4;
        assert_eq!(
            verify_shares(&shares),
            Err(Error::InvalidSignature { index: 4 })
        );
    }

    #[test]
    fn test_unsigned_share_is_mode_mismatch() {
        let mut shares = sample_shares(2, 3);
        sign_shares(&mut shares);
        shares[1].signature = None;
        assert_eq!(
            verify_shares(&shares),
            Err(Error::SignatureModeMismatch { index: 2 })
        );
    }

    #[test]
    fn test_proof_depth_matches_padded_width() {
        let mut shares = sample_shares(2, 5);
        sign_shares(&mut shares);
        // 5 leaves pad to 8, so every proof has depth 3
        for share in &shares {
            assert_eq!(share.signature.as_ref().unwrap().proof.len(), 3);
        }
    }

    #[test]
    fn test_single_pair_tree() {
        let mut shares = sample_shares(2, 2);
        sign_shares(&mut shares);
        let sig = shares[0].signature.as_ref().unwrap();
        assert_eq!(sig.proof.len(), 1);
        verify_shares(&shares).unwrap();
    }
}
