//! Block structure, canonical hash, and the proof-of-work mining loop.
//!
//! There is no header/body split and no Merkle root: transactions hash
//! directly into the block preimage (spec Non-goal: no Merkle trees).

use crate::transaction::Transaction;
use forge_shared::{canonical_hash, Address, Hash256};
use serde::{Deserialize, Serialize};

/// Sentinel `previous_hash` for the genesis block. Not a valid 32-byte hash,
/// so it is kept as a plain string rather than a `Hash256`.
pub const GENESIS_PREVIOUS_HASH: &str = "0";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub timestamp: i64,
    pub previous_hash: String,
    pub difficulty: u8,
    pub nonce: u64,
    pub miner_id: Address,
    pub transactions: Vec<Transaction>,
    /// Claimed hash; re-derived and compared by the validator, never trusted blindly.
    pub hash: String,
    /// Cumulative work of the chain ending at this block. Assigned by the
    /// chain on acceptance (§4.7 step 1); `0` until then.
    pub total_work: u128,
}

/// The subset of fields that participate in the hash preimage (spec §4.2, §6.2).
/// `miner_id`, `hash` and `total_work` are deliberately excluded.
#[derive(Serialize)]
struct HashPreimage<'a> {
    index: u64,
    timestamp: i64,
    transactions: &'a [Transaction],
    difficulty: u8,
    previous_hash: &'a str,
    nonce: u64,
}

impl Block {
    #[must_use]
    pub fn new(
        index: u64,
        timestamp: i64,
        transactions: Vec<Transaction>,
        difficulty: u8,
        previous_hash: String,
        miner_id: Address,
    ) -> Self {
        let mut block = Self {
            index,
            timestamp,
            previous_hash,
            difficulty,
            nonce: 0,
            miner_id,
            transactions,
            hash: String::new(),
            total_work: 0,
        };
        block.hash = block.calculate_hash().to_hex();
        block
    }

    /// Builds and mines the genesis block for a fresh chain.
    #[must_use]
    pub fn genesis(difficulty: u8) -> Self {
        let mut block = Self::new(
            0,
            0,
            Vec::new(),
            difficulty,
            GENESIS_PREVIOUS_HASH.to_string(),
            "GENESIS".to_string(),
        );
        block.mine_block();
        block.total_work = block.block_work();
        block
    }

    /// Recomputes the canonical hash over `(index, timestamp, transactions,
    /// difficulty, previous_hash, nonce)`.
    #[must_use]
    pub fn calculate_hash(&self) -> Hash256 {
        let preimage = HashPreimage {
            index: self.index,
            timestamp: self.timestamp,
            transactions: &self.transactions,
            difficulty: self.difficulty,
            previous_hash: &self.previous_hash,
            nonce: self.nonce,
        };
        canonical_hash(&preimage).expect("block preimage always serializes")
    }

    /// `1 << difficulty`, this block's contribution to cumulative chain work.
    #[must_use]
    pub fn block_work(&self) -> u128 {
        1u128 << self.difficulty
    }

    /// Grinds `nonce` upward from zero until the recomputed hash satisfies
    /// this block's declared difficulty, then stores both.
    pub fn mine_block(&mut self) {
        self.nonce = 0;
        loop {
            let hash = self.calculate_hash();
            if hash.meets_difficulty(self.difficulty) {
                self.hash = hash.to_hex();
                return;
            }
            self.nonce += 1;
        }
    }

    /// True iff `hash` is the recomputed canonical hash (validator step 1).
    #[must_use]
    pub fn has_matching_hash(&self) -> bool {
        self.hash == self.calculate_hash().to_hex()
    }

    /// True iff `hash`'s hex representation satisfies `difficulty` (validator step 3).
    #[must_use]
    pub fn satisfies_proof_of_work(&self) -> bool {
        self.calculate_hash().meets_difficulty(self.difficulty)
    }

    #[must_use]
    pub fn is_genesis(&self) -> bool {
        self.previous_hash == GENESIS_PREVIOUS_HASH
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn genesis_mines_a_hash_meeting_its_difficulty() {
        let genesis = Block::genesis(2);
        assert!(genesis.satisfies_proof_of_work());
        assert!(genesis.has_matching_hash());
        assert_eq!(genesis.total_work, genesis.block_work());
    }

    #[test]
    fn mining_is_deterministic_given_identical_fields() {
        let mut a = Block::new(1, 10, Vec::new(), 1, "deadbeef".repeat(8), "miner".to_string());
        let mut b = a.clone();
        a.mine_block();
        b.mine_block();
        assert_eq!(a.nonce, b.nonce);
        assert_eq!(a.hash, b.hash);
    }

    #[test]
    fn miner_id_is_not_part_of_the_hash_preimage() {
        let mut a = Block::new(1, 10, Vec::new(), 1, "ph".to_string(), "alice".to_string());
        let mut b = Block::new(1, 10, Vec::new(), 1, "ph".to_string(), "bob".to_string());
        a.mine_block();
        b.mine_block();
        assert_eq!(a.hash, b.hash);
    }

    #[test]
    fn tampered_hash_fails_integrity_check() {
        let mut block = Block::genesis(1);
        block.hash = "not-the-real-hash".to_string();
        assert!(!block.has_matching_hash());
    }
}
