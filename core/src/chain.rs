//! The block DAG: a flat `hash -> Block` index plus ancestor walks, state
//! replay, and common-ancestor discovery for reorg (spec §4.6, §4.7, §9).

use crate::account::State;
use crate::block::{Block, GENESIS_PREVIOUS_HASH};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct BlockIndex {
    blocks: HashMap<String, Block>,
}

impl BlockIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, hash: &str) -> bool {
        self.blocks.contains_key(hash)
    }

    #[must_use]
    pub fn get(&self, hash: &str) -> Option<&Block> {
        self.blocks.get(hash)
    }

    /// Inserts a block. Once inserted, a block is never mutated or removed.
    pub fn insert(&mut self, block: Block) {
        self.blocks.insert(block.hash.clone(), block);
    }

    /// Walks `previous_hash` links from `block` until an indexed ancestor at
    /// `height` is found. Returns `None` if `height` exceeds `block.index`,
    /// or if the walk runs off the index before reaching it.
    #[must_use]
    pub fn get_ancestor<'a>(&'a self, block: &'a Block, height: u64) -> Option<&'a Block> {
        if height > block.index {
            return None;
        }
        let mut current = block;
        while current.index > height {
            current = self.blocks.get(&current.previous_hash)?;
        }
        Some(current)
    }

    /// The deepest block shared by `a` and `b`'s ancestry, or `None` if the
    /// walk cannot complete (a required ancestor is missing from the index).
    #[must_use]
    pub fn common_ancestor<'a>(&'a self, a: &'a Block, b: &'a Block) -> Option<&'a Block> {
        let target_height = a.index.min(b.index);
        let mut a = self.get_ancestor(a, target_height)?;
        let mut b = self.get_ancestor(b, target_height)?;
        while a.hash != b.hash {
            a = self.blocks.get(&a.previous_hash)?;
            b = self.blocks.get(&b.previous_hash)?;
        }
        Some(a)
    }

    /// Collects the chain of blocks strictly above `ancestor` up to and
    /// including `tip`, genesis-first (oldest to newest).
    #[must_use]
    pub fn path_above<'a>(&'a self, tip: &'a Block, ancestor_hash: &str) -> Vec<&'a Block> {
        let mut path = Vec::new();
        let mut current = tip;
        while current.hash != ancestor_hash {
            path.push(current);
            match self.blocks.get(&current.previous_hash) {
                Some(parent) => current = parent,
                None => break,
            }
        }
        path.reverse();
        path
    }

    /// Walks back from `hash` to the genesis sentinel and returns the chain
    /// genesis-first, or `None` if the walk runs off the index first.
    #[must_use]
    pub fn chain_from_genesis(&self, hash: &str) -> Option<Vec<&Block>> {
        let mut path = Vec::new();
        let mut current_hash = hash.to_string();
        loop {
            let block = self.blocks.get(&current_hash)?;
            path.push(block);
            if block.previous_hash == GENESIS_PREVIOUS_HASH {
                break;
            }
            current_hash = block.previous_hash.clone();
        }
        path.reverse();
        Some(path)
    }

    /// Deterministic fold of the chain ending at `hash` into account state.
    /// Returns the empty state if the walk cannot reach genesis (spec §4.6).
    #[must_use]
    pub fn get_state_at(&self, hash: &str, mining_reward: u64) -> State {
        let Some(path) = self.chain_from_genesis(hash) else {
            return State::new();
        };
        let mut state = State::new();
        for block in path {
            for tx in &block.transactions {
                // Already validated at acceptance time; state replay is a
                // pure fold and never rejects a block it has already indexed.
                let _ = state.apply(tx, mining_reward);
            }
        }
        state
    }
}
