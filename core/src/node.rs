//! The consensus facade: orchestrates validation, chain selection, reorg,
//! orphan resolution and mempool discipline behind the contract in spec §6.3.

use crate::account::{AccountState, State};
use crate::block::Block;
use crate::chain::BlockIndex;
use crate::config::Config;
use crate::difficulty;
use crate::error::Result;
use crate::mempool::Mempool;
use crate::miner;
use crate::orphan::OrphanPool;
use crate::transaction::Transaction;
use crate::validation;
use forge_shared::{Address, Hash256};
use std::collections::HashSet;
use tracing::{debug, info, warn};

pub struct Node {
    pub node_id: Address,
    index: BlockIndex,
    orphans: OrphanPool,
    mempool: Mempool,
    tip_hash: String,
    state: State,
    config: Config,
}

impl Node {
    /// Builds a node seeded with an externally-mined `genesis` block and the
    /// default tunables (spec §6.4).
    #[must_use]
    pub fn new(node_id: Address, genesis: Block) -> Self {
        Self::with_config(node_id, genesis, Config::default())
    }

    #[must_use]
    pub fn with_config(node_id: Address, genesis: Block, config: Config) -> Self {
        let tip_hash = genesis.hash.clone();
        let mut index = BlockIndex::new();
        index.insert(genesis);
        let state = index.get_state_at(&tip_hash, config.mining_reward);
        Self {
            node_id,
            index,
            orphans: OrphanPool::new(),
            mempool: Mempool::new(),
            tip_hash,
            state,
            config,
        }
    }

    #[must_use]
    pub fn get_tip_block(&self) -> &Block {
        self.index
            .get(&self.tip_hash)
            .expect("tip hash always refers to an indexed block")
    }

    /// Read-only projection of account state (spec §6.3 `state[addr]`).
    #[must_use]
    pub fn state(&self, address: &str) -> AccountState {
        self.state.get(address)
    }

    #[must_use]
    pub fn mempool_len(&self) -> usize {
        self.mempool.len()
    }

    pub fn mempool_transactions(&self) -> impl Iterator<Item = &Transaction> {
        self.mempool.iter()
    }

    pub fn block_by_hash(&self, hash: &str) -> Option<&Block> {
        self.index.get(hash)
    }

    /// Unconditional append; validation happens at mining time and cleanup.
    pub fn add_transaction(&mut self, tx: Transaction) {
        self.mempool.add(tx);
    }

    /// Assembles and mines a block extending the current tip. The caller
    /// must feed it back through `receive_block` and broadcast it.
    #[must_use]
    pub fn try_mine(&self, sim_time: i64) -> Block {
        miner::try_mine(
            &self.node_id,
            self.get_tip_block(),
            &self.mempool,
            &self.index,
            &self.config,
            sim_time,
        )
    }

    /// Public per-block validator (spec §4.4), independent of `receive_block`'s
    /// duplicate/orphan handling.
    pub fn validate_block(&self, candidate: &Block, parent: &Block, sim_time: i64) -> Result<()> {
        validation::validate_block(candidate, parent, &self.index, &self.config, sim_time)
    }

    /// Public signature-layer check (spec §4.3).
    #[must_use]
    pub fn verify_transaction_signature(&self, tx: &Transaction) -> bool {
        tx.verify_signature()
    }

    /// Public canonical txid (spec §6.1).
    #[must_use]
    pub fn compute_txid(&self, tx: &Transaction) -> Hash256 {
        tx.txid()
    }

    /// Public retarget computation (spec §4.8).
    #[must_use]
    pub fn get_expected_difficulty(&self, candidate: &Block, parent: &Block) -> u8 {
        difficulty::expected_difficulty(candidate.index, parent, &self.index, &self.config)
    }

    /// Public ancestor walk (spec §4.8).
    #[must_use]
    pub fn get_ancestor<'a>(&'a self, block: &'a Block, height: u64) -> Option<&'a Block> {
        self.index.get_ancestor(block, height)
    }

    /// Admits, validates, possibly reorgs, and resolves orphans for `block`
    /// (spec §4.4, §4.7, §4.10). Idempotent on duplicates.
    pub fn receive_block(&mut self, sim_time: i64, block: Block) {
        if self.index.contains(&block.hash) {
            debug!(hash = %block.hash, "duplicate block, dropping");
            return;
        }

        let Some(parent) = self.index.get(&block.previous_hash).cloned() else {
            info!(hash = %block.hash, parent = %block.previous_hash, "parent unknown, buffering as orphan");
            self.orphans.insert(block);
            return;
        };

        if let Err(err) = validation::validate_block(&block, &parent, &self.index, &self.config, sim_time) {
            warn!(hash = %block.hash, error = %err, "rejecting invalid block");
            return;
        }

        self.accept_block(block, parent, sim_time);
    }

    fn accept_block(&mut self, mut block: Block, parent: Block, sim_time: i64) {
        block.total_work = parent.total_work + block.block_work();
        let block_hash = block.hash.clone();
        self.index.insert(block);
        let inserted = self
            .index
            .get(&block_hash)
            .cloned()
            .expect("just inserted");

        let tip = self.get_tip_block().clone();
        let mut became_tip = false;

        if inserted.total_work > tip.total_work {
            if inserted.previous_hash == tip.hash {
                info!(hash = %block_hash, "extending chain tip");
                let confirmed = non_coinbase_txids(&inserted);
                self.mempool.remove_confirmed(&confirmed);
                self.tip_hash = block_hash.clone();
                became_tip = true;
            } else {
                match self.index.common_ancestor(&tip, &inserted).map(|a| a.hash.clone()) {
                    Some(ancestor_hash) => {
                        info!(hash = %block_hash, ancestor = %ancestor_hash, "reorganizing chain");
                        let discarded: Vec<Block> = self
                            .index
                            .path_above(&tip, &ancestor_hash)
                            .into_iter()
                            .cloned()
                            .collect();
                        let adopted: Vec<Block> = self
                            .index
                            .path_above(&inserted, &ancestor_hash)
                            .into_iter()
                            .cloned()
                            .collect();

                        for discarded_block in &discarded {
                            let txs: Vec<Transaction> = discarded_block
                                .transactions
                                .iter()
                                .filter(|tx| !tx.is_coinbase())
                                .cloned()
                                .collect();
                            self.mempool.reinject(txs);
                        }

                        let adopted_txids: HashSet<Hash256> = adopted
                            .iter()
                            .flat_map(|b| b.transactions.iter().filter(|tx| !tx.is_coinbase()).map(Transaction::txid))
                            .collect();
                        self.mempool.remove_confirmed(&adopted_txids);

                        self.tip_hash = block_hash.clone();
                        became_tip = true;
                    }
                    None => {
                        warn!(hash = %block_hash, "reorg aborted: missing ancestor, keeping old tip");
                    }
                }
            }
        }

        if became_tip {
            self.state = self.index.get_state_at(&self.tip_hash, self.config.mining_reward);
            let confirmed = self.confirmed_txids();
            self.mempool.clean(&confirmed, &self.state, self.config.mining_reward);
        }

        // Orphan retry must run regardless of whether this block became tip:
        // a buffered child may tip the balance once its parent is indexed.
        let children = self.orphans.take_children(&block_hash);
        for child in children {
            self.receive_block(sim_time, child);
        }
    }

    fn confirmed_txids(&self) -> HashSet<Hash256> {
        self.index
            .chain_from_genesis(&self.tip_hash)
            .into_iter()
            .flatten()
            .flat_map(|block| block.transactions.iter().map(Transaction::txid))
            .collect()
    }
}

fn non_coinbase_txids(block: &Block) -> HashSet<Hash256> {
    block
        .transactions
        .iter()
        .filter(|tx| !tx.is_coinbase())
        .map(Transaction::txid)
        .collect()
}
