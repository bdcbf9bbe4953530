//! A deterministic-stepping, single-process network simulator: registers
//! nodes and wallets against a shared genesis, and advances them by
//! broadcasting mined blocks to every peer.

use crate::block::Block;
use crate::config::Config;
use crate::node::Node;
use crate::wallet::WalletManager;
use forge_shared::Address;
use rand::Rng;
use tracing::info;

pub struct NetworkSimulator {
    config: Config,
    nodes: Vec<Node>,
    pub wallets: WalletManager,
    sim_time: i64,
}

impl NetworkSimulator {
    /// Builds a simulator with a freshly-mined genesis shared by every node
    /// subsequently registered.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            nodes: Vec::new(),
            wallets: WalletManager::new(),
            sim_time: 0,
        }
    }

    fn genesis(&self) -> Block {
        Block::genesis(self.config.default_difficulty)
    }

    /// Registers a new node under `node_id`, seeded with the shared genesis.
    pub fn add_node(&mut self, node_id: Address) {
        let genesis = self.genesis();
        self.nodes.push(Node::with_config(node_id, genesis, self.config));
    }

    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    /// Delivers `block` to every node's `receive_block`, including the miner
    /// (idempotent: the miner already holds it, so the duplicate check no-ops).
    pub fn broadcast_block(&mut self, block: Block) {
        for node in &mut self.nodes {
            node.receive_block(self.sim_time, block.clone());
        }
    }

    /// Delivers `block` to every node except `miner_index`, which already
    /// holds it via self-receive.
    fn broadcast_to_others(&mut self, miner_index: usize, block: &Block) {
        for (i, node) in self.nodes.iter_mut().enumerate() {
            if i != miner_index {
                node.receive_block(self.sim_time, block.clone());
            }
        }
    }

    /// Advances the simulation `steps` ticks. Each tick bumps the shared
    /// clock, then visits nodes in order, each with an independent
    /// `mining_probability` chance to mine, feed the result through its own
    /// `receive_block`, and broadcast it to the rest before the next node in
    /// the same tick gets its turn — so a later miner in the same tick may
    /// already be extending an earlier one's freshly broadcast block.
    pub fn run(&mut self, steps: u64) {
        let mut rng = rand::thread_rng();
        for _ in 0..steps {
            self.sim_time += 1;
            for i in 0..self.nodes.len() {
                if !rng.gen_bool(self.config.mining_probability) {
                    continue;
                }
                let block = self.nodes[i].try_mine(self.sim_time);
                info!(hash = %block.hash, index = block.index, "broadcasting mined block");
                self.nodes[i].receive_block(self.sim_time, block.clone());
                self.broadcast_to_others(i, &block);
            }
        }
    }
}
