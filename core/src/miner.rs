//! Block assembly: coinbase plus an ordered, state-validated selection from
//! the mempool, mined against the freshly-retargeted difficulty (spec §4.11).

use crate::account::State;
use crate::block::Block;
use crate::chain::BlockIndex;
use crate::config::Config;
use crate::difficulty::expected_difficulty;
use crate::mempool::Mempool;
use crate::transaction::Transaction;

/// Walks the mempool in insertion order over `state`, keeping transactions
/// that validate against the running projection, stopping once
/// `config.max_txs_per_block` transactions have been selected.
#[must_use]
pub fn select_txs_for_block(mempool: &Mempool, mut state: State, config: &Config) -> Vec<Transaction> {
    let mut selected = Vec::new();
    for tx in mempool.iter() {
        if selected.len() >= config.max_txs_per_block {
            break;
        }
        if tx.is_coinbase() {
            continue;
        }
        if state.apply(tx, config.mining_reward).is_ok() {
            selected.push(tx.clone());
        }
    }
    selected
}

/// Assembles and mines a candidate block extending `tip`. The caller is
/// responsible for feeding the result back through the receive pipeline and
/// broadcasting it (spec §6.3).
#[must_use]
pub fn try_mine(
    node_id: &str,
    tip: &Block,
    mempool: &Mempool,
    index: &BlockIndex,
    config: &Config,
    sim_time: i64,
) -> Block {
    let coinbase = Transaction::new_coinbase(node_id.to_string(), config.mining_reward);
    let base_state = index.get_state_at(&tip.hash, config.mining_reward);
    let selected = select_txs_for_block(mempool, base_state, config);

    let mut transactions = Vec::with_capacity(selected.len() + 1);
    transactions.push(coinbase);
    transactions.extend(selected);

    let difficulty = expected_difficulty(tip.index + 1, tip, index, config);
    let mut block = Block::new(
        tip.index + 1,
        sim_time,
        transactions,
        difficulty,
        tip.hash.clone(),
        node_id.to_string(),
    );
    block.mine_block();
    block
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_shared::KeyPair;

    #[test]
    fn assembled_block_carries_exactly_one_coinbase() {
        let config = Config::default();
        let genesis = Block::genesis(config.default_difficulty);
        let mut index = BlockIndex::new();
        index.insert(genesis.clone());

        let block = try_mine("miner", &genesis, &Mempool::new(), &index, &config, 1);
        let coinbase_count = block.transactions.iter().filter(|tx| tx.is_coinbase()).count();
        assert_eq!(coinbase_count, 1);
        assert!(block.satisfies_proof_of_work());
    }

    #[test]
    fn select_txs_stops_at_the_configured_cap() {
        let mut config = Config::default();
        config.max_txs_per_block = 2;
        let alice = KeyPair::generate();
        let alice_addr = alice.public_key.address();

        let mut state = State::new();
        state.entry_mut(&alice_addr).balance = 1000;

        let mut mempool = Mempool::new();
        for nonce in 1..=5u64 {
            mempool.add(Transaction::new_transfer(&alice, "bob".to_string(), 1, nonce));
        }

        let selected = select_txs_for_block(&mempool, state, &config);
        assert_eq!(selected.len(), 2);
    }

    #[test]
    fn select_txs_skips_a_bad_nonce_but_keeps_later_valid_ones_in_order() {
        let config = Config::default();
        let alice = KeyPair::generate();
        let alice_addr = alice.public_key.address();
        let mut state = State::new();
        state.entry_mut(&alice_addr).balance = 1000;

        let mut mempool = Mempool::new();
        mempool.add(Transaction::new_transfer(&alice, "bob".to_string(), 1, 5)); // bad: expects nonce 1
        mempool.add(Transaction::new_transfer(&alice, "bob".to_string(), 1, 1)); // good

        let selected = select_txs_for_block(&mempool, state, &config);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].body.nonce, 1);
    }
}
