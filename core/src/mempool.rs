//! Pending-transaction pool. Insertion order is preserved across cleanup,
//! extension, and reorg-driven reinjection (spec §4.9, §5).

use crate::account::State;
use crate::transaction::Transaction;
use forge_shared::Hash256;
use std::collections::HashSet;

#[derive(Debug, Clone, Default)]
pub struct Mempool {
    transactions: Vec<Transaction>,
}

impl Mempool {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Unconditional append (spec §4.9: `add_transaction` does no upfront validation).
    pub fn add(&mut self, tx: Transaction) {
        self.transactions.push(tx);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter()
    }

    /// Removes every transaction whose txid is in `txids` (used when a block
    /// extends the tip and its transactions confirm).
    pub fn remove_confirmed(&mut self, txids: &HashSet<Hash256>) {
        self.transactions.retain(|tx| !txids.contains(&tx.txid()));
    }

    /// Reinserts transactions discarded by an abandoned branch, deduplicated
    /// by txid against what is already pending.
    pub fn reinject(&mut self, txs: impl IntoIterator<Item = Transaction>) {
        let existing: HashSet<Hash256> = self.transactions.iter().map(Transaction::txid).collect();
        for tx in txs {
            if tx.is_coinbase() {
                continue;
            }
            if existing.contains(&tx.txid()) {
                continue;
            }
            self.transactions.push(tx);
        }
    }

    /// `clean_mempool` (spec §4.9): drops confirmed, coinbase, signature-invalid,
    /// insufficient-balance and nonce-mismatched transactions against a scratch
    /// copy of `state`, applying effects of kept transactions as it goes so
    /// later txs from the same sender see the updated nonce/balance.
    pub fn clean(&mut self, confirmed: &HashSet<Hash256>, state: &State, mining_reward: u64) {
        let mut scratch = state.clone();
        let kept: Vec<Transaction> = std::mem::take(&mut self.transactions)
            .into_iter()
            .filter(|tx| {
                if confirmed.contains(&tx.txid()) || tx.is_coinbase() {
                    return false;
                }
                scratch.apply(tx, mining_reward).is_ok()
            })
            .collect();
        self.transactions = kept;
    }
}
