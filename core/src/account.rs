//! Account/nonce state: balances and replay-protection counters keyed by address.

use crate::error::{CoreError, Result};
use crate::transaction::Transaction;
use forge_shared::Address;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountState {
    pub balance: u64,
    pub nonce: u64,
}

/// `{address -> (balance, nonce)}`, defaulting absent accounts to `(0, 0)`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct State(HashMap<Address, AccountState>);

impl State {
    #[must_use]
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    #[must_use]
    pub fn get(&self, address: &str) -> AccountState {
        self.0.get(address).copied().unwrap_or_default()
    }

    pub fn entry_mut(&mut self, address: &str) -> &mut AccountState {
        self.0.entry(address.to_string()).or_default()
    }

    #[must_use]
    pub fn total_balance(&self) -> u128 {
        self.0.values().map(|a| u128::from(a.balance)).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Address, &AccountState)> {
        self.0.iter()
    }

    /// Applies one transaction's effect, enforcing the per-tx rules of spec
    /// §4.5: positive amount, no self-send, coinbase credits the miner
    /// unconditionally, regular transfers require signature, balance and the
    /// strictly-next nonce.
    pub fn apply(&mut self, tx: &Transaction, mining_reward: u64) -> Result<()> {
        if !tx.passes_structural_checks() {
            if tx.body.amount == 0 {
                return Err(CoreError::NonPositiveAmount);
            }
            return Err(CoreError::SelfSend);
        }

        if tx.is_coinbase() {
            if tx.body.amount != mining_reward {
                return Err(CoreError::CoinbaseAmountMismatch {
                    actual: tx.body.amount,
                    expected: mining_reward,
                });
            }
            self.entry_mut(&tx.body.recipient).balance += tx.body.amount;
            return Ok(());
        }

        tx.check_signature()?;

        let sender_state = self.get(&tx.body.sender);
        if sender_state.balance < tx.body.amount {
            return Err(CoreError::InsufficientBalance);
        }
        let expected_nonce = sender_state.nonce + 1;
        if tx.body.nonce != expected_nonce {
            return Err(CoreError::NonceMismatch {
                actual: tx.body.nonce,
                expected: expected_nonce,
            });
        }

        {
            let sender = self.entry_mut(&tx.body.sender);
            sender.balance -= tx.body.amount;
            sender.nonce = tx.body.nonce;
        }
        self.entry_mut(&tx.body.recipient).balance += tx.body.amount;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_shared::KeyPair;

    #[test]
    fn absent_account_defaults_to_zero() {
        let state = State::new();
        assert_eq!(state.get("nobody"), AccountState::default());
    }

    #[test]
    fn coinbase_credits_recipient_without_nonce_check() {
        let mut state = State::new();
        let tx = Transaction::new_coinbase("miner".to_string(), 50);
        state.apply(&tx, 50).unwrap();
        assert_eq!(state.get("miner").balance, 50);
        assert_eq!(state.get("miner").nonce, 0);
    }

    #[test]
    fn transfer_moves_balance_and_advances_nonce() {
        let mut state = State::new();
        let alice = KeyPair::generate();
        let alice_addr = alice.public_key.address();
        state.entry_mut(&alice_addr).balance = 100;

        let tx = Transaction::new_transfer(&alice, "bob".to_string(), 30, 1);
        state.apply(&tx, 50).unwrap();

        assert_eq!(state.get(&alice_addr), AccountState { balance: 70, nonce: 1 });
        assert_eq!(state.get("bob").balance, 30);
    }

    #[test]
    fn nonce_gap_is_rejected() {
        let mut state = State::new();
        let alice = KeyPair::generate();
        let alice_addr = alice.public_key.address();
        state.entry_mut(&alice_addr).balance = 100;

        let tx = Transaction::new_transfer(&alice, "bob".to_string(), 10, 2);
        assert_eq!(
            state.apply(&tx, 50),
            Err(CoreError::NonceMismatch { actual: 2, expected: 1 })
        );
    }

    #[test]
    fn insufficient_balance_is_rejected() {
        let mut state = State::new();
        let alice = KeyPair::generate();
        let tx = Transaction::new_transfer(&alice, "bob".to_string(), 10, 1);
        assert_eq!(state.apply(&tx, 50), Err(CoreError::InsufficientBalance));
    }
}
