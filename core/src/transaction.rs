//! Transaction envelope: a canonical body plus a detached signature and
//! public key. `txid` hashes only the body, so resigning never changes it.

use crate::error::{CoreError, Result};
use forge_shared::{canonical_hash, Address, Amount, Hash256, KeyPair, PublicKey, Signature};
use serde::{Deserialize, Serialize};

/// Sentinel sender identifying a coinbase (block-reward) transaction.
pub const SYSTEM_SENDER: &str = "SYSTEM";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionBody {
    pub sender: Address,
    pub recipient: Address,
    pub amount: Amount,
    pub nonce: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub body: TransactionBody,
    /// Hex-encoded signature. `None` only for coinbase transactions.
    pub signature: Option<String>,
    /// Hex-encoded public key. `None` only for coinbase transactions.
    pub public_key: Option<String>,
}

impl Transaction {
    /// Builds a signed transfer from `sender`'s keypair.
    #[must_use]
    pub fn new_transfer(
        sender_keypair: &KeyPair,
        recipient: Address,
        amount: Amount,
        nonce: u64,
    ) -> Self {
        let body = TransactionBody {
            sender: sender_keypair.public_key.address(),
            recipient,
            amount,
            nonce,
        };
        let message = forge_shared::canonical_bytes(&body).expect("body always serializes");
        let signature = sender_keypair.sign(&message);
        Self {
            body,
            signature: Some(hex::encode(signature.as_bytes())),
            public_key: Some(hex::encode(sender_keypair.public_key.as_bytes())),
        }
    }

    /// Builds the unsigned, per-block coinbase transaction.
    #[must_use]
    pub fn new_coinbase(recipient: Address, amount: Amount) -> Self {
        Self {
            body: TransactionBody {
                sender: SYSTEM_SENDER.to_string(),
                recipient,
                amount,
                nonce: 0,
            },
            signature: None,
            public_key: None,
        }
    }

    #[must_use]
    pub fn is_coinbase(&self) -> bool {
        self.body.sender == SYSTEM_SENDER
    }

    /// `txid = SHA256(canonical(body))`, independent of signature.
    ///
    /// # Panics
    /// Never: `TransactionBody` always serializes to valid JSON.
    #[must_use]
    pub fn txid(&self) -> Hash256 {
        canonical_hash(&self.body).expect("body always serializes")
    }

    /// Structural checks independent of chain state: positive amount, no self-send.
    #[must_use]
    pub fn passes_structural_checks(&self) -> bool {
        self.body.amount > 0 && self.body.sender != self.body.recipient
    }

    /// Signature-layer validation (spec §4.3). Coinbase transactions bypass
    /// this check entirely; callers must test `is_coinbase()` first where the
    /// distinction matters. Distinguishes a missing envelope, a sender/key
    /// mismatch, and an outright verification failure, matching the three
    /// cryptographic error buckets of the taxonomy.
    pub fn check_signature(&self) -> Result<()> {
        if self.is_coinbase() {
            return Ok(());
        }
        let (Some(sig_hex), Some(pk_hex)) = (&self.signature, &self.public_key) else {
            return Err(CoreError::MissingSignature);
        };
        let sig_bytes = hex::decode(sig_hex).map_err(|_| CoreError::MissingSignature)?;
        let pk_bytes = hex::decode(pk_hex).map_err(|_| CoreError::MissingSignature)?;
        let public_key = PublicKey::from_bytes(&pk_bytes).map_err(CoreError::Crypto)?;
        if public_key.address() != self.body.sender {
            return Err(CoreError::AddressMismatch);
        }
        let message = forge_shared::canonical_bytes(&self.body).map_err(CoreError::Crypto)?;
        if !Signature::from_bytes(sig_bytes).verify(&message, &public_key) {
            return Err(CoreError::InvalidSignature);
        }
        Ok(())
    }

    /// Convenience boolean wrapper over [`Transaction::check_signature`], for
    /// call sites (node introspection, mempool cleanup) that only need a
    /// pass/fail answer.
    #[must_use]
    pub fn verify_signature(&self) -> bool {
        self.check_signature().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_shared::KeyPair;

    #[test]
    fn transfer_round_trips_and_verifies() {
        let sender = KeyPair::generate();
        let recipient = KeyPair::generate().public_key.address();
        let tx = Transaction::new_transfer(&sender, recipient, 10, 1);
        assert!(tx.verify_signature());
        assert!(tx.passes_structural_checks());
    }

    #[test]
    fn txid_ignores_signature_but_not_body() {
        let sender = KeyPair::generate();
        let recipient = KeyPair::generate().public_key.address();
        let tx_a = Transaction::new_transfer(&sender, recipient.clone(), 10, 1);
        let tx_b = Transaction::new_transfer(&sender, recipient.clone(), 10, 1);
        // Same body, independently signed: txid must agree even if signatures differ.
        assert_eq!(tx_a.txid(), tx_b.txid());

        let mut tampered = tx_a.clone();
        tampered.body.amount = 999;
        assert_ne!(tx_a.txid(), tampered.txid());
    }

    #[test]
    fn tampering_signature_bytes_fails_verification() {
        let sender = KeyPair::generate();
        let recipient = KeyPair::generate().public_key.address();
        let mut tx = Transaction::new_transfer(&sender, recipient, 10, 1);
        let mut sig = hex::decode(tx.signature.clone().unwrap()).unwrap();
        sig[0] ^= 0xFF;
        tx.signature = Some(hex::encode(sig));
        assert!(!tx.verify_signature());
    }

    #[test]
    fn coinbase_bypasses_signature_check() {
        let tx = Transaction::new_coinbase("miner-address".to_string(), 50);
        assert!(tx.is_coinbase());
        assert!(tx.verify_signature());
    }

    #[test]
    fn missing_envelope_reports_missing_signature() {
        let mut tx = Transaction::new_transfer(&KeyPair::generate(), "bob".to_string(), 10, 1);
        tx.signature = None;
        assert_eq!(tx.check_signature(), Err(CoreError::MissingSignature));
    }

    #[test]
    fn impersonated_sender_reports_address_mismatch() {
        let eve = KeyPair::generate();
        let mut forged = Transaction::new_transfer(&eve, "bob".to_string(), 10, 1);
        forged.body.sender = "not-eves-address".repeat(3)[..40].to_string();
        assert_eq!(forged.check_signature(), Err(CoreError::AddressMismatch));
    }
}
