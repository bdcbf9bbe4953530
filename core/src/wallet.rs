//! A thin signing identity over a `KeyPair`, plus a registry of wallets
//! keyed by the address they derive.

use crate::error::{CoreError, Result};
use crate::transaction::Transaction;
use forge_shared::{Address, Amount, KeyPair};
use std::collections::HashMap;

pub struct Wallet {
    pub owner_name: String,
    keypair: KeyPair,
}

impl Wallet {
    /// Generates a fresh keypair for `owner_name`.
    #[must_use]
    pub fn new(owner_name: impl Into<String>) -> Self {
        Self {
            owner_name: owner_name.into(),
            keypair: KeyPair::generate(),
        }
    }

    /// Rebuilds a wallet from a previously-exported private key. The derived
    /// address, and therefore every txid signed from it, is identical to the
    /// original wallet's.
    ///
    /// # Errors
    /// Returns an error if `private_key_bytes` is not a valid secp256k1 scalar.
    pub fn from_private_key(private_key_bytes: &[u8], owner_name: impl Into<String>) -> Result<Self> {
        let keypair = KeyPair::from_private_key(private_key_bytes).map_err(CoreError::Crypto)?;
        Ok(Self {
            owner_name: owner_name.into(),
            keypair,
        })
    }

    #[must_use]
    pub fn address(&self) -> Address {
        self.keypair.public_key.address()
    }

    /// Raw private scalar, suitable for cold storage and later recovery via
    /// `from_private_key`.
    #[must_use]
    pub fn export_private_key(&self) -> Vec<u8> {
        self.keypair.private_key.as_bytes().to_vec()
    }

    #[must_use]
    pub fn create_transaction(&self, recipient: Address, amount: Amount, nonce: u64) -> Transaction {
        Transaction::new_transfer(&self.keypair, recipient, amount, nonce)
    }
}

/// Address-keyed registry of wallets, used by the network simulator to look
/// up the signer behind a simulated actor.
#[derive(Default)]
pub struct WalletManager {
    wallets: HashMap<Address, Wallet>,
}

impl WalletManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a wallet for `owner_name`, registers it, and returns its address.
    pub fn create_wallet(&mut self, owner_name: impl Into<String>) -> Address {
        let wallet = Wallet::new(owner_name);
        let address = wallet.address();
        self.wallets.insert(address.clone(), wallet);
        address
    }

    #[must_use]
    pub fn get(&self, address: &str) -> Option<&Wallet> {
        self.wallets.get(address)
    }

    pub fn addresses(&self) -> impl Iterator<Item = &Address> {
        self.wallets.keys()
    }
}
