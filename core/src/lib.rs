pub mod account;
pub mod block;
pub mod chain;
pub mod config;
pub mod difficulty;
pub mod error;
pub mod mempool;
pub mod miner;
pub mod network;
pub mod node;
pub mod orphan;
pub mod transaction;
pub mod validation;
pub mod wallet;

pub use account::{AccountState, State};
pub use block::Block;
pub use chain::BlockIndex;
pub use config::Config;
pub use error::CoreError;
pub use mempool::Mempool;
pub use network::NetworkSimulator;
pub use node::Node;
pub use orphan::OrphanPool;
pub use transaction::{Transaction, TransactionBody};
pub use wallet::{Wallet, WalletManager};

pub use forge_shared::{Address, Hash256};

pub type Result<T> = error::Result<T>;
