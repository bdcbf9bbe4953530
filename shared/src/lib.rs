pub mod canonical;
pub mod crypto;
pub mod error;
pub mod hash;
pub mod types;

pub use canonical::{canonical_bytes, canonical_hash};
pub use crypto::{KeyPair, PrivateKey, PublicKey, Signature};
pub use error::CryptoError;
pub use hash::Hash256;
pub use types::{Address, Amount, BlockHeight, BlockId, Timestamp, TxId};

pub type Result<T> = std::result::Result<T, CryptoError>;
