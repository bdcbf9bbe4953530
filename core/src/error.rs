use forge_shared::CryptoError;
use thiserror::Error;

/// Reasons a candidate block or transaction fails validation.
///
/// Topology outcomes (unknown parent, duplicate block) are intentionally
/// **not** variants here: the spec treats them as non-errors (orphan
/// buffering, silent drop), handled as control flow in `chain`/`node`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    // -- Structural --
    #[error("transaction amount must be positive")]
    NonPositiveAmount,
    #[error("sender and recipient must differ")]
    SelfSend,
    #[error("block must contain exactly one coinbase transaction, found {0}")]
    CoinbaseCount(usize),
    #[error("coinbase recipient {recipient} does not match miner {miner}")]
    CoinbaseRecipientMismatch { recipient: String, miner: String },
    #[error("coinbase amount {actual} does not match mining reward {expected}")]
    CoinbaseAmountMismatch { actual: u64, expected: u64 },

    // -- Cryptographic --
    #[error("transaction signature is missing")]
    MissingSignature,
    #[error("public key does not derive sender address")]
    AddressMismatch,
    #[error("signature verification failed")]
    InvalidSignature,

    // -- Consensus / temporal --
    #[error("block hash does not match its canonical recomputation")]
    HashMismatch,
    #[error("block does not link to its claimed parent")]
    LinkageMismatch,
    #[error("block hash does not satisfy its declared proof-of-work target")]
    ProofOfWorkNotMet,
    #[error("block difficulty {actual} does not match expected difficulty {expected}")]
    WrongDifficulty { actual: u8, expected: u8 },
    #[error("difficulty changed by more than the allowed step bound")]
    DifficultyStepTooLarge,
    #[error("block timestamp does not exceed parent timestamp")]
    NonMonotoneTimestamp,
    #[error("block timestamp exceeds the allowed future drift")]
    FutureTimestamp,

    // -- State --
    #[error("sender has insufficient balance for this transfer")]
    InsufficientBalance,
    #[error("transaction nonce {actual} does not follow expected nonce {expected}")]
    NonceMismatch { actual: u64, expected: u64 },

    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

pub type Result<T> = std::result::Result<T, CoreError>;
