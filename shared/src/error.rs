use thiserror::Error;

/// Errors raised by hashing, canonicalization and signature primitives.
#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("invalid public key bytes")]
    InvalidPublicKey,

    #[error("invalid private key bytes")]
    InvalidPrivateKey,

    #[error("invalid signature bytes")]
    InvalidSignature,

    #[error("signature verification failed")]
    VerificationFailed,

    #[error("canonical serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid hex encoding: {0}")]
    HexDecode(#[from] hex::FromHexError),
}

impl Clone for CryptoError {
    fn clone(&self) -> Self {
        match self {
            Self::InvalidPublicKey => Self::InvalidPublicKey,
            Self::InvalidPrivateKey => Self::InvalidPrivateKey,
            Self::InvalidSignature => Self::InvalidSignature,
            Self::VerificationFailed => Self::VerificationFailed,
            Self::Serialization(e) => Self::Serialization(serde::de::Error::custom(e.to_string())),
            Self::HexDecode(e) => Self::HexDecode(*e),
        }
    }
}

impl PartialEq for CryptoError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidPublicKey, Self::InvalidPublicKey)
            | (Self::InvalidPrivateKey, Self::InvalidPrivateKey)
            | (Self::InvalidSignature, Self::InvalidSignature)
            | (Self::VerificationFailed, Self::VerificationFailed) => true,
            (Self::Serialization(a), Self::Serialization(b)) => a.to_string() == b.to_string(),
            (Self::HexDecode(a), Self::HexDecode(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for CryptoError {}
