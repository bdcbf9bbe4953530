use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// 256-bit SHA-256 digest used to identify blocks and transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Hash256([u8; 32]);

impl Hash256 {
    #[must_use]
    pub const fn zero() -> Self {
        Self([0u8; 32])
    }

    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Computes SHA-256 of the given bytes.
    #[must_use]
    pub fn sha256(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        let digest = hasher.finalize();
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&digest);
        Self(bytes)
    }

    /// Computes SHA-256 twice over the given bytes (used for address derivation).
    #[must_use]
    pub fn double_sha256(data: &[u8]) -> Self {
        Self::sha256(Self::sha256(data).as_bytes())
    }

    /// Lowercase hex encoding of the digest.
    #[must_use]
    pub fn to_hex(self) -> String {
        hex::encode(self.0)
    }

    fn from_hex(hex_string: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(hex_string)?;
        let mut out = [0u8; 32];
        if bytes.len() != 32 {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        out.copy_from_slice(&bytes);
        Ok(Self(out))
    }

    /// Returns true iff the hash's hex representation starts with `difficulty`
    /// `'0'` characters. Difficulty is measured in hex nibbles, not bits.
    #[must_use]
    pub fn meets_difficulty(&self, difficulty: u8) -> bool {
        let hex = self.to_hex();
        let prefix_len = difficulty as usize;
        prefix_len <= hex.len() && hex.as_bytes()[..prefix_len].iter().all(|&b| b == b'0')
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl TryFrom<String> for Hash256 {
    type Error = hex::FromHexError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Hash256> for String {
    fn from(value: Hash256) -> Self {
        value.to_hex()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_hash_displays_as_64_zero_chars() {
        assert_eq!(
            Hash256::zero().to_string(),
            "0".repeat(64)
        );
    }

    #[test]
    fn sha256_is_deterministic_and_nonzero() {
        let a = Hash256::sha256(b"hello world");
        let b = Hash256::sha256(b"hello world");
        assert_eq!(a, b);
        assert_ne!(a, Hash256::zero());
    }

    #[test]
    fn difficulty_counts_hex_nibbles_not_bits() {
        // Two leading zero bytes => four leading zero hex chars ("0000...").
        let mut bytes = [0x11u8; 32];
        bytes[0] = 0x00;
        bytes[1] = 0x00;
        let hash = Hash256::from_bytes(bytes);
        assert!(hash.meets_difficulty(4));
        assert!(!hash.meets_difficulty(5));
    }

    #[test]
    fn round_trips_through_hex_string() {
        let original = Hash256::sha256(b"round trip");
        let hex = original.to_hex();
        let parsed = Hash256::try_from(hex).unwrap();
        assert_eq!(original, parsed);
    }
}
