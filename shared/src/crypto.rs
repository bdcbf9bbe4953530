//! ECDSA/secp256k1 keypairs, signatures and address derivation.

use crate::error::CryptoError;
use crate::hash::Hash256;
use k256::ecdsa::signature::{Signer, Verifier};
use k256::ecdsa::{Signature as EcdsaSignature, SigningKey, VerifyingKey};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

type Result<T> = std::result::Result<T, CryptoError>;

/// An ECDSA/secp256k1 public key, stored as its SEC1-compressed encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKey(#[serde(with = "hex_bytes")] Vec<u8>);

/// An ECDSA/secp256k1 private scalar. Zeroized on drop.
#[derive(Debug)]
pub struct PrivateKey(Vec<u8>);

/// A signing keypair.
#[derive(Debug)]
pub struct KeyPair {
    pub public_key: PublicKey,
    pub private_key: PrivateKey,
}

/// A detached ECDSA signature, DER-free fixed-size encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature(#[serde(with = "hex_bytes")] Vec<u8>);

impl PublicKey {
    /// # Errors
    /// Returns an error if `bytes` is not a valid SEC1-encoded secp256k1 point.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        VerifyingKey::from_sec1_bytes(bytes).map_err(|_| CryptoError::InvalidPublicKey)?;
        Ok(Self(bytes.to_vec()))
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    fn to_verifying_key(&self) -> VerifyingKey {
        VerifyingKey::from_sec1_bytes(&self.0).expect("validated at construction")
    }

    /// Derives the 40-hex-character account address for this key:
    /// the first 20 bytes of `SHA256(SHA256(serialized_pubkey))`.
    #[must_use]
    pub fn address(&self) -> String {
        let digest = Hash256::double_sha256(&self.0);
        hex::encode(&digest.as_bytes()[..20])
    }
}

impl PrivateKey {
    /// # Errors
    /// Returns an error if `bytes` does not encode a valid secp256k1 scalar.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        SigningKey::from_slice(bytes).map_err(|_| CryptoError::InvalidPrivateKey)?;
        Ok(Self(bytes.to_vec()))
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    fn to_signing_key(&self) -> SigningKey {
        SigningKey::from_slice(&self.0).expect("validated at construction")
    }
}

impl Zeroize for PrivateKey {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl Drop for PrivateKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl KeyPair {
    /// Generates a fresh keypair from the system RNG.
    #[must_use]
    pub fn generate() -> Self {
        let signing_key = SigningKey::random(&mut rand_core::OsRng);
        let verifying_key = VerifyingKey::from(&signing_key);
        Self {
            public_key: PublicKey(verifying_key.to_encoded_point(true).as_bytes().to_vec()),
            private_key: PrivateKey(signing_key.to_bytes().to_vec()),
        }
    }

    /// Reconstructs a keypair from a previously-exported private key, recovering
    /// the matching public key. Used for wallet backup/recovery.
    ///
    /// # Errors
    /// Returns an error if `private_key_bytes` is not a valid secp256k1 scalar.
    pub fn from_private_key(private_key_bytes: &[u8]) -> Result<Self> {
        let signing_key =
            SigningKey::from_slice(private_key_bytes).map_err(|_| CryptoError::InvalidPrivateKey)?;
        let verifying_key = VerifyingKey::from(&signing_key);
        Ok(Self {
            public_key: PublicKey(verifying_key.to_encoded_point(true).as_bytes().to_vec()),
            private_key: PrivateKey(private_key_bytes.to_vec()),
        })
    }

    /// Signs `message` (the canonical encoding of a transaction body).
    #[must_use]
    pub fn sign(&self, message: &[u8]) -> Signature {
        let signing_key = self.private_key.to_signing_key();
        let signature: EcdsaSignature = signing_key.sign(message);
        Signature(signature.to_vec())
    }
}

impl Signature {
    /// Wraps raw signature bytes without validating their structure; validity
    /// is only established at `verify` time.
    #[must_use]
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Verifies this signature over `message` under `public_key`.
    /// Fails closed: any malformed input is treated as verification failure.
    #[must_use]
    pub fn verify(&self, message: &[u8], public_key: &PublicKey) -> bool {
        let Ok(signature) = EcdsaSignature::from_slice(&self.0) else {
            return false;
        };
        let verifying_key = public_key.to_verifying_key();
        verifying_key.verify(message, &signature).is_ok()
    }
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(s).map_err(serde::de::Error::custom)
    }
}
