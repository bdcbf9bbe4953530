//! Generic type aliases shared across the consensus engine.

/// Canonical transaction identifier: `SHA256(canonical(body))`.
pub type TxId = crate::Hash256;

/// Canonical block identifier: `SHA256(canonical(header fields))`.
pub type BlockId = crate::Hash256;

/// Monetary amount, smallest indivisible unit.
pub type Amount = u64;

/// Simulated Unix-style timestamp; compared against the process-wide `SIM_TIME`.
pub type Timestamp = i64;

/// Chain height, counting genesis as zero.
pub type BlockHeight = u64;

/// 40-hex-character account address derived from a public key.
pub type Address = String;
