use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::{GENESIS_PREVIOUS_HASH, GENESIS_PROOF};
use crate::error::LedgerError;
use crate::transaction::Transaction;

/// A sealed block of transactions.
///
/// The field order below is the canonical serialization order used by
/// [`Block::compute_hash`]; peers recompute hashes from these exact fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub timestamp: DateTime<Utc>, // RFC 3339, nanosecond precision
    pub transactions: Vec<Transaction>,
    pub proof: u64,
    pub previous_hash: String,
}

impl Block {
    pub fn new(
        index: u64,
        transactions: Vec<Transaction>,
        proof: u64,
        previous_hash: String,
    ) -> Self {
        Self {
            index,
            timestamp: Utc::now(),
            transactions,
            proof,
            previous_hash,
        }
    }

    /// The first block of every chain. Its previous hash is a fixed marker,
    /// not the digest of anything.
    pub fn genesis() -> Self {
        Self::new(
            1,
            Vec::new(),
            GENESIS_PROOF,
            GENESIS_PREVIOUS_HASH.to_string(),
        )
    }

    /// SHA-256 over the JSON serialization of every field, hex encoded
    /// (64 lowercase characters).
    pub fn compute_hash(&self) -> Result<String, LedgerError> {
        let preimage = serde_json::to_vec(self).map_err(|source| LedgerError::Serialization {
            index: self.index,
            source,
        })?;
        let mut hasher = Sha256::new();
        hasher.update(&preimage);
        Ok(hex::encode(hasher.finalize()))
    }
}
