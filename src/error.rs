//! Error types shared by the ledger, the sync coordinator and the miner.

use std::time::Duration;

use thiserror::Error;

/// Failures inside the ledger. Only hashing can fail, and only if a block
/// cannot be serialized, which well-formed in-memory blocks never trigger.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("failed to serialize block #{index} for hashing: {source}")]
    Serialization {
        index: u64,
        #[source]
        source: serde_json::Error,
    },
}

/// Failures while fetching a peer's chain during a resolve round.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("peer {peer} is unreachable: {reason}")]
    Unreachable { peer: String, reason: String },

    #[error("peer {peer} answered with status {status}")]
    BadStatus { peer: String, status: u16 },

    #[error("peer {peer} sent a malformed chain: {reason}")]
    MalformedResponse { peer: String, reason: String },

    #[error("peer {peer} did not answer within {timeout:?}")]
    Timeout { peer: String, timeout: Duration },

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl SyncError {
    pub fn peer(&self) -> Option<&str> {
        match self {
            SyncError::Unreachable { peer, .. }
            | SyncError::BadStatus { peer, .. }
            | SyncError::MalformedResponse { peer, .. }
            | SyncError::Timeout { peer, .. } => Some(peer.as_str()),
            SyncError::Ledger(_) => None,
        }
    }
}

/// Failures of a mining round.
#[derive(Debug, Error)]
pub enum MineError {
    #[error("proof-of-work search was cancelled")]
    Cancelled,

    #[error("proof-of-work search exceeded {0:?}")]
    TimedOut(Duration),

    #[error("proof-of-work worker failed: {0}")]
    Worker(String),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Rejected peer addresses.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PeerError {
    #[error("invalid peer address {0:?}")]
    InvalidAddress(String),

    #[error("unsupported scheme {scheme:?} in peer address {address:?}")]
    UnsupportedScheme { address: String, scheme: String },
}
