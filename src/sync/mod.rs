//! Longest-valid-chain reconciliation with registered peers.
//!
//! The coordinator never talks to the network itself: it is handed a
//! [`ChainFetcher`] and a snapshot of the peer set, and only decides which
//! remote chain (if any) should replace the local one.

pub mod http;

use std::future::Future;

use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};

use crate::blockchain::{Block, Ledger};
use crate::error::SyncError;

pub use http::HttpChainFetcher;

/// A peer's full chain as exchanged on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteChain {
    pub chain: Vec<Block>,
    pub length: usize,
}

/// Capability to download the full chain of a peer.
pub trait ChainFetcher {
    fn fetch_chain(
        &self,
        peer: &str,
    ) -> impl Future<Output = Result<RemoteChain, SyncError>> + Send;
}

/// How a resolve round reacts to a peer that cannot be fetched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResolvePolicy {
    /// The first fetch failure fails the whole round.
    #[default]
    AbortOnError,
    /// Failing peers are logged and skipped.
    SkipUnreachable,
}

/// The chain chosen to replace the local one.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub peer: String,
    pub chain: Vec<Block>,
}

/// Fetch every peer's chain and return the longest valid one that is strictly
/// longer than `local_len`.
///
/// Peers are visited in the order given; the first chain to reach a length
/// wins ties with later peers of the same length.
pub async fn resolve_conflicts<F: ChainFetcher>(
    peers: &[String],
    fetcher: &F,
    local_len: usize,
    policy: ResolvePolicy,
) -> Result<Option<Candidate>, SyncError> {
    let mut max_length = local_len;
    let mut winner: Option<Candidate> = None;

    for peer in peers {
        let remote = match fetcher.fetch_chain(peer).await {
            Ok(remote) => remote,
            Err(e) if policy == ResolvePolicy::SkipUnreachable => {
                warn!("SYNC - skipping {peer}: {e}");
                continue;
            }
            Err(e) => {
                error!("SYNC - aborting resolve round: {e}");
                return Err(e);
            }
        };

        let length = remote.chain.len();
        debug!(
            "SYNC - {peer} reports length {} ({} blocks received)",
            remote.length, length
        );
        if remote.length != length {
            warn!(
                "SYNC - {peer} reported length {} but sent {length} blocks",
                remote.length
            );
            continue;
        }
        if length <= max_length {
            continue;
        }
        if !Ledger::valid_chain(&remote.chain)? {
            warn!("SYNC - {peer} sent an invalid chain of length {length}");
            continue;
        }

        max_length = length;
        winner = Some(Candidate {
            peer: peer.clone(),
            chain: remote.chain,
        });
    }

    if let Some(c) = &winner {
        info!("SYNC - {} holds the longest valid chain ({max_length})", c.peer);
    }
    Ok(winner)
}
