use std::time::Duration;

use log::debug;

use super::{ChainFetcher, RemoteChain};
use crate::error::SyncError;

/// Path under a peer's base address that serves its full chain.
pub const CHAIN_PATH: &str = "/api/v1/chain/";

/// Fetches peer chains over HTTP.
#[derive(Debug, Clone)]
pub struct HttpChainFetcher {
    client: reqwest::Client,
    timeout: Option<Duration>,
}

impl HttpChainFetcher {
    /// `timeout` bounds each peer request; `None` waits indefinitely.
    pub fn new(timeout: Option<Duration>) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
        }
    }

    pub fn chain_url(peer: &str) -> String {
        format!("{}{CHAIN_PATH}", peer.trim_end_matches('/'))
    }

    fn timed_out(&self, peer: &str, e: &reqwest::Error) -> Option<SyncError> {
        let timeout = self.timeout.filter(|_| e.is_timeout())?;
        Some(SyncError::Timeout {
            peer: peer.to_string(),
            timeout,
        })
    }
}

impl ChainFetcher for HttpChainFetcher {
    async fn fetch_chain(&self, peer: &str) -> Result<RemoteChain, SyncError> {
        let url = Self::chain_url(peer);
        debug!("SYNC - GET {url}");

        let mut request = self.client.get(&url);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|e| {
            self.timed_out(peer, &e).unwrap_or_else(|| SyncError::Unreachable {
                peer: peer.to_string(),
                reason: e.to_string(),
            })
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::BadStatus {
                peer: peer.to_string(),
                status: status.as_u16(),
            });
        }

        response.json::<RemoteChain>().await.map_err(|e| {
            self.timed_out(peer, &e).unwrap_or_else(|| SyncError::MalformedResponse {
                peer: peer.to_string(),
                reason: e.to_string(),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_url_joins_base_and_path() {
        assert_eq!(
            HttpChainFetcher::chain_url("http://127.0.0.1:5001"),
            "http://127.0.0.1:5001/api/v1/chain/"
        );
        assert_eq!(
            HttpChainFetcher::chain_url("http://127.0.0.1:5001/"),
            "http://127.0.0.1:5001/api/v1/chain/"
        );
    }

    #[actix_web::test]
    async fn unreachable_peer_is_reported() {
        // Port 9 (discard) is not expected to run an HTTP server.
        let fetcher = HttpChainFetcher::new(Some(Duration::from_secs(2)));
        let err = fetcher.fetch_chain("http://127.0.0.1:9").await.unwrap_err();
        assert_eq!(err.peer(), Some("http://127.0.0.1:9"));
    }
}
