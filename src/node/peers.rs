use std::collections::BTreeSet;

use reqwest::Url;

use crate::error::PeerError;

/// Deduplicated set of peer base addresses.
///
/// Kept ordered so that enumeration (and therefore tie-breaking during a
/// resolve round) is deterministic: lexicographically smallest first.
#[derive(Debug, Default, Clone)]
pub struct PeerSet {
    peers: BTreeSet<String>,
}

impl PeerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and canonicalize an address.
    ///
    /// Bare `host:port` is read as `http://host:port`. Only http(s) URLs with
    /// a host are accepted; the trailing slash is dropped.
    pub fn normalize(address: &str) -> Result<String, PeerError> {
        let trimmed = address.trim();
        if trimmed.is_empty() {
            return Err(PeerError::InvalidAddress(address.to_string()));
        }
        let with_scheme = if trimmed.contains("://") {
            trimmed.to_string()
        } else {
            format!("http://{trimmed}")
        };

        let url =
            Url::parse(&with_scheme).map_err(|_| PeerError::InvalidAddress(address.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(PeerError::UnsupportedScheme {
                address: address.to_string(),
                scheme: url.scheme().to_string(),
            });
        }
        if url.host_str().is_none_or(str::is_empty) {
            return Err(PeerError::InvalidAddress(address.to_string()));
        }

        Ok(url.as_str().trim_end_matches('/').to_string())
    }

    /// Insert an address. Returns `false` if it was already known.
    pub fn register(&mut self, address: &str) -> Result<bool, PeerError> {
        let peer = Self::normalize(address)?;
        Ok(self.peers.insert(peer))
    }

    pub fn list(&self) -> Vec<String> {
        self.peers.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::PeerSet;
    use crate::error::PeerError;

    #[test]
    fn bare_host_port_gets_http_scheme() {
        assert_eq!(
            PeerSet::normalize("192.168.0.5:5000").unwrap(),
            "http://192.168.0.5:5000"
        );
        assert_eq!(
            PeerSet::normalize(" http://localhost:5001/ ").unwrap(),
            "http://localhost:5001"
        );
    }

    #[test]
    fn rejects_garbage_and_foreign_schemes() {
        assert!(matches!(
            PeerSet::normalize(""),
            Err(PeerError::InvalidAddress(_))
        ));
        assert!(matches!(
            PeerSet::normalize("http://"),
            Err(PeerError::InvalidAddress(_))
        ));
        assert!(matches!(
            PeerSet::normalize("ftp://example.com"),
            Err(PeerError::UnsupportedScheme { .. })
        ));
    }

    #[test]
    fn registration_deduplicates() {
        let mut peers = PeerSet::new();
        assert!(peers.register("http://b:5000").unwrap());
        assert!(!peers.register("b:5000").unwrap());
        assert!(peers.register("http://a:5000/").unwrap());
        assert_eq!(peers.list(), vec!["http://a:5000", "http://b:5000"]);
    }
}
