//! Node settings read from the environment (and `.env` via dotenvy).

use std::env;
use std::time::Duration;

use uuid::Uuid;

use crate::sync::ResolvePolicy;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Recipient of mining rewards.
    pub node_id: String,
    /// Peers registered at startup.
    pub peers: Vec<String>,
    /// Per-peer limit for chain fetches; unlimited when `None`.
    pub peer_timeout: Option<Duration>,
    /// Limit for one proof-of-work search; unlimited when `None`.
    pub mine_timeout: Option<Duration>,
    pub resolve_policy: ResolvePolicy,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Missing or unparseable values fall
    /// back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let secs = |key: &str| {
            lookup(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .filter(|s| *s > 0)
                .map(Duration::from_secs)
        };

        let skip_unreachable = lookup("RESOLVE_SKIP_UNREACHABLE")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Self {
            host: lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: lookup("PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            node_id: lookup("NODE_ID")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| Uuid::new_v4().simple().to_string()),
            peers: lookup("PEERS")
                .map(|v| {
                    v.split(',')
                        .map(str::trim)
                        .filter(|p| !p.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
            peer_timeout: secs("PEER_TIMEOUT_SECS"),
            mine_timeout: secs("MINE_TIMEOUT_SECS"),
            resolve_policy: if skip_unreachable {
                ResolvePolicy::SkipUnreachable
            } else {
                ResolvePolicy::AbortOnError
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let c = config(&[]);
        assert_eq!(c.host, "127.0.0.1");
        assert_eq!(c.port, 5000);
        assert_eq!(c.node_id.len(), 32);
        assert!(!c.node_id.contains('-'));
        assert!(c.peers.is_empty());
        assert_eq!(c.peer_timeout, None);
        assert_eq!(c.mine_timeout, None);
        assert_eq!(c.resolve_policy, ResolvePolicy::AbortOnError);
    }

    #[test]
    fn reads_every_setting() {
        let c = config(&[
            ("HOST", "0.0.0.0"),
            ("PORT", "5001"),
            ("NODE_ID", "miner-1"),
            ("PEERS", "http://a:5000, b:5000,,"),
            ("PEER_TIMEOUT_SECS", "3"),
            ("MINE_TIMEOUT_SECS", "60"),
            ("RESOLVE_SKIP_UNREACHABLE", "true"),
        ]);
        assert_eq!(c.host, "0.0.0.0");
        assert_eq!(c.port, 5001);
        assert_eq!(c.node_id, "miner-1");
        assert_eq!(c.peers, vec!["http://a:5000", "b:5000"]);
        assert_eq!(c.peer_timeout, Some(Duration::from_secs(3)));
        assert_eq!(c.mine_timeout, Some(Duration::from_secs(60)));
        assert_eq!(c.resolve_policy, ResolvePolicy::SkipUnreachable);
    }

    #[test]
    fn unparseable_values_fall_back() {
        let c = config(&[("PORT", "http"), ("PEER_TIMEOUT_SECS", "soon"), ("MINE_TIMEOUT_SECS", "0")]);
        assert_eq!(c.port, 5000);
        assert_eq!(c.peer_timeout, None);
        assert_eq!(c.mine_timeout, None);
    }
}
