use serde::{Deserialize, Serialize};

use crate::blockchain::Block;
use crate::config::Config;
use crate::node::Node;
use crate::sync::HttpChainFetcher;
use crate::transaction::Transaction;

/// Shared application state: the node and the transport it uses to reach peers.
pub struct AppState {
    pub node: Node,
    pub fetcher: HttpChainFetcher,
}

impl AppState {
    pub fn from_config(config: &Config) -> Self {
        Self {
            node: Node::from_config(config),
            fetcher: HttpChainFetcher::new(config.peer_timeout),
        }
    }
}

/* ---------- Chain API Models ---------- */

#[derive(Serialize)]
pub struct ChainResponse<'a> {
    pub chain: &'a [Block],
    pub length: usize,
}

#[derive(Serialize)]
pub struct MineResponse {
    pub message: String,
    pub index: u64,
    pub transactions: Vec<Transaction>,
    pub proof: u64,
    pub previous_hash: String,
}

/* ---------- TX API Models ---------- */

#[derive(Deserialize)]
pub struct NewTxRequest {
    #[serde(default)]
    pub sender: String,
    #[serde(default)]
    pub recipient: String,
    #[serde(default)]
    pub amount: i64,
}

#[derive(Serialize)]
pub struct NewTxResponse {
    pub message: String,
    pub index: u64,
}

#[derive(Serialize)]
pub struct PendingResponse {
    pub size: usize,
    pub transactions: Vec<Transaction>,
}

/* ---------- Node API Models ---------- */

#[derive(Deserialize)]
pub struct RegisterNodesRequest {
    #[serde(default)]
    pub nodes: Vec<String>,
}

#[derive(Serialize)]
pub struct RegisterNodesResponse {
    pub message: String,
    pub total_nodes: Vec<String>,
}

#[derive(Serialize)]
pub struct NodesResponse {
    pub node_id: String,
    pub nodes: Vec<String>,
}

#[derive(Serialize)]
pub struct ResolveResponse {
    pub message: String,
    pub replaced: bool,
    pub chain: Vec<Block>,
}
