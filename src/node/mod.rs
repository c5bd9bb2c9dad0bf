pub mod miner;
pub mod peers;

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use log::{debug, info};

use crate::blockchain::{Block, Ledger, MINING_REWARD};
use crate::config::Config;
use crate::error::{MineError, PeerError, SyncError};
use crate::sync::{ChainFetcher, ResolvePolicy, resolve_conflicts};
use crate::transaction::{REWARD_SENDER, Transaction};

pub use miner::MiningTask;
pub use peers::PeerSet;

/// One ledger node: the shared ledger, its peers and mining settings.
///
/// Every ledger mutation goes through the write lock; reads clone a snapshot
/// under the read lock. No lock is held across an `.await`.
pub struct Node {
    node_id: String,
    ledger: RwLock<Ledger>,
    peers: RwLock<PeerSet>,
    mine_timeout: Option<Duration>,
    resolve_policy: ResolvePolicy,
}

impl Node {
    pub fn new(node_id: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
            ledger: RwLock::new(Ledger::new()),
            peers: RwLock::new(PeerSet::new()),
            mine_timeout: None,
            resolve_policy: ResolvePolicy::default(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            mine_timeout: config.mine_timeout,
            resolve_policy: config.resolve_policy,
            ..Self::new(config.node_id.clone())
        }
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    fn ledger(&self) -> RwLockReadGuard<'_, Ledger> {
        self.ledger.read().expect("ledger lock poisoned")
    }

    fn ledger_mut(&self) -> RwLockWriteGuard<'_, Ledger> {
        self.ledger.write().expect("ledger lock poisoned")
    }

    /// Queue a transaction; returns the index of the block that will hold it.
    pub fn submit_transaction(&self, sender: &str, recipient: &str, amount: i64) -> u64 {
        self.ledger_mut().new_transaction(sender, recipient, amount)
    }

    /// Find a proof for the current tip, credit the mining reward and seal
    /// the pending pool.
    ///
    /// The search runs without any lock. If the tip changed by the time it
    /// finishes, the search starts over against the new tip.
    pub async fn mine(&self) -> Result<Block, MineError> {
        loop {
            let last_proof = self.ledger().last_block().proof;
            let proof = MiningTask::spawn(last_proof)
                .join_within(self.mine_timeout)
                .await?;

            let mut ledger = self.ledger_mut();
            if ledger.last_block().proof != last_proof {
                debug!("MINER - tip moved during search, restarting");
                continue;
            }
            ledger.new_transaction(REWARD_SENDER, self.node_id.as_str(), MINING_REWARD);
            let block = ledger.new_block(proof, None)?.clone();
            info!(
                "MINER - sealed block #{} (proof={}, txs={})",
                block.index,
                block.proof,
                block.transactions.len()
            );
            return Ok(block);
        }
    }

    /// Snapshot of the chain and its length.
    pub fn get_chain(&self) -> (Vec<Block>, usize) {
        let ledger = self.ledger();
        (ledger.chain().to_vec(), ledger.len())
    }

    pub fn pending(&self) -> Vec<Transaction> {
        self.ledger().pending().to_vec()
    }

    pub fn register_peer(&self, address: &str) -> Result<bool, PeerError> {
        let added = self
            .peers
            .write()
            .expect("peer lock poisoned")
            .register(address)?;
        if added {
            info!("PEERS - registered {address}");
        }
        Ok(added)
    }

    /// Register every address, or none if any of them is invalid.
    /// Returns the full peer list afterwards.
    pub fn register_peers<S: AsRef<str>>(&self, addresses: &[S]) -> Result<Vec<String>, PeerError> {
        for address in addresses {
            PeerSet::normalize(address.as_ref())?;
        }
        for address in addresses {
            self.register_peer(address.as_ref())?;
        }
        Ok(self.list_peers())
    }

    pub fn list_peers(&self) -> Vec<String> {
        self.peers.read().expect("peer lock poisoned").list()
    }

    /// Run one consensus round against every registered peer and adopt the
    /// winning chain, if any. Returns whether the chain was replaced along
    /// with the chain as it stands afterwards.
    pub async fn resolve<F: ChainFetcher>(
        &self,
        fetcher: &F,
    ) -> Result<(bool, Vec<Block>), SyncError> {
        let peers = self.list_peers();
        let local_len = self.ledger().len();

        let winner = resolve_conflicts(&peers, fetcher, local_len, self.resolve_policy).await?;

        let mut ledger = self.ledger_mut();
        let replaced = match winner {
            Some(candidate) => {
                let length = candidate.chain.len();
                // Validated by resolve_conflicts; under the lock only the length
                // is re-checked against the chain as it is now.
                let replaced = ledger.replace_chain(candidate.chain);
                if replaced {
                    info!(
                        "SYNC - chain replaced by {} (length {local_len} -> {length})",
                        candidate.peer
                    );
                }
                replaced
            }
            None => false,
        };
        Ok((replaced, ledger.chain().to_vec()))
    }
}
