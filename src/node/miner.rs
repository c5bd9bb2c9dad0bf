use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use actix_web::rt::task::{JoinHandle, spawn_blocking};
use actix_web::rt::time::timeout;
use log::{debug, warn};

use crate::blockchain::proof_of_work_cancellable;
use crate::error::MineError;

/// A proof-of-work search running on the blocking thread pool.
///
/// Dropping the handle does not stop the search; call [`MiningTask::cancel`].
pub struct MiningTask {
    last_proof: u64,
    cancel: Arc<AtomicBool>,
    handle: JoinHandle<Option<u64>>,
}

impl MiningTask {
    pub fn spawn(last_proof: u64) -> Self {
        Self::spawn_search(last_proof, proof_of_work_cancellable)
    }

    /// Run `search` on the blocking pool, handing it the cancel flag.
    fn spawn_search<S>(last_proof: u64, search: S) -> Self
    where
        S: FnOnce(u64, &AtomicBool) -> Option<u64> + Send + 'static,
    {
        let cancel = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancel);
        let handle = spawn_blocking(move || search(last_proof, &flag));
        debug!("MINER - searching proof for last_proof={last_proof}");
        Self {
            last_proof,
            cancel,
            handle,
        }
    }

    /// Ask the search to stop; it returns at its next iteration.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    /// Wait for the search to finish.
    pub async fn join(self) -> Result<u64, MineError> {
        match self.handle.await {
            Ok(Some(proof)) => Ok(proof),
            Ok(None) => Err(MineError::Cancelled),
            Err(e) => Err(MineError::Worker(e.to_string())),
        }
    }

    /// Wait at most `limit`, cancelling the search when it runs out.
    /// `None` waits until the search completes.
    pub async fn join_within(mut self, limit: Option<Duration>) -> Result<u64, MineError> {
        let Some(limit) = limit else {
            return self.join().await;
        };
        match timeout(limit, &mut self.handle).await {
            Ok(Ok(Some(proof))) => Ok(proof),
            Ok(Ok(None)) => Err(MineError::Cancelled),
            Ok(Err(e)) => Err(MineError::Worker(e.to_string())),
            Err(_) => {
                warn!(
                    "MINER - no proof for last_proof={} within {limit:?}, cancelling",
                    self.last_proof
                );
                self.cancel();
                Err(MineError::TimedOut(limit))
            }
        }
    }
}
