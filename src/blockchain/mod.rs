pub mod block;
pub mod ledger;
pub mod pow;

pub use block::Block;
pub use ledger::Ledger;
pub use pow::{proof_of_work, proof_of_work_cancellable, valid_proof};

/// Proof sealed into the genesis block.
pub const GENESIS_PROOF: u64 = 100;

/// Placeholder previous hash of the genesis block (not a real digest).
pub const GENESIS_PREVIOUS_HASH: &str = "1";

/// Hex prefix a proof-of-work digest must start with (fixed difficulty).
pub const POW_PREFIX: &str = "0000";

/// Amount credited to the miner of each block.
pub const MINING_REWARD: i64 = 1;
