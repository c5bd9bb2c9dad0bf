//! A proof-of-work ledger node: an in-memory chain of blocks, a brute-force
//! mining puzzle and longest-valid-chain reconciliation with peers.

pub mod api;
pub mod blockchain;
pub mod config;
pub mod error;
pub mod node;
pub mod sync;
pub mod transaction;
