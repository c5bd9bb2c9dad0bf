use std::sync::atomic::{AtomicBool, Ordering};

use sha2::{Digest, Sha256};

use super::POW_PREFIX;

/// Whether `sha256("{last_proof}{proof}")` in hex starts with [`POW_PREFIX`].
pub fn valid_proof(last_proof: u64, proof: u64) -> bool {
    let guess = format!("{last_proof}{proof}");
    let digest = Sha256::digest(guess.as_bytes());
    hex::encode(digest).starts_with(POW_PREFIX)
}

/// Smallest non-negative proof satisfying [`valid_proof`] for `last_proof`.
/// Blocks the calling thread until found.
pub fn proof_of_work(last_proof: u64) -> u64 {
    let mut proof = 0;
    while !valid_proof(last_proof, proof) {
        proof += 1;
    }
    proof
}

/// Same search as [`proof_of_work`], abandoned with `None` once `cancel` is set.
pub fn proof_of_work_cancellable(last_proof: u64, cancel: &AtomicBool) -> Option<u64> {
    let mut proof = 0;
    loop {
        if cancel.load(Ordering::Relaxed) {
            return None;
        }
        if valid_proof(last_proof, proof) {
            return Some(proof);
        }
        proof += 1;
    }
}
