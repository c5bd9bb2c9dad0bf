use log::debug;

use super::{Block, valid_proof};
use crate::error::LedgerError;
use crate::transaction::Transaction;

/// In-memory chain plus the pool of transactions waiting for the next block.
///
/// `Ledger` does no locking of its own; [`crate::node::Node`] serializes access.
#[derive(Debug)]
pub struct Ledger {
    chain: Vec<Block>,
    pending: Vec<Transaction>,
}

impl Ledger {
    /// Initialize a ledger sealed with the genesis block.
    pub fn new() -> Self {
        Self {
            chain: vec![Block::genesis()],
            pending: Vec::new(),
        }
    }

    /// Queue a transaction for the next block and return that block's index.
    pub fn new_transaction(
        &mut self,
        sender: impl Into<String>,
        recipient: impl Into<String>,
        amount: i64,
    ) -> u64 {
        self.pending.push(Transaction::new(sender, recipient, amount));
        debug!("LEDGER - pending pool grew to {}", self.pending.len());
        self.last_block().index + 1
    }

    /// Return the last block in the chain.
    pub fn last_block(&self) -> &Block {
        self.chain
            .last()
            .expect("ledger always holds at least the genesis block")
    }

    /// Seal the pending pool into a new block and append it.
    ///
    /// `previous_hash` overrides the link when given and non-empty; otherwise
    /// the hash of the current last block is used.
    pub fn new_block(
        &mut self,
        proof: u64,
        previous_hash: Option<&str>,
    ) -> Result<&Block, LedgerError> {
        let previous_hash = match previous_hash {
            Some(h) if !h.is_empty() => h.to_string(),
            _ => Self::hash(self.last_block())?,
        };
        let index = self.chain.len() as u64 + 1;
        let transactions = std::mem::take(&mut self.pending);

        self.chain.push(Block::new(index, transactions, proof, previous_hash));
        Ok(self.last_block())
    }

    /// Content hash of a block, see [`Block::compute_hash`].
    pub fn hash(block: &Block) -> Result<String, LedgerError> {
        block.compute_hash()
    }

    /// Check hash linkage, index continuity and proof-of-work of every
    /// adjacent pair. Transaction content and the genesis block itself are
    /// not inspected, so a self-consistent chain from a forged genesis passes.
    pub fn valid_chain(chain: &[Block]) -> Result<bool, LedgerError> {
        if chain.is_empty() {
            return Ok(false);
        }

        for pair in chain.windows(2) {
            let (prev, curr) = (&pair[0], &pair[1]);

            if curr.previous_hash != Self::hash(prev)? {
                debug!("CHAIN - block #{} breaks hash linkage", curr.index);
                return Ok(false);
            }
            if prev.index.checked_add(1) != Some(curr.index) {
                debug!(
                    "CHAIN - block #{} does not follow #{}",
                    curr.index, prev.index
                );
                return Ok(false);
            }
            if !valid_proof(prev.proof, curr.proof) {
                debug!("CHAIN - block #{} carries an invalid proof", curr.index);
                return Ok(false);
            }
        }

        Ok(true)
    }

    /// Adopt `candidate` if it is strictly longer than our chain. Pending
    /// transactions are kept.
    ///
    /// Only the length is checked: callers validate the candidate with
    /// [`Ledger::valid_chain`] first, outside of any lock.
    pub fn replace_chain(&mut self, candidate: Vec<Block>) -> bool {
        if candidate.len() <= self.chain.len() {
            debug!(
                "CHAIN - candidate of length {} does not beat local length {}",
                candidate.len(),
                self.chain.len()
            );
            return false;
        }
        self.chain = candidate;
        true
    }

    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::Ledger;
    use crate::blockchain::{Block, proof_of_work, valid_proof};
    use crate::transaction::Transaction;

    fn mine(ledger: &mut Ledger) -> Block {
        let proof = proof_of_work(ledger.last_block().proof);
        ledger.new_block(proof, None).unwrap().clone()
    }

    #[test]
    fn fresh_ledger_holds_only_genesis() {
        let ledger = Ledger::new();
        assert_eq!(ledger.len(), 1);
        let genesis = ledger.last_block();
        assert_eq!(genesis.index, 1);
        assert_eq!(genesis.proof, 100);
        assert_eq!(genesis.previous_hash, "1");
        assert!(genesis.transactions.is_empty());
        assert!(ledger.pending().is_empty());
    }

    #[test]
    fn new_transaction_returns_next_block_index() {
        let mut ledger = Ledger::new();
        assert_eq!(ledger.new_transaction("a", "b", 5), 2);
        assert_eq!(ledger.new_transaction("c", "d", 0), 2);
        assert_eq!(ledger.pending().len(), 2);
    }

    #[test]
    fn new_block_seals_exactly_the_pending_pool() {
        let mut ledger = Ledger::new();
        ledger.new_transaction("a", "b", 5);
        ledger.new_transaction("b", "c", 2);
        let before = ledger.pending().to_vec();

        let block = mine(&mut ledger);

        assert!(ledger.pending().is_empty());
        assert_eq!(block.transactions, before);
        assert_eq!(block.index, 2);
        assert_eq!(block.previous_hash, Ledger::hash(&ledger.chain()[0]).unwrap());
        assert!(valid_proof(100, block.proof));
    }

    #[test]
    fn new_block_honours_explicit_previous_hash() {
        let mut ledger = Ledger::new();
        let block = ledger.new_block(7, Some("abc")).unwrap();
        assert_eq!(block.previous_hash, "abc");

        let block = ledger.new_block(8, Some("")).unwrap().clone();
        assert_eq!(block.previous_hash, Ledger::hash(&ledger.chain()[1]).unwrap());
    }

    #[test]
    fn mined_chain_is_valid() {
        let mut ledger = Ledger::new();
        assert!(Ledger::valid_chain(ledger.chain()).unwrap());
        for i in 0..3 {
            ledger.new_transaction("a", "b", i);
            mine(&mut ledger);
        }
        assert!(Ledger::valid_chain(ledger.chain()).unwrap());
    }

    #[test]
    fn corrupted_previous_hash_invalidates_chain() {
        let mut ledger = Ledger::new();
        mine(&mut ledger);
        mine(&mut ledger);
        let mut chain = ledger.chain().to_vec();
        chain[2].previous_hash = "f".repeat(64);
        assert!(!Ledger::valid_chain(&chain).unwrap());
    }

    #[test]
    fn tampered_transaction_invalidates_chain() {
        let mut ledger = Ledger::new();
        ledger.new_transaction("a", "b", 5);
        mine(&mut ledger);
        mine(&mut ledger);
        let mut chain = ledger.chain().to_vec();
        chain[1].transactions[0].amount = 5_000;
        assert!(!Ledger::valid_chain(&chain).unwrap());
    }

    #[test]
    fn bad_proof_with_correct_linkage_is_invalid() {
        let mut ledger = Ledger::new();
        let mut bad = 0;
        while valid_proof(100, bad) {
            bad += 1;
        }
        ledger.new_block(bad, None).unwrap();
        assert!(!Ledger::valid_chain(ledger.chain()).unwrap());
    }

    #[test]
    fn overflowing_index_is_invalid() {
        let mut genesis = Block::genesis();
        genesis.index = u64::MAX;
        let next = Block::new(
            0,
            Vec::new(),
            proof_of_work(genesis.proof),
            Ledger::hash(&genesis).unwrap(),
        );
        assert!(!Ledger::valid_chain(&[genesis, next]).unwrap());
    }

    #[test]
    fn empty_chain_is_invalid() {
        assert!(!Ledger::valid_chain(&[]).unwrap());
    }

    #[test]
    fn replace_chain_requires_strictly_longer_chain() {
        let mut ours = Ledger::new();
        mine(&mut ours);
        ours.new_transaction("x", "y", 1);

        assert!(!ours.replace_chain(Ledger::new().chain().to_vec()));
        assert!(!ours.replace_chain(ours.chain().to_vec()));
        assert_eq!(ours.len(), 2);

        let mut theirs = Ledger::new();
        mine(&mut theirs);
        mine(&mut theirs);
        assert!(ours.replace_chain(theirs.chain().to_vec()));
        assert_eq!(ours.chain(), theirs.chain());
        assert_eq!(ours.pending(), &[Transaction::new("x", "y", 1)]);
    }
}
