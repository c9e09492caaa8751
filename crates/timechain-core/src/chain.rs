//! Chain: an ordered, owned sequence of blocks.
//!
//! Index 0 is the genesis block. Insertion order is chain order. A chain is
//! never empty: it is created from a genesis block or restored from at least
//! one stored block, and removal of the last remaining block is refused.

use crate::block::Block;
use crate::error::ChainError;

/// An ordered sequence of blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    blocks: Vec<Block>,
}

impl Chain {
    /// Start a chain from its genesis block.
    pub fn new(genesis: Block) -> Self {
        Self {
            blocks: vec![genesis],
        }
    }

    /// Restore a chain from stored blocks.
    pub fn from_blocks(blocks: Vec<Block>) -> Result<Self, ChainError> {
        if blocks.is_empty() {
            return Err(ChainError::Empty);
        }
        Ok(Self { blocks })
    }

    /// Number of blocks, genesis included.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// The blocks in chain order.
    pub fn as_slice(&self) -> &[Block] {
        &self.blocks
    }

    /// Block at `index`.
    pub fn get(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    /// The first block.
    pub fn genesis(&self) -> &Block {
        &self.blocks[0]
    }

    /// The most recent block.
    pub fn head(&self) -> &Block {
        &self.blocks[self.blocks.len() - 1]
    }

    /// Iterate in chain order.
    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }

    /// Append a sealed block.
    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Drop the head block, refusing to drop genesis.
    ///
    /// Used to undo an append whose snapshot write failed.
    pub fn pop_head(&mut self) -> Option<Block> {
        if self.blocks.len() > 1 {
            self.blocks.pop()
        } else {
            None
        }
    }

    /// Remove the block at `index`.
    ///
    /// Later blocks shift down one position. Linkage is not repaired: the
    /// block that followed the removed one now points at a digest that is no
    /// longer its predecessor's, and validation reports that.
    pub fn remove_at(&mut self, index: usize) -> Result<Block, ChainError> {
        self.check_index(index)?;
        if self.blocks.len() == 1 {
            return Err(ChainError::LastBlock);
        }
        Ok(self.blocks.remove(index))
    }

    /// Overwrite the payload of the block at `index` without rehashing.
    ///
    /// Returns the previous payload.
    pub fn force_edit_data_at(
        &mut self,
        index: usize,
        data: impl Into<String>,
    ) -> Result<String, ChainError> {
        self.check_index(index)?;
        let block = &mut self.blocks[index];
        let old = block.data().to_string();
        block.force_edit_stored_data(data);
        Ok(old)
    }

    /// Consume the chain, returning its blocks.
    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }

    fn check_index(&self, index: usize) -> Result<(), ChainError> {
        if index >= self.blocks.len() {
            return Err(ChainError::IndexOutOfRange {
                index,
                len: self.blocks.len(),
            });
        }
        Ok(())
    }
}

impl AsRef<[Block]> for Chain {
    fn as_ref(&self) -> &[Block] {
        &self.blocks
    }
}

impl<'a> IntoIterator for &'a Chain {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hasher::BlockHasher;

    fn make_chain(payloads: &[&str]) -> Chain {
        let hasher = BlockHasher::default();
        let mut chain = Chain::new(Block::genesis(&hasher, "0", 1000, "Genesis Block"));
        for (i, payload) in payloads.iter().enumerate() {
            let next = Block::next(&hasher, chain.head(), 1001 + i as i64, *payload);
            chain.push(next);
        }
        chain
    }

    #[test]
    fn test_push_and_head() {
        let chain = make_chain(&["a", "b"]);
        assert_eq!(chain.len(), 3);
        assert!(!chain.is_empty());
        assert_eq!(chain.head().data(), "b");
        assert_eq!(chain.genesis().data(), "Genesis Block");
    }

    #[test]
    fn test_from_blocks_rejects_empty() {
        assert_eq!(Chain::from_blocks(vec![]), Err(ChainError::Empty));
    }

    #[test]
    fn test_remove_out_of_range_leaves_chain_unchanged() {
        let mut chain = make_chain(&["a", "b"]);
        let before = chain.clone();

        let result = chain.remove_at(3);
        assert_eq!(result, Err(ChainError::IndexOutOfRange { index: 3, len: 3 }));
        assert_eq!(chain, before);
    }

    #[test]
    fn test_remove_middle_block() {
        let mut chain = make_chain(&["a", "b", "c"]);
        let removed = chain.remove_at(2).unwrap();
        assert_eq!(removed.data(), "b");
        assert_eq!(chain.len(), 3);
        assert_eq!(chain.get(2).unwrap().data(), "c");
        assert!(!chain.get(2).unwrap().links_to(chain.get(1).unwrap()));
    }

    #[test]
    fn test_remove_last_remaining_block_refused() {
        let mut chain = make_chain(&[]);
        assert_eq!(chain.remove_at(0), Err(ChainError::LastBlock));
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn test_force_edit_out_of_range() {
        let mut chain = make_chain(&["a"]);
        assert!(matches!(
            chain.force_edit_data_at(5, "x"),
            Err(ChainError::IndexOutOfRange { index: 5, len: 2 })
        ));
        assert_eq!(chain.get(1).unwrap().data(), "a");
    }

    #[test]
    fn test_force_edit_returns_old_payload() {
        let mut chain = make_chain(&["pay Alice"]);
        let old = chain.force_edit_data_at(1, "pay Mallory").unwrap();
        assert_eq!(old, "pay Alice");
        assert_eq!(chain.get(1).unwrap().data(), "pay Mallory");
    }

    #[test]
    fn test_pop_head_keeps_genesis() {
        let mut chain = make_chain(&["a"]);
        assert_eq!(chain.pop_head().unwrap().data(), "a");
        assert!(chain.pop_head().is_none());
        assert_eq!(chain.len(), 1);
    }
}
