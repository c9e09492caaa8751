//! Chain validation: linkage, hash and signature checks with cascading
//! invalidation.
//!
//! Blocks are scanned strictly in order with one piece of carried state, a
//! latch that flips the first time a block fails and never resets:
//!
//! - index 0 is `genesis`, unchecked;
//! - before the latch flips, a block is `confirmed` if every check passes and
//!   `invalid` otherwise (which flips the latch);
//! - after the latch flips, every block is `above invalid` whatever its own
//!   state.
//!
//! Validation never mutates and never errors. A failure is a verdict.

use std::fmt;
use std::iter::FusedIterator;

use crate::block::Block;
use crate::hasher::BlockHasher;
use crate::verifier::SignatureVerifier;

/// Why a block was judged `invalid`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    /// `previousHash` does not equal the preceding block's `hash`.
    Linkage { expected: String, found: String },

    /// The stored hash does not match the block's current fields.
    HashMismatch { stored: String, computed: String },

    /// The authority signature is missing or does not verify.
    Signature,
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fault::Linkage { expected, found } => {
                write!(f, "broken linkage: expected {}, found {}", expected, found)
            }
            Fault::HashMismatch { stored, computed } => {
                write!(f, "hash mismatch: stored {}, computed {}", stored, computed)
            }
            Fault::Signature => f.write_str("authority signature does not verify"),
        }
    }
}

/// The outcome for one block position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// First block; never checked.
    Genesis,
    /// All checks passed and no earlier block failed.
    Confirmed,
    /// The first failing block.
    Invalid(Fault),
    /// Follows an invalid block; not checked.
    AboveInvalid,
}

impl Verdict {
    /// The label shown to users.
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Genesis => "genesis",
            Verdict::Confirmed => "confirmed",
            Verdict::Invalid(_) => "invalid",
            Verdict::AboveInvalid => "above invalid",
        }
    }

    /// Genesis or confirmed.
    pub fn is_trusted(&self) -> bool {
        matches!(self, Verdict::Genesis | Verdict::Confirmed)
    }

    /// The fault, for an invalid verdict.
    pub fn fault(&self) -> Option<&Fault> {
        match self {
            Verdict::Invalid(fault) => Some(fault),
            _ => None,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Scans chains and produces one verdict per block.
///
/// Without a verifier only linkage and hashes are checked. With one, every
/// non-genesis block must also carry a valid authority signature.
#[derive(Debug, Clone, Default)]
pub struct ChainValidator {
    hasher: BlockHasher,
    verifier: Option<SignatureVerifier>,
}

impl ChainValidator {
    /// Validator for hash-only chains.
    pub fn new(hasher: BlockHasher) -> Self {
        Self {
            hasher,
            verifier: None,
        }
    }

    /// Validator that also requires authority signatures.
    pub fn signed(hasher: BlockHasher, verifier: SignatureVerifier) -> Self {
        Self {
            hasher,
            verifier: Some(verifier),
        }
    }

    /// The hasher in use.
    pub fn hasher(&self) -> &BlockHasher {
        &self.hasher
    }

    /// Whether signatures are checked.
    pub fn checks_signatures(&self) -> bool {
        self.verifier.is_some()
    }

    /// Check one block against its predecessor.
    ///
    /// Linkage is checked first, then the hash, then the signature. The first
    /// failure is reported.
    pub fn check_block(&self, previous: &Block, block: &Block) -> Result<(), Fault> {
        if !block.links_to(previous) {
            return Err(Fault::Linkage {
                expected: previous.hash().to_string(),
                found: block.previous_hash().to_string(),
            });
        }

        let computed = block.recompute_hash(&self.hasher);
        if !computed.matches_hex(block.hash()) {
            return Err(Fault::HashMismatch {
                stored: block.hash().to_string(),
                computed: computed.to_hex(),
            });
        }

        if let Some(verifier) = &self.verifier {
            if !verifier.is_verified(block) {
                return Err(Fault::Signature);
            }
        }

        Ok(())
    }

    /// Lazily produce verdicts in chain order.
    pub fn verdicts<'a>(&'a self, blocks: &'a [Block]) -> Verdicts<'a> {
        Verdicts {
            validator: self,
            blocks,
            position: 0,
            broken: false,
        }
    }

    /// Validate a whole chain.
    pub fn validate(&self, blocks: &[Block]) -> Vec<Verdict> {
        self.verdicts(blocks).collect()
    }

    /// Validate and summarise.
    pub fn report(&self, blocks: &[Block]) -> ChainReport {
        ChainReport {
            verdicts: self.validate(blocks),
        }
    }
}

/// Iterator over verdicts, carrying the cascade latch.
#[derive(Debug, Clone)]
pub struct Verdicts<'a> {
    validator: &'a ChainValidator,
    blocks: &'a [Block],
    position: usize,
    broken: bool,
}

impl Iterator for Verdicts<'_> {
    type Item = Verdict;

    fn next(&mut self) -> Option<Verdict> {
        let index = self.position;
        let block = self.blocks.get(index)?;
        self.position += 1;

        if index == 0 {
            return Some(Verdict::Genesis);
        }
        if self.broken {
            return Some(Verdict::AboveInvalid);
        }

        match self.validator.check_block(&self.blocks[index - 1], block) {
            Ok(()) => Some(Verdict::Confirmed),
            Err(fault) => {
                self.broken = true;
                Some(Verdict::Invalid(fault))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.blocks.len() - self.position;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Verdicts<'_> {}

impl FusedIterator for Verdicts<'_> {}

/// Summary of a validation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainReport {
    /// One verdict per block, in chain order.
    pub verdicts: Vec<Verdict>,
}

impl ChainReport {
    /// Position of the invalid block, if any.
    pub fn first_invalid(&self) -> Option<usize> {
        self.verdicts
            .iter()
            .position(|v| matches!(v, Verdict::Invalid(_)))
    }

    /// The fault that broke the chain, if any.
    pub fn fault(&self) -> Option<&Fault> {
        self.verdicts.iter().find_map(Verdict::fault)
    }

    /// True when no block is invalid.
    pub fn is_intact(&self) -> bool {
        self.first_invalid().is_none()
    }

    /// Number of confirmed blocks.
    pub fn confirmed_count(&self) -> usize {
        self.verdicts
            .iter()
            .filter(|v| matches!(v, Verdict::Confirmed))
            .count()
    }

    /// Verdict labels in chain order.
    pub fn labels(&self) -> Vec<&'static str> {
        self.verdicts.iter().map(Verdict::label).collect()
    }
}
