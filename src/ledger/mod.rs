//! Fill ledger: cumulative filled quantity per order fingerprint.
//!
//! ## Invariants
//!
//! - Entries are created implicitly at zero
//! - Entries only change through a committed [`LedgerTx`]
//! - Entries never decrease
//!
//! The cap (an entry never exceeds its order's requested amount) is checked
//! when a fill is staged, because the ledger itself does not know the order.
//!
//! ## State Root
//!
//! [`FillLedger::state_root`] hashes all entries in fingerprint order, so two
//! ledgers that saw the same committed matches produce the same root.

use std::collections::BTreeMap;

use sha2::{Digest, Sha256};

use crate::types::Fingerprint;

mod tx;

pub use tx::LedgerTx;

/// Persistent fingerprint -> filled quantity store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FillLedger {
    fills: BTreeMap<Fingerprint, u128>,
}

impl FillLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filled quantity recorded for `fingerprint` (zero if never matched)
    #[inline]
    pub fn fill_of(&self, fingerprint: &Fingerprint) -> u128 {
        self.fills.get(fingerprint).copied().unwrap_or(0)
    }

    /// Number of fingerprints with a recorded fill
    #[inline]
    pub fn len(&self) -> usize {
        self.fills.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fills.is_empty()
    }

    /// Apply the writes of a successful invocation.
    ///
    /// Writes that would lower an entry are ignored; staged values are
    /// produced from the current entry so this only happens if the caller
    /// mixes writes from different ledgers.
    pub fn commit(&mut self, writes: Vec<(Fingerprint, u128)>) {
        for (fingerprint, fill) in writes {
            let entry = self.fills.entry(fingerprint).or_insert(0);
            if fill > *entry {
                *entry = fill;
            }
        }
    }

    /// SHA-256 over all `(fingerprint, fill)` entries in key order
    pub fn state_root(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        for (fingerprint, fill) in &self.fills {
            hasher.update(fingerprint.0);
            hasher.update(fill.to_be_bytes());
        }
        hasher.finalize().into()
    }

    /// State root as a hex string
    pub fn state_root_hex(&self) -> String {
        hex::encode(self.state_root())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
