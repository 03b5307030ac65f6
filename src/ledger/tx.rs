//! Per-invocation staging over the fill ledger.
//!
//! A `LedgerTx` reads through to the committed ledger and buffers every
//! write. Dropping it discards the writes; [`LedgerTx::into_writes`] hands
//! them to [`FillLedger::commit`].
//!
//! Self-authorized orders (nonce 0) are tracked for the duration of the
//! invocation but never persisted: they start at zero and their writes are
//! filtered out of `into_writes`.

use std::collections::{HashMap, HashSet};

use crate::error::ExchangeError;
use crate::ledger::FillLedger;
use crate::types::Fingerprint;

#[derive(Debug)]
pub struct LedgerTx<'a> {
    base: &'a FillLedger,
    staged: HashMap<Fingerprint, u128>,
    transient: HashSet<Fingerprint>,
}

impl<'a> LedgerTx<'a> {
    pub fn new(base: &'a FillLedger) -> Self {
        Self {
            base,
            staged: HashMap::new(),
            transient: HashSet::new(),
        }
    }

    /// Current fill as seen by this invocation
    pub fn fill_of(&self, fingerprint: &Fingerprint, persistent: bool) -> u128 {
        if let Some(fill) = self.staged.get(fingerprint) {
            return *fill;
        }
        if persistent {
            self.base.fill_of(fingerprint)
        } else {
            0
        }
    }

    /// Add `amount` to a fingerprint's fill, refusing to pass `cap`.
    ///
    /// # Returns
    ///
    /// The new cumulative fill
    pub fn add_fill(
        &mut self,
        fingerprint: Fingerprint,
        persistent: bool,
        amount: u128,
        cap: u128,
    ) -> Result<u128, ExchangeError> {
        let current = self.fill_of(&fingerprint, persistent);
        let fill = current
            .checked_add(amount)
            .ok_or(ExchangeError::ArithmeticOverflow)?;
        if fill > cap {
            return Err(ExchangeError::FillOverflow { fingerprint, fill, cap });
        }
        self.staged.insert(fingerprint, fill);
        if !persistent {
            self.transient.insert(fingerprint);
        }
        Ok(fill)
    }

    /// Persistent writes, sorted by fingerprint
    pub fn into_writes(self) -> Vec<(Fingerprint, u128)> {
        let transient = self.transient;
        let mut writes: Vec<_> = self
            .staged
            .into_iter()
            .filter(|(fingerprint, _)| !transient.contains(fingerprint))
            .collect();
        writes.sort_unstable_by_key(|(fingerprint, _)| *fingerprint);
        writes
    }
}
