//! In-memory journaled balance book implementing [`TransferAgent`].
//!
//! Every successful movement is appended to a journal; rolling back to a
//! checkpoint replays the journal tail in reverse. Used by the integration
//! tests, the benchmarks and the demo binary.

use std::collections::{HashMap, HashSet};

use tracing::trace;

use crate::error::TransferError;
use crate::external::TransferAgent;
use crate::types::{Address, AssetType, TokenId};

/// What a balance is denominated in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Holding {
    Native,
    Token(Address),
    Item(Address, TokenId),
}

impl Holding {
    fn of(asset_type: &AssetType) -> Option<Self> {
        match *asset_type {
            AssetType::NativeCoin => Some(Holding::Native),
            AssetType::WrappedNative { token } | AssetType::FungibleToken { token } => {
                Some(Holding::Token(token))
            }
            AssetType::NftSingle { collection, item } | AssetType::NftMulti { collection, item } => {
                item.map(|item| Holding::Item(collection, item))
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Movement {
    holding: Holding,
    from: Address,
    to: Address,
    amount: u128,
}

/// Balance book with rollback support.
#[derive(Debug, Default, Clone)]
pub struct Balances {
    balances: HashMap<(Address, Holding), u128>,
    journal: Vec<Movement>,
    blocked: HashSet<Address>,
}

impl Balances {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `amount` of `asset_type` to `account` out of thin air.
    /// Placeholder descriptors are ignored.
    pub fn deposit(&mut self, account: Address, asset_type: &AssetType, amount: u128) {
        if let Some(holding) = Holding::of(asset_type) {
            *self.balances.entry((account, holding)).or_insert(0) += amount;
        }
    }

    /// Balance of `account` in `asset_type` (zero for placeholders)
    pub fn balance_of(&self, account: &Address, asset_type: &AssetType) -> u128 {
        Holding::of(asset_type)
            .and_then(|holding| self.balances.get(&(*account, holding)).copied())
            .unwrap_or(0)
    }

    /// Refuse every future transfer to `account`
    pub fn block(&mut self, account: Address) {
        self.blocked.insert(account);
    }

    /// Number of movements applied and not rolled back
    pub fn journal_len(&self) -> usize {
        self.journal.len()
    }

    fn apply(&mut self, holding: Holding, from: &Address, to: &Address, amount: u128) -> Result<(), TransferError> {
        if amount == 0 {
            return Ok(());
        }
        if self.blocked.contains(to) {
            return Err(TransferError::Rejected(format!("{} refuses transfers", to)));
        }
        let available = self.balances.get(&(*from, holding)).copied().unwrap_or(0);
        if available < amount {
            return Err(TransferError::InsufficientBalance {
                holder: *from,
                needed: amount,
                available,
            });
        }
        self.balances.insert((*from, holding), available - amount);
        *self.balances.entry((*to, holding)).or_insert(0) += amount;
        self.journal.push(Movement {
            holding,
            from: *from,
            to: *to,
            amount,
        });
        trace!(?holding, %from, %to, amount, "balance moved");
        Ok(())
    }
}

impl TransferAgent for Balances {
    type Checkpoint = usize;

    fn checkpoint(&self) -> usize {
        self.journal.len()
    }

    fn rollback(&mut self, checkpoint: usize) {
        while self.journal.len() > checkpoint {
            let Some(m) = self.journal.pop() else { break };
            // The credit is still there; nothing has moved it since
            if let Some(balance) = self.balances.get_mut(&(m.to, m.holding)) {
                *balance -= m.amount;
            }
            *self.balances.entry((m.from, m.holding)).or_insert(0) += m.amount;
        }
    }

    fn transfer_native(&mut self, from: &Address, to: &Address, amount: u128) -> Result<(), TransferError> {
        self.apply(Holding::Native, from, to, amount)
    }

    fn transfer_token(
        &mut self,
        token: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), TransferError> {
        self.apply(Holding::Token(*token), from, to, amount)
    }

    fn transfer_nft(
        &mut self,
        collection: &Address,
        item: TokenId,
        from: &Address,
        to: &Address,
    ) -> Result<(), TransferError> {
        self.apply(Holding::Item(*collection, item), from, to, 1)
    }

    fn transfer_multi(
        &mut self,
        collection: &Address,
        item: TokenId,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), TransferError> {
        self.apply(Holding::Item(*collection, item), from, to, amount)
    }
}
