//! Records emitted by a settled match.
//!
//! ## Terminology
//!
//! - **Left / maker**: the first order of a match (the standing bid in a
//!   collection-bid batch)
//! - **Right / taker**: the second order of a match
//!
//! A [`MatchRecord`] is emitted once per leg; a [`TransferRecord`] once per
//! non-zero value movement, in the order the movements were executed.

use crate::types::asset::{Address, AssetType};
use crate::types::fingerprint::Fingerprint;

/// Which party a value movement ultimately benefits.
///
/// Represented as u8:
/// - ToMaker = 0 (value flows toward the left order's owner side)
/// - ToTaker = 1 (value flows toward the right order's owner side)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    ToMaker,
    ToTaker,
}

impl Direction {
    pub fn to_u8(self) -> u8 {
        match self {
            Direction::ToMaker => 0,
            Direction::ToTaker => 1,
        }
    }
}

/// Why a value movement happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferKind {
    Protocol,
    Royalty,
    Origin,
    Payout,
}

/// One executed value movement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRecord {
    pub asset_type: AssetType,
    pub amount: u128,
    pub from: Address,
    pub to: Address,
    pub direction: Direction,
    pub kind: TransferKind,
}

/// Result of one settled leg.
///
/// For collection-bid legs `left_fingerprint` is the descriptive per-item
/// hash of the resolved bid, while `new_left_fill` is the fill recorded under
/// the bid's own fingerprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchRecord {
    pub left_fingerprint: Fingerprint,
    pub right_fingerprint: Fingerprint,
    pub left_owner: Address,
    pub right_owner: Address,
    pub new_left_fill: u128,
    pub new_right_fill: u128,
    /// Amount of the left order's offered asset that changed hands
    pub left_value: u128,
    /// Amount of the right order's offered asset that changed hands
    pub right_value: u128,
}

/// A match record together with the transfers that settled it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOutcome {
    pub record: MatchRecord,
    pub transfers: Vec<TransferRecord>,
}

impl MatchOutcome {
    /// Sum of all transfers of a given kind
    pub fn total_of(&self, kind: TransferKind) -> u128 {
        self.transfers
            .iter()
            .filter(|t| t.kind == kind)
            .map(|t| t.amount)
            .sum()
    }

    /// Sum of all transfers received by `account`
    pub fn received_by(&self, account: &Address) -> u128 {
        self.transfers
            .iter()
            .filter(|t| &t.to == account)
            .map(|t| t.amount)
            .sum()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
