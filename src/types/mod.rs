//! Core data types for Dark Exchange
//!
//! All amounts are `u128` base units; all hashes are SHA-256 over SSZ
//! encodings of fixed-size preimages.
//!
//! ## Types
//!
//! - [`Address`], [`AssetClass`], [`AssetType`], [`Asset`]: what moves
//! - [`Order`], [`Part`], [`OrderExtension`]: standing intents and their terms
//! - [`Authorization`], [`MatchAllowance`], [`SignedAllowance`], [`SignedOrder`]:
//!   proof that an order may be matched now
//! - [`Fingerprint`]: fill-ledger key
//! - [`MatchRecord`], [`TransferRecord`], [`MatchOutcome`]: what a match emits

mod asset;
mod order;
mod fingerprint;
mod record;
pub mod units;

pub use asset::{Address, Asset, AssetClass, AssetType, TokenId, PLACEHOLDER_ITEM_WORD};
pub use order::{
    total_bps, Authorization, MatchAllowance, Order, OrderExtension, Part, SignedAllowance,
    SignedOrder, MAX_BPS,
};
pub use fingerprint::{allowance_hash, signing_hash, Fingerprint};
pub use record::{Direction, MatchOutcome, MatchRecord, TransferKind, TransferRecord};
