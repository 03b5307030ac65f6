//! Order types for the Dark Exchange settlement engine.
//!
//! An [`Order`] is a standing intent: "I give `offered`, I want `requested`".
//! The ratio `offered.amount / requested.amount` is the order's price and is
//! preserved across partial fills. Orders are authored off-line and arrive
//! with an [`Authorization`] and, when a third party submits them, a
//! [`SignedAllowance`] from the trusted order-book identity.

use sha2::{Digest, Sha256};

use crate::error::ExchangeError;
use crate::types::asset::{Address, Asset, AssetClass};
use crate::types::fingerprint::Fingerprint;

/// Basis-point denominator (100%)
pub const MAX_BPS: u32 = 10_000;

// ============================================================================
// Part
// ============================================================================

/// An (identity, basis points) pair used by payouts, origin fees and royalties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Part {
    pub account: Address,
    pub bps: u16,
}

impl Part {
    pub fn new(account: Address, bps: u16) -> Self {
        Self { account, bps }
    }
}

/// Sum of basis points in a list of parts
pub fn total_bps(parts: &[Part]) -> u32 {
    parts.iter().map(|p| p.bps as u32).sum()
}

// ============================================================================
// OrderExtension
// ============================================================================

/// Versioned extension payload attached to an order.
///
/// Absence means "pay the owner in full, no origin fee".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OrderExtension {
    /// Payout split and origin (referral) fees
    V1 {
        payouts: Vec<Part>,
        origin_fees: Vec<Part>,
    },
}

impl OrderExtension {
    /// Version tag byte
    pub fn tag(&self) -> u8 {
        match self {
            OrderExtension::V1 { .. } => 1,
        }
    }

    pub fn payouts(&self) -> &[Part] {
        match self {
            OrderExtension::V1 { payouts, .. } => payouts,
        }
    }

    pub fn origin_fees(&self) -> &[Part] {
        match self {
            OrderExtension::V1 { origin_fees, .. } => origin_fees,
        }
    }

    /// SHA-256 over the tag and both part lists (length-prefixed)
    pub fn digest(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update([self.tag()]);
        for parts in [self.payouts(), self.origin_fees()] {
            hasher.update((parts.len() as u32).to_be_bytes());
            for part in parts {
                hasher.update(part.account.0);
                hasher.update(part.bps.to_be_bytes());
            }
        }
        hasher.finalize().into()
    }
}

// ============================================================================
// Order
// ============================================================================

/// A signed intent to exchange one asset for another.
///
/// ## Fields
///
/// - `counterparty`: `Address::ZERO` means anyone may take the order
/// - `nonce`: zero only for orders submitted by their own owner
/// - `valid_from` / `valid_until`: seconds, zero means unbounded
/// - `is_collection_bid`: the requested NFT is a placeholder for any item
///   of the collection
///
/// ## Example
///
/// ```
/// use dark_exchange::types::{Address, Asset, AssetType, Order};
///
/// let seller = Address::from_low_u64(1);
/// let collection = Address::from_low_u64(0xC0);
/// let order = Order::new(
///     seller,
///     Asset::new(AssetType::NftSingle { collection, item: Some(7) }, 1),
///     Asset::new(AssetType::NativeCoin, 1_000_000_000_000_000_000),
///     42,
/// );
/// assert!(order.check_structure().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub owner: Address,
    pub offered: Asset,
    pub counterparty: Address,
    pub requested: Asset,
    pub nonce: u64,
    pub valid_from: u64,
    pub valid_until: u64,
    pub extension: Option<OrderExtension>,
    pub is_collection_bid: bool,
}

impl Order {
    /// Create an open order (any counterparty, unbounded window, no extension)
    pub fn new(owner: Address, offered: Asset, requested: Asset, nonce: u64) -> Self {
        Self {
            owner,
            offered,
            counterparty: Address::ZERO,
            requested,
            nonce,
            valid_from: 0,
            valid_until: 0,
            extension: None,
            is_collection_bid: false,
        }
    }

    /// Restrict the order to a single counterparty
    pub fn with_counterparty(mut self, counterparty: Address) -> Self {
        self.counterparty = counterparty;
        self
    }

    /// Set the validity window (seconds, zero = unbounded)
    pub fn with_window(mut self, valid_from: u64, valid_until: u64) -> Self {
        self.valid_from = valid_from;
        self.valid_until = valid_until;
        self
    }

    pub fn with_extension(mut self, extension: OrderExtension) -> Self {
        self.extension = Some(extension);
        self
    }

    /// Flag this order as a collection bid
    pub fn as_collection_bid(mut self) -> Self {
        self.is_collection_bid = true;
        self
    }

    /// Payout split declared by the owner (empty if none)
    pub fn payouts(&self) -> &[Part] {
        self.extension.as_ref().map(|e| e.payouts()).unwrap_or(&[])
    }

    /// Origin fees declared by the owner (empty if none)
    pub fn origin_fees(&self) -> &[Part] {
        self.extension.as_ref().map(|e| e.origin_fees()).unwrap_or(&[])
    }

    /// Stable fingerprint used as the fill-ledger key
    pub fn fingerprint(&self) -> Result<Fingerprint, ExchangeError> {
        Fingerprint::of_order(self)
    }

    /// Check the order's own structural invariants.
    ///
    /// Time and authorization are checked by the validator; this only
    /// covers what is wrong with the order regardless of context.
    pub fn check_structure(&self) -> Result<(), ExchangeError> {
        if self.offered.amount == 0 || self.requested.amount == 0 {
            return Err(ExchangeError::InvalidOrder("zero amount"));
        }
        if self.valid_from != 0 && self.valid_until != 0 && self.valid_from > self.valid_until {
            return Err(ExchangeError::InvalidOrder("valid_from after valid_until"));
        }
        if self.offered.asset_type.is_placeholder() {
            return Err(ExchangeError::InvalidOrder("offered asset has no item"));
        }
        // A placeholder request counts items, anything else single is exactly one
        let single_offered = self.offered.asset_type.class() == AssetClass::NftSingle;
        let single_requested = self.requested.asset_type.class() == AssetClass::NftSingle
            && !self.requested.asset_type.is_placeholder();
        if (single_offered && self.offered.amount != 1) || (single_requested && self.requested.amount != 1) {
            return Err(ExchangeError::InvalidOrder("single-edition amount must be 1"));
        }
        if self.requested.asset_type.is_placeholder() != self.is_collection_bid {
            return Err(ExchangeError::InvalidOrder(
                "collection bid flag does not match requested asset",
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Authorization
// ============================================================================

/// Proof that the owner authored an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authorization {
    /// The owner is submitting the order directly
    Submitter,
    /// Signature over the order's signing hash
    Signature(Vec<u8>),
}

/// Order-book statement that an order is still eligible to be matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchAllowance {
    pub fingerprint: Fingerprint,
    pub expires_at: u64,
}

/// A [`MatchAllowance`] together with the order-book's signature over it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedAllowance {
    pub allowance: MatchAllowance,
    pub proof: Vec<u8>,
}

/// Everything needed to put one order into a match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedOrder {
    pub order: Order,
    pub auth: Authorization,
    pub allowance: Option<SignedAllowance>,
}

impl SignedOrder {
    /// Order submitted by its own owner
    pub fn by_submitter(order: Order) -> Self {
        Self {
            order,
            auth: Authorization::Submitter,
            allowance: None,
        }
    }

    /// Order relayed by a third party
    pub fn signed(order: Order, signature: Vec<u8>, allowance: SignedAllowance) -> Self {
        Self {
            order,
            auth: Authorization::Signature(signature),
            allowance: Some(allowance),
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
