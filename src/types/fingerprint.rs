//! Order fingerprints and signing hashes.
//!
//! ## SSZ Preimages
//!
//! Every hash in the exchange is SHA-256 over the SSZ encoding of a
//! fixed-size container, so the byte layout is deterministic across
//! platforms. Addresses, amounts and item ids are widened to 32-byte words.
//!
//! | Hash              | Covers                                             |
//! |-------------------|----------------------------------------------------|
//! | Fingerprint       | owner, both descriptors (placeholder kept), nonce  |
//! | Signing hash      | every order field, extension digest included        |
//! | Allowance message | fingerprint, expiry                                |
//!
//! Amounts, validity window and extension data are not part of the
//! fingerprint, so it stays the same while the order is partially consumed.

use std::fmt;

use sha2::{Digest, Sha256};
use ssz_rs::prelude::*;

use crate::error::ExchangeError;
use crate::types::order::{MatchAllowance, Order};

/// 32-byte order identity used as the fill-ledger key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Fingerprint(pub [u8; 32]);

impl Fingerprint {
    /// Fingerprint of an order's standing intent
    pub fn of_order(order: &Order) -> Result<Self, ExchangeError> {
        let preimage = FingerprintPreimage {
            owner: order.owner.to_word(),
            offered_class: order.offered.asset_type.class().to_u8(),
            offered_contract: order.offered.asset_type.contract().to_word(),
            offered_item: order.offered.asset_type.item_word(),
            requested_class: order.requested.asset_type.class().to_u8(),
            requested_contract: order.requested.asset_type.contract().to_word(),
            requested_item: order.requested.asset_type.item_word(),
            nonce: order.nonce,
        };
        ssz_digest(&preimage).map(Fingerprint)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self.to_hex())
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Short form for logs
        write!(f, "{}", &self.to_hex()[..16])
    }
}

/// Message an owner signs to authorize an order
pub fn signing_hash(order: &Order) -> Result<[u8; 32], ExchangeError> {
    let (extension_tag, extension_digest) = match &order.extension {
        Some(ext) => (ext.tag(), ext.digest()),
        None => (0, [0u8; 32]),
    };
    let preimage = SigningPreimage {
        owner: order.owner.to_word(),
        offered_class: order.offered.asset_type.class().to_u8(),
        offered_contract: order.offered.asset_type.contract().to_word(),
        offered_item: order.offered.asset_type.item_word(),
        offered_amount: amount_word(order.offered.amount),
        counterparty: order.counterparty.to_word(),
        requested_class: order.requested.asset_type.class().to_u8(),
        requested_contract: order.requested.asset_type.contract().to_word(),
        requested_item: order.requested.asset_type.item_word(),
        requested_amount: amount_word(order.requested.amount),
        nonce: order.nonce,
        valid_from: order.valid_from,
        valid_until: order.valid_until,
        extension_tag,
        extension_digest,
        is_collection_bid: order.is_collection_bid,
    };
    ssz_digest(&preimage)
}

/// Message the order-book identity signs to issue a match allowance
pub fn allowance_hash(allowance: &MatchAllowance) -> Result<[u8; 32], ExchangeError> {
    let preimage = AllowancePreimage {
        fingerprint: allowance.fingerprint.0,
        expires_at: allowance.expires_at,
    };
    ssz_digest(&preimage)
}

// ============================================================================
// Preimages
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
struct FingerprintPreimage {
    owner: [u8; 32],
    offered_class: u8,
    offered_contract: [u8; 32],
    offered_item: [u8; 32],
    requested_class: u8,
    requested_contract: [u8; 32],
    requested_item: [u8; 32],
    nonce: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
struct SigningPreimage {
    owner: [u8; 32],
    offered_class: u8,
    offered_contract: [u8; 32],
    offered_item: [u8; 32],
    offered_amount: [u8; 32],
    counterparty: [u8; 32],
    requested_class: u8,
    requested_contract: [u8; 32],
    requested_item: [u8; 32],
    requested_amount: [u8; 32],
    nonce: u64,
    valid_from: u64,
    valid_until: u64,
    extension_tag: u8,
    extension_digest: [u8; 32],
    is_collection_bid: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
struct AllowancePreimage {
    fingerprint: [u8; 32],
    expires_at: u64,
}

fn amount_word(amount: u128) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[16..].copy_from_slice(&amount.to_be_bytes());
    word
}

fn ssz_digest<T: SimpleSerialize>(value: &T) -> Result<[u8; 32], ExchangeError> {
    let bytes = ssz_rs::serialize(value).map_err(|e| ExchangeError::Encoding(format!("{:?}", e)))?;
    Ok(Sha256::digest(&bytes).into())
}

// ============================================================================
// Unit Tests
// ============================================================================
