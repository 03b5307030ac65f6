//! Error taxonomy for the settlement engine.
//!
//! Every error is fatal to the enclosing invocation: the engine rolls back
//! the transfer agent, drops staged ledger writes and returns the reason.

use thiserror::Error;

use crate::types::{Address, Fingerprint};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExchangeError {
    #[error("Order expired at {valid_until} (now {now})")]
    Expired { valid_until: u64, now: u64 },
    #[error("Order not valid before {valid_from} (now {now})")]
    NotYetStarted { valid_from: u64, now: u64 },
    #[error("Order owner {0} did not authorize this order")]
    Unauthorized(Address),
    #[error("Match allowance required for order {0}")]
    AllowanceMissing(Fingerprint),
    #[error("Match allowance expired at {expires_at} (now {now})")]
    AllowanceExpired { expires_at: u64, now: u64 },
    #[error("Match allowance is for order {allowed}, not {order}")]
    AllowanceMismatch {
        allowed: Fingerprint,
        order: Fingerprint,
    },
    #[error("Match allowance not signed by the order book")]
    AllowanceUnauthorized,
    #[error("Order {0} has no remaining capacity")]
    Unfillable(Fingerprint),
    #[error("Fill {fill} exceeds order {fingerprint} capacity {cap}")]
    FillOverflow {
        fingerprint: Fingerprint,
        fill: u128,
        cap: u128,
    },
    #[error("Transfer failed: {0}")]
    TransferFailed(#[from] TransferError),
    #[error("Basis points total {0} exceeds 10000")]
    BasisPointsOverflow(u32),
    #[error("Order assets are not complementary")]
    AssetMismatch,
    #[error("Order is restricted to a different counterparty")]
    CounterpartyMismatch,
    #[error("Invalid order: {0}")]
    InvalidOrder(&'static str),
    #[error("Partial fill rounding error exceeds 0.1%")]
    RoundingError,
    #[error("Offered consideration does not cover the counter-order's price")]
    PriceMismatch,
    #[error("Arithmetic overflow")]
    ArithmeticOverflow,
    #[error("Encoding error: {0}")]
    Encoding(String),
}

/// Refusal reported by the transfer primitive.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransferError {
    #[error("{holder} holds {available}, needs {needed}")]
    InsufficientBalance {
        holder: Address,
        needed: u128,
        available: u128,
    },
    #[error("Invalid amount {0} for this asset class")]
    InvalidAmount(u128),
    #[error("Asset descriptor has no concrete item")]
    UnresolvedItem,
    #[error("Transfer rejected: {0}")]
    Rejected(String),
}
