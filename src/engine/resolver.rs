//! Match resolution: how much of each order changes hands in one leg.
//!
//! ## Fill Accounting
//!
//! Fills are counted in each order's *requested* unit. For an order with
//! fill `f`, the remaining capacity is
//!
//! ```text
//! take = requested.amount - f
//! make = floor(offered.amount * take / requested.amount)
//! ```
//!
//! ## Fill Quantity
//!
//! If the right order asks for more than the left can still give, the left
//! order is filled completely at its own remaining terms; otherwise the
//! right order is filled completely and the left order's ratio decides what
//! the left receives. Price divisions that lose 0.1% or more of the exact
//! value are rejected as a rounding error; remaining capacity floors plainly.
//!
//! A side capped by a take limit (a collection bid taking one item) never
//! sets the price: when it sits on the left, the leg is priced at the
//! counter-order's ratio and the bid's per-item capacity only bounds it.
//!
//! ## Two Keys Per Side
//!
//! [`SideKeys`] carries the ledger key (where the fill accumulates) and the
//! record key (what the match record reports) separately. They only differ
//! for collection-bid legs.

use tracing::debug;

use crate::error::ExchangeError;
use crate::ledger::LedgerTx;
use crate::types::units::{is_rounding_error_floor, partial_floor};
use crate::types::{Address, AssetType, Fingerprint, MatchRecord, Order};

/// Ledger and record identity of one side of a leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SideKeys {
    /// Key the fill is accounted under
    pub ledger: Fingerprint,
    /// Hash reported in the match record
    pub record: Fingerprint,
    /// False for self-authorized (nonce 0) orders, whose fill is never persisted
    pub persistent: bool,
}

impl SideKeys {
    /// Same key for ledger and record
    pub fn for_order(order: &Order, fingerprint: Fingerprint) -> Self {
        Self {
            ledger: fingerprint,
            record: fingerprint,
            persistent: order.nonce != 0,
        }
    }
}

/// One order as it enters a leg.
#[derive(Debug, Clone, Copy)]
pub struct LegSide<'o> {
    pub order: &'o Order,
    pub keys: SideKeys,
    /// Upper bound on the requested quantity this leg may consume
    pub take_limit: Option<u128>,
}

impl<'o> LegSide<'o> {
    pub fn new(order: &'o Order, keys: SideKeys) -> Self {
        Self {
            order,
            keys,
            take_limit: None,
        }
    }

    pub fn with_take_limit(mut self, limit: u128) -> Self {
        self.take_limit = Some(limit);
        self
    }
}

/// Amounts exchanged in one leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillResult {
    /// Amount of the left order's offered asset moving to the right side
    pub left_value: u128,
    /// Amount of the right order's offered asset moving to the left side
    pub right_value: u128,
}

impl FillResult {
    fn swapped(self) -> Self {
        Self {
            left_value: self.right_value,
            right_value: self.left_value,
        }
    }
}

/// A resolved leg, ready for distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedLeg {
    pub fill: FillResult,
    /// Concrete asset the left side gives
    pub left_asset: AssetType,
    /// Concrete asset the right side gives
    pub right_asset: AssetType,
    pub record: MatchRecord,
}

/// Resolve one leg and stage both fills.
pub fn resolve(tx: &mut LedgerTx<'_>, left: &LegSide<'_>, right: &LegSide<'_>) -> Result<ResolvedLeg, ExchangeError> {
    let left_asset = left
        .order
        .offered
        .asset_type
        .satisfies(&right.order.requested.asset_type)
        .ok_or(ExchangeError::AssetMismatch)?;
    let right_asset = right
        .order
        .offered
        .asset_type
        .satisfies(&left.order.requested.asset_type)
        .ok_or(ExchangeError::AssetMismatch)?;

    check_counterparty(left.order, &right.order.owner)?;
    check_counterparty(right.order, &left.order.owner)?;

    let left_fill = tx.fill_of(&left.keys.ledger, left.keys.persistent);
    let right_fill = tx.fill_of(&right.keys.ledger, right.keys.persistent);
    let (left_make, left_take) = remaining(left, left_fill)?;
    let (right_make, right_take) = remaining(right, right_fill)?;

    let fill = if left.take_limit.is_some() && right.take_limit.is_none() {
        fill_amounts((right.order, right_make, right_take), (left.order, left_make, left_take))?.swapped()
    } else {
        fill_amounts((left.order, left_make, left_take), (right.order, right_make, right_take))?
    };
    if fill.left_value == 0 {
        return Err(ExchangeError::Unfillable(left.keys.ledger));
    }
    if fill.right_value == 0 {
        return Err(ExchangeError::Unfillable(right.keys.ledger));
    }

    let new_left_fill = tx.add_fill(
        left.keys.ledger,
        left.keys.persistent,
        fill.right_value,
        left.order.requested.amount,
    )?;
    let new_right_fill = tx.add_fill(
        right.keys.ledger,
        right.keys.persistent,
        fill.left_value,
        right.order.requested.amount,
    )?;

    debug!(
        left = %left.keys.record,
        right = %right.keys.record,
        left_value = fill.left_value,
        right_value = fill.right_value,
        new_left_fill,
        new_right_fill,
        "leg resolved"
    );

    Ok(ResolvedLeg {
        fill,
        left_asset,
        right_asset,
        record: MatchRecord {
            left_fingerprint: left.keys.record,
            right_fingerprint: right.keys.record,
            left_owner: left.order.owner,
            right_owner: right.order.owner,
            new_left_fill,
            new_right_fill,
            left_value: fill.left_value,
            right_value: fill.right_value,
        },
    })
}

fn check_counterparty(order: &Order, other_owner: &Address) -> Result<(), ExchangeError> {
    if !order.counterparty.is_zero() && &order.counterparty != other_owner {
        return Err(ExchangeError::CounterpartyMismatch);
    }
    Ok(())
}

/// Remaining `(make, take)` of one side given its current fill
fn remaining(side: &LegSide<'_>, fill: u128) -> Result<(u128, u128), ExchangeError> {
    let order = side.order;
    let mut take = order
        .requested
        .amount
        .checked_sub(fill)
        .ok_or(ExchangeError::FillOverflow {
            fingerprint: side.keys.ledger,
            fill,
            cap: order.requested.amount,
        })?;
    if let Some(limit) = side.take_limit {
        take = take.min(limit);
    }
    if take == 0 {
        return Err(ExchangeError::Unfillable(side.keys.ledger));
    }
    let make =
        partial_floor(order.offered.amount, order.requested.amount, take).ok_or(ExchangeError::ArithmeticOverflow)?;
    Ok((make, take))
}

/// Fill amounts with `maker`'s ratio deciding the price. Each side is
/// `(order, make, take)`.
fn fill_amounts(maker: (&Order, u128, u128), taker: (&Order, u128, u128)) -> Result<FillResult, ExchangeError> {
    let (maker_order, maker_make, maker_take) = maker;
    let (taker_order, taker_make, taker_take) = taker;
    if taker_take > maker_make {
        fill_left(maker_make, maker_take, taker_order)
    } else {
        fill_right(maker_order, taker_make, taker_take)
    }
}

/// The left side is consumed completely
fn fill_left(left_make: u128, left_take: u128, right: &Order) -> Result<FillResult, ExchangeError> {
    let right_take = safe_partial_floor(left_take, right.offered.amount, right.requested.amount)?;
    if right_take > left_make {
        return Err(ExchangeError::PriceMismatch);
    }
    Ok(FillResult {
        left_value: left_make,
        right_value: left_take,
    })
}

/// The right side is consumed completely, priced at the left order's ratio
fn fill_right(left: &Order, right_make: u128, right_take: u128) -> Result<FillResult, ExchangeError> {
    let maker_value = safe_partial_floor(right_take, left.offered.amount, left.requested.amount)?;
    if maker_value > right_make {
        return Err(ExchangeError::PriceMismatch);
    }
    Ok(FillResult {
        left_value: right_take,
        right_value: maker_value,
    })
}

fn safe_partial_floor(numerator: u128, denominator: u128, target: u128) -> Result<u128, ExchangeError> {
    if is_rounding_error_floor(numerator, denominator, target).ok_or(ExchangeError::ArithmeticOverflow)? {
        return Err(ExchangeError::RoundingError);
    }
    partial_floor(numerator, denominator, target).ok_or(ExchangeError::ArithmeticOverflow)
}

// ============================================================================
// Unit Tests
// ============================================================================
