//! The exchange facade.
//!
//! ## Invocation Boundary
//!
//! Every public match call is one all-or-nothing invocation:
//!
//! ```text
//! checkpoint agent ─► stage fills in LedgerTx ─► validate / resolve / distribute
//!        │                                                │
//!        │                      error ◄───────────────────┤
//!        ▼                        │                       ▼ ok
//!   rollback agent ◄──────────────┘            commit staged fills
//! ```
//!
//! Nothing reaches the [`FillLedger`] before the whole invocation succeeded,
//! and the transfer agent is rewound on any failure.

use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::engine::distribution::Distributor;
use crate::engine::resolver::{resolve, LegSide, SideKeys};
use crate::engine::validator::{Invocation, OrderValidator};
use crate::error::ExchangeError;
use crate::external::{RoyaltySource, SignatureVerifier, TransferAgent};
use crate::ledger::{FillLedger, LedgerTx};
use crate::types::units::partial_floor;
use crate::types::{Asset, Fingerprint, MatchOutcome, Order, SignedOrder};

/// Matching and settlement engine.
///
/// Owns the fill ledger; signature checks, royalty lookups and asset
/// movements go through the collaborators it was built with.
pub struct Exchange<V, R> {
    config: EngineConfig,
    ledger: FillLedger,
    verifier: V,
    royalties: R,
}

impl<V: SignatureVerifier, R: RoyaltySource> Exchange<V, R> {
    pub fn new(config: EngineConfig, verifier: V, royalties: R) -> Self {
        Self {
            config,
            ledger: FillLedger::new(),
            verifier,
            royalties,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn ledger(&self) -> &FillLedger {
        &self.ledger
    }

    /// Committed fill of an order (read-only)
    pub fn fill_of(&self, fingerprint: &Fingerprint) -> u128 {
        self.ledger.fill_of(fingerprint)
    }

    /// Match two orders against each other.
    ///
    /// `left` is conventionally the resting (maker) order and `right` the
    /// taker. Either may be a collection bid, in which case exactly one item
    /// changes hands.
    pub fn match_single<A: TransferAgent>(
        &mut self,
        ctx: &Invocation,
        agent: &mut A,
        left: &SignedOrder,
        right: &SignedOrder,
    ) -> Result<MatchOutcome, ExchangeError> {
        self.invoke(agent, |exchange, tx, agent| {
            exchange.settle_pair(tx, ctx, agent, left, right)
        })
    }

    /// Run `body` as one atomic invocation
    pub(crate) fn invoke<A, T, F>(&mut self, agent: &mut A, body: F) -> Result<T, ExchangeError>
    where
        A: TransferAgent,
        F: FnOnce(&Self, &mut LedgerTx<'_>, &mut A) -> Result<T, ExchangeError>,
    {
        let checkpoint = agent.checkpoint();
        let mut tx = LedgerTx::new(&self.ledger);

        match body(self, &mut tx, agent) {
            Ok(value) => {
                let writes = tx.into_writes();
                let entries = writes.len();
                self.ledger.commit(writes);
                info!(entries, root = %self.ledger.state_root_hex(), "invocation committed");
                Ok(value)
            }
            Err(err) => {
                drop(tx);
                agent.rollback(checkpoint);
                warn!(error = %err, "invocation rolled back");
                Err(err)
            }
        }
    }

    /// Validate, resolve and distribute one leg
    pub(crate) fn settle_pair<A: TransferAgent>(
        &self,
        tx: &mut LedgerTx<'_>,
        ctx: &Invocation,
        agent: &mut A,
        left: &SignedOrder,
        right: &SignedOrder,
    ) -> Result<MatchOutcome, ExchangeError> {
        let validator = OrderValidator::new(&self.verifier, self.config.order_book);
        let left_fingerprint = validator.validate(left, ctx)?;
        let right_fingerprint = validator.validate(right, ctx)?;

        let left_side = leg_side(&left.order, left_fingerprint, &right.order)?;
        let right_side = leg_side(&right.order, right_fingerprint, &left.order)?;
        let leg = resolve(tx, &left_side, &right_side)?;

        let transfers = Distributor::new(&self.config, &self.royalties).settle(agent, &leg, &left.order, &right.order)?;
        Ok(MatchOutcome {
            record: leg.record,
            transfers,
        })
    }
}

/// Build one side of a leg.
///
/// A collection bid accumulates under its own fingerprint but reports the
/// fingerprint of the bid resolved to the counter-order's concrete item, and
/// takes a single item per leg.
fn leg_side<'o>(order: &'o Order, fingerprint: Fingerprint, counter: &Order) -> Result<LegSide<'o>, ExchangeError> {
    if !order.is_collection_bid {
        return Ok(LegSide::new(order, SideKeys::for_order(order, fingerprint)));
    }
    let resolved = resolve_bid(order, counter)?;
    let keys = SideKeys {
        ledger: fingerprint,
        record: resolved.fingerprint()?,
        persistent: order.nonce != 0,
    };
    Ok(LegSide::new(order, keys).with_take_limit(1))
}

/// The bid as if it had asked for `counter`'s item specifically.
///
/// Only used to derive the fingerprint reported for a leg.
fn resolve_bid(bid: &Order, counter: &Order) -> Result<Order, ExchangeError> {
    let concrete = counter
        .offered
        .asset_type
        .satisfies(&bid.requested.asset_type)
        .ok_or(ExchangeError::AssetMismatch)?;
    let unit_price =
        partial_floor(bid.offered.amount, bid.requested.amount, 1).ok_or(ExchangeError::ArithmeticOverflow)?;

    let mut resolved = bid.clone();
    resolved.offered = Asset::new(bid.offered.asset_type, unit_price);
    resolved.requested = Asset::new(concrete, 1);
    resolved.is_collection_bid = false;
    Ok(resolved)
}

// ============================================================================
// Unit Tests
// ============================================================================
