//! Collection-bid fan-out.
//!
//! One standing bid for "any item of this collection" is matched against a
//! list of concrete counter-orders, one item per leg, in list order. All legs
//! accumulate fill under the bid's own fingerprint. The batch stops early
//! once the bid is exhausted; matching fewer items than the bid asks for is
//! a legal partial fill.

use tracing::debug;

use crate::engine::exchange::Exchange;
use crate::engine::validator::Invocation;
use crate::error::ExchangeError;
use crate::external::{RoyaltySource, SignatureVerifier, TransferAgent};
use crate::types::{MatchOutcome, SignedOrder};

impl<V: SignatureVerifier, R: RoyaltySource> Exchange<V, R> {
    /// Match a collection bid against `counters`, one leg per counter-order.
    ///
    /// The bid is the left side of every leg, and each leg trades at the
    /// counter-order's price as long as it does not exceed the bid's per-item
    /// price. Any failing leg aborts the whole batch, earlier legs included.
    ///
    /// # Returns
    ///
    /// One outcome per settled leg, in order
    pub fn match_collection_bid<A: TransferAgent>(
        &mut self,
        ctx: &Invocation,
        agent: &mut A,
        bid: &SignedOrder,
        counters: &[SignedOrder],
    ) -> Result<Vec<MatchOutcome>, ExchangeError> {
        if !bid.order.is_collection_bid {
            return Err(ExchangeError::InvalidOrder("not a collection bid"));
        }

        self.invoke(agent, |exchange, tx, agent| {
            let bid_fingerprint = bid.order.fingerprint()?;
            let persistent = bid.order.nonce != 0;
            let mut outcomes = Vec::with_capacity(counters.len());

            for (index, counter) in counters.iter().enumerate() {
                let filled = tx.fill_of(&bid_fingerprint, persistent);
                if index > 0 && filled >= bid.order.requested.amount {
                    debug!(
                        bid = %bid_fingerprint,
                        settled = index,
                        skipped = counters.len() - index,
                        "collection bid exhausted"
                    );
                    break;
                }
                outcomes.push(exchange.settle_pair(tx, ctx, agent, bid, counter)?);
            }
            Ok(outcomes)
        })
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
