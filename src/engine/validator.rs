//! Order validation.
//!
//! ## Checks (in order)
//!
//! 1. Structure: amounts, window shape, collection-bid flag
//! 2. Time window: `Expired`, `NotYetStarted`
//! 3. Authorization: the submitter is the owner, or a signature by the
//!    owner over the order's signing hash (nonce-0 orders are only valid
//!    when self-submitted)
//! 4. Match allowance, only when the owner is not the submitter: present,
//!    unexpired, for this fingerprint, signed by the order book
//!
//! Validation is a pure check with no side effects, so it runs again for
//! every leg of a collection-bid batch.

use tracing::debug;

use crate::error::ExchangeError;
use crate::external::SignatureVerifier;
use crate::types::{allowance_hash, signing_hash, Address, Authorization, Fingerprint, SignedOrder};

/// Context of one top-level invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Invocation {
    /// Identity submitting the match
    pub submitter: Address,
    /// Current time in seconds
    pub now: u64,
}

impl Invocation {
    pub fn new(submitter: Address, now: u64) -> Self {
        Self { submitter, now }
    }
}

/// Stateless validator bound to a signature oracle and the order-book identity.
pub struct OrderValidator<'a, V> {
    verifier: &'a V,
    order_book: Address,
}

impl<'a, V: SignatureVerifier> OrderValidator<'a, V> {
    pub fn new(verifier: &'a V, order_book: Address) -> Self {
        Self { verifier, order_book }
    }

    /// Validate one order for the current invocation.
    ///
    /// # Returns
    ///
    /// The order's fingerprint
    pub fn validate(&self, signed: &SignedOrder, ctx: &Invocation) -> Result<Fingerprint, ExchangeError> {
        let order = &signed.order;
        order.check_structure()?;

        if order.valid_until != 0 && ctx.now > order.valid_until {
            return Err(ExchangeError::Expired {
                valid_until: order.valid_until,
                now: ctx.now,
            });
        }
        if order.valid_from != 0 && ctx.now < order.valid_from {
            return Err(ExchangeError::NotYetStarted {
                valid_from: order.valid_from,
                now: ctx.now,
            });
        }

        let fingerprint = order.fingerprint()?;
        if order.owner == ctx.submitter {
            return Ok(fingerprint);
        }

        // Third-party submission: the owner must have signed a replay-protected order
        if order.nonce == 0 {
            return Err(ExchangeError::Unauthorized(order.owner));
        }
        let proof = match &signed.auth {
            Authorization::Signature(proof) => proof,
            Authorization::Submitter => return Err(ExchangeError::Unauthorized(order.owner)),
        };
        if !self.verifier.verify(&order.owner, &signing_hash(order)?, proof) {
            return Err(ExchangeError::Unauthorized(order.owner));
        }

        let signed_allowance = signed
            .allowance
            .as_ref()
            .ok_or(ExchangeError::AllowanceMissing(fingerprint))?;
        let allowance = &signed_allowance.allowance;
        if ctx.now > allowance.expires_at {
            return Err(ExchangeError::AllowanceExpired {
                expires_at: allowance.expires_at,
                now: ctx.now,
            });
        }
        if allowance.fingerprint != fingerprint {
            return Err(ExchangeError::AllowanceMismatch {
                allowed: allowance.fingerprint,
                order: fingerprint,
            });
        }
        if !self
            .verifier
            .verify(&self.order_book, &allowance_hash(allowance)?, &signed_allowance.proof)
        {
            return Err(ExchangeError::AllowanceUnauthorized);
        }

        debug!(%fingerprint, owner = %order.owner, "relayed order validated");
        Ok(fingerprint)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
