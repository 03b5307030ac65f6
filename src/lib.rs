//! # Dark Exchange
//!
//! Deterministic matching and settlement for peer-to-peer trades of
//! fungible and non-fungible assets.
//!
//! ## Architecture
//!
//! The settlement core consists of:
//! - **Types**: Assets, orders, fingerprints, match and transfer records
//! - **Ledger**: Per-fingerprint cumulative fills with staged commits
//! - **External**: Signature, transfer and royalty collaborators
//! - **Engine**: Validation, fill resolution, fee distribution and
//!   collection-bid fan-out
//!
//! ## Design Principles
//!
//! 1. **Determinism**: Identical inputs produce identical transfers and ledger roots
//! 2. **No Floating Point**: Amounts are `u128` base units, divisions floor
//! 3. **Atomic Invocations**: A match call settles completely or changes nothing
//! 4. **Explicit Configuration**: Fee receiver and order-book identity are
//!    passed in, never global

// ============================================================================
// Module declarations
// ============================================================================

/// Core data types: assets, orders, fingerprints, records
pub mod types;

/// Fill ledger and per-invocation staging
pub mod ledger;

/// Collaborator traits and in-memory implementations
pub mod external;

/// Matching engine: validator, resolver, distributor, exchange facade
pub mod engine;

/// Engine configuration
pub mod config;

/// Error types
pub mod error;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use config::{ConfigError, EngineConfig};
pub use engine::{Exchange, Invocation};
pub use error::{ExchangeError, TransferError};
pub use ledger::FillLedger;
pub use types::{Asset, AssetType, Fingerprint, MatchOutcome, MatchRecord, Order, SignedOrder, TransferRecord};
