//! Collaborators the settlement core depends on but does not implement.
//!
//! - [`SignatureVerifier`]: "is this message validly signed by this identity"
//! - [`TransferAgent`]: moves one unit of a given asset class between holders,
//!   and can rewind to a checkpoint so an invocation is all-or-nothing
//! - [`RoyaltySource`]: royalty recipients for an NFT item
//!
//! In-memory implementations ship alongside for tests and the demo binary:
//! [`Balances`], [`RoyaltyRegistry`], [`MockVerifier`].

use crate::error::TransferError;
use crate::types::{Address, AssetType, Part, TokenId};

pub mod balances;
pub mod royalty;
pub mod verifier;

pub use balances::Balances;
pub use royalty::{NoRoyalties, RoyaltyRegistry};
pub use verifier::MockVerifier;

/// Signature oracle.
pub trait SignatureVerifier {
    /// Check that `proof` is a valid signature by `identity` over `message`
    fn verify(&self, identity: &Address, message: &[u8; 32], proof: &[u8]) -> bool;
}

/// Asset movement primitive, one strategy per asset class.
///
/// Each call is atomic on its own. `checkpoint` / `rollback` let the engine
/// discard every movement of a failed invocation.
pub trait TransferAgent {
    type Checkpoint;

    /// Mark the current state
    fn checkpoint(&self) -> Self::Checkpoint;

    /// Undo every movement made since `checkpoint`
    fn rollback(&mut self, checkpoint: Self::Checkpoint);

    fn transfer_native(&mut self, from: &Address, to: &Address, amount: u128)
        -> Result<(), TransferError>;

    /// Fungible token movement (wrapped native included)
    fn transfer_token(
        &mut self,
        token: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), TransferError>;

    /// Single-edition NFT movement (always exactly one item)
    fn transfer_nft(
        &mut self,
        collection: &Address,
        item: TokenId,
        from: &Address,
        to: &Address,
    ) -> Result<(), TransferError>;

    /// Multi-edition NFT movement
    fn transfer_multi(
        &mut self,
        collection: &Address,
        item: TokenId,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), TransferError>;
}

/// Royalty lookup for NFT items.
pub trait RoyaltySource {
    /// Royalty recipients for `asset`, queried once per NFT leg
    fn royalties_for(&self, asset: &AssetType) -> Vec<Part>;
}
