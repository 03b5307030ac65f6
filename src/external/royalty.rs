//! Royalty resolution.
//!
//! Lookup order for an NFT item:
//!
//! 1. Item-level override in the registry
//! 2. Collection-wide default in the registry
//! 3. External per-item standard (the item contract reports its own royalty)
//!
//! The first source that has an entry wins, even if that entry is empty.

use std::collections::HashMap;

use crate::external::RoyaltySource;
use crate::types::{Address, AssetType, Part, TokenId};

/// Source that never reports royalties.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRoyalties;

impl RoyaltySource for NoRoyalties {
    fn royalties_for(&self, _asset: &AssetType) -> Vec<Part> {
        Vec::new()
    }
}

/// Registry of royalty entries with an optional external fallback.
#[derive(Default)]
pub struct RoyaltyRegistry {
    items: HashMap<(Address, TokenId), Vec<Part>>,
    collections: HashMap<Address, Vec<Part>>,
    external: Option<Box<dyn RoyaltySource>>,
}

impl std::fmt::Debug for RoyaltyRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoyaltyRegistry")
            .field("items", &self.items.len())
            .field("collections", &self.collections.len())
            .field("external", &self.external.is_some())
            .finish()
    }
}

impl RoyaltyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry that falls back to `external` when it has no entry
    pub fn with_external(external: Box<dyn RoyaltySource>) -> Self {
        Self {
            external: Some(external),
            ..Self::default()
        }
    }

    pub fn set_item_royalties(&mut self, collection: Address, item: TokenId, parts: Vec<Part>) {
        self.items.insert((collection, item), parts);
    }

    pub fn set_collection_royalties(&mut self, collection: Address, parts: Vec<Part>) {
        self.collections.insert(collection, parts);
    }
}

impl RoyaltySource for RoyaltyRegistry {
    fn royalties_for(&self, asset: &AssetType) -> Vec<Part> {
        if !asset.is_nft() {
            return Vec::new();
        }
        let collection = asset.contract();
        if let Some(parts) = asset.item().and_then(|item| self.items.get(&(collection, item))) {
            return parts.clone();
        }
        if let Some(parts) = self.collections.get(&collection) {
            return parts.clone();
        }
        match &self.external {
            Some(external) => external.royalties_for(asset),
            None => Vec::new(),
        }
    }
}
