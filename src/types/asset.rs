//! Identities and asset descriptors.
//!
//! ## Asset Classes
//!
//! Every asset belongs to one of five closed classes. The class decides how a
//! unit moves between holders and which side of a match pays fees:
//!
//! | Class            | Unit                 | Divisible |
//! |------------------|----------------------|-----------|
//! | `NativeCoin`     | wei-equivalent       | yes       |
//! | `WrappedNative`  | wei-equivalent       | yes       |
//! | `FungibleToken`  | token base unit      | yes       |
//! | `NftSingle`      | item count (always 1)| no        |
//! | `NftMulti`       | item count           | no        |
//!
//! ## Word Encoding
//!
//! Descriptors are hashed as 32-byte words so the preimages stay fixed-size
//! SSZ containers. Addresses are left-padded, item ids are big-endian, and the
//! collection-bid placeholder item is all `0xFF` (never a valid `u128` id).

use std::fmt;

/// NFT item identifier within a collection
pub type TokenId = u128;

/// Word used for the item slot of a collection-bid placeholder
pub const PLACEHOLDER_ITEM_WORD: [u8; 32] = [0xFF; 32];

// ============================================================================
// Address
// ============================================================================

/// A 20-byte account or contract identity.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The zero address. Used as "any counterparty" in orders.
    pub const ZERO: Address = Address([0u8; 20]);

    /// Build an address whose low 8 bytes hold `value` (tests, demos)
    pub fn from_low_u64(value: u64) -> Self {
        let mut bytes = [0u8; 20];
        bytes[12..].copy_from_slice(&value.to_be_bytes());
        Address(bytes)
    }

    /// Parse a hex address, with or without a `0x` prefix
    ///
    /// # Example
    ///
    /// ```
    /// use dark_exchange::types::Address;
    ///
    /// let a = Address::from_hex("0x00000000000000000000000000000000000000ff").unwrap();
    /// assert_eq!(a, Address::from_low_u64(255));
    /// ```
    pub fn from_hex(s: &str) -> Option<Self> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s).ok()?;
        let bytes: [u8; 20] = bytes.try_into().ok()?;
        Some(Address(bytes))
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// Left-padded 32-byte word
    pub fn to_word(&self) -> [u8; 32] {
        let mut word = [0u8; 32];
        word[12..].copy_from_slice(&self.0);
        word
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

// ============================================================================
// AssetClass
// ============================================================================

/// Closed set of asset classes.
///
/// Represented as u8 for hashing:
/// - NativeCoin = 0
/// - WrappedNative = 1
/// - FungibleToken = 2
/// - NftSingle = 3
/// - NftMulti = 4
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetClass {
    NativeCoin,
    WrappedNative,
    FungibleToken,
    NftSingle,
    NftMulti,
}

impl AssetClass {
    /// Convert to u8 for hashing
    pub fn to_u8(self) -> u8 {
        match self {
            AssetClass::NativeCoin => 0,
            AssetClass::WrappedNative => 1,
            AssetClass::FungibleToken => 2,
            AssetClass::NftSingle => 3,
            AssetClass::NftMulti => 4,
        }
    }

    /// Convert from u8
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(AssetClass::NativeCoin),
            1 => Some(AssetClass::WrappedNative),
            2 => Some(AssetClass::FungibleToken),
            3 => Some(AssetClass::NftSingle),
            4 => Some(AssetClass::NftMulti),
            _ => None,
        }
    }

    /// NFT classes are indivisible
    pub fn is_nft(self) -> bool {
        matches!(self, AssetClass::NftSingle | AssetClass::NftMulti)
    }

    /// Payment priority. The higher-ranked side of a match carries the fees.
    pub fn fee_rank(self) -> u8 {
        match self {
            AssetClass::NativeCoin => 4,
            AssetClass::WrappedNative => 3,
            AssetClass::FungibleToken => 2,
            AssetClass::NftMulti => 1,
            AssetClass::NftSingle => 0,
        }
    }
}

// ============================================================================
// AssetType
// ============================================================================

/// Class plus descriptor.
///
/// NFT variants carry `item: None` only as a collection-bid placeholder; it is
/// resolved to a concrete item at match time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetType {
    NativeCoin,
    WrappedNative { token: Address },
    FungibleToken { token: Address },
    NftSingle { collection: Address, item: Option<TokenId> },
    NftMulti { collection: Address, item: Option<TokenId> },
}

impl AssetType {
    pub fn class(&self) -> AssetClass {
        match self {
            AssetType::NativeCoin => AssetClass::NativeCoin,
            AssetType::WrappedNative { .. } => AssetClass::WrappedNative,
            AssetType::FungibleToken { .. } => AssetClass::FungibleToken,
            AssetType::NftSingle { .. } => AssetClass::NftSingle,
            AssetType::NftMulti { .. } => AssetClass::NftMulti,
        }
    }

    pub fn is_nft(&self) -> bool {
        self.class().is_nft()
    }

    /// Contract address, zero for the native coin
    pub fn contract(&self) -> Address {
        match self {
            AssetType::NativeCoin => Address::ZERO,
            AssetType::WrappedNative { token } | AssetType::FungibleToken { token } => *token,
            AssetType::NftSingle { collection, .. } | AssetType::NftMulti { collection, .. } => {
                *collection
            }
        }
    }

    /// Item id for NFT classes (None for fungibles and placeholders)
    pub fn item(&self) -> Option<TokenId> {
        match self {
            AssetType::NftSingle { item, .. } | AssetType::NftMulti { item, .. } => *item,
            _ => None,
        }
    }

    /// NFT descriptor whose item is still the collection-bid placeholder
    pub fn is_placeholder(&self) -> bool {
        self.is_nft() && self.item().is_none()
    }

    /// Copy of this descriptor with the item slot resolved to `item`.
    /// Fungible descriptors are returned unchanged.
    pub fn with_item(&self, item: TokenId) -> AssetType {
        match *self {
            AssetType::NftSingle { collection, .. } => AssetType::NftSingle {
                collection,
                item: Some(item),
            },
            AssetType::NftMulti { collection, .. } => AssetType::NftMulti {
                collection,
                item: Some(item),
            },
            other => other,
        }
    }

    /// Item slot as a 32-byte word
    pub fn item_word(&self) -> [u8; 32] {
        if self.is_placeholder() {
            return PLACEHOLDER_ITEM_WORD;
        }
        let mut word = [0u8; 32];
        if let Some(item) = self.item() {
            word[16..].copy_from_slice(&item.to_be_bytes());
        }
        word
    }

    /// Check whether `self` (what one order offers) satisfies `requested`
    /// (what the other order asks for).
    ///
    /// Returns the concrete asset type that will move. A placeholder request
    /// accepts any item of the same class and collection.
    pub fn satisfies(&self, requested: &AssetType) -> Option<AssetType> {
        if self == requested {
            return Some(*self);
        }
        if requested.is_placeholder()
            && self.class() == requested.class()
            && self.contract() == requested.contract()
            && self.item().is_some()
        {
            return Some(*self);
        }
        None
    }
}

// ============================================================================
// Asset
// ============================================================================

/// An asset type together with an amount in its native unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Asset {
    pub asset_type: AssetType,
    pub amount: u128,
}

impl Asset {
    pub fn new(asset_type: AssetType, amount: u128) -> Self {
        Self { asset_type, amount }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
