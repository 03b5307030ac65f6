//! Matching and settlement engine.
//!
//! ## Design Principles
//!
//! 1. **Determinism**: Same orders, ledger and collaborators always produce
//!    the same transfers in the same order
//! 2. **Integer Math**: Every division floors; nothing rounds up in the
//!    payer's disfavor
//! 3. **All-or-Nothing**: An invocation commits every leg or none
//! 4. **Sequential Legs**: Collection-bid legs settle strictly in list order
//!
//! ## Pipeline
//!
//! ```text
//! SignedOrder ─► OrderValidator ─► resolve ─► Distributor ─► MatchOutcome
//!                  (pure)        (LedgerTx)   (TransferAgent)
//! ```
//!
//! ## Example
//!
//! ```
//! use dark_exchange::config::EngineConfig;
//! use dark_exchange::engine::{Exchange, Invocation};
//! use dark_exchange::external::{Balances, MockVerifier, NoRoyalties};
//! use dark_exchange::types::{
//!     allowance_hash, signing_hash, Address, Asset, AssetType, MatchAllowance, Order, SignedAllowance,
//!     SignedOrder,
//! };
//!
//! let seller = Address::from_low_u64(1);
//! let buyer = Address::from_low_u64(2);
//! let order_book = Address::from_low_u64(0xB0);
//! let nft = AssetType::NftSingle { collection: Address::from_low_u64(0xC0), item: Some(7) };
//!
//! let config = EngineConfig::new(100, Address::from_low_u64(0xFEE), order_book);
//! let mut exchange = Exchange::new(config, MockVerifier, NoRoyalties);
//! let mut book = Balances::new();
//! book.deposit(seller, &nft, 1);
//! book.deposit(buyer, &AssetType::NativeCoin, 10_000);
//!
//! // Resting ask, signed off-line and cleared by the order book
//! let ask = Order::new(seller, Asset::new(nft, 1), Asset::new(AssetType::NativeCoin, 10_000), 1);
//! let signature = MockVerifier::sign(&seller, &signing_hash(&ask).unwrap());
//! let allowance = MatchAllowance { fingerprint: ask.fingerprint().unwrap(), expires_at: 60 };
//! let proof = MockVerifier::sign(&order_book, &allowance_hash(&allowance).unwrap());
//! let ask = SignedOrder::signed(ask, signature, SignedAllowance { allowance, proof });
//!
//! // The buyer submits its own nonce-0 order
//! let take = Order::new(buyer, Asset::new(AssetType::NativeCoin, 10_000), Asset::new(nft, 1), 0);
//! let outcome = exchange
//!     .match_single(&Invocation::new(buyer, 0), &mut book, &ask, &SignedOrder::by_submitter(take))
//!     .unwrap();
//!
//! assert_eq!(outcome.received_by(&seller), 9_900);
//! assert_eq!(book.balance_of(&buyer, &nft), 1);
//! ```

mod collection;
pub mod distribution;
pub mod exchange;
pub mod resolver;
pub mod validator;

pub use distribution::Distributor;
pub use exchange::Exchange;
pub use resolver::{resolve, FillResult, LegSide, ResolvedLeg, SideKeys};
pub use validator::{Invocation, OrderValidator};
