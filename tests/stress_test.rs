//! Stress tests for the Dark Exchange settlement engine.
//!
//! These tests verify, over many seeded random scenarios:
//! 1. Every leg conserves value (fees + royalties + origin + payouts == V)
//! 2. No order is ever filled past its requested amount
//! 3. Failed invocations leave no trace
//! 4. Determinism: same seed, same ledger root
//!
//! ## Running Stress Tests
//!
//! ```bash
//! cargo test --release --test stress_test -- --nocapture
//! ```

use std::time::Instant;

use dark_exchange::config::EngineConfig;
use dark_exchange::engine::{Exchange, Invocation};
use dark_exchange::external::{Balances, MockVerifier, RoyaltyRegistry};
use dark_exchange::types::{
    allowance_hash, signing_hash, Address, Asset, AssetType, MatchAllowance, MatchOutcome, Order,
    OrderExtension, Part, SignedAllowance, SignedOrder,
};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// ============================================================================
// TEST CONSTANTS
// ============================================================================

const NOW: u64 = 1_700_000_000;

/// Random fungible books per run
const BOOK_COUNT: usize = 200;

/// Random collection bids per run
const BID_COUNT: usize = 100;

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn addr(n: u64) -> Address {
    Address::from_low_u64(n)
}

fn order_book() -> Address {
    addr(0xB0)
}

fn token() -> AssetType {
    AssetType::FungibleToken { token: addr(0xA) }
}

fn collection() -> Address {
    addr(0xC0)
}

fn relayed(order: Order) -> SignedOrder {
    let signature = MockVerifier::sign(&order.owner, &signing_hash(&order).unwrap());
    let allowance = MatchAllowance {
        fingerprint: order.fingerprint().unwrap(),
        expires_at: NOW + 600,
    };
    let proof = MockVerifier::sign(&order_book(), &allowance_hash(&allowance).unwrap());
    SignedOrder::signed(order, signature, SignedAllowance { allowance, proof })
}

/// Random parts whose basis points sum to at most `budget`
fn random_parts(rng: &mut ChaCha8Rng, first_account: u64, budget: u16) -> Vec<Part> {
    let count = rng.gen_range(0..=3);
    let mut left = budget;
    let mut parts = Vec::new();
    for i in 0..count {
        if left == 0 {
            break;
        }
        let bps = rng.gen_range(0..=left);
        left -= bps;
        parts.push(Part::new(addr(first_account + i as u64), bps));
    }
    parts
}

/// Random payout list, either absent, exact 100% or under 100%
fn random_payouts(rng: &mut ChaCha8Rng, first_account: u64) -> Vec<Part> {
    match rng.gen_range(0..3) {
        0 => Vec::new(),
        1 => {
            let first = rng.gen_range(1..10_000u16);
            vec![
                Part::new(addr(first_account), first),
                Part::new(addr(first_account + 1), 10_000 - first),
            ]
        }
        _ => vec![Part::new(addr(first_account), rng.gen_range(1..=10_000u16))],
    }
}

/// Sum moved of one asset inside a leg
fn moved(outcome: &MatchOutcome, asset: &AssetType) -> u128 {
    outcome
        .transfers
        .iter()
        .filter(|t| &t.asset_type == asset)
        .map(|t| t.amount)
        .sum()
}

/// Run random fungible books and return the final ledger root
fn run_fungible_books(seed: u64) -> (String, usize) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut legs = 0;
    let config = EngineConfig::new(rng.gen_range(0..=500), addr(0xFEE), order_book());
    let mut exchange = Exchange::new(config, MockVerifier, RoyaltyRegistry::new());

    for book_index in 0..BOOK_COUNT {
        let seller = addr(10_000 + book_index as u64);
        let size: u128 = rng.gen_range(1..=1_000);
        let price: u128 = rng.gen_range(1..=1_000_000);

        let offer = Order::new(seller, Asset::new(token(), size), Asset::new(AssetType::NativeCoin, size * price), 1)
            .with_extension(OrderExtension::V1 {
                payouts: random_payouts(&mut rng, 100),
                origin_fees: vec![],
            });
        let offer_fingerprint = offer.fingerprint().unwrap();
        let offer = relayed(offer);

        let mut agent = Balances::new();
        agent.deposit(seller, &token(), size);

        let takers = rng.gen_range(1..=6);
        for taker_index in 0..takers {
            let taker = addr(20_000 + taker_index);
            let quantity: u128 = rng.gen_range(1..=size);
            agent.deposit(taker, &AssetType::NativeCoin, quantity * price);
            let take = Order::new(
                taker,
                Asset::new(AssetType::NativeCoin, quantity * price),
                Asset::new(token(), quantity),
                0,
            )
            .with_extension(OrderExtension::V1 {
                payouts: vec![],
                origin_fees: random_parts(&mut rng, 200, 2_000),
            });

            let before = exchange.fill_of(&offer_fingerprint);
            let journal = agent.journal_len();
            match exchange.match_single(
                &Invocation::new(taker, NOW),
                &mut agent,
                &offer,
                &SignedOrder::by_submitter(take),
            ) {
                Ok(outcome) => {
                    legs += 1;
                    let record = outcome.record;
                    assert_eq!(moved(&outcome, &token()), record.left_value);
                    let paid = moved(&outcome, &AssetType::NativeCoin);
                    assert!(paid <= record.right_value, "leg paid more than its value");
                    assert_eq!(record.new_left_fill, before + record.right_value);
                }
                Err(_) => {
                    assert_eq!(exchange.fill_of(&offer_fingerprint), before);
                    assert_eq!(agent.journal_len(), journal);
                }
            }
            assert!(exchange.fill_of(&offer_fingerprint) <= size * price, "offer over-filled");
        }
    }

    (exchange.ledger().state_root_hex(), legs)
}

// ============================================================================
// STRESS TESTS
// ============================================================================

/// Random fungible books with random payouts, origin fees and taker sizes.
#[test]
fn stress_fungible_books() {
    println!("\n=== STRESS TEST: Fungible Books ===\n");

    let start = Instant::now();
    let (root, legs) = run_fungible_books(42);
    let elapsed = start.elapsed();

    println!("  Books:        {:>12}", BOOK_COUNT);
    println!("  Legs settled: {:>12}", legs);
    println!("  Elapsed:      {:>12.2?}", elapsed);
    println!("  State root:   {}", root);

    assert!(legs > 0, "Expected some legs to settle");
}

/// Payouts summing to 100% and no fees other than protocol: each leg
/// moves exactly its value.
#[test]
fn stress_conservation_exact() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    for round in 0..BOOK_COUNT {
        let bps = rng.gen_range(0..=1_000);
        let mut registry = RoyaltyRegistry::new();
        registry.set_collection_royalties(collection(), random_parts(&mut rng, 300, 5_000));
        let mut exchange = Exchange::new(EngineConfig::new(bps, addr(0xFEE), order_book()), MockVerifier, registry);

        let seller = addr(1);
        let buyer = addr(2);
        let item = AssetType::NftSingle { collection: collection(), item: Some(round as u128) };
        let price: u128 = rng.gen_range(1..=u64::MAX as u128);
        let first = rng.gen_range(1..10_000u16);

        let ask = Order::new(seller, Asset::new(item, 1), Asset::new(AssetType::NativeCoin, price), 1).with_extension(
            OrderExtension::V1 {
                payouts: vec![Part::new(addr(10), first), Part::new(addr(11), 10_000 - first)],
                origin_fees: vec![],
            },
        );
        let bid = Order::new(buyer, Asset::new(AssetType::NativeCoin, price), Asset::new(item, 1), 0)
            .with_extension(OrderExtension::V1 {
                payouts: vec![],
                origin_fees: random_parts(&mut rng, 400, 3_000),
            });

        let mut agent = Balances::new();
        agent.deposit(seller, &item, 1);
        agent.deposit(buyer, &AssetType::NativeCoin, price);

        let outcome = exchange
            .match_single(&Invocation::new(buyer, NOW), &mut agent, &relayed(ask), &SignedOrder::by_submitter(bid))
            .unwrap();

        assert_eq!(moved(&outcome, &AssetType::NativeCoin), price, "round {} leaked value", round);
        assert_eq!(agent.balance_of(&buyer, &AssetType::NativeCoin), 0);
        assert_eq!(agent.balance_of(&buyer, &item), 1);
    }
}

/// Random collection bids: fill equals the number of legs and never
/// exceeds the bid's item count.
#[test]
fn stress_collection_bids() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);

    for round in 0..BID_COUNT {
        let mut exchange = Exchange::new(
            EngineConfig::new(rng.gen_range(0..=300), addr(0xFEE), order_book()),
            MockVerifier,
            RoyaltyRegistry::new(),
        );
        let bidder = addr(2);
        let seller = addr(1);
        let wanted: u128 = rng.gen_range(1..=8);
        let offered: u128 = rng.gen_range(0..=12);
        let unit_price: u128 = rng.gen_range(1_000..=1_000_000);

        let bid = Order::new(
            bidder,
            Asset::new(AssetType::NativeCoin, unit_price * wanted),
            Asset::new(AssetType::NftSingle { collection: collection(), item: None }, wanted),
            round as u64 + 1,
        )
        .as_collection_bid();
        let bid_fingerprint = bid.fingerprint().unwrap();

        let mut agent = Balances::new();
        agent.deposit(bidder, &AssetType::NativeCoin, unit_price * wanted);
        let mut asks = Vec::new();
        for id in 0..offered {
            let item = AssetType::NftSingle { collection: collection(), item: Some(id) };
            agent.deposit(seller, &item, 1);
            asks.push(relayed(Order::new(
                seller,
                Asset::new(item, 1),
                Asset::new(AssetType::NativeCoin, unit_price),
                1_000 + id as u64,
            )));
        }

        let outcomes = exchange
            .match_collection_bid(&Invocation::new(bidder, NOW), &mut agent, &SignedOrder::by_submitter(bid), &asks)
            .unwrap();

        assert_eq!(outcomes.len() as u128, wanted.min(offered));
        assert_eq!(exchange.fill_of(&bid_fingerprint), outcomes.len() as u128);
        assert!(exchange.fill_of(&bid_fingerprint) <= wanted);
        for outcome in &outcomes {
            assert_eq!(moved(outcome, &AssetType::NativeCoin), unit_price);
        }
    }
}

/// Verify determinism: same seed produces an identical ledger root.
#[test]
fn verify_determinism() {
    let (root1, legs1) = run_fungible_books(12345);
    let (root2, legs2) = run_fungible_books(12345);
    assert_eq!(root1, root2, "State roots must match for determinism");
    assert_eq!(legs1, legs2);

    let (root3, _) = run_fungible_books(12346);
    assert_ne!(root1, root3, "Different seeds should produce different roots");
}
