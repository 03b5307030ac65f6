//! Dark Exchange - Demo Entry Point
//!
//! Settles a five-item collection bid against in-memory balances and prints
//! every transfer. Configuration comes from `EXCHANGE_*` environment
//! variables, falling back to demo defaults when they are not set.

use dark_exchange::config::EngineConfig;
use dark_exchange::engine::{Exchange, Invocation};
use dark_exchange::external::{Balances, MockVerifier, RoyaltyRegistry};
use dark_exchange::types::units::{format_units, parse_units, ETHER_DECIMALS};
use dark_exchange::types::{
    allowance_hash, signing_hash, Address, Asset, AssetType, MatchAllowance, Order, Part, SignedAllowance,
    SignedOrder,
};
use dark_exchange::ExchangeError;
use tracing::{info, warn};

const NOW: u64 = 1_700_000_000;
const ITEMS: u128 = 5;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    let config = match EngineConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!(error = %e, "using demo configuration");
            EngineConfig::new(100, Address::from_low_u64(0xFEE), Address::from_low_u64(0xB0))
        }
    };

    if let Err(e) = run(config) {
        eprintln!("Settlement failed: {}", e);
        std::process::exit(1);
    }
}

fn run(config: EngineConfig) -> Result<(), ExchangeError> {
    let one = parse_units("1", ETHER_DECIMALS).ok_or(ExchangeError::ArithmeticOverflow)?;
    let seller = Address::from_low_u64(1);
    let bidder = Address::from_low_u64(2);
    let collection = Address::from_low_u64(0xC0);
    let order_book = config.order_book;

    println!("===========================================");
    println!("  Dark Exchange - Collection Bid Demo");
    println!("===========================================");
    println!("  Protocol fee: {} bps", config.protocol_fee_bps);
    println!("  Fee receiver: {}", config.fee_receiver);
    println!();

    let mut royalties = RoyaltyRegistry::new();
    royalties.set_collection_royalties(
        collection,
        vec![Part::new(Address::from_low_u64(7), 100), Part::new(Address::from_low_u64(8), 50)],
    );

    let mut book = Balances::new();
    book.deposit(bidder, &AssetType::NativeCoin, one * ITEMS);

    // The bidder submits its own bid; every ask is signed by the seller
    // and cleared by the order book
    let bid = Order::new(
        bidder,
        Asset::new(AssetType::NativeCoin, one * ITEMS),
        Asset::new(AssetType::NftSingle { collection, item: None }, ITEMS),
        1,
    )
    .as_collection_bid();

    let mut asks = Vec::new();
    for item in 1..=ITEMS {
        let nft = AssetType::NftSingle { collection, item: Some(item) };
        book.deposit(seller, &nft, 1);
        let ask = Order::new(seller, Asset::new(nft, 1), Asset::new(AssetType::NativeCoin, one), 100 + item as u64);
        let signature = MockVerifier::sign(&seller, &signing_hash(&ask)?);
        let allowance = MatchAllowance {
            fingerprint: ask.fingerprint()?,
            expires_at: NOW + 600,
        };
        let proof = MockVerifier::sign(&order_book, &allowance_hash(&allowance)?);
        asks.push(SignedOrder::signed(ask, signature, SignedAllowance { allowance, proof }));
    }

    let bid_fingerprint = bid.fingerprint()?;
    let fee_receiver = config.fee_receiver;
    let mut exchange = Exchange::new(config, MockVerifier, royalties);
    let outcomes = exchange.match_collection_bid(
        &Invocation::new(bidder, NOW),
        &mut book,
        &SignedOrder::by_submitter(bid),
        &asks,
    )?;

    for (leg, outcome) in outcomes.iter().enumerate() {
        println!("Leg {} -> {}", leg + 1, outcome.record.left_fingerprint);
        for transfer in &outcome.transfers {
            let amount = if transfer.asset_type.is_nft() {
                transfer.amount.to_string()
            } else {
                format_units(transfer.amount, ETHER_DECIMALS).unwrap_or_else(|| transfer.amount.to_string())
            };
            println!("  {:?} {:>10} {} -> {}", transfer.kind, amount, transfer.from, transfer.to);
        }
    }
    println!();

    let display = |value: u128| format_units(value, ETHER_DECIMALS).unwrap_or_else(|| value.to_string());
    println!("Fee receiver: {}", display(book.balance_of(&fee_receiver, &AssetType::NativeCoin)));
    println!("Seller:       {}", display(book.balance_of(&seller, &AssetType::NativeCoin)));
    println!("Bid fill:     {} / {}", exchange.fill_of(&bid_fingerprint), ITEMS);
    println!("State root:   {}", exchange.ledger().state_root_hex());

    info!(legs = outcomes.len(), "demo complete");
    Ok(())
}
