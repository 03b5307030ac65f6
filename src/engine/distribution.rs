//! Distribution of a resolved leg into value movements.
//!
//! ## Payment Side
//!
//! Each match moves two assets. The one whose class ranks higher
//! (native > wrapped native > fungible > multi NFT > single NFT, ties to the
//! left) is the *payment* and carries every fee. The other asset is passed
//! straight to its recipients' payout list.
//!
//! ## Payment Sequence
//!
//! For a payment of value `V`, strictly in this order:
//!
//! 1. Protocol fee `V * protocol_fee_bps / 10000` to the fee receiver
//! 2. Royalties of the NFT on the other side, capped so royalty plus
//!    protocol basis points never exceed 10000
//! 3. Origin fees declared by the payer's own order
//! 4. Whatever is left, split by the payee order's payout list
//!
//! Every fee is computed on `V` and capped by what is left, so the leg never
//! moves more than `V`. Zero-amount movements are skipped.

use tracing::debug;

use crate::config::EngineConfig;
use crate::engine::resolver::ResolvedLeg;
use crate::error::{ExchangeError, TransferError};
use crate::external::{RoyaltySource, TransferAgent};
use crate::types::units::apply_bps;
use crate::types::{
    total_bps, Address, AssetClass, AssetType, Direction, Order, Part, TransferKind, TransferRecord,
    MAX_BPS,
};

/// One asset moving from a payer order's owner to a payee order's side.
#[derive(Debug, Clone, Copy)]
struct Flow<'o> {
    asset: AssetType,
    value: u128,
    payer: &'o Order,
    payee: &'o Order,
    direction: Direction,
}

/// Fee, royalty and payout engine.
pub struct Distributor<'a, R> {
    config: &'a EngineConfig,
    royalties: &'a R,
}

impl<'a, R: RoyaltySource> Distributor<'a, R> {
    pub fn new(config: &'a EngineConfig, royalties: &'a R) -> Self {
        Self { config, royalties }
    }

    /// Execute every movement of a resolved leg.
    ///
    /// # Returns
    ///
    /// The executed transfers, in execution order
    pub fn settle<A: TransferAgent>(
        &self,
        agent: &mut A,
        leg: &ResolvedLeg,
        left: &Order,
        right: &Order,
    ) -> Result<Vec<TransferRecord>, ExchangeError> {
        check_parts(left)?;
        check_parts(right)?;

        // Left gives left_asset to the right side, and vice versa
        let to_taker = Flow {
            asset: leg.left_asset,
            value: leg.fill.left_value,
            payer: left,
            payee: right,
            direction: Direction::ToTaker,
        };
        let to_maker = Flow {
            asset: leg.right_asset,
            value: leg.fill.right_value,
            payer: right,
            payee: left,
            direction: Direction::ToMaker,
        };

        let mut transfers = Vec::new();
        let (payment, goods) = if fee_side_is_left(&leg.left_asset, &leg.right_asset) {
            (to_taker, to_maker)
        } else {
            (to_maker, to_taker)
        };
        self.pay_with_fees(agent, &payment, &goods.asset, &mut transfers)?;
        self.pay_out(agent, &goods, goods.value, &mut transfers)?;
        Ok(transfers)
    }

    /// Steps 1-4 for the payment flow
    fn pay_with_fees<A: TransferAgent>(
        &self,
        agent: &mut A,
        flow: &Flow<'_>,
        nft_asset: &AssetType,
        out: &mut Vec<TransferRecord>,
    ) -> Result<(), ExchangeError> {
        let value = flow.value;
        let payer = flow.payer.owner;
        let mut rest = value;

        // 1. Protocol fee
        let protocol_bps = self.config.protocol_fee_bps as u32;
        let fee = capped_share(value, protocol_bps, rest)?;
        let fee_asset = if flow.asset.class() == AssetClass::WrappedNative && self.config.fee_in_native {
            AssetType::NativeCoin
        } else {
            flow.asset
        };
        execute(agent, fee_asset, payer, self.config.fee_receiver, fee, flow.direction, TransferKind::Protocol, out)?;
        rest -= fee;

        // 2. Royalties
        if nft_asset.is_nft() {
            let mut headroom = MAX_BPS.saturating_sub(protocol_bps);
            for part in self.royalties.royalties_for(nft_asset) {
                let bps = (part.bps as u32).min(headroom);
                headroom -= bps;
                let amount = capped_share(value, bps, rest)?;
                execute(agent, flow.asset, payer, part.account, amount, flow.direction, TransferKind::Royalty, out)?;
                rest -= amount;
            }
        }

        // 3. Origin fees, funded by the payer
        for part in flow.payer.origin_fees() {
            let amount = capped_share(value, part.bps as u32, rest)?;
            execute(agent, flow.asset, payer, part.account, amount, flow.direction, TransferKind::Origin, out)?;
            rest -= amount;
        }

        // 4. Residual
        self.pay_out(agent, flow, rest, out)
    }

    /// Split `amount` of the flow's asset over the payee's payout list.
    ///
    /// Without a payout list the payee's owner receives everything. Lists
    /// summing to exactly 10000 give the rounding dust to the last entry;
    /// lists summing to less leave the remainder with the payer. An
    /// indivisible asset goes whole to the first entry with a non-zero share.
    fn pay_out<A: TransferAgent>(
        &self,
        agent: &mut A,
        flow: &Flow<'_>,
        amount: u128,
        out: &mut Vec<TransferRecord>,
    ) -> Result<(), ExchangeError> {
        let owner_only = [Part::new(flow.payee.owner, MAX_BPS as u16)];
        let payouts = match flow.payee.payouts() {
            [] => &owner_only[..],
            parts => parts,
        };
        let from = flow.payer.owner;

        if flow.asset.is_nft() {
            if let Some(first) = payouts.iter().find(|p| p.bps > 0) {
                execute(agent, flow.asset, from, first.account, amount, flow.direction, TransferKind::Payout, out)?;
            }
            return Ok(());
        }

        let exact = total_bps(payouts) == MAX_BPS;
        let mut rest = amount;
        for (i, part) in payouts.iter().enumerate() {
            let share = if exact && i == payouts.len() - 1 {
                rest
            } else {
                capped_share(amount, part.bps as u32, rest)?
            };
            execute(agent, flow.asset, from, part.account, share, flow.direction, TransferKind::Payout, out)?;
            rest -= share;
        }
        Ok(())
    }
}

/// True if the left order's asset is the payment side
fn fee_side_is_left(left: &AssetType, right: &AssetType) -> bool {
    left.class().fee_rank() >= right.class().fee_rank()
}

/// Payout and origin-fee lists may not exceed 100%, and a payout list
/// that is present must pay someone
fn check_parts(order: &Order) -> Result<(), ExchangeError> {
    let payouts = total_bps(order.payouts());
    if payouts > MAX_BPS {
        return Err(ExchangeError::BasisPointsOverflow(payouts));
    }
    if !order.payouts().is_empty() && payouts == 0 {
        return Err(ExchangeError::InvalidOrder("payout list pays nobody"));
    }
    let origin = total_bps(order.origin_fees());
    if origin > MAX_BPS {
        return Err(ExchangeError::BasisPointsOverflow(origin));
    }
    Ok(())
}

/// `min(value * bps / 10000, rest)`
fn capped_share(value: u128, bps: u32, rest: u128) -> Result<u128, ExchangeError> {
    let share = apply_bps(value, bps).ok_or(ExchangeError::ArithmeticOverflow)?;
    Ok(share.min(rest))
}

/// Dispatch one movement to the class-specific transfer strategy
#[allow(clippy::too_many_arguments)]
fn execute<A: TransferAgent>(
    agent: &mut A,
    asset_type: AssetType,
    from: Address,
    to: Address,
    amount: u128,
    direction: Direction,
    kind: TransferKind,
    out: &mut Vec<TransferRecord>,
) -> Result<(), ExchangeError> {
    if amount == 0 {
        return Ok(());
    }
    match asset_type {
        AssetType::NativeCoin => agent.transfer_native(&from, &to, amount),
        AssetType::WrappedNative { token } | AssetType::FungibleToken { token } => {
            agent.transfer_token(&token, &from, &to, amount)
        }
        AssetType::NftSingle { collection, item: Some(item) } => {
            if amount != 1 {
                return Err(TransferError::InvalidAmount(amount).into());
            }
            agent.transfer_nft(&collection, item, &from, &to)
        }
        AssetType::NftMulti { collection, item: Some(item) } => {
            agent.transfer_multi(&collection, item, &from, &to, amount)
        }
        AssetType::NftSingle { item: None, .. } | AssetType::NftMulti { item: None, .. } => {
            Err(TransferError::UnresolvedItem)
        }
    }?;

    debug!(?kind, ?direction, %from, %to, amount, "transfer");
    out.push(TransferRecord {
        asset_type,
        amount,
        from,
        to,
        direction,
        kind,
    });
    Ok(())
}

// ============================================================================
// Unit Tests
// ============================================================================
