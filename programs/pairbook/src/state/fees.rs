use anchor_lang::prelude::*;

use crate::errors::ErrorCode;
use crate::state::Market;

/// How the buyer's side of a fill contributes to the trading fee. The seller
/// always pays half the fee out of their proceeds; this policy decides where
/// the other half comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BidFeePolicy {
    /// The buyer funds the remaining half out of their price-improvement
    /// surplus, capped by that surplus; whatever is left comes back as a
    /// refund. The cap keeps the quote vault exactly conserved on an
    /// equal-price cross, where there is no surplus to draw from.
    AbsorbRemainder,
    /// The buyer pays nothing; the whole surplus is refunded and only the
    /// seller's half is collected.
    RefundAll,
}

/// The quote-unit legs of a single fill. All fields are derived from the
/// settlement notional, the buyer's escrow surplus, and the market fee rate;
/// together they account for every quote unit the fill releases from escrow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeeBreakdown {
    /// Target fee on the notional, floor(notional * fee_bps / 10000).
    pub total: u64,
    /// Deducted from the seller's proceeds: floor(total / 2).
    pub ask_fee: u64,
    /// Contributed by the buyer under the active policy.
    pub bid_fee: u64,
    /// Cranker reward: floor(collected / 10).
    pub cranker: u64,
    /// Market creator's share: collected - cranker.
    pub creator: u64,
    /// Unused escrow returned to the buyer: surplus - bid_fee.
    pub bid_refund: u64,
}

impl FeeBreakdown {
    /// `notional` is the settlement value at the resting ask price; `surplus`
    /// is the extra quote the buyer escrowed above it, (bid.price - ask.price)
    /// * fill.
    pub fn compute(
        notional: u64,
        surplus: u64,
        fee_bps: u16,
        policy: BidFeePolicy,
    ) -> Result<Self> {
        require!(fee_bps <= Market::MAX_FEE_BPS, ErrorCode::InvalidFeeRate);

        // u128 intermediate: notional * fee_bps can exceed u64.
        let total = (notional as u128)
            .checked_mul(fee_bps as u128)
            .ok_or(ErrorCode::MathOverflow)?
            / Market::MAX_FEE_BPS as u128;
        let total = u64::try_from(total).map_err(|_| error!(ErrorCode::MathOverflow))?;

        let ask_fee = total / 2;
        let bid_fee = match policy {
            BidFeePolicy::AbsorbRemainder => total
                .checked_sub(ask_fee)
                .ok_or(ErrorCode::MathOverflow)?
                .min(surplus),
            BidFeePolicy::RefundAll => 0,
        };

        let collected = ask_fee
            .checked_add(bid_fee)
            .ok_or(ErrorCode::MathOverflow)?;
        let cranker = collected / 10;

        Ok(Self {
            total,
            ask_fee,
            bid_fee,
            cranker,
            creator: collected
                .checked_sub(cranker)
                .ok_or(ErrorCode::MathOverflow)?,
            bid_refund: surplus
                .checked_sub(bid_fee)
                .ok_or(ErrorCode::MathOverflow)?,
        })
    }

    pub fn collected(&self) -> u64 {
        self.ask_fee + self.bid_fee
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_fee_market_collects_nothing() {
        // fee = floor(50 * 30 / 10000) = 0
        let fees = FeeBreakdown::compute(50, 10, 30, BidFeePolicy::AbsorbRemainder).unwrap();
        assert_eq!(fees.total, 0);
        assert_eq!(fees.ask_fee, 0);
        assert_eq!(fees.bid_fee, 0);
        assert_eq!(fees.cranker, 0);
        assert_eq!(fees.creator, 0);
        assert_eq!(fees.bid_refund, 10);
    }

    #[test]
    fn full_collection_when_surplus_covers_buyer_half() {
        // notional 1_000_000 at 30 bps -> fee 3000, halves 1500/1500
        let fees =
            FeeBreakdown::compute(1_000_000, 5_000, 30, BidFeePolicy::AbsorbRemainder).unwrap();
        assert_eq!(fees.total, 3000);
        assert_eq!(fees.ask_fee, 1500);
        assert_eq!(fees.bid_fee, 1500);
        assert_eq!(fees.collected(), fees.total);
        assert_eq!(fees.cranker, 300);
        assert_eq!(fees.creator, 2700);
        assert_eq!(fees.bid_refund, 3500);
    }

    #[test]
    fn buyer_half_capped_by_surplus() {
        // Equal-price cross: no surplus, only the seller's half is collected.
        let fees =
            FeeBreakdown::compute(1_000_000, 0, 30, BidFeePolicy::AbsorbRemainder).unwrap();
        assert_eq!(fees.ask_fee, 1500);
        assert_eq!(fees.bid_fee, 0);
        assert_eq!(fees.collected(), 1500);
        assert_eq!(fees.cranker, 150);
        assert_eq!(fees.creator, 1350);
        assert_eq!(fees.bid_refund, 0);
    }

    #[test]
    fn refund_all_policy_spares_the_buyer() {
        let fees = FeeBreakdown::compute(1_000_000, 5_000, 30, BidFeePolicy::RefundAll).unwrap();
        assert_eq!(fees.bid_fee, 0);
        assert_eq!(fees.collected(), 1500);
        assert_eq!(fees.bid_refund, 5_000);
    }

    #[test]
    fn odd_fee_rounds_in_the_buyers_favor() {
        // fee 2999 -> ask half 1499, buyer remainder 1500
        let fees =
            FeeBreakdown::compute(999_999, 10_000, 30, BidFeePolicy::AbsorbRemainder).unwrap();
        assert_eq!(fees.total, 2999);
        assert_eq!(fees.ask_fee, 1499);
        assert_eq!(fees.bid_fee, 1500);
    }

    #[test]
    fn quote_legs_account_for_all_escrow() {
        for (notional, surplus, bps) in [
            (50u64, 10u64, 30u16),
            (1_000_000, 0, 30),
            (1_000_000, 1, 10_000),
            (7, 3, 9_999),
            (u64::MAX / 20_000, 12345, 250),
        ] {
            let fees =
                FeeBreakdown::compute(notional, surplus, bps, BidFeePolicy::AbsorbRemainder)
                    .unwrap();
            let seller = notional - fees.ask_fee;
            // Everything paid out of the quote vault for this fill must equal
            // the escrow it consumes: notional + surplus.
            assert_eq!(
                seller + fees.collected() + fees.bid_refund,
                notional + surplus,
                "notional={notional} surplus={surplus} bps={bps}"
            );
            assert_eq!(fees.cranker + fees.creator, fees.collected());
        }
    }

    #[test]
    fn rejects_out_of_range_fee() {
        assert!(FeeBreakdown::compute(100, 0, 10_001, BidFeePolicy::AbsorbRemainder).is_err());
    }
}
