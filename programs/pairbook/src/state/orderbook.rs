use anchor_lang::prelude::*;

use crate::errors::ErrorCode;
use crate::state::{BidFeePolicy, FeeBreakdown, LimitOrder, Side};

/// One settled match between the best bid and the best ask, priced at the
/// resting ask. The quote legs together release exactly `bid.price * amount`
/// from escrow; the base leg releases exactly `amount`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fill {
    pub bid_order_id: u64,
    pub ask_order_id: u64,
    pub bid_owner: Pubkey,
    pub ask_owner: Pubkey,
    /// Settlement price (the resting ask's price).
    pub price: u64,
    /// Base units traded.
    pub amount: u64,
    /// Seller proceeds: notional minus the seller's fee share.
    pub quote_to_asker: u64,
    /// Buyer refund of unused escrow surplus.
    pub quote_to_bidder: u64,
    pub quote_to_cranker: u64,
    pub quote_to_creator: u64,
}

impl Fill {
    pub fn fee_collected(&self) -> u64 {
        self.quote_to_cranker + self.quote_to_creator
    }
}

/// The mutable book for one market, 1:1 with its Market account at PDA
/// ["order_book", market].
///
/// Sort invariants, maintained by every insert and removal:
/// - `bids` descending by price, ties ascending by order_id
/// - `asks` ascending by price, ties ascending by order_id
#[account]
#[derive(InitSpace)]
pub struct OrderBook {
    pub market: Pubkey,
    /// Monotonic id counter, starts at 1, never reused.
    pub next_order_id: u64,
    #[max_len(50)]
    pub bids: Vec<LimitOrder>,
    #[max_len(50)]
    pub asks: Vec<LimitOrder>,
    pub bump: u8,
}

impl OrderBook {
    pub const SEED_PREFIX: &'static [u8] = b"order_book";

    pub const MAX_ORDERS_PER_SIDE: usize = 50;

    pub fn side(&self, side: Side) -> &Vec<LimitOrder> {
        match side {
            Side::Bid => &self.bids,
            Side::Ask => &self.asks,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut Vec<LimitOrder> {
        match side {
            Side::Bid => &mut self.bids,
            Side::Ask => &mut self.asks,
        }
    }

    pub fn allocate_order_id(&mut self) -> Result<u64> {
        let id = self.next_order_id;
        self.next_order_id = id.checked_add(1).ok_or(ErrorCode::MathOverflow)?;
        Ok(id)
    }

    /// Inserts at the sorted position. A new order always carries a larger
    /// order_id than anything resting, so placing it after all equal-priced
    /// entries preserves the ascending-id tie-break.
    pub fn insert_order(&mut self, side: Side, order: LimitOrder) -> Result<()> {
        let book = self.side_mut(side);
        require!(
            book.len() < Self::MAX_ORDERS_PER_SIDE,
            ErrorCode::OrderBookFull
        );

        let insert_pos = match side {
            Side::Bid => book.iter().position(|resting| resting.price < order.price),
            Side::Ask => book.iter().position(|resting| resting.price > order.price),
        };
        match insert_pos {
            Some(pos) => book.insert(pos, order),
            None => book.push(order),
        }

        Ok(())
    }

    /// Removes by id; Vec::remove keeps the survivors in order.
    pub fn remove_order(&mut self, side: Side, order_id: u64) -> Option<LimitOrder> {
        let book = self.side_mut(side);
        let pos = book.iter().position(|order| order.order_id == order_id)?;
        Some(book.remove(pos))
    }

    /// Cancellation path: the order must exist on the given side and belong
    /// to `owner`. The book is untouched on either failure.
    pub fn remove_owned_order(
        &mut self,
        side: Side,
        order_id: u64,
        owner: &Pubkey,
    ) -> Result<LimitOrder> {
        let book = self.side_mut(side);
        let pos = book
            .iter()
            .position(|order| order.order_id == order_id)
            .ok_or(ErrorCode::OrderNotFound)?;
        require_keys_eq!(book[pos].owner, *owner, ErrorCode::NotOwner);
        Ok(book.remove(pos))
    }

    pub fn best_bid(&self) -> Option<&LimitOrder> {
        self.bids.first()
    }

    pub fn best_ask(&self) -> Option<&LimitOrder> {
        self.asks.first()
    }

    pub fn is_crossed(&self) -> bool {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => bid.price >= ask.price,
            _ => false,
        }
    }

    /// The crank reduction: repeatedly match the book heads while the book is
    /// crossed, producing the token legs for each fill. Fully-filled heads are
    /// removed as they empty. Terminates because total resting amount strictly
    /// decreases every iteration. A non-crossed or empty book yields no fills
    /// and leaves the book untouched.
    pub fn match_crossed(&mut self, fee_bps: u16, policy: BidFeePolicy) -> Result<Vec<Fill>> {
        let mut fills = Vec::new();

        loop {
            let (bid, ask) = match (self.bids.first(), self.asks.first()) {
                (Some(bid), Some(ask)) if bid.price >= ask.price => (bid.clone(), ask.clone()),
                _ => break,
            };

            let fill_amount = bid.amount.min(ask.amount);
            let notional = ask
                .price
                .checked_mul(fill_amount)
                .ok_or(ErrorCode::MathOverflow)?;
            // The buyer escrowed at their own (higher or equal) price.
            let gross = bid
                .price
                .checked_mul(fill_amount)
                .ok_or(ErrorCode::MathOverflow)?;
            let surplus = gross
                .checked_sub(notional)
                .ok_or(ErrorCode::MathOverflow)?;
            let fees = FeeBreakdown::compute(notional, surplus, fee_bps, policy)?;

            fills.push(Fill {
                bid_order_id: bid.order_id,
                ask_order_id: ask.order_id,
                bid_owner: bid.owner,
                ask_owner: ask.owner,
                price: ask.price,
                amount: fill_amount,
                quote_to_asker: notional
                    .checked_sub(fees.ask_fee)
                    .ok_or(ErrorCode::MathOverflow)?,
                quote_to_bidder: fees.bid_refund,
                quote_to_cranker: fees.cranker,
                quote_to_creator: fees.creator,
            });

            self.bids[0].amount -= fill_amount;
            if self.bids[0].amount == 0 {
                self.bids.remove(0);
            }
            self.asks[0].amount -= fill_amount;
            if self.asks[0].amount == 0 {
                self.asks.remove(0);
            }
        }

        Ok(fills)
    }
}
