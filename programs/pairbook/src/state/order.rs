use anchor_lang::prelude::*;

use crate::errors::ErrorCode;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Bid, // Buy base, escrow quote
    Ask, // Sell base, escrow base
}

/// A resting order. `amount` is the remaining unfilled quantity in raw base
/// units; `price` is raw quote units per raw base unit.
#[derive(AnchorSerialize, AnchorDeserialize, InitSpace, Clone, Debug, PartialEq, Eq)]
pub struct LimitOrder {
    pub owner: Pubkey,
    pub price: u64,
    pub amount: u64,
    pub order_id: u64,
}

impl LimitOrder {
    /// Escrow still committed to this order: quote notional for a bid,
    /// the raw base amount for an ask.
    pub fn escrow(&self, side: Side) -> Result<u64> {
        match side {
            Side::Bid => self
                .price
                .checked_mul(self.amount)
                .ok_or_else(|| error!(ErrorCode::MathOverflow)),
            Side::Ask => Ok(self.amount),
        }
    }
}
