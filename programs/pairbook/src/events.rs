use crate::state::Side;
use anchor_lang::prelude::*;

#[event]
pub struct MarketCreated {
    pub market: Pubkey,
    pub base_mint: Pubkey,
    pub quote_mint: Pubkey,
    pub creator: Pubkey,
    pub fee_bps: u16,
}

#[event]
pub struct OrderPlaced {
    pub market: Pubkey,
    pub order_id: u64,
    pub owner: Pubkey,
    pub side: Side,
    pub price: u64,
    pub amount: u64,
}

#[event]
pub struct OrderCancelled {
    pub market: Pubkey,
    pub order_id: u64,
    pub owner: Pubkey,
    pub side: Side,
    pub refunded: u64,
}

#[event]
pub struct OrderFilled {
    pub market: Pubkey,
    pub bid_order_id: u64,
    pub ask_order_id: u64,
    pub bid_owner: Pubkey,
    pub ask_owner: Pubkey,
    pub price: u64,
    pub amount: u64,
    pub fee_collected: u64,
}
