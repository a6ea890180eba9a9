use anchor_lang::prelude::*;

pub mod errors;
pub mod events;
pub mod instructions;
pub mod state;

pub use errors::ErrorCode;
use instructions::*;
use state::Side;

declare_id!("3YCMh6ohstZUNu4s71ePYvkNCickaqZ52E8xkePqiDc7");

#[program]
pub mod pairbook {
    use super::*;

    pub fn create_market(ctx: Context<CreateMarket>, fee_bps: u16) -> Result<()> {
        CreateMarket::apply(ctx, fee_bps)
    }

    pub fn place_order(
        ctx: Context<PlaceOrder>,
        price: u64,
        amount: u64,
        side: Side,
    ) -> Result<u64> {
        PlaceOrder::apply(ctx, price, amount, side)
    }

    pub fn cancel_order(ctx: Context<CancelOrder>, side: Side, order_id: u64) -> Result<()> {
        CancelOrder::apply(ctx, side, order_id)
    }

    pub fn match_orders<'info>(
        ctx: Context<'_, '_, 'info, 'info, MatchOrders<'info>>,
    ) -> Result<()> {
        MatchOrders::apply(ctx)
    }
}
