use crate::events::OrderCancelled;
use crate::state::{Market, OrderBook, Side};
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{self, Mint, TokenAccount, TokenInterface, TransferChecked};

#[derive(Accounts)]
pub struct CancelOrder<'info> {
    #[account(mut)]
    pub trader: Signer<'info>,

    #[account(
        seeds = [Market::SEED_PREFIX, market.base_mint.as_ref(), market.quote_mint.as_ref()],
        bump = market.bump
    )]
    pub market: Account<'info, Market>,

    #[account(
        mut,
        seeds = [OrderBook::SEED_PREFIX, market.key().as_ref()],
        bump = order_book.bump
    )]
    pub order_book: Account<'info, OrderBook>,

    #[account(address = market.base_mint)]
    pub base_mint: InterfaceAccount<'info, Mint>,

    #[account(address = market.quote_mint)]
    pub quote_mint: InterfaceAccount<'info, Mint>,

    #[account(mut, address = market.base_vault)]
    pub base_vault: InterfaceAccount<'info, TokenAccount>,

    #[account(mut, address = market.quote_vault)]
    pub quote_vault: InterfaceAccount<'info, TokenAccount>,

    #[account(mut, token::mint = base_mint)]
    pub trader_base_account: InterfaceAccount<'info, TokenAccount>,

    #[account(mut, token::mint = quote_mint)]
    pub trader_quote_account: InterfaceAccount<'info, TokenAccount>,

    pub token_program: Interface<'info, TokenInterface>,
}

impl CancelOrder<'_> {
    pub fn apply(ctx: Context<CancelOrder>, side: Side, order_id: u64) -> Result<()> {
        let trader_key = ctx.accounts.trader.key();
        let order = ctx
            .accounts
            .order_book
            .remove_owned_order(side, order_id, &trader_key)?;

        let refund = order.escrow(side)?;
        let (from, to, mint, decimals) = match side {
            Side::Bid => (
                ctx.accounts.quote_vault.to_account_info(),
                ctx.accounts.trader_quote_account.to_account_info(),
                ctx.accounts.quote_mint.to_account_info(),
                ctx.accounts.quote_mint.decimals,
            ),
            Side::Ask => (
                ctx.accounts.base_vault.to_account_info(),
                ctx.accounts.trader_base_account.to_account_info(),
                ctx.accounts.base_mint.to_account_info(),
                ctx.accounts.base_mint.decimals,
            ),
        };

        let seeds: &[&[u8]] = &[
            Market::SEED_PREFIX,
            ctx.accounts.market.base_mint.as_ref(),
            ctx.accounts.market.quote_mint.as_ref(),
            &[ctx.accounts.market.bump],
        ];
        token_interface::transfer_checked(
            CpiContext::new_with_signer(
                ctx.accounts.token_program.to_account_info(),
                TransferChecked {
                    from,
                    to,
                    mint,
                    authority: ctx.accounts.market.to_account_info(),
                },
                &[seeds],
            ),
            refund,
            decimals,
        )?;

        emit!(OrderCancelled {
            market: ctx.accounts.market.key(),
            order_id,
            owner: order.owner,
            side,
            refunded: refund,
        });

        msg!(
            "Order cancelled: id={}, side={:?}, refunded={}",
            order_id,
            side,
            refund
        );

        Ok(())
    }
}
