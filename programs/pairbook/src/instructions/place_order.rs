use crate::errors::ErrorCode;
use crate::events::OrderPlaced;
use crate::state::{LimitOrder, Market, OrderBook, Side};
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{self, Mint, TokenAccount, TokenInterface, TransferChecked};

#[derive(Accounts)]
pub struct PlaceOrder<'info> {
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

impl PlaceOrder<'_> {
    pub fn apply(ctx: Context<PlaceOrder>, price: u64, amount: u64, side: Side) -> Result<u64> {
        require!(price > 0 && amount > 0, ErrorCode::InvalidAmount);

        let order_book = &mut ctx.accounts.order_book;
        let order_id = order_book.allocate_order_id()?;

        let order = LimitOrder {
            owner: ctx.accounts.trader.key(),
            price,
            amount,
            order_id,
        };
        // The bid notional must fit in 64 bits; an overflowing order could
        // never be escrowed or refunded.
        let escrow = order
            .escrow(side)
            .map_err(|_| error!(ErrorCode::InvalidAmount))?;

        // Capacity check happens inside the sorted insert; resting orders
        // never match on placement, crossing is the crank's job.
        order_book.insert_order(side, order)?;

        let (from, to, mint, decimals) = match side {
            Side::Bid => (
                ctx.accounts.trader_quote_account.to_account_info(),
                ctx.accounts.quote_vault.to_account_info(),
                ctx.accounts.quote_mint.to_account_info(),
                ctx.accounts.quote_mint.decimals,
            ),
            Side::Ask => (
                ctx.accounts.trader_base_account.to_account_info(),
                ctx.accounts.base_vault.to_account_info(),
                ctx.accounts.base_mint.to_account_info(),
                ctx.accounts.base_mint.decimals,
            ),
        };
        token_interface::transfer_checked(
            CpiContext::new(
                ctx.accounts.token_program.to_account_info(),
                TransferChecked {
                    from,
                    to,
                    mint,
                    authority: ctx.accounts.trader.to_account_info(),
                },
            ),
            escrow,
            decimals,
        )?;

        emit!(OrderPlaced {
            market: ctx.accounts.market.key(),
            order_id,
            owner: ctx.accounts.trader.key(),
            side,
            price,
            amount,
        });

        msg!(
            "Order placed: id={}, side={:?}, price={}, amount={}, escrowed={}",
            order_id,
            side,
            price,
            amount,
            escrow
        );

        Ok(order_id)
    }
}
