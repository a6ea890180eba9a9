use crate::errors::ErrorCode;
use crate::events::MarketCreated;
use crate::state::{Market, OrderBook};
use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

#[derive(Accounts)]
pub struct CreateMarket<'info> {
    #[account(mut)]
    pub creator: Signer<'info>,

    pub base_mint: InterfaceAccount<'info, Mint>,
    pub quote_mint: InterfaceAccount<'info, Mint>,

    // Anchor's init gives create-once semantics per pair: a second creation
    // attempt for the same (base, quote) PDA fails at the ledger level
    // (MarketAlreadyExists).
    #[account(
        init,
        payer = creator,
        space = 8 + Market::INIT_SPACE,
        seeds = [Market::SEED_PREFIX, base_mint.key().as_ref(), quote_mint.key().as_ref()],
        bump
    )]
    pub market: Account<'info, Market>,

    #[account(
        init,
        payer = creator,
        space = 8 + OrderBook::INIT_SPACE,
        seeds = [OrderBook::SEED_PREFIX, market.key().as_ref()],
        bump
    )]
    pub order_book: Account<'info, OrderBook>,

    #[account(
        init,
        payer = creator,
        token::mint = base_mint,
        token::authority = market,
        token::token_program = token_program,
        seeds = [Market::VAULT_SEED_PREFIX, market.key().as_ref(), base_mint.key().as_ref()],
        bump
    )]
    pub base_vault: InterfaceAccount<'info, TokenAccount>,

    #[account(
        init,
        payer = creator,
        token::mint = quote_mint,
        token::authority = market,
        token::token_program = token_program,
        seeds = [Market::VAULT_SEED_PREFIX, market.key().as_ref(), quote_mint.key().as_ref()],
        bump
    )]
    pub quote_vault: InterfaceAccount<'info, TokenAccount>,

    pub token_program: Interface<'info, TokenInterface>,
    pub system_program: Program<'info, System>,
}

impl CreateMarket<'_> {
    pub fn apply(ctx: Context<CreateMarket>, fee_bps: u16) -> Result<()> {
        require!(fee_bps <= Market::MAX_FEE_BPS, ErrorCode::InvalidFeeRate);
        require!(
            ctx.accounts.base_mint.key() != ctx.accounts.quote_mint.key(),
            ErrorCode::SameMint
        );

        let market = &mut ctx.accounts.market;
        market.base_mint = ctx.accounts.base_mint.key();
        market.quote_mint = ctx.accounts.quote_mint.key();
        market.base_vault = ctx.accounts.base_vault.key();
        market.quote_vault = ctx.accounts.quote_vault.key();
        market.creator = ctx.accounts.creator.key();
        market.fee_bps = fee_bps;
        market.bump = ctx.bumps.market;

        let order_book = &mut ctx.accounts.order_book;
        order_book.market = market.key();
        order_book.next_order_id = 1;
        order_book.bump = ctx.bumps.order_book;

        emit!(MarketCreated {
            market: market.key(),
            base_mint: market.base_mint,
            quote_mint: market.quote_mint,
            creator: market.creator,
            fee_bps,
        });

        msg!(
            "Market created: base={}, quote={}, fee_bps={}",
            market.base_mint,
            market.quote_mint,
            fee_bps
        );

        Ok(())
    }
}
