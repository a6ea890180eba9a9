use crate::errors::ErrorCode;
use crate::events::OrderFilled;
use crate::state::{BidFeePolicy, Market, OrderBook};
use anchor_lang::prelude::*;
use anchor_spl::associated_token::get_associated_token_address_with_program_id;
use anchor_spl::token_interface::{self, Mint, TokenAccount, TokenInterface, TransferChecked};

/// Permissionless crank: anyone may settle the crossed prefix of the book.
/// Participant token accounts (bidder base ATA, bidder quote ATA for refunds,
/// asker quote ATA, for every touched owner) are passed as remaining accounts;
/// the cranker's reward account and the creator's fee collector are fixed.
#[derive(Accounts)]
pub struct MatchOrders<'info> {
    pub cranker: Signer<'info>,

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

    #[account(
        mut,
        token::mint = quote_mint,
        token::authority = cranker
    )]
    pub cranker_quote_account: InterfaceAccount<'info, TokenAccount>,

    #[account(
        mut,
        token::mint = quote_mint,
        constraint = fee_collector.owner == market.creator @ ErrorCode::InvalidAta
    )]
    pub fee_collector: InterfaceAccount<'info, TokenAccount>,

    pub token_program: Interface<'info, TokenInterface>,
}

impl<'info> MatchOrders<'info> {
    pub fn apply(ctx: Context<'_, '_, 'info, 'info, MatchOrders<'info>>) -> Result<()> {
        let fee_bps = ctx.accounts.market.fee_bps;
        let fills = ctx
            .accounts
            .order_book
            .match_crossed(fee_bps, BidFeePolicy::AbsorbRemainder)?;

        if fills.is_empty() {
            msg!("Book not crossed, nothing to settle");
            return Ok(());
        }

        let base_mint_key = ctx.accounts.market.base_mint;
        let quote_mint_key = ctx.accounts.market.quote_mint;
        let bump = [ctx.accounts.market.bump];
        let seeds: &[&[u8]] = &[
            Market::SEED_PREFIX,
            base_mint_key.as_ref(),
            quote_mint_key.as_ref(),
            &bump,
        ];

        let token_program_key = ctx.accounts.token_program.key();
        let market_key = ctx.accounts.market.key();

        let mut cranker_total: u64 = 0;
        let mut creator_total: u64 = 0;

        for fill in &fills {
            // Base leg: the buyer receives the filled amount, no fee deducted.
            let bidder_base = find_participant_account(
                ctx.remaining_accounts,
                &fill.bid_owner,
                &base_mint_key,
                &token_program_key,
            )?;
            ctx.accounts
                .pay_from_base_vault(bidder_base, fill.amount, seeds)?;

            // Quote legs: seller proceeds net of their fee share, then the
            // buyer's refund of unused escrow.
            let asker_quote = find_participant_account(
                ctx.remaining_accounts,
                &fill.ask_owner,
                &quote_mint_key,
                &token_program_key,
            )?;
            ctx.accounts
                .pay_from_quote_vault(asker_quote, fill.quote_to_asker, seeds)?;

            if fill.quote_to_bidder > 0 {
                let bidder_quote = find_participant_account(
                    ctx.remaining_accounts,
                    &fill.bid_owner,
                    &quote_mint_key,
                    &token_program_key,
                )?;
                ctx.accounts
                    .pay_from_quote_vault(bidder_quote, fill.quote_to_bidder, seeds)?;
            }

            cranker_total = cranker_total
                .checked_add(fill.quote_to_cranker)
                .ok_or(ErrorCode::MathOverflow)?;
            creator_total = creator_total
                .checked_add(fill.quote_to_creator)
                .ok_or(ErrorCode::MathOverflow)?;

            emit!(OrderFilled {
                market: market_key,
                bid_order_id: fill.bid_order_id,
                ask_order_id: fill.ask_order_id,
                bid_owner: fill.bid_owner,
                ask_owner: fill.ask_owner,
                price: fill.price,
                amount: fill.amount,
                fee_collected: fill.fee_collected(),
            });
        }

        // Fee payouts are accumulated across the loop and paid once.
        let cranker_account = ctx.accounts.cranker_quote_account.to_account_info();
        ctx.accounts
            .pay_from_quote_vault(cranker_account, cranker_total, seeds)?;
        let fee_collector = ctx.accounts.fee_collector.to_account_info();
        ctx.accounts
            .pay_from_quote_vault(fee_collector, creator_total, seeds)?;

        msg!(
            "Crank settled {} fills, fees: cranker={}, creator={}",
            fills.len(),
            cranker_total,
            creator_total
        );

        Ok(())
    }

    fn pay_from_base_vault(
        &self,
        to: AccountInfo<'info>,
        amount: u64,
        seeds: &[&[u8]],
    ) -> Result<()> {
        if amount == 0 {
            return Ok(());
        }
        token_interface::transfer_checked(
            CpiContext::new_with_signer(
                self.token_program.to_account_info(),
                TransferChecked {
                    from: self.base_vault.to_account_info(),
                    to,
                    mint: self.base_mint.to_account_info(),
                    authority: self.market.to_account_info(),
                },
                &[seeds],
            ),
            amount,
            self.base_mint.decimals,
        )
    }

    fn pay_from_quote_vault(
        &self,
        to: AccountInfo<'info>,
        amount: u64,
        seeds: &[&[u8]],
    ) -> Result<()> {
        if amount == 0 {
            return Ok(());
        }
        token_interface::transfer_checked(
            CpiContext::new_with_signer(
                self.token_program.to_account_info(),
                TransferChecked {
                    from: self.quote_vault.to_account_info(),
                    to,
                    mint: self.quote_mint.to_account_info(),
                    authority: self.market.to_account_info(),
                },
                &[seeds],
            ),
            amount,
            self.quote_mint.decimals,
        )
    }
}

/// Resolves a participant's payout account among the remaining accounts by its
/// associated-token address. Missing accounts fail the whole crank; a wrong or
/// uninitialized account at the expected address is rejected before any CPI.
fn find_participant_account<'info>(
    remaining: &[AccountInfo<'info>],
    owner: &Pubkey,
    mint: &Pubkey,
    token_program: &Pubkey,
) -> Result<AccountInfo<'info>> {
    let expected = get_associated_token_address_with_program_id(owner, mint, token_program);
    let info = remaining
        .iter()
        .find(|info| *info.key == expected)
        .ok_or(ErrorCode::AtaNotFound)?;
    require!(
        info.owner == token_program && !info.data_is_empty(),
        ErrorCode::InvalidAta
    );
    Ok(info.clone())
}
