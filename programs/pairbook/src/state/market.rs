use anchor_lang::prelude::*;

/// Immutable per-pair registry. One Market exists per (base, quote) mint pair,
/// at PDA ["market", base_mint, quote_mint]; it is never mutated or closed.
#[account]
#[derive(InitSpace)]
pub struct Market {
    pub base_mint: Pubkey,
    pub quote_mint: Pubkey,
    pub base_vault: Pubkey,
    pub quote_vault: Pubkey,
    /// Receives the non-cranker share of trading fees, in quote units.
    pub creator: Pubkey,
    /// Trading fee in basis points, [0, 10000].
    pub fee_bps: u16,
    pub bump: u8,
}

impl Market {
    pub const SEED_PREFIX: &'static [u8] = b"market";
    pub const VAULT_SEED_PREFIX: &'static [u8] = b"vault";

    pub const MAX_FEE_BPS: u16 = 10_000;
}
