use anchor_lang::prelude::*;

#[error_code]
pub enum ErrorCode {
    #[msg("Fee rate must be between 0 and 10000 basis points")]
    InvalidFeeRate,
    #[msg("Price and amount must be non-zero and the notional must fit in 64 bits")]
    InvalidAmount,
    #[msg("Order book side is at capacity")]
    OrderBookFull,
    #[msg("Order not found on the given side")]
    OrderNotFound,
    #[msg("Signer does not own this order")]
    NotOwner,
    #[msg("Market already exists for this pair")]
    MarketAlreadyExists,
    #[msg("Supplied token account is not a valid ATA for the expected owner")]
    InvalidAta,
    #[msg("Required participant token account was not supplied")]
    AtaNotFound,
    #[msg("Base and quote mints must differ")]
    SameMint,
    #[msg("Math operation overflow")]
    MathOverflow,
}
