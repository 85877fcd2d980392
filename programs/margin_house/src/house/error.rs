use anchor_lang::prelude::*;

/// Errors raised by the allocation engine and the house instructions
#[error_code]
pub enum HouseError {
    #[msg("Allocation would add zero liquidity")]
    ZeroLiquidity,
    #[msg("No pool registered for this id and token pair")]
    PoolNotFound,
    #[msg("Pool reserves and liquidity must be positive")]
    InvalidReserves,
    #[msg("Margin balance too low")]
    InsufficientMargin,
    #[msg("Deposit callback did not deliver the requested tokens")]
    UnderfundedCallback,
    #[msg("Deposit callback may only be invoked by the engine during an allocation")]
    NotEngine,
    #[msg("Allocation already in flight for this account")]
    Reentrancy,
    #[msg("Callback data does not match the allocation")]
    InvalidCallbackData,
    #[msg("Margin account belongs to another owner")]
    WrongMarginOwner,
    #[msg("Position belongs to another owner or pool")]
    WrongPosition,
    #[msg("Arithmetic overflow")]
    MathOverflow,
    #[msg("Invalid pool parameters")]
    InvalidPoolParameters,
    #[msg("Amount must be positive")]
    ZeroAmount,
}
