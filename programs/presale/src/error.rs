use anchor_lang::prelude::*;

/// Custom error codes for the staged sale program.
#[error_code]
pub enum SaleError {
    #[msg("Participant is already registered")]
    AlreadyRegistered,

    #[msg("Participant is not registered")]
    NotRegistered,

    #[msg("Invalid referrer: self-referral or unregistered referrer")]
    InvalidReferrer,

    #[msg("Participant is not eligible to purchase (registration and KYC required)")]
    NotEligible,

    #[msg("Payment asset is not accepted")]
    AssetNotAccepted,

    #[msg("All sale stages are sold out")]
    SaleSoldOut,

    #[msg("No vesting tier covers the purchase amount")]
    NoMatchingTier,

    #[msg("Nothing to claim")]
    NothingToClaim,

    #[msg("Requester does not own the vesting schedule")]
    NotScheduleOwner,

    #[msg("Invalid sale configuration")]
    InvalidConfiguration,

    #[msg("Unauthorized: admin signature required")]
    UnauthorizedAdmin,

    #[msg("Unauthorized: operator signature required")]
    UnauthorizedOperator,

    #[msg("Sale is paused")]
    SalePaused,

    #[msg("Sale is not paused")]
    SaleNotPaused,

    #[msg("Invalid amount")]
    InvalidAmount,

    #[msg("Stage index out of range")]
    InvalidStage,

    #[msg("Referrer account does not match the buyer's referrer")]
    ReferrerAccountMismatch,

    #[msg("Invalid token mint")]
    InvalidTokenMint,

    #[msg("Invalid token account")]
    InvalidTokenAccount,

    #[msg("Insufficient vault balance")]
    InsufficientVaultBalance,

    #[msg("Math overflow")]
    MathOverflow,
}
