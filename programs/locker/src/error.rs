use anchor_lang::prelude::*;

/// Custom error codes for the locker program.
#[error_code]
pub enum LockerError {
    #[msg("Unauthorized: admin signature required")]
    UnauthorizedAdmin,

    #[msg("Invalid configuration")]
    InvalidConfig,

    #[msg("Invalid timestamp")]
    InvalidTimestamp,

    #[msg("Invalid amount (must be > 0)")]
    InvalidAmount,

    #[msg("Math overflow")]
    MathOverflow,

    #[msg("Empty batch")]
    EmptyBatch,

    #[msg("Batch size too large")]
    BatchTooLarge,

    #[msg("Invalid reference (empty or too long)")]
    InvalidReference,

    #[msg("Reference accounts do not match batch items")]
    ReferenceAccountsMismatch,

    #[msg("Invalid reference account")]
    InvalidReferenceAccount,

    #[msg("Withdrawal exceeds outstanding amount for reference")]
    WithdrawExceedsOutstanding,

    #[msg("Withdrawal exceeds amount scheduled for unlock day")]
    BucketUnderflow,

    #[msg("Early withdraw not allowed: lock has not ended")]
    LockNotEnded,

    #[msg("Early withdraw flag set but lock has already ended")]
    LockAlreadyEnded,

    #[msg("Unlock schedule is full")]
    UnlockScheduleFull,

    #[msg("Invalid token mint")]
    InvalidTokenMint,

    #[msg("Invalid token account")]
    InvalidTokenAccount,

    #[msg("Tokens are not unlocked yet")]
    NotYetUnlocked,

    #[msg("Vesting fully elapsed: use final withdraw")]
    VestingFullyElapsed,

    #[msg("All vesting parts withdrawn")]
    AllVestingPartsWithdrawn,

    #[msg("All vesting periods have not yet passed")]
    VestingNotFullyElapsed,

    #[msg("Vesting schedule is drained")]
    ScheduleDrained,
}
