use anchor_lang::prelude::*;

use crate::constants::LOCK_LEDGER_SEED;
use crate::error::LockerError;
use crate::state::{LockLedger, ReferenceBalance};

pub fn ledger_snapshot(ctx: Context<LedgerView>) -> Result<LedgerSnapshot> {
    let ledger = &ctx.accounts.lock_ledger;
    let now = Clock::get()?.unix_timestamp;
    let current_day = ledger.current_day(now)?;

    Ok(LedgerSnapshot {
        current_day,
        seconds_per_day: ledger.seconds_per_day,
        lock_duration_days: ledger.lock_duration_days,
        total_locked: ledger.total_locked,
        total_unlocked: ledger.unlocked_as_of(current_day)?,
        bucket_count: ledger.buckets.len() as u32,
    })
}

pub fn unlock_bucket(ctx: Context<LedgerView>, day: u64) -> Result<u64> {
    Ok(ctx.accounts.lock_ledger.bucket_amount(day))
}

pub fn reference_balance(ctx: Context<ReferenceView>) -> Result<ReferenceSnapshot> {
    let r = &ctx.accounts.reference;
    Ok(ReferenceSnapshot {
        deposited: r.deposited,
        withdrawn: r.withdrawn,
        outstanding: r.outstanding,
    })
}

#[derive(Accounts)]
pub struct LedgerView<'info> {
    #[account(
        seeds = [LOCK_LEDGER_SEED, lock_ledger.mint.as_ref()],
        bump = lock_ledger.bump
    )]
    pub lock_ledger: Box<Account<'info, LockLedger>>,
}

#[derive(Accounts)]
pub struct ReferenceView<'info> {
    #[account(
        seeds = [LOCK_LEDGER_SEED, lock_ledger.mint.as_ref()],
        bump = lock_ledger.bump
    )]
    pub lock_ledger: Box<Account<'info, LockLedger>>,

    #[account(constraint = reference.ledger == lock_ledger.key() @ LockerError::InvalidReferenceAccount)]
    pub reference: Account<'info, ReferenceBalance>,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct LedgerSnapshot {
    pub current_day: u64,
    pub seconds_per_day: u64,
    pub lock_duration_days: u64,
    pub total_locked: u64,
    pub total_unlocked: u64,
    pub bucket_count: u32,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReferenceSnapshot {
    pub deposited: u64,
    pub withdrawn: u64,
    pub outstanding: u64,
}
