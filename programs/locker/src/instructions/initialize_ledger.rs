use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::{LEDGER_VAULT_SEED, LOCK_LEDGER_SEED};
use crate::error::LockerError;
use crate::state::{LedgerParams, LockLedger};
use crate::utils::time;

pub fn initialize_ledger(ctx: Context<InitializeLedger>, params: LedgerParams) -> Result<()> {
    params.validate()?;
    let seconds_per_day = params.day_length();

    let now = Clock::get()?.unix_timestamp;
    let current_day = time::day_index(now, seconds_per_day)?;

    let ledger = &mut ctx.accounts.lock_ledger;
    ledger.admin = ctx.accounts.admin.key();
    ledger.mint = ctx.accounts.mint.key();
    ledger.treasury = ctx.accounts.treasury.key();
    ledger.team_wallet = ctx.accounts.team_wallet.key();
    ledger.burn_wallet = ctx.accounts.burn_wallet.key();
    ledger.seconds_per_day = seconds_per_day;
    ledger.lock_duration_days = params.lock_duration_days;
    ledger.total_locked = 0;
    ledger.total_unlocked = 0;
    ledger.settled_day = current_day;
    ledger.bump = ctx.bumps.lock_ledger;
    ledger.vault_bump = ctx.bumps.vault;
    ledger.buckets = Vec::new();

    emit!(LedgerInitialized {
        admin: ledger.admin,
        mint: ledger.mint,
        treasury: ledger.treasury,
        team_wallet: ledger.team_wallet,
        burn_wallet: ledger.burn_wallet,
        seconds_per_day: ledger.seconds_per_day,
        lock_duration_days: ledger.lock_duration_days,
        start_day: current_day,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct InitializeLedger<'info> {
    #[account(
        init,
        payer = admin,
        space = LockLedger::space(),
        seeds = [LOCK_LEDGER_SEED, mint.key().as_ref()],
        bump
    )]
    pub lock_ledger: Box<Account<'info, LockLedger>>,

    #[account(
        init,
        payer = admin,
        token::mint = mint,
        token::authority = lock_ledger,
        seeds = [LEDGER_VAULT_SEED, lock_ledger.key().as_ref()],
        bump
    )]
    pub vault: Account<'info, TokenAccount>,

    pub mint: Account<'info, Mint>,

    #[account(constraint = treasury.mint == mint.key() @ LockerError::InvalidTokenMint)]
    pub treasury: Account<'info, TokenAccount>,

    #[account(constraint = team_wallet.mint == mint.key() @ LockerError::InvalidTokenMint)]
    pub team_wallet: Account<'info, TokenAccount>,

    #[account(constraint = burn_wallet.mint == mint.key() @ LockerError::InvalidTokenMint)]
    pub burn_wallet: Account<'info, TokenAccount>,

    #[account(mut)]
    pub admin: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}

#[event]
pub struct LedgerInitialized {
    pub admin: Pubkey,
    pub mint: Pubkey,
    pub treasury: Pubkey,
    pub team_wallet: Pubkey,
    pub burn_wallet: Pubkey,
    pub seconds_per_day: u64,
    pub lock_duration_days: u64,
    pub start_day: u64,
}
