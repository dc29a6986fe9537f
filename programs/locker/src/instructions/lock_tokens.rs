use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::{VESTING_SCHEDULE_SEED, VESTING_VAULT_SEED};
use crate::error::LockerError;
use crate::state::VestingSchedule;

pub fn lock_tokens(ctx: Context<LockVestingTokens>, amount: u64) -> Result<()> {
    let st = &mut ctx.accounts.vesting_schedule;
    require_keys_eq!(ctx.accounts.admin.key(), st.admin, LockerError::UnauthorizedAdmin);

    let now = Clock::get()?.unix_timestamp;
    st.lock(now, amount)?;

    token::transfer(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.source.to_account_info(),
                to: ctx.accounts.vault.to_account_info(),
                authority: ctx.accounts.admin.to_account_info(),
            },
        ),
        amount,
    )?;

    let st = &ctx.accounts.vesting_schedule;
    emit!(LockTokens {
        schedule: st.key(),
        amount,
        locked_amount: st.locked_amount,
        installment_size: st.installment_size,
        cliff_ts: st.cliff_ts.unwrap_or_default(),
    });

    msg!(
        "lock_tokens: amount={} locked={} installment={}",
        amount,
        st.locked_amount,
        st.installment_size
    );
    Ok(())
}

#[derive(Accounts)]
pub struct LockVestingTokens<'info> {
    #[account(
        mut,
        seeds = [VESTING_SCHEDULE_SEED, vesting_schedule.mint.as_ref(), vesting_schedule.beneficiary.as_ref()],
        bump = vesting_schedule.bump
    )]
    pub vesting_schedule: Account<'info, VestingSchedule>,

    #[account(
        mut,
        seeds = [VESTING_VAULT_SEED, vesting_schedule.key().as_ref()],
        bump = vesting_schedule.vault_bump,
        constraint = vault.mint == vesting_schedule.mint @ LockerError::InvalidTokenMint,
    )]
    pub vault: Account<'info, TokenAccount>,

    #[account(
        mut,
        constraint = source.mint == vesting_schedule.mint @ LockerError::InvalidTokenMint,
        constraint = source.owner == admin.key() @ LockerError::InvalidTokenAccount,
    )]
    pub source: Account<'info, TokenAccount>,

    pub admin: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

#[event]
pub struct LockTokens {
    pub schedule: Pubkey,
    pub amount: u64,
    pub locked_amount: u64,
    pub installment_size: u64,
    pub cliff_ts: i64,
}
