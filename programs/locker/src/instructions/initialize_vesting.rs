use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::{VESTING_SCHEDULE_SEED, VESTING_VAULT_SEED};
use crate::error::LockerError;
use crate::state::{VestingParams, VestingSchedule};

pub fn initialize_vesting(ctx: Context<InitializeVesting>, params: VestingParams) -> Result<()> {
    params.validate()?;

    let st = &mut ctx.accounts.vesting_schedule;
    st.admin = ctx.accounts.admin.key();
    st.mint = ctx.accounts.mint.key();
    st.beneficiary = ctx.accounts.beneficiary.key();
    st.lock_duration = params.lock_duration;
    st.vesting_period = params.vesting_period;
    st.vesting_parts = params.vesting_parts;
    st.top_up_policy = params.top_up_policy;
    st.locked_amount = 0;
    st.total_deposited = 0;
    st.total_released = 0;
    st.cliff_ts = None;
    st.installment_size = 0;
    st.installments_paid = 0;
    st.last_installment_ts = None;
    st.bump = ctx.bumps.vesting_schedule;
    st.vault_bump = ctx.bumps.vault;

    emit!(VestingInitialized {
        admin: st.admin,
        mint: st.mint,
        beneficiary: st.beneficiary,
        lock_duration: st.lock_duration,
        vesting_period: st.vesting_period,
        vesting_parts: st.vesting_parts,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct InitializeVesting<'info> {
    #[account(
        init,
        payer = admin,
        space = 8 + VestingSchedule::SIZE,
        seeds = [VESTING_SCHEDULE_SEED, mint.key().as_ref(), beneficiary.key().as_ref()],
        bump
    )]
    pub vesting_schedule: Account<'info, VestingSchedule>,

    #[account(
        init,
        payer = admin,
        token::mint = mint,
        token::authority = vesting_schedule,
        seeds = [VESTING_VAULT_SEED, vesting_schedule.key().as_ref()],
        bump
    )]
    pub vault: Account<'info, TokenAccount>,

    pub mint: Account<'info, Mint>,

    #[account(constraint = beneficiary.mint == mint.key() @ LockerError::InvalidTokenMint)]
    pub beneficiary: Account<'info, TokenAccount>,

    #[account(mut)]
    pub admin: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}

#[event]
pub struct VestingInitialized {
    pub admin: Pubkey,
    pub mint: Pubkey,
    pub beneficiary: Pubkey,
    pub lock_duration: i64,
    pub vesting_period: i64,
    pub vesting_parts: u16,
}
