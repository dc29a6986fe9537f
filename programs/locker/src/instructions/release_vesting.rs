use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::{VESTING_SCHEDULE_SEED, VESTING_VAULT_SEED};
use crate::error::LockerError;
use crate::state::VestingSchedule;

/// Releases the next installment to the beneficiary.
pub fn withdraw_installment(ctx: Context<ReleaseVesting>) -> Result<()> {
    require_keys_eq!(
        ctx.accounts.admin.key(),
        ctx.accounts.vesting_schedule.admin,
        LockerError::UnauthorizedAdmin
    );
    let now = Clock::get()?.unix_timestamp;
    let amount = ctx.accounts.vesting_schedule.withdraw_installment(now)?;
    payout(&ctx, amount, false)
}

/// Releases whatever is still locked once every period has passed.
pub fn final_withdraw(ctx: Context<ReleaseVesting>) -> Result<()> {
    require_keys_eq!(
        ctx.accounts.admin.key(),
        ctx.accounts.vesting_schedule.admin,
        LockerError::UnauthorizedAdmin
    );
    let now = Clock::get()?.unix_timestamp;
    let amount = ctx.accounts.vesting_schedule.final_withdraw(now)?;
    payout(&ctx, amount, true)
}

fn payout(ctx: &Context<ReleaseVesting>, amount: u64, final_release: bool) -> Result<()> {
    let st = &ctx.accounts.vesting_schedule;

    if amount > 0 {
        let bump = [st.bump];
        let signer_seeds: &[&[&[u8]]] = &[&[
            VESTING_SCHEDULE_SEED,
            st.mint.as_ref(),
            st.beneficiary.as_ref(),
            &bump,
        ]];
        token::transfer(
            CpiContext::new_with_signer(
                ctx.accounts.token_program.to_account_info(),
                Transfer {
                    from: ctx.accounts.vault.to_account_info(),
                    to: ctx.accounts.beneficiary.to_account_info(),
                    authority: st.to_account_info(),
                },
                signer_seeds,
            ),
            amount,
        )?;
    }

    emit!(WithdrawTokens {
        schedule: st.key(),
        amount,
        installments_paid: st.installments_paid,
        final_release,
    });

    msg!(
        "vesting release: amount={} paid={}/{} locked={} final={}",
        amount,
        st.installments_paid,
        st.vesting_parts,
        st.locked_amount,
        final_release
    );
    Ok(())
}

#[derive(Accounts)]
pub struct ReleaseVesting<'info> {
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
    )]
    pub vault: Account<'info, TokenAccount>,

    #[account(mut, address = vesting_schedule.beneficiary @ LockerError::InvalidTokenAccount)]
    pub beneficiary: Account<'info, TokenAccount>,

    pub admin: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

#[event]
pub struct WithdrawTokens {
    pub schedule: Pubkey,
    pub amount: u64,
    pub installments_paid: u16,
    pub final_release: bool,
}
