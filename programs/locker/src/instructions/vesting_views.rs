use anchor_lang::prelude::*;

use crate::constants::VESTING_SCHEDULE_SEED;
use crate::state::{VestingPhase, VestingSchedule};

pub fn vesting_snapshot(ctx: Context<VestingView>) -> Result<VestingSnapshot> {
    let st = &ctx.accounts.vesting_schedule;
    let now = Clock::get()?.unix_timestamp;

    Ok(VestingSnapshot {
        phase: st.phase(now)?,
        locked_amount: st.locked_amount,
        total_released: st.total_released,
        installment_size: st.installment_size,
        installments_paid: st.installments_paid,
        cliff_ts: st.cliff_ts,
        last_installment_ts: st.last_installment_ts,
        lock_duration: st.lock_duration,
        vesting_period: st.vesting_period,
        vesting_parts: st.vesting_parts,
        vesting_end_ts: st.vesting_end_ts()?,
    })
}

#[derive(Accounts)]
pub struct VestingView<'info> {
    #[account(
        seeds = [VESTING_SCHEDULE_SEED, vesting_schedule.mint.as_ref(), vesting_schedule.beneficiary.as_ref()],
        bump = vesting_schedule.bump
    )]
    pub vesting_schedule: Account<'info, VestingSchedule>,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct VestingSnapshot {
    pub phase: VestingPhase,
    pub locked_amount: u64,
    pub total_released: u64,
    pub installment_size: u64,
    pub installments_paid: u16,
    pub cliff_ts: Option<i64>,
    pub last_installment_ts: Option<i64>,
    pub lock_duration: i64,
    pub vesting_period: i64,
    pub vesting_parts: u16,
    pub vesting_end_ts: Option<i64>,
}
