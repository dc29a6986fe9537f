use anchor_lang::prelude::*;

use crate::constants::MAX_VESTING_PARTS;
use crate::error::LockerError;
use crate::utils::time;

/// How a top-up made at or after the cliff affects the installment size.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TopUpPolicy {
    /// Re-spread the locked balance over the installments still unpaid.
    Recompute,
    /// Keep the installment size; the surplus is released by the final withdrawal.
    Freeze,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum VestingPhase {
    /// Nothing deposited yet.
    Empty,
    /// Deposits accepted, cliff not reached.
    Accepting,
    /// Cliff reached; installments may be claimed.
    Vesting,
    /// cliff + period * parts reached; the final withdrawal is open.
    FullyElapsed,
    /// Locked balance paid out. Terminal.
    Drained,
}

/// Cliff/installment vesting schedule PDA.
/// Seeds: [b"vesting_schedule", mint, beneficiary]
#[account]
#[derive(Debug)]
pub struct VestingSchedule {
    /// Authority allowed to lock tokens and trigger releases.
    pub admin: Pubkey,
    /// Custody token mint.
    pub mint: Pubkey,
    /// Token account receiving every release.
    pub beneficiary: Pubkey,
    /// Seconds from the first deposit to the cliff.
    pub lock_duration: i64,
    /// Minimum spacing between two installments, in seconds.
    pub vesting_period: i64,
    pub vesting_parts: u16,
    pub top_up_policy: TopUpPolicy,
    /// Principal still held (deposits minus releases).
    pub locked_amount: u64,
    pub total_deposited: u64,
    pub total_released: u64,
    /// Fixed by the first deposit.
    pub cliff_ts: Option<i64>,
    pub installment_size: u64,
    pub installments_paid: u16,
    pub last_installment_ts: Option<i64>,
    pub bump: u8,
    pub vault_bump: u8,
}

impl VestingSchedule {
    pub const SIZE: usize =
        32 + // admin
        32 + // mint
        32 + // beneficiary
        8 +  // lock_duration
        8 +  // vesting_period
        2 +  // vesting_parts
        1 +  // top_up_policy
        8 +  // locked_amount
        8 +  // total_deposited
        8 +  // total_released
        9 +  // cliff_ts
        8 +  // installment_size
        2 +  // installments_paid
        9 +  // last_installment_ts
        1 +  // bump
        1;   // vault_bump

    pub fn phase(&self, now_ts: i64) -> Result<VestingPhase> {
        let Some(cliff_ts) = self.cliff_ts else {
            return Ok(VestingPhase::Empty);
        };
        if self.locked_amount == 0 {
            return Ok(VestingPhase::Drained);
        }
        if now_ts >= self.vesting_end_ts()?.unwrap_or(i64::MAX) {
            return Ok(VestingPhase::FullyElapsed);
        }
        if now_ts >= cliff_ts {
            Ok(VestingPhase::Vesting)
        } else {
            Ok(VestingPhase::Accepting)
        }
    }

    pub fn vesting_end_ts(&self) -> Result<Option<i64>> {
        self.cliff_ts
            .map(|cliff| time::vesting_end_ts(cliff, self.vesting_period, self.vesting_parts))
            .transpose()
            .map_err(Into::into)
    }

    /// Adds `amount` to the locked principal, fixing the cliff on first use.
    pub fn lock(&mut self, now_ts: i64, amount: u64) -> Result<()> {
        require!(amount > 0, LockerError::InvalidAmount);
        require!(
            self.phase(now_ts)? != VestingPhase::Drained,
            LockerError::ScheduleDrained
        );

        self.locked_amount = self
            .locked_amount
            .checked_add(amount)
            .ok_or(LockerError::MathOverflow)?;
        self.total_deposited = self
            .total_deposited
            .checked_add(amount)
            .ok_or(LockerError::MathOverflow)?;

        let cliff_ts = match self.cliff_ts {
            Some(ts) => ts,
            None => {
                let ts = time::offset_ts(now_ts, self.lock_duration)?;
                self.cliff_ts = Some(ts);
                ts
            }
        };

        let remaining_parts = self.vesting_parts.saturating_sub(self.installments_paid);
        let recompute = now_ts < cliff_ts || self.top_up_policy == TopUpPolicy::Recompute;
        if recompute && remaining_parts > 0 {
            self.installment_size = self.locked_amount / remaining_parts as u64;
        }
        Ok(())
    }

    /// Pays the next installment. Returns the amount released.
    /// Open only in `Vesting`: once the schedule has fully elapsed the
    /// remainder leaves through `final_withdraw`.
    pub fn withdraw_installment(&mut self, now_ts: i64) -> Result<u64> {
        let cliff_ts = self.cliff_ts.ok_or(LockerError::NotYetUnlocked)?;
        require!(now_ts >= cliff_ts, LockerError::NotYetUnlocked);
        require!(
            self.installments_paid < self.vesting_parts,
            LockerError::AllVestingPartsWithdrawn
        );
        // A part whose spacing has not passed counts as not available yet.
        if let Some(last_ts) = self.last_installment_ts {
            let due_ts = time::offset_ts(last_ts, self.vesting_period)?;
            require!(now_ts >= due_ts, LockerError::AllVestingPartsWithdrawn);
        }
        require!(self.locked_amount > 0, LockerError::ScheduleDrained);
        require!(
            self.phase(now_ts)? == VestingPhase::Vesting,
            LockerError::VestingFullyElapsed
        );

        let amount = self.installment_size.min(self.locked_amount);
        self.locked_amount -= amount;
        self.total_released = self
            .total_released
            .checked_add(amount)
            .ok_or(LockerError::MathOverflow)?;
        self.installments_paid += 1;
        self.last_installment_ts = Some(now_ts);
        Ok(amount)
    }

    /// Pays out everything still locked once the whole schedule has elapsed.
    pub fn final_withdraw(&mut self, now_ts: i64) -> Result<u64> {
        let end_ts = self
            .vesting_end_ts()?
            .ok_or(LockerError::VestingNotFullyElapsed)?;
        require!(now_ts >= end_ts, LockerError::VestingNotFullyElapsed);
        require!(self.locked_amount > 0, LockerError::ScheduleDrained);

        let amount = self.locked_amount;
        self.locked_amount = 0;
        self.total_released = self
            .total_released
            .checked_add(amount)
            .ok_or(LockerError::MathOverflow)?;
        Ok(amount)
    }
}

/// Construction-time parameters, immutable afterwards.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct VestingParams {
    pub lock_duration: i64,
    pub vesting_period: i64,
    pub vesting_parts: u16,
    pub top_up_policy: TopUpPolicy,
}

impl VestingParams {
    pub fn validate(&self) -> Result<()> {
        require!(self.lock_duration >= 0, LockerError::InvalidConfig);
        require!(self.vesting_period >= 0, LockerError::InvalidConfig);
        require!(
            self.vesting_parts > 0 && self.vesting_parts <= MAX_VESTING_PARTS,
            LockerError::InvalidConfig
        );
        Ok(())
    }
}
