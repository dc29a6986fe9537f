use anchor_lang::prelude::*;

pub mod constants;
pub mod error;
pub mod instructions;
pub mod state;
pub mod utils;

pub use instructions::*;
use state::{DepositItem, LedgerParams, VestingParams, WithdrawItem};

declare_id!("UidmACAaQwJV4dRvqdDbbywM7hpB7cPumq1EBjjT743");

#[program]
pub mod locker {
    use super::*;

    // ----------------------------- lock ledger -----------------------------

    pub fn initialize_ledger(ctx: Context<InitializeLedger>, params: LedgerParams) -> Result<()> {
        instructions::initialize_ledger::initialize_ledger(ctx, params)
    }

    pub fn deposit<'info>(
        ctx: Context<'_, '_, 'info, 'info, DepositBatch<'info>>,
        items: Vec<DepositItem>,
    ) -> Result<()> {
        instructions::deposit::deposit(ctx, items)
    }

    pub fn withdraw<'info>(
        ctx: Context<'_, '_, 'info, 'info, WithdrawBatch<'info>>,
        items: Vec<WithdrawItem>,
    ) -> Result<()> {
        instructions::withdraw::withdraw(ctx, items)
    }

    pub fn ledger_snapshot(ctx: Context<LedgerView>) -> Result<LedgerSnapshot> {
        instructions::ledger_views::ledger_snapshot(ctx)
    }

    pub fn unlock_bucket(ctx: Context<LedgerView>, day: u64) -> Result<u64> {
        instructions::ledger_views::unlock_bucket(ctx, day)
    }

    pub fn reference_balance(ctx: Context<ReferenceView>) -> Result<ReferenceSnapshot> {
        instructions::ledger_views::reference_balance(ctx)
    }

    // ----------------------------- vesting -----------------------------

    pub fn initialize_vesting(ctx: Context<InitializeVesting>, params: VestingParams) -> Result<()> {
        instructions::initialize_vesting::initialize_vesting(ctx, params)
    }

    pub fn lock_tokens(ctx: Context<LockVestingTokens>, amount: u64) -> Result<()> {
        instructions::lock_tokens::lock_tokens(ctx, amount)
    }

    pub fn withdraw_installment(ctx: Context<ReleaseVesting>) -> Result<()> {
        instructions::release_vesting::withdraw_installment(ctx)
    }

    pub fn final_withdraw(ctx: Context<ReleaseVesting>) -> Result<()> {
        instructions::release_vesting::final_withdraw(ctx)
    }

    pub fn vesting_snapshot(ctx: Context<VestingView>) -> Result<VestingSnapshot> {
        instructions::vesting_views::vesting_snapshot(ctx)
    }
}
