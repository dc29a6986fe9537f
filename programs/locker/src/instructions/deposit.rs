use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::{LEDGER_VAULT_SEED, LOCK_LEDGER_SEED};
use crate::error::LockerError;
use crate::state::{DepositItem, LockLedger};
use crate::utils::references::ReferenceAccounts;

/// Locks every item of the batch until `current_day + lock_duration_days`.
/// `remaining_accounts`: one writable reference PDA per item, in item order.
pub fn deposit<'info>(
    ctx: Context<'_, '_, 'info, 'info, DepositBatch<'info>>,
    items: Vec<DepositItem>,
) -> Result<()> {
    let ledger_key = ctx.accounts.lock_ledger.key();
    require_keys_eq!(
        ctx.accounts.admin.key(),
        ctx.accounts.lock_ledger.admin,
        LockerError::UnauthorizedAdmin
    );

    let now = Clock::get()?.unix_timestamp;
    let current_day = ctx.accounts.lock_ledger.current_day(now)?;

    let mut references = ReferenceAccounts::load(
        ledger_key,
        items.iter().map(|item| item.reference.as_slice()),
        ctx.remaining_accounts,
    )?;
    let records = ctx.accounts.lock_ledger.deposit_batch(
        ledger_key,
        current_day,
        &items,
        &mut references.book,
    )?;
    references.create_missing(
        &ctx.accounts.admin.to_account_info(),
        &ctx.accounts.system_program.to_account_info(),
    )?;
    references.store()?;

    let total = records
        .iter()
        .try_fold(0u64, |acc, r| acc.checked_add(r.amount))
        .ok_or(LockerError::MathOverflow)?;

    // Internal balances are final before funds move.
    if total > 0 {
        token::transfer(
            CpiContext::new(
                ctx.accounts.token_program.to_account_info(),
                Transfer {
                    from: ctx.accounts.source.to_account_info(),
                    to: ctx.accounts.vault.to_account_info(),
                    authority: ctx.accounts.admin.to_account_info(),
                },
            ),
            total,
        )?;
    }

    for record in records {
        emit!(Deposit {
            ledger: ledger_key,
            reference: record.reference,
            amount: record.amount,
            unlock_day: record.unlock_day,
        });
    }

    msg!(
        "deposit: items={} total={} day={} total_locked={}",
        items.len(),
        total,
        current_day,
        ctx.accounts.lock_ledger.total_locked
    );
    Ok(())
}

#[derive(Accounts)]
pub struct DepositBatch<'info> {
    #[account(
        mut,
        seeds = [LOCK_LEDGER_SEED, lock_ledger.mint.as_ref()],
        bump = lock_ledger.bump
    )]
    pub lock_ledger: Box<Account<'info, LockLedger>>,

    #[account(
        mut,
        seeds = [LEDGER_VAULT_SEED, lock_ledger.key().as_ref()],
        bump = lock_ledger.vault_bump,
        constraint = vault.mint == lock_ledger.mint @ LockerError::InvalidTokenMint,
    )]
    pub vault: Account<'info, TokenAccount>,

    #[account(
        mut,
        constraint = source.mint == lock_ledger.mint @ LockerError::InvalidTokenMint,
        constraint = source.owner == admin.key() @ LockerError::InvalidTokenAccount,
    )]
    pub source: Account<'info, TokenAccount>,

    #[account(mut)]
    pub admin: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

#[event]
pub struct Deposit {
    pub ledger: Pubkey,
    pub reference: Vec<u8>,
    pub amount: u64,
    pub unlock_day: u64,
}
