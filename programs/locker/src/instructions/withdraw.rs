use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::{LEDGER_VAULT_SEED, LOCK_LEDGER_SEED};
use crate::error::LockerError;
use crate::state::{LockLedger, WithdrawItem};
use crate::utils::fees::FeeSplit;
use crate::utils::references::ReferenceAccounts;

/// Releases every item of the batch, splitting early exits between the
/// treasury, team wallet and burn wallet.
/// `remaining_accounts`: one writable reference PDA per item, in item order.
pub fn withdraw<'info>(
    ctx: Context<'_, '_, 'info, 'info, WithdrawBatch<'info>>,
    items: Vec<WithdrawItem>,
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
    let settlements =
        ctx.accounts
            .lock_ledger
            .withdraw_batch(current_day, &items, &mut references.book)?;
    references.store()?;

    let payout = settlements
        .iter()
        .try_fold(FeeSplit::default(), |acc, s| acc.checked_add(&s.split))?;

    let mint = ctx.accounts.lock_ledger.mint;
    let bump = [ctx.accounts.lock_ledger.bump];
    let signer_seeds: &[&[&[u8]]] = &[&[LOCK_LEDGER_SEED, mint.as_ref(), &bump]];
    let destinations = [
        (&ctx.accounts.treasury, payout.requester),
        (&ctx.accounts.team_wallet, payout.secondary),
        (&ctx.accounts.burn_wallet, payout.sink),
    ];
    for (destination, amount) in destinations {
        if amount == 0 {
            continue;
        }
        token::transfer(
            CpiContext::new_with_signer(
                ctx.accounts.token_program.to_account_info(),
                Transfer {
                    from: ctx.accounts.vault.to_account_info(),
                    to: destination.to_account_info(),
                    authority: ctx.accounts.lock_ledger.to_account_info(),
                },
                signer_seeds,
            ),
            amount,
        )?;
    }

    for s in settlements {
        emit!(Withdraw {
            ledger: ledger_key,
            reference: s.reference,
            amount: s.amount,
            lock_end_day: s.lock_end_day,
            early_withdraw: s.early_withdraw,
            requester_amount: s.split.requester,
            secondary_amount: s.split.secondary,
            sink_amount: s.split.sink,
        });
    }

    msg!(
        "withdraw: items={} requester={} team={} burn={} day={}",
        items.len(),
        payout.requester,
        payout.secondary,
        payout.sink,
        current_day
    );
    Ok(())
}

#[derive(Accounts)]
pub struct WithdrawBatch<'info> {
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

    #[account(mut, address = lock_ledger.treasury @ LockerError::InvalidTokenAccount)]
    pub treasury: Account<'info, TokenAccount>,

    #[account(mut, address = lock_ledger.team_wallet @ LockerError::InvalidTokenAccount)]
    pub team_wallet: Account<'info, TokenAccount>,

    #[account(mut, address = lock_ledger.burn_wallet @ LockerError::InvalidTokenAccount)]
    pub burn_wallet: Account<'info, TokenAccount>,

    pub admin: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

#[event]
pub struct Withdraw {
    pub ledger: Pubkey,
    pub reference: Vec<u8>,
    pub amount: u64,
    pub lock_end_day: u64,
    pub early_withdraw: bool,
    pub requester_amount: u64,
    pub secondary_amount: u64,
    pub sink_amount: u64,
}
