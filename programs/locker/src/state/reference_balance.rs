use anchor_lang::prelude::*;

use crate::constants::MAX_REFERENCE_LEN;
use crate::error::LockerError;

/// Running balance claimable against one external deposit reference.
/// Seeds: [b"reference", lock_ledger, blake3(reference)]
#[account]
#[derive(Debug, PartialEq, Eq)]
pub struct ReferenceBalance {
    /// Ledger this reference belongs to.
    pub ledger: Pubkey,
    /// blake3 digest of the external reference bytes.
    pub reference_hash: [u8; 32],
    /// Cumulative amount deposited under this reference.
    pub deposited: u64,
    /// Cumulative amount withdrawn under this reference.
    pub withdrawn: u64,
    /// `deposited - withdrawn`; the most any future withdrawal may claim.
    pub outstanding: u64,
    pub bump: u8,
}

impl ReferenceBalance {
    pub const SIZE: usize =
        32 + // ledger
        32 + // reference_hash
        8 +  // deposited
        8 +  // withdrawn
        8 +  // outstanding
        1;   // bump

    pub fn new(ledger: Pubkey, reference_hash: [u8; 32]) -> Self {
        Self {
            ledger,
            reference_hash,
            deposited: 0,
            withdrawn: 0,
            outstanding: 0,
            bump: 0,
        }
    }

    pub fn credit(&mut self, amount: u64) -> Result<()> {
        self.deposited = self
            .deposited
            .checked_add(amount)
            .ok_or(LockerError::MathOverflow)?;
        self.outstanding = self
            .outstanding
            .checked_add(amount)
            .ok_or(LockerError::MathOverflow)?;
        Ok(())
    }

    pub fn debit(&mut self, amount: u64) -> Result<()> {
        require!(
            amount <= self.outstanding,
            LockerError::WithdrawExceedsOutstanding
        );
        self.outstanding -= amount;
        self.withdrawn = self
            .withdrawn
            .checked_add(amount)
            .ok_or(LockerError::MathOverflow)?;
        Ok(())
    }
}

/// Validates an external reference and returns the digest used as its PDA seed.
pub fn reference_hash(reference: &[u8]) -> Result<[u8; 32]> {
    require!(
        !reference.is_empty() && reference.len() <= MAX_REFERENCE_LEN,
        LockerError::InvalidReference
    );
    Ok(*blake3::hash(reference).as_bytes())
}

/// In-memory working set of the reference balances touched by one batch.
/// Entries are unique per digest; a batch mutates the book and the caller
/// persists it only once the whole batch has succeeded.
#[derive(Clone, Debug, Default)]
pub struct ReferenceBook {
    entries: Vec<ReferenceBalance>,
}

impl ReferenceBook {
    pub fn new(entries: Vec<ReferenceBalance>) -> Self {
        Self { entries }
    }

    pub fn get(&self, hash: &[u8; 32]) -> Option<&ReferenceBalance> {
        self.entries.iter().find(|e| &e.reference_hash == hash)
    }

    pub fn outstanding(&self, hash: &[u8; 32]) -> u64 {
        self.get(hash).map(|e| e.outstanding).unwrap_or(0)
    }

    /// Existing entry for `hash`, or a fresh zero balance owned by `ledger`.
    pub fn entry_mut(&mut self, ledger: Pubkey, hash: [u8; 32]) -> &mut ReferenceBalance {
        let idx = match self.entries.iter().position(|e| e.reference_hash == hash) {
            Some(idx) => idx,
            None => {
                self.entries.push(ReferenceBalance::new(ledger, hash));
                self.entries.len() - 1
            }
        };
        &mut self.entries[idx]
    }

    /// Debits `amount` from `hash`. A zero debit against an unknown reference is a no-op.
    pub fn debit(&mut self, hash: &[u8; 32], amount: u64) -> Result<()> {
        match self.entries.iter_mut().find(|e| &e.reference_hash == hash) {
            Some(entry) => entry.debit(amount),
            None => {
                require!(amount == 0, LockerError::WithdrawExceedsOutstanding);
                Ok(())
            }
        }
    }

    pub fn entries(&self) -> &[ReferenceBalance] {
        &self.entries
    }
}
