//! Loading and persisting the per-reference PDAs a batch passes through
//! `remaining_accounts` (one account per item, in item order).

use anchor_lang::prelude::*;
use anchor_lang::system_program::{self, Allocate, Assign, CreateAccount, Transfer};

use crate::constants::REFERENCE_SEED;
use crate::error::LockerError;
use crate::state::{reference_hash, ReferenceBalance, ReferenceBook};

struct ReferenceSlot<'a, 'info> {
    info: &'a AccountInfo<'info>,
    hash: [u8; 32],
    bump: u8,
    exists: bool,
}

/// The distinct reference accounts touched by one batch plus their working book.
pub struct ReferenceAccounts<'a, 'info> {
    ledger: Pubkey,
    slots: Vec<ReferenceSlot<'a, 'info>>,
    pub book: ReferenceBook,
}

impl<'a, 'info> ReferenceAccounts<'a, 'info> {
    pub fn load<'r>(
        ledger: Pubkey,
        references: impl ExactSizeIterator<Item = &'r [u8]>,
        accounts: &'a [AccountInfo<'info>],
    ) -> Result<Self> {
        require!(
            references.len() == accounts.len(),
            LockerError::ReferenceAccountsMismatch
        );

        let mut slots: Vec<ReferenceSlot<'a, 'info>> = Vec::with_capacity(accounts.len());
        let mut entries = Vec::with_capacity(accounts.len());
        for (reference, info) in references.zip(accounts.iter()) {
            let hash = reference_hash(reference)?;
            let (expected, bump) = Pubkey::find_program_address(
                &[REFERENCE_SEED, ledger.as_ref(), hash.as_ref()],
                &crate::ID,
            );
            require_keys_eq!(info.key(), expected, LockerError::InvalidReferenceAccount);
            if slots.iter().any(|s| s.hash == hash) {
                continue;
            }

            let exists = info.owner == &crate::ID;
            if exists {
                let data = info.try_borrow_data()?;
                let balance = ReferenceBalance::try_deserialize(&mut &data[..])?;
                require_keys_eq!(balance.ledger, ledger, LockerError::InvalidReferenceAccount);
                entries.push(balance);
            } else {
                require_keys_eq!(
                    *info.owner,
                    system_program::ID,
                    LockerError::InvalidReferenceAccount
                );
            }
            slots.push(ReferenceSlot {
                info,
                hash,
                bump,
                exists,
            });
        }

        Ok(Self {
            ledger,
            slots,
            book: ReferenceBook::new(entries),
        })
    }

    /// Allocates the PDA of every reference that entered the book during this batch.
    pub fn create_missing(
        &self,
        payer: &AccountInfo<'info>,
        system_program: &AccountInfo<'info>,
    ) -> Result<()> {
        let space = 8 + ReferenceBalance::SIZE;
        let rent = Rent::get()?.minimum_balance(space);

        for slot in self.slots.iter().filter(|s| !s.exists) {
            if self.book.get(&slot.hash).is_none() {
                continue;
            }
            let bump = [slot.bump];
            let seeds: &[&[u8]] = &[REFERENCE_SEED, self.ledger.as_ref(), slot.hash.as_ref(), &bump];
            let signer_seeds: &[&[&[u8]]] = &[seeds];

            let lamports = slot.info.lamports();
            if lamports == 0 {
                system_program::create_account(
                    CpiContext::new_with_signer(
                        system_program.clone(),
                        CreateAccount {
                            from: payer.clone(),
                            to: slot.info.clone(),
                        },
                        signer_seeds,
                    ),
                    rent,
                    space as u64,
                    &crate::ID,
                )?;
                continue;
            }

            // Pre-funded address: top up, then allocate and assign in place.
            let top_up = rent.saturating_sub(lamports);
            if top_up > 0 {
                system_program::transfer(
                    CpiContext::new(
                        system_program.clone(),
                        Transfer {
                            from: payer.clone(),
                            to: slot.info.clone(),
                        },
                    ),
                    top_up,
                )?;
            }
            system_program::allocate(
                CpiContext::new_with_signer(
                    system_program.clone(),
                    Allocate {
                        account_to_allocate: slot.info.clone(),
                    },
                    signer_seeds,
                ),
                space as u64,
            )?;
            system_program::assign(
                CpiContext::new_with_signer(
                    system_program.clone(),
                    Assign {
                        account_to_assign: slot.info.clone(),
                    },
                    signer_seeds,
                ),
                &crate::ID,
            )?;
        }
        Ok(())
    }

    /// Writes every book entry back to its account.
    pub fn store(&self) -> Result<()> {
        for slot in &self.slots {
            let Some(balance) = self.book.get(&slot.hash) else {
                continue;
            };
            let mut balance = balance.clone();
            balance.bump = slot.bump;

            let mut data = slot.info.try_borrow_mut_data()?;
            let mut writer: &mut [u8] = &mut data;
            balance.try_serialize(&mut writer)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pda(ledger: &Pubkey, reference: &[u8]) -> (Pubkey, u8) {
        let hash = reference_hash(reference).unwrap();
        Pubkey::find_program_address(&[REFERENCE_SEED, ledger.as_ref(), hash.as_ref()], &crate::ID)
    }

    fn serialized(balance: &ReferenceBalance) -> Vec<u8> {
        let mut data = Vec::new();
        balance.try_serialize(&mut data).unwrap();
        data
    }

    #[test]
    fn account_count_must_match_items() {
        let ledger = Pubkey::new_unique();
        let (key, _) = pda(&ledger, b"f0");
        let owner = system_program::ID;
        let mut lamports = 0u64;
        let mut data: Vec<u8> = Vec::new();
        let accounts = [AccountInfo::new(&key, false, true, &mut lamports, &mut data[..], &owner, false, 0)];

        let references: [&[u8]; 2] = [b"f0", b"f1"];
        let err = ReferenceAccounts::load(ledger, references.iter().copied(), &accounts)
            .err()
            .unwrap();
        assert_eq!(err, LockerError::ReferenceAccountsMismatch.into());
    }

    #[test]
    fn account_must_sit_at_reference_address() {
        let ledger = Pubkey::new_unique();
        let key = Pubkey::new_unique();
        let owner = system_program::ID;
        let mut lamports = 0u64;
        let mut data: Vec<u8> = Vec::new();
        let accounts = [AccountInfo::new(&key, false, true, &mut lamports, &mut data[..], &owner, false, 0)];

        let references: [&[u8]; 1] = [b"f0"];
        let err = ReferenceAccounts::load(ledger, references.iter().copied(), &accounts)
            .err()
            .unwrap();
        assert_eq!(err, LockerError::InvalidReferenceAccount.into());
    }

    #[test]
    fn repeated_reference_shares_one_slot() {
        let ledger = Pubkey::new_unique();
        let (key, bump) = pda(&ledger, b"f0");
        let owner = system_program::ID;
        let (mut l0, mut l1) = (0u64, 0u64);
        let (mut d0, mut d1): (Vec<u8>, Vec<u8>) = (Vec::new(), Vec::new());
        let accounts = [
            AccountInfo::new(&key, false, true, &mut l0, &mut d0[..], &owner, false, 0),
            AccountInfo::new(&key, false, true, &mut l1, &mut d1[..], &owner, false, 0),
        ];

        let references: [&[u8]; 2] = [b"f0", b"f0"];
        let loaded = ReferenceAccounts::load(ledger, references.iter().copied(), &accounts).unwrap();
        assert_eq!(loaded.slots.len(), 1);
        assert_eq!(loaded.slots[0].bump, bump);
        assert!(!loaded.slots[0].exists);
        assert!(loaded.book.entries().is_empty());
    }

    #[test]
    fn existing_balance_loads_and_stores_back() {
        let ledger = Pubkey::new_unique();
        let (key, bump) = pda(&ledger, b"f0");
        let hash = reference_hash(b"f0").unwrap();
        let mut balance = ReferenceBalance::new(ledger, hash);
        balance.credit(40).unwrap();

        let owner = crate::ID;
        let mut lamports = 1_000_000u64;
        let mut data = serialized(&balance);
        let accounts = [AccountInfo::new(&key, false, true, &mut lamports, &mut data[..], &owner, false, 0)];

        let references: [&[u8]; 1] = [b"f0"];
        let mut loaded = ReferenceAccounts::load(ledger, references.iter().copied(), &accounts).unwrap();
        assert!(loaded.slots[0].exists);
        assert_eq!(loaded.book.outstanding(&hash), 40);

        loaded.book.debit(&hash, 15).unwrap();
        loaded.store().unwrap();

        let stored = ReferenceBalance::try_deserialize(&mut &accounts[0].try_borrow_data().unwrap()[..]).unwrap();
        assert_eq!(stored.deposited, 40);
        assert_eq!(stored.withdrawn, 15);
        assert_eq!(stored.outstanding, 25);
        assert_eq!(stored.bump, bump);
    }

    #[test]
    fn balance_of_another_ledger_rejected() {
        let ledger = Pubkey::new_unique();
        let (key, _) = pda(&ledger, b"f0");
        let foreign = ReferenceBalance::new(Pubkey::new_unique(), reference_hash(b"f0").unwrap());

        let owner = crate::ID;
        let mut lamports = 1_000_000u64;
        let mut data = serialized(&foreign);
        let accounts = [AccountInfo::new(&key, false, true, &mut lamports, &mut data[..], &owner, false, 0)];

        let references: [&[u8]; 1] = [b"f0"];
        let err = ReferenceAccounts::load(ledger, references.iter().copied(), &accounts)
            .err()
            .unwrap();
        assert_eq!(err, LockerError::InvalidReferenceAccount.into());
    }
}
