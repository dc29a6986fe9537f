use anchor_lang::prelude::*;

use crate::constants::{MAX_BATCH_ITEMS, MAX_UNLOCK_BUCKETS, SECONDS_PER_DAY};
use crate::error::LockerError;
use crate::state::{reference_hash, ReferenceBook};
use crate::utils::fees::FeeSplit;
use crate::utils::time;

/// Principal scheduled to become withdrawable fee-free on `day`.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UnlockBucket {
    pub day: u64,
    pub amount: u64,
}

impl UnlockBucket {
    pub const SIZE: usize = 8 + 8;
}

/// Batch lock ledger state PDA.
/// Seeds: [b"lock_ledger", mint]
#[account]
#[derive(Debug)]
pub struct LockLedger {
    /// Authority allowed to submit deposit and withdrawal batches.
    pub admin: Pubkey,
    /// Custody token mint.
    pub mint: Pubkey,
    /// Requester destination (receives principal, or its 50% share when early).
    pub treasury: Pubkey,
    /// Secondary beneficiary token account (25% of early withdrawals).
    pub team_wallet: Pubkey,
    /// Sink token account (25% of early withdrawals).
    pub burn_wallet: Pubkey,
    /// Length of one day index in seconds.
    pub seconds_per_day: u64,
    /// Days between a deposit and its fee-free unlock.
    pub lock_duration_days: u64,
    /// Principal not yet withdrawn, matured or not.
    pub total_locked: u64,
    /// Part of `total_locked` whose unlock day is <= `settled_day`.
    pub total_unlocked: u64,
    /// Last day folded into `total_unlocked`.
    pub settled_day: u64,
    pub bump: u8,
    pub vault_bump: u8,
    /// Day buckets (<= MAX_UNLOCK_BUCKETS), unordered.
    pub buckets: Vec<UnlockBucket>,
}

impl LockLedger {
    pub const fn space() -> usize {
        8 +  // discriminator
        32 + // admin
        32 + // mint
        32 + // treasury
        32 + // team_wallet
        32 + // burn_wallet
        8 +  // seconds_per_day
        8 +  // lock_duration_days
        8 +  // total_locked
        8 +  // total_unlocked
        8 +  // settled_day
        1 +  // bump
        1 +  // vault_bump
        4 + MAX_UNLOCK_BUCKETS * UnlockBucket::SIZE
    }

    pub fn current_day(&self, now_ts: i64) -> Result<u64> {
        Ok(time::day_index(now_ts, self.seconds_per_day)?)
    }

    pub fn bucket_amount(&self, day: u64) -> u64 {
        self.buckets
            .iter()
            .find(|b| b.day == day)
            .map(|b| b.amount)
            .unwrap_or(0)
    }

    /// Sum of every bucket; equals `total_locked` at all times.
    #[cfg(test)]
    pub fn bucket_sum(&self) -> Result<u64> {
        self.buckets.iter().try_fold(0u64, |acc, b| {
            acc.checked_add(b.amount)
                .ok_or_else(|| error!(LockerError::MathOverflow))
        })
    }

    /// Matured total as of `current_day`, without rolling the ledger forward.
    pub fn unlocked_as_of(&self, current_day: u64) -> Result<u64> {
        let pending = self.maturing_between(self.settled_day, current_day)?;
        Ok(self
            .total_unlocked
            .checked_add(pending)
            .ok_or(LockerError::MathOverflow)?)
    }

    /// Folds buckets with day in (settled_day, current_day] into `total_unlocked`.
    pub fn settle(&mut self, current_day: u64) -> Result<()> {
        if current_day <= self.settled_day {
            return Ok(());
        }
        self.total_unlocked = self.unlocked_as_of(current_day)?;
        self.settled_day = current_day;
        Ok(())
    }

    fn maturing_between(&self, after: u64, through: u64) -> Result<u64> {
        self.buckets
            .iter()
            .filter(|b| b.day > after && b.day <= through)
            .try_fold(0u64, |acc, b| {
                acc.checked_add(b.amount)
                    .ok_or_else(|| error!(LockerError::MathOverflow))
            })
    }

    fn credit_bucket(&mut self, day: u64, amount: u64) -> Result<()> {
        if let Some(bucket) = self.buckets.iter_mut().find(|b| b.day == day) {
            bucket.amount = bucket
                .amount
                .checked_add(amount)
                .ok_or(LockerError::MathOverflow)?;
            return Ok(());
        }
        if self.buckets.len() >= MAX_UNLOCK_BUCKETS {
            // Drained, matured days read back as 0 whether stored or not.
            let settled_day = self.settled_day;
            self.buckets
                .retain(|b| b.amount != 0 || b.day > settled_day);
        }
        require!(
            self.buckets.len() < MAX_UNLOCK_BUCKETS,
            LockerError::UnlockScheduleFull
        );
        self.buckets.push(UnlockBucket { day, amount });
        Ok(())
    }

    fn debit_bucket(&mut self, day: u64, amount: u64) -> Result<()> {
        if amount == 0 {
            return Ok(());
        }
        let bucket = self
            .buckets
            .iter_mut()
            .find(|b| b.day == day)
            .ok_or(LockerError::BucketUnderflow)?;
        require!(bucket.amount >= amount, LockerError::BucketUnderflow);
        bucket.amount -= amount;
        Ok(())
    }

    /// Applies a deposit batch. Every item lands in the bucket
    /// `current_day + lock_duration_days`. All-or-nothing: on error neither
    /// the ledger nor `book` is modified.
    pub fn deposit_batch(
        &mut self,
        ledger: Pubkey,
        current_day: u64,
        items: &[DepositItem],
        book: &mut ReferenceBook,
    ) -> Result<Vec<DepositRecord>> {
        check_batch_len(items.len())?;

        let mut staged = self.clone();
        let mut staged_book = book.clone();
        staged.settle(current_day)?;

        let unlock_day = current_day
            .checked_add(staged.lock_duration_days)
            .ok_or(LockerError::MathOverflow)?;
        let matured = unlock_day <= staged.settled_day;

        let mut records = Vec::with_capacity(items.len());
        for item in items {
            let hash = reference_hash(&item.reference)?;
            staged.credit_bucket(unlock_day, item.amount)?;
            staged.total_locked = staged
                .total_locked
                .checked_add(item.amount)
                .ok_or(LockerError::MathOverflow)?;
            if matured {
                staged.total_unlocked = staged
                    .total_unlocked
                    .checked_add(item.amount)
                    .ok_or(LockerError::MathOverflow)?;
            }
            staged_book.entry_mut(ledger, hash).credit(item.amount)?;
            records.push(DepositRecord {
                reference: item.reference.clone(),
                amount: item.amount,
                unlock_day,
            });
        }

        *self = staged;
        *book = staged_book;
        Ok(records)
    }

    /// Applies a withdrawal batch, classifying each item as matured or early
    /// against `current_day`. All-or-nothing: on error neither the ledger nor
    /// `book` is modified.
    pub fn withdraw_batch(
        &mut self,
        current_day: u64,
        items: &[WithdrawItem],
        book: &mut ReferenceBook,
    ) -> Result<Vec<Settlement>> {
        check_batch_len(items.len())?;

        let mut staged = self.clone();
        let mut staged_book = book.clone();
        staged.settle(current_day)?;

        let mut settlements = Vec::with_capacity(items.len());
        for item in items {
            let hash = reference_hash(&item.reference)?;
            require!(
                item.amount <= staged_book.outstanding(&hash),
                LockerError::WithdrawExceedsOutstanding
            );

            let matured = current_day >= item.lock_end_day;
            require!(
                item.early_withdraw || matured,
                LockerError::LockNotEnded
            );
            require!(
                !(item.early_withdraw && matured),
                LockerError::LockAlreadyEnded
            );

            let split = if item.early_withdraw {
                FeeSplit::early(item.amount)?
            } else {
                FeeSplit::fee_free(item.amount)
            };

            staged.debit_bucket(item.lock_end_day, item.amount)?;
            staged.total_locked = staged
                .total_locked
                .checked_sub(item.amount)
                .ok_or(LockerError::MathOverflow)?;
            if matured {
                staged.total_unlocked = staged
                    .total_unlocked
                    .checked_sub(item.amount)
                    .ok_or(LockerError::MathOverflow)?;
            }
            staged_book.debit(&hash, item.amount)?;

            settlements.push(Settlement {
                reference: item.reference.clone(),
                amount: item.amount,
                lock_end_day: item.lock_end_day,
                early_withdraw: item.early_withdraw,
                split,
            });
        }

        *self = staged;
        *book = staged_book;
        Ok(settlements)
    }
}

/// Construction-time parameters, immutable afterwards.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct LedgerParams {
    /// Falls back to `SECONDS_PER_DAY` when unset.
    pub seconds_per_day: Option<u64>,
    pub lock_duration_days: u64,
}

impl LedgerParams {
    pub fn day_length(&self) -> u64 {
        self.seconds_per_day.unwrap_or(SECONDS_PER_DAY)
    }

    pub fn validate(&self) -> Result<()> {
        require!(self.day_length() > 0, LockerError::InvalidConfig);
        Ok(())
    }
}

fn check_batch_len(len: usize) -> Result<()> {
    require!(len > 0, LockerError::EmptyBatch);
    require!(len <= MAX_BATCH_ITEMS, LockerError::BatchTooLarge);
    Ok(())
}

/// Instruction input: one deposit under an external reference.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct DepositItem {
    pub reference: Vec<u8>,
    pub amount: u64,
}

/// Instruction input: one withdrawal against an external reference.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct WithdrawItem {
    pub reference: Vec<u8>,
    pub amount: u64,
    pub lock_end_day: u64,
    pub early_withdraw: bool,
}

/// Outcome of one accepted deposit item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DepositRecord {
    pub reference: Vec<u8>,
    pub amount: u64,
    pub unlock_day: u64,
}

/// Outcome of one accepted withdrawal item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settlement {
    pub reference: Vec<u8>,
    pub amount: u64,
    pub lock_end_day: u64,
    pub early_withdraw: bool,
    pub split: FeeSplit,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const LOCK_DAYS: u64 = 30;
    const START_DAY: u64 = 18_954;
    const TOKEN: u64 = 1_000_000_000;

    fn ledger(lock_duration_days: u64) -> LockLedger {
        LockLedger {
            admin: Pubkey::new_unique(),
            mint: Pubkey::new_unique(),
            treasury: Pubkey::new_unique(),
            team_wallet: Pubkey::new_unique(),
            burn_wallet: Pubkey::new_unique(),
            seconds_per_day: 86_400,
            lock_duration_days,
            total_locked: 0,
            total_unlocked: 0,
            settled_day: START_DAY,
            bump: 255,
            vault_bump: 254,
            buckets: Vec::new(),
        }
    }

    fn dep(reference: &str, amount: u64) -> DepositItem {
        DepositItem {
            reference: reference.as_bytes().to_vec(),
            amount,
        }
    }

    fn wd(reference: &str, amount: u64, lock_end_day: u64, early_withdraw: bool) -> WithdrawItem {
        WithdrawItem {
            reference: reference.as_bytes().to_vec(),
            amount,
            lock_end_day,
            early_withdraw,
        }
    }

    fn outstanding(book: &ReferenceBook, reference: &str) -> u64 {
        book.outstanding(&reference_hash(reference.as_bytes()).unwrap())
    }

    #[test]
    fn deposit_batch_fills_one_bucket_per_day() {
        let key = Pubkey::new_unique();
        let mut l = ledger(LOCK_DAYS);
        let mut book = ReferenceBook::default();

        let records = l
            .deposit_batch(key, START_DAY, &[dep("f0", 100 * TOKEN), dep("f1", 50 * TOKEN)], &mut book)
            .unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.unlock_day == START_DAY + LOCK_DAYS));
        assert_eq!(l.bucket_amount(START_DAY + LOCK_DAYS), 150 * TOKEN);
        assert_eq!(l.total_locked, 150 * TOKEN);

        // Two days later the same references land in a separate bucket.
        l.deposit_batch(key, START_DAY + 2, &[dep("f0", 10 * TOKEN), dep("f1", 5 * TOKEN)], &mut book)
            .unwrap();
        assert_eq!(l.bucket_amount(START_DAY + 2 + LOCK_DAYS), 15 * TOKEN);
        assert_eq!(l.bucket_amount(START_DAY + LOCK_DAYS), 150 * TOKEN);
        assert_eq!(l.total_locked, 165 * TOKEN);
        assert_eq!(l.bucket_sum().unwrap(), l.total_locked);
        assert_eq!(outstanding(&book, "f0"), 110 * TOKEN);
        assert_eq!(outstanding(&book, "f1"), 55 * TOKEN);
        assert_eq!(book.get(&reference_hash(b"f0").unwrap()).unwrap().ledger, key);
    }

    #[test]
    fn early_withdraw_splits_and_reduces_locked() {
        let key = Pubkey::new_unique();
        let mut l = ledger(LOCK_DAYS);
        let mut book = ReferenceBook::default();
        l.deposit_batch(key, START_DAY, &[dep("f0", 150 * TOKEN)], &mut book)
            .unwrap();

        let lock_end = START_DAY + LOCK_DAYS;
        let settlements = l
            .withdraw_batch(START_DAY + 1, &[wd("f0", 10 * TOKEN, lock_end, true)], &mut book)
            .unwrap();
        let split = settlements[0].split;
        assert_eq!(split.requester, 5 * TOKEN);
        assert_eq!(split.secondary, 25 * TOKEN / 10);
        assert_eq!(split.sink, 25 * TOKEN / 10);
        assert_eq!(l.total_locked, 140 * TOKEN);
        assert_eq!(l.total_unlocked, 0);
        assert_eq!(l.bucket_amount(lock_end), 140 * TOKEN);
        assert_eq!(outstanding(&book, "f0"), 140 * TOKEN);
    }

    #[test]
    fn maturity_flag_mismatch_rejected_both_ways() {
        let key = Pubkey::new_unique();
        let mut l = ledger(LOCK_DAYS);
        let mut book = ReferenceBook::default();
        l.deposit_batch(key, START_DAY, &[dep("f0", 100)], &mut book).unwrap();
        let lock_end = START_DAY + LOCK_DAYS;

        // Fee-free claim before maturity.
        assert_eq!(
            l.withdraw_batch(lock_end - 1, &[wd("f0", 1, lock_end, false)], &mut book)
                .unwrap_err(),
            LockerError::LockNotEnded.into()
        );
        // "Early" claim at or after maturity.
        assert_eq!(
            l.withdraw_batch(lock_end, &[wd("f0", 1, lock_end, true)], &mut book)
                .unwrap_err(),
            LockerError::LockAlreadyEnded.into()
        );
        // The matching flags pass on either side of the boundary.
        l.withdraw_batch(lock_end - 1, &[wd("f0", 1, lock_end, true)], &mut book)
            .unwrap();
        l.withdraw_batch(lock_end, &[wd("f0", 1, lock_end, false)], &mut book)
            .unwrap();
    }

    #[test]
    fn invalid_item_rolls_back_whole_batch() {
        let key = Pubkey::new_unique();
        let mut l = ledger(LOCK_DAYS);
        let mut book = ReferenceBook::default();
        l.deposit_batch(key, START_DAY, &[dep("f0", 100), dep("f1", 100)], &mut book)
            .unwrap();
        let lock_end = START_DAY + LOCK_DAYS;

        let before_buckets = l.buckets.clone();
        let before_locked = l.total_locked;
        let before_book = book.entries().to_vec();

        let err = l
            .withdraw_batch(
                START_DAY + 1,
                &[
                    wd("f0", 10, lock_end, true),
                    wd("f1", 1, lock_end, false),
                    wd("f1", 5, lock_end, true),
                ],
                &mut book,
            )
            .unwrap_err();
        assert_eq!(err, LockerError::LockNotEnded.into());
        assert_eq!(l.buckets, before_buckets);
        assert_eq!(l.total_locked, before_locked);
        assert_eq!(l.settled_day, START_DAY);
        assert_eq!(book.entries(), before_book.as_slice());

        // Cumulative claims inside one batch are bounded too.
        let err = l
            .withdraw_batch(
                START_DAY + 1,
                &[wd("f0", 60, lock_end, true), wd("f0", 41, lock_end, true)],
                &mut book,
            )
            .unwrap_err();
        assert_eq!(err, LockerError::WithdrawExceedsOutstanding.into());
        assert_eq!(outstanding(&book, "f0"), 100);

        // A failing deposit item leaves the ledger untouched as well.
        let err = l
            .deposit_batch(key, START_DAY + 1, &[dep("f2", 5), dep("", 5)], &mut book)
            .unwrap_err();
        assert_eq!(err, LockerError::InvalidReference.into());
        assert_eq!(l.total_locked, before_locked);
        assert_eq!(outstanding(&book, "f2"), 0);
    }

    #[test]
    fn exhausted_reference_cannot_be_replayed() {
        let key = Pubkey::new_unique();
        let mut l = ledger(LOCK_DAYS);
        let mut book = ReferenceBook::default();
        l.deposit_batch(key, START_DAY, &[dep("f0", 40)], &mut book).unwrap();
        let lock_end = START_DAY + LOCK_DAYS;

        l.withdraw_batch(lock_end, &[wd("f0", 25, lock_end, false)], &mut book)
            .unwrap();
        l.withdraw_batch(lock_end + 1, &[wd("f0", 15, lock_end, false)], &mut book)
            .unwrap();
        assert_eq!(
            l.withdraw_batch(lock_end + 1, &[wd("f0", 15, lock_end, false)], &mut book)
                .unwrap_err(),
            LockerError::WithdrawExceedsOutstanding.into()
        );
        // Never-deposited reference.
        assert_eq!(
            l.withdraw_batch(lock_end + 1, &[wd("nope", 1, lock_end, false)], &mut book)
                .unwrap_err(),
            LockerError::WithdrawExceedsOutstanding.into()
        );
        assert_eq!(l.total_locked, 0);
        assert_eq!(l.bucket_amount(lock_end), 0);
    }

    #[test]
    fn zero_amount_items_are_bookkeeping_only() {
        let key = Pubkey::new_unique();
        let mut l = ledger(LOCK_DAYS);
        let mut book = ReferenceBook::default();
        l.deposit_batch(key, START_DAY, &[dep("f0", 0)], &mut book).unwrap();
        assert_eq!(l.total_locked, 0);
        assert_eq!(book.entries().len(), 1);

        let s = l
            .withdraw_batch(START_DAY, &[wd("unknown", 0, START_DAY + 5, true)], &mut book)
            .unwrap();
        assert_eq!(s[0].split, FeeSplit::default());
        assert_eq!(book.entries().len(), 1);
    }

    #[test]
    fn bucket_cannot_be_overdrawn_through_another_reference() {
        let key = Pubkey::new_unique();
        let mut l = ledger(LOCK_DAYS);
        let mut book = ReferenceBook::default();
        l.deposit_batch(key, START_DAY, &[dep("a", 10)], &mut book).unwrap();
        l.deposit_batch(key, START_DAY + 1, &[dep("b", 10)], &mut book).unwrap();

        // "b" has 10 outstanding, but its deposit sits in the following day's bucket.
        let err = l
            .withdraw_batch(
                START_DAY + 2,
                &[wd("a", 10, START_DAY + LOCK_DAYS, true), wd("b", 10, START_DAY + LOCK_DAYS, true)],
                &mut book,
            )
            .unwrap_err();
        assert_eq!(err, LockerError::BucketUnderflow.into());
    }

    #[test]
    fn unlocked_total_tracks_matured_buckets() {
        let key = Pubkey::new_unique();
        let mut l = ledger(2);
        let mut book = ReferenceBook::default();
        l.deposit_batch(key, START_DAY, &[dep("a", 10)], &mut book).unwrap();
        l.deposit_batch(key, START_DAY + 1, &[dep("b", 20)], &mut book).unwrap();
        assert_eq!(l.total_unlocked, 0);
        assert_eq!(l.unlocked_as_of(START_DAY + 2).unwrap(), 10);
        assert_eq!(l.unlocked_as_of(START_DAY + 3).unwrap(), 30);

        l.withdraw_batch(START_DAY + 2, &[wd("a", 4, START_DAY + 2, false)], &mut book)
            .unwrap();
        assert_eq!(l.settled_day, START_DAY + 2);
        assert_eq!(l.total_unlocked, 6);

        // Early exit from the unmatured bucket leaves the matured total alone.
        l.withdraw_batch(START_DAY + 2, &[wd("b", 8, START_DAY + 3, true)], &mut book)
            .unwrap();
        assert_eq!(l.total_unlocked, 6);
        assert_eq!(l.unlocked_as_of(START_DAY + 3).unwrap(), 18);
        assert_eq!(l.total_locked, 18);
    }

    #[test]
    fn zero_lock_duration_matures_immediately() {
        let key = Pubkey::new_unique();
        let mut l = ledger(0);
        let mut book = ReferenceBook::default();
        l.deposit_batch(key, START_DAY, &[dep("a", 10)], &mut book).unwrap();
        assert_eq!(l.total_unlocked, 10);
        l.withdraw_batch(START_DAY, &[wd("a", 10, START_DAY, false)], &mut book)
            .unwrap();
        assert_eq!((l.total_locked, l.total_unlocked), (0, 0));
    }

    #[test]
    fn full_table_recycles_drained_matured_days() {
        let key = Pubkey::new_unique();
        let mut l = ledger(1);
        let mut book = ReferenceBook::default();
        for i in 0..MAX_UNLOCK_BUCKETS as u64 {
            l.deposit_batch(key, START_DAY + i, &[dep("a", 1)], &mut book).unwrap();
        }
        let last = START_DAY + MAX_UNLOCK_BUCKETS as u64;
        assert_eq!(
            l.deposit_batch(key, last, &[dep("a", 1)], &mut book).unwrap_err(),
            LockerError::UnlockScheduleFull.into()
        );

        l.withdraw_batch(last, &[wd("a", 1, START_DAY + 1, false)], &mut book)
            .unwrap();
        l.deposit_batch(key, last, &[dep("a", 1)], &mut book).unwrap();
        assert_eq!(l.bucket_amount(START_DAY + 1), 0);
        assert_eq!(l.bucket_amount(last + 1), 1);
        assert_eq!(l.buckets.len(), MAX_UNLOCK_BUCKETS);
        assert_eq!(l.bucket_sum().unwrap(), l.total_locked);
    }

    #[test]
    fn batch_bounds() {
        let key = Pubkey::new_unique();
        let mut l = ledger(LOCK_DAYS);
        let mut book = ReferenceBook::default();
        assert_eq!(
            l.deposit_batch(key, START_DAY, &[], &mut book).unwrap_err(),
            LockerError::EmptyBatch.into()
        );
        let items = vec![dep("a", 1); MAX_BATCH_ITEMS + 1];
        assert_eq!(
            l.deposit_batch(key, START_DAY, &items, &mut book).unwrap_err(),
            LockerError::BatchTooLarge.into()
        );
    }

    #[derive(Clone, Debug)]
    enum Op {
        Deposit { reference: u8, amount: u32, advance: u8 },
        Withdraw { reference: u8, amount: u32, advance: u8, bucket: u8 },
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u8..4, any::<u32>(), 0u8..3).prop_map(|(reference, amount, advance)| Op::Deposit {
                reference,
                amount,
                advance
            }),
            (0u8..4, any::<u32>(), 0u8..3, 0u8..8).prop_map(
                |(reference, amount, advance, bucket)| Op::Withdraw {
                    reference,
                    amount,
                    advance,
                    bucket
                }
            ),
        ]
    }

    #[test]
    fn ledger_params_default_day_and_reject_zero() {
        let params = LedgerParams {
            seconds_per_day: None,
            lock_duration_days: LOCK_DAYS,
        };
        assert!(params.validate().is_ok());
        assert_eq!(params.day_length(), 86_400);
        let hourly = LedgerParams {
            seconds_per_day: Some(3_600),
            ..params
        };
        assert_eq!(hourly.day_length(), 3_600);
        let zero = LedgerParams {
            seconds_per_day: Some(0),
            ..params
        };
        assert_eq!(zero.validate().unwrap_err(), LockerError::InvalidConfig.into());
    }

    proptest! {
        #[test]
        fn totals_match_buckets(ops in proptest::collection::vec(op(), 1..40)) {
            let key = Pubkey::new_unique();
            let mut l = ledger(3);
            let mut book = ReferenceBook::default();
            let mut day = START_DAY;
            let mut deposited: u64 = 0;
            let mut withdrawn: u64 = 0;

            for op in ops {
                match op {
                    Op::Deposit { reference, amount, advance } => {
                        day += advance as u64;
                        let item = DepositItem { reference: vec![b'r', reference], amount: amount as u64 };
                        if l.deposit_batch(key, day, &[item], &mut book).is_ok() {
                            deposited += amount as u64;
                        }
                    }
                    Op::Withdraw { reference, amount, advance, bucket } => {
                        day += advance as u64;
                        let lock_end_day = START_DAY + bucket as u64;
                        let item = WithdrawItem {
                            reference: vec![b'r', reference],
                            amount: amount as u64,
                            lock_end_day,
                            early_withdraw: day < lock_end_day,
                        };
                        let before = l.total_locked;
                        match l.withdraw_batch(day, &[item], &mut book) {
                            Ok(s) => {
                                prop_assert_eq!(s[0].split.total().unwrap(), amount as u64);
                                withdrawn += amount as u64;
                            }
                            Err(_) => prop_assert_eq!(l.total_locked, before),
                        }
                    }
                }

                prop_assert_eq!(l.bucket_sum().unwrap(), l.total_locked);
                prop_assert_eq!(l.total_locked, deposited - withdrawn);
                let matured: u64 = l.buckets.iter().filter(|b| b.day <= l.settled_day).map(|b| b.amount).sum();
                prop_assert_eq!(l.total_unlocked, matured);
                let outstanding: u64 = book.entries().iter().map(|e| e.outstanding).sum();
                prop_assert_eq!(outstanding, l.total_locked);
            }
        }
    }
}
