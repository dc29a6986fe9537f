//! Program-wide constants.

/// Seconds per day (UTC). Day length used when a ledger is created without one.
pub const SECONDS_PER_DAY: u64 = 86_400;

/// Max items processed per `deposit` / `withdraw` batch.
pub const MAX_BATCH_ITEMS: usize = 16;

/// Max distinct unlock days held in the ledger's bucket table.
pub const MAX_UNLOCK_BUCKETS: usize = 256;

/// Max length in bytes of an external deposit reference.
pub const MAX_REFERENCE_LEN: usize = 64;

/// Upper bound on the number of vesting installments.
pub const MAX_VESTING_PARTS: u16 = 1_000;

pub const BPS_DENOMINATOR: u128 = 10_000;

/// Early-withdraw share routed to the secondary beneficiary (team wallet).
pub const EARLY_WITHDRAW_SECONDARY_BPS: u128 = 2_500;

/// Early-withdraw share routed to the sink (burn wallet).
pub const EARLY_WITHDRAW_SINK_BPS: u128 = 2_500;

pub const LOCK_LEDGER_SEED: &[u8] = b"lock_ledger";
pub const LEDGER_VAULT_SEED: &[u8] = b"ledger_vault";
pub const REFERENCE_SEED: &[u8] = b"reference";
pub const VESTING_SCHEDULE_SEED: &[u8] = b"vesting_schedule";
pub const VESTING_VAULT_SEED: &[u8] = b"vesting_vault";
