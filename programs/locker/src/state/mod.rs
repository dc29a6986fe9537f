pub mod lock_ledger;
pub mod reference_balance;
pub mod vesting_schedule;

pub use lock_ledger::*;
pub use reference_balance::*;
pub use vesting_schedule::*;
