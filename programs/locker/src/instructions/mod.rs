pub mod initialize_ledger;
pub mod deposit;
pub mod withdraw;
pub mod ledger_views;
pub mod initialize_vesting;
pub mod lock_tokens;
pub mod release_vesting;
pub mod vesting_views;

pub use initialize_ledger::*;
pub use deposit::*;
pub use withdraw::*;
pub use ledger_views::*;
pub use initialize_vesting::*;
pub use lock_tokens::*;
pub use release_vesting::*;
pub use vesting_views::*;
