use anchor_lang::prelude::*;

use crate::constants::{BPS_DENOMINATOR, EARLY_WITHDRAW_SECONDARY_BPS, EARLY_WITHDRAW_SINK_BPS};
use crate::error::LockerError;

/// How a withdrawn amount is divided between the requester, the secondary
/// beneficiary and the sink. The three parts always sum to the withdrawn amount.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FeeSplit {
    pub requester: u64,
    pub secondary: u64,
    pub sink: u64,
}

impl FeeSplit {
    /// Matured release: everything goes to the requester.
    pub fn fee_free(amount: u64) -> Self {
        Self {
            requester: amount,
            secondary: 0,
            sink: 0,
        }
    }

    /// Early release: 25% / 25% to secondary / sink (floored), rest to the requester.
    pub fn early(amount: u64) -> std::result::Result<Self, LockerError> {
        let secondary = bps_floor(amount, EARLY_WITHDRAW_SECONDARY_BPS)?;
        let sink = bps_floor(amount, EARLY_WITHDRAW_SINK_BPS)?;
        let requester = amount
            .checked_sub(secondary)
            .and_then(|v| v.checked_sub(sink))
            .ok_or(LockerError::MathOverflow)?;
        Ok(Self {
            requester,
            secondary,
            sink,
        })
    }

    #[cfg(test)]
    pub fn total(&self) -> std::result::Result<u64, LockerError> {
        self.requester
            .checked_add(self.secondary)
            .and_then(|v| v.checked_add(self.sink))
            .ok_or(LockerError::MathOverflow)
    }

    /// Field-wise sum, used to aggregate a batch into one transfer per destination.
    pub fn checked_add(&self, other: &FeeSplit) -> std::result::Result<Self, LockerError> {
        Ok(Self {
            requester: self
                .requester
                .checked_add(other.requester)
                .ok_or(LockerError::MathOverflow)?,
            secondary: self
                .secondary
                .checked_add(other.secondary)
                .ok_or(LockerError::MathOverflow)?,
            sink: self
                .sink
                .checked_add(other.sink)
                .ok_or(LockerError::MathOverflow)?,
        })
    }
}

fn bps_floor(amount: u64, bps: u128) -> std::result::Result<u64, LockerError> {
    let v = (amount as u128)
        .checked_mul(bps)
        .ok_or(LockerError::MathOverflow)?
        / BPS_DENOMINATOR;
    u64::try_from(v).map_err(|_| LockerError::MathOverflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const TOKEN: u64 = 1_000_000_000; // 9 decimals

    #[test]
    fn early_split_of_ten_tokens() {
        let split = FeeSplit::early(10 * TOKEN).unwrap();
        assert_eq!(split.requester, 5 * TOKEN);
        assert_eq!(split.secondary, 25 * TOKEN / 10);
        assert_eq!(split.sink, 25 * TOKEN / 10);
    }

    #[test]
    fn early_split_folds_dust_into_requester() {
        assert_eq!(
            FeeSplit::early(10).unwrap(),
            FeeSplit {
                requester: 6,
                secondary: 2,
                sink: 2
            }
        );
        assert_eq!(
            FeeSplit::early(3).unwrap(),
            FeeSplit {
                requester: 3,
                secondary: 0,
                sink: 0
            }
        );
        assert_eq!(FeeSplit::early(0).unwrap(), FeeSplit::default());
    }

    #[test]
    fn fee_free_pays_requester_only() {
        let split = FeeSplit::fee_free(50);
        assert_eq!(split.requester, 50);
        assert_eq!(split.secondary + split.sink, 0);
    }

    proptest! {
        #[test]
        fn early_split_sums_to_amount(amount in any::<u64>()) {
            let split = FeeSplit::early(amount).unwrap();
            prop_assert_eq!(split.total().unwrap(), amount);
            prop_assert_eq!(split.secondary, amount / 4);
            prop_assert_eq!(split.sink, amount / 4);
            prop_assert!(split.requester >= split.secondary);
        }
    }
}
