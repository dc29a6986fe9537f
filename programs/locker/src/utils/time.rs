//! Day-index and deadline arithmetic over Unix timestamps (seconds, UTC).
//! - day_index = floor(now / seconds_per_day), defined for now >= 0 only
//! - every deadline is computed with checked math; overflow is an error, never a wrap

use crate::error::LockerError;

/// Day index of `now_ts` for a ledger ticking every `seconds_per_day` seconds.
pub fn day_index(now_ts: i64, seconds_per_day: u64) -> Result<u64, LockerError> {
    if now_ts < 0 {
        return Err(LockerError::InvalidTimestamp);
    }
    if seconds_per_day == 0 {
        return Err(LockerError::InvalidConfig);
    }
    Ok((now_ts as u64) / seconds_per_day)
}

/// `start + seconds`, rejecting overflow.
pub fn offset_ts(start_ts: i64, seconds: i64) -> Result<i64, LockerError> {
    start_ts
        .checked_add(seconds)
        .ok_or(LockerError::MathOverflow)
}

/// Timestamp at which a schedule with the given cliff has fully elapsed:
/// `cliff + period * parts`.
pub fn vesting_end_ts(cliff_ts: i64, vesting_period: i64, vesting_parts: u16) -> Result<i64, LockerError> {
    let span = vesting_period
        .checked_mul(vesting_parts as i64)
        .ok_or(LockerError::MathOverflow)?;
    offset_ts(cliff_ts, span)
}
