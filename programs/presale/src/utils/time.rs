//! Linear-vesting time utilities (Unix seconds, UTC).
//! - elapsed = now - start, clamped at zero (a clock behind the start vests nothing)
//! - a schedule ends at start + duration, inclusive

use crate::error::SaleError;

/// Seconds per day (UTC).
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Seconds elapsed since `start_ts`; zero when `now_ts` is earlier.
pub fn elapsed_since(now_ts: i64, start_ts: i64) -> u64 {
    if now_ts <= start_ts {
        return 0;
    }
    (now_ts as i128 - start_ts as i128) as u64
}

/// Timestamp at which a schedule of `duration` seconds is fully vested.
pub fn end_ts(start_ts: i64, duration: i64) -> Result<i64, SaleError> {
    if duration < 0 {
        return Err(SaleError::InvalidConfiguration);
    }
    start_ts
        .checked_add(duration)
        .ok_or(SaleError::MathOverflow)
}

/// True if `now_ts` is at or after the end of the schedule.
pub fn is_after_end(now_ts: i64, start_ts: i64, duration: i64) -> Result<bool, SaleError> {
    Ok(now_ts >= end_ts(start_ts, duration)?)
}
