use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the unix epoch, or zero if the clock is before it.
#[inline]
pub fn get_current_time_or_zero() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
