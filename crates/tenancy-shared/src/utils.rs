//! Utility functions

use chrono::{DateTime, SubsecRound, Utc};

/// Current UTC time, truncated to microseconds so values survive a
/// Postgres `timestamptz` round trip unchanged.
pub fn utc_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn utc_now_is_microsecond_precision() {
        let now = utc_now();
        assert_eq!(now.nanosecond() % 1_000, 0);
    }
}
