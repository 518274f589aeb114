//! Date/time utilities for postbox.

use chrono::Utc;

/// Current time as milliseconds since the Unix epoch.
///
/// Used as the leading, human-readable component of deposited message
/// file names, so a directory listing sorts roughly chronologically.
pub fn epoch_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Current time formatted per RFC 2822 (e.g. "Fri, 22 Aug 2026 10:30:00 +0000").
///
/// Used for message internal dates and for the Date / Received headers of
/// locally composed messages.
pub fn rfc2822_now() -> String {
    Utc::now().to_rfc2822()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_millis_is_current() {
        let before = Utc::now().timestamp_millis();
        let millis = epoch_millis();
        let after = Utc::now().timestamp_millis();

        assert!(millis >= before);
        assert!(millis <= after);
    }

    #[test]
    fn test_epoch_millis_monotonic_enough() {
        let first = epoch_millis();
        let second = epoch_millis();
        assert!(second >= first);
    }

    #[test]
    fn test_rfc2822_now_shape() {
        let formatted = rfc2822_now();

        // "Fri, 22 Aug 2026 10:30:00 +0000"
        assert!(formatted.contains(','));
        assert!(formatted.ends_with("+0000"));
        assert_eq!(formatted.matches(':').count(), 2);
    }
}
