// Expiration Evaluator - decide whether a certificate is due for notification
//
// Pure calendar arithmetic: no clock access, no side effects. The caller
// supplies "now" so runs are deterministic and testable.

use chrono::{DateTime, Days, Utc};

/// A certificate's expiration instant, as far as it could be determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertificateExpiration {
    /// Fetch or parse failed; reported separately as a fetch failure
    Unknown,
    /// The certificate's notAfter instant
    KnownAt(DateTime<Utc>),
}

impl CertificateExpiration {
    /// Whether a notification should fire for this expiration at `now`,
    /// given a warning window in days. `Unknown` never notifies on its own.
    pub fn due_for_notification(&self, now: DateTime<Utc>, window_days: u32) -> bool {
        match self {
            CertificateExpiration::Unknown => false,
            CertificateExpiration::KnownAt(not_after) => {
                should_notify(*not_after, now, window_days)
            }
        }
    }
}

/// Returns true iff `now` falls on or after `notAfter − window_days`.
///
/// The subtraction is calendar-day based and the comparison works on whole
/// days: hour and minute components are not significant at the boundary, so
/// a certificate expiring at 23:59 on the threshold day still notifies from
/// 00:00 of that day. The boundary itself is inclusive, and a window of 0
/// means "notify once the certificate expires today or has already expired".
pub fn should_notify(not_after: DateTime<Utc>, now: DateTime<Utc>, window_days: u32) -> bool {
    let threshold = match not_after
        .date_naive()
        .checked_sub_days(Days::new(u64::from(window_days)))
    {
        Some(date) => date,
        // Window reaches past the representable calendar; certainly due
        None => return true,
    };

    now.date_naive() >= threshold
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_boundary_is_inclusive() {
        // now == notAfter - window exactly
        let not_after = utc(2024, 3, 11);
        let now = utc(2024, 3, 1);
        assert!(should_notify(not_after, now, 10));
    }

    #[test]
    fn test_expiry_within_window_notifies() {
        // threshold 2024-02-29 (leap year), now is past it
        let not_after = utc(2024, 3, 10);
        let now = utc(2024, 3, 1);
        assert!(should_notify(not_after, now, 10));
    }

    #[test]
    fn test_expiry_outside_window_is_quiet() {
        // threshold 2024-05-22, now well before it
        let not_after = utc(2024, 6, 1);
        let now = utc(2024, 3, 1);
        assert!(!should_notify(not_after, now, 10));
    }

    #[test]
    fn test_one_day_outside_window_is_quiet() {
        let not_after = utc(2024, 3, 12);
        let now = utc(2024, 3, 1);
        assert!(!should_notify(not_after, now, 10));
    }

    #[test]
    fn test_zero_window_only_fires_on_expiry_day() {
        let not_after = utc(2024, 3, 10);
        assert!(!should_notify(not_after, utc(2024, 3, 9), 0));
        assert!(should_notify(not_after, utc(2024, 3, 10), 0));
        assert!(should_notify(not_after, utc(2024, 3, 11), 0));
    }

    #[test]
    fn test_already_expired_notifies() {
        let not_after = utc(2023, 1, 1);
        let now = utc(2024, 3, 1);
        assert!(should_notify(not_after, now, 10));
    }

    #[test]
    fn test_time_of_day_is_not_significant() {
        // Certificate expires late on the threshold day; early-morning "now"
        // on the same calendar day still counts as due.
        let not_after = Utc.with_ymd_and_hms(2024, 3, 11, 23, 59, 59).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 1).unwrap();
        assert!(should_notify(not_after, now, 10));
    }

    #[test]
    fn test_unknown_expiration_never_notifies() {
        let exp = CertificateExpiration::Unknown;
        assert!(!exp.due_for_notification(utc(2024, 3, 1), 0));
        assert!(!exp.due_for_notification(utc(2024, 3, 1), 10_000));
    }

    #[test]
    fn test_known_expiration_delegates() {
        let exp = CertificateExpiration::KnownAt(utc(2024, 3, 10));
        assert!(exp.due_for_notification(utc(2024, 3, 1), 10));
        assert!(!exp.due_for_notification(utc(2024, 3, 1), 5));
    }

    #[test]
    fn test_window_crossing_month_boundary() {
        // 2024-03-05 minus 10 days lands in February of a leap year
        let not_after = utc(2024, 3, 5);
        assert!(should_notify(not_after, utc(2024, 2, 24), 10));
        assert!(!should_notify(not_after, utc(2024, 2, 23), 10));
    }

    #[test]
    fn test_evaluator_is_deterministic() {
        let not_after = utc(2024, 3, 10);
        let now = utc(2024, 3, 1);
        let first = should_notify(not_after, now, 10);
        let second = should_notify(not_after, now, 10);
        assert_eq!(first, second);
    }
}
