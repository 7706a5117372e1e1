//! Wall-clock scheduling across time zones.
//!
//! Reminders are a daily wall-clock rule (`hour:minute` in an IANA zone).
//! All calendar arithmetic here happens in local time so that DST
//! transitions are absorbed by the timezone library instead of naive UTC
//! offsets.

use chrono::{
    DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
};
use chrono_tz::Tz;

/// The next scheduled occurrence, cached in both representations.
/// `utc` is the authoritative comparison key for "is this due".
#[derive(Debug, Clone, PartialEq)]
pub struct NextFire {
    pub local: NaiveDateTime,
    pub utc: DateTime<Utc>,
}

/// Resolves an IANA timezone name, degrading to UTC when it cannot be
/// parsed. Reminders must keep firing even with a malformed tz string, so
/// this never fails; the bool tells the caller a fallback happened so it
/// can be logged.
pub fn parse_timezone(tz_name: &str) -> (Tz, bool) {
    match tz_name.parse::<Tz>() {
        Ok(tz) => (tz, false),
        Err(_) => (Tz::UTC, true),
    }
}

pub fn local_now(now_utc: DateTime<Utc>, tz_name: &str) -> DateTime<Tz> {
    let (tz, _) = parse_timezone(tz_name);
    now_utc.with_timezone(&tz)
}

/// Today's calendar date in the given zone. Acknowledgements are scoped to
/// one local calendar date, computed in the reminder's own timezone.
pub fn local_date(now_utc: DateTime<Utc>, tz_name: &str) -> NaiveDate {
    local_now(now_utc, tz_name).date_naive()
}

/// Computes the next future occurrence of `hour:minute` in `tz_name`.
///
/// The candidate is built at today's local date. If it is at or before the
/// current local time, it advances one calendar day in local time. The
/// returned `utc` is strictly greater than `now_utc`.
pub fn compute_next_fire(now_utc: DateTime<Utc>, hour: u32, minute: u32, tz_name: &str) -> NextFire {
    let (tz, _) = parse_timezone(tz_name);
    let now_local = now_utc.with_timezone(&tz);
    let time = NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN);

    let mut candidate = NaiveDateTime::new(now_local.date_naive(), time);
    if candidate <= now_local.naive_local() {
        candidate += Duration::days(1);
    }
    let mut resolved = resolve_local(&tz, candidate);
    while resolved.with_timezone(&Utc) <= now_utc {
        candidate += Duration::days(1);
        resolved = resolve_local(&tz, candidate);
    }

    NextFire {
        local: resolved.naive_local(),
        utc: resolved.with_timezone(&Utc),
    }
}

/// Converts a UTC instant into the `NextFire` pair without any rule logic.
/// Used for near-term retries where the fire time is "now + backoff".
pub fn as_fire_at(at_utc: DateTime<Utc>, tz_name: &str) -> NextFire {
    let (tz, _) = parse_timezone(tz_name);
    NextFire {
        local: at_utc.with_timezone(&tz).naive_local(),
        utc: at_utc,
    }
}

/// Resolves a naive local datetime in `tz`. A wall-clock time skipped by a
/// spring-forward transition slides forward to the first valid instant; an
/// ambiguous (fall-back) time takes the earliest of the two instants.
fn resolve_local(tz: &Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            let mut shifted = naive;
            // DST gaps are at most a few hours wide.
            for _ in 0..8 {
                shifted += Duration::minutes(30);
                match tz.from_local_datetime(&shifted) {
                    LocalResult::Single(dt) => return dt,
                    LocalResult::Ambiguous(earliest, _) => return earliest,
                    LocalResult::None => continue,
                }
            }
            Utc.from_utc_datetime(&naive).with_timezone(tz)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn utc(s: &str) -> DateTime<Utc> {
        s.parse().expect("Valid RFC3339 timestamp")
    }

    #[test]
    fn next_fire_is_always_in_the_future() {
        let cases = [
            ("2025-01-01T00:00:00Z", 9, 0, "Asia/Kolkata"),
            ("2025-01-01T09:00:00Z", 9, 0, "Asia/Kolkata"),
            ("2025-06-15T23:59:00Z", 0, 0, "UTC"),
            ("2025-03-09T06:59:00Z", 2, 30, "America/New_York"),
            ("2025-11-02T05:30:00Z", 1, 30, "America/New_York"),
            ("2024-12-31T18:30:00Z", 0, 0, "Pacific/Auckland"),
        ];
        for (now, hour, minute, tz) in cases {
            let now = utc(now);
            let next = compute_next_fire(now, hour, minute, tz);
            assert!(next.utc > now, "not in future for {:?}", (now, hour, minute, tz));
        }
    }

    #[test]
    fn next_fire_local_matches_requested_wall_clock() {
        let next = compute_next_fire(utc("2025-05-20T10:00:00Z"), 7, 45, "Europe/Oslo");
        assert_eq!(next.local.time().hour(), 7);
        assert_eq!(next.local.time().minute(), 45);
        assert_eq!(next.local.time().second(), 0);
    }

    #[test]
    fn kolkata_morning_reminder_resolves_to_half_hour_offset_utc() {
        let next = compute_next_fire(utc("2025-01-01T00:00:00Z"), 9, 0, "Asia/Kolkata");
        assert_eq!(next.local, utc("2025-01-01T09:00:00Z").naive_utc());
        assert_eq!(next.utc, utc("2025-01-01T03:30:00Z"));
    }

    #[test]
    fn same_day_candidate_in_the_past_advances_one_day() {
        // 09:00 IST is 03:30Z; at 04:00Z the slot already passed.
        let next = compute_next_fire(utc("2025-01-01T04:00:00Z"), 9, 0, "Asia/Kolkata");
        assert_eq!(next.utc, utc("2025-01-02T03:30:00Z"));
    }

    #[test]
    fn spring_forward_gap_resolves_to_a_single_instant() {
        // America/New_York skips 02:00-03:00 local on 2025-03-09.
        let now = utc("2025-03-09T06:00:00Z"); // 01:00 EST
        let next = compute_next_fire(now, 2, 30, "America/New_York");
        assert!(next.utc > now);
        // Slid forward past the gap onto 03:00 EDT.
        assert_eq!(next.utc, utc("2025-03-09T07:00:00Z"));
    }

    #[test]
    fn fall_back_ambiguity_takes_the_earliest_instant() {
        // 01:30 local happens twice on 2025-11-02 in America/New_York.
        let now = utc("2025-11-02T04:00:00Z"); // 00:00 EDT
        let next = compute_next_fire(now, 1, 30, "America/New_York");
        // Earliest occurrence is still EDT (UTC-4).
        assert_eq!(next.utc, utc("2025-11-02T05:30:00Z"));
    }

    #[test]
    fn unknown_timezone_degrades_to_utc() {
        let (tz, fallback) = parse_timezone("Not/AZone");
        assert_eq!(tz, Tz::UTC);
        assert!(fallback);

        let next = compute_next_fire(utc("2025-01-01T00:00:00Z"), 9, 0, "Not/AZone");
        assert_eq!(next.utc, utc("2025-01-01T09:00:00Z"));
    }

    #[test]
    fn local_date_respects_timezone_boundaries() {
        // 23:30Z on Jan 1 is already Jan 2 in Kolkata.
        assert_eq!(
            local_date(utc("2025-01-01T23:30:00Z"), "Asia/Kolkata"),
            NaiveDate::from_ymd_opt(2025, 1, 2).expect("valid date")
        );
        assert_eq!(
            local_date(utc("2025-01-01T23:30:00Z"), "UTC"),
            NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date")
        );
    }
}
