use crate::shared::entity::{Entity, ID};
use crate::timing::{self, NextFire};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of the most recent delivery attempt for a `Reminder`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Delivered,
    Retry,
    TokenInvalid,
    FailedPermanent,
    NoTokens,
}

/// Bounded-retry policy scoped to a single calendar day. `backoff_seconds`
/// is indexed by the attempt count and capped at its last value.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts_per_day: u32,
    pub backoff_seconds: Vec<u64>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts_per_day: 3,
            backoff_seconds: vec![120, 300, 600],
        }
    }
}

impl RetryPolicy {
    pub fn delay_for_attempt(&self, attempts_so_far: u32) -> u64 {
        if self.backoff_seconds.is_empty() {
            return 0;
        }
        let idx = (attempts_so_far as usize).min(self.backoff_seconds.len() - 1);
        self.backoff_seconds[idx]
    }

    pub fn exhausted_after(&self, attempts_so_far: u32) -> bool {
        attempts_so_far + 1 >= self.max_attempts_per_day
    }
}

/// A recurring daily notification owned by one `Account`. The server push
/// is a fallback behind client-local notifications: the grace window and
/// the per-day acknowledgement give the device a head start.
#[derive(Debug, Clone, PartialEq)]
pub struct Reminder {
    pub id: ID,
    pub account_id: ID,
    pub title: String,
    pub body: String,
    /// 0-23 local hour of day
    pub hour: u32,
    /// 0-59 local minute
    pub minute: u32,
    /// IANA tz name as reported by the device
    pub timezone: String,
    pub active: bool,
    /// Minutes after the scheduled local time before the server fallback
    /// may send.
    pub grace_minutes: i64,
    pub next_fire_local: NaiveDateTime,
    /// Authoritative comparison key for "is this due".
    pub next_fire_utc: DateTime<Utc>,
    pub last_sent_utc: Option<DateTime<Utc>>,
    /// Local calendar date (in the reminder's own timezone) for which an
    /// acknowledgement suppresses the server fallback.
    pub last_ack_local_date: Option<NaiveDate>,
    pub attempts_today: u32,
    pub last_attempt_utc: Option<DateTime<Utc>>,
    pub last_delivery_status: Option<DeliveryStatus>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reminder {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        account_id: ID,
        title: String,
        body: String,
        hour: u32,
        minute: u32,
        timezone: String,
        active: bool,
        grace_minutes: i64,
        now: DateTime<Utc>,
    ) -> Self {
        let next = timing::compute_next_fire(now, hour, minute, &timezone);
        Self {
            id: Default::default(),
            account_id,
            title,
            body,
            hour,
            minute,
            timezone,
            active,
            grace_minutes,
            next_fire_local: next.local,
            next_fire_utc: next.utc,
            last_sent_utc: None,
            last_ack_local_date: None,
            attempts_today: 0,
            last_attempt_utc: None,
            last_delivery_status: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn valid_time(hour: u32, minute: u32) -> bool {
        hour <= 23 && minute <= 59
    }

    fn set_next_fire(&mut self, next: NextFire) {
        self.next_fire_local = next.local;
        self.next_fire_utc = next.utc;
    }

    /// Recomputes both fire fields from `now` and resets the per-day retry
    /// counter. Every path that moves the schedule to a fresh occurrence
    /// goes through here so `attempts_today` can never leak across days.
    pub fn advance_to_next_occurrence(&mut self, now: DateTime<Utc>) {
        let next = timing::compute_next_fire(now, self.hour, self.minute, &self.timezone);
        self.set_next_fire(next);
        self.attempts_today = 0;
        self.updated_at = now;
    }

    /// Records today's acknowledgement (today in the reminder's own
    /// timezone, which matters at timezone boundaries).
    pub fn acknowledge(&mut self, now: DateTime<Utc>) -> NaiveDate {
        let today = timing::local_date(now, &self.timezone);
        self.last_ack_local_date = Some(today);
        self.updated_at = now;
        today
    }

    pub fn acked_today(&self, now: DateTime<Utc>) -> bool {
        self.last_ack_local_date == Some(timing::local_date(now, &self.timezone))
    }

    /// True while the server must hold back to give a client-local
    /// notification time to fire and be acknowledged. Only applies before
    /// the first delivery attempt of the day; retries are never re-graced.
    pub fn within_grace_window(&self, now: DateTime<Utc>) -> bool {
        if self.attempts_today > 0 {
            return false;
        }
        let now_local = timing::local_now(now, &self.timezone).naive_local();
        let scheduled_today = match chrono::NaiveTime::from_hms_opt(self.hour, self.minute, 0) {
            Some(t) => NaiveDateTime::new(now_local.date(), t),
            None => return false,
        };
        if now_local < scheduled_today {
            return false;
        }
        now_local < scheduled_today + Duration::minutes(self.grace_minutes)
    }

    /// Successful delivery: advance to the next occurrence, reset retry
    /// state.
    pub fn record_success(&mut self, now: DateTime<Utc>) {
        self.last_sent_utc = Some(now);
        self.last_attempt_utc = Some(now);
        self.advance_to_next_occurrence(now);
        self.last_delivery_status = Some(DeliveryStatus::Delivered);
    }

    /// Terminal-for-the-day state when the account has no eligible device
    /// token. Nothing to retry against, so skip straight to tomorrow.
    pub fn record_no_tokens(&mut self, now: DateTime<Utc>) {
        self.last_attempt_utc = Some(now);
        self.advance_to_next_occurrence(now);
        self.last_delivery_status = Some(DeliveryStatus::NoTokens);
    }

    /// All eligible sends failed. Either schedules a near-term retry via
    /// the backoff ladder or gives up for today and advances to tomorrow.
    pub fn record_failure(
        &mut self,
        now: DateTime<Utc>,
        any_token_invalid: bool,
        policy: &RetryPolicy,
    ) {
        self.last_attempt_utc = Some(now);
        if policy.exhausted_after(self.attempts_today) {
            self.advance_to_next_occurrence(now);
            self.last_delivery_status = Some(if any_token_invalid {
                DeliveryStatus::TokenInvalid
            } else {
                DeliveryStatus::FailedPermanent
            });
        } else {
            let delay = policy.delay_for_attempt(self.attempts_today);
            let retry_at = now + Duration::seconds(delay as i64);
            self.set_next_fire(timing::as_fire_at(retry_at, &self.timezone));
            self.attempts_today += 1;
            self.updated_at = now;
            self.last_delivery_status = Some(if any_token_invalid {
                DeliveryStatus::TokenInvalid
            } else {
                DeliveryStatus::Retry
            });
        }
    }
}

impl Entity for Reminder {
    fn id(&self) -> &ID {
        &self.id
    }
}
