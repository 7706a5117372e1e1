use crate::shared::entity::{Entity, ID};
use chrono::{DateTime, Utc};

/// A one-shot push queued for a fixed UTC instant. Sending is
/// fire-and-forget: the row is marked sent whether or not every token
/// delivery succeeded, so one send attempt happens per row, ever.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledPush {
    pub id: ID,
    pub account_id: ID,
    pub title: String,
    pub body: String,
    pub send_at: DateTime<Utc>,
    pub sent: bool,
    pub sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl ScheduledPush {
    pub fn new(
        account_id: ID,
        title: String,
        body: String,
        send_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Default::default(),
            account_id,
            title,
            body,
            send_at,
            sent: false,
            sent_at: None,
            created_at: now,
        }
    }

    pub fn due(&self, now: DateTime<Utc>) -> bool {
        !self.sent && self.send_at <= now
    }

    pub fn mark_sent(&mut self, now: DateTime<Utc>) {
        self.sent = true;
        self.sent_at = Some(now);
    }
}

impl Entity for ScheduledPush {
    fn id(&self) -> &ID {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(s: &str) -> DateTime<Utc> {
        s.parse().expect("Valid RFC3339 timestamp")
    }

    #[test]
    fn due_requires_unsent_and_past_send_at() {
        let mut push = ScheduledPush::new(
            ID::new(),
            "t".into(),
            "b".into(),
            utc("2025-01-01T10:00:00Z"),
            utc("2025-01-01T09:00:00Z"),
        );
        assert!(!push.due(utc("2025-01-01T09:30:00Z")));
        assert!(push.due(utc("2025-01-01T10:00:00Z")));

        push.mark_sent(utc("2025-01-01T10:00:05Z"));
        assert!(!push.due(utc("2025-01-01T11:00:00Z")));
        assert_eq!(push.sent_at, Some(utc("2025-01-01T10:00:05Z")));
    }
}
