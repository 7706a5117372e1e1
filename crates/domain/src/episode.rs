use crate::shared::entity::{Entity, ID};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// Days after the procedure date before a completed open episode is rotated
/// out automatically.
pub const RECOVERY_WINDOW_DAYS: i64 = 15;

/// One attempt at a treatment course for an `Account`. At most one episode
/// per account is unlocked ("open") at a time; a locked episode is immutable
/// history.
#[derive(Debug, Clone, PartialEq)]
pub struct TreatmentEpisode {
    pub id: ID,
    pub account_id: ID,
    pub department: Option<String>,
    pub doctor: Option<String>,
    pub treatment: Option<String>,
    pub subtype: Option<String>,
    pub procedure_date: Option<NaiveDate>,
    pub procedure_time: Option<NaiveTime>,
    pub procedure_completed: bool,
    pub locked: bool,
    pub created_at: DateTime<Utc>,
}

impl TreatmentEpisode {
    /// A fresh empty open episode, as created on account creation.
    pub fn new(account_id: ID, now: DateTime<Utc>) -> Self {
        Self {
            id: Default::default(),
            account_id,
            department: None,
            doctor: None,
            treatment: None,
            subtype: None,
            procedure_date: None,
            procedure_time: None,
            procedure_completed: false,
            locked: false,
            created_at: now,
        }
    }

    /// The open episode that follows this one after it is locked. Department
    /// and doctor assignment carry over; the treatment fields start blank.
    pub fn successor(&self, now: DateTime<Utc>) -> Self {
        Self {
            id: Default::default(),
            account_id: self.account_id.clone(),
            department: self.department.clone(),
            doctor: self.doctor.clone(),
            treatment: None,
            subtype: None,
            procedure_date: None,
            procedure_time: None,
            procedure_completed: false,
            locked: false,
            created_at: now,
        }
    }

    pub fn is_open(&self) -> bool {
        !self.locked
    }

    /// Marks the procedure complete, defaulting the date/time to `now` when
    /// the caller supplies none.
    pub fn complete(
        &mut self,
        date: Option<NaiveDate>,
        time: Option<NaiveTime>,
        now: DateTime<Utc>,
    ) {
        self.procedure_date = date.or(self.procedure_date).or(Some(now.date_naive()));
        self.procedure_time = time.or(self.procedure_time).or(Some(now.time()));
        self.procedure_completed = true;
    }

    pub fn lock(&mut self) {
        self.locked = true;
    }

    /// True when this open episode is completed and its procedure date lies
    /// at least the recovery window in the past.
    pub fn rotation_due(&self, now: DateTime<Utc>) -> bool {
        if self.locked || !self.procedure_completed {
            return false;
        }
        match self.procedure_date {
            Some(date) => (now.date_naive() - date).num_days() >= RECOVERY_WINDOW_DAYS,
            None => false,
        }
    }
}

impl Entity for TreatmentEpisode {
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
    fn successor_inherits_assignment_but_not_treatment() {
        let mut e = TreatmentEpisode::new(Default::default(), utc("2025-01-01T10:00:00Z"));
        e.department = Some("Cardiology".into());
        e.doctor = Some("Dr. Rao".into());
        e.treatment = Some("Angioplasty".into());
        e.subtype = Some("Elective".into());

        let next = e.successor(utc("2025-01-02T10:00:00Z"));
        assert_eq!(next.department.as_deref(), Some("Cardiology"));
        assert_eq!(next.doctor.as_deref(), Some("Dr. Rao"));
        assert!(next.treatment.is_none());
        assert!(next.subtype.is_none());
        assert!(!next.procedure_completed);
        assert!(next.is_open());
        assert_ne!(next.id, e.id);
    }

    #[test]
    fn complete_defaults_date_and_time_to_now() {
        let now = utc("2025-03-10T14:30:00Z");
        let mut e = TreatmentEpisode::new(Default::default(), utc("2025-03-01T00:00:00Z"));
        e.complete(None, None, now);
        assert!(e.procedure_completed);
        assert_eq!(e.procedure_date, Some(now.date_naive()));
        assert_eq!(e.procedure_time, Some(now.time()));
    }

    #[test]
    fn complete_keeps_explicit_fields() {
        let mut e = TreatmentEpisode::new(Default::default(), utc("2025-03-01T00:00:00Z"));
        let date = NaiveDate::from_ymd_opt(2025, 3, 5).expect("valid date");
        e.complete(Some(date), None, utc("2025-03-10T14:30:00Z"));
        assert_eq!(e.procedure_date, Some(date));
    }

    #[test]
    fn rotation_due_after_recovery_window() {
        let mut e = TreatmentEpisode::new(Default::default(), utc("2025-01-01T00:00:00Z"));
        e.complete(
            NaiveDate::from_ymd_opt(2025, 1, 1),
            None,
            utc("2025-01-01T12:00:00Z"),
        );
        assert!(!e.rotation_due(utc("2025-01-10T00:00:00Z")));
        assert!(e.rotation_due(utc("2025-01-16T00:00:00Z")));
        e.lock();
        assert!(!e.rotation_due(utc("2025-01-16T00:00:00Z")));
    }

    #[test]
    fn incomplete_episode_never_rotates() {
        let e = TreatmentEpisode::new(Default::default(), utc("2025-01-01T00:00:00Z"));
        assert!(!e.rotation_due(utc("2025-06-01T00:00:00Z")));
    }
}
