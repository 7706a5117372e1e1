use crate::episode::TreatmentEpisode;
use crate::shared::entity::{Entity, ID};
use carelink_utils::create_random_secret;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

const API_KEY_LEN: usize = 30;

/// An `Account` owns reminders, scheduled pushes, device tokens and
/// treatment episodes. It also carries a denormalized mirror of its open
/// episode so simple account reads never need an episode join.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: ID,
    pub secret_api_key: String,
    pub name: String,
    pub timezone: String,
    // Mirror of the current open episode.
    pub department: Option<String>,
    pub doctor: Option<String>,
    pub treatment: Option<String>,
    pub subtype: Option<String>,
    pub procedure_date: Option<NaiveDate>,
    pub procedure_time: Option<NaiveTime>,
    pub procedure_completed: bool,
    // Sticky ever-completed markers, kept for reporting without a history
    // scan.
    pub treatment_ever_completed: bool,
    pub completed_episode_id: Option<ID>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn new(name: String, timezone: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Default::default(),
            secret_api_key: format!("sk_{}", create_random_secret(API_KEY_LEN)),
            name,
            timezone,
            department: None,
            doctor: None,
            treatment: None,
            subtype: None,
            procedure_date: None,
            procedure_time: None,
            procedure_completed: false,
            treatment_ever_completed: false,
            completed_episode_id: None,
            completed_at: None,
            created_at: now,
        }
    }

    /// Copies the episode's treatment fields onto the account. Called after
    /// every open-episode mutation.
    pub fn mirror_episode(&mut self, episode: &TreatmentEpisode) {
        self.department = episode.department.clone();
        self.doctor = episode.doctor.clone();
        self.treatment = episode.treatment.clone();
        self.subtype = episode.subtype.clone();
        self.procedure_date = episode.procedure_date;
        self.procedure_time = episode.procedure_time;
        self.procedure_completed = episode.procedure_completed;
    }

    /// Records a completed episode. `treatment_ever_completed` is sticky:
    /// once set it survives rotations and new episodes.
    pub fn record_completion(&mut self, episode_id: ID, now: DateTime<Utc>) {
        self.treatment_ever_completed = true;
        self.completed_episode_id = Some(episode_id);
        self.completed_at = Some(now);
    }

    /// Replace-treatment clears the completed flag so the fresh episode
    /// starts from a clean slate. The sticky marker itself stays.
    pub fn clear_completion_flag(&mut self) {
        self.procedure_completed = false;
        self.completed_episode_id = None;
        self.completed_at = None;
    }
}

impl Entity for Account {
    fn id(&self) -> &ID {
        &self.id
    }
}
