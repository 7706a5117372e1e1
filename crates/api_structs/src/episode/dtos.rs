use carelink_domain::{TreatmentEpisode, ID};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeDTO {
    pub id: ID,
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

impl EpisodeDTO {
    pub fn new(episode: TreatmentEpisode) -> Self {
        Self {
            id: episode.id,
            department: episode.department,
            doctor: episode.doctor,
            treatment: episode.treatment,
            subtype: episode.subtype,
            procedure_date: episode.procedure_date,
            procedure_time: episode.procedure_time,
            procedure_completed: episode.procedure_completed,
            locked: episode.locked,
            created_at: episode.created_at,
        }
    }
}
