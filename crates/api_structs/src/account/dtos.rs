use carelink_domain::{Account, ID};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AccountDTO {
    pub id: ID,
    pub name: String,
    pub timezone: String,
    pub department: Option<String>,
    pub doctor: Option<String>,
    pub treatment: Option<String>,
    pub subtype: Option<String>,
    pub procedure_date: Option<NaiveDate>,
    pub procedure_time: Option<NaiveTime>,
    pub procedure_completed: bool,
    pub treatment_ever_completed: bool,
    pub completed_episode_id: Option<ID>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl AccountDTO {
    pub fn new(account: Account) -> Self {
        Self {
            id: account.id,
            name: account.name,
            timezone: account.timezone,
            department: account.department,
            doctor: account.doctor,
            treatment: account.treatment,
            subtype: account.subtype,
            procedure_date: account.procedure_date,
            procedure_time: account.procedure_time,
            procedure_completed: account.procedure_completed,
            treatment_ever_completed: account.treatment_ever_completed,
            completed_episode_id: account.completed_episode_id,
            completed_at: account.completed_at,
            created_at: account.created_at,
        }
    }
}
