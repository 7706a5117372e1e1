use crate::dtos::ReminderDTO;
use carelink_domain::{Reminder, ID};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderResponse {
    pub reminder: ReminderDTO,
}

impl ReminderResponse {
    pub fn new(reminder: Reminder) -> Self {
        Self {
            reminder: ReminderDTO::new(reminder),
        }
    }
}

pub mod create_reminder {
    use super::*;

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub title: String,
        pub body: String,
        pub hour: u32,
        pub minute: u32,
        pub timezone: String,
        pub active: Option<bool>,
        pub grace_minutes: Option<i64>,
    }

    pub type APIResponse = ReminderResponse;
}

pub mod get_reminder {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub reminder_id: ID,
    }

    pub type APIResponse = ReminderResponse;
}

pub mod list_reminders {
    use super::*;

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub reminders: Vec<ReminderDTO>,
    }

    impl APIResponse {
        pub fn new(reminders: Vec<Reminder>) -> Self {
            Self {
                reminders: reminders.into_iter().map(ReminderDTO::new).collect(),
            }
        }
    }
}

pub mod update_reminder {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub reminder_id: ID,
    }

    #[derive(Serialize, Deserialize, Default)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub title: Option<String>,
        pub body: Option<String>,
        pub hour: Option<u32>,
        pub minute: Option<u32>,
        pub timezone: Option<String>,
        pub active: Option<bool>,
        pub grace_minutes: Option<i64>,
    }

    pub type APIResponse = ReminderResponse;
}

pub mod delete_reminder {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub reminder_id: ID,
    }

    pub type APIResponse = ReminderResponse;
}

pub mod sync_reminders {
    use super::*;

    #[derive(Debug, Serialize, Deserialize, Clone)]
    #[serde(rename_all = "camelCase")]
    pub struct SyncReminderItem {
        /// Server id when the client has seen this reminder before.
        pub id: Option<ID>,
        pub title: String,
        pub body: String,
        pub hour: u32,
        pub minute: u32,
        pub timezone: String,
        pub active: bool,
        pub grace_minutes: Option<i64>,
    }

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub items: Vec<SyncReminderItem>,
        /// Deactivate reminders missing from the snapshot. Defaults to true;
        /// best-effort uploads send false to avoid accidental data loss.
        pub prune_missing: Option<bool>,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub created: usize,
        pub updated: usize,
        pub deactivated: usize,
        pub total_active: usize,
        pub synced: Vec<ReminderDTO>,
    }
}

pub mod ack_reminder {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub reminder_id: ID,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub acknowledged: bool,
        pub local_date: NaiveDate,
        pub reminder: ReminderDTO,
    }
}

pub mod reschedule_all_reminders {
    use super::*;

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub updated: usize,
    }
}

pub mod reminders_debug {
    use super::*;

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct QueryParams {
        pub limit: Option<usize>,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct DebugEntry {
        pub reminder: ReminderDTO,
        pub due: bool,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub now: DateTime<Utc>,
        pub entries: Vec<DebugEntry>,
    }
}

pub mod reminders_health {
    use super::*;

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub scheduler_enabled: bool,
        pub server_only: bool,
        pub dispatch_interval_secs: u64,
        pub last_pass_started_at: Option<DateTime<Utc>>,
        pub last_pass_finished_at: Option<DateTime<Utc>>,
        pub passes: u64,
    }
}
