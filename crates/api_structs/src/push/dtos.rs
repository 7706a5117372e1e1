use carelink_domain::{ScheduledPush, ID};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledPushDTO {
    pub id: ID,
    pub title: String,
    pub body: String,
    pub send_at: DateTime<Utc>,
    pub sent: bool,
    pub sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl ScheduledPushDTO {
    pub fn new(push: ScheduledPush) -> Self {
        Self {
            id: push.id,
            title: push.title,
            body: push.body,
            send_at: push.send_at,
            sent: push.sent,
            sent_at: push.sent_at,
            created_at: push.created_at,
        }
    }
}
