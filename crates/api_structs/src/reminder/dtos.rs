use carelink_domain::{DeliveryStatus, Reminder};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ReminderDTO {
    pub id: carelink_domain::ID,
    pub title: String,
    pub body: String,
    pub hour: u32,
    pub minute: u32,
    pub timezone: String,
    pub active: bool,
    pub grace_minutes: i64,
    pub next_fire_local: NaiveDateTime,
    pub next_fire_utc: DateTime<Utc>,
    pub last_sent_utc: Option<DateTime<Utc>>,
    pub last_ack_local_date: Option<NaiveDate>,
    pub attempts_today: u32,
    pub last_delivery_status: Option<DeliveryStatus>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReminderDTO {
    pub fn new(reminder: Reminder) -> Self {
        Self {
            id: reminder.id,
            title: reminder.title,
            body: reminder.body,
            hour: reminder.hour,
            minute: reminder.minute,
            timezone: reminder.timezone,
            active: reminder.active,
            grace_minutes: reminder.grace_minutes,
            next_fire_local: reminder.next_fire_local,
            next_fire_utc: reminder.next_fire_utc,
            last_sent_utc: reminder.last_sent_utc,
            last_ack_local_date: reminder.last_ack_local_date,
            attempts_today: reminder.attempts_today,
            last_delivery_status: reminder.last_delivery_status,
            created_at: reminder.created_at,
            updated_at: reminder.updated_at,
        }
    }
}
