use carelink_domain::{DeviceToken, ID};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DeviceTokenDTO {
    pub id: ID,
    pub platform: String,
    pub token: String,
    pub local_reminders_enabled: bool,
    pub active: bool,
    pub deactivated_at: Option<DateTime<Utc>>,
    pub deactivated_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DeviceTokenDTO {
    pub fn new(device: DeviceToken) -> Self {
        Self {
            id: device.id,
            platform: device.platform,
            token: device.token,
            local_reminders_enabled: device.local_reminders_enabled,
            active: device.active,
            deactivated_at: device.deactivated_at,
            deactivated_reason: device.deactivated_reason,
            created_at: device.created_at,
            updated_at: device.updated_at,
        }
    }
}
