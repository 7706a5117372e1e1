use crate::shared::entity::{Entity, ID};
use chrono::{DateTime, Utc};

/// An account's push endpoint. `token` is unique across all accounts;
/// registering a token already owned elsewhere moves it to the registering
/// account, since a physical device can only deliver to its current holder.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceToken {
    pub id: ID,
    pub account_id: ID,
    /// e.g. "android", "ios"
    pub platform: String,
    pub token: String,
    /// Device self-schedules local notifications; the dispatch loop skips it
    /// for server-side reminder sends outside server-only mode.
    pub local_reminders_enabled: bool,
    pub active: bool,
    pub deactivated_at: Option<DateTime<Utc>>,
    pub deactivated_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DeviceToken {
    pub fn new(
        account_id: ID,
        platform: String,
        token: String,
        local_reminders_enabled: bool,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Default::default(),
            account_id,
            platform,
            token,
            local_reminders_enabled,
            active: true,
            deactivated_at: None,
            deactivated_reason: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Re-registration of an existing token: move it to the registering
    /// account, reactivate, clear any deactivation record. Keeps id and
    /// created_at.
    pub fn reassign(
        &mut self,
        account_id: ID,
        platform: String,
        local_reminders_enabled: bool,
        now: DateTime<Utc>,
    ) {
        self.account_id = account_id;
        self.platform = platform;
        self.local_reminders_enabled = local_reminders_enabled;
        self.active = true;
        self.deactivated_at = None;
        self.deactivated_reason = None;
        self.updated_at = now;
    }

    /// Idempotent: a token already deactivated keeps its original reason
    /// and timestamp.
    pub fn deactivate(&mut self, reason: &str, now: DateTime<Utc>) {
        if !self.active {
            return;
        }
        self.active = false;
        self.deactivated_at = Some(now);
        self.deactivated_reason = Some(reason.to_string());
        self.updated_at = now;
    }
}

impl Entity for DeviceToken {
    fn id(&self) -> &ID {
        &self.id
    }
}
