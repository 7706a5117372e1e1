mod inmemory;

use carelink_domain::{Reminder, ID};
use chrono::{DateTime, Utc};
pub use inmemory::InMemoryReminderRepo;

#[async_trait::async_trait]
pub trait IReminderRepo: Send + Sync {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()>;
    async fn save(&self, reminder: &Reminder) -> anyhow::Result<()>;
    async fn find(&self, reminder_id: &ID) -> Option<Reminder>;
    /// All reminders for the account, sorted by next_fire_utc ascending.
    async fn find_by_account(&self, account_id: &ID) -> Vec<Reminder>;
    /// Active reminders with `next_fire_utc <= before`, across all accounts.
    async fn find_due(&self, before: DateTime<Utc>) -> Vec<Reminder>;
    async fn delete(&self, reminder_id: &ID) -> Option<Reminder>;
}
