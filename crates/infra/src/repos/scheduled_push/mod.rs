mod inmemory;

use carelink_domain::{ScheduledPush, ID};
use chrono::{DateTime, Utc};
pub use inmemory::InMemoryScheduledPushRepo;

#[async_trait::async_trait]
pub trait IScheduledPushRepo: Send + Sync {
    async fn insert(&self, push: &ScheduledPush) -> anyhow::Result<()>;
    async fn save(&self, push: &ScheduledPush) -> anyhow::Result<()>;
    async fn find(&self, push_id: &ID) -> Option<ScheduledPush>;
    /// Sorted by send_at ascending.
    async fn find_by_account(&self, account_id: &ID) -> Vec<ScheduledPush>;
    /// Unsent rows with `send_at <= before`, across all accounts.
    async fn find_due(&self, before: DateTime<Utc>) -> Vec<ScheduledPush>;
}
