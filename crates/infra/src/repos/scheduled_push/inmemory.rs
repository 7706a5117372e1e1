use super::IScheduledPushRepo;
use crate::repos::shared::inmemory_repo::*;
use carelink_domain::{ScheduledPush, ID};
use chrono::{DateTime, Utc};

pub struct InMemoryScheduledPushRepo {
    pushes: std::sync::Mutex<Vec<ScheduledPush>>,
}

impl InMemoryScheduledPushRepo {
    pub fn new() -> Self {
        Self {
            pushes: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IScheduledPushRepo for InMemoryScheduledPushRepo {
    async fn insert(&self, push: &ScheduledPush) -> anyhow::Result<()> {
        insert(push, &self.pushes);
        Ok(())
    }

    async fn save(&self, push: &ScheduledPush) -> anyhow::Result<()> {
        save(push, &self.pushes);
        Ok(())
    }

    async fn find(&self, push_id: &ID) -> Option<ScheduledPush> {
        find(push_id, &self.pushes)
    }

    async fn find_by_account(&self, account_id: &ID) -> Vec<ScheduledPush> {
        let mut pushes = find_by(&self.pushes, |p| p.account_id == *account_id);
        pushes.sort_by_key(|p| p.send_at);
        pushes
    }

    async fn find_due(&self, before: DateTime<Utc>) -> Vec<ScheduledPush> {
        let mut due = find_by(&self.pushes, |p| !p.sent && p.send_at <= before);
        due.sort_by_key(|p| p.send_at);
        due
    }
}
