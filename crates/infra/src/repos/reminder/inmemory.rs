use super::IReminderRepo;
use crate::repos::shared::inmemory_repo::*;
use carelink_domain::{Reminder, ID};
use chrono::{DateTime, Utc};

pub struct InMemoryReminderRepo {
    reminders: std::sync::Mutex<Vec<Reminder>>,
}

impl InMemoryReminderRepo {
    pub fn new() -> Self {
        Self {
            reminders: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IReminderRepo for InMemoryReminderRepo {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()> {
        insert(reminder, &self.reminders);
        Ok(())
    }

    async fn save(&self, reminder: &Reminder) -> anyhow::Result<()> {
        save(reminder, &self.reminders);
        Ok(())
    }

    async fn find(&self, reminder_id: &ID) -> Option<Reminder> {
        find(reminder_id, &self.reminders)
    }

    async fn find_by_account(&self, account_id: &ID) -> Vec<Reminder> {
        let mut reminders = find_by(&self.reminders, |r| r.account_id == *account_id);
        reminders.sort_by_key(|r| r.next_fire_utc);
        reminders
    }

    async fn find_due(&self, before: DateTime<Utc>) -> Vec<Reminder> {
        let mut due = find_by(&self.reminders, |r| r.active && r.next_fire_utc <= before);
        due.sort_by_key(|r| r.next_fire_utc);
        due
    }

    async fn delete(&self, reminder_id: &ID) -> Option<Reminder> {
        delete(reminder_id, &self.reminders)
    }
}
