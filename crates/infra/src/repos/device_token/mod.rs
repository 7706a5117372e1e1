mod inmemory;

use crate::repos::shared::repo::DeleteResult;
use carelink_domain::{DeviceToken, ID};
use chrono::{DateTime, Utc};
pub use inmemory::InMemoryDeviceTokenRepo;

pub struct DeviceUpsert {
    pub account_id: ID,
    pub platform: String,
    pub token: String,
    pub local_reminders_enabled: bool,
}

#[async_trait::async_trait]
pub trait IDeviceTokenRepo: Send + Sync {
    /// Atomic insert-or-update keyed by the unique `token` column. When the
    /// token already exists (under any account) it is reassigned and
    /// reactivated in place. Concurrent registrations of the same new token
    /// must converge on one row.
    async fn upsert_by_token(
        &self,
        upsert: DeviceUpsert,
        now: DateTime<Utc>,
    ) -> anyhow::Result<DeviceToken>;
    async fn save(&self, device: &DeviceToken) -> anyhow::Result<()>;
    async fn find(&self, device_id: &ID) -> Option<DeviceToken>;
    async fn find_by_token(&self, token: &str) -> Option<DeviceToken>;
    async fn find_by_account(&self, account_id: &ID) -> Vec<DeviceToken>;
    async fn delete(&self, device_id: &ID) -> Option<DeviceToken>;
    /// Single-device mode: drop every other token the account holds.
    async fn delete_others_for_account(&self, account_id: &ID, keep: &ID) -> DeleteResult;
}

#[cfg(test)]
mod tests {
    use super::DeviceUpsert;
    use crate::setup_context;
    use carelink_domain::ID;
    use chrono::Utc;

    fn upsert(account_id: &ID, token: &str) -> DeviceUpsert {
        DeviceUpsert {
            account_id: account_id.clone(),
            platform: "android".into(),
            token: token.into(),
            local_reminders_enabled: false,
        }
    }

    #[tokio::test]
    async fn upsert_reassigns_existing_token_to_new_owner() {
        let ctx = setup_context();
        let now = Utc::now();
        let first = ID::new();
        let second = ID::new();

        let created = ctx
            .repos
            .device_tokens
            .upsert_by_token(upsert(&first, "tok-1"), now)
            .await
            .unwrap();
        let moved = ctx
            .repos
            .device_tokens
            .upsert_by_token(upsert(&second, "tok-1"), now)
            .await
            .unwrap();

        assert_eq!(created.id, moved.id);
        assert_eq!(moved.account_id, second);
        assert!(ctx.repos.device_tokens.find_by_account(&first).await.is_empty());
        assert_eq!(ctx.repos.device_tokens.find_by_account(&second).await.len(), 1);
    }

    #[tokio::test]
    async fn delete_others_keeps_only_the_given_token() {
        let ctx = setup_context();
        let now = Utc::now();
        let account_id = ID::new();
        ctx.repos
            .device_tokens
            .upsert_by_token(upsert(&account_id, "tok-1"), now)
            .await
            .unwrap();
        let keep = ctx
            .repos
            .device_tokens
            .upsert_by_token(upsert(&account_id, "tok-2"), now)
            .await
            .unwrap();

        let res = ctx
            .repos
            .device_tokens
            .delete_others_for_account(&account_id, &keep.id)
            .await;
        assert_eq!(res.deleted_count, 1);
        let remaining = ctx.repos.device_tokens.find_by_account(&account_id).await;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, keep.id);
    }
}
