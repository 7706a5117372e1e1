mod inmemory;

use crate::repos::shared::repo::DeleteResult;
use carelink_domain::{TreatmentEpisode, ID};
pub use inmemory::InMemoryEpisodeRepo;

#[async_trait::async_trait]
pub trait IEpisodeRepo: Send + Sync {
    async fn insert(&self, episode: &TreatmentEpisode) -> anyhow::Result<()>;
    async fn save(&self, episode: &TreatmentEpisode) -> anyhow::Result<()>;
    async fn find(&self, episode_id: &ID) -> Option<TreatmentEpisode>;
    /// Full history, newest first.
    async fn find_by_account(&self, account_id: &ID) -> Vec<TreatmentEpisode>;
    /// Unlocked episodes, newest first. Correct operation keeps this at one
    /// element; callers self-heal when it is not.
    async fn find_open_by_account(&self, account_id: &ID) -> Vec<TreatmentEpisode>;
    /// Replace-treatment: drop every unlocked episode the account holds.
    async fn delete_open_by_account(&self, account_id: &ID) -> DeleteResult;
}

#[cfg(test)]
mod tests {
    use crate::setup_context;
    use carelink_domain::{TreatmentEpisode, ID};
    use chrono::{DateTime, Utc};

    fn utc(s: &str) -> DateTime<Utc> {
        s.parse().expect("Valid RFC3339 timestamp")
    }

    #[tokio::test]
    async fn open_lookup_excludes_locked_and_sorts_newest_first() {
        let ctx = setup_context();
        let account_id = ID::new();

        let mut locked = TreatmentEpisode::new(account_id.clone(), utc("2025-01-01T00:00:00Z"));
        locked.lock();
        let older = TreatmentEpisode::new(account_id.clone(), utc("2025-02-01T00:00:00Z"));
        let newer = TreatmentEpisode::new(account_id.clone(), utc("2025-03-01T00:00:00Z"));
        for e in [&locked, &older, &newer] {
            ctx.repos.episodes.insert(e).await.unwrap();
        }

        let open = ctx.repos.episodes.find_open_by_account(&account_id).await;
        assert_eq!(open.len(), 2);
        assert_eq!(open[0].id, newer.id);
        assert_eq!(open[1].id, older.id);

        let all = ctx.repos.episodes.find_by_account(&account_id).await;
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn delete_open_leaves_locked_history_untouched() {
        let ctx = setup_context();
        let account_id = ID::new();
        let mut locked = TreatmentEpisode::new(account_id.clone(), utc("2025-01-01T00:00:00Z"));
        locked.lock();
        let open = TreatmentEpisode::new(account_id.clone(), utc("2025-02-01T00:00:00Z"));
        ctx.repos.episodes.insert(&locked).await.unwrap();
        ctx.repos.episodes.insert(&open).await.unwrap();

        let res = ctx.repos.episodes.delete_open_by_account(&account_id).await;
        assert_eq!(res.deleted_count, 1);
        let all = ctx.repos.episodes.find_by_account(&account_id).await;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, locked.id);
    }
}
