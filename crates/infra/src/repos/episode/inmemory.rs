use super::IEpisodeRepo;
use crate::repos::shared::inmemory_repo::*;
use crate::repos::shared::repo::DeleteResult;
use carelink_domain::{TreatmentEpisode, ID};

pub struct InMemoryEpisodeRepo {
    episodes: std::sync::Mutex<Vec<TreatmentEpisode>>,
}

impl InMemoryEpisodeRepo {
    pub fn new() -> Self {
        Self {
            episodes: std::sync::Mutex::new(Vec::new()),
        }
    }
}

fn newest_first(mut episodes: Vec<TreatmentEpisode>) -> Vec<TreatmentEpisode> {
    episodes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    episodes
}

#[async_trait::async_trait]
impl IEpisodeRepo for InMemoryEpisodeRepo {
    async fn insert(&self, episode: &TreatmentEpisode) -> anyhow::Result<()> {
        insert(episode, &self.episodes);
        Ok(())
    }

    async fn save(&self, episode: &TreatmentEpisode) -> anyhow::Result<()> {
        save(episode, &self.episodes);
        Ok(())
    }

    async fn find(&self, episode_id: &ID) -> Option<TreatmentEpisode> {
        find(episode_id, &self.episodes)
    }

    async fn find_by_account(&self, account_id: &ID) -> Vec<TreatmentEpisode> {
        newest_first(find_by(&self.episodes, |e| e.account_id == *account_id))
    }

    async fn find_open_by_account(&self, account_id: &ID) -> Vec<TreatmentEpisode> {
        newest_first(find_by(&self.episodes, |e| {
            e.account_id == *account_id && !e.locked
        }))
    }

    async fn delete_open_by_account(&self, account_id: &ID) -> DeleteResult {
        delete_by(&self.episodes, |e| e.account_id == *account_id && !e.locked)
    }
}
