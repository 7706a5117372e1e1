mod inmemory;

use crate::repos::shared::repo::DeleteResult;
use carelink_domain::{Entity, ID};
use chrono::{DateTime, NaiveDate, Utc};
pub use inmemory::InMemoryTreatmentDataRepo;

/// A dated per-account treatment record (progress note, instruction status).
/// The wider CRUD surface around these lives outside this service; only the
/// purge contract of replace-treatment touches them here.
#[derive(Debug, Clone, PartialEq)]
pub struct TreatmentRecord {
    pub id: ID,
    pub account_id: ID,
    pub date: NaiveDate,
    pub note: String,
    pub created_at: DateTime<Utc>,
}

impl TreatmentRecord {
    pub fn new(account_id: ID, date: NaiveDate, note: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Default::default(),
            account_id,
            date,
            note,
            created_at: now,
        }
    }
}

impl Entity for TreatmentRecord {
    fn id(&self) -> &ID {
        &self.id
    }
}

#[async_trait::async_trait]
pub trait ITreatmentDataRepo: Send + Sync {
    async fn insert(&self, record: &TreatmentRecord) -> anyhow::Result<()>;
    async fn find_by_account(&self, account_id: &ID) -> Vec<TreatmentRecord>;
    /// Replace-treatment scope rule: drop records dated on or after the
    /// cutoff, leave everything earlier alone.
    async fn purge_on_or_after(&self, account_id: &ID, cutoff: NaiveDate) -> DeleteResult;
}
