use super::{ITreatmentDataRepo, TreatmentRecord};
use crate::repos::shared::inmemory_repo::*;
use crate::repos::shared::repo::DeleteResult;
use carelink_domain::ID;
use chrono::NaiveDate;

pub struct InMemoryTreatmentDataRepo {
    records: std::sync::Mutex<Vec<TreatmentRecord>>,
}

impl InMemoryTreatmentDataRepo {
    pub fn new() -> Self {
        Self {
            records: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl ITreatmentDataRepo for InMemoryTreatmentDataRepo {
    async fn insert(&self, record: &TreatmentRecord) -> anyhow::Result<()> {
        insert(record, &self.records);
        Ok(())
    }

    async fn find_by_account(&self, account_id: &ID) -> Vec<TreatmentRecord> {
        find_by(&self.records, |r| r.account_id == *account_id)
    }

    async fn purge_on_or_after(&self, account_id: &ID, cutoff: NaiveDate) -> DeleteResult {
        delete_by(&self.records, |r| {
            r.account_id == *account_id && r.date >= cutoff
        })
    }
}
