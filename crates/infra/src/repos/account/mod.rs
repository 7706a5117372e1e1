mod inmemory;

use carelink_domain::{Account, ID};
pub use inmemory::InMemoryAccountRepo;

#[async_trait::async_trait]
pub trait IAccountRepo: Send + Sync {
    async fn insert(&self, account: &Account) -> anyhow::Result<()>;
    async fn save(&self, account: &Account) -> anyhow::Result<()>;
    async fn find(&self, account_id: &ID) -> Option<Account>;
    async fn find_by_apikey(&self, api_key: &str) -> Option<Account>;
}
