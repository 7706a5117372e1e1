mod account;
mod device_token;
mod episode;
mod reminder;
mod scheduled_push;
mod shared;
mod treatment_data;

use account::InMemoryAccountRepo;
use device_token::InMemoryDeviceTokenRepo;
use episode::InMemoryEpisodeRepo;
use reminder::InMemoryReminderRepo;
use scheduled_push::InMemoryScheduledPushRepo;
use std::sync::Arc;
use treatment_data::InMemoryTreatmentDataRepo;

pub use account::IAccountRepo;
pub use device_token::{DeviceUpsert, IDeviceTokenRepo};
pub use episode::IEpisodeRepo;
pub use reminder::IReminderRepo;
pub use scheduled_push::IScheduledPushRepo;
pub use shared::repo::DeleteResult;
pub use treatment_data::{ITreatmentDataRepo, TreatmentRecord};

#[derive(Clone)]
pub struct Repos {
    pub accounts: Arc<dyn IAccountRepo>,
    pub reminders: Arc<dyn IReminderRepo>,
    pub scheduled_pushes: Arc<dyn IScheduledPushRepo>,
    pub device_tokens: Arc<dyn IDeviceTokenRepo>,
    pub episodes: Arc<dyn IEpisodeRepo>,
    pub treatment_data: Arc<dyn ITreatmentDataRepo>,
}

impl Repos {
    pub fn create_inmemory() -> Self {
        Self {
            accounts: Arc::new(InMemoryAccountRepo::new()),
            reminders: Arc::new(InMemoryReminderRepo::new()),
            scheduled_pushes: Arc::new(InMemoryScheduledPushRepo::new()),
            device_tokens: Arc::new(InMemoryDeviceTokenRepo::new()),
            episodes: Arc::new(InMemoryEpisodeRepo::new()),
            treatment_data: Arc::new(InMemoryTreatmentDataRepo::new()),
        }
    }
}
