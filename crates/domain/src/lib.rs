mod account;
mod device;
mod episode;
mod reminder;
mod scheduled_push;
mod shared;
pub mod timing;

pub use account::Account;
pub use device::DeviceToken;
pub use episode::{TreatmentEpisode, RECOVERY_WINDOW_DAYS};
pub use reminder::{DeliveryStatus, Reminder, RetryPolicy};
pub use scheduled_push::ScheduledPush;
pub use shared::entity::{Entity, InvalidIDError, ID};
