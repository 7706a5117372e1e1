use super::{DeviceUpsert, IDeviceTokenRepo};
use crate::repos::shared::inmemory_repo::*;
use crate::repos::shared::repo::DeleteResult;
use carelink_domain::{DeviceToken, ID};
use chrono::{DateTime, Utc};

pub struct InMemoryDeviceTokenRepo {
    devices: std::sync::Mutex<Vec<DeviceToken>>,
}

impl InMemoryDeviceTokenRepo {
    pub fn new() -> Self {
        Self {
            devices: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IDeviceTokenRepo for InMemoryDeviceTokenRepo {
    async fn upsert_by_token(
        &self,
        upsert: DeviceUpsert,
        now: DateTime<Utc>,
    ) -> anyhow::Result<DeviceToken> {
        // One guard across find and mutate, which is what makes concurrent
        // registrations of the same token converge on a single row.
        let mut devices = self.devices.lock().unwrap();
        for device in devices.iter_mut() {
            if device.token == upsert.token {
                device.reassign(
                    upsert.account_id,
                    upsert.platform,
                    upsert.local_reminders_enabled,
                    now,
                );
                return Ok(device.clone());
            }
        }
        let device = DeviceToken::new(
            upsert.account_id,
            upsert.platform,
            upsert.token,
            upsert.local_reminders_enabled,
            now,
        );
        devices.push(device.clone());
        Ok(device)
    }

    async fn save(&self, device: &DeviceToken) -> anyhow::Result<()> {
        save(device, &self.devices);
        Ok(())
    }

    async fn find(&self, device_id: &ID) -> Option<DeviceToken> {
        find(device_id, &self.devices)
    }

    async fn find_by_token(&self, token: &str) -> Option<DeviceToken> {
        find_by(&self.devices, |d| d.token == token).into_iter().next()
    }

    async fn find_by_account(&self, account_id: &ID) -> Vec<DeviceToken> {
        find_by(&self.devices, |d| d.account_id == *account_id)
    }

    async fn delete(&self, device_id: &ID) -> Option<DeviceToken> {
        delete(device_id, &self.devices)
    }

    async fn delete_others_for_account(&self, account_id: &ID, keep: &ID) -> DeleteResult {
        delete_by(&self.devices, |d| d.account_id == *account_id && d.id != *keep)
    }
}
