use crate::dtos::DeviceTokenDTO;
use carelink_domain::{DeviceToken, ID};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceTokenResponse {
    pub device: DeviceTokenDTO,
}

impl DeviceTokenResponse {
    pub fn new(device: DeviceToken) -> Self {
        Self {
            device: DeviceTokenDTO::new(device),
        }
    }
}

pub mod register_device {
    use super::*;

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub platform: String,
        pub token: String,
        pub local_reminders_enabled: Option<bool>,
    }

    pub type APIResponse = DeviceTokenResponse;
}

pub mod list_devices {
    use super::*;

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub devices: Vec<DeviceTokenDTO>,
    }

    impl APIResponse {
        pub fn new(devices: Vec<DeviceToken>) -> Self {
            Self {
                devices: devices.into_iter().map(DeviceTokenDTO::new).collect(),
            }
        }
    }
}

pub mod delete_device {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub device_id: ID,
    }

    pub type APIResponse = DeviceTokenResponse;
}

pub mod prune_invalid_devices {
    use super::*;

    #[derive(Serialize, Deserialize, Default)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub dry_run: Option<bool>,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub checked: usize,
        pub pruned: usize,
        pub dry_run: bool,
    }
}
