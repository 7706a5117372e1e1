use crate::dtos::ScheduledPushDTO;
use carelink_domain::ScheduledPush;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledPushResponse {
    pub push: ScheduledPushDTO,
}

impl ScheduledPushResponse {
    pub fn new(push: ScheduledPush) -> Self {
        Self {
            push: ScheduledPushDTO::new(push),
        }
    }
}

pub mod schedule_push {
    use super::*;

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub title: String,
        pub body: String,
        pub send_at: DateTime<Utc>,
    }

    pub type APIResponse = ScheduledPushResponse;
}

pub mod schedule_and_dispatch_push {
    use super::*;

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub title: String,
        pub body: String,
        /// Defaults to now, which makes the push immediately due.
        pub send_at: Option<DateTime<Utc>>,
        pub force_now: Option<bool>,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub push: ScheduledPushDTO,
        pub dispatched: bool,
        pub sent_tokens: usize,
    }
}

pub mod list_scheduled_pushes {
    use super::*;

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub pushes: Vec<ScheduledPushDTO>,
    }

    impl APIResponse {
        pub fn new(pushes: Vec<ScheduledPush>) -> Self {
            Self {
                pushes: pushes.into_iter().map(ScheduledPushDTO::new).collect(),
            }
        }
    }
}

pub mod test_push {
    use super::*;

    #[derive(Serialize, Deserialize, Default)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub title: Option<String>,
        pub body: Option<String>,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub requested: usize,
        pub delivered: usize,
    }
}

pub mod dispatch_my_pushes {
    use super::*;

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub dispatched: usize,
        pub sent_tokens: usize,
    }
}
