use crate::dtos::DispatchReportDTO;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod dispatch_due {
    use super::*;

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub busy: bool,
        pub report: Option<DispatchReportDTO>,
    }
}

pub mod get_dispatch_status {
    use super::*;

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub scheduler_enabled: bool,
        pub dispatch_interval_secs: u64,
        pub passes: u64,
        pub last_started_at: Option<DateTime<Utc>>,
        pub last_finished_at: Option<DateTime<Utc>>,
        pub last_report: Option<DispatchReportDTO>,
    }
}
