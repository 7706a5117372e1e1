use crate::dtos::{AccountDTO, EpisodeDTO};
use carelink_domain::TreatmentEpisode;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeResponse {
    pub episode: EpisodeDTO,
}

impl EpisodeResponse {
    pub fn new(episode: TreatmentEpisode) -> Self {
        Self {
            episode: EpisodeDTO::new(episode),
        }
    }
}

pub mod get_current_episode {
    use super::*;

    pub type APIResponse = EpisodeResponse;
}

pub mod get_episode_history {
    use super::*;

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub episodes: Vec<EpisodeDTO>,
    }

    impl APIResponse {
        pub fn new(episodes: Vec<TreatmentEpisode>) -> Self {
            Self {
                episodes: episodes.into_iter().map(EpisodeDTO::new).collect(),
            }
        }
    }
}

pub mod mark_episode_complete {
    use super::*;

    #[derive(Serialize, Deserialize, Default)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub procedure_date: Option<NaiveDate>,
        pub procedure_time: Option<NaiveTime>,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub completed: EpisodeDTO,
        pub next: EpisodeDTO,
    }
}

pub mod rotate_episode_if_due {
    use super::*;

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub rotated: bool,
        pub episode: Option<EpisodeDTO>,
    }
}

pub mod start_new_episode {
    use super::*;

    pub type APIResponse = EpisodeResponse;
}

pub mod replace_treatment {
    use super::*;

    #[derive(Serialize, Deserialize, Default)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub department: Option<String>,
        pub doctor: Option<String>,
        pub treatment: Option<String>,
        pub subtype: Option<String>,
        pub procedure_date: Option<NaiveDate>,
        pub procedure_time: Option<NaiveTime>,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub account: AccountDTO,
        pub episode: EpisodeDTO,
        pub purged_records: i64,
    }
}
