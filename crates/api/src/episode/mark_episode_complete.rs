use super::shared::mirror_to_account;
use crate::{
    error::CarelinkError,
    shared::{
        auth::protect_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use carelink_api_structs::dtos::EpisodeDTO;
use carelink_api_structs::mark_episode_complete::{APIResponse, RequestBody};
use carelink_domain::{Account, TreatmentEpisode};
use carelink_infra::CarelinkContext;
use chrono::{NaiveDate, NaiveTime};
use tracing::warn;

pub async fn mark_episode_complete_controller(
    http_req: HttpRequest,
    ctx: web::Data<CarelinkContext>,
    body: web::Json<RequestBody>,
) -> Result<HttpResponse, CarelinkError> {
    let account = protect_route(&http_req, &ctx).await?;

    let body = body.0;
    let usecase = MarkEpisodeCompleteUseCase {
        account,
        procedure_date: body.procedure_date,
        procedure_time: body.procedure_time,
    };
    execute(usecase, &ctx)
        .await
        .map(|res| HttpResponse::Ok().json(res))
        .map_err(CarelinkError::from)
}

/// Completes and locks the open episode in one step, then opens its
/// successor. `open → locked` plus `∅ → open(new)`, never observable
/// halfway by the caller.
#[derive(Debug)]
pub struct MarkEpisodeCompleteUseCase {
    pub account: Account,
    pub procedure_date: Option<NaiveDate>,
    pub procedure_time: Option<NaiveTime>,
}

#[derive(Debug)]
pub enum UseCaseError {
    EpisodeLocked,
    StorageError,
}

impl From<UseCaseError> for CarelinkError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::EpisodeLocked => Self::Locked(
                "The treatment episode is locked. Fetch the current episode and retry.".into(),
            ),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for MarkEpisodeCompleteUseCase {
    type Response = APIResponse;

    type Error = UseCaseError;

    const NAME: &'static str = "MarkEpisodeComplete";

    async fn execute(&mut self, ctx: &CarelinkContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.now();
        let mut open = ctx
            .repos
            .episodes
            .find_open_by_account(&self.account.id)
            .await;

        if open.len() > 1 {
            warn!(
                account_id = %self.account.id,
                count = open.len(),
                "Multiple unlocked episodes found, locking all but the newest"
            );
            for mut stale in open.split_off(1) {
                stale.lock();
                ctx.repos
                    .episodes
                    .save(&stale)
                    .await
                    .map_err(|_| UseCaseError::StorageError)?;
            }
        }

        let mut episode = match open.pop() {
            Some(episode) => episode,
            None => {
                // Nothing open to complete. If history exists the caller is
                // trying to edit locked state.
                let history = ctx.repos.episodes.find_by_account(&self.account.id).await;
                if !history.is_empty() {
                    return Err(UseCaseError::EpisodeLocked);
                }
                let fresh = TreatmentEpisode::new(self.account.id.clone(), now);
                ctx.repos
                    .episodes
                    .insert(&fresh)
                    .await
                    .map_err(|_| UseCaseError::StorageError)?;
                fresh
            }
        };

        episode.complete(self.procedure_date, self.procedure_time, now);
        episode.lock();
        ctx.repos
            .episodes
            .save(&episode)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        let next = episode.successor(now);
        ctx.repos
            .episodes
            .insert(&next)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        self.account.record_completion(episode.id.clone(), now);
        mirror_to_account(ctx, &mut self.account, &next)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(APIResponse {
            completed: EpisodeDTO::new(episode),
            next: EpisodeDTO::new(next),
        })
    }
}
