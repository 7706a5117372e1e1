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
use carelink_api_structs::rotate_episode_if_due::APIResponse;
use carelink_domain::Account;
use carelink_infra::CarelinkContext;
use tracing::info;

pub async fn rotate_episode_if_due_controller(
    http_req: HttpRequest,
    ctx: web::Data<CarelinkContext>,
) -> Result<HttpResponse, CarelinkError> {
    let account = protect_route(&http_req, &ctx).await?;

    let usecase = RotateEpisodeIfDueUseCase { account };
    execute(usecase, &ctx)
        .await
        .map(|res| HttpResponse::Ok().json(res))
        .map_err(CarelinkError::from)
}

/// Treatment-cycle auto-renewal: a completed open episode whose procedure
/// date is past the recovery window gets locked and replaced, so stale
/// completed episodes never silently accept new edits.
#[derive(Debug)]
pub struct RotateEpisodeIfDueUseCase {
    pub account: Account,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

impl From<UseCaseError> for CarelinkError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for RotateEpisodeIfDueUseCase {
    type Response = APIResponse;

    type Error = UseCaseError;

    const NAME: &'static str = "RotateEpisodeIfDue";

    async fn execute(&mut self, ctx: &CarelinkContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.now();
        let open = ctx
            .repos
            .episodes
            .find_open_by_account(&self.account.id)
            .await;
        // Newest first; rotation only ever concerns the current one.
        let mut episode = match open.into_iter().next() {
            Some(episode) => episode,
            None => {
                return Ok(APIResponse {
                    rotated: false,
                    episode: None,
                })
            }
        };

        if !episode.rotation_due(now) {
            return Ok(APIResponse {
                rotated: false,
                episode: None,
            });
        }

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
        mirror_to_account(ctx, &mut self.account, &next)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        info!(account_id = %self.account.id, episode_id = %next.id, "Rotated treatment episode");

        Ok(APIResponse {
            rotated: true,
            episode: Some(EpisodeDTO::new(next)),
        })
    }
}
