use super::shared::{get_or_create_open_episode, mirror_to_account};
use crate::{
    error::CarelinkError,
    shared::{
        auth::protect_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use carelink_api_structs::start_new_episode::APIResponse;
use carelink_domain::{Account, TreatmentEpisode};
use carelink_infra::CarelinkContext;

pub async fn start_new_episode_controller(
    http_req: HttpRequest,
    ctx: web::Data<CarelinkContext>,
) -> Result<HttpResponse, CarelinkError> {
    let account = protect_route(&http_req, &ctx).await?;

    let usecase = StartNewEpisodeUseCase { account };
    execute(usecase, &ctx)
        .await
        .map(|episode| HttpResponse::Created().json(APIResponse::new(episode)))
        .map_err(CarelinkError::from)
}

/// Explicit begin-next: locks whatever is open and starts a successor,
/// without waiting for the recovery window.
#[derive(Debug)]
pub struct StartNewEpisodeUseCase {
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
impl UseCase for StartNewEpisodeUseCase {
    type Response = TreatmentEpisode;

    type Error = UseCaseError;

    const NAME: &'static str = "StartNewEpisode";

    async fn execute(&mut self, ctx: &CarelinkContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.now();
        let mut current = get_or_create_open_episode(ctx, &mut self.account, now)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        current.lock();
        ctx.repos
            .episodes
            .save(&current)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        let next = current.successor(now);
        ctx.repos
            .episodes
            .insert(&next)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        mirror_to_account(ctx, &mut self.account, &next)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(next)
    }
}
