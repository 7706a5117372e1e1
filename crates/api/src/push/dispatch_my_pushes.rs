use crate::{
    dispatch::dispatch_one_scheduled_push,
    error::CarelinkError,
    shared::{
        auth::protect_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use carelink_api_structs::dispatch_my_pushes::APIResponse;
use carelink_domain::ID;
use carelink_infra::CarelinkContext;
use tracing::warn;

pub async fn dispatch_my_pushes_controller(
    http_req: HttpRequest,
    ctx: web::Data<CarelinkContext>,
) -> Result<HttpResponse, CarelinkError> {
    let account = protect_route(&http_req, &ctx).await?;

    let usecase = DispatchMyPushesUseCase {
        account_id: account.id,
    };
    execute(usecase, &ctx)
        .await
        .map(|res| HttpResponse::Ok().json(res))
        .map_err(CarelinkError::from)
}

/// Caller-scoped flush of due scheduled pushes. Authenticated with the
/// account's own api key, so a device can nudge its pending pushes along
/// without holding the cron secret.
#[derive(Debug)]
pub struct DispatchMyPushesUseCase {
    pub account_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {}

impl From<UseCaseError> for CarelinkError {
    fn from(e: UseCaseError) -> Self {
        match e {}
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for DispatchMyPushesUseCase {
    type Response = APIResponse;

    type Error = UseCaseError;

    const NAME: &'static str = "DispatchMyPushes";

    async fn execute(&mut self, ctx: &CarelinkContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.now();
        let due: Vec<_> = ctx
            .repos
            .scheduled_pushes
            .find_due(now)
            .await
            .into_iter()
            .filter(|p| p.account_id == self.account_id)
            .collect();

        let mut dispatched = 0;
        let mut sent_tokens = 0;
        for mut push in due {
            match dispatch_one_scheduled_push(ctx, &mut push, now).await {
                Ok(sent) => {
                    dispatched += 1;
                    sent_tokens += sent;
                }
                Err(e) => warn!(push_id = %push.id, "Scheduled push dispatch failed: {:?}", e),
            }
        }
        Ok(APIResponse {
            dispatched,
            sent_tokens,
        })
    }
}
