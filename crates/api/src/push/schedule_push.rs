use crate::{
    error::CarelinkError,
    shared::{
        auth::protect_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use carelink_api_structs::schedule_push::{APIResponse, RequestBody};
use carelink_domain::{ScheduledPush, ID};
use carelink_infra::CarelinkContext;
use chrono::{DateTime, Utc};

pub async fn schedule_push_controller(
    http_req: HttpRequest,
    ctx: web::Data<CarelinkContext>,
    body: web::Json<RequestBody>,
) -> Result<HttpResponse, CarelinkError> {
    let account = protect_route(&http_req, &ctx).await?;

    let body = body.0;
    let usecase = SchedulePushUseCase {
        account_id: account.id,
        title: body.title,
        body: body.body,
        send_at: body.send_at,
    };
    execute(usecase, &ctx)
        .await
        .map(|push| HttpResponse::Created().json(APIResponse::new(push)))
        .map_err(CarelinkError::from)
}

#[derive(Debug)]
pub struct SchedulePushUseCase {
    pub account_id: ID,
    pub title: String,
    pub body: String,
    pub send_at: DateTime<Utc>,
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
impl UseCase for SchedulePushUseCase {
    type Response = ScheduledPush;

    type Error = UseCaseError;

    const NAME: &'static str = "SchedulePush";

    async fn execute(&mut self, ctx: &CarelinkContext) -> Result<Self::Response, Self::Error> {
        let push = ScheduledPush::new(
            self.account_id.clone(),
            self.title.clone(),
            self.body.clone(),
            self.send_at,
            ctx.sys.now(),
        );
        ctx.repos
            .scheduled_pushes
            .insert(&push)
            .await
            .map(|_| push)
            .map_err(|_| UseCaseError::StorageError)
    }
}
