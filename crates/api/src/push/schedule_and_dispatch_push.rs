use crate::{
    dispatch::dispatch_one_scheduled_push,
    error::CarelinkError,
    shared::{
        auth::protect_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use carelink_api_structs::dtos::ScheduledPushDTO;
use carelink_api_structs::schedule_and_dispatch_push::{APIResponse, RequestBody};
use carelink_domain::{ScheduledPush, ID};
use carelink_infra::CarelinkContext;
use chrono::{DateTime, Utc};

pub async fn schedule_and_dispatch_push_controller(
    http_req: HttpRequest,
    ctx: web::Data<CarelinkContext>,
    body: web::Json<RequestBody>,
) -> Result<HttpResponse, CarelinkError> {
    let account = protect_route(&http_req, &ctx).await?;

    let body = body.0;
    let usecase = ScheduleAndDispatchPushUseCase {
        account_id: account.id,
        title: body.title,
        body: body.body,
        send_at: body.send_at,
        force_now: body.force_now.unwrap_or(false),
    };
    execute(usecase, &ctx)
        .await
        .map(|res| HttpResponse::Created().json(res))
        .map_err(CarelinkError::from)
}

/// Stores a one-shot push and, when it is already due (or forced),
/// dispatches it in the same request instead of waiting for the next
/// scheduler pass.
#[derive(Debug)]
pub struct ScheduleAndDispatchPushUseCase {
    pub account_id: ID,
    pub title: String,
    pub body: String,
    pub send_at: Option<DateTime<Utc>>,
    pub force_now: bool,
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
impl UseCase for ScheduleAndDispatchPushUseCase {
    type Response = APIResponse;

    type Error = UseCaseError;

    const NAME: &'static str = "ScheduleAndDispatchPush";

    async fn execute(&mut self, ctx: &CarelinkContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.now();
        let send_at = self.send_at.unwrap_or(now);
        let mut push = ScheduledPush::new(
            self.account_id.clone(),
            self.title.clone(),
            self.body.clone(),
            send_at,
            now,
        );
        ctx.repos
            .scheduled_pushes
            .insert(&push)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        let mut dispatched = false;
        let mut sent_tokens = 0;
        if self.force_now || push.due(now) {
            sent_tokens = dispatch_one_scheduled_push(ctx, &mut push, now)
                .await
                .map_err(|_| UseCaseError::StorageError)?;
            dispatched = true;
        }

        Ok(APIResponse {
            push: ScheduledPushDTO::new(push),
            dispatched,
            sent_tokens,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carelink_infra::{setup_test_context, DeviceUpsert, StaticTimeSys};
    use chrono::Duration;
    use std::sync::Arc;

    fn utc(s: &str) -> DateTime<Utc> {
        s.parse().expect("Valid RFC3339 timestamp")
    }

    #[actix_web::main]
    #[test]
    async fn an_already_due_push_is_dispatched_inline() {
        let (mut ctx, gateway) = setup_test_context();
        let now = utc("2025-01-01T10:00:00Z");
        ctx.sys = Arc::new(StaticTimeSys { time: now });
        let account_id = ID::new();
        ctx.repos
            .device_tokens
            .upsert_by_token(
                DeviceUpsert {
                    account_id: account_id.clone(),
                    platform: "ios".into(),
                    token: "tok-1".into(),
                    local_reminders_enabled: false,
                },
                now,
            )
            .await
            .unwrap();

        let res = execute(
            ScheduleAndDispatchPushUseCase {
                account_id,
                title: "Checkup".into(),
                body: "See you at 4".into(),
                send_at: None,
                force_now: false,
            },
            &ctx,
        )
        .await
        .unwrap();
        assert!(res.dispatched);
        assert_eq!(res.sent_tokens, 1);
        assert!(res.push.sent);
        assert_eq!(gateway.sends().len(), 1);
    }

    #[actix_web::main]
    #[test]
    async fn a_future_push_is_stored_for_the_scheduler() {
        let (mut ctx, gateway) = setup_test_context();
        let now = utc("2025-01-01T10:00:00Z");
        ctx.sys = Arc::new(StaticTimeSys { time: now });

        let res = execute(
            ScheduleAndDispatchPushUseCase {
                account_id: ID::new(),
                title: "Checkup".into(),
                body: "Tomorrow".into(),
                send_at: Some(now + Duration::hours(20)),
                force_now: false,
            },
            &ctx,
        )
        .await
        .unwrap();
        assert!(!res.dispatched);
        assert!(!res.push.sent);
        assert!(gateway.sends().is_empty());
    }
}
