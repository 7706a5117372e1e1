use crate::{
    dispatch::send_to_account_devices,
    error::CarelinkError,
    shared::{
        auth::protect_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use carelink_api_structs::test_push::{APIResponse, RequestBody};
use carelink_domain::ID;
use carelink_infra::{CarelinkContext, PushNote};
use std::collections::HashMap;

pub async fn test_push_controller(
    http_req: HttpRequest,
    ctx: web::Data<CarelinkContext>,
    body: web::Json<RequestBody>,
) -> Result<HttpResponse, CarelinkError> {
    let account = protect_route(&http_req, &ctx).await?;

    let body = body.0;
    let usecase = TestPushUseCase {
        account_id: account.id,
        title: body.title.unwrap_or_else(|| "Test notification".into()),
        body: body
            .body
            .unwrap_or_else(|| "If you can read this, push delivery works.".into()),
    };
    execute(usecase, &ctx)
        .await
        .map(|res| HttpResponse::Ok().json(res))
        .map_err(CarelinkError::from)
}

/// Fires an immediate note at every active token the caller holds, so a
/// patient can verify delivery end to end from the app's settings screen.
#[derive(Debug)]
pub struct TestPushUseCase {
    pub account_id: ID,
    pub title: String,
    pub body: String,
}

#[derive(Debug)]
pub enum UseCaseError {}

impl From<UseCaseError> for CarelinkError {
    fn from(e: UseCaseError) -> Self {
        match e {}
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for TestPushUseCase {
    type Response = APIResponse;

    type Error = UseCaseError;

    const NAME: &'static str = "TestPush";

    async fn execute(&mut self, ctx: &CarelinkContext) -> Result<Self::Response, Self::Error> {
        let mut data = HashMap::new();
        data.insert("type".to_string(), "test".to_string());
        let note = PushNote {
            title: self.title.clone(),
            body: self.body.clone(),
            data,
            ttl_seconds: None,
            channel_hint: None,
        };

        let summary =
            send_to_account_devices(ctx, &self.account_id, &note, false, ctx.sys.now()).await;
        Ok(APIResponse {
            requested: summary.requested,
            delivered: summary.delivered,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carelink_infra::{setup_test_context, DeviceUpsert};
    use chrono::Utc;

    #[actix_web::main]
    #[test]
    async fn sends_to_every_active_token_including_local_capable_ones() {
        let (ctx, gateway) = setup_test_context();
        let account_id = ID::new();
        for (token, local) in [("tok-1", false), ("tok-2", true)] {
            ctx.repos
                .device_tokens
                .upsert_by_token(
                    DeviceUpsert {
                        account_id: account_id.clone(),
                        platform: "android".into(),
                        token: token.into(),
                        local_reminders_enabled: local,
                    },
                    Utc::now(),
                )
                .await
                .unwrap();
        }

        let res = execute(
            TestPushUseCase {
                account_id,
                title: "Test".into(),
                body: "Hello".into(),
            },
            &ctx,
        )
        .await
        .unwrap();
        assert_eq!(res.requested, 2);
        assert_eq!(res.delivered, 2);
        assert_eq!(gateway.sends().len(), 2);
    }
}
