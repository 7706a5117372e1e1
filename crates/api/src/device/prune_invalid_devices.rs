use crate::{
    error::CarelinkError,
    shared::{
        auth::protect_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use carelink_api_structs::prune_invalid_devices::{APIResponse, RequestBody};
use carelink_domain::ID;
use carelink_infra::{CarelinkContext, PushNote};
use std::collections::HashMap;
use tracing::warn;

pub async fn prune_invalid_devices_controller(
    http_req: HttpRequest,
    ctx: web::Data<CarelinkContext>,
    body: web::Json<RequestBody>,
) -> Result<HttpResponse, CarelinkError> {
    let account = protect_route(&http_req, &ctx).await?;

    let usecase = PruneInvalidDevicesUseCase {
        account_id: account.id,
        dry_run: body.0.dry_run.unwrap_or(false),
    };
    execute(usecase, &ctx)
        .await
        .map(|res| HttpResponse::Ok().json(res))
        .map_err(CarelinkError::from)
}

/// Probes each of the caller's active tokens with a data-only note and
/// deactivates the ones FCM reports as gone. Data-only so nothing visible
/// reaches the device.
#[derive(Debug)]
pub struct PruneInvalidDevicesUseCase {
    pub account_id: ID,
    pub dry_run: bool,
}

#[derive(Debug)]
pub enum UseCaseError {}

impl From<UseCaseError> for CarelinkError {
    fn from(e: UseCaseError) -> Self {
        match e {}
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for PruneInvalidDevicesUseCase {
    type Response = APIResponse;

    type Error = UseCaseError;

    const NAME: &'static str = "PruneInvalidDevices";

    async fn execute(&mut self, ctx: &CarelinkContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.now();
        let mut data = HashMap::new();
        data.insert("type".to_string(), "probe".to_string());
        let probe = PushNote {
            title: String::new(),
            body: String::new(),
            data,
            ttl_seconds: Some(0),
            channel_hint: None,
        };

        let devices: Vec<_> = ctx
            .repos
            .device_tokens
            .find_by_account(&self.account_id)
            .await
            .into_iter()
            .filter(|d| d.active)
            .collect();

        let mut checked = 0;
        let mut pruned = 0;
        for mut device in devices {
            checked += 1;
            let outcome = ctx.push_gateway.send(&device.token, &probe).await;
            if !outcome.token_invalid() {
                continue;
            }
            pruned += 1;
            if self.dry_run {
                continue;
            }
            let reason = outcome
                .response_snippet
                .unwrap_or_else(|| "token_invalid".into());
            device.deactivate(&reason, now);
            if let Err(e) = ctx.repos.device_tokens.save(&device).await {
                warn!("Failed to deactivate probed device token: {:?}", e);
            }
        }

        Ok(APIResponse {
            checked,
            pruned,
            dry_run: self.dry_run,
        })
    }
}
