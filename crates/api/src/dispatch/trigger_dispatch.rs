use crate::error::CarelinkError;
use crate::job_schedulers::DispatchDriver;
use crate::shared::auth::protect_cron_route;
use actix_web::{web, HttpRequest, HttpResponse};
use carelink_api_structs::dispatch_due::APIResponse;
use carelink_infra::CarelinkContext;

pub async fn trigger_dispatch_controller(
    http_req: HttpRequest,
    ctx: web::Data<CarelinkContext>,
    driver: web::Data<DispatchDriver>,
) -> Result<HttpResponse, CarelinkError> {
    protect_cron_route(&http_req, &ctx)?;

    let report = driver.trigger().await;
    Ok(HttpResponse::Ok().json(APIResponse {
        busy: report.is_none(),
        report,
    }))
}
