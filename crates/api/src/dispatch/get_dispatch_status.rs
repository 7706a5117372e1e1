use crate::error::CarelinkError;
use crate::job_schedulers::DispatchDriver;
use crate::shared::auth::protect_cron_route;
use actix_web::{web, HttpRequest, HttpResponse};
use carelink_api_structs::get_dispatch_status::APIResponse;
use carelink_infra::CarelinkContext;

pub async fn get_dispatch_status_controller(
    http_req: HttpRequest,
    ctx: web::Data<CarelinkContext>,
    driver: web::Data<DispatchDriver>,
) -> Result<HttpResponse, CarelinkError> {
    protect_cron_route(&http_req, &ctx)?;

    let status = driver.status();
    Ok(HttpResponse::Ok().json(APIResponse {
        scheduler_enabled: ctx.config.scheduler_enabled,
        dispatch_interval_secs: ctx.config.dispatch_interval_secs,
        passes: status.passes,
        last_started_at: status.last_started_at,
        last_finished_at: status.last_finished_at,
        last_report: status.last_report,
    }))
}
