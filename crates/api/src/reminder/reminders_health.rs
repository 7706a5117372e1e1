use crate::error::CarelinkError;
use crate::job_schedulers::DispatchDriver;
use actix_web::{web, HttpResponse};
use carelink_api_structs::reminders_health::APIResponse;
use carelink_infra::CarelinkContext;

pub async fn reminders_health_controller(
    ctx: web::Data<CarelinkContext>,
    driver: web::Data<DispatchDriver>,
) -> Result<HttpResponse, CarelinkError> {
    let status = driver.status();
    Ok(HttpResponse::Ok().json(APIResponse {
        scheduler_enabled: ctx.config.scheduler_enabled,
        server_only: ctx.config.server_only,
        dispatch_interval_secs: ctx.config.dispatch_interval_secs,
        last_pass_started_at: status.last_started_at,
        last_pass_finished_at: status.last_finished_at,
        passes: status.passes,
    }))
}
