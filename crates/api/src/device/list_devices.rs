use crate::error::CarelinkError;
use crate::shared::auth::protect_route;
use actix_web::{web, HttpRequest, HttpResponse};
use carelink_api_structs::list_devices::APIResponse;
use carelink_infra::CarelinkContext;

pub async fn list_devices_controller(
    http_req: HttpRequest,
    ctx: web::Data<CarelinkContext>,
) -> Result<HttpResponse, CarelinkError> {
    let account = protect_route(&http_req, &ctx).await?;

    let devices = ctx.repos.device_tokens.find_by_account(&account.id).await;
    Ok(HttpResponse::Ok().json(APIResponse::new(devices)))
}
