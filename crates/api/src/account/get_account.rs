use crate::error::CarelinkError;
use crate::shared::auth::protect_route;
use actix_web::{web, HttpRequest, HttpResponse};
use carelink_api_structs::get_account::APIResponse;
use carelink_infra::CarelinkContext;

pub async fn get_account_controller(
    http_req: HttpRequest,
    ctx: web::Data<CarelinkContext>,
) -> Result<HttpResponse, CarelinkError> {
    let account = protect_route(&http_req, &ctx).await?;

    Ok(HttpResponse::Ok().json(APIResponse::new(account)))
}
