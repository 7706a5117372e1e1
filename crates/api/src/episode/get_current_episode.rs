use super::shared::get_or_create_open_episode;
use crate::error::CarelinkError;
use crate::shared::auth::protect_route;
use actix_web::{web, HttpRequest, HttpResponse};
use carelink_api_structs::get_current_episode::APIResponse;
use carelink_infra::CarelinkContext;

pub async fn get_current_episode_controller(
    http_req: HttpRequest,
    ctx: web::Data<CarelinkContext>,
) -> Result<HttpResponse, CarelinkError> {
    let mut account = protect_route(&http_req, &ctx).await?;

    let episode = get_or_create_open_episode(&ctx, &mut account, ctx.sys.now())
        .await
        .map_err(|_| CarelinkError::InternalError)?;
    Ok(HttpResponse::Ok().json(APIResponse::new(episode)))
}
