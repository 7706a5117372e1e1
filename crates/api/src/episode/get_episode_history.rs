use crate::error::CarelinkError;
use crate::shared::auth::protect_route;
use actix_web::{web, HttpRequest, HttpResponse};
use carelink_api_structs::get_episode_history::APIResponse;
use carelink_infra::CarelinkContext;

pub async fn get_episode_history_controller(
    http_req: HttpRequest,
    ctx: web::Data<CarelinkContext>,
) -> Result<HttpResponse, CarelinkError> {
    let account = protect_route(&http_req, &ctx).await?;

    let episodes = ctx.repos.episodes.find_by_account(&account.id).await;
    Ok(HttpResponse::Ok().json(APIResponse::new(episodes)))
}
