use crate::error::CarelinkError;
use crate::shared::auth::protect_route;
use actix_web::{web, HttpRequest, HttpResponse};
use carelink_api_structs::get_reminder::{APIResponse, PathParams};
use carelink_infra::CarelinkContext;

pub async fn get_reminder_controller(
    http_req: HttpRequest,
    ctx: web::Data<CarelinkContext>,
    path: web::Path<PathParams>,
) -> Result<HttpResponse, CarelinkError> {
    let account = protect_route(&http_req, &ctx).await?;

    let reminder = ctx
        .repos
        .reminders
        .find(&path.reminder_id)
        .await
        .filter(|r| r.account_id == account.id)
        .ok_or_else(|| {
            CarelinkError::NotFound(format!(
                "The reminder with id: {} was not found",
                path.reminder_id
            ))
        })?;

    Ok(HttpResponse::Ok().json(APIResponse::new(reminder)))
}
