use crate::error::CarelinkError;
use crate::shared::auth::protect_route;
use actix_web::{web, HttpRequest, HttpResponse};
use carelink_api_structs::dtos::ReminderDTO;
use carelink_api_structs::reminders_debug::{APIResponse, DebugEntry, QueryParams};
use carelink_infra::CarelinkContext;

const DEFAULT_LIMIT: usize = 100;

/// Read-only view for support: the caller's reminders with their computed
/// due-ness against the server clock.
pub async fn reminders_debug_controller(
    http_req: HttpRequest,
    ctx: web::Data<CarelinkContext>,
    query: web::Query<QueryParams>,
) -> Result<HttpResponse, CarelinkError> {
    let account = protect_route(&http_req, &ctx).await?;

    let now = ctx.sys.now();
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    let entries = ctx
        .repos
        .reminders
        .find_by_account(&account.id)
        .await
        .into_iter()
        .take(limit)
        .map(|reminder| DebugEntry {
            due: reminder.active && reminder.next_fire_utc <= now,
            reminder: ReminderDTO::new(reminder),
        })
        .collect();

    Ok(HttpResponse::Ok().json(APIResponse { now, entries }))
}
