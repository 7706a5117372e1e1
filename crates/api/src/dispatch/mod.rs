mod delivery;
mod dispatch_due;
mod get_dispatch_status;
mod trigger_dispatch;

use actix_web::web;
pub use delivery::{send_to_account_devices, SendSummary};
pub use dispatch_due::{dispatch_one_scheduled_push, DispatchDueUseCase};
use get_dispatch_status::get_dispatch_status_controller;
use trigger_dispatch::trigger_dispatch_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/dispatch/due", web::post().to(trigger_dispatch_controller));
    cfg.route(
        "/dispatch/status",
        web::get().to(get_dispatch_status_controller),
    );
}
