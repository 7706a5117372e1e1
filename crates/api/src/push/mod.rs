mod dispatch_my_pushes;
mod list_scheduled_pushes;
mod schedule_and_dispatch_push;
mod schedule_push;
mod test_push;

use actix_web::web;

use dispatch_my_pushes::dispatch_my_pushes_controller;
use list_scheduled_pushes::list_scheduled_pushes_controller;
use schedule_and_dispatch_push::schedule_and_dispatch_push_controller;
use schedule_push::schedule_push_controller;
use test_push::test_push_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/push/schedule", web::post().to(schedule_push_controller));
    cfg.route(
        "/push/schedule-and-dispatch",
        web::post().to(schedule_and_dispatch_push_controller),
    );
    cfg.route(
        "/push/scheduled",
        web::get().to(list_scheduled_pushes_controller),
    );
    cfg.route("/push/test", web::post().to(test_push_controller));
    cfg.route(
        "/push/dispatch-mine",
        web::post().to(dispatch_my_pushes_controller),
    );
}
