mod ack_reminder;
mod create_reminder;
mod delete_reminder;
mod get_reminder;
mod list_reminders;
mod reminders_debug;
mod reminders_health;
mod reschedule_all_reminders;
mod sync_reminders;
mod update_reminder;

use actix_web::web;

use ack_reminder::ack_reminder_controller;
use create_reminder::create_reminder_controller;
use delete_reminder::delete_reminder_controller;
use get_reminder::get_reminder_controller;
use list_reminders::list_reminders_controller;
use reminders_debug::reminders_debug_controller;
use reminders_health::reminders_health_controller;
use reschedule_all_reminders::reschedule_all_reminders_controller;
use sync_reminders::sync_reminders_controller;
use update_reminder::update_reminder_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/reminders", web::post().to(create_reminder_controller));
    cfg.route("/reminders", web::get().to(list_reminders_controller));
    cfg.route("/reminders/sync", web::post().to(sync_reminders_controller));
    cfg.route(
        "/reminders/reschedule-all",
        web::post().to(reschedule_all_reminders_controller),
    );
    cfg.route(
        "/reminders/debug",
        web::get().to(reminders_debug_controller),
    );
    cfg.route(
        "/reminders/health",
        web::get().to(reminders_health_controller),
    );
    cfg.route(
        "/reminders/{reminder_id}",
        web::get().to(get_reminder_controller),
    );
    cfg.route(
        "/reminders/{reminder_id}",
        web::put().to(update_reminder_controller),
    );
    cfg.route(
        "/reminders/{reminder_id}",
        web::delete().to(delete_reminder_controller),
    );
    cfg.route(
        "/reminders/{reminder_id}/ack",
        web::post().to(ack_reminder_controller),
    );
}
