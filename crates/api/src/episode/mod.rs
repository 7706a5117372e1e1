mod get_current_episode;
mod get_episode_history;
mod mark_episode_complete;
mod replace_treatment;
mod rotate_episode_if_due;
mod shared;
mod start_new_episode;

use actix_web::web;

use get_current_episode::get_current_episode_controller;
use get_episode_history::get_episode_history_controller;
use mark_episode_complete::mark_episode_complete_controller;
use replace_treatment::replace_treatment_controller;
use rotate_episode_if_due::rotate_episode_if_due_controller;
use start_new_episode::start_new_episode_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/episodes/current",
        web::get().to(get_current_episode_controller),
    );
    cfg.route(
        "/episodes/history",
        web::get().to(get_episode_history_controller),
    );
    cfg.route(
        "/episodes/mark-complete",
        web::post().to(mark_episode_complete_controller),
    );
    cfg.route(
        "/episodes/rotate-if-due",
        web::post().to(rotate_episode_if_due_controller),
    );
    cfg.route(
        "/episodes/start-new",
        web::post().to(start_new_episode_controller),
    );
    cfg.route(
        "/episodes/replace-treatment",
        web::post().to(replace_treatment_controller),
    );
}
