mod delete_device;
mod list_devices;
mod prune_invalid_devices;
mod register_device;

use actix_web::web;

use delete_device::delete_device_controller;
use list_devices::list_devices_controller;
use prune_invalid_devices::prune_invalid_devices_controller;
use register_device::register_device_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/push/register-device",
        web::post().to(register_device_controller),
    );
    cfg.route("/push/devices", web::get().to(list_devices_controller));
    cfg.route(
        "/push/devices/{device_id}",
        web::delete().to(delete_device_controller),
    );
    cfg.route(
        "/push/prune-invalid",
        web::post().to(prune_invalid_devices_controller),
    );
}
