mod account;
mod device;
mod dispatch;
mod episode;
mod error;
mod job_schedulers;
mod push;
mod reminder;
mod shared;
mod status;

use actix_cors::Cors;
use actix_web::{dev::Server, middleware, web, App, HttpServer};
use carelink_infra::CarelinkContext;
use job_schedulers::{start_dispatch_job, DispatchDriver};
use std::net::TcpListener;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

pub fn configure_server_api(cfg: &mut web::ServiceConfig) {
    account::configure_routes(cfg);
    device::configure_routes(cfg);
    dispatch::configure_routes(cfg);
    episode::configure_routes(cfg);
    push::configure_routes(cfg);
    reminder::configure_routes(cfg);
    status::configure_routes(cfg);
}

pub struct Application {
    server: Server,
    port: u16,
}

impl Application {
    pub async fn new(context: CarelinkContext) -> Result<Self, std::io::Error> {
        let driver = Arc::new(DispatchDriver::new(context.clone()));
        let (server, port) = Application::configure_server(context.clone(), driver.clone()).await?;
        Application::start_job_schedulers(context, driver);

        Ok(Self { server, port })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    fn start_job_schedulers(context: CarelinkContext, driver: Arc<DispatchDriver>) {
        if context.config.scheduler_enabled {
            start_dispatch_job(driver, context.config.dispatch_interval_secs);
        }
    }

    async fn configure_server(
        context: CarelinkContext,
        driver: Arc<DispatchDriver>,
    ) -> Result<(Server, u16), std::io::Error> {
        let port = context.config.port;
        let address = format!("0.0.0.0:{}", port);
        let listener = TcpListener::bind(address)?;
        let port = listener.local_addr()?.port();

        let server = HttpServer::new(move || {
            let ctx = context.clone();
            let driver = web::Data::from(driver.clone());

            App::new()
                .wrap(Cors::permissive())
                .wrap(middleware::Compress::default())
                .wrap(TracingLogger::default())
                .app_data(web::Data::new(ctx))
                .app_data(driver)
                .service(web::scope("/api/v1").configure(configure_server_api))
        })
        .listen(listener)?
        .workers(4)
        .run();

        Ok((server, port))
    }

    pub async fn start(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}
