use carelink_api::Application;
use carelink_infra::{setup_context, Config};

pub struct TestApp {
    pub config: Config,
}

// Launch the application as a background task
pub async fn spawn_app() -> (TestApp, reqwest::Client, String) {
    let mut ctx = setup_context();
    ctx.config.port = 0; // Random port
    // Tests drive dispatch through the endpoint, not the interval job.
    ctx.config.scheduler_enabled = false;

    let config = ctx.config.clone();
    let application = Application::new(ctx)
        .await
        .expect("Failed to build application.");

    let address = format!("http://localhost:{}", application.port());
    let _ = actix_web::rt::spawn(async move {
        application
            .start()
            .await
            .expect("Expected application to start");
    });

    let app = TestApp { config };
    (app, reqwest::Client::new(), address)
}
