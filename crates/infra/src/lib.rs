mod config;
mod repos;
mod services;
mod system;

pub use config::{clamp_interval, parse_backoff, Config};
pub use repos::{
    DeleteResult, DeviceUpsert, IAccountRepo, IDeviceTokenRepo, IEpisodeRepo, IReminderRepo,
    IScheduledPushRepo, ITreatmentDataRepo, Repos, TreatmentRecord,
};
pub use services::*;
use std::sync::Arc;
pub use system::{ISys, RealSys, StaticTimeSys};

#[derive(Clone)]
pub struct CarelinkContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub push_gateway: Arc<dyn IPushGateway>,
}

/// Will setup the infrastructure context given the environment
pub fn setup_context() -> CarelinkContext {
    let config = Config::new();
    let push_gateway = Arc::new(FcmGateway::new(&config));
    CarelinkContext {
        repos: Repos::create_inmemory(),
        config,
        sys: Arc::new(RealSys {}),
        push_gateway,
    }
}

/// Context wired for tests: stub push gateway handed back for scripting
/// outcomes and inspecting sends. Swap `sys` for a `StaticTimeSys` to pin
/// the clock.
pub fn setup_test_context() -> (CarelinkContext, Arc<StubPushGateway>) {
    let gateway = Arc::new(StubPushGateway::new());
    let ctx = CarelinkContext {
        repos: Repos::create_inmemory(),
        config: Config::new(),
        sys: Arc::new(RealSys {}),
        push_gateway: gateway.clone(),
    };
    (ctx, gateway)
}
