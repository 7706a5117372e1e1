use crate::dispatch::DispatchDueUseCase;
use crate::shared::usecase::execute;
use carelink_api_structs::dtos::DispatchReportDTO;
use carelink_infra::{clamp_interval, CarelinkContext};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// A snapshot of what the driver has done so far.
#[derive(Debug, Default, Clone)]
pub struct DispatchStatus {
    pub passes: u64,
    pub last_started_at: Option<DateTime<Utc>>,
    pub last_finished_at: Option<DateTime<Utc>>,
    pub last_report: Option<DispatchReportDTO>,
}

/// Owns the single dispatch lock. The periodic job and the manual
/// `/dispatch/due` endpoint both go through `trigger`, so at most one
/// pass runs at a time; a caller that finds the lock held reports busy
/// instead of queueing a second pass.
pub struct DispatchDriver {
    ctx: CarelinkContext,
    lock: tokio::sync::Mutex<()>,
    status: std::sync::Mutex<DispatchStatus>,
}

impl DispatchDriver {
    pub fn new(ctx: CarelinkContext) -> Self {
        Self {
            ctx,
            lock: tokio::sync::Mutex::new(()),
            status: std::sync::Mutex::new(DispatchStatus::default()),
        }
    }

    /// Runs one dispatch pass, or returns `None` when a pass is already
    /// in flight.
    pub async fn trigger(&self) -> Option<DispatchReportDTO> {
        let _guard = match self.lock.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                info!("Dispatch pass already running, skipping");
                return None;
            }
        };

        let started = self.ctx.sys.now();
        if let Ok(mut status) = self.status.lock() {
            status.last_started_at = Some(started);
        }

        let report = match execute(DispatchDueUseCase, &self.ctx).await {
            Ok(report) => report,
            Err(e) => match e {},
        };

        if let Ok(mut status) = self.status.lock() {
            status.passes += 1;
            status.last_finished_at = Some(self.ctx.sys.now());
            status.last_report = Some(report.clone());
        }
        Some(report)
    }

    pub fn status(&self) -> DispatchStatus {
        self.status
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }
}

/// Ticks the driver on the configured interval. The first tick of a
/// tokio interval fires immediately, which doubles as a catch-up pass
/// right after boot.
pub fn start_dispatch_job(driver: Arc<DispatchDriver>, interval_secs: u64) {
    let every = clamp_interval(interval_secs);
    actix_web::rt::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(every));
        loop {
            ticker.tick().await;
            driver.trigger().await;
        }
    });
}
