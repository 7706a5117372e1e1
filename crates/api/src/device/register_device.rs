use crate::{
    dispatch::send_to_account_devices,
    error::CarelinkError,
    shared::{
        auth::protect_route,
        usecase::{execute, Subscriber, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use carelink_api_structs::register_device::{APIResponse, RequestBody};
use carelink_domain::{timing, DeviceToken, Reminder, ID};
use carelink_infra::{CarelinkContext, DeviceUpsert, PushNote};
use chrono::{DateTime, NaiveDateTime, Utc};
use std::collections::HashMap;
use tracing::{info, warn};

pub async fn register_device_controller(
    http_req: HttpRequest,
    ctx: web::Data<CarelinkContext>,
    body: web::Json<RequestBody>,
) -> Result<HttpResponse, CarelinkError> {
    let account = protect_route(&http_req, &ctx).await?;

    let body = body.0;
    let usecase = RegisterDeviceUseCase {
        account_id: account.id,
        platform: body.platform,
        token: body.token,
        local_reminders_enabled: body.local_reminders_enabled.unwrap_or(false),
    };
    execute(usecase, &ctx)
        .await
        .map(|device| HttpResponse::Ok().json(APIResponse::new(device)))
        .map_err(CarelinkError::from)
}

/// Upserts by token value: a token that moves to another account is
/// reassigned rather than duplicated, since FCM tokens identify an app
/// install, not a user.
#[derive(Debug)]
pub struct RegisterDeviceUseCase {
    pub account_id: ID,
    pub platform: String,
    pub token: String,
    pub local_reminders_enabled: bool,
}

#[derive(Debug)]
pub enum UseCaseError {
    EmptyToken,
    StorageError,
}

impl From<UseCaseError> for CarelinkError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::EmptyToken => Self::BadClientData("Empty device token provided".into()),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for RegisterDeviceUseCase {
    type Response = DeviceToken;

    type Error = UseCaseError;

    const NAME: &'static str = "RegisterDevice";

    async fn execute(&mut self, ctx: &CarelinkContext) -> Result<Self::Response, Self::Error> {
        if self.token.trim().is_empty() {
            return Err(UseCaseError::EmptyToken);
        }

        let now = ctx.sys.now();
        let device = ctx
            .repos
            .device_tokens
            .upsert_by_token(
                DeviceUpsert {
                    account_id: self.account_id.clone(),
                    platform: self.platform.clone(),
                    token: self.token.clone(),
                    local_reminders_enabled: self.local_reminders_enabled,
                },
                now,
            )
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        if ctx.config.single_device_per_account {
            let res = ctx
                .repos
                .device_tokens
                .delete_others_for_account(&self.account_id, &device.id)
                .await;
            if res.deleted_count > 0 {
                info!(
                    account_id = %self.account_id,
                    removed = res.deleted_count,
                    "Removed superseded device tokens"
                );
            }
        }

        Ok(device)
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(CatchUpMissedReminders {})]
    }
}

/// After a device (re)registers, immediately deliver reminders whose slot
/// passed earlier today while the account had no usable token. Bounded by
/// the catch-up window so a device that was off for a week does not get a
/// burst of stale notifications.
pub struct CatchUpMissedReminders {}

impl CatchUpMissedReminders {
    fn missed(reminder: &Reminder, now: DateTime<Utc>, window_minutes: i64) -> bool {
        if !reminder.active || reminder.acked_today(now) {
            return false;
        }
        let now_local = timing::local_now(now, &reminder.timezone).naive_local();
        let scheduled_today = match chrono::NaiveTime::from_hms_opt(reminder.hour, reminder.minute, 0)
        {
            Some(t) => NaiveDateTime::new(now_local.date(), t),
            None => return false,
        };
        let late_by = now_local - scheduled_today;
        late_by >= chrono::Duration::zero() && late_by <= chrono::Duration::minutes(window_minutes)
    }
}

#[async_trait::async_trait(?Send)]
impl Subscriber<RegisterDeviceUseCase> for CatchUpMissedReminders {
    async fn notify(&self, device: &DeviceToken, ctx: &CarelinkContext) {
        if !ctx.config.catchup_on_register {
            return;
        }
        let now = ctx.sys.now();
        let window = ctx.config.catchup_window_minutes;
        let reminders = ctx.repos.reminders.find_by_account(&device.account_id).await;

        for mut reminder in reminders {
            if !Self::missed(&reminder, now, window) {
                continue;
            }
            let mut data = HashMap::new();
            data.insert("type".to_string(), "reminder".to_string());
            data.insert("reminderId".to_string(), reminder.id.as_string());
            let note = PushNote {
                title: reminder.title.clone(),
                body: reminder.body.clone(),
                data,
                ttl_seconds: Some((ctx.config.max_late_minutes.max(0) as u64) * 60),
                channel_hint: Some("reminders".into()),
            };
            let summary =
                send_to_account_devices(ctx, &device.account_id, &note, false, now).await;
            if summary.delivered > 0 {
                reminder.record_success(now);
                if let Err(e) = ctx.repos.reminders.save(&reminder).await {
                    warn!("Failed to store caught-up reminder: {:?}", e);
                }
                info!(reminder_id = %reminder.id, "Caught up missed reminder on register");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carelink_infra::{setup_test_context, StaticTimeSys};
    use std::sync::Arc;

    fn utc(s: &str) -> DateTime<Utc> {
        s.parse().expect("Valid RFC3339 timestamp")
    }

    fn register(account_id: ID, token: &str) -> RegisterDeviceUseCase {
        RegisterDeviceUseCase {
            account_id,
            platform: "android".into(),
            token: token.into(),
            local_reminders_enabled: false,
        }
    }

    #[actix_web::main]
    #[test]
    async fn registering_catches_up_a_reminder_missed_earlier_today() {
        let (mut ctx, gateway) = setup_test_context();
        // 10:00 IST, one hour past the 09:00 slot, inside the window.
        let now = utc("2025-01-01T04:30:00Z");
        ctx.sys = Arc::new(StaticTimeSys { time: now });
        let account_id = ID::new();
        let reminder = Reminder::new(
            account_id.clone(),
            "Medication".into(),
            "Dose".into(),
            9,
            0,
            "Asia/Kolkata".into(),
            true,
            20,
            utc("2025-01-01T00:00:00Z"),
        );
        ctx.repos.reminders.insert(&reminder).await.unwrap();

        execute(register(account_id, "tok-1"), &ctx).await.unwrap();
        assert_eq!(gateway.sends().len(), 1);
        assert_eq!(gateway.sends()[0].title, "Medication");

        let stored = ctx.repos.reminders.find(&reminder.id).await.unwrap();
        assert_eq!(stored.last_sent_utc, Some(now));
        // Advanced past today's slot, so the dispatcher will not resend.
        assert!(stored.next_fire_utc > now);
    }

    #[actix_web::main]
    #[test]
    async fn catchup_skips_acked_and_not_yet_due_reminders() {
        let (mut ctx, gateway) = setup_test_context();
        let now = utc("2025-01-01T04:30:00Z");
        ctx.sys = Arc::new(StaticTimeSys { time: now });
        let account_id = ID::new();

        let mut acked = Reminder::new(
            account_id.clone(),
            "Acked".into(),
            "b".into(),
            9,
            0,
            "Asia/Kolkata".into(),
            true,
            20,
            utc("2025-01-01T00:00:00Z"),
        );
        acked.acknowledge(now);
        ctx.repos.reminders.insert(&acked).await.unwrap();

        // Today's 21:00 slot has not arrived yet, so nothing was missed.
        let upcoming = Reminder::new(
            account_id.clone(),
            "Evening".into(),
            "b".into(),
            21,
            0,
            "Asia/Kolkata".into(),
            true,
            20,
            utc("2024-12-31T00:00:00Z"),
        );
        ctx.repos.reminders.insert(&upcoming).await.unwrap();

        execute(register(account_id, "tok-1"), &ctx).await.unwrap();
        assert!(gateway.sends().is_empty());
    }

    #[actix_web::main]
    #[test]
    async fn reregistering_the_same_token_keeps_one_row() {
        let (ctx, _gateway) = setup_test_context();
        let account_id = ID::new();
        let first = execute(register(account_id.clone(), "tok-1"), &ctx)
            .await
            .unwrap();
        let second = execute(register(account_id.clone(), "tok-1"), &ctx)
            .await
            .unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(
            ctx.repos.device_tokens.find_by_account(&account_id).await.len(),
            1
        );
    }

    #[actix_web::main]
    #[test]
    async fn rejects_an_empty_token() {
        let (ctx, _gateway) = setup_test_context();
        assert!(execute(register(ID::new(), "  "), &ctx).await.is_err());
    }
}
