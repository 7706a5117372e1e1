use super::delivery::send_to_account_devices;
use crate::shared::usecase::UseCase;
use carelink_api_structs::dtos::DispatchReportDTO;
use carelink_domain::{DeliveryStatus, Reminder, RetryPolicy, ScheduledPush};
use carelink_infra::{CarelinkContext, PushNote};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::{info, warn};

/// One pass over everything due: scheduled one-shot pushes first, then
/// reminders. Shared by the periodic driver and the manual trigger
/// endpoint. Failures on one item are counted and never abort the pass.
#[derive(Debug)]
pub struct DispatchDueUseCase;

#[derive(Debug)]
pub enum UseCaseError {}

#[async_trait::async_trait(?Send)]
impl UseCase for DispatchDueUseCase {
    type Response = DispatchReportDTO;
    type Error = UseCaseError;

    const NAME: &'static str = "DispatchDue";

    async fn execute(&mut self, ctx: &CarelinkContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.now();
        let mut report = DispatchReportDTO::default();

        let due_pushes = ctx.repos.scheduled_pushes.find_due(now).await;
        report.pushes_due = due_pushes.len();
        for mut push in due_pushes {
            match dispatch_one_scheduled_push(ctx, &mut push, now).await {
                Ok(sent_tokens) => report.pushes_sent_tokens += sent_tokens,
                Err(e) => {
                    warn!(push_id = %push.id, "Scheduled push dispatch failed: {:?}", e);
                    report.errors += 1;
                }
            }
        }

        let policy = RetryPolicy {
            max_attempts_per_day: ctx.config.reminder_max_attempts,
            backoff_seconds: ctx.config.reminder_backoff.clone(),
        };
        let due_reminders = ctx.repos.reminders.find_due(now).await;
        report.reminders_due = due_reminders.len();
        for mut reminder in due_reminders {
            match dispatch_one_reminder(ctx, &mut reminder, &policy, now).await {
                Ok(decision) => record_decision(&mut report, decision),
                Err(e) => {
                    warn!(reminder_id = %reminder.id, "Reminder dispatch failed: {:?}", e);
                    report.errors += 1;
                }
            }
        }

        info!(
            pushes_due = report.pushes_due,
            reminders_due = report.reminders_due,
            delivered = report.reminders_delivered,
            retrying = report.reminders_retrying,
            errors = report.errors,
            "Dispatch pass finished"
        );
        Ok(report)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReminderDecision {
    AckSkipped,
    GraceSkipped,
    NoTokens,
    Delivered,
    Retry,
    TokenInvalid,
    FailedPermanent,
}

fn record_decision(report: &mut DispatchReportDTO, decision: ReminderDecision) {
    match decision {
        ReminderDecision::AckSkipped => report.reminders_ack_skipped += 1,
        ReminderDecision::GraceSkipped => report.reminders_grace_skipped += 1,
        ReminderDecision::NoTokens => report.reminders_no_tokens += 1,
        ReminderDecision::Delivered => report.reminders_delivered += 1,
        ReminderDecision::Retry => report.reminders_retrying += 1,
        ReminderDecision::TokenInvalid => report.reminders_token_invalid += 1,
        ReminderDecision::FailedPermanent => report.reminders_failed_permanent += 1,
    }
}

fn reminder_note(reminder: &Reminder, ttl_minutes: i64) -> PushNote {
    let mut data = HashMap::new();
    data.insert("type".to_string(), "reminder".to_string());
    data.insert("reminderId".to_string(), reminder.id.as_string());
    PushNote {
        title: reminder.title.clone(),
        body: reminder.body.clone(),
        data,
        ttl_seconds: Some((ttl_minutes.max(0) as u64) * 60),
        channel_hint: Some("reminders".into()),
    }
}

/// Classification of one due reminder, per the state machine: ack skip,
/// grace skip, no-tokens terminal, send, or retry via the backoff ladder.
async fn dispatch_one_reminder(
    ctx: &CarelinkContext,
    reminder: &mut Reminder,
    policy: &RetryPolicy,
    now: DateTime<Utc>,
) -> anyhow::Result<ReminderDecision> {
    let server_only = ctx.config.server_only;

    if !server_only {
        if reminder.acked_today(now) {
            // Confirmed through another channel, nothing to send today.
            reminder.advance_to_next_occurrence(now);
            ctx.repos.reminders.save(reminder).await?;
            return Ok(ReminderDecision::AckSkipped);
        }
        if reminder.within_grace_window(now) {
            // Leave untouched; a later pass re-evaluates after the window.
            return Ok(ReminderDecision::GraceSkipped);
        }
    }

    let note = reminder_note(reminder, ctx.config.max_late_minutes);
    let summary =
        send_to_account_devices(ctx, &reminder.account_id, &note, !server_only, now).await;

    if summary.requested == 0 {
        reminder.record_no_tokens(now);
        ctx.repos.reminders.save(reminder).await?;
        return Ok(ReminderDecision::NoTokens);
    }

    let decision = if summary.delivered > 0 {
        reminder.record_success(now);
        ReminderDecision::Delivered
    } else {
        reminder.record_failure(now, summary.any_token_invalid, policy);
        match reminder.last_delivery_status {
            Some(DeliveryStatus::TokenInvalid) => ReminderDecision::TokenInvalid,
            Some(DeliveryStatus::FailedPermanent) => ReminderDecision::FailedPermanent,
            _ => ReminderDecision::Retry,
        }
    };
    ctx.repos.reminders.save(reminder).await?;
    info!(
        reminder_id = %reminder.id,
        decision = ?decision,
        tokens = summary.requested,
        sent_tokens = summary.delivered,
        attempts_today = reminder.attempts_today,
        "Reminder dispatched"
    );
    Ok(decision)
}

/// Sends one due scheduled push to every active token of its account and
/// marks it sent regardless of per-token success. One attempt per row,
/// ever.
pub async fn dispatch_one_scheduled_push(
    ctx: &CarelinkContext,
    push: &mut ScheduledPush,
    now: DateTime<Utc>,
) -> anyhow::Result<usize> {
    let mut data = HashMap::new();
    data.insert("type".to_string(), "scheduled_push".to_string());
    data.insert("pushId".to_string(), push.id.as_string());
    let note = PushNote {
        title: push.title.clone(),
        body: push.body.clone(),
        data,
        ttl_seconds: Some((ctx.config.max_late_minutes.max(0) as u64) * 60),
        channel_hint: None,
    };

    let summary = send_to_account_devices(ctx, &push.account_id, &note, false, now).await;
    push.mark_sent(now);
    ctx.repos.scheduled_pushes.save(push).await?;
    Ok(summary.delivered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::usecase::execute;
    use carelink_domain::ID;
    use carelink_infra::{
        setup_test_context, DeviceUpsert, PushErrorClass, PushOutcome, StaticTimeSys,
        StubPushGateway,
    };
    use chrono::Duration;
    use std::sync::Arc;

    fn utc(s: &str) -> DateTime<Utc> {
        s.parse().expect("Valid RFC3339 timestamp")
    }

    fn ctx_at(now: DateTime<Utc>) -> (CarelinkContext, Arc<StubPushGateway>) {
        let (mut ctx, gateway) = setup_test_context();
        ctx.sys = Arc::new(StaticTimeSys { time: now });
        (ctx, gateway)
    }

    fn pin(ctx: &mut CarelinkContext, now: DateTime<Utc>) {
        ctx.sys = Arc::new(StaticTimeSys { time: now });
    }

    async fn seed_reminder(ctx: &CarelinkContext, account_id: &ID) -> Reminder {
        // 09:00 Asia/Kolkata = 03:30Z, 20 minute grace.
        let reminder = Reminder::new(
            account_id.clone(),
            "Medication".into(),
            "Time for your dose".into(),
            9,
            0,
            "Asia/Kolkata".into(),
            true,
            20,
            utc("2025-01-01T00:00:00Z"),
        );
        ctx.repos.reminders.insert(&reminder).await.unwrap();
        reminder
    }

    async fn seed_device(ctx: &CarelinkContext, account_id: &ID, token: &str, local: bool) {
        ctx.repos
            .device_tokens
            .upsert_by_token(
                DeviceUpsert {
                    account_id: account_id.clone(),
                    platform: "android".into(),
                    token: token.into(),
                    local_reminders_enabled: local,
                },
                utc("2025-01-01T00:00:00Z"),
            )
            .await
            .unwrap();
    }

    async fn run_pass(ctx: &CarelinkContext) -> DispatchReportDTO {
        match execute(DispatchDueUseCase, ctx).await {
            Ok(report) => report,
            Err(e) => match e {},
        }
    }

    #[actix_web::main]
    #[test]
    async fn acknowledged_reminder_is_skipped_and_advanced() {
        let now = utc("2025-01-01T03:55:00Z");
        let (ctx, gateway) = ctx_at(now);
        let account_id = ID::new();
        let mut reminder = seed_reminder(&ctx, &account_id).await;
        seed_device(&ctx, &account_id, "tok-1", false).await;
        reminder.acknowledge(now);
        ctx.repos.reminders.save(&reminder).await.unwrap();
        // Force it due for this pass.
        let mut due = reminder.clone();
        due.next_fire_utc = now - Duration::minutes(1);
        ctx.repos.reminders.save(&due).await.unwrap();

        let report = run_pass(&ctx).await;
        assert_eq!(report.reminders_ack_skipped, 1);
        assert_eq!(report.reminders_delivered, 0);
        assert!(gateway.sends().is_empty());

        let stored = ctx.repos.reminders.find(&reminder.id).await.unwrap();
        assert_eq!(stored.next_fire_utc, utc("2025-01-02T03:30:00Z"));
        assert_eq!(stored.attempts_today, 0);
    }

    #[actix_web::main]
    #[test]
    async fn grace_window_defers_without_touching_state() {
        // 03:35Z is 5 minutes past the 09:00 IST slot, inside 20min grace.
        let now = utc("2025-01-01T03:35:00Z");
        let (ctx, gateway) = ctx_at(now);
        let account_id = ID::new();
        let reminder = seed_reminder(&ctx, &account_id).await;
        seed_device(&ctx, &account_id, "tok-1", false).await;

        let report = run_pass(&ctx).await;
        assert_eq!(report.reminders_grace_skipped, 1);
        assert!(gateway.sends().is_empty());
        let stored = ctx.repos.reminders.find(&reminder.id).await.unwrap();
        assert_eq!(stored.next_fire_utc, reminder.next_fire_utc);
    }

    #[actix_web::main]
    #[test]
    async fn delivered_reminder_advances_to_tomorrow() {
        // 25 minutes past the slot, past the grace window.
        let now = utc("2025-01-01T03:55:00Z");
        let (ctx, gateway) = ctx_at(now);
        let account_id = ID::new();
        let reminder = seed_reminder(&ctx, &account_id).await;
        seed_device(&ctx, &account_id, "tok-1", false).await;

        let report = run_pass(&ctx).await;
        assert_eq!(report.reminders_delivered, 1);
        assert_eq!(gateway.sends().len(), 1);
        assert_eq!(gateway.sends()[0].token, "tok-1");

        let stored = ctx.repos.reminders.find(&reminder.id).await.unwrap();
        assert_eq!(stored.last_sent_utc, Some(now));
        assert_eq!(stored.next_fire_utc, utc("2025-01-02T03:30:00Z"));
        assert_eq!(stored.attempts_today, 0);
        assert_eq!(stored.last_delivery_status, Some(DeliveryStatus::Delivered));
    }

    #[actix_web::main]
    #[test]
    async fn three_failing_passes_end_in_failed_permanent() {
        let mut now = utc("2025-01-01T03:55:00Z");
        let (mut ctx, gateway) = ctx_at(now);
        let account_id = ID::new();
        let reminder = seed_reminder(&ctx, &account_id).await;
        seed_device(&ctx, &account_id, "tok-1", false).await;

        for pass in 0..3 {
            gateway.script_outcome(PushOutcome::failed(
                PushErrorClass::Transient,
                r#"{"error":{"status":"UNAVAILABLE"}}"#,
            ));
            pin(&mut ctx, now);
            let report = run_pass(&ctx).await;
            if pass < 2 {
                assert_eq!(report.reminders_retrying, 1, "pass {}", pass);
            } else {
                assert_eq!(report.reminders_failed_permanent, 1);
            }
            let stored = ctx.repos.reminders.find(&reminder.id).await.unwrap();
            now = stored.next_fire_utc + Duration::seconds(1);
        }

        let stored = ctx.repos.reminders.find(&reminder.id).await.unwrap();
        assert_eq!(
            stored.last_delivery_status,
            Some(DeliveryStatus::FailedPermanent)
        );
        assert_eq!(stored.attempts_today, 0);
        assert_eq!(stored.next_fire_utc, utc("2025-01-02T03:30:00Z"));
        assert_eq!(gateway.sends().len(), 3);
    }

    #[actix_web::main]
    #[test]
    async fn token_invalid_failure_deactivates_the_device() {
        let now = utc("2025-01-01T03:55:00Z");
        let (ctx, gateway) = ctx_at(now);
        let account_id = ID::new();
        seed_reminder(&ctx, &account_id).await;
        seed_device(&ctx, &account_id, "tok-dead", false).await;
        gateway.script_outcome(PushOutcome::failed(
            PushErrorClass::TokenInvalid,
            r#"{"results":[{"error":"NotRegistered"}]}"#,
        ));

        let report = run_pass(&ctx).await;
        assert_eq!(report.reminders_token_invalid + report.reminders_retrying, 1);
        let device = ctx
            .repos
            .device_tokens
            .find_by_token("tok-dead")
            .await
            .unwrap();
        assert!(!device.active);
        assert!(device.deactivated_reason.is_some());
    }

    #[actix_web::main]
    #[test]
    async fn no_eligible_tokens_is_terminal_for_the_day() {
        let now = utc("2025-01-01T03:55:00Z");
        let (ctx, gateway) = ctx_at(now);
        let account_id = ID::new();
        let reminder = seed_reminder(&ctx, &account_id).await;

        let report = run_pass(&ctx).await;
        assert_eq!(report.reminders_no_tokens, 1);
        assert!(gateway.sends().is_empty());
        let stored = ctx.repos.reminders.find(&reminder.id).await.unwrap();
        assert_eq!(stored.last_delivery_status, Some(DeliveryStatus::NoTokens));
        assert_eq!(stored.next_fire_utc, utc("2025-01-02T03:30:00Z"));
    }

    #[actix_web::main]
    #[test]
    async fn local_capable_tokens_are_excluded_from_server_sends() {
        let now = utc("2025-01-01T03:55:00Z");
        let (ctx, gateway) = ctx_at(now);
        let account_id = ID::new();
        seed_reminder(&ctx, &account_id).await;
        seed_device(&ctx, &account_id, "tok-local", true).await;

        let report = run_pass(&ctx).await;
        // The only token self-schedules, so there is nothing to send to.
        assert_eq!(report.reminders_no_tokens, 1);
        assert!(gateway.sends().is_empty());
    }

    #[actix_web::main]
    #[test]
    async fn server_only_mode_bypasses_ack_grace_and_local_exclusion() {
        // Inside the grace window and acked, but server-only sends anyway.
        let now = utc("2025-01-01T03:35:00Z");
        let (mut ctx, gateway) = ctx_at(now);
        ctx.config.server_only = true;
        let account_id = ID::new();
        let mut reminder = seed_reminder(&ctx, &account_id).await;
        seed_device(&ctx, &account_id, "tok-local", true).await;
        reminder.acknowledge(now);
        reminder.next_fire_utc = now - Duration::minutes(1);
        ctx.repos.reminders.save(&reminder).await.unwrap();

        let report = run_pass(&ctx).await;
        assert_eq!(report.reminders_delivered, 1);
        assert_eq!(gateway.sends().len(), 1);
    }

    #[actix_web::main]
    #[test]
    async fn scheduled_push_is_sent_exactly_once() {
        let now = utc("2025-01-01T10:00:00Z");
        let (ctx, gateway) = ctx_at(now);
        let account_id = ID::new();
        seed_device(&ctx, &account_id, "tok-1", false).await;
        let push = ScheduledPush::new(
            account_id,
            "Checkup".into(),
            "See you at 4".into(),
            utc("2025-01-01T09:00:00Z"),
            utc("2025-01-01T08:00:00Z"),
        );
        ctx.repos.scheduled_pushes.insert(&push).await.unwrap();

        let report = run_pass(&ctx).await;
        assert_eq!(report.pushes_due, 1);
        assert_eq!(report.pushes_sent_tokens, 1);

        let second = run_pass(&ctx).await;
        assert_eq!(second.pushes_due, 0);
        assert_eq!(gateway.sends().len(), 1);

        let stored = ctx.repos.scheduled_pushes.find(&push.id).await.unwrap();
        assert!(stored.sent);
        assert_eq!(stored.sent_at, Some(now));
    }

    #[actix_web::main]
    #[test]
    async fn scheduled_push_is_marked_sent_even_when_delivery_fails() {
        let now = utc("2025-01-01T10:00:00Z");
        let (ctx, gateway) = ctx_at(now);
        let account_id = ID::new();
        seed_device(&ctx, &account_id, "tok-1", false).await;
        gateway.script_outcome(PushOutcome::failed(
            PushErrorClass::Transient,
            r#"{"error":{"status":"UNAVAILABLE"}}"#,
        ));
        let push = ScheduledPush::new(
            account_id,
            "Checkup".into(),
            "See you at 4".into(),
            now,
            now,
        );
        ctx.repos.scheduled_pushes.insert(&push).await.unwrap();

        let report = run_pass(&ctx).await;
        assert_eq!(report.pushes_sent_tokens, 0);
        let stored = ctx.repos.scheduled_pushes.find(&push.id).await.unwrap();
        assert!(stored.sent);
    }
}
