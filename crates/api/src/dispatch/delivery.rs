use carelink_domain::ID;
use carelink_infra::{CarelinkContext, PushNote};
use chrono::{DateTime, Utc};
use tracing::{info, warn};

#[derive(Debug, Default, Clone, Copy)]
pub struct SendSummary {
    pub requested: usize,
    pub delivered: usize,
    pub any_token_invalid: bool,
}

/// Only the tail of a token is ever logged.
fn token_tail(token: &str) -> String {
    let tail: String = token
        .chars()
        .rev()
        .take(6)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("..{}", tail)
}

/// Sends one note to every eligible device token the account holds.
/// Token-invalid outcomes deactivate the token in place so later passes
/// stop wasting attempts on it.
pub async fn send_to_account_devices(
    ctx: &CarelinkContext,
    account_id: &ID,
    note: &PushNote,
    exclude_local_capable: bool,
    now: DateTime<Utc>,
) -> SendSummary {
    let devices = ctx.repos.device_tokens.find_by_account(account_id).await;
    let eligible: Vec<_> = devices
        .into_iter()
        .filter(|d| d.active && !(exclude_local_capable && d.local_reminders_enabled))
        .collect();

    let mut summary = SendSummary {
        requested: eligible.len(),
        ..Default::default()
    };
    for mut device in eligible {
        let outcome = ctx.push_gateway.send(&device.token, note).await;
        if outcome.delivered {
            summary.delivered += 1;
            continue;
        }
        info!(
            token = %token_tail(&device.token),
            status = ?outcome.http_status,
            error_class = ?outcome.error_class,
            "Push delivery failed"
        );
        if outcome.token_invalid() {
            summary.any_token_invalid = true;
            let reason = outcome
                .response_snippet
                .clone()
                .unwrap_or_else(|| "token_invalid".into());
            device.deactivate(&reason, now);
            if let Err(e) = ctx.repos.device_tokens.save(&device).await {
                warn!("Failed to deactivate device token: {:?}", e);
            }
        }
    }
    summary
}
