use carelink_utils::create_random_secret;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    /// Secret code used to create new `Account`s
    pub create_account_secret_code: String,
    /// Secret guarding the external dispatch trigger endpoint
    pub cron_secret: String,
    /// Port for the application to run on
    pub port: usize,
    /// Seconds between dispatch passes, clamped to at least 5
    pub dispatch_interval_secs: u64,
    /// Whether the periodic dispatch driver runs at all
    pub scheduler_enabled: bool,
    /// Maximum reminder delivery attempts per calendar day
    pub reminder_max_attempts: u32,
    /// Backoff ladder in seconds, indexed by attempt count
    pub reminder_backoff: Vec<u64>,
    /// Grace minutes applied when a reminder is created without one
    pub default_grace_minutes: i64,
    /// Bypass ack/grace/local-capable checks; send every due reminder
    pub server_only: bool,
    /// Keep exactly one live device token per account
    pub single_device_per_account: bool,
    /// Send missed reminders right after a device (re)registers
    pub catchup_on_register: bool,
    /// How stale a missed reminder may be and still get a catch-up send
    pub catchup_window_minutes: i64,
    /// TTL handed to the push transport so late deliveries get dropped
    pub max_late_minutes: i64,
    /// Timeout for each outbound push call
    pub push_timeout_secs: u64,
    /// Legacy FCM server key
    pub fcm_server_key: Option<String>,
    /// FCM v1 API project id + OAuth access token
    pub fcm_project_id: Option<String>,
    pub fcm_access_token: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        let create_account_secret_code = secret_from_env("CREATE_ACCOUNT_SECRET_CODE");
        let cron_secret = secret_from_env("CRON_SECRET");

        let port = parse_env("PORT", 5000usize);
        let dispatch_interval_secs = clamp_interval(parse_env("DISPATCH_INTERVAL_SECS", 5u64));
        let scheduler_enabled = parse_env("SCHEDULER_ENABLED", true);
        let reminder_max_attempts = parse_env("REMINDER_MAX_ATTEMPTS", 3u32);
        let reminder_backoff = match std::env::var("REMINDER_BACKOFF") {
            Ok(raw) => match parse_backoff(&raw) {
                Some(ladder) => ladder,
                None => {
                    warn!(
                        "The given REMINDER_BACKOFF: {} is not a comma separated list of seconds, falling back to the default ladder.",
                        raw
                    );
                    default_backoff()
                }
            },
            Err(_) => default_backoff(),
        };
        let default_grace_minutes = parse_env("REMINDER_DEFAULT_GRACE", 20i64);
        let server_only = parse_env("REMINDERS_SERVER_ONLY", false);
        let single_device_per_account = parse_env("PUSH_SINGLE_DEVICE", true);
        let catchup_on_register = parse_env("REMINDER_CATCHUP_ON_REGISTER", true);
        let catchup_window_minutes = parse_env("REMINDER_CATCHUP_WINDOW_MIN", 720i64);
        let max_late_minutes = parse_env("PUSH_MAX_LATE_MIN", 60i64);
        let push_timeout_secs = parse_env("FCM_HTTP_TIMEOUT_SECS", 5u64);

        Self {
            create_account_secret_code,
            cron_secret,
            port,
            dispatch_interval_secs,
            scheduler_enabled,
            reminder_max_attempts,
            reminder_backoff,
            default_grace_minutes,
            server_only,
            single_device_per_account,
            catchup_on_register,
            catchup_window_minutes,
            max_late_minutes,
            push_timeout_secs,
            fcm_server_key: std::env::var("FCM_SERVER_KEY").ok(),
            fcm_project_id: std::env::var("FCM_PROJECT_ID").ok(),
            fcm_access_token: std::env::var("FCM_ACCESS_TOKEN").ok(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn secret_from_env(var: &str) -> String {
    match std::env::var(var) {
        Ok(code) => code,
        Err(_) => {
            info!("Did not find {} environment variable. Going to create one.", var);
            let code = create_random_secret(16);
            info!("{} was generated and set to: {}", var, code);
            code
        }
    }
}

fn parse_env<T: std::str::FromStr + std::fmt::Display + Copy>(var: &str, default: T) -> T {
    match std::env::var(var) {
        Ok(raw) => match raw.parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                warn!(
                    "The given {}: {} is not valid, falling back to the default: {}.",
                    var, raw, default
                );
                default
            }
        },
        Err(_) => default,
    }
}

fn default_backoff() -> Vec<u64> {
    vec![120, 300, 600]
}

/// Parses a comma separated ladder like "120,300,600". Empty or partially
/// malformed input is rejected as a whole.
pub fn parse_backoff(raw: &str) -> Option<Vec<u64>> {
    let ladder = raw
        .split(',')
        .map(|part| part.trim().parse::<u64>())
        .collect::<Result<Vec<_>, _>>()
        .ok()?;
    if ladder.is_empty() {
        None
    } else {
        Some(ladder)
    }
}

/// Dispatch passes below 5s apart give overlapping passes no room to
/// finish, so shorter intervals are rounded up.
pub fn clamp_interval(secs: u64) -> u64 {
    secs.max(5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_backoff_ladder() {
        assert_eq!(parse_backoff("120,300,600"), Some(vec![120, 300, 600]));
        assert_eq!(parse_backoff("60"), Some(vec![60]));
        assert_eq!(parse_backoff(" 30 , 90 "), Some(vec![30, 90]));
    }

    #[test]
    fn rejects_malformed_backoff_ladders() {
        assert_eq!(parse_backoff(""), None);
        assert_eq!(parse_backoff("120,abc"), None);
        assert_eq!(parse_backoff("120,,300"), None);
    }

    #[test]
    fn clamps_short_dispatch_intervals() {
        assert_eq!(clamp_interval(0), 5);
        assert_eq!(clamp_interval(4), 5);
        assert_eq!(clamp_interval(5), 5);
        assert_eq!(clamp_interval(60), 60);
    }
}
