mod fcm;
mod stub;

use serde::Serialize;
use std::collections::HashMap;

pub use fcm::FcmGateway;
pub use stub::{RecordedSend, StubPushGateway};

/// Stable classification of a failed push, derived from transport error
/// text. This is the contract between transport and scheduler: it drives
/// token deactivation and retry policy, and must survive transport swaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PushErrorClass {
    /// The destination token will never succeed again; deactivate it.
    TokenInvalid,
    /// Worth retrying later.
    Transient,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PushTransport {
    V1,
    Legacy,
}

/// One notification handed to the transport. `ttl_seconds` bounds how long
/// the delivery system may hold the message before discarding it, so a
/// reminder is never delivered many hours late to a device that was offline.
#[derive(Debug, Clone, Default)]
pub struct PushNote {
    pub title: String,
    pub body: String,
    pub data: HashMap<String, String>,
    pub ttl_seconds: Option<u64>,
    pub channel_hint: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PushOutcome {
    pub delivered: bool,
    pub http_status: Option<u16>,
    pub response_snippet: Option<String>,
    pub transport_used: Option<PushTransport>,
    pub error_class: Option<PushErrorClass>,
}

impl PushOutcome {
    pub fn delivered() -> Self {
        Self {
            delivered: true,
            http_status: Some(200),
            response_snippet: None,
            transport_used: None,
            error_class: None,
        }
    }

    pub fn failed(error_class: PushErrorClass, snippet: &str) -> Self {
        Self {
            delivered: false,
            http_status: None,
            response_snippet: Some(snippet.to_string()),
            transport_used: None,
            error_class: Some(error_class),
        }
    }

    pub fn token_invalid(&self) -> bool {
        self.error_class == Some(PushErrorClass::TokenInvalid)
    }
}

/// Sends one notification to one device token. No retry logic here; the
/// scheduler owns that.
#[async_trait::async_trait]
pub trait IPushGateway: Send + Sync {
    async fn send(&self, token: &str, note: &PushNote) -> PushOutcome;
}

const TOKEN_INVALID_MARKERS: [&str; 6] = [
    "UNREGISTERED",
    "NotRegistered",
    "InvalidRegistration",
    "INVALID_ARGUMENT",
    "MismatchSenderId",
    "SENDER_ID_MISMATCH",
];

const TRANSIENT_MARKERS: [&str; 5] = [
    "QUOTA_EXCEEDED",
    "QuotaExceeded",
    "Internal",
    "UNAVAILABLE",
    "Unavailable",
];

/// Scans transport error text for the known FCM failure markers.
pub fn classify_push_error(body: &str) -> PushErrorClass {
    if TOKEN_INVALID_MARKERS.iter().any(|m| body.contains(m)) {
        return PushErrorClass::TokenInvalid;
    }
    if TRANSIENT_MARKERS.iter().any(|m| body.contains(m)) {
        return PushErrorClass::Transient;
    }
    PushErrorClass::Unknown
}
