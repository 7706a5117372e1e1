use super::{classify_push_error, IPushGateway, PushErrorClass, PushNote, PushOutcome, PushTransport};
use crate::Config;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::warn;

const FCM_V1_BASE: &str = "https://fcm.googleapis.com/v1/projects";
const FCM_LEGACY_URL: &str = "https://fcm.googleapis.com/fcm/send";
const SNIPPET_LEN: usize = 300;

/// FCM transport. Prefers the v1 token-based API when a project id and
/// access token are configured, otherwise the legacy server-key API.
/// Missing credentials fail closed instead of panicking at startup so the
/// rest of the service keeps working without push delivery.
pub struct FcmGateway {
    client: reqwest::Client,
    server_key: Option<String>,
    project_id: Option<String>,
    access_token: Option<String>,
}

impl FcmGateway {
    pub fn new(config: &Config) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.push_timeout_secs))
            .build()
            .unwrap_or_default();
        Self {
            client,
            server_key: config.fcm_server_key.clone(),
            project_id: config.fcm_project_id.clone(),
            access_token: config.fcm_access_token.clone(),
        }
    }

    async fn send_v1(
        &self,
        token: &str,
        note: &PushNote,
        project_id: &str,
        access_token: &str,
    ) -> PushOutcome {
        let mut message = json!({
            "token": token,
            "notification": { "title": note.title, "body": note.body },
            "data": note.data,
        });
        let mut android = serde_json::Map::new();
        android.insert("priority".into(), Value::from("HIGH"));
        if let Some(ttl) = note.ttl_seconds {
            android.insert("ttl".into(), Value::from(format!("{}s", ttl)));
        }
        if let Some(channel) = &note.channel_hint {
            android.insert(
                "notification".into(),
                json!({ "channel_id": channel }),
            );
        }
        message["android"] = Value::Object(android);

        let url = format!("{}/{}/messages:send", FCM_V1_BASE, project_id);
        let res = self
            .client
            .post(&url)
            .bearer_auth(access_token)
            .json(&json!({ "message": message }))
            .send()
            .await;
        self.outcome_from_response(res, PushTransport::V1).await
    }

    async fn send_legacy(&self, token: &str, note: &PushNote, server_key: &str) -> PushOutcome {
        let mut payload = json!({
            "to": token,
            "notification": { "title": note.title, "body": note.body },
            "data": note.data,
            "priority": "high",
        });
        if let Some(ttl) = note.ttl_seconds {
            payload["time_to_live"] = Value::from(ttl);
        }
        if let Some(channel) = &note.channel_hint {
            payload["android_channel_id"] = Value::from(channel.clone());
        }

        let res = self
            .client
            .post(FCM_LEGACY_URL)
            .header("Authorization", format!("key={}", server_key))
            .json(&payload)
            .send()
            .await;
        self.outcome_from_response(res, PushTransport::Legacy).await
    }

    async fn outcome_from_response(
        &self,
        res: Result<reqwest::Response, reqwest::Error>,
        transport: PushTransport,
    ) -> PushOutcome {
        let res = match res {
            Ok(res) => res,
            Err(e) => {
                let error_class = if e.is_timeout() || e.is_connect() {
                    PushErrorClass::Transient
                } else {
                    PushErrorClass::Unknown
                };
                return PushOutcome {
                    delivered: false,
                    http_status: None,
                    response_snippet: Some(e.to_string()),
                    transport_used: Some(transport),
                    error_class: Some(error_class),
                };
            }
        };

        let status = res.status().as_u16();
        let body = res.text().await.unwrap_or_default();
        let snippet: String = body.chars().take(SNIPPET_LEN).collect();
        // The legacy API reports per-token failures inside a 200 response.
        let token_failed = transport == PushTransport::Legacy
            && classify_push_error(&body) == PushErrorClass::TokenInvalid;
        let delivered = (status == 200 || status == 202) && !token_failed;

        PushOutcome {
            delivered,
            http_status: Some(status),
            response_snippet: if delivered { None } else { Some(snippet.clone()) },
            transport_used: Some(transport),
            error_class: if delivered {
                None
            } else {
                Some(classify_push_error(&snippet))
            },
        }
    }
}

#[async_trait::async_trait]
impl IPushGateway for FcmGateway {
    async fn send(&self, token: &str, note: &PushNote) -> PushOutcome {
        if let (Some(project_id), Some(access_token)) = (&self.project_id, &self.access_token) {
            return self.send_v1(token, note, project_id, access_token).await;
        }
        if let Some(server_key) = &self.server_key {
            return self.send_legacy(token, note, server_key).await;
        }
        warn!("No FCM credentials configured, dropping push");
        PushOutcome {
            delivered: false,
            http_status: None,
            response_snippet: Some("no push credentials configured".into()),
            transport_used: None,
            error_class: Some(PushErrorClass::Unknown),
        }
    }
}
