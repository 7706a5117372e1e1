use serde::{Deserialize, Serialize};

/// Counts from one dispatch pass over due scheduled pushes and reminders.
#[derive(Debug, Default, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DispatchReportDTO {
    pub pushes_due: usize,
    pub pushes_sent_tokens: usize,
    pub reminders_due: usize,
    pub reminders_delivered: usize,
    pub reminders_retrying: usize,
    pub reminders_failed_permanent: usize,
    pub reminders_token_invalid: usize,
    pub reminders_no_tokens: usize,
    pub reminders_ack_skipped: usize,
    pub reminders_grace_skipped: usize,
    pub errors: usize,
}
