use super::{IPushGateway, PushNote, PushOutcome};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Test gateway. Scripted outcomes are consumed in order; once the script
/// runs out every send is reported delivered. All sends are recorded.
#[derive(Default)]
pub struct StubPushGateway {
    outcomes: Mutex<VecDeque<PushOutcome>>,
    sent: Mutex<Vec<RecordedSend>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedSend {
    pub token: String,
    pub title: String,
    pub body: String,
}

impl StubPushGateway {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn script_outcome(&self, outcome: PushOutcome) {
        self.outcomes.lock().unwrap().push_back(outcome);
    }

    pub fn script_outcomes(&self, outcomes: impl IntoIterator<Item = PushOutcome>) {
        self.outcomes.lock().unwrap().extend(outcomes);
    }

    pub fn sends(&self) -> Vec<RecordedSend> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl IPushGateway for StubPushGateway {
    async fn send(&self, token: &str, note: &PushNote) -> PushOutcome {
        self.sent.lock().unwrap().push(RecordedSend {
            token: token.to_string(),
            title: note.title.clone(),
            body: note.body.clone(),
        });
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(PushOutcome::delivered)
    }
}
