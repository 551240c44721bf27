//! Background execution of gateway calls.
//!
//! The UI thread owns the store and never blocks on the network. Each call
//! runs on its own short-lived thread with an `Arc` snapshot of its inputs and
//! reports back over a channel that the event loop drains once per frame.
//! Every control holds at most one live [`RequestToken`]; a completion whose
//! token has been superseded is dropped instead of overwriting newer output.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use log::{debug, error};

use super::gateway::{Gateway, ReceiptScan};
use super::image::ReceiptImage;
use super::{AiError, AiResult};
use crate::models::{Achievement, FinancialTransaction, Mood, Task};

/// A UI control that can trigger an AI request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    DailyBriefing,
    CompletionAnalysis,
    AchievementInsight,
    ReflectionSummary,
    SpendingInsight,
    ReceiptScan,
}

impl Control {
    pub fn label(self) -> &'static str {
        match self {
            Control::DailyBriefing => "daily-briefing",
            Control::CompletionAnalysis => "completion-analysis",
            Control::AchievementInsight => "achievement-insight",
            Control::ReflectionSummary => "reflection-summary",
            Control::SpendingInsight => "spending-insight",
            Control::ReceiptScan => "receipt-scan",
        }
    }

    /// Text shown in place of generated output when a request fails.
    pub fn fallback_text(self, err: &AiError) -> String {
        match err {
            AiError::MissingCredential => match self {
                Control::DailyBriefing => {
                    "Could not generate your daily briefing. Please check your API key.".to_string()
                }
                Control::CompletionAnalysis => {
                    "Could not generate analysis. Please check your API key.".to_string()
                }
                Control::ReflectionSummary => {
                    "Could not generate summary. Please check your API key.".to_string()
                }
                Control::ReceiptScan => {
                    "AI features are disabled. Please configure your API key.".to_string()
                }
                Control::AchievementInsight | Control::SpendingInsight => {
                    "Could not generate insight. Please check your API key.".to_string()
                }
            },
            other => format!("Error: Could not generate response. {}", other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

/// Tracks the live request of each control.
#[derive(Debug, Default)]
pub struct RequestTracker {
    next: u64,
    live: HashMap<Control, RequestToken>,
}

impl RequestTracker {
    fn issue(&mut self, control: Control) -> RequestToken {
        self.next += 1;
        let token = RequestToken(self.next);
        self.live.insert(control, token);
        token
    }

    /// Start a request unless one is already in flight for `control`.
    pub fn begin(&mut self, control: Control) -> Option<RequestToken> {
        if self.live.contains_key(&control) {
            return None;
        }
        Some(self.issue(control))
    }

    /// Start a request that replaces any in-flight one for `control`.
    pub fn supersede(&mut self, control: Control) -> RequestToken {
        self.issue(control)
    }

    /// Settle a completion. Returns true when `token` is still the live one.
    pub fn finish(&mut self, control: Control, token: RequestToken) -> bool {
        if self.live.get(&control) == Some(&token) {
            self.live.remove(&control);
            true
        } else {
            false
        }
    }

    pub fn is_pending(&self, control: Control) -> bool {
        self.live.contains_key(&control)
    }
}

/// Work for one gateway call, carrying its own input snapshot.
#[derive(Debug, Clone)]
pub enum AiJob {
    DailyBriefing(Arc<Vec<Task>>),
    CompletionAnalysis(Arc<Vec<Task>>),
    AchievementInsight(Arc<Vec<Achievement>>),
    ReflectionSummary(Mood, String),
    SpendingInsight(Arc<Vec<FinancialTransaction>>),
    ParseReceipt(ReceiptImage),
}

#[derive(Debug, Clone, PartialEq)]
pub enum AiOutcome {
    Text(AiResult<String>),
    Receipt(AiResult<ReceiptScan>),
}

impl AiJob {
    pub fn run(&self, gateway: &Gateway) -> AiOutcome {
        match self {
            AiJob::DailyBriefing(tasks) => AiOutcome::Text(gateway.daily_briefing(tasks)),
            AiJob::CompletionAnalysis(tasks) => AiOutcome::Text(gateway.completion_analysis(tasks)),
            AiJob::AchievementInsight(achievements) => {
                AiOutcome::Text(gateway.achievement_insight(achievements))
            }
            AiJob::ReflectionSummary(mood, notes) => {
                AiOutcome::Text(gateway.reflection_summary(*mood, notes))
            }
            AiJob::SpendingInsight(transactions) => {
                AiOutcome::Text(gateway.spending_insight(transactions))
            }
            AiJob::ParseReceipt(image) => AiOutcome::Receipt(gateway.parse_receipt(image)),
        }
    }

    fn failed(&self, err: AiError) -> AiOutcome {
        match self {
            AiJob::ParseReceipt(_) => AiOutcome::Receipt(Err(err)),
            _ => AiOutcome::Text(Err(err)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AiCompletion {
    pub control: Control,
    pub outcome: AiOutcome,
}

struct Envelope {
    control: Control,
    token: RequestToken,
    outcome: AiOutcome,
}

pub struct AiDispatcher {
    gateway: Gateway,
    tracker: RequestTracker,
    tx: Sender<Envelope>,
    rx: Receiver<Envelope>,
}

impl AiDispatcher {
    pub fn new(gateway: Gateway) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            gateway,
            tracker: RequestTracker::default(),
            tx,
            rx,
        }
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    pub fn is_pending(&self, control: Control) -> bool {
        self.tracker.is_pending(control)
    }

    /// User-triggered request. Refused (returns false) while the same control
    /// still has a request in flight.
    pub fn request(&mut self, control: Control, job: AiJob) -> bool {
        match self.tracker.begin(control) {
            Some(token) => {
                self.spawn(control, token, job);
                true
            }
            None => {
                debug!("{} already in flight; ignoring request", control.label());
                false
            }
        }
    }

    /// Request that replaces whatever is in flight for `control`.
    pub fn refresh(&mut self, control: Control, job: AiJob) {
        let token = self.tracker.supersede(control);
        self.spawn(control, token, job);
    }

    fn spawn(&self, control: Control, token: RequestToken, job: AiJob) {
        let gateway = self.gateway.clone();
        let tx = self.tx.clone();
        let fallback_job = job.clone();
        let spawned = thread::Builder::new()
            .name(format!("ai-{}", control.label()))
            .spawn(move || {
                let outcome = job.run(&gateway);
                // The receiver only goes away when the app is shutting down.
                let _ = tx.send(Envelope { control, token, outcome });
            });
        if let Err(e) = spawned {
            error!("failed to start {} worker: {}", control.label(), e);
            let outcome = fallback_job.failed(AiError::Transport(format!("Could not start request: {}", e)));
            let _ = self.tx.send(Envelope { control, token, outcome });
        }
    }

    /// Collect finished requests. Superseded ones are discarded.
    pub fn drain(&mut self) -> Vec<AiCompletion> {
        let mut completions = Vec::new();
        while let Ok(envelope) = self.rx.try_recv() {
            if self.tracker.finish(envelope.control, envelope.token) {
                completions.push(AiCompletion {
                    control: envelope.control,
                    outcome: envelope.outcome,
                });
            } else {
                debug!("dropping stale {} response", envelope.control.label());
            }
        }
        completions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::gateway::tests::StubClient;
    use crate::ai::gateway::CLEAR_DAY_MESSAGE;
    use crate::seed;
    use std::time::{Duration, Instant};

    fn drain_until(dispatcher: &mut AiDispatcher, expected: usize) -> Vec<AiCompletion> {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut all = Vec::new();
        while all.len() < expected && Instant::now() < deadline {
            all.extend(dispatcher.drain());
            thread::sleep(Duration::from_millis(5));
        }
        all
    }

    #[test]
    fn tracker_debounces_until_finished() {
        let mut tracker = RequestTracker::default();
        let token = tracker.begin(Control::SpendingInsight).unwrap();
        assert!(tracker.begin(Control::SpendingInsight).is_none());
        assert!(tracker.begin(Control::CompletionAnalysis).is_some());
        assert!(tracker.finish(Control::SpendingInsight, token));
        assert!(!tracker.is_pending(Control::SpendingInsight));
        assert!(tracker.begin(Control::SpendingInsight).is_some());
    }

    #[test]
    fn superseded_token_is_stale() {
        let mut tracker = RequestTracker::default();
        let old = tracker.supersede(Control::DailyBriefing);
        let new = tracker.supersede(Control::DailyBriefing);
        assert!(!tracker.finish(Control::DailyBriefing, old));
        assert!(tracker.is_pending(Control::DailyBriefing));
        assert!(tracker.finish(Control::DailyBriefing, new));
    }

    #[test]
    fn fallback_text_depends_on_failure() {
        assert_eq!(
            Control::DailyBriefing.fallback_text(&AiError::MissingCredential),
            "Could not generate your daily briefing. Please check your API key."
        );
        assert_eq!(
            Control::SpendingInsight.fallback_text(&AiError::Transport("offline".to_string())),
            "Error: Could not generate response. Request failed: offline"
        );
    }

    #[test]
    fn completed_request_is_delivered() {
        let stub = StubClient::replying(Ok("Spend less on coffee.".to_string()));
        let mut dispatcher = AiDispatcher::new(Gateway::new(stub));
        let job = AiJob::SpendingInsight(Arc::new(seed::initial_transactions()));
        assert!(dispatcher.request(Control::SpendingInsight, job.clone()));
        assert!(!dispatcher.request(Control::SpendingInsight, job));

        let done = drain_until(&mut dispatcher, 1);
        assert_eq!(
            done,
            vec![AiCompletion {
                control: Control::SpendingInsight,
                outcome: AiOutcome::Text(Ok("Spend less on coffee.".to_string())),
            }]
        );
        assert!(!dispatcher.is_pending(Control::SpendingInsight));
    }

    #[test]
    fn refresh_drops_the_older_response() {
        let mut dispatcher = AiDispatcher::new(Gateway::disabled());
        let busy = Arc::new(seed::initial_tasks());
        dispatcher.refresh(Control::DailyBriefing, AiJob::DailyBriefing(busy));
        dispatcher.refresh(Control::DailyBriefing, AiJob::DailyBriefing(Arc::new(Vec::new())));

        // Wait until both workers have reported, then check only the newest survived.
        thread::sleep(Duration::from_millis(200));
        let done = drain_until(&mut dispatcher, 1);
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].outcome, AiOutcome::Text(Ok(CLEAR_DAY_MESSAGE.to_string())));
        assert!(dispatcher.drain().is_empty());
    }

    #[test]
    fn job_run_is_synchronous() {
        let outcome = AiJob::ReflectionSummary(Mood::Happy, String::new()).run(&Gateway::disabled());
        assert!(matches!(outcome, AiOutcome::Text(Ok(_))));
    }
}
