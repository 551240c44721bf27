//! Gateway operations. Each one narrows dashboard data to what the prompt
//! needs, short-circuits on trivial input, and returns either generated
//! content or a typed [`AiError`]. Turning an error into display text is the
//! caller's job (see [`Control::fallback_text`](super::Control::fallback_text)).

use std::env;
use std::fmt;
use std::sync::Arc;

use log::{debug, info, warn};
use serde_json::Value;

use super::client::{GeminiClient, GenerativeClient};
use super::image::ReceiptImage;
use super::prompts;
use super::{AiError, AiResult};
use crate::config::AiSettings;
use crate::models::{Achievement, FinancialTransaction, Mood, Task};
use crate::progress::briefing_candidates;

pub const CLEAR_DAY_MESSAGE: &str =
    "Your day looks clear! Pick a task and make it a priority to get started.";
pub const NO_ACHIEVEMENTS_MESSAGE: &str = "Add some achievements to get an insight.";
pub const NO_NOTES_MESSAGE: &str = "Write some notes to get a reflection summary.";
pub const NO_TRANSACTIONS_MESSAGE: &str = "Add some transactions to get an insight.";

/// Description carried by the sentinel record of a failed receipt scan.
pub const RECEIPT_ERROR_MARKER: &str = "Error parsing image";

/// Fields extracted from a receipt image. Any of them may be missing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReceiptScan {
    pub description: Option<String>,
    pub date: Option<String>,
    pub amount: Option<f64>,
}

impl ReceiptScan {
    /// Structurally valid record that marks a failed scan.
    pub fn failed() -> Self {
        Self {
            description: Some(RECEIPT_ERROR_MARKER.to_string()),
            date: None,
            amount: Some(0.0),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.description.as_deref() == Some(RECEIPT_ERROR_MARKER)
    }

    /// Decode a model response, tolerating a Markdown code fence around the
    /// JSON and numbers sent as strings.
    pub fn decode(raw: &str) -> AiResult<Self> {
        let json_text = strip_code_fence(raw);
        let value: Value = serde_json::from_str(json_text)
            .map_err(|e| AiError::Decode(format!("Receipt JSON: {}", e)))?;
        let object = value
            .as_object()
            .ok_or_else(|| AiError::Decode("Receipt response is not a JSON object".to_string()))?;

        let text_field = |key: &str| {
            object
                .get(key)
                .and_then(Value::as_str)
                .map(str::to_string)
                .filter(|s| !s.trim().is_empty())
        };
        let amount = object.get("amount").and_then(|v| match v {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().trim_start_matches('$').parse().ok(),
            _ => None,
        });

        Ok(Self {
            description: text_field("description"),
            date: text_field("date"),
            amount,
        })
    }
}

fn strip_code_fence(raw: &str) -> &str {
    let text = raw.trim();
    let inner = if let Some(rest) = text.strip_prefix("```json") {
        rest
    } else if let Some(rest) = text.strip_prefix("```") {
        rest
    } else {
        return text;
    };
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

#[derive(Clone, Default)]
pub struct Gateway {
    client: Option<Arc<dyn GenerativeClient>>,
}

impl fmt::Debug for Gateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gateway")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

impl Gateway {
    pub fn new(client: Arc<dyn GenerativeClient>) -> Self {
        Self { client: Some(client) }
    }

    /// Gateway with no credential. Every operation that needs the endpoint
    /// returns [`AiError::MissingCredential`].
    pub fn disabled() -> Self {
        Self { client: None }
    }

    /// Build a Gemini-backed gateway if an API key can be found in the
    /// settings or the environment.
    pub fn from_settings(settings: &AiSettings) -> Self {
        let Some(api_key) = resolve_api_key(settings) else {
            warn!("No API key set (config ai.api_key or ${}); AI features disabled", settings.api_key_env);
            return Self::disabled();
        };
        match GeminiClient::new(settings, api_key) {
            Ok(client) => {
                info!("AI features enabled with model {}", settings.model);
                Self::new(Arc::new(client))
            }
            Err(e) => {
                warn!("AI features disabled: {}", e);
                Self::disabled()
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.client.is_some()
    }

    fn client(&self) -> AiResult<&Arc<dyn GenerativeClient>> {
        self.client.as_ref().ok_or(AiError::MissingCredential)
    }

    fn generate(&self, operation: &str, prompt: &str) -> AiResult<String> {
        let client = self.client()?;
        debug!("{}: sending prompt ({} chars)", operation, prompt.len());
        match client.generate_text(prompt) {
            Ok(text) => Ok(text.trim().to_string()),
            Err(e) => {
                warn!("{} failed: {}", operation, e);
                Err(e)
            }
        }
    }

    pub fn daily_briefing(&self, tasks: &[Task]) -> AiResult<String> {
        let candidates = briefing_candidates(tasks);
        if candidates.is_empty() {
            return Ok(CLEAR_DAY_MESSAGE.to_string());
        }
        self.generate("daily briefing", &prompts::daily_briefing(&candidates))
    }

    pub fn completion_analysis(&self, tasks: &[Task]) -> AiResult<String> {
        self.generate("completion analysis", &prompts::completion_analysis(tasks))
    }

    pub fn achievement_insight(&self, achievements: &[Achievement]) -> AiResult<String> {
        let texts = prompts::achievement_texts(achievements);
        if texts.is_empty() {
            return Ok(NO_ACHIEVEMENTS_MESSAGE.to_string());
        }
        self.generate("achievement insight", &prompts::achievement_insight(&texts))
    }

    pub fn reflection_summary(&self, mood: Mood, notes: &str) -> AiResult<String> {
        if notes.trim().is_empty() {
            return Ok(NO_NOTES_MESSAGE.to_string());
        }
        self.generate("reflection summary", &prompts::reflection_summary(mood, notes))
    }

    pub fn spending_insight(&self, transactions: &[FinancialTransaction]) -> AiResult<String> {
        if transactions.is_empty() {
            return Ok(NO_TRANSACTIONS_MESSAGE.to_string());
        }
        self.generate("spending insight", &prompts::spending_insight(transactions))
    }

    pub fn parse_receipt(&self, image: &ReceiptImage) -> AiResult<ReceiptScan> {
        let client = self.client()?;
        debug!("receipt scan: {} bytes of {}", image.bytes.len(), image.mime_type);
        let raw = client
            .generate_structured(image, prompts::RECEIPT_INSTRUCTION, &prompts::receipt_schema())
            .and_then(|raw| ReceiptScan::decode(&raw));
        if let Err(ref e) = raw {
            warn!("receipt scan failed: {}", e);
        }
        raw
    }
}

fn resolve_api_key(settings: &AiSettings) -> Option<String> {
    let configured = settings
        .api_key
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string);
    configured
        .or_else(|| env::var(&settings.api_key_env).ok())
        .or_else(|| env::var("API_KEY").ok())
        .filter(|k| !k.trim().is_empty())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{TaskStatus, TaskType};
    use crate::seed;
    use std::sync::Mutex;

    /// Records prompts and replies with a canned result.
    pub(crate) struct StubClient {
        pub reply: AiResult<String>,
        pub prompts: Mutex<Vec<String>>,
    }

    impl StubClient {
        pub(crate) fn replying(reply: AiResult<String>) -> Arc<Self> {
            Arc::new(Self { reply, prompts: Mutex::new(Vec::new()) })
        }

        pub(crate) fn calls(&self) -> usize {
            self.prompts.lock().map(|p| p.len()).unwrap_or(0)
        }
    }

    impl GenerativeClient for StubClient {
        fn generate_text(&self, prompt: &str) -> AiResult<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply.clone()
        }

        fn generate_structured(&self, _image: &ReceiptImage, instruction: &str, _schema: &Value) -> AiResult<String> {
            self.prompts.lock().unwrap().push(instruction.to_string());
            self.reply.clone()
        }
    }

    fn quiet_tasks() -> Vec<Task> {
        seed::initial_tasks()
            .into_iter()
            .filter(|t| t.task_type != TaskType::Meeting)
            .map(|t| Task { is_priority: false, ..t })
            .collect()
    }

    fn png() -> ReceiptImage {
        ReceiptImage { mime_type: "image/png", bytes: vec![1, 2, 3] }
    }

    #[test]
    fn clear_day_short_circuits_without_credential() {
        let gateway = Gateway::disabled();
        assert_eq!(gateway.daily_briefing(&quiet_tasks()), Ok(CLEAR_DAY_MESSAGE.to_string()));
    }

    #[test]
    fn clear_day_never_calls_the_client() {
        let stub = StubClient::replying(Ok("should not be used".to_string()));
        let gateway = Gateway::new(stub.clone());
        assert_eq!(gateway.daily_briefing(&quiet_tasks()).unwrap(), CLEAR_DAY_MESSAGE);
        assert_eq!(stub.calls(), 0);
    }

    #[test]
    fn missing_credential_is_reported_not_raised() {
        let gateway = Gateway::disabled();
        assert_eq!(gateway.daily_briefing(&seed::initial_tasks()), Err(AiError::MissingCredential));
        assert_eq!(gateway.completion_analysis(&seed::initial_tasks()), Err(AiError::MissingCredential));
        assert_eq!(gateway.parse_receipt(&png()), Err(AiError::MissingCredential));
    }

    #[test]
    fn other_short_circuits() {
        let gateway = Gateway::disabled();
        let empty = vec![Achievement::new("1", ""), Achievement::new("2", "   ")];
        assert_eq!(gateway.achievement_insight(&empty).unwrap(), NO_ACHIEVEMENTS_MESSAGE);
        assert_eq!(gateway.reflection_summary(Mood::Happy, " \n ").unwrap(), NO_NOTES_MESSAGE);
        assert_eq!(gateway.spending_insight(&[]).unwrap(), NO_TRANSACTIONS_MESSAGE);
    }

    #[test]
    fn generated_text_is_trimmed() {
        let stub = StubClient::replying(Ok("  Keep going!\n".to_string()));
        let gateway = Gateway::new(stub.clone());
        let mut tasks = seed::initial_tasks();
        tasks[0].status = TaskStatus::Unachieved;
        assert_eq!(gateway.completion_analysis(&tasks).unwrap(), "Keep going!");
        assert_eq!(stub.calls(), 1);
    }

    #[test]
    fn transport_errors_pass_through() {
        let stub = StubClient::replying(Err(AiError::Transport("timed out".to_string())));
        let gateway = Gateway::new(stub);
        assert_eq!(
            gateway.spending_insight(&seed::initial_transactions()),
            Err(AiError::Transport("timed out".to_string()))
        );
    }

    #[test]
    fn receipt_is_decoded_from_fenced_json() {
        let stub = StubClient::replying(Ok(
            "```json\n{\"description\": \"Corner Cafe\", \"date\": \"2025-10-30\", \"amount\": 8.4}\n```".to_string(),
        ));
        let gateway = Gateway::new(stub);
        let scan = gateway.parse_receipt(&png()).unwrap();
        assert_eq!(scan.description.as_deref(), Some("Corner Cafe"));
        assert_eq!(scan.date.as_deref(), Some("2025-10-30"));
        assert_eq!(scan.amount, Some(8.4));
    }

    #[test]
    fn receipt_without_amount_decodes_with_none() {
        let stub = StubClient::replying(Ok(r#"{"description": "Cafe", "date": null, "amount": null}"#.to_string()));
        let scan = Gateway::new(stub).parse_receipt(&png()).unwrap();
        assert_eq!(scan.amount, None);
        assert_eq!(scan.date, None);
    }

    #[test]
    fn malformed_receipt_json_is_a_decode_error() {
        let stub = StubClient::replying(Ok("I could not read that".to_string()));
        let result = Gateway::new(stub).parse_receipt(&png());
        assert!(matches!(result, Err(AiError::Decode(_))));
    }

    #[test]
    fn string_amounts_are_accepted() {
        let scan = ReceiptScan::decode(r#"{"amount": "$12.30"}"#).unwrap();
        assert_eq!(scan.amount, Some(12.3));
        let scan = ReceiptScan::decode(r#"{"amount": "twelve"}"#).unwrap();
        assert_eq!(scan.amount, None);
        let scan = ReceiptScan::decode(r#"{"amount": [12]}"#).unwrap();
        assert_eq!(scan.amount, None);
    }

    #[test]
    fn sentinel_is_recognised() {
        assert!(ReceiptScan::failed().is_failure());
        assert!(!ReceiptScan::default().is_failure());
    }

    #[test]
    fn configured_key_wins() {
        let settings = AiSettings {
            api_key: Some("from-config".to_string()),
            ..AiSettings::default()
        };
        assert_eq!(resolve_api_key(&settings).as_deref(), Some("from-config"));
    }
}
