//! Prompt text for each gateway operation.

use serde::Serialize;
use serde_json::{Value, json};

use crate::models::{Achievement, FinancialTransaction, Mood, Task, TaskStatus, TaskType};

#[derive(Serialize)]
struct BriefingItem<'a> {
    title: &'a str,
    time: &'a str,
    #[serde(rename = "type")]
    task_type: TaskType,
}

#[derive(Serialize)]
struct CompletionItem<'a> {
    title: &'a str,
    status: TaskStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'a str>,
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "[]".to_string())
}

/// `tasks` should already be narrowed to priorities and meetings.
pub fn daily_briefing(tasks: &[&Task]) -> String {
    let items: Vec<BriefingItem> = tasks
        .iter()
        .map(|t| BriefingItem { title: &t.title, time: &t.time, task_type: t.task_type })
        .collect();
    format!(
        "As an executive assistant, analyze this list of important tasks and meetings for today.\n\
         Provide a very short (1-2 sentence) \"Daily Briefing\" to help the user focus.\n\
         Highlight the most important priority task or the first major meeting. Be encouraging and professional.\n\
         Example: \"Your focus today is the 'Q4 Planning Session' at 10 AM. Nailing this will set the tone for the quarter. You've got this!\"\n\
         Tasks: {}",
        to_json(&items)
    )
}

pub fn completion_analysis(tasks: &[Task]) -> String {
    let items: Vec<CompletionItem> = tasks
        .iter()
        .map(|t| CompletionItem { title: &t.title, status: t.status, reason: t.reason.as_deref() })
        .collect();
    format!(
        "As a productivity coach, analyze the following daily task list.\n\
         Provide a short, encouraging analysis (2 sentences max) of the user's productivity and one actionable suggestion for improvement.\n\
         Focus on trends and be supportive.\n\
         Tasks: {}",
        to_json(&items)
    )
}

/// Non-empty achievement texts, in slot order.
pub fn achievement_texts(achievements: &[Achievement]) -> Vec<&str> {
    achievements
        .iter()
        .map(|a| a.text.as_str())
        .filter(|text| !text.trim().is_empty())
        .collect()
}

pub fn achievement_insight(texts: &[&str]) -> String {
    format!(
        "As a motivational coach, review these achievements for the day.\n\
         Generate a brief, powerful, and motivational summary of the user's progress and momentum. Keep it to 2 sentences.\n\
         Achievements: {}",
        to_json(&texts)
    )
}

pub fn reflection_summary(mood: Mood, notes: &str) -> String {
    format!(
        "As a mindfulness coach, analyze these journal entries and mood.\n\
         Provide a gentle, insightful summary (2-3 sentences) and a supportive, open-ended question for further reflection.\n\
         Mood: {} ({})\n\
         Notes: \"{}\"",
        mood.symbol(),
        mood.label(),
        notes.trim()
    )
}

pub fn spending_insight(transactions: &[FinancialTransaction]) -> String {
    format!(
        "As a financial analyst, briefly analyze this list of today's financial transactions.\n\
         Provide a single, concise insight into the user's spending habits for the day.\n\
         Example: \"Subscriptions accounted for the majority of your expenses today.\"\n\
         Transactions: {}",
        to_json(&transactions)
    )
}

pub const RECEIPT_INSTRUCTION: &str = "You are a financial data extractor. Analyze this receipt image. \
Extract the vendor/description, date (in YYYY-MM-DD format if available), and total amount. \
Return strict JSON. For vendor use 'description'. For date use 'date'. For total use 'amount'. \
Use null if a value is not found.";

/// Response schema for receipt extraction.
pub fn receipt_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "description": { "type": "STRING" },
            "date": { "type": "STRING" },
            "amount": { "type": "NUMBER" }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::briefing_candidates;
    use crate::seed;

    #[test]
    fn briefing_prompt_embeds_candidates_as_json() {
        let tasks = seed::initial_tasks();
        let prompt = daily_briefing(&briefing_candidates(&tasks));
        assert!(prompt.contains("Daily Briefing"));
        assert!(prompt.contains(r#""title":"Code Review","time":"14:00","type":"TASK""#));
        assert!(!prompt.contains("Lunch Break"));
    }

    #[test]
    fn completion_prompt_includes_reason_only_when_present() {
        let mut tasks = seed::initial_tasks();
        tasks[3].status = TaskStatus::Unachieved;
        tasks[3].reason = Some("Jane was out".to_string());
        let prompt = completion_analysis(&tasks);
        assert!(prompt.contains(r#""status":"UNACHIEVED","reason":"Jane was out""#));
        assert!(prompt.contains(r#"{"title":"Lunch Break","status":"COMPLETED"}"#));
    }

    #[test]
    fn blank_achievements_are_skipped() {
        let achievements = seed::initial_achievements();
        assert_eq!(achievement_texts(&achievements).len(), 2);
    }

    #[test]
    fn reflection_prompt_carries_mood_and_notes() {
        let prompt = reflection_summary(Mood::Sad, "  long day  ");
        assert!(prompt.contains("😞 (Sad)"));
        assert!(prompt.contains("Notes: \"long day\""));
    }

    #[test]
    fn receipt_schema_has_three_fields() {
        let schema = receipt_schema();
        let props = schema["properties"].as_object().unwrap();
        assert_eq!(props.len(), 3);
        assert_eq!(schema["properties"]["amount"]["type"], "NUMBER");
    }
}
