use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const CODE_FENCE: &str = "```";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowUpQuestion {
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub why: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example_answer: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisResult {
    pub task_summary: String,
    pub questions: Vec<FollowUpQuestion>,
}

impl AnalysisResult {
    /// Builds a result from an interpreted record. Anything missing or of the
    /// wrong shape falls back to empty values.
    pub fn from_record(record: &Map<String, Value>) -> Self {
        let task_summary = record
            .get("task_summary")
            .and_then(Value::as_str)
            .map(|summary| summary.trim().to_string())
            .unwrap_or_default();
        Self {
            task_summary,
            questions: validate_questions(record.get("questions")),
        }
    }
}

/// Extracts a JSON object from free-form tool output.
///
/// Code fences are removed first. If the cleaned text is not a JSON object on
/// its own, the span from the first `{` to the last `}` is tried. Returns an
/// empty map when nothing usable is found.
pub fn interpret(raw: &str) -> Map<String, Value> {
    let cleaned = strip_code_fences(raw);
    let cleaned = cleaned.trim();
    if let Some(record) = parse_object(cleaned) {
        return record;
    }
    if let (Some(start), Some(end)) = (cleaned.find('{'), cleaned.rfind('}'))
        && start < end
        && let Some(record) = parse_object(&cleaned[start..=end])
    {
        return record;
    }
    Map::new()
}

fn parse_object(text: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(text).ok()? {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

/// Removes every triple-backtick fence marker along with a language tag
/// written directly after it (```` ```json ````).
pub fn strip_code_fences(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(pos) = rest.find(CODE_FENCE) {
        out.push_str(&rest[..pos]);
        rest = &rest[pos + CODE_FENCE.len()..];
        let tag_len = rest
            .char_indices()
            .find(|(_, ch)| !(ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '+')))
            .map(|(idx, _)| idx)
            .unwrap_or(rest.len());
        rest = &rest[tag_len..];
    }
    out.push_str(rest);
    out
}

/// Keeps only entries that are objects with a non-empty string `question`,
/// in their original order. Optional fields of the wrong type are dropped.
pub fn validate_questions(value: Option<&Value>) -> Vec<FollowUpQuestion> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    items.iter().filter_map(question_from_value).collect()
}

fn question_from_value(item: &Value) -> Option<FollowUpQuestion> {
    let object = item.as_object()?;
    let question = object.get("question")?.as_str()?.trim();
    if question.is_empty() {
        return None;
    }
    Some(FollowUpQuestion {
        question: question.to_string(),
        why: optional_text(object.get("why")),
        example_answer: optional_text(object.get("example_answer")),
    })
}

fn optional_text(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(ToString::to_string)
}

#[cfg(test)]
#[path = "../tests/unit/response_tests.rs"]
mod tests;
