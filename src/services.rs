use std::time::Duration;

use tracing::{debug, info};

use crate::agent::{GenerationRequest, TextGenerator};
use crate::error::GuideError;
use crate::response::{AnalysisResult, interpret};
use crate::subagents::{
    ANALYZER_SYSTEM_PROMPT, ASSEMBLER_SYSTEM_PROMPT, build_analyze_prompt, build_assemble_prompt,
};

/// Answers keyed by question text, kept in the order questions were asked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSet {
    entries: Vec<(String, String)>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an answer. Re-answering a question replaces its answer in place.
    pub fn record(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        let question = question.into();
        let answer = answer.into();
        if let Some(entry) = self.entries.iter_mut().find(|(q, _)| *q == question) {
            entry.1 = answer;
        } else {
            self.entries.push((question, answer));
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn get(&self, question: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(q, _)| q == question)
            .map(|(_, a)| a.as_str())
    }

    /// Pairs whose answer is not blank.
    pub fn filled(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .filter(|(_, answer)| !answer.trim().is_empty())
            .map(|(question, answer)| (question.as_str(), answer.as_str()))
    }

    pub fn has_any_answer(&self) -> bool {
        self.filled().next().is_some()
    }

    /// `Q: ...\nA: ...` blocks separated by a blank line.
    pub fn context_block(&self) -> String {
        self.filled()
            .map(|(question, answer)| format!("Q: {question}\nA: {answer}"))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Asks the tool for a task summary and follow-up questions.
///
/// Any tool or parse failure yields an empty analysis; only a missing tool is
/// an error.
pub fn analyze<G: TextGenerator + ?Sized>(
    generator: &G,
    draft: &str,
    timeout: Duration,
) -> Result<AnalysisResult, GuideError> {
    let prompt = build_analyze_prompt(draft);
    let reply = generator.generate(&GenerationRequest {
        prompt: &prompt,
        system: Some(ANALYZER_SYSTEM_PROMPT),
        timeout,
    })?;
    let Some(raw) = reply.into_text() else {
        info!("analysis unavailable, continuing without questions");
        return Ok(AnalysisResult::default());
    };
    let record = interpret(&raw);
    if record.is_empty() {
        debug!(raw = %raw, "analysis response was not a JSON object");
        return Ok(AnalysisResult::default());
    }
    Ok(AnalysisResult::from_record(&record))
}

/// Merges the draft with the filled answers. Falls back to `original` when
/// nothing was answered or the tool gives no usable text.
pub fn assemble<G: TextGenerator + ?Sized>(
    generator: &G,
    original: &str,
    answers: &AnswerSet,
    timeout: Duration,
) -> Result<String, GuideError> {
    if !answers.has_any_answer() {
        return Ok(original.to_string());
    }
    let prompt = build_assemble_prompt(original, &answers.context_block());
    let reply = generator.generate(&GenerationRequest {
        prompt: &prompt,
        system: Some(ASSEMBLER_SYSTEM_PROMPT),
        timeout,
    })?;
    match reply.into_text() {
        Some(text) => Ok(text),
        None => {
            info!("assembly unavailable, keeping the original prompt");
            Ok(original.to_string())
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/services_tests.rs"]
mod tests;
