use super::*;

use crate::agent::fake::{Scripted, ScriptedGenerator};
use crate::error::ToolFailure;
use crate::response::FollowUpQuestion;

const TIMEOUT: Duration = Duration::from_secs(30);

const SCENARIO_JSON: &str = r#"{"task_summary":"Fix a bug","questions":[{"question":"Which bug?","why":"ambiguous","example_answer":"login crash"}]}"#;

#[test]
fn analyze_sends_draft_with_analyzer_system_prompt() {
    let generator = ScriptedGenerator::texts(&[SCENARIO_JSON]);
    let analysis = analyze(&generator, "fix the bug", TIMEOUT).expect("analyze");

    assert_eq!(analysis.task_summary, "Fix a bug");
    assert_eq!(
        analysis.questions,
        vec![FollowUpQuestion {
            question: "Which bug?".to_string(),
            why: Some("ambiguous".to_string()),
            example_answer: Some("login crash".to_string()),
        }]
    );
    let calls = generator.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].prompt, "Analyze this prompt:\n\nfix the bug");
    assert_eq!(calls[0].system.as_deref(), Some(ANALYZER_SYSTEM_PROMPT));
    assert_eq!(calls[0].timeout, TIMEOUT);
}

#[test]
fn analyze_degrades_to_empty_on_tool_failure() {
    let generator = ScriptedGenerator::new(vec![Scripted::Failed(ToolFailure::Timeout(30))]);
    let analysis = analyze(&generator, "fix the bug", TIMEOUT).expect("analyze");
    assert_eq!(analysis, AnalysisResult::default());
}

#[test]
fn analyze_degrades_to_empty_on_unparsable_reply() {
    let generator = ScriptedGenerator::texts(&["I think you should add more detail."]);
    let analysis = analyze(&generator, "fix the bug", TIMEOUT).expect("analyze");
    assert_eq!(analysis, AnalysisResult::default());
}

#[test]
fn analyze_propagates_missing_tool() {
    let generator = ScriptedGenerator::new(vec![Scripted::NotFound]);
    let err = analyze(&generator, "fix the bug", TIMEOUT).expect_err("should fail");
    assert!(matches!(err, GuideError::ToolNotFound { .. }));
}

#[test]
fn assemble_with_no_answers_returns_original_without_calling_tool() {
    let generator = ScriptedGenerator::texts(&["should not be used"]);
    let result = assemble(&generator, "fix the bug", &AnswerSet::new(), TIMEOUT).expect("assemble");
    assert_eq!(result, "fix the bug");
    assert!(generator.calls().is_empty());
}

#[test]
fn assemble_with_only_blank_answers_skips_tool() {
    let generator = ScriptedGenerator::texts(&["should not be used"]);
    let mut answers = AnswerSet::new();
    answers.record("Which bug?", "");
    answers.record("Which file?", "   \t");
    let result = assemble(&generator, "fix the bug", &answers, TIMEOUT).expect("assemble");
    assert_eq!(result, "fix the bug");
    assert!(generator.calls().is_empty());
}

#[test]
fn assemble_sends_filled_pairs_in_order() {
    let generator = ScriptedGenerator::texts(&["Fix the login crash in auth.rs."]);
    let mut answers = AnswerSet::new();
    answers.record("Which bug?", "login crash");
    answers.record("Any constraints?", "");
    answers.record("Which file?", "auth.rs");

    let result = assemble(&generator, "fix the bug", &answers, TIMEOUT).expect("assemble");

    assert_eq!(result, "Fix the login crash in auth.rs.");
    let calls = generator.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].prompt,
        "Original prompt:\nfix the bug\n\nAdditional context:\n\
         Q: Which bug?\nA: login crash\n\nQ: Which file?\nA: auth.rs"
    );
    assert_eq!(calls[0].system.as_deref(), Some(ASSEMBLER_SYSTEM_PROMPT));
}

#[test]
fn assemble_falls_back_to_original_on_failure_or_blank_reply() {
    let mut answers = AnswerSet::new();
    answers.record("Which bug?", "login crash");

    let failing = ScriptedGenerator::new(vec![Scripted::Failed(ToolFailure::NonzeroExit {
        code: Some(1),
        stderr: "auth".to_string(),
    })]);
    assert_eq!(
        assemble(&failing, "fix the bug", &answers, TIMEOUT).expect("assemble"),
        "fix the bug"
    );

    let blank = ScriptedGenerator::texts(&["   "]);
    assert_eq!(
        assemble(&blank, "fix the bug", &answers, TIMEOUT).expect("assemble"),
        "fix the bug"
    );
}

#[test]
fn answer_set_keeps_question_order_and_replaces_in_place() {
    let mut answers = AnswerSet::new();
    answers.record("A?", "1");
    answers.record("B?", "2");
    answers.record("A?", "3");
    assert_eq!(answers.len(), 2);
    assert_eq!(answers.get("A?"), Some("3"));
    assert_eq!(answers.context_block(), "Q: A?\nA: 3\n\nQ: B?\nA: 2");
}

#[test]
fn scenario_context_matches_single_answer() {
    let mut answers = AnswerSet::new();
    answers.record("Which bug?", "login crash");
    assert_eq!(answers.context_block(), "Q: Which bug?\nA: login crash");
}
