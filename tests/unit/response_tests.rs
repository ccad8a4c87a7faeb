use super::*;
use serde_json::json;

const SCENARIO_JSON: &str = r#"{"task_summary":"Fix a bug","questions":[{"question":"Which bug?","why":"ambiguous","example_answer":"login crash"}]}"#;

#[test]
fn interprets_plain_json_object() {
    let record = interpret(SCENARIO_JSON);
    assert_eq!(record.get("task_summary"), Some(&json!("Fix a bug")));
    let analysis = AnalysisResult::from_record(&record);
    assert_eq!(analysis.task_summary, "Fix a bug");
    assert_eq!(
        analysis.questions,
        vec![FollowUpQuestion {
            question: "Which bug?".to_string(),
            why: Some("ambiguous".to_string()),
            example_answer: Some("login crash".to_string()),
        }]
    );
}

#[test]
fn fenced_output_matches_unfenced_output() {
    let fenced = "```json\n{\"task_summary\":\"x\",\"questions\":[]}\n```";
    let plain = "{\"task_summary\":\"x\",\"questions\":[]}";
    assert_eq!(interpret(fenced), interpret(plain));
    assert_eq!(interpret(fenced).get("task_summary"), Some(&json!("x")));
}

#[test]
fn bare_fence_without_language_tag_is_stripped() {
    let record = interpret("```\n{\"task_summary\":\"y\"}\n```");
    assert_eq!(record.get("task_summary"), Some(&json!("y")));
}

#[test]
fn extracts_object_from_surrounding_prose() {
    let raw = format!("Sure! Here is the analysis:\n{SCENARIO_JSON}\nLet me know if that helps.");
    let analysis = AnalysisResult::from_record(&interpret(&raw));
    assert_eq!(analysis.questions.len(), 1);
    assert_eq!(analysis.questions[0].question, "Which bug?");
}

#[test]
fn malformed_input_yields_empty_record() {
    for raw in [
        "",
        "not json at all",
        "{\"task_summary\": ",
        "} backwards {",
        "[1, 2, 3]",
        "\"just a string\"",
        "prefix {not: valid} suffix",
    ] {
        assert!(interpret(raw).is_empty(), "expected empty record for {raw:?}");
    }
}

#[test]
fn empty_record_becomes_empty_analysis() {
    let analysis = AnalysisResult::from_record(&Map::new());
    assert_eq!(analysis, AnalysisResult::default());
}

#[test]
fn wrong_field_types_default_to_empty() {
    let record = interpret(r#"{"task_summary": 7, "questions": {"question": "nope"}}"#);
    let analysis = AnalysisResult::from_record(&record);
    assert_eq!(analysis.task_summary, "");
    assert!(analysis.questions.is_empty());
}

#[test]
fn validation_keeps_only_well_formed_questions_in_order() {
    let value = json!([
        {"question": "First?"},
        "bare string",
        {"question": ""},
        {"question": "   "},
        {"why": "no question field"},
        {"question": 42},
        null,
        {"question": "Second?", "why": "matters", "example_answer": 3},
        {"question": "Third?", "example_answer": "e.g."}
    ]);
    let questions = validate_questions(Some(&value));
    let texts: Vec<&str> = questions.iter().map(|q| q.question.as_str()).collect();
    assert_eq!(texts, vec!["First?", "Second?", "Third?"]);
    assert_eq!(questions[1].why.as_deref(), Some("matters"));
    assert_eq!(questions[1].example_answer, None);
    assert_eq!(questions[2].example_answer.as_deref(), Some("e.g."));
}

#[test]
fn validation_of_missing_field_is_empty() {
    assert!(validate_questions(None).is_empty());
    assert!(validate_questions(Some(&json!("questions"))).is_empty());
}

#[test]
fn strip_code_fences_removes_markers_anywhere() {
    assert_eq!(strip_code_fences("a```rust b``` c"), "a b c");
    assert_eq!(strip_code_fences("no fences"), "no fences");
}
