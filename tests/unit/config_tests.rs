use super::*;

use ratatui::style::Color;

#[test]
fn defaults_match_claude_print_mode() {
    let config = GuideConfig::default();
    assert_eq!(config.claude.program, "claude");
    assert_eq!(
        config.claude.args,
        vec!["--print", "--output-format", "text"]
    );
    assert_eq!(config.claude.system_prompt_flag, "--system-prompt");
    assert_eq!(config.claude.model, None);
    assert_eq!(config.analyze_timeout, Duration::from_secs(30));
    assert_eq!(config.assemble_timeout, Duration::from_secs(30));
    assert_eq!(config.ui_style, UiStyle::Auto);
    assert_eq!(
        config.claude.fallback_paths.last(),
        Some(&PathBuf::from("/usr/local/bin/claude"))
    );
}

#[test]
fn user_overrides_merge_over_defaults() {
    let config = GuideConfig::from_toml_str(
        r#"
[claude]
model = "opus"
analyze_timeout_secs = 5
fallback_paths = ["/opt/claude/bin/claude", "  "]

[ui]
style = "plain"

[theme]
accent = { r = 1, g = 2, b = 3 }
"#,
    )
    .expect("config should parse");

    assert_eq!(config.claude.program, "claude");
    assert_eq!(config.claude.model.as_deref(), Some("opus"));
    assert_eq!(config.analyze_timeout, Duration::from_secs(5));
    assert_eq!(config.assemble_timeout, Duration::from_secs(30));
    assert_eq!(
        config.claude.fallback_paths,
        vec![PathBuf::from("/opt/claude/bin/claude")]
    );
    assert_eq!(config.ui_style, UiStyle::Plain);
    assert_eq!(config.theme.accent, Color::Rgb(1, 2, 3));
    assert_eq!(config.theme.muted, Color::Rgb(150, 150, 150));
}

#[test]
fn zero_timeout_is_clamped_to_one_second() {
    let config = GuideConfig::from_toml_str("[claude]\nassemble_timeout_secs = 0\n")
        .expect("config should parse");
    assert_eq!(config.assemble_timeout, Duration::from_secs(1));
}

#[test]
fn unknown_style_is_rejected() {
    let err = GuideConfig::from_toml_str("[ui]\nstyle = \"fancy\"\n").expect_err("should fail");
    assert_eq!(err.kind(), io::ErrorKind::InvalidData);
}

#[test]
fn explicit_config_path_must_exist() {
    let err = GuideConfig::load(Some(Path::new("/definitely/not/prompt-guide.toml")))
        .expect_err("missing explicit config should fail");
    assert!(matches!(err, GuideError::Config { .. }));
}

#[test]
fn explicit_config_file_is_loaded() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[claude]\nprogram = \"/opt/bin/claude\"\n").expect("write config");
    let config = GuideConfig::load(Some(&path)).expect("config should load");
    assert_eq!(config.claude.program, "/opt/bin/claude");
}

#[test]
fn invalid_config_file_reports_path() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[claude\n").expect("write config");
    let err = GuideConfig::load(Some(&path)).expect_err("should fail");
    assert!(err.to_string().contains("config.toml"));
}

#[test]
fn empty_user_file_yields_built_in_defaults() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "\n").expect("write config");
    let config = GuideConfig::load(Some(&path)).expect("config should load");
    let builtin: toml::Value = toml::from_str(DEFAULT_CONFIG_TOML).expect("built-in toml");
    let claude = builtin.get("claude").expect("claude table");
    assert_eq!(
        config.claude.program,
        claude.get("program").and_then(|v| v.as_str()).unwrap_or_default()
    );
    assert_eq!(
        config.analyze_timeout.as_secs(),
        claude
            .get("analyze_timeout_secs")
            .and_then(|v| v.as_integer())
            .and_then(|secs| u64::try_from(secs).ok())
            .unwrap_or_default()
    );
    assert_eq!(config.theme.accent, Color::Rgb(230, 200, 90));
}
