use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::agent::ClaudeCommandConfig;
use crate::artifact_io::{
    default_config_file_path, expand_home, merge_config_with_user_overrides, read_text_file,
    read_text_file_if_exists,
};
use crate::error::GuideError;
use crate::theme::{Theme, ThemeToml};

pub const DEFAULT_CONFIG_TOML: &str = r#"[claude]
program = "claude"
fallback_paths = ["~/.claude/local/claude", "/usr/local/bin/claude"]
args = ["--print", "--output-format", "text"]
system_prompt_flag = "--system-prompt"
model = ""
analyze_timeout_secs = 30
assemble_timeout_secs = 30

[ui]
style = "auto"

[theme]
draft_border = { r = 88, g = 140, b = 230 }
final_border = { r = 96, g = 196, b = 120 }
accent = { r = 230, g = 200, b = 90 }
muted = { r = 150, g = 150, b = 150 }
success = { r = 96, g = 196, b = 120 }
"#;

const BUILT_IN_CONFIG_NAME: &str = "<built-in defaults>";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UiStyle {
    Auto,
    Rich,
    Plain,
}

#[derive(Debug, Clone)]
pub struct GuideConfig {
    pub claude: ClaudeCommandConfig,
    pub analyze_timeout: Duration,
    pub assemble_timeout: Duration,
    pub ui_style: UiStyle,
    pub theme: Theme,
}

#[cfg(test)]
impl Default for GuideConfig {
    fn default() -> Self {
        Self::from_toml_str("").expect("built-in config should parse")
    }
}

impl GuideConfig {
    /// Loads defaults merged with the user's file. An explicit path must be
    /// readable; the default location may be absent.
    pub fn load(explicit: Option<&Path>) -> Result<Self, GuideError> {
        let (path, text) = match explicit {
            Some(path) => {
                let text = read_text_file(path).map_err(|err| config_error(path, &err))?;
                (path.to_path_buf(), Some(text))
            }
            None => match default_config_file_path() {
                Ok(path) => {
                    let text =
                        read_text_file_if_exists(&path).map_err(|err| config_error(&path, &err))?;
                    (path, text)
                }
                Err(_) => (PathBuf::from(BUILT_IN_CONFIG_NAME), None),
            },
        };
        Self::from_toml_str(text.as_deref().unwrap_or_default())
            .map_err(|err| config_error(&path, &err))
    }

    pub fn from_toml_str(text: &str) -> io::Result<Self> {
        let merged = merge_config_with_user_overrides(DEFAULT_CONFIG_TOML, Some(text))?;
        let file: GuideConfigFile = merged
            .try_into()
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        Ok(file.into_runtime())
    }
}

fn config_error(path: &Path, err: &io::Error) -> GuideError {
    GuideError::Config {
        path: path.display().to_string(),
        message: err.to_string(),
    }
}

#[derive(Debug, Deserialize)]
struct GuideConfigFile {
    claude: ClaudeConfigFile,
    ui: UiConfigFile,
    theme: ThemeToml,
}

#[derive(Debug, Deserialize)]
struct ClaudeConfigFile {
    program: String,
    fallback_paths: Vec<String>,
    args: Vec<String>,
    system_prompt_flag: String,
    #[serde(default)]
    model: Option<String>,
    analyze_timeout_secs: u64,
    assemble_timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
struct UiConfigFile {
    style: UiStyle,
}

impl GuideConfigFile {
    fn into_runtime(self) -> GuideConfig {
        let claude = self.claude;
        let model = claude
            .model
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        GuideConfig {
            claude: ClaudeCommandConfig {
                program: claude.program.trim().to_string(),
                fallback_paths: claude
                    .fallback_paths
                    .iter()
                    .map(|path| path.trim())
                    .filter(|path| !path.is_empty())
                    .map(expand_home)
                    .collect::<Vec<PathBuf>>(),
                args: claude.args,
                system_prompt_flag: claude.system_prompt_flag,
                model,
            },
            analyze_timeout: timeout_from_secs(claude.analyze_timeout_secs),
            assemble_timeout: timeout_from_secs(claude.assemble_timeout_secs),
            ui_style: self.ui.style,
            theme: Theme::from(self.theme),
        }
    }
}

pub(crate) fn timeout_from_secs(secs: u64) -> Duration {
    Duration::from_secs(secs.max(1))
}

#[cfg(test)]
#[path = "../tests/unit/config_tests.rs"]
mod tests;
