use std::io;

use thiserror::Error;

pub const EXIT_FAILURE: u8 = 1;
/// Shell convention for a run ended by SIGINT.
pub const EXIT_INTERRUPTED: u8 = 130;

#[derive(Debug, Error)]
pub enum GuideError {
    #[error(
        "claude CLI not found (searched: {searched}). Is Claude Code installed?\n\
         Install: https://docs.anthropic.com/en/docs/claude-code"
    )]
    ToolNotFound { searched: String },
    #[error("No prompt provided.")]
    MissingPrompt,
    #[error("Failed to load config '{path}': {message}")]
    Config { path: String, message: String },
    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolFailure {
    #[error("claude CLI timed out after {0}s")]
    Timeout(u64),
    #[error("claude CLI exited with {code:?}: {stderr}")]
    NonzeroExit { code: Option<i32>, stderr: String },
    #[error("could not run claude CLI: {0}")]
    Spawn(String),
    #[error("claude CLI I/O failed: {0}")]
    Io(String),
}
