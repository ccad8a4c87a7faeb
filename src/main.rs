use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use tracing::warn;
use tracing_subscriber::EnvFilter;

mod agent;
mod app;
mod artifact_io;
mod config;
mod error;
mod markup;
mod response;
mod services;
mod subagents;
mod text_layout;
mod theme;
mod ui;

use agent::ClaudeCli;
use app::{App, AppOptions};
use config::{GuideConfig, UiStyle, timeout_from_secs};
use error::{EXIT_FAILURE, EXIT_INTERRUPTED, GuideError};
use ui::{PlainSurface, RichSurface, Surface, terminal_width};

#[derive(Debug, Parser)]
#[command(
    name = "prompt-guide",
    version,
    about = "Guided prompt builder for Claude Code"
)]
struct Cli {
    /// Your initial prompt
    prompt: Option<String>,
    /// Output only the final prompt (for piping to claude)
    #[arg(short, long)]
    quiet: bool,
    /// Plain text output without colors or panels
    #[arg(long)]
    plain: bool,
    /// Config file to merge over the defaults
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Model passed to the claude CLI
    #[arg(long)]
    model: Option<String>,
    /// Seconds to wait for each claude call
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,
    /// Log more to stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum DraftSource {
    Argument(String),
    Stdin,
    Interactive,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    install_interrupt_handler();
    match run(cli) {
        Ok(Some(prompt)) => {
            println!("{prompt}");
            ExitCode::SUCCESS
        }
        Ok(None) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("prompt_guide={level}")));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .try_init();
}

/// Ctrl+C ends the run at any point with the conventional status 130 and
/// nothing on stdout.
fn install_interrupt_handler() {
    let installed = ctrlc::set_handler(|| {
        eprintln!();
        std::process::exit(i32::from(EXIT_INTERRUPTED));
    });
    if let Err(err) = installed {
        warn!("Could not install Ctrl+C handler: {err}");
    }
}

fn run(cli: Cli) -> Result<Option<String>, GuideError> {
    let mut config = GuideConfig::load(cli.config.as_deref())?;
    apply_overrides(&mut config, &cli);

    let claude = ClaudeCli::from_config(config.claude.clone());
    claude.ensure_available()?;

    let stdin_is_terminal = io::stdin().is_terminal();
    let quiet = cli.quiet || !stdin_is_terminal;
    let source = draft_source(cli.prompt, stdin_is_terminal);
    // Piped input must be drained before the surface takes the stdin lock.
    let known_draft = match source {
        DraftSource::Argument(text) => Some(text),
        DraftSource::Stdin => Some(read_piped_stdin()?),
        DraftSource::Interactive => None,
    };

    let mut surface = build_surface(&config, cli.plain);
    let draft = match known_draft {
        Some(text) => text,
        None => {
            surface.show("\n[bold]What do you want Claude Code to do?[/bold]")?;
            surface.ask_line("")?
        }
    };
    let draft = draft.trim();
    if draft.is_empty() {
        return Err(GuideError::MissingPrompt);
    }

    let options = AppOptions {
        quiet,
        analyze_timeout: config.analyze_timeout,
        assemble_timeout: config.assemble_timeout,
    };
    let outcome = App::new(&claude, surface.as_mut(), options).run(draft)?;
    Ok(outcome.final_prompt().map(ToString::to_string))
}

fn apply_overrides(config: &mut GuideConfig, cli: &Cli) {
    if let Some(model) = cli
        .model
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
    {
        config.claude.model = Some(model.to_string());
    }
    if let Some(secs) = cli.timeout {
        config.analyze_timeout = timeout_from_secs(secs);
        config.assemble_timeout = timeout_from_secs(secs);
    }
    if cli.plain {
        config.ui_style = UiStyle::Plain;
    }
}

fn draft_source(prompt: Option<String>, stdin_is_terminal: bool) -> DraftSource {
    match prompt.filter(|text| !text.trim().is_empty()) {
        Some(text) => DraftSource::Argument(text),
        None if !stdin_is_terminal => DraftSource::Stdin,
        None => DraftSource::Interactive,
    }
}

fn read_piped_stdin() -> Result<String, GuideError> {
    let mut text = String::new();
    io::stdin().read_to_string(&mut text)?;
    Ok(text.trim().to_string())
}

fn use_rich_surface(style: UiStyle, plain_flag: bool, stderr_is_terminal: bool) -> bool {
    if plain_flag {
        return false;
    }
    match style {
        UiStyle::Rich => true,
        UiStyle::Plain => false,
        UiStyle::Auto => stderr_is_terminal,
    }
}

fn build_surface(config: &GuideConfig, plain_flag: bool) -> Box<dyn Surface> {
    let input = io::stdin().lock();
    let output = io::stderr();
    if use_rich_surface(config.ui_style, plain_flag, output.is_terminal()) {
        Box::new(RichSurface::new(
            input,
            output,
            config.theme.clone(),
            terminal_width(),
        ))
    } else {
        Box::new(PlainSurface::new(input, output))
    }
}
