use std::time::Duration;

use tracing::info;

use crate::agent::TextGenerator;
use crate::error::GuideError;
use crate::markup::escape;
use crate::response::FollowUpQuestion;
use crate::services::{AnswerSet, analyze, assemble};
use crate::ui::{PanelTone, Surface};

pub const CHOICE_SEND: &str = "yes";
pub const CHOICE_EDIT: &str = "edit";
pub const CHOICE_CANCEL: &str = "cancel";
const CONFIRM_CHOICES: [&str; 3] = [CHOICE_SEND, CHOICE_EDIT, CHOICE_CANCEL];

/// How a guided run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppOutcome {
    /// The draft is returned as typed.
    Unchanged(String),
    Assembled(String),
    Edited(String),
    /// The user backed out; nothing should be printed.
    Cancelled,
}

impl AppOutcome {
    pub fn final_prompt(&self) -> Option<&str> {
        match self {
            Self::Unchanged(text) | Self::Assembled(text) | Self::Edited(text) => Some(text),
            Self::Cancelled => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AppOptions {
    pub quiet: bool,
    pub analyze_timeout: Duration,
    pub assemble_timeout: Duration,
}

/// Drives one guided run: show the draft, analyze it, ask the follow-up
/// questions, assemble, then confirm.
pub struct App<'a, G: ?Sized, S: ?Sized> {
    generator: &'a G,
    surface: &'a mut S,
    options: AppOptions,
}

impl<'a, G, S> App<'a, G, S>
where
    G: TextGenerator + ?Sized,
    S: Surface + ?Sized,
{
    pub fn new(generator: &'a G, surface: &'a mut S, options: AppOptions) -> Self {
        Self {
            generator,
            surface,
            options,
        }
    }

    pub fn run(&mut self, draft: &str) -> Result<AppOutcome, GuideError> {
        if self.options.quiet {
            return self.run_quiet(draft);
        }

        self.show("")?;
        self.surface
            .show_panel(draft, "Your prompt", PanelTone::Draft)?;
        self.show("\n[dim]Thinking about what would help...[/dim]")?;

        let analysis = analyze(self.generator, draft, self.options.analyze_timeout)?;
        if !analysis.task_summary.is_empty() {
            self.show(&format!(
                "\n[dim]Understanding:[/dim] {}",
                escape(&analysis.task_summary)
            ))?;
        }
        if analysis.questions.is_empty() {
            self.show(
                "\n[green]Your prompt looks detailed enough, no extra questions needed.[/green]\n",
            )?;
            return Ok(AppOutcome::Unchanged(draft.to_string()));
        }

        let answers = self.ask_questions(&analysis.questions)?;
        if !answers.has_any_answer() {
            self.show("[dim]No extra context added. Using original prompt.[/dim]\n")?;
            return Ok(AppOutcome::Unchanged(draft.to_string()));
        }

        self.show("[dim]Assembling...[/dim]")?;
        let assembled = assemble(
            self.generator,
            draft,
            &answers,
            self.options.assemble_timeout,
        )?;
        self.surface
            .show_rule("Assembled Prompt", PanelTone::Final)?;
        self.surface
            .show_panel(&assembled, "Final Prompt", PanelTone::Final)?;
        self.show("")?;

        self.confirm(assembled)
    }

    /// Analysis still runs so failures surface in the log, but nothing is asked.
    fn run_quiet(&mut self, draft: &str) -> Result<AppOutcome, GuideError> {
        let analysis = analyze(self.generator, draft, self.options.analyze_timeout)?;
        info!(
            summary = %analysis.task_summary,
            questions = analysis.questions.len(),
            "quiet mode, returning draft unchanged"
        );
        Ok(AppOutcome::Unchanged(draft.to_string()))
    }

    fn ask_questions(&mut self, questions: &[FollowUpQuestion]) -> Result<AnswerSet, GuideError> {
        let count = questions.len();
        let plural = if count == 1 { "" } else { "s" };
        self.show(&format!(
            "\n[dim]{count} quick question{plural} (enter to skip any):[/dim]\n"
        ))?;

        let mut answers = AnswerSet::new();
        for (index, question) in questions.iter().enumerate() {
            self.show(&format!(
                "  [bold yellow]{}.[/bold yellow] {}",
                index + 1,
                escape(&question.question)
            ))?;
            if let Some(why) = &question.why {
                self.show(&format!("     [dim italic]{}[/dim italic]", escape(why)))?;
            }
            if let Some(example) = &question.example_answer {
                self.show(&format!("     [dim]e.g. {}[/dim]", escape(example)))?;
            }
            let answer = self.surface.ask_line("")?;
            answers.record(question.question.clone(), answer);
            self.show("")?;
        }
        Ok(answers)
    }

    fn confirm(&mut self, assembled: String) -> Result<AppOutcome, GuideError> {
        let choice = self
            .surface
            .ask_choice("Send to Claude?", &CONFIRM_CHOICES, CHOICE_SEND)?;
        match choice.as_str() {
            CHOICE_EDIT => {
                self.show("[dim]Type your edited prompt (Ctrl+D to finish):[/dim]")?;
                let lines = self.surface.read_lines_to_end()?;
                if lines.is_empty() {
                    Ok(AppOutcome::Assembled(assembled))
                } else {
                    Ok(AppOutcome::Edited(lines.join("\n")))
                }
            }
            CHOICE_CANCEL => Ok(AppOutcome::Cancelled),
            _ => Ok(AppOutcome::Assembled(assembled)),
        }
    }

    fn show(&mut self, markup: &str) -> Result<(), GuideError> {
        self.surface.show(markup)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/app_tests.rs"]
mod tests;
