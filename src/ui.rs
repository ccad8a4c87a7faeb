use std::io::{self, BufRead, Write};

use crossterm::queue;
use crossterm::style::{
    Attribute, Color as TermColor, ContentStyle, Print, PrintStyledContent,
};
use ratatui::buffer::Buffer;
use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Padding, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::markup::{escape, strip_markup, to_spans};
use crate::text_layout::wrap_lines;
use crate::theme::Theme;

const MIN_PANEL_WIDTH: u16 = 20;
const DEFAULT_TERMINAL_WIDTH: u16 = 80;
const PANEL_HORIZONTAL_CHROME: u16 = 4;
const INPUT_PROMPT: &str = "  > ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelTone {
    Draft,
    Final,
}

/// Everything the session needs from a terminal. All of it goes to the
/// error stream so standard output stays pipeable.
pub trait Surface {
    fn show(&mut self, markup: &str) -> io::Result<()>;
    fn show_panel(&mut self, text: &str, title: &str, tone: PanelTone) -> io::Result<()>;
    fn show_rule(&mut self, title: &str, tone: PanelTone) -> io::Result<()>;
    /// Reads one answer. End-of-input and empty lines both yield `default`.
    fn ask_line(&mut self, default: &str) -> io::Result<String>;
    fn ask_choice(&mut self, prompt: &str, choices: &[&str], default: &str) -> io::Result<String>;
    /// Reads free-form lines until end-of-input.
    fn read_lines_to_end(&mut self) -> io::Result<Vec<String>>;
}

fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let trimmed_len = line.trim_end_matches(['\n', '\r']).len();
    line.truncate(trimmed_len);
    Ok(Some(line))
}

fn read_all_lines<R: BufRead>(input: &mut R) -> io::Result<Vec<String>> {
    let mut lines = Vec::new();
    while let Some(line) = read_line(input)? {
        lines.push(line);
    }
    Ok(lines)
}

fn answer_or_default(line: Option<String>, default: &str) -> String {
    line.map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Uncolored output with markup stripped.
pub struct PlainSurface<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PlainSurface<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    #[cfg(test)]
    pub fn output(&self) -> &W {
        &self.output
    }
}

impl<R: BufRead, W: Write> Surface for PlainSurface<R, W> {
    fn show(&mut self, markup: &str) -> io::Result<()> {
        writeln!(self.output, "{}", strip_markup(markup))
    }

    fn show_panel(&mut self, text: &str, title: &str, _tone: PanelTone) -> io::Result<()> {
        writeln!(self.output, "\n--- {title} ---")?;
        writeln!(self.output, "{text}")?;
        writeln!(self.output, "---\n")
    }

    fn show_rule(&mut self, _title: &str, _tone: PanelTone) -> io::Result<()> {
        Ok(())
    }

    fn ask_line(&mut self, default: &str) -> io::Result<String> {
        write!(self.output, "{INPUT_PROMPT}")?;
        self.output.flush()?;
        Ok(answer_or_default(read_line(&mut self.input)?, default))
    }

    fn ask_choice(&mut self, prompt: &str, choices: &[&str], default: &str) -> io::Result<String> {
        write!(
            self.output,
            "{prompt} [{}] ({default}): ",
            choices.join("/")
        )?;
        self.output.flush()?;
        let raw = answer_or_default(read_line(&mut self.input)?, default);
        if choices.contains(&raw.as_str()) {
            Ok(raw)
        } else {
            Ok(default.to_string())
        }
    }

    fn read_lines_to_end(&mut self) -> io::Result<Vec<String>> {
        read_all_lines(&mut self.input)
    }
}

/// Styled output: markup becomes colors, panels get rounded borders.
pub struct RichSurface<R, W> {
    input: R,
    output: W,
    theme: Theme,
    width: u16,
}

impl<R: BufRead, W: Write> RichSurface<R, W> {
    pub fn new(input: R, output: W, theme: Theme, width: u16) -> Self {
        Self {
            input,
            output,
            theme,
            width: width.max(MIN_PANEL_WIDTH),
        }
    }

    #[cfg(test)]
    pub fn output(&self) -> &W {
        &self.output
    }

    fn tone_color(&self, tone: PanelTone) -> Color {
        match tone {
            PanelTone::Draft => self.theme.draft_border,
            PanelTone::Final => self.theme.final_border,
        }
    }

    fn write_markup(&mut self, markup: &str) -> io::Result<()> {
        for span in to_spans(markup, &self.theme) {
            queue!(
                self.output,
                PrintStyledContent(content_style(span.style).apply(span.content))
            )?;
        }
        Ok(())
    }
}

impl<R: BufRead, W: Write> Surface for RichSurface<R, W> {
    fn show(&mut self, markup: &str) -> io::Result<()> {
        self.write_markup(markup)?;
        queue!(self.output, Print("\n"))?;
        self.output.flush()
    }

    fn show_panel(&mut self, text: &str, title: &str, tone: PanelTone) -> io::Result<()> {
        let buffer = render_panel(text, title, self.tone_color(tone), self.width);
        write_buffer(&mut self.output, &buffer)
    }

    fn show_rule(&mut self, title: &str, tone: PanelTone) -> io::Result<()> {
        let rule = rule_text(title, self.width);
        let style = Style::default().fg(self.tone_color(tone));
        queue!(
            self.output,
            PrintStyledContent(content_style(style).apply(rule)),
            Print("\n")
        )?;
        self.output.flush()
    }

    fn ask_line(&mut self, default: &str) -> io::Result<String> {
        self.write_markup("  [bold]>[/bold] ")?;
        if !default.is_empty() {
            self.write_markup(&format!("[cyan]({default})[/cyan] "))?;
        }
        self.output.flush()?;
        Ok(answer_or_default(read_line(&mut self.input)?, default))
    }

    fn ask_choice(&mut self, prompt: &str, choices: &[&str], default: &str) -> io::Result<String> {
        loop {
            let listed = escape(&format!("[{}]", choices.join("/")));
            self.write_markup(&format!(
                "[bold]{prompt}[/bold] [magenta]{listed}[/magenta] [cyan]({default})[/cyan]: "
            ))?;
            self.output.flush()?;
            let raw = answer_or_default(read_line(&mut self.input)?, default);
            if choices.contains(&raw.as_str()) {
                return Ok(raw);
            }
            self.show("[red]Please select one of the available options[/red]")?;
        }
    }

    fn read_lines_to_end(&mut self) -> io::Result<Vec<String>> {
        read_all_lines(&mut self.input)
    }
}

/// Draws a bordered panel sized to fit the wrapped text.
pub(crate) fn render_panel(text: &str, title: &str, border: Color, width: u16) -> Buffer {
    let width = width.max(MIN_PANEL_WIDTH);
    let rows = wrap_lines(text, width.saturating_sub(PANEL_HORIZONTAL_CHROME));
    let height = u16::try_from(rows.len())
        .unwrap_or(u16::MAX)
        .saturating_add(2);
    let area = Rect::new(0, 0, width, height);
    let mut buffer = Buffer::empty(area);
    let border_style = Style::default().fg(border);
    let lines: Vec<Line<'_>> = rows.into_iter().map(Line::from).collect();
    Paragraph::new(lines)
        .style(Style::default().add_modifier(Modifier::BOLD))
        .block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .border_style(border_style)
                .title(Line::styled(format!(" {title} "), border_style))
                .title_alignment(Alignment::Left)
                .padding(Padding::horizontal(1)),
        )
        .render(area, &mut buffer);
    buffer
}

pub(crate) fn rule_text(title: &str, width: u16) -> String {
    let label = format!(" {title} ");
    let label_len = label.width();
    let width = usize::from(width);
    if label_len + 2 > width {
        return label.trim().to_string();
    }
    let left = (width - label_len) / 2;
    let right = width - label_len - left;
    format!("{}{label}{}", "─".repeat(left), "─".repeat(right))
}

fn write_buffer<W: Write>(output: &mut W, buffer: &Buffer) -> io::Result<()> {
    let area = buffer.area;
    for y in area.top()..area.bottom() {
        for (style, text) in row_runs(buffer, y) {
            queue!(output, PrintStyledContent(content_style(style).apply(text)))?;
        }
        queue!(output, Print("\n"))?;
    }
    output.flush()
}

/// One buffer row as runs of equally styled text. Cells hidden behind a wide
/// glyph are skipped, the same way ratatui's own diff skips them.
pub(crate) fn row_runs(buffer: &Buffer, y: u16) -> Vec<(Style, String)> {
    let area = buffer.area;
    let mut runs: Vec<(Style, String)> = Vec::new();
    let mut to_skip = 0usize;
    for x in area.left()..area.right() {
        let cell = &buffer[(x, y)];
        if to_skip > 0 {
            to_skip -= 1;
            continue;
        }
        to_skip = cell.symbol().width().saturating_sub(1);
        let style = cell.style();
        match runs.last_mut() {
            Some((run_style, text)) if *run_style == style => text.push_str(cell.symbol()),
            _ => runs.push((style, cell.symbol().to_string())),
        }
    }
    runs
}

fn content_style(style: Style) -> ContentStyle {
    let mut content = ContentStyle::new();
    content.foreground_color = style.fg.map(to_term_color);
    content.background_color = style.bg.map(to_term_color);
    for (modifier, attribute) in [
        (Modifier::BOLD, Attribute::Bold),
        (Modifier::DIM, Attribute::Dim),
        (Modifier::ITALIC, Attribute::Italic),
        (Modifier::UNDERLINED, Attribute::Underlined),
    ] {
        if style.add_modifier.contains(modifier) {
            content.attributes.set(attribute);
        }
    }
    content
}

fn to_term_color(color: Color) -> TermColor {
    match color {
        Color::Reset => TermColor::Reset,
        Color::Black => TermColor::Black,
        Color::Red => TermColor::DarkRed,
        Color::Green => TermColor::DarkGreen,
        Color::Yellow => TermColor::DarkYellow,
        Color::Blue => TermColor::DarkBlue,
        Color::Magenta => TermColor::DarkMagenta,
        Color::Cyan => TermColor::DarkCyan,
        Color::Gray => TermColor::Grey,
        Color::DarkGray => TermColor::DarkGrey,
        Color::LightRed => TermColor::Red,
        Color::LightGreen => TermColor::Green,
        Color::LightYellow => TermColor::Yellow,
        Color::LightBlue => TermColor::Blue,
        Color::LightMagenta => TermColor::Magenta,
        Color::LightCyan => TermColor::Cyan,
        Color::White => TermColor::White,
        Color::Rgb(r, g, b) => TermColor::Rgb { r, g, b },
        Color::Indexed(index) => TermColor::AnsiValue(index),
    }
}

/// Width of the terminal behind stderr, or a sane default when detached.
pub fn terminal_width() -> u16 {
    crossterm::terminal::size()
        .map(|(width, _)| width)
        .unwrap_or(DEFAULT_TERMINAL_WIDTH)
}

#[cfg(test)]
#[path = "../tests/unit/ui_tests.rs"]
mod tests;
