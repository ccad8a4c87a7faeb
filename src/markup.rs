//! Console markup used for session chrome: `[bold yellow]1.[/bold yellow] text`.
//!
//! A tag is `[`, an optional `/`, an ASCII letter, word characters, then any
//! number of space-separated words, then `]`. A backslash directly before the
//! `[` escapes the tag so it renders literally.

use std::sync::LazyLock;

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use regex::Regex;

use crate::theme::Theme;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\?\[/?[A-Za-z]\w*(?: \w+)*\]").expect("markup tag pattern should compile")
});

/// Removes every markup tag; escaped tags are kept as literal text.
pub fn strip_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for found in TAG_RE.find_iter(text) {
        out.push_str(&text[last..found.start()]);
        if let Some(literal) = found.as_str().strip_prefix('\\') {
            out.push_str(literal);
        }
        last = found.end();
    }
    out.push_str(&text[last..]);
    out
}

/// Escapes text so `[word]` sequences inside it are never read as tags.
///
/// A backslash already sitting before a tag is kept: the tag gets a second
/// backslash, which leaves the first one as plain text.
pub fn escape(text: &str) -> String {
    TAG_RE
        .replace_all(text, |caps: &regex::Captures<'_>| format!("\\{}", &caps[0]))
        .into_owned()
}

/// Parses markup into styled spans. Closing tags pop the innermost open style.
pub fn to_spans(text: &str, theme: &Theme) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut stack = vec![Style::default()];
    let mut last = 0;
    for found in TAG_RE.find_iter(text) {
        let current = stack.last().copied().unwrap_or_default();
        push_text(&mut spans, &text[last..found.start()], current);
        last = found.end();

        let tag = found.as_str();
        if let Some(literal) = tag.strip_prefix('\\') {
            push_text(&mut spans, literal, current);
            continue;
        }
        let body = &tag[1..tag.len() - 1];
        if body.starts_with('/') {
            if stack.len() > 1 {
                stack.pop();
            }
        } else {
            stack.push(apply_words(current, body, theme));
        }
    }
    let current = stack.last().copied().unwrap_or_default();
    push_text(&mut spans, &text[last..], current);
    spans
}

fn push_text(spans: &mut Vec<Span<'static>>, text: &str, style: Style) {
    if !text.is_empty() {
        spans.push(Span::styled(text.to_string(), style));
    }
}

fn apply_words(base: Style, body: &str, theme: &Theme) -> Style {
    body.split(' ').fold(base, |style, word| match word {
        "bold" => style.add_modifier(Modifier::BOLD),
        "dim" => style.fg(theme.muted),
        "italic" => style.add_modifier(Modifier::ITALIC),
        "underline" => style.add_modifier(Modifier::UNDERLINED),
        "yellow" => style.fg(theme.accent),
        "green" => style.fg(theme.success),
        "black" => style.fg(Color::Black),
        "red" => style.fg(Color::Red),
        "blue" => style.fg(Color::Blue),
        "magenta" => style.fg(Color::Magenta),
        "cyan" => style.fg(Color::Cyan),
        "white" => style.fg(Color::White),
        _ => style,
    })
}
