//! Line-oriented terminal output with crossterm styling

use crate::view::{LogView, ViewUpdate};
use logview_highlight::{Color, HighlightEngine, SpanStyle};
use ratatui::crossterm::{
    cursor::MoveTo,
    queue,
    style::{self, Attribute, ContentStyle, Print, PrintStyledContent, Stylize},
    terminal::{Clear, ClearType},
};
use std::io::{self, Write};

fn terminal_color(color: Color) -> style::Color {
    style::Color::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}

fn content_style(span: &SpanStyle) -> ContentStyle {
    let mut style = ContentStyle::new();
    style.foreground_color = span.foreground.map(terminal_color);
    style.background_color = span.background.map(terminal_color);
    if span.is_bold() {
        style.attributes.set(Attribute::Bold);
    }
    if span.is_italic() {
        style.attributes.set(Attribute::Italic);
    }
    style
}

/// Queue one highlighted line followed by a newline
pub fn write_line<W: Write>(out: &mut W, engine: &HighlightEngine, line: &str) -> io::Result<()> {
    for segment in engine.segments(line) {
        match segment.style {
            Some(span) => queue!(out, PrintStyledContent(content_style(&span).apply(segment.text)))?,
            None => queue!(out, Print(segment.text))?,
        }
    }
    queue!(out, Print("\n"))
}

fn write_notice<W: Write>(out: &mut W, text: &str) -> io::Result<()> {
    queue!(out, PrintStyledContent(format!("-- {} --", text).dim().italic()), Print("\n"))
}

/// Print what `update` requires and flush
pub fn render<W: Write>(out: &mut W, view: &LogView, update: &ViewUpdate) -> io::Result<()> {
    match update {
        ViewUpdate::Nothing => return Ok(()),
        ViewUpdate::Repaint => {
            queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;
            if let Some(path) = view.path() {
                write_notice(out, &path.display().to_string())?;
            }
            for line in view.lines() {
                write_line(out, view.engine(), line)?;
            }
        }
        ViewUpdate::Append(from) => {
            for line in view.lines().iter().skip(*from) {
                write_line(out, view.engine(), line)?;
            }
        }
        ViewUpdate::Jump(hit) => {
            if let Some(line) = view.lines().get(hit.line) {
                queue!(out, PrintStyledContent(format!("{:>6} > ", hit.line + 1).bold()))?;
                write_line(out, view.engine(), line)?;
            }
        }
        ViewUpdate::Notice(text) => write_notice(out, text)?,
    }
    out.flush()
}
