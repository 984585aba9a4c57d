//! Writes styled lines to a terminal, and echoes a reply while it streams.

use std::io::{self, IsTerminal, Write};

use ratatui::crossterm::style::{
    Attribute, Color as TermColor, ContentStyle, PrintStyledContent, StyledContent,
};
use ratatui::crossterm::QueueableCommand;
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;

use crate::core::chat_stream::StreamEvent;
use crate::ui::render::REASONING_TITLE;
use crate::ui::theme::Theme;

/// Color output only on a terminal, and never when `NO_COLOR` is set.
pub fn stdout_supports_color() -> bool {
    io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

fn content_style(style: Style) -> ContentStyle {
    let mut content = ContentStyle::new();
    content.foreground_color = style.fg.map(TermColor::from);
    content.background_color = style.bg.map(TermColor::from);
    for (modifier, attribute) in [
        (Modifier::BOLD, Attribute::Bold),
        (Modifier::DIM, Attribute::Dim),
        (Modifier::ITALIC, Attribute::Italic),
        (Modifier::UNDERLINED, Attribute::Underlined),
        (Modifier::CROSSED_OUT, Attribute::CrossedOut),
        (Modifier::REVERSED, Attribute::Reverse),
    ] {
        if style.add_modifier.contains(modifier) {
            content.attributes.set(attribute);
        }
    }
    content
}

fn write_fragment<W: Write + ?Sized>(
    out: &mut W,
    text: &str,
    style: Style,
    color: bool,
) -> io::Result<()> {
    if color && style != Style::default() {
        out.queue(PrintStyledContent(StyledContent::new(
            content_style(style),
            text,
        )))?;
        Ok(())
    } else {
        out.write_all(text.as_bytes())
    }
}

pub fn write_lines<W: Write + ?Sized>(
    out: &mut W,
    lines: &[Line<'_>],
    color: bool,
) -> io::Result<()> {
    for line in lines {
        for span in &line.spans {
            write_fragment(out, &span.content, line.style.patch(span.style), color)?;
        }
        out.write_all(b"\n")?;
    }
    out.flush()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LiveSection {
    Reasoning,
    Answer,
}

/// Echoes stream deltas as they arrive: reasoning under its own heading,
/// answer text after it.
pub struct LiveView<W: Write> {
    out: W,
    theme: Theme,
    color: bool,
    show_reasoning: bool,
    echo_answer: bool,
    section: Option<LiveSection>,
}

impl<W: Write> LiveView<W> {
    pub fn new(out: W, theme: Theme, color: bool) -> Self {
        Self {
            out,
            theme,
            color,
            show_reasoning: true,
            echo_answer: true,
            section: None,
        }
    }

    pub fn show_reasoning(mut self, show: bool) -> Self {
        self.show_reasoning = show;
        self
    }

    /// Leave answer text out when it will be rendered once complete.
    pub fn echo_answer(mut self, echo: bool) -> Self {
        self.echo_answer = echo;
        self
    }

    pub fn on_event(&mut self, event: StreamEvent<'_>) -> io::Result<()> {
        let StreamEvent::Delta(progress) = event else {
            return Ok(());
        };

        if self.show_reasoning && !progress.reasoning_delta.is_empty() {
            if self.section != Some(LiveSection::Reasoning) {
                if self.section.is_some() {
                    self.out.write_all(b"\n\n")?;
                }
                let title = format!("▸ {REASONING_TITLE}\n");
                write_fragment(
                    &mut self.out,
                    &title,
                    self.theme.reasoning_title_style,
                    self.color,
                )?;
                self.section = Some(LiveSection::Reasoning);
            }
            write_fragment(
                &mut self.out,
                progress.reasoning_delta,
                self.theme.reasoning_text_style,
                self.color,
            )?;
        }

        if self.echo_answer && !progress.visible_delta.is_empty() {
            let mut text = progress.visible_delta;
            if self.section != Some(LiveSection::Answer) {
                text = text.trim_start();
                if text.is_empty() {
                    return self.out.flush();
                }
                if self.section.is_some() {
                    self.out.write_all(b"\n\n")?;
                }
                self.section = Some(LiveSection::Answer);
            }
            write_fragment(
                &mut self.out,
                text,
                self.theme.assistant_text_style,
                self.color,
            )?;
        }

        self.out.flush()
    }

    /// End the echoed block; the next reply starts fresh.
    pub fn finish(&mut self) -> io::Result<()> {
        if self.section.take().is_some() {
            self.out.write_all(b"\n\n")?;
        }
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::chat_stream::StreamProgress;
    use ratatui::text::Span;

    fn delta<'a>(visible_delta: &'a str, reasoning_delta: &'a str) -> StreamEvent<'a> {
        StreamEvent::Delta(StreamProgress {
            visible: "",
            reasoning: "",
            visible_delta,
            reasoning_delta,
        })
    }

    #[test]
    fn plain_output_has_no_escape_codes() {
        let lines = vec![
            Line::from(vec![Span::raw("a "), Span::styled("b", Theme::dark().heading_style)]),
            Line::default(),
        ];
        let mut out = Vec::new();
        write_lines(&mut out, &lines, false).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "a b\n\n");
    }

    #[test]
    fn colored_output_wraps_styled_spans() {
        let lines = vec![Line::from(Span::styled("hi", Theme::dark().heading_style))];
        let mut out = Vec::new();
        write_lines(&mut out, &lines, true).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\u{1b}["));
        assert!(text.contains("hi"));
    }

    #[test]
    fn live_view_separates_reasoning_and_answer() {
        let mut view = LiveView::new(Vec::new(), Theme::dark(), false);
        view.on_event(StreamEvent::Started).unwrap();
        view.on_event(delta("", "think")).unwrap();
        view.on_event(delta("", "ing")).unwrap();
        view.on_event(delta("\n\n", "")).unwrap();
        view.on_event(delta("Answer", "")).unwrap();
        view.finish().unwrap();

        let text = String::from_utf8(view.into_inner()).unwrap();
        assert_eq!(text, format!("▸ {REASONING_TITLE}\nthinking\n\nAnswer\n\n"));
    }

    #[test]
    fn hidden_reasoning_and_answer_print_nothing() {
        let mut view = LiveView::new(Vec::new(), Theme::dark(), false)
            .show_reasoning(false)
            .echo_answer(false);
        view.on_event(delta("text", "thought")).unwrap();
        view.finish().unwrap();
        assert!(view.into_inner().is_empty());
    }
}
