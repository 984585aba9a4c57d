//! Lays out messages, the metrics panel and the status line as terminal lines.

use chrono::Local;
use ratatui::style::Style;
use ratatui::text::{Line, Span};

use crate::core::message::{Message, Role};
use crate::core::metrics::MetricsSnapshot;
use crate::core::session::ConnectionStatus;
use crate::ui::diagram::Diagram;
use crate::ui::markdown::render_markdown;
use crate::ui::theme::Theme;

pub const REASONING_TITLE: &str = "Reasoning Process";

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub markdown: bool,
    pub show_reasoning: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            markdown: true,
            show_reasoning: true,
        }
    }
}

#[derive(Debug, Default)]
pub struct MessageView {
    pub lines: Vec<Line<'static>>,
    pub diagrams: Vec<Diagram>,
}

fn plain_lines(content: &str, style: Style) -> Vec<Line<'static>> {
    content
        .lines()
        .map(|line| Line::from(Span::styled(line.replace('\t', "    "), style)))
        .collect()
}

/// Model, token count, response time and throughput, whichever are known.
pub fn meta_details(message: &Message) -> Vec<String> {
    let mut details = Vec::new();
    if message.is_assistant() {
        if let Some(model) = message.model.as_deref().filter(|m| !m.is_empty()) {
            details.push(model.to_string());
        }
    }
    if let Some(tokens) = message.token_count {
        details.push(format!("{tokens} tokens"));
    }
    if let Some(ms) = message.response_time_ms {
        details.push(format!("{ms} ms"));
    }
    if let Some(rate) = message.tokens_per_second() {
        details.push(format!("{rate} tokens/sec"));
    }
    details
}

pub fn meta_line(message: &Message, theme: &Theme) -> Line<'static> {
    let time = message
        .created_at
        .with_timezone(&Local)
        .format("%H:%M:%S")
        .to_string();
    let mut parts = vec![time];
    parts.extend(meta_details(message));
    Line::from(Span::styled(parts.join(" · "), theme.meta_style))
}

pub fn reasoning_block(reasoning: &str, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        format!("▸ {REASONING_TITLE}"),
        theme.reasoning_title_style,
    ))];
    for line in reasoning.trim().lines() {
        lines.push(Line::from(vec![
            Span::styled("│ ", theme.reasoning_title_style),
            Span::styled(line.to_string(), theme.reasoning_text_style),
        ]));
    }
    lines.push(Line::default());
    lines
}

/// Render one message: reasoning first, then the answer, then the meta line.
///
/// Diagrams are only extracted from finished messages.
pub fn render_message(message: &Message, theme: &Theme, options: RenderOptions) -> MessageView {
    let mut view = MessageView::default();

    match message.role {
        Role::User => {
            let mut body = message.content.lines();
            let first = body.next().unwrap_or_default().to_string();
            view.lines.push(Line::from(vec![
                Span::styled("You: ", theme.user_prefix_style),
                Span::styled(first, theme.user_text_style),
            ]));
            for line in body {
                view.lines.push(Line::from(Span::styled(
                    format!("     {line}"),
                    theme.user_text_style,
                )));
            }
        }
        Role::System => {
            view.lines
                .extend(plain_lines(&message.content, theme.system_text_style));
        }
        Role::Assistant => {
            if options.show_reasoning {
                if let Some(reasoning) = message.reasoning.as_deref() {
                    if !reasoning.trim().is_empty() {
                        view.lines.extend(reasoning_block(reasoning, theme));
                    }
                }
            }
            let content = message.content.trim_start();
            if message.is_error {
                view.lines
                    .extend(plain_lines(content, theme.error_text_style));
            } else if options.markdown {
                let rendered = render_markdown(
                    content,
                    theme.assistant_text_style,
                    theme,
                    !message.is_streaming,
                );
                view.lines.extend(rendered.lines);
                view.diagrams = rendered.diagrams;
            } else {
                view.lines
                    .extend(plain_lines(content, theme.assistant_text_style));
            }
        }
    }

    view.lines.push(meta_line(message, theme));
    view
}

/// Diagram sources shown under a title, after the message body.
pub fn diagram_lines(diagrams: &[Diagram], theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for diagram in diagrams {
        lines.push(Line::from(Span::styled(
            format!("[diagram {}] mermaid", diagram.index),
            theme.diagram_title_style,
        )));
        for line in diagram.source.lines() {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(line.to_string(), theme.code_style),
            ]));
        }
        lines.push(Line::default());
    }
    lines
}

pub fn metrics_panel(snapshot: &MetricsSnapshot, theme: &Theme) -> Vec<Line<'static>> {
    let rows = [
        ("Total tokens", snapshot.total_tokens.to_string()),
        ("Messages", snapshot.message_count.to_string()),
        (
            "Avg response",
            format!("{} ms", snapshot.average_response_time_ms),
        ),
        (
            "Throughput",
            format!("{} tokens/sec", snapshot.throughput_tokens_per_second),
        ),
    ];

    let mut lines = vec![Line::from(Span::styled(
        "Metrics",
        theme.heading_style,
    ))];
    for (label, value) in rows {
        lines.push(Line::from(vec![
            Span::styled(format!("  {label:<14}"), theme.metrics_label_style),
            Span::styled(value, theme.metrics_value_style),
        ]));
    }
    lines
}

pub fn status_line(status: ConnectionStatus, model: Option<&str>, theme: &Theme) -> Line<'static> {
    let indicator_style = match status {
        ConnectionStatus::Connected => theme.metrics_value_style,
        ConnectionStatus::Disconnected => theme.meta_style,
        ConnectionStatus::Error => theme.error_text_style,
    };
    let mut spans = vec![
        Span::styled("● ", indicator_style),
        Span::styled(status.label(), theme.meta_style),
    ];
    if let Some(model) = model {
        spans.push(Span::styled(format!(" · {model}"), theme.meta_style));
    }
    Line::from(spans)
}
