use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::ui::diagram::{fix_parenthesized_labels, is_diagram_language, Diagram};
use crate::ui::theme::Theme;

const RULE_WIDTH: usize = 40;

#[derive(Clone, Debug)]
enum ListKind {
    Unordered,
    Ordered(u64),
}

struct CodeBlock {
    language: String,
    text: String,
}

struct PendingLink {
    url: String,
    text: String,
}

/// Markdown laid out as terminal lines, plus any diagrams pulled out of it.
#[derive(Debug, Default)]
pub struct RenderedMarkdown {
    pub lines: Vec<Line<'static>>,
    pub diagrams: Vec<Diagram>,
}

/// Lay out `content` with `base` as the body style.
///
/// With `extract_diagrams` set, fenced diagram blocks are replaced by a
/// `[diagram N]` marker and returned separately. Partial replies should be
/// rendered with it unset so an unfinished diagram shows as plain code.
pub fn render_markdown(
    content: &str,
    base: Style,
    theme: &Theme,
    extract_diagrams: bool,
) -> RenderedMarkdown {
    let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES | Options::ENABLE_TASKLISTS;
    let mut renderer = MarkdownRenderer::new(base, theme, extract_diagrams);
    for event in Parser::new_ext(content, options) {
        renderer.handle(event);
    }
    renderer.finish()
}

fn heading_depth(level: HeadingLevel) -> usize {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

struct MarkdownRenderer<'t> {
    theme: &'t Theme,
    extract_diagrams: bool,
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
    styles: Vec<Style>,
    lists: Vec<ListKind>,
    bullet: Option<String>,
    quote_depth: usize,
    table_cell: usize,
    code_block: Option<CodeBlock>,
    links: Vec<PendingLink>,
    diagrams: Vec<Diagram>,
}

impl<'t> MarkdownRenderer<'t> {
    fn new(base: Style, theme: &'t Theme, extract_diagrams: bool) -> Self {
        Self {
            theme,
            extract_diagrams,
            lines: Vec::new(),
            current: Vec::new(),
            styles: vec![base],
            lists: Vec::new(),
            bullet: None,
            quote_depth: 0,
            table_cell: 0,
            code_block: None,
            links: Vec::new(),
            diagrams: Vec::new(),
        }
    }

    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag_end) => self.end(tag_end),
            Event::Text(text) => {
                if let Some(code) = self.code_block.as_mut() {
                    code.text.push_str(&text);
                } else {
                    if let Some(link) = self.links.last_mut() {
                        link.text.push_str(&text);
                    }
                    let style = self.style();
                    self.push_text(&text, style);
                }
            }
            Event::Code(code) => {
                if let Some(link) = self.links.last_mut() {
                    link.text.push_str(&code);
                }
                let style = self.style().patch(self.theme.code_style);
                self.push_text(&code, style);
            }
            Event::Html(html) | Event::InlineHtml(html) => {
                let style = self.style();
                self.push_text(&html, style);
            }
            Event::SoftBreak => {
                let style = self.style();
                self.push_text(" ", style);
            }
            Event::HardBreak => self.flush_line(),
            Event::Rule => {
                self.flush_line();
                self.lines.push(Line::from(Span::styled(
                    "─".repeat(RULE_WIDTH),
                    self.theme.meta_style,
                )));
                self.blank_line();
            }
            Event::TaskListMarker(checked) => {
                let style = self.style();
                self.push_text(if checked { "[x] " } else { "[ ] " }, style);
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { level, .. } => {
                self.flush_line();
                self.push_style(self.theme.heading_style);
                let style = self.style();
                self.push_text(&format!("{} ", "#".repeat(heading_depth(level))), style);
            }
            Tag::BlockQuote(_) => {
                self.flush_line();
                self.quote_depth += 1;
                self.push_style(self.theme.quote_style);
            }
            Tag::List(start) => {
                self.flush_line();
                self.lists.push(match start {
                    Some(n) => ListKind::Ordered(n),
                    None => ListKind::Unordered,
                });
            }
            Tag::Item => {
                self.flush_line();
                let indent = "  ".repeat(self.lists.len().saturating_sub(1));
                let marker = match self.lists.last_mut() {
                    Some(ListKind::Ordered(n)) => {
                        let marker = format!("{n}. ");
                        *n += 1;
                        marker
                    }
                    _ => "• ".to_string(),
                };
                self.bullet = Some(format!("{indent}{marker}"));
            }
            Tag::CodeBlock(kind) => {
                self.flush_line();
                let language = match kind {
                    CodeBlockKind::Indented => String::new(),
                    CodeBlockKind::Fenced(info) => {
                        info.split_ascii_whitespace().next().unwrap_or("").to_string()
                    }
                };
                self.code_block = Some(CodeBlock {
                    language,
                    text: String::new(),
                });
            }
            Tag::Emphasis => self.push_style(Style::default().add_modifier(Modifier::ITALIC)),
            Tag::Strong => self.push_style(Style::default().add_modifier(Modifier::BOLD)),
            Tag::Strikethrough => {
                self.push_style(Style::default().add_modifier(Modifier::CROSSED_OUT))
            }
            Tag::Link { dest_url, .. } | Tag::Image { dest_url, .. } => {
                self.push_style(self.theme.link_style);
                self.links.push(PendingLink {
                    url: dest_url.to_string(),
                    text: String::new(),
                });
            }
            Tag::Table(_) => self.flush_line(),
            Tag::TableHead => {
                self.table_cell = 0;
                self.push_style(Style::default().add_modifier(Modifier::BOLD));
            }
            Tag::TableRow => self.table_cell = 0,
            Tag::TableCell => {
                if self.table_cell > 0 {
                    self.push_text(" │ ", self.theme.meta_style);
                }
                self.table_cell += 1;
            }
            _ => {}
        }
    }

    fn end(&mut self, tag_end: TagEnd) {
        match tag_end {
            TagEnd::Paragraph => {
                if self.lists.is_empty() {
                    self.blank_line();
                } else {
                    self.flush_line();
                }
            }
            TagEnd::Heading(_) => {
                self.pop_style();
                self.blank_line();
            }
            TagEnd::BlockQuote(_) => {
                self.flush_line();
                self.pop_style();
                self.quote_depth = self.quote_depth.saturating_sub(1);
                if self.quote_depth == 0 {
                    self.blank_line();
                }
            }
            TagEnd::List(_) => {
                self.flush_line();
                self.lists.pop();
                if self.lists.is_empty() {
                    self.blank_line();
                }
            }
            TagEnd::Item => {
                self.flush_line();
                self.bullet = None;
            }
            TagEnd::CodeBlock => {
                if let Some(code) = self.code_block.take() {
                    self.finish_code_block(code);
                }
            }
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => self.pop_style(),
            TagEnd::Link | TagEnd::Image => {
                self.pop_style();
                if let Some(link) = self.links.pop() {
                    if !link.url.is_empty() && link.text != link.url {
                        self.push_text(&format!(" ({})", link.url), self.theme.meta_style);
                    }
                }
            }
            TagEnd::TableHead => {
                self.pop_style();
                self.flush_line();
            }
            TagEnd::TableRow => self.flush_line(),
            TagEnd::Table => self.blank_line(),
            _ => {}
        }
    }

    fn finish_code_block(&mut self, code: CodeBlock) {
        if self.extract_diagrams && is_diagram_language(&code.language) {
            let index = self.diagrams.len() + 1;
            self.diagrams.push(Diagram {
                index,
                source: fix_parenthesized_labels(code.text.trim_end()),
            });
            self.push_text(&format!("[diagram {index}]"), self.theme.diagram_title_style);
            self.blank_line();
            return;
        }

        for line in code.text.lines() {
            self.start_line();
            self.current.push(Span::raw("  "));
            self.current
                .push(Span::styled(line.replace('\t', "    "), self.theme.code_style));
            self.flush_line();
        }
        self.blank_line();
    }

    fn style(&self) -> Style {
        self.styles.last().copied().unwrap_or_default()
    }

    fn push_style(&mut self, patch: Style) {
        let style = self.style().patch(patch);
        self.styles.push(style);
    }

    fn pop_style(&mut self) {
        if self.styles.len() > 1 {
            self.styles.pop();
        }
    }

    /// Open a line with the quote bars and list indent it needs.
    fn start_line(&mut self) {
        if !self.current.is_empty() {
            return;
        }
        if self.quote_depth > 0 {
            self.current
                .push(Span::styled("│ ".repeat(self.quote_depth), self.theme.quote_style));
        }
        if let Some(bullet) = self.bullet.take() {
            self.current.push(Span::styled(bullet, self.styles[0]));
        } else if !self.lists.is_empty() {
            self.current.push(Span::raw("  ".repeat(self.lists.len())));
        }
    }

    fn push_text(&mut self, text: &str, style: Style) {
        for (i, segment) in text.split('\n').enumerate() {
            if i > 0 {
                self.flush_line();
            }
            if segment.is_empty() {
                continue;
            }
            self.start_line();
            self.current.push(Span::styled(segment.to_string(), style));
        }
    }

    fn flush_line(&mut self) {
        if !self.current.is_empty() {
            self.lines.push(Line::from(std::mem::take(&mut self.current)));
        }
    }

    fn blank_line(&mut self) {
        self.flush_line();
        if self.lines.last().is_some_and(|line| !line.spans.is_empty()) {
            self.lines.push(Line::default());
        }
    }

    fn finish(mut self) -> RenderedMarkdown {
        if let Some(code) = self.code_block.take() {
            self.finish_code_block(code);
        }
        self.flush_line();
        while self.lines.last().is_some_and(|line| line.spans.is_empty()) {
            self.lines.pop();
        }
        RenderedMarkdown {
            lines: self.lines,
            diagrams: self.diagrams,
        }
    }
}
