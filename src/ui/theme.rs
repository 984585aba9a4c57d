use ratatui::style::{Color, Modifier, Style};

pub const THEME_NAMES: [&str; 2] = ["dark", "light"];

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: &'static str,

    // Chat message styles
    pub user_prefix_style: Style,
    pub user_text_style: Style,
    pub assistant_text_style: Style,
    pub system_text_style: Style,
    pub error_text_style: Style,

    // Reasoning block
    pub reasoning_title_style: Style,
    pub reasoning_text_style: Style,

    // Message metadata and metrics panel
    pub meta_style: Style,
    pub metrics_label_style: Style,
    pub metrics_value_style: Style,

    // Markdown
    pub heading_style: Style,
    pub code_style: Style,
    pub link_style: Style,
    pub quote_style: Style,
    pub diagram_title_style: Style,
}

impl Theme {
    pub fn dark() -> Self {
        Theme {
            name: "dark",
            user_prefix_style: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Cyan),
            assistant_text_style: Style::default().fg(Color::White),
            system_text_style: Style::default().fg(Color::DarkGray),
            error_text_style: Style::default().fg(Color::LightRed),

            reasoning_title_style: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            reasoning_text_style: Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),

            meta_style: Style::default().fg(Color::DarkGray),
            metrics_label_style: Style::default().fg(Color::Gray),
            metrics_value_style: Style::default()
                .fg(Color::LightGreen)
                .add_modifier(Modifier::BOLD),

            heading_style: Style::default()
                .fg(Color::LightBlue)
                .add_modifier(Modifier::BOLD),
            code_style: Style::default().fg(Color::Yellow),
            link_style: Style::default()
                .fg(Color::LightBlue)
                .add_modifier(Modifier::UNDERLINED),
            quote_style: Style::default().fg(Color::Gray),
            diagram_title_style: Style::default()
                .fg(Color::LightMagenta)
                .add_modifier(Modifier::BOLD),
        }
    }

    pub fn light() -> Self {
        Theme {
            name: "light",
            user_prefix_style: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Blue),
            assistant_text_style: Style::default().fg(Color::Black),
            system_text_style: Style::default().fg(Color::Gray),
            error_text_style: Style::default().fg(Color::Red),

            reasoning_title_style: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            reasoning_text_style: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),

            meta_style: Style::default().fg(Color::Gray),
            metrics_label_style: Style::default().fg(Color::DarkGray),
            metrics_value_style: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),

            heading_style: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            code_style: Style::default().fg(Color::Rgb(160, 80, 0)),
            link_style: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),
            quote_style: Style::default().fg(Color::DarkGray),
            diagram_title_style: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Modifiers only, for output that is not a color terminal.
    pub fn monochrome() -> Self {
        let plain = Style::default();
        let bold = Style::default().add_modifier(Modifier::BOLD);
        Theme {
            name: "monochrome",
            user_prefix_style: bold,
            user_text_style: plain,
            assistant_text_style: plain,
            system_text_style: plain,
            error_text_style: bold,
            reasoning_title_style: bold,
            reasoning_text_style: Style::default().add_modifier(Modifier::ITALIC),
            meta_style: plain,
            metrics_label_style: plain,
            metrics_value_style: bold,
            heading_style: bold,
            code_style: plain,
            link_style: Style::default().add_modifier(Modifier::UNDERLINED),
            quote_style: plain,
            diagram_title_style: bold,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(Theme::dark()),
            "light" => Some(Theme::light()),
            _ => None,
        }
    }

    /// Theme for a configured name, falling back to dark for unknown names.
    pub fn from_config(name: Option<&str>) -> Self {
        name.and_then(Theme::from_name).unwrap_or_else(Theme::dark)
    }
}
