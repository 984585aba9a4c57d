//! Interactive chat loop

use std::error::Error;
use std::io::{self, Write};

use ratatui::text::Line;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::cli::model_list::model_entry_lines;
use crate::core::config::Config;
use crate::core::error::{ChatError, MissingSetting};
use crate::core::session::Session;
use crate::ui::output::{stdout_supports_color, write_lines, LiveView};
use crate::ui::render::{
    diagram_lines, meta_line, metrics_panel, render_message, status_line, RenderOptions,
};
use crate::ui::theme::Theme;

pub const HELP_TEXT: &str = "\
Commands:
  /clear         Clear the conversation and reset metrics
  /models        List the models offered by the endpoint
  /model [id]    Show or switch the model
  /metrics       Show token and timing metrics
  /help          Show this help
  /quit          Leave the chat

Press Ctrl+C while a reply streams to stop it early.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Clear,
    Models,
    Model(Option<String>),
    Metrics,
    Help,
    Quit,
    Unknown(String),
}

impl ReplCommand {
    /// Parse a line starting with `/`; anything else is a chat message.
    pub fn parse(input: &str) -> Option<Self> {
        let rest = input.trim().strip_prefix('/')?;
        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };
        Some(match name {
            "clear" => ReplCommand::Clear,
            "models" => ReplCommand::Models,
            "model" => ReplCommand::Model((!arg.is_empty()).then(|| arg.to_string())),
            "metrics" => ReplCommand::Metrics,
            "help" => ReplCommand::Help,
            "quit" | "exit" => ReplCommand::Quit,
            other => ReplCommand::Unknown(other.to_string()),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// How replies are presented on stdout.
pub struct ReplyOutput {
    pub theme: Theme,
    pub options: RenderOptions,
    pub color: bool,
}

impl ReplyOutput {
    pub fn new(theme: Theme, options: RenderOptions) -> Self {
        Self {
            theme,
            options,
            color: stdout_supports_color(),
        }
    }

    fn print(&self, lines: &[Line<'_>]) -> io::Result<()> {
        write_lines(&mut io::stdout(), lines, self.color)
    }
}

fn spawn_interrupt_watcher(cancel: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("Interrupt received, stopping the stream");
            cancel.cancel();
        }
    })
}

fn print_chat_error(err: &ChatError) {
    eprintln!("❌ {err}");
    if let ChatError::Configuration(missing) = err {
        eprintln!("   {}", missing.hint());
    }
}

fn persist_selected_model(model: Option<&str>) {
    let result = Config::load().and_then(|mut stored| {
        stored.selected_model = model.map(str::to_string);
        stored.save()
    });
    if let Err(err) = result {
        warn!(error = %err, "Could not save the selected model");
    }
}

/// Send one message, echo the reply as it streams, then print the finished
/// reply with its meta line. Chat failures are printed and handed back;
/// only terminal I/O errors fail the outer result.
pub async fn send_and_print(
    session: &mut Session,
    input: &str,
    output: &ReplyOutput,
) -> io::Result<Result<(), ChatError>> {
    let cancel = CancellationToken::new();
    let watcher = spawn_interrupt_watcher(cancel.clone());
    let mut live = LiveView::new(io::stdout(), output.theme.clone(), output.color)
        .show_reasoning(output.options.show_reasoning)
        .echo_answer(!output.options.markdown);
    let mut echo_error: Option<io::Error> = None;

    let result = session
        .send(input, cancel.clone(), |event| {
            if echo_error.is_none() {
                if let Err(err) = live.on_event(event) {
                    echo_error = Some(err);
                }
            }
        })
        .await;
    watcher.abort();
    live.finish()?;
    if let Some(err) = echo_error {
        return Err(err);
    }

    let message = match result {
        Ok(message) => message,
        Err(err) => {
            print_chat_error(&err);
            return Ok(Err(err));
        }
    };

    let mut lines = Vec::new();
    if output.options.markdown {
        let options = RenderOptions {
            show_reasoning: false,
            ..output.options
        };
        let view = render_message(message, &output.theme, options);
        lines.extend(view.lines);
        lines.push(Line::default());
        lines.extend(diagram_lines(&view.diagrams, &output.theme));
    } else {
        lines.push(meta_line(message, &output.theme));
        lines.push(Line::default());
    }
    if cancel.is_cancelled() {
        lines.push(Line::styled("(stopped early)", output.theme.system_text_style));
    }
    output.print(&lines)?;
    Ok(Ok(()))
}

async fn refresh_and_report(session: &mut Session, list: bool) {
    match session.refresh_models().await {
        Ok(refresh) => {
            if refresh.selection_changed {
                if let Some(model) = &refresh.selected {
                    println!("Using model {model}");
                }
                persist_selected_model(refresh.selected.as_deref());
            }
            if list {
                for model in &refresh.models {
                    for line in model_entry_lines(model, refresh.selected.as_deref()) {
                        println!("{line}");
                    }
                }
            }
        }
        Err(err) => eprintln!("⚠️  Could not load models: {err}"),
    }
}

async fn run_command(
    command: ReplCommand,
    session: &mut Session,
    output: &ReplyOutput,
) -> io::Result<Flow> {
    match command {
        ReplCommand::Clear => {
            session.clear();
            println!("Conversation and metrics cleared.");
        }
        ReplCommand::Models => refresh_and_report(session, true).await,
        ReplCommand::Model(None) => match session.config().selected_model.as_deref() {
            Some(model) => println!("Current model: {model}"),
            None => println!("No model selected. Use /model <id>."),
        },
        ReplCommand::Model(Some(id)) => {
            persist_selected_model(Some(&id));
            println!("✅ Using model {id}");
            session.select_model(id);
        }
        ReplCommand::Metrics => {
            output.print(&metrics_panel(&session.metrics(), &output.theme))?;
        }
        ReplCommand::Help => println!("{HELP_TEXT}"),
        ReplCommand::Quit => return Ok(Flow::Quit),
        ReplCommand::Unknown(name) => {
            eprintln!("❌ Unknown command: /{name}. Type /help for commands.");
        }
    }
    Ok(Flow::Continue)
}

pub async fn run_chat(config: Config, output: ReplyOutput) -> Result<(), Box<dyn Error>> {
    let mut session = Session::new(config);

    println!(
        "reasonstream {} · /help for commands, /quit to leave",
        env!("CARGO_PKG_VERSION")
    );
    if session.config().has_credentials() {
        refresh_and_report(&mut session, false).await;
    } else {
        let missing = MissingSetting::ApiKey;
        eprintln!("⚠️  {missing}. {}", missing.hint());
    }
    output.print(&[status_line(
        session.connection_status(),
        session.config().selected_model.as_deref(),
        &output.theme,
    )])?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            println!();
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match ReplCommand::parse(input) {
            Some(command) => {
                if run_command(command, &mut session, &output).await? == Flow::Quit {
                    break;
                }
            }
            None => {
                // Failures are already shown and recorded in the conversation.
                let _ = send_and_print(&mut session, input, &output).await?;
            }
        }
    }

    Ok(())
}
