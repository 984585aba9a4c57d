//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod chat;
pub mod model_list;
pub mod say;
pub mod settings;


use std::error::Error;

use clap::{Parser, Subcommand};

use crate::cli::chat::{run_chat, ReplyOutput};
use crate::cli::model_list::list_models;
use crate::cli::say::run_say;
use crate::cli::settings::SettingError;
use crate::core::config::data::path_display;
use crate::core::config::Config;
use crate::logging;
use crate::ui::render::RenderOptions;
use crate::ui::theme::Theme;

#[derive(Parser)]
#[command(name = "reasonstream", version)]
#[command(about = "A streaming chat client for OpenAI-compatible APIs")]
#[command(
    long_about = "Reasonstream is a terminal chat client for OpenAI-compatible APIs. \
Replies stream as they are generated; reasoning the model wraps in <think> tags \
is shown apart from the answer, and every reply reports tokens, latency and \
throughput.\n\n\
Configuration:\n\
  Use 'reasonstream set <key> <value>' to store the endpoint, API key and model.\n\
  Run 'reasonstream set' to list all keys.\n\n\
Environment Variables (fallback when not configured):\n\
  OPENAI_API_KEY    Your API key\n\
  OPENAI_BASE_URL   Custom API base URL (optional, defaults to https://api.openai.com/v1)\n\
  RUST_LOG          Log filter for diagnostics on stderr\n\n\
Chat commands:\n\
  /clear /models /model <id> /metrics /help /quit"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Model to use for this run (overrides the configured model)
    #[arg(short = 'm', long, global = true, value_name = "MODEL")]
    pub model: Option<String>,

    /// API base URL for this run (overrides the configured endpoint)
    #[arg(short = 'e', long, global = true, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Hide the model's reasoning
    #[arg(long, global = true)]
    pub no_reasoning: bool,

    /// Log debug diagnostics to stderr
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// Send a single prompt and print the reply
    Say {
        /// Prompt text (can be multiple words)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        prompt: Vec<String>,
    },
    /// List the models offered by the endpoint
    Models,
    /// Set configuration values, or list them when no key is given
    Set {
        /// Configuration key to set
        key: Option<String>,
        /// Value to set for the key (can be multiple words)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
    /// Show the current configuration
    Config,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    logging::init(if args.verbose {
        logging::VERBOSE_LEVEL
    } else {
        logging::DEFAULT_LEVEL
    });

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async_main(args))
}

/// Layer command-line overrides and environment fallbacks over the stored
/// configuration. The result is used for this run only and never saved.
pub fn resolve_config(
    mut config: Config,
    args: &Args,
    env: impl Fn(&str) -> Option<String>,
) -> Config {
    if let Some(endpoint) = args.endpoint.as_deref().filter(|v| !v.trim().is_empty()) {
        config.api_endpoint = Some(endpoint.to_string());
    }
    if let Some(model) = args.model.as_deref().filter(|v| !v.trim().is_empty()) {
        config.selected_model = Some(model.to_string());
    }
    config.apply_env_fallback(env);
    config
}

fn load_session_config(args: &Args) -> Result<Config, Box<dyn Error>> {
    Ok(resolve_config(Config::load()?, args, |key| {
        std::env::var(key).ok()
    }))
}

fn reply_output(config: &Config, args: &Args) -> ReplyOutput {
    ReplyOutput::new(
        Theme::from_config(config.theme.as_deref()),
        RenderOptions {
            markdown: config.markdown_enabled(),
            show_reasoning: !args.no_reasoning,
        },
    )
}

fn exit_on_setting_error(result: Result<(), SettingError>) -> Result<(), Box<dyn Error>> {
    if let Err(err) = result {
        err.print();
        std::process::exit(err.exit_code());
    }
    Ok(())
}

async fn async_main(mut args: Args) -> Result<(), Box<dyn Error>> {
    match args.command.take().unwrap_or(Commands::Chat) {
        Commands::Set { key, value } => exit_on_setting_error(settings::run_set(key, value)),
        Commands::Unset { key } => exit_on_setting_error(settings::run_unset(&key)),
        Commands::Config => {
            let config = Config::load()?;
            config.print_all();
            let path = Config::get_config_path()?;
            println!();
            println!("Config file: {}", path_display(path));
            Ok(())
        }
        Commands::Models => list_models(load_session_config(&args)?).await,
        Commands::Say { prompt } => {
            let config = load_session_config(&args)?;
            let output = reply_output(&config, &args);
            run_say(prompt, config, output).await
        }
        Commands::Chat => {
            let config = load_session_config(&args)?;
            let output = reply_output(&config, &args);
            run_chat(config, output).await
        }
    }
}
