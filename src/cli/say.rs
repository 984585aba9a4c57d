//! TUI-less "say" command

use std::error::Error;

use crate::cli::chat::{send_and_print, ReplyOutput};
use crate::core::config::Config;
use crate::core::session::Session;

pub async fn run_say(
    prompt: Vec<String>,
    config: Config,
    output: ReplyOutput,
) -> Result<(), Box<dyn Error>> {
    let prompt = prompt.join(" ");
    if prompt.trim().is_empty() {
        eprintln!("Usage: reasonstream say <prompt>");
        std::process::exit(1);
    }

    let mut session = Session::new(config);

    if session.config().selected_model.is_none() && session.config().has_credentials() {
        if let Err(err) = session.refresh_models().await {
            eprintln!("❌ Could not load models: {err}");
            std::process::exit(1);
        }
    }

    match send_and_print(&mut session, prompt.trim(), &output).await? {
        Ok(()) => Ok(()),
        Err(_) => std::process::exit(1),
    }
}
