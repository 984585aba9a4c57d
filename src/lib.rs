//! Reasonstream is a terminal chat client for OpenAI-compatible APIs that
//! streams replies, keeps model reasoning apart from the answer, and tracks
//! token throughput.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the session: configuration, the SSE decoder, the
//!   reasoning splitter, the completion stream, the conversation and metrics.
//! - [`api`] defines the chat and model payloads exchanged with the server.
//! - [`ui`] lays out messages, markdown and the metrics panel for the terminal.
//! - [`cli`] parses arguments and runs the chat loop and one-shot commands.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`].

pub mod api;
pub mod cli;
pub mod core;
pub mod logging;
pub mod ui;
pub mod utils;
