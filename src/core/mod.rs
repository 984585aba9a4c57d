pub mod chat_stream;
pub mod config;
pub mod conversation;
pub mod error;
pub mod message;
pub mod metrics;
pub mod session;
pub mod sse;
pub mod think;
