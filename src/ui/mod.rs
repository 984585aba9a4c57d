//! Terminal presentation for chat sessions.
//!
//! - [`render`]: message, metrics panel and status line layout.
//! - [`markdown`] and [`diagram`]: reply formatting, including diagram
//!   extraction for finished replies.
//! - [`theme`]: light and dark color policy.
//! - [`output`]: styled line output and live echo of streaming replies.
//!
//! This layer only presents state; [`crate::core`] owns the session.

pub mod diagram;
pub mod markdown;
pub mod output;
pub mod render;
pub mod theme;
