//! Per-tool handlers.
//!
//! One module per tool, each exposing `run(ctx, args) -> anyhow::Result<Value>`.
//! Handlers validate their own required arguments before issuing any
//! outbound call; the dispatcher in [`crate::tools`] owns envelope
//! shaping and error capture.

pub mod create_session;
pub mod get_session;
pub mod list_sessions;
pub mod org_info;
pub mod send_message;
