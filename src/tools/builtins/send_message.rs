//! `send_message_to_session` — deliver a message to a running session,
//! optionally relaying it into a Slack thread.
//!
//! The relay requires both `slack_channel` and `slack_thread_ts` and
//! only runs after the agent-side post succeeded; a failed primary
//! post short-circuits before any Slack call.

use serde_json::{json, Value};

use crate::devin::normalize_session_id;
use crate::tools::{optional_str, require_str, ToolContext};

pub async fn run(ctx: &ToolContext, args: &Value) -> anyhow::Result<Value> {
    let session_arg = require_str(args, "session_id")?;
    let message = require_str(args, "message")?;
    let normalized = normalize_session_id(&session_arg).to_string();

    // Any 2xx (including an empty body) counts as delivered.
    let body = ctx.devin.send_message(&normalized, &message).await?;

    let mut out = json!({
        "success": true,
        "session_id": normalized,
        "original_session_id": session_arg,
        "response": body,
    });

    if let Some(slack) = &ctx.slack {
        if let (Some(channel), Some(thread_ts)) = (
            optional_str(args, "slack_channel"),
            optional_str(args, "slack_thread_ts"),
        ) {
            let ts = slack
                .post_message(&channel, &message, Some(&thread_ts))
                .await?;
            out["slack_message_ts"] = json!(ts);
            out["slack_thread_ts"] = json!(thread_ts);
        }
    }

    Ok(out)
}
