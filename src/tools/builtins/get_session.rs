//! `get_devin_session` — fetch a session's state.
//!
//! The optional message-history fetch is best-effort: its failure is
//! logged and the primary session data still returns intact.

use serde_json::{json, Value};
use tracing::warn;

use crate::devin::normalize_session_id;
use crate::tools::{optional_bool, require_str, ToolContext};

pub async fn run(ctx: &ToolContext, args: &Value) -> anyhow::Result<Value> {
    let session_arg = require_str(args, "session_id")?;
    let normalized = normalize_session_id(&session_arg).to_string();

    let mut session = ctx.devin.get_session(&normalized).await?;
    let Some(obj) = session.as_object_mut() else {
        anyhow::bail!("Devin API returned a non-object session payload");
    };

    if optional_bool(args, "fetch_slack_info") {
        match ctx.devin.get_session_messages(&normalized).await {
            Ok(history) => {
                let messages = history.get("messages").cloned().unwrap_or(history);
                obj.insert("messages".to_string(), messages);
            }
            Err(e) => {
                warn!(session = %normalized, error = %e, "message-history fetch failed, returning session without it");
            }
        }
    }

    let raw_id = obj
        .get("session_id")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .unwrap_or(session_arg);
    obj.insert(
        "session_id".to_string(),
        json!(normalize_session_id(&raw_id)),
    );
    obj.insert("original_session_id".to_string(), json!(raw_id));

    Ok(session)
}
