//! `create_devin_session` — start a new Devin session, optionally
//! announcing it in Slack.
//!
//! The Slack announcement mentions the Devin bot user so the channel's
//! thread is bound to the session from the first message.  The
//! bot-identity lookup is best-effort: when it fails or matches
//! nothing, the announcement falls back to a plain-text mention rather
//! than failing the session creation.

use serde_json::{json, Value};
use tracing::warn;

use crate::devin::normalize_session_id;
use crate::tools::{optional_bool, optional_str, require_str, ToolContext};

/// Name heuristic used to locate the Devin bot in the member list.
const BOT_NAME_NEEDLE: &str = "devin";

pub async fn run(ctx: &ToolContext, args: &Value) -> anyhow::Result<Value> {
    let prompt = require_str(args, "prompt")?;
    let snapshot_id = optional_str(args, "machine_snapshot_id");
    let idempotent = optional_bool(args, "idempotent");

    let max_acu = match args.get("max_acu") {
        None | Some(Value::Null) => None,
        Some(v) if v.is_number() => Some(v),
        Some(_) => anyhow::bail!("argument 'max_acu' must be a number"),
    };

    let session = ctx
        .devin
        .create_session(&prompt, snapshot_id.as_deref(), max_acu, idempotent)
        .await?;

    let raw_id = session
        .get("session_id")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let mut out = json!({
        "session_id": normalize_session_id(&raw_id),
        "original_session_id": raw_id,
        "url": session.get("url").cloned().unwrap_or(Value::Null),
        "organization": ctx.config.org_name,
        "is_new_session": session.get("is_new_session").cloned().unwrap_or(Value::Null),
    });

    if let (Some(slack), Some(slack_cfg)) = (&ctx.slack, &ctx.config.slack) {
        let channel = optional_str(args, "slack_channel")
            .unwrap_or_else(|| slack_cfg.default_channel.clone());
        let channel_id = slack.resolve_channel(&channel).await?;

        let mention = match slack.find_bot_user(BOT_NAME_NEEDLE).await {
            Ok(Some(bot)) => format!("<@{}>", bot.id),
            Ok(None) => {
                warn!("no Devin bot user found in workspace, using plain-text mention");
                "@Devin".to_string()
            }
            Err(e) => {
                warn!(error = %e, "bot-identity lookup failed, using plain-text mention");
                "@Devin".to_string()
            }
        };

        let ts = slack
            .post_message(&channel_id, &format!("{mention} {prompt}"), None)
            .await?;
        out["slack_message_ts"] = json!(ts);
        out["slack_channel"] = json!(channel_id);
    }

    Ok(out)
}
