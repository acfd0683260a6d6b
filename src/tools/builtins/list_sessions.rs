//! `list_devin_sessions` — list sessions, normalizing every entry's ID.

use serde_json::{json, Value};

use crate::devin::normalize_session_id;
use crate::tools::{optional_u64, ToolContext};

pub async fn run(ctx: &ToolContext, args: &Value) -> anyhow::Result<Value> {
    let limit = optional_u64(args, "limit")?;
    let offset = optional_u64(args, "offset")?;

    let mut listing = ctx.devin.list_sessions(limit, offset).await?;

    // The endpoint wraps entries in a "sessions" field; tolerate a bare
    // array as well.
    if let Some(entries) = listing
        .get_mut("sessions")
        .and_then(Value::as_array_mut)
    {
        normalize_entries(entries);
    } else if let Some(entries) = listing.as_array_mut() {
        normalize_entries(entries);
    }

    Ok(listing)
}

/// Rewrite each entry's `session_id` to the normalized form, keeping
/// the raw ID under `original_session_id`.
fn normalize_entries(entries: &mut [Value]) {
    for entry in entries {
        let Some(obj) = entry.as_object_mut() else {
            continue;
        };
        let Some(raw_id) = obj.get("session_id").and_then(Value::as_str).map(str::to_owned)
        else {
            continue;
        };
        obj.insert(
            "session_id".to_string(),
            json!(normalize_session_id(&raw_id)),
        );
        obj.insert("original_session_id".to_string(), json!(raw_id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_keep_original_id_alongside_normalized() {
        let mut entries = vec![
            json!({ "session_id": "devin-abc", "status": "running" }),
            json!({ "session_id": "xyz" }),
        ];
        normalize_entries(&mut entries);
        assert_eq!(entries[0]["session_id"], "abc");
        assert_eq!(entries[0]["original_session_id"], "devin-abc");
        assert_eq!(entries[0]["status"], "running");
        assert_eq!(entries[1]["session_id"], "xyz");
        assert_eq!(entries[1]["original_session_id"], "xyz");
    }

    #[test]
    fn non_object_entries_are_left_alone() {
        let mut entries = vec![json!("not-an-object")];
        normalize_entries(&mut entries);
        assert_eq!(entries[0], json!("not-an-object"));
    }
}
