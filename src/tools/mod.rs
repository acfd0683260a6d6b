//! Tool registry and dispatcher.
//!
//! The five invocable tools are a closed set, modeled as [`ToolKind`]
//! with an exhaustive match everywhere: adding or removing a tool is a
//! compile-time-checked change.  Each kind carries static [`ToolMeta`]
//! (name, description, JSON-Schema for its arguments) served verbatim
//! by `tools/list`.
//!
//! [`dispatch`] is the single entry point used by the server loop.  It
//! validates the invocation name, runs the matching handler from
//! [`builtins`], and wraps the outcome in the uniform result envelope.
//! Handler failures never escape: they become error envelopes, and the
//! process keeps serving.

pub mod builtins;

use serde_json::Value;
use tracing::debug;

use crate::config::Config;
use crate::devin::DevinClient;
use crate::slack::SlackClient;

/// Metadata describing one invocable tool.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ToolMeta {
    /// Machine-friendly name (e.g. `"create_devin_session"`).
    pub name: String,
    /// Human-readable one-liner describing what the tool does.
    pub description: String,
    /// JSON Schema object describing the expected arguments.
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Shared read-only context handed to every tool handler.
///
/// Built once at startup; there is no mutable state between
/// invocations.
pub struct ToolContext {
    pub config: Config,
    pub devin: DevinClient,
    pub slack: Option<SlackClient>,
}

/// The closed set of invocable tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    CreateSession,
    GetSession,
    SendMessage,
    ListSessions,
    OrganizationInfo,
}

impl ToolKind {
    pub const ALL: [ToolKind; 5] = [
        ToolKind::CreateSession,
        ToolKind::GetSession,
        ToolKind::SendMessage,
        ToolKind::ListSessions,
        ToolKind::OrganizationInfo,
    ];

    /// Wire name of the tool.
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::CreateSession => "create_devin_session",
            ToolKind::GetSession => "get_devin_session",
            ToolKind::SendMessage => "send_message_to_session",
            ToolKind::ListSessions => "list_devin_sessions",
            ToolKind::OrganizationInfo => "get_organization_info",
        }
    }

    /// Look up a tool by its wire name.
    pub fn from_name(name: &str) -> Option<ToolKind> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    /// Static metadata for this tool.
    pub fn meta(self) -> ToolMeta {
        let (description, input_schema) = match self {
            ToolKind::CreateSession => (
                "Create a new Devin session from a task prompt. When Slack is configured, \
                 announces the new session in a channel so the thread can track it.",
                serde_json::json!({
                    "type": "object",
                    "properties": {
                        "prompt": {
                            "type": "string",
                            "description": "Task description for the new session"
                        },
                        "machine_snapshot_id": {
                            "type": "string",
                            "description": "Machine snapshot to boot the session from"
                        },
                        "max_acu": {
                            "type": "number",
                            "description": "Compute budget override (ACUs) for the session"
                        },
                        "idempotent": {
                            "type": "boolean",
                            "description": "Reuse an existing session for an identical prompt instead of creating a new one. Defaults to false."
                        },
                        "slack_channel": {
                            "type": "string",
                            "description": "Slack channel (name or ID) to announce the session in. Defaults to the configured default channel."
                        }
                    },
                    "required": ["prompt"]
                }),
            ),
            ToolKind::GetSession => (
                "Fetch a Devin session's current state by session ID.",
                serde_json::json!({
                    "type": "object",
                    "properties": {
                        "session_id": {
                            "type": "string",
                            "description": "Session ID, with or without the devin- prefix"
                        },
                        "fetch_slack_info": {
                            "type": "boolean",
                            "description": "Also fetch the session's message history and merge it into the result"
                        }
                    },
                    "required": ["session_id"]
                }),
            ),
            ToolKind::SendMessage => (
                "Send a follow-up message to a running Devin session, optionally relaying \
                 the same text into a Slack thread.",
                serde_json::json!({
                    "type": "object",
                    "properties": {
                        "session_id": {
                            "type": "string",
                            "description": "Session ID, with or without the devin- prefix"
                        },
                        "message": {
                            "type": "string",
                            "description": "Message text to deliver to the session"
                        },
                        "slack_channel": {
                            "type": "string",
                            "description": "Slack channel (name or ID) to relay the message into"
                        },
                        "slack_thread_ts": {
                            "type": "string",
                            "description": "Thread timestamp to reply under; required for the relay to happen"
                        }
                    },
                    "required": ["session_id", "message"]
                }),
            ),
            ToolKind::ListSessions => (
                "List Devin sessions for the organization.",
                serde_json::json!({
                    "type": "object",
                    "properties": {
                        "limit": {
                            "type": "integer",
                            "description": "Maximum number of sessions to return"
                        },
                        "offset": {
                            "type": "integer",
                            "description": "Number of sessions to skip"
                        }
                    },
                    "required": []
                }),
            ),
            ToolKind::OrganizationInfo => (
                "Return the configured organization name and Devin API base URL.",
                serde_json::json!({
                    "type": "object",
                    "properties": {},
                    "required": []
                }),
            ),
        };
        ToolMeta {
            name: self.name().to_string(),
            description: description.to_string(),
            input_schema,
        }
    }
}

/// Return metadata for every registered tool, in declaration order.
pub fn list_tools() -> Vec<ToolMeta> {
    ToolKind::ALL.into_iter().map(ToolKind::meta).collect()
}

// ── Result envelope ──────────────────────────────────────────

/// Uniform outcome of a tool invocation: a text body plus an error
/// flag.  Nothing outlives the call.
#[derive(Debug, Clone)]
pub struct ToolOutcome {
    pub text: String,
    pub is_error: bool,
}

impl ToolOutcome {
    /// Success envelope carrying pretty-printed JSON.
    pub fn success(value: &Value) -> ToolOutcome {
        ToolOutcome {
            text: serde_json::to_string_pretty(value)
                .unwrap_or_else(|_| value.to_string()),
            is_error: false,
        }
    }

    /// Error envelope carrying a human/machine-readable message.
    pub fn error(message: impl Into<String>) -> ToolOutcome {
        ToolOutcome {
            text: message.into(),
            is_error: true,
        }
    }
}

// ── Argument extraction ──────────────────────────────────────

/// Extract a required string argument, rejecting the invocation before
/// any outbound call when absent or mistyped.
pub(crate) fn require_str(args: &Value, key: &str) -> anyhow::Result<String> {
    args.get(key)
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| anyhow::anyhow!("missing required argument: {key} (string)"))
}

pub(crate) fn optional_str(args: &Value, key: &str) -> Option<String> {
    args.get(key).and_then(Value::as_str).map(str::to_owned)
}

pub(crate) fn optional_u64(args: &Value, key: &str) -> anyhow::Result<Option<u64>> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v
            .as_u64()
            .map(Some)
            .ok_or_else(|| anyhow::anyhow!("argument '{key}' must be a non-negative integer")),
    }
}

pub(crate) fn optional_bool(args: &Value, key: &str) -> bool {
    args.get(key).and_then(Value::as_bool).unwrap_or(false)
}

// ── Dispatcher ───────────────────────────────────────────────

/// Run a tool invocation to completion and produce its envelope.
///
/// Unknown names yield an error envelope, not a protocol error; handler
/// failures are caught here and surfaced with their display chain
/// (upstream HTTP failures include status and body).
pub async fn dispatch(ctx: &ToolContext, name: &str, args: &Value) -> ToolOutcome {
    let Some(kind) = ToolKind::from_name(name) else {
        return ToolOutcome::error(format!("unknown tool: {name}"));
    };

    debug!(tool = name, "dispatching tool invocation");

    let result = match kind {
        ToolKind::CreateSession => builtins::create_session::run(ctx, args).await,
        ToolKind::GetSession => builtins::get_session::run(ctx, args).await,
        ToolKind::SendMessage => builtins::send_message::run(ctx, args).await,
        ToolKind::ListSessions => builtins::list_sessions::run(ctx, args).await,
        ToolKind::OrganizationInfo => builtins::org_info::run(ctx, args).await,
    };

    match result {
        Ok(value) => ToolOutcome::success(&value),
        Err(e) => ToolOutcome::error(format!("{e:#}")),
    }
}
