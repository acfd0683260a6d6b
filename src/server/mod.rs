//! MCP stdio server: JSON-RPC 2.0 over stdin/stdout.
//!
//! Protocol: newline-delimited JSON-RPC 2.0.  stdout is reserved for
//! protocol frames; all logging goes to stderr.
//!
//! The loop is purely reactive and single-threaded: read one request,
//! handle it to completion (sequential outbound HTTP calls only),
//! write exactly one response, repeat.  Malformed frames produce a
//! JSON-RPC error response, never a crash.

use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;

use crate::tools::{self, ToolContext};

/// MCP protocol revision implemented by this server.
const PROTOCOL_VERSION: &str = "2024-11-05";

/// The stdio server, holding the shared tool context.
pub struct McpServer {
    ctx: ToolContext,
}

impl McpServer {
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }

    /// Run the request loop until stdin closes.
    pub async fn run(&self) -> anyhow::Result<()> {
        let stdin = tokio::io::stdin();
        let mut stdout = tokio::io::stdout();
        let mut lines = BufReader::new(stdin).lines();

        info!("stdio server started");

        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let response = self.handle_message(line).await;
            // Notifications produce no response frame.
            if response.is_empty() {
                continue;
            }
            stdout.write_all(response.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
            stdout.flush().await?;
        }

        info!("stdin closed, stdio server stopping");
        Ok(())
    }

    /// Handle one raw frame and return the serialized response, or an
    /// empty string when no response is due.
    pub async fn handle_message(&self, line: &str) -> String {
        let request: Value = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(e) => {
                return error_response(Value::Null, -32700, &format!("parse error: {e}"));
            }
        };

        let id = request.get("id").cloned().unwrap_or(Value::Null);
        let method = request.get("method").and_then(Value::as_str).unwrap_or("");
        let params = request.get("params").cloned().unwrap_or_else(|| json!({}));

        match method {
            "initialize" => self.handle_initialize(id),
            "tools/list" => self.handle_tools_list(id),
            "tools/call" => self.handle_tools_call(id, &params).await,
            // Client notification; the protocol gives it no response.
            "notifications/initialized" => String::new(),
            other => error_response(id, -32601, &format!("method not found: {other}")),
        }
    }

    fn handle_initialize(&self, id: Value) -> String {
        success_response(
            id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": { "tools": {} },
                "serverInfo": {
                    "name": "devin-mcp",
                    "version": env!("CARGO_PKG_VERSION"),
                },
            }),
        )
    }

    fn handle_tools_list(&self, id: Value) -> String {
        success_response(id, json!({ "tools": tools::list_tools() }))
    }

    async fn handle_tools_call(&self, id: Value, params: &Value) -> String {
        let name = params.get("name").and_then(Value::as_str).unwrap_or("");
        let arguments = params
            .get("arguments")
            .cloned()
            .unwrap_or_else(|| json!({}));

        let outcome = tools::dispatch(&self.ctx, name, &arguments).await;

        let mut result = json!({
            "content": [{ "type": "text", "text": outcome.text }],
        });
        if outcome.is_error {
            result["isError"] = json!(true);
        }
        success_response(id, result)
    }
}

// ── JSON-RPC helpers ─────────────────────────────────────────

fn success_response(id: Value, result: Value) -> String {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": result,
    })
    .to_string()
}

fn error_response(id: Value, code: i32, message: &str) -> String {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": { "code": code, "message": message },
    })
    .to_string()
}
