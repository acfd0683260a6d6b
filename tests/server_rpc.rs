//! Tests for the JSON-RPC framing layer: method routing, error codes,
//! and the tools/call result envelope.

use devin_mcp::config::Config;
use devin_mcp::devin::DevinClient;
use devin_mcp::server::McpServer;
use devin_mcp::tools::ToolContext;
use serde_json::{json, Value};

/// A server whose upstream is unreachable; these tests never make a
/// network call.
fn server() -> McpServer {
    let base_url = "http://127.0.0.1:9".to_string();
    McpServer::new(ToolContext {
        config: Config {
            devin_api_key: "sk-test".into(),
            org_name: "acme".into(),
            devin_base_url: base_url.clone(),
            slack: None,
        },
        devin: DevinClient::new(base_url, "sk-test".into()),
        slack: None,
    })
}

fn parse(frame: &str) -> Value {
    serde_json::from_str(frame).expect("response should be JSON")
}

#[tokio::test]
async fn unparseable_frame_is_parse_error() {
    let resp = parse(&server().handle_message("{ not json").await);
    assert_eq!(resp["error"]["code"], -32700);
    assert_eq!(resp["id"], Value::Null);
}

#[tokio::test]
async fn initialize_reports_protocol_and_identity() {
    let req = json!({ "jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {} });
    let resp = parse(&server().handle_message(&req.to_string()).await);

    assert_eq!(resp["id"], 1);
    assert_eq!(resp["result"]["protocolVersion"], "2024-11-05");
    assert_eq!(resp["result"]["serverInfo"]["name"], "devin-mcp");
}

#[tokio::test]
async fn tools_list_exposes_the_full_catalogue() {
    let req = json!({ "jsonrpc": "2.0", "id": 2, "method": "tools/list" });
    let resp = parse(&server().handle_message(&req.to_string()).await);

    let tools = resp["result"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 5);
    for tool in tools {
        assert!(tool["name"].is_string());
        assert!(tool["description"].is_string());
        assert_eq!(tool["inputSchema"]["type"], "object");
    }
}

#[tokio::test]
async fn unknown_method_is_method_not_found() {
    let req = json!({ "jsonrpc": "2.0", "id": 3, "method": "resources/list" });
    let resp = parse(&server().handle_message(&req.to_string()).await);
    assert_eq!(resp["error"]["code"], -32601);
    assert_eq!(resp["id"], 3);
}

#[tokio::test]
async fn initialized_notification_produces_no_frame() {
    let req = json!({ "jsonrpc": "2.0", "method": "notifications/initialized" });
    let resp = server().handle_message(&req.to_string()).await;
    assert!(resp.is_empty());
}

#[tokio::test]
async fn unknown_tool_is_an_envelope_not_a_protocol_error() {
    let req = json!({
        "jsonrpc": "2.0",
        "id": 4,
        "method": "tools/call",
        "params": { "name": "reboot_the_moon", "arguments": {} },
    });
    let resp = parse(&server().handle_message(&req.to_string()).await);

    assert!(resp.get("error").is_none(), "must not be a JSON-RPC error");
    assert_eq!(resp["result"]["isError"], true);
    let text = resp["result"]["content"][0]["text"].as_str().unwrap();
    assert!(text.contains("unknown tool"));
}

#[tokio::test]
async fn org_info_round_trips_through_the_envelope() {
    let req = json!({
        "jsonrpc": "2.0",
        "id": 5,
        "method": "tools/call",
        "params": { "name": "get_organization_info", "arguments": {} },
    });
    let resp = parse(&server().handle_message(&req.to_string()).await);

    assert!(resp["result"].get("isError").is_none());
    let text = resp["result"]["content"][0]["text"].as_str().unwrap();
    let payload: Value = serde_json::from_str(text).unwrap();
    assert_eq!(payload["organization"], "acme");
}

#[tokio::test]
async fn missing_arguments_default_to_empty_object() {
    // tools/call without an arguments field still dispatches; the tool
    // itself reports the missing required argument.
    let req = json!({
        "jsonrpc": "2.0",
        "id": 6,
        "method": "tools/call",
        "params": { "name": "get_devin_session" },
    });
    let resp = parse(&server().handle_message(&req.to_string()).await);

    assert_eq!(resp["result"]["isError"], true);
    let text = resp["result"]["content"][0]["text"].as_str().unwrap();
    assert!(text.contains("session_id"));
}
