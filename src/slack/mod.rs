//! Slack Web API client.
//!
//! Covers the three methods the bridge needs: `conversations.list`
//! (channel resolution), `users.list` (bot-identity lookup), and
//! `chat.postMessage`.  Listing endpoints are cursor-paginated; both
//! are walked to exhaustion before matching.
//!
//! Slack wraps every response in `{ "ok": bool, ... }`; an `ok: false`
//! reply surfaces as [`SlackError::Api`] with the service's error
//! string, distinct from transport-level or HTTP-status failures.

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};

/// Production Slack Web API base URL.
pub const SLACK_API_BASE: &str = "https://slack.com/api";

/// Page size for the paginated listing endpoints.
const PAGE_LIMIT: u64 = 200;

/// Return true if `s` is a canonical Slack conversation ID.
///
/// Canonical IDs start with `C` (public/private channel), `D` (DM), or
/// `G` (legacy group) followed by at least eight uppercase
/// alphanumerics.  Resolution short-circuits on these without any
/// lookup call.
pub fn is_channel_id(s: &str) -> bool {
    let mut chars = s.chars();
    let leading = matches!(chars.next(), Some('C' | 'D' | 'G'));
    leading && s.len() >= 9 && chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}

/// Errors from the Slack client.
#[derive(Debug, thiserror::Error)]
pub enum SlackError {
    /// No channel with the requested name exists in the workspace.
    #[error("no Slack channel named '{0}'")]
    ChannelNotFound(String),
    /// Slack replied with `ok: false`.
    #[error("Slack API error: {0}")]
    Api(String),
    /// Slack replied with a non-2xx HTTP status.
    #[error("Slack API returned {status}: {body}")]
    Http { status: StatusCode, body: String },
    #[error("Slack request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// A channel entry from `conversations.list`.
#[derive(Debug, Clone, Deserialize)]
pub struct SlackChannel {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// A member entry from `users.list`.
#[derive(Debug, Clone, Deserialize)]
pub struct SlackUser {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default)]
    pub profile: SlackProfile,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SlackProfile {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub real_name: String,
}

/// Client for the Slack Web API.
pub struct SlackClient {
    client: Client,
    base_url: String,
    token: String,
}

impl SlackClient {
    /// Create a client against the production API.
    pub fn new(token: String) -> Self {
        Self::with_base_url(SLACK_API_BASE.to_string(), token)
    }

    /// Create a client against an explicit base URL (tests point this
    /// at a mock server).
    pub fn with_base_url(base_url: String, token: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    /// Resolve a channel name or ID to its canonical ID.
    ///
    /// Canonical IDs are returned unchanged without issuing a lookup.
    /// Names have a leading `#` stripped and are matched against the
    /// full channel list.
    pub async fn resolve_channel(&self, name_or_id: &str) -> Result<String, SlackError> {
        if is_channel_id(name_or_id) {
            return Ok(name_or_id.to_string());
        }
        let name = name_or_id.strip_prefix('#').unwrap_or(name_or_id);
        let channels = self.list_channels().await?;
        channels
            .into_iter()
            .find(|c| c.name == name)
            .map(|c| c.id)
            .ok_or_else(|| SlackError::ChannelNotFound(name.to_string()))
    }

    /// Fetch the full channel list, following pagination cursors.
    pub async fn list_channels(&self) -> Result<Vec<SlackChannel>, SlackError> {
        let mut channels = Vec::new();
        let mut cursor = String::new();
        loop {
            let mut query = vec![("limit", PAGE_LIMIT.to_string())];
            if !cursor.is_empty() {
                query.push(("cursor", cursor.clone()));
            }
            let page = self.get("conversations.list", &query).await?;
            if let Some(items) = page.get("channels").and_then(Value::as_array) {
                for item in items {
                    if let Ok(ch) = serde_json::from_value::<SlackChannel>(item.clone()) {
                        channels.push(ch);
                    }
                }
            }
            cursor = next_cursor(&page);
            if cursor.is_empty() {
                return Ok(channels);
            }
        }
    }

    /// Find a bot member whose name, display name, or real name
    /// contains `needle` (case-insensitive).  Returns `Ok(None)` when
    /// no bot matches; callers treat that the same as a lookup failure
    /// and fall back to a plain-text mention.
    pub async fn find_bot_user(&self, needle: &str) -> Result<Option<SlackUser>, SlackError> {
        let needle = needle.to_lowercase();
        let matches = |s: &str| s.to_lowercase().contains(&needle);

        let mut cursor = String::new();
        loop {
            let mut query = vec![("limit", PAGE_LIMIT.to_string())];
            if !cursor.is_empty() {
                query.push(("cursor", cursor.clone()));
            }
            let page = self.get("users.list", &query).await?;
            if let Some(members) = page.get("members").and_then(Value::as_array) {
                for member in members {
                    let Ok(user) = serde_json::from_value::<SlackUser>(member.clone()) else {
                        continue;
                    };
                    if user.is_bot
                        && (matches(&user.name)
                            || matches(&user.profile.display_name)
                            || matches(&user.profile.real_name))
                    {
                        return Ok(Some(user));
                    }
                }
            }
            cursor = next_cursor(&page);
            if cursor.is_empty() {
                return Ok(None);
            }
        }
    }

    /// Post `text` to a channel, optionally as a threaded reply.
    ///
    /// The channel is resolved first, then `chat.postMessage` is
    /// issued.  Returns the service-assigned
    /// message `ts`, the handle used for later threading.
    pub async fn post_message(
        &self,
        channel: &str,
        text: &str,
        thread_ts: Option<&str>,
    ) -> Result<String, SlackError> {
        let channel_id = self.resolve_channel(channel).await?;
        let mut body = json!({
            "channel": channel_id,
            "text": text,
        });
        if let Some(ts) = thread_ts {
            body["thread_ts"] = json!(ts);
        }
        let resp = self.post_json("chat.postMessage", &body).await?;
        resp.get("ts")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| SlackError::Api("chat.postMessage response missing ts".to_string()))
    }

    // ── HTTP plumbing ────────────────────────────────────────────

    async fn get(&self, method: &str, query: &[(&str, String)]) -> Result<Value, SlackError> {
        let resp = self
            .client
            .get(format!("{}/{}", self.base_url, method))
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .await?;
        Self::check(resp).await
    }

    async fn post_json(&self, method: &str, body: &Value) -> Result<Value, SlackError> {
        let resp = self
            .client
            .post(format!("{}/{}", self.base_url, method))
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await?;
        Self::check(resp).await
    }

    /// Enforce both failure surfaces: HTTP status and the `ok` flag
    /// inside Slack's response envelope.
    async fn check(resp: reqwest::Response) -> Result<Value, SlackError> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SlackError::Http { status, body });
        }
        let value: Value = resp.json().await?;
        if value.get("ok").and_then(Value::as_bool) != Some(true) {
            let reason = value
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string();
            return Err(SlackError::Api(reason));
        }
        Ok(value)
    }
}

fn next_cursor(page: &Value) -> String {
    page.get("response_metadata")
        .and_then(|m| m.get("next_cursor"))
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string()
}
