//! Devin API client.
//!
//! Thin HTTP wrapper over the Devin session endpoints: create, get,
//! list, fetch message history, and post a message into a session.
//! No retries, no request timeouts; a call that never completes stalls
//! its invocation and nothing else.
//!
//! Session IDs come back from the service with a cosmetic `devin-`
//! prefix.  [`normalize_session_id`] strips it for display and for use
//! in URL paths; callers keep the raw form alongside the normalized one
//! in every outward-facing payload.

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

/// Cosmetic prefix on session IDs as issued by the service.
pub const SESSION_ID_PREFIX: &str = "devin-";

/// Strip one leading `devin-` from a session ID, if present.
///
/// Identity for IDs without the prefix; never fails.
pub fn normalize_session_id(id: &str) -> &str {
    id.strip_prefix(SESSION_ID_PREFIX).unwrap_or(id)
}

/// Errors from the Devin API client.
///
/// `Http` carries the upstream status and body verbatim so the tool
/// dispatcher can surface them in the error envelope; `Transport`
/// covers everything below HTTP (DNS, connect, decode).
#[derive(Debug, thiserror::Error)]
pub enum DevinError {
    #[error("Devin API returned {status}: {body}")]
    Http { status: StatusCode, body: String },
    #[error("Devin API request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Client for the Devin HTTP API.
pub struct DevinClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl DevinClient {
    /// Create a client against `base_url` (no trailing slash) using
    /// `api_key` as the bearer credential.
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            api_key,
        }
    }

    /// Create a new Devin session.
    ///
    /// `snapshot_id` and `max_acu` are omitted from the request body
    /// when absent; `idempotent` is always sent.
    pub async fn create_session(
        &self,
        prompt: &str,
        snapshot_id: Option<&str>,
        max_acu: Option<&Value>,
        idempotent: bool,
    ) -> Result<Value, DevinError> {
        let mut body = json!({
            "prompt": prompt,
            "idempotent": idempotent,
        });
        if let Some(snapshot) = snapshot_id {
            body["snapshot_id"] = json!(snapshot);
        }
        if let Some(acu) = max_acu {
            body["max_acu_limit"] = acu.clone();
        }

        let resp = self
            .client
            .post(format!("{}/sessions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        Ok(Self::check(resp).await?.json().await?)
    }

    /// Fetch a session by its normalized ID.
    pub async fn get_session(&self, session_id: &str) -> Result<Value, DevinError> {
        let resp = self
            .client
            .get(format!("{}/session/{}", self.base_url, session_id))
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        Ok(Self::check(resp).await?.json().await?)
    }

    /// Fetch the message history of a session.
    pub async fn get_session_messages(&self, session_id: &str) -> Result<Value, DevinError> {
        let resp = self
            .client
            .get(format!("{}/session/{}/messages", self.base_url, session_id))
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        Ok(Self::check(resp).await?.json().await?)
    }

    /// Post a message into a session.
    ///
    /// Success is any 2xx response; the (possibly empty) body text is
    /// returned as-is.  The endpoint replies with an empty body on
    /// current API versions, so the response is not parsed as JSON.
    pub async fn send_message(&self, session_id: &str, message: &str) -> Result<String, DevinError> {
        let resp = self
            .client
            .post(format!("{}/session/{}/message", self.base_url, session_id))
            .bearer_auth(&self.api_key)
            .json(&json!({ "message": message }))
            .send()
            .await?;
        Ok(Self::check(resp).await?.text().await?)
    }

    /// List sessions.  `limit` and `offset` become query parameters
    /// only when present.
    pub async fn list_sessions(
        &self,
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> Result<Value, DevinError> {
        let mut req = self
            .client
            .get(format!("{}/sessions", self.base_url))
            .bearer_auth(&self.api_key);
        if let Some(limit) = limit {
            req = req.query(&[("limit", limit)]);
        }
        if let Some(offset) = offset {
            req = req.query(&[("offset", offset)]);
        }
        let resp = req.send().await?;
        Ok(Self::check(resp).await?.json().await?)
    }

    /// Map a non-2xx response into [`DevinError::Http`], preserving the
    /// upstream body verbatim.
    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, DevinError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(DevinError::Http { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_prefix() {
        assert_eq!(normalize_session_id("devin-abc123"), "abc123");
    }

    #[test]
    fn normalize_strips_exactly_one_prefix() {
        assert_eq!(normalize_session_id("devin-devin-abc"), "devin-abc");
    }

    #[test]
    fn normalize_is_identity_without_prefix() {
        assert_eq!(normalize_session_id("abc123"), "abc123");
        assert_eq!(normalize_session_id(""), "");
    }

    #[test]
    fn normalize_ignores_prefix_elsewhere() {
        assert_eq!(normalize_session_id("abc-devin-xyz"), "abc-devin-xyz");
    }
}
