//! Environment-sourced configuration.
//!
//! All settings come from the process environment (a `.env` file is
//! honored by `main` before this runs).  The loaded [`Config`] is
//! immutable and passed by reference to every component; nothing in the
//! process reads the environment after startup.

/// Default organization label used when `DEVIN_ORG_NAME` is unset.
pub const DEFAULT_ORG_NAME: &str = "your-org";

/// Default Devin API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.devin.ai/v1";

/// Slack integration settings.
///
/// Present only when `SLACK_BOT_TOKEN` is set; tools skip their
/// Slack-side effects when this is `None`.
#[derive(Debug, Clone)]
pub struct SlackConfig {
    /// Bot token used as the bearer credential for Slack Web API calls.
    pub bot_token: String,
    /// Channel (name or ID) that `create_devin_session` announces to
    /// when the caller does not pass `slack_channel`.
    pub default_channel: String,
}

/// Top-level configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Devin API key (bearer credential). Required.
    pub devin_api_key: String,
    /// Organization label reported by `get_organization_info`.
    pub org_name: String,
    /// Devin API base URL, without a trailing slash.
    pub devin_base_url: String,
    /// Slack integration, active iff `SLACK_BOT_TOKEN` is set.
    pub slack: Option<SlackConfig>,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> anyhow::Result<Config> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// Factored out so tests can exercise validation without touching
    /// process-wide environment state.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let devin_api_key = get("DEVIN_API_KEY")
            .ok_or_else(|| anyhow::anyhow!("DEVIN_API_KEY is not set (required)"))?;

        let org_name = get("DEVIN_ORG_NAME").unwrap_or_else(|| DEFAULT_ORG_NAME.to_string());

        let devin_base_url = get("DEVIN_BASE_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let slack = match get("SLACK_BOT_TOKEN") {
            Some(bot_token) => {
                let default_channel = get("SLACK_DEFAULT_CHANNEL").ok_or_else(|| {
                    anyhow::anyhow!(
                        "SLACK_DEFAULT_CHANNEL is not set (required when SLACK_BOT_TOKEN is set)"
                    )
                })?;
                Some(SlackConfig {
                    bot_token,
                    default_channel,
                })
            }
            None => None,
        };

        Ok(Config {
            devin_api_key,
            org_name,
            devin_base_url,
            slack,
        })
    }
}
