//! Slack channel: incoming-webhook delivery.
//!
//! Descriptor form: `slack://TokenA/TokenB/TokenC`, the three segments
//! of the hook URL `https://hooks.slack.com/services/A/B/C`. Tokens are
//! case-sensitive and read verbatim from the descriptor.

use async_trait::async_trait;
use url::Url;

use duebill_core::error::{DueBillError, Result};
use duebill_core::{Channel, Notification};

/// Slack hook tokens parsed from a `slack://` descriptor.
#[derive(Debug, Clone)]
pub struct SlackConfig {
    pub token_a: String,
    pub token_b: String,
    pub token_c: String,
}

impl SlackConfig {
    pub fn from_descriptor(raw: &str) -> Result<Self> {
        let rest = raw.strip_prefix("slack://").ok_or_else(|| {
            DueBillError::validation("slack descriptor must start with slack://")
        })?;
        let rest = rest.split(['?', '#']).next().unwrap_or_default();
        let tokens: Vec<&str> = rest.trim_matches('/').split('/').collect();
        if tokens.len() != 3 || tokens.iter().any(|t| t.is_empty()) {
            return Err(DueBillError::validation(
                "slack descriptor needs three hook tokens: slack://TokenA/TokenB/TokenC",
            ));
        }
        Ok(Self {
            token_a: tokens[0].to_string(),
            token_b: tokens[1].to_string(),
            token_c: tokens[2].to_string(),
        })
    }

    pub fn hook_url(&self) -> String {
        format!(
            "https://hooks.slack.com/services/{}/{}/{}",
            self.token_a, self.token_b, self.token_c
        )
    }
}

/// Slack channel: posts the digest as a single webhook message.
#[derive(Debug)]
pub struct SlackChannel {
    url: String,
    client: reqwest::Client,
}

impl SlackChannel {
    pub fn new(config: SlackConfig) -> Self {
        Self {
            url: config.hook_url(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Channel for SlackChannel {
    fn name(&self) -> &str {
        "slack"
    }

    async fn send(&self, note: &Notification) -> Result<()> {
        let body = serde_json::json!({
            "text": format!("*{}*\n{}", note.title, note.body),
        });

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| DueBillError::channel(format!("Slack send failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(DueBillError::channel(format!("Slack {status}: {text}")));
        }
        Ok(())
    }
}

pub(crate) fn build(raw: &str, _url: &Url) -> Result<Box<dyn Channel>> {
    Ok(Box::new(SlackChannel::new(SlackConfig::from_descriptor(
        raw,
    )?)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_keep_case() {
        let config = SlackConfig::from_descriptor("slack://T0AbC/B0DeF/XyZ123").unwrap();
        assert_eq!(
            config.hook_url(),
            "https://hooks.slack.com/services/T0AbC/B0DeF/XyZ123"
        );
    }

    #[test]
    fn test_trailing_slash_and_query_are_tolerated() {
        let config = SlackConfig::from_descriptor("slack://A/B/C/?footer=no").unwrap();
        assert_eq!(config.hook_url(), "https://hooks.slack.com/services/A/B/C");
    }

    #[test]
    fn test_wrong_token_count_is_rejected() {
        assert!(SlackConfig::from_descriptor("slack://A/B").is_err());
        assert!(SlackConfig::from_descriptor("slack://A/B/C/D").is_err());
        assert!(SlackConfig::from_descriptor("slack://A//C").is_err());
    }
}
