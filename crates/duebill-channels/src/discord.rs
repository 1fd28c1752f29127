//! Discord channel: webhook delivery.
//!
//! Descriptor form: `discord://webhook_id/webhook_token`, mapping to
//! `https://discord.com/api/webhooks/{id}/{token}`.

use async_trait::async_trait;
use url::Url;

use duebill_core::error::{DueBillError, Result};
use duebill_core::{Channel, Notification};

/// Discord webhook coordinates parsed from a `discord://` descriptor.
#[derive(Debug, Clone)]
pub struct DiscordConfig {
    pub webhook_id: String,
    pub webhook_token: String,
}

impl DiscordConfig {
    pub fn from_url(url: &Url) -> Result<Self> {
        let webhook_id = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| DueBillError::validation("discord descriptor is missing a webhook id"))?
            .to_string();
        let webhook_token = url
            .path_segments()
            .and_then(|mut segments| segments.next())
            .filter(|segment| !segment.is_empty())
            .ok_or_else(|| {
                DueBillError::validation("discord descriptor is missing a webhook token")
            })?
            .to_string();
        Ok(Self {
            webhook_id,
            webhook_token,
        })
    }

    pub fn webhook_url(&self) -> String {
        format!(
            "https://discord.com/api/webhooks/{}/{}",
            self.webhook_id, self.webhook_token
        )
    }
}

/// Discord channel: posts the digest as a single webhook message.
#[derive(Debug)]
pub struct DiscordChannel {
    url: String,
    client: reqwest::Client,
}

impl DiscordChannel {
    pub fn new(config: DiscordConfig) -> Self {
        Self {
            url: config.webhook_url(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Channel for DiscordChannel {
    fn name(&self) -> &str {
        "discord"
    }

    async fn send(&self, note: &Notification) -> Result<()> {
        let body = serde_json::json!({
            "content": format!("**{}**\n{}", note.title, note.body),
        });

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| DueBillError::channel(format!("Discord send failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(DueBillError::channel(format!("Discord {status}: {text}")));
        }
        Ok(())
    }
}

pub(crate) fn build(_raw: &str, url: &Url) -> Result<Box<dyn Channel>> {
    Ok(Box::new(DiscordChannel::new(DiscordConfig::from_url(url)?)))
}
