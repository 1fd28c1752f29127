//! Generic webhook channel: JSON POST to an arbitrary endpoint.
//!
//! Descriptor forms: `json://host[:port]/path` posts over http,
//! `jsons://host[:port]/path` over https. The payload is
//! `{"title": ..., "body": ...}`.

use async_trait::async_trait;
use url::Url;

use duebill_core::error::{DueBillError, Result};
use duebill_core::{Channel, Notification};

/// Webhook endpoint parsed from a `json://` or `jsons://` descriptor.
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    pub endpoint: String,
}

impl WebhookConfig {
    pub fn from_url(url: &Url) -> Result<Self> {
        let proto = match url.scheme() {
            "json" => "http",
            "jsons" => "https",
            other => {
                return Err(DueBillError::validation(format!(
                    "webhook descriptor scheme must be json or jsons, got '{other}'"
                )));
            }
        };
        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| DueBillError::validation("webhook descriptor is missing a host"))?;

        let mut endpoint = format!("{proto}://{host}");
        if let Some(port) = url.port() {
            endpoint.push_str(&format!(":{port}"));
        }
        endpoint.push_str(url.path());
        if let Some(query) = url.query() {
            endpoint.push('?');
            endpoint.push_str(query);
        }
        Ok(Self { endpoint })
    }
}

/// Generic webhook channel.
#[derive(Debug)]
pub struct WebhookChannel {
    config: WebhookConfig,
    client: reqwest::Client,
}

impl WebhookChannel {
    pub fn new(config: WebhookConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Channel for WebhookChannel {
    fn name(&self) -> &str {
        "webhook"
    }

    async fn send(&self, note: &Notification) -> Result<()> {
        let body = serde_json::json!({
            "title": note.title,
            "body": note.body,
        });

        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| DueBillError::channel(format!("Webhook send failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(DueBillError::channel(format!("Webhook {status}: {text}")));
        }
        Ok(())
    }
}

pub(crate) fn build(_raw: &str, url: &Url) -> Result<Box<dyn Channel>> {
    Ok(Box::new(WebhookChannel::new(WebhookConfig::from_url(url)?)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_construction() {
        let url = Url::parse("json://hooks.local:8080/bills/notify?token=t").unwrap();
        let config = WebhookConfig::from_url(&url).unwrap();
        assert_eq!(
            config.endpoint,
            "http://hooks.local:8080/bills/notify?token=t"
        );

        let url = Url::parse("jsons://hooks.example.com/notify").unwrap();
        let config = WebhookConfig::from_url(&url).unwrap();
        assert_eq!(config.endpoint, "https://hooks.example.com/notify");
    }

    #[test]
    fn test_missing_host_is_rejected() {
        let url = Url::parse("json:///notify").unwrap();
        assert!(WebhookConfig::from_url(&url).is_err());
    }
}
