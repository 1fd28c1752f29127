//! Notification delivery channel trait.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::Notification;

/// One configured notification delivery backend instance.
///
/// Implementations are constructed from a URL-style descriptor by the
/// channel registry and hold everything needed to deliver (destination,
/// credentials, HTTP client or SMTP transport).
#[async_trait]
pub trait Channel: Send + Sync + std::fmt::Debug {
    /// Backend family name ("email", "slack", "discord", "webhook").
    fn name(&self) -> &str;

    /// Deliver one notification to this channel's destination.
    async fn send(&self, note: &Notification) -> Result<()>;
}
