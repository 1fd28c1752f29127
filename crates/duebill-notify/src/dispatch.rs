//! Concurrent notification fan-out with per-channel failure isolation.

use std::time::Duration;

use futures::stream::{self, StreamExt};

use duebill_core::error::{DueBillError, Result};
use duebill_core::{Channel, Notification};

/// Bound on how long one channel send may take; an unresponsive backend
/// must not stall the whole notify command.
pub const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Channel sends in flight at once.
const MAX_IN_FLIGHT: usize = 4;

/// Outcome of one channel delivery attempt.
#[derive(Debug)]
pub struct ChannelOutcome {
    pub channel: String,
    pub result: Result<()>,
}

/// Aggregated per-channel outcomes for one dispatch.
#[derive(Debug, Default)]
pub struct DispatchReport {
    pub outcomes: Vec<ChannelOutcome>,
}

impl DispatchReport {
    /// At least one channel existed to try.
    pub fn attempted(&self) -> bool {
        !self.outcomes.is_empty()
    }

    /// At least one channel accepted the notification.
    pub fn sent(&self) -> bool {
        self.outcomes.iter().any(|o| o.result.is_ok())
    }

    pub fn successes(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failures(&self) -> usize {
        self.outcomes.len() - self.successes()
    }
}

/// Deliver `note` to every channel, best-effort.
///
/// One channel's failure never prevents attempting the rest. All sends
/// are joined before the report is returned; no retries, no queuing.
pub async fn dispatch(note: &Notification, channels: &[Box<dyn Channel>]) -> DispatchReport {
    let outcomes = stream::iter(channels.iter().map(|channel| async move {
        let result = match tokio::time::timeout(SEND_TIMEOUT, channel.send(note)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(DueBillError::Timeout(format!(
                "{} send exceeded {}s",
                channel.name(),
                SEND_TIMEOUT.as_secs()
            ))),
        };
        match &result {
            Ok(()) => tracing::info!("Notification delivered via {}", channel.name()),
            Err(e) => tracing::warn!("Delivery via {} failed: {e}", channel.name()),
        }
        ChannelOutcome {
            channel: channel.name().to_string(),
            result,
        }
    }))
    .buffer_unordered(MAX_IN_FLIGHT)
    .collect()
    .await;

    DispatchReport { outcomes }
}
