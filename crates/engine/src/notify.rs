//! Best-effort notification fan-out.
//!
//! After a committed mutation the engine publishes an opaque "changed" signal
//! on a topic named `<subsystem>/<owner_id>`. Consumers re-fetch; they never
//! parse the payload. Publishing is fire-and-forget: it never blocks, never
//! fails the caller, and is never retried.

use std::collections::HashMap;
use std::sync::RwLock;

use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 16;

/// Subsystems a topic can be scoped to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Subsystem {
    Goals,
    Transactions,
    FinancialSummary,
    Users,
}

impl Subsystem {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Goals => "goals",
            Self::Transactions => "transactions",
            Self::FinancialSummary => "financial-summary",
            Self::Users => "users",
        }
    }
}

impl TryFrom<&str> for Subsystem {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "goals" => Ok(Self::Goals),
            "transactions" => Ok(Self::Transactions),
            "financial-summary" => Ok(Self::FinancialSummary),
            "users" => Ok(Self::Users),
            _ => Err(()),
        }
    }
}

fn topic(subsystem: Subsystem, owner_id: &str) -> String {
    format!("{}/{}", subsystem.as_str(), owner_id)
}

/// Per-topic broadcast hub.
///
/// Channels are created lazily on first subscribe or publish and kept for the
/// process lifetime; a slow or closed subscriber only loses its own messages.
#[derive(Debug, Default)]
pub struct Notifier {
    topics: RwLock<HashMap<String, broadcast::Sender<String>>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a "changed" signal. Failures are logged and swallowed.
    pub fn publish(&self, subsystem: Subsystem, owner_id: &str) {
        let topic = topic(subsystem, owner_id);
        let sender = self.sender(&topic);
        match sender.send("changed".to_string()) {
            Ok(receivers) => {
                tracing::debug!("notified {receivers} subscriber(s) on {topic}");
            }
            // No live subscribers; the signal is droppable by design.
            Err(broadcast::error::SendError(_)) => {
                tracing::trace!("no subscribers on {topic}");
            }
        }
    }

    /// Subscribe to one topic. Messages published before the call are not
    /// replayed.
    pub fn subscribe(&self, subsystem: Subsystem, owner_id: &str) -> broadcast::Receiver<String> {
        self.sender(&topic(subsystem, owner_id)).subscribe()
    }

    fn sender(&self, topic: &str) -> broadcast::Sender<String> {
        if let Ok(topics) = self.topics.read()
            && let Some(sender) = topics.get(topic)
        {
            return sender.clone();
        }
        match self.topics.write() {
            Ok(mut topics) => topics
                .entry(topic.to_string())
                .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
                .clone(),
            Err(poisoned) => {
                // A poisoned lock only means some publisher panicked; the map
                // itself is still usable.
                tracing::warn!("notifier topic map poisoned");
                poisoned
                    .into_inner()
                    .entry(topic.to_string())
                    .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
                    .clone()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_without_subscribers_is_silent() {
        let notifier = Notifier::new();
        notifier.publish(Subsystem::Transactions, "alice");
    }

    #[tokio::test]
    async fn subscriber_receives_changed_signal() {
        let notifier = Notifier::new();
        let mut rx = notifier.subscribe(Subsystem::Goals, "alice");
        notifier.publish(Subsystem::Goals, "alice");
        assert_eq!(rx.recv().await.unwrap(), "changed");
    }

    #[tokio::test]
    async fn topics_are_scoped_per_owner() {
        let notifier = Notifier::new();
        let mut alice = notifier.subscribe(Subsystem::Goals, "alice");
        notifier.publish(Subsystem::Goals, "bob");
        notifier.publish(Subsystem::Goals, "alice");
        assert_eq!(alice.recv().await.unwrap(), "changed");
        assert!(alice.try_recv().is_err());
    }

    #[test]
    fn subsystem_round_trip() {
        for subsystem in [
            Subsystem::Goals,
            Subsystem::Transactions,
            Subsystem::FinancialSummary,
            Subsystem::Users,
        ] {
            assert_eq!(Subsystem::try_from(subsystem.as_str()), Ok(subsystem));
        }
        assert!(Subsystem::try_from("profile-pictures").is_err());
    }
}
