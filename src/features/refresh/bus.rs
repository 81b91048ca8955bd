use serde::Serialize;
use tokio::sync::broadcast;

const DEFAULT_CAPACITY: usize = 64;

/// Something changed remotely and cached datasets should be reloaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshSignal {
    PromptsUpdated,
}

/// Fan-out channel for [`RefreshSignal`]s.
///
/// Delivery is best-effort: a signal published with no subscribers is
/// dropped, and slow receivers observe `RecvError::Lagged`.
#[derive(Debug, Clone)]
pub struct RefreshBus {
    sender: broadcast::Sender<RefreshSignal>,
}

impl RefreshBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Returns the number of subscribers that received the signal
    pub fn publish(&self, signal: RefreshSignal) -> usize {
        match self.sender.send(signal) {
            Ok(receivers) => receivers,
            Err(_) => {
                tracing::debug!(?signal, "No refresh subscribers, signal dropped");
                0
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RefreshSignal> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for RefreshBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_reaches_every_subscriber() {
        let bus = RefreshBus::default();
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();

        assert_eq!(bus.publish(RefreshSignal::PromptsUpdated), 2);

        assert_eq!(a.recv().await.unwrap(), RefreshSignal::PromptsUpdated);
        assert_eq!(b.recv().await.unwrap(), RefreshSignal::PromptsUpdated);
    }

    #[test]
    fn test_publish_without_subscribers_is_dropped() {
        let bus = RefreshBus::default();
        assert_eq!(bus.publish(RefreshSignal::PromptsUpdated), 0);
    }

    #[test]
    fn test_dropping_receiver_unsubscribes() {
        let bus = RefreshBus::default();
        let rx = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);

        drop(rx);
        assert_eq!(bus.subscriber_count(), 0);
    }
}
