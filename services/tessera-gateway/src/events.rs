//! Bridge from the registry's synchronous event sink onto an async
//! broadcast channel.

use tokio::sync::broadcast;

use tessera_common::{EventSink, RegistryEvent};

/// Forwards every registry fact to broadcast subscribers.
pub struct BroadcastSink {
    tx: broadcast::Sender<RegistryEvent>,
}

impl BroadcastSink {
    pub fn new(tx: broadcast::Sender<RegistryEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for BroadcastSink {
    fn emit(&self, event: RegistryEvent) {
        // No active subscribers is not an error; the fact still happened.
        let _ = self.tx.send(event);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tessera_common::{Address, ArtifactId};

    #[test]
    fn facts_reach_subscribers() {
        let (tx, mut rx) = broadcast::channel(8);
        let sink = BroadcastSink::new(tx);

        let fact = RegistryEvent::Transfer {
            from: None,
            to: Address::new([1; 32]),
            id: ArtifactId(1),
        };
        sink.emit(fact.clone());
        assert_eq!(rx.try_recv().unwrap(), fact);
    }

    #[test]
    fn emitting_without_subscribers_is_fine() {
        let (tx, _) = broadcast::channel(8);
        let sink = BroadcastSink::new(tx);
        sink.emit(RegistryEvent::BaseUriChanged {
            previous: "a".into(),
            new: "b".into(),
        });
    }
}
