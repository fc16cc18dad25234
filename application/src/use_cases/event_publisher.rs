//! Per-session event fan-out.
//!
//! The state machine writes into an unbounded `mpsc` so it never waits on a
//! slow reader. A pump task copies each event into one unbounded channel per
//! subscriber, so a connected reader sees every event in order no matter how
//! far behind it falls. A subscriber whose receiver has been dropped is
//! pruned on the next publish.
//!
//! Once a terminal event (`debate_end` or `error`) has been delivered the
//! senders are dropped, so every subscription ends right after it.

use battle_domain::{SessionId, StreamEvent};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

type Subscribers = Option<Vec<mpsc::UnboundedSender<StreamEvent>>>;

/// Fan-out point for one session's events.
///
/// Cheap to clone; clones share the same subscriber list.
#[derive(Clone)]
pub struct EventPublisher {
    inner: Arc<PublisherInner>,
}

struct PublisherInner {
    session_id: SessionId,
    /// `None` once closed
    subscribers: Mutex<Subscribers>,
}

impl EventPublisher {
    pub fn new(session_id: SessionId) -> Self {
        Self {
            inner: Arc::new(PublisherInner {
                session_id,
                subscribers: Mutex::new(Some(Vec::new())),
            }),
        }
    }

    /// Register a subscriber.
    ///
    /// Subscribers only see events published after this call. Subscribing to
    /// a closed publisher yields a subscription that ends immediately.
    pub fn subscribe(&self) -> EventSubscription {
        let receiver = self.lock().as_mut().map(|subscribers| {
            let (tx, rx) = mpsc::unbounded_channel();
            subscribers.push(tx);
            rx
        });
        EventSubscription {
            session_id: self.inner.session_id.clone(),
            receiver,
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock()
            .as_ref()
            .map(|subscribers| subscribers.iter().filter(|tx| !tx.is_closed()).count())
            .unwrap_or(0)
    }

    pub fn is_closed(&self) -> bool {
        self.lock().is_none()
    }

    /// Deliver one event to every live subscriber. Returns false if the
    /// publisher is closed.
    pub fn publish(&self, event: StreamEvent) -> bool {
        let mut guard = self.lock();
        let Some(subscribers) = guard.as_mut() else {
            return false;
        };
        subscribers.retain(|tx| tx.send(event.clone()).is_ok());
        if subscribers.is_empty() {
            // Not replayed to later subscribers
            debug!(session = %self.inner.session_id, "Event dropped: no subscribers");
        }
        true
    }

    /// Drop every sender so each subscription ends once drained.
    pub fn close(&self) {
        if self.lock().take().is_some() {
            debug!(session = %self.inner.session_id, "Event stream closed");
        }
    }

    /// Move events from the state machine to the subscribers.
    ///
    /// The pump stops after the first terminal event, or when the state
    /// machine drops its sender, and closes the publisher either way.
    pub fn spawn_pump(&self, mut events: mpsc::UnboundedReceiver<StreamEvent>) -> JoinHandle<()> {
        let publisher = self.clone();
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                let terminal = event.is_terminal();
                if !publisher.publish(event) || terminal {
                    break;
                }
            }
            publisher.close();
        })
    }

    fn lock(&self) -> MutexGuard<'_, Subscribers> {
        self.inner
            .subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// One subscriber's view of a session's events.
pub struct EventSubscription {
    session_id: SessionId,
    receiver: Option<mpsc::UnboundedReceiver<StreamEvent>>,
}

impl EventSubscription {
    /// A subscription that yields `event` and then ends
    pub fn replay(session_id: SessionId, event: StreamEvent) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let _ = tx.send(event);
        Self {
            session_id,
            receiver: Some(rx),
        }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// Next event, or `None` once the stream has ended.
    pub async fn recv(&mut self) -> Option<StreamEvent> {
        let event = self.receiver.as_mut()?.recv().await;
        if event.is_none() {
            self.receiver = None;
        }
        event
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_domain::EndReason;

    fn round_start(round: u32) -> StreamEvent {
        StreamEvent::RoundStart {
            round,
            max_rounds: 3,
        }
    }

    #[tokio::test]
    async fn test_fan_out_to_all_subscribers() {
        let publisher = EventPublisher::new(SessionId::from("s1"));
        let mut a = publisher.subscribe();
        let mut b = publisher.subscribe();
        assert_eq!(publisher.subscriber_count(), 2);

        publisher.publish(round_start(0));

        assert_eq!(a.recv().await, Some(round_start(0)));
        assert_eq!(b.recv().await, Some(round_start(0)));
    }

    #[tokio::test]
    async fn test_late_subscriber_is_forward_only() {
        let publisher = EventPublisher::new(SessionId::from("s1"));
        let mut early = publisher.subscribe();
        publisher.publish(round_start(0));

        let mut late = publisher.subscribe();
        publisher.publish(round_start(1));
        publisher.close();

        assert_eq!(early.recv().await, Some(round_start(0)));
        assert_eq!(early.recv().await, Some(round_start(1)));
        assert_eq!(late.recv().await, Some(round_start(1)));
        assert_eq!(late.recv().await, None);
    }

    #[tokio::test]
    async fn test_pump_closes_after_terminal_event() {
        let publisher = EventPublisher::new(SessionId::from("s1"));
        let mut sub = publisher.subscribe();
        let (tx, rx) = mpsc::unbounded_channel();

        let pump = publisher.spawn_pump(rx);
        tx.send(round_start(0)).unwrap();
        tx.send(StreamEvent::DebateEnd {
            reason: EndReason::Completed,
        })
        .unwrap();
        // anything after the terminal event is never delivered
        let _ = tx.send(round_start(1));
        pump.await.unwrap();

        assert_eq!(sub.recv().await, Some(round_start(0)));
        assert!(matches!(
            sub.recv().await,
            Some(StreamEvent::DebateEnd { .. })
        ));
        assert_eq!(sub.recv().await, None);
        assert!(publisher.is_closed());
    }

    #[tokio::test]
    async fn test_pump_closes_when_producer_drops() {
        let publisher = EventPublisher::new(SessionId::from("s1"));
        let mut sub = publisher.subscribe();
        let (tx, rx) = mpsc::unbounded_channel();
        let pump = publisher.spawn_pump(rx);
        drop(tx);
        pump.await.unwrap();
        assert_eq!(sub.recv().await, None);
    }

    #[tokio::test]
    async fn test_subscribe_after_close_ends_immediately() {
        let publisher = EventPublisher::new(SessionId::from("s1"));
        publisher.close();
        let mut sub = publisher.subscribe();
        assert_eq!(sub.recv().await, None);
        assert!(!publisher.publish(round_start(0)));
    }

    #[tokio::test]
    async fn test_slow_subscriber_receives_every_event() {
        let publisher = EventPublisher::new(SessionId::from("s1"));
        let mut slow = publisher.subscribe();
        for round in 0..1000 {
            publisher.publish(round_start(round));
        }
        publisher.close();

        for round in 0..1000 {
            assert_eq!(slow.recv().await, Some(round_start(round)));
        }
        assert_eq!(slow.recv().await, None);
    }

    #[tokio::test]
    async fn test_dropped_subscriber_is_pruned() {
        let publisher = EventPublisher::new(SessionId::from("s1"));
        let mut kept = publisher.subscribe();
        let gone = publisher.subscribe();
        drop(gone);
        assert_eq!(publisher.subscriber_count(), 1);

        assert!(publisher.publish(round_start(0)));
        assert_eq!(kept.recv().await, Some(round_start(0)));
    }

    #[tokio::test]
    async fn test_replay_yields_one_event() {
        let end = StreamEvent::DebateEnd {
            reason: EndReason::Stopped,
        };
        let mut sub = EventSubscription::replay(SessionId::from("s1"), end.clone());
        assert_eq!(sub.session_id().as_str(), "s1");
        assert_eq!(sub.recv().await, Some(end));
        assert_eq!(sub.recv().await, None);
    }
}
