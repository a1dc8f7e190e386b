//! The event dispatch boundary between poll threads and display layers.
//!
//! Trackers compute on their worker thread and publish only final
//! values here. Each subscriber gets its own unbounded channel, so a
//! slow consumer never blocks a poll tick; subscribers that dropped
//! their receiver are pruned on the next publish.

use parking_lot::Mutex;
use std::sync::mpsc::{Receiver, Sender, channel};

use crate::events::TrackerEvent;

/// Fan-out dispatcher for [`TrackerEvent`]s.
#[derive(Debug, Default)]
pub struct Dispatcher {
    subscribers: Mutex<Vec<Sender<TrackerEvent>>>,
}

impl Dispatcher {
    /// Create a dispatcher with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber and return its receiving end.
    pub fn subscribe(&self) -> Receiver<TrackerEvent> {
        let (tx, rx) = channel();
        self.subscribers.lock().push(tx);
        rx
    }

    /// Publish an event to every live subscriber, pruning dead ones.
    pub fn publish(&self, event: &TrackerEvent) {
        self.subscribers
            .lock()
            .retain(|tx| tx.send(event.clone()).is_ok());
    }

    /// Publish a batch in order.
    pub fn publish_all(&self, events: &[TrackerEvent]) {
        for event in events {
            self.publish(event);
        }
    }

    /// Number of currently registered subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_fan_out_in_order() {
        let dispatcher = Dispatcher::new();
        let rx1 = dispatcher.subscribe();
        let rx2 = dispatcher.subscribe();

        dispatcher.publish(&TrackerEvent::TimerStarted);
        dispatcher.publish(&TrackerEvent::TimerPaused);

        for rx in [rx1, rx2] {
            assert_eq!(rx.try_recv(), Ok(TrackerEvent::TimerStarted));
            assert_eq!(rx.try_recv(), Ok(TrackerEvent::TimerPaused));
            assert!(rx.try_recv().is_err());
        }
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let dispatcher = Dispatcher::new();
        let rx1 = dispatcher.subscribe();
        let rx2 = dispatcher.subscribe();
        assert_eq!(dispatcher.subscriber_count(), 2);

        drop(rx2);
        dispatcher.publish(&TrackerEvent::DailyReset);
        assert_eq!(dispatcher.subscriber_count(), 1);
        assert_eq!(rx1.try_recv(), Ok(TrackerEvent::DailyReset));
    }
}
