//! Propagator loop.
//!
//! The Propagator is responsible for:
//! - Waiting a fixed interval between ticks (`Idle`)
//! - Picking one random event from the catalog on each tick
//! - Handing it to the send processor and awaiting the outcome (`Sending`)
//! - Stopping between ticks once shutdown is signaled
//!
//! Each cycle has two suspension points. The tick wait races the shutdown
//! signal; the send is awaited on its own, so an in-flight send is never
//! cut short. The interval is measured from the end of the previous send,
//! so the effective period is interval plus send latency.

use crate::catalog::Catalog;
use crate::config::ConfigStore;
use crate::processors::SendOutcome;
use evpipe_sdk::objects::RawEvent;
use kanau::processor::Processor;
use std::convert::Infallible;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Where the loop currently is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropagatorState {
    /// Waiting for the next tick.
    Idle,
    /// One send in flight.
    Sending,
}

/// Counters reported when the loop exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PropagatorSummary {
    pub sends: u64,
    pub delivered: u64,
}

/// Periodically sends one random catalog event through `S`.
///
/// The catalog lives in a [`ConfigStore`] so a reload can swap it while
/// the loop runs; it is read once per tick.
pub struct Propagator<S> {
    sender: S,
    catalog: ConfigStore<Catalog>,
    interval: Duration,
    state: PropagatorState,
}

impl<S> Propagator<S>
where
    S: Processor<RawEvent, Output = SendOutcome, Error = Infallible>,
{
    pub fn new(sender: S, catalog: ConfigStore<Catalog>, interval: Duration) -> Self {
        Self {
            sender,
            catalog,
            interval,
            state: PropagatorState::Idle,
        }
    }

    pub fn state(&self) -> PropagatorState {
        self.state
    }

    /// Run one select-and-send cycle.
    ///
    /// Returns `None` without sending when the catalog is empty.
    pub async fn tick(&mut self) -> Option<SendOutcome> {
        // Clone out of the catalog so the read lock is not held across the send.
        let event = self.catalog.read().await.pick_random().cloned()?;

        self.state = PropagatorState::Sending;
        debug!(event = %event, "Sending event");
        let Ok(outcome) = self.sender.process(event).await;
        self.state = PropagatorState::Idle;

        Some(outcome)
    }

    /// Run the loop until shutdown is signaled.
    ///
    /// Returns immediately, without a single send, if the catalog is empty
    /// at startup.
    pub async fn run(mut self, mut shutdown_rx: watch::Receiver<bool>) -> PropagatorSummary {
        let mut summary = PropagatorSummary::default();

        let available = self.catalog.read().await.len();
        if available == 0 {
            warn!("No events available to send, propagator exiting");
            return summary;
        }

        info!(
            interval_secs = self.interval.as_secs(),
            available, "Propagator started"
        );

        loop {
            if *shutdown_rx.borrow() {
                info!("Propagator received shutdown signal");
                break;
            }

            tokio::select! {
                biased;

                changed = shutdown_rx.changed() => {
                    // A dropped sender can never signal again; treat it as shutdown.
                    if changed.is_err() || *shutdown_rx.borrow() {
                        info!("Propagator received shutdown signal");
                        break;
                    }
                    continue;
                }

                _ = tokio::time::sleep(self.interval) => {}
            }

            match self.tick().await {
                Some(outcome) => {
                    summary.sends += 1;
                    if outcome.is_delivered() {
                        summary.delivered += 1;
                    }
                    debug!(%outcome, "Tick complete");
                }
                None => debug!("Catalog is empty, skipping tick"),
            }
        }

        info!(
            sends = summary.sends,
            delivered = summary.delivered,
            "Propagator shutdown complete"
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    /// Records every event and signals shutdown after `stop_after` sends.
    #[derive(Clone)]
    struct RecordingSender {
        sent: Arc<Mutex<Vec<RawEvent>>>,
        finished: Arc<Mutex<usize>>,
        shutdown_tx: Arc<watch::Sender<bool>>,
        stop_after: usize,
        latency: Duration,
    }

    impl RecordingSender {
        fn new(shutdown_tx: watch::Sender<bool>, stop_after: usize) -> Self {
            Self {
                sent: Arc::default(),
                finished: Arc::default(),
                shutdown_tx: Arc::new(shutdown_tx),
                stop_after,
                latency: Duration::ZERO,
            }
        }

        fn sent(&self) -> Vec<RawEvent> {
            self.sent.lock().unwrap().clone()
        }
    }

    impl Processor<RawEvent> for RecordingSender {
        type Output = SendOutcome;
        type Error = Infallible;

        async fn process(&self, event: RawEvent) -> Result<SendOutcome, Infallible> {
            let count = {
                let mut sent = self.sent.lock().unwrap();
                sent.push(event);
                sent.len()
            };
            if count >= self.stop_after {
                let _ = self.shutdown_tx.send(true);
            }
            tokio::time::sleep(self.latency).await;
            *self.finished.lock().unwrap() += 1;
            Ok(SendOutcome::Delivered {
                event_id: Some(count as i64),
            })
        }
    }

    fn login_catalog() -> ConfigStore<Catalog> {
        ConfigStore::new(Catalog::from_events(vec![
            json!({"event_type": "login", "event_payload": "user123"}),
        ]))
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_catalog_performs_zero_sends() {
        let (tx, rx) = watch::channel(false);
        let sender = RecordingSender::new(tx, 1);
        let propagator = Propagator::new(
            sender.clone(),
            ConfigStore::new(Catalog::default()),
            Duration::from_secs(1),
        );

        let summary = propagator.run(rx).await;

        assert_eq!(summary, PropagatorSummary::default());
        assert!(sender.sent().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sends_once_per_interval_until_shutdown() {
        let (tx, rx) = watch::channel(false);
        let sender = RecordingSender::new(tx, 3);
        let interval = Duration::from_secs(5);
        let propagator = Propagator::new(sender.clone(), login_catalog(), interval);

        let started = tokio::time::Instant::now();
        let summary = propagator.run(rx).await;

        assert_eq!(summary.sends, 3);
        assert_eq!(summary.delivered, 3);
        assert_eq!(sender.sent().len(), 3);
        assert!(started.elapsed() >= interval * 3);
        assert_eq!(sender.sent()[0]["event_payload"], "user123");
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_before_first_tick() {
        let (tx, rx) = watch::channel(false);
        let sender = RecordingSender::new(tx, 1);
        sender.shutdown_tx.send(true).unwrap();

        let summary = Propagator::new(sender.clone(), login_catalog(), Duration::from_secs(1))
            .run(rx)
            .await;

        assert_eq!(summary.sends, 0);
        assert!(sender.sent().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_in_flight_send_completes_before_shutdown() {
        let (tx, rx) = watch::channel(false);
        let mut sender = RecordingSender::new(tx, 1);
        sender.latency = Duration::from_secs(30);

        let started = tokio::time::Instant::now();
        let summary = Propagator::new(sender.clone(), login_catalog(), Duration::from_secs(1))
            .run(rx)
            .await;

        // Shutdown fired at the start of the send, but the send still finished.
        assert_eq!(summary.sends, 1);
        assert_eq!(*sender.finished.lock().unwrap(), 1);
        assert!(started.elapsed() >= Duration::from_secs(31));
    }

    #[tokio::test]
    async fn test_tick_skips_after_catalog_is_emptied() {
        let (tx, _rx) = watch::channel(false);
        let sender = RecordingSender::new(tx, usize::MAX);
        let catalog = login_catalog();
        let mut propagator = Propagator::new(sender.clone(), catalog.clone(), Duration::from_secs(1));

        assert!(propagator.tick().await.is_some());
        assert_eq!(propagator.state(), PropagatorState::Idle);

        catalog.update(Catalog::default()).await;
        assert!(propagator.tick().await.is_none());
        assert_eq!(sender.sent().len(), 1);
    }
}
