//! Event simulation
//!
//! Two background sources that keep the dashboard lively:
//! - [`AlertSimulator`] occasionally files a random alert into the service
//! - [`FeedSimulator`] occasionally emits `newAlert` on an [`EventBus`]
//!
//! Both draw from an injected [`StdRng`], so a fixed seed replays the
//! same sequence of events.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tracing::{debug, info, warn};

use crate::model::{Alert, AlertKind, NewAlert};
use crate::service::SafetyService;

/// Event name used by the live feed
pub const NEW_ALERT: &str = "newAlert";

type Handler<P> = Arc<dyn Fn(&P) + Send + Sync>;

/// Minimal publish/subscribe bus.
///
/// Handlers run synchronously on the emitting task, in subscription order,
/// once per emission. Nothing is buffered for late subscribers.
pub struct EventBus<P> {
    listeners: RwLock<HashMap<String, Vec<Handler<P>>>>,
}

impl<P> EventBus<P> {
    pub fn new() -> Self {
        Self {
            listeners: RwLock::new(HashMap::new()),
        }
    }

    /// Register a handler, returns the number of handlers now on `event`.
    pub fn subscribe<F>(&self, event: &str, handler: F) -> usize
    where
        F: Fn(&P) + Send + Sync + 'static,
    {
        let mut listeners = self.listeners.write();
        let handlers = listeners.entry(event.to_string()).or_default();
        handlers.push(Arc::new(handler));
        handlers.len()
    }

    /// Deliver `payload` to every handler on `event`, returns how many ran.
    pub fn emit(&self, event: &str, payload: &P) -> usize {
        // Snapshot so handlers may subscribe without deadlocking
        let handlers = match self.listeners.read().get(event) {
            Some(handlers) => handlers.clone(),
            None => return 0,
        };

        for handler in &handlers {
            handler(payload);
        }
        handlers.len()
    }
}

impl<P> Default for EventBus<P> {
    fn default() -> Self {
        Self::new()
    }
}

/// Payload of a `newAlert` feed event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedEvent {
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub message: String,
    pub location: String,
    pub timestamp: DateTime<Utc>,
}

const ALERT_MESSAGES: [&str; 4] = [
    "Medical emergency reported",
    "Weather warning issued",
    "Traffic congestion detected",
    "Safety checkpoint established",
];

const ALERT_LOCATIONS: [&str; 4] = ["Taj Mahal", "India Gate", "Connaught Place", "Red Fort"];

fn rng_from(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Files a random alert into the service on roughly one tick in five.
pub struct AlertSimulator {
    service: Arc<SafetyService>,
    rng: StdRng,
    threshold: f64,
}

impl AlertSimulator {
    pub const PERIOD: Duration = Duration::from_secs(30);
    pub const DEFAULT_THRESHOLD: f64 = 0.8;

    pub fn new(service: Arc<SafetyService>, seed: Option<u64>) -> Self {
        Self {
            service,
            rng: rng_from(seed),
            threshold: Self::DEFAULT_THRESHOLD,
        }
    }

    /// An alert is filed when the roll exceeds `threshold` (0.0..=1.0).
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn tick(&mut self) -> Option<Alert> {
        if self.rng.gen::<f64>() <= self.threshold {
            return None;
        }

        let new = NewAlert {
            kind: *AlertKind::ALL.choose(&mut self.rng)?,
            message: ALERT_MESSAGES.choose(&mut self.rng)?.to_string(),
            location: ALERT_LOCATIONS.choose(&mut self.rng)?.to_string(),
        };

        match self.service.create_alert(new) {
            Ok(alert) => {
                debug!(id = alert.id, location = %alert.location, "Simulated alert");
                Some(alert)
            }
            Err(e) => {
                warn!(error = %e, "Simulated alert rejected");
                None
            }
        }
    }

    pub fn spawn(mut self, period: Duration) -> JoinHandle<()> {
        info!(?period, "Starting alert simulator");
        tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            loop {
                interval.tick().await;
                self.tick();
            }
        })
    }
}

/// Emits a canned `newAlert` on the bus on roughly three ticks in ten.
pub struct FeedSimulator {
    bus: Arc<EventBus<FeedEvent>>,
    rng: StdRng,
    threshold: f64,
}

impl FeedSimulator {
    pub const PERIOD: Duration = Duration::from_secs(20);
    pub const DEFAULT_THRESHOLD: f64 = 0.7;

    pub fn new(bus: Arc<EventBus<FeedEvent>>, seed: Option<u64>) -> Self {
        Self {
            bus,
            rng: rng_from(seed),
            threshold: Self::DEFAULT_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn tick(&mut self) -> Option<FeedEvent> {
        if self.rng.gen::<f64>() <= self.threshold {
            return None;
        }

        let event = FeedEvent {
            kind: AlertKind::Emergency,
            message: "Real-time emergency alert".to_string(),
            location: "Sample Location".to_string(),
            timestamp: Utc::now(),
        };
        let delivered = self.bus.emit(NEW_ALERT, &event);
        debug!(delivered, "Emitted feed event");
        Some(event)
    }

    pub fn spawn(mut self, period: Duration) -> JoinHandle<()> {
        info!(?period, "Starting feed simulator");
        tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            loop {
                interval.tick().await;
                self.tick();
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn service() -> Arc<SafetyService> {
        Arc::new(SafetyService::with_seed_data())
    }

    #[test]
    fn test_bus_delivers_once_per_handler() {
        let bus: EventBus<u32> = EventBus::new();
        let hits = Arc::new(AtomicUsize::new(0));

        for _ in 0..2 {
            let hits = hits.clone();
            bus.subscribe("ping", move |n| {
                hits.fetch_add(*n as usize, Ordering::SeqCst);
            });
        }

        assert_eq!(bus.emit("ping", &5), 2);
        assert_eq!(hits.load(Ordering::SeqCst), 10);
        assert_eq!(bus.emit("other", &5), 0);
    }

    #[test]
    fn test_bus_drops_events_without_listeners() {
        let bus: EventBus<&'static str> = EventBus::new();
        assert_eq!(bus.emit(NEW_ALERT, &"missed"), 0);

        let seen = Arc::new(AtomicUsize::new(0));
        let counter = seen.clone();
        bus.subscribe(NEW_ALERT, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(bus.emit(NEW_ALERT, &"heard"), 1);
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_bus_runs_handlers_in_subscription_order() {
        let bus: EventBus<()> = EventBus::new();
        let order = Arc::new(RwLock::new(Vec::new()));

        for n in 1..=3u32 {
            let order = order.clone();
            bus.subscribe("tick", move |_| order.write().push(n));
        }

        assert_eq!(bus.emit("tick", &()), 3);
        assert_eq!(*order.read(), vec![1, 2, 3]);

        assert_eq!(bus.emit("tick", &()), 3);
        assert_eq!(*order.read(), vec![1, 2, 3, 1, 2, 3]);
    }

    #[test]
    fn test_alert_simulator_is_deterministic() {
        let run = |seed| {
            let svc = service();
            let mut sim = AlertSimulator::new(svc.clone(), Some(seed));
            let fired: Vec<_> = (0..50)
                .map(|_| sim.tick().map(|a| (a.kind, a.message, a.location)))
                .collect();
            (fired, svc.alerts().len())
        };

        let (a, len_a) = run(7);
        let (b, len_b) = run(7);
        assert_eq!(a, b);
        assert_eq!(len_a, len_b);
        assert_eq!(len_a, 2 + a.iter().filter(|f| f.is_some()).count());
    }

    #[test]
    fn test_alert_simulator_threshold() {
        let svc = service();
        let mut never = AlertSimulator::new(svc.clone(), Some(1)).with_threshold(1.0);
        assert!((0..20).all(|_| never.tick().is_none()));
        assert_eq!(svc.alerts().len(), 2);

        let mut always = AlertSimulator::new(svc.clone(), Some(1)).with_threshold(-1.0);
        let alert = always.tick().unwrap();
        assert_eq!(alert.id, 3);
        assert!(ALERT_MESSAGES.contains(&alert.message.as_str()));
        assert!(ALERT_LOCATIONS.contains(&alert.location.as_str()));
        assert_eq!(svc.alerts()[0].id, 3);
    }

    #[test]
    fn test_feed_simulator_emits_new_alert() {
        let bus = Arc::new(EventBus::new());
        let received = Arc::new(RwLock::new(Vec::new()));
        let sink = received.clone();
        bus.subscribe(NEW_ALERT, move |event: &FeedEvent| {
            sink.write().push(event.clone());
        });

        let mut sim = FeedSimulator::new(bus, Some(3)).with_threshold(-1.0);
        let event = sim.tick().unwrap();

        assert_eq!(event.kind, AlertKind::Emergency);
        assert_eq!(received.read().as_slice(), &[event]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawned_simulator_runs_on_period() {
        let svc = service();
        let handle = AlertSimulator::new(svc.clone(), Some(9))
            .with_threshold(-1.0)
            .spawn(AlertSimulator::PERIOD);

        tokio::time::sleep(Duration::from_secs(61)).await;
        handle.abort();

        assert_eq!(svc.alerts().len(), 4);
    }
}
