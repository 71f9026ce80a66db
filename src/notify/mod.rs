//! Typed dispatch events and the publish contract.
//!
//! The core only defines event shapes and a fire-and-forget `publish`; the
//! real-time transport behind it is a collaborator. `BroadcastNotifier` is the
//! in-process transport feeding the WebSocket surface, but anything honoring
//! the trait (message broker, SSE) works. Publish failures are logged and
//! swallowed, never escalated into order processing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

use crate::observability::metrics::Metrics;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Topic {
    Order(Uuid),
    Restaurant(Uuid),
    Rider(Uuid),
    Admin,
}

impl Topic {
    pub fn kind(&self) -> &'static str {
        match self {
            Topic::Order(_) => "order",
            Topic::Restaurant(_) => "restaurant",
            Topic::Rider(_) => "rider",
            Topic::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Topic::Order(id) => write!(f, "order:{id}"),
            Topic::Restaurant(id) => write!(f, "restaurant:{id}"),
            Topic::Rider(id) => write!(f, "rider:{id}"),
            Topic::Admin => write!(f, "admin"),
        }
    }
}

impl From<Topic> for String {
    fn from(topic: Topic) -> Self {
        topic.to_string()
    }
}

impl TryFrom<String> for Topic {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

impl std::str::FromStr for Topic {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if raw == "admin" {
            return Ok(Topic::Admin);
        }

        let (kind, id) = raw
            .split_once(':')
            .ok_or_else(|| format!("invalid topic: {raw}"))?;
        let id = Uuid::parse_str(id).map_err(|err| format!("invalid topic id: {err}"))?;

        match kind {
            "order" => Ok(Topic::Order(id)),
            "restaurant" => Ok(Topic::Restaurant(id)),
            "rider" => Ok(Topic::Rider(id)),
            other => Err(format!("unknown topic kind: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    OrderCreated,
    OrderReady,
    RiderAssigned,
    OrderStatusChanged,
    OrderCancelled,
    RiderLocationUpdate,
    RiderStatusChanged,
    RiderRegistered,
    DispatchExhausted,
}

/// An immutable fact about the dispatch flow. Created once, published to a
/// topic, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchEvent {
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub topic: Topic,
    pub order_id: Option<Uuid>,
    pub rider_id: Option<Uuid>,
    pub timestamp: DateTime<Utc>,
    pub payload: Value,
}

impl DispatchEvent {
    pub fn new(event_type: EventType, topic: Topic) -> Self {
        Self {
            event_type,
            topic,
            order_id: None,
            rider_id: None,
            timestamp: Utc::now(),
            payload: Value::Null,
        }
    }

    pub fn with_order(mut self, order_id: Uuid) -> Self {
        self.order_id = Some(order_id);
        self
    }

    pub fn with_rider(mut self, rider_id: Uuid) -> Self {
        self.rider_id = Some(rider_id);
        self
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }
}

pub trait Notifier: Send + Sync {
    /// Fire-and-forget; implementations must not block or fail the caller.
    fn publish(&self, event: DispatchEvent);
}

pub struct BroadcastNotifier {
    tx: broadcast::Sender<DispatchEvent>,
    metrics: Metrics,
}

impl BroadcastNotifier {
    pub fn new(buffer: usize, metrics: Metrics) -> Self {
        let (tx, _unused_rx) = broadcast::channel(buffer);
        Self { tx, metrics }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DispatchEvent> {
        self.tx.subscribe()
    }
}

impl Notifier for BroadcastNotifier {
    fn publish(&self, event: DispatchEvent) {
        self.metrics
            .events_published_total
            .with_label_values(&[event.topic.kind()])
            .inc();

        if self.tx.send(event).is_err() {
            debug!("event published with no subscribers");
        }
    }
}
