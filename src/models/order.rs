use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geo::{FeeBreakdown, GeoPoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    Ready,
    PickedUp,
    OnTheWay,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Statuses in which a rider must be assigned to the order.
    pub fn requires_rider(&self) -> bool {
        matches!(
            self,
            OrderStatus::PickedUp | OrderStatus::OnTheWay | OrderStatus::Delivered
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::PickedUp => "picked_up",
            OrderStatus::OnTheWay => "on_the_way",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who is driving a status change. The state machine only checks structural
/// legality; actor policy is enforced at the API layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Actor {
    Customer,
    Restaurant,
    Rider,
    System,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusChange {
    pub status: OrderStatus,
    pub timestamp: DateTime<Utc>,
    pub actor: Actor,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub order_number: String,
    pub status: OrderStatus,
    pub restaurant_id: Uuid,
    pub customer_id: Uuid,
    pub rider_id: Option<Uuid>,
    pub restaurant_location: GeoPoint,
    pub delivery_location: GeoPoint,
    pub zone: Option<String>,
    pub subtotal: i64,
    pub delivery_fee: i64,
    pub fee_breakdown: FeeBreakdown,
    pub total: i64,
    pub created_at: DateTime<Utc>,
    pub ready_at: Option<DateTime<Utc>>,
    pub assigned_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub status_history: Vec<StatusChange>,
}

impl Order {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        restaurant_id: Uuid,
        customer_id: Uuid,
        restaurant_location: GeoPoint,
        delivery_location: GeoPoint,
        zone: Option<String>,
        subtotal: i64,
        delivery_fee: i64,
        fee_breakdown: FeeBreakdown,
    ) -> Self {
        let id = Uuid::new_v4();
        let now = Utc::now();

        Self {
            id,
            order_number: order_number(&id),
            status: OrderStatus::Pending,
            restaurant_id,
            customer_id,
            rider_id: None,
            restaurant_location,
            delivery_location,
            zone,
            subtotal,
            delivery_fee,
            fee_breakdown,
            total: subtotal + delivery_fee,
            created_at: now,
            ready_at: None,
            assigned_at: None,
            delivered_at: None,
            status_history: vec![StatusChange {
                status: OrderStatus::Pending,
                timestamp: now,
                actor: Actor::Customer,
                note: Some("order placed".to_string()),
            }],
        }
    }
}

fn order_number(id: &Uuid) -> String {
    let hex = id.simple().to_string();
    format!("MR-{}", hex[..8].to_uppercase())
}
