use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::dispatch::engine::enqueue_dispatch;
use crate::error::DispatchError;
use crate::geo::{self, DeliveryWindow, GeoPoint};
use crate::lifecycle;
use crate::models::order::{Actor, Order, OrderStatus, StatusChange};
use crate::models::rider::{Rider, RiderStatus};
use crate::notify::{DispatchEvent, EventType, Notifier, Topic};
use crate::state::AppState;
use crate::store::DispatchStore;
use crate::zones::ZoneIndex;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/orders", post(create_order))
        .route("/orders/:id", get(get_order))
        .route("/orders/:id/track", get(track_order))
        .route("/orders/:id/status", post(update_status))
        .route("/orders/:id/cancel", post(cancel_order))
        .route("/orders/:id/accept", post(accept_order))
        .route("/dispatch/:id", post(dispatch_order))
}

#[derive(Deserialize)]
pub struct CreateOrderRequest {
    pub customer_id: Uuid,
    pub restaurant_id: Uuid,
    pub restaurant_location: GeoPoint,
    pub delivery_location: GeoPoint,
    pub subtotal: i64,
}

#[derive(Serialize)]
pub struct CreateOrderResponse {
    pub order: Order,
    pub distance_km: f64,
    pub estimated_minutes: DeliveryWindow,
}

async fn create_order(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<Json<CreateOrderResponse>, DispatchError> {
    if !payload.restaurant_location.is_valid() || !payload.delivery_location.is_valid() {
        return Err(DispatchError::BadRequest(
            "invalid coordinates".to_string(),
        ));
    }
    if payload.subtotal < 0 {
        return Err(DispatchError::BadRequest(
            "subtotal cannot be negative".to_string(),
        ));
    }

    let index = ZoneIndex::new(state.store.list_active_zones()?);
    let zone = index
        .zone_for(&payload.delivery_location)
        .ok_or(DispatchError::DeliveryUnavailable)?;

    let distance = geo::distance_km(&payload.restaurant_location, &payload.delivery_location);
    let fee = geo::delivery_fee(distance, zone.fee_params(), &state.config.geo);
    let window = geo::delivery_window(distance, &state.config.geo);

    let order = Order::new(
        payload.restaurant_id,
        payload.customer_id,
        payload.restaurant_location,
        payload.delivery_location,
        Some(zone.name.clone()),
        payload.subtotal,
        fee.amount,
        fee.breakdown,
    );
    state.store.insert_order(order.clone())?;

    let payload_json = json!({
        "order_number": order.order_number,
        "total": order.total,
        "zone": order.zone,
    });
    for topic in [Topic::Restaurant(order.restaurant_id), Topic::Admin] {
        state.notifier.publish(
            DispatchEvent::new(EventType::OrderCreated, topic)
                .with_order(order.id)
                .with_payload(payload_json.clone()),
        );
    }

    Ok(Json(CreateOrderResponse {
        order,
        distance_km: distance,
        estimated_minutes: window,
    }))
}

async fn get_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Order>, DispatchError> {
    Ok(Json(state.store.load_order(id)?))
}

#[derive(Serialize)]
pub struct RiderSummary {
    pub id: Uuid,
    pub name: String,
    pub rating: f64,
    pub location: Option<GeoPoint>,
}

impl From<Rider> for RiderSummary {
    fn from(rider: Rider) -> Self {
        Self {
            id: rider.id,
            name: rider.name,
            rating: rider.rating,
            location: rider.location,
        }
    }
}

#[derive(Serialize)]
pub struct TrackOrderResponse {
    pub order_id: Uuid,
    pub order_number: String,
    pub status: OrderStatus,
    pub status_history: Vec<StatusChange>,
    pub rider: Option<RiderSummary>,
}

async fn track_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<TrackOrderResponse>, DispatchError> {
    let order = state.store.load_order(id)?;
    let rider = match order.rider_id {
        Some(rider_id) => Some(state.store.load_rider(rider_id)?.into()),
        None => None,
    };

    Ok(Json(TrackOrderResponse {
        order_id: order.id,
        order_number: order.order_number,
        status: order.status,
        status_history: order.status_history,
        rider,
    }))
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
    pub actor: Actor,
    pub note: Option<String>,
}

fn actor_may_set(actor: Actor, next: OrderStatus) -> bool {
    use OrderStatus::*;

    match actor {
        Actor::Restaurant => matches!(next, Confirmed | Preparing | Ready | Cancelled),
        Actor::Rider => matches!(next, OnTheWay | Delivered),
        // Customers cancel through the cancel endpoint; assignment goes
        // through the dispatch claim.
        Actor::Customer => false,
        Actor::System => true,
    }
}

async fn update_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<Order>, DispatchError> {
    if !actor_may_set(payload.actor, payload.status) {
        return Err(DispatchError::Forbidden(format!(
            "{:?} may not set status {}",
            payload.actor, payload.status
        )));
    }
    let order = state.store.load_order(id)?;
    let updated =
        lifecycle::apply_transition(&order, payload.status, payload.actor, payload.note)?;
    state.store.save_order_transition(&updated)?;

    publish_status_change(&state, &updated);

    match updated.status {
        OrderStatus::Ready => {
            state.notifier.publish(
                DispatchEvent::new(EventType::OrderReady, Topic::Admin)
                    .with_order(updated.id)
                    .with_payload(json!({ "order_number": updated.order_number })),
            );
            enqueue_dispatch(&state, updated.id).await?;
        }
        OrderStatus::Delivered => {
            if let Some(rider_id) = updated.rider_id {
                let rider = state.store.mark_delivery_complete(rider_id)?;
                state.notifier.publish(
                    DispatchEvent::new(EventType::RiderStatusChanged, Topic::Admin)
                        .with_rider(rider.id)
                        .with_payload(json!({ "status": rider.status })),
                );
            }
        }
        OrderStatus::Cancelled => {
            release_rider_if_assigned(&state, &order)?;
        }
        _ => {}
    }

    Ok(Json(updated))
}

#[derive(Deserialize, Default)]
pub struct CancelOrderRequest {
    pub reason: Option<String>,
}

async fn cancel_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CancelOrderRequest>,
) -> Result<Json<Order>, DispatchError> {
    let order = state.store.load_order(id)?;

    // Customers lose the right to cancel once the rider is en route; an
    // administrative actor would go through the status endpoint instead.
    if matches!(
        order.status,
        OrderStatus::OnTheWay | OrderStatus::Delivered
    ) {
        return Err(DispatchError::Forbidden(
            "order can no longer be cancelled".to_string(),
        ));
    }

    let updated = lifecycle::apply_transition(
        &order,
        OrderStatus::Cancelled,
        Actor::Customer,
        payload.reason,
    )?;
    state.store.save_order_transition(&updated)?;
    release_rider_if_assigned(&state, &order)?;

    for topic in [
        Topic::Order(updated.id),
        Topic::Restaurant(updated.restaurant_id),
        Topic::Admin,
    ] {
        state.notifier.publish(
            DispatchEvent::new(EventType::OrderCancelled, topic)
                .with_order(updated.id)
                .with_payload(json!({ "order_number": updated.order_number })),
        );
    }

    Ok(Json(updated))
}

#[derive(Deserialize)]
pub struct AcceptOrderRequest {
    pub rider_id: Uuid,
}

async fn accept_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AcceptOrderRequest>,
) -> Result<Json<Order>, DispatchError> {
    let outcome = state.coordinator.claim_for_rider(id, payload.rider_id)?;
    Ok(Json(outcome.order().clone()))
}

#[derive(Serialize)]
pub struct DispatchResponse {
    pub order_id: Uuid,
    pub dispatched: bool,
    pub status: String,
    pub rider_id: Option<Uuid>,
}

async fn dispatch_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DispatchResponse>, DispatchError> {
    match state.coordinator.dispatch_ready_order(id) {
        Ok(outcome) => Ok(Json(DispatchResponse {
            order_id: id,
            dispatched: outcome.newly_assigned(),
            status: outcome.order().status.to_string(),
            rider_id: Some(outcome.rider_id()),
        })),
        // An expected, frequent condition: reported as a plain status, not an
        // error banner. The order stays ready and is retried by the sweep.
        Err(DispatchError::NoEligibleRider) => Ok(Json(DispatchResponse {
            order_id: id,
            dispatched: false,
            status: "searching_for_rider".to_string(),
            rider_id: None,
        })),
        Err(err) => Err(err),
    }
}

fn publish_status_change(state: &AppState, order: &Order) {
    for topic in [
        Topic::Order(order.id),
        Topic::Restaurant(order.restaurant_id),
    ] {
        state.notifier.publish(
            DispatchEvent::new(EventType::OrderStatusChanged, topic)
                .with_order(order.id)
                .with_payload(json!({ "status": order.status })),
        );
    }
}

/// Returns the rider of a cancelled order to the available pool. Takes the
/// pre-cancellation order value since cancellation clears `rider_id`.
fn release_rider_if_assigned(state: &AppState, before: &Order) -> Result<(), DispatchError> {
    if let Some(rider_id) = before.rider_id {
        let rider = state
            .store
            .set_rider_status(rider_id, RiderStatus::Available)?;
        state.notifier.publish(
            DispatchEvent::new(EventType::RiderStatusChanged, Topic::Admin)
                .with_rider(rider.id)
                .with_payload(json!({ "status": rider.status })),
        );
    }
    Ok(())
}
