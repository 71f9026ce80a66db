use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{patch, post};
use axum::Json;
use axum::Router;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::error::DispatchError;
use crate::geo::GeoPoint;
use crate::models::rider::{Rider, RiderStatus};
use crate::notify::{DispatchEvent, EventType, Notifier, Topic};
use crate::state::AppState;
use crate::store::DispatchStore;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/riders", post(register_rider).get(list_riders))
        .route("/riders/:id/status", patch(update_rider_status))
        .route("/riders/:id/location", post(update_rider_location))
}

#[derive(Deserialize)]
pub struct RegisterRiderRequest {
    pub name: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub zone: Option<String>,
}

async fn register_rider(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRiderRequest>,
) -> Result<Json<Rider>, DispatchError> {
    if payload.name.trim().is_empty() {
        return Err(DispatchError::BadRequest("name cannot be empty".to_string()));
    }

    let rider = Rider::new(payload.name, payload.rating.unwrap_or(0.0), payload.zone);
    state.store.insert_rider(rider.clone())?;

    state.notifier.publish(
        DispatchEvent::new(EventType::RiderRegistered, Topic::Admin)
            .with_rider(rider.id)
            .with_payload(json!({ "name": rider.name, "zone": rider.zone })),
    );

    Ok(Json(rider))
}

async fn list_riders(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Rider>>, DispatchError> {
    Ok(Json(state.store.list_riders()?))
}

#[derive(Deserialize)]
pub struct UpdateRiderStatusRequest {
    pub status: RiderStatus,
}

async fn update_rider_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRiderStatusRequest>,
) -> Result<Json<Rider>, DispatchError> {
    // Busy is entered only through a successful claim.
    if payload.status == RiderStatus::Busy {
        return Err(DispatchError::BadRequest(
            "busy is set by dispatch, not by the rider".to_string(),
        ));
    }

    let current = state.store.load_rider(id)?;
    if current.status == RiderStatus::Busy {
        return Err(DispatchError::Conflict(
            "rider has an active delivery".to_string(),
        ));
    }

    let rider = state.store.set_rider_status(id, payload.status)?;

    state.notifier.publish(
        DispatchEvent::new(EventType::RiderStatusChanged, Topic::Admin)
            .with_rider(rider.id)
            .with_payload(json!({ "status": rider.status })),
    );

    Ok(Json(rider))
}

#[derive(Deserialize)]
pub struct UpdateRiderLocationRequest {
    pub lat: f64,
    pub lng: f64,
}

async fn update_rider_location(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRiderLocationRequest>,
) -> Result<Json<Rider>, DispatchError> {
    let location = GeoPoint {
        lat: payload.lat,
        lng: payload.lng,
    };
    if !location.is_valid() {
        return Err(DispatchError::BadRequest(
            "invalid coordinates".to_string(),
        ));
    }

    let rider = state.store.save_rider_location(id, location)?;

    // During an active delivery the order topic tracks the rider live.
    if let Some(order) = state.store.find_active_order_for_rider(id)? {
        state.notifier.publish(
            DispatchEvent::new(EventType::RiderLocationUpdate, Topic::Order(order.id))
                .with_order(order.id)
                .with_rider(id)
                .with_payload(json!({ "location": location })),
        );
    }

    Ok(Json(rider))
}
