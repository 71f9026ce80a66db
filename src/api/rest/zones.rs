use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::Json;
use axum::Router;
use serde::Deserialize;

use crate::error::DispatchError;
use crate::geo::GeoPoint;
use crate::state::AppState;
use crate::store::DispatchStore;
use crate::zones::Zone;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/zones", post(create_zone).get(list_zones))
}

#[derive(Deserialize)]
pub struct CreateZoneRequest {
    pub name: String,
    pub polygon: Vec<GeoPoint>,
    pub base_fee: i64,
    pub per_km_fee: i64,
}

async fn create_zone(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateZoneRequest>,
) -> Result<Json<Zone>, DispatchError> {
    if payload.name.trim().is_empty() {
        return Err(DispatchError::BadRequest("name cannot be empty".to_string()));
    }
    if payload.polygon.len() < 3 {
        return Err(DispatchError::BadRequest(
            "polygon needs at least 3 points".to_string(),
        ));
    }
    if payload.polygon.iter().any(|point| !point.is_valid()) {
        return Err(DispatchError::BadRequest(
            "polygon contains invalid coordinates".to_string(),
        ));
    }
    if payload.base_fee < 0 || payload.per_km_fee < 0 {
        return Err(DispatchError::BadRequest(
            "fees cannot be negative".to_string(),
        ));
    }

    let zone = Zone::new(
        payload.name,
        payload.polygon,
        payload.base_fee,
        payload.per_km_fee,
    );
    state.store.register_zone(zone.clone())?;

    Ok(Json(zone))
}

async fn list_zones(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Zone>>, DispatchError> {
    Ok(Json(state.store.list_active_zones()?))
}
