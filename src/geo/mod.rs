use serde::{Deserialize, Serialize};

use crate::config::GeoConfig;

const EARTH_RADIUS_KM: f64 = 6_371.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Great-circle distance in kilometers, rounded to two decimals.
pub fn distance_km(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    let sin_lat = (delta_lat / 2.0).sin();
    let sin_lng = (delta_lng / 2.0).sin();

    let haversine = sin_lat * sin_lat + lat1.cos() * lat2.cos() * sin_lng * sin_lng;
    let central_angle = 2.0 * haversine.sqrt().asin();

    (EARTH_RADIUS_KM * central_angle * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryWindow {
    pub min_minutes: u32,
    pub max_minutes: u32,
}

/// Preparation time plus travel at the assumed urban speed, rounded up to the
/// next whole minute, widened by the buffer window.
pub fn delivery_window(distance_km: f64, cfg: &GeoConfig) -> DeliveryWindow {
    let travel_minutes = (distance_km / cfg.avg_speed_kmh * 60.0).ceil() as u32;
    let min_minutes = cfg.prep_minutes + travel_minutes;

    DeliveryWindow {
        min_minutes,
        max_minutes: min_minutes + cfg.buffer_minutes,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeBreakdown {
    pub base: i64,
    pub distance: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryFee {
    pub amount: i64,
    pub breakdown: FeeBreakdown,
}

/// Zone fee parameters; falls back to the configured defaults where a point
/// resolves to no zone-specific schedule.
#[derive(Debug, Clone, Copy)]
pub struct FeeParams {
    pub base: i64,
    pub per_km: i64,
}

impl FeeParams {
    pub fn from_config(cfg: &GeoConfig) -> Self {
        Self {
            base: cfg.base_fee,
            per_km: cfg.per_km_fee,
        }
    }
}

/// `base + ceil(km) * per_km`, clamped to the configured [min, max] band.
/// Amounts are minor currency units.
pub fn delivery_fee(distance_km: f64, params: FeeParams, cfg: &GeoConfig) -> DeliveryFee {
    let distance_component = distance_km.ceil() as i64 * params.per_km;
    let amount = (params.base + distance_component).clamp(cfg.min_fee, cfg.max_fee);

    DeliveryFee {
        amount,
        breakdown: FeeBreakdown {
            base: params.base,
            distance: distance_component,
        },
    }
}
