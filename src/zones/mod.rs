//! Delivery zones: named polygons with their own fee schedules.
//!
//! Lookup is deterministic: active zones are scanned in registration order and
//! the first polygon containing the point wins. A point exactly on an edge
//! resolves by the even-odd crossing parity of the half-open edge test, which
//! is consistent for a given polygon and point.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geo::{FeeParams, GeoPoint};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Zone {
    pub id: Uuid,
    pub name: String,
    pub polygon: Vec<GeoPoint>,
    pub base_fee: i64,
    pub per_km_fee: i64,
    pub active: bool,
}

impl Zone {
    pub fn new(name: String, polygon: Vec<GeoPoint>, base_fee: i64, per_km_fee: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            polygon,
            base_fee,
            per_km_fee,
            active: true,
        }
    }

    pub fn fee_params(&self) -> FeeParams {
        FeeParams {
            base: self.base_fee,
            per_km: self.per_km_fee,
        }
    }

    pub fn contains(&self, point: &GeoPoint) -> bool {
        point_in_polygon(point, &self.polygon)
    }
}

pub struct ZoneIndex {
    zones: Vec<Zone>,
}

impl ZoneIndex {
    /// Takes zones in registration order; that order is the lookup priority.
    pub fn new(zones: Vec<Zone>) -> Self {
        Self { zones }
    }

    /// First active zone containing the point, or `None` meaning delivery is
    /// unavailable there. `None` is an expected outcome, not an error.
    pub fn zone_for(&self, point: &GeoPoint) -> Option<&Zone> {
        self.zones
            .iter()
            .filter(|zone| zone.active)
            .find(|zone| zone.contains(point))
    }
}

/// Standard ray-casting even-odd test.
fn point_in_polygon(point: &GeoPoint, polygon: &[GeoPoint]) -> bool {
    if polygon.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = polygon.len() - 1;

    for i in 0..polygon.len() {
        let (xi, yi) = (polygon[i].lng, polygon[i].lat);
        let (xj, yj) = (polygon[j].lng, polygon[j].lat);

        let crosses = (yi > point.lat) != (yj > point.lat)
            && point.lng < (xj - xi) * (point.lat - yi) / (yj - yi) + xi;

        if crosses {
            inside = !inside;
        }
        j = i;
    }

    inside
}
