use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geo::GeoPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiderStatus {
    Offline,
    Available,
    Busy,
    OnBreak,
}

/// `Busy` is entered only through a successful dispatch claim and left only
/// when the assigned order is delivered or reassigned away.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rider {
    pub id: Uuid,
    pub name: String,
    pub status: RiderStatus,
    pub location: Option<GeoPoint>,
    pub location_updated_at: Option<DateTime<Utc>>,
    pub rating: f64,
    pub total_deliveries: u64,
    pub zone: Option<String>,
}

impl Rider {
    pub fn new(name: String, rating: f64, zone: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            status: RiderStatus::Offline,
            location: None,
            location_updated_at: None,
            rating: rating.clamp(0.0, 5.0),
            total_deliveries: 0,
            zone,
        }
    }

    /// Age of the last location report, if any.
    pub fn location_age_secs(&self, now: DateTime<Utc>) -> Option<i64> {
        self.location_updated_at
            .map(|at| (now - at).num_seconds())
    }
}
