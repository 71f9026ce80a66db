use std::env;

use crate::error::DispatchError;

#[derive(Debug, Clone)]
pub struct Config {
    pub http_port: u16,
    pub log_level: String,
    pub dispatch_queue_size: usize,
    pub event_buffer_size: usize,
    pub dispatch: DispatchConfig,
    pub geo: GeoConfig,
}

/// Tunables for rider search, scoring and the claim retry loop.
///
/// The default scoring weights are `distance * 0.7 + (5 - rating) * 0.3`;
/// both are overridable per deployment.
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    pub distance_weight: f64,
    pub rating_weight: f64,
    pub max_rating: f64,
    pub location_freshness_secs: i64,
    pub search_radius_km: f64,
    pub max_claim_attempts: u32,
    pub requeue_delay_ms: u64,
}

/// Fee and ETA constants. Every quote in the service reads these; nothing
/// else carries its own copy.
#[derive(Debug, Clone)]
pub struct GeoConfig {
    pub prep_minutes: u32,
    pub avg_speed_kmh: f64,
    pub buffer_minutes: u32,
    pub base_fee: i64,
    pub per_km_fee: i64,
    pub min_fee: i64,
    pub max_fee: i64,
}

impl Config {
    pub fn from_env() -> Result<Self, DispatchError> {
        let _ = dotenvy::dotenv();

        Ok(Self {
            http_port: parse_or_default("HTTP_PORT", 3000)?,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            dispatch_queue_size: parse_or_default("DISPATCH_QUEUE_SIZE", 1024)?,
            event_buffer_size: parse_or_default("EVENT_BUFFER_SIZE", 1024)?,
            dispatch: DispatchConfig {
                distance_weight: parse_or_default("DISTANCE_WEIGHT", 0.7)?,
                rating_weight: parse_or_default("RATING_WEIGHT", 0.3)?,
                max_rating: parse_or_default("MAX_RATING", 5.0)?,
                location_freshness_secs: parse_or_default("LOCATION_FRESHNESS_SECS", 300)?,
                search_radius_km: parse_or_default("SEARCH_RADIUS_KM", 5.0)?,
                max_claim_attempts: parse_or_default("MAX_CLAIM_ATTEMPTS", 3)?,
                requeue_delay_ms: parse_or_default("DISPATCH_REQUEUE_DELAY_MS", 250)?,
            },
            geo: GeoConfig {
                prep_minutes: parse_or_default("PREP_TIME_MINUTES", 15)?,
                avg_speed_kmh: parse_or_default("AVG_SPEED_KMH", 25.0)?,
                buffer_minutes: parse_or_default("DELIVERY_BUFFER_MINUTES", 15)?,
                base_fee: parse_or_default("DELIVERY_BASE_FEE", 3000)?,
                per_km_fee: parse_or_default("DELIVERY_PER_KM_FEE", 1000)?,
                min_fee: parse_or_default("DELIVERY_MIN_FEE", 3000)?,
                max_fee: parse_or_default("DELIVERY_MAX_FEE", 15000)?,
            },
        })
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            distance_weight: 0.7,
            rating_weight: 0.3,
            max_rating: 5.0,
            location_freshness_secs: 300,
            search_radius_km: 5.0,
            max_claim_attempts: 3,
            requeue_delay_ms: 250,
        }
    }
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            prep_minutes: 15,
            avg_speed_kmh: 25.0,
            buffer_minutes: 15,
            base_fee: 3000,
            per_km_fee: 1000,
            min_fee: 3000,
            max_fee: 15000,
        }
    }
}

fn parse_or_default<T>(key: &str, default: T) -> Result<T, DispatchError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|err| DispatchError::Internal(format!("invalid {key}: {err}"))),
        Err(_) => Ok(default),
    }
}
