//! Rider selection: freshness filtering and scoring.
//!
//! Pure functions over candidate snapshots. The matcher never mutates rider or
//! order state; the actual claim is the dispatch coordinator's job, and every
//! pre-claim read here may be stale.

use chrono::{DateTime, Utc};

use crate::config::DispatchConfig;
use crate::geo::{distance_km, GeoPoint};
use crate::models::rider::{Rider, RiderStatus};

/// Keeps riders that are available and whose last location report is within
/// the freshness threshold. Stale riders are excluded, not scored.
pub fn eligible_candidates(
    riders: Vec<Rider>,
    now: DateTime<Utc>,
    cfg: &DispatchConfig,
) -> Vec<Rider> {
    riders
        .into_iter()
        .filter(|rider| {
            rider.status == RiderStatus::Available
                && rider.location.is_some()
                && rider
                    .location_age_secs(now)
                    .is_some_and(|age| age <= cfg.location_freshness_secs)
        })
        .collect()
}

/// Lower is better: weighted distance to the restaurant plus a penalty for
/// the rating shortfall from the maximum.
pub fn score(rider: &Rider, restaurant: &GeoPoint, cfg: &DispatchConfig) -> Option<f64> {
    let location = rider.location.as_ref()?;
    let distance = distance_km(location, restaurant);
    Some(cfg.distance_weight * distance + cfg.rating_weight * (cfg.max_rating - rider.rating))
}

/// The single best-scoring candidate. Ties break by ascending rider id so
/// matching is reproducible.
pub fn best_rider<'a>(
    restaurant: &GeoPoint,
    candidates: &'a [Rider],
    cfg: &DispatchConfig,
) -> Option<&'a Rider> {
    candidates
        .iter()
        .filter_map(|rider| score(rider, restaurant, cfg).map(|s| (rider, s)))
        .min_by(|(a, score_a), (b, score_b)| {
            score_a
                .total_cmp(score_b)
                .then_with(|| a.id.cmp(&b.id))
        })
        .map(|(rider, _)| rider)
}
