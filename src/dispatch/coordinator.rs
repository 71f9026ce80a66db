//! Dispatch coordination: search, score, claim, transition, fan out.
//!
//! A dispatch attempt moves Searching -> Claimed -> Confirmed, or Searching ->
//! Exhausted when no rider is eligible, or Claimed -> RolledBack when the
//! atomic claim loses a race. The store's conditional claim is the only
//! mutual-exclusion point; every read before it is advisory and may be stale.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::DispatchConfig;
use crate::error::DispatchError;
use crate::lifecycle;
use crate::matching;
use crate::models::order::{Actor, Order, OrderStatus};
use crate::models::rider::{Rider, RiderStatus};
use crate::notify::{DispatchEvent, EventType, Notifier, Topic};
use crate::observability::metrics::Metrics;
use crate::store::DispatchStore;
use crate::zones::ZoneIndex;

#[derive(Debug, Clone)]
pub enum DispatchOutcome {
    /// A fresh assignment was made by this attempt.
    Assigned { order: Order, rider: Rider },
    /// The order was already past dispatch; nothing was mutated and no events
    /// were published. Protects against duplicate upstream triggers.
    AlreadyAssigned { order: Order, rider_id: Uuid },
}

impl DispatchOutcome {
    pub fn order(&self) -> &Order {
        match self {
            DispatchOutcome::Assigned { order, .. } => order,
            DispatchOutcome::AlreadyAssigned { order, .. } => order,
        }
    }

    pub fn rider_id(&self) -> Uuid {
        match self {
            DispatchOutcome::Assigned { rider, .. } => rider.id,
            DispatchOutcome::AlreadyAssigned { rider_id, .. } => *rider_id,
        }
    }

    pub fn newly_assigned(&self) -> bool {
        matches!(self, DispatchOutcome::Assigned { .. })
    }
}

#[derive(Clone)]
pub struct DispatchCoordinator {
    store: Arc<dyn DispatchStore>,
    notifier: Arc<dyn Notifier>,
    config: DispatchConfig,
    metrics: Metrics,
}

impl DispatchCoordinator {
    pub fn new(
        store: Arc<dyn DispatchStore>,
        notifier: Arc<dyn Notifier>,
        config: DispatchConfig,
        metrics: Metrics,
    ) -> Self {
        Self {
            store,
            notifier,
            config,
            metrics,
        }
    }

    /// One dispatch attempt for a ready order: fetch candidates, pick the best
    /// rider, claim atomically, transition `ready -> picked_up` and publish.
    /// Claim conflicts are retried with a shrinking pool up to the configured
    /// budget; rider availability changing over time is the caller's retry
    /// concern, not ours.
    pub fn dispatch_ready_order(&self, order_id: Uuid) -> Result<DispatchOutcome, DispatchError> {
        let start = Instant::now();
        let result = self.try_dispatch(order_id);
        let outcome_label = match &result {
            Ok(DispatchOutcome::Assigned { .. }) => "assigned",
            Ok(DispatchOutcome::AlreadyAssigned { .. }) => "already_assigned",
            Err(DispatchError::NoEligibleRider) => "no_rider",
            Err(DispatchError::DispatchExhausted(_)) => "exhausted",
            Err(_) => "error",
        };
        self.metrics
            .dispatch_latency_seconds
            .with_label_values(&[outcome_label])
            .observe(start.elapsed().as_secs_f64());
        self.metrics
            .dispatches_total
            .with_label_values(&[outcome_label])
            .inc();
        result
    }

    fn try_dispatch(&self, order_id: Uuid) -> Result<DispatchOutcome, DispatchError> {
        let order = self.store.load_order(order_id)?;

        if order.status.requires_rider() {
            let rider_id = order.rider_id.ok_or_else(|| {
                DispatchError::Internal(format!(
                    "order {order_id} is {} without a rider",
                    order.status
                ))
            })?;
            return Ok(DispatchOutcome::AlreadyAssigned { order, rider_id });
        }

        if order.status != OrderStatus::Ready {
            return Err(DispatchError::InvalidDispatchState(format!(
                "order is {}",
                order.status
            )));
        }

        let mut pool = self.candidate_pool(&order)?;
        if pool.is_empty() {
            return Err(DispatchError::NoEligibleRider);
        }

        for attempt in 0..self.config.max_claim_attempts {
            let Some(best) =
                matching::best_rider(&order.restaurant_location, &pool, &self.config)
            else {
                return Err(DispatchError::NoEligibleRider);
            };
            let rider_id = best.id;

            match self
                .store
                .conditionally_claim_order(order.id, rider_id, OrderStatus::Ready)
            {
                Ok(claimed) => return self.finalize_claim(claimed, rider_id),
                Err(DispatchError::ClaimConflict) => {
                    self.metrics.claim_conflicts_total.inc();
                    warn!(
                        order_id = %order.id,
                        rider_id = %rider_id,
                        attempt,
                        "claim lost race, retrying with remaining pool"
                    );

                    // Re-check the order: the conflict may mean the order
                    // itself was claimed or cancelled, not just the rider.
                    let current = self.store.load_order(order.id)?;
                    if current.status.requires_rider() {
                        if let Some(winner) = current.rider_id {
                            return Ok(DispatchOutcome::AlreadyAssigned {
                                order: current,
                                rider_id: winner,
                            });
                        }
                    }
                    if current.status != OrderStatus::Ready {
                        return Err(DispatchError::InvalidDispatchState(format!(
                            "order is {}",
                            current.status
                        )));
                    }

                    pool.retain(|rider| rider.id != rider_id);
                    if pool.is_empty() {
                        return Err(DispatchError::NoEligibleRider);
                    }
                }
                Err(err) => return Err(err),
            }
        }

        self.notifier.publish(
            DispatchEvent::new(EventType::DispatchExhausted, Topic::Admin)
                .with_order(order.id)
                .with_payload(json!({
                    "order_number": order.order_number,
                    "attempts": self.config.max_claim_attempts,
                })),
        );
        Err(DispatchError::DispatchExhausted(order.id))
    }

    /// Rider-initiated accept: same atomic claim as the automatic sweep, so a
    /// racing sweep and accept can never both win.
    pub fn claim_for_rider(
        &self,
        order_id: Uuid,
        rider_id: Uuid,
    ) -> Result<DispatchOutcome, DispatchError> {
        let order = self.store.load_order(order_id)?;

        if order.status.requires_rider() && order.rider_id == Some(rider_id) {
            return Ok(DispatchOutcome::AlreadyAssigned { order, rider_id });
        }
        if order.status != OrderStatus::Ready || order.rider_id.is_some() {
            return Err(DispatchError::InvalidDispatchState(format!(
                "order is not open for pickup (status {})",
                order.status
            )));
        }

        let rider = self.store.load_rider(rider_id)?;
        if rider.status != RiderStatus::Available {
            return Err(DispatchError::InvalidDispatchState(
                "rider is not available".to_string(),
            ));
        }

        match self
            .store
            .conditionally_claim_order(order_id, rider_id, OrderStatus::Ready)
        {
            Ok(claimed) => self.finalize_claim(claimed, rider_id),
            Err(DispatchError::ClaimConflict) => Err(DispatchError::InvalidDispatchState(
                "order was claimed by another rider".to_string(),
            )),
            Err(err) => Err(err),
        }
    }

    /// Candidate riders scoped to the order's zone and search radius, widened
    /// once before giving up. Freshness filtering applies per fetch.
    fn candidate_pool(&self, order: &Order) -> Result<Vec<Rider>, DispatchError> {
        let zone_name = match &order.zone {
            Some(name) => Some(name.clone()),
            None => {
                let index = ZoneIndex::new(self.store.list_active_zones()?);
                index
                    .zone_for(&order.restaurant_location)
                    .map(|zone| zone.name.clone())
            }
        };

        let radius = self.config.search_radius_km;
        let pool = self.fetch_eligible(order, zone_name.as_deref(), radius)?;
        if !pool.is_empty() {
            return Ok(pool);
        }

        self.fetch_eligible(order, zone_name.as_deref(), radius * 2.0)
    }

    fn fetch_eligible(
        &self,
        order: &Order,
        zone_name: Option<&str>,
        radius_km: f64,
    ) -> Result<Vec<Rider>, DispatchError> {
        let nearby = self
            .store
            .list_available_riders_near(&order.restaurant_location, radius_km)?;

        // A rider's assigned-zone hint, when present, must match the order's
        // zone; riders without a hint roam anywhere.
        let scoped: Vec<Rider> = nearby
            .into_iter()
            .filter(|rider| match (&rider.zone, zone_name) {
                (Some(hint), Some(zone)) => hint == zone,
                _ => true,
            })
            .collect();

        Ok(matching::eligible_candidates(scoped, Utc::now(), &self.config))
    }

    fn finalize_claim(
        &self,
        claimed: Order,
        rider_id: Uuid,
    ) -> Result<DispatchOutcome, DispatchError> {
        let updated = lifecycle::apply_transition(
            &claimed,
            OrderStatus::PickedUp,
            Actor::System,
            Some("rider assigned".to_string()),
        )?;
        self.store.save_order_transition(&updated)?;

        let rider = self.store.load_rider(rider_id)?;

        let assigned_payload = json!({
            "rider": {
                "id": rider.id,
                "name": rider.name,
                "rating": rider.rating,
            },
        });
        for topic in [
            Topic::Order(updated.id),
            Topic::Rider(rider.id),
            Topic::Admin,
        ] {
            self.notifier.publish(
                DispatchEvent::new(EventType::RiderAssigned, topic)
                    .with_order(updated.id)
                    .with_rider(rider.id)
                    .with_payload(assigned_payload.clone()),
            );
        }

        let status_payload = json!({ "status": updated.status });
        for topic in [
            Topic::Order(updated.id),
            Topic::Restaurant(updated.restaurant_id),
        ] {
            self.notifier.publish(
                DispatchEvent::new(EventType::OrderStatusChanged, topic)
                    .with_order(updated.id)
                    .with_rider(rider.id)
                    .with_payload(status_payload.clone()),
            );
        }

        info!(
            order_id = %updated.id,
            rider_id = %rider.id,
            "order dispatched"
        );

        Ok(DispatchOutcome::Assigned {
            order: updated,
            rider,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::GeoPoint;
    use crate::store::InMemoryStore;
    use crate::zones::Zone;
    use chrono::Duration;
    use std::sync::Mutex;

    #[derive(Default)]
    struct CollectingNotifier {
        events: Mutex<Vec<DispatchEvent>>,
    }

    impl CollectingNotifier {
        fn events(&self) -> Vec<DispatchEvent> {
            self.events.lock().unwrap().clone()
        }
    }

    impl Notifier for CollectingNotifier {
        fn publish(&self, event: DispatchEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    const RESTAURANT: GeoPoint = GeoPoint {
        lat: 23.81,
        lng: 90.41,
    };
    const DELIVERY: GeoPoint = GeoPoint {
        lat: 23.80,
        lng: 90.42,
    };

    struct Harness {
        store: Arc<InMemoryStore>,
        notifier: Arc<CollectingNotifier>,
        coordinator: DispatchCoordinator,
    }

    fn harness() -> Harness {
        harness_with(DispatchConfig::default())
    }

    fn harness_with(config: DispatchConfig) -> Harness {
        let store = Arc::new(InMemoryStore::new());
        let notifier = Arc::new(CollectingNotifier::default());
        let coordinator = DispatchCoordinator::new(
            store.clone(),
            notifier.clone(),
            config,
            Metrics::new(),
        );
        Harness {
            store,
            notifier,
            coordinator,
        }
    }

    fn ready_order(store: &InMemoryStore) -> Order {
        let mut order = Order::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            RESTAURANT,
            DELIVERY,
            None,
            20000,
            4000,
            crate::geo::FeeBreakdown {
                base: 3000,
                distance: 1000,
            },
        );
        order.status = OrderStatus::Ready;
        store.insert_order(order.clone()).unwrap();
        order
    }

    fn rider_near(
        store: &InMemoryStore,
        id_seed: u128,
        location: GeoPoint,
        rating: f64,
        age_secs: i64,
    ) -> Rider {
        let mut rider = Rider::new(format!("rider-{id_seed}"), rating, None);
        rider.id = Uuid::from_u128(id_seed);
        rider.status = RiderStatus::Available;
        rider.location = Some(location);
        rider.location_updated_at = Some(Utc::now() - Duration::seconds(age_secs));
        store.insert_rider(rider.clone()).unwrap();
        rider
    }

    #[test]
    fn dispatch_assigns_the_single_available_rider() {
        let h = harness();
        let order = ready_order(&h.store);
        let rider = rider_near(
            &h.store,
            1,
            GeoPoint {
                lat: 23.811,
                lng: 90.412,
            },
            4.8,
            30,
        );

        let outcome = h.coordinator.dispatch_ready_order(order.id).unwrap();
        assert!(outcome.newly_assigned());
        assert_eq!(outcome.rider_id(), rider.id);
        assert_eq!(outcome.order().status, OrderStatus::PickedUp);
        assert!(outcome.order().assigned_at.is_some());

        let stored = h.store.load_order(order.id).unwrap();
        assert_eq!(stored.status, OrderStatus::PickedUp);
        assert_eq!(stored.rider_id, Some(rider.id));
        assert_eq!(
            h.store.load_rider(rider.id).unwrap().status,
            RiderStatus::Busy
        );

        let events = h.notifier.events();
        let on_order_topic = events
            .iter()
            .filter(|event| event.topic == Topic::Order(order.id))
            .count();
        let on_restaurant_topic = events
            .iter()
            .filter(|event| event.topic == Topic::Restaurant(order.restaurant_id))
            .count();
        // rider_assigned and order_status_changed on the order topic,
        // order_status_changed on the restaurant topic.
        assert_eq!(on_order_topic, 2);
        assert_eq!(on_restaurant_topic, 1);
        assert!(events
            .iter()
            .any(|event| event.event_type == EventType::RiderAssigned
                && event.topic == Topic::Rider(rider.id)));
    }

    #[test]
    fn no_riders_leaves_order_ready_and_publishes_nothing() {
        let h = harness();
        let order = ready_order(&h.store);

        let err = h.coordinator.dispatch_ready_order(order.id).unwrap_err();
        assert!(matches!(err, DispatchError::NoEligibleRider));
        assert_eq!(
            h.store.load_order(order.id).unwrap().status,
            OrderStatus::Ready
        );
        assert!(h.notifier.events().is_empty());
    }

    #[test]
    fn stale_rider_is_not_dispatchable() {
        let h = harness();
        let order = ready_order(&h.store);
        // Nearest rider, 30 minute old location against a 5 minute threshold.
        rider_near(
            &h.store,
            1,
            GeoPoint {
                lat: 23.8101,
                lng: 90.4101,
            },
            5.0,
            1800,
        );

        let err = h.coordinator.dispatch_ready_order(order.id).unwrap_err();
        assert!(matches!(err, DispatchError::NoEligibleRider));
    }

    #[test]
    fn widened_radius_picks_up_distant_rider() {
        let h = harness();
        let order = ready_order(&h.store);
        // Roughly 7 km out: beyond the 5 km radius, inside the widened 10 km.
        let rider = rider_near(
            &h.store,
            1,
            GeoPoint {
                lat: 23.874,
                lng: 90.41,
            },
            4.0,
            30,
        );

        let outcome = h.coordinator.dispatch_ready_order(order.id).unwrap();
        assert_eq!(outcome.rider_id(), rider.id);
    }

    #[test]
    fn best_scoring_rider_wins() {
        let h = harness();
        let order = ready_order(&h.store);
        rider_near(
            &h.store,
            1,
            GeoPoint {
                lat: 23.85,
                lng: 90.45,
            },
            4.0,
            30,
        );
        let near_and_rated = rider_near(
            &h.store,
            2,
            GeoPoint {
                lat: 23.811,
                lng: 90.412,
            },
            4.9,
            30,
        );

        let outcome = h.coordinator.dispatch_ready_order(order.id).unwrap();
        assert_eq!(outcome.rider_id(), near_and_rated.id);
    }

    #[test]
    fn dispatch_is_idempotent_after_assignment() {
        let h = harness();
        let order = ready_order(&h.store);
        let rider = rider_near(
            &h.store,
            1,
            GeoPoint {
                lat: 23.811,
                lng: 90.412,
            },
            4.8,
            30,
        );

        let first = h.coordinator.dispatch_ready_order(order.id).unwrap();
        assert!(first.newly_assigned());
        let events_after_first = h.notifier.events().len();
        let history_after_first = h.store.load_order(order.id).unwrap().status_history.len();

        let second = h.coordinator.dispatch_ready_order(order.id).unwrap();
        assert!(!second.newly_assigned());
        assert_eq!(second.rider_id(), rider.id);
        // No extra mutation, no duplicate events.
        assert_eq!(h.notifier.events().len(), events_after_first);
        assert_eq!(
            h.store.load_order(order.id).unwrap().status_history.len(),
            history_after_first
        );
    }

    #[test]
    fn pending_order_is_not_dispatchable() {
        let h = harness();
        let mut order = ready_order(&h.store);
        order.status = OrderStatus::Pending;
        h.store.save_order_transition(&order).unwrap();

        let err = h.coordinator.dispatch_ready_order(order.id).unwrap_err();
        assert!(matches!(err, DispatchError::InvalidDispatchState(_)));
    }

    #[test]
    fn cancelled_order_is_not_dispatchable() {
        let h = harness();
        let mut order = ready_order(&h.store);
        order.status = OrderStatus::Cancelled;
        h.store.save_order_transition(&order).unwrap();

        let err = h.coordinator.dispatch_ready_order(order.id).unwrap_err();
        assert!(matches!(err, DispatchError::InvalidDispatchState(_)));
    }

    /// Candidate listings are advisory and may lag the authoritative store;
    /// serves a snapshot taken before a rider was claimed elsewhere so the
    /// atomic claim is what surfaces the conflict.
    struct StaleListingStore {
        inner: InMemoryStore,
        snapshot: Vec<Rider>,
    }

    impl crate::store::DispatchStore for StaleListingStore {
        fn insert_order(&self, order: Order) -> Result<(), DispatchError> {
            self.inner.insert_order(order)
        }

        fn load_order(&self, id: Uuid) -> Result<Order, DispatchError> {
            self.inner.load_order(id)
        }

        fn save_order_transition(&self, order: &Order) -> Result<(), DispatchError> {
            self.inner.save_order_transition(order)
        }

        fn conditionally_claim_order(
            &self,
            order_id: Uuid,
            rider_id: Uuid,
            expected: OrderStatus,
        ) -> Result<Order, DispatchError> {
            self.inner
                .conditionally_claim_order(order_id, rider_id, expected)
        }

        fn insert_rider(&self, rider: Rider) -> Result<(), DispatchError> {
            self.inner.insert_rider(rider)
        }

        fn load_rider(&self, id: Uuid) -> Result<Rider, DispatchError> {
            self.inner.load_rider(id)
        }

        fn list_riders(&self) -> Result<Vec<Rider>, DispatchError> {
            self.inner.list_riders()
        }

        fn set_rider_status(
            &self,
            id: Uuid,
            status: RiderStatus,
        ) -> Result<Rider, DispatchError> {
            self.inner.set_rider_status(id, status)
        }

        fn save_rider_location(
            &self,
            id: Uuid,
            location: GeoPoint,
        ) -> Result<Rider, DispatchError> {
            self.inner.save_rider_location(id, location)
        }

        fn mark_delivery_complete(&self, rider_id: Uuid) -> Result<Rider, DispatchError> {
            self.inner.mark_delivery_complete(rider_id)
        }

        fn list_available_riders_near(
            &self,
            _point: &GeoPoint,
            _radius_km: f64,
        ) -> Result<Vec<Rider>, DispatchError> {
            Ok(self.snapshot.clone())
        }

        fn find_active_order_for_rider(
            &self,
            rider_id: Uuid,
        ) -> Result<Option<Order>, DispatchError> {
            self.inner.find_active_order_for_rider(rider_id)
        }

        fn list_active_zones(&self) -> Result<Vec<crate::zones::Zone>, DispatchError> {
            self.inner.list_active_zones()
        }

        fn register_zone(&self, zone: crate::zones::Zone) -> Result<(), DispatchError> {
            self.inner.register_zone(zone)
        }

        fn counts(&self) -> crate::store::StoreCounts {
            self.inner.counts()
        }
    }

    #[test]
    fn lost_claim_retries_onto_next_rider() {
        let inner = InMemoryStore::new();
        let order = ready_order(&inner);
        let best = rider_near(
            &inner,
            1,
            GeoPoint {
                lat: 23.8105,
                lng: 90.4105,
            },
            5.0,
            30,
        );
        let fallback = rider_near(
            &inner,
            2,
            GeoPoint {
                lat: 23.815,
                lng: 90.415,
            },
            4.0,
            30,
        );

        // Both riders were available when the listing was taken; another
        // order claims the best one before this attempt reaches the store.
        let snapshot = vec![best.clone(), fallback.clone()];
        inner
            .set_rider_status(best.id, RiderStatus::Busy)
            .unwrap();

        let store = Arc::new(StaleListingStore { inner, snapshot });
        let notifier = Arc::new(CollectingNotifier::default());
        let metrics = Metrics::new();
        let coordinator = DispatchCoordinator::new(
            store.clone(),
            notifier,
            DispatchConfig::default(),
            metrics.clone(),
        );

        let outcome = coordinator.dispatch_ready_order(order.id).unwrap();
        assert!(outcome.newly_assigned());
        assert_eq!(outcome.rider_id(), fallback.id);
        assert_eq!(metrics.claim_conflicts_total.get(), 1);
        assert_eq!(
            store.load_rider(fallback.id).unwrap().status,
            RiderStatus::Busy
        );
    }

    #[test]
    fn spent_retry_budget_surfaces_exhaustion() {
        let h = harness_with(DispatchConfig {
            max_claim_attempts: 0,
            ..DispatchConfig::default()
        });
        let order = ready_order(&h.store);
        rider_near(
            &h.store,
            1,
            GeoPoint {
                lat: 23.811,
                lng: 90.412,
            },
            4.8,
            30,
        );

        let err = h.coordinator.dispatch_ready_order(order.id).unwrap_err();
        assert!(matches!(err, DispatchError::DispatchExhausted(id) if id == order.id));

        // The order stays valid and re-dispatchable; the admin topic carries
        // the alert.
        assert_eq!(
            h.store.load_order(order.id).unwrap().status,
            OrderStatus::Ready
        );
        let events = h.notifier.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, EventType::DispatchExhausted);
        assert_eq!(events[0].topic, Topic::Admin);
    }

    #[test]
    fn rider_accept_races_resolve_to_one_winner() {
        let h = harness();
        let order = ready_order(&h.store);
        let first = rider_near(
            &h.store,
            1,
            GeoPoint {
                lat: 23.811,
                lng: 90.411,
            },
            4.5,
            30,
        );
        let second = rider_near(
            &h.store,
            2,
            GeoPoint {
                lat: 23.812,
                lng: 90.412,
            },
            4.5,
            30,
        );

        let win = h.coordinator.claim_for_rider(order.id, first.id).unwrap();
        assert!(win.newly_assigned());

        let err = h
            .coordinator
            .claim_for_rider(order.id, second.id)
            .unwrap_err();
        assert!(matches!(err, DispatchError::InvalidDispatchState(_)));

        // The winner re-accepting is a no-op success.
        let again = h.coordinator.claim_for_rider(order.id, first.id).unwrap();
        assert!(!again.newly_assigned());
        assert_eq!(again.rider_id(), first.id);
    }

    #[test]
    fn zone_hint_scopes_candidates() {
        let h = harness();
        h.store
            .register_zone(Zone::new(
                "Gulshan".to_string(),
                vec![
                    GeoPoint {
                        lat: 23.78,
                        lng: 90.39,
                    },
                    GeoPoint {
                        lat: 23.78,
                        lng: 90.44,
                    },
                    GeoPoint {
                        lat: 23.83,
                        lng: 90.44,
                    },
                    GeoPoint {
                        lat: 23.83,
                        lng: 90.39,
                    },
                ],
                3000,
                1000,
            ))
            .unwrap();

        let order = ready_order(&h.store);

        // Closest rider is pinned to another zone; the roaming rider wins.
        let mut pinned = rider_near(
            &h.store,
            1,
            GeoPoint {
                lat: 23.8101,
                lng: 90.4101,
            },
            5.0,
            30,
        );
        pinned.zone = Some("Uttara".to_string());
        h.store.insert_rider(pinned).unwrap();

        let roaming = rider_near(
            &h.store,
            2,
            GeoPoint {
                lat: 23.815,
                lng: 90.415,
            },
            4.0,
            30,
        );

        let outcome = h.coordinator.dispatch_ready_order(order.id).unwrap();
        assert_eq!(outcome.rider_id(), roaming.id);
    }
}
