//! Persistence collaborator boundary.
//!
//! Order, rider and zone records are owned by the authoritative store; the
//! dispatch core works on transient copies and re-validates at claim time.
//! `conditionally_claim_order` is the single linearization point of the whole
//! dispatch flow and must be one atomic conditional update, never a
//! read-then-write pair.

use dashmap::DashMap;
use std::sync::RwLock;
use uuid::Uuid;

use crate::error::DispatchError;
use crate::geo::{distance_km, GeoPoint};
use crate::models::order::{Order, OrderStatus};
use crate::models::rider::{Rider, RiderStatus};
use crate::zones::Zone;

#[derive(Debug, Clone, Copy)]
pub struct StoreCounts {
    pub orders: usize,
    pub riders: usize,
    pub zones: usize,
}

pub trait DispatchStore: Send + Sync {
    fn insert_order(&self, order: Order) -> Result<(), DispatchError>;
    fn load_order(&self, id: Uuid) -> Result<Order, DispatchError>;

    /// Persists an order value produced by a state-machine transition.
    fn save_order_transition(&self, order: &Order) -> Result<(), DispatchError>;

    /// Assigns the rider to the order only if the order still has the
    /// expected status and is unassigned and the rider is still `available`,
    /// flipping the rider to `busy` in the same atomic step. A lost race is
    /// `ClaimConflict`, which callers recover from locally.
    fn conditionally_claim_order(
        &self,
        order_id: Uuid,
        rider_id: Uuid,
        expected: OrderStatus,
    ) -> Result<Order, DispatchError>;

    fn insert_rider(&self, rider: Rider) -> Result<(), DispatchError>;
    fn load_rider(&self, id: Uuid) -> Result<Rider, DispatchError>;
    fn list_riders(&self) -> Result<Vec<Rider>, DispatchError>;
    fn set_rider_status(&self, id: Uuid, status: RiderStatus) -> Result<Rider, DispatchError>;

    /// Last-write-wins; only the most recent report matters to matching.
    fn save_rider_location(&self, id: Uuid, location: GeoPoint) -> Result<Rider, DispatchError>;

    /// Returns the rider to the available pool and bumps the lifetime
    /// delivery count.
    fn mark_delivery_complete(&self, rider_id: Uuid) -> Result<Rider, DispatchError>;

    fn list_available_riders_near(
        &self,
        point: &GeoPoint,
        radius_km: f64,
    ) -> Result<Vec<Rider>, DispatchError>;

    fn find_active_order_for_rider(&self, rider_id: Uuid)
        -> Result<Option<Order>, DispatchError>;

    /// Active zones in registration order; that order is the lookup priority.
    fn list_active_zones(&self) -> Result<Vec<Zone>, DispatchError>;
    fn register_zone(&self, zone: Zone) -> Result<(), DispatchError>;

    fn counts(&self) -> StoreCounts;
}

#[derive(Default)]
pub struct InMemoryStore {
    orders: DashMap<Uuid, Order>,
    riders: DashMap<Uuid, Rider>,
    zones: RwLock<Vec<Zone>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DispatchStore for InMemoryStore {
    fn insert_order(&self, order: Order) -> Result<(), DispatchError> {
        self.orders.insert(order.id, order);
        Ok(())
    }

    fn load_order(&self, id: Uuid) -> Result<Order, DispatchError> {
        self.orders
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| DispatchError::NotFound(format!("order {id} not found")))
    }

    fn save_order_transition(&self, order: &Order) -> Result<(), DispatchError> {
        let mut entry = self
            .orders
            .get_mut(&order.id)
            .ok_or_else(|| DispatchError::NotFound(format!("order {} not found", order.id)))?;
        *entry = order.clone();
        Ok(())
    }

    fn conditionally_claim_order(
        &self,
        order_id: Uuid,
        rider_id: Uuid,
        expected: OrderStatus,
    ) -> Result<Order, DispatchError> {
        // The order entry guard is held for the whole check-and-set, so two
        // claimants serialize here. Lock order: order entry first, then rider.
        let mut order = self
            .orders
            .get_mut(&order_id)
            .ok_or_else(|| DispatchError::NotFound(format!("order {order_id} not found")))?;

        if order.status != expected || order.rider_id.is_some() {
            return Err(DispatchError::ClaimConflict);
        }

        let Some(mut rider) = self.riders.get_mut(&rider_id) else {
            return Err(DispatchError::ClaimConflict);
        };
        if rider.status != RiderStatus::Available {
            return Err(DispatchError::ClaimConflict);
        }

        order.rider_id = Some(rider_id);
        rider.status = RiderStatus::Busy;

        Ok(order.clone())
    }

    fn insert_rider(&self, rider: Rider) -> Result<(), DispatchError> {
        self.riders.insert(rider.id, rider);
        Ok(())
    }

    fn load_rider(&self, id: Uuid) -> Result<Rider, DispatchError> {
        self.riders
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| DispatchError::NotFound(format!("rider {id} not found")))
    }

    fn list_riders(&self) -> Result<Vec<Rider>, DispatchError> {
        Ok(self
            .riders
            .iter()
            .map(|entry| entry.value().clone())
            .collect())
    }

    fn set_rider_status(&self, id: Uuid, status: RiderStatus) -> Result<Rider, DispatchError> {
        let mut rider = self
            .riders
            .get_mut(&id)
            .ok_or_else(|| DispatchError::NotFound(format!("rider {id} not found")))?;
        rider.status = status;
        Ok(rider.clone())
    }

    fn save_rider_location(&self, id: Uuid, location: GeoPoint) -> Result<Rider, DispatchError> {
        let mut rider = self
            .riders
            .get_mut(&id)
            .ok_or_else(|| DispatchError::NotFound(format!("rider {id} not found")))?;
        rider.location = Some(location);
        rider.location_updated_at = Some(chrono::Utc::now());
        Ok(rider.clone())
    }

    fn mark_delivery_complete(&self, rider_id: Uuid) -> Result<Rider, DispatchError> {
        let mut rider = self
            .riders
            .get_mut(&rider_id)
            .ok_or_else(|| DispatchError::NotFound(format!("rider {rider_id} not found")))?;
        rider.status = RiderStatus::Available;
        rider.total_deliveries += 1;
        Ok(rider.clone())
    }

    fn list_available_riders_near(
        &self,
        point: &GeoPoint,
        radius_km: f64,
    ) -> Result<Vec<Rider>, DispatchError> {
        let riders = self
            .riders
            .iter()
            .filter_map(|entry| {
                let rider = entry.value();
                let in_range = rider.status == RiderStatus::Available
                    && rider
                        .location
                        .as_ref()
                        .is_some_and(|loc| distance_km(loc, point) <= radius_km);
                in_range.then(|| rider.clone())
            })
            .collect();
        Ok(riders)
    }

    fn find_active_order_for_rider(
        &self,
        rider_id: Uuid,
    ) -> Result<Option<Order>, DispatchError> {
        let active = self.orders.iter().find_map(|entry| {
            let order = entry.value();
            (order.rider_id == Some(rider_id) && !order.status.is_terminal())
                .then(|| order.clone())
        });
        Ok(active)
    }

    fn list_active_zones(&self) -> Result<Vec<Zone>, DispatchError> {
        let zones = self
            .zones
            .read()
            .map_err(|_| DispatchError::Internal("zone registry poisoned".to_string()))?;
        Ok(zones.iter().filter(|zone| zone.active).cloned().collect())
    }

    fn register_zone(&self, zone: Zone) -> Result<(), DispatchError> {
        let mut zones = self
            .zones
            .write()
            .map_err(|_| DispatchError::Internal("zone registry poisoned".to_string()))?;
        zones.push(zone);
        Ok(())
    }

    fn counts(&self) -> StoreCounts {
        StoreCounts {
            orders: self.orders.len(),
            riders: self.riders.len(),
            zones: self.zones.read().map(|z| z.len()).unwrap_or(0),
        }
    }
}
