//! Order status state machine.
//!
//! Transitions are validated against a fixed graph and applied as pure
//! functions: callers receive a new order value with the status, milestone
//! timestamps and history entry set, and persist it themselves. This lets the
//! dispatch coordinator validate a transition before committing it atomically.

use chrono::Utc;

use crate::error::DispatchError;
use crate::models::order::{Actor, Order, OrderStatus, StatusChange};

/// Legal forward path:
/// pending -> confirmed -> preparing -> ready -> picked_up -> on_the_way -> delivered,
/// with cancelled reachable from every state except delivered.
pub fn can_transition(current: OrderStatus, next: OrderStatus) -> bool {
    use OrderStatus::*;

    match (current, next) {
        (Pending, Confirmed)
        | (Confirmed, Preparing)
        | (Preparing, Ready)
        | (Ready, PickedUp)
        | (PickedUp, OnTheWay)
        | (OnTheWay, Delivered) => true,
        (from, Cancelled) => from != Delivered && from != Cancelled,
        _ => false,
    }
}

/// Returns a new order value with `status = next` and an appended history
/// entry carrying a server-assigned timestamp. The input is never mutated.
pub fn apply_transition(
    order: &Order,
    next: OrderStatus,
    actor: Actor,
    note: Option<String>,
) -> Result<Order, DispatchError> {
    if order.status.is_terminal() {
        return Err(DispatchError::TerminalOrder(order.status.to_string()));
    }

    if !can_transition(order.status, next) {
        return Err(DispatchError::IllegalTransition {
            from: order.status.to_string(),
            to: next.to_string(),
        });
    }

    let now = Utc::now();
    let mut updated = order.clone();
    updated.status = next;

    match next {
        OrderStatus::Ready => updated.ready_at = Some(now),
        OrderStatus::PickedUp => updated.assigned_at = Some(now),
        OrderStatus::Delivered => updated.delivered_at = Some(now),
        // A cancelled order releases its rider; the caller returns the rider
        // to the available pool.
        OrderStatus::Cancelled => updated.rider_id = None,
        _ => {}
    }

    updated.status_history.push(StatusChange {
        status: next,
        timestamp: now,
        actor,
        note,
    });

    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{FeeBreakdown, GeoPoint};
    use uuid::Uuid;

    fn order_in(status: OrderStatus) -> Order {
        let mut order = Order::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            GeoPoint {
                lat: 23.81,
                lng: 90.41,
            },
            GeoPoint {
                lat: 23.80,
                lng: 90.42,
            },
            None,
            20000,
            3000,
            FeeBreakdown {
                base: 3000,
                distance: 0,
            },
        );
        order.status = status;
        if status.requires_rider() {
            order.rider_id = Some(Uuid::new_v4());
        }
        order
    }

    const ALL: [OrderStatus; 8] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::PickedUp,
        OrderStatus::OnTheWay,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    #[test]
    fn graph_matches_fixed_table() {
        use OrderStatus::*;

        let legal = [
            (Pending, Confirmed),
            (Confirmed, Preparing),
            (Preparing, Ready),
            (Ready, PickedUp),
            (PickedUp, OnTheWay),
            (OnTheWay, Delivered),
            (Pending, Cancelled),
            (Confirmed, Cancelled),
            (Preparing, Cancelled),
            (Ready, Cancelled),
            (PickedUp, Cancelled),
            (OnTheWay, Cancelled),
        ];

        for from in ALL {
            for to in ALL {
                let expected = legal.contains(&(from, to));
                assert_eq!(
                    can_transition(from, to),
                    expected,
                    "transition {from} -> {to}"
                );
            }
        }
    }

    #[test]
    fn full_legal_sequence_applies() {
        use OrderStatus::*;

        let mut order = order_in(Pending);
        for next in [Confirmed, Preparing, Ready, PickedUp, OnTheWay, Delivered] {
            if next == PickedUp {
                order.rider_id = Some(Uuid::new_v4());
            }
            order = apply_transition(&order, next, Actor::System, None).unwrap();
            assert_eq!(order.status, next);
        }

        // pending entry plus six transitions, in order.
        assert_eq!(order.status_history.len(), 7);
        let statuses: Vec<OrderStatus> =
            order.status_history.iter().map(|h| h.status).collect();
        assert_eq!(
            statuses,
            vec![Pending, Confirmed, Preparing, Ready, PickedUp, OnTheWay, Delivered]
        );
        assert!(order.ready_at.is_some());
        assert!(order.assigned_at.is_some());
        assert!(order.delivered_at.is_some());
    }

    #[test]
    fn illegal_transition_is_rejected() {
        let order = order_in(OrderStatus::Pending);
        let err = apply_transition(&order, OrderStatus::Ready, Actor::Restaurant, None)
            .unwrap_err();
        assert!(matches!(err, DispatchError::IllegalTransition { .. }));
    }

    #[test]
    fn delivered_is_terminal() {
        let order = order_in(OrderStatus::Delivered);
        let err = apply_transition(&order, OrderStatus::Preparing, Actor::System, None)
            .unwrap_err();
        assert!(matches!(err, DispatchError::TerminalOrder(_)));

        let err = apply_transition(&order, OrderStatus::Cancelled, Actor::System, None)
            .unwrap_err();
        assert!(matches!(err, DispatchError::TerminalOrder(_)));
    }

    #[test]
    fn cancelled_admits_no_further_transitions() {
        let order = order_in(OrderStatus::Cancelled);
        for next in ALL {
            assert!(apply_transition(&order, next, Actor::System, None).is_err());
        }
    }

    #[test]
    fn cancelling_an_assigned_order_releases_the_rider() {
        let order = order_in(OrderStatus::PickedUp);
        assert!(order.rider_id.is_some());

        let cancelled = apply_transition(
            &order,
            OrderStatus::Cancelled,
            Actor::System,
            Some("restaurant closed".to_string()),
        )
        .unwrap();
        assert!(cancelled.rider_id.is_none());
        assert_eq!(cancelled.status, OrderStatus::Cancelled);
    }

    #[test]
    fn original_order_is_untouched() {
        let order = order_in(OrderStatus::Pending);
        let _ = apply_transition(&order, OrderStatus::Confirmed, Actor::Restaurant, None)
            .unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.status_history.len(), 1);
    }
}
