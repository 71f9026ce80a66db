//! Background dispatch sweep.
//!
//! Orders reaching `ready` are queued here; the engine runs one coordinator
//! attempt per order. "No rider yet" is an expected, frequent condition: the
//! order is re-queued after a delay rather than treated as a failure.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::{sleep, Duration};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::DispatchError;
use crate::state::AppState;

pub async fn run_dispatch_engine(state: Arc<AppState>, mut dispatch_rx: mpsc::Receiver<Uuid>) {
    info!("dispatch engine started");

    while let Some(order_id) = dispatch_rx.recv().await {
        state.metrics.orders_awaiting_dispatch.dec();

        match state.coordinator.dispatch_ready_order(order_id) {
            Ok(outcome) => {
                if outcome.newly_assigned() {
                    info!(
                        order_id = %order_id,
                        rider_id = %outcome.rider_id(),
                        "dispatch sweep assigned rider"
                    );
                }
            }
            Err(DispatchError::NoEligibleRider) => {
                warn!(order_id = %order_id, "no eligible rider, re-queueing order");
                requeue_later(state.clone(), order_id);
            }
            Err(DispatchError::DispatchExhausted(_)) => {
                // Admin alert already published by the coordinator; the order
                // stays ready and comes back on the next trigger.
                error!(order_id = %order_id, "dispatch retry budget exhausted");
            }
            Err(DispatchError::InvalidDispatchState(reason)) => {
                info!(order_id = %order_id, reason, "order no longer dispatchable, dropping");
            }
            Err(err) => {
                error!(order_id = %order_id, error = %err, "dispatch attempt failed");
            }
        }
    }

    warn!("dispatch engine stopped: queue channel closed");
}

pub async fn enqueue_dispatch(state: &AppState, order_id: Uuid) -> Result<(), DispatchError> {
    state
        .dispatch_tx
        .send(order_id)
        .await
        .map_err(|err| DispatchError::Internal(format!("dispatch queue send failed: {err}")))?;

    state.metrics.orders_awaiting_dispatch.inc();
    Ok(())
}

fn requeue_later(state: Arc<AppState>, order_id: Uuid) {
    tokio::spawn(async move {
        sleep(Duration::from_millis(state.config.dispatch.requeue_delay_ms)).await;
        if let Err(err) = enqueue_dispatch(&state, order_id).await {
            error!(order_id = %order_id, error = %err, "failed to re-queue order");
        }
    });
}
