use std::sync::Arc;

use tokio::sync::mpsc;
use uuid::Uuid;

use crate::config::Config;
use crate::dispatch::DispatchCoordinator;
use crate::notify::BroadcastNotifier;
use crate::observability::metrics::Metrics;
use crate::store::InMemoryStore;

pub struct AppState {
    pub store: Arc<InMemoryStore>,
    pub notifier: Arc<BroadcastNotifier>,
    pub coordinator: DispatchCoordinator,
    pub dispatch_tx: mpsc::Sender<Uuid>,
    pub metrics: Metrics,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> (Self, mpsc::Receiver<Uuid>) {
        let (dispatch_tx, dispatch_rx) = mpsc::channel(config.dispatch_queue_size);

        let metrics = Metrics::new();
        let store = Arc::new(InMemoryStore::new());
        let notifier = Arc::new(BroadcastNotifier::new(
            config.event_buffer_size,
            metrics.clone(),
        ));
        let coordinator = DispatchCoordinator::new(
            store.clone(),
            notifier.clone(),
            config.dispatch.clone(),
            metrics.clone(),
        );

        (
            Self {
                store,
                notifier,
                coordinator,
                dispatch_tx,
                metrics,
                config,
            },
            dispatch_rx,
        )
    }
}
