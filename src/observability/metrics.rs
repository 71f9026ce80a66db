use prometheus::{
    Encoder, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub dispatches_total: IntCounterVec,
    pub dispatch_latency_seconds: HistogramVec,
    pub orders_awaiting_dispatch: IntGauge,
    pub claim_conflicts_total: IntCounter,
    pub events_published_total: IntCounterVec,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let dispatches_total = IntCounterVec::new(
            Opts::new("dispatches_total", "Dispatch attempts by outcome"),
            &["outcome"],
        )
        .expect("valid dispatches_total metric");

        let dispatch_latency_seconds = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "dispatch_latency_seconds",
                "Latency of dispatch attempts in seconds",
            ),
            &["outcome"],
        )
        .expect("valid dispatch_latency_seconds metric");

        let orders_awaiting_dispatch = IntGauge::new(
            "orders_awaiting_dispatch",
            "Ready orders currently queued for dispatch",
        )
        .expect("valid orders_awaiting_dispatch metric");

        let claim_conflicts_total = IntCounter::new(
            "claim_conflicts_total",
            "Rider claims lost to a concurrent assignment",
        )
        .expect("valid claim_conflicts_total metric");

        let events_published_total = IntCounterVec::new(
            Opts::new("events_published_total", "Published events by topic kind"),
            &["topic"],
        )
        .expect("valid events_published_total metric");

        registry
            .register(Box::new(dispatches_total.clone()))
            .expect("register dispatches_total");
        registry
            .register(Box::new(dispatch_latency_seconds.clone()))
            .expect("register dispatch_latency_seconds");
        registry
            .register(Box::new(orders_awaiting_dispatch.clone()))
            .expect("register orders_awaiting_dispatch");
        registry
            .register(Box::new(claim_conflicts_total.clone()))
            .expect("register claim_conflicts_total");
        registry
            .register(Box::new(events_published_total.clone()))
            .expect("register events_published_total");

        Self {
            registry,
            dispatches_total,
            dispatch_latency_seconds,
            orders_awaiting_dispatch,
            claim_conflicts_total,
            events_published_total,
        }
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
