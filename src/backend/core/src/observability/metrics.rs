//! Prometheus metrics registry and recording helpers.

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

static METRICS_REGISTRY: OnceLock<MetricsRegistry> = OnceLock::new();

/// Central metrics registry holding the Prometheus handle.
pub struct MetricsRegistry {
    prometheus_handle: Option<PrometheusHandle>,
}

impl std::fmt::Debug for MetricsRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricsRegistry")
            .field("prometheus_handle", &self.prometheus_handle.is_some())
            .finish()
    }
}

impl MetricsRegistry {
    /// Get the global metrics registry.
    ///
    /// Before [`init_metrics`] runs this is an empty registry that renders nothing.
    pub fn global() -> &'static MetricsRegistry {
        METRICS_REGISTRY.get_or_init(|| MetricsRegistry {
            prometheus_handle: None,
        })
    }

    /// Render all metrics in Prometheus text format.
    pub fn render(&self) -> String {
        self.prometheus_handle
            .as_ref()
            .map(|h| h.render())
            .unwrap_or_default()
    }
}

/// Install the Prometheus recorder and publish its handle globally.
pub fn init_metrics(service_name: &str) -> anyhow::Result<()> {
    let handle = PrometheusBuilder::new()
        .add_global_label("service", service_name)
        .set_buckets(&[0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0])?
        .install_recorder()?;

    register_metric_descriptions();

    if METRICS_REGISTRY
        .set(MetricsRegistry {
            prometheus_handle: Some(handle),
        })
        .is_err()
    {
        tracing::warn!("Metrics registry already initialized");
    }

    tracing::info!(service_name = %service_name, "Metrics initialized");
    Ok(())
}

fn register_metric_descriptions() {
    describe_counter!("launchpad_errors_total", "Errors raised, by code and category");
    describe_counter!("launchpad_mutations_total", "Entity mutations, by collection and kind");
    describe_counter!("launchpad_launches_live_total", "Launches flipped to live");
    describe_counter!("launchpad_search_queries_total", "Search queries served");
    describe_histogram!(
        "launchpad_graphql_duration_seconds",
        "GraphQL request duration in seconds"
    );
}

pub fn record_mutation(collection: &'static str, kind: &'static str) {
    counter!("launchpad_mutations_total", "collection" => collection, "kind" => kind).increment(1);
}

pub fn record_launch_live() {
    counter!("launchpad_launches_live_total").increment(1);
}

pub fn record_search_query(hits: usize) {
    counter!("launchpad_search_queries_total", "empty" => if hits == 0 { "true" } else { "false" })
        .increment(1);
}

pub fn record_graphql_duration(secs: f64) {
    histogram!("launchpad_graphql_duration_seconds").record(secs);
}
