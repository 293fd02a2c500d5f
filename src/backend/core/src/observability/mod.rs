//! Observability: tracing, metrics and structured domain events.

pub mod metrics;

use opentelemetry_otlp::WithExportConfig;
use tracing_subscriber::{
    layer::{Layered, SubscriberExt}, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

use crate::config::ObservabilityConfig;

type FilteredRegistry = Layered<EnvFilter, Registry>;

/// Initialize the observability stack.
///
/// `RUST_LOG` wins over the configured log level when set.
pub fn init(service_name: &str, config: &ObservabilityConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));

    let mut layers = output_layers(config);

    if let Some(endpoint) = config.otlp_endpoint.as_deref() {
        let tracer = opentelemetry_otlp::new_pipeline()
            .tracing()
            .with_exporter(
                opentelemetry_otlp::new_exporter()
                    .tonic()
                    .with_endpoint(endpoint),
            )
            .with_trace_config(
                opentelemetry_sdk::trace::config()
                    .with_resource(opentelemetry_sdk::Resource::new(vec![
                        opentelemetry::KeyValue::new("service.name", service_name.to_string()),
                    ])),
            )
            .install_batch(opentelemetry_sdk::runtime::Tokio)?;

        layers.push(tracing_opentelemetry::layer().with_tracer(tracer).boxed());
    }

    tracing_subscriber::registry().with(filter).with(layers).init();

    metrics::init_metrics(service_name)?;

    Ok(())
}

type BoxedLayer = Box<dyn Layer<FilteredRegistry> + Send + Sync>;

/// Log formatting layers; they share one subscriber type so either format boxes into the list.
fn output_layers(config: &ObservabilityConfig) -> Vec<BoxedLayer> {
    let mut layers: Vec<BoxedLayer> = Vec::with_capacity(2);
    layers.push(if config.json_logging {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().pretty().boxed()
    });
    layers
}

/// Shutdown OpenTelemetry.
pub fn shutdown() {
    opentelemetry::global::shutdown_tracer_provider();
}

/// Structured domain events for logging.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(tag = "event_type")]
pub enum LaunchpadEvent {
    EntityCreated {
        collection: &'static str,
        id: String,
        actor: Option<String>,
    },
    EntityUpdated {
        collection: &'static str,
        id: String,
        actor: Option<String>,
    },
    EntityDeleted {
        collection: &'static str,
        id: String,
        cascaded: usize,
    },
    AspectRegistered {
        aspect: String,
        routes: usize,
    },
    FixturesSeeded {
        collection: &'static str,
        count: usize,
    },
    LaunchWentLive {
        launch_id: String,
        product_id: String,
    },
}

impl LaunchpadEvent {
    /// Log this event and bump the matching counter.
    pub fn log(&self) {
        match self {
            LaunchpadEvent::EntityCreated { collection, id, actor } => {
                tracing::info!(collection = %collection, id = %id, actor = ?actor, "Entity created");
                metrics::record_mutation(collection, "create");
            }
            LaunchpadEvent::EntityUpdated { collection, id, actor } => {
                tracing::info!(collection = %collection, id = %id, actor = ?actor, "Entity updated");
                metrics::record_mutation(collection, "update");
            }
            LaunchpadEvent::EntityDeleted { collection, id, cascaded } => {
                tracing::info!(
                    collection = %collection,
                    id = %id,
                    cascaded = %cascaded,
                    "Entity deleted"
                );
                metrics::record_mutation(collection, "delete");
            }
            LaunchpadEvent::AspectRegistered { aspect, routes } => {
                tracing::info!(aspect = %aspect, routes = %routes, "Aspect registered");
            }
            LaunchpadEvent::FixturesSeeded { collection, count } => {
                tracing::info!(collection = %collection, count = %count, "Fixtures seeded");
            }
            LaunchpadEvent::LaunchWentLive { launch_id, product_id } => {
                tracing::info!(launch_id = %launch_id, product_id = %product_id, "Launch went live");
                metrics::record_launch_live();
            }
        }
    }
}
