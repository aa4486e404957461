//! # Prometheus Metrics: Exposition for Container Orchestration
//!
//! Exposes pimtrack operational metrics in the Prometheus text exposition
//! format for scraping by Prometheus or any OpenMetrics-compatible collector.
//!
//! ## Metrics Exposed
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `pimtrack_http_request_duration_seconds` | Histogram | `method`, `path` | Request latency |
//! | `pimtrack_projects` | Gauge | (none) | Records currently held |
//! | `pimtrack_mutations_total` | Counter | `operation`, `outcome` | Create/update/delete attempts |
//!
//! Paths are normalised before labelling so numeric ids and project numbers do
//! not explode label cardinality.

use prometheus_client::encoding::text::encode;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::gauge::Gauge;
use prometheus_client::metrics::histogram::{exponential_buckets, Histogram};
use prometheus_client::registry::Registry;

/// Label set for request latency.
#[derive(Clone, Debug, Hash, PartialEq, Eq, prometheus_client::encoding::EncodeLabelSet)]
pub struct HttpLabel {
    pub method: String,
    pub path: String,
}

/// Label set for registry mutations.
#[derive(Clone, Debug, Hash, PartialEq, Eq, prometheus_client::encoding::EncodeLabelSet)]
pub struct MutationLabel {
    pub operation: String,
    pub outcome: String,
}

fn latency_histogram() -> Histogram {
    // 1ms .. ~8s
    Histogram::new(exponential_buckets(0.001, 2.0, 14))
}

/// Thread-safe metrics registry for the service.
pub struct Metrics {
    pub registry: Registry,
    pub http_request_duration: Family<HttpLabel, Histogram, fn() -> Histogram>,
    pub projects: Gauge,
    pub mutations: Family<MutationLabel, Counter>,
}

impl Metrics {
    pub fn new() -> Self {
        let mut registry = Registry::default();

        let http_request_duration =
            Family::<HttpLabel, Histogram, fn() -> Histogram>::new_with_constructor(
                latency_histogram,
            );
        registry.register(
            "pimtrack_http_request_duration_seconds",
            "HTTP request latency by method and normalised path",
            http_request_duration.clone(),
        );

        let projects = Gauge::default();
        registry.register(
            "pimtrack_projects",
            "Number of project records currently held",
            projects.clone(),
        );

        let mutations = Family::<MutationLabel, Counter>::default();
        registry.register(
            "pimtrack_mutations",
            "Registry mutations by operation and outcome",
            mutations.clone(),
        );

        Self {
            registry,
            http_request_duration,
            projects,
            mutations,
        }
    }

    pub fn record_mutation(&self, operation: &str, outcome: &str) {
        self.mutations
            .get_or_create(&MutationLabel {
                operation: operation.to_string(),
                outcome: outcome.to_string(),
            })
            .inc();
    }

    /// Render all metrics in Prometheus text exposition format.
    pub fn encode(&self) -> String {
        let mut buf = String::new();
        encode(&mut buf, &self.registry).expect("encoding metrics should not fail");
        buf
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
