//! Metrics for the address resolution pipeline, following standard
//! Prometheus naming conventions.

use std::fmt;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

static RECORDER: OnceCell<PrometheusHandle> = OnceCell::new();

/// Enum representing all metric names used in the system.
/// This eliminates magic strings and provides compile-time safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    // Resolution metrics
    ResolveAttempts,
    ResolveMatched,
    ResolveUnmatched,
    ResolveDuration,
    ResolveStrategyMatched,
    ResolveBatchesProcessed,
    ResolveBatchSize,

    // Authoritative registry metrics
    RegistryLookupSuccess,
    RegistryLookupError,
    RegistryLookupAmbiguous,

    // Property search metrics
    PropertySearchSuccess,
    PropertySearchError,
    PropertySearchCandidates,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            // Resolution metrics
            MetricName::ResolveAttempts => "adresse_resolve_attempts_total",
            MetricName::ResolveMatched => "adresse_resolve_matched_total",
            MetricName::ResolveUnmatched => "adresse_resolve_unmatched_total",
            MetricName::ResolveDuration => "adresse_resolve_duration_seconds",
            MetricName::ResolveStrategyMatched => "adresse_resolve_strategy_matched_total",
            MetricName::ResolveBatchesProcessed => "adresse_resolve_batches_processed_total",
            MetricName::ResolveBatchSize => "adresse_resolve_batch_size",

            // Authoritative registry metrics
            MetricName::RegistryLookupSuccess => "adresse_registry_lookup_success_total",
            MetricName::RegistryLookupError => "adresse_registry_lookup_error_total",
            MetricName::RegistryLookupAmbiguous => "adresse_registry_lookup_ambiguous_total",

            // Property search metrics
            MetricName::PropertySearchSuccess => "adresse_property_search_success_total",
            MetricName::PropertySearchError => "adresse_property_search_error_total",
            MetricName::PropertySearchCandidates => "adresse_property_search_candidates",
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Install the Prometheus recorder. Safe to call more than once; emitting
/// without calling it first is a no-op.
pub fn init() {
    let _ = RECORDER.get_or_try_init(|| PrometheusBuilder::new().install_recorder());
}

/// Render the current metrics in Prometheus exposition format.
pub fn render() -> Option<String> {
    RECORDER.get().map(|handle| handle.render())
}

pub fn emit_counter(name: MetricName, value: f64) {
    ::metrics::counter!(name.as_str()).increment(value as u64);
}

pub fn emit_histogram(name: MetricName, value: f64) {
    ::metrics::histogram!(name.as_str()).record(value);
}

/// Count a match against the strategy number that produced it.
pub fn emit_strategy_match(strategy: u8) {
    ::metrics::counter!(
        MetricName::ResolveStrategyMatched.as_str(),
        "strategy" => strategy.to_string()
    )
    .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_names_follow_prometheus_conventions() {
        assert_eq!(
            MetricName::ResolveAttempts.as_str(),
            "adresse_resolve_attempts_total"
        );
        assert_eq!(
            MetricName::ResolveDuration.to_string(),
            "adresse_resolve_duration_seconds"
        );
    }

    #[test]
    fn emitting_without_a_recorder_is_a_noop() {
        emit_counter(MetricName::ResolveAttempts, 1.0);
        emit_histogram(MetricName::ResolveDuration, 0.1);
        emit_strategy_match(3);
    }
}
