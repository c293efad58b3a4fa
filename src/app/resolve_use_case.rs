use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};
use uuid::Uuid;

use crate::app::ports::{AuthoritativeLookupPort, FuzzySearchPort};
use crate::domain::{LocationObject, ResolvedAddress};
use crate::observability::metrics::{
    emit_counter, emit_histogram, emit_strategy_match, MetricName,
};
use crate::resolver::AddressResolver;

/// Use case for resolving location records against the address providers.
pub struct ResolveUseCase {
    resolver: AddressResolver,
    /// Courtesy pause between successive batch resolutions. Pacing only; it
    /// has no effect on per-resolution behaviour.
    batch_delay: Duration,
}

impl ResolveUseCase {
    pub fn new(
        registry: Arc<dyn AuthoritativeLookupPort>,
        property_search: Arc<dyn FuzzySearchPort>,
        batch_delay: Duration,
    ) -> Self {
        Self {
            resolver: AddressResolver::new(registry, property_search),
            batch_delay,
        }
    }

    /// Resolve a single location record. Returns the verified address with
    /// its provenance, or None when every strategy missed.
    pub async fn resolve_location(&self, location: &LocationObject) -> Option<ResolvedAddress> {
        let start_time = std::time::Instant::now();
        emit_counter(MetricName::ResolveAttempts, 1.0);

        let resolved = self.resolver.resolve(location).await;

        emit_histogram(
            MetricName::ResolveDuration,
            start_time.elapsed().as_secs_f64(),
        );

        match &resolved {
            Some(found) => {
                emit_counter(MetricName::ResolveMatched, 1.0);
                if let Some(strategy) = found.strategy_number() {
                    emit_strategy_match(strategy);
                }
                info!(
                    provenance = %found.provenance,
                    street = %found.address.street_name,
                    postcode = %found.address.postcode,
                    "location resolved"
                );
            }
            None => {
                emit_counter(MetricName::ResolveUnmatched, 1.0);
                info!("location could not be resolved");
            }
        }

        resolved
    }

    /// Resolve a batch of location records sequentially, pausing between
    /// successive resolutions out of courtesy towards the providers. A
    /// resolution that misses does not stop the batch.
    pub async fn resolve_batch(
        &self,
        locations: &[LocationObject],
    ) -> Vec<Option<ResolvedAddress>> {
        let run_id = Uuid::new_v4();
        let batch_size = locations.len();

        info!(%run_id, batch_size, "starting batch resolution");
        emit_counter(MetricName::ResolveBatchesProcessed, 1.0);
        emit_histogram(MetricName::ResolveBatchSize, batch_size as f64);

        let mut results = Vec::with_capacity(batch_size);
        let mut matched_count = 0;

        for (index, location) in locations.iter().enumerate() {
            if index > 0 && !self.batch_delay.is_zero() {
                tokio::time::sleep(self.batch_delay).await;
            }
            debug!(%run_id, record = index + 1, batch_size, "resolving batch record");

            let resolved = self.resolve_location(location).await;
            if resolved.is_some() {
                matched_count += 1;
            }
            results.push(resolved);
        }

        info!(
            %run_id,
            matched = matched_count,
            unmatched = batch_size - matched_count,
            "batch resolution completed"
        );

        results
    }
}
