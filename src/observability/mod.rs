// Observability: metrics recording for the resolver

pub mod metrics;

pub use self::metrics::{emit_counter, emit_histogram, init};
