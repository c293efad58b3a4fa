// Address resolution: candidate parsing/filtering and the fallback waterfall

pub mod candidate;
pub mod waterfall;

pub use candidate::{filter_exact_matches, ParsedCandidate};
pub use waterfall::AddressResolver;
