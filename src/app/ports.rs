use async_trait::async_trait;

use crate::domain::{AddressCandidate, RegistryAddress};

/// Exact-match lookup against the authoritative address registry.
#[async_trait]
pub trait AuthoritativeLookupPort: Send + Sync {
    /// Returns the single registry record for road + postcode, or None when
    /// the registry has zero or several matches, when either input is empty,
    /// or when the call fails. Never errors.
    async fn lookup(&self, road: &str, postcode: &str) -> Option<RegistryAddress>;
}

/// Free-text search against the secondary property lookup.
#[async_trait]
pub trait FuzzySearchPort: Send + Sync {
    /// Returns raw, unverified candidates; empty on miss or fault. Never errors.
    async fn search(&self, free_text_road: &str) -> Vec<AddressCandidate>;
}
