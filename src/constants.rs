/// Provider identifiers used in logs and metrics.
pub const KARTVERKET_API: &str = "kartverket";
pub const SEEIENDOM_API: &str = "seeiendom";

/// Default provider endpoints, overridable through config.toml.
pub const DEFAULT_KARTVERKET_BASE_URL: &str = "https://ws.geonorge.no/adresser/v1";
pub const DEFAULT_SEEIENDOM_BASE_URL: &str = "https://seeiendom.kartverket.no/api";
