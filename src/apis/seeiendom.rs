use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, error, instrument};

use crate::app::ports::FuzzySearchPort;
use crate::config::SeeiendomConfig;
use crate::constants::SEEIENDOM_API;
use crate::domain::{AddressCandidate, CadastralUnit};
use crate::error::{ResolverError, Result};
use crate::observability::metrics::{emit_counter, emit_histogram, MetricName};

/// Client for the secondary fuzzy property search ("se eiendom").
///
/// Its hits are proposals only; nothing from here reaches a caller without a
/// fresh authoritative lookup on the proposed string.
pub struct SeeiendomClient {
    client: reqwest::Client,
    base_url: String,
}

impl SeeiendomClient {
    pub fn new(config: &SeeiendomConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    async fn query(&self, free_text_road: &str) -> Result<Vec<EiendomTreff>> {
        let url = format!("{}/soekEtterEiendommer", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("searchstring", free_text_road)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ResolverError::Api {
                message: format!("property search returned status {}", response.status()),
            });
        }

        let payload = response.bytes().await?;
        Ok(serde_json::from_slice(&payload)?)
    }
}

#[async_trait]
impl FuzzySearchPort for SeeiendomClient {
    #[instrument(skip(self))]
    async fn search(&self, free_text_road: &str) -> Vec<AddressCandidate> {
        if free_text_road.trim().is_empty() {
            return Vec::new();
        }

        match self.query(free_text_road).await {
            Ok(hits) => {
                emit_counter(MetricName::PropertySearchSuccess, 1.0);
                emit_histogram(MetricName::PropertySearchCandidates, hits.len() as f64);
                hits.into_iter()
                    .filter_map(|hit| hit.into_candidate(free_text_road))
                    .collect()
            }
            Err(e) => {
                emit_counter(MetricName::PropertySearchError, 1.0);
                error!(api = SEEIENDOM_API, free_text_road, error = %e, "property search failed");
                Vec::new()
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct EiendomTreff {
    #[serde(default)]
    id: String,
    #[serde(default)]
    kommunenr: String,
    #[serde(default)]
    kommunenavn: String,
    gardsnr: Option<u32>,
    bruksnr: Option<u32>,
    festenr: Option<u32>,
    seksjonsnr: Option<u32>,
    adressetekst: Option<String>,
}

impl EiendomTreff {
    fn into_candidate(self, searched_road: &str) -> Option<AddressCandidate> {
        let raw_address_string = match self.adressetekst {
            Some(text) if !text.trim().is_empty() => text,
            _ => {
                // Hits without an address string cannot be matched downstream
                debug!(api = SEEIENDOM_API, searched_road, id = %self.id, "dropping hit without address text");
                return None;
            }
        };

        Some(AddressCandidate {
            id: self.id,
            municipality_code: self.kommunenr,
            municipality_name: self.kommunenavn,
            cadastral_unit: CadastralUnit {
                gaardsnr: self.gardsnr,
                bruksnr: self.bruksnr,
                festenr: self.festenr,
                seksjonsnr: self.seksjonsnr,
            },
            raw_address_string,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_property_search_wire_format() {
        let hits: Vec<EiendomTreff> = serde_json::from_str(
            r#"[{
                "id": "0301-208/60",
                "type": "eiendom",
                "kommunenr": "0301",
                "kommunenavn": "OSLO",
                "gardsnr": 208,
                "bruksnr": 60,
                "festenr": null,
                "seksjonsnr": 2,
                "adressetekst": "HAVNEGATA 19A, 0170 OSLO"
            }]"#,
        )
        .unwrap();

        let candidate = hits
            .into_iter()
            .next()
            .unwrap()
            .into_candidate("HAVNEGATA 19A")
            .unwrap();
        assert_eq!(candidate.id, "0301-208/60");
        assert_eq!(candidate.municipality_code, "0301");
        assert_eq!(candidate.cadastral_unit.gaardsnr, Some(208));
        assert_eq!(candidate.cadastral_unit.seksjonsnr, Some(2));
        assert_eq!(candidate.raw_address_string, "HAVNEGATA 19A, 0170 OSLO");
    }

    #[test]
    fn hits_without_address_text_are_dropped() {
        let hit = EiendomTreff {
            id: "x".to_string(),
            kommunenr: String::new(),
            kommunenavn: String::new(),
            gardsnr: None,
            bruksnr: None,
            festenr: None,
            seksjonsnr: None,
            adressetekst: None,
        };
        assert!(hit.into_candidate("HAVNEGATA 19A").is_none());
    }

    #[tokio::test]
    async fn faults_and_empty_input_return_an_empty_list() {
        let client = SeeiendomClient::new(&SeeiendomConfig {
            base_url: "http://127.0.0.1:9/api".to_string(),
            timeout_seconds: 1,
        })
        .unwrap();

        assert!(client.search("").await.is_empty());
        assert!(client.search("HAVNEGATA 19A").await.is_empty());
    }
}
