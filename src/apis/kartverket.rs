use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, error, instrument};

use crate::app::ports::AuthoritativeLookupPort;
use crate::config::KartverketConfig;
use crate::constants::KARTVERKET_API;
use crate::domain::{CadastralNumbers, GeographicPoint, RegistryAddress};
use crate::error::{ResolverError, Result};
use crate::observability::metrics::{emit_counter, MetricName};

/// Client for the authoritative address registry (Kartverket's address API).
///
/// A match here is final: the resolver only ever returns records that came
/// out of this lookup.
pub struct KartverketClient {
    client: reqwest::Client,
    base_url: String,
}

impl KartverketClient {
    pub fn new(config: &KartverketConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    async fn query(&self, road: &str, postcode: &str) -> Result<SokResponse> {
        let url = format!("{}/sok", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("sok", road), ("postnummer", postcode), ("treffPerSide", "10")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ResolverError::Api {
                message: format!("address search returned status {}", response.status()),
            });
        }

        let payload = response.bytes().await?;
        Ok(serde_json::from_slice(&payload)?)
    }
}

#[async_trait]
impl AuthoritativeLookupPort for KartverketClient {
    #[instrument(skip(self))]
    async fn lookup(&self, road: &str, postcode: &str) -> Option<RegistryAddress> {
        // The registry is queried with both parts or not at all
        if road.trim().is_empty() || postcode.trim().is_empty() {
            return None;
        }

        match self.query(road, postcode).await {
            Ok(response) => {
                emit_counter(MetricName::RegistryLookupSuccess, 1.0);
                let hits = response.metadata.totalt_antall_treff;
                if hits != 1 {
                    // Zero or several hits: ambiguity is never resolved by guessing
                    debug!(api = KARTVERKET_API, road, postcode, hits, "no unambiguous match");
                    if hits > 1 {
                        emit_counter(MetricName::RegistryLookupAmbiguous, 1.0);
                    }
                    return None;
                }
                response.adresser.into_iter().next().map(SokAdresse::into_domain)
            }
            Err(e) => {
                emit_counter(MetricName::RegistryLookupError, 1.0);
                error!(api = KARTVERKET_API, road, postcode, error = %e, "registry lookup failed");
                None
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct SokResponse {
    metadata: SokMetadata,
    #[serde(default)]
    adresser: Vec<SokAdresse>,
}

#[derive(Debug, Deserialize)]
struct SokMetadata {
    #[serde(rename = "totaltAntallTreff")]
    totalt_antall_treff: u32,
}

#[derive(Debug, Deserialize)]
struct SokAdresse {
    adressenavn: String,
    nummer: Option<u32>,
    bokstav: Option<String>,
    kommunenummer: String,
    kommunenavn: String,
    gardsnummer: u32,
    bruksnummer: u32,
    festenummer: Option<u32>,
    postnummer: String,
    poststed: String,
    representasjonspunkt: Option<SokPunkt>,
    oppdateringsdato: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SokPunkt {
    epsg: String,
    lat: f64,
    lon: f64,
}

impl SokAdresse {
    fn into_domain(self) -> RegistryAddress {
        RegistryAddress {
            street_name: self.adressenavn,
            house_number: self.nummer,
            house_letter: self.bokstav.filter(|b| !b.is_empty()),
            postcode: self.postnummer,
            post_town: self.poststed,
            municipality_code: self.kommunenummer,
            municipality_name: self.kommunenavn,
            cadastre: CadastralNumbers {
                gardsnummer: self.gardsnummer,
                bruksnummer: self.bruksnummer,
                festenummer: self.festenummer,
            },
            point: self.representasjonspunkt.map(|p| GeographicPoint {
                epsg: p.epsg,
                lat: p.lat,
                lon: p.lon,
            }),
            updated_at: self
                .oppdateringsdato
                .and_then(|d| DateTime::parse_from_rfc3339(&d).ok())
                .map(|d| d.with_timezone(&Utc)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_hit_response() -> &'static str {
        r#"{
            "metadata": { "totaltAntallTreff": 1, "side": 0, "treffPerSide": 10 },
            "adresser": [{
                "adressenavn": "HAVNEGATA",
                "nummer": 19,
                "bokstav": "A",
                "kommunenummer": "0301",
                "kommunenavn": "OSLO",
                "gardsnummer": 208,
                "bruksnummer": 60,
                "festenummer": null,
                "postnummer": "0170",
                "poststed": "OSLO",
                "representasjonspunkt": { "epsg": "EPSG:4258", "lat": 59.9115, "lon": 10.7505 },
                "oppdateringsdato": "2022-01-05T13:24:33+01:00"
            }]
        }"#
    }

    #[test]
    fn parses_the_registry_wire_format() {
        let response: SokResponse = serde_json::from_str(single_hit_response()).unwrap();
        assert_eq!(response.metadata.totalt_antall_treff, 1);

        let record = response.adresser.into_iter().next().unwrap().into_domain();
        assert_eq!(record.street_name, "HAVNEGATA");
        assert_eq!(record.house_number, Some(19));
        assert_eq!(record.house_letter.as_deref(), Some("A"));
        assert_eq!(record.postcode, "0170");
        assert_eq!(record.municipality_code, "0301");
        assert_eq!(record.cadastre.gardsnummer, 208);
        let point = record.point.unwrap();
        assert_eq!(point.epsg, "EPSG:4258");
        assert!(record.updated_at.is_some());
    }

    #[test]
    fn empty_letter_and_missing_point_map_to_none() {
        let response: SokResponse = serde_json::from_str(
            r#"{
                "metadata": { "totaltAntallTreff": 1 },
                "adresser": [{
                    "adressenavn": "HAVNEGATA",
                    "nummer": 19,
                    "bokstav": "",
                    "kommunenummer": "0301",
                    "kommunenavn": "OSLO",
                    "gardsnummer": 208,
                    "bruksnummer": 60,
                    "postnummer": "0170",
                    "poststed": "OSLO"
                }]
            }"#,
        )
        .unwrap();

        let record = response.adresser.into_iter().next().unwrap().into_domain();
        assert_eq!(record.house_letter, None);
        assert_eq!(record.point, None);
        assert_eq!(record.updated_at, None);
    }

    #[tokio::test]
    async fn empty_inputs_return_none_without_a_remote_call() {
        // Unroutable base URL: any remote call would error and show up as a
        // logged fault rather than a clean early return.
        let client = KartverketClient::new(&KartverketConfig {
            base_url: "http://127.0.0.1:9/adresser/v1".to_string(),
            timeout_seconds: 1,
        })
        .unwrap();

        assert_eq!(client.lookup("", "0170").await, None);
        assert_eq!(client.lookup("HAVNEGATA 19A", "").await, None);
        assert_eq!(client.lookup("  ", "  ").await, None);
    }

    #[tokio::test]
    async fn network_faults_convert_to_a_miss() {
        let client = KartverketClient::new(&KartverketConfig {
            base_url: "http://127.0.0.1:9/adresser/v1".to_string(),
            timeout_seconds: 1,
        })
        .unwrap();

        assert_eq!(client.lookup("HAVNEGATA 19A", "0170").await, None);
    }
}
