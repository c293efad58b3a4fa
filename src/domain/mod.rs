use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A loosely structured location record as delivered by upstream systems.
///
/// Either address may be absent or malformed; the resolver treats the input
/// as read-only and never repairs it in place.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocationObject {
    pub visiting_address: Option<LocationAddress>,
    pub postal_address: Option<LocationAddress>,
}

/// One side (visiting or postal) of a location record. Fields beyond street
/// and postcode are ignored during deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationAddress {
    pub street: Option<String>,
    pub postcode: Option<String>,
}

impl LocationAddress {
    /// Trimmed street, empty when missing.
    pub fn street(&self) -> &str {
        self.street.as_deref().map(str::trim).unwrap_or("")
    }

    /// Trimmed postcode, empty when missing.
    pub fn postcode(&self) -> &str {
        self.postcode.as_deref().map(str::trim).unwrap_or("")
    }
}

/// The authoritative registry's full record for a single address.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistryAddress {
    pub street_name: String,
    pub house_number: Option<u32>,
    pub house_letter: Option<String>,
    pub postcode: String,
    pub post_town: String,
    pub municipality_code: String,
    pub municipality_name: String,
    pub cadastre: CadastralNumbers,
    pub point: Option<GeographicPoint>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Cadastral identifiers as recorded by the registry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CadastralNumbers {
    pub gardsnummer: u32,
    pub bruksnummer: u32,
    pub festenummer: Option<u32>,
}

/// Representation point with its coordinate-reference system.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeographicPoint {
    pub epsg: String,
    pub lat: f64,
    pub lon: f64,
}

/// A verified address together with the strategy that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedAddress {
    pub address: RegistryAddress,
    /// 1-indexed strategy number and a short description, e.g.
    /// "3. visitingAddress: kartverket search".
    pub provenance: String,
}

impl ResolvedAddress {
    /// The strategy number parsed back out of the provenance label.
    pub fn strategy_number(&self) -> Option<u8> {
        self.provenance.split('.').next()?.trim().parse().ok()
    }
}

/// An unverified hit from the fuzzy property search. Constructed and
/// discarded within a single resolution call.
#[derive(Debug, Clone, PartialEq)]
pub struct AddressCandidate {
    pub id: String,
    pub municipality_code: String,
    pub municipality_name: String,
    pub cadastral_unit: CadastralUnit,
    /// Denormalized "STREET NUMBER, POSTCODE CITY" string requiring parsing.
    pub raw_address_string: String,
}

/// Cadastral identifiers as reported by the property search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CadastralUnit {
    pub gaardsnr: Option<u32>,
    pub bruksnr: Option<u32>,
    pub festenr: Option<u32>,
    pub seksjonsnr: Option<u32>,
}
