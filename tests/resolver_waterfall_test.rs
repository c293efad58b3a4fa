use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use adresse_resolver::app::ports::{AuthoritativeLookupPort, FuzzySearchPort};
use adresse_resolver::app::resolve_use_case::ResolveUseCase;
use adresse_resolver::domain::{
    AddressCandidate, CadastralNumbers, CadastralUnit, LocationAddress, LocationObject,
    RegistryAddress,
};

/// In-memory stand-in for the authoritative registry, keyed on the exact
/// (road, postcode) strings the resolver queries with.
struct FakeRegistry {
    records: HashMap<(String, String), RegistryAddress>,
    calls: Mutex<Vec<(String, String)>>,
}

impl FakeRegistry {
    fn new() -> Self {
        Self {
            records: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn with_record(mut self, road: &str, postcode: &str, record: RegistryAddress) -> Self {
        self.records
            .insert((road.to_string(), postcode.to_string()), record);
        self
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl AuthoritativeLookupPort for FakeRegistry {
    async fn lookup(&self, road: &str, postcode: &str) -> Option<RegistryAddress> {
        self.calls
            .lock()
            .unwrap()
            .push((road.to_string(), postcode.to_string()));
        if road.trim().is_empty() || postcode.trim().is_empty() {
            return None;
        }
        self.records
            .get(&(road.to_string(), postcode.to_string()))
            .cloned()
    }
}

struct FakePropertySearch {
    results: HashMap<String, Vec<AddressCandidate>>,
    calls: Mutex<Vec<String>>,
}

impl FakePropertySearch {
    fn new() -> Self {
        Self {
            results: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn with_results(mut self, road: &str, raw_strings: &[&str]) -> Self {
        self.results.insert(
            road.to_string(),
            raw_strings.iter().map(|raw| candidate(raw)).collect(),
        );
        self
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl FuzzySearchPort for FakePropertySearch {
    async fn search(&self, free_text_road: &str) -> Vec<AddressCandidate> {
        self.calls.lock().unwrap().push(free_text_road.to_string());
        self.results.get(free_text_road).cloned().unwrap_or_default()
    }
}

fn candidate(raw_address_string: &str) -> AddressCandidate {
    AddressCandidate {
        id: "0301-208/60".to_string(),
        municipality_code: "0301".to_string(),
        municipality_name: "OSLO".to_string(),
        cadastral_unit: CadastralUnit {
            gaardsnr: Some(208),
            bruksnr: Some(60),
            festenr: None,
            seksjonsnr: None,
        },
        raw_address_string: raw_address_string.to_string(),
    }
}

fn record(street_name: &str, number: u32, letter: Option<&str>, postcode: &str) -> RegistryAddress {
    RegistryAddress {
        street_name: street_name.to_string(),
        house_number: Some(number),
        house_letter: letter.map(|l| l.to_string()),
        postcode: postcode.to_string(),
        post_town: "OSLO".to_string(),
        municipality_code: "0301".to_string(),
        municipality_name: "OSLO".to_string(),
        cadastre: CadastralNumbers {
            gardsnummer: 208,
            bruksnummer: 60,
            festenummer: None,
        },
        point: None,
        updated_at: None,
    }
}

fn visiting(street: &str, postcode: &str) -> LocationObject {
    LocationObject {
        visiting_address: Some(LocationAddress {
            street: Some(street.to_string()),
            postcode: Some(postcode.to_string()),
        }),
        postal_address: None,
    }
}

fn use_case(registry: Arc<FakeRegistry>, search: Arc<FakePropertySearch>) -> ResolveUseCase {
    ResolveUseCase::new(registry, search, Duration::from_millis(0))
}

#[tokio::test]
async fn malformed_street_resolves_through_the_fuzzy_pipeline() {
    // The registry has no record under the user's own (fixed) string, but the
    // fuzzy provider proposes a candidate whose cleaned string it recognizes.
    let registry = Arc::new(FakeRegistry::new().with_record(
        "HAVNEGATA 19",
        "0170",
        record("HAVNEGATA", 19, Some("A"), "0170"),
    ));
    let search = Arc::new(
        FakePropertySearch::new().with_results("HAVNEGATA 19A", &["HAVNEGATA 19A, 0170 OSLO"]),
    );

    let resolved = use_case(registry.clone(), search.clone())
        .resolve_location(&visiting("Havnegata 19 A", "0170"))
        .await
        .expect("waterfall should land on the fuzzy-verified record");

    assert_eq!(resolved.provenance, "3. visitingAddress: kartverket search");
    assert_eq!(resolved.address.street_name, "HAVNEGATA");
    assert_eq!(resolved.address.house_letter.as_deref(), Some("A"));

    // Verification invariant: the returned record is exactly what the
    // authoritative source serves for the verified road + postcode.
    let verified = registry.lookup("HAVNEGATA 19", "0170").await.unwrap();
    assert_eq!(verified, resolved.address);
}

#[tokio::test]
async fn success_at_the_first_strategy_invokes_nothing_else() {
    let registry = Arc::new(FakeRegistry::new().with_record(
        "HAVNEGATA 19A",
        "0170",
        record("HAVNEGATA", 19, Some("A"), "0170"),
    ));
    let search = Arc::new(FakePropertySearch::new());

    let resolved = use_case(registry.clone(), search.clone())
        .resolve_location(&visiting("Havnegata 19 A", "0170"))
        .await
        .unwrap();

    assert_eq!(resolved.provenance, "1. visitingAddress: kartverket lookup");
    assert_eq!(registry.call_count(), 1);
    assert_eq!(search.call_count(), 0);
}

#[tokio::test]
async fn unmatchable_input_returns_empty_without_error() {
    let registry = Arc::new(FakeRegistry::new());
    let search = Arc::new(FakePropertySearch::new());

    let location = LocationObject {
        visiting_address: Some(LocationAddress {
            street: Some("Finnes Ikke-veien 99 X".to_string()),
            postcode: Some("0000".to_string()),
        }),
        postal_address: Some(LocationAddress {
            street: Some("Postboks 123".to_string()),
            postcode: Some("0001".to_string()),
        }),
    };

    let resolved = use_case(registry, search).resolve_location(&location).await;
    assert!(resolved.is_none());
}

#[tokio::test]
async fn resolution_is_idempotent_against_stable_providers() {
    let registry = Arc::new(FakeRegistry::new().with_record(
        "HAVNEGATA 19",
        "0170",
        record("HAVNEGATA", 19, Some("A"), "0170"),
    ));
    let search = Arc::new(
        FakePropertySearch::new().with_results("HAVNEGATA 19A", &["HAVNEGATA 19A, 0170 OSLO"]),
    );

    let use_case = use_case(registry, search);
    let location = visiting("Havnegata 19 A", "0170");

    let first = use_case.resolve_location(&location).await.unwrap();
    let second = use_case.resolve_location(&location).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(first.provenance, second.provenance);
}

#[tokio::test]
async fn batch_resolution_reports_per_record_outcomes() {
    let registry = Arc::new(FakeRegistry::new().with_record(
        "HAVNEGATA 19",
        "0170",
        record("HAVNEGATA", 19, None, "0170"),
    ));
    let search = Arc::new(FakePropertySearch::new());

    let locations = vec![
        visiting("Havnegata 19", "0170"),
        visiting("Ukjent vei 1", "9999"),
        LocationObject::default(),
    ];

    let results = use_case(registry, search).resolve_batch(&locations).await;
    assert_eq!(results.len(), 3);
    assert_eq!(
        results[0].as_ref().unwrap().provenance,
        "1. visitingAddress: kartverket lookup"
    );
    assert!(results[1].is_none());
    assert!(results[2].is_none());
}
