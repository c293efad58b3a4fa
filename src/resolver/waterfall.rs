use std::sync::Arc;

use tracing::{debug, info};

use crate::app::ports::{AuthoritativeLookupPort, FuzzySearchPort};
use crate::domain::{LocationAddress, LocationObject, RegistryAddress, ResolvedAddress};
use crate::normalize;
use crate::resolver::candidate::filter_exact_matches;

/// Which side of the location record a strategy reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AddressSide {
    Visiting,
    Postal,
}

impl AddressSide {
    fn label(self) -> &'static str {
        match self {
            AddressSide::Visiting => "visitingAddress",
            AddressSide::Postal => "postalAddress",
        }
    }
}

/// How a strategy turns a street string into a verified record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tactic {
    /// Direct exact-match lookup on the fixed street.
    RegistryLookup,
    /// Fuzzy search on the fixed street, then verify surviving candidates.
    PropertySearch,
    /// Fuzzy search on the corrected street, when correction changes it.
    PropertySearchCorrected,
    /// Fuzzy search on the street with its letter dropped, when that changes it.
    PropertySearchWithoutLetter,
}

impl Tactic {
    fn label(self) -> &'static str {
        match self {
            Tactic::RegistryLookup => "kartverket lookup",
            Tactic::PropertySearch => "kartverket search",
            Tactic::PropertySearchCorrected => "kartverket search, corrected street",
            Tactic::PropertySearchWithoutLetter => "kartverket search, street without letter",
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Strategy {
    number: u8,
    side: AddressSide,
    tactic: Tactic,
}

/// The fallback waterfall. Exact user input is trusted first, then the fuzzy
/// provider compensates for formatting drift, then the input text itself is
/// repaired before retrying. The visiting address is preferred over the
/// postal address at every tier.
const STRATEGIES: [Strategy; 8] = [
    Strategy { number: 1, side: AddressSide::Visiting, tactic: Tactic::RegistryLookup },
    Strategy { number: 2, side: AddressSide::Postal, tactic: Tactic::RegistryLookup },
    Strategy { number: 3, side: AddressSide::Visiting, tactic: Tactic::PropertySearch },
    Strategy { number: 4, side: AddressSide::Postal, tactic: Tactic::PropertySearch },
    Strategy { number: 5, side: AddressSide::Visiting, tactic: Tactic::PropertySearchCorrected },
    Strategy { number: 6, side: AddressSide::Visiting, tactic: Tactic::PropertySearchWithoutLetter },
    Strategy { number: 7, side: AddressSide::Postal, tactic: Tactic::PropertySearchCorrected },
    Strategy { number: 8, side: AddressSide::Postal, tactic: Tactic::PropertySearchWithoutLetter },
];

/// Resolves a location record to a single registry-verified address.
///
/// Strategies run strictly in order and the first verified record wins; a
/// miss or fault at any step only moves the waterfall along. All-miss is a
/// normal outcome and returns None.
pub struct AddressResolver {
    registry: Arc<dyn AuthoritativeLookupPort>,
    property_search: Arc<dyn FuzzySearchPort>,
}

impl AddressResolver {
    pub fn new(
        registry: Arc<dyn AuthoritativeLookupPort>,
        property_search: Arc<dyn FuzzySearchPort>,
    ) -> Self {
        Self {
            registry,
            property_search,
        }
    }

    pub async fn resolve(&self, location: &LocationObject) -> Option<ResolvedAddress> {
        for strategy in &STRATEGIES {
            let address = match strategy.side {
                AddressSide::Visiting => location.visiting_address.as_ref(),
                AddressSide::Postal => location.postal_address.as_ref(),
            };
            let address = match address {
                Some(address) if !address.street().is_empty() => address,
                _ => continue,
            };

            if let Some(found) = self.attempt(strategy, address).await {
                let provenance = format!(
                    "{}. {}: {}",
                    strategy.number,
                    strategy.side.label(),
                    strategy.tactic.label()
                );
                debug!(provenance = %provenance, "strategy produced a verified address");
                return Some(ResolvedAddress {
                    address: found,
                    provenance,
                });
            }
            debug!(strategy = strategy.number, "strategy missed");
        }

        info!("no strategy produced a verified address");
        None
    }

    async fn attempt(
        &self,
        strategy: &Strategy,
        address: &LocationAddress,
    ) -> Option<RegistryAddress> {
        let fixed = normalize::fix_road_name(address.street());
        let postcode = address.postcode();

        match strategy.tactic {
            Tactic::RegistryLookup => self.registry.lookup(&fixed, postcode).await,
            Tactic::PropertySearch => self.search_and_verify(&fixed, postcode).await,
            Tactic::PropertySearchCorrected => {
                let corrected = normalize::correct_roadname_and_letter(&fixed);
                if corrected.eq_ignore_ascii_case(&fixed) {
                    // Repair changed nothing; retrying would duplicate work
                    return None;
                }
                self.search_and_verify(&corrected, postcode).await
            }
            Tactic::PropertySearchWithoutLetter => {
                let stripped = normalize::remove_letter_from_roadname(&fixed);
                if stripped.eq_ignore_ascii_case(&fixed) {
                    return None;
                }
                self.search_and_verify(&stripped, postcode).await
            }
        }
    }

    /// The fuzzy-then-verify pipeline: search, filter to exact matches, then
    /// re-verify each surviving candidate in provider order against the
    /// registry using its cleaned road string. Fuzzy output itself is never
    /// returned.
    async fn search_and_verify(&self, road: &str, postcode: &str) -> Option<RegistryAddress> {
        let candidates = self.property_search.search(road).await;
        let matches = filter_exact_matches(&candidates, road, postcode);
        debug!(
            road,
            postcode,
            candidates = candidates.len(),
            matches = matches.len(),
            "filtered property search candidates"
        );

        for parsed in matches {
            if let Some(found) = self
                .registry
                .lookup(&parsed.road_name_and_number, &parsed.postcode)
                .await
            {
                return Some(found);
            }
        }
        None
    }
}
