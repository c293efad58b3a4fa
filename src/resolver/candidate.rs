use crate::domain::AddressCandidate;
use crate::normalize;

/// A fuzzy-search candidate extended with the structured components parsed
/// out of its denormalized address string.
///
/// This is the intermediate stage between the property search and the final
/// authoritative verification: parsed, filtered, but not yet confirmed.
#[derive(Debug, Clone)]
pub struct ParsedCandidate {
    pub candidate: AddressCandidate,
    /// Road name plus numeric part, letter dropped; the cleaned string used
    /// for the verification lookup.
    pub road_name_and_number: String,
    pub road_name: String,
    pub road_number_and_letter: String,
    pub road_number: String,
    pub postcode: String,
}

impl ParsedCandidate {
    fn parse(candidate: &AddressCandidate) -> Self {
        let road_part = normalize::combined_road_part(&candidate.raw_address_string);
        let postcode = normalize::combined_postcode(&candidate.raw_address_string);

        let road_name = normalize::road_name(&road_part);
        let road_number_and_letter = normalize::road_number_and_letter(&road_part);
        let road_number = normalize::remove_letter_from_road_number(&road_number_and_letter);
        let road_name_and_number = if road_number.is_empty() {
            road_name.clone()
        } else {
            format!("{} {}", road_name, road_number)
        };

        Self {
            candidate: candidate.clone(),
            road_name_and_number,
            road_name,
            road_number_and_letter,
            road_number,
            postcode,
        }
    }
}

/// Parses every candidate and keeps the ones matching the searched road.
///
/// A candidate survives when its postcode equals the search postcode, its
/// road name equals the search road name case-insensitively, and its number
/// matches per the letter rule: an exact number+letter match always passes,
/// while a search without a letter also accepts any letter at the same
/// number. A search *with* a letter requires that exact letter. Provider
/// order is preserved; no I/O happens here.
pub fn filter_exact_matches(
    candidates: &[AddressCandidate],
    search_road: &str,
    search_postcode: &str,
) -> Vec<ParsedCandidate> {
    let search_name = normalize::road_name(search_road);
    let search_number_and_letter = normalize::road_number_and_letter(search_road);
    let search_number = normalize::remove_letter_from_road_number(&search_number_and_letter);
    let search_has_letter = search_number_and_letter != search_number;

    candidates
        .iter()
        .map(ParsedCandidate::parse)
        .filter(|parsed| {
            parsed.postcode == search_postcode
                && parsed.road_name.eq_ignore_ascii_case(&search_name)
                && (parsed.road_number_and_letter == search_number_and_letter
                    || (!search_has_letter && parsed.road_number == search_number))
        })
        .collect()
}
