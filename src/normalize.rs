//! Deterministic road-string transforms used by every resolution strategy.
//!
//! These are pure functions; they do no I/O and must behave identically on
//! repeated calls so resolutions stay reproducible. The quirks (first-match
//! space collapsing, single-letter validation) mirror the formatting the
//! authoritative registry itself applies, so they must not be "improved"
//! without checking against real registry data.

/// Uppercases and trims a road string, then collapses the space after the
/// first digit that is followed by a space: "Havnegata 19 A" → "HAVNEGATA 19A".
///
/// Only the first qualifying digit triggers the collapse; later occurrences
/// are left alone. Without a qualifying digit the string is returned with
/// case/trim applied only.
pub fn fix_road_name(road: &str) -> String {
    let road = road.trim().to_uppercase();

    let mut prev_was_digit = false;
    for (i, c) in road.char_indices() {
        if c == ' ' && prev_was_digit {
            let mut fixed = String::with_capacity(road.len() - 1);
            fixed.push_str(&road[..i]);
            fixed.push_str(&road[i + 1..]);
            return fixed;
        }
        prev_was_digit = c.is_ascii_digit();
    }
    road
}

/// The road-name part of a combined "name number" string.
pub fn road_name(full: &str) -> String {
    split_before_number(full).0.trim_end().to_string()
}

/// The validated number-and-letter part of a combined "name number" string.
///
/// The leading run of digits and hyphens is kept; exactly one following
/// character is kept as the letter suffix, while longer trailing garbage is
/// discarded entirely ("19JUST RUBBISH" → "19").
pub fn road_number_and_letter(full: &str) -> String {
    let token = split_before_number(full).1;
    let run_end = digit_run_end(token);
    let rest = &token[run_end..];
    if rest.chars().count() == 1 {
        token.to_string()
    } else {
        token[..run_end].to_string()
    }
}

/// Drops the letter suffix, keeping only the digit/hyphen run: "1-2A" → "1-2".
pub fn remove_letter_from_road_number(number_and_letter: &str) -> String {
    let run_end = digit_run_end(number_and_letter);
    number_and_letter[..run_end].to_string()
}

/// Recombines the name with the validated number-and-letter, or returns just
/// the name when no valid number was found.
pub fn correct_roadname_and_letter(full: &str) -> String {
    let name = road_name(full);
    let number_and_letter = road_number_and_letter(full);
    if number_and_letter.is_empty() {
        name
    } else {
        format!("{} {}", name, number_and_letter)
    }
}

/// Recombines the name with the number stripped of its letter. Falls back to
/// the original number-and-letter when stripping leaves nothing, and to the
/// name alone when there was no number at all.
pub fn remove_letter_from_roadname(full: &str) -> String {
    let name = road_name(full);
    let number_and_letter = road_number_and_letter(full);
    if number_and_letter.is_empty() {
        return name;
    }

    let number = remove_letter_from_road_number(&number_and_letter);
    if number.is_empty() {
        format!("{} {}", name, number_and_letter)
    } else {
        format!("{} {}", name, number)
    }
}

/// The road part of the fuzzy provider's denormalized
/// "Street Number, Postcode City" string: everything before the first comma.
pub fn combined_road_part(combined: &str) -> String {
    match combined.find(',') {
        Some(comma) => combined[..comma].trim().to_string(),
        None => combined.trim().to_string(),
    }
}

/// The postcode of a denormalized combined string: the first numeric run
/// after the first comma, or empty when there is no comma or no digits.
pub fn combined_postcode(combined: &str) -> String {
    let after_comma = match combined.find(',') {
        Some(comma) => &combined[comma + 1..],
        None => return String::new(),
    };
    match after_comma.find(|c: char| c.is_ascii_digit()) {
        Some(start) => after_comma[start..]
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect(),
        None => String::new(),
    }
}

/// Splits a road string into its name part and number token.
///
/// The split point is the last space preceding the first digit, so garbage
/// containing spaces after the number stays inside the number token (where
/// validation discards it). Digit-free strings split at the last space, and
/// strings without a usable split are all name.
fn split_before_number(full: &str) -> (&str, &str) {
    let split = match full.find(|c: char| c.is_ascii_digit()) {
        Some(digit_pos) => full[..digit_pos].rfind(' '),
        None => full.rfind(' '),
    };
    match split {
        Some(space) => (&full[..space], &full[space + 1..]),
        None => (full, ""),
    }
}

/// Byte length of the leading run of digits and hyphens.
fn digit_run_end(token: &str) -> usize {
    token
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit() && *c != '-')
        .map(|(i, _)| i)
        .unwrap_or(token.len())
}
