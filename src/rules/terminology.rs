// Medical terms writers commonly misspell, mapped to the accepted spelling
// Matched exactly and case-sensitively: "aesculapian" is flagged, "Aesculapian" is not

/// (misspelling, correction) pairs
pub const COMMON_MISSPELLINGS: &[(&str, &str)] = &[
    ("aesculapian", "Aesculapian"),
    ("arrythmia", "arrhythmia"),
    ("austeoarthritis", "osteoarthritis"),
    ("cardio-vascular", "cardiovascular"),
];

/// Look up the correction for an exact misspelling
#[cfg(test)]
fn correction_for(term: &str) -> Option<&'static str> {
    COMMON_MISSPELLINGS
        .iter()
        .find(|(misspelling, _)| *misspelling == term)
        .map(|(_, correction)| *correction)
}
