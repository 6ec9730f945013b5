//! Binary-or-neutral matchers for the categorical preferences.
//!
//! Each matcher returns 0.5 when the patient expressed no preference,
//! 1.0 on a match and 0.0 otherwise.

pub const NEUTRAL_MATCH_SCORE: f64 = 0.5;

/// Trimmed preference, or `None` for missing/blank values
fn preference(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Unicode-aware case-insensitive equality ("Santo Niño" == "SANTO NIÑO")
fn same_name(candidate: &str, wanted_lower: &str) -> bool {
    candidate.trim().to_lowercase() == wanted_lower
}

#[inline]
fn binary(matched: bool) -> f64 {
    if matched { 1.0 } else { 0.0 }
}

/// Case-insensitive exact match against the therapist's specializations
pub fn match_specialization(specializations: &[String], preferred: Option<&str>) -> f64 {
    let Some(wanted) = preference(preferred) else {
        return NEUTRAL_MATCH_SCORE;
    };

    let wanted = wanted.to_lowercase();

    binary(specializations.iter().any(|s| same_name(s, &wanted)))
}

/// Case-insensitive substring match against treated conditions and the
/// free-text "other conditions" field
pub fn match_desired_service(
    conditions: &[String],
    other_conditions: Option<&str>,
    desired: Option<&str>,
) -> f64 {
    let Some(wanted) = preference(desired) else {
        return NEUTRAL_MATCH_SCORE;
    };
    let wanted = wanted.to_lowercase();

    let in_conditions = conditions
        .iter()
        .filter(|c| !c.trim().is_empty())
        .any(|c| c.to_lowercase().contains(&wanted));

    let in_other = other_conditions
        .map(|o| o.to_lowercase().contains(&wanted))
        .unwrap_or(false);

    binary(in_conditions || in_other)
}

/// Case-insensitive exact match against the barangays a therapist serves
pub fn match_service_area(service_areas: &[String], preferred_barangay: Option<&str>) -> f64 {
    let Some(wanted) = preference(preferred_barangay) else {
        return NEUTRAL_MATCH_SCORE;
    };

    let wanted = wanted.to_lowercase();

    binary(service_areas.iter().any(|a| same_name(a, &wanted)))
}
