// Bedroom-count rent adjustment.
//
// Upstream rent averages are area-wide; the adjuster scales them by a fixed
// per-bedroom multiplier and explains the substitution in a note. Pure
// function, no I/O.

/// Multiplier applied to the area average for a given bedroom count.
/// Unrecognized counts fall back to 1.0 (the validator should prevent them
/// from reaching this point).
pub fn multiplier(bedrooms: u8) -> f64 {
    match bedrooms {
        1 => 0.8,
        2 => 1.0,
        3 => 1.3,
        4 => 1.6,
        _ => 1.0,
    }
}

/// Scale `base_rent` for `bedrooms`, rounding to the nearest whole pound.
/// Returns the adjusted figure plus the explanatory note attached to the
/// result whenever the shown figure differs from the raw upstream average.
pub fn adjust(base_rent: f64, bedrooms: u8) -> (i64, String) {
    let adjusted = (base_rent * multiplier(bedrooms)).round() as i64;
    let note = format!(
        "Estimated for a {bedrooms}-bedroom property from a local average of £{base_rent:.0} pcm."
    );
    (adjusted, note)
}
