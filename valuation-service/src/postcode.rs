// UK postcode normalization, validation, and recovery.
//
// The canonical grammar is 1-2 letters, a digit (or "R" for the historic
// Girobank outcode), an optional digit-or-letter, a single space, then a
// digit and two letters. Input is case-insensitive; canonical form is
// upper-case with one internal space.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ValuationError;

static POSTCODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z]{1,2}[0-9R][0-9A-Z]? [0-9][A-Z]{2}$").expect("postcode pattern compiles")
});

/// Trim, upper-case, and collapse internal whitespace runs to a single
/// space. Always returns a string; the result may still be invalid.
pub fn normalize(raw: &str) -> String {
    raw.to_uppercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whether `pc` matches the canonical postcode grammar (case-insensitive).
pub fn is_valid(pc: &str) -> bool {
    POSTCODE.is_match(&pc.to_uppercase())
}

/// Attempt to recover a malformed postcode: strip everything that is not
/// alphanumeric, and if 5-7 characters remain, re-insert the space three
/// characters from the end. Returns the formatted string only if it then
/// passes [`is_valid`].
pub fn auto_format(raw: &str) -> Option<String> {
    let compact: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_uppercase();

    if !(5..=7).contains(&compact.len()) {
        return None;
    }

    let split = compact.len() - 3;
    let formatted = format!("{} {}", &compact[..split], &compact[split..]);
    is_valid(&formatted).then_some(formatted)
}

/// The outward segment of a validated postcode (everything before the
/// space). Falls back to the whole string if no space is present.
pub fn outcode(pc: &str) -> &str {
    pc.split(' ').next().unwrap_or(pc)
}

/// Recovery policy applied once per request: normalize and validate; on
/// failure, auto-format the *original raw* input; on that failure, reject.
pub fn resolve(raw: &str) -> Result<String, ValuationError> {
    let candidate = normalize(raw);
    if is_valid(&candidate) {
        return Ok(candidate);
    }
    auto_format(raw).ok_or_else(|| ValuationError::PostcodeFormat(raw.trim().to_string()))
}
