//! UK postcode detection in free-form address text.
//!
//! ## Grammar
//!
//! A postcode is either the special form `GIR 0AA` (case-insensitive) or
//! `<outward><sp?><inward>` where the outward code takes one of the four
//! standard shapes:
//!
//! ```text
//! A9    A99          single-letter area, one or two digits
//! AB9   AB99         two-letter area, one or two digits
//! A9C                single-letter area, digit + subdistrict letter
//! AB9   AB9C         two-letter area, digit + optional subdistrict letter
//! ```
//!
//! the second area letter is restricted to `A-H` / `J-Y` (no `I`, no `Z`),
//! at most one whitespace character separates the two halves, and the
//! inward code is exactly one digit followed by two letters.
//!
//! The pattern is applied as a *search* over the whole address string (the
//! code is usually a substring of a longer address) and the first match
//! wins; an address with two valid-looking codes contributes only the
//! first.
//!
//! ## Known bad source address
//!
//! Exactly one directory entry carries the malformed spacing `WN1 1 BH`,
//! which the grammar cannot match as a clean code. That literal substring
//! is checked independently of the grammar and forces the extracted value
//! to `WN1 1BH`, overriding whatever the grammar would have produced.

use std::sync::LazyLock;

use regex::Regex;

static POSTCODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        (
            [Gg][Ii][Rr]\ 0[Aa]{2}                  # special form GIR 0AA
            |
            (?:
                [A-Za-z][0-9]{1,2}                  # A9 / A99
                |
                [A-Za-z][A-Ha-hJ-Yj-y][0-9]{1,2}    # AB9 / AB99
                |
                [A-Za-z][0-9][A-Za-z]               # A9C
                |
                [A-Za-z][A-Ha-hJ-Yj-y][0-9][A-Za-z]? # AB9 / AB9C
            )
            \s?                                     # optional single separator
            [0-9][A-Za-z]{2}                        # inward: digit + two letters
        )",
    )
    .expect("valid regex")
});

/// The one malformed address substring the directory is known to contain.
const MALFORMED_WIGAN: &str = "WN1 1 BH";
const CORRECTED_WIGAN: &str = "WN1 1BH";

/// Extracts the first UK postcode embedded in `address`, or `None` when the
/// grammar finds no match. Absence of a match is a normal outcome, not an
/// error.
///
/// The override for the known malformed Wigan entry takes precedence over
/// the grammar result.
#[must_use]
pub fn extract_postcode(address: &str) -> Option<String> {
    if address.contains(MALFORMED_WIGAN) {
        return Some(CORRECTED_WIGAN.to_owned());
    }

    POSTCODE_RE
        .captures(address)
        .map(|caps| caps[1].to_owned())
}
