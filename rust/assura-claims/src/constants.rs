//! JSON key names fixed by the identity assurance schema

/// Key under which verified claims travel in requests, user records and
/// token payloads alike
pub const VERIFIED_CLAIMS: &str = "verified_claims";

/// Key of the claims sub-element of a `verified_claims` object
pub const CLAIMS: &str = "claims";

/// Key of the verification sub-element of a `verified_claims` object
pub const VERIFICATION: &str = "verification";

/// Exact-match filter key
pub const KEY_FILTER_VALUE: &str = "value";

/// Match-any-of filter key
pub const KEY_FILTER_VALUES: &str = "values";

/// Essential-presence filter key
pub const KEY_FILTER_ESSENTIAL: &str = "essential";

/// Maximum-age filter key, in seconds
pub const KEY_FILTER_MAX_AGE: &str = "max_age";

/// Descriptive purpose filter key. Recognized so that a field carrying only
/// `purpose` is still treated as a filter leaf, but never enforced.
pub const KEY_FILTER_PURPOSE: &str = "purpose";

/// Every key that marks a requested field as a filter leaf rather than a
/// nested structural request
pub const FILTER_KEYS: [&str; 5] = [
    KEY_FILTER_VALUE,
    KEY_FILTER_VALUES,
    KEY_FILTER_ESSENTIAL,
    KEY_FILTER_MAX_AGE,
    KEY_FILTER_PURPOSE,
];

/// Evidence fields the schema declares as repeatable. These are matched as
/// arrays on both the request and the data side even when written singular.
pub const REPEATABLE_KEYS: [&str; 5] = [
    "evidence",
    "evidence_ref",
    "check_details",
    "attachments",
    "assurance_details",
];
