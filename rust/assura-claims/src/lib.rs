//! Verified-claims extraction engine.
//!
//! Extracts, from a user's stored verified claims (per the OpenID Connect
//! for Identity Assurance model), exactly the subset that satisfies a
//! relying party's claims request, enforcing the request's filter semantics
//! (`value`, `values`, `essential`, `max_age`) and discarding everything
//! that does not match or resolves to empty.
//!
//! The engine is a pure function of its inputs plus a wall-clock instant
//! captured once per extraction; it holds no state across calls and
//! performs no I/O. Schema validation of the request and data shapes is the
//! caller's concern.

#![warn(missing_docs)]

/// JSON key names fixed by the identity assurance schema.
pub mod constants;
/// Error types for the claims engine.
pub mod error;
/// Recursive structural matching of a request against user data.
pub mod extract;
/// Per-field filter directives and their evaluation.
pub mod filter;
/// Fixed-point pruning of extraction results.
pub mod prune;
/// Recency evaluation for `max_age` filters.
pub mod recency;
/// Structural checks on requested verified claims.
pub mod request;
/// The JSON-like value model used on both sides of an extraction.
pub mod value;

pub use error::{ClaimsError, ClaimsResult};
pub use extract::extract;
pub use filter::{ClaimFilter, FilterOutcome};
pub use prune::{is_empty_result, prune};
pub use recency::{is_recent_enough, parse_instant};
pub use request::assert_claims_not_empty;
pub use value::{Fields, Value};
