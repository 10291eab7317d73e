//! Error types for the claims engine

use thiserror::Error;

/// Errors that can occur while preparing input for an extraction
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClaimsError {
    /// The raw input was not a valid JSON document (syntax error, trailing
    /// tokens or duplicate object keys)
    #[error("Malformed claims JSON: {message}")]
    MalformedJson { message: String },

    /// A requested `claims` sub-element was present but empty. The identity
    /// assurance request schema forbids this; token issuance must abort with
    /// an `invalid_request` response rather than degrade to an empty result.
    #[error("The claims sub-element isn't allowed to be empty")]
    EmptyClaimsElement,
}

/// Result type for claims engine operations
pub type ClaimsResult<T> = Result<T, ClaimsError>;
