//! Error types for the mapper and its claim sources

use assura_claims::ClaimsError;
use thiserror::Error;

/// Errors surfaced by [`crate::VerifiedClaimsMapper`]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MapperError {
    /// The request violated a mandatory schema invariant and the whole
    /// token-issuance flow must abort with an `invalid_request` response
    #[error("invalid_request: {0}")]
    InvalidRequest(String),

    /// The claims source was misconfigured
    #[error("Claims source configuration: {0}")]
    Configuration(String),
}

/// Result type for mapper operations
pub type MapperResult<T> = Result<T, MapperError>;

/// Failures while retrieving a user's verified claims from a source.
///
/// These never abort token issuance; the mapper logs them and proceeds as
/// if the user had no verified claims.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The remote store could not be reached
    #[error("Could not connect to the external claims store: {0}")]
    Connection(String),

    /// The store answered with something other than valid JSON
    #[error("The external claims store returned malformed JSON: {0}")]
    MalformedResponse(String),
}

impl From<ClaimsError> for SourceError {
    fn from(error: ClaimsError) -> Self {
        SourceError::MalformedResponse(error.to_string())
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(error: reqwest::Error) -> Self {
        SourceError::Connection(error.to_string())
    }
}
