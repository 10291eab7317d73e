//! Orchestration of one verified-claims mapping.
//!
//! [`VerifiedClaimsMapper`] ties the pieces together for a single token or
//! userinfo response: parse the relying party's claims parameter, select
//! the endpoint's request fragment, fetch the user's stored record from the
//! configured source, run the extraction engine and shape the surviving
//! candidates for embedding under `verified_claims`.

use assura_claims::constants::VERIFIED_CLAIMS;
use assura_claims::{Value, assert_claims_not_empty, extract};
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::endpoint::Endpoint;
use crate::error::{MapperError, MapperResult};
use crate::source::ClaimsSource;

/// Maps a relying party's verified-claims request onto one user's stored
/// claims, producing the value to embed under `verified_claims`.
pub struct VerifiedClaimsMapper<S> {
    source: S,
}

impl<S: ClaimsSource> VerifiedClaimsMapper<S> {
    /// Create a mapper over the configured claims source
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Map the claims request for one token.
    ///
    /// `claims_parameter` is the raw `claims` request parameter as received
    /// from the relying party, if any. The returned value is the object (or
    /// list of objects, when several candidates survive) to embed under
    /// `verified_claims`; `None` means there is nothing to add, which is a
    /// normal outcome. The only hard failure is a requested `claims`
    /// sub-element that is present but empty, which must abort token
    /// issuance with an `invalid_request` response.
    pub async fn map_verified_claims(
        &self,
        claims_parameter: Option<&str>,
        endpoint: Endpoint,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> MapperResult<Option<Value>> {
        let Some(raw) = claims_parameter else {
            debug!("The requested claims are empty");
            return Ok(None);
        };

        let requested = match Value::from_json_str(raw) {
            Ok(requested) => requested,
            Err(error) => {
                warn!("The requested claims are not in a valid JSON format: {error}");
                return Ok(None);
            }
        };

        let Some(for_endpoint) = requested.get(endpoint.key()) else {
            debug!("No claims were requested for {} tokens", endpoint.key());
            return Ok(None);
        };

        let Some(requested_verified) = for_endpoint.get(VERIFIED_CLAIMS) else {
            debug!("No verified claims were requested");
            return Ok(None);
        };

        assert_claims_not_empty(requested_verified)
            .map_err(|error| MapperError::InvalidRequest(error.to_string()))?;

        let record = match self.source.verified_claims(user_id).await {
            Ok(record) => record,
            Err(error) => {
                warn!("Could not retrieve the user's verified claims: {error}");
                None
            }
        };

        let Some(user_verified) = record.as_ref().and_then(|record| record.get(VERIFIED_CLAIMS))
        else {
            debug!("The user's verified claims could not be found");
            return Ok(None);
        };

        let mut extracted = extract(requested_verified, user_verified, now);

        match extracted.len() {
            0 => {
                warn!("The current user does not have any verified claims that match the request");
                Ok(None)
            }
            1 => Ok(extracted.pop()),
            _ => Ok(Some(Value::Array(extracted))),
        }
    }
}
