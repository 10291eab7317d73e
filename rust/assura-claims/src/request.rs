//! Structural checks on requested verified claims that precede extraction.

use crate::Value;
use crate::constants::CLAIMS;
use crate::error::{ClaimsError, ClaimsResult};

/// Assert that no requested `verified_claims` object (or array element)
/// carries a `claims` sub-element that is present but empty.
///
/// This is the one anomaly that does not degrade to an empty result: the
/// request schema forbids an empty `claims` object, and token issuance must
/// abort with an `invalid_request` response when one is seen.
pub fn assert_claims_not_empty(requested: &Value) -> ClaimsResult<()> {
    if let Value::Array(elements) = requested {
        for element in elements {
            assert_claims_not_empty(element)?;
        }
        return Ok(());
    }

    match requested.get(CLAIMS) {
        Some(Value::Object(fields)) if fields.is_empty() => Err(ClaimsError::EmptyClaimsElement),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value;

    #[test]
    fn it_accepts_requests_without_a_claims_element() {
        assert!(assert_claims_not_empty(&value!({"verification": {"trust_framework": null}})).is_ok());
    }

    #[test]
    fn it_accepts_populated_claims() {
        assert!(assert_claims_not_empty(&value!({"claims": {"given_name": null}})).is_ok());
    }

    #[test]
    fn it_rejects_an_empty_claims_element() {
        assert_eq!(
            assert_claims_not_empty(&value!({"claims": {}})),
            Err(ClaimsError::EmptyClaimsElement)
        );
    }

    #[test]
    fn it_checks_every_array_element() {
        let requested = value!([
            {"claims": {"given_name": null}},
            {"claims": {}}
        ]);
        assert_eq!(
            assert_claims_not_empty(&requested),
            Err(ClaimsError::EmptyClaimsElement)
        );
    }

    #[test]
    fn it_ignores_a_null_claims_element() {
        assert!(assert_claims_not_empty(&value!({"claims": null})).is_ok());
    }
}
