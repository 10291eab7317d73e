//! Recursive structural matching of a claims request against user data.
//!
//! [`extract`] walks a requested `verified_claims` fragment and a user's
//! stored `verified_claims` fragment together and produces every filtered
//! result tree that satisfies the request. Multiple results arise when
//! either side is a list: an array-valued request means "any of these
//! evidence frameworks" and an array-valued user record means "any of these
//! independently verified claim sets". Candidates are pruned before they are
//! returned and empty ones are dropped.

use chrono::{DateTime, Utc};

use crate::constants::REPEATABLE_KEYS;
use crate::filter::{ClaimFilter, FilterOutcome};
use crate::prune::{is_empty_result, prune};
use crate::value::{Fields, Value};

/// Extract every non-empty filtered result for `request` from `data`.
///
/// `now` is captured once by the caller so that all recency checks within a
/// single extraction observe the same instant. Result order follows
/// discovery order: the request-array outer loop before the data-array
/// inner loop.
pub fn extract(request: &Value, data: &Value, now: DateTime<Utc>) -> Vec<Value> {
    let mut results = Vec::new();
    collect(request, data, now, &mut results);
    results
}

fn collect(request: &Value, data: &Value, now: DateTime<Utc>, results: &mut Vec<Value>) {
    // A request array fans out over the original, unreduced data; a data
    // array fans the request out over each claim set. Both concatenate.
    if let Value::Array(requests) = request {
        for requested in requests {
            collect(requested, data, now, results);
        }
        return;
    }

    if let Value::Array(sets) = data {
        for set in sets {
            collect(request, set, now, results);
        }
        return;
    }

    if let Some(candidate) = match_set(request, data, now) {
        let candidate = prune(candidate);
        if !is_empty_result(&candidate) {
            results.push(candidate);
        }
    }
}

/// Match one request object against one candidate claim set.
///
/// Returns the extracted subtree, or `None` when any field hard-rejects:
/// a failing `essential`/`value`/`values`/`max_age` filter, or a
/// presence-only field that is absent, disqualifies the whole set rather
/// than just the field.
fn match_set(request: &Value, data: &Value, now: DateTime<Utc>) -> Option<Value> {
    let requested_fields = match request {
        Value::Object(fields) => fields,
        // A scalar request leaf constrains by equality and emits the value
        scalar => return (scalar == data).then(|| data.clone()),
    };

    let mut extracted = Fields::with_capacity(requested_fields.len());

    for (name, requested) in requested_fields {
        let actual = data.get(name);

        if REPEATABLE_KEYS.contains(&name.as_str()) {
            let matched = match_repeatable(requested, actual, now)?;
            extracted.insert(name.clone(), matched);
            continue;
        }

        match requested {
            // Presence-only request: the mere act of naming the field
            // requires it to exist and be non-null
            Value::Null => match actual {
                Some(value) if !value.is_null() => {
                    extracted.insert(name.clone(), value.clone());
                }
                _ => return None,
            },

            Value::Object(fields) => match ClaimFilter::from_fields(fields) {
                Some(filter) => match filter.evaluate(actual, now) {
                    FilterOutcome::Accept(Some(value)) => {
                        extracted.insert(name.clone(), value);
                    }
                    // Satisfied but absent: omitted without disqualifying
                    FilterOutcome::Accept(None) => {}
                    FilterOutcome::Reject => return None,
                },
                None => {
                    let matched = match_branch(requested, actual, now)?;
                    extracted.insert(name.clone(), matched);
                }
            },

            // An array request outside the repeatable keys still matches
            // element by element
            Value::Array(_) => {
                let matched = match_repeatable(requested, actual, now)?;
                extracted.insert(name.clone(), matched);
            }

            scalar => {
                if actual != Some(scalar) {
                    return None;
                }
                extracted.insert(name.clone(), scalar.clone());
            }
        }
    }

    Some(Value::Object(extracted))
}

/// Recurse into a nested structural request. Array-valued user data at a
/// nested branch is searched existentially: the first element the request
/// matches is emitted.
fn match_branch(request: &Value, actual: Option<&Value>, now: DateTime<Utc>) -> Option<Value> {
    match actual {
        Some(Value::Array(elements)) => elements
            .iter()
            .find_map(|element| match_set(request, element, now)),
        Some(value) => match_set(request, value, now),
        // Descend anyway so that essential and presence-only fields inside
        // the missing branch get their chance to hard-reject
        None => match_set(request, &Value::Null, now),
    }
}

/// Match a repeatable-evidence request against the corresponding user
/// field. Both sides are treated as arrays even when written singular.
/// Every requested element must accept at least one user element; the
/// matched user elements are emitted, deduplicated, in discovery order.
fn match_repeatable(
    requested: &Value,
    actual: Option<&Value>,
    now: DateTime<Utc>,
) -> Option<Value> {
    let requested_elements: Vec<&Value> = match requested {
        Value::Array(items) => items.iter().collect(),
        single => vec![single],
    };

    let user_elements: Vec<&Value> = match actual {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(single) => vec![single],
        None => Vec::new(),
    };

    let mut matched: Vec<Value> = Vec::new();

    for requested_element in requested_elements {
        let mut found = false;

        for user_element in &user_elements {
            let accepted = match requested_element {
                Value::Null => (!user_element.is_null()).then(|| (*user_element).clone()),
                _ => match_set(requested_element, *user_element, now),
            };

            if let Some(accepted) = accepted {
                found = true;
                if !matched.contains(&accepted) {
                    matched.push(accepted);
                }
            }
        }

        if !found {
            return None;
        }
    }

    Some(Value::Array(matched))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::value;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn it_fills_presence_only_requests() {
        let request = value!({
            "verification": {"trust_framework": null},
            "claims": {"given_name": null}
        });
        let data = value!({
            "verification": {"trust_framework": "eidas"},
            "claims": {"given_name": "Max", "family_name": "Meier"}
        });

        let results = extract(&request, &data, now());
        assert_eq!(
            results,
            vec![value!({
                "verification": {"trust_framework": "eidas"},
                "claims": {"given_name": "Max"}
            })]
        );
    }

    #[test]
    fn it_hard_rejects_absent_presence_only_fields() {
        let request = value!({"claims": {"birthdate": null}});
        let data = value!({"claims": {"given_name": "Max"}});
        assert!(extract(&request, &data, now()).is_empty());
    }

    #[test]
    fn it_omits_satisfied_but_absent_optional_fields() {
        let request = value!({
            "claims": {
                "given_name": null,
                "nickname": {"essential": false}
            }
        });
        let data = value!({"claims": {"given_name": "Max"}});
        assert_eq!(
            extract(&request, &data, now()),
            vec![value!({"claims": {"given_name": "Max"}})]
        );
    }

    #[test]
    fn it_tries_each_user_claim_set() {
        let request = value!({"verification": {"trust_framework": {"value": "de_aml"}}});
        let data = value!([
            {"verification": {"trust_framework": "eidas"}},
            {"verification": {"trust_framework": "de_aml"}}
        ]);

        let results = extract(&request, &data, now());
        assert_eq!(
            results,
            vec![value!({"verification": {"trust_framework": "de_aml"}})]
        );
    }

    #[test]
    fn it_fans_out_array_requests_over_unreduced_data() {
        let request = value!([
            {"verification": {"trust_framework": {"value": "eidas"}}},
            {"verification": {"trust_framework": {"value": "de_aml"}}}
        ]);
        let data = value!({"verification": {"trust_framework": "eidas"}});

        let results = extract(&request, &data, now());
        assert_eq!(
            results,
            vec![value!({"verification": {"trust_framework": "eidas"}})]
        );
    }

    #[test]
    fn it_matches_evidence_elements_existentially() {
        let request = value!({
            "verification": {
                "evidence": [{"type": {"value": "document"}, "method": null}]
            }
        });
        let data = value!({
            "verification": {
                "evidence": [
                    {"type": "electronic_record", "method": "data"},
                    {"type": "document", "method": "pipp"}
                ]
            }
        });

        let results = extract(&request, &data, now());
        assert_eq!(
            results,
            vec![value!({
                "verification": {
                    "evidence": [{"type": "document", "method": "pipp"}]
                }
            })]
        );
    }

    #[test]
    fn it_treats_singular_evidence_as_an_array() {
        let request = value!({"verification": {"evidence": {"type": null}}});
        let data = value!({"verification": {"evidence": {"type": "document"}}});

        let results = extract(&request, &data, now());
        assert_eq!(
            results,
            vec![value!({"verification": {"evidence": [{"type": "document"}]}})]
        );
    }

    #[test]
    fn it_rejects_when_a_requested_evidence_element_matches_nothing() {
        let request = value!({
            "verification": {
                "evidence": [
                    {"type": {"value": "document"}},
                    {"type": {"value": "electronic_record"}}
                ]
            }
        });
        let data = value!({
            "verification": {"evidence": [{"type": "document"}]}
        });

        assert!(extract(&request, &data, now()).is_empty());
    }

    #[test]
    fn it_rejects_the_whole_set_on_a_failing_filter() {
        // given_name matches but the trust_framework filter fails, so the
        // whole candidate is rejected rather than partially emitted
        let request = value!({
            "verification": {"trust_framework": {"value": "uk_tfida"}},
            "claims": {"given_name": null}
        });
        let data = value!({
            "verification": {"trust_framework": "eidas"},
            "claims": {"given_name": "Max"}
        });

        assert!(extract(&request, &data, now()).is_empty());
    }

    #[test]
    fn it_discards_candidates_that_prune_to_nothing() {
        let request = value!({"claims": {"nickname": {"essential": false}}});
        let data = value!({"claims": {"given_name": "Max"}});
        assert!(extract(&request, &data, now()).is_empty());
    }

    #[test]
    fn it_never_emits_unrequested_fields() {
        let request = value!({"claims": {"given_name": null}});
        let data = value!({
            "verification": {"trust_framework": "eidas"},
            "claims": {"given_name": "Max", "family_name": "Meier", "birthdate": "1956-01-28"}
        });

        let results = extract(&request, &data, now());
        assert_eq!(results, vec![value!({"claims": {"given_name": "Max"}})]);
    }

    #[test]
    fn it_rejects_missing_branches_with_required_leaves() {
        let request = value!({"verification": {"trust_framework": null}});
        let data = value!({"claims": {"given_name": "Max"}});
        assert!(extract(&request, &data, now()).is_empty());
    }
}
