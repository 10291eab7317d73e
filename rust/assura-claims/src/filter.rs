//! Per-field filter directives and their evaluation.
//!
//! A requested field whose value is an object containing any of the
//! recognized filter keys is a filter leaf. [`ClaimFilter::from_fields`]
//! recognizes such leaves and [`ClaimFilter::evaluate`] decides whether a
//! candidate user value satisfies them.

use chrono::{DateTime, Utc};

use crate::constants::{
    KEY_FILTER_ESSENTIAL, KEY_FILTER_MAX_AGE, KEY_FILTER_PURPOSE, KEY_FILTER_VALUE,
    KEY_FILTER_VALUES,
};
use crate::recency::is_recent_enough;
use crate::value::{Fields, Value};

/// The filter directives attached to a single requested field
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClaimFilter {
    /// Exact-match requirement
    pub value: Option<Value>,
    /// Match-any-of requirement
    pub values: Option<Vec<Value>>,
    /// When true, the field must be present and non-null
    pub essential: bool,
    /// Maximum age of the field's timestamp value, in seconds
    pub max_age: Option<f64>,
    /// Why the relying party wants this field. Carried through the model but
    /// never enforced; the identity assurance source leaves its semantics
    /// open. Known limitation.
    pub purpose: Option<String>,
}

/// The verdict of evaluating a [`ClaimFilter`] against a candidate value
#[derive(Debug, Clone, PartialEq)]
pub enum FilterOutcome {
    /// The filter holds. Carries the user's actual value to emit for the
    /// field, or `None` when the field is simply absent and may be omitted
    /// without disqualifying the candidate.
    Accept(Option<Value>),
    /// The filter fails; the whole candidate claim set is disqualified
    Reject,
}

impl ClaimFilter {
    /// Read the filter directives out of a requested field's object value.
    /// Returns `None` when no recognized filter key is present, in which
    /// case the object is a nested structural request instead.
    pub fn from_fields(fields: &Fields) -> Option<Self> {
        let recognized = fields.contains_key(KEY_FILTER_VALUE)
            || fields.contains_key(KEY_FILTER_VALUES)
            || fields.contains_key(KEY_FILTER_ESSENTIAL)
            || fields.contains_key(KEY_FILTER_MAX_AGE)
            || fields.contains_key(KEY_FILTER_PURPOSE);

        if !recognized {
            return None;
        }

        Some(ClaimFilter {
            value: fields.get(KEY_FILTER_VALUE).cloned(),
            values: fields.get(KEY_FILTER_VALUES).map(|list| match list {
                Value::Array(items) => items.clone(),
                other => vec![other.clone()],
            }),
            essential: matches!(
                fields.get(KEY_FILTER_ESSENTIAL),
                Some(Value::Boolean(true))
            ),
            max_age: fields.get(KEY_FILTER_MAX_AGE).and_then(Value::as_f64),
            purpose: fields
                .get(KEY_FILTER_PURPOSE)
                .and_then(Value::as_str)
                .map(str::to_string),
        })
    }

    /// Evaluate this filter against the candidate value of the requested
    /// field, if any. Rules apply in a fixed order; the first failing rule
    /// rejects. `purpose` is never consulted.
    pub fn evaluate(&self, actual: Option<&Value>, now: DateTime<Utc>) -> FilterOutcome {
        let present = actual.filter(|value| !value.is_null());

        if self.essential && present.is_none() {
            return FilterOutcome::Reject;
        }

        if let Some(expected) = &self.value {
            if actual != Some(expected) {
                return FilterOutcome::Reject;
            }
        }

        if let Some(allowed) = &self.values {
            let matched = actual.is_some_and(|value| allowed.contains(value));
            if !matched {
                return FilterOutcome::Reject;
            }
        }

        if let Some(max_age) = self.max_age {
            let recent = present.is_some_and(|value| is_recent_enough(value, max_age, now));
            if !recent {
                return FilterOutcome::Reject;
            }
        }

        FilterOutcome::Accept(present.cloned())
    }
}
