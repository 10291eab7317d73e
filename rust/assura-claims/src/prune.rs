//! Fixed-point pruning of extraction results.
//!
//! Extraction leaves `null` placeholders and emptied containers behind for
//! every requested field that matched nothing. [`prune`] removes them until
//! nothing changes; a result that collapses to an empty object is discarded
//! by the caller rather than emitted as `{}`.

use crate::value::{Fields, Value};

/// Remove null leaves and empty containers from `value` until a fixed point
/// is reached.
pub fn prune(value: Value) -> Value {
    let mut current = value;
    loop {
        let (next, changed) = prune_pass(current);
        current = next;
        if !changed {
            return current;
        }
    }
}

/// True when a pruned result carries no claims at all and must be dropped
/// from the output set
pub fn is_empty_result(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
        _ => false,
    }
}

/// One pruning pass: removes children that are `null`, empty arrays or
/// empty objects, then recurses into what remains. Reports whether anything
/// was removed so [`prune`] can run to a fixed point.
fn prune_pass(value: Value) -> (Value, bool) {
    match value {
        Value::Object(fields) => {
            let mut changed = false;
            let mut kept = Fields::with_capacity(fields.len());
            for (name, child) in fields {
                if is_removable(&child) {
                    changed = true;
                    continue;
                }
                let (child, child_changed) = prune_pass(child);
                changed |= child_changed;
                kept.insert(name, child);
            }
            (Value::Object(kept), changed)
        }
        Value::Array(items) => {
            let mut changed = false;
            let mut kept = Vec::with_capacity(items.len());
            for child in items {
                if is_removable(&child) {
                    changed = true;
                    continue;
                }
                let (child, child_changed) = prune_pass(child);
                changed |= child_changed;
                kept.push(child);
            }
            (Value::Array(kept), changed)
        }
        scalar => (scalar, false),
    }
}

fn is_removable(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::value;

    #[test]
    fn it_removes_null_leaves() {
        let pruned = prune(value!({"a": null, "b": "kept"}));
        assert_eq!(pruned, value!({"b": "kept"}));
    }

    #[test]
    fn it_removes_empty_containers() {
        let pruned = prune(value!({"a": [], "b": {}, "c": false}));
        assert_eq!(pruned, value!({"c": false}));
    }

    #[test]
    fn it_cascades_to_a_fixed_point() {
        // The innermost null empties its object, which empties the array,
        // which empties the outer field
        let pruned = prune(value!({"outer": [{"inner": {"leaf": null}}], "kept": 1}));
        assert_eq!(pruned, value!({"kept": 1}));
    }

    #[test]
    fn it_is_idempotent() {
        let input = value!({
            "verification": {"trust_framework": "eidas", "evidence": [{"type": null}]},
            "claims": {"given_name": "Max", "noise": []}
        });
        let once = prune(input);
        let twice = prune(once.clone());
        assert_eq!(once, twice);
        assert_eq!(
            once,
            value!({
                "verification": {"trust_framework": "eidas"},
                "claims": {"given_name": "Max"}
            })
        );
    }

    #[test]
    fn it_keeps_false_and_zero() {
        let pruned = prune(value!({"a": false, "b": 0, "c": ""}));
        assert_eq!(pruned, value!({"a": false, "b": 0, "c": ""}));
    }

    #[test]
    fn it_flags_empty_results() {
        assert!(is_empty_result(&prune(value!({"a": {"b": null}}))));
        assert!(is_empty_result(&value!(null)));
        assert!(!is_empty_result(&value!({"a": 1})));
    }
}
