//! Nested map ↔ flat `r_*` key transform (§4.3b).
//!
//! Grounded on `ditto/r_field_flattening.rs::flatten_r_field`/`unflatten_r_field`.
//! The teacher's flatten only descends one level (a nested object value under an
//! attribute is inserted as-is, never flattened further); this implementation
//! recurses through every level of nested objects, joining each level with `_`,
//! per the explicit "deeper maps get further underscore-joined names
//! (`r_k_sub_attr`)" rule in §4.3b. Unflatten stays a single last-`_` split, so
//! the two are intentionally not full inverses beyond two levels of nesting —
//! see the "Known ambiguity" note in §4.3b and Open Question resolution E.1 in
//! SPEC_FULL.md. Arrays (duplicate siblings surviving below the top level, see
//! Open Question resolution E.2) are treated as opaque leaves, not recursed into.

use crate::error::DetailError;
use serde_json::{Map, Value};

const PREFIX: &str = "r_";

fn flatten_into(prefix: &str, value: &Value, out: &mut Map<String, Value>) {
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                let joined = format!("{prefix}_{k}");
                flatten_into(&joined, v, out);
            }
        }
        other => {
            out.insert(format!("{PREFIX}{prefix}"), other.clone());
        }
    }
}

/// Flattens a nested detail map (as produced by `detail::tree::to_map`, or by
/// `detail::stable_key::to_stable_key_map`) into single-level `r_*` keys.
pub fn flatten(detail: &Map<String, Value>) -> Map<String, Value> {
    let mut out = Map::new();
    for (k, v) in detail {
        match v {
            Value::Object(_) => flatten_into(k, v, &mut out),
            other => {
                out.insert(format!("{PREFIX}{k}"), other.clone());
            }
        }
    }
    out
}

/// Unflattens `r_*` keys back into a nested map. Splits each key on the last
/// `_` after stripping the `r_` prefix: everything before is `detailType`
/// (which may itself contain underscores), everything after is `attribute`.
/// A key with no further `_` becomes a scalar entry on `detailType` directly.
pub fn unflatten(flat: &Map<String, Value>) -> Map<String, Value> {
    let mut out = Map::new();
    for (key, value) in flat {
        let Some(rest) = key.strip_prefix(PREFIX) else {
            continue;
        };
        match rest.rfind('_') {
            Some(idx) => {
                let detail_type = &rest[..idx];
                let attribute = &rest[idx + 1..];
                if detail_type.is_empty() || attribute.is_empty() {
                    let err = DetailError::MalformedKey(key.clone());
                    log::warn!("{err}; skipping");
                    continue;
                }
                let entry = out
                    .entry(detail_type.to_string())
                    .or_insert_with(|| Value::Object(Map::new()));
                if let Value::Object(inner) = entry {
                    inner.insert(attribute.to_string(), value.clone());
                }
            }
            None => {
                out.insert(rest.to_string(), value.clone());
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flattens_simple_attribute() {
        let detail = json!({"contact": {"callsign": "Alpha1"}});
        let flat = flatten(detail.as_object().unwrap());
        assert_eq!(flat["r_contact_callsign"], json!("Alpha1"));
    }

    #[test]
    fn flattens_scalar_top_level() {
        let detail = json!({"bar": ""});
        let flat = flatten(detail.as_object().unwrap());
        assert_eq!(flat["r_bar"], json!(""));
    }

    #[test]
    fn preserves_leading_underscore_in_tag_name() {
        let detail = json!({"__group": {"name": "Cyan", "role": "Lead"}});
        let flat = flatten(detail.as_object().unwrap());
        assert_eq!(flat["r___group_name"], json!("Cyan"));
        assert_eq!(flat["r___group_role"], json!("Lead"));
    }

    #[test]
    fn unflatten_inverts_flatten_for_single_level_maps() {
        let detail = json!({"contact": {"callsign": "Alpha1"}, "bar": ""});
        let map = detail.as_object().unwrap().clone();
        let flat = flatten(&map);
        let back = unflatten(&flat);
        assert_eq!(back, map);
    }

    #[test]
    fn unflatten_splits_on_last_underscore() {
        let mut flat = Map::new();
        flat.insert("r___group_name".to_string(), json!("Cyan"));
        let back = unflatten(&flat);
        assert_eq!(back["__group"]["name"], json!("Cyan"));
    }

    #[test]
    fn unflatten_skips_key_with_empty_component() {
        let mut flat = Map::new();
        flat.insert("r_foo_".to_string(), json!("x"));
        flat.insert("r_contact_callsign".to_string(), json!("Alpha1"));
        let back = unflatten(&flat);
        assert!(!back.contains_key("foo"));
        assert_eq!(back["contact"]["callsign"], json!("Alpha1"));
    }
}
