//! Observer-context document conversion utilities (§4.6, §7 "observer
//! resilience", §8 property 8).
//!
//! Grounded on the teacher's file of the same name (`observer_json_to_cot_document`,
//! `get_document_id_from_value`, `get_document_type_from_value`), rebuilt
//! against [`Document::from_flat_json`] instead of a typed `CotDocument` with
//! its own `from_json_str`. The defining difference from the fallible
//! `Document::from_flat_json`: [`observer_map_to_typed`] never raises, because
//! an observer callback has nowhere to route an error — it falls back to a
//! [`Generic`] document carrying whatever headers were recognized.

use crate::classifier::classify;
use crate::document::{Document, Generic, RValue};
use serde_json::Value;
use std::collections::HashMap;

/// Converts a flat document map/JSON value (as received from a store observer
/// callback) into a typed [`Document`]. Never raises: on any failure to parse
/// or deserialize, returns a [`Generic`] document built from whatever header
/// fields could be read directly off the input, per §4.6's observer-resilience
/// requirement.
pub fn observer_map_to_typed(value: &Value) -> Document {
    Document::from_flat_json(value).unwrap_or_else(|e| {
        log::warn!("observer_map_to_typed: falling back to Generic: {e}");
        Document::Generic(generic_from_whatever_is_present(value))
    })
}

fn generic_from_whatever_is_present(value: &Value) -> Generic {
    let s = |key: &str| value.get(key).and_then(Value::as_str).unwrap_or_default().to_string();
    let n = |key: &str| value.get(key).and_then(Value::as_i64).unwrap_or(0);
    let f = |key: &str| value.get(key).and_then(Value::as_f64).unwrap_or(0.0);
    let b = |key: &str| value.get(key).and_then(Value::as_bool).unwrap_or(false);
    let r: HashMap<String, RValue> = value
        .as_object()
        .map(|obj| {
            obj.iter()
                .filter_map(|(k, v)| {
                    k.strip_prefix("r_")
                        .map(|name| (name.to_string(), RValue::from(v.clone())))
                })
                .collect()
        })
        .unwrap_or_default();

    Generic {
        id: s("_id"),
        counter: n("_c"),
        version: n("_v"),
        removed: b("_r"),
        a: s("a"),
        b: n("b"),
        d: s("d"),
        e: s("e"),
        g: s("g"),
        h: f("h"),
        i: f("i"),
        j: f("j"),
        k: f("k"),
        l: f("l"),
        n: n("n"),
        o: n("o"),
        p: s("p"),
        w: s("w"),
        r,
    }
}

/// Extracts the document ID (`_id`) from a flat document value, without a
/// full typed conversion. Useful in observer callbacks that only need to log
/// or route by ID.
pub fn document_id_of(value: &Value) -> Option<String> {
    value.get("_id").and_then(Value::as_str).map(str::to_string)
}

/// Extracts the CoT type discriminator (`w`) from a flat document value.
pub fn document_type_of(value: &Value) -> Option<String> {
    value.get("w").and_then(Value::as_str).map(str::to_string)
}

/// Classifies a flat document value's `w` field without deserializing the
/// whole document — useful for routing observer callbacks before paying the
/// cost of a full [`observer_map_to_typed`] conversion.
pub fn document_kind_of(value: &Value) -> crate::classifier::DocumentKind {
    classify(document_type_of(value).as_deref().unwrap_or(""))
}
