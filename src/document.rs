//! The five document variants (§3, §4.4, GLOSSARY "Document variant").
//!
//! Hand-authored in the shape the teacher's `build.rs`/`typify` pipeline would
//! have generated: header fields match the top-level (non-`rust/`) repo's
//! `ditto/schema.rs::CommonFields`, and the per-variant typed `r` map follows
//! the `ApiRValue`/`ChatRValue`/... pattern already used throughout
//! `ditto/to_ditto.rs`/`ditto/transform_generic.rs`. No JSON schema source
//! exists in the retrieved pack to regenerate from (see DESIGN.md), so this
//! module is maintained by hand instead of by `build.rs`.

use crate::classifier::{classify, DocumentKind};
use crate::error::{ConversionError, CotError};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// A scalar leaf value in a variant's `r` detail map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum RValue {
    String(String),
    Bool(bool),
    Number(f64),
    Object(HashMap<String, Value>),
    Array(Vec<Value>),
    Null,
}

impl From<Value> for RValue {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => RValue::String(s),
            Value::Bool(b) => RValue::Bool(b),
            Value::Number(n) => RValue::Number(n.as_f64().unwrap_or(0.0)),
            Value::Object(m) => RValue::Object(m.into_iter().collect()),
            Value::Array(a) => RValue::Array(a),
            Value::Null => RValue::Null,
        }
    }
}

impl From<RValue> for Value {
    fn from(value: RValue) -> Self {
        match value {
            RValue::String(s) => Value::String(s),
            RValue::Bool(b) => Value::Bool(b),
            RValue::Number(n) => serde_json::Number::from_f64(n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            RValue::Object(m) => Value::Object(m.into_iter().collect()),
            RValue::Array(a) => Value::Array(a),
            RValue::Null => Value::Null,
        }
    }
}

macro_rules! common_header_fields {
    () => {
        #[serde(rename = "_id")]
        pub id: String,
        #[serde(rename = "_c")]
        pub counter: i64,
        #[serde(rename = "_v")]
        pub version: i64,
        #[serde(rename = "_r")]
        pub removed: bool,
        pub a: String,
        pub b: i64,
        pub d: String,
        pub e: String,
        pub g: String,
        pub h: f64,
        pub i: f64,
        pub j: f64,
        pub k: f64,
        pub l: f64,
        pub n: i64,
        pub o: i64,
        pub p: String,
        pub w: String,
        pub r: HashMap<String, RValue>,
    };
}

/// Map-item document: friendly/hostile/neutral position reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MapItem {
    common_header_fields!();
}

/// Chat document. `message`/`room` are populated from `remarks`/`__chat` in
/// detail (§4.5); both fall back to `None` when the source element is absent,
/// mirroring the teacher's `Chat::message`/`Chat::room` (`rust/src/ditto/to_ditto.rs`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Chat {
    common_header_fields!();
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub room: Option<String>,
}

/// File/attachment descriptor document. `file`/`sz`/`mime` are populated from
/// `fileshare` in detail (§4.5), matching the teacher's `File::file`/`sz`/`mime`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct File {
    common_header_fields!();
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub sz: Option<f64>,
    #[serde(default)]
    pub mime: Option<String>,
}

/// API/emergency/system document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Api {
    common_header_fields!();
}

/// Catch-all document for event types the classifier doesn't otherwise recognize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Generic {
    common_header_fields!();
}

/// `Document = MapItem | Chat | File | Api | Generic` (§9 "tagged sum type").
///
/// The teacher's `DittoDocument` enum has no `Generic` arm (falls back to
/// `File`); this enum adds one, per Open Question resolution E.5 in
/// SPEC_FULL.md. Serialized untagged on the wire; callers needing a
/// discriminator read `w` (the CoT type) rather than a Rust-level tag (§6:
/// "this field must not be emitted on the XML path").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Document {
    MapItem(MapItem),
    Chat(Chat),
    File(File),
    Api(Api),
    Generic(Generic),
}

impl Document {
    /// Projects the header shared by every variant.
    pub fn id(&self) -> &str {
        match self {
            Document::MapItem(d) => &d.id,
            Document::Chat(d) => &d.id,
            Document::File(d) => &d.id,
            Document::Api(d) => &d.id,
            Document::Generic(d) => &d.id,
        }
    }

    /// The CoT type discriminator (`w`).
    pub fn cot_type(&self) -> &str {
        match self {
            Document::MapItem(d) => &d.w,
            Document::Chat(d) => &d.w,
            Document::File(d) => &d.w,
            Document::Api(d) => &d.w,
            Document::Generic(d) => &d.w,
        }
    }

    /// The flattened `r_*` detail map, as typed `RValue`s.
    pub fn r(&self) -> &HashMap<String, RValue> {
        match self {
            Document::MapItem(d) => &d.r,
            Document::Chat(d) => &d.r,
            Document::File(d) => &d.r,
            Document::Api(d) => &d.r,
            Document::Generic(d) => &d.r,
        }
    }

    /// Serializes to the flat document JSON the store replicates (§6
    /// "Document JSON (flat)"): the nested `r` field this struct holds for
    /// Rust-level ergonomics is itself flattened into top-level `r_*` keys,
    /// matching `ditto/r_field_flattening.rs::flatten_document_r_field`'s
    /// behavior against the new [`crate::detail::flatten`].
    pub fn to_flat_json(&self) -> Result<Value, ConversionError> {
        let mut value = serde_json::to_value(self).map_err(CotError::from)?;
        if let Value::Object(obj) = &mut value {
            if let Some(Value::Object(r)) = obj.remove("r") {
                // `flatten` already emits keys with the `r_` prefix.
                obj.extend(crate::detail::flatten(&r));
            }
        }
        Ok(value)
    }

    /// Reconstructs a [`Document`] from the flat document JSON: collects
    /// `r_*` keys, unflattens them back into a nested `r` object, reads the
    /// `w` field to pick a variant via [`classify`], then deserializes.
    ///
    /// Fallible; callers in observer/reply contexts that must never raise
    /// should go through the façade's `observer_map_to_typed` instead, which
    /// falls back to [`Generic`] on any error here.
    pub fn from_flat_json(value: &Value) -> Result<Document, ConversionError> {
        let obj = value
            .as_object()
            .ok_or_else(|| ConversionError::Validation("document must be a JSON object".into()))?;

        let mut rest = Map::new();
        let mut r_flat = Map::new();
        for (k, v) in obj {
            if k.starts_with("r_") {
                r_flat.insert(k.clone(), v.clone());
            } else {
                rest.insert(k.clone(), v.clone());
            }
        }
        rest.insert("r".to_string(), Value::Object(crate::detail::unflatten(&r_flat)));

        let cot_type = rest.get("w").and_then(Value::as_str).unwrap_or("");
        let value = Value::Object(rest);
        let from_value = |v: Value| serde_json::from_value(v).map_err(CotError::from);
        Ok(match classify(cot_type) {
            DocumentKind::MapItem => Document::MapItem(from_value(value)?),
            DocumentKind::Chat => Document::Chat(from_value(value)?),
            DocumentKind::File => Document::File(from_value(value)?),
            DocumentKind::Api => Document::Api(from_value(value)?),
            DocumentKind::Generic => Document::Generic(from_value(value)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_map_item() -> Document {
        Document::MapItem(MapItem {
            id: "USER-1".to_string(),
            counter: 1,
            version: 2,
            removed: false,
            a: "peer-1".to_string(),
            b: 1_700_000_000_000,
            d: "USER-1".to_string(),
            e: "ALPHA-1".to_string(),
            g: "2.0".to_string(),
            h: 10.0,
            i: 150.0,
            j: 34.1,
            k: 5.0,
            l: -118.1,
            n: 1_700_000_000_000_000,
            o: 1_700_000_300_000_000,
            p: "h-g-i-g-o".to_string(),
            w: "a-f-G-U-C".to_string(),
            r: HashMap::from([(
                "contact".to_string(),
                RValue::Object(HashMap::from([(
                    "callsign".to_string(),
                    json!("ALPHA-1"),
                )])),
            )]),
        })
    }

    #[test]
    fn flattens_nested_r_into_top_level_keys() {
        let doc = sample_map_item();
        let flat = doc.to_flat_json().unwrap();
        let obj = flat.as_object().unwrap();
        assert_eq!(obj.get("r_contact_callsign"), Some(&json!("ALPHA-1")));
        assert!(!obj.contains_key("r"));
        assert_eq!(obj.get("w"), Some(&json!("a-f-G-U-C")));
    }

    #[test]
    fn round_trips_through_flat_json() {
        let doc = sample_map_item();
        let flat = doc.to_flat_json().unwrap();
        let back = Document::from_flat_json(&flat).unwrap();
        assert_eq!(back, doc);
    }
}
