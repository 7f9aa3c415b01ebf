//! CoT event → document conversion (§4.6 `xml_to_document`'s non-XML half).
//!
//! Grounded on `to_ditto.rs::cot_to_document`/`transform_*_event`, rebuilt
//! against [`classify`] and [`build_header`] instead of the teacher's ad-hoc
//! `.contains()` dispatch and hand-filled-in-place struct literals. Detail is
//! carried through [`to_stable_key_map`] (§4.3c), giving every document the
//! CRDT-safe encoding rather than the plain array form.

use crate::classifier::{classify, DocumentKind};
use crate::cot_events::Event;
use crate::detail;
use crate::document::{Api, Chat, Document, File, Generic, MapItem, RValue};
use crate::error::ConversionError;
use crate::header::{build_header, CommonHeader};
use crate::policy::ConversionPolicy;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Reads a detail element's text content, whether it was encoded as a bare
/// string (no attributes) or as an object carrying a `_text` key (§4.3a).
fn detail_text(detail_map: &Map<String, Value>, tag: &str) -> Option<String> {
    match detail_map.get(tag)? {
        Value::String(s) => Some(s.clone()),
        Value::Object(m) => m.get("_text").and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
}

/// Reads a single attribute off a detail element.
fn detail_attr(detail_map: &Map<String, Value>, tag: &str, attr: &str) -> Option<String> {
    detail_map.get(tag)?.get(attr)?.as_str().map(str::to_string)
}

fn r_map(event: &Event) -> HashMap<String, RValue> {
    let stable = detail::to_stable_key_map(&event.uid, &event.detail);
    stable
        .into_iter()
        .map(|(k, v)| (k, RValue::from(v)))
        .collect()
}

/// Converts a parsed [`Event`] into the appropriate [`Document`] variant,
/// using the type classifier (§4.4) to choose one.
pub fn cot_to_document(
    event: &Event,
    peer_key: &str,
    policy: ConversionPolicy,
) -> Result<Document, ConversionError> {
    let detail_map = detail::to_map(&event.detail);
    let header = build_header(event, &detail_map, peer_key, policy)?;
    let r = r_map(event);

    Ok(match classify(&event.event_type) {
        DocumentKind::MapItem => Document::MapItem(map_item_from(&header, r)),
        DocumentKind::Chat => Document::Chat(chat_from(&header, r, &detail_map)),
        DocumentKind::File => Document::File(file_from(&header, r, &detail_map)),
        DocumentKind::Api => Document::Api(api_from(&header, r)),
        DocumentKind::Generic => Document::Generic(generic_from(&header, r)),
    })
}

fn map_item_from(h: &CommonHeader, r: HashMap<String, RValue>) -> MapItem {
    MapItem {
        id: h.id.clone(),
        counter: h.counter,
        version: h.version,
        removed: h.removed,
        a: h.peer_key.clone(),
        b: h.time_ms,
        d: h.uid_dup.clone(),
        e: h.callsign.clone(),
        g: h.cot_version.clone(),
        h: h.ce,
        i: h.hae,
        j: h.lat,
        k: h.le,
        l: h.lon,
        n: h.start_us,
        o: h.stale_us,
        p: h.how.clone(),
        w: h.cot_type.clone(),
        r,
    }
}

fn chat_from(h: &CommonHeader, r: HashMap<String, RValue>, detail_map: &Map<String, Value>) -> Chat {
    Chat {
        id: h.id.clone(),
        counter: h.counter,
        version: h.version,
        removed: h.removed,
        a: h.peer_key.clone(),
        b: h.time_ms,
        d: h.uid_dup.clone(),
        e: h.callsign.clone(),
        g: h.cot_version.clone(),
        h: h.ce,
        i: h.hae,
        j: h.lat,
        k: h.le,
        l: h.lon,
        n: h.start_us,
        o: h.stale_us,
        p: h.how.clone(),
        w: h.cot_type.clone(),
        message: detail_text(detail_map, "remarks"),
        room: detail_attr(detail_map, "__chat", "chatroom"),
        r,
    }
}

fn file_from(h: &CommonHeader, r: HashMap<String, RValue>, detail_map: &Map<String, Value>) -> File {
    File {
        id: h.id.clone(),
        counter: h.counter,
        version: h.version,
        removed: h.removed,
        a: h.peer_key.clone(),
        b: h.time_ms,
        d: h.uid_dup.clone(),
        e: h.callsign.clone(),
        g: h.cot_version.clone(),
        h: h.ce,
        i: h.hae,
        j: h.lat,
        k: h.le,
        l: h.lon,
        n: h.start_us,
        o: h.stale_us,
        p: h.how.clone(),
        w: h.cot_type.clone(),
        file: detail_attr(detail_map, "fileshare", "filename"),
        sz: detail_attr(detail_map, "fileshare", "sizeInBytes").and_then(|s| s.parse::<f64>().ok()),
        mime: detail_attr(detail_map, "fileshare", "mimetype"),
        r,
    }
}

fn api_from(h: &CommonHeader, r: HashMap<String, RValue>) -> Api {
    Api {
        id: h.id.clone(),
        counter: h.counter,
        version: h.version,
        removed: h.removed,
        a: h.peer_key.clone(),
        b: h.time_ms,
        d: h.uid_dup.clone(),
        e: h.callsign.clone(),
        g: h.cot_version.clone(),
        h: h.ce,
        i: h.hae,
        j: h.lat,
        k: h.le,
        l: h.lon,
        n: h.start_us,
        o: h.stale_us,
        p: h.how.clone(),
        w: h.cot_type.clone(),
        r,
    }
}

fn generic_from(h: &CommonHeader, r: HashMap<String, RValue>) -> Generic {
    Generic {
        id: h.id.clone(),
        counter: h.counter,
        version: h.version,
        removed: h.removed,
        a: h.peer_key.clone(),
        b: h.time_ms,
        d: h.uid_dup.clone(),
        e: h.callsign.clone(),
        g: h.cot_version.clone(),
        h: h.ce,
        i: h.hae,
        j: h.lat,
        k: h.le,
        l: h.lon,
        n: h.start_us,
        o: h.stale_us,
        p: h.how.clone(),
        w: h.cot_type.clone(),
        r,
    }
}

/// The nested (non-flat) detail map, as plain JSON, independent of variant —
/// used by callers that want the detail tree without a typed `r` map.
pub fn detail_value_map(event: &Event) -> Value {
    Value::Object(detail::to_map(&event.detail))
}
