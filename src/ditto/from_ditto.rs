//! Document → CoT event reconstruction (§4.6 `document_to_xml`'s non-XML half).
//!
//! Grounded on `from_ditto.rs`/`from_ditto_util.rs`'s per-variant→`CotEvent`
//! functions, collapsed into one function operating on the common header
//! projection every [`Document`] variant exposes, since all five carry the
//! same header shape. Detail reconstruction failures are absorbed per §7
//! ("Detail reconstruction failures never corrupt the outer document"):
//! an unreconstructable `r` map yields an event with empty detail rather than
//! a propagated error.

use crate::cot_events::Event;
use crate::detail::{self, DetailElement};
use crate::document::{Document, RValue};
use crate::error::ConversionError;
use crate::point::Point;
use crate::policy::ConversionPolicy;
use crate::temporal;
use serde_json::{Map, Value};
use std::collections::HashMap;

fn r_to_map(r: &HashMap<String, RValue>) -> Map<String, Value> {
    r.iter()
        .map(|(k, v)| (k.clone(), Value::from(v.clone())))
        .collect()
}

fn detail_from_r(r: &HashMap<String, RValue>) -> Vec<DetailElement> {
    let map = r_to_map(r);
    match detail::from_stable_key_map(&map) {
        Ok(elements) => elements,
        Err(e) => {
            log::warn!("detail reconstruction failed, emitting empty detail: {e}");
            Vec::new()
        }
    }
}

struct HeaderFields {
    id: String,
    cot_type: String,
    how: String,
    time_ms: i64,
    start_us: i64,
    stale_us: i64,
    point: (f64, f64, f64, f64, f64),
}

fn header_fields(document: &Document) -> HeaderFields {
    macro_rules! from {
        ($d:expr) => {
            HeaderFields {
                id: $d.id.clone(),
                cot_type: $d.w.clone(),
                how: $d.p.clone(),
                time_ms: $d.b,
                start_us: $d.n,
                stale_us: $d.o,
                point: ($d.j, $d.l, $d.i, $d.h, $d.k),
            }
        };
    }
    match document {
        Document::MapItem(d) => from!(d),
        Document::Chat(d) => from!(d),
        Document::File(d) => from!(d),
        Document::Api(d) => from!(d),
        Document::Generic(d) => from!(d),
    }
}

/// Rebuilds a CoT [`Event`] from any [`Document`] variant.
pub fn document_to_event(document: &Document, policy: ConversionPolicy) -> Result<Event, ConversionError> {
    let header = header_fields(document);
    let (lat, lon, hae, ce, le) = header.point;

    Ok(Event {
        version: "2.0".to_string(),
        uid: header.id,
        event_type: header.cot_type,
        time: temporal::from_micros(header.time_ms * 1000, policy)?,
        start: temporal::from_micros(header.start_us, policy)?,
        stale: temporal::from_micros(header.stale_us, policy)?,
        how: header.how,
        point: Some(Point::from_numeric(lat, lon, hae, ce, le)),
        detail: detail_from_r(document.r()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ditto::to_ditto::cot_to_document;

    #[test]
    fn round_trips_map_item_header() {
        let event =
            Event::new_location_update("USER-1", "ALPHA-1", "Cyan", 34.1, -118.1, 150.0);
        let doc = cot_to_document(&event, "peer-1", ConversionPolicy::strict()).unwrap();
        let rebuilt = document_to_event(&doc, ConversionPolicy::strict()).unwrap();
        assert_eq!(rebuilt.uid, "USER-1");
        assert_eq!(rebuilt.event_type, "a-f-G-U-C");
        assert_eq!(rebuilt.point.unwrap().lat, "34.1");
    }

    #[test]
    fn detail_survives_a_round_trip() {
        let event =
            Event::new_location_update("USER-1", "ALPHA-1", "Cyan", 34.1, -118.1, 150.0);
        let doc = cot_to_document(&event, "peer-1", ConversionPolicy::strict()).unwrap();
        let rebuilt = document_to_event(&doc, ConversionPolicy::strict()).unwrap();
        assert!(rebuilt.detail.iter().any(|e| e.name == "contact"));
    }
}
