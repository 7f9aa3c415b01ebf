//! A flat, caller-convenience view of an [`Event`](crate::cot_events::Event).
//!
//! Grounded on the teacher's `model.rs::FlatCotEvent`: a single struct with
//! typed numeric point fields and a generic `detail_extra` map, for callers
//! who want a flat Rust value rather than the structured `Event`/`Document`
//! types. Not part of the wire format; purely a convenience projection.

use crate::cot_events::Event;
use crate::detail;
use crate::header::extract_callsign;
use crate::policy::ConversionPolicy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Flattened, typed view of a CoT event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatEvent {
    pub uid: String,
    pub type_: String,
    pub time: String,
    pub start: String,
    pub stale: String,
    pub how: String,
    pub lat: f64,
    pub lon: f64,
    pub hae: f64,
    pub ce: f64,
    pub le: f64,
    pub callsign: Option<String>,
    pub group_name: Option<String>,
    pub detail_extra: HashMap<String, Value>,
}

impl FlatEvent {
    /// Projects an [`Event`] into its flat view under the given policy.
    pub fn from_event(event: &Event, policy: ConversionPolicy) -> Self {
        let map = detail::to_map(&event.detail);
        let (lat, lon, hae, ce, le) = event
            .point
            .as_ref()
            .map(|p| p.to_numeric(policy).unwrap_or((0.0, 0.0, 0.0, 0.0, 0.0)))
            .unwrap_or((0.0, 0.0, 0.0, 0.0, 0.0));
        let callsign = {
            let c = extract_callsign(&map, &event.uid);
            if c == event.uid {
                None
            } else {
                Some(c)
            }
        };
        let group_name = map
            .get("__group")
            .and_then(|v| v.get("name"))
            .and_then(Value::as_str)
            .map(|s| s.to_string());
        Self {
            uid: event.uid.clone(),
            type_: event.event_type.clone(),
            time: event.time.clone(),
            start: event.start.clone(),
            stale: event.stale.clone(),
            how: event.how.clone(),
            lat,
            lon,
            hae,
            ce,
            le,
            callsign,
            group_name,
            detail_extra: map.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projects_callsign_and_coordinates() {
        let event =
            Event::new_location_update("USER-1", "ALPHA-1", "Cyan", 34.1, -118.1, 150.0);
        let flat = FlatEvent::from_event(&event, ConversionPolicy::strict());
        assert_eq!(flat.callsign.as_deref(), Some("ALPHA-1"));
        assert_eq!(flat.lat, 34.1);
    }
}
