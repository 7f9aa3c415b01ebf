//! Common header codec and callsign extraction (§4.5, §3 header field table).
//!
//! Grounded on the field assignments spread through `ditto/to_ditto.rs` and
//! `ditto/from_ditto.rs`, and on the top-level (non-`rust/`) repo's
//! `ditto/schema.rs::CommonFields` struct, the one place in the teacher pack
//! that names every header field together.
//!
//! Correction: the teacher maps point fields differently for `MapItem`
//! (`lat=j,lon=l,hae=i`, seen in both `from_ditto.rs` and
//! `from_ditto_util.rs`) than for the other four variants (`lat=h,lon=i,
//! hae=j`). Spec §3 states a single table (`h`=ce, `i`=hae, `j`=lat, `k`=le,
//! `l`=lon) with no variant exception, so this module applies it uniformly;
//! the teacher's MapItem-specific permutation is not carried forward.

use crate::cot_events::Event;
use crate::error::ConversionError;
use crate::policy::ConversionPolicy;
use crate::temporal;
use serde_json::{Map, Value};

/// The common header shared by every document variant (§3).
#[derive(Debug, Clone, PartialEq)]
pub struct CommonHeader {
    pub id: String,
    pub counter: i64,
    pub version: i64,
    pub removed: bool,
    pub peer_key: String,
    pub time_ms: i64,
    pub uid_dup: String,
    pub callsign: String,
    pub cot_version: String,
    pub ce: f64,
    pub hae: f64,
    pub lat: f64,
    pub le: f64,
    pub lon: f64,
    pub start_us: i64,
    pub stale_us: i64,
    pub how: String,
    pub cot_type: String,
}

/// Probes the nested detail map for a callsign, in the order §4.5 specifies,
/// falling back to `uid`.
pub fn extract_callsign(detail: &Map<String, Value>, uid: &str) -> String {
    let probe = |path: &[&str]| -> Option<String> {
        let mut cur = detail.get(*path.first()?)?;
        for key in &path[1..] {
            cur = cur.get(key)?;
        }
        cur.as_str().map(|s| s.to_string())
    };
    probe(&["__chat", "senderCallsign"])
        .or_else(|| probe(&["contact", "callsign"]))
        .or_else(|| probe(&["ditto", "deviceName"]))
        .unwrap_or_else(|| uid.to_string())
}

/// Builds the common header from a parsed event and detail map.
pub fn build_header(
    event: &Event,
    detail_map: &Map<String, Value>,
    peer_key: &str,
    policy: ConversionPolicy,
) -> Result<CommonHeader, ConversionError> {
    if event.uid.is_empty() {
        return Err(ConversionError::Validation("uid".to_string()));
    }
    if event.event_type.is_empty() {
        return Err(ConversionError::Validation("type".to_string()));
    }
    if event.time.is_empty() {
        return Err(ConversionError::Validation("time".to_string()));
    }

    let time = temporal::parse_iso8601("time", &event.time, policy)?;
    let start = temporal::parse_iso8601("start", &event.start, policy)?;
    let stale = temporal::parse_iso8601("stale", &event.stale, policy)?;

    let point = event.point.clone().unwrap_or_default();
    let (lat, lon, hae, ce, le) = point.to_numeric(policy)?;

    Ok(CommonHeader {
        id: event.uid.clone(),
        counter: 1,
        version: 2,
        removed: false,
        peer_key: peer_key.to_string(),
        time_ms: temporal::to_millis(time),
        uid_dup: event.uid.clone(),
        callsign: extract_callsign(detail_map, &event.uid),
        cot_version: "2.0".to_string(),
        ce,
        hae,
        lat,
        le,
        lon,
        start_us: temporal::to_micros(start),
        stale_us: temporal::to_micros(stale),
        how: event.how.clone(),
        cot_type: event.event_type.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_chat_callsign_first() {
        let detail = json!({
            "__chat": {"senderCallsign": "ALPHA-1"},
            "contact": {"callsign": "BRAVO-2"},
        });
        assert_eq!(
            extract_callsign(detail.as_object().unwrap(), "fallback"),
            "ALPHA-1"
        );
    }

    #[test]
    fn falls_back_to_contact_then_ditto_then_uid() {
        let contact = json!({"contact": {"callsign": "BRAVO-2"}});
        assert_eq!(
            extract_callsign(contact.as_object().unwrap(), "fallback"),
            "BRAVO-2"
        );

        let ditto = json!({"ditto": {"deviceName": "device-9"}});
        assert_eq!(
            extract_callsign(ditto.as_object().unwrap(), "fallback"),
            "device-9"
        );

        let empty = json!({});
        assert_eq!(
            extract_callsign(empty.as_object().unwrap(), "fallback"),
            "fallback"
        );
    }
}
