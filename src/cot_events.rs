//! The CoT event data model (§3): header attributes, point, and detail tree.
//!
//! Grounded on `cot_events.rs::CotEvent`/`Point`, generalized in two ways the
//! spec requires: `detail` holds a structured, ordered `DetailElement` tree
//! instead of a raw XML string (so duplicate siblings and nesting survive a
//! conversion instead of being passed through as opaque text), and
//! `time`/`start`/`stale` keep their original source strings rather than being
//! eagerly parsed into `DateTime<Utc>`, preserving round-trip fidelity for
//! inputs with non-RFC3339 formatting until a conversion actually needs the
//! numeric value.

use crate::detail::DetailElement;
use crate::error::CotError;
use crate::point::Point;
use chrono::Utc;
use uuid::Uuid;

/// A parsed Cursor-on-Target event.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub version: String,
    pub uid: String,
    pub event_type: String,
    pub time: String,
    pub start: String,
    pub stale: String,
    pub how: String,
    pub point: Option<Point>,
    pub detail: Vec<DetailElement>,
}

impl Default for Event {
    fn default() -> Self {
        let now = Utc::now();
        let stale = now + chrono::Duration::minutes(5);
        Self {
            version: "2.0".to_string(),
            uid: Uuid::new_v4().to_string(),
            event_type: "a-f-G-U-C".to_string(),
            time: now.to_rfc3339(),
            start: now.to_rfc3339(),
            stale: stale.to_rfc3339(),
            how: "h-g-i-g-o".to_string(),
            point: Some(Point {
                lat: "0.0".to_string(),
                lon: "0.0".to_string(),
                hae: "0.0".to_string(),
                ce: "999999.0".to_string(),
                le: "999999.0".to_string(),
            }),
            detail: Vec::new(),
        }
    }
}

impl Event {
    /// Serializes this event to CoT XML.
    pub fn to_xml(&self) -> Result<String, CotError> {
        crate::xml_writer::write_event(self)
    }

    /// Parses a CoT XML document into an event.
    pub fn from_xml(xml: &str) -> Result<Self, CotError> {
        crate::xml_parser::parse_event(xml)
    }

    /// Creates a location-update event with a `contact` detail element.
    pub fn new_location_update(
        uid: &str,
        callsign: &str,
        team: &str,
        lat: f64,
        lon: f64,
        hae: f64,
    ) -> Self {
        let now = Utc::now();
        Self {
            version: "2.0".to_string(),
            uid: uid.to_string(),
            event_type: "a-f-G-U-C".to_string(),
            time: now.to_rfc3339(),
            start: now.to_rfc3339(),
            stale: (now + chrono::Duration::minutes(5)).to_rfc3339(),
            how: "h-g-i-g-o".to_string(),
            point: Some(Point::parse(
                &lat.to_string(),
                &lon.to_string(),
                &hae.to_string(),
                "10.0",
                "10.0",
            )),
            detail: vec![DetailElement {
                name: "contact".to_string(),
                attrs: vec![
                    ("callsign".to_string(), callsign.to_string()),
                    ("team".to_string(), team.to_string()),
                ],
                text: None,
                children: Vec::new(),
            }],
        }
    }

    /// Creates a chat-message event with `__chat` and `remarks` detail elements.
    pub fn new_chat_message(
        sender_uid: &str,
        sender_callsign: &str,
        message: &str,
        chatroom: &str,
        chat_group_uid: &str,
    ) -> Self {
        let now = Utc::now();
        Self {
            version: "2.0".to_string(),
            uid: format!("Chat-{sender_uid}-{}", Uuid::new_v4()),
            event_type: "b-t-f".to_string(),
            time: now.to_rfc3339(),
            start: now.to_rfc3339(),
            stale: (now + chrono::Duration::minutes(5)).to_rfc3339(),
            how: "h-g-i-g-o".to_string(),
            point: None,
            detail: vec![
                DetailElement {
                    name: "__chat".to_string(),
                    attrs: vec![
                        ("senderCallsign".to_string(), sender_callsign.to_string()),
                        ("chatroom".to_string(), chatroom.to_string()),
                        ("chatGroupUid".to_string(), chat_group_uid.to_string()),
                    ],
                    text: None,
                    children: Vec::new(),
                },
                DetailElement {
                    name: "remarks".to_string(),
                    attrs: Vec::new(),
                    text: Some(message.to_string()),
                    children: Vec::new(),
                },
            ],
        }
    }

    /// Creates an emergency event with an `emergency` detail element.
    pub fn new_emergency(
        uid: &str,
        callsign: &str,
        lat: f64,
        lon: f64,
        emergency_type: &str,
        message: &str,
    ) -> Self {
        let now = Utc::now();
        Self {
            version: "2.0".to_string(),
            uid: uid.to_string(),
            event_type: "b-a-o-can".to_string(),
            time: now.to_rfc3339(),
            start: now.to_rfc3339(),
            stale: (now + chrono::Duration::minutes(5)).to_rfc3339(),
            how: "h-g-i-g-o".to_string(),
            point: Some(Point::parse(
                &lat.to_string(),
                &lon.to_string(),
                "0.0",
                "10.0",
                "10.0",
            )),
            detail: vec![DetailElement {
                name: "emergency".to_string(),
                attrs: vec![
                    ("type".to_string(), emergency_type.to_string()),
                    ("callsign".to_string(), callsign.to_string()),
                ],
                text: Some(message.to_string()),
                children: Vec::new(),
            }],
        }
    }
}
