//! XML reconstruction for CoT events (§4.6 `document_to_xml`'s XML half).
//!
//! Grounded on `xml_writer.rs::to_cot_xml`, rebuilt on `quick_xml::Writer`
//! instead of hand-concatenated strings with embedded `println!` debugging and
//! the narrow `force_nested` "sensor"/"platform" rewrite hack — neither has a
//! counterpart in SPEC_FULL.md. Detail reconstruction delegates to
//! `detail::write_detail`, which already handles arbitrary nesting and order.

use crate::cot_events::Event;
use crate::error::CotError;
use crate::point::format_cot_float;
use quick_xml::events::{BytesEnd, BytesStart, Event as XmlEvent};
use quick_xml::Writer;
use std::io::{Cursor, Write as _};

/// Serializes an [`Event`] to CoT XML.
pub fn write_event(event: &Event) -> Result<String, CotError> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    let mut start = BytesStart::new("event");
    start.push_attribute(("version", event.version.as_str()));
    start.push_attribute(("uid", event.uid.as_str()));
    start.push_attribute(("type", event.event_type.as_str()));
    start.push_attribute(("time", event.time.as_str()));
    start.push_attribute(("start", event.start.as_str()));
    start.push_attribute(("stale", event.stale.as_str()));
    start.push_attribute(("how", event.how.as_str()));
    writer.write_event(XmlEvent::Start(start))?;

    if let Some(point) = &event.point {
        let lat = format_point_field(&point.lat);
        let lon = format_point_field(&point.lon);
        let hae = format_point_field(&point.hae);
        let ce = format_point_field(&point.ce);
        let le = format_point_field(&point.le);
        let mut p = BytesStart::new("point");
        p.push_attribute(("lat", lat.as_str()));
        p.push_attribute(("lon", lon.as_str()));
        p.push_attribute(("hae", hae.as_str()));
        p.push_attribute(("ce", ce.as_str()));
        p.push_attribute(("le", le.as_str()));
        writer.write_event(XmlEvent::Empty(p))?;
    }

    if !event.detail.is_empty() {
        let detail_xml = crate::detail::write_detail(&event.detail)?;
        // write_detail already produces a well-formed <detail>...</detail>
        // block; splice it in as raw markup rather than re-escaping it.
        writer
            .get_mut()
            .write_all(detail_xml.as_bytes())
            .map_err(|e| CotError::XmlError(e.to_string()))?;
    }

    writer.write_event(XmlEvent::End(BytesEnd::new("event")))?;
    let bytes = writer.into_inner().into_inner();
    String::from_utf8(bytes).map_err(CotError::from)
}

/// Re-parses a source string as a float and reformats it for shortest
/// round-trippable output, falling back to the source text if it isn't
/// numeric (preserving whatever the original producer wrote).
fn format_point_field(source: &str) -> String {
    source
        .trim()
        .parse::<f64>()
        .map(format_cot_float)
        .unwrap_or_else(|_| source.to_string())
}
