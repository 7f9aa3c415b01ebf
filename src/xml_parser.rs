//! XML parsing for CoT events (§6 input XML, §4.6 `xml_to_document`'s XML half).
//!
//! Grounded on `xml_parser.rs::parse_cot` and `cot_events.rs::from_xml`, merged
//! into a single parser that produces the structured [`Event`] (point +
//! ordered detail tree) instead of a flat struct with a raw detail string.
//! Malformed XML surfaces as [`CotError`] (§7 "parse-time errors are fatal; no
//! partial document is produced").

use crate::cot_events::Event;
use crate::detail;
use crate::error::CotError;
use crate::point::Point;
use quick_xml::events::Event as XmlEvent;
use quick_xml::Reader;

/// Parses a CoT XML document into an [`Event`].
pub fn parse_event(xml: &str) -> Result<Event, CotError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut buf = Vec::new();

    let mut version = String::new();
    let mut uid = String::new();
    let mut event_type = String::new();
    let mut time = String::new();
    let mut start = String::new();
    let mut stale = String::new();
    let mut how = String::new();
    let mut point: Option<Point> = None;
    let mut detail: Vec<detail::DetailElement> = Vec::new();
    let mut found_event = false;

    loop {
        buf.clear();
        match reader.read_event_into(&mut buf)? {
            XmlEvent::Start(e) | XmlEvent::Empty(e) if e.name().as_ref() == b"event" => {
                found_event = true;
                for attr in e.attributes() {
                    let attr = attr?;
                    let value = attr.unescape_value()?.into_owned();
                    match attr.key.as_ref() {
                        b"version" => version = value,
                        b"uid" => uid = value,
                        b"type" => event_type = value,
                        b"time" => time = value,
                        b"start" => start = value,
                        b"stale" => stale = value,
                        b"how" => how = value,
                        _ => {}
                    }
                }
            }
            XmlEvent::Start(e) | XmlEvent::Empty(e) if e.name().as_ref() == b"point" => {
                let mut lat = "0.0".to_string();
                let mut lon = "0.0".to_string();
                let mut hae = "0.0".to_string();
                let mut ce = "9999999.0".to_string();
                let mut le = "9999999.0".to_string();
                for attr in e.attributes() {
                    let attr = attr?;
                    let value = attr.unescape_value()?.into_owned();
                    match attr.key.as_ref() {
                        b"lat" => lat = value,
                        b"lon" => lon = value,
                        b"hae" => hae = value,
                        b"ce" => ce = value,
                        b"le" => le = value,
                        _ => {}
                    }
                }
                point = Some(Point::parse(&lat, &lon, &hae, &ce, &le));
            }
            XmlEvent::Start(e) if e.name().as_ref() == b"detail" => {
                let inner_start = reader.buffer_position() as usize;
                let mut depth = 1;
                let mut inner_end = inner_start;
                loop {
                    buf.clear();
                    match reader.read_event_into(&mut buf)? {
                        XmlEvent::Start(ref e2) if e2.name().as_ref() == b"detail" => depth += 1,
                        XmlEvent::End(ref e2) if e2.name().as_ref() == b"detail" => {
                            depth -= 1;
                            if depth == 0 {
                                inner_end = reader.buffer_position() as usize - "</detail>".len();
                                break;
                            }
                        }
                        XmlEvent::Eof => break,
                        _ => {}
                    }
                }
                let inner = &xml[inner_start..inner_end];
                detail = detail::parse_detail(&format!("<detail>{inner}</detail>"))?;
            }
            XmlEvent::Empty(e) if e.name().as_ref() == b"detail" => {}
            XmlEvent::Eof => break,
            _ => {}
        }
    }

    if !found_event {
        return Err(CotError::MissingField("event".to_string()));
    }

    Ok(Event {
        version,
        uid,
        event_type,
        time,
        start,
        stale,
        how,
        point,
        detail,
    })
}
