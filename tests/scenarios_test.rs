//! End-to-end scenario coverage for the event/document conversion surface.

use ditto_cot::detail::stable_key::generate_stable_key;
use ditto_cot::document::{Document, RValue};
use ditto_cot::policy::ConversionPolicy;
use ditto_cot::{document_to_xml, semantic_equal, xml_to_document};
use pretty_assertions::assert_eq;

fn r_string(doc: &Document, key: &str) -> String {
    match doc.r().get(key) {
        Some(RValue::String(s)) => s.clone(),
        other => panic!("expected string at '{key}', got {other:?}"),
    }
}

#[test]
fn s1_friendly_map_item() {
    let xml = r#"<event version="2.0" uid="Alpha1" type="a-f-G-U-C" time="2025-06-24T14:10:00Z" start="2025-06-24T14:10:00Z" stale="2025-06-24T14:20:00Z" how="m-g"><point lat="34.052235" lon="-118.243683" hae="100.0" ce="10.0" le="5.0"/><detail><contact callsign="Alpha1"/></detail></event>"#;
    let doc = xml_to_document(xml, "peer-1", ConversionPolicy::strict()).unwrap();

    assert!(matches!(doc, Document::MapItem(_)));
    assert_eq!(doc.id(), "Alpha1");
    assert_eq!(doc.cot_type(), "a-f-G-U-C");
    assert_eq!(r_string(&doc, "r_contact_callsign"), "Alpha1");

    let flat = doc.to_flat_json().unwrap();
    assert_eq!(flat["j"], 34.052235);
    assert_eq!(flat["l"], -118.243683);
    assert_eq!(flat["i"], 100.0);
    assert_eq!(flat["h"], 10.0);
    assert_eq!(flat["k"], 5.0);
    assert_eq!(flat["e"], "Alpha1");
}

#[test]
fn s2_chat_message() {
    let xml = r#"<event version="2.0" uid="CHAT-001" type="b-t-f" time="2025-06-24T14:10:00Z" start="2025-06-24T14:10:00Z" stale="2025-06-24T14:20:00Z" how="h-g-i-g-o"><detail><__chat senderCallsign="ALPHA-1" chatroom="BLUE-CHAT"/><remarks>Roger that</remarks></detail></event>"#;
    let doc = xml_to_document(xml, "peer-1", ConversionPolicy::strict()).unwrap();

    match &doc {
        Document::Chat(chat) => {
            assert_eq!(chat.message.as_deref(), Some("Roger that"));
            assert_eq!(chat.room.as_deref(), Some("BLUE-CHAT"));
        }
        other => panic!("expected Chat, got {other:?}"),
    }
    assert_eq!(r_string(&doc, "r___chat_senderCallsign"), "ALPHA-1");
    assert_eq!(r_string(&doc, "r___chat_chatroom"), "BLUE-CHAT");

    let flat = doc.to_flat_json().unwrap();
    assert_eq!(flat["e"], "ALPHA-1");
    assert_eq!(flat["message"], "Roger that");
    assert_eq!(flat["room"], "BLUE-CHAT");
}

#[test]
fn s3_file_share() {
    let xml = r#"<event version="2.0" uid="FILE-1" type="b-f-t-f" time="2025-06-24T14:10:00Z" start="2025-06-24T14:10:00Z" stale="2025-06-24T14:20:00Z" how="h-g-i-g-o"><detail><fileshare filename="mission.pdf" sizeInBytes="1048576" mimetype="application/pdf"/></detail></event>"#;
    let doc = xml_to_document(xml, "peer-1", ConversionPolicy::strict()).unwrap();

    match &doc {
        Document::File(file) => {
            assert_eq!(file.file.as_deref(), Some("mission.pdf"));
            assert_eq!(file.sz, Some(1048576.0));
            assert_eq!(file.mime.as_deref(), Some("application/pdf"));
        }
        other => panic!("expected File, got {other:?}"),
    }
    assert_eq!(r_string(&doc, "r_fileshare_filename"), "mission.pdf");
    assert_eq!(r_string(&doc, "r_fileshare_mimetype"), "application/pdf");
}

#[test]
fn s4_stable_keys_for_duplicate_siblings() {
    let xml = r#"<event version="2.0" uid="U" type="a-u-r-loc-g" time="2025-06-24T14:10:00Z" start="2025-06-24T14:10:00Z" stale="2025-06-24T14:20:00Z" how="m-g"><detail><foo a="1"/><foo a="2"/><bar/></detail></event>"#;
    let doc = xml_to_document(xml, "peer-1", ConversionPolicy::strict()).unwrap();

    let key0 = format!("r_{}_a", generate_stable_key("U", "foo", 0));
    let key1 = format!("r_{}_a", generate_stable_key("U", "foo", 1));
    assert_eq!(r_string(&doc, &key0), "1");
    assert_eq!(r_string(&doc, &key1), "2");
    assert!(doc.r().contains_key("r_bar"));
}

#[test]
fn s5_detail_with_leading_underscores() {
    let xml = r#"<event version="2.0" uid="U" type="a-u-r-loc-g" time="2025-06-24T14:10:00Z" start="2025-06-24T14:10:00Z" stale="2025-06-24T14:20:00Z" how="m-g"><detail><__group name="Cyan" role="Lead"/></detail></event>"#;
    let doc = xml_to_document(xml, "peer-1", ConversionPolicy::strict()).unwrap();

    assert_eq!(r_string(&doc, "r___group_name"), "Cyan");
    assert_eq!(r_string(&doc, "r___group_role"), "Lead");
}

#[test]
fn s6_coordinate_clamping_safe_mode() {
    let xml = r#"<event version="2.0" uid="U" type="a-f-G-U-C" time="2025-06-24T14:10:00Z" start="2025-06-24T14:10:00Z" stale="2025-06-24T14:20:00Z" how="m-g"><point lat="200" lon="-999" hae="0" ce="0" le="0"/></event>"#;

    let safe = xml_to_document(xml, "peer-1", ConversionPolicy::safe()).unwrap();
    let flat = safe.to_flat_json().unwrap();
    assert_eq!(flat["j"], 90.0);
    assert_eq!(flat["l"], -180.0);

    assert!(xml_to_document(xml, "peer-1", ConversionPolicy::strict()).is_err());
}

#[test]
fn s7_bidirectional_comparator_catches_extras() {
    let original = r#"<event uid="T" type="a-f-G-U-C" time="t" start="t" stale="t" how="h"/>"#;
    let candidate = r#"<event uid="T" type="a-f-G-U-C" time="t" start="t" stale="t" how="h" extra="x"/>"#;
    assert!(semantic_equal(original, candidate).is_err());
    assert!(semantic_equal(candidate, original).is_err());
}

#[test]
fn full_pipeline_round_trips_semantically() {
    // Timestamps are given at microsecond precision, matching the canonical
    // format `document_to_xml` reconstructs them in, so the comparator's
    // plain string-equality fallback for non-numeric attributes holds.
    let xml = r#"<event version="2.0" uid="USER-1" type="a-f-G-U-C" time="2025-06-24T14:10:00.000000Z" start="2025-06-24T14:10:00.000000Z" stale="2025-06-24T14:20:00.000000Z" how="m-g"><point lat="34.1" lon="-118.1" hae="150.0" ce="9999999.0" le="9999999.0"/><detail><contact callsign="ALPHA-1"/><__group name="Cyan" role="Lead"/></detail></event>"#;
    let doc = xml_to_document(xml, "peer-1", ConversionPolicy::strict()).unwrap();
    let rebuilt = document_to_xml(&doc, ConversionPolicy::strict()).unwrap();
    match semantic_equal(xml, &rebuilt) {
        Ok(()) => {}
        Err(m) => panic!("round trip diverged: {m:?}"),
    }
}
