use criterion::{criterion_group, criterion_main, Criterion};
use ditto_cot::policy::ConversionPolicy;
use ditto_cot::{document_to_xml, xml_parser, xml_to_document, xml_writer};

const LOCATION_XML: &str = r#"<event version="2.0" uid="ABC123" type="a-h-G" time="2023-01-01T00:00:00Z" start="2023-01-01T00:00:00Z" stale="2023-01-01T01:00:00Z" how="m-g"><point lat="34.0" lon="-117.0" hae="100.0" ce="5.0" le="5.0"/><detail><contact callsign="RAVEN"/><__group name="Blue"/></detail></event>"#;

fn bench_xml_round_trip(c: &mut Criterion) {
    c.bench_function("XML round-trip", |b| {
        b.iter(|| {
            let event = xml_parser::parse_event(LOCATION_XML).unwrap();
            let _ = xml_writer::write_event(&event).unwrap();
        });
    });
}

fn bench_cot_to_document_round_trip(c: &mut Criterion) {
    c.bench_function("CoT to document round-trip", |b| {
        b.iter(|| {
            let doc = xml_to_document(LOCATION_XML, "test-peer", ConversionPolicy::strict()).unwrap();
            let _ = document_to_xml(&doc, ConversionPolicy::strict()).unwrap();
        });
    });
}

fn bench_different_message_types(c: &mut Criterion) {
    let messages = [
        ("location_update", r#"<event version="2.0" uid="LOC123" type="a-f-G-U-C" time="2023-01-01T00:00:00Z" start="2023-01-01T00:00:00Z" stale="2023-01-01T01:00:00Z" how="m-g"><point lat="34.0" lon="-117.0" hae="100.0" ce="5.0" le="5.0"/><detail><contact callsign="TEAM1"/><__group name="Blue"/></detail></event>"#),
        ("chat_message", r#"<event version="2.0" uid="CHAT123" type="b-t-f" time="2023-01-01T00:00:00Z" start="2023-01-01T00:00:00Z" stale="2023-01-01T01:00:00Z" how="h-g-i-g-o"><detail><__chat chatroom="All Chat" id="all" messageId="msg123" senderCallsign="USER1"><chatgrp id="all" uid0="USER1"/></__chat><link uid="USER1" type="a-f-G-U-C" relation="p-p"/><remarks source="BAO.F.ATAK.USER1" to="" time="2023-01-01T00:00:00Z">Hello, world!</remarks></detail></event>"#),
        ("emergency", r#"<event version="2.0" uid="EMER123" type="a-f-G-U-C-E" time="2023-01-01T00:00:00Z" start="2023-01-01T00:00:00Z" stale="2023-01-01T01:00:00Z" how="m-g"><point lat="34.0" lon="-117.0" hae="100.0" ce="5.0" le="5.0"/><detail><emergency type="9-Line" cancel="false"><__emergency id="EMER123"/></emergency><contact callsign="TEAM1"/><__group name="Blue"/></detail></event>"#),
    ];

    for (name, xml) in messages {
        c.bench_function(&format!("Full pipeline: {name}"), |b| {
            b.iter(|| {
                let doc = xml_to_document(xml, "test-peer", ConversionPolicy::strict()).unwrap();
                let _ = document_to_xml(&doc, ConversionPolicy::strict()).unwrap();
            });
        });
    }
}

criterion_group!(
    benches,
    bench_xml_round_trip,
    bench_cot_to_document_round_trip,
    bench_different_message_types
);
criterion_main!(benches);
